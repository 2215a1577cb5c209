use std::sync::Arc;

use aqmon_dashboard::config::Config;
use aqmon_dashboard::logging::{self, Component};
use aqmon_dashboard::pipeline::Pipeline;
use aqmon_dashboard::web::{self, App, tmpl};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::from_env()?;
    logging::init_logger(
        cfg.logging.level,
        cfg.logging.file.as_deref(),
        cfg.logging.console_timestamps,
    );

    logging::info(
        Component::System,
        None,
        &format!("aqmon-dashboard starting, endpoint {}", cfg.graphql_endpoint),
    );
    if let Some(ref snapshot) = cfg.snapshot_path {
        logging::warn(Component::Snapshot, Some(snapshot.as_str()), "serving snapshot instead of live endpoint");
    }

    logging::info(Component::System, None, "initialising Handlebars");
    let hbs = tmpl::handlebars_init()?;

    let listen = cfg.listen.clone();
    let app = Arc::new(App::new(Pipeline::new(cfg)?, hbs));
    web::serve(&listen, app)?;
    Ok(())
}
