//! The dashboard page, served over HTTP.
//!
//! Every request to `/` runs the whole pipeline and renders the result;
//! the server keeps nothing between requests except the compiled
//! templates.

pub mod tmpl;

use handlebars::Handlebars;
use rouille::{Request, Response, router};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::logging::{self, Component};
use crate::model::DashboardError;
use crate::pipeline::{Page, Pipeline};
use crate::render::{DashboardView, PAGE_TITLE};
use crate::verify;

use self::tmpl::TemplateContext;

/// Dashboard view plus the chart specifications as script-safe JSON.
#[derive(Serialize)]
pub struct DashboardPage<'a> {
    #[serde(flatten)]
    pub view: &'a DashboardView,
    pub figures: Option<String>,
}

#[derive(Serialize)]
pub struct NotFoundView {
    pub stylesheet: String,
    pub uri: String,
}

pub struct App {
    pipeline: Pipeline,
    hbs: Handlebars<'static>,
}

impl App {
    pub fn new(pipeline: Pipeline, hbs: Handlebars<'static>) -> Self {
        App { pipeline, hbs }
    }

    /// Render a page result as HTML.
    pub fn render_page(&self, page: &Page) -> Result<String, DashboardError> {
        match page {
            Page::Dashboard(view) => {
                let figures = match view.widgets {
                    Some(ref w) => {
                        let json = serde_json::to_string(&serde_json::json!({
                            "scatter": w.scatter,
                            "bar": w.bar,
                            "map": w.map,
                        }))?;
                        Some(tmpl::script_safe_json(&json))
                    }
                    None => None,
                };
                TemplateContext {
                    template: "dashboard",
                    title: view.page_title,
                    body: DashboardPage { view, figures },
                }
                .render(&self.hbs)
            }
            Page::Halted(halted) => TemplateContext {
                template: "halted",
                title: halted.page_title,
                body: halted,
            }
            .render(&self.hbs),
        }
    }

    fn on_request(&self, req: &Request) -> Result<Response, DashboardError> {
        router!(req,
            (GET) (/) => {
                let station = req.get_param("station");
                let page = self.pipeline.page(station.as_deref());
                let html = self.render_page(&page)?;
                Ok(Response::html(html).with_status_code(page.status_code()))
            },
            (GET) (/api/dashboard) => {
                let station = req.get_param("station");
                let page = self.pipeline.page(station.as_deref());
                Ok(Response::json(&page).with_status_code(page.status_code()))
            },
            (GET) (/verify) => {
                let cfg = self.pipeline.config();
                let report = verify::verify_endpoint(self.pipeline.client(), &cfg.graphql_endpoint);
                Ok(Response::json(&report))
            },
            _ => {
                let html = TemplateContext {
                    template: "not_found",
                    title: PAGE_TITLE,
                    body: NotFoundView {
                        stylesheet: self.pipeline.config().style.stylesheet(),
                        uri: req.url(),
                    },
                }
                .render(&self.hbs)?;
                Ok(Response::html(html).with_status_code(404))
            }
        )
    }

    pub fn handle_request(&self, req: &Request) -> Response {
        let start = Instant::now();
        let ret = match self.on_request(req) {
            Ok(r) => r,
            Err(e) => {
                logging::error(Component::Http, Some(req.raw_url()), &format!("processing request failed: {}", e));
                Response::text("Something's catastrophically broken!").with_status_code(500)
            }
        };
        let dur = start.elapsed();
        logging::info(
            Component::Http,
            None,
            &format!(
                "{} {} \"{}\" - {} [{}.{:03}s]",
                req.remote_addr(),
                req.method(),
                req.raw_url(),
                ret.status_code,
                dur.as_secs(),
                dur.subsec_millis()
            ),
        );
        ret
    }
}

/// Serve the dashboard until the process exits. A single worker handles
/// requests, so page loads never overlap.
pub fn serve(listen: &str, app: Arc<App>) -> Result<(), DashboardError> {
    let server = rouille::Server::new(listen, move |req| app.handle_request(req))
        .map_err(|e| DashboardError::Server(e.to_string()))?
        .pool_size(1);
    logging::info(Component::System, None, &format!("Starting HTTP server on {}", server.server_addr()));
    server.run();
    Ok(())
}
