//! Templating engine stuff.

use handlebars::Handlebars;
use serde::Serialize;

use crate::logging::{self, Component};
use crate::model::DashboardError;

#[derive(Serialize)]
pub struct TemplateContext<'a, T>
where
    T: Serialize,
{
    pub template: &'static str,
    pub title: &'a str,
    pub body: T,
}

impl<'a, T> TemplateContext<'a, T>
where
    T: Serialize,
{
    pub fn render(self, hbs: &Handlebars<'_>) -> Result<String, DashboardError> {
        match hbs.render(self.template, &self) {
            Ok(html) => Ok(html),
            Err(e) => {
                logging::warn(Component::Http, Some(self.template), &format!("failed to render template: {}", e));
                Err(e.into())
            }
        }
    }
}

struct Template {
    name: &'static str,
    content: &'static str,
}

macro_rules! template {
    ($name:expr) => {
        Template {
            name: $name,
            content: include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/", $name, ".html.hbs")),
        }
    };
}

// Partials are shared fragments; pages are rendered by name.
static PARTIALS: [Template; 2] = [template!("header"), template!("footer")];
static PAGES: [Template; 3] = [template!("dashboard"), template!("halted"), template!("not_found")];

pub fn handlebars_init() -> Result<Handlebars<'static>, DashboardError> {
    let mut hbs = Handlebars::new();
    hbs.set_strict_mode(true);
    for partial in PARTIALS.iter() {
        hbs.register_partial(partial.name, partial.content)?;
    }
    for page in PAGES.iter() {
        hbs.register_template_string(page.name, page.content)?;
    }
    Ok(hbs)
}

/// Make serialized JSON safe to place inside a `<script>` element.
///
/// `<` only ever occurs inside JSON strings, where `\u003c` means the same.
pub fn script_safe_json(json: &str) -> String {
    json.replace('<', "\\u003c")
}
