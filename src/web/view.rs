//! Server-side HTML rendering.
//!
//! Templates are embedded from `templates/` and compiled once at startup.
//! Every page receives the CSRF token, pending flashes, the base URI and the
//! login state on top of its own variables.

use chrono::DateTime;
use minijinja::{Environment, HtmlEscape, Value};
use rust_embed::RustEmbed;

use crate::config::ViewInfo;

#[derive(RustEmbed)]
#[folder = "templates/"]
#[include = "*.html"]
struct Templates;

/// Compiled template set.
pub struct Views {
    env: Environment<'static>,
    base_uri: String,
}

impl Views {
    pub fn new(info: &ViewInfo) -> Result<Self, minijinja::Error> {
        let base_uri = normalize_base(&info.base_uri);
        let mut env = Environment::new();

        for name in Templates::iter() {
            let Some(file) = Templates::get(&name) else {
                continue;
            };
            let source = String::from_utf8_lossy(&file.data).into_owned();
            env.add_template_owned(name.into_owned(), source)?;
        }

        let base = base_uri.clone();
        env.add_function("css", move |path: String| {
            Value::from_safe_string(format!(
                r#"<link rel="stylesheet" type="text/css" href="{}" />"#,
                prefixed(&base, &path)
            ))
        });
        let base = base_uri.clone();
        env.add_function("js", move |path: String| {
            Value::from_safe_string(format!(
                r#"<script type="text/javascript" src="{}"></script>"#,
                prefixed(&base, &path)
            ))
        });
        let base = base_uri.clone();
        env.add_function("link", move |path: String, name: String| {
            Value::from_safe_string(format!(
                r#"<a href="{}">{}</a>"#,
                prefixed(&base, &path),
                HtmlEscape(&name)
            ))
        });
        env.add_filter("prettytime", prettytime);

        Ok(Self { env, base_uri })
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    pub fn render(&self, name: &str, ctx: Value) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }
}

fn normalize_base(base: &str) -> String {
    let trimmed = base.trim_end_matches('/');
    format!("{}/", trimmed)
}

fn prefixed(base: &str, path: &str) -> String {
    format!("{}{}", base, path.trim_start_matches('/'))
}

/// `3:04 PM 01/02/2006` style timestamps.
fn prettytime(value: String) -> String {
    match DateTime::parse_from_rfc3339(&value) {
        Ok(ts) => ts.format("%-I:%M %p %m/%d/%Y").to_string(),
        Err(_) => value,
    }
}
