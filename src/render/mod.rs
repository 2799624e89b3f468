use std::fs;
use std::path::Path;

use actix_web::http::StatusCode;
use handlebars::{handlebars_helper, html_escape, Handlebars};
use lazy_static::lazy_static;
use log::{info, warn};
use serde::Serialize;

use crate::error::CrmError;

/// Markdown rendering for contact notes.
pub mod markdown;

/// Full pages, rendered by name.
const PAGES: &[(&str, &str)] = &[
    ("login", include_str!("../../default_pages/login.hbs")),
    ("dashboard", include_str!("../../default_pages/dashboard.hbs")),
    ("contacts", include_str!("../../default_pages/contacts.hbs")),
    ("contact_form", include_str!("../../default_pages/contact_form.hbs")),
    ("contact_detail", include_str!("../../default_pages/contact_detail.hbs")),
    ("error", include_str!("../../default_pages/error.hbs")),
];

/// Pieces included by pages with `{{> name}}`. Each is also renderable on its own, which is how
/// htmx requests get just the table rows.
const PARTIALS: &[(&str, &str)] = &[
    ("header", include_str!("../../default_pages/header.hbs")),
    ("footer", include_str!("../../default_pages/footer.hbs")),
    ("contact_rows", include_str!("../../default_pages/contact_rows.hbs")),
];

handlebars_helper!(markdown_helper: |source: str| markdown::to_html(source));

lazy_static! {
    /// Built-in pages only, for errors raised where no application state is at hand.
    static ref BUILTIN: Option<Templates> = Templates::load(None).ok();
}

/// The page templates, with the built-in defaults replaced by any matching `.hbs` file in the pages directory.
pub struct Templates {
    registry: Handlebars<'static>,
}

#[derive(Serialize)]
struct ErrorPage<'a> {
    title: &'a str,
    status: u16,
    message: &'a str,
}

impl Templates {
    pub fn load(pages_dir: Option<&Path>) -> Result<Templates, CrmError> {
        let mut registry = Handlebars::new();
        registry.register_helper("markdown", Box::new(markdown_helper));

        for (name, source) in PARTIALS.iter().chain(PAGES) {
            register(&mut registry, name, source)?;
        }

        if let Some(dir) = pages_dir {
            if dir.is_dir() {
                override_from(&mut registry, dir)?;
            } else {
                warn!("pages directory {} does not exist, using built-in pages", dir.display());
            }
        }

        Ok(Templates { registry })
    }

    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, CrmError> {
        Ok(self.registry.render(name, data)?)
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.registry.has_template(name)
    }
}

fn register(registry: &mut Handlebars<'static>, name: &str, source: &str) -> Result<(), CrmError> {
    if PARTIALS.iter().any(|(partial, _)| *partial == name) {
        registry.register_partial(name, source)?;
    }
    registry.register_template_string(name, source)?;
    Ok(())
}

/// Registers every `.hbs` file in the directory under its file stem.
fn override_from(registry: &mut Handlebars<'static>, dir: &Path) -> Result<(), CrmError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("hbs") {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };

        let source = fs::read_to_string(&path)?;
        register(registry, name, &source)?;
        info!("using template {}", path.display());
    }
    Ok(())
}

/// A complete HTML error page. Falls back to a bare page if even the built-in template fails.
pub fn error_page(status: StatusCode, message: &str) -> String {
    let title = status.canonical_reason().unwrap_or("Error");
    let data = ErrorPage { title, status: status.as_u16(), message };

    match BUILTIN.as_ref().map(|templates| templates.render("error", &data)) {
        Some(Ok(page)) => page,
        _ => format!(
            "<!doctype html><title>{} {}</title><h1>{} {}</h1><p>{}</p>",
            data.status, title, data.status, title, html_escape(message)
        ),
    }
}
