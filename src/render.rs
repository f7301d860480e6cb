//! Page rendering.
//!
//! DESIGN
//! ======
//! Handlers only pick a template name and hand over a `RenderContext`; the
//! `PageRenderer` trait hides how HTML is produced. `HtmlRenderer` ships the
//! templates embedded in the binary and lets a `TEMPLATE_DIR` replace any of
//! them at startup.
//!
//! Placeholders look like `{{EMAIL}}` and are filled in a single pass, so a
//! value that itself contains `{{...}}` is never expanded again. Every value
//! is HTML-escaped except the pre-built `FLASHES` and `NAV` fragments, whose
//! contents are escaped while they are built.

use std::collections::HashMap;
use std::fmt::Write;
use std::path::Path;

use tracing::{info, warn};

use crate::pages::{self, Category, Page};
use crate::services::flash::Flash;
use crate::services::session::SessionRecord;

const LOGIN_HTML: &str = include_str!("../templates/login.html");
const DASHBOARD_HTML: &str = include_str!("../templates/dashboard.html");
const ASSET_PAGE_HTML: &str = include_str!("../templates/asset_page.html");

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("unknown template: {0}")]
    UnknownTemplate(String),
}

/// Everything a template may show.
pub struct RenderContext<'a> {
    pub title: &'a str,
    pub user: Option<&'a SessionRecord>,
    pub page: Option<&'a Page>,
    pub flashes: &'a [Flash],
}

impl<'a> RenderContext<'a> {
    #[must_use]
    pub fn anonymous(title: &'a str, flashes: &'a [Flash]) -> Self {
        Self { title, user: None, page: None, flashes }
    }

    #[must_use]
    pub fn for_page(page: &'a Page, user: &'a SessionRecord, flashes: &'a [Flash]) -> Self {
        Self { title: page.title, user: Some(user), page: Some(page), flashes }
    }
}

pub trait PageRenderer: Send + Sync {
    /// Render the named template with `ctx`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnknownTemplate`] if no template has that name.
    fn render(&self, template: &str, ctx: &RenderContext<'_>) -> Result<String, RenderError>;
}

pub struct HtmlRenderer {
    templates: HashMap<String, String>,
}

impl HtmlRenderer {
    /// Renderer over the embedded templates only.
    #[must_use]
    pub fn new() -> Self {
        let templates = [
            (pages::LOGIN_TEMPLATE, LOGIN_HTML),
            (pages::DASHBOARD_TEMPLATE, DASHBOARD_HTML),
            (pages::ASSET_TEMPLATE, ASSET_PAGE_HTML),
        ]
        .into_iter()
        .map(|(name, body)| (name.to_owned(), body.to_owned()))
        .collect();
        Self { templates }
    }

    /// Embedded templates, with any `*.html` file in `dir` taking precedence.
    /// Unreadable files are skipped with a warning.
    #[must_use]
    pub fn with_overrides(dir: &Path) -> Self {
        let mut renderer = Self::new();
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "template dir unreadable; using embedded templates");
                return renderer;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("html") {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_owned) else {
                continue;
            };
            match std::fs::read_to_string(&path) {
                Ok(body) => {
                    info!(template = %name, "template override loaded");
                    renderer.templates.insert(name, body);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "template override unreadable"),
            }
        }
        renderer
    }

    #[must_use]
    pub fn has_template(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PageRenderer for HtmlRenderer {
    fn render(&self, template: &str, ctx: &RenderContext<'_>) -> Result<String, RenderError> {
        let body = self
            .templates
            .get(template)
            .ok_or_else(|| RenderError::UnknownTemplate(template.to_owned()))?;

        let current_path = ctx.page.map_or("", |p| p.path);
        let values: HashMap<&str, String> = HashMap::from([
            ("TITLE", escape_html(ctx.title)),
            ("EMAIL", escape_html(ctx.user.map_or("", |u| u.email.as_str()))),
            ("ROLE", escape_html(ctx.user.map_or("", |u| u.role.as_str()))),
            ("USER_ID", escape_html(ctx.user.map_or("", |u| u.id.as_str()))),
            ("CATEGORY", escape_html(ctx.page.map_or("", |p| p.category.label()))),
            ("CATEGORY_SLUG", ctx.page.map_or("", |p| p.category.slug()).to_owned()),
            ("PATH", escape_html(current_path)),
            ("FLASHES", render_flashes(ctx.flashes)),
            ("NAV", render_nav(current_path)),
        ]);

        Ok(fill(body, &values))
    }
}

/// Replace every `{{KEY}}` found in `values`; unknown keys are left as-is.
fn fill(template: &str, values: &HashMap<&str, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = after[..end].trim();
                match values.get(key) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_flashes(flashes: &[Flash]) -> String {
    let mut html = String::new();
    for flash in flashes {
        let _ = writeln!(
            html,
            r#"<div class="flash flash-{}" role="alert">{}</div>"#,
            flash.level.as_str(),
            escape_html(&flash.message)
        );
    }
    html
}

fn render_nav(current_path: &str) -> String {
    let mut html = String::new();
    for category in Category::ALL {
        let _ = writeln!(html, r#"<li class="nav-group"><span>{}</span><ul>"#, escape_html(category.label()));
        for page in pages::in_category(category) {
            let active = if page.path == current_path { r#" class="active""# } else { "" };
            let _ = writeln!(html, r#"<li><a href="{}"{active}>{}</a></li>"#, page.path, escape_html(page.title));
        }
        html.push_str("</ul></li>\n");
    }
    html
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
