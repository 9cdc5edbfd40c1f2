//! Go-style text templates.
//!
//! Pattern names and paths (`{{index .PathMatches 0 1}}`) and layout
//! templates (`{{ range .MenuItems }}`) share one engine. Data is handed to it
//! as [`gtmpl::Value`] trees whose field names follow the Go conventions
//! (`.Path`, `.MenuItems`, `.BaseURL`).
//!
//! Layout data is HTML-escaped before it reaches the template, except
//! `.Content`, which is already HTML.

use std::collections::HashMap;

use folio_config::MenuItem;
use gtmpl::{Context, Template, Value};

use crate::{PatternMatch, RenderContext, SiteError};

/// Layout used when no `base` template is configured.
pub const DEFAULT_BASE_TEMPLATE: &str = include_str!("templates/base.html");

/// A compiled template.
pub struct PageTemplate {
    name: String,
    inner: Template,
}

impl std::fmt::Debug for PageTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageTemplate")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl PageTemplate {
    /// Parse template source.
    pub fn compile(name: &str, source: &str) -> Result<Self, SiteError> {
        let mut inner = Template::default();
        inner
            .parse(source)
            .map_err(|e| SiteError::template(name, format!("unable to parse template: {e}")))?;
        Ok(Self {
            name: name.to_owned(),
            inner,
        })
    }

    /// Execute the template against `data`.
    pub fn execute(&self, data: Value) -> Result<String, SiteError> {
        self.inner
            .render(&Context::from(data))
            .map_err(|e| SiteError::template(&self.name, format!("unable to execute template: {e}")))
    }
}

/// Data handed to layout templates: one render context plus the menu as
/// marked for that page.
#[derive(Debug)]
pub struct PageView<'a> {
    pub context: &'a RenderContext,
    pub menu: &'a [MenuItem],
}

impl PageView<'_> {
    /// Convert to template data.
    pub fn to_value(&self) -> Value {
        let ctx = self.context;
        object([
            ("Title", html_text(&ctx.title)),
            ("SiteTitle", html_text(&ctx.site_title)),
            ("Description", html_text(&ctx.description)),
            ("MenuItems", menu_value(self.menu)),
            ("Content", text(&ctx.content)),
            ("OutDir", html_text(&ctx.output_dir.to_string_lossy())),
            ("OutFile", html_text(&ctx.output_file.to_string_lossy())),
            ("BaseURL", html_text(&ctx.base_url)),
            ("Link", html_text(&ctx.link)),
            ("EditURL", html_text(&ctx.edit_url)),
        ])
    }
}

impl PatternMatch {
    /// Convert to template data (`.Path`, `.PathMatches`).
    pub fn to_value(&self) -> Value {
        let occurrences = self
            .path_matches
            .iter()
            .map(|groups| Value::Array(groups.iter().map(|g| text(g)).collect()))
            .collect();
        object([
            ("Path", text(&self.path)),
            ("PathMatches", Value::Array(occurrences)),
        ])
    }
}

fn menu_value(items: &[MenuItem]) -> Value {
    Value::Array(
        items
            .iter()
            .map(|item| {
                object([
                    ("Name", html_text(&item.name)),
                    ("Title", html_text(&item.title)),
                    ("Link", html_text(&item.link)),
                    ("Items", menu_value(&item.items)),
                    ("Group", Value::Bool(item.group)),
                    ("Active", Value::Bool(item.active)),
                ])
            })
            .collect(),
    )
}

fn text(value: &str) -> Value {
    Value::String(value.to_owned())
}

fn html_text(value: &str) -> Value {
    Value::String(escape_html(value))
}

/// Escape HTML special characters, quotes included so the result is safe
/// inside attribute values.
fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

fn object<const N: usize>(fields: [(&str, Value); N]) -> Value {
    Value::Object(
        fields
            .into_iter()
            .map(|(key, value)| (key.to_owned(), value))
            .collect::<HashMap<_, _>>(),
    )
}
