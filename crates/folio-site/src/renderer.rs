//! Layout rendering and output writing.

use std::collections::HashMap;
use std::fs;

use folio_config::{BASE_TEMPLATE, MenuItem, TemplateConfig};

use crate::{DEFAULT_BASE_TEMPLATE, PageTemplate, PageView, RenderContext, SiteError, SiteMeta, mark_active};

/// Result of a render pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderSummary {
    /// Number of pages written.
    pub pages: usize,
}

/// Compiled layout templates.
///
/// The `base` layout is always present: it is either configured or the
/// built-in default.
#[derive(Debug)]
pub struct Renderer {
    templates: HashMap<String, PageTemplate>,
}

impl Renderer {
    /// Read and compile the configured templates.
    pub fn new(templates: &[TemplateConfig]) -> Result<Self, SiteError> {
        let mut compiled = HashMap::with_capacity(templates.len() + 1);
        for config in templates {
            let source =
                fs::read_to_string(&config.source).map_err(|e| SiteError::io(&config.source, e))?;
            compiled.insert(config.name.clone(), PageTemplate::compile(&config.name, &source)?);
        }

        if !compiled.contains_key(BASE_TEMPLATE) {
            tracing::info!("No base template configured, using the default one");
            compiled.insert(
                BASE_TEMPLATE.to_owned(),
                PageTemplate::compile(BASE_TEMPLATE, DEFAULT_BASE_TEMPLATE)?,
            );
        }

        Ok(Self {
            templates: compiled,
        })
    }

    /// Render every context and write it to its output file.
    ///
    /// Stops at the first failure; pages already written stay on disk.
    pub fn render(
        &self,
        contexts: Vec<RenderContext>,
        menu: &mut [MenuItem],
        meta: &SiteMeta,
    ) -> Result<RenderSummary, SiteError> {
        let mut summary = RenderSummary::default();
        for mut ctx in contexts {
            ctx.attach(meta);
            self.render_page(&ctx, menu)
                .map_err(|e| e.in_page(&ctx.link))?;
            summary.pages += 1;
        }
        Ok(summary)
    }

    fn render_page(&self, ctx: &RenderContext, menu: &mut [MenuItem]) -> Result<(), SiteError> {
        mark_active(menu, &ctx.link);

        let template = self.layout(&ctx.template)?;
        let html = template.execute(PageView { context: ctx, menu }.to_value())?;

        fs::create_dir_all(&ctx.output_dir).map_err(|e| SiteError::io(&ctx.output_dir, e))?;
        fs::write(&ctx.output_file, html).map_err(|e| SiteError::io(&ctx.output_file, e))?;

        tracing::debug!(file = %ctx.output_file.display(), "Wrote page");
        Ok(())
    }

    fn layout(&self, name: &str) -> Result<&PageTemplate, SiteError> {
        let name = if name.is_empty() { BASE_TEMPLATE } else { name };
        self.templates
            .get(name)
            .ok_or_else(|| SiteError::template(name, "template is not defined"))
    }
}
