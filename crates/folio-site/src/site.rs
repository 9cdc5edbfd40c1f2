//! Whole-site build: derive pages, convert them, render them.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;

use folio_config::Config;

use crate::{
    CmarkEngine, File, MarkdownEngine, PageSource, RenderSummary, Renderer, SiteError, SiteMeta,
    append_to_menu, build_render_context, normalize_home_links,
};

/// A loaded site, ready to render.
///
/// Rendering is repeatable: each pass starts from the configured menu, so
/// running [`Site::render`] twice writes identical output.
pub struct Site {
    config: Config,
    files: Vec<File>,
    engine: Box<dyn MarkdownEngine>,
}

impl std::fmt::Debug for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Site")
            .field("root_dir", &self.config.root_dir)
            .field("files", &self.files.len())
            .finish_non_exhaustive()
    }
}

impl Site {
    /// Derive the pages of `config`.
    ///
    /// # Errors
    ///
    /// Fails on the first page pattern that cannot be expanded, or when two
    /// pages resolve to the same output directory.
    pub fn load(config: Config) -> Result<Self, SiteError> {
        let start = Instant::now();

        let mut files = Vec::new();
        for source in PageSource::all(&config) {
            files.extend(source.derive(&config.root_dir)?);
        }
        check_unique_outputs(&files)?;

        if config.out_dir != config.output_root() {
            tracing::warn!(
                configured = %config.out_dir.display(),
                used = %config.output_root().display(),
                "outDir is ignored, pages are written under the docs directory"
            );
        }

        tracing::info!(
            pages = files.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "Loaded site"
        );

        Ok(Self {
            config,
            files,
            engine: Box::new(CmarkEngine),
        })
    }

    /// Replace the markdown engine.
    #[must_use]
    pub fn with_engine(mut self, engine: impl MarkdownEngine + 'static) -> Self {
        self.engine = Box::new(engine);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Derived pages, in render order.
    pub fn files(&self) -> &[File] {
        &self.files
    }

    /// Render every page to `<root>/docs/<path>/index.html`.
    pub fn render(&mut self) -> Result<RenderSummary, SiteError> {
        let _span = tracing::info_span!("render", pages = self.files.len()).entered();
        let start = Instant::now();

        let renderer = Renderer::new(&self.config.templates)?;
        let mut menu = self.config.menu_items.clone();

        let mut contexts = Vec::with_capacity(self.files.len());
        for file in &mut self.files {
            contexts.push(build_render_context(file, &self.config, self.engine.as_ref())?);
            if file.add_to_menu {
                append_to_menu(file, &mut menu);
            }
        }
        normalize_home_links(&mut menu, &self.config.base_url);

        let summary = renderer.render(contexts, &mut menu, &SiteMeta::from(&self.config))?;

        tracing::info!(
            pages = summary.pages,
            output = %self.config.output_root().display(),
            elapsed_ms = start.elapsed().as_millis(),
            "Rendered site"
        );
        Ok(summary)
    }
}

fn check_unique_outputs(files: &[File]) -> Result<(), SiteError> {
    let mut seen: HashMap<&str, &PathBuf> = HashMap::with_capacity(files.len());
    for file in files {
        let key = file.path.trim_matches('/');
        if let Some(previous) = seen.insert(key, &file.source_file) {
            return Err(SiteError::Config(format!(
                "{} and {} both render to path '{}'",
                previous.display(),
                file.source_file.display(),
                file.path
            )));
        }
    }
    Ok(())
}
