//! Per-page render contexts.

use std::path::{MAIN_SEPARATOR, PathBuf};

use folio_config::Config;

use crate::{File, MarkdownEngine, SiteError};

/// Everything a layout template needs to render one page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderContext {
    pub title: String,
    pub site_title: String,
    pub description: String,
    /// HTML produced from the page's markdown.
    pub content: String,
    pub output_dir: PathBuf,
    pub output_file: PathBuf,
    pub base_url: String,
    /// Link the menu marks as active for this page.
    pub link: String,
    /// Layout template name. Empty means `base`.
    pub template: String,
    /// "Edit on GitHub" URL, empty when disabled.
    pub edit_url: String,
}

/// Site-wide fields shared by every render context.
#[derive(Clone, Debug, Default)]
pub struct SiteMeta {
    pub site_title: String,
    pub description: String,
    pub base_url: String,
}

impl From<&Config> for SiteMeta {
    fn from(config: &Config) -> Self {
        Self {
            site_title: config.site_title.clone(),
            description: config.description.clone(),
            base_url: config.base_url.clone(),
        }
    }
}

impl RenderContext {
    /// Fill in the site-wide fields.
    pub fn attach(&mut self, meta: &SiteMeta) {
        self.site_title.clone_from(&meta.site_title);
        self.description.clone_from(&meta.description);
        self.base_url.clone_from(&meta.base_url);
    }
}

/// Read and convert a file's source, producing its render context.
///
/// When the file has no title, the first level-1 heading of the document
/// becomes its title (on `file` too, so menu entries pick it up).
pub fn build_render_context(
    file: &mut File,
    config: &Config,
    engine: &dyn MarkdownEngine,
) -> Result<RenderContext, SiteError> {
    let source = std::fs::read(&file.source_file).map_err(|e| SiteError::io(&file.source_file, e))?;

    let markdown_error = |e: crate::MarkdownError| SiteError::Markdown {
        path: file.source_file.clone(),
        message: e.to_string(),
    };
    let content = engine.to_html(&source).map_err(markdown_error)?;
    if file.title.is_empty()
        && let Some(heading) = engine.first_heading(&source).map_err(markdown_error)?
    {
        file.title = heading;
    }

    let link = if file.is_home() && !config.base_url.is_empty() {
        config.base_url.clone()
    } else {
        file.path.clone()
    };

    let output_dir = config.output_root().join(file.path.trim_start_matches('/'));
    let output_file = output_dir.join("index.html");

    tracing::debug!(source = %file.source_file.display(), output = %output_file.display(), "Converted page");

    Ok(RenderContext {
        title: file.title.clone(),
        content,
        output_dir,
        output_file,
        link,
        template: file.template.clone(),
        edit_url: edit_url(file, config),
        ..RenderContext::default()
    })
}

fn edit_url(file: &File, config: &Config) -> String {
    if !file.edit_on_github || config.repo.is_empty() {
        return String::new();
    }
    let relative = file
        .source_file
        .strip_prefix(&config.root_dir)
        .unwrap_or(&file.source_file)
        .to_string_lossy()
        .replace(MAIN_SEPARATOR, "/");
    format!(
        "{}/edit/{}/{}",
        config.repo.trim_end_matches('/'),
        config.repo_branch,
        relative
    )
}
