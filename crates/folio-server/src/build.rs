//! Site rebuilds and the set of paths that trigger them.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use folio_config::{Config, ConfigOverrides};
use folio_site::{Site, glob_under};

use crate::error::ServerError;

/// Loads and renders the site from its config file.
#[derive(Clone, Debug)]
pub(crate) struct SiteBuilder {
    config_path: PathBuf,
    overrides: ConfigOverrides,
}

impl SiteBuilder {
    pub(crate) fn new(config_path: PathBuf, overrides: ConfigOverrides) -> Self {
        Self {
            config_path,
            overrides,
        }
    }

    /// Run the whole pipeline once, returning what to watch afterwards.
    ///
    /// Blocking: call from a blocking context.
    pub(crate) fn build(&self) -> Result<WatchSet, ServerError> {
        let config = Config::load(&self.config_path, Some(&self.overrides))?;
        let mut site = Site::load(config)?;
        site.render()?;
        Ok(WatchSet::from_site(&site, &self.config_path))
    }
}

/// Paths whose change triggers a rebuild.
///
/// Covers the config file, every source and template, and the globs of the
/// page patterns so that new matching files are picked up. Anything under the
/// output directory is ignored.
#[derive(Clone, Debug, Default)]
pub(crate) struct WatchSet {
    pub(crate) root_dir: PathBuf,
    pub(crate) output_dir: PathBuf,
    files: HashSet<PathBuf>,
    globs: Vec<glob::Pattern>,
}

impl WatchSet {
    pub(crate) fn from_site(site: &Site, config_path: &Path) -> Self {
        let config = site.config();

        let mut files: HashSet<PathBuf> = site
            .files()
            .iter()
            .map(|f| f.source_file.clone())
            .collect();
        files.extend(config.templates.iter().map(|t| t.source.clone()));
        files.insert(config_path.to_path_buf());

        let globs = config
            .page_patterns
            .iter()
            .filter_map(|rule| {
                glob::Pattern::new(&glob_under(&config.root_dir, &rule.source_glob)).ok()
            })
            .collect();

        Self {
            root_dir: config.root_dir.clone(),
            output_dir: config.output_root(),
            files,
            globs,
        }
    }

    pub(crate) fn contains(&self, path: &Path) -> bool {
        if path.starts_with(&self.output_dir) {
            return false;
        }
        self.files.contains(path) || self.globs.iter().any(|g| g.matches_path(path))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    const CONFIG: &str = r"
pages:
  - name: home
    source: index.md
pagePatterns:
  - name: post
    path: posts/x
    sourceGlob: posts/*.md
    pattern: '.*'
";

    fn project() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("posts")).unwrap();
        fs::write(dir.path().join("index.md"), "# Home\n").unwrap();
        fs::write(dir.path().join("posts/a.md"), "# A\n").unwrap();
        let config_path = dir.path().join(".docs.yaml");
        fs::write(&config_path, CONFIG).unwrap();
        (dir, config_path)
    }

    #[test]
    fn test_build_renders_and_collects_watch_set() {
        let (dir, config_path) = project();
        let builder = SiteBuilder::new(config_path.clone(), ConfigOverrides::default());

        let watch = builder.build().unwrap();

        assert!(dir.path().join("docs/index.html").exists());
        assert!(watch.contains(&config_path));
        assert!(watch.contains(&dir.path().join("index.md")));
        assert!(watch.contains(&dir.path().join("posts/a.md")));
        assert!(watch.contains(&dir.path().join("posts/new.md")));
        assert!(!watch.contains(&dir.path().join("notes.txt")));
        assert!(!watch.contains(&dir.path().join("docs/index.html")));
    }

    #[test]
    fn test_watch_globs_escape_root() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("[site]");
        fs::create_dir_all(root.join("posts")).unwrap();
        fs::write(root.join("index.md"), "# Home\n").unwrap();
        fs::write(root.join("posts/a.md"), "# A\n").unwrap();
        let config_path = root.join(".docs.yaml");
        fs::write(&config_path, CONFIG).unwrap();

        let watch = SiteBuilder::new(config_path, ConfigOverrides::default())
            .build()
            .unwrap();

        assert!(watch.contains(&root.join("posts/new.md")));
        assert!(!watch.contains(&root.join("notes.txt")));
    }

    #[test]
    fn test_build_applies_overrides() {
        let (dir, config_path) = project();
        let overrides = ConfigOverrides {
            base_url: Some("http://localhost:3500".to_owned()),
        };

        SiteBuilder::new(config_path, overrides).build().unwrap();

        let html = fs::read_to_string(dir.path().join("docs/index.html")).unwrap();
        assert!(html.contains("http://localhost:3500"));
    }

    #[test]
    fn test_build_reports_site_errors() {
        let (dir, config_path) = project();
        fs::remove_file(dir.path().join("index.md")).unwrap();

        let err = SiteBuilder::new(config_path, ConfigOverrides::default())
            .build()
            .unwrap_err();

        assert!(matches!(err, ServerError::Site(_)));
    }
}
