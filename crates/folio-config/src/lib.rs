//! Configuration management for folio.
//!
//! Parses the YAML site configuration (`.docs.yaml` by default) with serde,
//! resolves paths against the directory containing the file and validates the
//! page, template and menu sections.
//!
//! CLI settings can be applied during load via [`ConfigOverrides`].
//!
//! ## Environment Variable Expansion
//!
//! String values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields: `baseUrl`, `repo`, `siteTitle`, `description`.

mod expand;
mod model;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub use model::{BasePage, MenuItem, Page, PagePattern, TemplateConfig, is_home_path};

/// Name of the template wrapping every page unless a page picks another one.
pub const BASE_TEMPLATE: &str = "base";

/// Directory, relative to the root directory, receiving rendered pages.
pub const OUTPUT_DIR_NAME: &str = "docs";

/// Default configuration filename.
pub const DEFAULT_CONFIG_FILENAME: &str = ".docs.yaml";

/// Settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    /// Override the public base URL (the dev server points it at itself).
    pub base_url: Option<String>,
}

/// Site configuration.
#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Project root. Always the directory containing the config file.
    #[serde(skip)]
    pub root_dir: PathBuf,
    /// Output directory as written in the file.
    #[serde(rename = "outDir")]
    out_dir_raw: Option<String>,
    /// Resolved output directory (set after loading).
    #[serde(skip)]
    pub out_dir: PathBuf,
    /// Static pages.
    pub pages: Vec<Page>,
    /// Rules deriving pages from globbed files.
    pub page_patterns: Vec<PagePattern>,
    /// Layout templates.
    pub templates: Vec<TemplateConfig>,
    /// Configured menu tree. Pages flagged `addToMenu` are appended at render time.
    pub menu_items: Vec<MenuItem>,
    /// Site title.
    pub site_title: String,
    /// Site description for the `<meta name="description">` tag.
    pub description: String,
    /// Project repository URL, used for "Edit on GitHub" links.
    pub repo: String,
    /// Branch used in "Edit on GitHub" links.
    pub repo_branch: String,
    /// Public base URL of the generated site.
    pub base_url: String,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("Unable to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// YAML parsing error.
    #[error("Unable to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field (e.g., "`baseUrl`").
        field: String,
        /// Error message (e.g., "${`DOCS_HOST`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from a file with optional overrides.
    ///
    /// The root directory becomes the directory containing `config_path`.
    /// Overrides are applied after loading and validation.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist, can't be parsed, or fails validation.
    pub fn load(
        config_path: &Path,
        overrides: Option<&ConfigOverrides>,
    ) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::NotFound(config_path.to_path_buf()));
        }

        let mut config = Self::load_from_file(config_path)?;

        if let Some(overrides) = overrides {
            config.apply_overrides(overrides);
        }

        Ok(config)
    }

    /// Parse configuration from YAML text, resolving paths against `root_dir`.
    ///
    /// # Errors
    ///
    /// Returns error if the YAML is malformed or fails validation.
    pub fn from_yaml(content: &str, root_dir: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(content)?
        };

        config.expand_env_vars()?;
        config.resolve_paths(root_dir);
        config.validate()?;

        Ok(config)
    }

    /// Directory receiving rendered pages (`<root>/docs`).
    #[must_use]
    pub fn output_root(&self) -> PathBuf {
        self.root_dir.join(OUTPUT_DIR_NAME)
    }

    /// Look up a template by name.
    #[must_use]
    pub fn template(&self, name: &str) -> Option<&TemplateConfig> {
        self.templates.iter().find(|t| t.name == name)
    }

    /// Apply overrides to the configuration.
    fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(base_url) = &overrides.base_url {
            self.base_url.clone_from(base_url);
        }
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            root_dir: base.to_path_buf(),
            out_dir_raw: None,
            out_dir: base.join(OUTPUT_DIR_NAME),
            pages: Vec::new(),
            page_patterns: Vec::new(),
            templates: Vec::new(),
            menu_items: Vec::new(),
            site_title: String::new(),
            description: String::new(),
            repo: String::new(),
            repo_branch: "master".to_owned(),
            base_url: String::new(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        let mut config = Self::from_yaml(&content, config_dir)?;
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        expand::expand_in_place(&mut self.base_url, "baseUrl")?;
        expand::expand_in_place(&mut self.repo, "repo")?;
        expand::expand_in_place(&mut self.site_title, "siteTitle")?;
        expand::expand_in_place(&mut self.description, "description")?;
        Ok(())
    }

    /// Resolve relative paths against the root directory.
    fn resolve_paths(&mut self, root_dir: &Path) {
        self.root_dir = root_dir.to_path_buf();
        self.out_dir = root_dir.join(self.out_dir_raw.as_deref().unwrap_or(OUTPUT_DIR_NAME));

        for template in &mut self.templates {
            if template.source.is_relative() {
                template.source = root_dir.join(&template.source);
            }
        }
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        self.validate_pages()?;
        self.validate_templates()?;
        self.validate_menu()?;
        self.validate_references()?;
        Ok(())
    }

    /// Validate site-wide URLs.
    fn validate_site(&self) -> Result<(), ConfigError> {
        if !self.base_url.is_empty() {
            require_http_url(&self.base_url, "baseUrl")?;
        }
        if !self.repo.is_empty() {
            require_http_url(&self.repo, "repo")?;
            require_non_empty(&self.repo_branch, "repoBranch")?;
        }
        Ok(())
    }

    /// Validate static pages: every page needs a source, one home page at most.
    fn validate_pages(&self) -> Result<(), ConfigError> {
        let mut home: Option<usize> = None;

        for (i, page) in self.pages.iter().enumerate() {
            require_non_empty(&page.base.source, &format!("pages[{i}].source"))?;

            if page.base.is_home() {
                if let Some(first) = home {
                    return Err(ConfigError::Validation(format!(
                        "pages[{i}] and pages[{first}] both use the home page path"
                    )));
                }
                home = Some(i);
            }
        }

        Ok(())
    }

    /// Validate templates: named, sourced, and unique.
    fn validate_templates(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();

        for (i, template) in self.templates.iter().enumerate() {
            require_non_empty(&template.name, &format!("templates[{i}].name"))?;
            if template.source.as_os_str().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "templates[{i}].source cannot be empty"
                )));
            }
            if !seen.insert(template.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "templates[{i}]: duplicate template name '{}'",
                    template.name
                )));
            }
        }

        Ok(())
    }

    /// Validate the menu tree: at most two levels, groups are named.
    fn validate_menu(&self) -> Result<(), ConfigError> {
        for (i, item) in self.menu_items.iter().enumerate() {
            if !item.group {
                if !item.items.is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "menuItems[{i}] has items but is not a group"
                    )));
                }
                continue;
            }

            require_non_empty(&item.name, &format!("menuItems[{i}].name"))?;

            for (j, child) in item.items.iter().enumerate() {
                if child.group || !child.items.is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "menuItems[{i}].items[{j}]: menus can only be two levels deep"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Validate that pages only reference existing templates, and that pages
    /// added to the menu only join existing menu groups.
    fn validate_references(&self) -> Result<(), ConfigError> {
        let groups: HashSet<&str> = self
            .menu_items
            .iter()
            .filter(|item| item.group)
            .map(|item| item.name.as_str())
            .collect();

        let bases = self
            .pages
            .iter()
            .map(|p| ("pages", &p.base))
            .chain(self.page_patterns.iter().map(|p| ("pagePatterns", &p.base)));

        for (i, (section, base)) in bases.enumerate() {
            let index = if section == "pages" {
                i
            } else {
                i - self.pages.len()
            };

            if !base.template.is_empty()
                && base.template != BASE_TEMPLATE
                && self.template(&base.template).is_none()
            {
                return Err(ConfigError::Validation(format!(
                    "{section}[{index}]: unknown template '{}'",
                    base.template
                )));
            }

            if base.add_to_menu
                && !base.menu_group.is_empty()
                && !groups.contains(base.menu_group.as_str())
            {
                return Err(ConfigError::Validation(format!(
                    "{section}[{index}]: menu group '{}' is not defined in menuItems",
                    base.menu_group
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(yaml: &str) -> Result<Config, ConfigError> {
        Config::from_yaml(yaml, Path::new("/site"))
    }

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.root_dir, PathBuf::from("/test"));
        assert_eq!(config.out_dir, PathBuf::from("/test/docs"));
        assert_eq!(config.output_root(), PathBuf::from("/test/docs"));
        assert_eq!(config.repo_branch, "master");
        assert!(config.pages.is_empty());
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse("").unwrap();
        assert_eq!(config.root_dir, PathBuf::from("/site"));
        assert_eq!(config.out_dir, PathBuf::from("/site/docs"));
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
outDir: public
siteTitle: Acme Docs
description: Documentation for Acme
repo: https://github.com/acme/acme
baseUrl: https://docs.acme.io
pages:
  - name: home
    path: ""
    source: index.md
    addToMenu: true
pagePatterns:
  - name: "{{index .PathMatches 0 1}}"
    path: "guides/{{index .PathMatches 0 1}}"
    sourceGlob: guides/*.md
    pattern: 'guides/(.+)\.md'
    addToMenu: true
    menuGroup: guides
templates:
  - name: base
    source: layout.html
menuItems:
  - name: guides
    title: Guides
    group: true
"#;
        let config = parse(yaml).unwrap();
        assert_eq!(config.out_dir, PathBuf::from("/site/public"));
        assert_eq!(config.output_root(), PathBuf::from("/site/docs"));
        assert_eq!(config.site_title, "Acme Docs");
        assert_eq!(config.base_url, "https://docs.acme.io");
        assert_eq!(config.pages.len(), 1);
        assert_eq!(config.page_patterns[0].source_glob, "guides/*.md");
        assert_eq!(
            config.template("base").unwrap().source,
            PathBuf::from("/site/layout.html")
        );
        assert!(config.menu_items[0].group);
    }

    #[test]
    fn test_root_dir_not_read_from_file() {
        let config = parse("rootDir: /elsewhere\n").unwrap();
        assert_eq!(config.root_dir, PathBuf::from("/site"));
    }

    #[test]
    fn test_absolute_template_source_kept() {
        let yaml = "templates:\n  - name: base\n    source: /abs/layout.html\n";
        let config = parse(yaml).unwrap();
        assert_eq!(config.templates[0].source, PathBuf::from("/abs/layout.html"));
    }

    #[test]
    fn test_invalid_yaml() {
        let result = parse("pages: [unterminated");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_validate_base_url_scheme() {
        let result = parse("baseUrl: docs.acme.io\n");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("baseUrl must start with http"));
    }

    #[test]
    fn test_validate_page_requires_source() {
        let result = parse("pages:\n  - name: home\n");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("pages[0].source cannot be empty"));
    }

    #[test]
    fn test_validate_single_home_page() {
        let yaml = r#"
pages:
  - source: a.md
    path: ""
  - source: b.md
    path: /
"#;
        let err = parse(yaml).unwrap_err();
        assert!(err.to_string().contains("home page"));
    }

    #[test]
    fn test_validate_menu_depth() {
        let yaml = r"
menuItems:
  - name: outer
    group: true
    items:
      - name: inner
        group: true
";
        let err = parse(yaml).unwrap_err();
        assert!(err.to_string().contains("two levels deep"));
    }

    #[test]
    fn test_validate_leaf_with_items() {
        let yaml = r"
menuItems:
  - title: Home
    items:
      - title: Nested
";
        let err = parse(yaml).unwrap_err();
        assert!(err.to_string().contains("not a group"));
    }

    #[test]
    fn test_validate_unknown_menu_group() {
        let yaml = r"
pages:
  - source: a.md
    path: a
    addToMenu: true
    menuGroup: missing
";
        let err = parse(yaml).unwrap_err();
        assert!(err.to_string().contains("menu group 'missing'"));
        assert!(err.to_string().contains("pages[0]"));
    }

    #[test]
    fn test_menu_group_ignored_when_not_added_to_menu() {
        let yaml = r"
pages:
  - source: a.md
    path: a
    menuGroup: missing
";
        assert!(parse(yaml).is_ok());
    }

    #[test]
    fn test_validate_unknown_template_in_pattern() {
        let yaml = r"
pages:
  - source: a.md
    path: a
pagePatterns:
  - sourceGlob: '*.md'
    pattern: '(.+)'
    template: fancy
";
        let err = parse(yaml).unwrap_err();
        assert!(err.to_string().contains("pagePatterns[0]: unknown template 'fancy'"));
    }

    #[test]
    fn test_validate_duplicate_template() {
        let yaml = r"
templates:
  - name: base
    source: a.html
  - name: base
    source: b.html
";
        let err = parse(yaml).unwrap_err();
        assert!(err.to_string().contains("duplicate template name"));
    }

    #[test]
    fn test_base_template_needs_no_definition() {
        let yaml = "pages:\n  - source: a.md\n    template: base\n";
        assert!(parse(yaml).is_ok());
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Path::new("/nonexistent/.docs.yaml"), None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_resolves_root_and_applies_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILENAME);
        std::fs::write(&path, "baseUrl: https://docs.acme.io\nsiteTitle: Acme\n").unwrap();

        let overrides = ConfigOverrides {
            base_url: Some("http://localhost:3500".to_owned()),
        };
        let config = Config::load(&path, Some(&overrides)).unwrap();

        assert_eq!(config.root_dir, dir.path());
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(config.base_url, "http://localhost:3500");
        assert_eq!(config.site_title, "Acme");
    }
}
