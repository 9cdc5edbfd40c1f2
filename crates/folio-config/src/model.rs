//! Page, template and menu entries as they appear in the YAML file.

use std::path::PathBuf;

use serde::Deserialize;

/// Check whether an output path designates the home page.
///
/// The home page is the one page rendered at the output root; it is written
/// in configs either as an empty path or as `/`.
#[must_use]
pub fn is_home_path(path: &str) -> bool {
    path.is_empty() || path == "/"
}

/// Properties shared by static pages and page patterns.
///
/// In a page pattern, `name` and `path` are templates evaluated once per
/// matched file.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct BasePage {
    /// Page name, used as the menu entry name.
    pub name: String,
    /// Output path relative to the output root. Empty for the home page.
    pub path: String,
    /// Source markdown file relative to the root directory (static pages only).
    pub source: String,
    /// Layout template name. Empty means `base`.
    pub template: String,
    /// Whether to add an entry for this page to the menu.
    pub add_to_menu: bool,
    /// Name of the menu group the entry is added to. Empty means top level.
    pub menu_group: String,
    /// Whether to show an "Edit on GitHub" link on this page.
    pub edit_on_github: bool,
}

impl BasePage {
    /// Whether this page renders at the output root.
    #[must_use]
    pub fn is_home(&self) -> bool {
        is_home_path(&self.path)
    }
}

/// A static page entry.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Page {
    #[serde(flatten)]
    pub base: BasePage,
    /// Page title. When empty, the first level-1 heading of the document is used.
    pub title: String,
}

/// A rule deriving pages from every file matching a glob.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct PagePattern {
    #[serde(flatten)]
    pub base: BasePage,
    /// Glob, relative to the root directory, selecting the source files.
    pub source_glob: String,
    /// Regular expression applied to each matched path.
    pub pattern: String,
}

/// A layout template.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TemplateConfig {
    /// Template name referenced by pages. `base` wraps every page by default.
    pub name: String,
    /// Template source file. Absolute after loading.
    pub source: PathBuf,
}

/// Navigation menu entry.
///
/// Menus are at most two levels deep: top-level items are either leaves or
/// groups, and groups only contain leaves.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MenuItem {
    /// Entry name. Required for groups, since pages join groups by name.
    pub name: String,
    /// Display title.
    pub title: String,
    /// Link target.
    pub link: String,
    /// Child entries (groups only).
    pub items: Vec<MenuItem>,
    /// Whether this is a group heading.
    pub group: bool,
    /// Whether this entry points at the page being rendered. Recomputed per page.
    #[serde(skip)]
    pub active: bool,
}

impl MenuItem {
    /// Create a leaf entry.
    #[must_use]
    pub fn leaf(name: impl Into<String>, title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            link: link.into(),
            ..Self::default()
        }
    }

    /// Create an empty group heading.
    #[must_use]
    pub fn group(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            group: true,
            ..Self::default()
        }
    }

    /// Whether this entry links to the home page.
    #[must_use]
    pub fn links_home(&self) -> bool {
        is_home_path(&self.link)
    }
}
