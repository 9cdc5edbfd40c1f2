//! Page derivation: turning config entries into concrete files to render.

use std::path::{Path, PathBuf};

use folio_config::{Config, Page, PagePattern, is_home_path};

use crate::expand::expand_named;
use crate::{PatternMatch, SiteError, match_pattern_in};

/// A concrete page to render.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct File {
    /// Menu entry name.
    pub name: String,
    /// Output path relative to the output root. Empty for the home page.
    pub path: String,
    /// Absolute path of the markdown source.
    pub source_file: PathBuf,
    /// Layout template name. Empty means `base`.
    pub template: String,
    pub add_to_menu: bool,
    pub menu_group: String,
    pub edit_on_github: bool,
    /// Page title. Filled from the document's first heading when empty.
    pub title: String,
}

impl File {
    /// Whether this file renders at the output root.
    pub fn is_home(&self) -> bool {
        is_home_path(&self.path)
    }

    /// Build a file from one pattern match.
    ///
    /// `name` and `path` of the rule are templates expanded with the match.
    pub fn from_pattern_match(
        rule: &PagePattern,
        pattern_match: &PatternMatch,
        root_dir: &Path,
    ) -> Result<Self, SiteError> {
        let base = &rule.base;
        Ok(Self {
            name: expand_named("name", &base.name, pattern_match)?,
            path: expand_named("path", &base.path, pattern_match)?,
            source_file: root_dir.join(&pattern_match.path),
            template: base.template.clone(),
            add_to_menu: base.add_to_menu,
            menu_group: base.menu_group.clone(),
            edit_on_github: base.edit_on_github,
            title: String::new(),
        })
    }
}

/// Build the file for a static page.
pub fn derive_from_static_page(page: &Page, root_dir: &Path) -> File {
    let base = &page.base;
    File {
        name: base.name.clone(),
        path: base.path.clone(),
        source_file: root_dir.join(&base.source),
        template: base.template.clone(),
        add_to_menu: base.add_to_menu,
        menu_group: base.menu_group.clone(),
        edit_on_github: base.edit_on_github,
        title: page.title.clone(),
    }
}

/// Build one file per source matched by a page pattern.
///
/// Either every match yields a file or the whole rule fails.
pub fn derive_from_pattern(rule: &PagePattern, root_dir: &Path) -> Result<Vec<File>, SiteError> {
    match_pattern_in(root_dir, &rule.source_glob, &rule.pattern)?
        .iter()
        .map(|m| {
            File::from_pattern_match(rule, m, root_dir).map_err(|e| e.in_file(root_dir.join(&m.path)))
        })
        .collect()
}

/// Where pages come from.
#[derive(Clone, Copy, Debug)]
pub enum PageSource<'a> {
    /// A page listed under `pages`.
    Static(&'a Page),
    /// A rule listed under `pagePatterns`, with its position in the list.
    Pattern { index: usize, rule: &'a PagePattern },
}

impl PageSource<'_> {
    /// All page sources of a config: static pages first, then pattern rules.
    pub fn all(config: &Config) -> impl Iterator<Item = PageSource<'_>> {
        let statics = config.pages.iter().map(PageSource::Static);
        let patterns = config
            .page_patterns
            .iter()
            .enumerate()
            .map(|(index, rule)| PageSource::Pattern { index, rule });
        statics.chain(patterns)
    }

    /// Derive the files of this source.
    pub fn derive(self, root_dir: &Path) -> Result<Vec<File>, SiteError> {
        match self {
            Self::Static(page) => Ok(vec![derive_from_static_page(page, root_dir)]),
            Self::Pattern { index, rule } => {
                derive_from_pattern(rule, root_dir).map_err(|e| e.in_pattern(index))
            }
        }
    }
}
