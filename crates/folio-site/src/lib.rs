//! Page derivation and rendering for folio.
//!
//! This crate provides:
//! - [`match_pattern`] and [`expand`]: turning globbed files into pages
//! - [`Site`]: loading every page of a config and rendering them to HTML
//! - [`MarkdownEngine`]: the markdown conversion seam, with [`CmarkEngine`]
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use folio_config::Config;
//! use folio_site::Site;
//!
//! let config = Config::load(Path::new(".docs.yaml"), None)?;
//! let mut site = Site::load(config)?;
//! let summary = site.render()?;
//! println!("{} pages", summary.pages);
//! # Ok(())
//! # }
//! ```

mod document;
mod error;
mod expand;
mod file;
mod markdown;
mod menu;
mod pattern;
mod renderer;
mod site;
mod template;

pub use document::{RenderContext, SiteMeta, build_render_context};
pub use error::{ErrorKind, SiteError};
pub use expand::expand;
pub use file::{File, PageSource, derive_from_pattern, derive_from_static_page};
pub use markdown::{CmarkEngine, MarkdownEngine, MarkdownError, slugify};
pub use menu::{append_to_menu, mark_active, normalize_home_links};
pub use pattern::{PatternMatch, glob_under, match_pattern, match_pattern_in};
pub use renderer::{RenderSummary, Renderer};
pub use site::Site;
pub use template::{DEFAULT_BASE_TEMPLATE, PageTemplate, PageView};
