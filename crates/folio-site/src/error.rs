//! Site build errors.

use std::path::{Path, PathBuf};

/// Error category, independent of the context wrappers around it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Configuration is incomplete or inconsistent.
    Config,
    /// Regular expression failed to compile.
    Pattern,
    /// Filesystem or glob failure.
    Io,
    /// A glob selected no files.
    NoMatch,
    /// Template failed to parse or execute.
    Template,
    /// Markdown conversion failed.
    Markdown,
}

/// Error building or rendering a site.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Inconsistent site definition.
    #[error("{0}")]
    Config(String),
    /// Invalid configuration file.
    #[error(transparent)]
    InvalidConfig(#[from] folio_config::ConfigError),
    /// Regex compile failure.
    #[error("Unable to compile regex pattern {pattern}: {source}")]
    Pattern {
        pattern: String,
        source: regex::Error,
    },
    /// Invalid glob syntax.
    #[error("Invalid glob {glob}: {source}")]
    Glob {
        glob: String,
        source: glob::PatternError,
    },
    /// I/O failure on a specific path.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The glob matched nothing.
    #[error("No files were found for glob {0}")]
    NoMatch(String),
    /// Template parse or execution failure.
    #[error("Template '{name}': {message}")]
    Template { name: String, message: String },
    /// Markdown conversion failure.
    #[error("Unable to convert markdown in {}: {message}", path.display())]
    Markdown { path: PathBuf, message: String },
    /// Failure while processing a page pattern.
    #[error("Unable to process page pattern #{index}: {source}")]
    PagePattern {
        index: usize,
        source: Box<SiteError>,
    },
    /// Failure while processing a source file.
    #[error("Unable to process file {}: {source}", path.display())]
    SourceFile {
        path: PathBuf,
        source: Box<SiteError>,
    },
    /// Failure while rendering a page.
    #[error("Unable to render page '{link}': {source}")]
    Page {
        link: String,
        source: Box<SiteError>,
    },
}

impl SiteError {
    /// Classify this error, looking through context wrappers.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) | Self::InvalidConfig(_) => ErrorKind::Config,
            Self::Pattern { .. } => ErrorKind::Pattern,
            Self::Glob { .. } | Self::Io { .. } => ErrorKind::Io,
            Self::NoMatch(_) => ErrorKind::NoMatch,
            Self::Template { .. } => ErrorKind::Template,
            Self::Markdown { .. } => ErrorKind::Markdown,
            Self::PagePattern { source, .. }
            | Self::SourceFile { source, .. }
            | Self::Page { source, .. } => source.kind(),
        }
    }

    pub(crate) fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub(crate) fn template(name: &str, message: impl Into<String>) -> Self {
        Self::Template {
            name: name.to_owned(),
            message: message.into(),
        }
    }

    pub(crate) fn in_pattern(self, index: usize) -> Self {
        Self::PagePattern {
            index,
            source: Box::new(self),
        }
    }

    pub(crate) fn in_file(self, path: impl AsRef<Path>) -> Self {
        Self::SourceFile {
            path: path.as_ref().to_path_buf(),
            source: Box::new(self),
        }
    }

    pub(crate) fn in_page(self, link: &str) -> Self {
        Self::Page {
            link: link.to_owned(),
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_looks_through_wrappers() {
        let err = SiteError::NoMatch("posts/*.md".to_owned())
            .in_file("posts/a.md")
            .in_pattern(2);
        assert_eq!(err.kind(), ErrorKind::NoMatch);

        let err = SiteError::template("base", "boom").in_page("guide");
        assert_eq!(err.kind(), ErrorKind::Template);
    }

    #[test]
    fn test_wrapped_message_keeps_context() {
        let err = SiteError::Config("source glob is required".to_owned()).in_pattern(0);
        assert_eq!(
            err.to_string(),
            "Unable to process page pattern #0: source glob is required"
        );
    }
}
