//! Glob + regex matching for page patterns.

use std::path::{MAIN_SEPARATOR, Path};

use regex::Regex;

use crate::SiteError;

/// A file selected by a glob, with the regex captures found in its path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatternMatch {
    /// Matched path, relative to the directory the glob was evaluated in.
    pub path: String,
    /// One entry per regex occurrence in `path`: the full match followed by
    /// every capture group (empty string for groups that did not participate).
    pub path_matches: Vec<Vec<String>>,
}

/// Match `glob_expr` relative to the current directory.
///
/// See [`match_pattern_in`].
pub fn match_pattern(glob_expr: &str, pattern: &str) -> Result<Vec<PatternMatch>, SiteError> {
    match_pattern_in(Path::new(""), glob_expr, pattern)
}

/// Select files with `root/glob_expr` and run `pattern` over each path.
///
/// Paths are reported relative to `root` with `/` separators and sorted.
///
/// # Errors
///
/// - [`ErrorKind::Config`](crate::ErrorKind::Config) when either argument is empty
/// - [`ErrorKind::Pattern`](crate::ErrorKind::Pattern) when the regex doesn't compile
/// - [`ErrorKind::Io`](crate::ErrorKind::Io) for invalid globs or unreadable directories
/// - [`ErrorKind::NoMatch`](crate::ErrorKind::NoMatch) when nothing matched
pub fn match_pattern_in(
    root: &Path,
    glob_expr: &str,
    pattern: &str,
) -> Result<Vec<PatternMatch>, SiteError> {
    if glob_expr.is_empty() {
        return Err(SiteError::Config("source glob is required".to_owned()));
    }
    if pattern.is_empty() {
        return Err(SiteError::Config("pattern is required".to_owned()));
    }

    let regex = Regex::new(pattern).map_err(|source| SiteError::Pattern {
        pattern: pattern.to_owned(),
        source,
    })?;

    let full_glob = glob_under(root, glob_expr);
    let entries = glob::glob(&full_glob).map_err(|source| SiteError::Glob {
        glob: full_glob.clone(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| {
            let path = e.path().to_path_buf();
            SiteError::io(path, std::io::Error::from(e))
        })?;
        paths.push(relative_path(root, &path));
    }

    if paths.is_empty() {
        return Err(SiteError::NoMatch(full_glob));
    }
    paths.sort();

    tracing::debug!(glob = %full_glob, matches = paths.len(), "Matched page pattern");

    Ok(paths
        .into_iter()
        .map(|path| PatternMatch {
            path_matches: find_all(&regex, &path),
            path,
        })
        .collect())
}

/// Glob for `glob_expr` evaluated under `root`.
///
/// Glob metacharacters in `root` are escaped so only `glob_expr` is a pattern.
pub fn glob_under(root: &Path, glob_expr: &str) -> String {
    let root = glob::Pattern::escape(&root.to_string_lossy());
    Path::new(&root).join(glob_expr).to_string_lossy().into_owned()
}

fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .to_string_lossy()
        .replace(MAIN_SEPARATOR, "/")
}

fn find_all(regex: &Regex, text: &str) -> Vec<Vec<String>> {
    regex
        .captures_iter(text)
        .map(|caps| {
            caps.iter()
                .map(|group| group.map_or_else(String::new, |m| m.as_str().to_owned()))
                .collect()
        })
        .collect()
}
