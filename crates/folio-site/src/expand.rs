//! Templated string expansion for pattern-derived page fields.

use crate::{PageTemplate, PatternMatch, SiteError};

/// Expand `template_text` with `pattern_match` as data.
///
/// Text without template actions is returned unchanged.
///
/// # Errors
///
/// Returns [`ErrorKind::Template`](crate::ErrorKind::Template) if the text
/// fails to parse or to execute, e.g. when an `index` is out of range.
pub fn expand(template_text: &str, pattern_match: &PatternMatch) -> Result<String, SiteError> {
    expand_named("inline", template_text, pattern_match)
}

pub(crate) fn expand_named(
    name: &str,
    template_text: &str,
    pattern_match: &PatternMatch,
) -> Result<String, SiteError> {
    if !template_text.contains("{{") {
        return Ok(template_text.to_owned());
    }
    PageTemplate::compile(name, template_text)?.execute(pattern_match.to_value())
}
