//! Markdown to HTML conversion.
//!
//! [`CmarkEngine`] wraps pulldown-cmark and post-processes its event stream
//! in two passes: headings without an explicit `{#id}` get a slug id, and
//! bare `http(s)://` URLs in text become links.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use pulldown_cmark::{
    CowStr, Event, HeadingLevel, LinkType, Options, Parser, Tag, TagEnd, TextMergeStream,
};
use regex::Regex;

static BARE_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>]*[^\s<>.,;:!?)'"]"#).unwrap());

/// Markdown conversion failure.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct MarkdownError(String);

/// Converts markdown documents for the render pipeline.
pub trait MarkdownEngine: Send + Sync {
    /// Convert a document to an HTML fragment.
    fn to_html(&self, source: &[u8]) -> Result<String, MarkdownError>;

    /// Text of the first top-level level-1 heading, if any.
    fn first_heading(&self, source: &[u8]) -> Result<Option<String>, MarkdownError>;
}

/// pulldown-cmark backed engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct CmarkEngine;

impl CmarkEngine {
    fn options() -> Options {
        Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_DEFINITION_LIST
    }
}

impl MarkdownEngine for CmarkEngine {
    fn to_html(&self, source: &[u8]) -> Result<String, MarkdownError> {
        let text = decode(source)?;
        let events = TextMergeStream::new(Parser::new_ext(text, Self::options()));
        let events = link_bare_urls(assign_heading_ids(events));

        let mut html = String::with_capacity(text.len() * 3 / 2);
        pulldown_cmark::html::push_html(&mut html, events.into_iter());
        Ok(html)
    }

    fn first_heading(&self, source: &[u8]) -> Result<Option<String>, MarkdownError> {
        let text = decode(source)?;
        // Block quotes, lists and similar containers.
        let mut nesting = 0usize;
        let mut title: Option<String> = None;

        for event in Parser::new_ext(text, Self::options()) {
            match event {
                Event::Start(Tag::Heading {
                    level: HeadingLevel::H1,
                    ..
                }) if nesting == 0 => title = Some(String::new()),
                Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                    if let Some(found) = title.take() {
                        let found = found.trim();
                        if !found.is_empty() {
                            return Ok(Some(found.to_owned()));
                        }
                    }
                }
                Event::Text(t) | Event::Code(t) => {
                    if let Some(buf) = title.as_mut() {
                        buf.push_str(&t);
                    }
                }
                Event::Start(
                    Tag::BlockQuote(_)
                    | Tag::List(_)
                    | Tag::Item
                    | Tag::FootnoteDefinition(_)
                    | Tag::DefinitionList,
                ) => nesting += 1,
                Event::End(
                    TagEnd::BlockQuote(_)
                    | TagEnd::List(_)
                    | TagEnd::Item
                    | TagEnd::FootnoteDefinition
                    | TagEnd::DefinitionList,
                ) => nesting = nesting.saturating_sub(1),
                _ => {}
            }
        }
        Ok(None)
    }
}

fn decode(source: &[u8]) -> Result<&str, MarkdownError> {
    std::str::from_utf8(source)
        .map_err(|e| MarkdownError(format!("source is not valid UTF-8: {e}")))
}

/// Convert heading text to an anchor id.
///
/// Letters and digits are kept (lowercased); every other run of characters
/// collapses into a single `-`.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Hands out unique heading ids within one document.
#[derive(Debug, Default)]
struct HeadingIds {
    /// Next suffix to try per slug.
    next: HashMap<String, usize>,
    used: HashSet<String>,
}

impl HeadingIds {
    fn unique(&mut self, heading_text: &str) -> String {
        let mut base = slugify(heading_text);
        if base.is_empty() {
            base.push_str("section");
        }
        let mut n = self.next.get(&base).copied().unwrap_or(0);
        loop {
            let candidate = match n {
                0 => base.clone(),
                n => format!("{base}-{n}"),
            };
            n += 1;
            if self.used.insert(candidate.clone()) {
                self.next.insert(base, n);
                return candidate;
            }
        }
    }

    fn reserve(&mut self, id: &str) {
        self.used.insert(id.to_owned());
    }
}

fn assign_heading_ids<'a>(events: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let mut out = Vec::new();
    let mut ids = HeadingIds::default();
    // Index of the open heading's start event and its text so far.
    let mut open: Option<(usize, String)> = None;

    for event in events {
        match event {
            Event::Start(Tag::Heading { .. }) => {
                open = Some((out.len(), String::new()));
                out.push(event);
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((start, heading_text)) = open.take()
                    && let Some(Event::Start(Tag::Heading { id, .. })) = out.get_mut(start)
                {
                    match id.as_deref().map(str::to_owned) {
                        Some(explicit) => ids.reserve(&explicit),
                        None => *id = Some(CowStr::from(ids.unique(&heading_text))),
                    }
                }
                out.push(event);
            }
            Event::Text(ref t) | Event::Code(ref t) => {
                if let Some((_, buf)) = open.as_mut() {
                    buf.push_str(t);
                }
                out.push(event);
            }
            _ => out.push(event),
        }
    }
    out
}

fn link_bare_urls(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut out = Vec::with_capacity(events.len());
    let mut link_depth = 0usize;
    let mut in_code_block = false;

    for event in events {
        match event {
            Event::Start(Tag::Link { .. } | Tag::Image { .. }) => {
                link_depth += 1;
                out.push(event);
            }
            Event::End(TagEnd::Link | TagEnd::Image) => {
                link_depth = link_depth.saturating_sub(1);
                out.push(event);
            }
            Event::Start(Tag::CodeBlock(_)) => {
                in_code_block = true;
                out.push(event);
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                out.push(event);
            }
            Event::Text(ref t)
                if link_depth == 0 && !in_code_block && BARE_URL_RE.is_match(t) =>
            {
                push_linked_text(t, &mut out);
            }
            _ => out.push(event),
        }
    }
    out
}

fn push_linked_text(text: &str, out: &mut Vec<Event<'_>>) {
    let mut last = 0;
    for url in BARE_URL_RE.find_iter(text) {
        if url.start() > last {
            out.push(Event::Text(CowStr::from(text[last..url.start()].to_owned())));
        }
        out.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: CowStr::from(url.as_str().to_owned()),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }));
        out.push(Event::Text(CowStr::from(url.as_str().to_owned())));
        out.push(Event::End(TagEnd::Link));
        last = url.end();
    }
    if last < text.len() {
        out.push(Event::Text(CowStr::from(text[last..].to_owned())));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn html(source: &str) -> String {
        CmarkEngine.to_html(source.as_bytes()).unwrap()
    }

    fn heading(source: &str) -> Option<String> {
        CmarkEngine.first_heading(source.as_bytes()).unwrap()
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Getting Started"), "getting-started");
        assert_eq!(slugify("  API: v2 (beta)  "), "api-v2-beta");
        assert_eq!(slugify("Übersicht"), "übersicht");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_paragraph() {
        assert_eq!(html("Hello world"), "<p>Hello world</p>\n");
    }

    #[test]
    fn test_heading_ids_are_deduplicated() {
        let out = html("# Intro\n\n## Setup\n\n## Setup\n\n## Setup\n");
        assert!(out.contains(r#"<h1 id="intro">Intro</h1>"#));
        assert!(out.contains(r#"<h2 id="setup">Setup</h2>"#));
        assert!(out.contains(r#"<h2 id="setup-1">Setup</h2>"#));
        assert!(out.contains(r#"<h2 id="setup-2">Setup</h2>"#));
    }

    #[test]
    fn test_explicit_heading_id_is_kept() {
        let out = html("# Install {#install-guide}\n");
        assert!(out.contains(r#"<h1 id="install-guide">Install</h1>"#));
    }

    #[test]
    fn test_heading_id_includes_inline_code() {
        let out = html("## The `run` command\n");
        assert!(out.contains(r#"id="the-run-command""#));
    }

    #[test]
    fn test_tables_and_strikethrough() {
        let out = html("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~\n");
        assert!(out.contains("<table>"));
        assert!(out.contains("<del>gone</del>"));
    }

    #[test]
    fn test_bare_url_becomes_link() {
        let out = html("See https://example.com/docs.\n");
        assert_eq!(
            out,
            "<p>See <a href=\"https://example.com/docs\">https://example.com/docs</a>.</p>\n"
        );
    }

    #[test]
    fn test_url_inside_link_or_code_is_untouched() {
        let out = html("[site](https://example.com)\n\n```\nhttps://example.com\n```\n");
        assert_eq!(out.matches("<a ").count(), 1);
        assert!(out.contains("<code>https://example.com\n</code>"));
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let err = CmarkEngine.to_html(&[0x66, 0xff, 0x6f]).unwrap_err();
        assert!(err.to_string().contains("UTF-8"));
    }

    #[test]
    fn test_first_heading() {
        assert_eq!(heading("intro\n\n# Hello\n\n# Other\n"), Some("Hello".to_owned()));
        assert_eq!(heading("Title\n=====\n"), Some("Title".to_owned()));
        assert_eq!(heading("# Hello `world`\n"), Some("Hello world".to_owned()));
    }

    #[test]
    fn test_first_heading_ignores_nested_and_lower_levels() {
        assert_eq!(heading("> # Quoted\n\n## Sub\n"), None);
        assert_eq!(heading("- # In list\n\n# Top\n"), Some("Top".to_owned()));
        assert_eq!(heading("plain text"), None);
    }
}
