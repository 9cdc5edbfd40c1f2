//! Terminal messages printed by the CLI.
//!
//! Everything goes to stderr so tracing logs and command output interleave
//! in order.

use std::path::Path;

use console::{Style, Term};

pub(crate) struct Output {
    term: Term,
    green: Style,
    red: Style,
    dim: Style,
    url: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            red: Style::new().red().bold(),
            dim: Style::new().dim(),
            url: Style::new().cyan().underlined(),
        }
    }

    /// Report a finished `generate` run.
    pub(crate) fn rendered(&self, pages: usize, out_dir: &Path) {
        let noun = if pages == 1 { "page" } else { "pages" };
        self.line(&format!(
            "{} {pages} {noun} into {}",
            self.green.apply_to("Rendered"),
            self.dim.apply_to(out_dir.display())
        ));
    }

    /// Announce the dev server before it starts building.
    pub(crate) fn serving(&self, config_path: &Path, base_url: &str, live_reload: bool) {
        self.line(&format!(
            "Serving {} at {}",
            self.dim.apply_to(config_path.display()),
            self.url.apply_to(base_url)
        ));
        if !live_reload {
            self.line(&self.dim.apply_to("Live reload disabled").to_string());
        }
    }

    pub(crate) fn error(&self, err: &dyn std::fmt::Display) {
        self.line(&format!("{} {err}", self.red.apply_to("Error:")));
    }

    fn line(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }
}
