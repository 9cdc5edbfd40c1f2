//! `folio generate` command implementation.

use std::path::PathBuf;

use clap::Args;
use folio_config::Config;
use folio_site::{RenderSummary, Site};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the generate command.
#[derive(Args, Debug)]
pub(crate) struct GenerateArgs {
    /// Path to the site configuration file.
    #[arg(short, long, env = "FOLIO_CONFIG", default_value = "./.docs.yaml")]
    pub(crate) config: PathBuf,
}

impl GenerateArgs {
    /// Execute the generate command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or any page fails to
    /// render.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let (summary, out_dir) = self.generate()?;

        output.rendered(summary.pages, &out_dir);
        Ok(())
    }

    fn generate(&self) -> Result<(RenderSummary, PathBuf), CliError> {
        let config = Config::load(&self.config, None)?;
        tracing::debug!(config = %self.config.display(), "Loaded configuration");
        let out_dir = config.output_root();

        let mut site = Site::load(config)?;
        Ok((site.render()?, out_dir))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_generate_writes_home_page() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(".docs.yaml"),
            "pages:\n  - path: /\n    source: README.md\n",
        )
        .unwrap();
        fs::write(dir.path().join("README.md"), "# Hello\n").unwrap();

        let args = GenerateArgs {
            config: dir.path().join(".docs.yaml"),
        };
        let (summary, out_dir) = args.generate().unwrap();

        assert_eq!(summary.pages, 1);
        assert_eq!(out_dir, dir.path().join("docs"));
        let html = fs::read_to_string(dir.path().join("docs/index.html")).unwrap();
        assert!(html.contains("<h1 id=\"hello\">Hello</h1>"));
    }

    #[test]
    fn test_generate_missing_config() {
        let dir = TempDir::new().unwrap();
        let args = GenerateArgs {
            config: dir.path().join(".docs.yaml"),
        };

        let err = args.generate().unwrap_err();

        assert!(matches!(err, CliError::Config(_)));
    }
}
