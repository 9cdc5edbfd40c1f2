//! `folio serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use folio_server::{ServerConfig, run_server};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args, Debug)]
pub(crate) struct ServeArgs {
    /// Path to the site configuration file.
    #[arg(short, long, env = "FOLIO_CONFIG", default_value = "./.docs.yaml")]
    pub(crate) config: PathBuf,

    /// Host to bind to.
    #[arg(long, default_value = "127.0.0.1")]
    pub(crate) host: String,

    /// Port to bind to. Pages are rendered with `http://localhost:<port>` as base URL.
    #[arg(short, long, default_value_t = 3500)]
    pub(crate) port: u16,

    /// Serve the initial build only, without watching for changes.
    #[arg(long)]
    pub(crate) no_live_reload: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial build fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.server_config();

        output.serving(
            &config.config_path,
            &config.base_url(),
            config.live_reload_enabled,
        );

        run_server(config).await?;
        Ok(())
    }

    fn server_config(self) -> ServerConfig {
        ServerConfig {
            host: self.host,
            port: self.port,
            config_path: self.config,
            live_reload_enabled: !self.no_live_reload,
            ..ServerConfig::default()
        }
    }
}
