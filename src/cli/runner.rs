//! CLI runner - executes commands

use crate::catalog::Catalog;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::TapConfig;
use crate::engine::{discover, is_available, probe_dialect, SyncEngine};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::output::SingerWriter;
use crate::state::StateManager;
use serde_json::{json, Value};
use tracing::{info, warn};

/// Stream fetched by `check` to test the credentials
const CHECK_STREAM: &str = "products";

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;
        match &self.cli.command {
            Commands::Check => self.check(&config).await,
            Commands::Discover => self.discover(&config).await,
            Commands::Sync { .. } => self.sync(&config).await,
        }
    }

    /// Load configuration
    fn load_config(&self) -> Result<TapConfig> {
        // Inline config takes precedence
        if let Some(json_str) = &self.cli.config_json {
            return TapConfig::from_json(json_str);
        }

        if let Some(path) = &self.cli.config {
            return TapConfig::from_file(path);
        }

        Err(Error::config(
            "No configuration given (use --config or --config-json)",
        ))
    }

    /// Load state
    fn load_state(&self) -> Result<StateManager> {
        // Inline state takes precedence
        if let Some(state_json) = &self.cli.state_json {
            StateManager::from_json(state_json)
        } else if let Some(path) = &self.cli.state {
            StateManager::from_file(path)
        } else {
            Ok(StateManager::in_memory())
        }
    }

    fn build_client(config: &TapConfig) -> Result<HttpClient> {
        HttpClient::with_auth(config.http_config()?, config.auth_config())
    }

    /// Selected catalog: CLI streams, then config streams, then everything
    fn build_catalog(&self, config: &TapConfig) -> Result<Catalog> {
        let catalog = Catalog::woocommerce();
        match self.cli.command.stream_names().or_else(|| config.streams.clone()) {
            Some(names) if !names.is_empty() => catalog.select(names.as_slice()),
            _ => Ok(catalog),
        }
    }

    /// Check connection
    async fn check(&self, config: &TapConfig) -> Result<()> {
        let client = Self::build_client(config)?;
        let dialect = probe_dialect(&client, &config.engine_config()?).await;

        let catalog = Catalog::woocommerce();
        let stream = catalog
            .get(CHECK_STREAM)
            .ok_or_else(|| Error::StreamNotFound {
                stream: CHECK_STREAM.to_string(),
            })?;

        let (status, message, result) = match is_available(&client, stream).await {
            Ok(true) => ("SUCCEEDED", "Connection successful".to_string(), Ok(())),
            Ok(false) => (
                "FAILED",
                format!("The '{CHECK_STREAM}' endpoint did not answer"),
                Err(Error::Other("Connection check failed".to_string())),
            ),
            Err(e) => ("FAILED", format!("Connection failed: {e}"), Err(e)),
        };

        self.output_message(&json!({
            "type": "CONNECTION_STATUS",
            "connectionStatus": {
                "status": status,
                "message": message,
                "dialect": dialect,
            }
        }));

        result
    }

    /// Discover streams
    async fn discover(&self, config: &TapConfig) -> Result<()> {
        let client = Self::build_client(config)?;
        let discovered = discover(&client, &Catalog::woocommerce()).await?;
        self.output_message(&discovered.to_json());
        Ok(())
    }

    /// Sync selected streams
    async fn sync(&self, config: &TapConfig) -> Result<()> {
        let client = Self::build_client(config)?;
        let catalog = self.build_catalog(config)?;
        let state = self.load_state()?;

        let discovered = discover(&client, &catalog).await?;
        for name in catalog.selected() {
            if !discovered.is_selected(name) {
                warn!("Stream '{}' is not available on this store, skipping", name);
            }
        }

        let mut engine = SyncEngine::new(client, config.engine_config()?);
        let mut sink = SingerWriter::stdout();
        let result = engine.sync(&discovered, &state, &mut sink).await;
        sink.flush()?;

        let stats = result?;
        info!(
            "Wrote {} records from {} streams",
            stats.records_synced, stats.streams_synced
        );
        Ok(())
    }

    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}
