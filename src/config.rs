use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::api::DEFAULT_BASE_URL;

/// Default tracing filter. Kept quiet so log lines do not crowd the chat.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path (YAML, TOML or JSON)
    #[arg(short, long, env = "DIETITIAN_CONFIG")]
    pub config: Option<String>,

    /// Base URL of the dietitian service
    #[arg(long, env = "DIETITIAN_BASE_URL")]
    pub base_url: Option<String>,

    /// Tracing filter directive, e.g. `info` or `dietitian_chat=debug`
    #[arg(long, env = "DIETITIAN_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, env = "DIETITIAN_LOG_JSON")]
    pub log_json: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    /// Load configuration.
    ///
    /// Priority: CLI flag > CLI env var > `DIETITIAN_` env > config file > defaults.
    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder()
            .set_default("api.base_url", DEFAULT_BASE_URL)?
            .set_default("logging.level", DEFAULT_LOG_LEVEL)?
            .set_default("logging.json", false)?;

        // An explicit file must exist; the cwd fallback is optional.
        builder = match &cli.config {
            Some(path) => builder.add_source(File::with_name(path).required(true)),
            None => builder.add_source(File::with_name("dietitian").required(false)),
        };

        // E.g. DIETITIAN_API__BASE_URL=http://localhost:8080
        builder = builder.add_source(
            Environment::with_prefix("DIETITIAN")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(url) = cli.base_url {
            builder = builder.set_override("api.base_url", url)?;
        }
        if let Some(level) = cli.log_level {
            builder = builder.set_override("logging.level", level)?;
        }
        // Absent flag leaves the file/env value in place.
        if cli.log_json {
            builder = builder.set_override("logging.json", true)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        if cfg.api.base_url.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "api.base_url cannot be empty".to_string(),
            ));
        }
        Ok(cfg)
    }
}
