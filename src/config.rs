use std::env;
use std::time::Duration;

use clap::{Parser, Subcommand};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::widget::WidgetSettings;

/// Prefix of environment variables mapped onto configuration keys.
/// `CHAT_SERVER__PORT=8000` sets `server.port`.
pub const ENV_PREFIX: &str = "CHAT";

/// Config file picked up from the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE", global = true)]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT", global = true)]
    pub port: Option<u16>,

    /// Base URL of the reply server (chat mode)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Initially selected provider (chat mode)
    #[arg(long, global = true)]
    pub provider: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Serve the chat page and the reply endpoint
    Serve,
    /// Chat with a running server from the terminal
    Chat,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub providers: ProvidersConfig,
    pub translation: TranslationConfig,
    pub widget: WidgetConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Deserialize, Clone)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    #[serde(default)]
    pub deepseek_api_key: Option<String>,
    pub deepseek_model: String,
    pub deepseek_base_url: String,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ProvidersConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvidersConfig")
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "***"))
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("deepseek_api_key", &self.deepseek_api_key.as_ref().map(|_| "***"))
            .field("deepseek_model", &self.deepseek_model)
            .field("deepseek_base_url", &self.deepseek_base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TranslationConfig {
    pub enabled: bool,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WidgetConfig {
    pub server_url: String,
    pub provider: String,
    pub greeting: String,
    pub greeting_delay_ms: u64,
    pub failure_message: String,
}

impl From<&WidgetConfig> for WidgetSettings {
    fn from(cfg: &WidgetConfig) -> Self {
        Self {
            greeting: cfg.greeting.clone(),
            greeting_delay: Duration::from_millis(cfg.greeting_delay_ms),
            failure_message: cfg.failure_message.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl AppConfig {
    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Self::load_from_cli(&cli)
    }

    /// Layer defaults, config file, environment and CLI flags.
    ///
    /// Priority: CLI flag > `CHAT_*` env var > config file > legacy env var > default.
    pub fn load_from_cli(cli: &Cli) -> Result<Self, config::ConfigError> {
        let widget = WidgetSettings::default();

        let mut builder = Config::builder()
            .set_default("server.port", 5000)?
            .set_default("server.host", "127.0.0.1")?
            .set_default("providers.gemini_model", "gemini-1.5-flash")?
            .set_default(
                "providers.gemini_base_url",
                "https://generativelanguage.googleapis.com",
            )?
            .set_default("providers.deepseek_model", "deepseek/deepseek-chat")?
            .set_default("providers.deepseek_base_url", "https://openrouter.ai/api/v1")?
            .set_default("providers.timeout_secs", 30)?
            .set_default("translation.enabled", true)?
            .set_default("translation.base_url", "https://translate.googleapis.com")?
            .set_default("translation.timeout_secs", 10)?
            .set_default("widget.server_url", "http://127.0.0.1:5000")?
            .set_default("widget.provider", "auto")?
            .set_default("widget.greeting", widget.greeting)?
            .set_default(
                "widget.greeting_delay_ms",
                i64::try_from(widget.greeting_delay.as_millis()).unwrap_or(500),
            )?
            .set_default("widget.failure_message", widget.failure_message)?
            .set_default("logging.json", false)?;

        // Unprefixed key variables, as found in most `.env` files.
        if let Some(key) = non_empty_env("GEMINI_API_KEY") {
            builder = builder.set_default("providers.gemini_api_key", key)?;
        }
        if let Some(key) = non_empty_env("DEEPSEEK_API_KEY") {
            builder = builder.set_default("providers.deepseek_api_key", key)?;
        }

        builder = match &cli.config {
            Some(path) => builder.add_source(File::with_name(path)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );

        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(url) = &cli.url {
            builder = builder.set_override("widget.server_url", url.as_str())?;
        }
        if let Some(provider) = &cli.provider {
            builder = builder.set_override("widget.provider", provider.as_str())?;
        }

        let cfg = builder.build()?;
        cfg.try_deserialize()
    }

    /// Socket address string the server binds to.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}
