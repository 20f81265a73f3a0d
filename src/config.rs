use clap::Parser;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Prefix for environment overrides, e.g. `SITE_CHAT__BASE_URL`.
pub const ENV_PREFIX: &str = "SITE";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Origin of the remote chat endpoint
    #[arg(long, env = "CHAT_BASE_URL")]
    pub chat_base_url: Option<String>,

    /// Origin of the back-office REST API
    #[arg(long, env = "API_BASE_URL")]
    pub api_base_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub chat: ChatConfig,
    pub api: ApiConfig,
    pub widget: WidgetConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    /// Root URL of the chat service. A path prefix is kept.
    pub base_url: String,
    /// Path of the chat endpoint, appended below `base_url`.
    pub path: String,
    /// Assistant greeting seeded into new transcripts; empty seeds nothing.
    #[serde(default)]
    pub greeting: Option<String>,
    /// Per-request timeout. Unset means wait until the endpoint settles.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl ChatConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    #[must_use]
    pub fn greeting(&self) -> Option<&str> {
        self.greeting.as_deref().filter(|g| !g.trim().is_empty())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Root URL of the REST API. A path prefix is kept.
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WidgetConfig {
    /// Idle widget sessions older than this are torn down.
    pub idle_timeout_secs: u64,
    /// How often the idle sweep runs.
    pub sweep_interval_secs: u64,
}

impl WidgetConfig {
    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        // Priority: CLI flag > CLI env var > SITE_ env > config file > defaults.
        let mut builder = Config::builder()
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("chat.base_url", "http://127.0.0.1:5000")?
            .set_default("chat.path", "/api/chat")?
            .set_default("api.base_url", "http://127.0.0.1:5000")?
            .set_default("widget.idle_timeout_secs", 30 * 60)?
            .set_default("widget.sweep_interval_secs", 60)?;

        match &cli.config {
            Some(path) => {
                builder = builder.add_source(File::new(path, FileFormat::Yaml).required(true));
            }
            None if Path::new("config.yaml").exists() => {
                builder = builder.add_source(File::new("config.yaml", FileFormat::Yaml));
            }
            None => {}
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(url) = cli.chat_base_url {
            builder = builder.set_override("chat.base_url", url)?;
        }
        if let Some(url) = cli.api_base_url {
            builder = builder.set_override("api.base_url", url)?;
        }

        let cfg = builder.build()?;
        cfg.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_greeting_blank_is_none() {
        let chat = ChatConfig {
            base_url: "http://x".into(),
            path: "/api/chat".into(),
            greeting: Some("  ".into()),
            request_timeout_secs: None,
        };
        assert!(chat.greeting().is_none());
        assert!(chat.request_timeout().is_none());
    }

    #[test]
    fn test_sweep_interval_floor() {
        let widget = WidgetConfig {
            idle_timeout_secs: 10,
            sweep_interval_secs: 0,
        };
        assert_eq!(widget.sweep_interval(), Duration::from_secs(1));
    }
}
