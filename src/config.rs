use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::api::DEFAULT_FRIENDS_PATH;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Base URL of the bill-sharing server
    #[arg(long, env = "SERVER_URL")]
    pub server_url: Option<String>,

    /// WebSocket URL of the chat channel
    #[arg(long, env = "REALTIME_URL")]
    pub realtime_url: Option<String>,

    /// Conversation (bill) the chat panel is bound to
    #[arg(long, env = "BILL_ID")]
    pub bill_id: Option<i64>,

    /// JSON file with the page's pre-populated friend list
    #[arg(long, env = "FRIENDS_FILE")]
    pub friends_file: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    pub server: ServerConfig,
    pub realtime: RealtimeConfig,
    pub chat: ChatConfig,
    #[serde(default)]
    pub page: PageConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub base_url: String,
    pub friends_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RealtimeConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    pub bill_id: i64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct PageConfig {
    #[serde(default)]
    pub friends_file: Option<String>,
}

impl ClientConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    /// Build the configuration.
    ///
    /// Priority: CLI flag > CLI env var > `BILLSHARE_` env vars > config
    /// file > defaults.
    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder()
            .set_default("server.base_url", "http://127.0.0.1:5000")?
            .set_default("server.friends_path", DEFAULT_FRIENDS_PATH)?
            .set_default("realtime.url", "ws://127.0.0.1:5000/ws")?
            .set_default("chat.bill_id", 1)?;

        // Explicit file must exist; ./billshare.{yaml,toml,json} is optional.
        builder = match &cli.config {
            Some(path) => builder.add_source(File::with_name(path).required(true)),
            None => builder.add_source(File::with_name("billshare").required(false)),
        };

        // E.g. BILLSHARE_SERVER__BASE_URL=http://bills.local
        builder = builder.add_source(
            Environment::with_prefix("BILLSHARE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(url) = cli.server_url {
            builder = builder.set_override("server.base_url", url)?;
        }
        if let Some(url) = cli.realtime_url {
            builder = builder.set_override("realtime.url", url)?;
        }
        if let Some(id) = cli.bill_id {
            builder = builder.set_override("chat.bill_id", id)?;
        }
        if let Some(path) = cli.friends_file {
            builder = builder.set_override("page.friends_file", path)?;
        }

        let cfg = builder.build()?;
        cfg.try_deserialize()
    }
}
