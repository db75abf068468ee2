use serde::Deserialize;
use std::env;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use pawn_catalog::MarkupPolicy;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub shop: ShopConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub pricing: MarkupPolicy,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ShopConfig {
    #[serde(default = "default_shop_name")]
    pub name: String,
}

fn default_shop_name() -> String { "PawnShop Manager".to_string() }

impl Default for ShopConfig {
    fn default() -> Self {
        Self { name: default_shop_name() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Used when RUST_LOG is not set
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "pawn_cli=info,pawn_ledger=info,pawn_catalog=warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: default_log_filter() }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(Self::environment());

        Self::from_builder(builder)
    }

    /// Eg. `PAWN_PRICING__TABLET_MARKUP_PERCENT=25`
    fn environment() -> config::Environment {
        config::Environment::with_prefix("PAWN")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }
}
