use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use dotenv::dotenv;
use serde::Deserialize;

use crate::geo::DEFAULT_RADIUS_KM;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AppConfig {
    /// SQLite path, or `:memory:` for a throwaway store.
    pub database_url: String,
    pub seed_demo_data: bool,
    pub nearby_radius_km: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "marketplace.db".to_string(),
            seed_demo_data: true,
            nearby_radius_km: DEFAULT_RADIUS_KM,
        }
    }
}

impl AppConfig {
    /// Defaults, overridden by `DATABASE_URL`, `SEED_DEMO_DATA` and
    /// `NEARBY_RADIUS_KM` from the environment or a `.env` file.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv().ok(); // Load .env file if present
        Self::builder()?
            .add_source(Environment::default().try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Defaults overridden by a TOML document.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Self::builder()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let defaults = Self::default();
        Config::builder()
            .set_default("database_url", defaults.database_url)?
            .set_default("seed_demo_data", defaults.seed_demo_data)?
            .set_default("nearby_radius_km", defaults.nearby_radius_km)
    }
}
