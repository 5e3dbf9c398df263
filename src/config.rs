use anyhow::{anyhow, Result};
use serde_derive::Deserialize;
use std::str::FromStr;

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Debug)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl AppConfig {
    pub fn log_level(&self) -> tracing::Level {
        tracing::Level::from_str(self.log_level.as_str()).unwrap_or(tracing::Level::INFO)
    }
}

pub fn load_app_config() -> Result<AppConfig> {
    match envy::from_env::<AppConfig>() {
        Ok(config) => Ok(config),
        Err(err) => Err(anyhow!("Failed to load AppConfig: {}", err)),
    }
}

fn default_store_path() -> String {
    "products.db".to_string()
}

#[derive(Deserialize, Debug)]
pub struct StoreConfig {
    // where the product catalog database lives
    #[serde(default = "default_store_path")]
    pub path: String,
}

pub fn load_store_config() -> Result<StoreConfig> {
    match envy::prefixed("STORE_").from_env::<StoreConfig>() {
        Ok(config) => Ok(config),
        Err(err) => Err(anyhow!("Failed to load StoreConfig: {}", err)),
    }
}
