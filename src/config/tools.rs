use serde::{Deserialize, Serialize};

use crate::config::defaults::{default_max_rounds, default_retry_network_once, default_tools_enabled};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default = "default_tools_enabled")]
    pub enabled: bool,
    #[serde(default = "default_max_rounds")]
    pub max_rounds: usize,
    #[serde(default = "default_retry_network_once")]
    pub retry_network_once: bool,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            enabled: default_tools_enabled(),
            max_rounds: default_max_rounds(),
            retry_network_once: default_retry_network_once(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub weather: WeatherProviderConfig,
    #[serde(default)]
    pub stock: StockProviderConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WeatherProviderConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StockProviderConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// Resolved settings for the weather lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSettings {
    pub endpoint: String,
    pub api_key: Option<String>,
}

/// Resolved settings for the quote lookup. Only exists when a key is set.
#[derive(Debug, Clone, PartialEq)]
pub struct StockSettings {
    pub endpoint: String,
    pub api_key: String,
}
