mod api;
mod defaults;
mod tools;
mod validation;

use crate::cli::Args;
use crate::error::{ChatError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub use api::ApiConfig;
pub use defaults::*;
pub use tools::{
    ProvidersConfig, StockProviderConfig, StockSettings, ToolsConfig, WeatherProviderConfig,
    WeatherSettings,
};
pub use validation::{expand_env_var_in_string, normalize_chat_endpoint, parse_flag};

pub const CHAT_API_KEY_VAR: &str = "OPENROUTER_API_KEY";
pub const WEATHER_API_KEY_VAR: &str = "WEATHER_API_KEY";
pub const STOCK_API_KEY_VAR: &str = "ALPHA_VANTAGE_API_KEY";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub verbose: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub default_model: Option<String>,
    #[serde(default)]
    pub system_prompt: Option<String>,
}

/// Fully resolved runtime configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_endpoint: String,
    pub model: String,
    pub system_prompt: Option<String>,
    pub request_timeout: u64,
    pub verbose: bool,
    pub tools_enabled: bool,
    pub max_tool_rounds: usize,
    pub retry_network_once: bool,
    pub lookup_timeout: u64,
    pub weather: WeatherSettings,
    pub stock: Option<StockSettings>,
}

/// On-disk configuration (YAML or JSON).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self> {
        let file_config = FileConfig::load()?;
        Self::from_sources(args, &file_config, |name| env::var(name).ok())
    }

    /// Resolve configuration from CLI args, a variable lookup and a file
    /// config. Precedence: CLI > variable > file > default.
    pub fn from_sources<F>(args: &Args, file: &FileConfig, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let expand = |value: String| expand_env_var_in_string(&value, &lookup);

        // Secrets come from the environment only
        let api_key = var(CHAT_API_KEY_VAR).ok_or_else(|| {
            ChatError::Config(format!("{} environment variable not set", CHAT_API_KEY_VAR))
        })?;

        let api_endpoint = args
            .api_endpoint
            .clone()
            .or_else(|| var("AI_API_ENDPOINT"))
            .or_else(|| file.api.endpoint.clone().map(expand))
            .map(|endpoint| normalize_chat_endpoint(&endpoint))
            .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string());

        let model = args
            .model
            .clone()
            .or_else(|| var("AI_MODEL"))
            .or_else(|| file.model.default_model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let system_prompt = var("AI_SYSTEM_PROMPT").or_else(|| file.model.system_prompt.clone());

        let request_timeout = parse_number(&var, "AI_REQUEST_TIMEOUT")?
            .or(file.api.timeout_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        require_positive_timeout("request timeout", request_timeout)?;

        let verbose = args.verbose
            || var("AI_VERBOSE")
                .map(|v| parse_flag(&v))
                .or(file.session.verbose)
                .unwrap_or(false);

        // --no-tools disables every tool regardless of other settings
        let tools_enabled = if args.no_tools {
            false
        } else {
            match var("AI_TOOLS_ENABLED") {
                Some(v) => parse_flag(&v),
                None => file.tools.enabled,
            }
        };

        let max_tool_rounds = match args.max_tool_rounds {
            Some(rounds) => rounds,
            None => parse_number(&var, "AI_MAX_TOOL_ROUNDS")?.unwrap_or(file.tools.max_rounds),
        };
        if max_tool_rounds == 0 {
            return Err(ChatError::Config(
                "max tool rounds must be at least 1".to_string(),
            ));
        }

        let lookup_timeout = parse_number(&var, "LOOKUP_TIMEOUT")?
            .or(file.providers.timeout_secs)
            .unwrap_or(DEFAULT_LOOKUP_TIMEOUT_SECS);
        require_positive_timeout("lookup timeout", lookup_timeout)?;

        let weather = WeatherSettings {
            endpoint: var("WEATHER_API_ENDPOINT")
                .or_else(|| file.providers.weather.endpoint.clone().map(expand))
                .unwrap_or_else(|| DEFAULT_WEATHER_ENDPOINT.to_string()),
            api_key: var(WEATHER_API_KEY_VAR),
        };

        let stock = var(STOCK_API_KEY_VAR).map(|api_key| StockSettings {
            endpoint: var("STOCK_API_ENDPOINT")
                .or_else(|| file.providers.stock.endpoint.clone().map(expand))
                .unwrap_or_else(|| DEFAULT_STOCK_ENDPOINT.to_string()),
            api_key,
        });

        Ok(Config {
            api_key,
            api_endpoint,
            model,
            system_prompt,
            request_timeout,
            verbose,
            tools_enabled,
            max_tool_rounds,
            retry_network_once: file.tools.retry_network_once,
            lookup_timeout,
            weather,
            stock,
        })
    }

    pub fn get_current_date() -> String {
        chrono::Local::now().format("%A, %B %d, %Y").to_string()
    }
}

fn require_positive_timeout(name: &str, secs: u64) -> Result<()> {
    if secs == 0 {
        return Err(ChatError::Config(format!("{} must be at least 1 second", name)));
    }
    Ok(())
}

fn parse_number<T, F>(var: &F, name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ChatError::Config(format!("{} must be a number, got '{}'", name, raw))),
        None => Ok(None),
    }
}

impl FileConfig {
    /// Load the first config file found on the search path, or defaults.
    pub fn load() -> Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Ok(FileConfig::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );

        let config: FileConfig = if is_yaml {
            serde_yaml::from_str(&contents).with_context(|| {
                format!("Failed to parse YAML config file: {}", path.display())
            })?
        } else {
            serde_json::from_str(&contents).with_context(|| {
                format!("Failed to parse JSON config file: {}", path.display())
            })?
        };

        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".toolchat.yaml"),
            PathBuf::from(".toolchat.yml"),
            PathBuf::from(".toolchat.json"),
        ];

        if let Some(path) = Self::global_config_path() {
            if let Some(dir) = path.parent() {
                paths.push(path.clone());
                paths.push(dir.join("toolchat.yml"));
                paths.push(dir.join("toolchat.json"));
            }
        }

        paths
    }

    pub fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("toolchat").join("toolchat.yaml"))
    }

    /// Write a sample config to `path`. Refuses to overwrite.
    pub fn write_sample(path: &Path) -> Result<()> {
        if path.exists() {
            return Err(ChatError::Config(format!(
                "config file already exists: {}",
                path.display()
            )));
        }
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, SAMPLE_CONFIG)?;
        Ok(())
    }
}

const SAMPLE_CONFIG: &str = r#"# toolchat configuration
# API keys are read from the environment only:
#   OPENROUTER_API_KEY (required), WEATHER_API_KEY, ALPHA_VANTAGE_API_KEY

api:
  endpoint: https://openrouter.ai/api/v1
  timeout_secs: 30

model:
  default_model: openai/gpt-4o-mini
  # system_prompt: Answer briefly.

tools:
  enabled: true
  max_rounds: 5
  retry_network_once: true

providers:
  timeout_secs: 8
  weather:
    endpoint: https://api.openweathermap.org/data/2.5/weather
  stock:
    endpoint: https://www.alphavantage.co/query

session:
  verbose: false
"#;
