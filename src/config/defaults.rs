pub const DEFAULT_API_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";
pub const DEFAULT_WEATHER_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_STOCK_ENDPOINT: &str = "https://www.alphavantage.co/query";
/// Weather is always requested in Celsius.
pub const WEATHER_UNITS: &str = "metric";

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 8;

/// Tool round-trips allowed per user turn.
pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 5;

pub fn default_tools_enabled() -> bool {
    true
}

pub fn default_max_rounds() -> usize {
    DEFAULT_MAX_TOOL_ROUNDS
}

pub fn default_retry_network_once() -> bool {
    true
}
