use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::warn;

use super::http::{required_text, LookupClient, RawResponse};
use crate::config::{WeatherSettings, WEATHER_API_KEY_VAR, WEATHER_UNITS};
use crate::models::{FailureKind, LookupResult, ParamSpec, ParamType, ToolDescriptor};

pub const GET_WEATHER: &str = "get_weather";

#[derive(Deserialize)]
struct WeatherPayload {
    #[serde(default)]
    name: Option<String>,
    main: MainReadings,
    #[serde(default)]
    weather: Vec<Condition>,
    #[serde(default)]
    wind: Option<Wind>,
    #[serde(default)]
    sys: Option<Sys>,
}

#[derive(Deserialize)]
struct MainReadings {
    temp: f64,
    #[serde(default)]
    humidity: Option<Value>,
}

#[derive(Deserialize)]
struct Condition {
    description: String,
}

#[derive(Deserialize)]
struct Wind {
    #[serde(default)]
    speed: Option<Value>,
}

#[derive(Deserialize)]
struct Sys {
    #[serde(default)]
    country: Option<String>,
}

/// Current conditions for a city (OpenWeatherMap-compatible endpoint).
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: LookupClient,
    settings: WeatherSettings,
}

impl WeatherProvider {
    pub fn new(client: LookupClient, settings: WeatherSettings) -> Self {
        Self { client, settings }
    }

    pub fn descriptor() -> ToolDescriptor {
        ToolDescriptor {
            name: GET_WEATHER.to_string(),
            description: "Get the current weather for a city: temperature in Celsius, \
                          a short condition description, humidity and wind speed. Use this \
                          when the user asks about current weather conditions somewhere."
                .to_string(),
            parameters: vec![ParamSpec {
                name: "city".to_string(),
                param_type: ParamType::String,
                description: "City name, e.g. 'London', 'New York' or 'Tokyo'".to_string(),
                required: true,
            }],
        }
    }

    pub async fn invoke(&self, args: &Value) -> LookupResult {
        match required_text(args, "city") {
            Ok(city) => self.lookup(&city).await,
            Err(failure) => failure,
        }
    }

    pub async fn lookup(&self, city: &str) -> LookupResult {
        let city = city.trim();
        if city.is_empty() {
            return LookupResult::failure(FailureKind::InvalidInput, "City name must not be empty");
        }

        match self.fetch(city).await {
            Ok(raw) => self.interpret(city, &raw),
            Err(failure) => failure,
        }
    }

    /// One GET against the provider. No key means no request.
    pub async fn fetch(&self, city: &str) -> Result<RawResponse, LookupResult> {
        let api_key = self.settings.api_key.as_deref().ok_or_else(|| {
            LookupResult::failure(
                FailureKind::AuthError,
                format!(
                    "Weather API key not configured. Please set the {} environment variable.",
                    WEATHER_API_KEY_VAR
                ),
            )
        })?;

        self.client
            .get(
                "weather",
                &self.settings.endpoint,
                &[
                    ("q", city),
                    ("appid", api_key),
                    ("units", WEATHER_UNITS),
                ],
            )
            .await
    }

    pub fn interpret(&self, city: &str, raw: &RawResponse) -> LookupResult {
        match raw.status.as_u16() {
            401 | 403 => {
                return LookupResult::failure(
                    FailureKind::AuthError,
                    format!("Invalid API key. Please check your {}.", WEATHER_API_KEY_VAR),
                )
            }
            404 => {
                return LookupResult::failure(
                    FailureKind::NotFound,
                    format!("City '{}' not found. Please check the spelling and try again.", city),
                )
            }
            429 => {
                return LookupResult::failure(
                    FailureKind::RateLimited,
                    "Weather API rate limit exceeded. Please try again later.",
                )
            }
            _ if !raw.status.is_success() => {
                return LookupResult::failure(
                    FailureKind::NetworkError,
                    format!(
                        "Failed to retrieve weather data. Status code: {}",
                        raw.status.as_u16()
                    ),
                )
            }
            _ => {}
        }

        let payload: WeatherPayload = match serde_json::from_str(&raw.body) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(city, error = %e, "unexpected weather payload");
                return malformed(city);
            }
        };

        let Some(condition) = payload.weather.first() else {
            return malformed(city);
        };

        let mut fields = Map::new();
        let name = payload
            .name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(city);
        fields.insert("city".to_string(), json!(name));
        fields.insert(
            "temperature".to_string(),
            json!((payload.main.temp * 10.0).round() / 10.0),
        );
        fields.insert("description".to_string(), json!(condition.description));
        fields.insert("units".to_string(), json!(WEATHER_UNITS));
        if let Some(humidity) = payload.main.humidity {
            fields.insert("humidity".to_string(), humidity);
        }
        if let Some(speed) = payload.wind.and_then(|w| w.speed) {
            fields.insert("wind_speed".to_string(), speed);
        }
        if let Some(country) = payload.sys.and_then(|s| s.country) {
            fields.insert("country".to_string(), json!(country));
        }

        LookupResult::Success(fields)
    }
}

fn malformed(city: &str) -> LookupResult {
    LookupResult::failure(
        FailureKind::NotFound,
        format!("No weather data available for '{}' (unexpected response format).", city),
    )
}
