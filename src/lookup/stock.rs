use serde_json::{json, Map, Value};
use tracing::warn;

use super::http::{required_text, LookupClient, RawResponse};
use crate::config::{StockSettings, STOCK_API_KEY_VAR};
use crate::models::{FailureKind, LookupResult, ParamSpec, ParamType, ToolDescriptor};

pub const GET_STOCK_PRICE: &str = "get_stock_price";

const QUOTE_FUNCTION: &str = "GLOBAL_QUOTE";
const DEFAULT_CURRENCY: &str = "USD";

/// Latest quote for a ticker (Alpha Vantage-compatible endpoint).
#[derive(Debug, Clone)]
pub struct StockProvider {
    client: LookupClient,
    settings: StockSettings,
}

impl StockProvider {
    pub fn new(client: LookupClient, settings: StockSettings) -> Self {
        Self { client, settings }
    }

    pub fn descriptor() -> ToolDescriptor {
        ToolDescriptor {
            name: GET_STOCK_PRICE.to_string(),
            description: "Get the latest stock price for a ticker symbol, in USD. Use this \
                          when the user asks about the current price of a company's stock."
                .to_string(),
            parameters: vec![ParamSpec {
                name: "symbol".to_string(),
                param_type: ParamType::String,
                description: "Ticker symbol, e.g. 'AAPL', 'GOOGL' or 'MSFT'".to_string(),
                required: true,
            }],
        }
    }

    pub async fn invoke(&self, args: &Value) -> LookupResult {
        match required_text(args, "symbol") {
            Ok(symbol) => self.lookup(&symbol).await,
            Err(failure) => failure,
        }
    }

    pub async fn lookup(&self, symbol: &str) -> LookupResult {
        let symbol = normalize_symbol(symbol);
        if symbol.is_empty() {
            return LookupResult::failure(FailureKind::InvalidInput, "Ticker symbol must not be empty");
        }

        match self.fetch(&symbol).await {
            Ok(raw) => interpret_quote(&symbol, &raw),
            Err(failure) => failure,
        }
    }

    pub async fn fetch(&self, symbol: &str) -> Result<RawResponse, LookupResult> {
        self.client
            .get(
                "stock",
                &self.settings.endpoint,
                &[
                    ("function", QUOTE_FUNCTION),
                    ("symbol", symbol),
                    ("apikey", self.settings.api_key.as_str()),
                ],
            )
            .await
    }

    pub fn interpret(&self, symbol: &str, raw: &RawResponse) -> LookupResult {
        interpret_quote(symbol, raw)
    }
}

pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Map a raw quote reply onto a lookup result.
fn interpret_quote(symbol: &str, raw: &RawResponse) -> LookupResult {
    match raw.status.as_u16() {
        401 | 403 => {
            return LookupResult::failure(
                FailureKind::AuthError,
                format!("Invalid API key. Please check your {}.", STOCK_API_KEY_VAR),
            )
        }
        429 => return rate_limited(),
        _ if !raw.status.is_success() => {
            return LookupResult::failure(
                FailureKind::NetworkError,
                format!(
                    "Failed to retrieve stock data. Status code: {}",
                    raw.status.as_u16()
                ),
            )
        }
        _ => {}
    }

    let data: Value = match serde_json::from_str(&raw.body) {
        Ok(data) => data,
        Err(e) => {
            warn!(symbol, error = %e, "unexpected quote payload");
            return malformed(symbol);
        }
    };

    if data.get("Error Message").is_some() {
        return LookupResult::failure(
            FailureKind::NotFound,
            format!("Invalid stock symbol '{}'. Please check the symbol and try again.", symbol),
        );
    }

    // The provider signals throttling in-band with a 200
    if data.get("Note").is_some() || data.get("Information").is_some() {
        return rate_limited();
    }

    let quote = match data.get("Global Quote").and_then(|q| q.as_object()) {
        Some(quote) if !quote.is_empty() => quote,
        _ => {
            return LookupResult::failure(
                FailureKind::NotFound,
                format!("No data available for stock symbol '{}'.", symbol),
            )
        }
    };

    let price = match quote.get("05. price") {
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Number(n)) => n.as_f64(),
        _ => None,
    };
    let Some(price) = price else {
        return malformed(symbol);
    };

    let echoed = quote
        .get("01. symbol")
        .and_then(|s| s.as_str())
        .map(normalize_symbol)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| symbol.to_string());

    let mut fields = Map::new();
    fields.insert("symbol".to_string(), json!(echoed));
    fields.insert("price".to_string(), json!(price));
    fields.insert("currency".to_string(), json!(DEFAULT_CURRENCY));
    if let Some(day) = quote.get("07. latest trading day").and_then(|d| d.as_str()) {
        fields.insert("last_updated".to_string(), json!(day));
    }

    LookupResult::Success(fields)
}

fn rate_limited() -> LookupResult {
    LookupResult::failure(
        FailureKind::RateLimited,
        "Stock API rate limit exceeded. Please try again later.",
    )
}

fn malformed(symbol: &str) -> LookupResult {
    LookupResult::failure(
        FailureKind::NotFound,
        format!("No usable quote for '{}' (unexpected response format).", symbol),
    )
}
