use serde_json::Value;

use crate::lookup::{StockProvider, WeatherProvider};
use crate::models::{LookupResult, ToolDescriptor};

/// Every tool the assistant can run. Adding a tool means adding a variant.
#[derive(Debug, Clone)]
pub enum Tool {
    Weather(WeatherProvider),
    StockPrice(StockProvider),
}

impl Tool {
    pub fn descriptor(&self) -> ToolDescriptor {
        match self {
            Tool::Weather(_) => WeatherProvider::descriptor(),
            Tool::StockPrice(_) => StockProvider::descriptor(),
        }
    }

    pub async fn invoke(&self, args: &Value) -> LookupResult {
        match self {
            Tool::Weather(provider) => provider.invoke(args).await,
            Tool::StockPrice(provider) => provider.invoke(args).await,
        }
    }
}
