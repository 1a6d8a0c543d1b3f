//! Lookup providers: one outbound GET each, normalized into a
//! [`LookupResult`](crate::models::LookupResult).

mod http;
mod stock;
mod weather;

pub use http::{required_text, LookupClient, RawResponse};
pub use stock::{normalize_symbol, StockProvider, GET_STOCK_PRICE};
pub use weather::{WeatherProvider, GET_WEATHER};
