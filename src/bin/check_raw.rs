use colored::*;
use std::env;
use std::time::Duration;

use toolchat::config::{
    StockSettings, WeatherSettings, DEFAULT_LOOKUP_TIMEOUT_SECS, DEFAULT_STOCK_ENDPOINT,
    DEFAULT_WEATHER_ENDPOINT, STOCK_API_KEY_VAR, WEATHER_API_KEY_VAR,
};
use toolchat::lookup::{normalize_symbol, LookupClient, RawResponse, StockProvider, WeatherProvider};
use toolchat::models::LookupResult;

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn print_raw(raw: &RawResponse) {
    println!("{}", format!("Status: {}", raw.status).yellow());
    println!("{}", "Raw body:".bold());
    match serde_json::from_str::<serde_json::Value>(&raw.body) {
        Ok(json) => println!(
            "{}",
            serde_json::to_string_pretty(&json).unwrap_or_else(|_| raw.body.clone())
        ),
        Err(_) => println!("{}", raw.body),
    }
    println!("{}", "-".repeat(80).dimmed());
}

fn print_result(result: &LookupResult) {
    println!("{}", "Normalized result:".bold());
    match result {
        LookupResult::Success(_) => println!("{}", result.summary().green()),
        LookupResult::Failure { .. } => println!("{}", result.summary().red()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <weather|stock> <city or symbol>", args[0]);
        std::process::exit(1);
    }
    let query = args[2..].join(" ");

    let timeout = var("LOOKUP_TIMEOUT")
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_LOOKUP_TIMEOUT_SECS);
    let client = LookupClient::new(Duration::from_secs(timeout))?;

    match args[1].as_str() {
        "weather" => {
            let provider = WeatherProvider::new(
                client,
                WeatherSettings {
                    endpoint: var("WEATHER_API_ENDPOINT")
                        .unwrap_or_else(|| DEFAULT_WEATHER_ENDPOINT.to_string()),
                    api_key: var(WEATHER_API_KEY_VAR),
                },
            );
            let city = query.trim();
            println!("{}", format!("Weather lookup: {}", city).cyan());

            match provider.fetch(city).await {
                Ok(raw) => {
                    print_raw(&raw);
                    print_result(&provider.interpret(city, &raw));
                }
                Err(failure) => print_result(&failure),
            }
        }
        "stock" => {
            let Some(api_key) = var(STOCK_API_KEY_VAR) else {
                eprintln!("Error: {} environment variable not set", STOCK_API_KEY_VAR);
                std::process::exit(1);
            };
            let provider = StockProvider::new(
                client,
                StockSettings {
                    endpoint: var("STOCK_API_ENDPOINT")
                        .unwrap_or_else(|| DEFAULT_STOCK_ENDPOINT.to_string()),
                    api_key,
                },
            );
            let symbol = normalize_symbol(&query);
            println!("{}", format!("Quote lookup: {}", symbol).cyan());

            match provider.fetch(&symbol).await {
                Ok(raw) => {
                    print_raw(&raw);
                    print_result(&provider.interpret(&symbol, &raw));
                }
                Err(failure) => print_result(&failure),
            }
        }
        other => {
            eprintln!("Unknown lookup '{}'; expected 'weather' or 'stock'", other);
            std::process::exit(1);
        }
    }

    Ok(())
}
