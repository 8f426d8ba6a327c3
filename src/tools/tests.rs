use super::*;
use crate::config::ToolsConfig;
use serde_json::json;

fn registry() -> ToolRegistry {
    ToolRegistry::with_builtins(&ToolsConfig::default())
}

#[test]
fn registry_exposes_builtin_definitions() {
    let registry = registry();
    assert_eq!(registry.len(), 3);
    assert!(!registry.is_empty());
    let defs = registry.definitions();
    assert_eq!(defs[0].name, "get_weather");
    assert_eq!(defs[1].name, "get_stock_price");
    assert_eq!(defs[2].name, "web_search");
    for def in &defs {
        assert_eq!(def.parameters["type"], "object");
    }
}

#[test]
fn validate_accepts_well_formed_call() {
    let registry = registry();
    assert!(registry
        .validate("get_weather", &json!({"city": "London"}))
        .is_ok());
    assert!(registry
        .validate("web_search", &json!({"query": "rust", "num_results": 3}))
        .is_ok());
}

#[test]
fn validate_rejects_unknown_tool() {
    let registry = registry();
    let err = registry.validate("brave_search", &json!({})).unwrap_err();
    assert!(err.to_string().contains("Unknown tool"));
}

#[test]
fn validate_rejects_missing_required_argument() {
    let registry = registry();
    let err = registry
        .validate("get_weather", &json!({"town": "London"}))
        .unwrap_err();
    assert!(err.to_string().contains("city"));
}

#[test]
fn validate_rejects_non_object_arguments() {
    let registry = registry();
    assert!(registry
        .validate("get_stock_price", &json!("AAPL"))
        .is_err());
}

#[tokio::test]
async fn unknown_tool_execution_is_an_error() {
    let registry = registry();
    let result = registry.execute("nonexistent_tool", json!({})).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn unconfigured_weather_reports_missing_key() {
    let registry = registry();
    let result = registry
        .execute("get_weather", json!({"city": "London"}))
        .await
        .unwrap();
    assert!(result.is_error);
    assert!(result.content.contains("not configured"));
}

#[tokio::test]
async fn unconfigured_search_reports_missing_key() {
    let registry = registry();
    let result = registry
        .execute("web_search", json!({"query": "rust"}))
        .await
        .unwrap();
    assert!(result.is_error);
    assert!(result.content.contains("not configured"));
}

#[test]
fn stock_symbol_normalization() {
    assert_eq!(stock::normalize_symbol("AAPL"), "aapl.us");
    assert_eq!(stock::normalize_symbol("tsla"), "tsla.us");
    assert_eq!(stock::normalize_symbol("SAP.DE"), "sap.de");
}

#[test]
fn stock_csv_parses_into_quote() {
    let csv = "Symbol,Date,Time,Open,High,Low,Close,Volume\n\
               AAPL.US,2025-01-10,22:00:07,240.01,240.16,233.0,236.85,61710856\n";
    let quote = stock::parse_quote(csv, "aapl.us").unwrap();
    assert_eq!(quote["symbol"], "AAPL.US");
    assert_eq!(quote["open"], "240.01");
    assert_eq!(quote["close"], "236.85");
    assert_eq!(quote["volume"], "61710856");
}

#[test]
fn stock_csv_no_data_yields_none() {
    let csv = "Symbol,Date,Time,Open,High,Low,Close,Volume\n\
               XYZZY.US,N/D,N/D,N/D,N/D,N/D,N/D,N/D\n";
    assert!(stock::parse_quote(csv, "xyzzy.us").is_none());
    assert!(stock::parse_quote("", "aapl.us").is_none());
}

#[test]
fn weather_payload_is_projected() {
    let payload = json!({
        "name": "London",
        "sys": {"country": "GB"},
        "main": {"temp": 11.2, "feels_like": 10.1, "humidity": 81, "pressure": 1012},
        "weather": [{"description": "overcast clouds"}],
        "wind": {"speed": 4.6}
    });
    let shaped = weather::shape_current_weather(&payload);
    assert_eq!(shaped["city"], "London");
    assert_eq!(shaped["country"], "GB");
    assert_eq!(shaped["temperature"], 11.2);
    assert_eq!(shaped["weather"], "overcast clouds");
}

#[test]
fn search_payload_is_projected() {
    let payload = json!({
        "items": [
            {"title": "Rust", "snippet": "A language", "link": "https://rust-lang.org", "extra": 1},
            {"title": "Crates", "snippet": "Registry", "link": "https://crates.io"}
        ]
    });
    let shaped = search::shape_results("rust", &payload);
    assert_eq!(shaped["query"], "rust");
    assert_eq!(shaped["results"].as_array().unwrap().len(), 2);
    assert_eq!(shaped["results"][0]["title"], "Rust");
    assert!(shaped["results"][0].get("extra").is_none());
}

#[test]
fn search_payload_without_items_is_empty() {
    let shaped = search::shape_results("nothing", &json!({}));
    assert_eq!(shaped["results"].as_array().unwrap().len(), 0);
}
