//! Stock quotes via Stooq's CSV endpoint (no API key required).

use anyhow::Result;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{Tool, ToolResult};

pub struct StockPriceTool {
    http: reqwest::Client,
}

impl StockPriceTool {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[derive(Deserialize)]
struct StockInput {
    symbol: String,
}

#[async_trait::async_trait]
impl Tool for StockPriceTool {
    fn name(&self) -> &str {
        "get_stock_price"
    }

    fn description(&self) -> &str {
        "Get real stock market data for a given stock symbol."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "symbol": {
                    "type": "string",
                    "description": "Stock symbol (e.g., AAPL, TSLA)"
                }
            },
            "required": ["symbol"]
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolResult> {
        let input: StockInput = serde_json::from_value(input)?;
        let symbol = normalize_symbol(&input.symbol);

        let url = format!("https://stooq.com/q/l/?s={}&f=sd2t2ohlcv&h&e=csv", symbol);
        let body = self.http.get(&url).send().await?.text().await?;

        match parse_quote(&body, &symbol) {
            Some(quote) => Ok(ToolResult::from_json(&quote, false)),
            None => Ok(ToolResult::from_json(
                &json!({"error": format!("No data found for symbol {}", symbol)}),
                true,
            )),
        }
    }
}

/// Lowercases the symbol and defaults the exchange suffix to `.us`.
pub(super) fn normalize_symbol(symbol: &str) -> String {
    let symbol = symbol.trim().to_lowercase();
    if symbol.contains('.') {
        symbol
    } else {
        format!("{}.us", symbol)
    }
}

/// Parses Stooq's two-line CSV (`Symbol,Date,Time,Open,High,Low,Close,Volume`)
/// into a quote object. Returns `None` for missing data or an `N/D` close,
/// which is how Stooq reports unknown symbols.
pub(super) fn parse_quote(csv: &str, symbol: &str) -> Option<Value> {
    let mut lines = csv.lines();
    let header: Vec<&str> = lines.next()?.split(',').map(str::trim).collect();
    let row: Vec<&str> = lines.next()?.split(',').map(str::trim).collect();

    let field = |name: &str| -> Option<&str> {
        let idx = header.iter().position(|h| *h == name)?;
        row.get(idx).copied()
    };

    let close = field("Close")?;
    if close == "N/D" {
        return None;
    }

    Some(json!({
        "symbol": symbol.to_uppercase(),
        "open": field("Open"),
        "high": field("High"),
        "low": field("Low"),
        "close": close,
        "volume": field("Volume"),
    }))
}
