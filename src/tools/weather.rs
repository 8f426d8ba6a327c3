//! Current weather via the OpenWeatherMap API.

use anyhow::Result;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{Tool, ToolResult};

const OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

pub struct WeatherTool {
    http: reqwest::Client,
    api_key: Option<String>,
}

impl WeatherTool {
    pub fn new(http: reqwest::Client, api_key: Option<String>) -> Self {
        Self { http, api_key }
    }
}

#[derive(Deserialize)]
struct WeatherInput {
    city: String,
}

#[async_trait::async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Get real-time weather data for a given city."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "city": {
                    "type": "string",
                    "description": "City name (e.g., Bangalore, London)"
                }
            },
            "required": ["city"]
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolResult> {
        let input: WeatherInput = serde_json::from_value(input)?;

        let Some(ref api_key) = self.api_key else {
            return Ok(ToolResult::from_json(
                &json!({"error": "OpenWeather API key not configured"}),
                true,
            ));
        };

        let response = self
            .http
            .get(OPENWEATHER_URL)
            .query(&[
                ("q", input.city.as_str()),
                ("appid", api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Ok(ToolResult::from_json(
                &json!({
                    "error": "Failed to fetch weather data",
                    "details": format!("HTTP {}", response.status()),
                }),
                true,
            ));
        }

        let data: Value = response.json().await?;
        Ok(ToolResult::from_json(&shape_current_weather(&data), false))
    }
}

/// Projects the OpenWeatherMap payload down to the fields the agent reports.
pub(super) fn shape_current_weather(data: &Value) -> Value {
    json!({
        "city": data.get("name"),
        "country": data.pointer("/sys/country"),
        "temperature": data.pointer("/main/temp"),
        "feels_like": data.pointer("/main/feels_like"),
        "humidity": data.pointer("/main/humidity"),
        "pressure": data.pointer("/main/pressure"),
        "weather": data.pointer("/weather/0/description"),
        "wind_speed": data.pointer("/wind/speed"),
    })
}
