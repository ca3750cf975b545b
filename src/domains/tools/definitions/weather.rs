//! Weather tool definition.
//!
//! Current conditions from weatherapi.com. Requires an API key; without one
//! every call fails before touching the network.

use anyhow::{Context, anyhow};
use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::parse_arguments;
use crate::domains::tools::descriptor::ToolDescriptor;
use crate::domains::tools::handlers::ToolHandler;

const WEATHER_API_BASE_URL: &str = "https://api.weatherapi.com/v1";

// ============================================================================
// Tool Parameters
// ============================================================================

/// Temperature units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

/// Parameters for the weather tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct WeatherParams {
    /// City name or location
    pub location: String,

    /// Temperature units (metric or imperial)
    #[serde(default)]
    pub units: Units,
}

/// Weather report returned to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub location: String,
    pub temperature: String,
    pub condition: String,
    pub humidity: String,
    pub wind: String,
    pub feels_like: String,
    pub updated: String,
    pub icon_url: String,
}

// ============================================================================
// weatherapi.com payloads (only the fields we read)
// ============================================================================

#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    location: ApiLocation,
    current: ApiCurrent,
}

#[derive(Debug, Deserialize)]
struct ApiLocation {
    name: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct ApiCurrent {
    temp_c: f64,
    temp_f: f64,
    feelslike_c: f64,
    feelslike_f: f64,
    wind_kph: f64,
    wind_mph: f64,
    humidity: f64,
    last_updated: String,
    condition: ApiCondition,
}

#[derive(Debug, Deserialize)]
struct ApiCondition {
    text: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Weather tool - looks up current weather for a location.
#[derive(Debug, Clone)]
pub struct WeatherTool {
    api_key: Option<String>,
    client: reqwest::Client,
    base_url: String,
}

impl WeatherTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_weather";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Gets current weather for a specified location";

    /// Create the tool with an optional API key and a shared HTTP client.
    pub fn new(api_key: Option<String>, client: reqwest::Client) -> Self {
        Self {
            api_key,
            client,
            base_url: WEATHER_API_BASE_URL.to_string(),
        }
    }

    /// Point the tool at a different API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Create the descriptor for this tool.
    pub fn descriptor(self) -> ToolDescriptor {
        ToolDescriptor::for_params::<WeatherParams>(Self::NAME, Self::DESCRIPTION, self)
    }

    /// Fetch and format current conditions.
    #[instrument(skip_all, fields(location = %params.location))]
    pub async fn execute(&self, params: &WeatherParams) -> anyhow::Result<WeatherReport> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("WEATHER_API_KEY environment variable is not set"))?;

        info!("Weather tool called for location: {}", params.location);

        let response = self
            .client
            .get(format!("{}/current.json", self.base_url))
            .query(&[
                ("key", api_key),
                ("q", params.location.as_str()),
                ("aqi", "no"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| status.to_string());
            warn!("Weather API returned {}: {}", status, message);
            return Err(anyhow!(message));
        }

        let payload: CurrentWeatherResponse = response
            .json()
            .await
            .context("unexpected response payload")?;

        Ok(format_report(&payload, params.units))
    }
}

#[async_trait::async_trait]
impl ToolHandler for WeatherTool {
    async fn invoke(&self, arguments: JsonObject) -> anyhow::Result<Value> {
        let params: WeatherParams = parse_arguments(arguments)?;
        let report = self
            .execute(&params)
            .await
            .map_err(|e| anyhow!("Weather API error: {:#}", e))?;
        Ok(serde_json::to_value(report)?)
    }
}

/// All tools of this set.
pub fn tools(api_key: Option<String>, client: reqwest::Client) -> Vec<ToolDescriptor> {
    vec![WeatherTool::new(api_key, client).descriptor()]
}

fn format_report(payload: &CurrentWeatherResponse, units: Units) -> WeatherReport {
    let current = &payload.current;
    let (temp, feels_like, wind, temp_unit, wind_unit) = match units {
        Units::Metric => (
            current.temp_c,
            current.feelslike_c,
            current.wind_kph,
            "°C",
            "kph",
        ),
        Units::Imperial => (
            current.temp_f,
            current.feelslike_f,
            current.wind_mph,
            "°F",
            "mph",
        ),
    };

    WeatherReport {
        location: format!("{}, {}", payload.location.name, payload.location.country),
        temperature: format!("{}{}", temp, temp_unit),
        condition: current.condition.text.clone(),
        humidity: format!("{}%", current.humidity),
        wind: format!("{} {}", wind, wind_unit),
        feels_like: format!("{}{}", feels_like, temp_unit),
        updated: current.last_updated.clone(),
        icon_url: format!("https:{}", current.condition.icon),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router, extract::Query, http::StatusCode, response::IntoResponse, routing::get,
    };
    use serde_json::json;
    use std::collections::HashMap;

    fn sample_json() -> Value {
        json!({
            "location": { "name": "Paris", "country": "France", "region": "Ile-de-France" },
            "current": {
                "temp_c": 18.0,
                "temp_f": 64.4,
                "feelslike_c": 17.5,
                "feelslike_f": 63.5,
                "wind_kph": 11.2,
                "wind_mph": 6.9,
                "humidity": 72,
                "last_updated": "2024-05-01 12:00",
                "condition": {
                    "text": "Partly cloudy",
                    "icon": "//cdn.weatherapi.com/116.png",
                    "code": 1003
                }
            }
        })
    }

    fn sample_payload() -> CurrentWeatherResponse {
        serde_json::from_value(sample_json()).unwrap()
    }

    /// Stand-in for `current.json`: accepts only `good-key` and Paris.
    async fn stub_current(Query(query): Query<HashMap<String, String>>) -> impl IntoResponse {
        let param = |key: &str| query.get(key).map(String::as_str);
        if param("key") != Some("good-key") {
            let body = json!({ "error": { "code": 2006, "message": "API key is invalid." } });
            return (StatusCode::UNAUTHORIZED, Json(body));
        }
        if param("q") != Some("Paris") || param("aqi") != Some("no") {
            let body = json!({ "error": { "code": 1006, "message": "Location not found." } });
            return (StatusCode::BAD_REQUEST, Json(body));
        }
        (StatusCode::OK, Json(sample_json()))
    }

    async fn spawn_stub() -> String {
        let app = Router::new().route("/current.json", get(stub_current));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn local_client() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }

    fn location(name: &str) -> JsonObject {
        let mut args = JsonObject::new();
        args.insert("location".to_string(), json!(name));
        args
    }

    #[test]
    fn test_units_default_to_metric() {
        let params: WeatherParams = serde_json::from_str(r#"{"location": "Paris"}"#).unwrap();
        assert_eq!(params.units, Units::Metric);
    }

    #[test]
    fn test_format_metric() {
        let report = format_report(&sample_payload(), Units::Metric);
        assert_eq!(report.location, "Paris, France");
        assert_eq!(report.temperature, "18°C");
        assert_eq!(report.feels_like, "17.5°C");
        assert_eq!(report.humidity, "72%");
        assert_eq!(report.wind, "11.2 kph");
        assert_eq!(report.icon_url, "https://cdn.weatherapi.com/116.png");
    }

    #[test]
    fn test_format_imperial() {
        let report = format_report(&sample_payload(), Units::Imperial);
        assert_eq!(report.temperature, "64.4°F");
        assert_eq!(report.wind, "6.9 mph");
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_network() {
        let tool = WeatherTool::new(None, reqwest::Client::new());
        let args = json!({ "location": "Paris" }).as_object().cloned().unwrap();

        let err = tool.invoke(args).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Weather API error: WEATHER_API_KEY environment variable is not set"
        );
    }

    #[tokio::test]
    async fn test_missing_location_fails() {
        let tool = WeatherTool::new(Some("key".to_string()), reqwest::Client::new());
        let err = tool.invoke(JsonObject::new()).await.unwrap_err();
        assert!(err.to_string().contains("location"));
    }

    #[tokio::test]
    async fn test_lookup_against_local_api() {
        let tool = WeatherTool::new(Some("good-key".to_string()), local_client())
            .with_base_url(spawn_stub().await);

        let result = tool.invoke(location("Paris")).await.unwrap();
        assert_eq!(result["location"], "Paris, France");
        assert_eq!(result["temperature"], "18°C");
        assert_eq!(result["condition"], "Partly cloudy");
        assert_eq!(result["updated"], "2024-05-01 12:00");
    }

    #[tokio::test]
    async fn test_api_error_message_is_surfaced() {
        let tool = WeatherTool::new(Some("bad-key".to_string()), local_client())
            .with_base_url(spawn_stub().await);

        let err = tool.invoke(location("Paris")).await.unwrap_err();
        assert_eq!(err.to_string(), "Weather API error: API key is invalid.");
    }

    #[tokio::test]
    async fn test_unknown_location_is_rejected() {
        let tool = WeatherTool::new(Some("good-key".to_string()), local_client())
            .with_base_url(spawn_stub().await);
        let err = tool.invoke(location("Atlantis")).await.unwrap_err();
        assert_eq!(err.to_string(), "Weather API error: Location not found.");
    }

    // Integration test (requires network and MCP_WEATHER_API_KEY)
    #[ignore]
    #[tokio::test]
    async fn test_live_lookup() {
        let key = std::env::var("MCP_WEATHER_API_KEY").ok();
        let tool = WeatherTool::new(key, reqwest::Client::new());
        let params = WeatherParams {
            location: "London".to_string(),
            units: Units::Metric,
        };
        let report = tool.execute(&params).await.unwrap();
        assert!(report.location.contains("London"));
    }
}
