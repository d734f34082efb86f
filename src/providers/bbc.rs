/*
 *  providers/bbc.rs
 *
 *  rt82weather - weather on your keyboard
 *	(c) 2026 rt82weather contributors
 *
 *	BBC Weather provider. Uses the same keyless BBC / Met Office endpoints
 *	as the KDE Plasma weather widget:
 *	  location search  open.live.bbc.co.uk/locator/locations
 *	  forecast         weather-broker-cdn.api.bbci.co.uk/en/forecast/aggregated/{id}
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */
use std::collections::HashSet;
use std::time::Duration;

use log::{debug, info};
use reqwest::{Client, header};
use serde::Deserialize;

use super::{ProviderError, WeatherProvider};
use crate::condition::classify;
use crate::weather::{Location, WeatherForecast};

pub const NAME: &str = "bbc";

const SEARCH_URL: &str = "https://open.live.bbc.co.uk/locator/locations";
const FORECAST_URL: &str = "https://weather-broker-cdn.api.bbci.co.uk/en/forecast/aggregated";
const TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    response: SearchBody,
}

#[derive(Debug, Default, Deserialize)]
struct SearchBody {
    locations: Option<Vec<RawLocation>>,
    results: Option<SearchResults>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResults {
    results: Option<Vec<RawLocation>>,
}

/// Any field may be absent or null in the locator feed.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLocation {
    id: Option<String>,
    name: Option<String>,
    container: Option<String>,
    country: Option<String>,
    place_type: Option<String>,
}

impl RawLocation {
    fn into_location(self) -> Option<Location> {
        let present = |v: Option<String>| v.filter(|s| !s.is_empty());
        Some(Location {
            id: present(self.id)?,
            name: present(self.name)?,
            area: present(self.container)?,
            country: present(self.country)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    forecasts: Vec<DayForecast>,
}

#[derive(Debug, Default, Deserialize)]
struct DayForecast {
    #[serde(default)]
    summary: Summary,
}

#[derive(Debug, Default, Deserialize)]
struct Summary {
    #[serde(default)]
    report: Report,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    weather_type_text: Option<String>,
    min_temp_c: Option<f64>,
    max_temp_c: Option<f64>,
    humidity_percent: Option<f64>,
    wind_speed_kph: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct BbcWeatherProvider {
    client: Client,
    verify_ssl: bool,
    search_url: String,
    forecast_url: String,
}

impl BbcWeatherProvider {
    pub fn new(verify_ssl: bool) -> Result<Self, ProviderError> {
        Self::with_endpoints(verify_ssl, SEARCH_URL, FORECAST_URL)
    }

    /// Points the provider at alternative endpoints, e.g. a local mock.
    pub fn with_endpoints(verify_ssl: bool, search_url: &str, forecast_url: &str) -> Result<Self, ProviderError> {
        const VERSION: &str = concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));
        let mut headers = header::HeaderMap::new();
        headers.insert("User-Agent", header::HeaderValue::from_static(VERSION));
        headers.insert("Accept", header::HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(TIMEOUT)
            .danger_accept_invalid_certs(!verify_ssl)
            .build()?;

        Ok(Self {
            client,
            verify_ssl,
            search_url: search_url.trim_end_matches('/').to_string(),
            forecast_url: forecast_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn verify_ssl(&self) -> bool {
        self.verify_ssl
    }
}

impl WeatherProvider for BbcWeatherProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn search_location(&self, query: &str) -> Result<Vec<Location>, ProviderError> {
        let resp = self
            .client
            .get(&self.search_url)
            .query(&[("s", query), ("format", "json")])
            .send()
            .await?;
        debug!("GET {} -> {}", resp.url(), resp.status());
        let data = resp.error_for_status()?.json::<SearchResponse>().await?;

        let body = data.response;
        let raw = body
            .locations
            .filter(|l| !l.is_empty())
            .or_else(|| body.results.and_then(|r| r.results))
            .unwrap_or_default();

        let locations = dedupe_locations(raw);
        info!("Location search {:?} matched {} places", query, locations.len());
        Ok(locations)
    }

    async fn get_forecast(&self, location_id: &str) -> Result<WeatherForecast, ProviderError> {
        let url = format!("{}/{}", self.forecast_url, location_id);
        let resp = self.client.get(&url).send().await?;
        debug!("GET {} -> {}", url, resp.status());
        let data = resp.error_for_status()?.json::<ForecastResponse>().await?;

        let today = data.forecasts.into_iter().next().ok_or(ProviderError::NoForecast)?;
        let report = today.summary.report;

        let condition = report
            .weather_type_text
            .unwrap_or_else(|| "cloudy".to_string())
            .to_lowercase();
        let (Some(temp_min_c), Some(temp_max_c)) = (report.min_temp_c, report.max_temp_c) else {
            return Err(ProviderError::MissingTemperature);
        };

        Ok(WeatherForecast {
            icon_category: classify(&condition),
            condition,
            temp_min_c,
            temp_max_c,
            location_name: location_id.to_string(),
            humidity: report.humidity_percent,
            wind_speed_kph: report.wind_speed_kph,
        })
    }
}

/// Drops incomplete entries, whole regions and repeated ids, keeping order.
fn dedupe_locations(raw: Vec<RawLocation>) -> Vec<Location> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .filter(|l| l.place_type.as_deref() != Some("region"))
        .filter_map(RawLocation::into_location)
        .filter(|l| seen.insert(l.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::IconCategory;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn provider_for(server: &MockServer) -> BbcWeatherProvider {
        BbcWeatherProvider::with_endpoints(
            true,
            &format!("{}/locator/locations", server.uri()),
            &format!("{}/en/forecast/aggregated", server.uri()),
        )
        .unwrap()
    }

    fn forecast_body() -> serde_json::Value {
        serde_json::json!({
            "forecasts": [{
                "summary": {
                    "report": {
                        "weatherTypeText": "Sunny",
                        "minTempC": 5,
                        "maxTempC": 18,
                        "humidityPercent": 60,
                        "windSpeedKph": 15
                    }
                }
            }]
        })
    }

    #[tokio::test]
    async fn search_returns_locations_without_regions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/locator/locations"))
            .and(query_param("s", "London"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": {
                    "locations": [
                        {"id": "123", "name": "London", "container": "Greater London",
                         "country": "GB", "placeType": "settlement"},
                        {"id": "456", "name": "London", "container": "Canada",
                         "country": "CA", "placeType": "settlement"},
                        {"id": "789", "name": "London Region", "container": "England",
                         "country": "GB", "placeType": "region"}
                    ]
                }
            })))
            .mount(&server)
            .await;

        let results = provider_for(&server).await.search_location("London").await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "123");
        assert_eq!(results[0].name, "London");
        assert_eq!(results[0].display_name(), "London, Greater London, GB");
        assert_eq!(results[1].id, "456");
    }

    #[tokio::test]
    async fn search_deduplicates_and_skips_incomplete() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/locator/locations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": {
                    "locations": [
                        {"id": "1", "name": "A", "container": "B", "country": "C"},
                        {"id": "1", "name": "A", "container": "B", "country": "C"},
                        {"id": "2", "name": "No Country", "container": "B"}
                    ]
                }
            })))
            .mount(&server)
            .await;

        let results = provider_for(&server).await.search_location("test").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "1");
    }

    #[tokio::test]
    async fn search_skips_entries_with_null_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/locator/locations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": {
                    "locations": [
                        {"id": "1", "name": "Leeds", "container": "West Yorkshire", "country": "GB"},
                        {"id": "2", "name": "Leeds", "container": null, "country": "US"},
                        {"id": "3", "name": null, "container": "Kent", "country": "GB", "placeType": null}
                    ]
                }
            })))
            .mount(&server)
            .await;

        let results = provider_for(&server).await.search_location("Leeds").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "1");
    }

    #[tokio::test]
    async fn search_falls_back_to_nested_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/locator/locations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": {
                    "results": {
                        "results": [
                            {"id": "2988507", "name": "Paris", "container": "Île-de-France", "country": "FR"}
                        ]
                    }
                }
            })))
            .mount(&server)
            .await;

        let results = provider_for(&server).await.search_location("Paris").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].area, "Île-de-France");
    }

    #[tokio::test]
    async fn search_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/locator/locations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": {"locations": []}
            })))
            .mount(&server)
            .await;

        let results = provider_for(&server).await.search_location("nowhere").await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn forecast_parses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/en/forecast/aggregated/123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .mount(&server)
            .await;

        let forecast = provider_for(&server).await.get_forecast("123").await.unwrap();

        assert_eq!(forecast.condition, "sunny");
        assert_eq!(forecast.temp_min_c, 5.0);
        assert_eq!(forecast.temp_max_c, 18.0);
        assert_eq!(forecast.icon_category, IconCategory::Sun);
        assert_eq!(forecast.humidity, Some(60.0));
        assert_eq!(forecast.wind_speed_kph, Some(15.0));
        assert_eq!(forecast.location_name, "123");
    }

    #[tokio::test]
    async fn forecast_defaults_condition_to_cloudy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/en/forecast/aggregated/9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "forecasts": [{"summary": {"report": {"minTempC": -3.5, "maxTempC": 1}}}]
            })))
            .mount(&server)
            .await;

        let forecast = provider_for(&server).await.get_forecast("9").await.unwrap();
        assert_eq!(forecast.condition, "cloudy");
        assert_eq!(forecast.icon_category, IconCategory::Cloud);
        assert_eq!(forecast.temp_min_c, -3.5);
        assert_eq!(forecast.humidity, None);
    }

    #[tokio::test]
    async fn forecast_missing_temps() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/en/forecast/aggregated/123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "forecasts": [{"summary": {"report": {"weatherTypeText": "Sunny"}}}]
            })))
            .mount(&server)
            .await;

        let err = provider_for(&server).await.get_forecast("123").await.unwrap_err();
        assert!(matches!(err, ProviderError::MissingTemperature));
        assert!(err.to_string().contains("missing temperature"));
    }

    #[tokio::test]
    async fn forecast_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/en/forecast/aggregated/123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"forecasts": []})))
            .mount(&server)
            .await;

        let err = provider_for(&server).await.get_forecast("123").await.unwrap_err();
        assert!(matches!(err, ProviderError::NoForecast));
        assert!(err.to_string().contains("No forecast data"));
    }

    #[tokio::test]
    async fn http_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = provider_for(&server).await.get_forecast("123").await.unwrap_err();
        assert!(matches!(err, ProviderError::Http(_)));
    }

    #[test]
    fn insecure_client_builds() {
        let prov = BbcWeatherProvider::new(false).unwrap();
        assert!(!prov.verify_ssl());
    }
}
