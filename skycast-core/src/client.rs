use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::{collections::BTreeMap, fmt::Debug, time::Duration};
use tracing::{debug, warn};

use crate::{
    config::Config,
    error::FetchError,
    model::{AirQuality, CurrentConditions, ForecastEntry, LocationInfo, WeatherPayload},
    query::Query,
};

/// Abstraction over the backend weather endpoint, so the controller and
/// tests can substitute a mock implementation.
#[async_trait]
pub trait WeatherApi: Send + Sync + Debug {
    /// One logical network call; no retries. The caller decides whether
    /// to re-issue a failed query.
    async fn fetch_weather(&self, query: &Query) -> Result<WeatherPayload, FetchError>;
}

/// HTTP client for the weather backend.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: Client,
    base_url: String,
}

impl WeatherClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(config.backend_url(), config.timeout())
    }
}

#[async_trait]
impl WeatherApi for WeatherClient {
    async fn fetch_weather(&self, query: &Query) -> Result<WeatherPayload, FetchError> {
        let url = format!("{}/api/weather/location", self.base_url);
        debug!(%url, ?query, "fetching weather snapshot");

        let res = self
            .http
            .get(&url)
            .query(&query.request_params())
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| transport_error(&e))?;

        if !status.is_success() {
            let message = error_message(status, &body);
            warn!(status = status.as_u16(), %message, "weather backend returned an error");
            return Err(FetchError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        let raw: RawPayload = serde_json::from_str(&body).map_err(|e| {
            warn!(%e, "failed to decode weather payload");
            FetchError::IncompleteData
        })?;

        raw.into_payload()
    }
}

fn transport_error(err: &reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::NetworkUnreachable
    }
}

/// Prefer the body's `message` field, fall back to the status reason.
fn error_message(status: StatusCode, body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: Option<String>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Failed to fetch weather data")
                .to_string()
        })
}

// Wire DTOs, private to this module. The backend relays OpenWeatherMap's
// nested shapes; only the flattened canonical model is public.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPayload {
    location_info: Option<LocationInfo>,
    current: Option<RawCurrent>,
    forecast_list: Option<Vec<RawForecastEntry>>,
    air_quality: Option<RawAirQuality>,
}

impl RawPayload {
    fn into_payload(self) -> Result<WeatherPayload, FetchError> {
        let (Some(location), Some(current), Some(forecast)) =
            (self.location_info, self.current, self.forecast_list)
        else {
            return Err(FetchError::IncompleteData);
        };

        // Missing air quality is normalized to absent, not an error.
        Ok(WeatherPayload {
            location,
            current: current.flatten(),
            forecast_list: forecast
                .into_iter()
                .map(RawForecastEntry::flatten)
                .collect(),
            air_quality: self.air_quality.map(RawAirQuality::flatten),
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawWeather {
    description: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawMain {
    temp: Option<f64>,
    #[serde(rename = "feelsLike")]
    feels_like: Option<f64>,
    #[serde(rename = "tempMin")]
    temp_min: Option<f64>,
    #[serde(rename = "tempMax")]
    temp_max: Option<f64>,
    humidity: Option<f64>,
    pressure: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
struct RawWind {
    speed: Option<f64>,
    deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawClouds {
    all: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawCurrent {
    weather: Option<Vec<RawWeather>>,
    main: Option<RawMain>,
    wind: Option<RawWind>,
    clouds: Option<RawClouds>,
    visibility: Option<f64>,
}

impl RawCurrent {
    fn flatten(self) -> CurrentConditions {
        let (description, icon) = first_weather(self.weather);
        let main = self.main.unwrap_or_default();
        let wind = self.wind.unwrap_or_default();

        CurrentConditions {
            description,
            icon,
            temperature: main.temp,
            feels_like: main.feels_like,
            temp_min: main.temp_min,
            temp_max: main.temp_max,
            humidity: main.humidity,
            pressure: main.pressure,
            wind_speed: wind.speed,
            wind_direction: wind.deg,
            cloudiness: self.clouds.and_then(|c| c.all),
            visibility_meters: self.visibility,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawForecastEntry {
    dt: i64,
    main: Option<RawMain>,
    weather: Option<Vec<RawWeather>>,
    pop: Option<f64>,
    wind: Option<RawWind>,
}

impl RawForecastEntry {
    fn flatten(self) -> ForecastEntry {
        let (description, icon) = first_weather(self.weather);

        ForecastEntry {
            timestamp_unix: self.dt,
            temperature: self.main.unwrap_or_default().temp,
            description,
            icon,
            precipitation_probability: self.pop,
            wind_speed: self.wind.unwrap_or_default().speed,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawAqiMain {
    aqi: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct RawAirQuality {
    main: Option<RawAqiMain>,
    components: Option<BTreeMap<String, f64>>,
}

impl RawAirQuality {
    fn flatten(self) -> AirQuality {
        AirQuality {
            index: self.main.and_then(|m| m.aqi),
            components: self.components.unwrap_or_default(),
        }
    }
}

fn first_weather(weather: Option<Vec<RawWeather>>) -> (Option<String>, Option<String>) {
    match weather.and_then(|mut w| (!w.is_empty()).then(|| w.remove(0))) {
        Some(w) => (w.description, w.icon),
        None => (None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn client_for(server: &mockito::ServerGuard) -> WeatherClient {
        WeatherClient::new(server.url(), Duration::from_secs(5)).expect("client builds")
    }

    fn full_body() -> serde_json::Value {
        json!({
            "locationInfo": {
                "resolvedName": "London",
                "latitude": 51.5074,
                "longitude": -0.1278,
                "country": "GB",
                "timezoneOffset": 0,
                "sunrise": 1709532000,
                "sunset": 1709571600
            },
            "current": {
                "weather": [{"description": "light rain", "icon": "10d"}],
                "main": {
                    "temp": 15.2,
                    "feelsLike": 14.8,
                    "tempMin": 13.0,
                    "tempMax": 16.5,
                    "humidity": 82.0,
                    "pressure": 1012.0
                },
                "wind": {"speed": 3.6, "deg": 240.0},
                "clouds": {"all": 75.0},
                "visibility": 10000.0
            },
            "forecastList": [
                {
                    "dt": 1709553600,
                    "main": {"temp": 14.1},
                    "weather": [{"description": "overcast clouds", "icon": "04d"}],
                    "pop": 0.4,
                    "wind": {"speed": 4.2}
                }
            ],
            "airQuality": {
                "main": {"aqi": 2},
                "components": {"pm2_5": 12.3, "no2": 18.7}
            }
        })
    }

    #[tokio::test]
    async fn city_query_success_with_air_quality() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/api/weather/location")
            .match_query(Matcher::UrlEncoded("city".into(), "London".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(full_body().to_string())
            .create_async()
            .await;

        let payload = client_for(&server)
            .fetch_weather(&Query::City("London".to_string()))
            .await
            .expect("fetch succeeds");

        assert_eq!(payload.location.resolved_name.as_deref(), Some("London"));
        assert_eq!(payload.current.temperature, Some(15.2));
        assert_eq!(payload.current.description.as_deref(), Some("light rain"));
        assert_eq!(payload.forecast_list.len(), 1);
        assert_eq!(payload.forecast_list[0].precipitation_probability, Some(0.4));

        let aqi = payload.air_quality.expect("air quality present");
        assert_eq!(aqi.index, Some(2));
        assert_eq!(aqi.components.get("pm2_5"), Some(&12.3));
    }

    #[tokio::test]
    async fn coordinate_query_sends_lat_and_lon() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/weather/location")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("lat".into(), "51.5".into()),
                Matcher::UrlEncoded("lon".into(), "-0.12".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(full_body().to_string())
            .create_async()
            .await;

        let result = client_for(&server)
            .fetch_weather(&Query::Coordinates {
                lat: 51.5,
                lon: -0.12,
            })
            .await;

        assert!(result.is_ok());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_air_quality_is_not_an_error() {
        let mut body = full_body();
        body.as_object_mut().unwrap().remove("airQuality");

        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/api/weather/location")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let payload = client_for(&server)
            .fetch_weather(&Query::City("London".to_string()))
            .await
            .expect("fetch succeeds without air quality");

        assert!(payload.air_quality.is_none());
        assert!(payload.current.temperature.is_some());
    }

    #[tokio::test]
    async fn missing_current_is_incomplete_data() {
        let mut body = full_body();
        body.as_object_mut().unwrap().remove("current");

        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/api/weather/location")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let err = client_for(&server)
            .fetch_weather(&Query::City("London".to_string()))
            .await
            .unwrap_err();

        assert_eq!(err, FetchError::IncompleteData);
    }

    #[tokio::test]
    async fn undecodable_success_body_is_incomplete_data() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/api/weather/location")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("not json at all")
            .create_async()
            .await;

        let err = client_for(&server)
            .fetch_weather(&Query::City("London".to_string()))
            .await
            .unwrap_err();

        assert_eq!(err, FetchError::IncompleteData);
    }

    #[tokio::test]
    async fn server_error_uses_body_message() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/api/weather/location")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"message": "city not found"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .fetch_weather(&Query::City("Nowhere".to_string()))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            FetchError::ServerError {
                status: 404,
                message: "city not found".to_string()
            }
        );
        assert_eq!(err.to_string(), "Error 404: city not found");
    }

    #[tokio::test]
    async fn server_error_without_message_uses_status_reason() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/api/weather/location")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("")
            .create_async()
            .await;

        let err = client_for(&server)
            .fetch_weather(&Query::City("London".to_string()))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            FetchError::ServerError {
                status: 500,
                message: "Internal Server Error".to_string()
            }
        );
    }

    #[tokio::test]
    async fn unreachable_backend_maps_to_network_error() {
        // Nothing listens on this port.
        let client =
            WeatherClient::new("http://127.0.0.1:9", Duration::from_secs(2)).expect("client");

        let err = client
            .fetch_weather(&Query::City("London".to_string()))
            .await
            .unwrap_err();

        assert_eq!(err, FetchError::NetworkUnreachable);
    }
}
