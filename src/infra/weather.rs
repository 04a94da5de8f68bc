//! Open-Meteo archive and forecast lookups.

use reqwest::{Client, Url};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use time::Date;
use tracing::debug;

use crate::config::AppConfig;
use crate::domain::weather::archive_window;
use crate::domain::{Coordinates, DailyWeather, HourlyTemperature, TodayWeather, WeatherReport};
use crate::infra::http::build_client;
use crate::infra::market::format_query_date;

const ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";
const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
const ARCHIVE_DAILY: &str = "temperature_2m_max,temperature_2m_min,precipitation_sum";
const FORECAST_HOURLY: &str =
    "temperature_2m,relative_humidity_2m,precipitation,wind_speed_10m,wind_direction_10m";
const FORECAST_DAILY: &str =
    "temperature_2m_max,temperature_2m_min,precipitation_sum,relative_humidity_2m_mean";
const HOURLY_POINTS: usize = 24;

#[derive(Debug, Error)]
pub enum WeatherClientError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("could not format date: {0}")]
    Date(#[from] time::error::Format),
}

#[derive(Clone)]
pub struct WeatherClient {
    http: Client,
    archive_url: Url,
    forecast_url: Url,
    timezone: String,
}

impl WeatherClient {
    pub fn new(config: &AppConfig) -> Result<Self, WeatherClientError> {
        Ok(Self {
            http: build_client(config.request_timeout)?,
            archive_url: Url::parse(ARCHIVE_URL)?,
            forecast_url: Url::parse(FORECAST_URL)?,
            timezone: config.weather_timezone.clone(),
        })
    }

    /// Fetches the past week and the forecast in parallel and merges them.
    pub async fn report(
        &self,
        at: Coordinates,
        today: Date,
    ) -> Result<WeatherReport, WeatherClientError> {
        let archive_url = self.archive_request(at, today)?;
        let forecast_url = self.forecast_request(at);
        let (archive, forecast) = tokio::try_join!(
            self.fetch::<ArchiveDto>(archive_url),
            self.fetch::<ForecastDto>(forecast_url)
        )?;
        Ok(build_report(archive, forecast))
    }

    fn archive_request(&self, at: Coordinates, today: Date) -> Result<Url, WeatherClientError> {
        let (start, end) = archive_window(today);
        let mut url = self.archive_url.clone();
        url.query_pairs_mut()
            .append_pair("latitude", &at.latitude.to_string())
            .append_pair("longitude", &at.longitude.to_string())
            .append_pair("start_date", &format_query_date(start)?)
            .append_pair("end_date", &format_query_date(end)?)
            .append_pair("daily", ARCHIVE_DAILY)
            .append_pair("timezone", "auto");
        Ok(url)
    }

    fn forecast_request(&self, at: Coordinates) -> Url {
        let mut url = self.forecast_url.clone();
        url.query_pairs_mut()
            .append_pair("latitude", &at.latitude.to_string())
            .append_pair("longitude", &at.longitude.to_string())
            .append_pair("hourly", FORECAST_HOURLY)
            .append_pair("daily", FORECAST_DAILY)
            .append_pair("timezone", &self.timezone);
        url
    }

    async fn fetch<T>(&self, url: Url) -> Result<T, WeatherClientError>
    where
        T: DeserializeOwned,
    {
        debug!(%url, "requesting weather data");
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ArchiveDto {
    #[serde(default)]
    daily: DailyDto,
}

#[derive(Debug, Default, Deserialize)]
struct ForecastDto {
    #[serde(default)]
    daily: DailyDto,
    #[serde(default)]
    hourly: HourlyDto,
}

#[derive(Debug, Default, Deserialize)]
struct DailyDto {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_sum: Vec<Option<f64>>,
    #[serde(default)]
    relative_humidity_2m_mean: Vec<Option<f64>>,
}

#[derive(Debug, Default, Deserialize)]
struct HourlyDto {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    wind_speed_10m: Vec<Option<f64>>,
}

fn value_at(values: &[Option<f64>], index: usize) -> Option<f64> {
    values.get(index).copied().flatten()
}

impl DailyDto {
    /// Days with both temperatures present; missing rainfall counts as dry.
    fn days(&self) -> Vec<DailyWeather> {
        self.time
            .iter()
            .enumerate()
            .filter_map(|(index, date)| {
                Some(DailyWeather {
                    date: date.clone(),
                    max_temp: value_at(&self.temperature_2m_max, index)?,
                    min_temp: value_at(&self.temperature_2m_min, index)?,
                    rain_mm: value_at(&self.precipitation_sum, index).unwrap_or(0.0),
                })
            })
            .collect()
    }
}

fn build_report(archive: ArchiveDto, forecast: ForecastDto) -> WeatherReport {
    let today = forecast.daily.days().into_iter().next().map(|day| TodayWeather {
        date: day.date,
        max_temp: day.max_temp,
        min_temp: day.min_temp,
        rain_mm: day.rain_mm,
        humidity_pct: value_at(&forecast.daily.relative_humidity_2m_mean, 0),
        wind_kmh: value_at(&forecast.hourly.wind_speed_10m, 0),
    });

    let hourly = forecast
        .hourly
        .time
        .iter()
        .enumerate()
        .take(HOURLY_POINTS)
        .filter_map(|(index, stamp)| {
            Some(HourlyTemperature {
                time: clock_time(stamp),
                celsius: value_at(&forecast.hourly.temperature_2m, index)?,
            })
        })
        .collect();

    WeatherReport {
        past_days: archive.daily.days(),
        today,
        hourly,
    }
}

/// `2025-09-16T07:00` -> `07:00`.
fn clock_time(stamp: &str) -> String {
    stamp
        .split_once('T')
        .map(|(_, clock)| clock.chars().take(5).collect())
        .unwrap_or_else(|| stamp.to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::date;

    use super::*;

    #[test]
    fn archive_request_covers_last_week() {
        let client = WeatherClient::new(&AppConfig::default()).unwrap();
        let url = client
            .archive_request(Coordinates::new(30.9, 75.85).unwrap(), date!(2025 - 09 - 16))
            .unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("start_date".into(), "2025-09-09".into())));
        assert!(pairs.contains(&("end_date".into(), "2025-09-15".into())));
        assert!(pairs.contains(&("latitude".into(), "30.9".into())));
    }

    #[test]
    fn forecast_request_uses_configured_timezone() {
        let client = WeatherClient::new(&AppConfig::default()).unwrap();
        let url = client.forecast_request(Coordinates::default());
        assert!(url
            .query_pairs()
            .any(|(key, value)| key == "timezone" && value == "Asia/Kolkata"));
    }

    #[test]
    fn report_merges_archive_and_forecast() {
        let archive: ArchiveDto = serde_json::from_value(json!({
            "daily": {
                "time": ["2025-09-14", "2025-09-15", "2025-09-16"],
                "temperature_2m_max": [31.2, 36.4, null],
                "temperature_2m_min": [22.0, 25.1, 24.0],
                "precipitation_sum": [1.5, null, 0.0]
            }
        }))
        .unwrap();
        let hours: Vec<String> = (0..30).map(|h| format!("2025-09-16T{:02}:00", h % 24)).collect();
        let temps: Vec<f64> = (0..30).map(|h| 20.0 + h as f64 / 2.0).collect();
        let forecast: ForecastDto = serde_json::from_value(json!({
            "daily": {
                "time": ["2025-09-16", "2025-09-17"],
                "temperature_2m_max": [33.0, 34.0],
                "temperature_2m_min": [24.0, 23.5],
                "precipitation_sum": [6.2, 0.0],
                "relative_humidity_2m_mean": [71.0, 65.0]
            },
            "hourly": {
                "time": hours,
                "temperature_2m": temps,
                "wind_speed_10m": [9.4]
            }
        }))
        .unwrap();

        let report = build_report(archive, forecast);

        assert_eq!(report.past_days.len(), 2);
        assert_eq!(report.past_days[1].rain_mm, 0.0);
        let today = report.today.unwrap();
        assert_eq!(today.date, "2025-09-16");
        assert_eq!(today.humidity_pct, Some(71.0));
        assert_eq!(today.wind_kmh, Some(9.4));
        assert_eq!(today.rain_note(), "Reduce irrigation");
        assert_eq!(report.hourly.len(), 24);
        assert_eq!(report.hourly[7].time, "07:00");
    }

    #[test]
    fn empty_forecast_has_no_today() {
        let report = build_report(ArchiveDto::default(), ForecastDto::default());
        assert!(report.today.is_none());
        assert!(report.hourly.is_empty());
    }
}
