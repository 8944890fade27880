use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, error, instrument, warn};

use crate::fetch_error::FetchError;
use crate::models::{DailyMetric, DailySeries, Query};
use crate::validation::DATE_FORMAT;

pub const DEFAULT_ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    daily: Option<ArchiveDaily>,
}

#[derive(Debug, Deserialize)]
struct ArchiveDaily {
    time: Option<Vec<String>>,
    temperature_2m_max: Option<Vec<Option<f64>>>,
    temperature_2m_min: Option<Vec<Option<f64>>>,
    temperature_2m_mean: Option<Vec<Option<f64>>>,
    apparent_temperature_max: Option<Vec<Option<f64>>>,
    apparent_temperature_min: Option<Vec<Option<f64>>>,
    apparent_temperature_mean: Option<Vec<Option<f64>>>,
}

/// Error body the archive sends alongside 4xx responses
#[derive(Debug, Deserialize)]
struct ArchiveErrorBody {
    reason: String,
}

#[derive(Clone)]
pub struct WeatherArchiveFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl WeatherArchiveFetcher {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn with_timeout(base_url: String, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Single attempt at loading the daily series for a query; no retries
    #[instrument(skip(self), fields(url = %self.base_url))]
    pub async fn fetch_daily_weather(&self, query: &Query) -> Result<DailySeries, FetchError> {
        let start_date = query.start_date.format(DATE_FORMAT).to_string();
        let end_date = query.end_date.format(DATE_FORMAT).to_string();
        let params = [
            ("latitude", query.latitude.to_string()),
            ("longitude", query.longitude.to_string()),
            ("start_date", start_date),
            ("end_date", end_date),
            ("daily", DailyMetric::request_list()),
            ("timezone", "auto".to_string()),
        ];

        debug!("Sending HTTP request to weather archive");
        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                error!("Weather archive request failed: {}", e);
                FetchError::from(e)
            })?;

        let status = response.status();
        debug!("Received HTTP response with status: {}", status);

        if !status.is_success() {
            // Unreadable error body still reports the status
            let body = response.text().await.unwrap_or_default();
            let message = error_message(status, &body);
            warn!("Weather archive returned status {}: {}", status, message);
            return Err(FetchError::Network {
                status: Some(status.as_u16()),
                message,
            });
        }

        let body = response.text().await?;
        debug!("Retrieved response body, size: {} bytes", body.len());

        parse_daily_series(&body)
    }
}

/// The archive's `reason` text when the error body carries one, otherwise
/// the HTTP reason phrase.
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<ArchiveErrorBody>(body)
        .map(|b| b.reason)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        })
}

impl Default for WeatherArchiveFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_ARCHIVE_URL.to_string())
    }
}

/// Build a `DailySeries` from an archive response body.
///
/// Values are copied verbatim, nulls included. A metric the archive left out
/// becomes an all-null column so the arrays stay parallel.
#[instrument(skip(body), fields(body_size = body.len()))]
pub fn parse_daily_series(body: &str) -> Result<DailySeries, FetchError> {
    let response: ArchiveResponse = serde_json::from_str(body).map_err(|e| {
        error!("Failed to decode weather archive response: {}", e);
        FetchError::DataUnavailable(format!("malformed response: {e}"))
    })?;

    let daily = response
        .daily
        .ok_or_else(|| FetchError::DataUnavailable("response has no daily series".to_string()))?;

    let raw_time = daily
        .time
        .ok_or_else(|| FetchError::DataUnavailable("daily series has no time array".to_string()))?;

    let time = raw_time
        .iter()
        .map(|t| {
            NaiveDate::parse_from_str(t, DATE_FORMAT).map_err(|_| {
                FetchError::DataUnavailable(format!("unrecognized date '{t}' in time array"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let len = time.len();
    let column = |metric: DailyMetric, values: Option<Vec<Option<f64>>>| match values {
        Some(values) if values.len() == len => Ok(values),
        Some(values) => Err(FetchError::DataUnavailable(format!(
            "{} has {} values but time has {}",
            metric.api_name(),
            values.len(),
            len
        ))),
        None => {
            warn!("Response is missing {}, treating as empty", metric.api_name());
            Ok(vec![None; len])
        }
    };

    let series = DailySeries {
        temperature_max: column(DailyMetric::TemperatureMax, daily.temperature_2m_max)?,
        temperature_min: column(DailyMetric::TemperatureMin, daily.temperature_2m_min)?,
        temperature_mean: column(DailyMetric::TemperatureMean, daily.temperature_2m_mean)?,
        apparent_temperature_max: column(
            DailyMetric::ApparentTemperatureMax,
            daily.apparent_temperature_max,
        )?,
        apparent_temperature_min: column(
            DailyMetric::ApparentTemperatureMin,
            daily.apparent_temperature_min,
        )?,
        apparent_temperature_mean: column(
            DailyMetric::ApparentTemperatureMean,
            daily.apparent_temperature_mean,
        )?,
        time,
    };

    debug!("Parsed daily series with {} days", series.len());
    Ok(series)
}
