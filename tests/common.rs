// Shared fixtures for tests that stand up a mock weather archive

use chrono::{Duration, NaiveDate};
use serde_json::{json, Value};

pub const ARCHIVE_PATH: &str = "/v1/archive";

/// Archive response body for `days` consecutive days starting at `start`.
///
/// Every value whose index is in `null_at` is null across all metrics.
pub fn daily_payload(start: NaiveDate, days: usize, null_at: &[usize]) -> Value {
    let time: Vec<String> = (0..days)
        .map(|i| (start + Duration::days(i as i64)).format("%Y-%m-%d").to_string())
        .collect();
    let column = |offset: f64| -> Vec<Value> {
        (0..days)
            .map(|i| {
                if null_at.contains(&i) {
                    Value::Null
                } else {
                    json!(offset + i as f64 / 10.0)
                }
            })
            .collect()
    };

    json!({
        "latitude": 40.710335,
        "longitude": -73.99307,
        "timezone": "America/New_York",
        "daily_units": {
            "time": "iso8601",
            "temperature_2m_max": "°C"
        },
        "daily": {
            "time": time,
            "temperature_2m_max": column(10.0),
            "temperature_2m_min": column(2.0),
            "temperature_2m_mean": column(6.0),
            "apparent_temperature_max": column(8.0),
            "apparent_temperature_min": column(-1.0),
            "apparent_temperature_mean": column(3.5),
        }
    })
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
