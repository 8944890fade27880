use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

/// Placeholder shown wherever a daily value is missing
pub const MISSING_VALUE_PLACEHOLDER: &str = "N/A";

/// Daily variables requested from the weather archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DailyMetric {
    #[serde(rename = "temperature_2m_max")]
    TemperatureMax,
    #[serde(rename = "temperature_2m_min")]
    TemperatureMin,
    #[serde(rename = "temperature_2m_mean")]
    TemperatureMean,
    ApparentTemperatureMax,
    ApparentTemperatureMin,
    ApparentTemperatureMean,
}

impl DailyMetric {
    /// Request order, also the column order of tables and charts
    pub const ALL: [DailyMetric; 6] = [
        DailyMetric::TemperatureMax,
        DailyMetric::TemperatureMin,
        DailyMetric::TemperatureMean,
        DailyMetric::ApparentTemperatureMax,
        DailyMetric::ApparentTemperatureMin,
        DailyMetric::ApparentTemperatureMean,
    ];

    /// Variable name used by the archive API
    pub fn api_name(&self) -> &'static str {
        match self {
            DailyMetric::TemperatureMax => "temperature_2m_max",
            DailyMetric::TemperatureMin => "temperature_2m_min",
            DailyMetric::TemperatureMean => "temperature_2m_mean",
            DailyMetric::ApparentTemperatureMax => "apparent_temperature_max",
            DailyMetric::ApparentTemperatureMin => "apparent_temperature_min",
            DailyMetric::ApparentTemperatureMean => "apparent_temperature_mean",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DailyMetric::TemperatureMax => "Max Temperature",
            DailyMetric::TemperatureMin => "Min Temperature",
            DailyMetric::TemperatureMean => "Mean Temperature",
            DailyMetric::ApparentTemperatureMax => "Max Apparent Temperature",
            DailyMetric::ApparentTemperatureMin => "Min Apparent Temperature",
            DailyMetric::ApparentTemperatureMean => "Mean Apparent Temperature",
        }
    }

    /// Comma-joined list for the `daily` query parameter
    pub fn request_list() -> String {
        Self::ALL
            .iter()
            .map(|m| m.api_name())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// A validated request for daily weather at one location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Query {
    pub latitude: f64,
    pub longitude: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Parallel daily arrays returned by a successful fetch.
///
/// Every vector has the same length and index `i` refers to the same
/// calendar day in all of them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, ToSchema)]
pub struct DailySeries {
    pub time: Vec<NaiveDate>,
    pub temperature_max: Vec<Option<f64>>,
    pub temperature_min: Vec<Option<f64>>,
    pub temperature_mean: Vec<Option<f64>>,
    pub apparent_temperature_max: Vec<Option<f64>>,
    pub apparent_temperature_min: Vec<Option<f64>>,
    pub apparent_temperature_mean: Vec<Option<f64>>,
}

impl DailySeries {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn values(&self, metric: DailyMetric) -> &[Option<f64>] {
        match metric {
            DailyMetric::TemperatureMax => &self.temperature_max,
            DailyMetric::TemperatureMin => &self.temperature_min,
            DailyMetric::TemperatureMean => &self.temperature_mean,
            DailyMetric::ApparentTemperatureMax => &self.apparent_temperature_max,
            DailyMetric::ApparentTemperatureMin => &self.apparent_temperature_min,
            DailyMetric::ApparentTemperatureMean => &self.apparent_temperature_mean,
        }
    }

    /// Denormalized view of one day
    pub fn row(&self, index: usize) -> Option<Row> {
        let date = *self.time.get(index)?;
        let at = |values: &[Option<f64>]| values.get(index).copied().flatten();

        Some(Row {
            date,
            temperature_max: at(&self.temperature_max),
            temperature_min: at(&self.temperature_min),
            temperature_mean: at(&self.temperature_mean),
            apparent_temperature_max: at(&self.apparent_temperature_max),
            apparent_temperature_min: at(&self.apparent_temperature_min),
            apparent_temperature_mean: at(&self.apparent_temperature_mean),
        })
    }
}

/// One table row: a date and its six metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Row {
    pub date: NaiveDate,
    pub temperature_max: Option<f64>,
    pub temperature_min: Option<f64>,
    pub temperature_mean: Option<f64>,
    pub apparent_temperature_max: Option<f64>,
    pub apparent_temperature_min: Option<f64>,
    pub apparent_temperature_mean: Option<f64>,
}

impl Row {
    pub fn value(&self, metric: DailyMetric) -> Option<f64> {
        match metric {
            DailyMetric::TemperatureMax => self.temperature_max,
            DailyMetric::TemperatureMin => self.temperature_min,
            DailyMetric::TemperatureMean => self.temperature_mean,
            DailyMetric::ApparentTemperatureMax => self.apparent_temperature_max,
            DailyMetric::ApparentTemperatureMin => self.apparent_temperature_min,
            DailyMetric::ApparentTemperatureMean => self.apparent_temperature_mean,
        }
    }

    /// Cell text for a metric, with the placeholder for missing values
    pub fn display_value(&self, metric: DailyMetric) -> String {
        match self.value(metric) {
            Some(v) => format!("{v:.1}"),
            None => MISSING_VALUE_PLACEHOLDER.to_string(),
        }
    }
}
