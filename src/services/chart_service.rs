use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{DailyMetric, DailySeries};
use crate::validation::DATE_FORMAT;

/// One line on the chart
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ChartSeries {
    pub metric: DailyMetric,
    pub label: String,
    /// Same length as the chart labels; `None` marks a gap
    pub values: Vec<Option<f64>>,
}

/// Chart-ready projection of a daily series
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub series: Vec<ChartSeries>,
    /// Renderers must draw across missing points instead of breaking the line
    pub span_gaps: bool,
}

impl ChartData {
    pub fn series_for(&self, metric: DailyMetric) -> Option<&ChartSeries> {
        self.series.iter().find(|s| s.metric == metric)
    }
}

pub fn project_chart(daily: &DailySeries) -> ChartData {
    let labels = daily
        .time
        .iter()
        .map(|d| d.format(DATE_FORMAT).to_string())
        .collect();

    let series = DailyMetric::ALL
        .iter()
        .map(|&metric| ChartSeries {
            metric,
            label: metric.label().to_string(),
            values: daily.values(metric).to_vec(),
        })
        .collect();

    ChartData {
        labels,
        series,
        span_gaps: true,
    }
}

/// Smallest and largest present value of a series, skipping gaps
pub fn value_range(series: &ChartSeries) -> Option<(f64, f64)> {
    series.values.iter().flatten().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series_with_gap() -> DailySeries {
        let time = (1..=4)
            .map(|d| NaiveDate::from_ymd_opt(2023, 1, d).unwrap())
            .collect();
        DailySeries {
            time,
            temperature_max: vec![Some(10.0), None, Some(12.5), Some(11.0)],
            temperature_min: vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)],
            temperature_mean: vec![None, None, None, None],
            apparent_temperature_max: vec![Some(8.0), Some(9.0), None, Some(7.5)],
            apparent_temperature_min: vec![Some(-1.0), Some(0.0), Some(1.0), Some(2.0)],
            apparent_temperature_mean: vec![Some(3.0), Some(4.0), Some(5.0), Some(6.0)],
        }
    }

    #[test]
    fn test_labels_are_formatted_dates() {
        let chart = project_chart(&series_with_gap());
        assert_eq!(
            chart.labels,
            vec!["2023-01-01", "2023-01-02", "2023-01-03", "2023-01-04"]
        );
    }

    #[test]
    fn test_gaps_keep_their_position() {
        let chart = project_chart(&series_with_gap());

        assert_eq!(chart.series.len(), 6);
        for series in &chart.series {
            assert_eq!(series.values.len(), chart.labels.len());
        }

        let max = chart.series_for(DailyMetric::TemperatureMax).unwrap();
        assert_eq!(max.values[1], None);
        assert_eq!(max.values[2], Some(12.5));
        assert!(chart.span_gaps);
    }

    #[test]
    fn test_series_order_and_labels() {
        let chart = project_chart(&series_with_gap());
        let metrics: Vec<_> = chart.series.iter().map(|s| s.metric).collect();
        assert_eq!(metrics, DailyMetric::ALL.to_vec());
        assert_eq!(chart.series[0].label, "Max Temperature");
    }

    #[test]
    fn test_empty_series() {
        let chart = project_chart(&DailySeries::default());
        assert!(chart.labels.is_empty());
        assert!(chart.series.iter().all(|s| s.values.is_empty()));
    }

    #[test]
    fn test_value_range_skips_gaps() {
        let chart = project_chart(&series_with_gap());
        let max = chart.series_for(DailyMetric::TemperatureMax).unwrap();
        assert_eq!(value_range(max), Some((10.0, 12.5)));

        let mean = chart.series_for(DailyMetric::TemperatureMean).unwrap();
        assert_eq!(value_range(mean), None);
    }
}
