//! Plain-text rendering of the dashboard for terminals

use std::fmt::Write;

use crate::models::DailyMetric;
use crate::services::chart_service::{value_range, ChartData};
use crate::services::table_service::Page;
use crate::validation::DATE_FORMAT;

const DATE_WIDTH: usize = 10;
const VALUE_WIDTH: usize = 10;

fn header_label(metric: DailyMetric) -> &'static str {
    match metric {
        DailyMetric::TemperatureMax => "Max",
        DailyMetric::TemperatureMin => "Min",
        DailyMetric::TemperatureMean => "Mean",
        DailyMetric::ApparentTemperatureMax => "App. Max",
        DailyMetric::ApparentTemperatureMin => "App. Min",
        DailyMetric::ApparentTemperatureMean => "App. Mean",
    }
}

/// Table of the page's rows followed by a `Page X of Y` footer
pub fn render_table(page: &Page) -> String {
    let mut out = String::new();

    let _ = write!(out, "{:<DATE_WIDTH$}", "Date");
    for metric in DailyMetric::ALL {
        let _ = write!(out, " {:>VALUE_WIDTH$}", header_label(metric));
    }
    out.push('\n');
    out.push_str(&"-".repeat(DATE_WIDTH + DailyMetric::ALL.len() * (VALUE_WIDTH + 1)));
    out.push('\n');

    if page.rows.is_empty() {
        out.push_str("No data\n");
    }
    for row in &page.rows {
        let _ = write!(out, "{:<DATE_WIDTH$}", row.date.format(DATE_FORMAT).to_string());
        for metric in DailyMetric::ALL {
            let _ = write!(out, " {:>VALUE_WIDTH$}", row.display_value(metric));
        }
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "Page {} of {} ({} rows, {} per page)",
        page.page,
        page.total_pages,
        page.total_rows,
        page.rows_per_page.get()
    );
    out
}

/// One line per chart series with its observed range and gap count
pub fn render_chart_summary(chart: &ChartData) -> String {
    let mut out = String::new();
    let first = chart.labels.first().map(String::as_str).unwrap_or("-");
    let last = chart.labels.last().map(String::as_str).unwrap_or("-");
    let _ = writeln!(out, "{} days, {} to {}", chart.labels.len(), first, last);

    for series in &chart.series {
        let gaps = series.values.iter().filter(|v| v.is_none()).count();
        match value_range(series) {
            Some((lo, hi)) => {
                let _ = write!(out, "{:<26} {lo:>6.1} .. {hi:>6.1}", series.label);
            }
            None => {
                let _ = write!(out, "{:<26} {:>16}", series.label, "no data");
            }
        }
        if gaps > 0 {
            let _ = write!(out, "  ({gaps} missing)");
        }
        out.push('\n');
    }
    out
}
