use tracing::{debug, info, instrument, warn};

use crate::fetch_error::FetchError;
use crate::fetcher::WeatherArchiveFetcher;
use crate::models::{DailySeries, Query};
use crate::services::chart_service::{project_chart, ChartData};
use crate::services::table_service::{paginate, Page, PaginationParams};

/// Chart and table projections of one loaded series
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub chart: ChartData,
    pub table: Page,
}

impl DashboardView {
    /// Out-of-range pages are pinned to the nearest valid page
    pub fn build(daily: &DailySeries, params: PaginationParams) -> Self {
        let params = params.clamped(daily.len());
        Self {
            chart: project_chart(daily),
            table: paginate(Some(daily), &params),
        }
    }
}

#[derive(Clone)]
pub struct WeatherService {
    fetcher: WeatherArchiveFetcher,
}

impl WeatherService {
    pub fn new(fetcher: WeatherArchiveFetcher) -> Self {
        Self { fetcher }
    }

    /// Load the daily series for an already validated query
    #[instrument(skip(self))]
    pub async fn load(&self, query: &Query) -> Result<DailySeries, FetchError> {
        debug!(
            "Loading daily weather for ({}, {}) from {} to {}",
            query.latitude, query.longitude, query.start_date, query.end_date
        );

        match self.fetcher.fetch_daily_weather(query).await {
            Ok(daily) => {
                info!("Loaded {} days of weather data", daily.len());
                if daily.is_empty() {
                    warn!("Weather archive returned an empty daily series");
                }
                Ok(daily)
            }
            Err(e) => {
                warn!("Failed to load daily weather: {}", e);
                Err(e)
            }
        }
    }

    pub async fn load_view(
        &self,
        query: &Query,
        params: PaginationParams,
    ) -> Result<DashboardView, FetchError> {
        let daily = self.load(query).await?;
        Ok(DashboardView::build(&daily, params))
    }
}
