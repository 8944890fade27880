//! Dashboard controller state.
//!
//! `DashboardState` is the single owner of the form fields, the loading flag,
//! the last fetch outcome and the table position. Surfaces mutate it only
//! through the transitions below and render from `page()` / `chart()`.

use tracing::{debug, info, warn};

use crate::fetch_error::FetchError;
use crate::models::{DailySeries, Query};
use crate::services::chart_service::{project_chart, ChartData};
use crate::services::table_service::{self, paginate, Page, PaginationParams, RowsPerPage};
use crate::services::WeatherService;
use crate::validation::{QueryForm, ValidationErrors};

/// Why a submit was refused before reaching the network
#[derive(Debug, thiserror::Error)]
pub enum SubmitRejected {
    #[error("A request is already in progress")]
    InFlight,
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    form: QueryForm,
    loading: bool,
    series: Option<DailySeries>,
    error: Option<String>,
    pagination: PaginationParams,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_form(form: QueryForm) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    // Field edits are accepted even while a request is outstanding

    pub fn set_latitude(&mut self, value: impl Into<String>) {
        self.form.latitude = value.into();
    }

    pub fn set_longitude(&mut self, value: impl Into<String>) {
        self.form.longitude = value.into();
    }

    pub fn set_start_date(&mut self, value: impl Into<String>) {
        self.form.start_date = value.into();
    }

    pub fn set_end_date(&mut self, value: impl Into<String>) {
        self.form.end_date = value.into();
    }

    pub fn form(&self) -> &QueryForm {
        &self.form
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn series(&self) -> Option<&DailySeries> {
        self.series.as_ref()
    }

    /// Banner text of the last failed fetch
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn pagination(&self) -> PaginationParams {
        self.pagination
    }

    /// Inline messages for the current field values
    pub fn field_errors(&self) -> Option<ValidationErrors> {
        self.form.validate().err()
    }

    pub fn can_submit(&self) -> bool {
        !self.loading && self.form.is_submittable()
    }

    /// Enter the loading state and hand back the query to fetch.
    ///
    /// Any previous result or error is discarded and the table goes back to
    /// page 1.
    pub fn begin_submit(&mut self) -> Result<Query, SubmitRejected> {
        if self.loading {
            warn!("Submit ignored: a request is already in progress");
            return Err(SubmitRejected::InFlight);
        }
        let query = self.form.validate()?;

        debug!("Submitting query {:?}", query);
        self.loading = true;
        self.series = None;
        self.error = None;
        self.pagination.page = 1;
        Ok(query)
    }

    /// Settle the outstanding request; exactly one of series/error is set
    pub fn finish_submit(&mut self, outcome: Result<DailySeries, FetchError>) {
        self.loading = false;
        match outcome {
            Ok(series) => {
                info!("Dashboard loaded {} days", series.len());
                self.series = Some(series);
                self.error = None;
            }
            Err(e) => {
                warn!("Dashboard fetch failed: {}", e);
                self.series = None;
                self.error = Some(e.to_string());
            }
        }
    }

    /// Validate, fetch and settle in one step
    pub async fn submit(&mut self, service: &WeatherService) -> Result<(), SubmitRejected> {
        let query = self.begin_submit()?;
        let outcome = service.load(&query).await;
        self.finish_submit(outcome);
        Ok(())
    }

    /// Drop the loaded data and any error, keeping the form as typed
    pub fn reset(&mut self) {
        self.series = None;
        self.error = None;
        self.pagination.page = 1;
    }

    pub fn total_pages(&self) -> u32 {
        table_service::total_pages(
            self.series.as_ref().map_or(0, DailySeries::len),
            self.pagination.rows_per_page,
        )
    }

    pub fn next_page(&mut self) {
        if self.pagination.page < self.total_pages() {
            self.pagination.page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        if self.pagination.page > 1 {
            self.pagination.page -= 1;
        }
    }

    /// Jump to a page; out-of-range requests are pinned to the valid range
    pub fn go_to_page(&mut self, page: u32) {
        let total_rows = self.series.as_ref().map_or(0, DailySeries::len);
        self.pagination = PaginationParams::new(page, self.pagination.rows_per_page)
            .clamped(total_rows);
    }

    pub fn set_rows_per_page(&mut self, rows_per_page: RowsPerPage) {
        self.pagination = PaginationParams::new(1, rows_per_page);
    }

    pub fn page(&self) -> Page {
        paginate(self.series.as_ref(), &self.pagination)
    }

    pub fn chart(&self) -> Option<ChartData> {
        self.series.as_ref().map(project_chart)
    }
}
