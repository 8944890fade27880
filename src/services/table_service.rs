use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{DailySeries, Row};

/// Page sizes offered by the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum RowsPerPage {
    #[default]
    Ten,
    Twenty,
    Fifty,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Rows per page must be one of 10, 20 or 50 (got {0})")]
pub struct RowsPerPageError(pub u32);

impl RowsPerPage {
    pub const ALL: [RowsPerPage; 3] = [RowsPerPage::Ten, RowsPerPage::Twenty, RowsPerPage::Fifty];

    pub fn get(self) -> usize {
        match self {
            RowsPerPage::Ten => 10,
            RowsPerPage::Twenty => 20,
            RowsPerPage::Fifty => 50,
        }
    }
}

impl TryFrom<u32> for RowsPerPage {
    type Error = RowsPerPageError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            10 => Ok(RowsPerPage::Ten),
            20 => Ok(RowsPerPage::Twenty),
            50 => Ok(RowsPerPage::Fifty),
            other => Err(RowsPerPageError(other)),
        }
    }
}

impl From<RowsPerPage> for u32 {
    fn from(value: RowsPerPage) -> Self {
        value.get() as u32
    }
}

/// Current table position; `page` is 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationParams {
    pub page: u32,
    pub rows_per_page: RowsPerPage,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            rows_per_page: RowsPerPage::default(),
        }
    }
}

impl PaginationParams {
    pub fn new(page: u32, rows_per_page: RowsPerPage) -> Self {
        Self {
            page: page.max(1),
            rows_per_page,
        }
    }

    pub fn offset(&self) -> usize {
        (self.page.max(1) as usize - 1) * self.rows_per_page.get()
    }

    pub fn limit(&self) -> usize {
        self.rows_per_page.get()
    }

    /// Pin the page into `[1, total_pages]` (page 1 when there is nothing to show)
    pub fn clamped(self, total_rows: usize) -> Self {
        let last = total_pages(total_rows, self.rows_per_page).max(1);
        Self {
            page: self.page.clamp(1, last),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Page {
    pub total_rows: usize,
    pub page: u32,
    #[schema(value_type = u32, example = 10)]
    pub rows_per_page: RowsPerPage,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub rows: Vec<Row>,
}

pub fn total_pages(total_rows: usize, rows_per_page: RowsPerPage) -> u32 {
    total_rows.div_ceil(rows_per_page.get()) as u32
}

/// Slice `[offset, min(offset + limit, total))` of the series as table rows.
///
/// With no series loaded the page is empty and `total_pages` is 0.
pub fn paginate(daily: Option<&DailySeries>, params: &PaginationParams) -> Page {
    let total_rows = daily.map_or(0, DailySeries::len);
    let total_pages = total_pages(total_rows, params.rows_per_page);

    let start = params.offset().min(total_rows);
    let end = (start + params.limit()).min(total_rows);
    let rows = daily
        .map(|d| (start..end).filter_map(|i| d.row(i)).collect())
        .unwrap_or_default();

    Page {
        total_rows,
        page: params.page,
        rows_per_page: params.rows_per_page,
        total_pages,
        has_next_page: params.page < total_pages,
        has_prev_page: params.page > 1,
        rows,
    }
}
