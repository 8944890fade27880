use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::fetch_error::FetchError;
use crate::models::{DailyMetric, Row};
use crate::services::chart_service::{ChartData, ChartSeries};
use crate::services::table_service::{Page, PaginationParams, RowsPerPage, RowsPerPageError};
use crate::services::{DashboardView, WeatherService};
use crate::validation::{Field, FieldError, QueryForm, ValidationErrors};

#[derive(Clone)]
pub struct AppState {
    pub weather_service: WeatherService,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Form fields and table position as query parameters.
///
/// Fields are taken as raw text so bad input is reported per field rather
/// than rejected wholesale by the extractor.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DailyWeatherParams {
    /// Latitude in degrees, -90 to 90
    #[serde(default)]
    pub latitude: String,
    /// Longitude in degrees, -180 to 180
    #[serde(default)]
    pub longitude: String,
    /// First day, YYYY-MM-DD
    #[serde(default)]
    pub start_date: String,
    /// Last day, YYYY-MM-DD, at most 30 days after start_date
    #[serde(default)]
    pub end_date: String,
    /// 1-based table page, defaults to 1
    #[serde(default)]
    pub page: Option<String>,
    /// One of 10, 20, 50, defaults to 10
    #[serde(default)]
    pub rows_per_page: Option<String>,
}

impl DailyWeatherParams {
    fn pagination(&self) -> Result<PaginationParams, ApiError> {
        let page = match self.page.as_deref().map(str::trim) {
            None | Some("") => 1,
            Some(raw) => raw.parse::<u32>().map_err(|_| {
                ApiError::Pagination(format!("Page must be a positive whole number (got '{raw}')"))
            })?,
        };
        let rows_per_page = match self.rows_per_page.as_deref().map(str::trim) {
            None | Some("") => RowsPerPage::default(),
            Some(raw) => {
                let value = raw.parse::<u32>().map_err(|_| {
                    ApiError::Pagination(format!(
                        "Rows per page must be one of 10, 20 or 50 (got '{raw}')"
                    ))
                })?;
                RowsPerPage::try_from(value)?
            }
        };
        Ok(PaginationParams::new(page, rows_per_page))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub query: crate::models::Query,
    pub chart: ChartData,
    pub table: Page,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Per-field validation messages
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
    /// Status returned by the weather archive, when it answered at all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    RowsPerPage(#[from] RowsPerPageError),
    #[error("{0}")]
    Pagination(String),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: errors.to_string(),
                    fields: errors.errors,
                    upstream_status: None,
                },
            ),
            ApiError::RowsPerPage(e) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: e.to_string(),
                    fields: Vec::new(),
                    upstream_status: None,
                },
            ),
            ApiError::Pagination(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: message,
                    fields: Vec::new(),
                    upstream_status: None,
                },
            ),
            ApiError::Fetch(e) => (
                StatusCode::BAD_GATEWAY,
                ErrorResponse {
                    error: e.to_string(),
                    fields: Vec::new(),
                    upstream_status: e.status(),
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, get_daily_weather),
    components(schemas(
        HealthResponse,
        DashboardResponse,
        ErrorResponse,
        ChartData,
        ChartSeries,
        Page,
        Row,
        DailyMetric,
        FieldError,
        Field,
        crate::models::Query
    )),
    tags((name = "weather", description = "Historical daily weather dashboard"))
)]
pub struct ApiDoc;

pub fn generate_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health))
        .route("/weather/daily", get(get_daily_weather))
        .with_state(state);

    Router::new().nest("/api/v1", api_routes)
}

#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "weather"
)]
#[instrument(skip(_state))]
async fn health(State(_state): State<AppState>) -> impl IntoResponse {
    debug!("Health check requested");
    let response = HealthResponse {
        status: "healthy".to_string(),
    };
    (StatusCode::OK, Json(response))
}

#[utoipa::path(
    get,
    path = "/api/v1/weather/daily",
    params(DailyWeatherParams),
    responses(
        (status = 200, description = "Chart series and one table page", body = DashboardResponse),
        (status = 400, description = "Invalid query fields or page size", body = ErrorResponse),
        (status = 502, description = "Weather archive failed or returned no data", body = ErrorResponse)
    ),
    tag = "weather"
)]
#[instrument(skip(state))]
async fn get_daily_weather(
    State(state): State<AppState>,
    Query(params): Query<DailyWeatherParams>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let pagination = params.pagination();
    let form = QueryForm::new(
        params.latitude,
        params.longitude,
        params.start_date,
        params.end_date,
    );
    let query = form.validate().map_err(|e| {
        warn!("Rejected invalid query: {}", e);
        e
    })?;
    let pagination = pagination.map_err(|e| {
        warn!("Rejected invalid pagination: {}", e);
        e
    })?;

    let DashboardView { chart, table } = state
        .weather_service
        .load_view(&query, pagination)
        .await
        .map_err(|e| {
            error!("Failed to load daily weather: {}", e);
            e
        })?;

    info!(
        "Serving {} days (page {}/{}, {} rows)",
        table.total_rows,
        table.page,
        table.total_pages,
        table.rows.len()
    );

    Ok(Json(DashboardResponse {
        query,
        chart,
        table,
    }))
}
