pub mod chart_service;
pub mod table_service;
pub mod weather_service;

pub use chart_service::{project_chart, ChartData, ChartSeries};
pub use table_service::{paginate, Page, PaginationParams, RowsPerPage};
pub use weather_service::{DashboardView, WeatherService};
