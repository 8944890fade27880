use clap::{Parser, ValueEnum};
use tracing::{debug, info};

use weather_dashboard::dashboard::DashboardState;
use weather_dashboard::fetcher::{WeatherArchiveFetcher, DEFAULT_ARCHIVE_URL};
use weather_dashboard::render::{render_chart_summary, render_table};
use weather_dashboard::services::{RowsPerPage, WeatherService};
use weather_dashboard::validation::QueryForm;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Parser)]
#[command(name = "weather-cli")]
#[command(about = "Show historical daily temperatures for a location", long_about = None)]
struct Cli {
    /// Latitude in degrees (-90 to 90)
    #[arg(long, allow_hyphen_values = true)]
    latitude: String,

    /// Longitude in degrees (-180 to 180)
    #[arg(long, allow_hyphen_values = true)]
    longitude: String,

    /// First day (YYYY-MM-DD)
    #[arg(long)]
    start_date: String,

    /// Last day (YYYY-MM-DD), at most 30 days after the start date
    #[arg(long)]
    end_date: String,

    /// Table rows per page: 10, 20 or 50
    #[arg(long, default_value = "10")]
    rows_per_page: u32,

    /// Table page to show (1-based)
    #[arg(long, default_value = "1")]
    page: u32,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Weather archive endpoint
    #[arg(long, env = "WEATHER_ARCHIVE_URL", default_value = DEFAULT_ARCHIVE_URL)]
    archive_url: String,

    /// HTTP timeout in seconds
    #[arg(long, env = "HTTP_TIMEOUT_SECONDS", default_value = "30")]
    timeout_seconds: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so the table output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let rows_per_page = RowsPerPage::try_from(cli.rows_per_page)?;
    let mut state = DashboardState::with_form(QueryForm::new(
        cli.latitude,
        cli.longitude,
        cli.start_date,
        cli.end_date,
    ));
    state.set_rows_per_page(rows_per_page);

    if let Some(errors) = state.field_errors() {
        for error in &errors.errors {
            eprintln!("{}", error.message);
        }
        std::process::exit(2);
    }

    let fetcher = WeatherArchiveFetcher::with_timeout(
        cli.archive_url,
        std::time::Duration::from_secs(cli.timeout_seconds),
    )?;
    let service = WeatherService::new(fetcher);

    info!("Fetching daily weather");
    state.submit(&service).await?;

    if let Some(banner) = state.error() {
        eprintln!("{banner}");
        std::process::exit(1);
    }

    state.go_to_page(cli.page);
    debug!("Showing page {} of {}", state.pagination().page, state.total_pages());

    let page = state.page();
    let Some(chart) = state.chart() else {
        return Err("No data loaded".into());
    };

    match cli.format {
        OutputFormat::Table => {
            print!("{}", render_chart_summary(&chart));
            println!();
            print!("{}", render_table(&page));
        }
        OutputFormat::Json => {
            let output = serde_json::json!({ "chart": chart, "table": page });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
