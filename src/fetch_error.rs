/// Failure of a single fetch cycle.
///
/// The display text is shown to the user as-is in the page-level banner.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("{}", network_message(.status, .message))]
    Network {
        status: Option<u16>,
        message: String,
    },
    #[error("No weather data available: {0}")]
    DataUnavailable(String),
}

fn network_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(status) => format!("Network error (status {status}): {message}"),
        None => format!("Network error: {message}"),
    }
}

impl FetchError {
    /// HTTP status reported by the archive, if a response arrived at all
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Network { status, .. } => *status,
            FetchError::DataUnavailable(_) => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}
