//! Input validation for the query form
//!
//! The predicates are pure and deterministic. `QueryForm::validate` is the
//! submit gate: a `Query` only exists once every field has passed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Query;

/// Longest allowed distance between start and end date, in days
pub const MAX_RANGE_DAYS: i64 = 30;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn is_valid_latitude(latitude: f64) -> bool {
    latitude.is_finite() && (-90.0..=90.0).contains(&latitude)
}

pub fn is_valid_longitude(longitude: f64) -> bool {
    longitude.is_finite() && (-180.0..=180.0).contains(&longitude)
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

pub fn is_valid_date(value: &str) -> bool {
    parse_date(value).is_some()
}

/// Both dates parse, start is not after end, and the span is at most
/// `MAX_RANGE_DAYS` calendar days
pub fn is_valid_range(start: &str, end: &str) -> bool {
    match (parse_date(start), parse_date(end)) {
        (Some(start), Some(end)) => range_error(start, end).is_none(),
        _ => false,
    }
}

fn range_error(start: NaiveDate, end: NaiveDate) -> Option<&'static str> {
    if start > end {
        Some("Start date must be on or before end date")
    } else if (end - start).num_days() > MAX_RANGE_DAYS {
        Some("Date range cannot exceed 30 days")
    } else {
        None
    }
}

/// Parse a coordinate field; rejects empty, NaN and infinite input
fn parse_coordinate(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Latitude,
    Longitude,
    StartDate,
    EndDate,
    Range,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema, thiserror::Error)]
#[error("{message}")]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    fn new(field: Field, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

/// Every field problem found in a single validation pass
#[derive(Debug, Clone, PartialEq, Eq, Default, thiserror::Error)]
#[error("Invalid query: {}", join_messages(.errors))]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn for_field(&self, field: Field) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Raw form fields as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QueryForm {
    pub latitude: String,
    pub longitude: String,
    pub start_date: String,
    pub end_date: String,
}

impl QueryForm {
    pub fn new(
        latitude: impl Into<String>,
        longitude: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }

    pub fn validate(&self) -> Result<Query, ValidationErrors> {
        let mut errors = Vec::new();

        let latitude = parse_coordinate(&self.latitude).filter(|v| is_valid_latitude(*v));
        if latitude.is_none() {
            errors.push(FieldError::new(
                Field::Latitude,
                "Latitude must be between -90 and 90",
            ));
        }

        let longitude = parse_coordinate(&self.longitude).filter(|v| is_valid_longitude(*v));
        if longitude.is_none() {
            errors.push(FieldError::new(
                Field::Longitude,
                "Longitude must be between -180 and 180",
            ));
        }

        let start_date = parse_date(&self.start_date);
        if start_date.is_none() {
            errors.push(FieldError::new(
                Field::StartDate,
                "Start date must be a valid date (YYYY-MM-DD)",
            ));
        }

        let end_date = parse_date(&self.end_date);
        if end_date.is_none() {
            errors.push(FieldError::new(
                Field::EndDate,
                "End date must be a valid date (YYYY-MM-DD)",
            ));
        }

        // Range is only meaningful once both dates parse
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if let Some(message) = range_error(start, end) {
                errors.push(FieldError::new(Field::Range, message));
            }
        }

        match (latitude, longitude, start_date, end_date) {
            (Some(latitude), Some(longitude), Some(start_date), Some(end_date))
                if errors.is_empty() =>
            {
                Ok(Query {
                    latitude,
                    longitude,
                    start_date,
                    end_date,
                })
            }
            _ => Err(ValidationErrors { errors }),
        }
    }

    pub fn is_submittable(&self) -> bool {
        self.validate().is_ok()
    }
}
