//! Raw form input and its parsing into a TripRequest
//!
//! The form mirrors what a user types: every field is a string. Parsing applies
//! only the constraints a native form control would (required text fields,
//! well-formed dates, minimum budget and traveler count) and otherwise passes
//! values through.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

use super::trip::TripRequest;

/// Date format accepted by the start/end date fields
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors raised when a form field violates its input constraint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{field} must be a date in YYYY-MM-DD form, got '{value}'")]
    InvalidDate { field: &'static str, value: String },

    #[error("{field} must be at least {min}, got '{value}'")]
    OutOfRange {
        field: &'static str,
        min: &'static str,
        value: String,
    },
}

/// Options that change how form values are interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormOptions {
    /// Drop empty tokens produced by stray commas in the interests field
    pub drop_empty_interests: bool,
}

/// Raw values of the trip form, exactly as entered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripForm {
    pub source: String,
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    pub budget: String,
    pub travelers: String,
    pub interests: String,
    pub include_flights: bool,
}

impl TripForm {
    /// Build a fresh TripRequest from the current field values
    pub fn parse(&self, options: FormOptions) -> Result<TripRequest, FormError> {
        debug!(?options, "TripForm::parse: called");
        let source = required("source", &self.source)?;
        let destination = required("destination", &self.destination)?;
        let start_date = date("start date", &self.start_date)?;
        let end_date = date("end date", &self.end_date)?;

        let budget = self.budget.trim().parse::<f64>().ok();
        match budget {
            None => debug!(budget = %self.budget, "TripForm::parse: budget is not numeric, forwarding as absent"),
            Some(b) if b.is_nan() || b < 0.0 => return Err(out_of_range("budget", "0", &self.budget)),
            Some(_) => {}
        }

        let travelers = self.travelers.trim().parse::<i64>().ok();
        match travelers {
            None => debug!(travelers = %self.travelers, "TripForm::parse: traveler count is not an integer, forwarding as absent"),
            Some(t) if t < 1 => return Err(out_of_range("travelers", "1", &self.travelers)),
            Some(_) => {}
        }

        let mut interests = parse_interests(&self.interests);
        if options.drop_empty_interests {
            interests.retain(|i| !i.is_empty());
        }

        Ok(TripRequest {
            source,
            destination,
            start_date,
            end_date,
            budget,
            travelers,
            interests,
            include_flights: self.include_flights,
        })
    }
}

/// Split the free-text interests field on commas and trim each token
///
/// Empty tokens are kept: `"art, food,"` yields `["art", "food", ""]`.
pub fn parse_interests(raw: &str) -> Vec<String> {
    raw.split(',').map(|token| token.trim().to_string()).collect()
}

fn required(field: &'static str, value: &str) -> Result<String, FormError> {
    if value.trim().is_empty() {
        debug!(field, "required: empty value");
        return Err(FormError::Missing(field));
    }
    Ok(value.to_string())
}

fn out_of_range(field: &'static str, min: &'static str, value: &str) -> FormError {
    debug!(field, value, min, "out_of_range: rejected");
    FormError::OutOfRange {
        field,
        min,
        value: value.trim().to_string(),
    }
}

fn date(field: &'static str, value: &str) -> Result<String, FormError> {
    match NaiveDate::parse_from_str(value, DATE_FORMAT) {
        Ok(_) => Ok(value.to_string()),
        Err(e) => {
            debug!(field, value, error = %e, "date: rejected");
            Err(FormError::InvalidDate {
                field,
                value: value.to_string(),
            })
        }
    }
}
