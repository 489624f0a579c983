//! JSON bodies exchanged with the planning service

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{ChatReply, ChatRequest, TripRequest, TripResult};

/// Body of `POST /plan-trip`
#[derive(Debug, Serialize)]
pub struct PlanTripBody<'a> {
    pub source: &'a str,
    pub destination: &'a str,
    pub start_date: &'a str,
    pub end_date: &'a str,
    pub budget: Option<f64>,
    pub num_travelers: Option<i64>,
    pub interests: &'a [String],
    pub include_flights: bool,
}

impl<'a> From<&'a TripRequest> for PlanTripBody<'a> {
    fn from(request: &'a TripRequest) -> Self {
        Self {
            source: &request.source,
            destination: &request.destination,
            start_date: &request.start_date,
            end_date: &request.end_date,
            budget: request.budget,
            num_travelers: request.travelers,
            interests: &request.interests,
            include_flights: request.include_flights,
        }
    }
}

/// Body returned by `POST /plan-trip` with a 2xx status
#[derive(Debug, Deserialize)]
pub struct PlanTripResponse {
    pub success: bool,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub flight_details: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl PlanTripResponse {
    /// Convert into a TripResult, or `None` if a successful body carries no plan
    pub fn into_result(self) -> Option<TripResult> {
        if self.success {
            let plan = self.plan?;
            Some(TripResult::Success {
                plan,
                flight_details: self.flight_details,
            })
        } else {
            Some(TripResult::Failure {
                error: self.error.unwrap_or_else(|| "Unknown error".to_string()),
            })
        }
    }
}

/// Structured error body sent with a non-OK status
#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub detail: Value,
}

impl ErrorDetail {
    /// Human readable message; non-string details (validation lists) are shown as JSON
    pub fn message(&self) -> String {
        match &self.detail {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Body of `POST /chat`
#[derive(Debug, Serialize)]
pub struct ChatBody<'a> {
    pub question: &'a str,
    pub travel_plan: &'a str,
    pub budget: Option<f64>,
    pub travelers: Option<i64>,
    pub interests: &'a [String],
    pub include_flights: bool,
    pub source: &'a str,
    pub destination: &'a str,
    pub start_date: &'a str,
}

impl<'a> From<&'a ChatRequest> for ChatBody<'a> {
    fn from(request: &'a ChatRequest) -> Self {
        Self {
            question: &request.question,
            travel_plan: &request.plan,
            budget: request.budget,
            travelers: request.travelers,
            interests: &request.interests,
            include_flights: request.include_flights,
            source: &request.source,
            destination: &request.destination,
            start_date: &request.start_date,
        }
    }
}

/// Body returned by `POST /chat` with a 2xx status
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default)]
    pub flight_details: Option<String>,
}

impl From<ChatResponse> for ChatReply {
    fn from(response: ChatResponse) -> Self {
        Self {
            response: response.response,
            flight_details: response.flight_details,
        }
    }
}
