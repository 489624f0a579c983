//! Trip request, result and snapshot types

/// A structured trip request, built fresh on every form submission
#[derive(Debug, Clone, PartialEq)]
pub struct TripRequest {
    pub source: String,
    pub destination: String,

    /// Start date exactly as entered (YYYY-MM-DD)
    pub start_date: String,

    /// End date exactly as entered (YYYY-MM-DD)
    pub end_date: String,

    /// Total budget; `None` when the entered value was not numeric
    pub budget: Option<f64>,

    /// Number of travelers; `None` when the entered value was not an integer
    pub travelers: Option<i64>,

    pub interests: Vec<String>,
    pub include_flights: bool,
}

/// Outcome of a trip-generation call that reached the planning service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TripResult {
    /// A plan was generated
    Success {
        /// Markdown itinerary
        plan: String,
        /// Markdown flight table, present only when flights were requested and found
        flight_details: Option<String>,
    },

    /// The service answered but could not produce a plan
    Failure { error: String },
}

impl TripResult {
    pub fn is_success(&self) -> bool {
        matches!(self, TripResult::Success { .. })
    }
}

/// Immutable copy of the request that produced the displayed plan, plus the plan itself
///
/// Captured once per successful submission and reused for every chat question
/// asked against that plan.
#[derive(Debug, Clone, PartialEq)]
pub struct TripSnapshot {
    pub request: TripRequest,
    pub plan: String,
}

impl TripSnapshot {
    pub fn new(request: TripRequest, plan: impl Into<String>) -> Self {
        Self {
            request,
            plan: plan.into(),
        }
    }
}
