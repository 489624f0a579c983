//! Chat transcript types

use tracing::debug;

use super::trip::TripSnapshot;

/// Who wrote a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    User,
    Assistant,
}

impl std::fmt::Display for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "you"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One message in the follow-up transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub author: Author,
    pub text: String,

    /// Live flight table returned alongside an assistant answer
    pub flight_details: Option<String>,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            author: Author::User,
            text: text.into(),
            flight_details: None,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            author: Author::Assistant,
            text: text.into(),
            flight_details: None,
        }
    }

    pub fn with_flight_details(mut self, flight_details: Option<String>) -> Self {
        self.flight_details = flight_details;
        self
    }
}

/// A follow-up question plus the snapshot of the plan it is about
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub question: String,
    pub plan: String,
    pub source: String,
    pub destination: String,
    pub start_date: String,
    pub budget: Option<f64>,
    pub travelers: Option<i64>,
    pub interests: Vec<String>,
    pub include_flights: bool,
}

impl ChatRequest {
    /// Build a request from a stored snapshot and a new question
    pub fn from_snapshot(question: impl Into<String>, snapshot: &TripSnapshot) -> Self {
        let question = question.into();
        debug!(question_len = question.len(), "ChatRequest::from_snapshot: called");
        let request = &snapshot.request;
        Self {
            question,
            plan: snapshot.plan.clone(),
            source: request.source.clone(),
            destination: request.destination.clone(),
            start_date: request.start_date.clone(),
            budget: request.budget,
            travelers: request.travelers,
            interests: request.interests.clone(),
            include_flights: request.include_flights,
        }
    }
}

/// Answer to a follow-up question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub response: String,
    pub flight_details: Option<String>,
}

impl ChatReply {
    pub fn text(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            flight_details: None,
        }
    }
}
