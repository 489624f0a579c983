//! Trip Planner - terminal client for a remote trip-planning service
//!
//! Collects travel preferences, asks the planning service for an itinerary,
//! renders the returned markdown, and supports follow-up questions about the
//! plan.
//!
//! # Core Concepts
//!
//! - **One current result**: the [`session::TripController`] owns the displayed
//!   plan (or error) and the loading indicator; a new submission replaces it
//! - **Chat scoped to a plan**: the [`session::ChatSession`] is active only
//!   while a plan is displayed and starts empty for every new plan
//! - **Immutable snapshot**: the request that produced the plan is captured
//!   once ([`domain::TripSnapshot`]) and reused for every chat question
//! - **Latest wins**: late answers to superseded requests are discarded
//!
//! # Modules
//!
//! - [`domain`] - Form, request, result and chat types
//! - [`api`] - PlannerClient trait and HTTP implementation
//! - [`session`] - Trip and chat state machines
//! - [`render`] - Terminal output
//! - [`repl`] - Interactive session
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod render;
pub mod repl;
pub mod session;

// Re-export commonly used types
pub use api::{ApiError, HttpPlannerClient, PlannerClient, create_client};
pub use config::{ChatConfig, Config, FormConfig, ServiceConfig};
pub use domain::{
    Author, ChatReply, ChatRequest, ChatTurn, FormError, FormOptions, TripForm, TripRequest, TripResult, TripSnapshot,
};
pub use session::{ChatSession, GENERIC_ALERT, ResultArea, Settled, TripController, TripPhase};
