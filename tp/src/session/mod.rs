//! Client-side state machines for trip submission and follow-up chat

mod chat;
mod trip;

pub use chat::{ChatSession, ChatTicket, DEFAULT_FALLBACK_REPLY, PendingChat};
pub use trip::{GENERIC_ALERT, PendingTrip, ResultArea, Settled, TripController, TripPhase};
