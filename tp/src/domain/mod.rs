//! Domain types for trip planning and follow-up chat

mod chat;
mod form;
mod trip;

pub use chat::{Author, ChatReply, ChatRequest, ChatTurn};
pub use form::{DATE_FORMAT, FormError, FormOptions, TripForm, parse_interests};
pub use trip::{TripRequest, TripResult, TripSnapshot};
