//! Follow-up chat about the displayed plan
//!
//! The session is active only while a successfully generated plan is shown.
//! Its transcript is append-only for the lifetime of that plan: activating a
//! new plan or starting a new submission throws it away.
//!
//! Every send is tagged with a sequence number and assistant answers are
//! appended in send order, whatever order they complete in. Answers that
//! belong to a previous plan (an older generation) are dropped.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::{ApiError, PlannerClient};
use crate::domain::{ChatReply, ChatRequest, ChatTurn, TripSnapshot};

/// Assistant turn used when a question could not be answered
pub const DEFAULT_FALLBACK_REPLY: &str = "Sorry, I couldn't answer that question right now. Please try again.";

/// Identifies one in-flight chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatTicket {
    generation: u64,
    seq: u64,
}

impl ChatTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// A chat message that has been recorded and is ready to be sent
#[derive(Debug, Clone)]
pub struct PendingChat {
    pub ticket: ChatTicket,
    pub request: ChatRequest,
}

/// Transcript and snapshot for the currently displayed plan
#[derive(Debug)]
pub struct ChatSession {
    snapshot: Option<Arc<TripSnapshot>>,
    transcript: Vec<ChatTurn>,
    generation: u64,
    next_seq: u64,
    next_flush: u64,
    held: BTreeMap<u64, ChatTurn>,
    fallback: String,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(DEFAULT_FALLBACK_REPLY)
    }
}

impl ChatSession {
    /// Create an inactive session
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            snapshot: None,
            transcript: Vec::new(),
            generation: 0,
            next_seq: 0,
            next_flush: 0,
            held: BTreeMap::new(),
            fallback: fallback.into(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    pub fn snapshot(&self) -> Option<&Arc<TripSnapshot>> {
        self.snapshot.as_ref()
    }

    /// Number of sends whose answer has not been appended yet
    pub fn in_flight(&self) -> u64 {
        self.next_seq - self.next_flush
    }

    /// Start a fresh transcript for a newly displayed plan
    pub fn activate(&mut self, snapshot: Arc<TripSnapshot>) {
        debug!(destination = %snapshot.request.destination, "ChatSession::activate: called");
        self.reset();
        self.snapshot = Some(snapshot);
        info!(generation = self.generation, "chat activated");
    }

    /// Discard the transcript and snapshot; chat becomes inactive
    pub fn deactivate(&mut self) {
        debug!(active = self.is_active(), "ChatSession::deactivate: called");
        self.reset();
        self.snapshot = None;
    }

    fn reset(&mut self) {
        self.generation += 1;
        self.transcript.clear();
        self.held.clear();
        self.next_seq = 0;
        self.next_flush = 0;
    }

    /// Record a user turn and build the request to send
    ///
    /// Returns `None` without touching the transcript when the text is blank
    /// or the session is inactive.
    pub fn begin_send(&mut self, text: &str) -> Option<PendingChat> {
        let question = text.trim();
        if question.is_empty() {
            debug!("ChatSession::begin_send: blank message ignored");
            return None;
        }
        let Some(snapshot) = self.snapshot.as_ref() else {
            debug!("ChatSession::begin_send: inactive, message ignored");
            return None;
        };

        let request = ChatRequest::from_snapshot(question, snapshot);
        self.transcript.push(ChatTurn::user(question));

        let ticket = ChatTicket {
            generation: self.generation,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        debug!(seq = ticket.seq, "ChatSession::begin_send: recorded user turn");

        Some(PendingChat { ticket, request })
    }

    /// Apply the outcome of a send
    ///
    /// Failures become the fallback turn. Returns how many assistant turns
    /// were appended: 0 when the answer is stale or waiting for an earlier
    /// one, more than 1 when it released answers held behind it.
    pub fn complete(&mut self, ticket: ChatTicket, outcome: Result<ChatReply, ApiError>) -> usize {
        debug!(seq = ticket.seq, ok = outcome.is_ok(), "ChatSession::complete: called");
        if ticket.generation != self.generation {
            debug!(
                ticket_generation = ticket.generation,
                generation = self.generation,
                "ChatSession::complete: stale answer discarded"
            );
            return 0;
        }

        let turn = match outcome {
            Ok(reply) => ChatTurn::assistant(reply.response).with_flight_details(reply.flight_details),
            Err(e) => {
                warn!(seq = ticket.seq, error = %e, "chat request failed, using fallback reply");
                ChatTurn::assistant(self.fallback.clone())
            }
        };
        self.held.insert(ticket.seq, turn);

        let mut appended = 0;
        while let Some(turn) = self.held.remove(&self.next_flush) {
            self.transcript.push(turn);
            self.next_flush += 1;
            appended += 1;
        }
        if appended == 0 {
            debug!(
                seq = ticket.seq,
                waiting_for = self.next_flush,
                "ChatSession::complete: holding answer for send order"
            );
        }
        appended
    }

    /// Send one message and wait for its answer
    ///
    /// Returns the number of assistant turns appended (see `complete`).
    pub async fn send_message(&mut self, text: &str, client: &dyn PlannerClient) -> usize {
        let Some(pending) = self.begin_send(text) else {
            return 0;
        };
        let outcome = client.chat(&pending.request).await;
        self.complete(pending.ticket, outcome)
    }
}
