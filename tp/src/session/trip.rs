//! Trip request controller
//!
//! Drives one "generate a plan" action at a time:
//!
//! ```text
//! Idle ──begin──▶ Pending ──complete──▶ Displayed ──begin──▶ Pending ...
//!                    │
//!                    └──────complete──▶ Errored ──begin──▶ Pending ...
//! ```
//!
//! Each submission gets a sequence number. A completion is applied only if it
//! belongs to the latest submission, so a slow answer to a superseded request
//! can never overwrite newer state.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::chat::ChatSession;
use crate::api::{ApiError, PlannerClient};
use crate::domain::{FormError, FormOptions, TripForm, TripRequest, TripResult, TripSnapshot};

/// Message shown when the planning service could not be reached
pub const GENERIC_ALERT: &str = "Something went wrong while generating your travel plan. Please try again.";

/// Lifecycle of the current trip result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TripPhase {
    #[default]
    Idle,
    Pending,
    Displayed,
    Errored,
}

impl std::fmt::Display for TripPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Pending => write!(f, "pending"),
            Self::Displayed => write!(f, "displayed"),
            Self::Errored => write!(f, "errored"),
        }
    }
}

/// What the result area currently shows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultArea {
    #[default]
    Hidden,
    Plan {
        plan: String,
        flight_details: Option<String>,
    },
    Error(String),
}

impl ResultArea {
    pub fn is_visible(&self) -> bool {
        !matches!(self, ResultArea::Hidden)
    }
}

/// A submission that has been started and awaits the service's answer
#[derive(Debug, Clone)]
pub struct PendingTrip {
    seq: u64,
    pub request: TripRequest,
}

impl PendingTrip {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// How a completion was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// Plan shown and chat activated
    Displayed,
    /// Service error shown in the result area
    Errored,
    /// Transport failure; the generic alert was raised
    Alerted,
    /// A newer submission exists; nothing changed
    Stale,
}

/// Owns the current trip result and the loading indicator
#[derive(Debug, Default)]
pub struct TripController {
    phase: TripPhase,
    loading: bool,
    result: ResultArea,
    alert: Option<String>,
    latest_seq: u64,
    current: Option<Arc<TripSnapshot>>,
    options: FormOptions,
}

impl TripController {
    pub fn new(options: FormOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    pub fn phase(&self) -> TripPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn result(&self) -> &ResultArea {
        &self.result
    }

    /// Snapshot behind the displayed plan, if one is displayed
    pub fn current(&self) -> Option<&Arc<TripSnapshot>> {
        self.current.as_ref()
    }

    /// Take the pending user-facing alert, if any
    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    /// Start a submission: parse the form, show loading, hide the old result
    ///
    /// The chat session is reset to inactive; its transcript belongs to the
    /// plan being replaced.
    pub fn begin(&mut self, form: &TripForm, chat: &mut ChatSession) -> Result<PendingTrip, FormError> {
        debug!(phase = %self.phase, "TripController::begin: called");
        let request = form.parse(self.options)?;

        self.latest_seq += 1;
        self.loading = true;
        self.result = ResultArea::Hidden;
        self.alert = None;
        self.current = None;
        self.phase = TripPhase::Pending;
        chat.deactivate();

        info!(seq = self.latest_seq, destination = %request.destination, "trip submission started");
        Ok(PendingTrip {
            seq: self.latest_seq,
            request,
        })
    }

    /// Apply the service's answer to a submission
    pub fn complete(
        &mut self,
        pending: PendingTrip,
        outcome: Result<TripResult, ApiError>,
        chat: &mut ChatSession,
    ) -> Settled {
        debug!(seq = pending.seq, latest = self.latest_seq, "TripController::complete: called");
        if pending.seq != self.latest_seq {
            debug!(seq = pending.seq, "TripController::complete: superseded, discarding");
            return Settled::Stale;
        }

        self.loading = false;
        match outcome {
            Ok(TripResult::Success { plan, flight_details }) => {
                let snapshot = Arc::new(TripSnapshot::new(pending.request, plan.clone()));
                self.result = ResultArea::Plan { plan, flight_details };
                self.current = Some(snapshot.clone());
                self.phase = TripPhase::Displayed;
                chat.activate(snapshot);
                info!(seq = pending.seq, "trip plan displayed");
                Settled::Displayed
            }
            Ok(TripResult::Failure { error }) => {
                info!(seq = pending.seq, %error, "trip plan failed");
                self.result = ResultArea::Error(error);
                self.phase = TripPhase::Errored;
                Settled::Errored
            }
            Err(e) => {
                warn!(seq = pending.seq, error = %e, "trip request failed");
                self.alert = Some(GENERIC_ALERT.to_string());
                self.phase = TripPhase::Errored;
                Settled::Alerted
            }
        }
    }

    /// Submit the form and wait for the service's answer
    pub async fn submit(
        &mut self,
        form: &TripForm,
        client: &dyn PlannerClient,
        chat: &mut ChatSession,
    ) -> Result<Settled, FormError> {
        let pending = self.begin(form, chat)?;
        let outcome = client.plan_trip(&pending.request).await;
        Ok(self.complete(pending, outcome, chat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::mock::MockPlannerClient;
    use crate::domain::ChatReply;

    fn paris_form() -> TripForm {
        TripForm {
            source: "NYC".to_string(),
            destination: "Paris".to_string(),
            start_date: "2024-06-01".to_string(),
            end_date: "2024-06-10".to_string(),
            budget: "2000".to_string(),
            travelers: "2".to_string(),
            interests: "art, food".to_string(),
            include_flights: false,
        }
    }

    fn success(plan: &str) -> Result<TripResult, ApiError> {
        Ok(TripResult::Success {
            plan: plan.to_string(),
            flight_details: None,
        })
    }

    #[test]
    fn test_begin_shows_loading_and_hides_result() {
        let mut controller = TripController::default();
        let mut chat = ChatSession::default();

        let pending = controller.begin(&paris_form(), &mut chat).unwrap();
        assert!(controller.is_loading());
        assert_eq!(controller.phase(), TripPhase::Pending);
        assert!(!controller.result().is_visible());
        assert_eq!(pending.request.interests, vec!["art", "food"]);
    }

    #[test]
    fn test_invalid_form_changes_nothing() {
        let mut controller = TripController::default();
        let mut chat = ChatSession::default();
        let mut form = paris_form();
        form.start_date = "tomorrow".to_string();

        assert!(controller.begin(&form, &mut chat).is_err());
        assert!(!controller.is_loading());
        assert_eq!(controller.phase(), TripPhase::Idle);
    }

    #[test]
    fn test_success_displays_plan_and_activates_chat() {
        let mut controller = TripController::default();
        let mut chat = ChatSession::default();

        let pending = controller.begin(&paris_form(), &mut chat).unwrap();
        let settled = controller.complete(
            pending,
            Ok(TripResult::Success {
                plan: "# Paris".to_string(),
                flight_details: Some("| Air France |".to_string()),
            }),
            &mut chat,
        );

        assert_eq!(settled, Settled::Displayed);
        assert!(!controller.is_loading());
        assert_eq!(controller.phase(), TripPhase::Displayed);
        assert_eq!(
            controller.result(),
            &ResultArea::Plan {
                plan: "# Paris".to_string(),
                flight_details: Some("| Air France |".to_string())
            }
        );
        assert!(chat.is_active());
        assert!(chat.transcript().is_empty());
        assert_eq!(controller.current().unwrap().plan, "# Paris");
    }

    #[test]
    fn test_business_failure_shows_error_and_keeps_chat_inactive() {
        let mut controller = TripController::default();
        let mut chat = ChatSession::default();

        let pending = controller.begin(&paris_form(), &mut chat).unwrap();
        let settled = controller.complete(
            pending,
            Ok(TripResult::Failure {
                error: "Invalid dates".to_string(),
            }),
            &mut chat,
        );

        assert_eq!(settled, Settled::Errored);
        assert!(!controller.is_loading());
        assert_eq!(controller.result(), &ResultArea::Error("Invalid dates".to_string()));
        assert!(controller.result().is_visible());
        assert!(!chat.is_active());
        assert!(controller.take_alert().is_none());
    }

    #[test]
    fn test_transport_failure_raises_alert() {
        let mut controller = TripController::default();
        let mut chat = ChatSession::default();

        let pending = controller.begin(&paris_form(), &mut chat).unwrap();
        let settled = controller.complete(
            pending,
            Err(ApiError::InvalidResponse("connection reset".to_string())),
            &mut chat,
        );

        assert_eq!(settled, Settled::Alerted);
        assert!(!controller.is_loading());
        assert!(!controller.result().is_visible());
        assert!(!chat.is_active());
        assert_eq!(controller.take_alert().as_deref(), Some(GENERIC_ALERT));
        assert!(controller.take_alert().is_none());
    }

    #[test]
    fn test_superseded_completion_is_discarded() {
        let mut controller = TripController::default();
        let mut chat = ChatSession::default();

        let first = controller.begin(&paris_form(), &mut chat).unwrap();
        let mut rome = paris_form();
        rome.destination = "Rome".to_string();
        let second = controller.begin(&rome, &mut chat).unwrap();

        assert_eq!(controller.complete(second, success("# Rome"), &mut chat), Settled::Displayed);
        assert_eq!(controller.complete(first, success("# Paris"), &mut chat), Settled::Stale);

        assert_eq!(controller.current().unwrap().request.destination, "Rome");
        assert_eq!(chat.snapshot().unwrap().plan, "# Rome");
    }

    #[test]
    fn test_stale_completion_does_not_hide_loading() {
        let mut controller = TripController::default();
        let mut chat = ChatSession::default();

        let first = controller.begin(&paris_form(), &mut chat).unwrap();
        let _second = controller.begin(&paris_form(), &mut chat).unwrap();

        assert_eq!(
            controller.complete(first, Err(ApiError::InvalidResponse("late".to_string())), &mut chat),
            Settled::Stale
        );
        assert!(controller.is_loading());
        assert!(controller.take_alert().is_none());
    }

    #[tokio::test]
    async fn test_resubmit_clears_chat_transcript() {
        let client = MockPlannerClient::new()
            .with_plan(success("# Paris"))
            .with_reply(Ok(ChatReply::text("Visit the Louvre.")))
            .with_plan(success("# Paris again"));
        let mut controller = TripController::default();
        let mut chat = ChatSession::default();

        controller.submit(&paris_form(), &client, &mut chat).await.unwrap();
        chat.send_message("Museums?", &client).await;
        assert_eq!(chat.transcript().len(), 2);

        let settled = controller.submit(&paris_form(), &client, &mut chat).await.unwrap();
        assert_eq!(settled, Settled::Displayed);
        assert!(chat.is_active());
        assert!(chat.transcript().is_empty());
        assert_eq!(chat.snapshot().unwrap().plan, "# Paris again");
    }

    #[tokio::test]
    async fn test_submit_sends_exactly_one_request() {
        let client = MockPlannerClient::new().with_plan(success("# Paris"));
        let mut controller = TripController::default();
        let mut chat = ChatSession::default();

        controller.submit(&paris_form(), &client, &mut chat).await.unwrap();

        let requests = client.plan_requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].budget, Some(2000.0));
        assert_eq!(requests[0].travelers, Some(2));
    }

    #[tokio::test]
    async fn test_failed_resubmit_leaves_chat_inactive() {
        let client = MockPlannerClient::new().with_plan(success("# Paris")).with_plan(Ok(TripResult::Failure {
            error: "Invalid dates".to_string(),
        }));
        let mut controller = TripController::default();
        let mut chat = ChatSession::default();

        controller.submit(&paris_form(), &client, &mut chat).await.unwrap();
        assert!(chat.is_active());

        let settled = controller.submit(&paris_form(), &client, &mut chat).await.unwrap();
        assert_eq!(settled, Settled::Errored);
        assert!(!chat.is_active());
        assert!(controller.current().is_none());
    }

    #[test]
    fn test_drop_empty_interests_option_applies() {
        let mut controller = TripController::new(FormOptions {
            drop_empty_interests: true,
        });
        let mut chat = ChatSession::default();
        let mut form = paris_form();
        form.interests = "art,".to_string();

        let pending = controller.begin(&form, &mut chat).unwrap();
        assert_eq!(pending.request.interests, vec!["art"]);
    }
}
