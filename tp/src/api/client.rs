//! PlannerClient trait definition

use async_trait::async_trait;

use super::ApiError;
use crate::domain::{ChatReply, ChatRequest, TripRequest, TripResult};

/// Client for the remote trip-planning service
///
/// Each call is one independent request/response exchange. The client keeps no
/// state between calls; everything a chat question needs travels in the
/// ChatRequest snapshot.
#[async_trait]
pub trait PlannerClient: Send + Sync {
    /// Ask the service to generate a plan
    ///
    /// Returns `Ok(TripResult::Failure)` when the service answered with a
    /// structured error, and `Err` for every transport-level problem.
    async fn plan_trip(&self, request: &TripRequest) -> Result<TripResult, ApiError>;

    /// Ask a follow-up question about a generated plan
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::debug;

    /// Mock planner client for unit tests
    ///
    /// Replays queued outcomes in order and records every request it sees.
    #[derive(Default)]
    pub struct MockPlannerClient {
        plans: Mutex<VecDeque<Result<TripResult, ApiError>>>,
        replies: Mutex<VecDeque<Result<ChatReply, ApiError>>>,
        pub plan_requests: Mutex<Vec<TripRequest>>,
        pub chat_requests: Mutex<Vec<ChatRequest>>,
        call_count: AtomicUsize,
    }

    impl MockPlannerClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_plan(self, outcome: Result<TripResult, ApiError>) -> Self {
            self.plans.lock().unwrap().push_back(outcome);
            self
        }

        pub fn with_reply(self, outcome: Result<ChatReply, ApiError>) -> Self {
            self.replies.lock().unwrap().push_back(outcome);
            self
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PlannerClient for MockPlannerClient {
        async fn plan_trip(&self, request: &TripRequest) -> Result<TripResult, ApiError> {
            debug!("MockPlannerClient::plan_trip: called");
            self.call_count.fetch_add(1, Ordering::SeqCst);
            self.plan_requests.lock().unwrap().push(request.clone());
            self.plans
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::InvalidResponse("No more mock plans".to_string())))
        }

        async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError> {
            debug!("MockPlannerClient::chat: called");
            self.call_count.fetch_add(1, Ordering::SeqCst);
            self.chat_requests.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::InvalidResponse("No more mock replies".to_string())))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::domain::TripRequest;

        fn request() -> TripRequest {
            TripRequest {
                source: "NYC".to_string(),
                destination: "Paris".to_string(),
                start_date: "2024-06-01".to_string(),
                end_date: "2024-06-10".to_string(),
                budget: None,
                travelers: None,
                interests: vec![],
                include_flights: false,
            }
        }

        #[tokio::test]
        async fn test_mock_client_replays_outcomes() {
            let client = MockPlannerClient::new().with_plan(Ok(TripResult::Failure {
                error: "Invalid dates".to_string(),
            }));

            let first = client.plan_trip(&request()).await.unwrap();
            assert!(!first.is_success());

            let second = client.plan_trip(&request()).await;
            assert!(second.is_err());

            assert_eq!(client.call_count(), 2);
            assert_eq!(client.plan_requests.lock().unwrap().len(), 2);
        }
    }
}
