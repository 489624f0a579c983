//! HTTP implementation of the PlannerClient trait
//!
//! Talks JSON to the planning service's `/plan-trip` and `/chat` endpoints.
//! Requests are sent once; there is no retry.

use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::wire::{ChatBody, ChatResponse, ErrorDetail, PlanTripBody, PlanTripResponse};
use super::{ApiError, PlannerClient};
use crate::config::ServiceConfig;
use crate::domain::{ChatReply, ChatRequest, TripRequest, TripResult};

/// Planning service client over HTTP
pub struct HttpPlannerClient {
    plan_url: String,
    chat_url: String,
    http: Client,
}

impl HttpPlannerClient {
    /// Create a new client from service configuration
    ///
    /// A `timeout_ms` of 0 leaves requests without a timeout.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, ApiError> {
        debug!(?config, "from_config: called");
        if config.base_url.trim().is_empty() {
            return Err(ApiError::Config("service base-url is empty".to_string()));
        }

        let mut builder = Client::builder();
        if config.timeout_ms > 0 {
            builder = builder.timeout(Duration::from_millis(config.timeout_ms));
        } else {
            debug!("from_config: timeout disabled");
        }
        let http = builder.build().map_err(ApiError::Network)?;

        Ok(Self {
            plan_url: join_url(&config.base_url, &config.plan_path),
            chat_url: join_url(&config.base_url, &config.chat_path),
            http,
        })
    }

    pub fn plan_url(&self) -> &str {
        &self.plan_url
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }
}

fn join_url(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Read a non-OK response body; returns the `detail` message when the body is structured
async fn read_error(response: Response) -> (u16, String, Option<String>) {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorDetail>(&body).ok().map(|d| d.message());
    (status, body, detail)
}

#[async_trait]
impl PlannerClient for HttpPlannerClient {
    async fn plan_trip(&self, request: &TripRequest) -> Result<TripResult, ApiError> {
        debug!(url = %self.plan_url, destination = %request.destination, "plan_trip: called");
        info!(
            source = %request.source,
            destination = %request.destination,
            start_date = %request.start_date,
            end_date = %request.end_date,
            include_flights = request.include_flights,
            "plan_trip: requesting plan"
        );

        let response = self
            .http
            .post(&self.plan_url)
            .json(&PlanTripBody::from(request))
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, body, detail) = read_error(response).await;
            return match detail {
                Some(error) => {
                    debug!(status, %error, "plan_trip: structured error");
                    Ok(TripResult::Failure { error })
                }
                None => {
                    warn!(status, "plan_trip: unstructured error response");
                    Err(ApiError::Status { status, body })
                }
            };
        }

        let text = response.text().await?;
        let parsed: PlanTripResponse = serde_json::from_str(&text)?;
        let result = parsed
            .into_result()
            .ok_or_else(|| ApiError::InvalidResponse("success response without a plan".to_string()))?;
        debug!(success = result.is_success(), "plan_trip: settled");
        Ok(result)
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError> {
        debug!(url = %self.chat_url, question_len = request.question.len(), "chat: called");

        let response = self
            .http
            .post(&self.chat_url)
            .json(&ChatBody::from(request))
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, body, detail) = read_error(response).await;
            warn!(status, ?detail, "chat: error response");
            return Err(ApiError::Status {
                status,
                body: detail.unwrap_or(body),
            });
        }

        let text = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&text)?;
        debug!(has_flights = parsed.flight_details.is_some(), "chat: success");
        Ok(parsed.into())
    }
}
