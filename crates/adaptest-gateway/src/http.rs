//! HTTP client for the adaptive-question service.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tracing::instrument;

use adaptest_core::error::GatewayError;
use adaptest_core::model::{Question, QuestionId};
use adaptest_core::traits::{QuestionGateway, SubmitAnswer};

use crate::wire::QuestionEnvelope;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5001";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30; // Question generation calls a hosted model

const START_PATH: &str = "/api/start-test";
const SUBMIT_PATH: &str = "/api/submit-answer";

/// Gateway backed by the JSON-over-HTTP question service.
pub struct HttpQuestionGateway {
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl HttpQuestionGateway {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, GatewayError> {
        let base = if base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url
        };
        let timeout_secs = if timeout_secs == 0 {
            DEFAULT_TIMEOUT_SECS
        } else {
            timeout_secs
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| GatewayError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base.trim_end_matches('/').to_string(),
            timeout_secs,
            client,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn next_id(&self) -> QuestionId {
        QuestionId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    async fn exchange(&self, request: reqwest::RequestBuilder) -> Result<Question, GatewayError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                GatewayError::Network(format!(
                    "question service not reachable at {}",
                    self.base_url
                ))
            } else {
                GatewayError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api { status, message });
        }

        let envelope: QuestionEnvelope = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedReply(format!("failed to parse reply: {e}")))?;

        envelope.into_question(self.next_id())
    }
}

#[async_trait]
impl QuestionGateway for HttpQuestionGateway {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn start(&self) -> Result<Question, GatewayError> {
        let url = format!("{}{START_PATH}", self.base_url);
        self.exchange(self.client.get(url)).await
    }

    #[instrument(skip(self, answer), fields(topic = %answer.topic, difficulty = answer.current_difficulty))]
    async fn submit(&self, answer: &SubmitAnswer) -> Result<Question, GatewayError> {
        let url = format!("{}{SUBMIT_PATH}", self.base_url);
        self.exchange(self.client.post(url).json(answer)).await
    }
}
