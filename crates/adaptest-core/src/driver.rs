//! Fetch driver: performs the gateway request named by a ticket.
//!
//! Transient transport failures are retried with exponential backoff up to a
//! bounded number of attempts; after that the failure is handed to the
//! controller, which keeps the session in Loading with the error visible.

use std::time::Duration;

use crate::error::GatewayError;
use crate::model::Question;
use crate::session::{FetchOutcome, FetchTicket, SessionController};
use crate::traits::{FetchRequest, QuestionGateway};

/// Bounded retry policy for gateway requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound for the doubled delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }
}

/// Progress reporting for question fetches.
pub trait SessionObserver: Send + Sync {
    fn on_fetch_start(&self, request: &FetchRequest);
    fn on_retry(&self, attempt: u32, delay: Duration, error: &GatewayError);
    fn on_fetch_failed(&self, error: &GatewayError, attempts: u32);
    fn on_question_ready(&self, question: &Question);
}

/// No-op observer.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {
    fn on_fetch_start(&self, _: &FetchRequest) {}
    fn on_retry(&self, _: u32, _: Duration, _: &GatewayError) {}
    fn on_fetch_failed(&self, _: &GatewayError, _: u32) {}
    fn on_question_ready(&self, _: &Question) {}
}

/// Issue `request`, retrying retryable failures according to `policy`.
pub async fn fetch_question(
    gateway: &dyn QuestionGateway,
    request: &FetchRequest,
    policy: &RetryPolicy,
    observer: &dyn SessionObserver,
) -> Result<Question, GatewayError> {
    observer.on_fetch_start(request);

    let mut delay = policy.initial_delay;
    let mut attempts = 0u32;
    loop {
        attempts += 1;
        match request.send(gateway).await {
            Ok(question) => {
                observer.on_question_ready(&question);
                return Ok(question);
            }
            Err(e) if e.is_retryable() && attempts <= policy.max_retries => {
                tracing::warn!(
                    gateway = gateway.name(),
                    request = request.kind(),
                    attempt = attempts,
                    "question request failed, retrying in {delay:?}: {e}"
                );
                observer.on_retry(attempts, delay, &e);
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(policy.max_delay);
            }
            Err(e) => {
                tracing::error!(
                    gateway = gateway.name(),
                    request = request.kind(),
                    attempts,
                    "question request failed: {e}"
                );
                observer.on_fetch_failed(&e, attempts);
                return Err(e);
            }
        }
    }
}

/// Perform the fetch named by `ticket` and apply the result to `controller`.
pub async fn resolve(
    controller: &mut SessionController,
    gateway: &dyn QuestionGateway,
    ticket: &FetchTicket,
    policy: &RetryPolicy,
    observer: &dyn SessionObserver,
) -> FetchOutcome {
    let result = fetch_question(gateway, ticket.request(), policy, observer).await;
    controller.apply_fetch(ticket, result)
}
