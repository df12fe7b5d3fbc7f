//! Core trait definitions for the adaptive-question gateway.
//!
//! The trait is implemented by the `adaptest-gateway` crate (HTTP and mock
//! gateways) and consumed by the fetch driver.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::model::Question;

// ---------------------------------------------------------------------------
// Question gateway trait
// ---------------------------------------------------------------------------

/// Trait for services that choose the next adaptive question.
#[async_trait]
pub trait QuestionGateway: Send + Sync {
    /// Human-readable gateway name (e.g. "http").
    fn name(&self) -> &str;

    /// Fetch the first question of a session.
    async fn start(&self) -> Result<Question, GatewayError>;

    /// Report an answer and fetch the next adaptively chosen question.
    async fn submit(&self, answer: &SubmitAnswer) -> Result<Question, GatewayError>;
}

/// Outcome of one answered question, as reported to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitAnswer {
    /// Topic of the answered question.
    pub topic: String,
    /// Difficulty of the answered question.
    pub current_difficulty: u32,
    pub is_correct: bool,
}

/// A gateway request the controller is waiting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Start,
    Submit(SubmitAnswer),
}

impl FetchRequest {
    /// Issue this request against `gateway`.
    pub async fn send(&self, gateway: &dyn QuestionGateway) -> Result<Question, GatewayError> {
        match self {
            FetchRequest::Start => gateway.start().await,
            FetchRequest::Submit(answer) => gateway.submit(answer).await,
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchRequest::Start => "start",
            FetchRequest::Submit(_) => "submit",
        }
    }
}

// ---------------------------------------------------------------------------
// Normalization helpers
// ---------------------------------------------------------------------------

/// Explanation used when the service does not supply one.
pub const DEFAULT_EXPLANATION: &str =
    "No explanation was provided for this question. Review the topic material and try again.";

/// Turn literal `\n` escape sequences (backslash + `n`) into real line breaks.
///
/// Also folds `\r\n` style escapes so Windows-authored text renders the same.
pub fn render_line_breaks(text: &str) -> String {
    text.replace("\\r\\n", "\n").replace("\\n", "\n")
}

/// Return `explanation` if it has content, otherwise the default.
pub fn explanation_or_default(explanation: Option<String>) -> String {
    match explanation {
        Some(e) if !e.trim().is_empty() => render_line_breaks(e.trim()),
        _ => DEFAULT_EXPLANATION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_escaped_newlines() {
        let raw = r"Consider:\nfor i in range(3):\n    print(i)";
        assert_eq!(
            render_line_breaks(raw),
            "Consider:\nfor i in range(3):\n    print(i)"
        );
    }

    #[test]
    fn renders_escaped_crlf() {
        assert_eq!(render_line_breaks(r"a\r\nb"), "a\nb");
    }

    #[test]
    fn leaves_plain_text_alone() {
        assert_eq!(render_line_breaks("What is a stack?"), "What is a stack?");
    }

    #[test]
    fn explanation_falls_back_when_missing_or_blank() {
        assert_eq!(explanation_or_default(None), DEFAULT_EXPLANATION);
        assert_eq!(
            explanation_or_default(Some("   ".into())),
            DEFAULT_EXPLANATION
        );
        assert_eq!(
            explanation_or_default(Some("LIFO order.".into())),
            "LIFO order."
        );
    }

    #[test]
    fn submit_answer_wire_names() {
        let body = serde_json::to_value(SubmitAnswer {
            topic: "Web Development".into(),
            current_difficulty: 3,
            is_correct: true,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "topic": "Web Development",
                "current_difficulty": 3,
                "is_correct": true
            })
        );
    }
}
