//! Results-phase report for a completed session.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::history::{AnswerHistoryLog, ReviewItem};
use crate::mastery::SessionOutcome;
use crate::model::SessionId;

/// Everything the results screen shows about a finished session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub session_id: SessionId,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub score: u32,
    pub session_length: u32,
    pub outcome: SessionOutcome,
    pub review: Vec<ReviewItem>,
}

impl SessionReport {
    pub(crate) fn new(
        session_id: SessionId,
        started_at: DateTime<Utc>,
        score: u32,
        session_length: u32,
        outcome: SessionOutcome,
        history: &AnswerHistoryLog,
    ) -> Self {
        Self {
            session_id,
            started_at,
            completed_at: Utc::now(),
            score,
            session_length,
            outcome,
            review: history.review(),
        }
    }

    /// Wrong answers only, for the "review your mistakes" list.
    pub fn mistakes(&self) -> impl Iterator<Item = &ReviewItem> {
        self.review.iter().filter(|r| !r.is_correct)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
