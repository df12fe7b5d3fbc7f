//! Mock gateway for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use adaptest_core::error::GatewayError;
use adaptest_core::model::{AnswerOptions, OptionLabel, Question, QuestionId};
use adaptest_core::traits::{QuestionGateway, SubmitAnswer};

/// A scripted gateway for exercising the session controller without a
/// running question service.
///
/// Queued replies are returned first, in order; once the queue is empty every
/// call returns a copy of the fallback question with a fresh id.
pub struct MockGateway {
    /// Replies returned before falling back.
    replies: Mutex<VecDeque<Result<Question, GatewayError>>>,
    /// Returned once the queue is drained.
    fallback: Question,
    /// Artificial latency per call.
    delay: Option<Duration>,
    next_id: AtomicU64,
    call_count: AtomicU32,
    submissions: Mutex<Vec<SubmitAnswer>>,
}

impl MockGateway {
    /// Create a mock that replays `replies` before using the fallback question.
    pub fn new(replies: Vec<Result<Question, GatewayError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            fallback: fallback_question(),
            delay: None,
            next_id: AtomicU64::new(1),
            call_count: AtomicU32::new(0),
            submissions: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that always returns the same question.
    pub fn with_fixed_question(question: Question) -> Self {
        Self {
            fallback: question,
            ..Self::new(Vec::new())
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get the number of calls made to this gateway.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Every answer submitted so far, in order.
    pub fn submissions(&self) -> Vec<SubmitAnswer> {
        self.submissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn reply(&self) -> Result<Question, GatewayError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let queued = self
            .replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        let mut question = match queued {
            Some(reply) => reply?,
            None => self.fallback.clone(),
        };
        question.id = QuestionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        Ok(question)
    }
}

/// The question the service falls back to when generation is unavailable.
pub fn fallback_question() -> Question {
    Question {
        id: QuestionId(0),
        topic: "Programming Fundamentals".into(),
        difficulty: 3,
        text: "System overload fallback: What does HTML stand for?".into(),
        options: AnswerOptions {
            a: "Hyper Text Markup Language".into(),
            b: "High Tech Modern Language".into(),
            c: "Hyper Transfer Markup Link".into(),
            d: "Home Tool Markup Language".into(),
        },
        correct_option: OptionLabel::A,
        explanation: "HTML stands for Hyper Text Markup Language.".into(),
    }
}

#[async_trait]
impl QuestionGateway for MockGateway {
    fn name(&self) -> &str {
        "mock"
    }

    async fn start(&self) -> Result<Question, GatewayError> {
        self.reply().await
    }

    async fn submit(&self, answer: &SubmitAnswer) -> Result<Question, GatewayError> {
        self.submissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(answer.clone());
        self.reply().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use adaptest_core::driver::{resolve, NoopObserver, RetryPolicy};
    use adaptest_core::mastery::MasterySkillTracker;
    use adaptest_core::model::{Phase, StudentProfile};
    use adaptest_core::{Advance, FetchOutcome, SessionConfig, SessionController};

    #[tokio::test]
    async fn fixed_question_gets_fresh_ids() {
        let gateway = MockGateway::with_fixed_question(fallback_question());
        let a = gateway.start().await.unwrap();
        let b = gateway.start().await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.text, b.text);
        assert_eq!(gateway.call_count(), 2);
    }

    #[tokio::test]
    async fn replays_queue_then_falls_back() {
        let gateway = MockGateway::new(vec![Err(GatewayError::Timeout(5))]);
        assert_eq!(gateway.start().await.unwrap_err(), GatewayError::Timeout(5));
        assert_eq!(gateway.start().await.unwrap().correct_option, OptionLabel::A);
    }

    #[tokio::test(start_paused = true)]
    async fn delay_holds_each_reply() {
        let gateway = MockGateway::new(vec![]).with_delay(Duration::from_millis(750));
        let before = tokio::time::Instant::now();
        gateway.start().await.unwrap();
        assert!(before.elapsed() >= Duration::from_millis(750));
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_reply_for_abandoned_session_is_ignored() {
        let gateway = MockGateway::new(vec![]).with_delay(Duration::from_secs(2));
        let mut ctrl = SessionController::new(
            SessionConfig::new(2).unwrap(),
            MasterySkillTracker::new(StudentProfile::default()).unwrap(),
        );
        let ticket = ctrl.start_session();
        let reply = ticket.request().send(&gateway).await;
        ctrl.return_to_dashboard();
        ctrl.start_session();

        assert_eq!(ctrl.apply_fetch(&ticket, reply), FetchOutcome::Ignored);
        assert_eq!(ctrl.phase(), Phase::Loading);
    }

    #[tokio::test]
    async fn records_submissions() {
        let gateway = MockGateway::new(vec![]);
        let answer = SubmitAnswer {
            topic: "Algorithms".into(),
            current_difficulty: 2,
            is_correct: false,
        };
        gateway.submit(&answer).await.unwrap();
        assert_eq!(gateway.submissions(), vec![answer]);
    }

    #[tokio::test]
    async fn drives_a_full_session() {
        let gateway = MockGateway::new(vec![]);
        let mut ctrl = SessionController::new(
            SessionConfig::new(3).unwrap(),
            MasterySkillTracker::new(StudentProfile::default()).unwrap(),
        );
        let policy = RetryPolicy::none();

        let mut ticket = ctrl.start_session();
        let answers = [OptionLabel::A, OptionLabel::A, OptionLabel::B];
        let mut report = None;
        for label in answers {
            assert!(matches!(
                resolve(&mut ctrl, &gateway, &ticket, &policy, &NoopObserver).await,
                FetchOutcome::Ready(_)
            ));
            ctrl.select_option(label).unwrap();
            match ctrl.advance().unwrap() {
                Advance::Fetch(next) => ticket = next,
                Advance::Completed(r) => report = Some(r),
            }
        }

        let report = report.expect("session should complete");
        assert_eq!(report.score, 2);
        assert_eq!(report.outcome.avg_accuracy, 67.0);
        assert_eq!(ctrl.phase(), Phase::Results);
        assert_eq!(gateway.call_count(), 3);

        let outcomes: Vec<bool> = gateway.submissions().iter().map(|s| s.is_correct).collect();
        assert_eq!(outcomes, vec![true, true]);
    }
}
