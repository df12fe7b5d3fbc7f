//! The adaptive session state machine.
//!
//! `SessionController` owns the session-scoped state and the mastery tracker.
//! It never performs I/O: operations that need a question hand back a
//! [`FetchTicket`], the caller performs the gateway request (see
//! [`crate::driver`]) and feeds the result back through
//! [`SessionController::apply_fetch`].
//!
//! ```text
//! Dashboard --start--> Loading --fetch ok--> Active --advance--> Loading
//!                         ^  |                  |
//!                  retry  +--+ fetch failed     +--last answer--> Results
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::{GatewayError, SessionError};
use crate::history::AnswerHistoryLog;
use crate::mastery::MasterySkillTracker;
use crate::model::{AnsweredQuestion, OptionLabel, Phase, Question, QuestionId, SessionId, StudentProfile};
use crate::report::SessionReport;
use crate::traits::{FetchRequest, SubmitAnswer};

/// Number of questions in a session unless configured otherwise.
pub const DEFAULT_SESSION_LENGTH: u32 = 5;

/// Configuration for the session controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    session_length: u32,
}

impl SessionConfig {
    pub fn new(session_length: u32) -> Result<Self, SessionError> {
        if session_length == 0 {
            return Err(SessionError::InvalidSessionLength);
        }
        Ok(Self { session_length })
    }

    pub fn session_length(&self) -> u32 {
        self.session_length
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_length: DEFAULT_SESSION_LENGTH,
        }
    }
}

/// Names the request a gateway response belongs to.
///
/// A response is only applied if its ticket still matches the controller's
/// current session and fetch sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    session_id: SessionId,
    sequence: u32,
    request: FetchRequest,
}

impl FetchTicket {
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    pub fn request(&self) -> &FetchRequest {
        &self.request
    }
}

/// Result of applying a gateway response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The question is now active.
    Ready(QuestionId),
    /// The request failed; the session stays in Loading with the error recorded.
    Failed(GatewayError),
    /// The response belonged to a session or request that is no longer current.
    Ignored,
}

/// Result of a successful `advance`.
#[derive(Debug, Clone)]
pub enum Advance {
    /// The next question must be fetched.
    Fetch(FetchTicket),
    /// That was the last question; the session is in Results.
    Completed(Box<SessionReport>),
}

/// State of one assessment session.
#[derive(Debug, Clone)]
pub struct SessionState {
    id: SessionId,
    phase: Phase,
    current_question: Option<Arc<Question>>,
    selected_option: Option<OptionLabel>,
    score: u32,
    questions_answered: u32,
    history: AnswerHistoryLog,
    last_error: Option<GatewayError>,
    pending: Option<FetchRequest>,
    fetch_sequence: u32,
    started_at: DateTime<Utc>,
}

impl SessionState {
    fn new() -> Self {
        Self {
            id: SessionId::new(),
            phase: Phase::Loading,
            current_question: None,
            selected_option: None,
            score: 0,
            questions_answered: 0,
            history: AnswerHistoryLog::new(),
            last_error: None,
            pending: Some(FetchRequest::Start),
            fetch_sequence: 0,
            started_at: Utc::now(),
        }
    }

    fn ticket(&self) -> Option<FetchTicket> {
        self.pending.clone().map(|request| FetchTicket {
            session_id: self.id,
            sequence: self.fetch_sequence,
            request,
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current_question.as_deref()
    }

    pub fn selected_option(&self) -> Option<OptionLabel> {
        self.selected_option
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn questions_answered(&self) -> u32 {
        self.questions_answered
    }

    pub fn history(&self) -> &AnswerHistoryLog {
        &self.history
    }

    /// The most recent fetch failure, if the session is stuck in Loading.
    pub fn last_error(&self) -> Option<&GatewayError> {
        self.last_error.as_ref()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

/// The adaptive session controller.
#[derive(Debug)]
pub struct SessionController {
    config: SessionConfig,
    tracker: MasterySkillTracker,
    session: Option<SessionState>,
}

impl SessionController {
    pub fn new(config: SessionConfig, tracker: MasterySkillTracker) -> Self {
        Self {
            config,
            tracker,
            session: None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.session
            .as_ref()
            .map(|s| s.phase)
            .unwrap_or(Phase::Dashboard)
    }

    pub fn session(&self) -> Option<&SessionState> {
        self.session.as_ref()
    }

    pub fn profile(&self) -> &StudentProfile {
        self.tracker.profile()
    }

    pub fn last_error(&self) -> Option<&GatewayError> {
        self.session.as_ref().and_then(|s| s.last_error.as_ref())
    }

    /// Begin a new session, discarding any previous one.
    pub fn start_session(&mut self) -> FetchTicket {
        if let Some(old) = &self.session {
            if old.phase != Phase::Results {
                warn!(session = %old.id, phase = %old.phase, "discarding unfinished session");
            }
        }

        let state = SessionState::new();
        let ticket = FetchTicket {
            session_id: state.id,
            sequence: state.fetch_sequence,
            request: FetchRequest::Start,
        };
        info!(session = %state.id, length = self.config.session_length, "session started");
        self.session = Some(state);
        ticket
    }

    /// Apply the result of the request named by `ticket`.
    pub fn apply_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Question, GatewayError>,
    ) -> FetchOutcome {
        let Some(session) = self.session.as_mut() else {
            debug!(session = %ticket.session_id, "response arrived on the dashboard, ignoring");
            return FetchOutcome::Ignored;
        };
        if session.id != ticket.session_id
            || session.fetch_sequence != ticket.sequence
            || session.phase != Phase::Loading
        {
            debug!(
                session = %ticket.session_id,
                sequence = ticket.sequence,
                "stale response, ignoring"
            );
            return FetchOutcome::Ignored;
        }

        match result {
            Ok(question) => {
                let id = question.id;
                debug!(session = %session.id, question = %id, topic = %question.topic, "question ready");
                session.current_question = Some(Arc::new(question));
                session.selected_option = None;
                session.last_error = None;
                session.pending = None;
                session.phase = Phase::Active;
                FetchOutcome::Ready(id)
            }
            Err(e) => {
                warn!(session = %session.id, request = ticket.request.kind(), "question request failed: {e}");
                session.last_error = Some(e.clone());
                FetchOutcome::Failed(e)
            }
        }
    }

    /// Re-issue the request that last failed.
    pub fn retry_fetch(&mut self) -> Result<FetchTicket, SessionError> {
        let session = Self::session_in(&mut self.session, Phase::Loading, "retry")?;
        if session.last_error.is_none() {
            return Err(SessionError::NoPendingFetch);
        }
        session.last_error = None;
        session.fetch_sequence += 1;
        session.ticket().ok_or(SessionError::NoPendingFetch)
    }

    /// Record the pending choice for the active question.
    pub fn select_option(&mut self, label: OptionLabel) -> Result<(), SessionError> {
        let session = Self::session_in(&mut self.session, Phase::Active, "select an option")?;
        session.selected_option = Some(label);
        Ok(())
    }

    /// Submit the pending choice and move on.
    pub fn advance(&mut self) -> Result<Advance, SessionError> {
        let session_length = self.config.session_length;
        let session = Self::session_in(&mut self.session, Phase::Active, "advance")?;
        let selected = session.selected_option.ok_or(SessionError::NoSelection)?;
        let Some(question) = session.current_question.take() else {
            return Err(SessionError::InvalidPhase {
                operation: "advance",
                phase: session.phase,
            });
        };

        let answered = AnsweredQuestion::new(Arc::clone(&question), selected);
        let is_correct = answered.is_correct;
        session.history.append(answered);
        if is_correct {
            session.score += 1;
        }
        session.questions_answered += 1;
        session.selected_option = None;

        debug!(
            session = %session.id,
            question = %question.id,
            %selected,
            is_correct,
            answered = session.questions_answered,
            "answer recorded"
        );

        if session.questions_answered >= session_length {
            session.phase = Phase::Results;
            let outcome = self.tracker.finalize_session(session.score, session_length)?;
            let report = SessionReport::new(
                session.id,
                session.started_at,
                session.score,
                session_length,
                outcome,
                &session.history,
            );
            info!(session = %session.id, score = session.score, "session complete");
            return Ok(Advance::Completed(Box::new(report)));
        }

        session.pending = Some(FetchRequest::Submit(SubmitAnswer {
            topic: question.topic.clone(),
            current_difficulty: question.difficulty,
            is_correct,
        }));
        session.fetch_sequence += 1;
        session.phase = Phase::Loading;
        session
            .ticket()
            .map(Advance::Fetch)
            .ok_or(SessionError::NoPendingFetch)
    }

    /// Leave the current session, if any. Abandoned sessions do not touch the profile.
    pub fn return_to_dashboard(&mut self) {
        if let Some(old) = self.session.take() {
            if old.phase != Phase::Results {
                warn!(session = %old.id, phase = %old.phase, "session abandoned");
            }
        }
    }

    fn session_in<'a>(
        session: &'a mut Option<SessionState>,
        phase: Phase,
        operation: &'static str,
    ) -> Result<&'a mut SessionState, SessionError> {
        let current = session.as_ref().map_or(Phase::Dashboard, |s| s.phase);
        if current != phase {
            return Err(SessionError::InvalidPhase {
                operation,
                phase: current,
            });
        }
        session.as_mut().ok_or(SessionError::InvalidPhase {
            operation,
            phase: Phase::Dashboard,
        })
    }
}
