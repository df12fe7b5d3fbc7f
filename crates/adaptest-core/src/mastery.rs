//! Per-topic mastery and lifetime accuracy tracking.
//!
//! Mastery policy: a session passes when at least half of its questions were
//! answered correctly. A passing session raises every tracked skill by
//! [`MASTERY_GAIN`]; a failing one lowers every skill by [`MASTERY_LOSS`].
//! Results are clamped to `0..=100`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::model::{clamp_mastery, StudentProfile, MAX_MASTERY};

/// Fraction of correct answers a session needs to count as a pass.
pub const PASS_RATIO: f64 = 0.5;
/// Mastery added to every skill after a passing session.
pub const MASTERY_GAIN: i64 = 15;
/// Mastery removed from every skill after a failing session.
pub const MASTERY_LOSS: i64 = 5;

/// Accuracy of one session as a percentage.
pub fn test_accuracy(score: u32, session_length: u32) -> f64 {
    if session_length == 0 {
        return 0.0;
    }
    100.0 * f64::from(score) / f64::from(session_length)
}

/// Fold one more session into a lifetime average.
///
/// Every session weighs the same regardless of its length. The result is
/// rounded at each step, so the average after `k` sessions depends on the
/// order in which rounding happened, not just on the accuracies.
pub fn running_average(prev_avg: f64, prev_total: u32, accuracy: f64) -> f64 {
    if prev_total == 0 {
        return accuracy.round();
    }
    let prev_total = f64::from(prev_total);
    ((prev_avg * prev_total + accuracy) / (prev_total + 1.0)).round()
}

/// Recommended starting difficulty for the next session, given the
/// accuracy of the previous one.
pub fn starting_difficulty_for(accuracy: f64) -> u32 {
    if accuracy > 70.0 {
        5
    } else if accuracy >= 50.0 {
        3
    } else {
        2
    }
}

/// What a finalized session did to the profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionOutcome {
    /// Accuracy of this session, unrounded.
    pub test_accuracy: f64,
    /// Lifetime average after this session.
    pub avg_accuracy: f64,
    pub passed: bool,
    /// Signed mastery change applied to every skill before clamping.
    pub mastery_delta: i64,
    pub total_tests: u32,
}

/// Owner of the learner's profile.
#[derive(Debug, Clone)]
pub struct MasterySkillTracker {
    profile: StudentProfile,
}

impl MasterySkillTracker {
    /// Take ownership of a profile, clamping seeded values into range.
    pub fn new(mut profile: StudentProfile) -> Result<Self, SessionError> {
        let mut seen = HashSet::new();
        for skill in &mut profile.skills {
            if !seen.insert(skill.name.clone()) {
                return Err(SessionError::DuplicateSkill(skill.name.clone()));
            }
            skill.mastery = skill.mastery.min(MAX_MASTERY);
        }
        profile.avg_accuracy = profile.avg_accuracy.clamp(0.0, 100.0);
        Ok(Self { profile })
    }

    pub fn profile(&self) -> &StudentProfile {
        &self.profile
    }

    /// Fold a completed session into the profile.
    ///
    /// Must be called exactly once per completed session.
    pub fn finalize_session(
        &mut self,
        score: u32,
        session_length: u32,
    ) -> Result<SessionOutcome, SessionError> {
        if session_length == 0 {
            return Err(SessionError::InvalidSessionLength);
        }
        if score > session_length {
            return Err(SessionError::ScoreOutOfRange {
                score,
                session_length,
            });
        }

        let accuracy = test_accuracy(score, session_length);
        let avg_accuracy = running_average(
            self.profile.avg_accuracy,
            self.profile.total_tests,
            accuracy,
        );

        let passed = f64::from(score) / f64::from(session_length) >= PASS_RATIO;
        let delta = if passed { MASTERY_GAIN } else { -MASTERY_LOSS };
        for skill in &mut self.profile.skills {
            skill.mastery = clamp_mastery(i64::from(skill.mastery) + delta);
        }

        self.profile.avg_accuracy = avg_accuracy;
        self.profile.total_tests = self.profile.total_tests.saturating_add(1);

        tracing::info!(
            score,
            session_length,
            accuracy,
            avg_accuracy,
            delta,
            "session folded into profile"
        );

        Ok(SessionOutcome {
            test_accuracy: accuracy,
            avg_accuracy,
            passed,
            mastery_delta: delta,
            total_tests: self.profile.total_tests,
        })
    }
}
