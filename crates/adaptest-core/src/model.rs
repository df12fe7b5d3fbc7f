//! Core data model types for adaptest.
//!
//! These are the fundamental types shared by the session controller, the
//! mastery tracker and the gateway adapters: questions, answers, skills and
//! the student profile.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use uuid::Uuid;

/// Highest mastery value a skill can hold.
pub const MAX_MASTERY: u8 = 100;

/// One of the four fixed answer labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
}

impl OptionLabel {
    /// All labels in display order.
    pub const ALL: [OptionLabel; 4] = [OptionLabel::A, OptionLabel::B, OptionLabel::C, OptionLabel::D];
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionLabel::A => write!(f, "A"),
            OptionLabel::B => write!(f, "B"),
            OptionLabel::C => write!(f, "C"),
            OptionLabel::D => write!(f, "D"),
        }
    }
}

impl FromStr for OptionLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(OptionLabel::A),
            "B" => Ok(OptionLabel::B),
            "C" => Ok(OptionLabel::C),
            "D" => Ok(OptionLabel::D),
            other => Err(format!("unknown option label: {other}")),
        }
    }
}

/// The four answer texts of a question. Every label is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOptions {
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
    #[serde(rename = "C")]
    pub c: String,
    #[serde(rename = "D")]
    pub d: String,
}

impl AnswerOptions {
    pub fn get(&self, label: OptionLabel) -> &str {
        match label {
            OptionLabel::A => &self.a,
            OptionLabel::B => &self.b,
            OptionLabel::C => &self.c,
            OptionLabel::D => &self.d,
        }
    }

    /// Iterate `(label, text)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (OptionLabel, &str)> {
        OptionLabel::ALL.into_iter().map(move |l| (l, self.get(l)))
    }
}

/// Per-session question identifier.
///
/// Only used to re-key view transitions; it carries no domain meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub u64);

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// A normalized multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub topic: String,
    /// Positive difficulty level (the upstream service uses 1..=5).
    pub difficulty: u32,
    /// Question text with line breaks already rendered.
    pub text: String,
    pub options: AnswerOptions,
    pub correct_option: OptionLabel,
    /// Never empty.
    pub explanation: String,
}

impl Question {
    /// Whether `label` is the correct answer.
    pub fn is_correct(&self, label: OptionLabel) -> bool {
        self.correct_option == label
    }
}

/// A question together with the learner's recorded answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsweredQuestion {
    pub question: Arc<Question>,
    pub selected_option: OptionLabel,
    pub is_correct: bool,
}

impl AnsweredQuestion {
    pub fn new(question: Arc<Question>, selected_option: OptionLabel) -> Self {
        let is_correct = question.is_correct(selected_option);
        Self {
            question,
            selected_option,
            is_correct,
        }
    }
}

/// A tracked topic and the learner's mastery of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    /// Stable topic identifier.
    pub name: String,
    /// Always within `0..=MAX_MASTERY`.
    pub mastery: u8,
}

impl Skill {
    /// Create a skill, clamping `mastery` into range.
    pub fn new(name: impl Into<String>, mastery: i64) -> Self {
        Self {
            name: name.into(),
            mastery: clamp_mastery(mastery),
        }
    }
}

/// Clamp an arbitrary mastery value into `0..=MAX_MASTERY`.
pub fn clamp_mastery(value: i64) -> u8 {
    value.clamp(0, i64::from(MAX_MASTERY)) as u8
}

/// Lifetime learner profile. Lives for the whole process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    #[serde(default = "default_name")]
    pub name: String,
    /// Rank label shown on the dashboard; maintained outside the tracker.
    #[serde(default = "default_level")]
    pub level: String,
    /// Number of completed sessions.
    #[serde(default)]
    pub total_tests: u32,
    /// Lifetime mean accuracy, 0 to 100.
    #[serde(default)]
    pub avg_accuracy: f64,
    /// Maintained outside the tracker.
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub skills: Vec<Skill>,
}

fn default_name() -> String {
    "Learner".to_string()
}

fn default_level() -> String {
    "Beginner".to_string()
}

impl Default for StudentProfile {
    fn default() -> Self {
        Self {
            name: default_name(),
            level: default_level(),
            total_tests: 0,
            avg_accuracy: 0.0,
            streak: 0,
            skills: vec![
                Skill::new("Python", 0),
                Skill::new("Data Structures", 0),
                Skill::new("Algorithms", 0),
            ],
        }
    }
}

impl StudentProfile {
    pub fn skill(&self, name: &str) -> Option<&Skill> {
        self.skills.iter().find(|s| s.name == name)
    }
}

/// Identifier of one assessment session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Current state of the session controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Dashboard,
    Loading,
    Active,
    Results,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Dashboard => write!(f, "dashboard"),
            Phase::Loading => write!(f, "loading"),
            Phase::Active => write!(f, "active"),
            Phase::Results => write!(f, "results"),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn question(id: u64, correct: OptionLabel) -> Question {
        Question {
            id: QuestionId(id),
            topic: "Programming Fundamentals".into(),
            difficulty: 3,
            text: format!("Question {id}?"),
            options: AnswerOptions {
                a: "first".into(),
                b: "second".into(),
                c: "third".into(),
                d: "fourth".into(),
            },
            correct_option: correct,
            explanation: format!("Because {correct} is right."),
        }
    }
}
