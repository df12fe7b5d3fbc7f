//! Append-only record of the answers given during one session.

use serde::Serialize;

use crate::model::{AnsweredQuestion, OptionLabel};

/// Ordered log of answered questions, oldest first.
///
/// Entries can only be appended by the session controller; everything the
/// view sees is read-only.
#[derive(Debug, Clone, Default)]
pub struct AnswerHistoryLog {
    entries: Vec<AnsweredQuestion>,
}

/// One row of the post-session review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewItem {
    /// 1-based position in the session.
    pub position: usize,
    pub topic: String,
    pub difficulty: u32,
    pub question: String,
    pub selected: OptionLabel,
    pub correct: OptionLabel,
    pub is_correct: bool,
    /// Only present for wrong answers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl AnswerHistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, entry: AnsweredQuestion) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnsweredQuestion> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&AnsweredQuestion> {
        self.entries.last()
    }

    pub fn correct_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_correct).count()
    }

    /// Build the per-question review shown on the results screen.
    pub fn review(&self) -> Vec<ReviewItem> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| ReviewItem {
                position: i + 1,
                topic: entry.question.topic.clone(),
                difficulty: entry.question.difficulty,
                question: entry.question.text.clone(),
                selected: entry.selected_option,
                correct: entry.question.correct_option,
                is_correct: entry.is_correct,
                explanation: (!entry.is_correct).then(|| entry.question.explanation.clone()),
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a AnswerHistoryLog {
    type Item = &'a AnsweredQuestion;
    type IntoIter = std::slice::Iter<'a, AnsweredQuestion>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::fixtures::question;

    fn log_of(answers: &[(u64, OptionLabel, OptionLabel)]) -> AnswerHistoryLog {
        let mut log = AnswerHistoryLog::new();
        for &(id, correct, selected) in answers {
            log.append(AnsweredQuestion::new(Arc::new(question(id, correct)), selected));
        }
        log
    }

    #[test]
    fn keeps_submission_order() {
        let log = log_of(&[
            (1, OptionLabel::A, OptionLabel::A),
            (2, OptionLabel::B, OptionLabel::C),
            (3, OptionLabel::D, OptionLabel::D),
        ]);
        let ids: Vec<u64> = log.iter().map(|e| e.question.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(log.len(), 3);
        assert_eq!(log.correct_count(), 2);
    }

    #[test]
    fn review_shows_explanation_only_for_wrong_answers() {
        let log = log_of(&[
            (1, OptionLabel::A, OptionLabel::A),
            (2, OptionLabel::B, OptionLabel::C),
        ]);
        let review = log.review();
        assert_eq!(review.len(), 2);
        assert_eq!(review[0].position, 1);
        assert!(review[0].explanation.is_none());
        assert_eq!(review[1].selected, OptionLabel::C);
        assert_eq!(review[1].correct, OptionLabel::B);
        assert_eq!(
            review[1].explanation.as_deref(),
            Some("Because B is right.")
        );
    }

    #[test]
    fn empty_log() {
        let log = AnswerHistoryLog::new();
        assert!(log.is_empty());
        assert!(log.review().is_empty());
        assert!(log.last().is_none());
    }
}
