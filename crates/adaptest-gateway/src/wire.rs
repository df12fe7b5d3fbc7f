//! Wire format of the adaptive-question service and its validating adapter.
//!
//! The service names question fields `Topic`, `Difficulty_Level`,
//! `Question_Text`, `Option_A`..`Option_D`, `Correct_Option` and optionally
//! `Explanation`. Every field is parsed as optional and then checked, so a
//! reply with a missing option or answer fails the request instead of
//! producing a half-populated [`Question`].

use serde::Deserialize;

use adaptest_core::error::GatewayError;
use adaptest_core::model::{AnswerOptions, OptionLabel, Question, QuestionId};
use adaptest_core::traits::{explanation_or_default, render_line_breaks};

/// Reply envelope shared by `start-test` and `submit-answer`.
#[derive(Debug, Deserialize)]
pub(crate) struct QuestionEnvelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub new_difficulty: Option<i64>,
    #[serde(default)]
    pub question: Option<RawQuestion>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawQuestion {
    #[serde(rename = "Topic", default)]
    pub topic: Option<String>,
    #[serde(rename = "Difficulty_Level", default)]
    pub difficulty: Option<i64>,
    #[serde(rename = "Question_Text", default)]
    pub text: Option<String>,
    #[serde(rename = "Option_A", default)]
    pub option_a: Option<String>,
    #[serde(rename = "Option_B", default)]
    pub option_b: Option<String>,
    #[serde(rename = "Option_C", default)]
    pub option_c: Option<String>,
    #[serde(rename = "Option_D", default)]
    pub option_d: Option<String>,
    #[serde(rename = "Correct_Option", default)]
    pub correct_option: Option<String>,
    #[serde(rename = "Explanation", default)]
    pub explanation: Option<String>,
}

impl QuestionEnvelope {
    /// Validate the envelope and normalize its question.
    pub fn into_question(self, id: QuestionId) -> Result<Question, GatewayError> {
        if self.status.as_deref() == Some("error") {
            return Err(GatewayError::Api {
                status: 200,
                message: self
                    .message
                    .unwrap_or_else(|| "service reported an error".into()),
            });
        }
        if let Some(next) = self.new_difficulty {
            tracing::debug!(new_difficulty = next, "service chose next difficulty");
        }
        self.question
            .ok_or(GatewayError::MissingField("question"))?
            .into_question(id)
    }
}

impl RawQuestion {
    pub fn into_question(self, id: QuestionId) -> Result<Question, GatewayError> {
        let topic = required(self.topic, "Topic")?;
        let text = required(self.text, "Question_Text")?;

        let difficulty = self
            .difficulty
            .ok_or(GatewayError::MissingField("Difficulty_Level"))?;
        let difficulty = u32::try_from(difficulty)
            .ok()
            .filter(|d| *d > 0)
            .ok_or_else(|| GatewayError::InvalidField {
                field: "Difficulty_Level",
                value: difficulty.to_string(),
            })?;

        let options = AnswerOptions {
            a: required(self.option_a, "Option_A")?,
            b: required(self.option_b, "Option_B")?,
            c: required(self.option_c, "Option_C")?,
            d: required(self.option_d, "Option_D")?,
        };

        let correct = required(self.correct_option, "Correct_Option")?;
        let correct_option =
            correct
                .parse::<OptionLabel>()
                .map_err(|_| GatewayError::InvalidField {
                    field: "Correct_Option",
                    value: correct.clone(),
                })?;

        Ok(Question {
            id,
            topic,
            difficulty,
            text: render_line_breaks(&text),
            options,
            correct_option,
            explanation: explanation_or_default(self.explanation),
        })
    }
}

/// A present, non-blank string field, trimmed.
fn required(value: Option<String>, field: &'static str) -> Result<String, GatewayError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(GatewayError::MissingField(field)),
    }
}
