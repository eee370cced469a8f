use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Question;

/// A user's response, keyed to a question by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: String,
    pub value: Vec<String>,
    pub question_name: String,
    pub question_text: String,
    /// Raw editor payload for block-editor answers, so the editor can be
    /// restored losslessly instead of from the markdown value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<AnswerData>,
}

impl Answer {
    pub fn for_question(question: &Question, value: Vec<String>) -> Self {
        Self {
            question_id: question.id.clone(),
            value,
            question_name: question.name.clone(),
            question_text: question.text.clone(),
            data: None,
        }
    }

    /// True when at least one value is non-blank.
    pub fn has_value(&self) -> bool {
        self.value.iter().any(|v| !v.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerData {
    pub editor_data: String,
}

/// Persisted progress for one (source, submission) pair.
///
/// `expires_at` is only ever set by submission; a read past it is treated as
/// absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizState {
    pub id: String,
    pub current_page_index: usize,
    pub answers: Vec<Answer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl QuizState {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at < now)
    }
}

/// Payload handed to the submission callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSubmission {
    pub answers: Vec<Answer>,
    pub state: serde_json::Map<String, serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}
