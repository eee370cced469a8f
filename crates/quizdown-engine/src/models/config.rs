use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::QuizSubmission;

pub const DEFAULT_SOURCE: &str = "/questions.xml";
pub const DEFAULT_EXPIRY_IN_DAYS: i64 = 90;

/// Callback invoked with the assembled submission.
pub type SubmitHandler = Arc<dyn Fn(&QuizSubmission) + Send + Sync>;

/// Caller-supplied settings, every field optional. Merged over the defaults
/// by [`QuizConfig::from_options`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizOptions {
    pub source: Option<String>,
    pub debug: Option<bool>,
    pub expiry_in_days: Option<i64>,
    pub submission_id: Option<String>,
    pub state: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Fully resolved configuration for one quiz instance.
#[derive(Clone)]
pub struct QuizConfig {
    pub source: String,
    pub debug: bool,
    pub expiry_in_days: i64,
    /// Filled in from the source filename on load when not given.
    pub submission_id: Option<String>,
    /// Opaque host data echoed back in the submission.
    pub state: serde_json::Map<String, serde_json::Value>,
    pub on_submit: Option<SubmitHandler>,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            debug: false,
            expiry_in_days: DEFAULT_EXPIRY_IN_DAYS,
            submission_id: None,
            state: serde_json::Map::new(),
            on_submit: None,
        }
    }
}

impl QuizConfig {
    pub fn from_options(options: QuizOptions) -> Self {
        let defaults = Self::default();
        Self {
            source: options.source.unwrap_or(defaults.source),
            debug: options.debug.unwrap_or(defaults.debug),
            expiry_in_days: options.expiry_in_days.unwrap_or(defaults.expiry_in_days),
            submission_id: options.submission_id.or(defaults.submission_id),
            state: options.state.unwrap_or(defaults.state),
            on_submit: None,
        }
    }

    pub fn with_on_submit(mut self, handler: impl Fn(&QuizSubmission) + Send + Sync + 'static) -> Self {
        self.on_submit = Some(Arc::new(handler));
        self
    }
}

impl From<QuizOptions> for QuizConfig {
    fn from(options: QuizOptions) -> Self {
        QuizConfig::from_options(options)
    }
}

impl fmt::Debug for QuizConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizConfig")
            .field("source", &self.source)
            .field("debug", &self.debug)
            .field("expiry_in_days", &self.expiry_in_days)
            .field("submission_id", &self.submission_id)
            .field("state", &self.state)
            .field("on_submit", &self.on_submit.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
