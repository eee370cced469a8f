//! Persisted quiz progress.
//!
//! One [`QuizState`] record per (source filename, submission id) pair, kept
//! under `quiz_state_<stateId>` in a [`Storage`] medium. Storage and JSON
//! failures never escape this module: they are logged and read as "no
//! state", so a broken medium costs progress, not the quiz.

pub mod storage;

use chrono::{DateTime, TimeDelta, Utc};

use crate::ids;
use crate::models::{Answer, QuizConfig, QuizState};

pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};

const STORAGE_KEY_PREFIX: &str = "quiz_state_";

pub struct QuizStateStore<S: Storage> {
    storage: S,
    state_id: String,
    expiry_in_days: i64,
}

impl<S: Storage> QuizStateStore<S> {
    pub fn new(config: &QuizConfig, storage: S) -> Self {
        let submission_id = config.submission_id.as_deref().unwrap_or_default();
        Self {
            storage,
            state_id: ids::state_id(&config.source, submission_id),
            expiry_in_days: config.expiry_in_days,
        }
    }

    pub fn state_id(&self) -> &str {
        &self.state_id
    }

    pub fn storage_key(&self) -> String {
        format!("{STORAGE_KEY_PREFIX}{}", self.state_id)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn get_state(&mut self) -> Option<QuizState> {
        self.get_state_at(Utc::now())
    }

    /// The stored state as seen at `now`. An expired record is purged and
    /// reported absent.
    pub fn get_state_at(&mut self, now: DateTime<Utc>) -> Option<QuizState> {
        let key = self.storage_key();
        let raw = match self.storage.get_item(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::error!("Failed to read quiz state {key}: {e}");
                return None;
            }
        };

        let state: QuizState = match serde_json::from_str(&raw) {
            Ok(state) => state,
            Err(e) => {
                log::error!("Stored quiz state {key} is not valid: {e}");
                return None;
            }
        };

        if state.is_expired_at(now) {
            log::debug!("Quiz state {key} expired, removing it");
            self.clear_state();
            return None;
        }

        Some(state)
    }

    /// Upsert progress. Submission timestamps already on record are kept.
    pub fn save_state(&mut self, current_page_index: usize, answers: &[Answer]) {
        let existing = self.get_state();
        let state = QuizState {
            id: self.state_id.clone(),
            current_page_index,
            answers: answers.to_vec(),
            submitted_at: existing.as_ref().and_then(|s| s.submitted_at),
            expires_at: existing.as_ref().and_then(|s| s.expires_at),
        };
        self.write(&state);
    }

    pub fn mark_as_submitted(&mut self) {
        self.mark_as_submitted_at(Utc::now());
    }

    /// Stamp the stored state as submitted at `now` and start its expiry
    /// clock. Without stored state this does nothing.
    pub fn mark_as_submitted_at(&mut self, now: DateTime<Utc>) {
        let Some(mut state) = self.get_state_at(now) else {
            return;
        };

        state.submitted_at = Some(now);
        state.expires_at = TimeDelta::try_days(self.expiry_in_days)
            .and_then(|expiry| now.checked_add_signed(expiry));
        if state.expires_at.is_none() {
            log::warn!(
                "Expiry of {} days is out of range, submitted state will not expire",
                self.expiry_in_days
            );
        }
        self.write(&state);
    }

    pub fn clear_state(&mut self) {
        let key = self.storage_key();
        if let Err(e) = self.storage.remove_item(&key) {
            log::error!("Failed to remove quiz state {key}: {e}");
        }
    }

    pub fn is_submitted(&mut self) -> bool {
        self.get_state()
            .is_some_and(|state| state.submitted_at.is_some())
    }

    fn write(&mut self, state: &QuizState) {
        let key = self.storage_key();
        let json = match serde_json::to_string(state) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Failed to serialize quiz state {key}: {e}");
                return;
            }
        };
        if let Err(e) = self.storage.set_item(&key, &json) {
            log::error!("Failed to save quiz state {key}: {e}");
        }
    }
}
