//! Block-editor answers.
//!
//! [`EditorAdapter`] sits between a third-party block editor and the quiz:
//! it seeds the editor from a stored answer, debounces change notifications,
//! and turns each save into a markdown [`Answer`] that still carries the raw
//! editor JSON for a lossless restore.

pub mod debounce;

use std::time::{Duration, Instant};

use crate::convert::{BlockDocument, blocks_to_markdown};
use crate::models::{Answer, AnswerData, Question};
use crate::render::markdown_to_html;

pub use debounce::{DEFAULT_DEBOUNCE, Debouncer};

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("Editor failed to save: {0}")]
    Save(String),
    #[error("Editor data could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The editor being wrapped.
pub trait BlockEditor {
    /// Replace the editor content.
    fn load(&mut self, document: BlockDocument);
    fn save(&mut self) -> Result<BlockDocument, EditorError>;
    /// Release the editor. Called once, after which it is dropped.
    fn destroy(&mut self);
}

/// A saved editor change, ready to record on the quiz.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorUpdate {
    pub answer: Answer,
    /// The answer's markdown rendered to HTML.
    pub preview: String,
}

pub struct EditorAdapter<E: BlockEditor> {
    editor: Option<E>,
    question: Question,
    debouncer: Debouncer,
}

impl<E: BlockEditor> EditorAdapter<E> {
    pub fn new(mut editor: E, question: &Question, answer: Option<&Answer>, debounce: Duration) -> Self {
        editor.load(Self::initial_data(answer));
        Self {
            editor: Some(editor),
            question: question.clone(),
            debouncer: Debouncer::new(debounce),
        }
    }

    /// What the editor should start with: the stored editor JSON when it
    /// parses, else one paragraph holding the answer's first value.
    pub fn initial_data(answer: Option<&Answer>) -> BlockDocument {
        let Some(answer) = answer else {
            return BlockDocument::single_paragraph("");
        };

        if let Some(data) = &answer.data {
            match serde_json::from_str(&data.editor_data) {
                Ok(document) => return document,
                Err(e) => log::warn!(
                    "Stored editor data for question {} is invalid, using the answer text: {e}",
                    answer.question_id
                ),
            }
        }

        BlockDocument::single_paragraph(answer.value.first().cloned().unwrap_or_default())
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn editor(&self) -> Option<&E> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut E> {
        self.editor.as_mut()
    }

    pub fn is_destroyed(&self) -> bool {
        self.editor.is_none()
    }

    pub fn has_pending_save(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Note an edit. The save happens once edits stop for the debounce delay.
    pub fn on_change(&mut self, now: Instant) {
        if self.editor.is_some() {
            self.debouncer.trigger(now);
        }
    }

    pub fn poll(&mut self, now: Instant) -> Option<EditorUpdate> {
        if self.debouncer.poll(now) {
            self.save()
        } else {
            None
        }
    }

    /// Save a pending change now instead of waiting out the delay.
    pub fn flush(&mut self) -> Option<EditorUpdate> {
        if self.debouncer.take() {
            self.save()
        } else {
            None
        }
    }

    /// Cancel any pending save, then destroy and drop the editor.
    pub fn destroy(&mut self) {
        self.debouncer.cancel();
        if let Some(mut editor) = self.editor.take() {
            editor.destroy();
        }
    }

    fn save(&mut self) -> Option<EditorUpdate> {
        let editor = self.editor.as_mut()?;
        match Self::build_update(editor, &self.question) {
            Ok(update) => Some(update),
            Err(e) => {
                log::error!("Saving editor for question {} failed: {e}", self.question.id);
                None
            }
        }
    }

    fn build_update(editor: &mut E, question: &Question) -> Result<EditorUpdate, EditorError> {
        let document = editor.save()?;
        let markdown = blocks_to_markdown(&document);
        let editor_data = serde_json::to_string(&document)?;

        let preview = markdown_to_html(&markdown);
        let mut answer = Answer::for_question(question, vec![markdown]);
        answer.data = Some(AnswerData { editor_data });

        Ok(EditorUpdate { answer, preview })
    }
}

impl<E: BlockEditor> Drop for EditorAdapter<E> {
    fn drop(&mut self) {
        self.destroy();
    }
}
