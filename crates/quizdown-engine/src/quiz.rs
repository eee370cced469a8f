//! A running quiz: pages, answers and submission.

use chrono::Utc;

use crate::models::{Answer, Page, Question, QuizConfig, QuizSubmission};
use crate::source::{SourceError, SourceLoader, load_questionnaire};
use crate::state::{QuizStateStore, Storage};

/// Where a quiz can be mounted.
pub trait MountHost {
    fn has_element(&self, id: &str) -> bool;
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("Mount point not found: {0}")]
    MountNotFound(String),
    #[error(transparent)]
    Load(#[from] SourceError),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QuizError {
    #[error("Unknown question: {0}")]
    UnknownQuestion(String),
    #[error("Page {0} does not exist")]
    PageOutOfRange(usize),
    #[error("Required questions unanswered: {}", .0.join(", "))]
    MissingRequired(Vec<String>),
    #[error("Page {0} is not a submit page")]
    NotSubmitPage(usize),
    #[error("Quiz has already been submitted")]
    AlreadySubmitted,
}

/// Mount a quiz: check the mount point, load the questionnaire and restore
/// any saved progress.
///
/// `config` is either [`QuizOptions`](crate::models::QuizOptions), merged
/// over the defaults, or a ready [`QuizConfig`] (needed to attach an
/// `on_submit` handler).
pub fn init<S: Storage>(
    host: &dyn MountHost,
    element_id: &str,
    config: impl Into<QuizConfig>,
    loader: &dyn SourceLoader,
    storage: S,
) -> Result<Quiz<S>, InitError> {
    if !host.has_element(element_id) {
        return Err(InitError::MountNotFound(element_id.to_string()));
    }

    let mut config = config.into();
    let pages = load_questionnaire(&mut config, loader)?;
    Ok(Quiz::new(config, pages, storage))
}

pub struct Quiz<S: Storage> {
    config: QuizConfig,
    pages: Vec<Page>,
    store: QuizStateStore<S>,
    current_page: usize,
    answers: Vec<Answer>,
}

impl<S: Storage> Quiz<S> {
    pub fn new(config: QuizConfig, pages: Vec<Page>, storage: S) -> Self {
        let mut store = QuizStateStore::new(&config, storage);
        let (current_page, answers) = match store.get_state() {
            Some(state) => {
                let last_page = pages.len().saturating_sub(1);
                (state.current_page_index.min(last_page), state.answers)
            }
            None => (0, Vec::new()),
        };

        if config.debug {
            log::debug!(
                "Quiz {} restored at page {current_page} with {} answer(s)",
                store.state_id(),
                answers.len()
            );
        }

        Self {
            config,
            pages,
            store,
            current_page,
            answers,
        }
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn store(&self) -> &QuizStateStore<S> {
        &self.store
    }

    pub fn current_page_index(&self) -> usize {
        self.current_page
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.pages.get(self.current_page)
    }

    pub fn is_first_page(&self) -> bool {
        self.current_page == 0
    }

    pub fn is_last_page(&self) -> bool {
        self.current_page + 1 >= self.pages.len()
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn answer_for(&self, question_id: &str) -> Option<&Answer> {
        self.answers.iter().find(|a| a.question_id == question_id)
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.pages
            .iter()
            .flat_map(|page| page.questions())
            .find(|q| q.id == question_id)
    }

    pub fn is_submitted(&mut self) -> bool {
        self.store.is_submitted()
    }

    /// Set the values for a question and persist.
    pub fn answer(&mut self, question_id: &str, values: Vec<String>) -> Result<(), QuizError> {
        let question = self
            .question(question_id)
            .ok_or_else(|| QuizError::UnknownQuestion(question_id.to_string()))?;
        let answer = Answer::for_question(question, values);
        self.upsert(answer);
        Ok(())
    }

    /// Store a ready-made answer, such as one from an editor update.
    pub fn record_answer(&mut self, answer: Answer) -> Result<(), QuizError> {
        if self.question(&answer.question_id).is_none() {
            return Err(QuizError::UnknownQuestion(answer.question_id));
        }
        self.upsert(answer);
        Ok(())
    }

    pub fn next_page(&mut self) -> bool {
        if self.is_last_page() {
            return false;
        }
        self.current_page += 1;
        self.persist();
        true
    }

    pub fn previous_page(&mut self) -> bool {
        if self.is_first_page() {
            return false;
        }
        self.current_page -= 1;
        self.persist();
        true
    }

    pub fn go_to_page(&mut self, index: usize) -> Result<(), QuizError> {
        if index >= self.pages.len() {
            return Err(QuizError::PageOutOfRange(index));
        }
        self.current_page = index;
        self.persist();
        Ok(())
    }

    /// Required questions on a page that have no non-blank value yet.
    pub fn missing_required(&self, page_index: usize) -> Vec<&Question> {
        let Some(page) = self.pages.get(page_index) else {
            return Vec::new();
        };
        page.questions()
            .filter(|q| q.required)
            .filter(|q| !self.answer_for(&q.id).is_some_and(Answer::has_value))
            .collect()
    }

    /// Submit from the current page.
    ///
    /// The submission is persisted and handed to `on_submit` before the
    /// stored state is stamped as submitted.
    pub fn submit(&mut self) -> Result<QuizSubmission, QuizError> {
        if self.store.is_submitted() {
            return Err(QuizError::AlreadySubmitted);
        }
        if !self.current_page().is_some_and(|page| page.submit) {
            return Err(QuizError::NotSubmitPage(self.current_page));
        }

        let missing: Vec<String> = self
            .missing_required(self.current_page)
            .into_iter()
            .map(|q| q.name.clone())
            .collect();
        if !missing.is_empty() {
            return Err(QuizError::MissingRequired(missing));
        }

        let submission = QuizSubmission {
            answers: self.answers.clone(),
            state: self.config.state.clone(),
            timestamp: Utc::now(),
        };

        self.persist();
        if let Some(on_submit) = &self.config.on_submit {
            on_submit(&submission);
        }
        self.store.mark_as_submitted();
        log::info!(
            "Quiz {} submitted with {} answer(s)",
            self.store.state_id(),
            submission.answers.len()
        );

        Ok(submission)
    }

    fn upsert(&mut self, answer: Answer) {
        match self
            .answers
            .iter_mut()
            .find(|existing| existing.question_id == answer.question_id)
        {
            Some(existing) => *existing = answer,
            None => self.answers.push(answer),
        }
        self.persist();
    }

    fn persist(&mut self) {
        self.store.save_state(self.current_page, &self.answers);
    }
}
