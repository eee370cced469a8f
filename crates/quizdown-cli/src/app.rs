use std::time::Instant;

use crossterm::event::KeyCode;
use quizdown_engine::editor::{DEFAULT_DEBOUNCE, EditorAdapter, EditorUpdate};
use quizdown_engine::{Question, QuestionType, Quiz, QuizSubmission, Storage};

use crate::editor::TerminalEditor;

pub enum Mode {
    Browse,
    /// Single-line input for text, numeric and decimal questions.
    EditLine {
        question_id: String,
        buffer: String,
    },
    /// `1`-`9` toggle the choices of a choices question.
    Choose { question_id: String },
    EditMarkdown {
        adapter: EditorAdapter<TerminalEditor>,
    },
}

pub struct App<S: Storage> {
    pub quiz: Quiz<S>,
    /// Index into the current page's questions.
    pub selected: usize,
    pub mode: Mode,
    pub status: Option<String>,
    pub submitted: bool,
    /// Set when the quiz was submitted during this run.
    pub submission: Option<QuizSubmission>,
    pub should_quit: bool,
}

impl<S: Storage> App<S> {
    pub fn new(mut quiz: Quiz<S>) -> Self {
        let submitted = quiz.is_submitted();
        Self {
            quiz,
            selected: 0,
            mode: Mode::Browse,
            status: submitted.then(|| "This quiz has already been submitted".to_string()),
            submitted,
            submission: None,
            should_quit: false,
        }
    }

    pub fn page_questions(&self) -> Vec<&Question> {
        self.quiz
            .current_page()
            .map(|page| page.questions().collect())
            .unwrap_or_default()
    }

    pub fn selected_question(&self) -> Option<&Question> {
        self.page_questions().get(self.selected).copied()
    }

    pub fn handle_key(&mut self, code: KeyCode, now: Instant) {
        let mode = std::mem::replace(&mut self.mode, Mode::Browse);
        self.mode = match mode {
            Mode::Browse => self.browse_key(code),
            Mode::EditLine {
                question_id,
                buffer,
            } => self.line_key(code, question_id, buffer),
            Mode::Choose { question_id } => self.choose_key(code, question_id),
            Mode::EditMarkdown { adapter } => self.markdown_key(code, adapter, now),
        };
    }

    /// Record a markdown answer once its debounce window has passed.
    pub fn tick(&mut self, now: Instant) {
        let update = match &mut self.mode {
            Mode::EditMarkdown { adapter } => adapter.poll(now),
            _ => None,
        };
        if let Some(update) = update {
            self.apply_update(update);
        }
    }

    /// Save anything still pending before exit.
    pub fn finish(&mut self) {
        if let Mode::EditMarkdown { mut adapter } = std::mem::replace(&mut self.mode, Mode::Browse) {
            if let Some(update) = adapter.flush() {
                self.apply_update(update);
            }
            adapter.destroy();
        }
    }

    fn browse_key(&mut self, code: KeyCode) -> Mode {
        let question_count = self.page_questions().len();
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') if question_count > 0 => {
                self.selected = (self.selected + 1) % question_count;
            }
            KeyCode::Up | KeyCode::Char('k') if question_count > 0 => {
                self.selected = if self.selected == 0 {
                    question_count - 1
                } else {
                    self.selected - 1
                };
            }
            KeyCode::Right | KeyCode::Char('n') => {
                if self.quiz.next_page() {
                    self.selected = 0;
                    self.status = None;
                }
            }
            KeyCode::Left | KeyCode::Char('p') => {
                if self.quiz.previous_page() {
                    self.selected = 0;
                    self.status = None;
                }
            }
            KeyCode::Char('s') => self.submit(),
            KeyCode::Enter => return self.start_editing(),
            _ => {}
        }
        Mode::Browse
    }

    fn start_editing(&mut self) -> Mode {
        if self.submitted {
            self.status = Some("Answers cannot change after submission".to_string());
            return Mode::Browse;
        }
        let Some(question) = self.selected_question().cloned() else {
            return Mode::Browse;
        };
        self.status = None;

        match question.question_type {
            QuestionType::Choices => Mode::Choose {
                question_id: question.id,
            },
            QuestionType::Markdown => {
                let adapter = EditorAdapter::new(
                    TerminalEditor::default(),
                    &question,
                    self.quiz.answer_for(&question.id),
                    DEFAULT_DEBOUNCE,
                );
                Mode::EditMarkdown { adapter }
            }
            QuestionType::Text | QuestionType::Numeric | QuestionType::Decimal => {
                let buffer = self
                    .quiz
                    .answer_for(&question.id)
                    .and_then(|answer| answer.value.first().cloned())
                    .unwrap_or_default();
                Mode::EditLine {
                    question_id: question.id,
                    buffer,
                }
            }
        }
    }

    fn line_key(&mut self, code: KeyCode, question_id: String, mut buffer: String) -> Mode {
        match code {
            KeyCode::Esc => return Mode::Browse,
            KeyCode::Enter => match self.commit_line(&question_id, &buffer) {
                Ok(()) => {
                    self.status = None;
                    return Mode::Browse;
                }
                Err(message) => self.status = Some(message),
            },
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(c) => buffer.push(c),
            _ => {}
        }
        Mode::EditLine {
            question_id,
            buffer,
        }
    }

    fn commit_line(&mut self, question_id: &str, input: &str) -> Result<(), String> {
        let question = self
            .quiz
            .question(question_id)
            .ok_or_else(|| format!("Unknown question {question_id}"))?;
        let values = validate_input(question, input)?;
        self.quiz
            .answer(question_id, values)
            .map_err(|e| e.to_string())
    }

    fn choose_key(&mut self, code: KeyCode, question_id: String) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Enter => return Mode::Browse,
            KeyCode::Char(digit @ '1'..='9') => {
                let index = digit as usize - '1' as usize;
                self.toggle_choice(&question_id, index);
            }
            _ => {}
        }
        Mode::Choose { question_id }
    }

    fn toggle_choice(&mut self, question_id: &str, index: usize) {
        let Some(question) = self.quiz.question(question_id) else {
            return;
        };
        let Some(choice) = question.choices.get(index) else {
            return;
        };

        let mut values = self
            .quiz
            .answer_for(question_id)
            .map(|answer| answer.value.clone())
            .unwrap_or_default();
        if question.allow_multiple {
            match values.iter().position(|v| *v == choice.value) {
                Some(position) => {
                    values.remove(position);
                }
                None => values.push(choice.value.clone()),
            }
        } else {
            values = vec![choice.value.clone()];
        }

        if let Err(e) = self.quiz.answer(question_id, values) {
            self.status = Some(e.to_string());
        }
    }

    fn markdown_key(
        &mut self,
        code: KeyCode,
        mut adapter: EditorAdapter<TerminalEditor>,
        now: Instant,
    ) -> Mode {
        if code == KeyCode::Esc {
            if let Some(update) = adapter.flush() {
                self.apply_update(update);
            }
            adapter.destroy();
            return Mode::Browse;
        }

        let changed = match adapter.editor_mut() {
            Some(editor) => match code {
                KeyCode::Char(c) => {
                    editor.insert(c);
                    true
                }
                KeyCode::Enter => {
                    editor.insert('\n');
                    true
                }
                KeyCode::Backspace => {
                    editor.backspace();
                    true
                }
                _ => false,
            },
            None => false,
        };
        if changed {
            adapter.on_change(now);
        }
        Mode::EditMarkdown { adapter }
    }

    fn apply_update(&mut self, update: EditorUpdate) {
        match self.quiz.record_answer(update.answer) {
            Ok(()) => self.status = Some("Answer saved".to_string()),
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn submit(&mut self) {
        match self.quiz.submit() {
            Ok(submission) => {
                self.submitted = true;
                self.submission = Some(submission);
                self.status = Some("Submitted, thank you! Press q to exit".to_string());
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }
}

/// Check line input against the question type and bounds. Blank input
/// clears the answer.
pub fn validate_input(question: &Question, input: &str) -> Result<Vec<String>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let number = match question.question_type {
        QuestionType::Numeric => input
            .parse::<i64>()
            .map(|n| n as f64)
            .map_err(|_| format!("{input:?} is not a whole number"))?,
        QuestionType::Decimal => input
            .parse::<f64>()
            .map_err(|_| format!("{input:?} is not a number"))?,
        _ => return Ok(vec![input.to_string()]),
    };

    if let Some(min) = question.min_bound()
        && number < min
    {
        return Err(format!("Must be at least {min}"));
    }
    if let Some(max) = question.max_bound()
        && number > max
    {
        return Err(format!("Must be at most {max}"));
    }
    Ok(vec![input.to_string()])
}
