use quizdown_engine::{Page, Question, QuestionType, SectionContent, Storage, html_to_markdown};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::{App, Mode};

const HIGHLIGHT: Style = Style::new().bg(Color::Yellow).fg(Color::Black);

pub fn ui<S: Storage>(f: &mut Frame, app: &App<S>) {
    let editing = !matches!(app.mode, Mode::Browse);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Min(0),
                Constraint::Length(if editing { 7 } else { 0 }),
                Constraint::Length(2),
            ]
            .as_ref(),
        )
        .split(f.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(75), Constraint::Percentage(25)].as_ref())
        .split(rows[0]);

    let page = app.quiz.current_page();
    let title = match page {
        Some(page) if !page.title.is_empty() => page.title.clone(),
        _ => "Quiz".to_string(),
    };
    let content = Paragraph::new(page.map(|page| page_lines(app, page)).unwrap_or_else(|| {
        vec![Line::from("This questionnaire has no pages")]
    }))
    .block(Block::default().borders(Borders::ALL).title(title))
    .wrap(Wrap { trim: false });
    f.render_widget(content, columns[0]);

    let sidebar = Paragraph::new(sidebar_lines(app))
        .block(Block::default().borders(Borders::ALL).title("Layout"));
    f.render_widget(sidebar, columns[1]);

    if editing {
        f.render_widget(edit_box(app), rows[1]);
    }

    let help = match &app.status {
        Some(status) => Line::from(Span::styled(
            status.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        None => Line::from(help_text(&app.mode)),
    };
    f.render_widget(Paragraph::new(vec![help]), rows[2]);
}

fn help_text(mode: &Mode) -> &'static str {
    match mode {
        Mode::Browse => {
            "q: Quit | ↑/k ↓/j: Select | Enter: Answer | ←/p →/n: Page | s: Submit"
        }
        Mode::EditLine { .. } => "Enter: Save | Esc: Cancel",
        Mode::Choose { .. } => "1-9: Toggle choice | Enter/Esc: Done",
        Mode::EditMarkdown { .. } => "Type markdown, blank line between paragraphs | Esc: Done",
    }
}

fn page_lines<'a, S: Storage>(app: &'a App<S>, page: &'a Page) -> Vec<Line<'a>> {
    let mut lines = Vec::new();
    let mut question_index = 0;

    for section in &page.sections {
        for block in &section.content {
            match block {
                SectionContent::Markdown(markdown) => {
                    if let Some(html) = &markdown.content {
                        lines.extend(html_to_markdown(html).lines().map(|l| Line::from(l.to_string())));
                        lines.push(Line::default());
                    }
                }
                SectionContent::Questions(questions) => {
                    for question in &questions.questions {
                        let selected = question_index == app.selected;
                        lines.extend(question_lines(app, question, selected));
                        lines.push(Line::default());
                        question_index += 1;
                    }
                }
            }
        }
    }

    if page.submit {
        lines.push(Line::from(Span::styled(
            format!("{} (press s)", page.submit_remarks),
            Style::default().fg(Color::Green),
        )));
    }
    lines
}

fn question_lines<'a, S: Storage>(app: &'a App<S>, question: &'a Question, selected: bool) -> Vec<Line<'a>> {
    let marker = if selected { "▸" } else { " " };
    let required = if question.required { " *" } else { "" };
    let heading = format!("{marker} {}{required}", question.text);
    let mut lines = vec![if selected {
        Line::from(Span::styled(heading, HIGHLIGHT))
    } else {
        Line::from(heading)
    }];

    let values = app
        .quiz
        .answer_for(&question.id)
        .map(|answer| answer.value.as_slice())
        .unwrap_or_default();

    match question.question_type {
        QuestionType::Choices => {
            for (index, choice) in question.choices.iter().enumerate() {
                let checked = if values.contains(&choice.value) { "x" } else { " " };
                let other = if choice.other { " (other)" } else { "" };
                lines.push(Line::from(format!(
                    "    [{checked}] {}. {}{other}",
                    index + 1,
                    choice.text
                )));
            }
        }
        _ if values.is_empty() => lines.push(Line::from(Span::styled(
            "    (no answer)",
            Style::default().fg(Color::DarkGray),
        ))),
        _ => {
            for value in values {
                lines.extend(value.lines().map(|l| Line::from(format!("    > {l}"))));
            }
        }
    }
    lines
}

/// Page position and the width allocated to each section block.
fn sidebar_lines<S: Storage>(app: &App<S>) -> Vec<Line<'static>> {
    let total = app.quiz.pages().len();
    let mut lines = vec![
        Line::from(format!("Page {}/{total}", app.quiz.current_page_index() + 1)),
        Line::from(format!("Answers: {}", app.quiz.answers().len())),
        Line::default(),
    ];

    let Some(page) = app.quiz.current_page() else {
        return lines;
    };
    for (index, section) in page.sections.iter().enumerate() {
        lines.push(Line::from(format!("Section {}", index + 1)));
        for block in &section.content {
            let kind = match block {
                SectionContent::Markdown(_) => "markdown",
                SectionContent::Questions(_) => "questions",
            };
            let width = block.width();
            let bar = "█".repeat((width.max(0) / 10) as usize);
            lines.push(Line::from(format!(" {kind:<10}{width:>4}% {bar}")));
        }
    }
    lines
}

fn edit_box<S: Storage>(app: &App<S>) -> Paragraph<'static> {
    let question_text = |id: &str| {
        app.quiz
            .question(id)
            .map(|q| q.text.clone())
            .unwrap_or_default()
    };

    let (title, body) = match &app.mode {
        Mode::EditLine {
            question_id,
            buffer,
        } => (question_text(question_id), format!("{buffer}▏")),
        Mode::Choose { question_id } => (
            question_text(question_id),
            "Press the number of a choice to toggle it".to_string(),
        ),
        Mode::EditMarkdown { adapter } => (
            adapter.question().text.clone(),
            adapter
                .editor()
                .map(|editor| format!("{}▏", editor.buffer()))
                .unwrap_or_default(),
        ),
        Mode::Browse => (String::new(), String::new()),
    };

    Paragraph::new(body)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false })
}
