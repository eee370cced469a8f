//! # Questionnaire Parsing
//!
//! Turns the questionnaire XML into an owned tree of
//! [`Page`] → [`Section`] → [`SectionContent`].
//!
//! ```xml
//! <page id="intro" title="About you" submit="false">
//!   <section>
//!     <markdown width="40">Tell us a little **about yourself**.</markdown>
//!     <questions>
//!       <question type="text" required="true"><text>Your name</text></question>
//!     </questions>
//!   </section>
//! </page>
//! ```
//!
//! ## Rules
//!
//! - Pages are every `page` element in document order; sections are the
//!   direct `section` children of a page.
//! - A section child named `markdown` (any case) is prose; any other element
//!   is a container whose `question` descendants become questions.
//! - Section children get widths from [`layout::allocate`].
//! - Booleans are `true` only for the exact string `"true"`.
//! - A question without an `id` gets one derived from the page's `id`
//!   attribute, its text and its position in the container, so re-parsing
//!   unchanged XML reproduces it. Choice values without a `value` attribute
//!   are random per parse.
//! - Malformed XML is logged and yields no pages.

pub mod layout;
pub mod xml;

use crate::ids;
use crate::models::questionnaire::DEFAULT_SUBMIT_REMARKS;
use crate::models::{
    Choice, MarkdownBlock, Page, Question, QuestionType, QuestionsBlock, Section, SectionContent,
};
use crate::render::markdown_to_html;

use layout::{allocate, parse_width};
use xml::XmlElement;

/// Parse a questionnaire document into its pages.
pub fn parse_questionnaire(xml_text: &str) -> Vec<Page> {
    let document = match xml::parse_document(xml_text) {
        Ok(document) => document,
        Err(e) => {
            log::warn!("Questionnaire XML could not be parsed, no pages produced: {e}");
            return Vec::new();
        }
    };

    document
        .descendants_named("page")
        .into_iter()
        .map(parse_page)
        .collect()
}

fn parse_page(page: &XmlElement) -> Page {
    Page {
        id: non_empty_attr(page, "id")
            .map(str::to_string)
            .unwrap_or_else(ids::fresh_id),
        title: page.attr("title").unwrap_or_default().to_string(),
        submit: bool_attr(page, "submit"),
        submit_remarks: non_empty_attr(page, "submit-remarks")
            .unwrap_or(DEFAULT_SUBMIT_REMARKS)
            .to_string(),
        sections: parse_sections(page),
    }
}

fn parse_sections(page: &XmlElement) -> Vec<Section> {
    // Question ids hash the authored page id, never a generated one
    let page_id = page.attr("id").unwrap_or_default();

    page.children_named("section")
        .map(|section| {
            let content = allocate(section.child_elements(), |child| {
                child.attr("width").map(parse_width).unwrap_or(0)
            })
            .into_iter()
            .map(|slot| {
                if slot.item.name.eq_ignore_ascii_case("markdown") {
                    SectionContent::Markdown(MarkdownBlock {
                        content: parse_markdown_content(slot.item),
                        width: slot.width,
                    })
                } else {
                    SectionContent::Questions(QuestionsBlock {
                        questions: parse_questions(slot.item, page_id),
                        width: slot.width,
                    })
                }
            })
            .collect();

            Section { content }
        })
        .collect()
}

fn parse_questions(container: &XmlElement, page_id: &str) -> Vec<Question> {
    container
        .descendants_named("question")
        .into_iter()
        .enumerate()
        .map(|(index, question)| {
            let text = question
                .first_descendant_named("text")
                .map(XmlElement::text_content)
                .unwrap_or_default();

            let id = non_empty_attr(question, "id")
                .map(str::to_string)
                .unwrap_or_else(|| ids::question_id(page_id, &text, index));

            let question_type = match question.attr("type") {
                Some(raw) => QuestionType::from_attr(raw).unwrap_or_else(|| {
                    log::warn!("Question {id} has unknown type {raw:?}, treating it as text");
                    QuestionType::default()
                }),
                None => QuestionType::default(),
            };

            Question {
                name: non_empty_attr(question, "name")
                    .map(str::to_string)
                    .unwrap_or_else(|| text.clone()),
                question_type,
                required: bool_attr(question, "required"),
                choices: parse_choices(question),
                allow_multiple: bool_attr(question, "allowMultiple"),
                min_value: float_attr(question, "minValue"),
                max_value: float_attr(question, "maxValue"),
                id,
                text,
            }
        })
        .collect()
}

fn parse_choices(question: &XmlElement) -> Vec<Choice> {
    question
        .descendants_named("choice")
        .into_iter()
        .map(|choice| Choice {
            value: non_empty_attr(choice, "value")
                .map(str::to_string)
                .unwrap_or_else(ids::fresh_id),
            text: choice.text_content(),
            other: bool_attr(choice, "other"),
        })
        .collect()
}

/// Trimmed text rendered to HTML, or `None` when there is no text at all.
fn parse_markdown_content(element: &XmlElement) -> Option<String> {
    let text = element.text_content();
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some(markdown_to_html(text))
}

fn non_empty_attr<'a>(element: &'a XmlElement, name: &str) -> Option<&'a str> {
    element.attr(name).filter(|value| !value.is_empty())
}

fn bool_attr(element: &XmlElement, name: &str) -> bool {
    element.attr(name) == Some("true")
}

fn float_attr(element: &XmlElement, name: &str) -> f64 {
    element
        .attr(name)
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests;
