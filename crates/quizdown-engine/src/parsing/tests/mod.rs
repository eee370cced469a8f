//! Tests for the questionnaire parser.

use pretty_assertions::assert_eq;

use crate::models::questionnaire::DEFAULT_SUBMIT_REMARKS;
use crate::models::{Page, QuestionType, SectionContent};
use crate::parsing::parse_questionnaire;

const SURVEY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<questionnaire>
  <page id="intro" title="About you">
    <section>
      <markdown width="40">
# Welcome

Tell us about *yourself*.
      </markdown>
      <questions>
        <question type="text" required="true">
          <text>Your name</text>
        </question>
        <question id="age" type="numeric" name="Age" minValue="0" maxValue="130">
          <text>How old are you?</text>
        </question>
      </questions>
    </section>
  </page>
  <page id="prefs" title="Preferences" submit="true" submit-remarks="All done?">
    <section>
      <questions>
        <question type="choices" allowMultiple="true">
          <text>Favourite colours</text>
          <choice value="red">Red</choice>
          <choice value="blue">Blue</choice>
          <choice value="other" other="true">Something else</choice>
        </question>
      </questions>
      <Markdown></Markdown>
    </section>
  </page>
</questionnaire>
"#;

fn blocks(page: &Page) -> Vec<&SectionContent> {
    page.sections.iter().flat_map(|s| s.content.iter()).collect()
}

#[test]
fn pages_are_read_in_document_order() {
    let pages = parse_questionnaire(SURVEY);

    let ids: Vec<_> = pages.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["intro", "prefs"]);
    assert_eq!(pages[0].title, "About you");
    assert_eq!(pages[1].title, "Preferences");
}

#[test]
fn page_defaults_apply_when_attributes_are_missing() {
    let pages = parse_questionnaire("<page><section/></page>");

    assert_eq!(pages.len(), 1);
    let page = &pages[0];
    assert!(!page.id.is_empty());
    assert_eq!(page.title, "");
    assert!(!page.submit);
    assert_eq!(page.submit_remarks, DEFAULT_SUBMIT_REMARKS);
    assert_eq!(page.sections.len(), 1);
    assert!(page.sections[0].content.is_empty());
}

#[test]
fn generated_page_ids_are_unique() {
    let pages = parse_questionnaire("<q><page/><page/></q>");
    assert_ne!(pages[0].id, pages[1].id);
}

#[test]
fn submit_flag_and_remarks_are_read() {
    let pages = parse_questionnaire(SURVEY);

    assert!(!pages[0].submit);
    assert_eq!(pages[0].submit_remarks, DEFAULT_SUBMIT_REMARKS);
    assert!(pages[1].submit);
    assert_eq!(pages[1].submit_remarks, "All done?");
}

#[test]
fn submit_requires_exact_true() {
    let pages = parse_questionnaire(r#"<page submit="TRUE"/>"#);
    assert!(!pages[0].submit);
}

#[test]
fn section_children_are_classified_and_width_allocated() {
    let pages = parse_questionnaire(SURVEY);

    let intro = blocks(&pages[0]);
    assert_eq!(intro.len(), 2);
    assert!(matches!(intro[0], SectionContent::Markdown(b) if b.width == 40));
    assert!(matches!(intro[1], SectionContent::Questions(b) if b.width == 60));

    // The markdown tag check ignores case, and an empty one has no content
    let prefs = blocks(&pages[1]);
    assert_eq!(prefs.len(), 2);
    assert!(matches!(prefs[0], SectionContent::Questions(b) if b.width == 50));
    assert!(matches!(prefs[1], SectionContent::Markdown(b) if b.width == 50 && b.content.is_none()));
}

#[test]
fn one_explicit_width_among_three_leaves_equal_shares() {
    let pages = parse_questionnaire(
        r#"<page><section><markdown width="40">a</markdown><markdown>b</markdown><questions/></section></page>"#,
    );

    let widths: Vec<_> = blocks(&pages[0]).iter().map(|b| b.width()).collect();
    assert_eq!(widths, vec![40, 30, 30]);
}

#[test]
fn huge_explicit_widths_do_not_overflow() {
    let pages = parse_questionnaire(
        r#"<page><section><markdown width="99999999999">a</markdown><markdown width="99999999999">b</markdown><questions/></section></page>"#,
    );

    let widths: Vec<_> = blocks(&pages[0]).iter().map(|b| b.width()).collect();
    assert_eq!(widths, vec![i32::MAX, i32::MAX, i32::MIN]);
}

#[test]
fn markdown_content_is_trimmed_and_rendered() {
    let pages = parse_questionnaire(
        "<page><section><markdown>\n\nSome **bold** text\n\n</markdown></section></page>",
    );

    let content = blocks(&pages[0]);
    let SectionContent::Markdown(block) = content[0] else {
        panic!("expected a markdown block");
    };
    assert_eq!(
        block.content.as_deref(),
        Some("<p>Some <strong>bold</strong> text</p>\n")
    );
}

#[test]
fn whitespace_only_markdown_has_no_content() {
    let pages = parse_questionnaire("<page><section><markdown>   \n  </markdown></section></page>");

    let content = blocks(&pages[0]);
    let SectionContent::Markdown(block) = content[0] else {
        panic!("expected a markdown block");
    };
    assert_eq!(block.content, None);
}

#[test]
fn questions_read_their_attributes() {
    let pages = parse_questionnaire(SURVEY);
    let questions: Vec<_> = pages[0].questions().collect();

    assert_eq!(questions.len(), 2);

    let name = questions[0];
    assert_eq!(name.question_type, QuestionType::Text);
    assert_eq!(name.text, "Your name");
    assert_eq!(name.name, "Your name");
    assert!(name.required);
    assert!(!name.allow_multiple);
    assert!(name.min_value.is_nan());
    assert_eq!(name.min_bound(), None);
    assert_eq!(name.max_bound(), None);

    let age = questions[1];
    assert_eq!(age.id, "age");
    assert_eq!(age.name, "Age");
    assert_eq!(age.question_type, QuestionType::Numeric);
    assert!(!age.required);
    assert_eq!(age.min_bound(), Some(0.0));
    assert_eq!(age.max_bound(), Some(130.0));
}

#[test]
fn invalid_bounds_are_nan() {
    let pages = parse_questionnaire(
        r#"<page><section><questions><question type="decimal" minValue="low" maxValue=""><text>x</text></question></questions></section></page>"#,
    );
    let question = pages[0].questions().next().unwrap();

    assert!(question.min_value.is_nan());
    assert!(question.max_value.is_nan());
}

#[test]
fn choices_are_read_in_order() {
    let pages = parse_questionnaire(SURVEY);
    let question = pages[1].questions().next().unwrap();

    assert_eq!(question.question_type, QuestionType::Choices);
    assert!(question.allow_multiple);

    let choices: Vec<_> = question
        .choices
        .iter()
        .map(|c| (c.value.as_str(), c.text.as_str(), c.other))
        .collect();
    assert_eq!(
        choices,
        vec![
            ("red", "Red", false),
            ("blue", "Blue", false),
            ("other", "Something else", true),
        ]
    );
}

#[test]
fn choices_without_value_get_fresh_tokens() {
    let xml = r#"<page><section><questions><question type="choices"><text>Pick</text><choice>A</choice><choice>B</choice></question></questions></section></page>"#;

    let first = parse_questionnaire(xml);
    let second = parse_questionnaire(xml);

    fn values(pages: &[Page]) -> Vec<String> {
        pages[0]
            .questions()
            .flat_map(|q| q.choices.iter().map(|c| c.value.clone()))
            .collect()
    }
    let (first, second) = (values(&first), values(&second));

    assert_ne!(first[0], first[1]);
    // Not stable across parses
    assert_ne!(first, second);
}

#[test]
fn generated_question_ids_are_stable_across_parses() {
    let xml = r#"
        <page id="p1">
          <section>
            <questions>
              <question type="text"><text>First</text></question>
              <question type="text"><text>Second</text></question>
            </questions>
            <questions>
              <question type="text"><text>First</text></question>
            </questions>
          </section>
        </page>"#;

    let ids = |pages: Vec<Page>| -> Vec<String> {
        pages[0].questions().map(|q| q.id.clone()).collect()
    };
    let first = ids(parse_questionnaire(xml));
    let second = ids(parse_questionnaire(xml));

    assert_eq!(first, second);
    assert_eq!(first[0], crate::ids::question_id("p1", "First", 0));
    assert_eq!(first[1], crate::ids::question_id("p1", "Second", 1));
    // Same text at the same position in another container collides
    assert_eq!(first[2], first[0]);
}

#[test]
fn generated_question_ids_use_empty_page_id_when_page_has_none() {
    let xml = r#"<page><section><questions><question><text>Q</text></question></questions></section></page>"#;

    let pages = parse_questionnaire(xml);
    let question = pages[0].questions().next().unwrap();

    assert_eq!(question.id, crate::ids::question_id("", "Q", 0));
}

#[test]
fn missing_or_unknown_type_falls_back_to_text() {
    let xml = r#"<page><section><questions>
        <question><text>a</text></question>
        <question type="slider"><text>b</text></question>
        <question type="markdown"><text>c</text></question>
    </questions></section></page>"#;

    let pages = parse_questionnaire(xml);
    let types: Vec<_> = pages[0].questions().map(|q| q.question_type).collect();

    assert_eq!(
        types,
        vec![QuestionType::Text, QuestionType::Text, QuestionType::Markdown]
    );
}

#[test]
fn question_without_text_has_empty_text_and_name() {
    let pages = parse_questionnaire(
        r#"<page><section><questions><question type="text"/></questions></section></page>"#,
    );
    let question = pages[0].questions().next().unwrap();

    assert_eq!(question.text, "");
    assert_eq!(question.name, "");
}

#[test]
fn only_direct_sections_belong_to_a_page() {
    let xml = r#"<page><section><questions><section><markdown>nested</markdown></section></questions></section></page>"#;

    let pages = parse_questionnaire(xml);
    assert_eq!(pages[0].sections.len(), 1);
}

#[test]
fn malformed_xml_yields_no_pages() {
    assert!(parse_questionnaire("<page><section></page>").is_empty());
    assert!(parse_questionnaire("not xml at all").is_empty());
}

#[test]
fn empty_document_yields_no_pages() {
    assert!(parse_questionnaire("").is_empty());
    assert!(parse_questionnaire("<questionnaire/>").is_empty());
}
