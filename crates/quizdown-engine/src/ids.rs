//! Identifier derivation.
//!
//! Question ids, submission ids and state ids are opaque base64 tokens over
//! their inputs so that re-parsing or re-loading the same questionnaire lands
//! on the same keys. Pages and choices without an author id get a random v4
//! UUID instead, which is only stable for the lifetime of one parse.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use uuid::Uuid;

fn encode(raw: &str) -> String {
    STANDARD.encode(raw.as_bytes())
}

/// A fresh identifier with negligible collision probability.
pub fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

/// Fallback id for a question that has no `id` attribute.
pub fn question_id(page_id: &str, question_text: &str, index: usize) -> String {
    encode(&format!("{page_id}{question_text}{index}"))
}

/// Last path segment of a URL or path, or the whole input when that segment
/// is empty.
pub fn filename_from_url(url: &str) -> &str {
    match url.rsplit('/').next() {
        Some(name) if !name.is_empty() => name,
        _ => url,
    }
}

/// Submission id used when the host did not configure one.
pub fn submission_id_for(source: &str) -> String {
    encode(filename_from_url(source))
}

/// Sharing key for persisted state: identical (filename, submission id)
/// pairs deliberately collide.
pub fn state_id(source: &str, submission_id: &str) -> String {
    encode(&format!("{}:{submission_id}", filename_from_url(source)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/questions.xml", "questions.xml")]
    #[case("https://example.com/quiz/intro.xml", "intro.xml")]
    #[case("intro.xml", "intro.xml")]
    #[case("https://example.com/quiz/", "https://example.com/quiz/")]
    fn test_filename_from_url(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(filename_from_url(url), expected);
    }

    #[test]
    fn test_question_id_is_deterministic() {
        let first = question_id("p1", "How are you?", 0);
        let second = question_id("p1", "How are you?", 0);

        assert_eq!(first, second);
        assert_ne!(first, question_id("p1", "How are you?", 1));
        assert_ne!(first, question_id("p2", "How are you?", 0));
    }

    #[test]
    fn test_question_id_encodes_inputs() {
        // "p1Hi0" in standard base64
        assert_eq!(question_id("p1", "Hi", 0), "cDFIaTA=");
    }

    #[test]
    fn test_state_id_ignores_directories() {
        assert_eq!(
            state_id("/a/questions.xml", "s1"),
            state_id("https://cdn.example.com/b/questions.xml", "s1")
        );
        assert_ne!(state_id("/questions.xml", "s1"), state_id("/questions.xml", "s2"));
        // "questions.xml:s1"
        assert_eq!(state_id("/questions.xml", "s1"), "cXVlc3Rpb25zLnhtbDpzMQ==");
    }

    #[test]
    fn test_submission_id_for_uses_filename() {
        // "questions.xml"
        assert_eq!(submission_id_for("/questions.xml"), "cXVlc3Rpb25zLnhtbA==");
    }

    #[test]
    fn test_fresh_ids_are_unique() {
        assert_ne!(fresh_id(), fresh_id());
    }
}
