use std::sync::LazyLock;

use regex::Regex;

static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<a\s+(?:[^>]*?\s)?href="([^"]+)"[^>]*>([^<]+)</a>"#).expect("Invalid anchor regex")
});
static BR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<br\s*/?>").expect("Invalid line break regex"));
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("Invalid tag regex"));

/// Reduce the inline HTML an editor puts in its text fields to markdown.
///
/// Anchors become `[text](href)` before anything else so their targets
/// survive tag stripping. Entities are left as they are.
pub fn clean_inline_html(text: &str) -> String {
    let text = ANCHOR_RE.replace_all(text, "[${2}](${1})");
    let text = BR_RE.replace_all(&text, "\n");
    TAG_RE.replace_all(&text, "").into_owned()
}
