//! Pattern-based HTML → markdown rewriting.
//!
//! This is not an HTML parser. The input is pushed through a fixed sequence
//! of text rewrites ([`Stage::PIPELINE`]); each stage only sees what earlier
//! stages left behind, so the order matters:
//!
//! - list items unwrap their `<p>` before the paragraph stage turns paragraphs
//!   into blank-line separated text;
//! - links are rewritten before tag stripping would drop their targets;
//! - entities are decoded last so an escaped `&lt;b&gt;` never looks like a tag.
//!
//! Unmatched or unknown markup is never an error: whatever no stage rewrites
//! is removed by [`Stage::StripTags`].

use std::sync::LazyLock;

use regex::{Captures, Regex};

macro_rules! re {
    ($name:ident, $pattern:expr) => {
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($pattern).expect(concat!("Invalid regex ", stringify!($name))));
    };
}

re!(BLANK_RUN_RE, r"\n{3,}");
re!(H1_RE, r"<h1>(.*?)</h1>");
re!(H2_RE, r"<h2>(.*?)</h2>");
re!(H3_RE, r"<h3>(.*?)</h3>");
re!(TABLE_RE, r"(?s)<table>(.*?)</table>");
re!(ROW_RE, r"(?s)<tr>(.*?)</tr>");
re!(CELL_RE, r"(?s)<t[hd]>(.*?)</t[hd]>");
re!(UL_RE, r"(?s)<ul>(.*?)</ul>");
re!(OL_RE, r"(?s)<ol>(.*?)</ol>");
re!(LI_RE, r"(?s)<li>(.*?)</li>");
re!(P_RE, r"(?s)<p>(.*?)</p>");
re!(LINK_RE, r#"<a href="(.*?)">(.*?)</a>"#);
re!(PRE_RE, r"(?s)<pre><code>(.*?)</code></pre>");
re!(CODE_RE, r"<code>(.*?)</code>");
re!(QUOTE_RE, r"(?s)<blockquote>(.*?)</blockquote>");
re!(STRONG_RE, r"<strong>(.*?)</strong>");
re!(EM_RE, r"<em>(.*?)</em>");
re!(STRIKE_RE, r"<(?:s|del)>(.*?)</(?:s|del)>");
re!(BR_RE, r"<br\s*/?>");
re!(TAG_RE, r"<[^>]+>");

/// The five entities decoded, in decoding order.
const ENTITIES: [(&str, &str); 5] = [
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&amp;", "&"),
    ("&quot;", "\""),
    ("&#39;", "'"),
];

/// One named rewrite of the HTML → markdown pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Trim, unify line endings, collapse blank-line runs.
    Normalize,
    /// `h1`–`h3` to `#` headings.
    Headings,
    /// Tables to pipe tables, with a separator after the first row.
    Tables,
    /// `ul`/`ol` to `-` and `N.` items, unwrapping paragraphs inside items.
    Lists,
    Links,
    Paragraphs,
    /// Fenced `pre > code` blocks, then inline `code`.
    Code,
    /// Blockquotes, prefixing every line with `> `.
    Quotes,
    /// Bold, italic and strikethrough.
    Emphasis,
    LineBreaks,
    /// Drop whatever markup is left.
    StripTags,
    DecodeEntities,
    /// Collapse blank-line runs and trim.
    Whitespace,
}

impl Stage {
    pub const PIPELINE: [Stage; 13] = [
        Stage::Normalize,
        Stage::Headings,
        Stage::Tables,
        Stage::Lists,
        Stage::Links,
        Stage::Paragraphs,
        Stage::Code,
        Stage::Quotes,
        Stage::Emphasis,
        Stage::LineBreaks,
        Stage::StripTags,
        Stage::DecodeEntities,
        Stage::Whitespace,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Normalize => "normalize",
            Stage::Headings => "headings",
            Stage::Tables => "tables",
            Stage::Lists => "lists",
            Stage::Links => "links",
            Stage::Paragraphs => "paragraphs",
            Stage::Code => "code",
            Stage::Quotes => "quotes",
            Stage::Emphasis => "emphasis",
            Stage::LineBreaks => "line-breaks",
            Stage::StripTags => "strip-tags",
            Stage::DecodeEntities => "decode-entities",
            Stage::Whitespace => "whitespace",
        }
    }

    pub fn apply(self, input: &str) -> String {
        match self {
            Stage::Normalize => {
                let unified = input.trim().replace("\r\n", "\n");
                BLANK_RUN_RE.replace_all(&unified, "\n\n").into_owned()
            }
            Stage::Headings => {
                let md = H1_RE.replace_all(input, "# ${1}\n\n");
                let md = H2_RE.replace_all(&md, "## ${1}\n\n");
                H3_RE.replace_all(&md, "### ${1}\n\n").into_owned()
            }
            Stage::Tables => TABLE_RE
                .replace_all(input, |caps: &Captures| table_to_markdown(&caps[1]))
                .into_owned(),
            Stage::Lists => {
                let md = UL_RE.replace_all(input, |caps: &Captures| list_to_markdown(&caps[1], false));
                OL_RE
                    .replace_all(&md, |caps: &Captures| list_to_markdown(&caps[1], true))
                    .into_owned()
            }
            Stage::Links => LINK_RE.replace_all(input, "[${2}](${1})").into_owned(),
            Stage::Paragraphs => P_RE.replace_all(input, "${1}\n\n").into_owned(),
            Stage::Code => {
                let md = PRE_RE.replace_all(input, "```\n${1}\n```\n\n");
                CODE_RE.replace_all(&md, "`${1}`").into_owned()
            }
            Stage::Quotes => QUOTE_RE
                .replace_all(input, |caps: &Captures| {
                    let quoted: Vec<String> = caps[1].split('\n').map(|line| format!("> {line}")).collect();
                    quoted.join("\n") + "\n\n"
                })
                .into_owned(),
            Stage::Emphasis => {
                let md = STRONG_RE.replace_all(input, "**${1}**");
                let md = EM_RE.replace_all(&md, "*${1}*");
                STRIKE_RE.replace_all(&md, "~~${1}~~").into_owned()
            }
            Stage::LineBreaks => BR_RE.replace_all(input, "\n").into_owned(),
            Stage::StripTags => TAG_RE.replace_all(input, "").into_owned(),
            Stage::DecodeEntities => ENTITIES
                .iter()
                .fold(input.to_string(), |md, (entity, ch)| md.replace(entity, ch)),
            Stage::Whitespace => BLANK_RUN_RE.replace_all(input, "\n\n").trim().to_string(),
        }
    }
}

fn table_to_markdown(content: &str) -> String {
    let mut result = String::new();
    for (row_index, row) in ROW_RE.captures_iter(content).enumerate() {
        let cells: Vec<&str> = CELL_RE
            .captures_iter(&row[1])
            .filter_map(|cell| cell.get(1).map(|m| m.as_str().trim()))
            .collect();

        result.push_str(&format!("| {} |\n", cells.join(" | ")));
        if row_index == 0 {
            let separator = vec!["---"; cells.len()];
            result.push_str(&format!("| {} |\n", separator.join(" | ")));
        }
    }
    result + "\n"
}

fn list_to_markdown(content: &str, ordered: bool) -> String {
    let mut counter = 0;
    let items = LI_RE.replace_all(content, |caps: &Captures| {
        counter += 1;
        let item = P_RE.replace_all(&caps[1], "${1}");
        let item = item.trim();
        if ordered {
            format!("{counter}. {item}\n")
        } else {
            format!("- {item}\n")
        }
    });
    format!("{}\n\n", items.trim())
}

/// Convert rich-text HTML to markdown by running every [`Stage`] in order.
pub fn html_to_markdown(html: &str) -> String {
    Stage::PIPELINE
        .iter()
        .fold(html.to_string(), |markdown, stage| stage.apply(&markdown))
}
