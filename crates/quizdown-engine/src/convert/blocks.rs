//! Block-editor documents and their markdown rendering.
//!
//! The editor saves `{"time", "blocks": [{"id", "type", "data"}], "version"}`.
//! Each known `type` maps onto a [`Block`] variant with a typed payload; an
//! unrecognised type, or a known type whose payload does not fit, becomes
//! [`Block::Unknown`] with the raw data kept.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::inline::clean_inline_html;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl BlockDocument {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            ..Default::default()
        }
    }

    /// A document holding one paragraph, the editor's starting state.
    pub fn single_paragraph(text: impl Into<String>) -> Self {
        Self::new(vec![Block::Paragraph { text: text.into() }])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBlock", into = "RawBlock")]
pub enum Block {
    Header {
        level: u8,
        text: String,
    },
    Paragraph {
        text: String,
    },
    List {
        style: ListStyle,
        items: Vec<ListItem>,
    },
    Quote {
        text: String,
        caption: Option<String>,
    },
    Code {
        code: String,
    },
    Image {
        url: String,
        caption: Option<String>,
    },
    Unknown {
        kind: String,
        data: Value,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    Ordered,
    // Checklists and anything else render as bullets
    #[default]
    #[serde(other)]
    Unordered,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListItem {
    Text(String),
    Nested {
        #[serde(default)]
        content: String,
        #[serde(default)]
        items: Vec<ListItem>,
    },
}

impl ListItem {
    fn parts(&self) -> (&str, &[ListItem]) {
        match self {
            ListItem::Text(text) => (text.as_str(), &[]),
            ListItem::Nested { content, items } => (content.as_str(), items.as_slice()),
        }
    }
}

/// Wire shape of one block.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

#[derive(Deserialize)]
struct HeaderData {
    #[serde(default)]
    text: String,
    #[serde(default = "default_level")]
    level: u8,
}

fn default_level() -> u8 {
    1
}

#[derive(Deserialize)]
struct TextData {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct ListData {
    #[serde(default)]
    style: ListStyle,
    #[serde(default)]
    items: Vec<ListItem>,
}

#[derive(Deserialize)]
struct QuoteData {
    #[serde(default)]
    text: String,
    #[serde(default)]
    caption: Option<String>,
}

#[derive(Deserialize)]
struct CodeData {
    #[serde(default)]
    code: String,
}

#[derive(Deserialize)]
struct ImageFile {
    url: String,
}

#[derive(Deserialize)]
struct ImageData {
    file: ImageFile,
    #[serde(default)]
    caption: Option<String>,
}

impl From<RawBlock> for Block {
    fn from(raw: RawBlock) -> Self {
        fn typed<T: for<'de> Deserialize<'de>>(data: &Value) -> Option<T> {
            serde_json::from_value(data.clone()).ok()
        }

        let block = match raw.kind.as_str() {
            "header" => typed::<HeaderData>(&raw.data).map(|d| Block::Header {
                level: d.level,
                text: d.text,
            }),
            "paragraph" => typed::<TextData>(&raw.data).map(|d| Block::Paragraph { text: d.text }),
            "list" => typed::<ListData>(&raw.data).map(|d| Block::List {
                style: d.style,
                items: d.items,
            }),
            "quote" => typed::<QuoteData>(&raw.data).map(|d| Block::Quote {
                text: d.text,
                caption: d.caption,
            }),
            "code" => typed::<CodeData>(&raw.data).map(|d| Block::Code { code: d.code }),
            "image" => typed::<ImageData>(&raw.data).map(|d| Block::Image {
                url: d.file.url,
                caption: d.caption,
            }),
            _ => None,
        };

        block.unwrap_or_else(|| {
            log::debug!("Keeping editor block of type {:?} as unknown", raw.kind);
            Block::Unknown {
                kind: raw.kind,
                data: raw.data,
            }
        })
    }
}

impl From<Block> for RawBlock {
    fn from(block: Block) -> Self {
        let (kind, data) = match block {
            Block::Header { level, text } => ("header".to_string(), json!({ "text": text, "level": level })),
            Block::Paragraph { text } => ("paragraph".to_string(), json!({ "text": text })),
            Block::List { style, items } => ("list".to_string(), json!({ "style": style, "items": items })),
            Block::Quote { text, caption } => ("quote".to_string(), json!({ "text": text, "caption": caption })),
            Block::Code { code } => ("code".to_string(), json!({ "code": code })),
            Block::Image { url, caption } => {
                ("image".to_string(), json!({ "file": { "url": url }, "caption": caption }))
            }
            Block::Unknown { kind, data } => (kind, data),
        };
        RawBlock {
            id: None,
            kind,
            data,
        }
    }
}

/// Render a block document to markdown.
///
/// Blocks are emitted in order, each followed by a blank line, and the result
/// is trimmed. Text fields go through [`clean_inline_html`]; code is emitted
/// verbatim.
pub fn blocks_to_markdown(document: &BlockDocument) -> String {
    let mut markdown = String::new();

    for block in &document.blocks {
        match block {
            Block::Header { level, text } => {
                markdown.push_str(&"#".repeat(*level as usize));
                markdown.push(' ');
                markdown.push_str(&clean_inline_html(text));
                markdown.push_str("\n\n");
            }
            Block::Paragraph { text } => {
                markdown.push_str(&clean_inline_html(text));
                markdown.push_str("\n\n");
            }
            Block::List { style, items } => {
                push_list_items(&mut markdown, *style, items, 0);
                markdown.push('\n');
            }
            Block::Quote { text, .. } => {
                markdown.push_str("> ");
                markdown.push_str(&clean_inline_html(text));
                markdown.push_str("\n\n");
            }
            Block::Code { code } => {
                markdown.push_str("```\n");
                markdown.push_str(code);
                markdown.push_str("\n```\n\n");
            }
            Block::Image { url, caption } => {
                let caption = caption.as_deref().filter(|c| !c.is_empty());
                let alt = clean_inline_html(caption.unwrap_or("image"));
                let title = caption
                    .map(|c| format!(" \"{}\"", clean_inline_html(c)))
                    .unwrap_or_default();
                markdown.push_str(&format!("![{alt}]({url}{title})\n\n"));
            }
            Block::Unknown { data, .. } => {
                if let Some(text) = data.get("text").and_then(Value::as_str) {
                    markdown.push_str(text);
                    markdown.push_str("\n\n");
                }
            }
        }
    }

    markdown.trim().to_string()
}

fn push_list_items(markdown: &mut String, style: ListStyle, items: &[ListItem], depth: usize) {
    let indent = "  ".repeat(depth);
    for (index, item) in items.iter().enumerate() {
        let (content, children) = item.parts();
        let prefix = match style {
            ListStyle::Ordered => format!("{}.", index + 1),
            ListStyle::Unordered => "-".to_string(),
        };
        markdown.push_str(&format!("{indent}{prefix} {}\n", clean_inline_html(content)));
        push_list_items(markdown, style, children, depth + 1);
    }
}
