//! One-way conversions from editor output to markdown.
//!
//! [`blocks_to_markdown`] reads the block editor's saved document and
//! [`html_to_markdown`] rewrites serialized rich-text HTML. Neither is the
//! inverse of [`crate::render::markdown_to_html`].

pub mod blocks;
pub mod html;
pub mod inline;

pub use blocks::{Block, BlockDocument, ListItem, ListStyle, blocks_to_markdown};
pub use html::{Stage, html_to_markdown};
pub use inline::clean_inline_html;
