pub mod convert;
pub mod editor;
pub mod ids;
pub mod models;
pub mod parsing;
pub mod quiz;
pub mod render;
pub mod source;
pub mod state;

// Re-export key types for easier usage
pub use convert::{Block, BlockDocument, Stage, blocks_to_markdown, html_to_markdown};
pub use editor::{BlockEditor, EditorAdapter, EditorError, EditorUpdate};
pub use models::*;
pub use parsing::parse_questionnaire;
pub use quiz::{InitError, MountHost, Quiz, QuizError, init};
pub use render::markdown_to_html;
pub use source::{SiteLoader, SourceError, SourceLoader, load_questionnaire};
pub use state::{FileStorage, MemoryStorage, QuizStateStore, Storage, StorageError};
