use quizdown_engine::convert::{Block, BlockDocument, blocks_to_markdown};
use quizdown_engine::editor::{BlockEditor, EditorError};

/// A plain text buffer standing in for a block editor.
///
/// Blank lines separate paragraph blocks; a single newline inside a
/// paragraph is kept as a `<br>`, which is how block editors store it.
#[derive(Debug, Default)]
pub struct TerminalEditor {
    buffer: String,
    destroyed: bool,
}

impl TerminalEditor {
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn insert(&mut self, c: char) {
        self.buffer.push(c);
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
    }
}

impl BlockEditor for TerminalEditor {
    fn load(&mut self, document: BlockDocument) {
        self.buffer = blocks_to_markdown(&document);
    }

    fn save(&mut self) -> Result<BlockDocument, EditorError> {
        if self.destroyed {
            return Err(EditorError::Save("editor was destroyed".to_string()));
        }

        let blocks = self
            .buffer
            .split("\n\n")
            .map(str::trim)
            .filter(|paragraph| !paragraph.is_empty())
            .map(|paragraph| Block::Paragraph {
                text: paragraph.replace('\n', "<br>"),
            })
            .collect();
        Ok(BlockDocument::new(blocks))
    }

    fn destroy(&mut self) {
        self.destroyed = true;
        self.buffer.clear();
    }
}
