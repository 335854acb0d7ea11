use crate::buffer::TextBuffer;
use crate::selection::SelectionRange;

/// The editable text control a session drives.
///
/// Offsets are UTF-16 code units, as reported by the control.
pub trait TextInputHandle {
    fn text(&self) -> String;
    fn set_text(&mut self, text: &str);
    fn selection(&self) -> SelectionRange;
    fn set_selection(&mut self, selection: SelectionRange);
    fn has_focus(&self) -> bool;

    /// The current text as a buffer.
    fn buffer(&self) -> TextBuffer {
        TextBuffer::from(self.text())
    }
}

/// In-memory text input over a [`TextBuffer`].
#[derive(Debug, Clone, Default)]
pub struct BufferInput {
    buffer: TextBuffer,
    selection: SelectionRange,
    focused: bool,
}

impl BufferInput {
    /// Creates a focused input with the caret at the end of `text`.
    pub fn new(text: &str) -> Self {
        let buffer = TextBuffer::from(text);
        let selection = SelectionRange::caret(buffer.len_utf16());
        Self {
            buffer,
            selection,
            focused: true,
        }
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.focused = focused;
    }
}

impl TextInputHandle for BufferInput {
    fn text(&self) -> String {
        self.buffer.to_string()
    }

    fn set_text(&mut self, text: &str) {
        self.buffer.set_text(text);
        self.selection = self.selection.clamp(&self.buffer);
    }

    fn selection(&self) -> SelectionRange {
        self.selection
    }

    fn set_selection(&mut self, selection: SelectionRange) {
        self.selection = selection.clamp(&self.buffer);
    }

    fn has_focus(&self) -> bool {
        self.focused
    }

    fn buffer(&self) -> TextBuffer {
        self.buffer.clone()
    }
}
