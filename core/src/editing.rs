/// The text widget the palette writes into.
///
/// `cursor` is an offset in the surface's own units; implementations only
/// need to agree with themselves.
pub trait EditSurface {
    fn text(&self) -> String;
    fn cursor(&self) -> usize;
    /// Inserts at the cursor and leaves the cursor after the inserted text.
    fn insert_at_cursor(&mut self, text: &str);
    fn set_text(&mut self, text: &str);
    fn focus(&mut self);
}

/// Writes a palette command at the cursor and hands focus back to the surface.
/// Commands come from the static catalog and are inserted verbatim.
pub fn insert_command<S: EditSurface + ?Sized>(surface: &mut S, command: &str) {
    surface.insert_at_cursor(command);
    surface.focus();
}

pub fn clear<S: EditSurface + ?Sized>(surface: &mut S) {
    surface.set_text("");
    surface.focus();
}

/// In-memory surface with a char-indexed cursor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    cursor: usize,
    focused: bool,
}

impl TextBuffer {
    /// Cursor starts at the end of `text`.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self {
            text,
            cursor,
            focused: false,
        }
    }

    pub fn with_cursor(mut self, cursor: usize) -> Self {
        self.set_cursor(cursor);
        self
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.text.chars().count());
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.text
            .char_indices()
            .nth(chars)
            .map(|(idx, _)| idx)
            .unwrap_or(self.text.len())
    }
}

impl EditSurface for TextBuffer {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn insert_at_cursor(&mut self, text: &str) {
        let at = self.byte_offset(self.cursor);
        self.text.insert_str(at, text);
        self.cursor += text.chars().count();
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.chars().count();
    }

    fn focus(&mut self) {
        self.focused = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_is_clamped_to_text() {
        let buffer = TextBuffer::new("abc").with_cursor(99);
        assert_eq!(buffer.cursor(), 3);
    }

    #[test]
    fn insertion_counts_chars_not_bytes() {
        let mut buffer = TextBuffer::new("α+β").with_cursor(2);
        insert_command(&mut buffer, "\\gamma");
        assert_eq!(buffer.text(), "α+\\gammaβ");
        assert_eq!(buffer.cursor(), 8);
    }

    #[test]
    fn clear_empties_and_focuses() {
        let mut buffer = TextBuffer::new("x^2");
        clear(&mut buffer);
        assert_eq!(buffer.text(), "");
        assert_eq!(buffer.cursor(), 0);
        assert!(buffer.is_focused());
    }
}
