use texpad_core::editing::{clear, insert_command};
use texpad_core::{EditSurface, TextBuffer};

#[test]
fn inserts_at_cursor_and_advances_it() {
    let mut buffer = TextBuffer::new("E=mc^2").with_cursor(2);
    insert_command(&mut buffer, "\\alpha");
    assert_eq!(buffer.text(), "E=\\alphamc^2");
    assert_eq!(buffer.cursor(), 2 + "\\alpha".len());
    assert!(buffer.is_focused());
}

#[test]
fn consecutive_inserts_chain_at_cursor() {
    let mut buffer = TextBuffer::new("");
    insert_command(&mut buffer, "\\frac{}{}");
    insert_command(&mut buffer, "\\pi");
    assert_eq!(buffer.text(), "\\frac{}{}\\pi");
}

#[test]
fn insert_after_clear_starts_fresh() {
    let mut buffer = TextBuffer::new("x + y");
    clear(&mut buffer);
    buffer.blur();
    insert_command(&mut buffer, "\\sum");
    assert_eq!(buffer.text(), "\\sum");
    assert!(buffer.is_focused());
}
