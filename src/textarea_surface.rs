use web_sys::HtmlTextAreaElement;

use texpad_core::EditSurface;

/// The editor's `<textarea>`. Offsets are UTF-16 code units, as the DOM
/// selection API reports them.
pub(crate) struct TextAreaSurface {
    element: HtmlTextAreaElement,
}

impl TextAreaSurface {
    pub(crate) fn new(element: HtmlTextAreaElement) -> Self {
        Self { element }
    }
}

impl EditSurface for TextAreaSurface {
    fn text(&self) -> String {
        self.element.value()
    }

    fn cursor(&self) -> usize {
        self.element
            .selection_start()
            .ok()
            .flatten()
            .map(|pos| pos as usize)
            .unwrap_or_else(|| self.element.value().encode_utf16().count())
    }

    fn insert_at_cursor(&mut self, text: &str) {
        let at = self.cursor() as u32;
        let inserted = self
            .element
            .set_range_text_with_start_and_end_and_mode(text, at, at, "end");
        if inserted.is_err() {
            let mut value: Vec<u16> = self.element.value().encode_utf16().collect();
            let at = (at as usize).min(value.len());
            let tail = value.split_off(at);
            value.extend(text.encode_utf16());
            let caret = value.len() as u32;
            value.extend(tail);
            self.element.set_value(&String::from_utf16_lossy(&value));
            let _ = self.element.set_selection_range(caret, caret);
        }
    }

    fn set_text(&mut self, text: &str) {
        self.element.set_value(text);
    }

    fn focus(&mut self) {
        let _ = self.element.focus();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use texpad_core::editing::{clear, insert_command};
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn textarea(value: &str) -> HtmlTextAreaElement {
        let document = crate::dom::document().expect("document");
        let element = document
            .create_element("textarea")
            .expect("textarea")
            .dyn_into::<HtmlTextAreaElement>()
            .expect("textarea element");
        document
            .body()
            .expect("body")
            .append_child(&element)
            .expect("append");
        element.set_value(value);
        element
    }

    #[wasm_bindgen_test]
    fn command_lands_at_cursor() {
        let element = textarea("E=mc^2");
        element.set_selection_range(2, 2).expect("caret");
        let mut surface = TextAreaSurface::new(element.clone());
        insert_command(&mut surface, "\\alpha");
        assert_eq!(element.value(), "E=\\alphamc^2");
        assert_eq!(element.selection_start().ok().flatten(), Some(8));
        element.remove();
    }

    #[wasm_bindgen_test]
    fn clear_empties_the_editor() {
        let element = textarea("\\sum_{i=1}^n i");
        let mut surface = TextAreaSurface::new(element.clone());
        clear(&mut surface);
        assert_eq!(element.value(), "");
        element.remove();
    }
}
