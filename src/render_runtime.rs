//! Drives the live preview through a [`RenderScheduler`].

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use texpad_core::{Dispatch, RenderScheduler};

pub(crate) struct PreviewRenderer {
    scheduler: RefCell<RenderScheduler>,
    preview: Element,
}

impl PreviewRenderer {
    /// Creates the renderer and arranges for text typed before the engine
    /// loads to be rendered once it does.
    pub(crate) fn new(preview: Element) -> Rc<Self> {
        let renderer = Rc::new(Self {
            scheduler: RefCell::new(RenderScheduler::new()),
            preview,
        });
        let weak = Rc::downgrade(&renderer);
        crate::engine::on_ready(Rc::new(move || {
            let Some(renderer) = weak.upgrade() else {
                return;
            };
            let parked = renderer.scheduler.borrow_mut().engine_ready();
            if let Some(text) = parked {
                renderer.submit(text);
            }
        }));
        renderer
    }

    pub(crate) fn request(self: &Rc<Self>, text: &str) {
        let dispatch = self.scheduler.borrow_mut().request(text);
        match dispatch {
            Dispatch::Submit(text) => self.submit(text),
            Dispatch::Coalesced | Dispatch::AwaitingEngine => {}
        }
    }

    fn submit(self: &Rc<Self>, text: String) {
        self.preview.set_text_content(Some(&display_math(&text)));
        let renderer = Rc::clone(self);
        spawn_local(async move {
            let outcome =
                crate::engine::typeset(std::slice::from_ref(&renderer.preview), true).await;
            let completion = renderer.scheduler.borrow_mut().complete(outcome);
            if let Some(err) = completion.error {
                gloo::console::error!("render", err.to_string());
            }
            if let Some(next) = completion.next {
                renderer.submit(next);
            }
        });
    }

    #[cfg(test)]
    fn pending(&self) -> Option<String> {
        self.scheduler.borrow().pending().map(str::to_string)
    }
}

fn display_math(text: &str) -> String {
    format!("$${text}$$")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn source_is_wrapped_as_display_math() {
        assert_eq!(display_math("x^2"), "$$x^2$$");
    }

    #[wasm_bindgen_test]
    fn requests_wait_for_engine() {
        let document = crate::dom::document().expect("document");
        let preview = document.create_element("div").expect("div");
        let renderer = PreviewRenderer::new(preview.clone());
        renderer.request("a");
        renderer.request("a+b");
        assert_eq!(renderer.pending().as_deref(), Some("a+b"));
        assert_eq!(preview.text_content().unwrap_or_default(), "");
    }
}
