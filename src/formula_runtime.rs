//! Hover hints and copy helpers for formulas in rendered site content.
//!
//! Formulas carry their source in `data-latex`. Content inserted later is
//! picked up by a mutation observer that re-typesets the page and binds the
//! new elements after a quiet period.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use gloo::timers::callback::Timeout;
use js_sys::Array;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event, MutationObserver, MutationObserverInit, MutationRecord};

use texpad_core::formula::{decode_entities, FormulaKind};
use texpad_core::layout::place_hint;
use texpad_core::{FormulaSettings, Notice};

const BOUND_ATTR: &str = "data-texpad-bound";
const COPIED_ICON: &str = r#"<svg width="16" height="16" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2"><polyline points="20 6 9 17 4 12"></polyline></svg>"#;
const COPIED_COLOR: &str = "#10b981";

struct Runtime {
    listeners: Vec<EventListener>,
    refresh: Option<Timeout>,
    observer: Option<(MutationObserver, Closure<dyn FnMut(Array, MutationObserver)>)>,
}

thread_local! {
    static RUNTIME: RefCell<Runtime> = RefCell::new(Runtime {
        listeners: Vec::new(),
        refresh: None,
        observer: None,
    });
}

#[derive(Default)]
struct HintSlot {
    pending: Option<Timeout>,
    hint: Option<Element>,
}

impl HintSlot {
    fn dismiss(&mut self) {
        self.pending.take();
        if let Some(hint) = self.hint.take() {
            hint.remove();
        }
    }
}

/// Starts formula enhancement once the engine is ready.
pub(crate) fn start(settings: FormulaSettings) {
    crate::engine::on_ready(Rc::new(move || {
        observe(&settings);
        schedule_refresh(&settings);
    }));
}

fn observe(settings: &FormulaSettings) {
    let Some(document) = crate::dom::document() else {
        return;
    };
    let target = document
        .query_selector(&settings.content_selector)
        .ok()
        .flatten()
        .or_else(|| document.body().map(Into::into));
    let Some(target) = target else {
        return;
    };
    let debounce_settings = settings.clone();
    let callback = Closure::<dyn FnMut(Array, MutationObserver)>::new(
        move |records: Array, _observer: MutationObserver| {
            if added_math(&records) {
                schedule_refresh(&debounce_settings);
            }
        },
    );
    let observer = match MutationObserver::new(callback.as_ref().unchecked_ref()) {
        Ok(observer) => observer,
        Err(err) => {
            gloo::console::warn!("formula observer", crate::engine::js_message(&err));
            return;
        }
    };
    let options = MutationObserverInit::new();
    options.set_child_list(true);
    options.set_subtree(true);
    if let Err(err) = observer.observe_with_options(&target, &options) {
        gloo::console::warn!("formula observer", crate::engine::js_message(&err));
        return;
    }
    RUNTIME.with(|runtime| {
        if let Some((previous, _)) = runtime.borrow_mut().observer.replace((observer, callback)) {
            previous.disconnect();
        }
    });
}

/// Whether any record added an element that is, or contains, a formula.
fn added_math(records: &Array) -> bool {
    records.iter().any(|record| {
        let Ok(record) = record.dyn_into::<MutationRecord>() else {
            return false;
        };
        crate::dom::collect_elements(&record.added_nodes())
            .iter()
            .any(|element| {
                element.class_list().contains("math")
                    || element.query_selector(".math").ok().flatten().is_some()
            })
    })
}

/// Re-typesets and re-binds after `retypeset_debounce_ms` without further
/// triggers.
fn schedule_refresh(settings: &FormulaSettings) {
    let settings_for_refresh = settings.clone();
    let timeout = Timeout::new(settings.retypeset_debounce_ms, move || {
        spawn_local(async move {
            if let Err(err) = crate::engine::typeset_page().await {
                gloo::console::log!("formula typeset", err.to_string());
            }
            bind_all(&settings_for_refresh);
        });
    });
    RUNTIME.with(|runtime| runtime.borrow_mut().refresh.replace(timeout));
}

/// Claims `element` for binding; false if it was bound earlier.
fn claim(element: &Element) -> bool {
    if element.has_attribute(BOUND_ATTR) {
        return false;
    }
    element.set_attribute(BOUND_ATTR, "").is_ok()
}

fn bind_all(settings: &FormulaSettings) {
    let Some(document) = crate::dom::document() else {
        return;
    };
    let Some(root) = document.document_element() else {
        return;
    };
    let mut listeners = Vec::new();
    for button in crate::dom::query_all(&root, ".math-copy-btn") {
        if claim(&button) {
            listeners.push(bind_copy_button(button, settings));
        }
    }
    for kind in [FormulaKind::Inline, FormulaKind::Display] {
        for formula in crate::dom::query_all(&root, kind.selector()) {
            if claim(&formula) {
                listeners.extend(bind_formula(formula, kind, settings));
            }
        }
    }
    RUNTIME.with(|runtime| runtime.borrow_mut().listeners.extend(listeners));
}

fn source_of(formula: &Element) -> Option<String> {
    let raw = formula.get_attribute("data-latex")?;
    if raw.is_empty() {
        return None;
    }
    Some(decode_entities(&raw))
}

fn show_hint(formula: &Element, text: &str, settings: &FormulaSettings) -> Option<Element> {
    let document = crate::dom::document()?;
    let hint = document.create_element("div").ok()?;
    hint.set_class_name("math-tooltip");
    hint.set_text_content(Some(text));
    document.body()?.append_child(&hint).ok()?;
    let (left, top) = place_hint(
        crate::dom::rect_of(formula),
        crate::dom::offset_size(&hint),
        crate::dom::viewport(),
        settings.hint_gap,
        settings.hint_margin,
    );
    crate::dom::set_style(&hint, "top", &format!("{top}px"));
    crate::dom::set_style(&hint, "left", &format!("{left}px"));
    Some(hint)
}

fn bind_formula(
    formula: Element,
    kind: FormulaKind,
    settings: &FormulaSettings,
) -> Vec<EventListener> {
    let slot = Rc::new(RefCell::new(HintSlot::default()));
    let mut listeners = Vec::with_capacity(3);

    let enter = {
        let slot = slot.clone();
        let target = formula.clone();
        let settings = settings.clone();
        EventListener::new(&formula, "mouseenter", move |_| {
            let Some(source) = source_of(&target) else {
                return;
            };
            let mut state = slot.borrow_mut();
            state.dismiss();
            let slot_for_timer = slot.clone();
            let target = target.clone();
            let settings = settings.clone();
            state.pending = Some(Timeout::new(settings.hover_delay_ms, move || {
                let hint = show_hint(&target, &source, &settings);
                let mut state = slot_for_timer.borrow_mut();
                state.pending = None;
                state.hint = hint;
            }));
        })
    };
    listeners.push(enter);

    let leave = {
        let slot = slot.clone();
        EventListener::new(&formula, "mouseleave", move |_| slot.borrow_mut().dismiss())
    };
    listeners.push(leave);

    if kind.copies_on_click() {
        let target = formula.clone();
        let feedback_ms = settings.hint_feedback_ms;
        listeners.push(EventListener::new(&formula, "click", move |_| {
            let Some(source) = source_of(&target) else {
                return;
            };
            let slot = slot.clone();
            spawn_local(async move {
                if let Err(err) = crate::clipboard::write_text(&source).await {
                    gloo::console::error!("formula copy", err);
                    return;
                }
                let Some(hint) = slot.borrow().hint.clone() else {
                    return;
                };
                hint.set_text_content(Some(Notice::FormulaCopied.message()));
                crate::dom::set_style(&hint, "color", COPIED_COLOR);
                Timeout::new(feedback_ms, move || {
                    let mut state = slot.borrow_mut();
                    if state.hint.as_ref() == Some(&hint) {
                        state.dismiss();
                    }
                })
                .forget();
            });
        }));
    }
    listeners
}

fn bind_copy_button(button: Element, settings: &FormulaSettings) -> EventListener {
    let target = button.clone();
    let feedback_ms = settings.copy_feedback_ms;
    let options = EventListenerOptions::enable_prevent_default();
    EventListener::new_with_options(&button, "click", options, move |event: &Event| {
        event.prevent_default();
        event.stop_propagation();
        let source = target
            .closest(".math-formula-wrapper")
            .ok()
            .flatten()
            .and_then(|wrapper| wrapper.query_selector(".math[data-latex]").ok().flatten())
            .and_then(|formula| source_of(&formula));
        let Some(source) = source else {
            return;
        };
        let button = target.clone();
        spawn_local(async move {
            match crate::clipboard::write_text(&source).await {
                Ok(()) => flash_copied(&button, feedback_ms),
                Err(err) => {
                    gloo::console::error!("formula copy", err);
                    if let Some(window) = web_sys::window() {
                        let _ = window.alert_with_message("复制失败，请手动选择文本");
                    }
                }
            }
        });
    })
}

fn flash_copied(button: &Element, feedback_ms: u32) {
    let original = button.inner_html();
    button.set_inner_html(COPIED_ICON);
    crate::dom::set_style(button, "color", COPIED_COLOR);
    let button = button.clone();
    Timeout::new(feedback_ms, move || {
        button.set_inner_html(&original);
        crate::dom::set_style(&button, "color", "");
    })
    .forget();
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn fixture(markup: &str) -> Element {
        let document = crate::dom::document().expect("document");
        let host = document.create_element("div").expect("div");
        host.set_inner_html(markup);
        document.body().expect("body").append_child(&host).expect("append");
        host
    }

    #[wasm_bindgen_test]
    fn elements_are_claimed_once() {
        let host = fixture(r#"<span class="math inline" data-latex="x"></span>"#);
        let formula = host.first_element_child().expect("formula");
        assert!(claim(&formula));
        assert!(!claim(&formula));
        host.remove();
    }

    #[wasm_bindgen_test]
    fn source_is_decoded() {
        let host = fixture(r#"<span class="math inline" data-latex="a &amp;lt; b"></span>"#);
        let formula = host.first_element_child().expect("formula");
        assert_eq!(source_of(&formula).as_deref(), Some("a &lt; b"));
        formula.set_attribute("data-latex", "").expect("attr");
        assert_eq!(source_of(&formula), None);
        host.remove();
    }

    #[wasm_bindgen_test]
    fn hint_is_placed_inside_the_viewport() {
        let host = fixture(r#"<span class="math display" data-latex="\sum">x</span>"#);
        let formula = host.first_element_child().expect("formula");
        let hint = show_hint(&formula, "\\sum", &FormulaSettings::default()).expect("hint");
        assert_eq!(hint.class_name(), "math-tooltip");
        assert_eq!(hint.text_content().as_deref(), Some("\\sum"));
        let left: f64 = hint
            .dyn_ref::<web_sys::HtmlElement>()
            .expect("html element")
            .style()
            .get_property_value("left")
            .expect("left")
            .trim_end_matches("px")
            .parse()
            .expect("number");
        assert!(left >= 10.0);
        hint.remove();
        host.remove();
    }

    #[wasm_bindgen_test]
    fn binding_marks_formulas_and_buttons() {
        let host = fixture(
            r#"<div class="math-formula-wrapper"><span class="math display" data-latex="y"></span><button class="math-copy-btn">c</button></div>"#,
        );
        bind_all(&FormulaSettings::default());
        for element in crate::dom::query_all(&host, ".math, .math-copy-btn") {
            assert!(element.has_attribute(BOUND_ATTR));
        }
        host.remove();
    }
}
