//! Bridge to the page's MathJax instance.
//!
//! The engine is loaded by a separate script, so the bridge only looks it up
//! on `window`. Readiness is observed once per page; everything that needs
//! the engine registers a hook that runs when (or immediately if) it is ready.
//! Typeset calls from every widget share one queue, since the engine does not
//! support overlapping passes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::timers::future::TimeoutFuture;
use js_sys::{Array, Function, Object, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::Element;

use texpad_core::RenderError;

const ENGINE_GLOBAL: &str = "MathJax";

thread_local! {
    static READY: Cell<bool> = Cell::new(false);
    static WATCHING: Cell<bool> = Cell::new(false);
    static READY_HOOKS: RefCell<Vec<Rc<dyn Fn()>>> = RefCell::new(Vec::new());
    static QUEUE_TAIL: RefCell<Option<Promise>> = RefCell::new(None);
}

/// Exclusive use of the engine; the next queued caller proceeds on drop.
struct Turn {
    release: Function,
}

impl Drop for Turn {
    fn drop(&mut self) {
        let _ = self.release.call0(&JsValue::NULL);
    }
}

/// Waits until every earlier caller has released the engine.
async fn take_turn() -> Turn {
    let mut release = Function::new_no_args("");
    let gate = Promise::new(&mut |resolve, _reject| release = resolve);
    let previous = QUEUE_TAIL.with(|tail| tail.replace(Some(gate)));
    if let Some(previous) = previous {
        let _ = JsFuture::from(previous).await;
    }
    Turn { release }
}

fn engine() -> Option<Object> {
    let window = web_sys::window()?;
    let value = Reflect::get(&window, &JsValue::from_str(ENGINE_GLOBAL)).ok()?;
    if value.is_null() || value.is_undefined() {
        return None;
    }
    value.dyn_into::<Object>().ok()
}

fn method(target: &Object, name: &str) -> Option<Function> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()?
        .dyn_into::<Function>()
        .ok()
}

/// `MathJax.startup.promise`, present once the loader has started.
fn startup_promise(engine: &Object) -> Option<Promise> {
    let startup = Reflect::get(engine, &JsValue::from_str("startup")).ok()?;
    if startup.is_null() || startup.is_undefined() {
        return None;
    }
    Reflect::get(&startup, &JsValue::from_str("promise"))
        .ok()?
        .dyn_into::<Promise>()
        .ok()
}

fn typeset_available() -> bool {
    engine()
        .and_then(|engine| method(&engine, "typesetPromise"))
        .is_some()
}

pub(crate) fn is_ready() -> bool {
    READY.with(Cell::get)
}

/// Starts watching for the engine. Awaits the loader's startup promise when
/// it is exposed and falls back to polling every `poll_ms`.
pub(crate) fn watch(poll_ms: u32) {
    if WATCHING.with(|watching| watching.replace(true)) {
        return;
    }
    spawn_local(async move {
        wait_for_engine(poll_ms).await;
        mark_ready();
    });
}

/// Resolves once `typesetPromise` exists. A rejected startup promise is not
/// awaited again.
async fn wait_for_engine(poll_ms: u32) {
    let mut startup_awaited = false;
    loop {
        if !startup_awaited {
            if let Some(promise) = engine().as_ref().and_then(startup_promise) {
                startup_awaited = true;
                if let Err(err) = JsFuture::from(promise).await {
                    gloo::console::warn!("mathjax startup rejected", err);
                }
            }
        }
        if typeset_available() {
            return;
        }
        TimeoutFuture::new(poll_ms).await;
    }
}

fn mark_ready() {
    if READY.with(|ready| ready.replace(true)) {
        return;
    }
    gloo::console::log!("mathjax ready");
    let hooks = READY_HOOKS.with(|hooks| std::mem::take(&mut *hooks.borrow_mut()));
    for hook in hooks {
        hook();
    }
}

/// Runs `hook` once the engine is usable.
pub(crate) fn on_ready(hook: Rc<dyn Fn()>) {
    if is_ready() {
        hook();
        return;
    }
    READY_HOOKS.with(|hooks| hooks.borrow_mut().push(hook));
}

/// Typesets `nodes` in place. With `reset`, previous output for those nodes
/// is forgotten first so the engine does not track stale equations.
pub(crate) async fn typeset(nodes: &[Element], reset: bool) -> Result<(), RenderError> {
    let _turn = take_turn().await;
    let engine = engine().ok_or(RenderError::EngineNotReady)?;
    let typeset = method(&engine, "typesetPromise").ok_or(RenderError::EngineNotReady)?;
    let targets = Array::new();
    for node in nodes {
        targets.push(node);
    }
    if reset {
        if let Some(clear) = method(&engine, "typesetClear") {
            let _ = clear.call1(&engine, &targets);
        }
    }
    let result = typeset
        .call1(&engine, &targets)
        .map_err(|err| RenderError::Typeset(js_message(&err)))?;
    await_result(result).await
}

/// Typesets the whole page.
pub(crate) async fn typeset_page() -> Result<(), RenderError> {
    let _turn = take_turn().await;
    let engine = engine().ok_or(RenderError::EngineNotReady)?;
    let typeset = method(&engine, "typesetPromise").ok_or(RenderError::EngineNotReady)?;
    let result = typeset
        .call0(&engine)
        .map_err(|err| RenderError::Typeset(js_message(&err)))?;
    await_result(result).await
}

async fn await_result(result: JsValue) -> Result<(), RenderError> {
    let promise = result
        .dyn_into::<Promise>()
        .map_err(|_| RenderError::Typeset("typesetPromise returned no promise".into()))?;
    JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|err| RenderError::Typeset(js_message(&err)))
}

pub(crate) fn js_message(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|message| message.as_string())
        .unwrap_or_else(|| format!("{value:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn missing_engine_is_not_available() {
        assert!(!typeset_available());
    }

    #[wasm_bindgen_test(async)]
    async fn typeset_without_engine_reports_not_ready() {
        let result = typeset(&[], true).await;
        assert_eq!(result, Err(RenderError::EngineNotReady));
    }

    /// Installs a fake engine whose passes take a while and which counts
    /// passes that start while another is still running.
    fn install_slow_engine() {
        Function::new_no_args(
            r#"
            const engine = { running: 0, overlapped: 0, calls: 0 };
            engine.typesetPromise = function () {
                engine.calls += 1;
                if (engine.running > 0) { engine.overlapped += 1; }
                engine.running += 1;
                return new Promise(function (resolve) {
                    setTimeout(function () { engine.running -= 1; resolve(); }, 20);
                });
            };
            window.MathJax = engine;
            "#,
        )
        .call0(&JsValue::NULL)
        .expect("install engine");
    }

    fn engine_counter(name: &str) -> f64 {
        let engine = engine().expect("engine installed");
        Reflect::get(&engine, &JsValue::from_str(name))
            .expect("counter")
            .as_f64()
            .expect("number")
    }

    #[wasm_bindgen_test(async)]
    async fn typeset_calls_never_overlap() {
        install_slow_engine();
        let document = crate::dom::document().expect("document");
        let preview = document.create_element("div").expect("div");
        spawn_local(async {
            let _ = typeset_page().await;
        });
        spawn_local(async {
            let _ = typeset_page().await;
        });
        let result = typeset(std::slice::from_ref(&preview), true).await;
        TimeoutFuture::new(100).await;

        assert_eq!(result, Ok(()));
        assert_eq!(engine_counter("calls"), 3.0);
        assert_eq!(engine_counter("overlapped"), 0.0);
        let window = web_sys::window().expect("window");
        Reflect::delete_property(&window, &JsValue::from_str(ENGINE_GLOBAL)).expect("remove");
    }

    #[wasm_bindgen_test(async)]
    async fn queue_moves_on_after_a_failed_pass() {
        let first = take_turn().await;
        drop(first);
        let second = take_turn().await;
        drop(second);
        assert!(typeset(&[], false).await.is_err());
        assert!(typeset(&[], false).await.is_err());
    }

    #[wasm_bindgen_test(async)]
    async fn rejected_startup_is_awaited_once() {
        Function::new_no_args(
            r#"
            const engine = { startupReads: 0 };
            engine.startup = {
                get promise() {
                    engine.startupReads += 1;
                    const failed = Promise.reject(new Error("loader failed"));
                    failed.catch(function () {});
                    return failed;
                },
            };
            setTimeout(function () {
                engine.typesetPromise = function () { return Promise.resolve(); };
            }, 40);
            window.MathJax = engine;
            "#,
        )
        .call0(&JsValue::NULL)
        .expect("install engine");

        wait_for_engine(5).await;

        assert!(typeset_available());
        assert_eq!(engine_counter("startupReads"), 1.0);
        let window = web_sys::window().expect("window");
        Reflect::delete_property(&window, &JsValue::from_str(ENGINE_GLOBAL)).expect("remove");
    }

    #[wasm_bindgen_test]
    fn js_message_reads_error_objects() {
        let error = js_sys::Error::new("bad \\frac");
        assert_eq!(js_message(&error.into()), "bad \\frac");
        assert_eq!(js_message(&JsValue::from_str("plain")), "plain");
    }
}
