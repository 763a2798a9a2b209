use std::cell::RefCell;

use texpad_core::config::CONFIG_ELEMENT_ID;
use texpad_core::{ClockSettings, EditorSettings, FormulaSettings, SiteConfig};

thread_local! {
    static SITE_CONFIG: RefCell<SiteConfig> = RefCell::new(SiteConfig::default());
}

/// Reads the inline `<script id="texpad-config" type="application/json">`
/// block. A missing block means defaults; a malformed one is logged and
/// ignored.
pub(crate) fn load_site_config() -> SiteConfig {
    let raw = crate::dom::document()
        .and_then(|document| document.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|element| element.text_content())
        .unwrap_or_default();
    match SiteConfig::from_json(&raw) {
        Ok(config) => config,
        Err(err) => {
            gloo::console::warn!("config", err.to_string());
            SiteConfig::default()
        }
    }
}

pub(crate) fn set_site_config(config: SiteConfig) {
    SITE_CONFIG.with(|slot| *slot.borrow_mut() = config);
}

pub(crate) fn editor() -> EditorSettings {
    SITE_CONFIG.with(|slot| slot.borrow().editor.clone())
}

pub(crate) fn clock() -> ClockSettings {
    SITE_CONFIG.with(|slot| slot.borrow().clock.clone())
}

pub(crate) fn formulas() -> FormulaSettings {
    SITE_CONFIG.with(|slot| slot.borrow().formulas.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn inline_config_overrides_defaults() {
        let document = crate::dom::document().expect("document");
        let script = document.create_element("script").expect("script");
        script.set_id(CONFIG_ELEMENT_ID);
        script.set_text_content(Some(r#"{"editor":{"toast_ms":500}}"#));
        document.body().expect("body").append_child(&script).expect("append");

        let config = load_site_config();
        script.remove();
        assert_eq!(config.editor.toast_ms, 500);
        assert_eq!(config.editor.panel_hide_ms, 200);

        set_site_config(config);
        assert_eq!(editor().toast_ms, 500);
        set_site_config(SiteConfig::default());
    }

    #[wasm_bindgen_test]
    fn malformed_config_falls_back() {
        let document = crate::dom::document().expect("document");
        let script = document.create_element("script").expect("script");
        script.set_id(CONFIG_ELEMENT_ID);
        script.set_text_content(Some("{not json"));
        document.body().expect("body").append_child(&script).expect("append");

        let config = load_site_config();
        script.remove();
        assert_eq!(config, SiteConfig::default());
    }
}
