use crate::editor_app::{EditorApp, EditorAppProps};

pub(crate) const EDITOR_HOST_ID: &str = "latex-editor";

/// Single page bootstrap: settings first, then every widget whose host or
/// switch is present. Widgets that need the typesetter register on its
/// readiness instead of assuming it is loaded.
pub(crate) fn start() {
    let config = crate::settings::load_site_config();
    crate::settings::set_site_config(config);

    let editor = crate::settings::editor();
    crate::engine::watch(editor.engine_poll_ms);

    if let Some(host) =
        crate::dom::document().and_then(|document| document.get_element_by_id(EDITOR_HOST_ID))
    {
        gloo::console::log!("mounting editor");
        yew::Renderer::<EditorApp>::with_root_and_props(host, EditorAppProps { settings: editor })
            .render();
    }

    let clock = crate::settings::clock();
    if clock.enabled {
        crate::clock_widget::mount(clock);
    }

    let formulas = crate::settings::formulas();
    if formulas.enabled {
        crate::formula_runtime::start(formulas);
    }
}
