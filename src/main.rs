mod boot;
mod clipboard;
mod clock_widget;
mod dom;
mod editor_app;
mod engine;
mod export_runtime;
mod formula_runtime;
mod render_runtime;
mod settings;
mod textarea_surface;
mod toast;

fn main() {
    console_error_panic_hook::set_once();
    boot::start();
}
