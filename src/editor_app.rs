use std::rc::Rc;

use gloo::timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlElement, HtmlTextAreaElement};
use yew::prelude::*;

use texpad_core::editing::{clear, insert_command};
use texpad_core::{
    EditSurface, EditorSettings, HorizontalAnchor, Notice, PaletteController, PaletteView,
    PanelGeometry, SymbolEntry, TooltipContent, CATEGORIES, TEMPLATES,
};

use crate::render_runtime::PreviewRenderer;
use crate::textarea_surface::TextAreaSurface;
use crate::toast::{use_toast, Toast};

#[derive(Clone, Copy, PartialEq, Eq)]
enum EditorTab {
    Shortcuts,
    Templates,
}

#[derive(Properties, PartialEq)]
pub(crate) struct EditorAppProps {
    pub settings: EditorSettings,
}

fn tab_style(visible: bool) -> &'static str {
    if visible {
        "display: block;"
    } else {
        "display: none;"
    }
}

fn panel_style(view: &PaletteView) -> String {
    let Some(panel) = view.panel else {
        return "display: none;".to_string();
    };
    let horizontal = match panel.anchor {
        HorizontalAnchor::Left(left) => format!("left: {left}px; right: auto;"),
        HorizontalAnchor::Right(right) => format!("right: {right}px; left: auto;"),
    };
    format!("display: block; top: {}px; {horizontal}", panel.top)
}

fn tooltip_style(view: &PaletteView) -> String {
    match view.tooltip.as_ref().map(|tooltip| tooltip.position) {
        None => "display: none;".to_string(),
        Some(None) => "display: block; visibility: hidden;".to_string(),
        Some(Some((left, top))) => format!("display: block; left: {left}px; top: {top}px;"),
    }
}

fn symbol_label(entry: &SymbolEntry) -> String {
    format!("\\({}\\)", entry.display)
}

#[function_component(EditorApp)]
pub(crate) fn editor_app(props: &EditorAppProps) -> Html {
    let settings = props.settings.clone();
    let tab = use_state(|| EditorTab::Shortcuts);
    let controller = use_mut_ref(PaletteController::new);
    let view = use_state(PaletteView::default);
    let hide_timer = use_mut_ref(|| None::<Timeout>);
    let last_pointer = use_mut_ref(|| (0.0_f64, 0.0_f64));
    let renderer = use_mut_ref(|| None::<Rc<PreviewRenderer>>);
    let toast = use_toast(settings.toast_ms);

    let root_ref = use_node_ref();
    let toolbar_ref = use_node_ref();
    let bar_ref = use_node_ref();
    let tooltip_ref = use_node_ref();
    let input_ref = use_node_ref();
    let preview_ref = use_node_ref();

    {
        let renderer = renderer.clone();
        let input_ref = input_ref.clone();
        let preview_ref = preview_ref.clone();
        let root_ref = root_ref.clone();
        let initial_source = settings.initial_source.clone();
        use_effect_with((), move |_| {
            if let Some(input) = input_ref.cast::<HtmlTextAreaElement>() {
                input.set_value(&initial_source);
                let _ = input.focus();
            }
            if let Some(preview) = preview_ref.cast::<Element>() {
                let preview_renderer = PreviewRenderer::new(preview);
                preview_renderer.request(&initial_source);
                *renderer.borrow_mut() = Some(preview_renderer);
            }
            crate::engine::on_ready(Rc::new(move || {
                let Some(root) = root_ref.cast::<Element>() else {
                    return;
                };
                let buttons = crate::dom::query_all(&root, ".symbol-btn");
                spawn_local(async move {
                    if let Err(err) = crate::engine::typeset(&buttons, false).await {
                        gloo::console::error!("palette typeset", err.to_string());
                    }
                });
            }));
            || ()
        });
    }

    // Re-place the tooltip once its new content has been laid out.
    {
        let controller = controller.clone();
        let view = view.clone();
        let tooltip_ref = tooltip_ref.clone();
        let last_pointer = last_pointer.clone();
        let offset = settings.tooltip_offset;
        let flip_gap = settings.tooltip_flip_gap;
        let shown = view.tooltip.as_ref().map(|tooltip| tooltip.shown);
        use_effect_with(shown, move |shown| {
            if shown.is_some() {
                if let Some(node) = tooltip_ref.cast::<Element>() {
                    let size = crate::dom::offset_size(&node);
                    let pointer = *last_pointer.borrow();
                    let moved = controller.borrow_mut().move_tooltip(
                        pointer,
                        size,
                        crate::dom::viewport(),
                        offset,
                        flip_gap,
                    );
                    if moved.is_some() {
                        view.set(controller.borrow().view());
                    }
                }
            }
            || ()
        });
    }

    let request_render = {
        let renderer = renderer.clone();
        let input_ref = input_ref.clone();
        Rc::new(move || {
            let Some(input) = input_ref.cast::<HtmlTextAreaElement>() else {
                return;
            };
            if let Some(renderer) = renderer.borrow().as_ref() {
                renderer.request(&input.value());
            }
        })
    };

    let with_surface = {
        let input_ref = input_ref.clone();
        let request_render = request_render.clone();
        Rc::new(move |edit: &dyn Fn(&mut TextAreaSurface)| {
            let Some(input) = input_ref.cast::<HtmlTextAreaElement>() else {
                return;
            };
            let mut surface = TextAreaSurface::new(input);
            edit(&mut surface);
            request_render();
        })
    };

    let show_category = {
        let controller = controller.clone();
        let view = view.clone();
        let hide_timer = hide_timer.clone();
        let toolbar_ref = toolbar_ref.clone();
        let bar_ref = bar_ref.clone();
        Rc::new(move |name: &'static str, button: Option<Element>| {
            hide_timer.borrow_mut().take();
            let toolbar = toolbar_ref.cast::<Element>();
            let bar = bar_ref.cast::<HtmlElement>();
            let geometry = match (button, toolbar, bar) {
                (Some(button), Some(toolbar), Some(bar)) => Some(PanelGeometry {
                    button: crate::dom::rect_of(&button),
                    toolbar: crate::dom::rect_of(&toolbar),
                    bar_offset_top: f64::from(bar.offset_top()),
                    bar_height: f64::from(bar.offset_height()),
                    viewport: crate::dom::viewport(),
                }),
                _ => None,
            };
            controller.borrow_mut().show_category(name, geometry.as_ref());
            view.set(controller.borrow().view());
        })
    };

    let schedule_hide = {
        let controller = controller.clone();
        let view = view.clone();
        let hide_timer = hide_timer.clone();
        let delay = settings.panel_hide_ms;
        Callback::from(move |_: MouseEvent| {
            let ticket = controller.borrow_mut().schedule_hide();
            let controller = controller.clone();
            let view = view.clone();
            let timeout = Timeout::new(delay, move || {
                if controller.borrow_mut().hide_elapsed(ticket) {
                    view.set(controller.borrow().view());
                }
            });
            hide_timer.borrow_mut().replace(timeout);
        })
    };

    let cancel_hide = {
        let controller = controller.clone();
        let hide_timer = hide_timer.clone();
        Callback::from(move |_: MouseEvent| {
            controller.borrow_mut().cancel_hide();
            hide_timer.borrow_mut().take();
        })
    };

    let symbol_button = {
        let controller = controller.clone();
        let view = view.clone();
        let tooltip_ref = tooltip_ref.clone();
        let last_pointer = last_pointer.clone();
        let with_surface = with_surface.clone();
        let offset = settings.tooltip_offset;
        let flip_gap = settings.tooltip_flip_gap;
        move |entry: &'static SymbolEntry| -> Html {
            let onclick = {
                let with_surface = with_surface.clone();
                Callback::from(move |_: MouseEvent| {
                    with_surface(&|surface: &mut TextAreaSurface| {
                        insert_command(surface, entry.command)
                    });
                })
            };
            let onmouseenter = {
                let controller = controller.clone();
                let view = view.clone();
                let last_pointer = last_pointer.clone();
                Callback::from(move |event: MouseEvent| {
                    *last_pointer.borrow_mut() =
                        (f64::from(event.client_x()), f64::from(event.client_y()));
                    controller
                        .borrow_mut()
                        .show_tooltip(TooltipContent::from(entry));
                    view.set(controller.borrow().view());
                })
            };
            let onmousemove = {
                let controller = controller.clone();
                let view = view.clone();
                let last_pointer = last_pointer.clone();
                let tooltip_ref = tooltip_ref.clone();
                Callback::from(move |event: MouseEvent| {
                    let pointer = (f64::from(event.client_x()), f64::from(event.client_y()));
                    *last_pointer.borrow_mut() = pointer;
                    let size = tooltip_ref
                        .cast::<Element>()
                        .map(|node| crate::dom::offset_size(&node))
                        .unwrap_or((0.0, 0.0));
                    let moved = controller.borrow_mut().move_tooltip(
                        pointer,
                        size,
                        crate::dom::viewport(),
                        offset,
                        flip_gap,
                    );
                    if moved.is_some() {
                        view.set(controller.borrow().view());
                    }
                })
            };
            let onmouseleave = {
                let controller = controller.clone();
                let view = view.clone();
                Callback::from(move |_: MouseEvent| {
                    controller.borrow_mut().hide_tooltip();
                    view.set(controller.borrow().view());
                })
            };
            html! {
                <button
                    type="button"
                    class="symbol-btn"
                    data-cmd={entry.command}
                    {onclick}
                    {onmouseenter}
                    {onmousemove}
                    {onmouseleave}
                >
                    { symbol_label(entry) }
                </button>
            }
        }
    };

    let switch_tab = |target: EditorTab| {
        let tab = tab.clone();
        Callback::from(move |_: MouseEvent| tab.set(target))
    };

    let oninput = {
        let request_render = request_render.clone();
        Callback::from(move |_: InputEvent| request_render())
    };

    let on_clear = {
        let with_surface = with_surface.clone();
        Callback::from(move |_: MouseEvent| {
            with_surface(&|surface: &mut TextAreaSurface| clear(surface));
        })
    };

    let on_copy = {
        let input_ref = input_ref.clone();
        let toast = toast.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(input) = input_ref.cast::<HtmlTextAreaElement>() else {
                return;
            };
            let text = TextAreaSurface::new(input).text();
            let toast = toast.clone();
            spawn_local(async move {
                match crate::clipboard::write_text(&text).await {
                    Ok(()) => toast.show(Notice::CopySucceeded),
                    Err(err) => {
                        gloo::console::error!("clipboard", err);
                        toast.show(Notice::CopyFailed);
                    }
                }
            });
        })
    };

    let on_export_svg = {
        let toast = toast.clone();
        let settings = settings.clone();
        Callback::from(move |_: MouseEvent| {
            match crate::export_runtime::export_vector(&settings) {
                Ok(()) => toast.show(Notice::SvgExported),
                Err(err) => {
                    gloo::console::error!("svg export", err.to_string());
                    toast.show(err.notice());
                }
            }
        })
    };

    let on_export_png = {
        let toast = toast.clone();
        let settings = settings.clone();
        Callback::from(move |_: MouseEvent| {
            let toast = toast.clone();
            let settings = settings.clone();
            spawn_local(async move {
                match crate::export_runtime::export_raster(&settings).await {
                    Ok(()) => toast.show(Notice::PngExported),
                    Err(err) => {
                        gloo::console::error!("png export", err.to_string());
                        toast.show(err.notice());
                    }
                }
            });
        })
    };

    let categories = CATEGORIES.iter().map(|category| {
        let name = category.name;
        let show = show_category.clone();
        let onmouseenter = {
            let show = show.clone();
            Callback::from(move |event: MouseEvent| {
                let button = event
                    .current_target()
                    .and_then(|target| target.dyn_into::<Element>().ok());
                show(name, button);
            })
        };
        let onclick = Callback::from(move |event: MouseEvent| {
            let button = event
                .current_target()
                .and_then(|target| target.dyn_into::<Element>().ok());
            show(name, button);
        });
        let class = classes!(
            "category-btn",
            (view.active_category == Some(name)).then_some("active")
        );
        html! {
            <button type="button" {class} data-cat={name} {onmouseenter} {onclick}>
                { category.label }
            </button>
        }
    });

    let groups = CATEGORIES.iter().map(|category| {
        let class = classes!(
            "symbol-group",
            (view.visible_group == Some(category.name)).then_some("active")
        );
        html! {
            <div id={format!("cat-{}", category.name)} {class}>
                { for category.symbols.iter().map(&symbol_button) }
            </div>
        }
    });

    let tooltip = view.tooltip.clone();

    html! {
        <div class="latex-editor-app" ref={root_ref}>
            <div class="editor-tabs">
                <button
                    type="button"
                    class={classes!("editor-tab", (*tab == EditorTab::Shortcuts).then_some("active"))}
                    onclick={switch_tab(EditorTab::Shortcuts)}
                >
                    { "常用符号" }
                </button>
                <button
                    type="button"
                    class={classes!("editor-tab", (*tab == EditorTab::Templates).then_some("active"))}
                    onclick={switch_tab(EditorTab::Templates)}
                >
                    { "公式模板" }
                </button>
            </div>
            <div id="tab-shortcuts" class="tab-content" style={tab_style(*tab == EditorTab::Shortcuts)}>
                <div class="toolbar-container" ref={toolbar_ref} onmouseleave={schedule_hide.clone()}>
                    <div class="category-bar" ref={bar_ref}>
                        { for categories }
                    </div>
                    <div
                        class="symbol-panel-container"
                        style={panel_style(&view)}
                        onmouseenter={cancel_hide}
                        onmouseleave={schedule_hide}
                    >
                        { for groups }
                    </div>
                </div>
            </div>
            <div id="tab-templates" class="tab-content" style={tab_style(*tab == EditorTab::Templates)}>
                <div class="template-list">
                    { for TEMPLATES.iter().map(&symbol_button) }
                </div>
            </div>
            <textarea id="latex-input" ref={input_ref} spellcheck="false" {oninput} />
            <div class="editor-actions">
                <button type="button" onclick={on_copy}>{ "复制代码" }</button>
                <button type="button" onclick={on_clear}>{ "清空" }</button>
                <button type="button" onclick={on_export_svg}>{ "导出 SVG" }</button>
                <button type="button" onclick={on_export_png}>{ "导出 PNG" }</button>
            </div>
            <div id="latex-preview" ref={preview_ref}></div>
            <canvas id="export-canvas" style="display: none;"></canvas>
            <div class="latex-tooltip" ref={tooltip_ref} style={tooltip_style(&view)}>
                if let Some(tooltip) = tooltip {
                    <span class="tooltip-cmd">{ tooltip.content.command }</span>
                    <span class="tooltip-desc">{ tooltip.content.desc_cn.unwrap_or_default() }</span>
                    if let Some(desc_en) = tooltip.content.desc_en {
                        <span class="tooltip-desc-en">{ desc_en }</span>
                    }
                }
            </div>
            <Toast handle={toast} />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use texpad_core::PanelPlacement;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn panel_anchors_to_the_chosen_side() {
        let mut view = PaletteView::default();
        assert_eq!(panel_style(&view), "display: none;");
        view.panel = Some(PanelPlacement {
            top: 42.0,
            anchor: HorizontalAnchor::Left(16.0),
        });
        assert_eq!(
            panel_style(&view),
            "display: block; top: 42px; left: 16px; right: auto;"
        );
        view.panel = Some(PanelPlacement {
            top: 42.0,
            anchor: HorizontalAnchor::Right(8.5),
        });
        assert_eq!(
            panel_style(&view),
            "display: block; top: 42px; right: 8.5px; left: auto;"
        );
    }

    #[wasm_bindgen_test]
    fn tooltip_stays_hidden_until_positioned() {
        let mut controller = PaletteController::new();
        assert_eq!(tooltip_style(&controller.view()), "display: none;");
        controller.show_tooltip(TooltipContent::from(&CATEGORIES[0].symbols[0]));
        assert_eq!(
            tooltip_style(&controller.view()),
            "display: block; visibility: hidden;"
        );
    }

    #[wasm_bindgen_test]
    fn symbol_labels_use_inline_delimiters() {
        let entry = SymbolEntry {
            command: "\\frac{}{}",
            display: "\\frac{a}{b}",
            desc_cn: None,
            desc_en: None,
        };
        assert_eq!(symbol_label(&entry), "\\(\\frac{a}{b}\\)");
    }
}
