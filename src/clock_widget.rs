//! Draggable analog + digital clock pinned to the viewport.

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo::timers::callback::{Interval, Timeout};
use js_sys::Date;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, MouseEvent, TouchEvent};
use yew::prelude::*;

use texpad_core::clock::{edge_collapse, format_date, format_time, weekday_name};
use texpad_core::{ClockReading, ClockSettings, Drag, EdgeCollapse, HandAngles, WidgetPosition};

const HOST_ID: &str = "floating-clock-host";

#[derive(Clone, Copy, Debug, PartialEq)]
enum Placement {
    /// Offsets from the bottom-left corner, as stored.
    Anchored(WidgetPosition),
    /// Top-left while (or after) being dragged in this session.
    Free { left: f64, top: f64 },
}

impl Placement {
    fn style(self) -> String {
        match self {
            Placement::Anchored(pos) => format!("bottom: {}px; left: {}px;", pos.bottom, pos.left),
            Placement::Free { left, top } => {
                format!("left: {left}px; top: {top}px; bottom: auto;")
            }
        }
    }
}

fn now() -> ClockReading {
    let date = Date::new_0();
    ClockReading {
        year: date.get_full_year() as i32,
        month: date.get_month() + 1,
        day: date.get_date(),
        weekday: date.get_day(),
        hour: date.get_hours(),
        minute: date.get_minutes(),
        second: date.get_seconds(),
        millis: date.get_milliseconds(),
    }
}

fn hand_style(degrees: f64) -> String {
    format!("transform: translateX(-50%) rotate({degrees}deg);")
}

fn load_position(settings: &ClockSettings) -> WidgetPosition {
    let raw = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(&settings.storage_key).ok().flatten());
    WidgetPosition::from_storage(raw.as_deref(), settings.default_position)
}

fn save_position(key: &str, position: &WidgetPosition) {
    let raw = match position.to_storage() {
        Ok(raw) => raw,
        Err(err) => {
            gloo::console::warn!("clock position", err.to_string());
            return;
        }
    };
    let Some(storage) = web_sys::window().and_then(|window| window.local_storage().ok().flatten())
    else {
        return;
    };
    if storage.set_item(key, &raw).is_err() {
        gloo::console::warn!("clock position not saved");
    }
}

/// Pointer position of a mouse or single-touch event.
fn pointer_of(event: &Event) -> Option<(f64, f64)> {
    if let Some(event) = event.dyn_ref::<MouseEvent>() {
        return Some((f64::from(event.client_x()), f64::from(event.client_y())));
    }
    let touch = event.dyn_ref::<TouchEvent>()?.touches().get(0)?;
    Some((f64::from(touch.client_x()), f64::from(touch.client_y())))
}

fn schedule_edge_check(
    node: NodeRef,
    collapse: UseStateHandle<Option<EdgeCollapse>>,
    settings: &ClockSettings,
) {
    let threshold = settings.edge_threshold;
    Timeout::new(settings.edge_check_delay_ms, move || {
        if let Some(element) = node.cast::<Element>() {
            let rect = crate::dom::rect_of(&element);
            collapse.set(edge_collapse(rect, crate::dom::viewport(), threshold));
        }
    })
    .forget();
}

#[derive(Properties, PartialEq)]
pub(crate) struct FloatingClockProps {
    pub settings: ClockSettings,
}

#[function_component(FloatingClock)]
pub(crate) fn floating_clock(props: &FloatingClockProps) -> Html {
    let settings = props.settings.clone();
    let reading = use_state(now);
    let placement = {
        let settings = settings.clone();
        use_state(move || Placement::Anchored(load_position(&settings)))
    };
    let collapse = use_state(|| None::<EdgeCollapse>);
    let dragging = use_state(|| false);
    let drag = use_mut_ref(|| None::<Drag>);
    let node = use_node_ref();

    {
        let reading = reading.clone();
        use_effect_with(settings.tick_ms, move |tick_ms| {
            let interval = Interval::new(*tick_ms, move || reading.set(now()));
            move || drop(interval)
        });
    }

    {
        let node = node.clone();
        let collapse = collapse.clone();
        let settings = settings.clone();
        use_effect_with((), move |_| {
            schedule_edge_check(node, collapse, &settings);
            || ()
        });
    }

    {
        let node = node.clone();
        let drag = drag.clone();
        let placement = placement.clone();
        let collapse = collapse.clone();
        let dragging = dragging.clone();
        let settings = settings.clone();
        use_effect_with((), move |_| {
            let mut listeners = Vec::new();
            if let Some(document) = crate::dom::document() {
                let options = EventListenerOptions {
                    phase: EventListenerPhase::Bubble,
                    passive: false,
                };
                for event_name in ["mousemove", "touchmove"] {
                    let node = node.clone();
                    let drag = drag.clone();
                    let placement = placement.clone();
                    listeners.push(EventListener::new_with_options(
                        &document,
                        event_name,
                        options,
                        move |event: &Event| {
                            let Some(active) = *drag.borrow() else {
                                return;
                            };
                            event.prevent_default();
                            let (Some(pointer), Some(element)) =
                                (pointer_of(event), node.cast::<Element>())
                            else {
                                return;
                            };
                            let size = crate::dom::offset_size(&element);
                            let (left, top) =
                                active.position_for(pointer, size, crate::dom::viewport());
                            placement.set(Placement::Free { left, top });
                        },
                    ));
                }
                for event_name in ["mouseup", "touchend"] {
                    let node = node.clone();
                    let drag = drag.clone();
                    let collapse = collapse.clone();
                    let dragging = dragging.clone();
                    let settings = settings.clone();
                    listeners.push(EventListener::new(&document, event_name, move |_| {
                        if drag.borrow_mut().take().is_none() {
                            return;
                        }
                        dragging.set(false);
                        if let Some(element) = node.cast::<Element>() {
                            let rect = crate::dom::rect_of(&element);
                            let position = WidgetPosition::from_rect(rect, crate::dom::viewport());
                            save_position(&settings.storage_key, &position);
                        }
                        schedule_edge_check(node.clone(), collapse.clone(), &settings);
                    }));
                }
            }
            move || drop(listeners)
        });
    }

    let on_drag_start = {
        let node = node.clone();
        let drag = drag.clone();
        let collapse = collapse.clone();
        let dragging = dragging.clone();
        move |event: &Event| {
            let (Some(pointer), Some(element)) = (pointer_of(event), node.cast::<Element>())
            else {
                return;
            };
            *drag.borrow_mut() = Some(Drag::start(pointer, crate::dom::rect_of(&element)));
            dragging.set(true);
            collapse.set(None);
        }
    };
    let onmousedown = {
        let start = on_drag_start.clone();
        Callback::from(move |event: MouseEvent| start(&event))
    };
    let ontouchstart = Callback::from(move |event: TouchEvent| on_drag_start(&event));

    let angles = HandAngles::from_reading(&reading);
    let class = classes!(
        (*dragging).then_some("dragging"),
        collapse.map(EdgeCollapse::class_name)
    );

    html! {
        <div id="floating-clock" ref={node} {class} style={placement.style()} {onmousedown} {ontouchstart}>
            <div class="clock-content">
                <div class="analog-clock">
                    { for (0..12).map(|_| html! { <div class="clock-mark"></div> }) }
                    <div class="hour-hand" style={hand_style(angles.hour)}></div>
                    <div class="minute-hand" style={hand_style(angles.minute)}></div>
                    <div class="second-hand" style={hand_style(angles.second)}></div>
                </div>
                <div class="digital-time">
                    <div class="time-display">{ format_time(&reading) }</div>
                    <div class="date-weekday-row">
                        <span class="date-display">{ format!("📅 {}", format_date(&reading)) }</span>
                        <span class="weekday-display">{ weekday_name(reading.weekday) }</span>
                    </div>
                </div>
            </div>
        </div>
    }
}

/// Appends a host element to `<body>` and renders the clock into it.
pub(crate) fn mount(settings: ClockSettings) {
    let Some(document) = crate::dom::document() else {
        return;
    };
    let Some(body) = document.body() else {
        return;
    };
    if document.get_element_by_id(HOST_ID).is_some() {
        return;
    }
    let Ok(host) = document.create_element("div") else {
        return;
    };
    host.set_id(HOST_ID);
    if body.append_child(&host).is_err() {
        return;
    }
    yew::Renderer::<FloatingClock>::with_root_and_props(host, FloatingClockProps { settings })
        .render();
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn placement_styles() {
        let anchored = Placement::Anchored(WidgetPosition {
            bottom: 20.0,
            left: 35.5,
        });
        assert_eq!(anchored.style(), "bottom: 20px; left: 35.5px;");
        let free = Placement::Free {
            left: 10.0,
            top: 4.0,
        };
        assert_eq!(free.style(), "left: 10px; top: 4px; bottom: auto;");
    }

    #[wasm_bindgen_test]
    fn hands_rotate_around_their_base() {
        assert_eq!(hand_style(90.0), "transform: translateX(-50%) rotate(90deg);");
    }

    #[wasm_bindgen_test]
    fn stored_position_is_restored() {
        let settings = ClockSettings {
            storage_key: "texpad-test-clock".into(),
            ..ClockSettings::default()
        };
        let position = WidgetPosition {
            bottom: 64.0,
            left: 128.0,
        };
        save_position(&settings.storage_key, &position);
        assert_eq!(load_position(&settings), position);

        let storage = web_sys::window()
            .and_then(|window| window.local_storage().ok().flatten())
            .expect("storage");
        storage.remove_item(&settings.storage_key).expect("remove");
        assert_eq!(load_position(&settings), settings.default_position);
    }

    #[wasm_bindgen_test]
    fn reading_comes_from_the_wall_clock() {
        let reading = now();
        assert!((1..=12).contains(&reading.month));
        assert!(reading.weekday < 7);
        assert!(reading.hour < 24);
    }
}
