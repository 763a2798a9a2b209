use texpad_core::layout::place_panel;
use texpad_core::{HorizontalAnchor, PaletteController, PanelGeometry, Rect, Viewport};

const VIEWPORT_WIDTH: f64 = 1200.0;

fn geometry_for(button: Rect) -> PanelGeometry {
    PanelGeometry {
        button,
        toolbar: Rect::new(20.0, 100.0, 1160.0, 48.0),
        bar_offset_top: 8.0,
        bar_height: 36.0,
        viewport: Viewport::new(VIEWPORT_WIDTH, 900.0),
    }
}

#[test]
fn switching_category_keeps_exactly_one_active() {
    let mut controller = PaletteController::new();
    let greek = geometry_for(Rect::new(40.0, 110.0, 80.0, 30.0));
    let calculus = geometry_for(Rect::new(400.0, 110.0, 80.0, 30.0));
    controller.show_category("greek", Some(&greek));
    controller.show_category("calculus", Some(&calculus));

    let view = controller.view();
    assert_eq!(view.active_category, Some("calculus"));
    assert_eq!(view.visible_group, Some("calculus"));
    assert!(view.panel.is_some());
}

#[test]
fn button_at_left_edge_left_aligns_panel() {
    let placement = place_panel(&geometry_for(Rect::new(0.0, 110.0, 80.0, 30.0)));
    assert_eq!(placement.anchor, HorizontalAnchor::Left(0.0 - 20.0));
    assert_eq!(placement.top, 44.0);
}

#[test]
fn button_at_right_edge_right_aligns_panel() {
    let button = Rect::new(VIEWPORT_WIDTH - 80.0, 110.0, 80.0, 30.0);
    let placement = place_panel(&geometry_for(button));
    assert_eq!(placement.anchor, HorizontalAnchor::Right(1180.0 - VIEWPORT_WIDTH));
    assert_eq!(placement.top, 44.0);
}

#[test]
fn button_centered_on_midpoint_opens_right_aligned() {
    let button = Rect::new(VIEWPORT_WIDTH / 2.0 - 40.0, 110.0, 80.0, 30.0);
    let placement = place_panel(&geometry_for(button));
    assert!(matches!(placement.anchor, HorizontalAnchor::Right(_)));
}

#[test]
fn hide_after_delay_clears_active_button() {
    let mut controller = PaletteController::new();
    controller.show_category("greek", Some(&geometry_for(Rect::new(40.0, 110.0, 80.0, 30.0))));
    let ticket = controller.schedule_hide();
    assert!(controller.hide_elapsed(ticket));
    assert_eq!(controller.active_category(), None);
    assert!(controller.panel().is_none());
    assert!(!controller.hide_elapsed(ticket));
}
