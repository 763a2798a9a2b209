//! Hover state for the symbol palette: one active category, one tooltip.

use crate::layout::{place_panel, place_tooltip, PanelGeometry, PanelPlacement, Viewport};
use crate::palette::{category_by_name, SymbolEntry};

/// Identifies one scheduled panel hide. Only the most recent ticket can
/// take effect; cancelling or rescheduling invalidates older ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HideTicket(u64);

#[derive(Clone, Debug, PartialEq)]
pub struct TooltipContent {
    pub command: String,
    pub desc_cn: Option<String>,
    pub desc_en: Option<String>,
}

impl From<&SymbolEntry> for TooltipContent {
    fn from(entry: &SymbolEntry) -> Self {
        Self {
            command: entry.command.to_string(),
            desc_cn: entry.desc_cn.map(str::to_string),
            desc_en: entry.desc_en.map(str::to_string),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TooltipState {
    pub content: TooltipContent,
    pub position: Option<(f64, f64)>,
    /// Bumped on every show, so re-showing identical content is observable.
    pub shown: u64,
}

/// Render-ready copy of the controller state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PaletteView {
    pub active_category: Option<&'static str>,
    /// Symbol group left selected after the panel hides.
    pub visible_group: Option<&'static str>,
    pub panel: Option<PanelPlacement>,
    pub tooltip: Option<TooltipState>,
}

#[derive(Clone, Debug, Default)]
pub struct PaletteController {
    active_category: Option<&'static str>,
    visible_group: Option<&'static str>,
    panel: Option<PanelPlacement>,
    hide_generation: u64,
    hide_pending: bool,
    tooltip: Option<TooltipState>,
    tooltip_shows: u64,
}

impl PaletteController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_category(&self) -> Option<&'static str> {
        self.active_category
    }

    pub fn visible_group(&self) -> Option<&'static str> {
        self.visible_group
    }

    pub fn panel(&self) -> Option<PanelPlacement> {
        self.panel
    }

    pub fn is_hide_pending(&self) -> bool {
        self.hide_pending
    }

    pub fn tooltip(&self) -> Option<&TooltipState> {
        self.tooltip.as_ref()
    }

    /// Activates `name`, deactivating whichever category was active. With
    /// `geometry` the panel is positioned and shown; without it (trigger
    /// button not laid out) only the active markers change. Unknown names
    /// leave nothing active.
    pub fn show_category(
        &mut self,
        name: &str,
        geometry: Option<&PanelGeometry>,
    ) -> Option<PanelPlacement> {
        self.cancel_hide();
        let Some(category) = category_by_name(name) else {
            self.active_category = None;
            self.visible_group = None;
            self.panel = None;
            return None;
        };
        self.active_category = Some(category.name);
        self.visible_group = Some(category.name);
        self.panel = geometry.map(place_panel);
        self.panel
    }

    pub fn schedule_hide(&mut self) -> HideTicket {
        self.hide_generation = self.hide_generation.wrapping_add(1);
        self.hide_pending = true;
        HideTicket(self.hide_generation)
    }

    pub fn cancel_hide(&mut self) {
        if self.hide_pending {
            self.hide_generation = self.hide_generation.wrapping_add(1);
            self.hide_pending = false;
        }
    }

    /// Applies a scheduled hide when its delay elapses. Returns whether the
    /// ticket was still current.
    pub fn hide_elapsed(&mut self, ticket: HideTicket) -> bool {
        if !self.hide_pending || ticket.0 != self.hide_generation {
            return false;
        }
        self.hide_pending = false;
        self.panel = None;
        self.active_category = None;
        true
    }

    /// Replaces any tooltip currently shown. Position is unknown until the
    /// first [`move_tooltip`](Self::move_tooltip) with the measured size.
    pub fn show_tooltip(&mut self, content: TooltipContent) {
        self.tooltip_shows = self.tooltip_shows.wrapping_add(1);
        self.tooltip = Some(TooltipState {
            content,
            position: None,
            shown: self.tooltip_shows,
        });
    }

    pub fn move_tooltip(
        &mut self,
        pointer: (f64, f64),
        size: (f64, f64),
        viewport: Viewport,
        offset: f64,
        flip_gap: f64,
    ) -> Option<(f64, f64)> {
        let tooltip = self.tooltip.as_mut()?;
        let position = place_tooltip(pointer, size, viewport, offset, flip_gap);
        tooltip.position = Some(position);
        Some(position)
    }

    pub fn hide_tooltip(&mut self) {
        self.tooltip = None;
    }

    pub fn view(&self) -> PaletteView {
        PaletteView {
            active_category: self.active_category,
            visible_group: self.visible_group,
            panel: self.panel,
            tooltip: self.tooltip.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{HorizontalAnchor, Rect};

    fn geometry(button_left: f64) -> PanelGeometry {
        PanelGeometry {
            button: Rect::new(button_left, 10.0, 60.0, 30.0),
            toolbar: Rect::new(0.0, 0.0, 1000.0, 50.0),
            bar_offset_top: 5.0,
            bar_height: 40.0,
            viewport: Viewport::new(1000.0, 800.0),
        }
    }

    #[test]
    fn stale_ticket_does_not_hide() {
        let mut controller = PaletteController::new();
        controller.show_category("arrows", Some(&geometry(100.0)));
        let stale = controller.schedule_hide();
        let fresh = controller.schedule_hide();
        assert!(!controller.hide_elapsed(stale));
        assert!(controller.panel().is_some());
        assert!(controller.hide_elapsed(fresh));
        assert!(controller.panel().is_none());
        assert_eq!(controller.active_category(), None);
        assert_eq!(controller.visible_group(), Some("arrows"));
    }

    #[test]
    fn entering_panel_cancels_hide() {
        let mut controller = PaletteController::new();
        controller.show_category("greek", Some(&geometry(100.0)));
        let ticket = controller.schedule_hide();
        controller.cancel_hide();
        assert!(!controller.is_hide_pending());
        assert!(!controller.hide_elapsed(ticket));
        assert_eq!(controller.active_category(), Some("greek"));
    }

    #[test]
    fn showing_category_cancels_pending_hide() {
        let mut controller = PaletteController::new();
        controller.show_category("greek", Some(&geometry(100.0)));
        let ticket = controller.schedule_hide();
        controller.show_category("sets", Some(&geometry(700.0)));
        assert!(!controller.hide_elapsed(ticket));
        let placement = controller.panel().expect("panel shown");
        assert_eq!(placement.anchor, HorizontalAnchor::Right(1000.0 - 760.0));
    }

    #[test]
    fn unknown_category_clears_selection() {
        let mut controller = PaletteController::new();
        controller.show_category("greek", Some(&geometry(100.0)));
        assert_eq!(controller.show_category("nope", Some(&geometry(100.0))), None);
        assert_eq!(controller.view(), PaletteView::default());
    }

    #[test]
    fn category_without_geometry_marks_active_only() {
        let mut controller = PaletteController::new();
        assert_eq!(controller.show_category("accents", None), None);
        assert_eq!(controller.active_category(), Some("accents"));
        assert!(controller.panel().is_none());
    }

    #[test]
    fn tooltip_is_replaced_not_stacked() {
        let mut controller = PaletteController::new();
        let alpha = SymbolEntry {
            command: "\\alpha",
            display: "\\alpha",
            desc_cn: Some("阿尔法"),
            desc_en: Some("alpha"),
        };
        let beta = SymbolEntry {
            command: "\\beta",
            display: "\\beta",
            desc_cn: None,
            desc_en: None,
        };
        controller.show_tooltip(TooltipContent::from(&alpha));
        controller.show_tooltip(TooltipContent::from(&beta));
        let tooltip = controller.tooltip().expect("tooltip");
        assert_eq!(tooltip.content.command, "\\beta");
        assert_eq!(tooltip.position, None);

        let viewport = Viewport::new(1000.0, 800.0);
        let pos = controller.move_tooltip((10.0, 10.0), (80.0, 30.0), viewport, 15.0, 10.0);
        assert_eq!(pos, Some((25.0, 25.0)));
        controller.hide_tooltip();
        assert!(controller
            .move_tooltip((10.0, 10.0), (80.0, 30.0), viewport, 15.0, 10.0)
            .is_none());
    }

    #[test]
    fn reshowing_same_symbol_is_a_new_show() {
        let mut controller = PaletteController::new();
        let alpha = SymbolEntry {
            command: "\\alpha",
            display: "\\alpha",
            desc_cn: None,
            desc_en: None,
        };
        let viewport = Viewport::new(1000.0, 800.0);
        controller.show_tooltip(TooltipContent::from(&alpha));
        controller.move_tooltip((10.0, 10.0), (80.0, 30.0), viewport, 15.0, 10.0);
        let first = controller.tooltip().expect("tooltip").shown;

        controller.show_tooltip(TooltipContent::from(&alpha));
        let again = controller.tooltip().expect("tooltip");
        assert_ne!(again.shown, first);
        assert_eq!(again.position, None);
    }
}
