#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HorizontalAnchor {
    /// Panel `left` in px, relative to the toolbar's left edge.
    Left(f64),
    /// Panel `right` in px, relative to the toolbar's right edge.
    Right(f64),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelPlacement {
    pub top: f64,
    pub anchor: HorizontalAnchor,
}

/// Where the trigger button and its containers sit when a category opens.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelGeometry {
    pub button: Rect,
    pub toolbar: Rect,
    /// Offset of the category bar inside the toolbar.
    pub bar_offset_top: f64,
    pub bar_height: f64,
    pub viewport: Viewport,
}

/// Buttons left of the viewport midpoint open a left-aligned panel, the rest
/// a right-aligned one, so the panel grows away from the nearer edge.
pub fn place_panel(geometry: &PanelGeometry) -> PanelPlacement {
    let top = geometry.bar_offset_top + geometry.bar_height;
    let midpoint = geometry.viewport.width / 2.0;
    let anchor = if geometry.button.center_x() < midpoint {
        HorizontalAnchor::Left(geometry.button.left - geometry.toolbar.left)
    } else {
        HorizontalAnchor::Right(geometry.toolbar.right() - geometry.button.right())
    };
    PanelPlacement { top, anchor }
}

/// Pointer-following tooltip position; flips to the other side of the
/// pointer on an axis where the default offset would overflow.
pub fn place_tooltip(
    pointer: (f64, f64),
    size: (f64, f64),
    viewport: Viewport,
    offset: f64,
    flip_gap: f64,
) -> (f64, f64) {
    let (px, py) = pointer;
    let (width, height) = size;
    let mut x = px + offset;
    let mut y = py + offset;
    if x + width > viewport.width {
        x = px - width - flip_gap;
    }
    if y + height > viewport.height {
        y = py - height - flip_gap;
    }
    (x, y)
}

/// Source hint for a typeset formula: centered above the target, below it
/// when there is no room above, clamped to `margin` horizontally.
pub fn place_hint(
    target: Rect,
    size: (f64, f64),
    viewport: Viewport,
    gap: f64,
    margin: f64,
) -> (f64, f64) {
    let (width, height) = size;
    let mut top = target.top - height - gap;
    if top < 0.0 {
        top = target.bottom() + gap;
    }
    let mut left = target.center_x() - width / 2.0;
    if left < margin {
        left = margin;
    } else if left + width > viewport.width - margin {
        left = viewport.width - width - margin;
    }
    (left, top)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport {
        width: 1000.0,
        height: 800.0,
    };

    #[test]
    fn tooltip_keeps_default_offset_when_it_fits() {
        let pos = place_tooltip((100.0, 100.0), (120.0, 40.0), VIEWPORT, 15.0, 10.0);
        assert_eq!(pos, (115.0, 115.0));
    }

    #[test]
    fn tooltip_flips_left_and_up_near_far_edges() {
        let pos = place_tooltip((950.0, 780.0), (120.0, 40.0), VIEWPORT, 15.0, 10.0);
        assert_eq!(pos, (950.0 - 120.0 - 10.0, 780.0 - 40.0 - 10.0));
    }

    #[test]
    fn tooltip_flips_only_the_overflowing_axis() {
        let pos = place_tooltip((950.0, 100.0), (120.0, 40.0), VIEWPORT, 15.0, 10.0);
        assert_eq!(pos, (820.0, 115.0));
    }

    #[test]
    fn hint_sits_above_target() {
        let target = Rect::new(400.0, 300.0, 200.0, 40.0);
        let pos = place_hint(target, (100.0, 30.0), VIEWPORT, 8.0, 10.0);
        assert_eq!(pos, (450.0, 262.0));
    }

    #[test]
    fn hint_drops_below_target_at_top_of_page() {
        let target = Rect::new(0.0, 5.0, 40.0, 20.0);
        let pos = place_hint(target, (100.0, 30.0), VIEWPORT, 8.0, 10.0);
        assert_eq!(pos, (10.0, 33.0));
    }

    #[test]
    fn hint_clamps_to_right_margin() {
        let target = Rect::new(980.0, 300.0, 20.0, 20.0);
        let pos = place_hint(target, (100.0, 30.0), VIEWPORT, 8.0, 10.0);
        assert_eq!(pos.0, 890.0);
    }
}
