use serde::{Deserialize, Serialize};

use crate::layout::{Rect, Viewport};

const WEEKDAYS: [&str; 7] = [
    "星期日", "星期一", "星期二", "星期三", "星期四", "星期五", "星期六",
];

/// Clock placement, stored as the widget's only persisted record.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WidgetPosition {
    pub bottom: f64,
    pub left: f64,
}

impl Default for WidgetPosition {
    fn default() -> Self {
        Self {
            bottom: 20.0,
            left: 20.0,
        }
    }
}

impl WidgetPosition {
    /// Decodes a stored record, `fallback` when absent or unreadable.
    pub fn from_storage(raw: Option<&str>, fallback: WidgetPosition) -> Self {
        raw.and_then(|raw| serde_json::from_str::<WidgetPosition>(raw).ok())
            .filter(|pos| pos.bottom.is_finite() && pos.left.is_finite())
            .unwrap_or(fallback)
    }

    pub fn to_storage(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Converts the widget's final box into bottom/left offsets.
    pub fn from_rect(rect: Rect, viewport: Viewport) -> Self {
        Self {
            bottom: viewport.height - rect.bottom(),
            left: rect.left,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClockReading {
    pub year: i32,
    /// 1-12
    pub month: u32,
    pub day: u32,
    /// 0 = Sunday
    pub weekday: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millis: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandAngles {
    pub hour: f64,
    pub minute: f64,
    pub second: f64,
}

impl HandAngles {
    /// Degrees clockwise from 12 o'clock. The second hand sweeps with the
    /// milliseconds; the minute and hour hands advance per second and per
    /// minute respectively.
    pub fn from_reading(reading: &ClockReading) -> Self {
        let hours = f64::from(reading.hour % 12);
        let minutes = f64::from(reading.minute);
        let seconds = f64::from(reading.second);
        let millis = f64::from(reading.millis);
        Self {
            hour: hours * 30.0 + minutes * 0.5,
            minute: minutes * 6.0 + seconds * 0.1,
            second: (seconds + millis / 1000.0) * 6.0,
        }
    }
}

pub fn format_time(reading: &ClockReading) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        reading.hour, reading.minute, reading.second
    )
}

pub fn format_date(reading: &ClockReading) -> String {
    format!("{}年{}月{}日", reading.year, reading.month, reading.day)
}

pub fn weekday_name(weekday: u32) -> &'static str {
    WEEKDAYS[(weekday % 7) as usize]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeCollapse {
    Left,
    Right,
    Top,
    Bottom,
}

impl EdgeCollapse {
    pub fn class_name(self) -> &'static str {
        match self {
            EdgeCollapse::Left => "collapsed-left",
            EdgeCollapse::Right => "collapsed-right",
            EdgeCollapse::Top => "collapsed-top",
            EdgeCollapse::Bottom => "collapsed-bottom",
        }
    }
}

/// Which edge the widget tucks into; horizontal edges win over vertical ones.
pub fn edge_collapse(rect: Rect, viewport: Viewport, threshold: f64) -> Option<EdgeCollapse> {
    if rect.left < threshold {
        Some(EdgeCollapse::Left)
    } else if viewport.width - rect.right() < threshold {
        Some(EdgeCollapse::Right)
    } else if rect.top < threshold {
        Some(EdgeCollapse::Top)
    } else if viewport.height - rect.bottom() < threshold {
        Some(EdgeCollapse::Bottom)
    } else {
        None
    }
}

/// An in-progress drag, anchored where the pointer went down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Drag {
    pointer_origin: (f64, f64),
    element_origin: (f64, f64),
}

impl Drag {
    pub fn start(pointer: (f64, f64), element: Rect) -> Self {
        Self {
            pointer_origin: pointer,
            element_origin: (element.left, element.top),
        }
    }

    /// Top-left for the current pointer, kept fully inside the viewport.
    pub fn position_for(
        &self,
        pointer: (f64, f64),
        element_size: (f64, f64),
        viewport: Viewport,
    ) -> (f64, f64) {
        let left = self.element_origin.0 + (pointer.0 - self.pointer_origin.0);
        let top = self.element_origin.1 + (pointer.1 - self.pointer_origin.1);
        let max_left = viewport.width - element_size.0;
        let max_top = viewport.height - element_size.1;
        (left.min(max_left).max(0.0), top.min(max_top).max(0.0))
    }
}
