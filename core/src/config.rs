use serde::{Deserialize, Serialize};

use crate::clock::WidgetPosition;

pub const CONFIG_ELEMENT_ID: &str = "texpad-config";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid site config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub editor: EditorSettings,
    pub clock: ClockSettings,
    pub formulas: FormulaSettings,
}

impl SiteConfig {
    /// Parses a (possibly partial) JSON document; missing fields keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(raw)?)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub initial_source: String,
    pub engine_poll_ms: u32,
    pub panel_hide_ms: u32,
    pub tooltip_offset: f64,
    pub tooltip_flip_gap: f64,
    pub toast_ms: u32,
    pub revoke_delay_ms: u32,
    pub raster_scale: f64,
    pub raster_padding: f64,
    pub export_color: String,
    pub svg_file_name: String,
    pub png_file_name: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            initial_source: "E = mc^2".to_string(),
            engine_poll_ms: 100,
            panel_hide_ms: 200,
            tooltip_offset: 15.0,
            tooltip_flip_gap: 10.0,
            toast_ms: 3000,
            revoke_delay_ms: 1000,
            raster_scale: 5.0,
            raster_padding: 40.0,
            export_color: "#000000".to_string(),
            svg_file_name: "latex_formula.svg".to_string(),
            png_file_name: "latex_formula.png".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockSettings {
    pub enabled: bool,
    pub storage_key: String,
    pub tick_ms: u32,
    pub edge_threshold: f64,
    pub edge_check_delay_ms: u32,
    pub default_position: WidgetPosition,
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            storage_key: "floating-clock-position".to_string(),
            tick_ms: 1000,
            edge_threshold: 10.0,
            edge_check_delay_ms: 100,
            default_position: WidgetPosition::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormulaSettings {
    pub enabled: bool,
    pub content_selector: String,
    pub hover_delay_ms: u32,
    pub retypeset_debounce_ms: u32,
    pub copy_feedback_ms: u32,
    pub hint_feedback_ms: u32,
    pub hint_margin: f64,
    pub hint_gap: f64,
}

impl Default for FormulaSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            content_selector: ".markdown-body".to_string(),
            hover_delay_ms: 200,
            retypeset_debounce_ms: 500,
            copy_feedback_ms: 2000,
            hint_feedback_ms: 1000,
            hint_margin: 10.0,
            hint_gap: 8.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = SiteConfig::from_json("  ").expect("defaults");
        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.editor.panel_hide_ms, 200);
        assert_eq!(config.clock.storage_key, "floating-clock-position");
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config =
            SiteConfig::from_json(r#"{"editor":{"raster_scale":3.0},"clock":{"enabled":false}}"#)
                .expect("partial config");
        assert_eq!(config.editor.raster_scale, 3.0);
        assert_eq!(config.editor.raster_padding, 40.0);
        assert!(!config.clock.enabled);
        assert_eq!(config.clock.tick_ms, 1000);
        assert_eq!(config.formulas, FormulaSettings::default());
    }

    #[test]
    fn malformed_config_is_rejected() {
        let err = SiteConfig::from_json("{editor:").unwrap_err();
        assert!(err.to_string().starts_with("invalid site config"));
    }
}
