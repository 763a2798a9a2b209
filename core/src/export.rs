//! Turns the live preview's SVG into a standalone file.
//!
//! The typesetter may keep shared glyph paths in a separate hidden SVG, so
//! every `<defs>` block in the page is merged into the exported copy, along
//! with the preview's style blocks. Dimensions come from the live bounding
//! box so the file does not depend on the page's font size.

use std::collections::HashSet;

use crate::config::EditorSettings;
use crate::notice::Notice;
use crate::svg::{SvgElement, SvgError, SvgNode, SVG_NS, XLINK_NS};

pub const SVG_MIME: &str = "image/svg+xml;charset=utf-8";
pub const PNG_MIME: &str = "image/png";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExportError {
    #[error("no rendered preview to export")]
    NoPreview,
    #[error("preview markup is unusable: {0}")]
    Markup(#[from] SvgError),
    #[error("preview has no visible size ({width}x{height})")]
    EmptyBounds { width: f64, height: f64 },
    #[error("intermediate image failed to decode")]
    ImageDecode,
    #[error("canvas unavailable: {0}")]
    Canvas(String),
    #[error("download failed: {0}")]
    Download(String),
}

impl ExportError {
    /// Toast shown for a failed export.
    pub fn notice(&self) -> Notice {
        match self {
            ExportError::NoPreview => Notice::PreviewMissing,
            ExportError::ImageDecode => Notice::PngFailed,
            _ => Notice::ExportFailed,
        }
    }
}

/// Serialized pieces of the live document an export reads.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExportSources {
    /// The preview's rendered `<svg>`, if any.
    pub preview: Option<String>,
    /// Every `<defs>` block in the document, in document order.
    pub defs: Vec<String>,
    /// Style blocks scoped to the preview region.
    pub styles: Vec<String>,
    /// Live bounding box of the preview svg, in CSS px.
    pub bounds: (f64, f64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportTarget {
    Vector,
    Raster,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PreparedSvg {
    pub markup: String,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime: &'static str,
}

impl ExportArtifact {
    pub fn for_target(target: ExportTarget, settings: &EditorSettings) -> Self {
        match target {
            ExportTarget::Vector => Self {
                file_name: settings.svg_file_name.clone(),
                mime: SVG_MIME,
            },
            ExportTarget::Raster => Self {
                file_name: settings.png_file_name.clone(),
                mime: PNG_MIME,
            },
        }
    }
}

pub fn prepare(
    sources: &ExportSources,
    target: ExportTarget,
    settings: &EditorSettings,
) -> Result<PreparedSvg, ExportError> {
    let Some(preview) = sources.preview.as_deref() else {
        return Err(ExportError::NoPreview);
    };
    let (width, height) = sources.bounds;
    if target == ExportTarget::Raster && !(width > 0.0 && height > 0.0) {
        return Err(ExportError::EmptyBounds { width, height });
    }
    let mut svg = SvgElement::parse(preview)?;
    svg.set_attr("xmlns", SVG_NS);
    svg.set_attr("xmlns:xlink", XLINK_NS);

    let mut head = Vec::new();
    let mut defined = HashSet::new();
    collect_ids(&svg, &mut defined);
    let combined = merge_defs(&sources.defs, defined)?;
    if !combined.children.is_empty() {
        head.push(SvgNode::Element(combined));
    }
    for style in &sources.styles {
        head.push(SvgNode::Element(SvgElement::parse(style)?));
    }
    for (index, node) in head.into_iter().enumerate() {
        svg.insert_child(index, node);
    }

    let view_box = format!("0 0 {} {}", px(width), px(height));
    match target {
        ExportTarget::Vector => {
            if !svg.has_attr("viewBox") {
                svg.set_attr("viewBox", view_box);
            }
            if svg.attr("width").map_or(true, str::is_empty) {
                svg.set_attr("width", px(width));
            }
            if svg.attr("height").map_or(true, str::is_empty) {
                svg.set_attr("height", px(height));
            }
        }
        ExportTarget::Raster => {
            svg.set_attr("width", px(width));
            svg.set_attr("height", px(height));
            if !svg.has_attr("viewBox") {
                svg.set_attr("viewBox", view_box);
            }
        }
    }
    svg.set_style_property("color", &settings.export_color);

    Ok(PreparedSvg {
        markup: svg.to_markup(),
        width,
        height,
    })
}

fn collect_ids(element: &SvgElement, ids: &mut HashSet<String>) {
    if let Some(id) = element.attr("id") {
        ids.insert(id.to_string());
    }
    for child in element.elements() {
        collect_ids(child, ids);
    }
}

/// Children of every defs block under one `<defs>`. An `id` already in
/// `seen_ids` (defined by the preview itself or by an earlier block) is
/// skipped, so every id occurs once in the output.
fn merge_defs(blocks: &[String], mut seen_ids: HashSet<String>) -> Result<SvgElement, ExportError> {
    let mut combined = SvgElement::new("defs");
    for block in blocks {
        let defs = SvgElement::parse(block)?;
        for child in defs.children {
            if let SvgNode::Element(element) = &child {
                if let Some(id) = element.attr("id") {
                    if !seen_ids.insert(id.to_string()) {
                        continue;
                    }
                }
            }
            combined.push_child(child);
        }
    }
    Ok(combined)
}

fn px(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    format!("{rounded}")
}

/// Offscreen canvas layout for a raster export.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterPlan {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub draw_x: f64,
    pub draw_y: f64,
    pub draw_width: f64,
    pub draw_height: f64,
}

impl RasterPlan {
    pub fn new(width: f64, height: f64, scale: f64, padding: f64) -> Self {
        let draw_width = width * scale;
        let draw_height = height * scale;
        Self {
            canvas_width: (draw_width + padding * 2.0).max(0.0) as u32,
            canvas_height: (draw_height + padding * 2.0).max(0.0) as u32,
            draw_x: padding,
            draw_y: padding,
            draw_width,
            draw_height,
        }
    }

    pub fn for_settings(prepared: &PreparedSvg, settings: &EditorSettings) -> Self {
        Self::new(
            prepared.width,
            prepared.height,
            settings.raster_scale,
            settings.raster_padding,
        )
    }
}
