//! Browser half of the export pipeline: reads the live preview, hands it to
//! [`texpad_core::export::prepare`] and turns the result into a download.

use gloo::timers::callback::Timeout;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Blob, BlobPropertyBag, CanvasRenderingContext2d, Document, Element, HtmlAnchorElement,
    HtmlCanvasElement, HtmlImageElement, Url, XmlSerializer,
};

use texpad_core::export::{prepare, PNG_MIME};
use texpad_core::{
    EditorSettings, ExportArtifact, ExportError, ExportSources, ExportTarget, RasterPlan,
};

pub(crate) const PREVIEW_ID: &str = "latex-preview";
pub(crate) const CANVAS_ID: &str = "export-canvas";

fn document() -> Result<Document, ExportError> {
    crate::dom::document().ok_or_else(|| ExportError::Download("no document".into()))
}

fn serialize(serializer: &XmlSerializer, element: &Element) -> Result<String, ExportError> {
    serializer
        .serialize_to_string(element)
        .map_err(|err| ExportError::Download(crate::engine::js_message(&err)))
}

/// Snapshot of everything the export reads from the page.
pub(crate) fn collect_sources(document: &Document) -> Result<ExportSources, ExportError> {
    let Some(preview_svg) = document
        .get_element_by_id(PREVIEW_ID)
        .and_then(|preview| preview.query_selector("svg").ok().flatten())
    else {
        return Ok(ExportSources::default());
    };
    let serializer =
        XmlSerializer::new().map_err(|err| ExportError::Download(crate::engine::js_message(&err)))?;
    let rect = crate::dom::rect_of(&preview_svg);

    let mut defs = Vec::new();
    if let Ok(list) = document.query_selector_all("svg defs") {
        for element in crate::dom::collect_elements(&list) {
            defs.push(serialize(&serializer, &element)?);
        }
    }
    let mut styles = Vec::new();
    if let Ok(list) = document.query_selector_all(&format!("#{PREVIEW_ID} style, svg style")) {
        for element in crate::dom::collect_elements(&list) {
            styles.push(serialize(&serializer, &element)?);
        }
    }
    Ok(ExportSources {
        preview: Some(serialize(&serializer, &preview_svg)?),
        defs,
        styles,
        bounds: (rect.width, rect.height),
    })
}

fn blob_url(content: &str, mime: &str) -> Result<String, ExportError> {
    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str(content));
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)
        .map_err(|err| ExportError::Download(crate::engine::js_message(&err)))?;
    Url::create_object_url_with_blob(&blob)
        .map_err(|err| ExportError::Download(crate::engine::js_message(&err)))
}

fn revoke_later(url: String, delay_ms: u32) {
    Timeout::new(delay_ms, move || {
        let _ = Url::revoke_object_url(&url);
    })
    .forget();
}

fn trigger_download(document: &Document, href: &str, file_name: &str) -> Result<(), ExportError> {
    let anchor = document
        .create_element("a")
        .ok()
        .and_then(|element| element.dyn_into::<HtmlAnchorElement>().ok())
        .ok_or_else(|| ExportError::Download("cannot create link".into()))?;
    anchor.set_href(href);
    anchor.set_download(file_name);
    crate::dom::set_style(&anchor, "display", "none");
    let body = document
        .body()
        .ok_or_else(|| ExportError::Download("no body".into()))?;
    body.append_child(&anchor)
        .map_err(|err| ExportError::Download(crate::engine::js_message(&err)))?;
    anchor.click();
    anchor.remove();
    Ok(())
}

pub(crate) fn export_vector(settings: &EditorSettings) -> Result<(), ExportError> {
    let document = document()?;
    let sources = collect_sources(&document)?;
    let prepared = prepare(&sources, ExportTarget::Vector, settings)?;
    let artifact = ExportArtifact::for_target(ExportTarget::Vector, settings);
    let url = blob_url(&prepared.markup, artifact.mime)?;
    let downloaded = trigger_download(&document, &url, &artifact.file_name);
    revoke_later(url, settings.revoke_delay_ms);
    downloaded
}

async fn decode_image(url: &str) -> Result<HtmlImageElement, ExportError> {
    let img = HtmlImageElement::new().map_err(|_| ExportError::ImageDecode)?;
    let promise = js_sys::Promise::new(&mut |resolve, reject| {
        let onload = Closure::once(move || {
            let _ = resolve.call0(&JsValue::NULL);
        });
        let onerror = Closure::once(move || {
            let _ = reject.call1(&JsValue::NULL, &JsValue::from_str("image_decode_failed"));
        });
        img.set_onload(Some(onload.as_ref().unchecked_ref()));
        img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        img.set_src(url);
        onload.forget();
        onerror.forget();
    });
    JsFuture::from(promise)
        .await
        .map_err(|_| ExportError::ImageDecode)?;
    img.set_onload(None);
    img.set_onerror(None);
    Ok(img)
}

fn export_canvas(document: &Document) -> Result<HtmlCanvasElement, ExportError> {
    let element = match document.get_element_by_id(CANVAS_ID) {
        Some(element) => element,
        None => document
            .create_element("canvas")
            .map_err(|err| ExportError::Canvas(crate::engine::js_message(&err)))?,
    };
    element
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| ExportError::Canvas(format!("#{CANVAS_ID} is not a canvas")))
}

#[allow(deprecated)]
fn paint(
    canvas: &HtmlCanvasElement,
    img: &HtmlImageElement,
    plan: &RasterPlan,
) -> Result<(), ExportError> {
    canvas.set_width(plan.canvas_width);
    canvas.set_height(plan.canvas_height);
    let context = canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|context| context.dyn_into::<CanvasRenderingContext2d>().ok())
        .ok_or_else(|| ExportError::Canvas("no 2d context".into()))?;
    context.set_fill_style(&JsValue::from_str("#ffffff"));
    context.fill_rect(
        0.0,
        0.0,
        f64::from(plan.canvas_width),
        f64::from(plan.canvas_height),
    );
    context
        .draw_image_with_html_image_element_and_dw_and_dh(
            img,
            plan.draw_x,
            plan.draw_y,
            plan.draw_width,
            plan.draw_height,
        )
        .map_err(|err| ExportError::Canvas(crate::engine::js_message(&err)))
}

pub(crate) async fn export_raster(settings: &EditorSettings) -> Result<(), ExportError> {
    let document = document()?;
    let sources = collect_sources(&document)?;
    let prepared = prepare(&sources, ExportTarget::Raster, settings)?;
    let artifact = ExportArtifact::for_target(ExportTarget::Raster, settings);
    let plan = RasterPlan::for_settings(&prepared, settings);

    let svg_url = blob_url(&prepared.markup, texpad_core::export::SVG_MIME)?;
    let decoded = decode_image(&svg_url).await;
    let _ = Url::revoke_object_url(&svg_url);
    let img = decoded?;

    let canvas = export_canvas(&document)?;
    paint(&canvas, &img, &plan)?;
    let data_url = canvas
        .to_data_url_with_type(PNG_MIME)
        .map_err(|err| ExportError::Canvas(crate::engine::js_message(&err)))?;
    trigger_download(&document, &data_url, &artifact.file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn page_without_preview_has_nothing_to_export() {
        let document = crate::dom::document().expect("document");
        let sources = collect_sources(&document).expect("sources");
        assert_eq!(sources.preview, None);
        assert_eq!(
            export_vector(&EditorSettings::default()),
            Err(ExportError::NoPreview)
        );
    }

    #[wasm_bindgen_test(async)]
    async fn raster_without_preview_fails_early() {
        let result = export_raster(&EditorSettings::default()).await;
        assert_eq!(result, Err(ExportError::NoPreview));
    }

    #[wasm_bindgen_test]
    fn preview_svg_and_defs_are_collected() {
        let document = crate::dom::document().expect("document");
        let host = document.create_element("div").expect("div");
        host.set_inner_html(
            r##"<div id="latex-preview"><svg xmlns="http://www.w3.org/2000/svg" width="40" height="20"><defs><path id="MJX-a" d="M0 0"/></defs><use href="#MJX-a"/></svg></div>"##,
        );
        document.body().expect("body").append_child(&host).expect("append");

        let sources = collect_sources(&document).expect("sources");
        host.remove();
        let preview = sources.preview.expect("preview markup");
        assert!(preview.starts_with("<svg"));
        assert_eq!(sources.defs.len(), 1);
        assert!(sources.defs[0].contains("MJX-a"));
    }
}
