use crate::core::config::{is_low_power, HostConfig};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

const LABEL_STYLE: &str = "position:absolute;left:0;right:0;top:50%;transform:translateY(-50%);\
text-align:center;color:#00ff41;font:12px monospace;letter-spacing:0.2em;pointer-events:none";
const CONTROLS_STYLE: &str = "position:absolute;left:8px;bottom:8px;display:flex;flex-direction:column;\
gap:4px;color:#00ff41;font:11px monospace";

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

fn js_err(e: wasm_bindgen::JsValue) -> anyhow::Error {
    anyhow::anyhow!("{:?}", e)
}

/// Read `data-<key>` from the host element, falling back to the bare attribute.
pub fn host_config(container: &web::Element) -> HostConfig {
    HostConfig::from_attributes(|key| {
        container
            .get_attribute(&format!("data-{key}"))
            .or_else(|| container.get_attribute(key))
    })
}

pub fn detect_low_power(window: &web::Window) -> bool {
    let nav = window.navigator();
    let ua = nav.user_agent().unwrap_or_default();
    is_low_power(&ua, nav.hardware_concurrency())
}

#[inline]
pub fn measure(el: &web::Element) -> (f64, f64) {
    let rect = el.get_bounding_client_rect();
    (rect.width(), rect.height())
}

/// Prepare the container and pin explicit sizes from its attributes.
pub fn style_container(container: &web::Element, host: &HostConfig) {
    let Some(el) = container.dyn_ref::<web::HtmlElement>() else {
        return;
    };
    let style = el.style();
    _ = style.set_property("position", "relative");
    _ = style.set_property("overflow", "hidden");
    if let Some(w) = host.width {
        _ = style.set_property("width", &format!("{w}px"));
    }
    if let Some(h) = host.height {
        _ = style.set_property("height", &format!("{h}px"));
    }
}

pub fn create_canvas(
    document: &web::Document,
    container: &web::Element,
) -> anyhow::Result<web::HtmlCanvasElement> {
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(js_err)?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    _ = canvas.set_attribute("style", "display:block;width:100%;height:100%");
    container.append_child(&canvas).map_err(js_err)?;
    Ok(canvas)
}

#[inline]
pub fn set_backing_size(canvas: &web::HtmlCanvasElement, (w_px, h_px): (u32, u32)) {
    canvas.set_width(w_px.max(1));
    canvas.set_height(h_px.max(1));
}

pub fn create_label(
    document: &web::Document,
    container: &web::Element,
    text: &str,
) -> anyhow::Result<web::Element> {
    let label = document.create_element("div").map_err(js_err)?;
    _ = label.set_attribute("style", LABEL_STYLE);
    label.set_text_content(Some(text));
    container.append_child(&label).map_err(js_err)?;
    Ok(label)
}

#[inline]
pub fn set_label_text(label: &web::Element, text: &str) {
    label.set_text_content(Some(text));
    _ = label.set_attribute("style", LABEL_STYLE);
}

#[inline]
pub fn hide_label(label: &web::Element) {
    _ = label.set_attribute("style", "display:none");
}

/// Show the status text, or hide the label when there is none.
pub fn show_status(label: &web::Element, status: Option<&str>) {
    match status {
        Some(text) => set_label_text(label, text),
        None => hide_label(label),
    }
}

/// Slider panel for live tuning. Returns the panel so sliders can be added.
pub fn create_controls(
    document: &web::Document,
    container: &web::Element,
) -> anyhow::Result<web::Element> {
    let panel = document.create_element("div").map_err(js_err)?;
    _ = panel.set_attribute("style", CONTROLS_STYLE);
    container.append_child(&panel).map_err(js_err)?;
    Ok(panel)
}

pub struct Slider<'a> {
    pub label: &'a str,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub value: f32,
}

pub fn add_slider(
    document: &web::Document,
    panel: &web::Element,
    slider: Slider<'_>,
    mut handler: impl FnMut(f32) + 'static,
) -> anyhow::Result<()> {
    let row = document.create_element("label").map_err(js_err)?;
    row.set_text_content(Some(slider.label));
    let input: web::HtmlInputElement = document
        .create_element("input")
        .map_err(js_err)?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    input.set_type("range");
    input.set_min(&slider.min.to_string());
    input.set_max(&slider.max.to_string());
    input.set_step(&slider.step.to_string());
    input.set_value(&slider.value.to_string());
    row.append_child(&input).map_err(js_err)?;
    panel.append_child(&row).map_err(js_err)?;

    let source = input.clone();
    let closure = Closure::wrap(Box::new(move || {
        if let Ok(v) = source.value().parse::<f32>() {
            handler(v);
        }
    }) as Box<dyn FnMut()>);
    _ = input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
    closure.forget();
    Ok(())
}

/// Report the container's content size on every layout change.
pub fn observe_resize(
    container: &web::Element,
    mut handler: impl FnMut(f64, f64) + 'static,
) -> anyhow::Result<()> {
    let closure = Closure::wrap(Box::new(move |entries: js_sys::Array| {
        // only the last entry matters for a single observed element
        let Some(entry) = entries
            .iter()
            .last()
            .and_then(|e| e.dyn_into::<web::ResizeObserverEntry>().ok())
        else {
            return;
        };
        let rect = entry.content_rect();
        handler(rect.width(), rect.height());
    }) as Box<dyn FnMut(js_sys::Array)>);
    let observer = web::ResizeObserver::new(closure.as_ref().unchecked_ref()).map_err(js_err)?;
    observer.observe(container);
    closure.forget();
    Ok(())
}
