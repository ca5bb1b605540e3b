//! JavaScript entry points.

use crate::asset;
use crate::core::beat::{BeatClock, SharedBeat};
use crate::core::config::FaceConfig;
use crate::core::constants::LOADING_TEXT;
use crate::core::face::FaceAnimator;
use crate::core::viewport::Viewport;
use crate::dom;
use crate::frame;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("operator-face starting");
    Ok(())
}

/// Shared beat clock. One handle can drive any number of faces.
#[wasm_bindgen]
pub struct BeatHandle {
    clock: SharedBeat,
}

#[wasm_bindgen]
impl BeatHandle {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            clock: BeatClock::shared(),
        }
    }

    pub fn start(&self, bpm: f64) {
        self.clock.borrow_mut().start(bpm, js_sys::Date::now());
    }

    pub fn stop(&self) {
        self.clock.borrow_mut().stop();
    }

    pub fn phase(&self) -> f64 {
        self.clock.borrow().beat_phase(js_sys::Date::now())
    }

    pub fn pulse(&self) -> f32 {
        self.clock.borrow().pulse(js_sys::Date::now())
    }

    #[wasm_bindgen(js_name = isPlaying)]
    pub fn is_playing(&self) -> bool {
        self.clock.borrow().is_playing()
    }
}

impl Default for BeatHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Live controls for a mounted face.
#[wasm_bindgen]
pub struct FaceHandle {
    ctx: Rc<RefCell<frame::FrameContext<'static>>>,
}

#[wasm_bindgen]
impl FaceHandle {
    #[wasm_bindgen(js_name = setBloom)]
    pub fn set_bloom(&self, strength: f32) {
        self.ctx.borrow_mut().animator.set_base_bloom(strength);
    }

    #[wasm_bindgen(js_name = setEyeSize)]
    pub fn set_eye_size(&self, size: f32) {
        self.ctx.borrow_mut().animator.set_eye_size(size);
    }
}

/// Mount a face into the element with id `container_id`. GPU setup and the
/// model download continue in the background; the face appears once both
/// are done.
#[wasm_bindgen(js_name = mountOperatorFace)]
pub fn mount_operator_face(container_id: &str, beat: &BeatHandle) -> Result<FaceHandle, JsValue> {
    mount(container_id, beat.clock.clone())
        .map(|ctx| FaceHandle { ctx })
        .map_err(|e| {
            log::error!("mount error: {:?}", e);
            JsValue::from_str(&format!("{e:#}"))
        })
}

fn mount(
    container_id: &str,
    beat: SharedBeat,
) -> anyhow::Result<Rc<RefCell<frame::FrameContext<'static>>>> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let container = document
        .get_element_by_id(container_id)
        .ok_or_else(|| anyhow::anyhow!("missing #{container_id}"))?;

    let host = dom::host_config(&container);
    let low_power = dom::detect_low_power(&window);
    let mut face_cfg = FaceConfig::for_variant(host.variant);
    if low_power {
        face_cfg = face_cfg.low_power();
    }
    log::info!(
        "[mount] #{container_id} variant={:?} low_power={low_power} controls={}",
        host.variant,
        host.show_controls
    );

    dom::style_container(&container, &host);
    let (measured_w, measured_h) = dom::measure(&container);
    let (css_w, css_h) = host.initial_size(measured_w, measured_h);
    let viewport = Viewport::new(css_w, css_h, window.device_pixel_ratio(), low_power);
    let canvas = dom::create_canvas(&document, &container)?;
    dom::set_backing_size(&canvas, viewport.pixel_size());
    let label = dom::create_label(&document, &container, LOADING_TEXT)?;

    let background = face_cfg.background_rgb;
    let base_bloom = face_cfg.base_bloom;
    let eye_size = face_cfg.eyes.size;
    let animator = FaceAnimator::new(face_cfg, StdRng::from_entropy());
    let ctx = Rc::new(RefCell::new(frame::FrameContext {
        animator,
        beat,
        viewport,
        canvas: canvas.clone(),
        gpu: None,
        last_ms: None,
    }));

    if host.show_controls {
        let panel = dom::create_controls(&document, &container)?;
        let bloom_ctx = ctx.clone();
        dom::add_slider(
            &document,
            &panel,
            dom::Slider {
                label: "bloom",
                min: 0.0,
                max: 2.0,
                step: 0.01,
                value: base_bloom,
            },
            move |v| bloom_ctx.borrow_mut().animator.set_base_bloom(v),
        )?;
        let eye_ctx = ctx.clone();
        dom::add_slider(
            &document,
            &panel,
            dom::Slider {
                label: "eyes",
                min: 0.05,
                max: 0.4,
                step: 0.01,
                value: eye_size,
            },
            move |v| eye_ctx.borrow_mut().animator.set_eye_size(v),
        )?;
    }

    let resize_ctx = ctx.clone();
    dom::observe_resize(&container, move |w, h| resize_ctx.borrow_mut().resize(w, h))?;

    let load_ctx = ctx.clone();
    let model_url = host.model_url;
    spawn_local(async move {
        let Some(gpu) = frame::init_gpu(&canvas, background).await else {
            let mut ctx = load_ctx.borrow_mut();
            ctx.animator.fail("WebGPU unavailable");
            dom::show_status(&label, ctx.animator.status_text());
            return;
        };
        load_ctx.borrow_mut().gpu = Some(gpu);
        frame::start_loop(load_ctx.clone());

        let loaded = asset::load_head(&model_url).await;
        let mut ctx = load_ctx.borrow_mut();
        match loaded {
            Ok(mesh) => {
                // missing eye vertices leave the face failed
                _ = ctx.attach(&mesh);
            }
            Err(e) => ctx.animator.fail(format!("{e:#}")),
        }
        dom::show_status(&label, ctx.animator.status_text());
    });

    Ok(ctx)
}
