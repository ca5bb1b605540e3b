use crate::core::beat::SharedBeat;
use crate::core::face::FaceAnimator;
use crate::core::mesh::{AssetError, HeadMesh};
use crate::core::viewport::Viewport;
use crate::dom;
use crate::render;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Everything one mounted face needs between animation frames.
pub struct FrameContext<'a> {
    pub animator: FaceAnimator,
    pub beat: SharedBeat,
    pub viewport: Viewport,
    pub canvas: web::HtmlCanvasElement,
    pub gpu: Option<render::GpuState<'a>>,
    pub last_ms: Option<f64>,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now = js_sys::Date::now();
        let dt = self.last_ms.map(|last| now - last).unwrap_or(0.0);
        self.last_ms = Some(now);

        // One clock snapshot per frame
        let beat = self.beat.borrow().sample(now);
        let rig = self.animator.tick(now, dt, beat);

        if let Some(g) = &mut self.gpu {
            match g.render(rig) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => g.reconfigure(),
                Err(e) => log::error!("render error: {:?}", e),
            }
        }
    }

    /// Container size changed; ignored while collapsed.
    pub fn resize(&mut self, css_width: f64, css_height: f64) {
        let Some(change) = self.viewport.observe(css_width, css_height) else {
            return;
        };
        log::debug!(
            "[frame] resize {}x{} px, aspect {:.3}",
            change.width_px,
            change.height_px,
            change.aspect
        );
        dom::set_backing_size(&self.canvas, (change.width_px, change.height_px));
        if let Some(g) = &mut self.gpu {
            g.apply_viewport(change);
        }
    }

    /// Hand the loaded mesh to the animator and the GPU.
    pub fn attach(&mut self, mesh: &HeadMesh) -> Result<(), AssetError> {
        self.animator.attach_mesh(mesh)?;
        if let Some(g) = &mut self.gpu {
            g.upload_head(mesh);
        }
        Ok(())
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    background: [f32; 3],
) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas, background).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        if let Some(w) = web::window() {
            if let Some(cb) = tick_clone.borrow().as_ref() {
                _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
            }
        }
    }) as Box<dyn FnMut()>));
    if let Some(w) = web::window() {
        if let Some(cb) = tick.borrow().as_ref() {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }
}
