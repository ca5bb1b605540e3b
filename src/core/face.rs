//! Per-frame orchestration of the face animation.
//!
//! `tick` runs the sub-updates in a fixed order: blink, head motion,
//! glitch/pulse overlay, eye placement, camera. Nothing runs until the head
//! mesh has loaded, and the first glitch delay counts from the first
//! frame after that.

use super::beat::BeatSample;
use super::blink::BlinkState;
use super::camera::{fixed_pose, CameraDrift};
use super::config::FaceConfig;
use super::constants::*;
use super::eyes::{beat_glow, eye_scale_x, place_eyes, resting_glow, EyeAnchors};
use super::glitch::{resting_overlay, GlitchState};
use super::head::HeadMotion;
use super::mesh::{AssetError, HeadMesh};
use super::random::Entropy;
use super::rig::FaceRig;
use glam::Vec3;
use rand::rngs::StdRng;

/// Asset lifecycle of a face.
#[derive(Debug)]
pub enum LoadState {
    Loading,
    Ready(Box<ReadyFace>),
    Failed(String),
}

#[derive(Debug)]
pub struct ReadyFace {
    pub rig: FaceRig,
    pub anchors: EyeAnchors,
}

pub struct FaceAnimator<R: Entropy = StdRng> {
    cfg: FaceConfig,
    rng: R,
    blink: BlinkState,
    head: HeadMotion,
    camera: Option<CameraDrift>,
    glitch: Option<GlitchState>,
    state: LoadState,
    // set once the first ready frame has anchored the glitch timer
    running: bool,
}

impl<R: Entropy> FaceAnimator<R> {
    /// Random draws happen in a fixed order: next blink, head phases,
    /// camera phases (drifting faces only), first glitch delay.
    pub fn new(cfg: FaceConfig, mut rng: R) -> Self {
        let blink = BlinkState::new(&mut rng);
        let head = HeadMotion::new(&cfg.head, cfg.beat_reactive_variant(), &mut rng);
        let camera = cfg.camera_drift.then(|| CameraDrift::new(&mut rng));
        let glitch = cfg.glitch.as_ref().map(|g| GlitchState::new(g, &mut rng));
        Self {
            cfg,
            rng,
            blink,
            head,
            camera,
            glitch,
            state: LoadState::Loading,
            running: false,
        }
    }

    pub fn config(&self) -> &FaceConfig {
        &self.cfg
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn blink(&self) -> &BlinkState {
        &self.blink
    }

    pub fn glitch(&self) -> Option<&GlitchState> {
        self.glitch.as_ref()
    }

    pub fn head_motion(&self) -> &HeadMotion {
        &self.head
    }

    pub fn camera_drift(&self) -> Option<&CameraDrift> {
        self.camera.as_ref()
    }

    pub fn rig(&self) -> Option<&FaceRig> {
        match &self.state {
            LoadState::Ready(ready) => Some(&ready.rig),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, LoadState::Ready(_))
    }

    /// Attach the loaded head mesh. Fails if the eye reference vertices are
    /// missing, leaving the face in the failed state.
    pub fn attach_mesh(&mut self, mesh: &HeadMesh) -> Result<(), AssetError> {
        match mesh.eye_anchors(LEFT_EYE_VERTEX, RIGHT_EYE_VERTEX) {
            Ok(anchors) => {
                let rig = FaceRig::new(&self.cfg, WIREFRAME_RGB);
                self.state = LoadState::Ready(Box::new(ReadyFace { rig, anchors }));
                Ok(())
            }
            Err(e) => {
                self.fail(e.to_string());
                Err(e)
            }
        }
    }

    /// Status label for the container; `None` once the face is showing.
    pub fn status_text(&self) -> Option<&'static str> {
        match self.state {
            LoadState::Loading => Some(LOADING_TEXT),
            LoadState::Ready(_) => None,
            LoadState::Failed(_) => Some(OFFLINE_TEXT),
        }
    }

    pub fn fail(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        log::error!("[face] asset unavailable: {reason}");
        self.state = LoadState::Failed(reason);
    }

    pub fn set_base_bloom(&mut self, strength: f32) {
        if strength.is_finite() {
            self.cfg.base_bloom = strength.max(0.0);
        }
    }

    pub fn set_eye_size(&mut self, size: f32) {
        if !(size.is_finite() && size > 0.0) {
            return;
        }
        self.cfg.eyes.size = size;
        if let LoadState::Ready(ready) = &mut self.state {
            let glow = self.cfg.eyes.glow_radius;
            for eye in ready.rig.eyes_mut() {
                eye.resize(size, glow);
            }
        }
    }

    /// Advance one frame. `now_ms` is wall-clock time, `dt_ms` the time
    /// since the previous frame, `beat` this frame's clock snapshot.
    ///
    /// Returns the updated rig, or `None` while the mesh is unavailable.
    pub fn tick(&mut self, now_ms: f64, dt_ms: f64, beat: BeatSample) -> Option<&FaceRig> {
        let LoadState::Ready(ready) = &mut self.state else {
            return None;
        };
        if !self.running {
            self.running = true;
            if let Some(glitch) = self.glitch.as_mut() {
                glitch.arm_from(now_ms);
            }
        }
        let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
        let beat_reactive = self.cfg.beat_reactive_variant();
        let rig = &mut ready.rig;

        let blink = self.blink.update(dt_ms, &mut self.rng);

        let pose = self.head.pose(now_ms, beat);

        let overlay = self
            .glitch
            .as_mut()
            .and_then(|g| g.update(now_ms, &mut self.rng))
            .unwrap_or_else(|| {
                resting_overlay(
                    now_ms,
                    beat,
                    beat_reactive,
                    self.cfg.base_opacity,
                    self.cfg.base_bloom,
                )
            });

        rig.head.position = Vec3::new(overlay.offset_x, HEAD_BASE_Y + overlay.offset_y, 0.0);
        rig.head.rotation = Vec3::new(pose.rot_x, pose.rot_y, 0.0);
        rig.head.scale = Vec3::new(
            HEAD_SCALE + overlay.jitter_x,
            HEAD_SCALE * pose.breath + overlay.jitter_y,
            HEAD_SCALE,
        );
        rig.occlusion = rig.head;
        rig.wireframe_opacity = overlay.opacity;
        rig.bloom_strength = overlay.bloom;

        let glow = beat_glow(beat, beat_reactive).unwrap_or_else(|| resting_glow(&self.cfg.eyes));
        let head = rig.head;
        place_eyes(
            rig.eyes_mut(),
            &ready.anchors,
            &head,
            blink,
            eye_scale_x(now_ms, beat.pulse, beat_reactive),
            Some(glow),
        );

        rig.camera = match &self.camera {
            Some(drift) => drift.pose(now_ms),
            None => fixed_pose(),
        };

        Some(&ready.rig)
    }
}
