//! Camera drift, slow zoom and projection.

use super::constants::*;
use super::random::Entropy;
use super::rig::CameraPose;
use glam::{Mat4, Vec3};

/// Independent sinusoid per camera axis, summed from two harmonics for
/// the position axes so the sway never visibly loops.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraDrift {
    pub phase_x: f64,
    pub phase_y: f64,
    pub phase_look_x: f64,
    pub phase_look_y: f64,
}

const SPEED_X: f64 = 0.00003;
const SPEED_Y: f64 = 0.000025;
const SPEED_LOOK_X: f64 = 0.00002;
const SPEED_LOOK_Y: f64 = 0.000015;
const RANGE_X: f32 = 0.25; // viewer sway
const RANGE_Y: f32 = 0.12;
const RANGE_LOOK_X: f32 = 0.03; // gaze wander
const RANGE_LOOK_Y: f32 = 0.02;

impl CameraDrift {
    pub fn new(rng: &mut dyn Entropy) -> Self {
        Self {
            phase_x: rng.next_in(0.0, PHASE_SPAN),
            phase_y: rng.next_in(0.0, PHASE_SPAN),
            phase_look_x: rng.next_in(0.0, PHASE_SPAN),
            phase_look_y: rng.next_in(0.0, PHASE_SPAN),
        }
    }

    pub fn pose(&self, t_ms: f64) -> CameraPose {
        let x = wave(t_ms, SPEED_X, self.phase_x, RANGE_X)
            + wave(t_ms, SPEED_X * 0.8, self.phase_x * 1.4, RANGE_X * 0.2);
        let y = CAMERA_BASE_Y
            + wave(t_ms, SPEED_Y, self.phase_y, RANGE_Y)
            + wave(t_ms, SPEED_Y * 0.7, self.phase_y * 1.2, RANGE_Y * 0.15);
        let z = ZOOM_BASE_Z + wave(t_ms, ZOOM_SPEED, ZOOM_PHASE, ZOOM_RANGE);

        let look_x = wave(t_ms, SPEED_LOOK_X, self.phase_look_x, RANGE_LOOK_X);
        let look_y = wave(t_ms, SPEED_LOOK_Y, self.phase_look_y, RANGE_LOOK_Y);

        CameraPose {
            eye: Vec3::new(x, y, z),
            look_at: Vec3::new(look_x, look_y, 0.0),
        }
    }
}

/// Camera used by the beat-reactive face.
pub fn fixed_pose() -> CameraPose {
    CameraPose {
        eye: Vec3::new(0.0, CAMERA_BASE_Y, CAMERA_BEAT_Z),
        look_at: Vec3::ZERO,
    }
}

#[inline]
fn wave(t_ms: f64, speed: f64, phase: f64, range: f32) -> f32 {
    (t_ms * speed + phase).sin() as f32 * range
}

/// Right-handed perspective camera.
#[derive(Clone, Debug)]
pub struct Camera {
    pub pose: CameraPose,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            pose: CameraPose::default(),
            up: Vec3::Y,
            aspect,
            fovy_radians: CAMERA_FOVY_DEG.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.pose.eye, self.pose.look_at, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}
