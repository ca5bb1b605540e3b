//! Render-facing state written by the animation core each frame.

use super::config::{EyeConfig, FaceConfig};
use super::constants::{CAMERA_BASE_Y, EYE_CORE_RADIUS, HEAD_BASE_Y, HEAD_SCALE, ZOOM_BASE_Z};
use glam::{EulerRot, Mat4, Quat, Vec3};

/// Position, XYZ Euler rotation and scale of one scene object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    #[inline]
    pub fn quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    /// Local-to-world matrix (translate * rotate * scale).
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.position)
    }
}

/// One additive disc of an eye.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EyeLayer {
    pub radius: f32,
    pub z_offset: f32,
    pub opacity: f32,
    pub rgb: [f32; 3],
}

/// The three discs of an eye, each held directly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EyeLayers {
    pub outer_glow: EyeLayer,
    pub pupil: EyeLayer,
    pub core: EyeLayer,
}

impl EyeLayers {
    pub const COUNT: usize = 3;

    pub fn new(cfg: &EyeConfig, tint: [f32; 3]) -> Self {
        let mut layers = Self {
            outer_glow: EyeLayer {
                radius: 0.0,
                z_offset: 0.0,
                opacity: cfg.glow_opacity,
                rgb: tint,
            },
            pupil: EyeLayer {
                radius: 0.0,
                z_offset: 0.02,
                opacity: cfg.pupil_opacity,
                rgb: tint,
            },
            core: EyeLayer {
                radius: 0.0,
                z_offset: 0.03,
                opacity: cfg.core_opacity,
                rgb: [1.0, 1.0, 1.0],
            },
        };
        layers.resize(cfg.size, cfg.glow_radius);
        layers
    }

    /// Draw order: glow first, core last.
    pub fn back_to_front(&self) -> [&EyeLayer; 3] {
        [&self.outer_glow, &self.pupil, &self.core]
    }

    pub fn resize(&mut self, size: f32, glow_radius: f32) {
        self.outer_glow.radius = size * glow_radius;
        self.pupil.radius = size;
        self.core.radius = size * EYE_CORE_RADIUS;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EyeVisual {
    pub transform: Transform,
    pub layers: EyeLayers,
}

impl EyeVisual {
    pub fn new(cfg: &EyeConfig, tint: [f32; 3]) -> Self {
        Self {
            transform: Transform::default(),
            layers: EyeLayers::new(cfg, tint),
        }
    }

    /// Rebuild disc radii for a new eye size, keeping opacities.
    pub fn resize(&mut self, size: f32, glow_radius: f32) {
        self.layers.resize(size, glow_radius);
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub look_at: Vec3,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, CAMERA_BASE_Y, ZOOM_BASE_Z),
            look_at: Vec3::ZERO,
        }
    }
}

/// Everything the render pass reads from a face each frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceRig {
    pub head: Transform,
    /// Invisible depth-only copy of the head.
    pub occlusion: Transform,
    pub left_eye: EyeVisual,
    pub right_eye: EyeVisual,
    pub wireframe_opacity: f32,
    pub bloom_strength: f32,
    pub camera: CameraPose,
}

impl FaceRig {
    pub fn new(cfg: &FaceConfig, tint: [f32; 3]) -> Self {
        let head = Transform {
            position: Vec3::new(0.0, HEAD_BASE_Y, 0.0),
            rotation: Vec3::ZERO,
            scale: Vec3::splat(HEAD_SCALE),
        };
        Self {
            head,
            occlusion: head,
            left_eye: EyeVisual::new(&cfg.eyes, tint),
            right_eye: EyeVisual::new(&cfg.eyes, tint),
            wireframe_opacity: cfg.base_opacity,
            bloom_strength: cfg.base_bloom,
            camera: CameraPose::default(),
        }
    }

    pub fn eyes_mut(&mut self) -> [&mut EyeVisual; 2] {
        [&mut self.left_eye, &mut self.right_eye]
    }
}
