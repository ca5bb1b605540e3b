//! Eye placement on the head and beat-reactive eye scale/glow.

use super::beat::BeatSample;
use super::config::EyeConfig;
use super::constants::*;
use super::rig::{EyeVisual, Transform};
use glam::Vec3;

/// Local-space positions of the two eye reference vertices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EyeAnchors {
    pub left: Vec3,
    pub right: Vec3,
}

impl EyeAnchors {
    /// World positions under the given head transform.
    pub fn world(&self, head: &Transform) -> (Vec3, Vec3) {
        let m = head.matrix();
        (m.transform_point3(self.left), m.transform_point3(self.right))
    }
}

/// Horizontal eye scale: idle breathing plus an optional beat kick.
pub fn eye_scale_x(t_ms: f64, pulse: f32, beat_reactive: bool) -> f32 {
    let base = EYE_BREATH_BASE + (t_ms * EYE_BREATH_SPEED).sin() as f32 * EYE_BREATH_AMP;
    if beat_reactive {
        base + pulse * EYE_BEAT_SCALE
    } else {
        base
    }
}

/// Move both eyes onto the head, apply blink and breathing scale and
/// drive glow opacities from the beat.
pub fn place_eyes(
    eyes: [&mut EyeVisual; 2],
    anchors: &EyeAnchors,
    head: &Transform,
    blink: f32,
    scale_x: f32,
    glow: Option<(f32, f32)>,
) {
    let (left, right) = anchors.world(head);
    for (eye, pos) in eyes.into_iter().zip([left, right]) {
        eye.transform.position = pos;
        eye.transform.rotation = head.rotation;
        eye.transform.scale = Vec3::new(scale_x, blink, 1.0);
        if let Some((pupil, outer)) = glow {
            eye.layers.pupil.opacity = pupil;
            eye.layers.outer_glow.opacity = outer;
        }
    }
}

/// Pupil and outer glow opacities for this frame, if the beat drives them.
pub fn beat_glow(beat: BeatSample, beat_reactive: bool) -> Option<(f32, f32)> {
    (beat_reactive && beat.playing).then(|| {
        (
            PUPIL_BEAT_BASE + beat.pulse * PUPIL_BEAT_GAIN,
            GLOW_BEAT_BASE + beat.pulse * GLOW_BEAT_GAIN,
        )
    })
}

/// Opacities restored once the beat stops.
pub fn resting_glow(cfg: &EyeConfig) -> (f32, f32) {
    (cfg.pupil_opacity, cfg.glow_opacity)
}
