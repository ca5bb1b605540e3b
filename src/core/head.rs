//! Low-frequency head rotation and breathing.

use super::beat::BeatSample;
use super::config::HeadMotionConfig;
use super::constants::*;
use super::random::Entropy;

/// Immutable per-instance oscillator parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadMotion {
    pub phase_x: f64,
    pub phase_y: f64,
    pub speed_x: f64,
    pub speed_y: f64,
    pub range_x: f32,
    pub range_y: f32,
    pub harmonics: bool,
    pub beat_reactive: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadPose {
    pub rot_x: f32,
    pub rot_y: f32,
    /// Multiplier applied to the head's base scale on Y.
    pub breath: f32,
}

impl HeadMotion {
    pub fn new(cfg: &HeadMotionConfig, beat_reactive: bool, rng: &mut dyn Entropy) -> Self {
        let phase_x = rng.next_in(0.0, PHASE_SPAN);
        let phase_y = rng.next_in(0.0, PHASE_SPAN);
        Self::with_phases(cfg, beat_reactive, phase_x, phase_y)
    }

    pub fn with_phases(
        cfg: &HeadMotionConfig,
        beat_reactive: bool,
        phase_x: f64,
        phase_y: f64,
    ) -> Self {
        Self {
            phase_x,
            phase_y,
            speed_x: cfg.speed_x,
            speed_y: cfg.speed_y,
            range_x: cfg.range_x,
            range_y: cfg.range_y,
            harmonics: cfg.harmonics,
            beat_reactive,
        }
    }

    /// Head pose at time `t_ms`. Depends only on `t_ms`, `beat` and `self`.
    pub fn pose(&self, t_ms: f64, beat: BeatSample) -> HeadPose {
        let driven = self.beat_reactive && beat.playing;
        let mult = if driven { HEAD_BEAT_MOTION } else { 1.0 };

        let mut rot_x = (t_ms * self.speed_x + self.phase_x).sin() as f32 * self.range_x * mult;
        let mut rot_y = (t_ms * self.speed_y + self.phase_y).sin() as f32 * self.range_y * mult;
        if self.harmonics {
            let (sx, px, rx) = HEAD_HARMONIC_X;
            let (sy, py, ry) = HEAD_HARMONIC_Y;
            rot_x += (t_ms * self.speed_x * sx + self.phase_x * px).sin() as f32 * self.range_x * rx;
            rot_y += (t_ms * self.speed_y * sy + self.phase_y * py).sin() as f32 * self.range_y * ry;
        }

        let beat_scale = if driven { beat.pulse * HEAD_BEAT_SCALE } else { 0.0 };
        let breath = 1.0 + (t_ms * HEAD_BREATH_SPEED).sin() as f32 * HEAD_BREATH_AMP + beat_scale;

        HeadPose {
            rot_x,
            rot_y,
            breath,
        }
    }
}
