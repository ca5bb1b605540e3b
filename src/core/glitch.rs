//! Glitch flash state machine and the wireframe/bloom overlay.
//!
//! Idle → glitching once `now - last_glitch > next_delay`. A flash lasts
//! 1-3 frames; the last flash frame still renders the spike and re-arms
//! the timer from that frame's timestamp.

use super::beat::BeatSample;
use super::config::GlitchConfig;
use super::constants::*;
use super::random::Entropy;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlitchDirection {
    Horizontal,
    Vertical,
    Diagonal,
}

#[derive(Clone, Debug)]
pub struct GlitchState {
    pub last_glitch_ms: f64,
    pub next_delay_ms: f64,
    pub active: bool,
    pub frame_count: u32,
    pub flash_duration: u32,
    pub direction: GlitchDirection,
    pub disp_x: f32,
    pub disp_y: f32,
    rearm: (f64, f64),
}

/// Overlay values written to the head, wireframe and bloom pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Overlay {
    pub opacity: f32,
    pub bloom: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub jitter_x: f32,
    pub jitter_y: f32,
}

impl Overlay {
    pub fn steady(opacity: f32, bloom: f32) -> Self {
        Self {
            opacity,
            bloom,
            offset_x: 0.0,
            offset_y: 0.0,
            jitter_x: 0.0,
            jitter_y: 0.0,
        }
    }
}

impl GlitchState {
    pub fn new(cfg: &GlitchConfig, rng: &mut dyn Entropy) -> Self {
        let (min, span) = cfg.first_delay;
        Self::with_delay(cfg, rng.next_in(min, span))
    }

    pub fn with_delay(cfg: &GlitchConfig, next_delay_ms: f64) -> Self {
        Self {
            last_glitch_ms: 0.0,
            next_delay_ms,
            active: false,
            frame_count: 0,
            flash_duration: 0,
            direction: GlitchDirection::Horizontal,
            disp_x: 0.0,
            disp_y: 0.0,
            rearm: cfg.rearm_delay,
        }
    }

    /// Start the delay window at `now_ms`. The face calls this on its first
    /// live frame so wall-clock timestamps count from there, not from 0.
    pub fn arm_from(&mut self, now_ms: f64) {
        self.last_glitch_ms = now_ms;
    }

    #[inline]
    pub fn is_due(&self, now_ms: f64) -> bool {
        !self.active && now_ms - self.last_glitch_ms > self.next_delay_ms
    }

    fn trigger(&mut self, rng: &mut dyn Entropy) {
        self.active = true;
        self.frame_count = 0;
        self.flash_duration = 1 + ((rng.next_unit() * GLITCH_MAX_FRAMES as f64) as u32)
            .min(GLITCH_MAX_FRAMES - 1);
        let dir = rng.next_unit();
        if dir < 0.33 {
            self.direction = GlitchDirection::Horizontal;
            self.disp_x = centered(rng, 0.25);
            self.disp_y = 0.0;
        } else if dir < 0.66 {
            self.direction = GlitchDirection::Vertical;
            self.disp_x = 0.0;
            self.disp_y = centered(rng, 0.15);
        } else {
            self.direction = GlitchDirection::Diagonal;
            self.disp_x = centered(rng, 0.2);
            self.disp_y = centered(rng, 0.12);
        }
        log::trace!(
            "[glitch] flash {:?} frames={} disp=({:.3},{:.3})",
            self.direction,
            self.flash_duration,
            self.disp_x,
            self.disp_y
        );
    }

    /// Advance one frame. Returns the overlay when a flash is rendering.
    pub fn update(&mut self, now_ms: f64, rng: &mut dyn Entropy) -> Option<Overlay> {
        if self.is_due(now_ms) {
            self.trigger(rng);
        }
        if !self.active {
            return None;
        }
        self.frame_count += 1;
        let overlay = Overlay {
            opacity: GLITCH_OPACITY_MIN + rng.next_unit() as f32 * GLITCH_OPACITY_SPAN,
            bloom: GLITCH_BLOOM_MIN + rng.next_unit() as f32 * GLITCH_BLOOM_SPAN,
            offset_x: self.disp_x,
            offset_y: self.disp_y,
            jitter_x: (rng.next_unit() as f32 - 0.5) * GLITCH_JITTER_X,
            jitter_y: (rng.next_unit() as f32 - 0.5) * GLITCH_JITTER_Y,
        };
        if self.frame_count >= self.flash_duration {
            self.active = false;
            self.last_glitch_ms = now_ms;
            let (min, span) = self.rearm;
            self.next_delay_ms = rng.next_in(min, span);
        }
        Some(overlay)
    }
}

#[inline]
fn centered(rng: &mut dyn Entropy, span: f32) -> f32 {
    (rng.next_unit() as f32 - 0.5) * span
}

/// Overlay outside of a glitch flash.
///
/// The beat-reactive face follows the pulse while playing and shimmers
/// with a slow sine otherwise; the idle face holds its base values.
pub fn resting_overlay(
    t_ms: f64,
    beat: BeatSample,
    beat_reactive: bool,
    base_opacity: f32,
    base_bloom: f32,
) -> Overlay {
    if !beat_reactive {
        return Overlay::steady(base_opacity, base_bloom);
    }
    if beat.playing {
        Overlay::steady(base_opacity + beat.pulse * 0.5, base_bloom + beat.pulse * 0.8)
    } else {
        let wave = (t_ms * SHIMMER_SPEED).sin() as f32 * SHIMMER_AMP;
        Overlay::steady(base_opacity + wave, base_bloom + wave)
    }
}
