//! Tempo-driven beat clock shared between the page controller and faces.
//!
//! The page owns the clock and injects it into each face; faces only ever
//! read it through [`BeatClock::sample`], once per frame.

use super::constants::{DEFAULT_BPM, MS_PER_MINUTE};
use std::cell::RefCell;
use std::rc::Rc;

/// Handle shared between the page controller and mounted faces.
pub type SharedBeat = Rc<RefCell<BeatClock>>;

#[derive(Clone, Debug, PartialEq)]
pub struct BeatClock {
    is_playing: bool,
    bpm: f64,
    start_time_ms: f64,
}

/// Consistent per-frame reading of the clock.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BeatSample {
    pub playing: bool,
    pub phase: f64,
    pub pulse: f32,
}

impl Default for BeatClock {
    fn default() -> Self {
        Self {
            is_playing: false,
            bpm: DEFAULT_BPM,
            start_time_ms: 0.0,
        }
    }
}

impl BeatClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedBeat {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Start (or restart) the clock at `now_ms`. Phase is zero at `now_ms`.
    pub fn start(&mut self, bpm: f64, now_ms: f64) {
        let bpm = if bpm.is_finite() && bpm > 0.0 {
            bpm
        } else {
            log::warn!("[beat] ignoring invalid bpm {bpm}, using {DEFAULT_BPM}");
            DEFAULT_BPM
        };
        self.is_playing = true;
        self.bpm = bpm;
        self.start_time_ms = now_ms;
        log::debug!("[beat] start bpm={:.1}", bpm);
    }

    pub fn stop(&mut self) {
        self.is_playing = false;
        log::debug!("[beat] stop");
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn start_time_ms(&self) -> f64 {
        self.start_time_ms
    }

    #[inline]
    pub fn ms_per_beat(&self) -> f64 {
        MS_PER_MINUTE / self.bpm
    }

    /// Position within the current beat in `[0, 1)`; 0 is exactly on-beat.
    pub fn beat_phase(&self, now_ms: f64) -> f64 {
        if !self.is_playing {
            return 0.0;
        }
        let period = self.ms_per_beat();
        let elapsed = now_ms - self.start_time_ms;
        let phase = elapsed.rem_euclid(period) / period;
        // rem_euclid can round up to the period itself for tiny negative inputs
        if phase >= 1.0 {
            0.0
        } else {
            phase
        }
    }

    /// Pulse intensity: 1 on the beat, decaying quadratically to 0.
    pub fn pulse(&self, now_ms: f64) -> f32 {
        if !self.is_playing {
            return 0.0;
        }
        pulse_from_phase(self.beat_phase(now_ms))
    }

    pub fn sample(&self, now_ms: f64) -> BeatSample {
        if !self.is_playing {
            return BeatSample::default();
        }
        let phase = self.beat_phase(now_ms);
        BeatSample {
            playing: true,
            phase,
            pulse: pulse_from_phase(phase),
        }
    }
}

/// `(1 - phase)^2`, sharp attack and smooth decay.
#[inline]
pub fn pulse_from_phase(phase: f64) -> f32 {
    let d = 1.0 - phase;
    (d * d) as f32
}
