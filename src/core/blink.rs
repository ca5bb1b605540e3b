//! Asymmetric eyelid blink timer.

use super::constants::{BLINK_CLOSE_MS, BLINK_OPEN_MS, BLINK_REARM_MIN_MS, BLINK_REARM_SPAN_MS};
use super::random::Entropy;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlinkStage {
    Idle,
    Closing,
    Opening,
}

#[derive(Clone, Debug)]
pub struct BlinkState {
    timer_ms: f64,
    next_blink_ms: f64,
    stage: BlinkStage,
    // time spent in the current closing/opening stage
    stage_ms: f64,
}

impl BlinkState {
    pub fn new(rng: &mut dyn Entropy) -> Self {
        Self::with_next_blink(draw_next_blink(rng))
    }

    pub fn with_next_blink(next_blink_ms: f64) -> Self {
        Self {
            timer_ms: 0.0,
            next_blink_ms,
            stage: BlinkStage::Idle,
            stage_ms: 0.0,
        }
    }

    pub fn stage(&self) -> BlinkStage {
        self.stage
    }

    pub fn is_blinking(&self) -> bool {
        self.stage != BlinkStage::Idle
    }

    pub fn timer_ms(&self) -> f64 {
        self.timer_ms
    }

    pub fn next_blink_ms(&self) -> f64 {
        self.next_blink_ms
    }

    /// Progress through the current stage in `[0, 1]`; 0 while idle.
    pub fn phase(&self) -> f64 {
        match self.stage {
            BlinkStage::Idle => 0.0,
            BlinkStage::Closing => (self.stage_ms / BLINK_CLOSE_MS).min(1.0),
            BlinkStage::Opening => (self.stage_ms / BLINK_OPEN_MS).min(1.0),
        }
    }

    /// Advance by `dt_ms` and return the eyelid scale (1 open, 0 shut).
    ///
    /// The frame that completes the closing stage returns 0 whatever the
    /// frame step. Time past the end of closing is carried into the opening
    /// stage, so a full blink spans 260 ms of accumulated `dt`.
    pub fn update(&mut self, dt_ms: f64, rng: &mut dyn Entropy) -> f32 {
        match self.stage {
            BlinkStage::Idle => {
                self.timer_ms += dt_ms;
                if self.timer_ms > self.next_blink_ms {
                    self.stage = BlinkStage::Closing;
                    self.stage_ms = 0.0;
                }
                1.0
            }
            BlinkStage::Closing => {
                self.stage_ms += dt_ms;
                if self.stage_ms >= BLINK_CLOSE_MS {
                    // the closing frame always shows the shut eye
                    self.stage = BlinkStage::Opening;
                    self.stage_ms -= BLINK_CLOSE_MS;
                    return 0.0;
                }
                (1.0 - self.stage_ms / BLINK_CLOSE_MS) as f32
            }
            BlinkStage::Opening => {
                self.stage_ms += dt_ms;
                self.opening_output(rng)
            }
        }
    }

    fn opening_output(&mut self, rng: &mut dyn Entropy) -> f32 {
        if self.stage_ms >= BLINK_OPEN_MS {
            self.stage = BlinkStage::Idle;
            self.stage_ms = 0.0;
            self.timer_ms = 0.0;
            self.next_blink_ms = draw_next_blink(rng);
            return 1.0;
        }
        (self.stage_ms / BLINK_OPEN_MS) as f32
    }
}

#[inline]
fn draw_next_blink(rng: &mut dyn Entropy) -> f64 {
    rng.next_in(BLINK_REARM_MIN_MS, BLINK_REARM_SPAN_MS)
}
