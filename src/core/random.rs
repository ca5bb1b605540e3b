//! Injectable randomness for timers and glitch parameters.
//!
//! The animation core never reaches for a global RNG. Every draw goes
//! through [`Entropy`], so tests can replay an exact sequence while the
//! page uses a seeded [`StdRng`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform samples in `[0, 1)`.
pub trait Entropy {
    fn next_unit(&mut self) -> f64;

    /// Uniform sample in `[min, min + span)`.
    #[inline]
    fn next_in(&mut self, min: f64, span: f64) -> f64 {
        min + self.next_unit() * span
    }
}

impl Entropy for StdRng {
    #[inline]
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

impl<E: Entropy + ?Sized> Entropy for &mut E {
    #[inline]
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Build the default per-instance source from a seed.
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Replays a fixed list of samples, cycling when exhausted.
///
/// Values are clamped into `[0, 1)` on construction so a script can never
/// push a timer outside its documented window.
#[derive(Clone, Debug)]
pub struct Scripted {
    values: Vec<f64>,
    cursor: usize,
}

impl Scripted {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        let mut values: Vec<f64> = values.into();
        if values.is_empty() {
            values.push(0.0);
        }
        for v in &mut values {
            *v = v.clamp(0.0, 1.0 - f64::EPSILON);
        }
        Self { values, cursor: 0 }
    }

    /// Number of samples handed out so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl Entropy for Scripted {
    fn next_unit(&mut self) -> f64 {
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}
