use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Send, annotated with the rate so the collector can extrapolate.
    Sampled,
    /// No sampling configured; always send.
    Exact,
    /// Drop the observation.
    Ignore,
}

/// `rate` must lie in `[0, 1]`; `draw` is a fresh uniform draw over the same range.
pub fn decide(rate: f64, draw: f64) -> Decision {
    debug_assert!((0.0..=1.0).contains(&rate), "rate {rate} outside [0, 1]");
    if rate == 1.0 {
        Decision::Exact
    } else if draw <= rate {
        Decision::Sampled
    } else {
        Decision::Ignore
    }
}

/// Uniform draw in `[0, 1)`, fresh on every call.
pub fn uniform_draw() -> f64 {
    rand::random::<f64>()
}

/// A probability in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct SampleRate(f64);
impl SampleRate {
    pub const ALWAYS: Self = Self(1.0);

    pub fn new(rate: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&rate) {
            return Err(Error::InvalidRate { rate });
        }
        Ok(Self(rate))
    }

    pub fn get(&self) -> f64 {
        self.0
    }

    pub fn decide(&self, draw: f64) -> Decision {
        decide(self.0, draw)
    }
}
impl Default for SampleRate {
    fn default() -> Self {
        Self::ALWAYS
    }
}
impl TryFrom<f64> for SampleRate {
    type Error = Error;
    fn try_from(rate: f64) -> Result<Self> {
        Self::new(rate)
    }
}
