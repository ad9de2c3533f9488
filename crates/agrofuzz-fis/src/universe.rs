//! Discretized sample grids over a continuous domain.
//!
//! A [`Universe`] serves two purposes: it bounds the crisp inputs of an
//! antecedent variable, and it is the quadrature grid over which the
//! consequent's aggregated membership is defuzzified. The grid resolution
//! of the consequent therefore fixes the precision of the crisp output.

use crate::error::{FisError, FisResult};

/// Upper bound on the number of samples `arange` will generate.
pub const MAX_SAMPLES: usize = 10_000_000;

/// An ordered, strictly increasing sequence of sample points.
#[derive(Debug, Clone, PartialEq)]
pub struct Universe {
    samples: Vec<f64>,
}

impl Universe {
    /// Create a universe from explicit sample points.
    ///
    /// Requires at least two finite samples in strictly increasing order.
    pub fn new(samples: Vec<f64>) -> FisResult<Self> {
        if samples.len() < 2 {
            return Err(FisError::invalid(format!(
                "universe needs at least 2 samples, got {}",
                samples.len()
            )));
        }
        if let Some(bad) = samples.iter().find(|s| !s.is_finite()) {
            return Err(FisError::invalid(format!(
                "universe sample {} is not finite",
                bad
            )));
        }
        if let Some(i) = samples.windows(2).position(|w| w[1] <= w[0]) {
            return Err(FisError::invalid(format!(
                "universe samples must be strictly increasing ({} then {} at index {})",
                samples[i],
                samples[i + 1],
                i + 1
            )));
        }
        Ok(Self { samples })
    }

    /// Half-open grid `start, start + step, ...` stopping before `stop`.
    ///
    /// Sample count is `ceil((stop - start) / step)` and sample `i` is
    /// `start + i * step`, so `arange(0.0, 18.1, 0.1)` has 181 points ending
    /// at 18.0.
    pub fn arange(start: f64, stop: f64, step: f64) -> FisResult<Self> {
        if !(start.is_finite() && stop.is_finite() && step.is_finite()) {
            return Err(FisError::invalid("universe range bounds must be finite"));
        }
        if step <= 0.0 {
            return Err(FisError::invalid(format!(
                "universe step must be positive, got {}",
                step
            )));
        }
        let count = ((stop - start) / step).ceil();
        if !count.is_finite() || count > MAX_SAMPLES as f64 {
            return Err(FisError::invalid(format!(
                "universe range [{}, {}) with step {} exceeds {} samples",
                start, stop, step, MAX_SAMPLES
            )));
        }
        if count < 2.0 {
            return Err(FisError::invalid(format!(
                "universe range [{}, {}) with step {} yields fewer than 2 samples",
                start, stop, step
            )));
        }
        let samples = (0..count as usize)
            .map(|i| start + i as f64 * step)
            .collect();
        Self::new(samples)
    }

    /// `count` evenly spaced samples covering `[start, end]` inclusive.
    pub fn linspace(start: f64, end: f64, count: usize) -> FisResult<Self> {
        if count < 2 {
            return Err(FisError::invalid(format!(
                "universe needs at least 2 samples, got {}",
                count
            )));
        }
        let step = (end - start) / (count - 1) as f64;
        let mut samples: Vec<f64> = (0..count).map(|i| start + i as f64 * step).collect();
        samples[count - 1] = end;
        Self::new(samples)
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false; a universe holds at least two samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn min(&self) -> f64 {
        self.samples[0]
    }

    pub fn max(&self) -> f64 {
        self.samples[self.samples.len() - 1]
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.min() && x <= self.max()
    }

    /// Clip `x` into `[min, max]`. NaN passes through unchanged.
    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.min(), self.max())
    }
}
