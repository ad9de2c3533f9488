//! Membership functions for linguistic terms.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FisError, FisResult};
use crate::universe::Universe;

/// Shape parameters of a membership function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum MembershipShape {
    /// Triangle with feet at `a` and `c` and apex at `b` (`a <= b <= c`).
    Triangular { a: f64, b: f64, c: f64 },
}

impl MembershipShape {
    /// Check the shape parameters.
    pub fn validate(&self) -> FisResult<()> {
        match *self {
            MembershipShape::Triangular { a, b, c } => {
                if !(a.is_finite() && b.is_finite() && c.is_finite()) {
                    return Err(FisError::invalid(format!(
                        "triangle parameters must be finite, got ({}, {}, {})",
                        a, b, c
                    )));
                }
                if a > b || b > c {
                    return Err(FisError::invalid(format!(
                        "triangle parameters must satisfy a <= b <= c, got ({}, {}, {})",
                        a, b, c
                    )));
                }
                Ok(())
            }
        }
    }

    /// Degree of membership of `x`.
    ///
    /// Total over the reals: 0 outside the support, and 0 for NaN. A
    /// degenerate edge (`a == b` or `b == c`) is vertical, so the shared
    /// point has degree 1 and no division by a zero-width edge ever happens.
    pub fn degree(&self, x: f64) -> f64 {
        match *self {
            MembershipShape::Triangular { a, b, c } => {
                if !(x >= a && x <= c) {
                    0.0
                } else if x < b {
                    (x - a) / (b - a)
                } else if x > b {
                    (c - x) / (c - b)
                } else {
                    1.0
                }
            }
        }
    }

    /// Closed interval outside of which the degree is 0.
    pub fn support(&self) -> (f64, f64) {
        match *self {
            MembershipShape::Triangular { a, c, .. } => (a, c),
        }
    }

    /// Point of full membership.
    pub fn peak(&self) -> f64 {
        match *self {
            MembershipShape::Triangular { b, .. } => b,
        }
    }
}

/// A named membership function (one linguistic term).
#[derive(Debug, Clone, PartialEq)]
pub struct MembershipFunction {
    name: String,
    shape: MembershipShape,
}

impl MembershipFunction {
    /// Create a membership function, validating its shape.
    pub fn new(name: impl Into<String>, shape: MembershipShape) -> FisResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(FisError::invalid("term name cannot be empty"));
        }
        shape
            .validate()
            .map_err(|e| FisError::invalid(format!("term '{}': {}", name, e)))?;
        Ok(Self { name, shape })
    }

    /// Create a triangular membership function.
    pub fn triangular(name: impl Into<String>, a: f64, b: f64, c: f64) -> FisResult<Self> {
        Self::new(name, MembershipShape::Triangular { a, b, c })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &MembershipShape {
        &self.shape
    }

    pub fn degree(&self, x: f64) -> f64 {
        self.shape.degree(x)
    }

    pub fn support(&self) -> (f64, f64) {
        self.shape.support()
    }

    /// Evaluate the function at every sample of `universe`.
    pub fn sample(&self, universe: &Universe) -> Vec<f64> {
        universe.samples().iter().map(|&s| self.degree(s)).collect()
    }
}

impl fmt::Display for MembershipFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shape {
            MembershipShape::Triangular { a, b, c } => {
                write!(f, "{} = trimf[{}, {}, {}]", self.name, a, b, c)
            }
        }
    }
}
