//! Defuzzification methods for converting fuzzy sets to crisp values.
//!
//! All methods work on a membership shape sampled over an arbitrary,
//! strictly increasing grid (the consequent [`Universe`](crate::Universe)).
//!
//! # Defuzzification Methods
//!
//! - **Centroid**: discrete center of gravity `Σ x·μ(x) / Σ μ(x)`
//! - **Bisector**: vertical line dividing the (trapezoid-rule) area in half
//! - **Mean of Maximum (MOM)**: average of the points of maximum membership
//! - **Smallest of Maximum (SOM)**: leftmost point of maximum membership
//! - **Largest of Maximum (LOM)**: rightmost point of maximum membership
//!
//! Every method returns `None` when the membership is zero everywhere.

use serde::{Deserialize, Serialize};

use crate::error::{FisError, FisResult};

/// Tolerance used to group samples that share the maximum membership.
const MAX_TOLERANCE: f64 = 1e-10;

/// Defuzzification method selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefuzzificationMethod {
    /// Center of gravity over the sample grid
    #[default]
    Centroid,
    /// Bisector of Area
    Bisector,
    /// Mean of Maximum
    MeanOfMaximum,
    /// Smallest (leftmost) of Maximum
    SmallestOfMaximum,
    /// Largest (rightmost) of Maximum
    LargestOfMaximum,
}

/// A membership shape sampled on a grid.
#[derive(Debug, Clone, Copy)]
pub struct SampledSet<'a> {
    samples: &'a [f64],
    memberships: &'a [f64],
}

impl<'a> SampledSet<'a> {
    /// Pair grid points with membership values of the same length.
    pub fn new(samples: &'a [f64], memberships: &'a [f64]) -> FisResult<Self> {
        if samples.len() != memberships.len() {
            return Err(FisError::invalid(format!(
                "sampled set has {} grid points but {} membership values",
                samples.len(),
                memberships.len()
            )));
        }
        Ok(Self {
            samples,
            memberships,
        })
    }

    pub fn samples(&self) -> &[f64] {
        self.samples
    }

    pub fn memberships(&self) -> &[f64] {
        self.memberships
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Find maximum membership value.
    pub fn max_membership(&self) -> f64 {
        self.memberships.iter().fold(0.0f64, |a, &b| a.max(b))
    }

    /// Find indices of maximum membership.
    fn max_membership_indices(&self) -> Vec<usize> {
        let max_val = self.max_membership();
        if max_val == 0.0 {
            return vec![];
        }

        self.memberships
            .iter()
            .enumerate()
            .filter(|(_, &val)| (val - max_val).abs() < MAX_TOLERANCE)
            .map(|(i, _)| i)
            .collect()
    }

    /// Trapezoid-rule area of each grid segment.
    fn segment_areas(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples
            .windows(2)
            .zip(self.memberships.windows(2))
            .map(|(x, y)| (x[1] - x[0]) * (y[0] + y[1]) / 2.0)
    }
}

/// Defuzzify a sampled set using the specified method.
pub fn defuzzify(set: &SampledSet<'_>, method: DefuzzificationMethod) -> Option<f64> {
    match method {
        DefuzzificationMethod::Centroid => centroid(set),
        DefuzzificationMethod::Bisector => bisector(set),
        DefuzzificationMethod::MeanOfMaximum => mean_of_maximum(set),
        DefuzzificationMethod::SmallestOfMaximum => smallest_of_maximum(set),
        DefuzzificationMethod::LargestOfMaximum => largest_of_maximum(set),
    }
}

/// Centroid (center of gravity) defuzzification.
///
/// Computes `Σ x·μ(x) / Σ μ(x)` over the grid, accumulating in sample order.
pub fn centroid(set: &SampledSet<'_>) -> Option<f64> {
    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for (&x, &membership) in set.samples.iter().zip(set.memberships) {
        numerator += x * membership;
        denominator += membership;
    }

    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

/// Bisector of Area defuzzification.
///
/// Finds the x value that divides the area under the membership
/// function into two equal parts.
pub fn bisector(set: &SampledSet<'_>) -> Option<f64> {
    let total_area: f64 = set.segment_areas().sum();
    if total_area == 0.0 {
        return None;
    }

    let target_area = total_area / 2.0;
    let mut cumulative_area = 0.0;

    for (i, segment_area) in set.segment_areas().enumerate() {
        if segment_area > 0.0 && cumulative_area + segment_area >= target_area {
            // Linear interpolation within this segment
            let fraction = (target_area - cumulative_area) / segment_area;
            let (x1, x2) = (set.samples[i], set.samples[i + 1]);
            return Some(x1 + fraction * (x2 - x1));
        }
        cumulative_area += segment_area;
    }

    set.samples.last().copied()
}

/// Mean of Maximum defuzzification.
pub fn mean_of_maximum(set: &SampledSet<'_>) -> Option<f64> {
    let max_indices = set.max_membership_indices();
    if max_indices.is_empty() {
        return None;
    }

    let sum: f64 = max_indices.iter().map(|&i| set.samples[i]).sum();
    Some(sum / max_indices.len() as f64)
}

/// Smallest of Maximum defuzzification.
pub fn smallest_of_maximum(set: &SampledSet<'_>) -> Option<f64> {
    let max_indices = set.max_membership_indices();
    max_indices.first().map(|&i| set.samples[i])
}

/// Largest of Maximum defuzzification.
pub fn largest_of_maximum(set: &SampledSet<'_>) -> Option<f64> {
    let max_indices = set.max_membership_indices();
    max_indices.last().map(|&i| set.samples[i])
}
