//! Crisp score to discrete label classification.

use serde::{Deserialize, Serialize};

use crate::error::{FisError, FisResult};

/// Scores up to and including `upper_bound` fall into this band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationBand {
    pub upper_bound: f64,
    pub label: String,
}

impl ClassificationBand {
    pub fn new(upper_bound: f64, label: impl Into<String>) -> Self {
        Self {
            upper_bound,
            label: label.into(),
        }
    }
}

/// Ordered threshold bands plus an open-ended top label.
///
/// A score equal to a bound belongs to the lower band.
#[derive(Debug, Clone, PartialEq)]
pub struct Classifier {
    bands: Vec<ClassificationBand>,
    open_label: String,
}

impl Classifier {
    /// Create a classifier from at least one band. Bounds must be finite
    /// and strictly ascending; `open_label` covers scores above the last
    /// bound.
    pub fn new(bands: Vec<ClassificationBand>, open_label: impl Into<String>) -> FisResult<Self> {
        if bands.is_empty() {
            return Err(FisError::invalid("classifier needs at least one band"));
        }
        if let Some(band) = bands.iter().find(|b| !b.upper_bound.is_finite()) {
            return Err(FisError::invalid(format!(
                "band '{}' has a non-finite upper bound",
                band.label
            )));
        }
        if let Some(pair) = bands
            .windows(2)
            .find(|w| w[1].upper_bound <= w[0].upper_bound)
        {
            return Err(FisError::invalid(format!(
                "band bounds must ascend: '{}' ({}) is not above '{}' ({})",
                pair[1].label, pair[1].upper_bound, pair[0].label, pair[0].upper_bound
            )));
        }
        Ok(Self {
            bands,
            open_label: open_label.into(),
        })
    }

    /// Label of the first band whose upper bound is `>= score`, else the
    /// open label. NaN scores get the open label.
    pub fn classify(&self, score: f64) -> &str {
        let idx = self.bands.partition_point(|band| band.upper_bound < score);
        match self.bands.get(idx) {
            Some(band) if score <= band.upper_bound => &band.label,
            _ => &self.open_label,
        }
    }

    pub fn bands(&self) -> &[ClassificationBand] {
        &self.bands
    }

    pub fn open_label(&self) -> &str {
        &self.open_label
    }

    /// All labels from lowest to highest.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.bands
            .iter()
            .map(|b| b.label.as_str())
            .chain(std::iter::once(self.open_label.as_str()))
    }
}
