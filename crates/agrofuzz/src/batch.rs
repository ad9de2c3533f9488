//! Batch evaluation of field observations.
//!
//! Rows are independent: each one is evaluated against the same immutable
//! [`ProductivityModel`], in parallel with rayon once the batch is large
//! enough. Results always come back in input order.

use agrofuzz_fis::FisError;
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{AgroError, AgroResult};
use crate::productivity::{Assessment, ProductivityModel};

/// One field sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub nitrogen: f64,
    pub ph: f64,
    pub ndre: f64,
    /// Measured yield, carried through untouched.
    #[serde(default, rename = "yield", skip_serializing_if = "Option::is_none")]
    pub yield_value: Option<f64>,
}

impl Observation {
    pub fn new(nitrogen: f64, ph: f64, ndre: f64) -> Self {
        Self {
            nitrogen,
            ph,
            ndre,
            yield_value: None,
        }
    }

    pub fn with_yield(mut self, yield_value: f64) -> Self {
        self.yield_value = Some(yield_value);
        self
    }
}

/// Build observations from parallel columns.
///
/// All columns, including the optional yield column, must have the same
/// length.
pub fn observations_from_columns(
    nitrogen: &[f64],
    ph: &[f64],
    ndre: &[f64],
    yield_values: Option<&[f64]>,
) -> AgroResult<Vec<Observation>> {
    let expected = nitrogen.len();
    let mut columns = vec![("ph", ph.len()), ("ndre", ndre.len())];
    if let Some(values) = yield_values {
        columns.push(("yield", values.len()));
    }
    if let Some(&(column, actual)) = columns.iter().find(|(_, len)| *len != expected) {
        return Err(AgroError::ColumnLengthMismatch {
            column,
            expected,
            actual,
        });
    }

    Ok((0..expected)
        .map(|i| Observation {
            nitrogen: nitrogen[i],
            ph: ph[i],
            ndre: ndre[i],
            yield_value: yield_values.map(|values| values[i]),
        })
        .collect())
}

/// What to do when a row cannot be evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Keep the error in the row and continue.
    #[default]
    Record,
    /// Fail the whole batch with the first failing row.
    Abort,
}

/// Batch evaluation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Evaluate rows on the rayon pool.
    pub parallel: bool,
    /// Batches smaller than this are evaluated sequentially.
    pub min_parallel_rows: usize,
    /// Worker threads for parallel batches (0 = rayon's global pool).
    pub max_threads: usize,
    pub failure_policy: FailurePolicy,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            min_parallel_rows: 64,
            max_threads: 0,
            failure_policy: FailurePolicy::Record,
        }
    }
}

impl BatchConfig {
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_min_parallel_rows(mut self, rows: usize) -> Self {
        self.min_parallel_rows = rows;
        self
    }

    pub fn with_max_threads(mut self, threads: usize) -> Self {
        self.max_threads = threads;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    fn runs_parallel(&self, rows: usize) -> bool {
        self.parallel && rows >= self.min_parallel_rows.max(2)
    }
}

/// Outcome of one row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowResult {
    /// Position in the input batch.
    pub index: usize,
    pub observation: Observation,
    pub outcome: Result<Assessment, FisError>,
}

impl RowResult {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn assessment(&self) -> Option<&Assessment> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&FisError> {
        self.outcome.as_ref().err()
    }
}

/// Results of a batch, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub rows: Vec<RowResult>,
    /// Successful rows per zone label, in classifier order. Labels with no
    /// rows are present with a zero count.
    pub label_counts: IndexMap<String, usize>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.rows.iter().filter(|r| r.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.rows.len() - self.succeeded()
    }

    /// Failing rows with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &FisError)> {
        self.rows
            .iter()
            .filter_map(|r| r.error().map(|e| (r.index, e)))
    }

    /// Scores in input order; `None` for failed rows.
    pub fn scores(&self) -> Vec<Option<f64>> {
        self.rows
            .iter()
            .map(|r| r.assessment().map(|a| a.score))
            .collect()
    }
}

fn evaluate_row(model: &ProductivityModel, index: usize, observation: Observation) -> RowResult {
    let outcome = model.assess(observation.nitrogen, observation.ph, observation.ndre);
    if let Err(e) = &outcome {
        tracing::warn!(
            index,
            nitrogen = observation.nitrogen,
            ph = observation.ph,
            ndre = observation.ndre,
            error = %e,
            "Row evaluation failed"
        );
    }
    RowResult {
        index,
        observation,
        outcome,
    }
}

fn evaluate_rows(
    model: &ProductivityModel,
    observations: &[Observation],
    config: &BatchConfig,
) -> AgroResult<Vec<RowResult>> {
    if !config.runs_parallel(observations.len()) {
        let mut rows = Vec::with_capacity(observations.len());
        for (index, &observation) in observations.iter().enumerate() {
            let row = evaluate_row(model, index, observation);
            let stop = config.failure_policy == FailurePolicy::Abort && !row.is_ok();
            rows.push(row);
            if stop {
                break;
            }
        }
        return Ok(rows);
    }

    let run = || {
        observations
            .par_iter()
            .enumerate()
            .map(|(index, &observation)| evaluate_row(model, index, observation))
            .collect::<Vec<_>>()
    };

    if config.max_threads > 0 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.max_threads)
            .build()
            .map_err(|e| AgroError::ThreadPool(e.to_string()))?;
        Ok(pool.install(run))
    } else {
        Ok(run())
    }
}

/// Evaluate every observation against `model`.
///
/// With [`FailurePolicy::Record`] failed rows keep their error and the
/// batch succeeds. With [`FailurePolicy::Abort`] the lowest-index failure is
/// returned as [`AgroError::RowFailed`].
pub fn evaluate_batch(
    model: &ProductivityModel,
    observations: &[Observation],
    config: &BatchConfig,
) -> AgroResult<BatchReport> {
    let rows = evaluate_rows(model, observations, config)?;

    if config.failure_policy == FailurePolicy::Abort {
        if let Some(row) = rows.iter().find(|r| !r.is_ok()) {
            if let Err(source) = &row.outcome {
                return Err(AgroError::RowFailed {
                    index: row.index,
                    source: source.clone(),
                });
            }
        }
    }

    let mut label_counts: IndexMap<String, usize> = model
        .classifier()
        .labels()
        .map(|label| (label.to_string(), 0))
        .collect();
    for assessment in rows.iter().filter_map(RowResult::assessment) {
        *label_counts.entry(assessment.label.clone()).or_insert(0) += 1;
    }

    let report = BatchReport { rows, label_counts };
    tracing::info!(
        rows = report.len(),
        succeeded = report.succeeded(),
        failed = report.failed(),
        "Batch evaluation complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_to_observations() {
        let observations = observations_from_columns(
            &[6.0, 11.8],
            &[7.6, 6.8],
            &[0.639306, 0.535043],
            Some(&[3.2, 2.9]),
        )
        .unwrap();
        assert_eq!(observations.len(), 2);
        assert_eq!(observations[1], Observation::new(11.8, 6.8, 0.535043).with_yield(2.9));
    }

    #[test]
    fn test_columns_length_mismatch() {
        let err = observations_from_columns(&[6.0, 11.8], &[7.6], &[0.6, 0.5], None).unwrap_err();
        assert_eq!(
            err,
            AgroError::ColumnLengthMismatch {
                column: "ph",
                expected: 2,
                actual: 1
            }
        );

        let err =
            observations_from_columns(&[6.0], &[7.6], &[0.6], Some(&[1.0, 2.0])).unwrap_err();
        assert!(matches!(
            err,
            AgroError::ColumnLengthMismatch { column: "yield", .. }
        ));
    }

    #[test]
    fn test_empty_batch() {
        let model = ProductivityModel::new().unwrap();
        let report = evaluate_batch(&model, &[], &BatchConfig::default()).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.succeeded(), 0);
        assert_eq!(report.label_counts.len(), 5);
        assert!(report.label_counts.values().all(|&n| n == 0));
    }

    #[test]
    fn test_runs_parallel_threshold() {
        let config = BatchConfig::default().with_min_parallel_rows(10);
        assert!(!config.runs_parallel(9));
        assert!(config.runs_parallel(10));
        assert!(!BatchConfig::sequential().runs_parallel(1000));
        assert!(!BatchConfig::default().with_min_parallel_rows(0).runs_parallel(1));
    }

    #[test]
    fn test_observation_serde_uses_yield_key() {
        let json = serde_json::to_string(&Observation::new(6.0, 7.6, 0.6).with_yield(4.5)).unwrap();
        assert!(json.contains("\"yield\":4.5"));

        let parsed: Observation =
            serde_json::from_str(r#"{"nitrogen": 6.0, "ph": 7.6, "ndre": 0.6}"#).unwrap();
        assert_eq!(parsed.yield_value, None);
    }
}
