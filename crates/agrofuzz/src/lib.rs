//! # agrofuzz
//!
//! **Crop productivity zoning with a Mamdani fuzzy inference system**
//!
//! Each field sample is described by soil nitrogen, soil pH and the NDRE
//! vegetation index. A 27-rule Mamdani system turns the three readings into
//! a crisp productivity score on `[0, 18]`, which is then banded into one of
//! five zones: Very Low, Low, Medium, High, Very High.
//!
//! The generic inference machinery lives in [`agrofuzz_fis`], re-exported
//! here as [`fis`]. This crate adds:
//!
//! - [`productivity`]: the fixed productivity definition, its zone
//!   classifier and [`ProductivityModel`]
//! - [`batch`]: ordered, optionally parallel evaluation of many
//!   [`Observation`]s with per-row failure handling
//! - [`config`]: `.agrofuzzrc` TOML configuration
//! - `structured_logging` (feature `structured-logging`): tracing
//!   subscriber setup
//!
//! ## Quick Start
//!
//! ```rust
//! use agrofuzz::{evaluate_batch, BatchConfig, Observation, ProductivityModel};
//!
//! let model = ProductivityModel::new()?;
//!
//! let (score, label) = model.evaluate(6.0, 7.6, 0.639306)?;
//! assert!((score - 10.978).abs() < 1e-3);
//! assert_eq!(label, "Medium");
//!
//! let observations = vec![
//!     Observation::new(11.8, 6.8, 0.535043),
//!     Observation::new(10.9, 7.7, 0.541024).with_yield(3.1),
//! ];
//! let report = evaluate_batch(&model, &observations, &BatchConfig::default())?;
//! assert_eq!(report.succeeded(), 2);
//! assert_eq!(report.label_counts["Very Low"], 1);
//! # Ok::<(), agrofuzz::AgroError>(())
//! ```

pub use agrofuzz_fis as fis;

pub mod batch;
pub mod config;
pub mod error;
pub mod productivity;

#[cfg(feature = "structured-logging")]
pub mod structured_logging;

pub use batch::{
    evaluate_batch, observations_from_columns, BatchConfig, BatchReport, FailurePolicy,
    Observation, RowResult,
};
pub use config::Config;
pub use error::{AgroError, AgroResult};
pub use productivity::{Assessment, ProductivityModel};
