//! # agrofuzz-fis
//!
//! **Engine-agnostic Mamdani fuzzy inference for the agrofuzz workspace**
//!
//! This crate provides the data structures and the evaluation pipeline of a
//! single-output Mamdani fuzzy inference system (FIS). Definitions are
//! validated and resolved once; evaluation is a pure function of the crisp
//! inputs.
//!
//! ## Pipeline
//!
//! 1. **Fuzzification**: each crisp input is mapped to a degree in every
//!    term of its [`LinguisticVariable`].
//! 2. **Rule firing**: each [`Rule`] combines its antecedent degrees with
//!    the minimum t-norm.
//! 3. **Implication**: each rule clips its consequent term at its firing
//!    strength.
//! 4. **Aggregation**: the clipped shapes are combined by pointwise maximum
//!    over the consequent [`Universe`].
//! 5. **Defuzzification**: the aggregated shape is reduced to a crisp value
//!    (discrete centroid by default, see [`DefuzzificationMethod`]).
//!
//! A [`Classifier`] optionally maps the crisp value onto ordered labels.
//!
//! ## Core Components
//!
//! - [`Universe`]: strictly increasing sample grid
//! - [`MembershipFunction`] / [`MembershipShape`]: triangular terms
//! - [`LinguisticVariable`] and [`VariableRegistry`]
//! - [`Rule`], [`Proposition`], [`RuleBase`]
//! - [`InferenceEngine`] built through [`EngineBuilder`]
//! - [`FisDefinition`]: serde-friendly configuration that builds an engine
//!
//! ## Quick Start
//!
//! ```rust
//! use agrofuzz_fis::{InferenceEngine, LinguisticVariable, Rule, Universe};
//!
//! let ph = LinguisticVariable::new("pH", Universe::arange(5.0, 8.1, 0.1)?)?
//!     .with_triangle("acidic", 5.0, 5.0, 6.5)?
//!     .with_triangle("basic", 6.5, 8.0, 8.0)?;
//! let score = LinguisticVariable::new("score", Universe::arange(0.0, 10.1, 0.1)?)?
//!     .with_triangle("low", 0.0, 0.0, 5.0)?
//!     .with_triangle("high", 5.0, 10.0, 10.0)?;
//!
//! let engine = InferenceEngine::builder()
//!     .input(ph)
//!     .output(score)
//!     .rule("IF pH IS acidic THEN score IS low".parse::<Rule>()?)
//!     .rule("IF pH IS basic THEN score IS high".parse::<Rule>()?)
//!     .build()?;
//!
//! let result = engine.infer(&[7.7])?;
//! assert!(result.crisp_score > 5.0);
//! # Ok::<(), agrofuzz_fis::FisError>(())
//! ```

pub mod classify;
pub mod defuzzification;
pub mod definition;
pub mod engine;
pub mod error;
pub mod membership;
pub mod rule;
pub mod universe;
pub mod variable;

pub use classify::{ClassificationBand, Classifier};
pub use defuzzification::{DefuzzificationMethod, SampledSet};
pub use definition::{FisDefinition, TermDef, UniverseDef, VariableDef};
pub use engine::{
    EngineBuilder, EngineConfig, Fuzzified, InferenceEngine, InferenceResult, InputPolicy,
};
pub use error::{FisError, FisResult};
pub use membership::{MembershipFunction, MembershipShape};
pub use rule::{Proposition, Rule, RuleBase};
pub use universe::Universe;
pub use variable::{LinguisticVariable, VariableRegistry};
