//! Serializable FIS definitions.
//!
//! A [`FisDefinition`] is plain data: variables, terms and rule text. It is
//! the constructor input for an [`InferenceEngine`], so one engine
//! implementation serves any configuration that can be written down as JSON:
//!
//! ```json
//! {
//!   "inputs": [
//!     { "name": "pH",
//!       "universe": { "kind": "range", "start": 5.0, "stop": 8.1, "step": 0.1 },
//!       "terms": [ { "name": "acidic", "shape": "triangular", "a": 5.0, "b": 5.0, "c": 6.5 } ] }
//!   ],
//!   "output": { "name": "productivity", "universe": { ... }, "terms": [ ... ] },
//!   "rules": [ "IF pH IS acidic THEN productivity IS low" ],
//!   "engine": { "defuzzification": "centroid", "input_policy": "clamp_to_universe" }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::engine::{EngineConfig, InferenceEngine};
use crate::error::{FisError, FisResult};
use crate::membership::{MembershipFunction, MembershipShape};
use crate::rule::Rule;
use crate::universe::Universe;
use crate::variable::LinguisticVariable;

/// How a variable's sample grid is laid out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UniverseDef {
    /// Half-open `arange`-style grid.
    Range { start: f64, stop: f64, step: f64 },
    /// Explicit sample points.
    Samples { samples: Vec<f64> },
}

impl UniverseDef {
    pub fn range(start: f64, stop: f64, step: f64) -> Self {
        UniverseDef::Range { start, stop, step }
    }

    pub fn build(&self) -> FisResult<Universe> {
        match self {
            UniverseDef::Range { start, stop, step } => Universe::arange(*start, *stop, *step),
            UniverseDef::Samples { samples } => Universe::new(samples.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermDef {
    pub name: String,
    #[serde(flatten)]
    pub shape: MembershipShape,
}

impl TermDef {
    pub fn triangular(name: impl Into<String>, a: f64, b: f64, c: f64) -> Self {
        Self {
            name: name.into(),
            shape: MembershipShape::Triangular { a, b, c },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDef {
    pub name: String,
    pub universe: UniverseDef,
    pub terms: Vec<TermDef>,
}

impl VariableDef {
    pub fn new(name: impl Into<String>, universe: UniverseDef, terms: Vec<TermDef>) -> Self {
        Self {
            name: name.into(),
            universe,
            terms,
        }
    }

    pub fn build(&self) -> FisResult<LinguisticVariable> {
        let universe = self
            .universe
            .build()
            .map_err(|e| FisError::invalid(format!("variable '{}': {}", self.name, e)))?;
        let mut variable = LinguisticVariable::new(self.name.clone(), universe)?;
        for term in &self.terms {
            variable.add_term(MembershipFunction::new(term.name.clone(), term.shape)?)?;
        }
        Ok(variable)
    }
}

/// Complete, serializable description of a single-output FIS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FisDefinition {
    pub inputs: Vec<VariableDef>,
    pub output: VariableDef,
    /// One `IF ... THEN ...` rule per entry.
    pub rules: Vec<String>,
    #[serde(default)]
    pub engine: EngineConfig,
}

impl FisDefinition {
    pub fn from_json(json: &str) -> FisResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| FisError::invalid(format!("malformed FIS definition: {}", e)))
    }

    pub fn to_json_pretty(&self) -> FisResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| FisError::invalid(format!("cannot serialize FIS definition: {}", e)))
    }

    /// Validate the definition and build an engine from it.
    pub fn build(&self) -> FisResult<InferenceEngine> {
        let inputs = self
            .inputs
            .iter()
            .map(VariableDef::build)
            .collect::<FisResult<Vec<_>>>()?;
        let output = self.output.build()?;
        let rules = self
            .rules
            .iter()
            .map(|text| text.parse::<Rule>())
            .collect::<FisResult<Vec<_>>>()?;

        InferenceEngine::builder()
            .inputs(inputs)
            .output(output)
            .rules(rules)
            .config(self.engine)
            .build()
    }
}
