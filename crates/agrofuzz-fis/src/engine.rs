//! Mamdani inference: fuzzify, fire, clip, aggregate, defuzzify.
//!
//! An [`InferenceEngine`] is assembled once through [`EngineBuilder`], which
//! validates every variable, term and rule and resolves rule names to
//! indices. The built engine is immutable and `Send + Sync`; each call to
//! [`InferenceEngine::infer`] is an independent computation over a fresh
//! aggregation buffer sized to the consequent universe.
//!
//! # Example
//!
//! ```rust
//! use agrofuzz_fis::{InferenceEngine, LinguisticVariable, Rule, RuleBase, Universe};
//!
//! let temperature = LinguisticVariable::new("temperature", Universe::arange(0.0, 40.1, 0.5)?)?
//!     .with_triangle("cold", 0.0, 0.0, 20.0)?
//!     .with_triangle("hot", 20.0, 40.0, 40.0)?;
//! let fan = LinguisticVariable::new("fan", Universe::arange(0.0, 100.1, 1.0)?)?
//!     .with_triangle("slow", 0.0, 0.0, 50.0)?
//!     .with_triangle("fast", 50.0, 100.0, 100.0)?;
//!
//! let rules = RuleBase::parse_lines(
//!     "IF temperature IS cold THEN fan IS slow
//!      IF temperature IS hot THEN fan IS fast",
//! )?;
//!
//! let engine = InferenceEngine::builder()
//!     .input(temperature)
//!     .output(fan)
//!     .rules(rules)
//!     .build()?;
//!
//! let result = engine.infer(&[30.0])?;
//! assert!(result.crisp_score > 50.0);
//! # Ok::<(), agrofuzz_fis::FisError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::defuzzification::{defuzzify, DefuzzificationMethod, SampledSet};
use crate::error::{FisError, FisResult};
use crate::rule::{ResolvedRule, Rule, RuleBase};
use crate::universe::Universe;
use crate::variable::{LinguisticVariable, VariableRegistry};

/// How crisp inputs outside an antecedent universe are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputPolicy {
    /// Clip the input to `[universe.min, universe.max]` before fuzzifying.
    #[default]
    ClampToUniverse,
    /// Evaluate membership functions at the raw input.
    Unbounded,
}

impl InputPolicy {
    fn apply(self, universe: &Universe, x: f64) -> f64 {
        match self {
            InputPolicy::ClampToUniverse => universe.clamp(x),
            InputPolicy::Unbounded => x,
        }
    }
}

/// Engine-wide evaluation settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub defuzzification: DefuzzificationMethod,
    pub input_policy: InputPolicy,
}

/// Per-variable membership degrees for one observation.
///
/// `degrees(v)[t]` is the degree of the crisp input of antecedent `v` in its
/// term `t`. Computed once and shared by every rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Fuzzified {
    degrees: Vec<Vec<f64>>,
}

impl Fuzzified {
    pub fn degrees(&self, variable: usize) -> &[f64] {
        &self.degrees[variable]
    }

    pub fn degree(&self, variable: usize, term: usize) -> f64 {
        self.degrees[variable][term]
    }

    pub fn variable_count(&self) -> usize {
        self.degrees.len()
    }
}

/// Outcome of one inference.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceResult {
    pub crisp_score: f64,
    /// Firing strength of each rule, in rule-base order.
    pub firing_strengths: Vec<f64>,
}

impl InferenceResult {
    /// Number of rules that fired with non-zero strength.
    pub fn active_rules(&self) -> usize {
        self.firing_strengths.iter().filter(|&&s| s > 0.0).count()
    }
}

/// Builder for [`InferenceEngine`].
#[derive(Debug, Clone, Default)]
pub struct EngineBuilder {
    inputs: Vec<LinguisticVariable>,
    output: Option<LinguisticVariable>,
    rules: RuleBase,
    config: EngineConfig,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an antecedent variable. Positional inputs follow this order.
    pub fn input(mut self, variable: LinguisticVariable) -> Self {
        self.inputs.push(variable);
        self
    }

    pub fn inputs(mut self, variables: impl IntoIterator<Item = LinguisticVariable>) -> Self {
        self.inputs.extend(variables);
        self
    }

    /// Set the consequent variable.
    pub fn output(mut self, variable: LinguisticVariable) -> Self {
        self.output = Some(variable);
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        for rule in rules {
            self.rules.push(rule);
        }
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn defuzzification(mut self, method: DefuzzificationMethod) -> Self {
        self.config.defuzzification = method;
        self
    }

    pub fn input_policy(mut self, policy: InputPolicy) -> Self {
        self.config.input_policy = policy;
        self
    }

    /// Validate everything and build the engine.
    ///
    /// Any unknown variable or term in any rule fails the whole build; no
    /// rule is silently dropped.
    pub fn build(self) -> FisResult<InferenceEngine> {
        let output = self
            .output
            .ok_or_else(|| FisError::invalid("no consequent variable defined"))?;
        if output.term_count() == 0 {
            return Err(FisError::invalid(format!(
                "consequent variable '{}' has no terms",
                output.name()
            )));
        }
        if self.inputs.is_empty() {
            return Err(FisError::invalid("no antecedent variables defined"));
        }
        if self.rules.is_empty() {
            return Err(FisError::invalid("rule base is empty"));
        }

        let mut inputs = VariableRegistry::new();
        for variable in self.inputs {
            if variable.name() == output.name() {
                return Err(FisError::invalid(format!(
                    "variable '{}' is both antecedent and consequent",
                    output.name()
                )));
            }
            inputs.register(variable)?;
        }

        let resolved = self
            .rules
            .iter()
            .enumerate()
            .map(|(i, rule)| {
                rule.resolve(&inputs, &output)
                    .map_err(|e| FisError::invalid(format!("rule {} `{}`: {}", i + 1, rule, e)))
            })
            .collect::<FisResult<Vec<_>>>()?;

        let consequent_shapes = output
            .terms()
            .map(|mf| mf.sample(output.universe()))
            .collect();

        tracing::debug!(
            inputs = inputs.len(),
            output = output.name(),
            output_samples = output.universe().len(),
            rules = resolved.len(),
            defuzzification = ?self.config.defuzzification,
            input_policy = ?self.config.input_policy,
            "Built inference engine"
        );

        Ok(InferenceEngine {
            inputs,
            output,
            rule_base: self.rules,
            resolved,
            consequent_shapes,
            config: self.config,
        })
    }
}

/// Immutable Mamdani inference engine.
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    inputs: VariableRegistry,
    output: LinguisticVariable,
    rule_base: RuleBase,
    resolved: Vec<ResolvedRule>,
    /// Consequent terms sampled on the consequent universe.
    consequent_shapes: Vec<Vec<f64>>,
    config: EngineConfig,
}

impl InferenceEngine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn inputs(&self) -> &VariableRegistry {
        &self.inputs
    }

    pub fn output(&self) -> &LinguisticVariable {
        &self.output
    }

    pub fn rule_base(&self) -> &RuleBase {
        &self.rule_base
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Antecedent names in positional input order.
    pub fn input_names(&self) -> impl Iterator<Item = &str> {
        self.inputs.iter().map(|v| v.name())
    }

    /// Fuzzify positional crisp inputs, applying the input policy.
    pub fn fuzzify(&self, inputs: &[f64]) -> FisResult<Fuzzified> {
        if inputs.len() != self.inputs.len() {
            return Err(FisError::InputArity {
                expected: self.inputs.len(),
                actual: inputs.len(),
            });
        }
        let degrees = self
            .inputs
            .iter()
            .zip(inputs)
            .map(|(variable, &x)| {
                variable.degrees(self.config.input_policy.apply(variable.universe(), x))
            })
            .collect();
        Ok(Fuzzified { degrees })
    }

    /// Firing strength of every rule: the minimum of its antecedent degrees.
    pub fn firing_strengths(&self, fuzzified: &Fuzzified) -> Vec<f64> {
        self.resolved
            .iter()
            .map(|rule| {
                rule.antecedents
                    .iter()
                    .fold(1.0_f64, |acc, &(var, term)| {
                        acc.min(fuzzified.degree(var, term))
                    })
            })
            .collect()
    }

    /// Clip each rule's consequent to its firing strength and take the
    /// pointwise maximum over all rules.
    ///
    /// Returns one membership value per consequent sample. Rules with zero
    /// strength contribute nothing and are skipped. Every strength must lie
    /// in `[0, 1]`; NaN is rejected.
    pub fn aggregate(&self, firing_strengths: &[f64]) -> FisResult<Vec<f64>> {
        if firing_strengths.len() != self.resolved.len() {
            return Err(FisError::InputArity {
                expected: self.resolved.len(),
                actual: firing_strengths.len(),
            });
        }
        if let Some((rule, &value)) = firing_strengths
            .iter()
            .enumerate()
            .find(|(_, s)| !(0.0..=1.0).contains(*s))
        {
            return Err(FisError::InvalidStrength { rule, value });
        }
        let mut aggregated = vec![0.0_f64; self.output.universe().len()];
        for (rule, &strength) in self.resolved.iter().zip(firing_strengths) {
            if strength == 0.0 {
                continue;
            }
            let shape = &self.consequent_shapes[rule.consequent];
            for (acc, &mu) in aggregated.iter_mut().zip(shape) {
                *acc = acc.max(strength.min(mu));
            }
        }
        Ok(aggregated)
    }

    /// Reduce an aggregated shape to a crisp value with the configured method.
    ///
    /// Fails with [`FisError::NoRuleFired`] when the shape is zero everywhere.
    pub fn defuzzify(&self, aggregated: &[f64]) -> FisResult<f64> {
        let set = SampledSet::new(self.output.universe().samples(), aggregated)?;
        defuzzify(&set, self.config.defuzzification).ok_or(FisError::NoRuleFired)
    }

    /// Run the full pipeline on positional crisp inputs.
    ///
    /// A NaN input has zero membership in every term, so any rule that
    /// reads it cannot fire.
    pub fn infer(&self, inputs: &[f64]) -> FisResult<InferenceResult> {
        let fuzzified = self.fuzzify(inputs)?;
        let firing_strengths = self.firing_strengths(&fuzzified);
        let aggregated = self.aggregate(&firing_strengths)?;
        let crisp_score = self.defuzzify(&aggregated)?;

        tracing::trace!(
            inputs = ?inputs,
            crisp_score,
            active_rules = firing_strengths.iter().filter(|&&s| s > 0.0).count(),
            "Inference complete"
        );

        Ok(InferenceResult {
            crisp_score,
            firing_strengths,
        })
    }

    /// Run the full pipeline on inputs keyed by variable name.
    pub fn infer_named(&self, inputs: &HashMap<String, f64>) -> FisResult<InferenceResult> {
        if let Some(unknown) = inputs.keys().find(|k| self.inputs.index_of(k).is_none()) {
            return Err(FisError::UnknownVariable {
                name: unknown.clone(),
            });
        }
        let positional = self
            .inputs
            .iter()
            .map(|v| {
                inputs
                    .get(v.name())
                    .copied()
                    .ok_or_else(|| FisError::MissingInput {
                        name: v.name().to_string(),
                    })
            })
            .collect::<FisResult<Vec<_>>>()?;
        self.infer(&positional)
    }
}
