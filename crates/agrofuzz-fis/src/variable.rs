//! Linguistic variables and the variable registry.
//!
//! A [`LinguisticVariable`] binds a name to a [`Universe`] and an ordered set
//! of uniquely named terms. Term order is insertion order and doubles as the
//! stable term index used by resolved rules.

use indexmap::IndexMap;
use std::collections::HashMap;

use crate::error::{FisError, FisResult};
use crate::membership::MembershipFunction;
use crate::universe::Universe;

/// A named continuous variable partitioned into linguistic terms.
#[derive(Debug, Clone, PartialEq)]
pub struct LinguisticVariable {
    name: String,
    universe: Universe,
    terms: IndexMap<String, MembershipFunction>,
}

impl LinguisticVariable {
    /// Create a variable with no terms.
    pub fn new(name: impl Into<String>, universe: Universe) -> FisResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(FisError::invalid("variable name cannot be empty"));
        }
        Ok(Self {
            name,
            universe,
            terms: IndexMap::new(),
        })
    }

    /// Add a term, returning its index.
    ///
    /// Term names must be unique within the variable. A term whose support
    /// extends past the universe is accepted but logged.
    pub fn add_term(&mut self, term: MembershipFunction) -> FisResult<usize> {
        if self.terms.contains_key(term.name()) {
            return Err(FisError::invalid(format!(
                "variable '{}' already has a term named '{}'",
                self.name,
                term.name()
            )));
        }
        let (lo, hi) = term.support();
        if lo < self.universe.min() || hi > self.universe.max() {
            tracing::warn!(
                variable = %self.name,
                term = term.name(),
                support_min = lo,
                support_max = hi,
                universe_min = self.universe.min(),
                universe_max = self.universe.max(),
                "Term support extends past the universe"
            );
        }
        let (index, _) = self.terms.insert_full(term.name().to_string(), term);
        Ok(index)
    }

    /// Builder-style [`add_term`](Self::add_term).
    pub fn with_term(mut self, term: MembershipFunction) -> FisResult<Self> {
        self.add_term(term)?;
        Ok(self)
    }

    /// Builder-style shortcut for a triangular term.
    pub fn with_triangle(self, name: impl Into<String>, a: f64, b: f64, c: f64) -> FisResult<Self> {
        let term = MembershipFunction::triangular(name, a, b, c)?;
        self.with_term(term)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn term(&self, name: &str) -> Option<&MembershipFunction> {
        self.terms.get(name)
    }

    pub fn term_index(&self, name: &str) -> Option<usize> {
        self.terms.get_index_of(name)
    }

    pub fn term_at(&self, index: usize) -> Option<&MembershipFunction> {
        self.terms.get_index(index).map(|(_, mf)| mf)
    }

    /// Terms in declaration order.
    pub fn terms(&self) -> impl Iterator<Item = &MembershipFunction> {
        self.terms.values()
    }

    /// Degree of `x` in every term, keyed by term name.
    pub fn fuzzify(&self, x: f64) -> IndexMap<String, f64> {
        self.terms
            .iter()
            .map(|(name, mf)| (name.clone(), mf.degree(x)))
            .collect()
    }

    /// Degree of `x` in every term, indexed like [`term_at`](Self::term_at).
    pub fn degrees(&self, x: f64) -> Vec<f64> {
        self.terms.values().map(|mf| mf.degree(x)).collect()
    }

    /// Degree of `x` in the named term.
    pub fn degree(&self, term: &str, x: f64) -> FisResult<f64> {
        self.terms
            .get(term)
            .map(|mf| mf.degree(x))
            .ok_or_else(|| FisError::UnknownTerm {
                variable: self.name.clone(),
                term: term.to_string(),
            })
    }
}

/// Name-keyed collection of linguistic variables.
///
/// Registration order is preserved and gives each variable a stable index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableRegistry {
    variables: IndexMap<String, LinguisticVariable>,
}

impl VariableRegistry {
    pub fn new() -> Self {
        Self {
            variables: IndexMap::new(),
        }
    }

    /// Register a variable, returning its index.
    pub fn register(&mut self, variable: LinguisticVariable) -> FisResult<usize> {
        if self.variables.contains_key(variable.name()) {
            return Err(FisError::invalid(format!(
                "variable '{}' is already registered",
                variable.name()
            )));
        }
        let (index, _) = self
            .variables
            .insert_full(variable.name().to_string(), variable);
        Ok(index)
    }

    pub fn get(&self, name: &str) -> FisResult<&LinguisticVariable> {
        self.variables
            .get(name)
            .ok_or_else(|| FisError::UnknownVariable {
                name: name.to_string(),
            })
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.variables.get_index_of(name)
    }

    pub fn get_index(&self, index: usize) -> Option<&LinguisticVariable> {
        self.variables.get_index(index).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LinguisticVariable> {
        self.variables.values()
    }

    /// Fuzzify every variable that has an input value.
    pub fn fuzzify_all(&self, inputs: &HashMap<String, f64>) -> HashMap<String, IndexMap<String, f64>> {
        self.variables
            .iter()
            .filter_map(|(name, var)| inputs.get(name).map(|&x| (name.clone(), var.fuzzify(x))))
            .collect()
    }
}
