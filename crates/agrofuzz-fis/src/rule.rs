//! Conjunctive fuzzy rules.
//!
//! A rule reads `IF v1 IS t1 AND v2 IS t2 ... THEN out IS t`. Antecedents
//! combine with the minimum t-norm. Rules are stated by name and resolved to
//! `(variable index, term index)` pairs once, when an engine is built, so
//! evaluation never performs string lookups.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{FisError, FisResult};
use crate::variable::{LinguisticVariable, VariableRegistry};

/// A `(variable, term)` pair: "variable IS term".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Proposition {
    pub variable: String,
    pub term: String,
}

impl Proposition {
    pub fn new(variable: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            term: term.into(),
        }
    }
}

impl<V: Into<String>, T: Into<String>> From<(V, T)> for Proposition {
    fn from((variable, term): (V, T)) -> Self {
        Self::new(variable, term)
    }
}

impl fmt::Display for Proposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} IS {}", self.variable, self.term)
    }
}

/// One fuzzy implication with a conjunctive antecedent.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    antecedents: Vec<Proposition>,
    consequent: Proposition,
}

impl Rule {
    /// Create a rule. At least one antecedent is required.
    pub fn new(antecedents: Vec<Proposition>, consequent: Proposition) -> FisResult<Self> {
        if antecedents.is_empty() {
            return Err(FisError::invalid(format!(
                "rule with consequent '{}' has no antecedents",
                consequent
            )));
        }
        Ok(Self {
            antecedents,
            consequent,
        })
    }

    /// Create a rule from `(variable, term)` string pairs.
    pub fn conjunction(antecedents: &[(&str, &str)], consequent: (&str, &str)) -> FisResult<Self> {
        Self::new(
            antecedents.iter().map(|&pair| pair.into()).collect(),
            consequent.into(),
        )
    }

    pub fn antecedents(&self) -> &[Proposition] {
        &self.antecedents
    }

    pub fn consequent(&self) -> &Proposition {
        &self.consequent
    }

    /// Firing strength for crisp `inputs` keyed by variable name.
    ///
    /// The minimum of the antecedent degrees. Inputs are evaluated as given;
    /// range clipping is an engine policy.
    pub fn fire(&self, inputs: &HashMap<String, f64>, registry: &VariableRegistry) -> FisResult<f64> {
        let mut strength = 1.0_f64;
        for prop in &self.antecedents {
            let variable = registry.get(&prop.variable)?;
            let x = inputs
                .get(&prop.variable)
                .copied()
                .ok_or_else(|| FisError::MissingInput {
                    name: prop.variable.clone(),
                })?;
            strength = strength.min(variable.degree(&prop.term, x)?);
        }
        Ok(strength)
    }

    /// Resolve names to indices against the antecedent registry and the
    /// consequent variable.
    pub(crate) fn resolve(
        &self,
        inputs: &VariableRegistry,
        output: &LinguisticVariable,
    ) -> FisResult<ResolvedRule> {
        let mut antecedents = Vec::with_capacity(self.antecedents.len());
        for prop in &self.antecedents {
            let var_index = inputs
                .index_of(&prop.variable)
                .ok_or_else(|| FisError::UnknownVariable {
                    name: prop.variable.clone(),
                })?;
            let variable = inputs
                .get_index(var_index)
                .ok_or_else(|| FisError::UnknownVariable {
                    name: prop.variable.clone(),
                })?;
            let term_index =
                variable
                    .term_index(&prop.term)
                    .ok_or_else(|| FisError::UnknownTerm {
                        variable: prop.variable.clone(),
                        term: prop.term.clone(),
                    })?;
            antecedents.push((var_index, term_index));
        }

        if self.consequent.variable != output.name() {
            return Err(FisError::UnknownVariable {
                name: self.consequent.variable.clone(),
            });
        }
        let consequent =
            output
                .term_index(&self.consequent.term)
                .ok_or_else(|| FisError::UnknownTerm {
                    variable: self.consequent.variable.clone(),
                    term: self.consequent.term.clone(),
                })?;

        Ok(ResolvedRule {
            antecedents,
            consequent,
        })
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IF ")?;
        for (i, prop) in self.antecedents.iter().enumerate() {
            if i > 0 {
                write!(f, " AND ")?;
            }
            write!(f, "{}", prop)?;
        }
        write!(f, " THEN {}", self.consequent)
    }
}

fn is_keyword(token: &str, keyword: &str) -> bool {
    token.eq_ignore_ascii_case(keyword)
}

fn parse_proposition(tokens: &[&str], source: &str) -> FisResult<Proposition> {
    let is_pos = tokens
        .iter()
        .position(|t| is_keyword(t, "IS"))
        .ok_or_else(|| FisError::invalid(format!("missing IS in rule '{}'", source)))?;
    let variable = tokens[..is_pos].join(" ");
    let term = tokens[is_pos + 1..].join(" ");
    if variable.is_empty() || term.is_empty() {
        return Err(FisError::invalid(format!(
            "incomplete proposition in rule '{}'",
            source
        )));
    }
    Ok(Proposition::new(variable, term))
}

/// Parses `IF v IS t [AND v IS t]* THEN v IS t`.
///
/// Keywords are case-insensitive. Multi-word names are allowed
/// (`THEN productivity IS very low`) as long as no word is a keyword.
impl FromStr for Rule {
    type Err = FisError;

    fn from_str(s: &str) -> FisResult<Self> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        if !tokens.first().is_some_and(|t| is_keyword(t, "IF")) {
            return Err(FisError::invalid(format!(
                "rule must start with IF: '{}'",
                s
            )));
        }
        let then_pos = tokens
            .iter()
            .position(|t| is_keyword(t, "THEN"))
            .ok_or_else(|| FisError::invalid(format!("missing THEN in rule '{}'", s)))?;

        let antecedents = tokens[1..then_pos]
            .split(|t| is_keyword(t, "AND"))
            .map(|part| parse_proposition(part, s))
            .collect::<FisResult<Vec<_>>>()?;
        let consequent = parse_proposition(&tokens[then_pos + 1..], s)?;

        Rule::new(antecedents, consequent)
    }
}

/// Rules resolved to variable and term indices.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ResolvedRule {
    /// `(antecedent variable index, term index)` pairs.
    pub(crate) antecedents: Vec<(usize, usize)>,
    /// Term index on the consequent variable.
    pub(crate) consequent: usize,
}

/// Ordered collection of rules.
///
/// Aggregation is order-independent; the order is kept for reproducible
/// diagnostics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleBase {
    rules: Vec<Rule>,
}

impl RuleBase {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Parse one rule per line. Blank lines and lines starting with `#`
    /// are skipped.
    pub fn parse_lines(text: &str) -> FisResult<Self> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(Rule::from_str)
            .collect()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromIterator<Rule> for RuleBase {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for RuleBase {
    type Item = Rule;
    type IntoIter = std::vec::IntoIter<Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.into_iter()
    }
}

impl<'a> IntoIterator for &'a RuleBase {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::universe::Universe;

    fn registry() -> VariableRegistry {
        let mut registry = VariableRegistry::new();
        registry
            .register(
                LinguisticVariable::new("nitrogen", Universe::arange(4.0, 50.1, 0.1).unwrap())
                    .unwrap()
                    .with_triangle("low", 4.0, 4.0, 15.0)
                    .unwrap()
                    .with_triangle("medium", 4.0, 15.0, 35.0)
                    .unwrap(),
            )
            .unwrap();
        registry
            .register(
                LinguisticVariable::new("pH", Universe::arange(5.0, 8.1, 0.1).unwrap())
                    .unwrap()
                    .with_triangle("neutral", 5.0, 6.5, 8.0)
                    .unwrap()
                    .with_triangle("basic", 6.5, 8.0, 8.0)
                    .unwrap(),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_fire_uses_minimum() {
        let rule = Rule::conjunction(
            &[("nitrogen", "medium"), ("pH", "basic")],
            ("productivity", "high"),
        )
        .unwrap();
        let mut inputs = HashMap::new();
        inputs.insert("nitrogen".to_string(), 9.5);
        inputs.insert("pH".to_string(), 7.25);

        // medium(9.5) = 0.5, basic(7.25) = 0.5
        let strength = rule.fire(&inputs, &registry()).unwrap();
        assert!((strength - 0.5).abs() < 1e-12);

        inputs.insert("pH".to_string(), 8.0);
        let strength = rule.fire(&inputs, &registry()).unwrap();
        assert!((strength - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_fire_unknown_names() {
        let mut inputs = HashMap::new();
        inputs.insert("nitrogen".to_string(), 9.5);
        inputs.insert("moisture".to_string(), 0.3);

        let unknown_var =
            Rule::conjunction(&[("moisture", "dry")], ("productivity", "low")).unwrap();
        assert!(matches!(
            unknown_var.fire(&inputs, &registry()),
            Err(FisError::UnknownVariable { .. })
        ));

        let unknown_term =
            Rule::conjunction(&[("nitrogen", "extreme")], ("productivity", "low")).unwrap();
        assert!(matches!(
            unknown_term.fire(&inputs, &registry()),
            Err(FisError::UnknownTerm { .. })
        ));

        let missing = Rule::conjunction(&[("pH", "basic")], ("productivity", "low")).unwrap();
        assert!(matches!(
            missing.fire(&inputs, &registry()),
            Err(FisError::MissingInput { .. })
        ));
    }

    #[test]
    fn test_empty_antecedent_rejected() {
        assert!(Rule::conjunction(&[], ("productivity", "low")).is_err());
    }

    #[test]
    fn test_display_and_parse() {
        let rule = Rule::conjunction(
            &[("nitrogen", "low"), ("pH", "acidic"), ("NDRE", "low")],
            ("productivity", "very low"),
        )
        .unwrap();
        let text = rule.to_string();
        assert_eq!(
            text,
            "IF nitrogen IS low AND pH IS acidic AND NDRE IS low THEN productivity IS very low"
        );
        let parsed: Rule = text.parse().unwrap();
        assert_eq!(parsed, rule);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let rule: Rule = "if nitrogen is high and pH is basic then productivity is very high"
            .parse()
            .unwrap();
        assert_eq!(rule.antecedents().len(), 2);
        assert_eq!(rule.consequent().term, "very high");
    }

    #[test]
    fn test_parse_errors() {
        assert!("nitrogen IS low THEN productivity IS low".parse::<Rule>().is_err());
        assert!("IF nitrogen IS low".parse::<Rule>().is_err());
        assert!("IF nitrogen low THEN productivity IS low".parse::<Rule>().is_err());
        assert!("IF nitrogen IS THEN productivity IS low".parse::<Rule>().is_err());
        assert!("IF THEN productivity IS low".parse::<Rule>().is_err());
    }

    #[test]
    fn test_rule_base_parse_lines() {
        let text = "
            # nitrogen-only rules
            IF nitrogen IS low THEN productivity IS low

            IF nitrogen IS medium THEN productivity IS medium
        ";
        let base = RuleBase::parse_lines(text).unwrap();
        assert_eq!(base.len(), 2);
        assert_eq!(base.rules()[1].consequent().term, "medium");
    }

    #[test]
    fn test_resolve_to_indices() {
        let output = LinguisticVariable::new("productivity", Universe::arange(0.0, 18.1, 0.1).unwrap())
            .unwrap()
            .with_triangle("low", 2.0, 6.0, 10.0)
            .unwrap()
            .with_triangle("high", 14.0, 16.0, 18.0)
            .unwrap();
        let rule = Rule::conjunction(
            &[("pH", "basic"), ("nitrogen", "low")],
            ("productivity", "high"),
        )
        .unwrap();
        let resolved = rule.resolve(&registry(), &output).unwrap();
        assert_eq!(resolved.antecedents, vec![(1, 1), (0, 0)]);
        assert_eq!(resolved.consequent, 1);

        let wrong_output =
            Rule::conjunction(&[("pH", "basic")], ("yield", "high")).unwrap();
        assert!(matches!(
            wrong_output.resolve(&registry(), &output),
            Err(FisError::UnknownVariable { .. })
        ));
    }
}
