//! The crop productivity model.
//!
//! Three antecedents (soil nitrogen, soil pH and the NDRE vegetation index),
//! three terms each, and a full 27-rule table mapping every combination onto
//! one of five productivity terms. The crisp score lives on a `[0, 18]`
//! universe sampled every 0.1 and is banded into five zone labels.

use agrofuzz_fis::{
    ClassificationBand, Classifier, EngineConfig, FisDefinition, FisError, FisResult,
    InferenceEngine, InferenceResult, TermDef, UniverseDef, VariableDef,
};
use serde::{Deserialize, Serialize};

pub const NITROGEN: &str = "nitrogen";
pub const PH: &str = "pH";
pub const NDRE: &str = "NDRE";
pub const PRODUCTIVITY: &str = "productivity";

/// Zone labels in ascending order of productivity.
pub const LABELS: [&str; 5] = ["Very Low", "Low", "Medium", "High", "Very High"];

/// Inclusive upper bounds of the first four zone labels.
pub const BAND_BOUNDS: [f64; 4] = [9.16, 10.74, 12.93, 14.57];

/// `(nitrogen, pH, NDRE) -> productivity` for every term combination.
pub const RULE_TABLE: [(&str, &str, &str, &str); 27] = [
    ("low", "acidic", "low", "very low"),
    ("low", "acidic", "medium", "low"),
    ("low", "acidic", "high", "low"),
    ("low", "neutral", "low", "low"),
    ("low", "neutral", "medium", "medium"),
    ("low", "neutral", "high", "high"),
    ("low", "basic", "low", "low"),
    ("low", "basic", "medium", "high"),
    ("low", "basic", "high", "very high"),
    ("medium", "acidic", "low", "very low"),
    ("medium", "acidic", "medium", "low"),
    ("medium", "acidic", "high", "medium"),
    ("medium", "neutral", "low", "low"),
    ("medium", "neutral", "medium", "medium"),
    ("medium", "neutral", "high", "high"),
    ("medium", "basic", "low", "medium"),
    ("medium", "basic", "medium", "high"),
    ("medium", "basic", "high", "very high"),
    ("high", "acidic", "low", "low"),
    ("high", "acidic", "medium", "medium"),
    ("high", "acidic", "high", "high"),
    ("high", "neutral", "low", "medium"),
    ("high", "neutral", "medium", "high"),
    ("high", "neutral", "high", "high"),
    ("high", "basic", "low", "medium"),
    ("high", "basic", "medium", "high"),
    ("high", "basic", "high", "very high"),
];

/// Serializable definition of the productivity FIS.
pub fn definition() -> FisDefinition {
    let nitrogen = VariableDef::new(
        NITROGEN,
        UniverseDef::range(4.0, 50.1, 0.1),
        vec![
            TermDef::triangular("low", 4.0, 4.0, 15.0),
            TermDef::triangular("medium", 4.0, 15.0, 35.0),
            TermDef::triangular("high", 15.0, 50.0, 50.0),
        ],
    );
    let ph = VariableDef::new(
        PH,
        UniverseDef::range(5.0, 8.1, 0.1),
        vec![
            TermDef::triangular("acidic", 5.0, 5.0, 6.5),
            TermDef::triangular("neutral", 5.0, 6.5, 8.0),
            TermDef::triangular("basic", 6.5, 8.0, 8.0),
        ],
    );
    let ndre = VariableDef::new(
        NDRE,
        UniverseDef::range(0.5, 0.91, 0.01),
        vec![
            TermDef::triangular("low", 0.5, 0.5, 0.7),
            TermDef::triangular("medium", 0.5, 0.7, 0.9),
            TermDef::triangular("high", 0.7, 0.9, 0.9),
        ],
    );
    let productivity = VariableDef::new(
        PRODUCTIVITY,
        UniverseDef::range(0.0, 18.1, 0.1),
        vec![
            TermDef::triangular("very low", 0.0, 0.0, 4.0),
            TermDef::triangular("low", 2.0, 6.0, 10.0),
            TermDef::triangular("medium", 8.0, 12.0, 16.0),
            TermDef::triangular("high", 14.0, 16.0, 18.0),
            TermDef::triangular("very high", 16.0, 18.0, 18.0),
        ],
    );

    let rules = RULE_TABLE
        .iter()
        .map(|(n, p, v, out)| {
            format!(
                "IF {} IS {} AND {} IS {} AND {} IS {} THEN {} IS {}",
                NITROGEN, n, PH, p, NDRE, v, PRODUCTIVITY, out
            )
        })
        .collect();

    FisDefinition {
        inputs: vec![nitrogen, ph, ndre],
        output: productivity,
        rules,
        engine: EngineConfig::default(),
    }
}

/// Five-band zone classifier for productivity scores.
pub fn classifier() -> FisResult<Classifier> {
    let bands = BAND_BOUNDS
        .iter()
        .zip(LABELS)
        .map(|(&bound, label)| ClassificationBand::new(bound, label))
        .collect();
    Classifier::new(bands, LABELS[4])
}

/// Crisp score and zone label for one observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub score: f64,
    pub label: String,
}

/// Productivity FIS paired with its zone classifier.
///
/// Immutable once built; share it by reference across threads.
#[derive(Debug, Clone)]
pub struct ProductivityModel {
    engine: InferenceEngine,
    classifier: Classifier,
}

impl ProductivityModel {
    /// Build the standard productivity model.
    pub fn new() -> FisResult<Self> {
        Self::with_config(EngineConfig::default())
    }

    /// Build the standard model with non-default engine settings.
    pub fn with_config(config: EngineConfig) -> FisResult<Self> {
        let mut definition = definition();
        definition.engine = config;
        Self::from_definition(&definition)
    }

    /// Build from any three-input definition, banded with the standard
    /// classifier.
    pub fn from_definition(definition: &FisDefinition) -> FisResult<Self> {
        Self::from_parts(definition.build()?, classifier()?)
    }

    /// Pair an engine with a classifier. The engine must take exactly three
    /// positional inputs: nitrogen, pH and NDRE.
    pub fn from_parts(engine: InferenceEngine, classifier: Classifier) -> FisResult<Self> {
        if engine.inputs().len() != 3 {
            return Err(FisError::InvalidDefinition(format!(
                "productivity model needs 3 inputs (nitrogen, pH, NDRE), got {}",
                engine.inputs().len()
            )));
        }
        Ok(Self { engine, classifier })
    }

    pub fn engine(&self) -> &InferenceEngine {
        &self.engine
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Full inference result including per-rule firing strengths.
    pub fn infer(&self, nitrogen: f64, ph: f64, ndre: f64) -> FisResult<InferenceResult> {
        self.engine.infer(&[nitrogen, ph, ndre])
    }

    /// Crisp productivity score and its zone label.
    pub fn evaluate(&self, nitrogen: f64, ph: f64, ndre: f64) -> FisResult<(f64, &str)> {
        let score = self.infer(nitrogen, ph, ndre)?.crisp_score;
        Ok((score, self.classifier.classify(score)))
    }

    /// Like [`evaluate`](Self::evaluate), returning an owned [`Assessment`].
    pub fn assess(&self, nitrogen: f64, ph: f64, ndre: f64) -> FisResult<Assessment> {
        let (score, label) = self.evaluate(nitrogen, ph, ndre)?;
        Ok(Assessment {
            score,
            label: label.to_string(),
        })
    }
}
