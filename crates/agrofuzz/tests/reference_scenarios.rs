//! End-to-end checks of the productivity model against reference scores.

use agrofuzz::fis::{
    EngineConfig, FisError, InferenceEngine, InputPolicy, LinguisticVariable, Rule, Universe,
};
use agrofuzz::productivity::{self, ProductivityModel};
use approx::assert_relative_eq;

fn model() -> ProductivityModel {
    ProductivityModel::new().unwrap()
}

/// Model whose only rule needs nitrogen above 100.
fn excess_nitrogen_model() -> ProductivityModel {
    let nitrogen = LinguisticVariable::new("nitrogen", Universe::arange(0.0, 200.1, 0.1).unwrap())
        .unwrap()
        .with_triangle("excessive", 100.0, 150.0, 200.0)
        .unwrap();
    let definition = productivity::definition();
    let ph = definition.inputs[1].build().unwrap();
    let ndre = definition.inputs[2].build().unwrap();
    let output = definition.output.build().unwrap();

    let engine = InferenceEngine::builder()
        .input(nitrogen)
        .input(ph)
        .input(ndre)
        .output(output)
        .rule(Rule::conjunction(&[("nitrogen", "excessive")], ("productivity", "high")).unwrap())
        .build()
        .unwrap();
    ProductivityModel::from_parts(engine, productivity::classifier().unwrap()).unwrap()
}

#[test]
fn test_reference_field_sample() {
    let model = model();
    let (score, label) = model.evaluate(6.0, 7.6, 0.639306).unwrap();
    assert_relative_eq!(score, 10.977997211345917, max_relative = 1e-9);
    assert_eq!(label, "Medium");
}

#[test]
fn test_further_reference_rows() {
    let model = model();

    let (score, label) = model.evaluate(11.8, 6.8, 0.535043).unwrap();
    assert_relative_eq!(score, 8.289910089684799, max_relative = 1e-9);
    assert_eq!(label, "Very Low");

    let (score, label) = model.evaluate(10.9, 7.7, 0.541024).unwrap();
    assert_relative_eq!(score, 10.075189822114076, max_relative = 1e-9);
    assert_eq!(label, "Low");
}

#[test]
fn test_corner_scenarios() {
    let model = model();

    // Only "very low" fires: centroid of the [0, 0, 4] triangle on the grid
    let (score, label) = model.evaluate(4.0, 5.0, 0.5).unwrap();
    assert_relative_eq!(score, 1.3, max_relative = 1e-9);
    assert_eq!(label, "Very Low");

    let (score, label) = model.evaluate(50.0, 8.0, 0.9).unwrap();
    assert_relative_eq!(score, 17.366666666666667, max_relative = 1e-9);
    assert_eq!(label, "Very High");

    // Every antecedent at its "medium"/"neutral" apex
    let (score, label) = model.evaluate(15.0, 6.5, 0.7).unwrap();
    assert_relative_eq!(score, 12.0, max_relative = 1e-9);
    assert_eq!(label, "Medium");
}

#[test]
fn test_out_of_range_inputs_are_clamped() {
    let model = model();
    let (high, _) = model.evaluate(50.0, 8.0, 0.9).unwrap();
    let (beyond, label) = model.evaluate(120.0, 9.5, 1.3).unwrap();
    assert_eq!(high.to_bits(), beyond.to_bits());
    assert_eq!(label, "Very High");

    let (low, _) = model.evaluate(4.0, 5.0, 0.5).unwrap();
    let (below, _) = model.evaluate(0.0, 3.0, 0.1).unwrap();
    assert_eq!(low.to_bits(), below.to_bits());
}

#[test]
fn test_unbounded_inputs_can_leave_every_term() {
    let model = ProductivityModel::with_config(EngineConfig {
        input_policy: InputPolicy::Unbounded,
        ..EngineConfig::default()
    })
    .unwrap();
    assert_eq!(
        model.evaluate(120.0, 7.0, 0.7).unwrap_err(),
        FisError::NoRuleFired
    );
    // Inside the universes both policies agree
    let (score, _) = model.evaluate(6.0, 7.6, 0.639306).unwrap();
    assert_relative_eq!(score, 10.977997211345917, max_relative = 1e-9);
}

#[test]
fn test_no_rule_fired() {
    let model = excess_nitrogen_model();
    assert_eq!(
        model.evaluate(6.0, 7.0, 0.7).unwrap_err(),
        FisError::NoRuleFired
    );
    let (score, label) = model.evaluate(150.0, 7.0, 0.7).unwrap();
    assert_relative_eq!(score, 16.0, epsilon = 1e-9);
    assert_eq!(label, "Very High");
}

#[test]
fn test_evaluation_is_idempotent() {
    let model = model();
    let first = model.evaluate(10.9, 7.7, 0.541024).unwrap();
    let second = model.evaluate(10.9, 7.7, 0.541024).unwrap();
    assert_eq!(first.0.to_bits(), second.0.to_bits());
    assert_eq!(first.1, second.1);
}

#[test]
fn test_reference_firing_strengths() {
    let result = model().infer(6.0, 7.6, 0.639306).unwrap();
    assert_eq!(result.firing_strengths.len(), 27);
    // nitrogen low/medium, pH neutral/basic, NDRE low/medium
    assert_eq!(result.active_rules(), 8);
    assert!(result.firing_strengths.iter().all(|s| (0.0..=1.0).contains(s)));
}

#[test]
fn test_band_boundaries() {
    let model = model();
    let classifier = model.classifier();
    let cases = [
        (9.16, "Very Low"),
        (9.17, "Low"),
        (10.74, "Low"),
        (10.75, "Medium"),
        (12.93, "Medium"),
        (12.94, "High"),
        (14.57, "High"),
        (14.58, "Very High"),
        (0.0, "Very Low"),
        (18.0, "Very High"),
    ];
    for (score, expected) in cases {
        assert_eq!(classifier.classify(score), expected, "score {}", score);
    }
}

#[test]
fn test_nan_input_fires_nothing() {
    let model = model();
    assert_eq!(
        model.evaluate(f64::NAN, 7.0, 0.7).unwrap_err(),
        FisError::NoRuleFired
    );
}
