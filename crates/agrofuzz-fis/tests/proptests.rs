//! Property-based tests for agrofuzz-fis
//!
//! These tests use proptest to check invariants that must hold for all
//! membership parameters, inputs and firing strengths.

use agrofuzz_fis::{
    Classifier, ClassificationBand, InferenceEngine, LinguisticVariable, MembershipFunction, Rule,
    Universe,
};
use proptest::prelude::*;

// ===== Strategies for generating test data =====

/// Sorted triangle parameters `a <= b <= c` within [-100, 100].
fn arb_triangle() -> impl Strategy<Value = (f64, f64, f64)> {
    prop::array::uniform3(-100.0f64..100.0).prop_map(|mut p| {
        p.sort_by(|x, y| x.partial_cmp(y).unwrap());
        (p[0], p[1], p[2])
    })
}

fn fan_engine() -> InferenceEngine {
    let temperature =
        LinguisticVariable::new("temperature", Universe::arange(0.0, 40.1, 0.5).unwrap())
            .unwrap()
            .with_triangle("cold", 0.0, 0.0, 20.0)
            .unwrap()
            .with_triangle("mild", 10.0, 20.0, 30.0)
            .unwrap()
            .with_triangle("hot", 20.0, 40.0, 40.0)
            .unwrap();
    let fan = LinguisticVariable::new("fan", Universe::arange(0.0, 100.1, 0.5).unwrap())
        .unwrap()
        .with_triangle("slow", 0.0, 0.0, 50.0)
        .unwrap()
        .with_triangle("medium", 25.0, 50.0, 75.0)
        .unwrap()
        .with_triangle("fast", 50.0, 100.0, 100.0)
        .unwrap();

    InferenceEngine::builder()
        .input(temperature)
        .output(fan)
        .rule(Rule::conjunction(&[("temperature", "cold")], ("fan", "slow")).unwrap())
        .rule(Rule::conjunction(&[("temperature", "mild")], ("fan", "medium")).unwrap())
        .rule(Rule::conjunction(&[("temperature", "hot")], ("fan", "fast")).unwrap())
        .build()
        .unwrap()
}

// ===== Property Tests =====

proptest! {
    /// Property: degrees stay in [0, 1] everywhere
    #[test]
    fn prop_degree_is_bounded((a, b, c) in arb_triangle(), x in -200.0f64..200.0) {
        let mf = MembershipFunction::triangular("t", a, b, c).unwrap();
        let d = mf.degree(x);
        prop_assert!((0.0..=1.0).contains(&d), "degree {} out of range", d);
    }

    /// Property: apex is 1, feet are 0 unless the edge is vertical
    #[test]
    fn prop_apex_and_feet((a, b, c) in arb_triangle()) {
        let mf = MembershipFunction::triangular("t", a, b, c).unwrap();
        prop_assert_eq!(mf.degree(b), 1.0);
        if a < b {
            prop_assert_eq!(mf.degree(a), 0.0);
        } else {
            prop_assert_eq!(mf.degree(a), 1.0);
        }
        if b < c {
            prop_assert_eq!(mf.degree(c), 0.0);
        } else {
            prop_assert_eq!(mf.degree(c), 1.0);
        }
    }

    /// Property: zero outside the support
    #[test]
    fn prop_zero_outside_support((a, b, c) in arb_triangle(), offset in 1e-6f64..50.0) {
        let mf = MembershipFunction::triangular("t", a, b, c).unwrap();
        prop_assert_eq!(mf.degree(a - offset), 0.0);
        prop_assert_eq!(mf.degree(c + offset), 0.0);
    }

    /// Property: raising one rule's strength never lowers the aggregate
    #[test]
    fn prop_aggregation_is_monotone(
        strengths in prop::collection::vec(0.0f64..=1.0, 3),
        rule in 0usize..3,
        bump in 0.0f64..=1.0,
    ) {
        let engine = fan_engine();
        let before = engine.aggregate(&strengths).unwrap();

        let mut raised = strengths.clone();
        raised[rule] = (raised[rule] + bump).min(1.0);
        let after = engine.aggregate(&raised).unwrap();

        for (b, a) in before.iter().zip(&after) {
            prop_assert!(a >= b);
        }
    }

    /// Property: raising the top consequent's strength never moves the centroid left
    #[test]
    fn prop_top_term_pulls_centroid_right(
        strengths in prop::collection::vec(0.01f64..=1.0, 3),
        bump in 0.0f64..=1.0,
    ) {
        let engine = fan_engine();
        let before = engine.defuzzify(&engine.aggregate(&strengths).unwrap()).unwrap();

        let mut raised = strengths.clone();
        raised[2] = (raised[2] + bump).min(1.0);
        let after = engine.defuzzify(&engine.aggregate(&raised).unwrap()).unwrap();

        prop_assert!(after >= before - 1e-9, "centroid moved left: {} -> {}", before, after);
    }

    /// Property: evaluation is idempotent
    #[test]
    fn prop_inference_is_idempotent(x in -10.0f64..50.0) {
        let engine = fan_engine();
        let first = engine.infer(&[x]).unwrap();
        let second = engine.infer(&[x]).unwrap();
        prop_assert_eq!(first.crisp_score.to_bits(), second.crisp_score.to_bits());
        prop_assert_eq!(first.firing_strengths, second.firing_strengths);
    }

    /// Property: the crisp score stays inside the consequent universe
    #[test]
    fn prop_score_within_output_universe(x in 0.0f64..40.0) {
        let engine = fan_engine();
        let score = engine.infer(&[x]).unwrap().crisp_score;
        prop_assert!((0.0..=100.0).contains(&score));
    }

    /// Property: classification is monotone in the score
    #[test]
    fn prop_classifier_is_monotone(s1 in -10.0f64..30.0, s2 in -10.0f64..30.0) {
        let classifier = Classifier::new(
            vec![
                ClassificationBand::new(5.0, "a"),
                ClassificationBand::new(10.0, "b"),
                ClassificationBand::new(20.0, "c"),
            ],
            "d",
        )
        .unwrap();
        let rank = |label: &str| classifier.labels().position(|l| l == label).unwrap();
        let (lo, hi) = if s1 <= s2 { (s1, s2) } else { (s2, s1) };
        prop_assert!(rank(classifier.classify(lo)) <= rank(classifier.classify(hi)));
    }
}
