//! Tests for the logistic regression solver and the full pipeline fit

use credrisk::pipeline::*;
use faer::Mat;

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_pipeline_learns_fixture_signal() {
    let training = create_training_set(200);
    let split = stratified_split(&training.target, 0.2, 42).unwrap();
    let train_x = split.take_train(&training.features).unwrap();
    let test_x = split.take_test(&training.features).unwrap();
    let train_y = take_target(&training.target, &split.train);
    let test_y = take_target(&training.target, &split.test);

    let (pipeline, stats) = RiskPipeline::fit(
        &train_x,
        &train_y,
        &training.schema,
        &LogisticRegression::default(),
    )
    .unwrap();

    assert!(stats.converged, "solver should converge on clean data");
    let accuracy = pipeline.score(&test_x, &test_y).unwrap();
    assert!(accuracy > 0.9, "accuracy {} too low", accuracy);
}

#[test]
fn test_probabilities_are_complementary() {
    let pipeline = fit_fixture_pipeline(100);
    let training = create_training_set(100);

    let probs = pipeline.predict_proba(&training.features).unwrap();
    let predicted = pipeline.predict(&training.features).unwrap();
    for (p, class) in probs.iter().zip(predicted.iter()) {
        assert!((p[0] + p[1] - 1.0).abs() < 1e-12);
        assert!((0.0..=1.0).contains(&p[1]));
        assert_eq!(*class, i32::from(p[1] > 0.5));
    }
}

#[test]
fn test_risk_label_follows_probability() {
    let pipeline = fit_fixture_pipeline(100);

    let mut poor = sample_client();
    poor.amt_income_total = 45_000.0;
    let high = pipeline
        .predict_risk(&poor.to_dataframe().unwrap())
        .unwrap()
        .remove(0);
    assert_eq!(high.label, RiskLabel::High);
    assert_eq!(high.label.to_string(), "ALTO RISCO");
    assert!(high.probability_high > 0.5);

    let low = pipeline
        .predict_risk(&sample_client().to_dataframe().unwrap())
        .unwrap()
        .remove(0);
    assert_eq!(low.label, RiskLabel::Low);
    assert_eq!(low.label.to_string(), "BAIXO RISCO");
}

#[test]
fn test_balanced_weights_sum_to_sample_count() {
    let y = vec![1, 0, 0, 0, 0, 0, 0, 1, 0, 0];
    let weights = class_weights(&y, ClassWeight::Balanced).unwrap();

    let total: f64 = weights.iter().sum();
    assert!((total - y.len() as f64).abs() < 1e-12);
    // each class carries half the total
    let positive: f64 = weights.iter().zip(&y).filter(|(_, &t)| t == 1).map(|(w, _)| w).sum();
    assert!((positive - 5.0).abs() < 1e-12);
}

#[test]
fn test_balanced_weighting_raises_minority_scores() {
    // 1-D overlapping classes with a 1:4 imbalance
    let xs = [0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5];
    let y = [0, 0, 0, 0, 1, 0, 0, 0, 1, 0];
    let x = Mat::from_fn(xs.len(), 1, |i, _| xs[i]);

    let plain = LogisticRegression {
        class_weight: ClassWeight::None,
        ..Default::default()
    };
    let balanced = LogisticRegression::default();

    let (plain_model, _) = plain.fit(&x, &y).unwrap();
    let (balanced_model, _) = balanced.fit(&x, &y).unwrap();

    let p_plain = plain_model.predict_proba(&x).unwrap();
    let p_balanced = balanced_model.predict_proba(&x).unwrap();
    let mean_plain: f64 = p_plain.iter().map(|p| p[1]).sum::<f64>() / xs.len() as f64;
    let mean_balanced: f64 = p_balanced.iter().map(|p| p[1]).sum::<f64>() / xs.len() as f64;
    assert!(mean_balanced > mean_plain);
}

#[test]
fn test_stronger_regularisation_shrinks_coefficients() {
    let training = create_training_set(100);
    let pre = FittedPreprocessor::fit(&training.features, &training.schema).unwrap();
    let x = pre.transform(&training.features).unwrap();

    let (loose, _) = LogisticRegression { c: 10.0, ..Default::default() }
        .fit(&x, &training.target)
        .unwrap();
    let (tight, _) = LogisticRegression { c: 0.01, ..Default::default() }
        .fit(&x, &training.target)
        .unwrap();

    let norm = |m: &LogisticModel| m.coefficients.iter().map(|c| c * c).sum::<f64>();
    assert!(norm(&tight) < norm(&loose));
}

#[test]
fn test_single_class_target_is_rejected() {
    let x = Mat::from_fn(4, 1, |i, _| i as f64);
    let err = LogisticRegression::default().fit(&x, &[0, 0, 0, 0]).unwrap_err();
    assert!(err.to_string().contains("single class"));
}
