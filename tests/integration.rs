//! Integration tests for the fuel-economy analysis.
//!
//! These tests verify end-to-end workflows combining multiple components.

use mpg_analysis::analysis::{fit_candidates, load_held_out, Analysis, FINAL_MODEL};
use mpg_analysis::explore::transmission_ttest;
use mpg_analysis::prelude::*;
use mpg_analysis::stats::shapiro_wilk;
use mpg_analysis::AnalysisError;

fn cars() -> DataFrame {
    mtcars::frame().expect("bundled mtcars")
}

#[test]
fn test_best_single_predictor_is_weight() {
    let search = best_subset(&cars(), "gp100m", &mtcars::RAW_PREDICTORS, 2).expect("search");
    let one = search.best_of_size(1).expect("size 1");
    assert_eq!(one.predictors, vec!["wt"]);
}

#[test]
fn test_best_pair_is_weight_and_power() {
    let search = best_subset(&cars(), "gp100m", &mtcars::RAW_PREDICTORS, 2).expect("search");
    let mut two = search.best_of_size(2).expect("size 2").predictors.clone();
    two.sort();
    assert_eq!(two, vec!["hp", "wt"]);
}

#[test]
fn test_outlier_removal_raises_adjusted_r2() {
    let full = cars();
    let reduced = full
        .drop_row_by_label("Chrysler Imperial")
        .expect("row present");
    assert_eq!(reduced.n_rows(), 31);
    assert!(reduced.row_index("Chrysler Imperial").is_err());

    let mut before = LinearRegression::new();
    before.fit_frame(&full, "gp100m", &["wt", "wthp"]).expect("fit");
    let mut after = LinearRegression::new();
    after.fit_frame(&reduced, "gp100m", &["wt", "wthp"]).expect("fit");

    let before = before.summary().expect("fitted").adj_r_squared;
    let after = after.summary().expect("fitted").adj_r_squared;
    assert!(after > before, "{after} should exceed {before}");
}

#[test]
fn test_removing_unknown_label_is_an_error() {
    let err = cars()
        .drop_row_by_label("Ford Model T")
        .expect_err("not in the table");
    assert!(matches!(err, AnalysisError::MissingRow(_)));
}

#[test]
fn test_reduced_model_has_lowest_validation_rmse() {
    let full = cars();
    let reduced = full.drop_row_by_label("Chrysler Imperial").expect("present");
    let candidates = fit_candidates(&full, &reduced, "gp100m").expect("fits");
    let held_out = load_held_out(&ValidationSource::Bundled).expect("excerpt");

    let report = validate(&candidates, &held_out, "gp100m").expect("validate");
    assert_eq!(report.best, FINAL_MODEL);
    let best = report.best_score().expect("present").rmse;
    for score in &report.scores {
        assert!(score.rmse >= best);
    }
}

#[test]
fn test_transmission_not_significant_after_adjustment() {
    let reduced = cars().drop_row_by_label("Chrysler Imperial").expect("present");
    let mut model = LinearRegression::new();
    model
        .fit_frame(&reduced, "gp100m", &["wt", "wthp", "am"])
        .expect("fit");
    let summary = model.summary().expect("fitted");
    let am = summary.term("am").expect("am row");
    assert!(am.p_value > 0.05, "p = {}", am.p_value);
}

#[test]
fn test_gp100m_is_exactly_100_over_mpg() {
    let frame = cars();
    let mpg = frame.column("mpg").expect("mpg");
    let gp100m = frame.column("gp100m").expect("gp100m");
    for i in 0..frame.n_rows() {
        assert_eq!(gp100m[i], 100.0 / mpg[i]);
    }
}

#[test]
fn test_hat_trace_equals_parameter_count() {
    let models: [&[&str]; 3] = [&["wt"], &["wt", "hp"], &["wt", "wthp", "am"]];
    for predictors in models {
        let mut model = LinearRegression::new();
        model.fit_frame(&cars(), "gp100m", predictors).expect("fit");
        let diagnostics = Diagnostics::compute(&model).expect("fitted");
        assert!((diagnostics.hat_trace() - (predictors.len() + 1) as f64).abs() < 1e-9);
    }
}

#[test]
fn test_shapiro_wilk_on_mpg_reference() {
    // R: shapiro.test(mtcars$mpg) -> W = 0.94756, p-value = 0.1229
    let frame = cars();
    let sw = shapiro_wilk(frame.column("mpg").expect("mpg").as_slice()).expect("n = 32");
    assert!((sw.w - 0.947_56).abs() < 1e-4);
    assert!((sw.p_value - 0.1229).abs() < 1e-3);
}

#[test]
fn test_welch_by_transmission_reference() {
    let t = transmission_ttest(&cars(), "mpg").expect("two groups");
    assert!((t.statistic + 3.767).abs() < 1e-3);
    assert!((t.df - 18.33).abs() < 1e-2);
}

#[test]
fn test_full_pipeline_with_custom_validation_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("auto.csv");
    std::fs::write(
        &path,
        "mpg,cylinders,displacement,horsepower,weight,acceleration,model_year,origin,name\n\
         18.0,8,307.0,130.0,3504,12.0,70,1,chevrolet chevelle malibu\n\
         24.0,4,113.0,95.00,2372,15.0,70,3,toyota corona mark ii\n\
         25.0,4,98.00,?,2046,19.0,71,1,ford pinto\n\
         27.0,4,97.00,88.00,2130,14.5,70,3,datsun pl510\n",
    )
    .expect("write csv");

    let config = AnalysisConfig::default().with_validation(ValidationSource::Path(path));
    let report = Analysis::new(config).run().expect("pipeline");
    assert_eq!(report.validation.n_observations, 3);
    assert_eq!(report.validation.scores.len(), 4);
}

#[test]
fn test_malformed_validation_file_aborts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad.csv");
    std::fs::write(
        &path,
        "mpg,cylinders,displacement,horsepower,weight,acceleration,model_year,origin,name\n\
         eighteen,8,307.0,130.0,3504,12.0,70,1,chevrolet chevelle malibu\n",
    )
    .expect("write csv");

    let config = AnalysisConfig::default().with_validation(ValidationSource::Path(path));
    let err = Analysis::new(config).run().expect_err("bad mpg");
    assert!(matches!(err, AnalysisError::Parse { line: 2, .. }));
}

#[test]
fn test_estimator_trait_workflow() {
    let frame = cars();
    let x = frame.design_matrix(&["wt", "hp"], false).expect("columns");
    let y = frame.column("gp100m").expect("response");

    let mut model = LinearRegression::new();
    model.fit(&x, y).expect("fit");
    let predictions = model.predict(&x).expect("same width");
    assert_eq!(predictions.len(), 32);
    let r2 = model.score(&x, y).expect("same rows");
    assert!((r2 - r_squared(&predictions, y)).abs() < 1e-12);
    assert!(rmse(&predictions, y) < 1.0);
}
