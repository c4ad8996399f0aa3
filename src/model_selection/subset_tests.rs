pub(crate) use super::*;
use crate::data::mtcars::{self, RAW_PREDICTORS};

fn cars() -> DataFrame {
    mtcars::frame().expect("bundled mtcars")
}

#[test]
fn test_next_combination_is_lexicographic() {
    let mut idx = vec![0, 1];
    let mut seen = vec![idx.clone()];
    while next_combination(&mut idx, 4) {
        seen.push(idx.clone());
    }
    assert_eq!(
        seen,
        vec![
            vec![0, 1],
            vec![0, 2],
            vec![0, 3],
            vec![1, 2],
            vec![1, 3],
            vec![2, 3],
        ]
    );
}

#[test]
fn test_next_combination_full_size() {
    let mut idx = vec![0, 1, 2];
    assert!(!next_combination(&mut idx, 3));
}

#[test]
fn test_raw_candidates_reference_winners() {
    let search = best_subset(&cars(), "gp100m", &RAW_PREDICTORS, 3).expect("search");
    assert_eq!(search.results.len(), 3);
    assert_eq!(search.n_observations, 32);
    // C(10,1) + C(10,2) + C(10,3)
    assert_eq!(search.models_evaluated, 10 + 45 + 120);

    let one = search.best_of_size(1).expect("size 1");
    assert_eq!(one.predictors, vec!["wt"]);
    assert!((one.rss - 17.4017).abs() < 1e-3);
    assert!((one.cp - 4.3523).abs() < 1e-3);

    let two = search.best_of_size(2).expect("size 2");
    assert_eq!(two.predictors, vec!["hp", "wt"]);
    assert!((two.rss - 12.7873).abs() < 1e-3);
    assert!((two.adj_r_squared - 0.8365).abs() < 1e-3);
    assert!((two.bic + 18.956).abs() < 1e-2);

    let three = search.best_of_size(3).expect("size 3");
    assert_eq!(three.predictors, vec!["disp", "wt", "carb"]);
    assert!((three.rss - 12.2364).abs() < 1e-3);
}

#[test]
fn test_rss_never_increases_with_size() {
    let search = best_subset(&cars(), "gp100m", &RAW_PREDICTORS, 5).expect("search");
    for pair in search.results.windows(2) {
        assert!(pair[1].rss <= pair[0].rss + 1e-9);
        assert!(pair[1].r_squared >= pair[0].r_squared - 1e-12);
    }
}

#[test]
fn test_criteria_pick_two_variables() {
    let search = best_subset(&cars(), "gp100m", &RAW_PREDICTORS, 3).expect("search");
    assert_eq!(search.best_by_bic().expect("non-empty").size, 2);
    assert_eq!(search.best_by_cp().expect("non-empty").size, 2);
    assert_eq!(search.best_by_adj_r2().expect("non-empty").size, 3);
}

#[test]
fn test_ratio_candidate_wins_size_two() {
    let mut candidates = RAW_PREDICTORS.to_vec();
    candidates.push("wthp");
    let search = best_subset(&cars(), "gp100m", &candidates, 3).expect("search");

    let two = search.best_of_size(2).expect("size 2");
    assert_eq!(two.predictors, vec!["wt", "wthp"]);
    assert!((two.rss - 12.1431).abs() < 1e-3);
    assert!((two.adj_r_squared - 0.8448).abs() < 1e-3);
    assert!((two.bic + 20.61).abs() < 1e-2);
    assert!((two.cp + 3.6262).abs() < 1e-3);

    let best = search.best_by_adj_r2().expect("non-empty");
    assert_eq!(best.predictors, vec!["wt", "wthp"]);
    assert_eq!(search.best_by_bic().expect("non-empty").size, 2);
}

#[test]
fn test_max_size_is_clamped() {
    let search = best_subset(&cars(), "gp100m", &["wt", "hp"], 10).expect("search");
    assert_eq!(search.results.len(), 2);
    assert!(search.best_of_size(3).is_none());
}

#[test]
fn test_singular_subsets_are_skipped() {
    let mut frame = cars();
    let doubled = frame.column("wt").expect("wt").map(|v| 2.0 * v);
    frame.add_column("wt2".into(), doubled).expect("new column");

    let search = best_subset(&frame, "gp100m", &["wt", "wt2"], 2).expect("size 1 fits");
    assert_eq!(search.results.len(), 1);
    assert_eq!(search.models_evaluated, 2);
}

#[test]
fn test_exact_rss_tie_keeps_first_subset() {
    let mut frame = cars();
    let copy = frame.column("wt").expect("wt").clone();
    frame.add_column("wt_copy".into(), copy).expect("new column");

    let search = best_subset(&frame, "gp100m", &["hp", "wt", "wt_copy"], 2).expect("search");
    let one = search.best_of_size(1).expect("size 1");
    assert_eq!(one.predictors, vec!["wt"]);
    let two = search.best_of_size(2).expect("size 2");
    assert_eq!(two.predictors, vec!["hp", "wt"]);

    let reordered = best_subset(&frame, "gp100m", &["wt_copy", "hp", "wt"], 2).expect("search");
    assert_eq!(reordered.best_of_size(1).expect("size 1").predictors, vec!["wt_copy"]);
    assert_eq!(
        one.rss.to_bits(),
        reordered.best_of_size(1).expect("size 1").rss.to_bits()
    );
}

#[test]
fn test_invalid_arguments() {
    let frame = cars();
    assert!(matches!(
        best_subset(&frame, "gp100m", &[], 2),
        Err(AnalysisError::InvalidValue { .. })
    ));
    assert!(matches!(
        best_subset(&frame, "gp100m", &["wt"], 0),
        Err(AnalysisError::InvalidValue { .. })
    ));
    assert!(matches!(
        best_subset(&frame, "gp100m", &["wt", "hp", "wt"], 2),
        Err(AnalysisError::InvalidValue { .. })
    ));
    assert!(matches!(
        best_subset(&frame, "gp100m", &["torque"], 1),
        Err(AnalysisError::MissingColumn(ref c)) if c == "torque"
    ));
}
