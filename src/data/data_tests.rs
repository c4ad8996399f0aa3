pub(crate) use super::*;

fn sample() -> DataFrame {
    DataFrame::with_labels(
        vec![
            ("x".to_string(), Vector::from_slice(&[1.0, 2.0, 3.0, 4.0])),
            ("y".to_string(), Vector::from_slice(&[2.0, 4.0, 6.0, 9.0])),
        ],
        vec![
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
            "d".to_string(),
        ],
    )
    .expect("valid frame")
}

#[test]
fn test_new_assigns_numeric_labels() {
    let df = DataFrame::new(vec![("x".to_string(), Vector::from_slice(&[1.0, 2.0]))])
        .expect("valid frame");
    assert_eq!(df.labels(), &["1".to_string(), "2".to_string()]);
}

#[test]
fn test_new_rejects_bad_input() {
    assert!(DataFrame::new(Vec::new()).is_err());

    let ragged = DataFrame::new(vec![
        ("x".to_string(), Vector::from_slice(&[1.0, 2.0])),
        ("y".to_string(), Vector::from_slice(&[1.0])),
    ]);
    assert!(matches!(ragged, Err(AnalysisError::DimensionMismatch { .. })));

    let duplicate = DataFrame::new(vec![
        ("x".to_string(), Vector::from_slice(&[1.0])),
        ("x".to_string(), Vector::from_slice(&[2.0])),
    ]);
    assert!(duplicate.is_err());

    let labels = DataFrame::with_labels(
        vec![("x".to_string(), Vector::from_slice(&[1.0, 2.0]))],
        vec!["only one".to_string()],
    );
    assert!(labels.is_err());
}

#[test]
fn test_column_lookup() {
    let df = sample();
    assert_eq!(df.column("y").expect("exists").as_slice(), &[2.0, 4.0, 6.0, 9.0]);
    let err = df.column("z").expect_err("absent");
    assert!(matches!(err, AnalysisError::MissingColumn(ref c) if c == "z"));
}

#[test]
fn test_select_keeps_labels_and_order() {
    let df = sample().select(&["y", "x"]).expect("both exist");
    assert_eq!(df.column_names(), vec!["y", "x"]);
    assert_eq!(df.labels()[3], "d");
}

#[test]
fn test_row_and_matrix() {
    let df = sample();
    assert_eq!(df.row(1).expect("in range").as_slice(), &[2.0, 4.0]);
    assert!(df.row(4).is_err());

    let m = df.to_matrix();
    assert_eq!(m.shape(), (4, 2));
    assert_eq!(m.get(3, 1), 9.0);
}

#[test]
fn test_design_matrix_with_intercept() {
    let df = sample();
    let x = df.design_matrix(&["y"], true).expect("y exists");
    assert_eq!(x.shape(), (4, 2));
    assert_eq!(x.row(2).as_slice(), &[1.0, 6.0]);
    assert!(df.design_matrix(&["nope"], true).is_err());
}

#[test]
fn test_drop_row_by_label() {
    let df = sample();
    let reduced = df.drop_row_by_label("b").expect("b exists");
    assert_eq!(reduced.n_rows(), 3);
    assert_eq!(reduced.labels(), &["a".to_string(), "c".to_string(), "d".to_string()]);
    assert_eq!(reduced.column("x").expect("kept").as_slice(), &[1.0, 3.0, 4.0]);
    // original is untouched
    assert_eq!(df.n_rows(), 4);

    let err = df.drop_row_by_label("zz").expect_err("absent label");
    assert!(matches!(err, AnalysisError::MissingRow(_)));
}

#[test]
fn test_filter_rows() {
    let df = sample();
    let even = df.filter_rows(|i| i % 2 == 0).expect("two rows survive");
    assert_eq!(even.labels(), &["a".to_string(), "c".to_string()]);
    assert!(df.filter_rows(|_| false).is_err());
}

#[test]
fn test_add_and_drop_column() {
    let mut df = sample();
    df.add_column("z".to_string(), Vector::from_slice(&[0.0; 4]))
        .expect("new column");
    assert_eq!(df.n_cols(), 3);
    assert!(df
        .add_column("z".to_string(), Vector::from_slice(&[0.0; 4]))
        .is_err());
    assert!(df
        .add_column("w".to_string(), Vector::from_slice(&[0.0; 3]))
        .is_err());

    df.drop_column("z").expect("exists");
    assert!(df.drop_column("z").is_err());
    df.drop_column("y").expect("exists");
    assert!(df.drop_column("x").is_err(), "cannot drop the last column");
}

#[test]
fn test_describe() {
    let stats = sample().describe();
    assert_eq!(stats.len(), 2);
    let y = &stats[1];
    assert_eq!(y.name, "y");
    assert_eq!(y.count, 4);
    assert!((y.mean - 5.25).abs() < 1e-12);
    assert_eq!(y.min, 2.0);
    assert_eq!(y.median, 5.0);
    assert_eq!(y.max, 9.0);
}
