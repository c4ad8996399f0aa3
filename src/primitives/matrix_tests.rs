pub(crate) use super::*;

#[test]
fn test_from_vec() {
    let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions: 2*3=6 elements");
    assert_eq!(m.shape(), (2, 3));
    assert!((m.get(0, 0) - 1.0_f64).abs() < 1e-12);
    assert!((m.get(1, 2) - 6.0_f64).abs() < 1e-12);
}

#[test]
fn test_from_vec_error() {
    let result = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0]);
    assert!(result.is_err());
}

#[test]
fn test_from_columns_with_intercept() {
    let a = Vector::from_slice(&[1.0, 2.0, 3.0]);
    let b = Vector::from_slice(&[4.0, 5.0, 6.0]);
    let m = Matrix::from_columns(&[&a, &b], true).expect("equal lengths");
    assert_eq!(m.shape(), (3, 3));
    assert_eq!(m.row(1).as_slice(), &[1.0, 2.0, 5.0]);
}

#[test]
fn test_from_columns_length_mismatch() {
    let a = Vector::from_slice(&[1.0, 2.0, 3.0]);
    let b = Vector::from_slice(&[4.0, 5.0]);
    assert!(Matrix::from_columns(&[&a, &b], false).is_err());
}

#[test]
fn test_transpose() {
    let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions: 2*3=6 elements");
    let t = m.transpose();
    assert_eq!(t.shape(), (3, 2));
    assert!((t.get(0, 1) - 4.0).abs() < 1e-12);
    assert!((t.get(2, 1) - 6.0).abs() < 1e-12);
}

#[test]
fn test_matmul() {
    // 2x3 * 3x2 = 2x2
    let a = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("2x3");
    let b = Matrix::from_vec(3, 2, vec![7.0, 8.0, 9.0, 10.0, 11.0, 12.0]).expect("3x2");
    let c = a.matmul(&b).expect("compatible");

    assert_eq!(c.shape(), (2, 2));
    // c[0,0] = 1*7 + 2*9 + 3*11 = 58
    assert!((c.get(0, 0) - 58.0).abs() < 1e-12);
    // c[1,1] = 4*8 + 5*10 + 6*12 = 154
    assert!((c.get(1, 1) - 154.0).abs() < 1e-12);
}

#[test]
fn test_matmul_dimension_error() {
    let a = Matrix::<f64>::zeros(2, 3);
    let b = Matrix::<f64>::zeros(2, 3);
    assert!(a.matmul(&b).is_err());
}

#[test]
fn test_gram_matches_transpose_product() {
    let x = Matrix::from_vec(3, 2, vec![1.0, 2.0, 1.0, 3.0, 1.0, 5.0]).expect("3x2");
    let expected = x.transpose().matmul(&x).expect("compatible");
    assert_eq!(x.gram(), expected);
}

#[test]
fn test_t_matvec() {
    let x = Matrix::from_vec(3, 2, vec![1.0, 2.0, 1.0, 3.0, 1.0, 5.0]).expect("3x2");
    let y = Vector::from_slice(&[1.0, 1.0, 2.0]);
    let xty = x.t_matvec(&y).expect("rows match");
    assert_eq!(xty.as_slice(), &[4.0, 15.0]);
}

#[test]
fn test_cholesky_solve() {
    // [[4, 2], [2, 3]] x = [2, 1] -> x = [0.5, 0]
    let a = Matrix::from_vec(2, 2, vec![4.0, 2.0, 2.0, 3.0]).expect("2x2");
    let b = Vector::from_slice(&[2.0, 1.0]);
    let x = a.cholesky_solve(&b).expect("spd");
    assert!((x[0] - 0.5).abs() < 1e-12);
    assert!(x[1].abs() < 1e-12);
}

#[test]
fn test_cholesky_rejects_singular() {
    // Rank one: second row is twice the first
    let a = Matrix::from_vec(2, 2, vec![1.0, 2.0, 2.0, 4.0]).expect("2x2");
    assert!(a.cholesky().is_err());
}

#[test]
fn test_cholesky_rejects_non_square() {
    let a = Matrix::<f64>::zeros(2, 3);
    assert!(a.cholesky().is_err());
}

#[test]
fn test_spd_inverse_times_original_is_identity() {
    let a = Matrix::from_vec(3, 3, vec![4.0, 1.0, 0.5, 1.0, 3.0, 0.2, 0.5, 0.2, 2.0]).expect("3x3");
    let inv = a.spd_inverse().expect("spd");
    let product = a.matmul(&inv).expect("compatible");
    let eye = Matrix::<f64>::eye(3);
    for i in 0..3 {
        for j in 0..3 {
            assert!((product.get(i, j) - eye.get(i, j)).abs() < 1e-10);
        }
    }
}

#[test]
fn test_quadratic_form() {
    let a = Matrix::from_vec(2, 2, vec![2.0, 1.0, 1.0, 3.0]).expect("2x2");
    // [1, 2] A [1, 2]^T = 2 + 2*1*2 + 3*4 = 18
    assert!((a.quadratic_form(&[1.0, 2.0]) - 18.0).abs() < 1e-12);
}

#[test]
fn test_row_and_column() {
    let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("2x3");
    assert_eq!(m.row(1).as_slice(), &[4.0, 5.0, 6.0]);
    assert_eq!(m.column(1).as_slice(), &[2.0, 5.0]);
}

#[test]
fn test_prepend_ones() {
    let m = Matrix::from_vec(2, 2, vec![3.0, 4.0, 5.0, 6.0]).expect("2x2");
    let with_ones = m.prepend_ones();
    assert_eq!(with_ones.shape(), (2, 3));
    assert_eq!(with_ones.as_slice(), &[1.0, 3.0, 4.0, 1.0, 5.0, 6.0]);

    let empty = Matrix::<f64>::zeros(3, 0).prepend_ones();
    assert_eq!(empty.as_slice(), &[1.0, 1.0, 1.0]);
}
