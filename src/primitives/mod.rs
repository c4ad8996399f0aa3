//! Core compute primitives (Vector, Matrix).
//!
//! Dense, row-major `f64` storage; every regression in the crate is built on
//! these two types.

mod matrix;
mod vector;

pub use matrix::Matrix;
pub use vector::Vector;
