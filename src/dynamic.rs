//! Runtime-dimension front end over dynamically sized matrices.
//!
//! Callers holding `(n, d)` matrices whose dimension is only known at
//! runtime (one *row* per neighbor vector) enter here; the column count
//! selects the 2D or 3D const-generic kernel. Results come back as
//! dynamically sized matrices so downstream code stays dimension-agnostic.
//!
//! Convention: rows of `x`/`y` are the vectors `x_iᵀ`/`y_iᵀ`, and the
//! fitted gradient acts on column vectors from the left (`y_i ≈ F·x_i`,
//! equivalently `Y ≈ X·Fᵀ` row-wise). The fit and the residual share this
//! convention.

use crate::error::{Error, Result};
use crate::strain::{local_strain, StrainOptions};
use nalgebra::{DMatrix, SVector};

/// Result of a runtime-dimension strain fit.
///
/// Same contents as [`LocalStrain`](crate::types::LocalStrain) with the
/// tensors widened to `DMatrix` (shape `(d, d)` for the inferred `d`).
#[derive(Debug, Clone, PartialEq)]
pub struct DynLocalStrain {
    /// Best-fit deformation gradient F.
    pub gradient: DMatrix<f64>,
    /// Symmetric strain tensor derived from F.
    pub strain: DMatrix<f64>,
    /// Non-affine residual D², if requested.
    pub d2min: Option<f64>,
}

fn rows_as_vectors<const D: usize>(m: &DMatrix<f64>) -> Vec<SVector<f64, D>> {
    (0..m.nrows())
        .map(|i| SVector::from_fn(|k, _| m[(i, k)]))
        .collect()
}

fn run_fixed<const D: usize>(
    x: &DMatrix<f64>,
    y: &DMatrix<f64>,
    options: &StrainOptions,
) -> Result<DynLocalStrain> {
    let xs = rows_as_vectors::<D>(x);
    let ys = rows_as_vectors::<D>(y);
    let result = local_strain(&xs, &ys, options)?;
    Ok(DynLocalStrain {
        gradient: DMatrix::from_fn(D, D, |i, j| result.gradient[(i, j)]),
        strain: DMatrix::from_fn(D, D, |i, j| result.strain.0[(i, j)]),
        d2min: result.d2min,
    })
}

/// Compute the local strain state of one neighborhood from `(n, d)` matrices.
///
/// The spatial dimension is inferred from the column count and must be 2
/// or 3; both matrices must have identical shapes with rows in one-to-one
/// neighbor correspondence.
///
/// # Errors
///
/// [`Error::ShapeMismatch`] when the shapes disagree,
/// [`Error::UnsupportedDimension`] when `d ∉ {2, 3}`, plus every error of
/// the underlying [`local_strain`] fit.
pub fn local_strain_dyn(
    x: &DMatrix<f64>,
    y: &DMatrix<f64>,
    options: &StrainOptions,
) -> Result<DynLocalStrain> {
    if x.nrows() != y.nrows() || x.ncols() != y.ncols() {
        return Err(Error::ShapeMismatch {
            x_rows: x.nrows(),
            x_cols: x.ncols(),
            y_rows: y.nrows(),
            y_cols: y.ncols(),
        });
    }
    match x.ncols() {
        2 => run_fixed::<2>(x, y, options),
        3 => run_fixed::<3>(x, y, options),
        dim => Err(Error::UnsupportedDimension { dim }),
    }
}
