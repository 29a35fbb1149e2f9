//! Core tensor types for local deformation analysis.
//!
//! This module defines the value types produced by a strain fit:
//! - [`DeformationGradient`]: best-fit linear map from reference to deformed vectors
//! - [`StrainTensor`]: symmetric strain measure derived from the gradient
//! - [`LocalStrain`]: composite per-neighborhood result

use nalgebra::SMatrix;

/// Best-fit deformation gradient F for one neighborhood.
///
/// Acts on column vectors from the left: `y ≈ F * x`.
pub type DeformationGradient<const D: usize> = SMatrix<f64, D, D>;

/// Symmetric strain tensor in full matrix form.
///
/// Constructed by the kernel with an exact symmetrization pass, so
/// `E[(i, j)] == E[(j, i)]` holds bit-for-bit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrainTensor<const D: usize>(pub SMatrix<f64, D, D>);

impl<const D: usize> StrainTensor<D> {
    /// Zero strain state.
    pub fn zero() -> Self {
        Self(SMatrix::zeros())
    }

    /// Volumetric strain (trace of the tensor).
    pub fn volumetric(&self) -> f64 {
        self.0.trace()
    }

    /// Deviatoric (traceless) part of the tensor.
    pub fn deviatoric(&self) -> SMatrix<f64, D, D> {
        self.0 - SMatrix::identity() * (self.volumetric() / D as f64)
    }

    /// Frobenius norm of the deviatoric part, a scalar shear intensity.
    pub fn shear_magnitude(&self) -> f64 {
        self.deviatoric().norm()
    }

    /// The full `d x d` symmetric matrix.
    pub fn as_matrix(&self) -> &SMatrix<f64, D, D> {
        &self.0
    }
}

/// Full result of a local strain fit for one neighborhood.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalStrain<const D: usize> {
    /// Best-fit deformation gradient F.
    pub gradient: DeformationGradient<D>,
    /// Strain tensor derived from F.
    pub strain: StrainTensor<D>,
    /// Non-affine residual D² = Σ‖y_i − F·x_i‖², if requested.
    pub d2min: Option<f64>,
}
