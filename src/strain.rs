//! Strain derivation and the main per-neighborhood entry points.
//!
//! [`local_strain`] is the full pipeline: fit the deformation gradient,
//! derive a strain tensor from it, and (optionally) compute the non-affine
//! residual. [`affine_local_strain`] and [`non_affine_local_strain`] are
//! thinner entry points for callers that only need one of the outputs.
//!
//! All entry points are pure functions of their inputs: no process-wide
//! configuration, no cached state, safe to call concurrently on
//! independent neighborhoods.

use crate::error::Result;
use crate::fit::{fit_deformation_gradient, non_affine_residual, DEFAULT_CONDITION_THRESHOLD};
use crate::types::{DeformationGradient, LocalStrain, StrainTensor};
use nalgebra::{SMatrix, SVector};

/// Strain measure derived from the deformation gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrainMeasure {
    /// Lagrangian (Green) strain `E = ½(FᵀF − I)`; insensitive to rigid
    /// rotation, exact at finite strain.
    GreenLagrange,
    /// Engineering (small-displacement) strain `E = ½(F + Fᵀ) − I`.
    Engineering,
}

impl Default for StrainMeasure {
    fn default() -> Self {
        Self::GreenLagrange
    }
}

/// Per-call configuration for [`local_strain`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrainOptions {
    /// Which strain tensor to derive from the fitted gradient.
    pub measure: StrainMeasure,
    /// Whether to compute the non-affine residual D².
    pub report_residual: bool,
    /// Ceiling for the condition estimate of the normal matrix.
    pub condition_threshold: f64,
}

impl Default for StrainOptions {
    fn default() -> Self {
        Self {
            measure: StrainMeasure::GreenLagrange,
            report_residual: true,
            condition_threshold: DEFAULT_CONDITION_THRESHOLD,
        }
    }
}

fn derive_strain<const D: usize>(
    f: &DeformationGradient<D>,
    measure: StrainMeasure,
) -> StrainTensor<D> {
    let identity = SMatrix::<f64, D, D>::identity();
    let e = match measure {
        StrainMeasure::GreenLagrange => (f.transpose() * f - identity) * 0.5,
        StrainMeasure::Engineering => (f + f.transpose()) * 0.5 - identity,
    };
    // Exact symmetrization: ½(e_ij + e_ji) is bitwise equal to ½(e_ji + e_ij)
    StrainTensor((e + e.transpose()) * 0.5)
}

/// Compute the local strain state of one neighborhood.
///
/// Fits the deformation gradient F mapping the reference vectors `x` onto
/// the deformed vectors `y` in the least-squares sense, derives the strain
/// tensor selected in `options`, and, when `options.report_residual` is
/// set, computes the non-affine residual D² from the same fitted F.
///
/// # Arguments
///
/// * `x` - Reference neighbor vectors (one per neighbor)
/// * `y` - Deformed neighbor vectors, with index `i` denoting the same
///   physical neighbor as index `i` of `x`
/// * `options` - Strain measure, residual reporting, conditioning threshold
///
/// # Returns
///
/// [`LocalStrain`] holding F, E, and `d2min` (`None` when residual
/// reporting is disabled).
///
/// # Example
///
/// ```
/// use d2min::{local_strain, StrainOptions};
/// use nalgebra::Vector2;
///
/// let x = [Vector2::new(1.0, 2.0), Vector2::new(1.0, 1.0)];
/// let y = [Vector2::new(1.0, 1.0), Vector2::new(0.0, 1.0)];
/// let result = local_strain(&x, &y, &StrainOptions::default())?;
/// assert!(result.d2min.unwrap() < 1e-20);
/// # Ok::<(), d2min::Error>(())
/// ```
pub fn local_strain<const D: usize>(
    x: &[SVector<f64, D>],
    y: &[SVector<f64, D>],
    options: &StrainOptions,
) -> Result<LocalStrain<D>> {
    let gradient = fit_deformation_gradient(x, y, options.condition_threshold)?;
    let strain = derive_strain(&gradient, options.measure);
    let d2min = options
        .report_residual
        .then(|| non_affine_residual(x, y, &gradient));
    Ok(LocalStrain {
        gradient,
        strain,
        d2min,
    })
}

/// Fit only the affine part: the deformation gradient F.
///
/// Uses the default conditioning threshold; callers needing a custom
/// threshold go through [`local_strain`] or
/// [`fit_deformation_gradient`](crate::fit::fit_deformation_gradient).
pub fn affine_local_strain<const D: usize>(
    x: &[SVector<f64, D>],
    y: &[SVector<f64, D>],
) -> Result<DeformationGradient<D>> {
    fit_deformation_gradient(x, y, DEFAULT_CONDITION_THRESHOLD)
}

/// Fit F and return only the non-affine residual D².
pub fn non_affine_local_strain<const D: usize>(
    x: &[SVector<f64, D>],
    y: &[SVector<f64, D>],
) -> Result<f64> {
    let f = fit_deformation_gradient(x, y, DEFAULT_CONDITION_THRESHOLD)?;
    Ok(non_affine_residual(x, y, &f))
}
