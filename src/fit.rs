//! Least-squares fit of the deformation gradient.
//!
//! Given matched neighbor-vector sets `x` (reference) and `y` (deformed),
//! the best-fit gradient F minimizes `Σ‖y_i − F·x_i‖²`. The fit goes through
//! the `d x d` normal equations:
//!
//! ```text
//! A = Σ x_i·x_iᵀ      B = Σ y_i·x_iᵀ      F = B·A⁻¹
//! ```
//!
//! Assembly is `O(n·d²)` over the neighbor count; the solve itself is a
//! fixed `d x d` (d ≤ 3) inversion with no heap allocation.
//!
//! Conditioning of A is checked explicitly before F is accepted: a
//! neighborhood whose vectors are collinear (2D) or coplanar (3D) does not
//! determine a gradient, and is reported as a named error rather than
//! resolved through an unsignaled pseudo-inverse.

use crate::error::{ConfigurationSet, Error, Result};
use crate::types::DeformationGradient;
use nalgebra::{SMatrix, SVector};

/// Default ceiling for the condition estimate of the normal matrix.
pub const DEFAULT_CONDITION_THRESHOLD: f64 = 1e10;

fn check_finite<const D: usize>(set: ConfigurationSet, vectors: &[SVector<f64, D>]) -> Result<()> {
    for (index, v) in vectors.iter().enumerate() {
        for component in 0..D {
            if !v[component].is_finite() {
                return Err(Error::NonFiniteInput {
                    set,
                    index,
                    component,
                });
            }
        }
    }
    Ok(())
}

/// Validate a reference/deformed pair for a D-dimensional fit.
///
/// Checks, in order: matched set sizes, `n ≥ D`, and finiteness of every
/// entry. The fit entry points call this before touching the normal
/// equations; it is exposed so callers can pre-screen neighborhoods.
pub fn validate_pair<const D: usize>(
    x: &[SVector<f64, D>],
    y: &[SVector<f64, D>],
) -> Result<()> {
    if x.len() != y.len() {
        return Err(Error::ShapeMismatch {
            x_rows: x.len(),
            x_cols: D,
            y_rows: y.len(),
            y_cols: D,
        });
    }
    if x.len() < D {
        return Err(Error::Underdetermined {
            n_vectors: x.len(),
            dim: D,
        });
    }
    check_finite(ConfigurationSet::Reference, x)?;
    check_finite(ConfigurationSet::Deformed, y)?;
    Ok(())
}

/// Fit the deformation gradient F minimizing `Σ‖y_i − F·x_i‖²`.
///
/// # Arguments
///
/// * `x` - Reference neighbor vectors (one per neighbor)
/// * `y` - Deformed neighbor vectors, index-aligned with `x`
/// * `condition_threshold` - Ceiling for the condition estimate of the
///   normal matrix `Σ x_i·x_iᵀ`
///
/// # Returns
///
/// The unique `d x d` least-squares gradient, applied as `y ≈ F * x`.
///
/// # Errors
///
/// All validation failures from [`validate_pair`], plus
/// [`Error::DegenerateNeighborhood`] when the normal matrix is singular or
/// its condition estimate `‖A‖·‖A⁻¹‖` (Frobenius) exceeds the threshold.
pub fn fit_deformation_gradient<const D: usize>(
    x: &[SVector<f64, D>],
    y: &[SVector<f64, D>],
    condition_threshold: f64,
) -> Result<DeformationGradient<D>> {
    validate_pair(x, y)?;

    let mut a = SMatrix::<f64, D, D>::zeros();
    let mut b = SMatrix::<f64, D, D>::zeros();
    for (xi, yi) in x.iter().zip(y) {
        a += xi * xi.transpose();
        b += yi * xi.transpose();
    }

    let a_inv = a.try_inverse().ok_or(Error::DegenerateNeighborhood {
        condition: f64::INFINITY,
        threshold: condition_threshold,
    })?;

    let condition = a.norm() * a_inv.norm();
    if !condition.is_finite() || condition > condition_threshold {
        return Err(Error::DegenerateNeighborhood {
            condition,
            threshold: condition_threshold,
        });
    }

    Ok(b * a_inv)
}

/// Non-affine residual `D² = Σ‖y_i − F·x_i‖²` for an already-fitted F.
///
/// Zero exactly when every neighbor moved affinely; strictly positive
/// otherwise. Reuses the fitted gradient, no refit happens here.
pub fn non_affine_residual<const D: usize>(
    x: &[SVector<f64, D>],
    y: &[SVector<f64, D>],
    f: &DeformationGradient<D>,
) -> f64 {
    x.iter()
        .zip(y)
        .map(|(xi, yi)| (yi - f * xi).norm_squared())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Matrix2, Matrix3, Vector2, Vector3};

    #[test]
    fn test_exact_affine_recovery_2d() {
        // Y = A·X columnwise for an invertible A: the fit must recover A
        let a = Matrix2::new(1.1, 0.2, -0.1, 0.9);
        let x = [
            Vector2::new(1.0, 0.0),
            Vector2::new(0.0, 1.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(-1.0, 0.5),
        ];
        let y: Vec<Vector2<f64>> = x.iter().map(|xi| a * xi).collect();

        let f = fit_deformation_gradient(&x, &y, DEFAULT_CONDITION_THRESHOLD).unwrap();
        for i in 0..2 {
            for j in 0..2 {
                assert_relative_eq!(f[(i, j)], a[(i, j)], epsilon = 1e-12);
            }
        }
        assert_relative_eq!(non_affine_residual(&x, &y, &f), 0.0, epsilon = 1e-24);
    }

    #[test]
    fn test_exact_affine_recovery_3d() {
        let a = Matrix3::new(1.05, 0.1, 0.0, -0.05, 0.95, 0.02, 0.0, 0.1, 1.1);
        let x = [
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(-0.5, 0.5, 0.25),
        ];
        let y: Vec<Vector3<f64>> = x.iter().map(|xi| a * xi).collect();

        let f = fit_deformation_gradient(&x, &y, DEFAULT_CONDITION_THRESHOLD).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(f[(i, j)], a[(i, j)], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_overdetermined_residual() {
        // x1 and x3 coincide but map to different images: the least-squares
        // gradient splits the difference, leaving D² = ε²/2
        let eps = 0.1;
        let x = [
            Vector2::new(1.0, 0.0),
            Vector2::new(0.0, 1.0),
            Vector2::new(1.0, 0.0),
        ];
        let y = [
            Vector2::new(1.0, 0.0),
            Vector2::new(0.0, 1.0),
            Vector2::new(1.0, eps),
        ];

        let f = fit_deformation_gradient(&x, &y, DEFAULT_CONDITION_THRESHOLD).unwrap();
        assert_relative_eq!(f[(1, 0)], eps / 2.0, epsilon = 1e-14);

        let d2 = non_affine_residual(&x, &y, &f);
        assert_relative_eq!(d2, eps * eps / 2.0, epsilon = 1e-14);
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let x = [Vector2::new(1.0, 0.0), Vector2::new(0.0, 1.0)];
        let y = [Vector2::new(1.0, 0.0)];
        let err = fit_deformation_gradient(&x, &y, DEFAULT_CONDITION_THRESHOLD).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_underdetermined_rejected() {
        // A single 2D vector pair cannot determine a 2x2 gradient
        let x = [Vector2::new(1.0, 2.0)];
        let y = [Vector2::new(1.0, 1.0)];
        let err = fit_deformation_gradient(&x, &y, DEFAULT_CONDITION_THRESHOLD).unwrap_err();
        assert_eq!(
            err,
            Error::Underdetermined {
                n_vectors: 1,
                dim: 2
            }
        );
    }

    #[test]
    fn test_collinear_neighborhood_rejected() {
        // Two parallel reference vectors: the normal matrix is singular
        let x = [Vector2::new(1.0, 0.0), Vector2::new(2.0, 0.0)];
        let y = [Vector2::new(1.0, 0.1), Vector2::new(2.0, 0.2)];
        let err = fit_deformation_gradient(&x, &y, DEFAULT_CONDITION_THRESHOLD).unwrap_err();
        assert!(matches!(err, Error::DegenerateNeighborhood { .. }));
    }

    #[test]
    fn test_nearly_collinear_neighborhood_rejected() {
        // Invertible but wildly ill-conditioned normal matrix
        let x = [Vector2::new(1.0, 0.0), Vector2::new(1.0, 1e-9)];
        let y = [Vector2::new(1.0, 0.0), Vector2::new(1.0, 1e-9)];
        let err = fit_deformation_gradient(&x, &y, DEFAULT_CONDITION_THRESHOLD).unwrap_err();
        match err {
            Error::DegenerateNeighborhood {
                condition,
                threshold,
            } => {
                assert!(condition > threshold);
            }
            other => panic!("expected DegenerateNeighborhood, got {other:?}"),
        }
    }

    #[test]
    fn test_coplanar_3d_rejected() {
        // Three vectors in the z = 0 plane do not span 3D
        let x = [
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
        ];
        let y = x;
        let err = fit_deformation_gradient(&x, &y, DEFAULT_CONDITION_THRESHOLD).unwrap_err();
        assert!(matches!(err, Error::DegenerateNeighborhood { .. }));
    }

    #[test]
    fn test_tight_threshold_rejects_valid_fit() {
        // The same well-posed neighborhood passes at the default threshold
        // and fails when the caller demands near-perfect conditioning
        let x = [Vector2::new(1.0, 0.0), Vector2::new(0.0, 0.1)];
        let y = x;
        assert!(fit_deformation_gradient(&x, &y, DEFAULT_CONDITION_THRESHOLD).is_ok());
        let err = fit_deformation_gradient(&x, &y, 2.0).unwrap_err();
        assert!(matches!(err, Error::DegenerateNeighborhood { .. }));
    }

    #[test]
    fn test_nan_input_rejected() {
        let x = [Vector2::new(1.0, f64::NAN), Vector2::new(0.0, 1.0)];
        let y = [Vector2::new(1.0, 0.0), Vector2::new(0.0, 1.0)];
        let err = fit_deformation_gradient(&x, &y, DEFAULT_CONDITION_THRESHOLD).unwrap_err();
        assert_eq!(
            err,
            Error::NonFiniteInput {
                set: ConfigurationSet::Reference,
                index: 0,
                component: 1
            }
        );
    }

    #[test]
    fn test_infinite_deformed_input_rejected() {
        let x = [Vector2::new(1.0, 0.0), Vector2::new(0.0, 1.0)];
        let y = [Vector2::new(1.0, 0.0), Vector2::new(f64::INFINITY, 1.0)];
        let err = fit_deformation_gradient(&x, &y, DEFAULT_CONDITION_THRESHOLD).unwrap_err();
        assert_eq!(
            err,
            Error::NonFiniteInput {
                set: ConfigurationSet::Deformed,
                index: 1,
                component: 0
            }
        );
    }

    #[test]
    fn test_residual_nonnegative_for_random_like_motion() {
        let x = [
            Vector2::new(1.0, 0.3),
            Vector2::new(-0.4, 1.2),
            Vector2::new(0.7, -0.9),
            Vector2::new(-1.1, -0.2),
        ];
        let y = [
            Vector2::new(1.2, 0.1),
            Vector2::new(-0.3, 1.4),
            Vector2::new(0.5, -1.0),
            Vector2::new(-1.0, -0.4),
        ];
        let f = fit_deformation_gradient(&x, &y, DEFAULT_CONDITION_THRESHOLD).unwrap();
        assert!(non_affine_residual(&x, &y, &f) >= 0.0);
    }
}
