//! d2min - local affine deformation analysis for particle neighborhoods
//!
//! Quantifies how a small cluster of particles deformed between two
//! snapshots of a particle-based simulation (granular media, molecular or
//! colloidal systems):
//!
//! - Best-fit deformation gradient F from matched neighbor-vector sets
//! - Strain tensor derivation (Green-Lagrange or engineering measure)
//! - Non-affine residual D² (the Falk-Langer D²min measure)
//!
//! # Architecture
//!
//! The kernel is built from these pieces:
//!
//! - [`fit`]: normal-equation least-squares fit of F, input validation,
//!   conditioning classification
//! - [`strain`]: strain derivation and the per-neighborhood entry points
//! - [`dynamic`]: runtime-dimension front end over `DMatrix` inputs
//! - [`types`]: tensor value types, [`error`]: named failure kinds
//!
//! Every entry point is a pure function over fixed-size small matrices
//! (`d ∈ {2, 3}`); neighbor selection, result serialization, and batching
//! across neighborhoods belong to the caller.
//!
//! # Example
//!
//! ```
//! use d2min::{local_strain, StrainOptions};
//! use nalgebra::Vector2;
//!
//! // Reference and deformed relative positions of three neighbors
//! let x = [
//!     Vector2::new(1.0, 0.0),
//!     Vector2::new(0.0, 1.0),
//!     Vector2::new(-1.0, 1.0),
//! ];
//! let y = [
//!     Vector2::new(1.0, 0.05),
//!     Vector2::new(0.0, 1.0),
//!     Vector2::new(-1.0, 0.95),
//! ];
//!
//! let result = local_strain(&x, &y, &StrainOptions::default())?;
//! println!("volumetric strain: {}", result.strain.volumetric());
//! println!("D²min: {}", result.d2min.unwrap());
//! # Ok::<(), d2min::Error>(())
//! ```

pub mod dynamic;
pub mod error;
pub mod fit;
pub mod strain;
pub mod types;

pub use dynamic::{local_strain_dyn, DynLocalStrain};
pub use error::{ConfigurationSet, Error, Result};
pub use fit::{
    fit_deformation_gradient, non_affine_residual, validate_pair, DEFAULT_CONDITION_THRESHOLD,
};
pub use strain::{
    affine_local_strain, local_strain, non_affine_local_strain, StrainMeasure, StrainOptions,
};
pub use types::{DeformationGradient, LocalStrain, StrainTensor};
