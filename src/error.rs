//! Error types for local strain analysis.

use std::fmt;
use thiserror::Error;

/// Result type alias using the crate Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Identifies which input configuration an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationSet {
    /// The reference (undeformed) neighbor-vector set.
    Reference,
    /// The deformed neighbor-vector set.
    Deformed,
}

impl fmt::Display for ConfigurationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reference => write!(f, "reference"),
            Self::Deformed => write!(f, "deformed"),
        }
    }
}

/// Errors that can occur during a local strain fit.
///
/// Every failure mode is a distinct named variant; a failed fit never
/// degrades into a partial or substituted numeric result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Reference and deformed sets do not have matching shapes.
    #[error(
        "shape mismatch: reference set is {x_rows}x{x_cols}, deformed set is {y_rows}x{y_cols}"
    )]
    ShapeMismatch {
        x_rows: usize,
        x_cols: usize,
        y_rows: usize,
        y_cols: usize,
    },

    /// Fewer neighbor vectors than spatial dimensions: the least-squares
    /// system has no unique solution.
    #[error(
        "underdetermined system: {n_vectors} neighbor vector(s) cannot determine a \
         {dim}x{dim} deformation gradient"
    )]
    Underdetermined { n_vectors: usize, dim: usize },

    /// The neighbor vectors do not span the full space (collinear in 2D,
    /// coplanar in 3D), so the normal matrix is singular or ill-conditioned.
    #[error(
        "degenerate neighborhood: normal matrix condition estimate {condition:.3e} \
         exceeds threshold {threshold:.3e}"
    )]
    DegenerateNeighborhood { condition: f64, threshold: f64 },

    /// An input entry is NaN or infinite.
    #[error("non-finite entry in {set} set: neighbor {index}, component {component}")]
    NonFiniteInput {
        set: ConfigurationSet,
        index: usize,
        component: usize,
    },

    /// The runtime-dimension interface only supports 2D and 3D neighborhoods.
    #[error("unsupported spatial dimension {dim}: expected 2 or 3")]
    UnsupportedDimension { dim: usize },
}
