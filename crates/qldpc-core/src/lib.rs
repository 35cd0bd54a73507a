#![deny(missing_docs)]
#![doc = "Shared errors, deterministic randomness and finite-field linear algebra for the qLDPC workspace."]

use serde::{Deserialize, Serialize};

pub mod errors;
pub mod field;
pub mod matrix;
pub mod rng;

pub use errors::{ErrorInfo, QldpcError};
pub use field::GaloisField;
pub use matrix::{FieldMatrix, RowEchelon};
pub use rng::{derive_substream_seed, RngHandle, DECODER_SUBSTREAM, SESSION_SUBSTREAM};

/// Convenience alias used across the workspace.
pub type Result<T> = std::result::Result<T, QldpcError>;

/// Type of a CSS stabilizer or logical operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Pauli {
    /// Shift-type operator, supported on the first half of a qudit vector.
    X,
    /// Phase-type operator, supported on the second half of a qudit vector.
    Z,
}

impl Pauli {
    /// Returns the conjugate operator type.
    pub fn flip(self) -> Self {
        match self {
            Pauli::X => Pauli::Z,
            Pauli::Z => Pauli::X,
        }
    }

    /// Both operator types in canonical order.
    pub fn both() -> [Pauli; 2] {
        [Pauli::X, Pauli::Z]
    }

    /// Position of this operator's block in an `[X | Z]` vector.
    pub fn block(self) -> usize {
        match self {
            Pauli::X => 0,
            Pauli::Z => 1,
        }
    }
}

impl std::fmt::Display for Pauli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pauli::X => write!(f, "X"),
            Pauli::Z => write!(f, "Z"),
        }
    }
}
