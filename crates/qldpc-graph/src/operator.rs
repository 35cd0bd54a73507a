use std::fmt;

use qldpc_core::errors::{ErrorInfo, QldpcError};
use qldpc_core::{GaloisField, Pauli};
use serde::{Deserialize, Serialize};

/// Single-qudit operator `X(x) Z(z)` with field-valued exponents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuditOperator {
    /// Exponent of the shift operator.
    pub x: u32,
    /// Exponent of the phase operator.
    pub z: u32,
}

impl QuditOperator {
    /// The identity operator.
    pub const IDENTITY: QuditOperator = QuditOperator { x: 0, z: 0 };

    /// Creates an operator from its `(x, z)` exponents.
    pub const fn new(x: u32, z: u32) -> Self {
        Self { x, z }
    }

    /// Pure operator of one type with the given exponent.
    pub fn of_type(pauli: Pauli, value: u32) -> Self {
        match pauli {
            Pauli::X => Self::new(value, 0),
            Pauli::Z => Self::new(0, value),
        }
    }

    /// Exponent of the given type.
    pub fn get(self, pauli: Pauli) -> u32 {
        match pauli {
            Pauli::X => self.x,
            Pauli::Z => self.z,
        }
    }

    /// Returns whether this is the identity operator.
    pub fn is_identity(self) -> bool {
        self.x == 0 && self.z == 0
    }

    /// Fourier conjugate, exchanging the X and Z exponents.
    pub fn conjugated(self) -> Self {
        Self::new(self.z, self.x)
    }

    /// Inverse operator up to phase.
    pub fn negated(self, field: &GaloisField) -> Self {
        Self::new(field.neg(self.x), field.neg(self.z))
    }

    /// Renders the operator as a stabilizer-string token.
    ///
    /// Qubit operators render as `I`, `X`, `Y` or `Z`. Other qudits render as `I` or as
    /// `X(r)Z(s)`, omitting a factor whose exponent is zero.
    pub fn to_token(self, field: &GaloisField) -> String {
        if field.order() == 2 {
            return match (self.x, self.z) {
                (0, 0) => "I",
                (_, 0) => "X",
                (0, _) => "Z",
                _ => "Y",
            }
            .to_string();
        }
        if self.is_identity() {
            return "I".to_string();
        }
        let mut token = String::new();
        if self.x != 0 {
            token.push_str(&format!("X({})", self.x));
        }
        if self.z != 0 {
            token.push_str(&format!("Z({})", self.z));
        }
        token
    }

    /// Parses a stabilizer-string token, the inverse of [`QuditOperator::to_token`].
    pub fn from_token(token: &str, field: &GaloisField) -> Result<Self, QldpcError> {
        let invalid = || {
            QldpcError::Graph(
                ErrorInfo::new("invalid-operator-token", "cannot parse qudit operator")
                    .with_context("token", token)
                    .with_context("field", field.to_string()),
            )
        };
        if field.order() == 2 {
            return match token {
                "I" => Ok(Self::IDENTITY),
                "X" => Ok(Self::new(1, 0)),
                "Y" => Ok(Self::new(1, 1)),
                "Z" => Ok(Self::new(0, 1)),
                _ => Err(invalid()),
            };
        }
        if token == "I" {
            return Ok(Self::IDENTITY);
        }
        let mut rest = token;
        let exponent = |label: char, rest: &mut &str| -> Result<Option<u32>, QldpcError> {
            let Some(after) = rest.strip_prefix(label) else {
                return Ok(None);
            };
            let inner = after.strip_prefix('(').ok_or_else(invalid)?;
            let close = inner.find(')').ok_or_else(invalid)?;
            let value: i64 = inner[..close].trim().parse().map_err(|_| invalid())?;
            *rest = &inner[close + 1..];
            field.element(value).map(Some)
        };
        let x = exponent('X', &mut rest)?;
        let z = exponent('Z', &mut rest)?;
        if !rest.is_empty() || (x.is_none() && z.is_none()) {
            return Err(invalid());
        }
        Ok(Self::new(x.unwrap_or(0), z.unwrap_or(0)))
    }
}

impl fmt::Display for QuditOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X({})Z({})", self.x, self.z)
    }
}
