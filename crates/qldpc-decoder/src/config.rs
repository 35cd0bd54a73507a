use qldpc_core::errors::{ErrorInfo, QldpcError};
use qldpc_core::GaloisField;
use serde::{Deserialize, Serialize};

/// Options forwarded to a [`crate::Decoder`] with every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderOptions {
    /// Prime modulus for non-binary decoding.
    pub modulus: Option<u32>,
    /// Requests integer-linear-programming mode.
    pub with_ilp: bool,
    /// Syndrome row to treat as a lower bound rather than an equality.
    pub lower_bound_row: Option<usize>,
    /// Number of random information sets tried by the default decoder.
    pub information_sets: usize,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            modulus: None,
            with_ilp: false,
            lower_bound_row: None,
            information_sets: 16,
        }
    }
}

impl DecoderOptions {
    /// Default options patched for the given field; see [`DecoderOptions::patched_for_field`].
    pub fn for_field(field: &GaloisField, bound_row: Option<usize>) -> Result<Self, QldpcError> {
        Self::default().patched_for_field(field, bound_row)
    }

    /// Patches options for decoding over a field.
    ///
    /// Binary fields leave the options unchanged. Prime fields of larger order switch to
    /// integer-programming mode with the field modulus and mark `bound_row` as an inequality.
    /// Non-prime fields of larger order are rejected.
    pub fn patched_for_field(
        mut self,
        field: &GaloisField,
        bound_row: Option<usize>,
    ) -> Result<Self, QldpcError> {
        if field.order() == 2 {
            return Ok(self);
        }
        if !field.is_prime() {
            return Err(QldpcError::Decoder(
                ErrorInfo::new(
                    "nonprime-field",
                    "decoding over fields of order > 2 requires a prime field",
                )
                .with_context("field", field.to_string()),
            ));
        }
        self.with_ilp = true;
        self.modulus = Some(field.order());
        self.lower_bound_row = bound_row;
        Ok(self)
    }
}

/// Bound on the number of attempts made by a rejection-sampling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of attempts before the loop reports exhaustion.
    pub max_attempts: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 100 }
    }
}

/// Configuration held by a [`crate::DecodeSession`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Base decoder options, patched per call for the field in use.
    pub options: DecoderOptions,
    /// Retry bound for every rejection loop run by the session.
    pub retry: RetryPolicy,
}
