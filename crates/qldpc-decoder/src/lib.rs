#![deny(missing_docs)]
#![doc = "Decoder boundary for syndrome decoding over GF(q), with bounded retry sessions and a default information-set decoder."]

/// Decoder options, retry policy and session configuration.
pub mod config;
/// Information-set decoding.
pub mod isd;
/// Decoding sessions with verification and bounded retries.
pub mod session;

use qldpc_core::{FieldMatrix, QldpcError};

pub use config::{DecoderConfig, DecoderOptions, RetryPolicy};
pub use isd::InformationSetDecoder;
pub use session::{DecodeSession, Retry};

/// Maps a parity check matrix and a syndrome to a low-weight candidate solution.
///
/// A decoder may miss: callers verify `matrix · result == syndrome` before trusting the result.
pub trait Decoder {
    /// Attempts to find a low-weight `x` with `matrix · x = syndrome`.
    fn decode(
        &mut self,
        matrix: &FieldMatrix,
        syndrome: &[u32],
        options: &DecoderOptions,
    ) -> Result<Vec<u32>, QldpcError>;
}
