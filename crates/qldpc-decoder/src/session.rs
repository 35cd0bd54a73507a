use qldpc_core::errors::{ErrorInfo, QldpcError};
use qldpc_core::rng::{DECODER_SUBSTREAM, SESSION_SUBSTREAM};
use qldpc_core::{derive_substream_seed, FieldMatrix, GaloisField, RngHandle};
use tracing::{debug, trace};

use crate::config::{DecoderConfig, DecoderOptions};
use crate::isd::InformationSetDecoder;
use crate::Decoder;

/// Outcome of a bounded rejection-sampling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retry<T> {
    /// An attempt succeeded.
    Success(T),
    /// Every attempt was rejected.
    Exhausted {
        /// Number of attempts made.
        attempts: usize,
    },
}

impl<T> Retry<T> {
    /// The successful value, if any.
    pub fn success(self) -> Option<T> {
        match self {
            Retry::Success(value) => Some(value),
            Retry::Exhausted { .. } => None,
        }
    }

    /// Returns whether an attempt succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Retry::Success(_))
    }

    /// Maps the successful value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Retry<U> {
        match self {
            Retry::Success(value) => Retry::Success(f(value)),
            Retry::Exhausted { attempts } => Retry::Exhausted { attempts },
        }
    }
}

/// Decoder, configuration and randomness shared by the decode-based algorithms of a code.
pub struct DecodeSession {
    decoder: Box<dyn Decoder>,
    config: DecoderConfig,
    rng: RngHandle,
}

impl std::fmt::Debug for DecodeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodeSession")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DecodeSession {
    /// Session using the default [`InformationSetDecoder`]; the decoder and the session draw
    /// from separate substreams of `seed`.
    pub fn new(config: DecoderConfig, seed: u64) -> Self {
        let decoder = InformationSetDecoder::new(derive_substream_seed(seed, DECODER_SUBSTREAM));
        Self::with_decoder(Box::new(decoder), config, RngHandle::substream(seed, SESSION_SUBSTREAM))
    }

    /// Session with a caller-supplied decoder.
    pub fn with_decoder(decoder: Box<dyn Decoder>, config: DecoderConfig, rng: RngHandle) -> Self {
        Self {
            decoder,
            config,
            rng,
        }
    }

    /// Session configuration.
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Randomness for the sampling steps of the calling algorithm.
    pub fn rng(&mut self) -> &mut RngHandle {
        &mut self.rng
    }

    /// Base options patched for decoding over `field`.
    pub fn options_for(
        &self,
        field: &GaloisField,
        bound_row: Option<usize>,
    ) -> Result<DecoderOptions, QldpcError> {
        self.config.options.clone().patched_for_field(field, bound_row)
    }

    /// Forwards one call to the decoder without verification.
    pub fn decode(
        &mut self,
        matrix: &FieldMatrix,
        syndrome: &[u32],
        options: &DecoderOptions,
    ) -> Result<Vec<u32>, QldpcError> {
        let candidate = self.decoder.decode(matrix, syndrome, options)?;
        if candidate.len() != matrix.cols() {
            return Err(QldpcError::Decoder(
                ErrorInfo::new("solution-length-mismatch", "decoder returned a vector of the wrong length")
                    .with_context("expected", matrix.cols().to_string())
                    .with_context("found", candidate.len().to_string()),
            ));
        }
        Ok(candidate)
    }

    /// Decodes once and returns the candidate only if `matrix · x == syndrome` holds exactly.
    pub fn decode_exact(
        &mut self,
        matrix: &FieldMatrix,
        syndrome: &[u32],
        options: &DecoderOptions,
    ) -> Result<Option<Vec<u32>>, QldpcError> {
        let candidate = self.decode(matrix, syndrome, options)?;
        let actual = matrix.mul_vec(&candidate)?;
        if actual == syndrome {
            Ok(Some(candidate))
        } else {
            trace!(checks = matrix.rows(), "decoder_missed_syndrome");
            Ok(None)
        }
    }

    /// Runs `attempt` until it yields a value or the retry policy is exhausted.
    ///
    /// Errors returned by `attempt` abort the loop.
    pub fn retry<T>(
        &mut self,
        operation: &str,
        mut attempt: impl FnMut(&mut Self) -> Result<Option<T>, QldpcError>,
    ) -> Result<Retry<T>, QldpcError> {
        let max_attempts = self.config.retry.max_attempts;
        for attempt_idx in 1..=max_attempts {
            if let Some(value) = attempt(self)? {
                return Ok(Retry::Success(value));
            }
            debug!(operation, attempt = attempt_idx, max_attempts, "retry_rejected");
        }
        debug!(operation, max_attempts, "retry_exhausted");
        Ok(Retry::Exhausted {
            attempts: max_attempts,
        })
    }
}
