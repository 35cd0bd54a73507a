use qldpc_core::errors::{ErrorInfo, QldpcError};
use qldpc_core::{FieldMatrix, RngHandle};
use rand::seq::SliceRandom;
use tracing::trace;

use crate::config::DecoderOptions;
use crate::Decoder;

/// Randomized information-set decoder.
///
/// Each trial permutes the columns at random, solves the system by Gaussian elimination with
/// the free variables set to zero, and keeps the lightest solution found. Inconsistent systems
/// yield the zero vector, which callers reject on verification.
#[derive(Debug, Clone)]
pub struct InformationSetDecoder {
    rng: RngHandle,
}

impl InformationSetDecoder {
    /// Creates a decoder with its own deterministic randomness.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: RngHandle::from_seed(seed),
        }
    }

    fn solve_permuted(
        matrix: &FieldMatrix,
        syndrome: &FieldMatrix,
        columns: &[usize],
    ) -> Result<Option<Vec<u32>>, QldpcError> {
        let permuted = matrix.select_columns(columns);
        let augmented = FieldMatrix::hstack(&[&permuted, syndrome])?;
        let num_cols = matrix.cols();
        let echelon = augmented.row_reduce_limited(Some(num_cols));
        let consistent = (echelon.rank()..augmented.rows())
            .all(|row| echelon.matrix.get(row, num_cols) == 0);
        if !consistent {
            return Ok(None);
        }
        let mut solution = vec![0; num_cols];
        for (row, &pivot) in echelon.pivots.iter().enumerate() {
            solution[columns[pivot]] = echelon.matrix.get(row, num_cols);
        }
        Ok(Some(solution))
    }
}

impl Decoder for InformationSetDecoder {
    fn decode(
        &mut self,
        matrix: &FieldMatrix,
        syndrome: &[u32],
        options: &DecoderOptions,
    ) -> Result<Vec<u32>, QldpcError> {
        if syndrome.len() != matrix.rows() {
            return Err(QldpcError::Decoder(
                ErrorInfo::new("syndrome-length-mismatch", "syndrome length must equal the number of checks")
                    .with_context("checks", matrix.rows().to_string())
                    .with_context("syndrome", syndrome.len().to_string()),
            ));
        }
        if let Some(modulus) = options.modulus {
            if modulus != matrix.field().order() {
                return Err(QldpcError::Decoder(
                    ErrorInfo::new("modulus-mismatch", "decoder modulus differs from the field order")
                        .with_context("modulus", modulus.to_string())
                        .with_context("field", matrix.field().to_string()),
                ));
            }
        }

        let syndrome_column = FieldMatrix::row_vector(matrix.field(), syndrome).transpose();
        let mut columns: Vec<usize> = (0..matrix.cols()).collect();
        let mut best: Option<Vec<u32>> = None;
        for trial in 0..options.information_sets.max(1) {
            columns.shuffle(self.rng.inner_mut());
            let Some(candidate) = Self::solve_permuted(matrix, &syndrome_column, &columns)? else {
                trace!(trial, "isd_inconsistent_system");
                return Ok(vec![0; matrix.cols()]);
            };
            let weight = candidate.iter().filter(|&&value| value != 0).count();
            let best_weight = best
                .as_ref()
                .map(|current| current.iter().filter(|&&value| value != 0).count());
            if best_weight.map_or(true, |current| weight < current) {
                trace!(trial, weight, "isd_improved_solution");
                best = Some(candidate);
            }
        }
        Ok(best.unwrap_or_else(|| vec![0; matrix.cols()]))
    }
}
