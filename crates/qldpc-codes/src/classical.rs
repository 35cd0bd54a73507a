use std::ops::Not;
use std::sync::OnceLock;

use qldpc_core::errors::{ErrorInfo, QldpcError};
use qldpc_core::{FieldMatrix, GaloisField, RngHandle};
use qldpc_decoder::{DecodeSession, Retry, RetryPolicy};
use qldpc_graph::ClassicalGraph;
use rand::Rng;
use tracing::{debug, warn};

use crate::abstract_code::{
    check_same_field, check_vector_length, hamming_weight, subtract, trivial_code_error,
    AbstractCode,
};

/// Classical linear code over GF(q), defined by a parity check matrix `H`.
///
/// A vector `x` is a code word iff `H · x = 0`. Derived quantities are computed on first use
/// and kept for the lifetime of the code.
#[derive(Debug, Clone)]
pub struct ClassicalCode {
    matrix: FieldMatrix,
    rank: OnceLock<usize>,
    generator: OnceLock<FieldMatrix>,
    exact_distance: OnceLock<usize>,
    graph: OnceLock<ClassicalGraph>,
}

impl PartialEq for ClassicalCode {
    fn eq(&self, other: &Self) -> bool {
        self.matrix == other.matrix
    }
}

impl Eq for ClassicalCode {}

impl ClassicalCode {
    /// Code with the given parity check matrix.
    pub fn new(matrix: FieldMatrix) -> Self {
        Self {
            matrix,
            rank: OnceLock::new(),
            generator: OnceLock::new(),
            exact_distance: OnceLock::new(),
            graph: OnceLock::new(),
        }
    }

    /// Code from integer rows over GF(`field_order`).
    pub fn from_rows<R: AsRef<[i64]>>(rows: &[R], field_order: u32) -> Result<Self, QldpcError> {
        let field = GaloisField::new(field_order)?;
        Ok(Self::new(FieldMatrix::from_rows(&field, rows)?))
    }

    /// Code whose words are the row span of `generator`.
    pub fn from_generator(generator: &FieldMatrix) -> Self {
        Self::new(generator.null_space())
    }

    /// Random code with the given shape, rejecting matrices with an all-zero row or column.
    ///
    /// Draws are bounded by the default [`RetryPolicy`].
    pub fn random(
        bits: usize,
        checks: usize,
        field: &GaloisField,
        rng: &mut RngHandle,
    ) -> Result<Self, QldpcError> {
        Self::random_with_policy(bits, checks, field, RetryPolicy::default(), rng)
    }

    /// [`ClassicalCode::random`] with an explicit bound on the number of draws.
    pub fn random_with_policy(
        bits: usize,
        checks: usize,
        field: &GaloisField,
        policy: RetryPolicy,
        rng: &mut RngHandle,
    ) -> Result<Self, QldpcError> {
        if bits == 0 || checks == 0 {
            return Err(QldpcError::Code(
                ErrorInfo::new("invalid-shape", "random codes need at least one bit and one check")
                    .with_context("bits", bits.to_string())
                    .with_context("checks", checks.to_string()),
            ));
        }
        for _ in 0..policy.max_attempts {
            let data = (0..bits * checks)
                .map(|_| rng.gen_range(0..field.order()))
                .collect();
            let matrix = FieldMatrix::from_flat(field, checks, bits, data)?;
            let empty_row = (0..checks).any(|row| matrix.row_weight(row) == 0);
            let empty_col = (0..bits).any(|col| matrix.column_weight(col) == 0);
            if !empty_row && !empty_col {
                return Ok(Self::new(matrix));
            }
        }
        debug!(bits, checks, max_attempts = policy.max_attempts, "random_code_exhausted");
        Err(QldpcError::Code(
            ErrorInfo::new("random-code-exhausted", "every draw had an all-zero row or column")
                .with_context("bits", bits.to_string())
                .with_context("checks", checks.to_string())
                .with_context("attempts", policy.max_attempts.to_string())
                .with_hint("raise RetryPolicy::max_attempts or use a larger field"),
        ))
    }

    /// Records a known minimum distance so that it is never recomputed.
    pub(crate) fn with_exact_distance(self, distance: usize) -> Self {
        let _ = self.exact_distance.set(distance);
        self
    }

    /// Number of bits.
    pub fn num_bits(&self) -> usize {
        self.matrix.cols()
    }

    /// Rank of the parity check matrix.
    pub fn rank(&self) -> usize {
        *self.rank.get_or_init(|| self.matrix.rank())
    }

    /// Number of logical bits, `num_bits - rank`.
    pub fn dimension(&self) -> usize {
        self.num_bits() - self.rank()
    }

    /// Generator matrix: a row-reduced basis of the code words.
    pub fn generator(&self) -> &FieldMatrix {
        self.generator.get_or_init(|| self.matrix.null_space())
    }

    /// Returns whether `word` is a code word.
    pub fn contains(&self, word: &[u32]) -> Result<bool, QldpcError> {
        check_vector_length(word, self.num_bits())?;
        Ok(self.matrix.mul_vec(word)?.iter().all(|&value| value == 0))
    }

    /// Returns whether every word of `other` is a word of this code.
    pub fn contains_code(&self, other: &Self) -> Result<bool, QldpcError> {
        check_same_field(self.field(), other.field(), "codes")?;
        if other.num_bits() != self.num_bits() {
            return Ok(false);
        }
        Ok(self.matrix.matmul(&other.generator().transpose())?.is_zero())
    }

    /// Returns whether two codes are defined over the same field and have the same words.
    pub fn equiv(code_a: &Self, code_b: &Self) -> bool {
        matches!(code_a.contains_code(code_b), Ok(true))
            && matches!(code_b.contains_code(code_a), Ok(true))
    }

    /// Iterator over all code words; the first word is zero.
    ///
    /// The number of words is `q^k`, so this is only practical for small codes.
    pub fn words(&self) -> Words<'_> {
        Words::new(self.generator())
    }

    /// Uniformly random code word.
    pub fn get_random_word(&self, rng: &mut RngHandle) -> Vec<u32> {
        let field = self.field();
        let mut word = vec![0; self.num_bits()];
        for row in self.generator().iter_rows() {
            let coefficient = rng.gen_range(0..field.order());
            for (entry, &value) in word.iter_mut().zip(row) {
                *entry = field.add(*entry, field.mul(coefficient, value));
            }
        }
        word
    }

    /// Dual code, whose parity checks are the generators of this code.
    pub fn dual(&self) -> Self {
        Self::new(self.generator().clone())
    }

    /// Tensor product code, whose words are the matrices with code words of `code_a` as columns
    /// and code words of `code_b` as rows.
    pub fn tensor_product(code_a: &Self, code_b: &Self) -> Result<Self, QldpcError> {
        check_same_field(code_a.field(), code_b.field(), "tensor product factors")?;
        let generator = code_a.generator().kron(code_b.generator())?;
        Ok(Self::from_generator(&generator))
    }

    /// Deletes the given bits from every code word.
    pub fn puncture(&self, bits: &[usize]) -> Result<Self, QldpcError> {
        let keep = self.complement_of(bits)?;
        Ok(Self::from_generator(&self.generator().select_columns(&keep)))
    }

    /// Restricts to the code words that vanish on the given bits, then deletes those bits.
    pub fn shorten(&self, bits: &[usize]) -> Result<Self, QldpcError> {
        let keep = self.complement_of(bits)?;
        Ok(Self::new(self.matrix.select_columns(&keep)))
    }

    fn complement_of(&self, bits: &[usize]) -> Result<Vec<usize>, QldpcError> {
        if let Some(&bit) = bits.iter().find(|&&bit| bit >= self.num_bits()) {
            return Err(QldpcError::Code(
                ErrorInfo::new("bit-out-of-range", "bit index exceeds the code length")
                    .with_context("bit", bit.to_string())
                    .with_context("num_bits", self.num_bits().to_string()),
            ));
        }
        Ok((0..self.num_bits()).filter(|bit| !bits.contains(bit)).collect())
    }

    /// Exact distance when `bound` is `None`, otherwise the best of `bound` randomized bounds.
    pub fn get_distance(
        &self,
        bound: Option<usize>,
        session: &mut DecodeSession,
    ) -> Result<usize, QldpcError> {
        match bound {
            None => self.get_distance_exact(None),
            Some(num_trials) => self.get_distance_bound(num_trials, None, session),
        }
    }

    /// Minimum weight of a nonzero code word by brute force.
    ///
    /// Given a vector, returns instead the minimum Hamming distance from the vector to a code
    /// word.
    pub fn get_distance_exact(&self, vector: Option<&[u32]>) -> Result<usize, QldpcError> {
        if let Some(vector) = vector {
            check_vector_length(vector, self.num_bits())?;
            let field = self.field();
            return Ok(self
                .words()
                .map(|word| hamming_weight(&subtract(field, &word, vector)))
                .min()
                .unwrap_or(0));
        }
        if let Some(&distance) = self.exact_distance.get() {
            return Ok(distance);
        }
        let distance = self
            .words()
            .skip(1)
            .map(|word| hamming_weight(&word))
            .min()
            .ok_or_else(|| trivial_code_error("distance"))?;
        debug!(num_bits = self.num_bits(), distance, "classical_distance_cached");
        Ok(*self.exact_distance.get_or_init(|| distance))
    }

    /// Minimum over `num_trials` randomized distance bounds.
    ///
    /// Fails with `distance-bound-exhausted` if no trial produced a bound.
    pub fn get_distance_bound(
        &self,
        num_trials: usize,
        vector: Option<&[u32]>,
        session: &mut DecodeSession,
    ) -> Result<usize, QldpcError> {
        let bounds = (0..num_trials)
            .map(|_| self.get_one_distance_bound(vector, session))
            .collect::<Result<Vec<_>, _>>()?;
        best_bound(bounds, "classical_distance_bound")
    }

    /// One randomized upper bound on the distance.
    ///
    /// A random nonzero word `r` is appended to the checks and the syndrome `[0, …, 0, 1]` is
    /// decoded, so any exact solution is a code word with `r · x = 1`. Given a vector, the
    /// syndrome `H · v` is decoded instead and the weight of the correction is returned.
    pub fn get_one_distance_bound(
        &self,
        vector: Option<&[u32]>,
        session: &mut DecodeSession,
    ) -> Result<Retry<usize>, QldpcError> {
        let field = self.field().clone();
        if let Some(vector) = vector {
            check_vector_length(vector, self.num_bits())?;
            let options = session.options_for(&field, None)?;
            let syndrome = self.matrix.mul_vec(vector)?;
            let correction = session.decode(&self.matrix, &syndrome, &options)?;
            return Ok(Retry::Success(hamming_weight(&correction)));
        }
        if self.dimension() == 0 {
            return Err(trivial_code_error("distance bound"));
        }

        let num_checks = self.num_checks();
        let options = session.options_for(&field, Some(num_checks))?;
        let mut syndrome = vec![0; num_checks + 1];
        syndrome[num_checks] = 1;
        session.retry("classical_distance_bound", |session| {
            let Some(random_word) = random_nonzero_vector(&field, self.num_bits(), session.rng())
            else {
                return Ok(None);
            };
            let constraint = FieldMatrix::row_vector(&field, &random_word);
            let matrix = FieldMatrix::vstack(&[&self.matrix, &constraint])?;
            let candidate = session.decode_exact(&matrix, &syndrome, &options)?;
            Ok(candidate.map(|word| hamming_weight(&word)))
        })
    }

    /// Exact distance or randomized bound, returned with `(n, k, d, w)`.
    pub fn get_code_params(
        &self,
        bound: Option<usize>,
        session: &mut DecodeSession,
    ) -> Result<(usize, usize, usize, usize), QldpcError> {
        let distance = self.get_distance(bound, session)?;
        Ok((self.num_bits(), self.dimension(), distance, self.get_weight()))
    }
}

impl AbstractCode for ClassicalCode {
    type Graph = ClassicalGraph;

    fn field(&self) -> &GaloisField {
        self.matrix.field()
    }

    fn matrix(&self) -> &FieldMatrix {
        &self.matrix
    }

    fn num_checks(&self) -> usize {
        self.matrix.rows()
    }

    fn num_data(&self) -> usize {
        self.num_bits()
    }

    fn graph(&self) -> Result<&ClassicalGraph, QldpcError> {
        Ok(self.graph.get_or_init(|| ClassicalGraph::from_matrix(&self.matrix)))
    }

    fn get_weight(&self) -> usize {
        (0..self.matrix.rows())
            .map(|row| self.matrix.row_weight(row))
            .max()
            .unwrap_or(0)
    }
}

impl Not for &ClassicalCode {
    type Output = ClassicalCode;

    fn not(self) -> ClassicalCode {
        self.dual()
    }
}

impl Not for ClassicalCode {
    type Output = ClassicalCode;

    fn not(self) -> ClassicalCode {
        self.dual()
    }
}

/// Uniformly random vector, or `None` when the draw is zero; callers retry under their policy.
pub(crate) fn random_nonzero_vector(
    field: &GaloisField,
    size: usize,
    rng: &mut RngHandle,
) -> Option<Vec<u32>> {
    let vector: Vec<u32> = (0..size).map(|_| rng.gen_range(0..field.order())).collect();
    vector.iter().any(|&value| value != 0).then_some(vector)
}

/// Smallest successful bound, or `distance-bound-exhausted` when every trial ran out of attempts.
pub(crate) fn best_bound(
    bounds: impl IntoIterator<Item = Retry<usize>>,
    operation: &str,
) -> Result<usize, QldpcError> {
    let mut trials = 0;
    let mut best = None;
    for bound in bounds {
        trials += 1;
        if let Retry::Success(bound) = bound {
            best = Some(best.map_or(bound, |current: usize| current.min(bound)));
        }
    }
    best.ok_or_else(|| {
        warn!(operation, trials, "distance_bound_exhausted");
        QldpcError::Decoder(
            ErrorInfo::new("distance-bound-exhausted", "no trial produced a distance bound")
                .with_context("operation", operation)
                .with_context("trials", trials.to_string())
                .with_hint("raise the number of trials or RetryPolicy::max_attempts"),
        )
    })
}

/// Lazy enumeration of every linear combination of generator rows.
///
/// Coefficient vectors are visited in lexicographic order with the first coefficient most
/// significant, starting from the zero word.
#[derive(Debug, Clone)]
pub struct Words<'a> {
    generator: &'a FieldMatrix,
    coefficients: Vec<u32>,
    done: bool,
}

impl<'a> Words<'a> {
    fn new(generator: &'a FieldMatrix) -> Self {
        Self {
            generator,
            coefficients: vec![0; generator.rows()],
            done: false,
        }
    }

    fn advance(&mut self) {
        let order = self.generator.field().order();
        for coefficient in self.coefficients.iter_mut().rev() {
            *coefficient += 1;
            if *coefficient < order {
                return;
            }
            *coefficient = 0;
        }
        self.done = true;
    }
}

impl Iterator for Words<'_> {
    type Item = Vec<u32>;

    fn next(&mut self) -> Option<Vec<u32>> {
        if self.done {
            return None;
        }
        let field = self.generator.field();
        let mut word = vec![0; self.generator.cols()];
        for (row, &coefficient) in self.generator.iter_rows().zip(&self.coefficients) {
            if coefficient == 0 {
                continue;
            }
            for (entry, &value) in word.iter_mut().zip(row) {
                *entry = field.add(*entry, field.mul(coefficient, value));
            }
        }
        self.advance();
        Some(word)
    }
}
