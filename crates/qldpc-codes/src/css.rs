use std::sync::OnceLock;

use qldpc_core::errors::{ErrorInfo, QldpcError};
use qldpc_core::{FieldMatrix, GaloisField, Pauli, RngHandle};
use qldpc_decoder::{DecodeSession, Retry};
use qldpc_graph::QuditGraph;
use rand::Rng;
use tracing::debug;

use crate::abstract_code::{
    check_same_field, check_vector_length, hamming_weight, subtract, trivial_code_error,
    AbstractCode,
};
use crate::classical::{best_bound, ClassicalCode};
use crate::qudit::{check_qudits, conjugate_in_place, QuditCode};

/// Basis of logical operators: row `k` of each type is one operator on all qudits.
///
/// X-type operator `k` anti-commutes with Z-type operator `k` and commutes with every other
/// logical operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalOps {
    x: FieldMatrix,
    z: FieldMatrix,
}

impl LogicalOps {
    /// Operators of one type, as a `dimension x num_qudits` matrix.
    pub fn get(&self, pauli: Pauli) -> &FieldMatrix {
        match pauli {
            Pauli::X => &self.x,
            Pauli::Z => &self.z,
        }
    }

    /// Number of logical qudits.
    pub fn dimension(&self) -> usize {
        self.x.rows()
    }

    fn get_mut(&mut self, pauli: Pauli) -> &mut FieldMatrix {
        match pauli {
            Pauli::X => &mut self.x,
            Pauli::Z => &mut self.z,
        }
    }
}

/// CSS code with separate X-type checks `H_x` and Z-type checks `H_z`.
///
/// `code_x` has parity checks `H_x` and witnesses Z-type errors; `code_z` has parity checks
/// `H_z` and witnesses X-type errors. The checks commute iff `H_x · H_zᵗ = 0`.
#[derive(Debug, Clone)]
pub struct CSSCode {
    code_x: ClassicalCode,
    code_z: ClassicalCode,
    conjugate: Vec<usize>,
    matrix: OnceLock<FieldMatrix>,
    graph: OnceLock<QuditGraph>,
    logical_ops: OnceLock<LogicalOps>,
    exact_distance_x: OnceLock<usize>,
    exact_distance_z: OnceLock<usize>,
}

impl CSSCode {
    /// Builds a CSS code, verifying that the X-type and Z-type checks commute.
    ///
    /// Qudits listed in `conjugate` are Fourier-transformed in the overall parity check matrix.
    pub fn new(
        code_x: ClassicalCode,
        code_z: ClassicalCode,
        conjugate: Vec<usize>,
    ) -> Result<Self, QldpcError> {
        let code = Self::new_unchecked(code_x, code_z, conjugate)?;
        if !code.is_valid() {
            return Err(QldpcError::Code(
                ErrorInfo::new("css-incompatible", "X-type and Z-type checks do not commute")
                    .with_context("num_checks_x", code.num_checks_x().to_string())
                    .with_context("num_checks_z", code.num_checks_z().to_string())
                    .with_hint("matrix_x · matrix_zᵗ must vanish"),
            ));
        }
        Ok(code)
    }

    /// Builds a CSS code from its two check matrices.
    pub fn from_matrices(matrix_x: FieldMatrix, matrix_z: FieldMatrix) -> Result<Self, QldpcError> {
        Self::new(ClassicalCode::new(matrix_x), ClassicalCode::new(matrix_z), Vec::new())
    }

    /// Builds a CSS code whose checks commute by construction, skipping the product check.
    pub(crate) fn new_unchecked(
        code_x: ClassicalCode,
        code_z: ClassicalCode,
        conjugate: Vec<usize>,
    ) -> Result<Self, QldpcError> {
        check_same_field(code_x.field(), code_z.field(), "CSS subcodes")?;
        if code_x.num_bits() != code_z.num_bits() {
            return Err(QldpcError::Code(
                ErrorInfo::new("css-incompatible", "CSS subcodes have different lengths")
                    .with_context("bits_x", code_x.num_bits().to_string())
                    .with_context("bits_z", code_z.num_bits().to_string()),
            ));
        }
        check_qudits(&conjugate, code_x.num_bits())?;
        Ok(Self {
            code_x,
            code_z,
            conjugate,
            matrix: OnceLock::new(),
            graph: OnceLock::new(),
            logical_ops: OnceLock::new(),
            exact_distance_x: OnceLock::new(),
            exact_distance_z: OnceLock::new(),
        })
    }

    /// Records a known exact distance for one operator type.
    pub(crate) fn with_exact_distance(self, pauli: Pauli, distance: usize) -> Self {
        let _ = self.exact_distance_cell(pauli).set(distance);
        self
    }

    fn exact_distance_cell(&self, pauli: Pauli) -> &OnceLock<usize> {
        match pauli {
            Pauli::X => &self.exact_distance_x,
            Pauli::Z => &self.exact_distance_z,
        }
    }

    /// Returns whether the subcodes have equal lengths and their checks commute.
    pub fn is_valid(&self) -> bool {
        self.code_x.num_bits() == self.code_z.num_bits()
            && self
                .matrix_x()
                .matmul(&self.matrix_z().transpose())
                .map(|product| product.is_zero())
                .unwrap_or(false)
    }

    /// Subcode with parity checks `H_x`.
    pub fn code_x(&self) -> &ClassicalCode {
        &self.code_x
    }

    /// Subcode with parity checks `H_z`.
    pub fn code_z(&self) -> &ClassicalCode {
        &self.code_z
    }

    /// X-type parity checks.
    pub fn matrix_x(&self) -> &FieldMatrix {
        self.code_x.matrix()
    }

    /// Z-type parity checks.
    pub fn matrix_z(&self) -> &FieldMatrix {
        self.code_z.matrix()
    }

    /// Qudits whose X-type and Z-type entries are exchanged in the overall matrix.
    pub fn conjugated_qudits(&self) -> &[usize] {
        &self.conjugate
    }

    /// Number of X-type checks.
    pub fn num_checks_x(&self) -> usize {
        self.code_x.num_checks()
    }

    /// Number of Z-type checks.
    pub fn num_checks_z(&self) -> usize {
        self.code_z.num_checks()
    }

    /// Number of data qudits.
    pub fn num_qudits(&self) -> usize {
        self.code_x.num_bits()
    }

    /// Number of logical qudits.
    pub fn dimension(&self) -> usize {
        (self.code_x.dimension() + self.code_z.dimension()).saturating_sub(self.num_qudits())
    }

    /// View as a general qudit code with the same overall parity check matrix.
    pub fn to_qudit_code(&self) -> QuditCode {
        QuditCode::from_even_matrix(self.matrix().clone())
    }

    /// Subcode whose words are the `pauli`-type operators with a trivial syndrome.
    fn kernel_code(&self, pauli: Pauli) -> &ClassicalCode {
        match pauli {
            Pauli::X => &self.code_z,
            Pauli::Z => &self.code_x,
        }
    }

    /// Subcode whose checks are the `pauli`-type stabilizers.
    fn stabilizer_code(&self, pauli: Pauli) -> &ClassicalCode {
        match pauli {
            Pauli::X => &self.code_x,
            Pauli::Z => &self.code_z,
        }
    }

    /// Minimum weight of a nontrivial logical operator, or of a `pauli`-type one when given.
    ///
    /// Computed exactly when `bound` is `None`, otherwise bounded from above with `bound`
    /// randomized trials.
    pub fn get_distance(
        &self,
        pauli: Option<Pauli>,
        bound: Option<usize>,
        session: &mut DecodeSession,
    ) -> Result<usize, QldpcError> {
        match bound {
            None => self.get_distance_exact(pauli, None),
            Some(num_trials) => self.get_distance_bound(pauli, num_trials, None, session),
        }
    }

    /// Exact distance by enumerating the words of the opposite subcode.
    ///
    /// Given a vector, returns instead its minimum Hamming distance to a (possibly trivial)
    /// logical operator of the requested type.
    #[tracing::instrument(skip_all, fields(pauli = ?pauli, num_qudits = self.num_qudits()))]
    pub fn get_distance_exact(
        &self,
        pauli: Option<Pauli>,
        vector: Option<&[u32]>,
    ) -> Result<usize, QldpcError> {
        let Some(pauli) = pauli else {
            let distance_x = self.get_distance_exact(Some(Pauli::X), vector)?;
            let distance_z = self.get_distance_exact(Some(Pauli::Z), vector)?;
            return Ok(distance_x.min(distance_z));
        };
        let kernel = self.kernel_code(pauli);
        if let Some(vector) = vector {
            check_vector_length(vector, self.num_qudits())?;
            let field = self.field();
            return Ok(kernel
                .words()
                .map(|word| hamming_weight(&subtract(field, &word, vector)))
                .min()
                .unwrap_or(0));
        }

        let cell = self.exact_distance_cell(pauli);
        if let Some(&distance) = cell.get() {
            return Ok(distance);
        }
        if self.dimension() == 0 {
            return Err(trivial_code_error("distance"));
        }
        // words in the row span of the same-type checks are stabilizers
        let stabilizer_dual = self.stabilizer_code(pauli).generator();
        let mut distance = None;
        for word in kernel.words().skip(1) {
            let weight = hamming_weight(&word);
            if distance.is_some_and(|best| weight >= best) {
                continue;
            }
            if stabilizer_dual.mul_vec(&word)?.iter().any(|&value| value != 0) {
                distance = Some(weight);
            }
        }
        let distance = distance.ok_or_else(|| trivial_code_error("distance"))?;
        debug!(%pauli, distance, "css_distance_cached");
        Ok(*cell.get_or_init(|| distance))
    }

    /// Minimum over `num_trials` randomized bounds.
    ///
    /// Fails with `distance-bound-exhausted` if no trial produced a bound.
    #[tracing::instrument(skip_all, fields(pauli = ?pauli, num_trials))]
    pub fn get_distance_bound(
        &self,
        pauli: Option<Pauli>,
        num_trials: usize,
        vector: Option<&[u32]>,
        session: &mut DecodeSession,
    ) -> Result<usize, QldpcError> {
        let bounds = (0..num_trials)
            .map(|_| self.get_one_distance_bound(pauli, vector, session))
            .collect::<Result<Vec<_>, _>>()?;
        best_bound(bounds, "css_distance_bound")
    }

    /// One randomized upper bound on the distance of a nontrivial `pauli`-type operator.
    ///
    /// For X-type operators, a random nontrivial Z-type logical operator `w_z` is drawn and
    /// `[H_z; w_zᵗ] · w_x = [0, …, 0, 1]` is decoded. An exact solution is a nontrivial X-type
    /// logical operator, and its weight is the bound. Without `pauli`, the type is chosen at
    /// random. Given a vector, the syndrome it induces is decoded instead.
    pub fn get_one_distance_bound(
        &self,
        pauli: Option<Pauli>,
        vector: Option<&[u32]>,
        session: &mut DecodeSession,
    ) -> Result<Retry<usize>, QldpcError> {
        let pauli = match pauli {
            Some(pauli) => pauli,
            None if session.rng().gen_bool(0.5) => Pauli::X,
            None => Pauli::Z,
        };
        let field = self.field().clone();
        let checks = self.kernel_code(pauli).matrix();
        if let Some(vector) = vector {
            check_vector_length(vector, self.num_qudits())?;
            let options = session.options_for(&field, None)?;
            let syndrome = checks.mul_vec(vector)?;
            let correction = session.decode(checks, &syndrome, &options)?;
            return Ok(Retry::Success(hamming_weight(&correction)));
        }
        if self.dimension() == 0 {
            return Err(trivial_code_error("distance bound"));
        }

        let num_checks = checks.rows();
        let options = session.options_for(&field, Some(num_checks))?;
        let mut syndrome = vec![0; num_checks + 1];
        syndrome[num_checks] = 1;
        session.retry("css_distance_bound", |session| {
            let Some(dual_op) = self.draw_nontrivial_logical_op(pauli.flip(), session.rng())
            else {
                return Ok(None);
            };
            let constraint = FieldMatrix::row_vector(&field, &dual_op);
            let matrix = FieldMatrix::vstack(&[checks, &constraint])?;
            let candidate = session.decode_exact(&matrix, &syndrome, &options)?;
            Ok(candidate.map(|op| hamming_weight(&op)))
        })
    }

    /// Random `pauli`-type operator with a trivial syndrome.
    ///
    /// With `ensure_nontrivial`, draws are repeated until the operator anti-commutes with a
    /// random operator of the opposite type, which excludes stabilizers.
    pub fn get_random_logical_op(
        &self,
        pauli: Pauli,
        ensure_nontrivial: bool,
        session: &mut DecodeSession,
    ) -> Result<Retry<Vec<u32>>, QldpcError> {
        if !ensure_nontrivial {
            let op = self.kernel_code(pauli).get_random_word(session.rng());
            return Ok(Retry::Success(op));
        }
        if self.dimension() == 0 {
            return Err(trivial_code_error("nontrivial logical operator"));
        }
        session.retry("random_logical_op", |session| {
            Ok(self.draw_nontrivial_logical_op(pauli, session.rng()))
        })
    }

    fn draw_nontrivial_logical_op(&self, pauli: Pauli, rng: &mut RngHandle) -> Option<Vec<u32>> {
        let op = self.kernel_code(pauli).get_random_word(rng);
        let dual_op = self.kernel_code(pauli.flip()).get_random_word(rng);
        (self.field().dot(&op, &dual_op) != 0).then_some(op)
    }

    /// Basis of logical operators, computed once.
    ///
    /// The Z-type checks are row-reduced and their pivot columns moved to the back, then the
    /// X-type checks likewise. The leading `dimension` columns then index the logical qudits.
    /// Operator `k` of either type is the unit vector on logical column `k`, completed on the
    /// pivot columns of its own type so that it has a trivial syndrome.
    #[tracing::instrument(skip_all, fields(num_qudits = self.num_qudits()))]
    pub fn get_logical_ops(&self) -> &LogicalOps {
        self.logical_ops.get_or_init(|| {
            let ops = self.compute_logical_ops();
            debug!(dimension = ops.dimension(), "logical_ops_cached");
            ops
        })
    }

    fn compute_logical_ops(&self) -> LogicalOps {
        let num_qudits = self.num_qudits();
        let field = self.field();

        // X-type errors are witnessed by the Z-type checks, and vice versa
        let echelon_x = self.matrix_z().row_reduce();
        let order_x = pivots_to_back(num_qudits, &echelon_x.pivots);
        let checks_x = echelon_x.matrix.select_columns(&order_x);
        let checks_z = self.matrix_x().select_columns(&order_x);

        let echelon_z = checks_z.row_reduce();
        let order_z = pivots_to_back(num_qudits, &echelon_z.pivots);
        let checks_x = checks_x.select_columns(&order_z);
        let checks_z = echelon_z.matrix.select_columns(&order_z);
        let locations: Vec<usize> = order_z.iter().map(|&col| order_x[col]).collect();

        let rank_x = echelon_x.rank();
        let rank_z = echelon_z.rank();
        let dimension = self.dimension();
        assert_eq!(
            dimension + rank_x + rank_z,
            num_qudits,
            "logical operator pivots do not account for every qudit"
        );
        if let Some(&last) = echelon_z.pivots.last() {
            assert!(last < num_qudits - rank_x, "Z-type pivots overlap the X-type pivot block");
        }

        let identity = FieldMatrix::identity(field, dimension);
        let mut ops_x = FieldMatrix::zeros(field, dimension, num_qudits);
        ops_x.set_block(0, 0, &identity);
        ops_x.set_block(
            0,
            dimension,
            &checks_x.submatrix(0, 0, rank_x, dimension).transpose().negated(),
        );
        let mut ops_z = FieldMatrix::zeros(field, dimension, num_qudits);
        ops_z.set_block(0, 0, &identity);
        ops_z.set_block(
            0,
            num_qudits - rank_z,
            &checks_z.submatrix(0, 0, rank_z, dimension).transpose().negated(),
        );

        // column j of the reordered operators acts on qudit locations[j]
        let mut inverse = vec![0; num_qudits];
        for (col, &qudit) in locations.iter().enumerate() {
            inverse[qudit] = col;
        }
        LogicalOps {
            x: ops_x.select_columns(&inverse),
            z: ops_z.select_columns(&inverse),
        }
    }

    /// Replaces logical operator `index` of type `pauli` by a low-weight equivalent.
    ///
    /// The new operator has a trivial syndrome, commutes with every opposite-type logical
    /// operator except operator `index`, and anti-commutes with that one. Returns the weight of
    /// the new operator, or exhaustion if the decoder never produced an exact solution, in which
    /// case the basis is unchanged.
    #[tracing::instrument(skip_all, fields(%pauli, index))]
    pub fn reduce_logical_op(
        &mut self,
        pauli: Pauli,
        index: usize,
        session: &mut DecodeSession,
    ) -> Result<Retry<usize>, QldpcError> {
        let dimension = self.dimension();
        if index >= dimension {
            return Err(QldpcError::Code(
                ErrorInfo::new("logical-index-out-of-range", "no logical operator with this index")
                    .with_context("index", index.to_string())
                    .with_context("dimension", dimension.to_string()),
            ));
        }
        let field = self.field().clone();
        let checks = self.kernel_code(pauli).matrix();
        let dual_ops = self.get_logical_ops().get(pauli.flip());
        let matrix = FieldMatrix::vstack(&[checks, dual_ops])?;
        let target = checks.rows() + index;
        let mut syndrome = vec![0; matrix.rows()];
        syndrome[target] = 1;

        let options = session.options_for(&field, Some(target))?;
        let outcome = session.retry("reduce_logical_op", |session| {
            session.decode_exact(&matrix, &syndrome, &options)
        })?;
        if let (Retry::Success(op), Some(ops)) = (&outcome, self.logical_ops.get_mut()) {
            ops.get_mut(pauli).row_mut(index).copy_from_slice(op);
        }
        Ok(outcome.map(|op| hamming_weight(&op)))
    }

    /// Reduces every logical operator of the given type, or of both types without one.
    ///
    /// Returns the number of operators that were replaced.
    pub fn reduce_logical_ops(
        &mut self,
        pauli: Option<Pauli>,
        session: &mut DecodeSession,
    ) -> Result<usize, QldpcError> {
        let paulis = match pauli {
            Some(pauli) => vec![pauli],
            None => Pauli::both().to_vec(),
        };
        let mut reduced = 0;
        for pauli in paulis {
            for index in 0..self.dimension() {
                if self.reduce_logical_op(pauli, index, session)?.is_success() {
                    reduced += 1;
                }
            }
        }
        Ok(reduced)
    }

    /// Exact distance or randomized bound, returned with `(n, k, d, w)`.
    pub fn get_code_params(
        &self,
        bound: Option<usize>,
        session: &mut DecodeSession,
    ) -> Result<(usize, usize, usize, usize), QldpcError> {
        let distance = self.get_distance(None, bound, session)?;
        Ok((self.num_qudits(), self.dimension(), distance, self.get_weight()))
    }
}

/// Column order that keeps the non-pivot columns first and moves the pivots to the back.
fn pivots_to_back(num_cols: usize, pivots: &[usize]) -> Vec<usize> {
    let mut is_pivot = vec![false; num_cols];
    for &pivot in pivots {
        is_pivot[pivot] = true;
    }
    (0..num_cols)
        .filter(|&col| !is_pivot[col])
        .chain(pivots.iter().copied())
        .collect()
}

impl AbstractCode for CSSCode {
    type Graph = QuditGraph;

    fn field(&self) -> &GaloisField {
        self.code_x.field()
    }

    /// Overall matrix `[[0, H_z], [H_x, 0]]` over the blocks `[X | Z]`, Z-type checks first,
    /// with the conjugated qudits transformed.
    fn matrix(&self) -> &FieldMatrix {
        self.matrix.get_or_init(|| {
            let num_qudits = self.num_qudits();
            let mut matrix = FieldMatrix::zeros(
                self.field(),
                self.num_checks_z() + self.num_checks_x(),
                2 * num_qudits,
            );
            matrix.set_block(0, num_qudits, self.matrix_z());
            matrix.set_block(self.num_checks_z(), 0, self.matrix_x());
            conjugate_in_place(&mut matrix, &self.conjugate);
            matrix
        })
    }

    fn num_checks(&self) -> usize {
        self.num_checks_x() + self.num_checks_z()
    }

    fn num_data(&self) -> usize {
        self.num_qudits()
    }

    fn graph(&self) -> Result<&QuditGraph, QldpcError> {
        if let Some(graph) = self.graph.get() {
            return Ok(graph);
        }
        let graph = QuditGraph::from_matrix(self.matrix())?;
        Ok(self.graph.get_or_init(|| graph))
    }

    fn get_weight(&self) -> usize {
        self.code_x.get_weight().max(self.code_z.get_weight())
    }
}
