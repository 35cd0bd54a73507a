use qldpc_core::errors::{ErrorInfo, QldpcError};
use qldpc_core::{FieldMatrix, GaloisField};

/// Chain complex `C_n → … → C_1 → C_0` of vector spaces over a finite field.
///
/// Boundary operator `∂_k : C_k → C_{k-1}` is stored as a `dim C_{k-1} x dim C_k` matrix, and
/// consecutive operators compose to zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainComplex {
    field: GaloisField,
    ops: Vec<FieldMatrix>,
}

impl ChainComplex {
    /// Builds the complex from `[∂_1, ∂_2, …]`.
    pub fn new(ops: Vec<FieldMatrix>) -> Result<Self, QldpcError> {
        let Some(first) = ops.first() else {
            return Err(QldpcError::Code(ErrorInfo::new(
                "invalid-chain-complex",
                "a chain complex needs at least one boundary operator",
            )));
        };
        let field = first.field().clone();
        for (index, pair) in ops.windows(2).enumerate() {
            let (lower, upper) = (&pair[0], &pair[1]);
            if lower.field() != upper.field() {
                return Err(QldpcError::Code(
                    ErrorInfo::new("field-mismatch", "boundary operators are defined over different fields")
                        .with_context("degree", (index + 2).to_string()),
                ));
            }
            if lower.cols() != upper.rows() || !lower.matmul(upper)?.is_zero() {
                return Err(QldpcError::Code(
                    ErrorInfo::new("invalid-chain-complex", "consecutive boundary operators do not compose to zero")
                        .with_context("degree", (index + 2).to_string()),
                ));
            }
        }
        Ok(Self { field, ops })
    }

    /// Field of the complex.
    pub fn field(&self) -> &GaloisField {
        &self.field
    }

    /// Number of boundary operators.
    pub fn num_links(&self) -> usize {
        self.ops.len()
    }

    /// Boundary operators `[∂_1, ∂_2, …]`.
    pub fn ops(&self) -> &[FieldMatrix] {
        &self.ops
    }

    /// Dimension of `C_k`; zero outside the complex.
    pub fn dim(&self, degree: usize) -> usize {
        match degree {
            0 => self.ops[0].rows(),
            k if k <= self.ops.len() => self.ops[k - 1].cols(),
            _ => 0,
        }
    }

    /// Boundary operator `∂_k`; a zero map outside `1 ..= num_links`.
    pub fn op(&self, degree: usize) -> FieldMatrix {
        match degree {
            k if (1..=self.ops.len()).contains(&k) => self.ops[k - 1].clone(),
            k => FieldMatrix::zeros(&self.field, self.dim(k.saturating_sub(1)), self.dim(k)),
        }
    }

    /// Keeps only the first `num_links` boundary operators.
    pub fn truncate(mut self, num_links: usize) -> Self {
        self.ops.truncate(num_links.max(1));
        self
    }

    /// Tensor product with `∂(a ⊗ b) = ∂a ⊗ b + (-1)^i a ⊗ ∂b` for `a ∈ C_i`.
    ///
    /// `(C ⊗ D)_k` is the direct sum of `C_i ⊗ D_j` over `i + j = k`, ordered by increasing `i`.
    pub fn tensor_product(lhs: &Self, rhs: &Self) -> Result<Self, QldpcError> {
        if lhs.field != rhs.field {
            return Err(QldpcError::Code(
                ErrorInfo::new("field-mismatch", "chain complexes are defined over different fields")
                    .with_context("lhs", lhs.field.to_string())
                    .with_context("rhs", rhs.field.to_string()),
            ));
        }
        let field = &lhs.field;
        let (len_l, len_r) = (lhs.num_links(), rhs.num_links());
        let sectors = |degree: usize| -> Vec<(usize, usize)> {
            (0..=degree.min(len_l))
                .filter(|&i| degree - i <= len_r)
                .map(|i| (i, degree - i))
                .collect()
        };
        let offsets = |degree: usize| -> Vec<((usize, usize), usize)> {
            let mut offset = 0;
            sectors(degree)
                .into_iter()
                .map(|(i, j)| {
                    let start = offset;
                    offset += lhs.dim(i) * rhs.dim(j);
                    ((i, j), start)
                })
                .collect()
        };
        let dim = |degree: usize| -> usize {
            sectors(degree).into_iter().map(|(i, j)| lhs.dim(i) * rhs.dim(j)).sum()
        };

        let mut ops = Vec::with_capacity(len_l + len_r);
        for degree in 1..=len_l + len_r {
            let targets = offsets(degree - 1);
            let target_offset = |sector: (usize, usize)| {
                targets.iter().find(|(key, _)| *key == sector).map(|&(_, offset)| offset)
            };
            let mut op = FieldMatrix::zeros(field, dim(degree - 1), dim(degree));
            for ((i, j), col) in offsets(degree) {
                if i >= 1 {
                    if let Some(row) = target_offset((i - 1, j)) {
                        let block = lhs.op(i).kron(&FieldMatrix::identity(field, rhs.dim(j)))?;
                        op.set_block(row, col, &block);
                    }
                }
                if j >= 1 {
                    if let Some(row) = target_offset((i, j - 1)) {
                        let block = FieldMatrix::identity(field, lhs.dim(i)).kron(&rhs.op(j))?;
                        let block = if i % 2 == 1 { block.negated() } else { block };
                        op.set_block(row, col, &block);
                    }
                }
            }
            ops.push(op);
        }
        Ok(Self {
            field: field.clone(),
            ops,
        })
    }
}
