use std::sync::Arc;

use qldpc_core::errors::{ErrorInfo, QldpcError};
use qldpc_core::{FieldMatrix, GaloisField};

use crate::algebra::Element;
use crate::group::Group;

/// Matrix whose entries are elements of a group algebra F[G].
///
/// Lifting replaces every entry by its `|G| x |G|` regular representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Protograph {
    group: Arc<Group>,
    field: GaloisField,
    rows: usize,
    cols: usize,
    entries: Vec<Element>,
}

impl Protograph {
    /// Builds a protograph from rows of group-algebra elements sharing one group and field.
    pub fn new(
        group: &Arc<Group>,
        field: &GaloisField,
        rows: Vec<Vec<Element>>,
    ) -> Result<Self, QldpcError> {
        let num_rows = rows.len();
        let num_cols = rows.first().map(Vec::len).unwrap_or(0);
        let reference = Element::zero(group, field);
        let mut entries = Vec::with_capacity(num_rows * num_cols);
        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != num_cols {
                return Err(QldpcError::Group(
                    ErrorInfo::new("ragged-rows", "all protograph rows must have the same length")
                        .with_context("row", row_idx.to_string())
                        .with_context("expected", num_cols.to_string())
                        .with_context("found", row.len().to_string()),
                ));
            }
            for entry in row {
                reference.check_compatible(&entry)?;
                entries.push(entry);
            }
        }
        Ok(Self {
            group: Arc::clone(group),
            field: field.clone(),
            rows: num_rows,
            cols: num_cols,
            entries,
        })
    }

    /// Embeds a field matrix as a protograph over the trivial group.
    pub fn from_matrix(matrix: &FieldMatrix) -> Self {
        let group = Arc::new(Group::trivial());
        let field = matrix.field();
        let one = Element::one(&group, field);
        let entries = matrix
            .as_flat()
            .iter()
            .map(|&value| one.scale(value))
            .collect();
        Self {
            group,
            field: field.clone(),
            rows: matrix.rows(),
            cols: matrix.cols(),
            entries,
        }
    }

    /// Identity protograph of the given size.
    pub fn identity(group: &Arc<Group>, field: &GaloisField, size: usize) -> Self {
        let zero = Element::zero(group, field);
        let one = Element::one(group, field);
        let entries = (0..size * size)
            .map(|idx| if idx / size == idx % size { one.clone() } else { zero.clone() })
            .collect();
        Self {
            group: Arc::clone(group),
            field: field.clone(),
            rows: size,
            cols: size,
            entries,
        }
    }

    /// Group of the underlying algebra.
    pub fn group(&self) -> &Arc<Group> {
        &self.group
    }

    /// Field of the underlying algebra.
    pub fn field(&self) -> &GaloisField {
        &self.field
    }

    /// `(rows, cols)` pair.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Size of the blocks produced by lifting a single entry.
    pub fn lift_dim(&self) -> usize {
        self.group.order()
    }

    /// Entry at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> &Element {
        &self.entries[row * self.cols + col]
    }

    /// Transpose, taking the adjoint of every entry so that lifting commutes with transposition.
    pub fn transpose(&self) -> Self {
        let entries = (0..self.cols)
            .flat_map(|col| (0..self.rows).map(move |row| (row, col)))
            .map(|(row, col)| self.get(row, col).adjoint())
            .collect();
        Self {
            group: Arc::clone(&self.group),
            field: self.field.clone(),
            rows: self.cols,
            cols: self.rows,
            entries,
        }
    }

    /// Entrywise additive inverse.
    pub fn negated(&self) -> Self {
        Self {
            entries: self.entries.iter().map(Element::neg).collect(),
            ..self.clone()
        }
    }

    /// Kronecker product `self ⊗ other`, multiplying entries in the group algebra.
    pub fn kron(&self, other: &Self) -> Result<Self, QldpcError> {
        let rows = self.rows * other.rows;
        let cols = self.cols * other.cols;
        let mut entries = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                let lhs = self.get(row / other.rows, col / other.cols);
                let rhs = other.get(row % other.rows, col % other.cols);
                entries.push(lhs.mul(rhs)?);
            }
        }
        Ok(Self {
            group: Arc::clone(&self.group),
            field: self.field.clone(),
            rows,
            cols,
            entries,
        })
    }

    /// `self ⊗ I_size`.
    pub fn kron_identity(&self, size: usize) -> Self {
        let zero = Element::zero(&self.group, &self.field);
        let rows = self.rows * size;
        let cols = self.cols * size;
        let entries = (0..rows * cols)
            .map(|idx| {
                let (row, col) = (idx / cols, idx % cols);
                if row % size == col % size {
                    self.get(row / size, col / size).clone()
                } else {
                    zero.clone()
                }
            })
            .collect();
        Self {
            group: Arc::clone(&self.group),
            field: self.field.clone(),
            rows,
            cols,
            entries,
        }
    }

    /// `I_size ⊗ self`.
    pub fn identity_kron(&self, size: usize) -> Self {
        let zero = Element::zero(&self.group, &self.field);
        let rows = self.rows * size;
        let cols = self.cols * size;
        let entries = (0..rows * cols)
            .map(|idx| {
                let (row, col) = (idx / cols, idx % cols);
                if row / self.rows == col / self.cols {
                    self.get(row % self.rows, col % self.cols).clone()
                } else {
                    zero.clone()
                }
            })
            .collect();
        Self {
            group: Arc::clone(&self.group),
            field: self.field.clone(),
            rows,
            cols,
            entries,
        }
    }

    /// Block matrix obtained by lifting every entry.
    pub fn lift(&self) -> FieldMatrix {
        let dim = self.lift_dim();
        let mut matrix = FieldMatrix::zeros(&self.field, self.rows * dim, self.cols * dim);
        for row in 0..self.rows {
            for col in 0..self.cols {
                let entry = self.get(row, col);
                if !entry.is_zero() {
                    matrix.set_block(row * dim, col * dim, &entry.lift());
                }
            }
        }
        matrix
    }
}
