//! Dense matrices over a [`GaloisField`].

use std::fmt;

use crate::errors::{ErrorInfo, QldpcError};
use crate::field::GaloisField;

/// Dense row-major matrix whose entries live in a finite field.
#[derive(Clone, PartialEq, Eq)]
pub struct FieldMatrix {
    field: GaloisField,
    rows: usize,
    cols: usize,
    data: Vec<u32>,
}

/// Reduced row echelon form of a matrix together with its pivot columns.
///
/// Pivot `i` is the leading column of row `i`; rows past `pivots.len()` are zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowEchelon {
    /// Matrix in reduced row echelon form, with zero rows kept at the bottom.
    pub matrix: FieldMatrix,
    /// Leading column of every nonzero row, in increasing order.
    pub pivots: Vec<usize>,
}

impl RowEchelon {
    /// Rank of the reduced matrix.
    pub fn rank(&self) -> usize {
        self.pivots.len()
    }

    /// Nonzero rows of the reduced matrix.
    pub fn nonzero_rows(&self) -> FieldMatrix {
        self.matrix.select_rows(&(0..self.rank()).collect::<Vec<_>>())
    }
}

fn shape_mismatch(operation: &str, lhs: (usize, usize), rhs: (usize, usize)) -> QldpcError {
    QldpcError::Matrix(
        ErrorInfo::new("shape-mismatch", format!("incompatible shapes for {operation}"))
            .with_context("lhs", format!("{}x{}", lhs.0, lhs.1))
            .with_context("rhs", format!("{}x{}", rhs.0, rhs.1)),
    )
}

fn field_mismatch(lhs: &GaloisField, rhs: &GaloisField) -> QldpcError {
    QldpcError::Matrix(
        ErrorInfo::new("field-mismatch", "matrices are defined over different fields")
            .with_context("lhs", lhs.to_string())
            .with_context("rhs", rhs.to_string()),
    )
}

impl FieldMatrix {
    /// All-zero matrix of the given shape.
    pub fn zeros(field: &GaloisField, rows: usize, cols: usize) -> Self {
        Self {
            field: field.clone(),
            rows,
            cols,
            data: vec![0; rows * cols],
        }
    }

    /// Identity matrix of the given size.
    pub fn identity(field: &GaloisField, size: usize) -> Self {
        let mut matrix = Self::zeros(field, size, size);
        for idx in 0..size {
            matrix.set(idx, idx, 1);
        }
        matrix
    }

    /// Builds a matrix from a flat row-major buffer of field elements.
    pub fn from_flat(
        field: &GaloisField,
        rows: usize,
        cols: usize,
        data: Vec<u32>,
    ) -> Result<Self, QldpcError> {
        if data.len() != rows * cols {
            return Err(QldpcError::Matrix(
                ErrorInfo::new("shape-mismatch", "buffer length does not match shape")
                    .with_context("rows", rows.to_string())
                    .with_context("cols", cols.to_string())
                    .with_context("len", data.len().to_string()),
            ));
        }
        if let Some(&bad) = data.iter().find(|&&value| value >= field.order()) {
            return Err(QldpcError::Matrix(
                ErrorInfo::new("element-out-of-range", "entry is not a field element")
                    .with_context("value", bad.to_string())
                    .with_context("field", field.to_string()),
            ));
        }
        Ok(Self {
            field: field.clone(),
            rows,
            cols,
            data,
        })
    }

    /// Builds a matrix from integer rows, converting each entry into the field.
    ///
    /// An empty slice yields a `0 x 0` matrix.
    pub fn from_rows<R: AsRef<[i64]>>(field: &GaloisField, rows: &[R]) -> Result<Self, QldpcError> {
        let cols = rows.first().map(|row| row.as_ref().len()).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (idx, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(QldpcError::Matrix(
                    ErrorInfo::new("ragged-rows", "all rows must have the same length")
                        .with_context("row", idx.to_string())
                        .with_context("expected", cols.to_string())
                        .with_context("found", row.len().to_string()),
                ));
            }
            for &value in row {
                data.push(field.element(value)?);
            }
        }
        Ok(Self {
            field: field.clone(),
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Single-row matrix holding the given vector.
    pub fn row_vector(field: &GaloisField, vector: &[u32]) -> Self {
        Self {
            field: field.clone(),
            rows: 1,
            cols: vector.len(),
            data: vector.to_vec(),
        }
    }

    /// Field over which the matrix is defined.
    pub fn field(&self) -> &GaloisField {
        &self.field
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)` pair.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Entry at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.data[row * self.cols + col]
    }

    /// Overwrites the entry at `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, value: u32) {
        self.data[row * self.cols + col] = value;
    }

    /// Slice view of a row.
    pub fn row(&self, row: usize) -> &[u32] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Mutable slice view of a row.
    pub fn row_mut(&mut self, row: usize) -> &mut [u32] {
        let cols = self.cols;
        &mut self.data[row * cols..(row + 1) * cols]
    }

    /// Owned copy of a column.
    pub fn column(&self, col: usize) -> Vec<u32> {
        (0..self.rows).map(|row| self.get(row, col)).collect()
    }

    /// Iterates over rows as slices.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[u32]> + '_ {
        (0..self.rows).map(move |row| self.row(row))
    }

    /// Row-major copy of the entries.
    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        self.iter_rows().map(<[u32]>::to_vec).collect()
    }

    /// Flat row-major buffer.
    pub fn as_flat(&self) -> &[u32] {
        &self.data
    }

    /// Iterates over `(row, col, value)` for every nonzero entry, in row-major order.
    pub fn nonzero_entries(&self) -> impl Iterator<Item = (usize, usize, u32)> + '_ {
        self.data
            .iter()
            .enumerate()
            .filter(|(_, &value)| value != 0)
            .map(move |(idx, &value)| (idx / self.cols, idx % self.cols, value))
    }

    /// Returns whether every entry is zero.
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|&value| value == 0)
    }

    /// Number of nonzero entries in a row.
    pub fn row_weight(&self, row: usize) -> usize {
        self.row(row).iter().filter(|&&value| value != 0).count()
    }

    /// Number of nonzero entries in a column.
    pub fn column_weight(&self, col: usize) -> usize {
        (0..self.rows).filter(|&row| self.get(row, col) != 0).count()
    }

    /// Transposed copy.
    pub fn transpose(&self) -> Self {
        let mut out = Self::zeros(&self.field, self.cols, self.rows);
        for (row, col, value) in self.nonzero_entries() {
            out.set(col, row, value);
        }
        out
    }

    /// Entrywise additive inverse.
    pub fn negated(&self) -> Self {
        let mut out = self.clone();
        for value in &mut out.data {
            *value = self.field.neg(*value);
        }
        out
    }

    /// Multiplies every entry by a scalar.
    pub fn scaled(&self, scalar: u32) -> Self {
        let mut out = self.clone();
        for value in &mut out.data {
            *value = self.field.mul(*value, scalar);
        }
        out
    }

    /// Entrywise sum.
    pub fn add(&self, other: &Self) -> Result<Self, QldpcError> {
        self.check_field(other)?;
        if self.shape() != other.shape() {
            return Err(shape_mismatch("add", self.shape(), other.shape()));
        }
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| self.field.add(a, b))
            .collect();
        Ok(Self {
            field: self.field.clone(),
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    /// Matrix product `self * other`.
    pub fn matmul(&self, other: &Self) -> Result<Self, QldpcError> {
        self.check_field(other)?;
        if self.cols != other.rows {
            return Err(shape_mismatch("matmul", self.shape(), other.shape()));
        }
        let mut out = Self::zeros(&self.field, self.rows, other.cols);
        for (row, inner, value) in self.nonzero_entries() {
            for col in 0..other.cols {
                let rhs = other.get(inner, col);
                if rhs != 0 {
                    let entry = self.field.add(out.get(row, col), self.field.mul(value, rhs));
                    out.set(row, col, entry);
                }
            }
        }
        Ok(out)
    }

    /// Matrix-vector product `self * vector`.
    pub fn mul_vec(&self, vector: &[u32]) -> Result<Vec<u32>, QldpcError> {
        if vector.len() != self.cols {
            return Err(shape_mismatch("mul_vec", self.shape(), (vector.len(), 1)));
        }
        Ok(self
            .iter_rows()
            .map(|row| self.field.dot(row, vector))
            .collect())
    }

    /// Kronecker product `self ⊗ other`.
    pub fn kron(&self, other: &Self) -> Result<Self, QldpcError> {
        self.check_field(other)?;
        let mut out = Self::zeros(&self.field, self.rows * other.rows, self.cols * other.cols);
        for (r1, c1, v1) in self.nonzero_entries() {
            for (r2, c2, v2) in other.nonzero_entries() {
                out.set(
                    r1 * other.rows + r2,
                    c1 * other.cols + c2,
                    self.field.mul(v1, v2),
                );
            }
        }
        Ok(out)
    }

    /// Horizontal concatenation of blocks with equal row counts.
    pub fn hstack(blocks: &[&Self]) -> Result<Self, QldpcError> {
        let Some(first) = blocks.first() else {
            return Ok(Self::zeros(&GaloisField::default(), 0, 0));
        };
        let cols = blocks.iter().map(|block| block.cols).sum();
        let mut out = Self::zeros(&first.field, first.rows, cols);
        let mut offset = 0;
        for block in blocks {
            first.check_field(block)?;
            if block.rows != first.rows {
                return Err(shape_mismatch("hstack", first.shape(), block.shape()));
            }
            out.set_block(0, offset, block);
            offset += block.cols;
        }
        Ok(out)
    }

    /// Vertical concatenation of blocks with equal column counts.
    pub fn vstack(blocks: &[&Self]) -> Result<Self, QldpcError> {
        let Some(first) = blocks.first() else {
            return Ok(Self::zeros(&GaloisField::default(), 0, 0));
        };
        let mut data = Vec::new();
        let mut rows = 0;
        for block in blocks {
            first.check_field(block)?;
            if block.cols != first.cols {
                return Err(shape_mismatch("vstack", first.shape(), block.shape()));
            }
            data.extend_from_slice(&block.data);
            rows += block.rows;
        }
        Ok(Self {
            field: first.field.clone(),
            rows,
            cols: first.cols,
            data,
        })
    }

    /// Block-diagonal matrix `diag(self, other)`.
    pub fn block_diag(&self, other: &Self) -> Result<Self, QldpcError> {
        self.check_field(other)?;
        let mut out = Self::zeros(&self.field, self.rows + other.rows, self.cols + other.cols);
        out.set_block(0, 0, self);
        out.set_block(self.rows, self.cols, other);
        Ok(out)
    }

    /// Copies `block` into `self` with its top-left corner at `(row, col)`.
    pub fn set_block(&mut self, row: usize, col: usize, block: &Self) {
        for r in 0..block.rows {
            let target = (row + r) * self.cols + col;
            self.data[target..target + block.cols].copy_from_slice(block.row(r));
        }
    }

    /// Copy of the rows with the given indices, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        let mut data = Vec::with_capacity(indices.len() * self.cols);
        for &idx in indices {
            data.extend_from_slice(self.row(idx));
        }
        Self {
            field: self.field.clone(),
            rows: indices.len(),
            cols: self.cols,
            data,
        }
    }

    /// Copy of the columns with the given indices, in the given order.
    pub fn select_columns(&self, indices: &[usize]) -> Self {
        let mut out = Self::zeros(&self.field, self.rows, indices.len());
        for row in 0..self.rows {
            for (new_col, &col) in indices.iter().enumerate() {
                out.set(row, new_col, self.get(row, col));
            }
        }
        out
    }

    /// Contiguous sub-block `rows x cols` starting at `(row, col)`.
    pub fn submatrix(&self, row: usize, col: usize, rows: usize, cols: usize) -> Self {
        let mut out = Self::zeros(&self.field, rows, cols);
        for r in 0..rows {
            let source = (row + r) * self.cols + col;
            out.row_mut(r)
                .copy_from_slice(&self.data[source..source + cols]);
        }
        out
    }

    /// Reduced row echelon form, restricted to pivots among the first `max_pivot_col` columns
    /// when given.
    pub fn row_reduce_limited(&self, max_pivot_col: Option<usize>) -> RowEchelon {
        let mut matrix = self.clone();
        let limit = max_pivot_col.unwrap_or(self.cols).min(self.cols);
        let mut pivots = Vec::new();
        let mut pivot_row = 0;
        for col in 0..limit {
            if pivot_row == matrix.rows {
                break;
            }
            let Some(found) = (pivot_row..matrix.rows).find(|&row| matrix.get(row, col) != 0)
            else {
                continue;
            };
            matrix.swap_rows(found, pivot_row);
            let scale = self.field.inv(matrix.get(pivot_row, col));
            for value in matrix.row_mut(pivot_row) {
                *value = self.field.mul(*value, scale);
            }
            for row in 0..matrix.rows {
                if row == pivot_row {
                    continue;
                }
                let factor = matrix.get(row, col);
                if factor != 0 {
                    matrix.add_row_multiple(row, pivot_row, self.field.neg(factor));
                }
            }
            pivots.push(col);
            pivot_row += 1;
        }
        RowEchelon { matrix, pivots }
    }

    /// Reduced row echelon form.
    pub fn row_reduce(&self) -> RowEchelon {
        self.row_reduce_limited(None)
    }

    /// Rank over the field.
    pub fn rank(&self) -> usize {
        self.row_reduce().rank()
    }

    /// Basis for the right null space `{v : self v = 0}`, returned as the rows of a matrix
    /// in reduced row echelon form.
    pub fn null_space(&self) -> Self {
        let echelon = self.row_reduce();
        let mut is_pivot = vec![false; self.cols];
        for &pivot in &echelon.pivots {
            is_pivot[pivot] = true;
        }
        let free: Vec<usize> = (0..self.cols).filter(|&col| !is_pivot[col]).collect();
        let mut basis = Self::zeros(&self.field, free.len(), self.cols);
        for (idx, &free_col) in free.iter().enumerate() {
            basis.set(idx, free_col, 1);
            for (row, &pivot) in echelon.pivots.iter().enumerate() {
                let value = echelon.matrix.get(row, free_col);
                basis.set(idx, pivot, self.field.neg(value));
            }
        }
        basis.row_reduce().nonzero_rows()
    }

    /// Canonical row space basis: the nonzero rows of the reduced row echelon form.
    pub fn row_space(&self) -> Self {
        self.row_reduce().nonzero_rows()
    }

    /// Swaps two rows in place.
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for col in 0..self.cols {
            self.data.swap(a * self.cols + col, b * self.cols + col);
        }
    }

    /// `row[target] += factor * row[source]`.
    pub fn add_row_multiple(&mut self, target: usize, source: usize, factor: u32) {
        for col in 0..self.cols {
            let addend = self.field.mul(factor, self.get(source, col));
            if addend != 0 {
                let value = self.field.add(self.get(target, col), addend);
                self.set(target, col, value);
            }
        }
    }

    fn check_field(&self, other: &Self) -> Result<(), QldpcError> {
        if self.field != other.field {
            return Err(field_mismatch(&self.field, &other.field));
        }
        Ok(())
    }
}

impl fmt::Debug for FieldMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "FieldMatrix<{}>[{}x{}]", self.field, self.rows, self.cols)?;
        for row in self.iter_rows() {
            writeln!(f, "  {row:?}")?;
        }
        Ok(())
    }
}
