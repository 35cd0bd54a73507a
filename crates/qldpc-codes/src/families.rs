use std::collections::BTreeSet;

use itertools::Itertools;
use qldpc_core::errors::{ErrorInfo, QldpcError};
use qldpc_core::{FieldMatrix, GaloisField};

use crate::classical::ClassicalCode;

impl ClassicalCode {
    /// Repetition code on `num_bits` bits: checks `x_i - x_{i+1}` for consecutive bits.
    pub fn repetition(num_bits: usize, field: &GaloisField) -> Self {
        let num_checks = num_bits.saturating_sub(1);
        let mut matrix = FieldMatrix::zeros(field, num_checks, num_bits);
        for row in 0..num_checks {
            matrix.set(row, row, 1);
            matrix.set(row, row + 1, field.neg(1));
        }
        Self::new(matrix)
    }

    /// Repetition code with periodic boundary conditions: one check per bit, wrapping around.
    pub fn ring(num_bits: usize, field: &GaloisField) -> Self {
        let mut matrix = FieldMatrix::zeros(field, num_bits, num_bits);
        for row in 0..num_bits {
            matrix.set(row, (row + 1) % num_bits, field.neg(1));
            matrix.set(row, row, 1);
        }
        Self::new(matrix)
    }

    /// Hamming code with `rank` parity checks.
    ///
    /// The columns of the parity check matrix are one representative of every one-dimensional
    /// subspace of GF(q)^rank: the vectors whose first nonzero entry is 1.
    pub fn hamming(rank: usize, field: &GaloisField) -> Result<Self, QldpcError> {
        if rank < 2 {
            return Err(QldpcError::Code(
                ErrorInfo::new("invalid-hamming", "Hamming codes need at least two parity checks")
                    .with_context("rank", rank.to_string()),
            ));
        }
        let columns: Vec<Vec<u32>> = if field.order() == 2 {
            (0..rank)
                .map(|_| 0..2u32)
                .multi_cartesian_product()
                .filter(|bits| bits.iter().any(|&bit| bit != 0))
                .collect()
        } else {
            let order = field.order() as usize;
            (0..rank)
                .rev()
                .flat_map(|top_row| {
                    let rest = rank - top_row - 1;
                    (0..order.pow(rest as u32)).map(move |index| {
                        let mut column = vec![0; top_row];
                        column.push(1);
                        column.extend((0..rest).rev().map(|digit| {
                            ((index / order.pow(digit as u32)) % order) as u32
                        }));
                        column
                    })
                })
                .collect()
        };
        let mut matrix = FieldMatrix::zeros(field, rank, columns.len());
        for (col, column) in columns.iter().enumerate() {
            for (row, &value) in column.iter().enumerate() {
                matrix.set(row, col, value);
            }
        }
        Ok(Self::new(matrix).with_exact_distance(3))
    }

    /// Narrow-sense Reed-Solomon code of length `n = 2^m - 1` and dimension `k` over GF(2^m).
    ///
    /// Check `i` evaluates a word as a polynomial at `α^(i+1)`, so `H[i][j] = α^((i+1)·j)`.
    pub fn reed_solomon(num_bits: usize, dimension: usize) -> Result<Self, QldpcError> {
        let field = extension_field(num_bits, "invalid-reed-solomon")?;
        if dimension == 0 || dimension > num_bits {
            return Err(QldpcError::Code(
                ErrorInfo::new("invalid-reed-solomon", "dimension must lie in 1..=n")
                    .with_context("n", num_bits.to_string())
                    .with_context("k", dimension.to_string()),
            ));
        }
        let alpha = field.primitive_element();
        let num_checks = num_bits - dimension;
        let mut matrix = FieldMatrix::zeros(&field, num_checks, num_bits);
        for row in 0..num_checks {
            let root = field.pow(alpha, (row + 1) as u64);
            for col in 0..num_bits {
                matrix.set(row, col, field.pow(root, col as u64));
            }
        }
        Ok(Self::new(matrix).with_exact_distance(num_checks + 1))
    }

    /// Narrow-sense binary BCH code of length `n = 2^m - 1` and dimension `k`.
    ///
    /// The generator polynomial is the product of `x - α^j` over the union of the cyclotomic
    /// cosets of `1 .. δ`, for the smallest designed distance `δ` that leaves dimension `k`.
    pub fn bch(num_bits: usize, dimension: usize) -> Result<Self, QldpcError> {
        let field = extension_field(num_bits, "invalid-bch")?;
        let mut roots = BTreeSet::new();
        for designed in 1..=num_bits {
            if designed > 1 {
                let mut exponent = (designed - 1) % num_bits;
                while roots.insert(exponent) {
                    exponent = (2 * exponent) % num_bits;
                }
            }
            if num_bits - roots.len() == dimension {
                let polynomial = generator_polynomial(&field, &roots);
                let binary = GaloisField::binary();
                let mut generator = FieldMatrix::zeros(&binary, dimension, num_bits);
                for row in 0..dimension {
                    for (degree, &coefficient) in polynomial.iter().enumerate() {
                        generator.set(row, row + degree, coefficient);
                    }
                }
                return Ok(Self::from_generator(&generator));
            }
            if num_bits - roots.len() < dimension {
                break;
            }
        }
        Err(QldpcError::Code(
            ErrorInfo::new("invalid-bch", "no designed distance yields the requested dimension")
                .with_context("n", num_bits.to_string())
                .with_context("k", dimension.to_string()),
        ))
    }

    /// Binary Reed-Muller code `RM(r, m)` of length `2^m`.
    pub fn reed_muller(order: usize, size: usize) -> Result<Self, QldpcError> {
        if order > size {
            return Err(QldpcError::Code(
                ErrorInfo::new("invalid-reed-muller", "Reed-Muller codes need 0 <= r <= m")
                    .with_context("r", order.to_string())
                    .with_context("m", size.to_string()),
            ));
        }
        let generator = reed_muller_generator(&GaloisField::binary(), order, size)?;
        Ok(Self::from_generator(&generator).with_exact_distance(1 << (size - order)))
    }
}

fn extension_field(num_bits: usize, code: &str) -> Result<GaloisField, QldpcError> {
    let order = num_bits + 1;
    if num_bits < 3 || !order.is_power_of_two() {
        return Err(QldpcError::Code(
            ErrorInfo::new(code, "code length must be 2^m - 1 with m >= 2")
                .with_context("n", num_bits.to_string()),
        ));
    }
    let order = u32::try_from(order).map_err(|_| {
        QldpcError::Code(
            ErrorInfo::new(code, "code length exceeds the supported field size")
                .with_context("n", num_bits.to_string()),
        )
    })?;
    GaloisField::new(order)
}

/// Coefficients (lowest degree first) of `Π (x - α^j)` over the given exponents.
///
/// For a union of cyclotomic cosets every coefficient lies in GF(2), i.e. is 0 or 1.
fn generator_polynomial(field: &GaloisField, exponents: &BTreeSet<usize>) -> Vec<u32> {
    let alpha = field.primitive_element();
    let mut polynomial = vec![1];
    for &exponent in exponents {
        let root = field.neg(field.pow(alpha, exponent as u64));
        let mut product = vec![0; polynomial.len() + 1];
        for (degree, &coefficient) in polynomial.iter().enumerate() {
            product[degree] = field.add(product[degree], field.mul(coefficient, root));
            product[degree + 1] = field.add(product[degree + 1], coefficient);
        }
        polynomial = product;
    }
    polynomial
}

/// Generator matrix `[[G(r, m-1), G(r, m-1)], [0, G(r-1, m-1)]]`.
fn reed_muller_generator(
    field: &GaloisField,
    order: usize,
    size: usize,
) -> Result<FieldMatrix, QldpcError> {
    let length = 1 << size;
    if order == 0 {
        return FieldMatrix::from_flat(field, 1, length, vec![1; length]);
    }
    if order == size {
        return Ok(FieldMatrix::identity(field, length));
    }
    let upper = reed_muller_generator(field, order, size - 1)?;
    let lower = reed_muller_generator(field, order - 1, size - 1)?;
    let zeros = FieldMatrix::zeros(field, lower.rows(), lower.cols());
    FieldMatrix::vstack(&[
        &FieldMatrix::hstack(&[&upper, &upper])?,
        &FieldMatrix::hstack(&[&zeros, &lower])?,
    ])
}
