use std::sync::OnceLock;

use qldpc_core::errors::{ErrorInfo, QldpcError};
use qldpc_core::{FieldMatrix, GaloisField};
use qldpc_graph::{QuditGraph, QuditOperator};

use crate::abstract_code::AbstractCode;

/// Stabilizer code on Galois qudits with parity check matrix `H = [H_x | H_z]`.
///
/// Check `c` applies `X(H_x[c, d]) Z(H_z[c, d])` to qudit `d`.
#[derive(Debug, Clone)]
pub struct QuditCode {
    matrix: FieldMatrix,
    graph: OnceLock<QuditGraph>,
}

impl PartialEq for QuditCode {
    fn eq(&self, other: &Self) -> bool {
        self.matrix == other.matrix
    }
}

impl Eq for QuditCode {}

impl QuditCode {
    /// Code with the given `[H_x | H_z]` matrix.
    pub fn new(matrix: FieldMatrix) -> Result<Self, QldpcError> {
        if matrix.cols() % 2 != 0 {
            return Err(QldpcError::Code(
                ErrorInfo::new("odd-column-count", "qudit check matrices have 2n columns")
                    .with_context("cols", matrix.cols().to_string()),
            ));
        }
        Ok(Self::from_even_matrix(matrix))
    }

    pub(crate) fn from_even_matrix(matrix: FieldMatrix) -> Self {
        Self {
            matrix,
            graph: OnceLock::new(),
        }
    }

    /// Number of data qudits.
    pub fn num_qudits(&self) -> usize {
        self.matrix.cols() / 2
    }

    /// Operator applied by a check to a qudit.
    pub fn operator(&self, check: usize, qudit: usize) -> QuditOperator {
        let num_qudits = self.num_qudits();
        QuditOperator::new(self.matrix.get(check, qudit), self.matrix.get(check, num_qudits + qudit))
    }

    /// Checks rendered as space-separated operator tokens, one string per check.
    pub fn get_stabilizers(&self) -> Vec<String> {
        let field = self.field();
        (0..self.matrix.rows())
            .map(|check| {
                (0..self.num_qudits())
                    .map(|qudit| self.operator(check, qudit).to_token(field))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }

    /// Parses checks from their string form; the inverse of [`QuditCode::get_stabilizers`].
    pub fn from_stabilizers<S: AsRef<str>>(
        stabilizers: &[S],
        field: &GaloisField,
    ) -> Result<Self, QldpcError> {
        let checks: Vec<Vec<&str>> = stabilizers
            .iter()
            .map(|stabilizer| stabilizer.as_ref().split_whitespace().collect())
            .collect();
        let num_qudits = checks.first().map(Vec::len).unwrap_or(0);
        let mut matrix = FieldMatrix::zeros(field, checks.len(), 2 * num_qudits);
        for (check, tokens) in checks.iter().enumerate() {
            if tokens.len() != num_qudits {
                return Err(QldpcError::Code(
                    ErrorInfo::new(
                        "stabilizer-length-mismatch",
                        "stabilizers address different numbers of qudits",
                    )
                    .with_context("stabilizer", check.to_string())
                    .with_context("expected", num_qudits.to_string())
                    .with_context("found", tokens.len().to_string()),
                ));
            }
            for (qudit, token) in tokens.iter().enumerate() {
                let op = QuditOperator::from_token(token, field)?;
                matrix.set(check, qudit, op.x);
                matrix.set(check, num_qudits + qudit, op.z);
            }
        }
        Ok(Self::from_even_matrix(matrix))
    }

    /// Applies local Fourier transforms to the given qudits of an `[H_x | H_z]` matrix,
    /// exchanging their X-type and Z-type entries.
    pub fn conjugate(matrix: &FieldMatrix, qudits: &[usize]) -> Result<FieldMatrix, QldpcError> {
        let num_qudits = matrix.cols() / 2;
        if matrix.cols() % 2 != 0 {
            return Err(QldpcError::Code(
                ErrorInfo::new("odd-column-count", "qudit check matrices have 2n columns")
                    .with_context("cols", matrix.cols().to_string()),
            ));
        }
        check_qudits(qudits, num_qudits)?;
        let mut conjugated = matrix.clone();
        conjugate_in_place(&mut conjugated, qudits);
        Ok(conjugated)
    }
}

pub(crate) fn check_qudits(qudits: &[usize], num_qudits: usize) -> Result<(), QldpcError> {
    if let Some(&qudit) = qudits.iter().find(|&&qudit| qudit >= num_qudits) {
        return Err(QldpcError::Code(
            ErrorInfo::new("qudit-out-of-range", "qudit index exceeds the code length")
                .with_context("qudit", qudit.to_string())
                .with_context("num_qudits", num_qudits.to_string()),
        ));
    }
    Ok(())
}

pub(crate) fn conjugate_in_place(matrix: &mut FieldMatrix, qudits: &[usize]) {
    let num_qudits = matrix.cols() / 2;
    for row in 0..matrix.rows() {
        let entries = matrix.row_mut(row);
        for &qudit in qudits {
            entries.swap(qudit, num_qudits + qudit);
        }
    }
}

impl AbstractCode for QuditCode {
    type Graph = QuditGraph;

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
        self.num_qudits()
    }

    fn graph(&self) -> Result<&QuditGraph, QldpcError> {
        if let Some(graph) = self.graph.get() {
            return Ok(graph);
        }
        let graph = QuditGraph::from_matrix(&self.matrix)?;
        Ok(self.graph.get_or_init(|| graph))
    }

    fn get_weight(&self) -> usize {
        (0..self.matrix.rows())
            .map(|check| {
                (0..self.num_qudits())
                    .filter(|&qudit| !self.operator(check, qudit).is_identity())
                    .count()
            })
            .max()
            .unwrap_or(0)
    }
}
