use qldpc_core::errors::{ErrorInfo, QldpcError};
use qldpc_core::{FieldMatrix, GaloisField};

/// Common surface of every code defined by a parity check matrix over a finite field.
///
/// Product constructions compose codes through this trait and their constructors rather than
/// through a type hierarchy.
pub trait AbstractCode {
    /// Tanner graph type produced for this kind of code.
    type Graph;

    /// Field over which the code is defined.
    fn field(&self) -> &GaloisField;

    /// Parity check matrix.
    fn matrix(&self) -> &FieldMatrix;

    /// Number of parity checks.
    fn num_checks(&self) -> usize;

    /// Number of data bits or data qudits.
    fn num_data(&self) -> usize;

    /// Tanner graph of the parity check matrix, computed once.
    fn graph(&self) -> Result<&Self::Graph, QldpcError>;

    /// Number of data bits or qudits addressed by the heaviest check.
    fn get_weight(&self) -> usize;
}

/// Number of nonzero entries in a vector.
pub fn hamming_weight(vector: &[u32]) -> usize {
    vector.iter().filter(|&&value| value != 0).count()
}

pub(crate) fn check_same_field(
    lhs: &GaloisField,
    rhs: &GaloisField,
    what: &str,
) -> Result<(), QldpcError> {
    if lhs != rhs {
        return Err(QldpcError::Code(
            ErrorInfo::new("field-mismatch", format!("{what} are defined over different fields"))
                .with_context("lhs", lhs.to_string())
                .with_context("rhs", rhs.to_string()),
        ));
    }
    Ok(())
}

pub(crate) fn check_vector_length(vector: &[u32], expected: usize) -> Result<(), QldpcError> {
    if vector.len() != expected {
        return Err(QldpcError::Code(
            ErrorInfo::new("vector-length-mismatch", "vector length does not match the code")
                .with_context("expected", expected.to_string())
                .with_context("found", vector.len().to_string()),
        ));
    }
    Ok(())
}

pub(crate) fn trivial_code_error(what: &str) -> QldpcError {
    QldpcError::Code(
        ErrorInfo::new("trivial-code", format!("{what} of a code that encodes nothing"))
            .with_hint("the distance of a zero-dimensional code is undefined"),
    )
}

/// Entrywise difference `lhs - rhs` over a field.
pub(crate) fn subtract(field: &GaloisField, lhs: &[u32], rhs: &[u32]) -> Vec<u32> {
    lhs.iter().zip(rhs).map(|(&a, &b)| field.sub(a, b)).collect()
}
