use qldpc_core::errors::{ErrorInfo, QldpcError};
use qldpc_core::{FieldMatrix, GaloisField};
use serde::{Deserialize, Serialize};

use crate::abstract_code::AbstractCode;
use crate::classical::ClassicalCode;
use crate::css::CSSCode;
use crate::hash::{canonical_code_hash, canonical_css_hash};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum CodeKind {
    Classical,
    Css,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableMatrix {
    rows: usize,
    cols: usize,
    entries: Vec<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableCode {
    kind: CodeKind,
    field_order: u32,
    matrices: Vec<SerializableMatrix>,
    conjugate: Vec<usize>,
    code_hash: String,
}

fn serialize_matrix(matrix: &FieldMatrix) -> SerializableMatrix {
    SerializableMatrix {
        rows: matrix.rows(),
        cols: matrix.cols(),
        entries: matrix.as_flat().to_vec(),
    }
}

fn deserialize_matrix(field: &GaloisField, data: SerializableMatrix) -> Result<FieldMatrix, QldpcError> {
    FieldMatrix::from_flat(field, data.rows, data.cols, data.entries)
        .map_err(|err| QldpcError::Serde(err.info().clone()))
}

fn check_kind(payload: &SerializableCode, expected: CodeKind) -> Result<(), QldpcError> {
    if payload.kind != expected || payload.matrices.len() != expected_matrices(expected) {
        return Err(QldpcError::Serde(
            ErrorInfo::new("code-kind-mismatch", "payload does not hold the requested kind of code")
                .with_context("expected", format!("{expected:?}"))
                .with_context("found", format!("{:?}", payload.kind)),
        ));
    }
    Ok(())
}

fn expected_matrices(kind: CodeKind) -> usize {
    match kind {
        CodeKind::Classical => 1,
        CodeKind::Css => 2,
    }
}

fn check_hash(expected: &str, found: &str) -> Result<(), QldpcError> {
    if expected != found {
        return Err(QldpcError::Serde(
            ErrorInfo::new("hash-mismatch", "payload hash does not match its contents")
                .with_context("expected", expected)
                .with_context("found", found),
        ));
    }
    Ok(())
}

fn encode_json(payload: &SerializableCode) -> Result<String, QldpcError> {
    serde_json::to_string_pretty(payload)
        .map_err(|err| QldpcError::Serde(ErrorInfo::new("json-serialize", err.to_string())))
}

fn decode_json(data: &str) -> Result<SerializableCode, QldpcError> {
    serde_json::from_str(data)
        .map_err(|err| QldpcError::Serde(ErrorInfo::new("json-deserialize", err.to_string())))
}

fn encode_bytes(json: &str) -> Result<Vec<u8>, QldpcError> {
    bincode::serialize(json)
        .map_err(|err| QldpcError::Serde(ErrorInfo::new("bincode-serialize", err.to_string())))
}

fn decode_bytes(bytes: &[u8]) -> Result<String, QldpcError> {
    bincode::deserialize(bytes)
        .map_err(|err| QldpcError::Serde(ErrorInfo::new("bincode-deserialize", err.to_string())))
}

/// Serializes a CSS code to a JSON string.
pub fn to_json(code: &CSSCode) -> Result<String, QldpcError> {
    encode_json(&SerializableCode {
        kind: CodeKind::Css,
        field_order: code.field().order(),
        matrices: vec![serialize_matrix(code.matrix_x()), serialize_matrix(code.matrix_z())],
        conjugate: code.conjugated_qudits().to_vec(),
        code_hash: canonical_css_hash(code),
    })
}

/// Restores a CSS code from a JSON string, validating that its checks commute.
pub fn from_json(data: &str) -> Result<CSSCode, QldpcError> {
    let payload = decode_json(data)?;
    check_kind(&payload, CodeKind::Css)?;
    let field = GaloisField::new(payload.field_order)?;
    let mut matrices = payload.matrices.into_iter();
    let mut next_matrix = || match matrices.next() {
        Some(matrix) => deserialize_matrix(&field, matrix),
        None => Err(QldpcError::Serde(ErrorInfo::new("missing-matrix", "payload is truncated"))),
    };
    let matrix_x = next_matrix()?;
    let matrix_z = next_matrix()?;
    let code = CSSCode::new(
        ClassicalCode::new(matrix_x),
        ClassicalCode::new(matrix_z),
        payload.conjugate,
    )?;
    check_hash(&payload.code_hash, &canonical_css_hash(&code))?;
    Ok(code)
}

/// Serializes a CSS code into a binary blob.
pub fn to_bytes(code: &CSSCode) -> Result<Vec<u8>, QldpcError> {
    encode_bytes(&to_json(code)?)
}

/// Rehydrates a CSS code from a binary blob.
pub fn from_bytes(bytes: &[u8]) -> Result<CSSCode, QldpcError> {
    from_json(&decode_bytes(bytes)?)
}

/// Serializes a classical code to a JSON string.
pub fn classical_to_json(code: &ClassicalCode) -> Result<String, QldpcError> {
    encode_json(&SerializableCode {
        kind: CodeKind::Classical,
        field_order: code.field().order(),
        matrices: vec![serialize_matrix(code.matrix())],
        conjugate: Vec::new(),
        code_hash: canonical_code_hash(code),
    })
}

/// Restores a classical code from a JSON string.
pub fn classical_from_json(data: &str) -> Result<ClassicalCode, QldpcError> {
    let payload = decode_json(data)?;
    check_kind(&payload, CodeKind::Classical)?;
    let field = GaloisField::new(payload.field_order)?;
    let hash = payload.code_hash;
    let matrix = match payload.matrices.into_iter().next() {
        Some(matrix) => deserialize_matrix(&field, matrix)?,
        None => return Err(QldpcError::Serde(ErrorInfo::new("missing-matrix", "payload is truncated"))),
    };
    let code = ClassicalCode::new(matrix);
    check_hash(&hash, &canonical_code_hash(&code))?;
    Ok(code)
}

/// Serializes a classical code into a binary blob.
pub fn classical_to_bytes(code: &ClassicalCode) -> Result<Vec<u8>, QldpcError> {
    encode_bytes(&classical_to_json(code)?)
}

/// Rehydrates a classical code from a binary blob.
pub fn classical_from_bytes(bytes: &[u8]) -> Result<ClassicalCode, QldpcError> {
    classical_from_json(&decode_bytes(bytes)?)
}
