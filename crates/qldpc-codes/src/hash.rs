use sha2::{Digest, Sha256};

use qldpc_core::FieldMatrix;

use crate::abstract_code::AbstractCode;
use crate::css::CSSCode;

fn update_matrix(hasher: &mut Sha256, matrix: &FieldMatrix) {
    hasher.update((matrix.rows() as u64).to_le_bytes());
    hasher.update((matrix.cols() as u64).to_le_bytes());
    for &entry in matrix.as_flat() {
        hasher.update(entry.to_le_bytes());
    }
}

fn hex_digest(hasher: Sha256) -> String {
    let digest = hasher.finalize();
    digest
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect::<String>()
}

/// Computes the canonical structural hash of a code from its field order and parity check
/// matrix.
///
/// Two codes hash equally iff their parity check matrices are equal, so a CSS code with
/// conjugated qudits hashes differently from the same code without them.
pub fn canonical_code_hash<C: AbstractCode>(code: &C) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"qldpc-code");
    hasher.update(code.field().order().to_le_bytes());
    update_matrix(&mut hasher, code.matrix());
    hex_digest(hasher)
}

/// Hash over the X-type and Z-type check matrices and the conjugated qudits of a CSS code.
pub fn canonical_css_hash(code: &CSSCode) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"qldpc-css-code");
    hasher.update(code.field().order().to_le_bytes());
    update_matrix(&mut hasher, code.matrix_x());
    update_matrix(&mut hasher, code.matrix_z());
    let conjugated = code.conjugated_qudits();
    hasher.update((conjugated.len() as u64).to_le_bytes());
    for &qudit in conjugated {
        hasher.update((qudit as u64).to_le_bytes());
    }
    hex_digest(hasher)
}
