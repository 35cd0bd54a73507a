use qldpc_core::errors::{ErrorInfo, QldpcError};
use qldpc_core::{FieldMatrix, GaloisField, Pauli};

use crate::abstract_code::AbstractCode;
use crate::chain::ChainComplex;
use crate::classical::ClassicalCode;
use crate::css::CSSCode;
use crate::products::HGPCode;

/// Qubits of a `rows x cols` grid on the odd sublattice, conjugated in the XZZX variants.
fn checkerboard(rows: usize, cols: usize) -> Vec<usize> {
    (0..rows * cols)
        .filter(|&qubit| (qubit / cols + qubit % cols) % 2 == 1)
        .collect()
}

const TILE: [(usize, usize); 4] = [(0, 0), (1, 0), (0, 1), (1, 1)];

/// One rotated-layout check on the given `(qubit, corner parity)` support.
///
/// Z-type tiles alternate signs around the square. Neighbouring X and Z tiles share an
/// edge of two qubits with opposite Z signs, so they commute over any field.
fn tile_check(field: &GaloisField, pauli: Pauli, support: &[(usize, usize)], num_qubits: usize) -> Vec<u32> {
    let mut check = vec![0; num_qubits];
    for &(qubit, parity) in support {
        check[qubit] = match pauli {
            Pauli::Z if parity % 2 == 1 => field.neg(1),
            _ => 1,
        };
    }
    check
}

fn rows_to_matrix(field: &GaloisField, checks: &[Vec<u32>], num_qubits: usize) -> Result<FieldMatrix, QldpcError> {
    FieldMatrix::from_flat(field, checks.len(), num_qubits, checks.concat())
}

fn with_distances(css: CSSCode, distance_x: usize, distance_z: usize) -> CSSCode {
    css.with_exact_distance(Pauli::X, distance_x)
        .with_exact_distance(Pauli::Z, distance_z)
}

/// Surface code on a `rows x cols` grid of data qubits.
///
/// The rotated layout places data qubits on the vertices of a grid of square checks. The
/// unrotated layout is the hypergraph product of two repetition codes. X-type logical
/// operators run along a row and Z-type logical operators along a column, so `d_X = cols`
/// and `d_Z = rows`.
#[derive(Debug, Clone)]
pub struct SurfaceCode {
    css: CSSCode,
    rows: usize,
    cols: usize,
    rotated: bool,
}

impl SurfaceCode {
    /// Builds the code. With `conjugate`, qubits are Hadamard-transformed in a checkerboard
    /// pattern (rotated) or on the check-check sector (unrotated).
    pub fn new(
        rows: usize,
        cols: usize,
        rotated: bool,
        field: &GaloisField,
        conjugate: bool,
    ) -> Result<Self, QldpcError> {
        let css = if rotated {
            let (matrix_x, matrix_z) = Self::get_rotated_checks(rows, cols, field)?;
            let conjugate = if conjugate { checkerboard(rows, cols) } else { Vec::new() };
            CSSCode::new_unchecked(ClassicalCode::new(matrix_x), ClassicalCode::new(matrix_z), conjugate)?
        } else {
            HGPCode::new(
                ClassicalCode::repetition(rows, field),
                ClassicalCode::repetition(cols, field),
                conjugate,
            )?
            .into_css()
        };
        Ok(Self {
            css: with_distances(css, cols, rows),
            rows,
            cols,
            rotated,
        })
    }

    /// X-type and Z-type checks of the rotated layout.
    ///
    /// Every `2 x 2` tile with top-left corner `(row, col)` for `-1 <= row < rows` and
    /// `-1 <= col < cols` supports one check on its in-bounds qubits, X-type when `row` and
    /// `col` have equal parity. Boundary tiles keep only two qubits; X-type tiles are dropped
    /// on the top and bottom boundaries and Z-type tiles on the left and right ones.
    pub fn get_rotated_checks(
        rows: usize,
        cols: usize,
        field: &GaloisField,
    ) -> Result<(FieldMatrix, FieldMatrix), QldpcError> {
        let (rows_i, cols_i) = (rows as i64, cols as i64);
        let mut checks_x = Vec::new();
        let mut checks_z = Vec::new();
        for row in -1..rows_i {
            for col in -1..cols_i {
                let support: Vec<(usize, usize)> = TILE
                    .iter()
                    .filter_map(|&(dr, dc)| {
                        let (rr, cc) = (row + dr as i64, col + dc as i64);
                        ((0..rows_i).contains(&rr) && (0..cols_i).contains(&cc))
                            .then(|| ((rr * cols_i + cc) as usize, dr + dc))
                    })
                    .collect();
                if support.len() <= 1 {
                    continue;
                }
                if row.rem_euclid(2) == col.rem_euclid(2) {
                    if (0..rows_i - 1).contains(&row) {
                        checks_x.push(tile_check(field, Pauli::X, &support, rows * cols));
                    }
                } else if (0..cols_i - 1).contains(&col) {
                    checks_z.push(tile_check(field, Pauli::Z, &support, rows * cols));
                }
            }
        }
        Ok((
            rows_to_matrix(field, &checks_x, rows * cols)?,
            rows_to_matrix(field, &checks_z, rows * cols)?,
        ))
    }

    /// Grid dimensions `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Whether the rotated layout is used.
    pub fn is_rotated(&self) -> bool {
        self.rotated
    }

    /// The code as a CSS code.
    pub fn css(&self) -> &CSSCode {
        &self.css
    }

    /// Mutable access, for logical operator reduction.
    pub fn css_mut(&mut self) -> &mut CSSCode {
        &mut self.css
    }

    /// Consumes the surface code, keeping the CSS code.
    pub fn into_css(self) -> CSSCode {
        self.css
    }
}

/// Surface code with periodic boundary conditions, encoding two logical qudits with
/// `d_X = d_Z = min(rows, cols)`.
#[derive(Debug, Clone)]
pub struct ToricCode {
    css: CSSCode,
    rows: usize,
    cols: usize,
    rotated: bool,
}

impl ToricCode {
    /// Builds the code; the rotated layout needs even side lengths of at least four.
    pub fn new(
        rows: usize,
        cols: usize,
        rotated: bool,
        field: &GaloisField,
        conjugate: bool,
    ) -> Result<Self, QldpcError> {
        let css = if rotated {
            if rows % 2 != 0 || cols % 2 != 0 || rows < 4 || cols < 4 {
                return Err(QldpcError::Code(
                    ErrorInfo::new("invalid-toric", "rotated toric codes need even side lengths of at least four")
                        .with_context("rows", rows.to_string())
                        .with_context("cols", cols.to_string()),
                ));
            }
            let (matrix_x, matrix_z) = Self::get_rotated_checks(rows, cols, field)?;
            let conjugate = if conjugate { checkerboard(rows, cols) } else { Vec::new() };
            CSSCode::new_unchecked(ClassicalCode::new(matrix_x), ClassicalCode::new(matrix_z), conjugate)?
        } else {
            HGPCode::new(
                ClassicalCode::ring(rows, field),
                ClassicalCode::ring(cols, field),
                conjugate,
            )?
            .into_css()
        };
        let distance = rows.min(cols);
        Ok(Self {
            css: with_distances(css, distance, distance),
            rows,
            cols,
            rotated,
        })
    }

    /// X-type and Z-type checks of the rotated layout, with every tile wrapping around.
    pub fn get_rotated_checks(
        rows: usize,
        cols: usize,
        field: &GaloisField,
    ) -> Result<(FieldMatrix, FieldMatrix), QldpcError> {
        let mut checks_x = Vec::new();
        let mut checks_z = Vec::new();
        for row in 0..rows {
            for col in 0..cols {
                let support: Vec<(usize, usize)> = TILE
                    .iter()
                    .map(|&(dr, dc)| (((row + dr) % rows) * cols + (col + dc) % cols, dr + dc))
                    .collect();
                if row % 2 == col % 2 {
                    checks_x.push(tile_check(field, Pauli::X, &support, rows * cols));
                } else {
                    checks_z.push(tile_check(field, Pauli::Z, &support, rows * cols));
                }
            }
        }
        Ok((
            rows_to_matrix(field, &checks_x, rows * cols)?,
            rows_to_matrix(field, &checks_z, rows * cols)?,
        ))
    }

    /// Grid dimensions `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Whether the rotated layout is used.
    pub fn is_rotated(&self) -> bool {
        self.rotated
    }

    /// The code as a CSS code.
    pub fn css(&self) -> &CSSCode {
        &self.css
    }

    /// Mutable access, for logical operator reduction.
    pub fn css_mut(&mut self) -> &mut CSSCode {
        &mut self.css
    }

    /// Consumes the toric code, keeping the CSS code.
    pub fn into_css(self) -> CSSCode {
        self.css
    }
}

/// Surface or toric code on a `dim`-dimensional hypercubic lattice.
///
/// Built by tensoring the chain complex of a repetition code (or ring code, if `periodic`)
/// with its transpose `dim - 1` times. Qubits live in degree 1, with X-type checks given by
/// `∂_1` and Z-type checks by `∂_2ᵗ`.
#[derive(Debug, Clone)]
pub struct GeneralizedSurfaceCode {
    css: CSSCode,
    size: usize,
    dim: usize,
    periodic: bool,
}

impl GeneralizedSurfaceCode {
    /// Builds the code; `dim` must be at least 2.
    pub fn new(
        size: usize,
        dim: usize,
        periodic: bool,
        field: &GaloisField,
        conjugate: Vec<usize>,
    ) -> Result<Self, QldpcError> {
        if dim < 2 {
            return Err(QldpcError::Code(
                ErrorInfo::new("invalid-dimension", "generalized surface codes need dimension >= 2")
                    .with_context("dim", dim.to_string()),
            ));
        }
        let base = if periodic {
            ClassicalCode::ring(size, field)
        } else {
            ClassicalCode::repetition(size, field)
        };
        let link = ChainComplex::new(vec![base.matrix().transpose()])?;
        let mut chain = ChainComplex::new(vec![base.matrix().clone()])?;
        for _ in 1..dim {
            chain = ChainComplex::tensor_product(&chain, &link)?.truncate(2);
        }
        let css = CSSCode::new_unchecked(
            ClassicalCode::new(chain.op(1)),
            ClassicalCode::new(chain.op(2).transpose()),
            conjugate,
        )?;
        Ok(Self {
            css,
            size,
            dim,
            periodic,
        })
    }

    /// Side length of the lattice.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Dimension of the lattice.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Whether the lattice has periodic boundary conditions.
    pub fn is_periodic(&self) -> bool {
        self.periodic
    }

    /// The code as a CSS code.
    pub fn css(&self) -> &CSSCode {
        &self.css
    }

    /// Consumes the code, keeping the CSS code.
    pub fn into_css(self) -> CSSCode {
        self.css
    }
}
