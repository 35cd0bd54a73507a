use std::collections::BTreeMap;

use qldpc_core::errors::{ErrorInfo, QldpcError};
use qldpc_core::FieldMatrix;
use qldpc_graph::{graph_product, product_node_map, ClassicalGraph, Node, QuditGraph};
use qldpc_group::Protograph;

use crate::abstract_code::{check_same_field, AbstractCode};
use crate::classical::ClassicalCode;
use crate::css::CSSCode;

/// Number of qudits (or checks) in each product sector `(i, j)`, where index 0 stands for bits
/// and index 1 for checks of the respective factor.
pub type SectorSize = [[usize; 2]; 2];

fn outer(lhs: [usize; 2], rhs: [usize; 2], scale: usize) -> SectorSize {
    [
        [scale * lhs[0] * rhs[0], scale * lhs[0] * rhs[1]],
        [scale * lhs[1] * rhs[0], scale * lhs[1] * rhs[1]],
    ]
}

fn conjugated_sector(sector_size: &SectorSize, num_qudits: usize, conjugate: bool) -> Vec<usize> {
    if conjugate {
        (sector_size[0][0]..num_qudits).collect()
    } else {
        Vec::new()
    }
}

/// Hypergraph product of two classical codes.
///
/// For `H1 (m1 x n1)` and `H2 (m2 x n2)`:
///
/// ```text
/// matrix_x = [  H1 ⊗ I_n2 | I_m1 ⊗ H2ᵗ ]
/// matrix_z = [ -I_n1 ⊗ H2 | H1ᵗ ⊗ I_m2 ]
/// ```
///
/// Qudits are the bit-bit sector `(0, 0)` followed by the check-check sector `(1, 1)`. The sign
/// keeps the checks commuting over any field.
#[derive(Debug, Clone)]
pub struct HGPCode {
    css: CSSCode,
    code_a: ClassicalCode,
    code_b: ClassicalCode,
    sector_size: SectorSize,
}

impl HGPCode {
    /// Builds the product; with `conjugate`, sector `(1, 1)` qudits are Fourier-transformed.
    pub fn new(
        code_a: ClassicalCode,
        code_b: ClassicalCode,
        conjugate: bool,
    ) -> Result<Self, QldpcError> {
        check_same_field(code_a.field(), code_b.field(), "hypergraph product factors")?;
        let (matrix_x, matrix_z) = Self::get_matrix_product(code_a.matrix(), code_b.matrix())?;
        let sector_size = outer(
            [code_a.num_bits(), code_a.num_checks()],
            [code_b.num_bits(), code_b.num_checks()],
            1,
        );
        let conjugate = conjugated_sector(&sector_size, matrix_x.cols(), conjugate);
        let css = CSSCode::new_unchecked(
            ClassicalCode::new(matrix_x),
            ClassicalCode::new(matrix_z),
            conjugate,
        )?;
        Ok(Self {
            css,
            code_a,
            code_b,
            sector_size,
        })
    }

    /// X-type and Z-type check matrices of the hypergraph product of two parity check matrices.
    pub fn get_matrix_product(
        matrix_a: &FieldMatrix,
        matrix_b: &FieldMatrix,
    ) -> Result<(FieldMatrix, FieldMatrix), QldpcError> {
        let field = matrix_a.field();
        let (m1, n1) = matrix_a.shape();
        let (m2, n2) = matrix_b.shape();
        let h1_in2 = matrix_a.kron(&FieldMatrix::identity(field, n2))?;
        let in1_h2 = FieldMatrix::identity(field, n1).kron(matrix_b)?;
        let h1t_im2 = matrix_a.transpose().kron(&FieldMatrix::identity(field, m2))?;
        let im1_h2t = FieldMatrix::identity(field, m1).kron(&matrix_b.transpose())?;
        let matrix_x = FieldMatrix::hstack(&[&h1_in2, &im1_h2t])?;
        let matrix_z = FieldMatrix::hstack(&[&in1_h2.negated(), &h1t_im2])?;
        Ok((matrix_x, matrix_z))
    }

    /// Hypergraph product of two Tanner graphs; see [`qldpc_graph::graph_product`].
    pub fn get_graph_product(
        graph_a: &ClassicalGraph,
        graph_b: &ClassicalGraph,
        conjugate: bool,
    ) -> Result<QuditGraph, QldpcError> {
        graph_product(graph_a, graph_b, conjugate)
    }

    /// Labels of the product nodes, keyed by the pair of factor nodes they come from.
    pub fn get_product_node_map(
        nodes_a: impl IntoIterator<Item = Node>,
        nodes_b: impl IntoIterator<Item = Node>,
    ) -> BTreeMap<(Node, Node), Node> {
        product_node_map(nodes_a, nodes_b)
    }

    /// Qudits or checks per sector.
    pub fn sector_size(&self) -> SectorSize {
        self.sector_size
    }

    /// First factor.
    pub fn code_a(&self) -> &ClassicalCode {
        &self.code_a
    }

    /// Second factor.
    pub fn code_b(&self) -> &ClassicalCode {
        &self.code_b
    }

    /// The product as a CSS code.
    pub fn css(&self) -> &CSSCode {
        &self.css
    }

    /// Mutable access, for logical operator reduction.
    pub fn css_mut(&mut self) -> &mut CSSCode {
        &mut self.css
    }

    /// Consumes the product, keeping the CSS code.
    pub fn into_css(self) -> CSSCode {
        self.css
    }
}

/// Lifted product of two protographs over the same group algebra.
///
/// The hypergraph product formula is applied to matrices of group-algebra elements and every
/// entry of the result is lifted to its regular representation. Over the trivial group this is
/// exactly the hypergraph product.
#[derive(Debug, Clone)]
pub struct LPCode {
    css: CSSCode,
    protograph_a: Protograph,
    protograph_b: Protograph,
    sector_size: SectorSize,
}

impl LPCode {
    /// Builds the lifted product; with `conjugate`, sector `(1, 1)` qudits are transformed.
    ///
    /// Commutation of the checks is guaranteed for abelian groups and verified otherwise.
    pub fn new(
        protograph_a: Protograph,
        protograph_b: Protograph,
        conjugate: bool,
    ) -> Result<Self, QldpcError> {
        if protograph_a.group() != protograph_b.group() {
            return Err(QldpcError::Code(
                ErrorInfo::new("group-mismatch", "protographs are defined over different groups")
                    .with_context("lhs_order", protograph_a.lift_dim().to_string())
                    .with_context("rhs_order", protograph_b.lift_dim().to_string()),
            ));
        }
        check_same_field(protograph_a.field(), protograph_b.field(), "lifted product factors")?;

        let (proto_x, proto_z) = Self::get_protograph_product(&protograph_a, &protograph_b)?;
        let matrix_x = proto_x.lift();
        let matrix_z = proto_z.lift();

        let (rows_a, cols_a) = protograph_a.shape();
        let (rows_b, cols_b) = protograph_b.shape();
        let sector_size = outer([cols_a, rows_a], [cols_b, rows_b], protograph_a.lift_dim());
        let conjugate = conjugated_sector(&sector_size, matrix_x.cols(), conjugate);

        let code_x = ClassicalCode::new(matrix_x);
        let code_z = ClassicalCode::new(matrix_z);
        let css = if protograph_a.group().is_abelian() {
            CSSCode::new_unchecked(code_x, code_z, conjugate)?
        } else {
            CSSCode::new(code_x, code_z, conjugate)?
        };
        Ok(Self {
            css,
            protograph_a,
            protograph_b,
            sector_size,
        })
    }

    /// Hypergraph product formula over the group algebra, before lifting.
    pub fn get_protograph_product(
        protograph_a: &Protograph,
        protograph_b: &Protograph,
    ) -> Result<(Protograph, Protograph), QldpcError> {
        let (m1, n1) = protograph_a.shape();
        let (m2, n2) = protograph_b.shape();
        let h1_in2 = protograph_a.kron_identity(n2);
        let in1_h2 = protograph_b.identity_kron(n1);
        let h1t_im2 = protograph_a.transpose().kron_identity(m2);
        let im1_h2t = protograph_b.transpose().identity_kron(m1);

        let proto_x = hstack_protographs(&h1_in2, &im1_h2t)?;
        let proto_z = hstack_protographs(&in1_h2.negated(), &h1t_im2)?;
        Ok((proto_x, proto_z))
    }

    /// Qudits or checks per sector, scaled by the order of the group.
    pub fn sector_size(&self) -> SectorSize {
        self.sector_size
    }

    /// First protograph.
    pub fn protograph_a(&self) -> &Protograph {
        &self.protograph_a
    }

    /// Second protograph.
    pub fn protograph_b(&self) -> &Protograph {
        &self.protograph_b
    }

    /// The product as a CSS code.
    pub fn css(&self) -> &CSSCode {
        &self.css
    }

    /// Mutable access, for logical operator reduction.
    pub fn css_mut(&mut self) -> &mut CSSCode {
        &mut self.css
    }

    /// Consumes the product, keeping the CSS code.
    pub fn into_css(self) -> CSSCode {
        self.css
    }
}

fn hstack_protographs(lhs: &Protograph, rhs: &Protograph) -> Result<Protograph, QldpcError> {
    let (rows, lhs_cols) = lhs.shape();
    let (rhs_rows, rhs_cols) = rhs.shape();
    if rows != rhs_rows {
        return Err(QldpcError::Code(
            ErrorInfo::new("shape-mismatch", "protograph blocks have different row counts")
                .with_context("lhs", rows.to_string())
                .with_context("rhs", rhs_rows.to_string()),
        ));
    }
    let entries = (0..rows)
        .map(|row| {
            (0..lhs_cols)
                .map(|col| lhs.get(row, col).clone())
                .chain((0..rhs_cols).map(|col| rhs.get(row, col).clone()))
                .collect()
        })
        .collect();
    Protograph::new(lhs.group(), lhs.field(), entries)
}
