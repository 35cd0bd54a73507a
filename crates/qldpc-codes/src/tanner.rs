use std::collections::BTreeMap;
use std::sync::Arc;

use qldpc_core::errors::{ErrorInfo, QldpcError};
use qldpc_core::FieldMatrix;
use qldpc_graph::{EdgeNode, Subgraph, UndirectedEdge};
use qldpc_group::{CayleyComplex, Face, Group, Member, Vertex};
use tracing::instrument;

use crate::abstract_code::{check_same_field, AbstractCode};
use crate::classical::ClassicalCode;
use crate::css::CSSCode;

/// Classical Tanner code: every source node of a subgraph enforces a copy of a small subcode on
/// its ordered neighborhood of sinks, and the sinks are the bits of the code.
///
/// Source `s` contributes the check rows `s·m .. (s+1)·m`, where `m` is the number of checks of
/// the subcode. Sources and sinks are indexed in sorted order.
#[derive(Debug, Clone)]
pub struct TannerCode<S, T> {
    code: ClassicalCode,
    subgraph: Subgraph<S, T>,
    subcode: ClassicalCode,
}

impl<S: Ord + Clone, T: Ord + Clone> TannerCode<S, T> {
    /// Builds the code; every source must have exactly as many neighbors as the subcode has bits.
    pub fn new(subgraph: Subgraph<S, T>, subcode: ClassicalCode) -> Result<Self, QldpcError> {
        let matrix = Self::get_matrix(&subgraph, &subcode)?;
        Ok(Self {
            code: ClassicalCode::new(matrix),
            subgraph,
            subcode,
        })
    }

    fn get_matrix(
        subgraph: &Subgraph<S, T>,
        subcode: &ClassicalCode,
    ) -> Result<FieldMatrix, QldpcError> {
        let sink_index: BTreeMap<&T, usize> = subgraph
            .sinks()
            .into_iter()
            .enumerate()
            .map(|(index, sink)| (sink, index))
            .collect();
        let num_sources = subgraph.sources().count();
        let block = subcode.num_checks();
        let mut matrix = FieldMatrix::zeros(subcode.field(), num_sources * block, sink_index.len());
        for (source_index, source) in subgraph.sources().enumerate() {
            let neighbors = subgraph.sorted_neighbors(source);
            if neighbors.len() != subcode.num_bits() {
                return Err(QldpcError::Code(
                    ErrorInfo::new("invalid-subgraph", "source degree differs from the subcode length")
                        .with_context("source", source_index.to_string())
                        .with_context("degree", neighbors.len().to_string())
                        .with_context("subcode_bits", subcode.num_bits().to_string()),
                ));
            }
            for (row, col, value) in subcode.matrix().nonzero_entries() {
                matrix.set(source_index * block + row, sink_index[neighbors[col]], value);
            }
        }
        Ok(matrix)
    }

    /// The directed subgraph defining the code.
    pub fn subgraph(&self) -> &Subgraph<S, T> {
        &self.subgraph
    }

    /// The code enforced at every source.
    pub fn subcode(&self) -> &ClassicalCode {
        &self.subcode
    }

    /// The Tanner code as a classical code.
    pub fn code(&self) -> &ClassicalCode {
        &self.code
    }

    /// Consumes the Tanner code, keeping the classical code.
    pub fn into_code(self) -> ClassicalCode {
        self.code
    }
}

impl<N: Ord + Clone> TannerCode<N, EdgeNode<N>> {
    /// Tanner code of an undirected graph: every vertex enforces the subcode on its edges.
    pub fn from_undirected(
        edges: impl IntoIterator<Item = UndirectedEdge<N>>,
        subcode: ClassicalCode,
    ) -> Result<Self, QldpcError> {
        Self::new(Subgraph::from_undirected(edges), subcode)
    }
}

/// Subgraph from the vertices of a Cayley complex to its faces.
pub type FaceSubgraph = Subgraph<Vertex, Face>;

/// Quantum Tanner code on the square faces of a left-right Cayley complex.
///
/// X-type checks live on side-0 vertices and enforce `(C_A ⊗ C_B)^⊥` on the surrounding faces.
/// Z-type checks live on side-1 vertices and enforce `(C_A^⊥ ⊗ C_B^⊥)^⊥`. The faces around a
/// vertex are ordered by the positions of `a` and `b` in the sorted subsets. The two families
/// of checks commute when no member of `A` is conjugate to a member of `B`; otherwise
/// commutation is verified and a failure is reported as `css-incompatible`.
#[derive(Debug, Clone)]
pub struct QTCode {
    css: CSSCode,
    complex: CayleyComplex,
    code_a: ClassicalCode,
    code_b: ClassicalCode,
}

impl QTCode {
    /// Builds the code from a group, generating subsets, and codes of matching lengths.
    #[instrument(level = "debug", skip_all, fields(group_order = group.order()))]
    pub fn new(
        group: &Arc<Group>,
        subset_a: &[Member],
        subset_b: &[Member],
        code_a: ClassicalCode,
        code_b: ClassicalCode,
        bipartite: bool,
        conjugate: Vec<usize>,
    ) -> Result<Self, QldpcError> {
        check_same_field(code_a.field(), code_b.field(), "quantum Tanner subcodes")?;
        let complex = CayleyComplex::new(group, subset_a, subset_b, bipartite)?;
        for (label, code, subset) in [
            ("A", &code_a, complex.subset_a()),
            ("B", &code_b, complex.subset_b()),
        ] {
            if code.num_bits() != subset.len() {
                return Err(QldpcError::Code(
                    ErrorInfo::new("subcode-length-mismatch", "subcode length differs from its subset size")
                        .with_context("subset", label)
                        .with_context("subset_size", subset.len().to_string())
                        .with_context("subcode_bits", code.num_bits().to_string()),
                ));
            }
        }

        let (subgraph_x, subgraph_z) = Self::get_subgraphs(&complex);
        let subcode_x = !ClassicalCode::tensor_product(&code_a, &code_b)?;
        let subcode_z = !ClassicalCode::tensor_product(&!&code_a, &!&code_b)?;
        let code_x = TannerCode::new(subgraph_x, subcode_x)?.into_code();
        let code_z = TannerCode::new(subgraph_z, subcode_z)?.into_code();
        let no_conjugacy = complex.satisfies_total_no_conjugacy();
        tracing::debug!(
            faces = code_x.num_bits(),
            checks_x = code_x.num_checks(),
            checks_z = code_z.num_checks(),
            no_conjugacy,
            "quantum_tanner_code_built"
        );

        // commutation is only guaranteed under total no-conjugacy
        let css = if no_conjugacy {
            CSSCode::new_unchecked(code_x, code_z, conjugate)?
        } else {
            CSSCode::new(code_x, code_z, conjugate)?
        };
        Ok(Self {
            css,
            complex,
            code_a,
            code_b,
        })
    }

    /// Subgraphs for the X-type and Z-type checks.
    pub fn get_subgraphs(complex: &CayleyComplex) -> (FaceSubgraph, FaceSubgraph) {
        let group = complex.group();
        let position = |subset: &[Member], member: Member| {
            subset.binary_search(&member).unwrap_or(subset.len())
        };
        let mut subgraph_x = Subgraph::new();
        let mut subgraph_z = Subgraph::new();
        for vertex in complex.side_zero_vertices() {
            for &a in complex.subset_a() {
                for &b in complex.subset_b() {
                    let face = complex.face(vertex, a, b);
                    let index_b = position(complex.subset_b(), b);
                    subgraph_x.add_edge(
                        vertex,
                        face.clone(),
                        Some(vec![position(complex.subset_a(), a), index_b]),
                    );
                    subgraph_z.add_edge(
                        complex.left(a, vertex),
                        face,
                        Some(vec![position(complex.subset_a(), group.inv(a)), index_b]),
                    );
                }
            }
        }
        (subgraph_x, subgraph_z)
    }

    /// The underlying Cayley complex.
    pub fn complex(&self) -> &CayleyComplex {
        &self.complex
    }

    /// Subcode on the left-multiplication subset.
    pub fn code_a(&self) -> &ClassicalCode {
        &self.code_a
    }

    /// Subcode on the right-multiplication subset.
    pub fn code_b(&self) -> &ClassicalCode {
        &self.code_b
    }

    /// The code as a CSS code.
    pub fn css(&self) -> &CSSCode {
        &self.css
    }

    /// Mutable access, for logical operator reduction.
    pub fn css_mut(&mut self) -> &mut CSSCode {
        &mut self.css
    }

    /// Consumes the code, keeping the CSS code.
    pub fn into_css(self) -> CSSCode {
        self.css
    }
}
