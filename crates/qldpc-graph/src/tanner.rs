use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;

use qldpc_core::errors::{ErrorInfo, QldpcError};
use qldpc_core::{FieldMatrix, GaloisField};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::ids::Node;
use crate::operator::QuditOperator;

/// Value attached to a Tanner graph edge.
pub trait EdgeValue: Copy + Eq + Debug + Serialize + DeserializeOwned {
    /// Returns whether the value is trivial, in which case the edge is not stored.
    fn is_trivial(&self) -> bool;

    /// Field elements making up the value, in a fixed order.
    fn components(&self) -> Vec<u32>;
}

impl EdgeValue for u32 {
    fn is_trivial(&self) -> bool {
        *self == 0
    }

    fn components(&self) -> Vec<u32> {
        vec![*self]
    }
}

impl EdgeValue for QuditOperator {
    fn is_trivial(&self) -> bool {
        self.is_identity()
    }

    fn components(&self) -> Vec<u32> {
        vec![self.x, self.z]
    }
}

/// Bipartite graph with edges directed from check nodes to data nodes.
///
/// Isolated nodes are kept, so converting a matrix into a graph and back is lossless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TannerGraph<V> {
    field: GaloisField,
    nodes: BTreeSet<Node>,
    edges: BTreeMap<Node, BTreeMap<Node, V>>,
}

/// Tanner graph of a classical code; edges carry parity check entries.
pub type ClassicalGraph = TannerGraph<u32>;

/// Tanner graph of a qudit code; edges carry the operator a check applies to a qudit.
pub type QuditGraph = TannerGraph<QuditOperator>;

impl<V: EdgeValue> TannerGraph<V> {
    /// Creates an empty graph over the given field.
    pub fn new(field: &GaloisField) -> Self {
        Self {
            field: field.clone(),
            nodes: BTreeSet::new(),
            edges: BTreeMap::new(),
        }
    }

    /// Field of the values carried by edges.
    pub fn field(&self) -> &GaloisField {
        &self.field
    }

    /// Adds a node if it is not already present.
    pub fn add_node(&mut self, node: Node) {
        self.nodes.insert(node);
    }

    /// Adds (or overwrites) the edge from `check` to `data`. Trivial values remove the edge.
    pub fn add_edge(&mut self, check: Node, data: Node, value: V) -> Result<(), QldpcError> {
        if check.is_data || !data.is_data {
            return Err(QldpcError::Graph(
                ErrorInfo::new("invalid-edge", "edges must run from a check node to a data node")
                    .with_context("source", check.to_string())
                    .with_context("target", data.to_string()),
            ));
        }
        self.nodes.insert(check);
        self.nodes.insert(data);
        if value.is_trivial() {
            if let Some(targets) = self.edges.get_mut(&check) {
                targets.remove(&data);
            }
        } else {
            self.edges.entry(check).or_default().insert(data, value);
        }
        Ok(())
    }

    /// All nodes in sorted order: data nodes first.
    pub fn nodes(&self) -> impl Iterator<Item = Node> + '_ {
        self.nodes.iter().copied()
    }

    /// Number of data nodes.
    pub fn num_data_nodes(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_data).count()
    }

    /// Number of check nodes.
    pub fn num_check_nodes(&self) -> usize {
        self.nodes.len() - self.num_data_nodes()
    }

    /// Number of stored edges.
    pub fn num_edges(&self) -> usize {
        self.edges.values().map(BTreeMap::len).sum()
    }

    /// Iterates over `(check, data, value)` triples in sorted order.
    pub fn edges(&self) -> impl Iterator<Item = (Node, Node, V)> + '_ {
        self.edges.iter().flat_map(|(&check, targets)| {
            targets.iter().map(move |(&data, &value)| (check, data, value))
        })
    }

    /// Value of the edge from `check` to `data`, if any.
    pub fn edge(&self, check: Node, data: Node) -> Option<V> {
        self.edges.get(&check).and_then(|targets| targets.get(&data)).copied()
    }

    /// Sorted neighbors of a node.
    pub fn neighbors(&self, node: Node) -> Vec<Node> {
        if node.is_data {
            self.edges
                .iter()
                .filter(|(_, targets)| targets.contains_key(&node))
                .map(|(&check, _)| check)
                .collect()
        } else {
            self.edges
                .get(&node)
                .map(|targets| targets.keys().copied().collect())
                .unwrap_or_default()
        }
    }

    /// Verifies that node indices are dense and returns `(num_checks, num_data)`.
    pub(crate) fn dense_shape(&self) -> Result<(usize, usize), QldpcError> {
        let num_data = self.num_data_nodes();
        let num_checks = self.num_check_nodes();
        for node in &self.nodes {
            let bound = if node.is_data { num_data } else { num_checks };
            if node.index >= bound {
                return Err(QldpcError::Graph(
                    ErrorInfo::new("sparse-node-indices", "node indices must be contiguous")
                        .with_context("node", node.to_string())
                        .with_context("bound", bound.to_string()),
                ));
            }
        }
        Ok((num_checks, num_data))
    }
}

impl ClassicalGraph {
    /// Tanner graph of a classical parity check matrix.
    ///
    /// Check node `c` and bit node `b` share an edge iff `matrix[c, b] != 0`.
    pub fn from_matrix(matrix: &FieldMatrix) -> Self {
        let mut graph = Self::new(matrix.field());
        graph.nodes.extend((0..matrix.rows()).map(Node::check));
        graph.nodes.extend((0..matrix.cols()).map(Node::data));
        for (row, col, value) in matrix.nonzero_entries() {
            graph
                .edges
                .entry(Node::check(row))
                .or_default()
                .insert(Node::data(col), value);
        }
        graph
    }

    /// Parity check matrix of this graph.
    pub fn to_matrix(&self) -> Result<FieldMatrix, QldpcError> {
        let (rows, cols) = self.dense_shape()?;
        let mut matrix = FieldMatrix::zeros(&self.field, rows, cols);
        for (check, data, value) in self.edges() {
            matrix.set(check.index, data.index, value);
        }
        Ok(matrix)
    }
}

impl QuditGraph {
    /// Tanner graph of a qudit parity check matrix `[H_x | H_z]`.
    pub fn from_matrix(matrix: &FieldMatrix) -> Result<Self, QldpcError> {
        if matrix.cols() % 2 != 0 {
            return Err(QldpcError::Graph(
                ErrorInfo::new("odd-column-count", "qudit check matrices have 2n columns")
                    .with_context("cols", matrix.cols().to_string()),
            ));
        }
        let num_qudits = matrix.cols() / 2;
        let mut graph = Self::new(matrix.field());
        graph.nodes.extend((0..matrix.rows()).map(Node::check));
        graph.nodes.extend((0..num_qudits).map(Node::data));
        for row in 0..matrix.rows() {
            for qudit in 0..num_qudits {
                let op = QuditOperator::new(matrix.get(row, qudit), matrix.get(row, num_qudits + qudit));
                if !op.is_identity() {
                    graph
                        .edges
                        .entry(Node::check(row))
                        .or_default()
                        .insert(Node::data(qudit), op);
                }
            }
        }
        Ok(graph)
    }

    /// Parity check matrix `[H_x | H_z]` of this graph.
    pub fn to_matrix(&self) -> Result<FieldMatrix, QldpcError> {
        let (rows, num_qudits) = self.dense_shape()?;
        let mut matrix = FieldMatrix::zeros(&self.field, rows, 2 * num_qudits);
        for (check, qudit, op) in self.edges() {
            matrix.set(check.index, qudit.index, op.x);
            matrix.set(check.index, num_qudits + qudit.index, op.z);
        }
        Ok(matrix)
    }
}
