use qldpc_core::errors::{ErrorInfo, QldpcError};
use qldpc_core::GaloisField;
use serde::{Deserialize, Serialize};

use crate::ids::Node;
use crate::tanner::{EdgeValue, TannerGraph};

/// Serializes the graph to a compact binary representation using `bincode`.
pub fn graph_to_bytes<V: EdgeValue>(graph: &TannerGraph<V>) -> Result<Vec<u8>, QldpcError> {
    let serializable = SerializableGraph::from_graph(graph);
    bincode::serialize(&serializable)
        .map_err(|err| QldpcError::Serde(ErrorInfo::new("serialize-bytes", err.to_string())))
}

/// Restores a graph from its binary representation.
pub fn graph_from_bytes<V: EdgeValue>(bytes: &[u8]) -> Result<TannerGraph<V>, QldpcError> {
    let serializable: SerializableGraph<V> = bincode::deserialize(bytes)
        .map_err(|err| QldpcError::Serde(ErrorInfo::new("deserialize-bytes", err.to_string())))?;
    serializable.into_graph()
}

/// Serializes the graph to a JSON string.
pub fn graph_to_json<V: EdgeValue>(graph: &TannerGraph<V>) -> Result<String, QldpcError> {
    let serializable = SerializableGraph::from_graph(graph);
    serde_json::to_string_pretty(&serializable)
        .map_err(|err| QldpcError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
}

/// Restores a graph from a JSON string.
pub fn graph_from_json<V: EdgeValue>(json: &str) -> Result<TannerGraph<V>, QldpcError> {
    let serializable: SerializableGraph<V> = serde_json::from_str(json)
        .map_err(|err| QldpcError::Serde(ErrorInfo::new("deserialize-json", err.to_string())))?;
    serializable.into_graph()
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(bound = "V: EdgeValue")]
struct SerializableGraph<V> {
    field_order: u32,
    nodes: Vec<Node>,
    edges: Vec<SerializableEdge<V>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(bound = "V: EdgeValue")]
struct SerializableEdge<V> {
    check: usize,
    data: usize,
    value: V,
}

impl<V: EdgeValue> SerializableGraph<V> {
    fn from_graph(graph: &TannerGraph<V>) -> Self {
        Self {
            field_order: graph.field().order(),
            nodes: graph.nodes().collect(),
            edges: graph
                .edges()
                .map(|(check, data, value)| SerializableEdge {
                    check: check.index,
                    data: data.index,
                    value,
                })
                .collect(),
        }
    }

    fn into_graph(self) -> Result<TannerGraph<V>, QldpcError> {
        let field = GaloisField::new(self.field_order)?;
        let mut graph = TannerGraph::new(&field);
        for node in self.nodes {
            graph.add_node(node);
        }
        for edge in self.edges {
            let bad = edge
                .value
                .components()
                .into_iter()
                .find(|&component| component >= field.order());
            if let Some(component) = bad {
                return Err(QldpcError::Serde(
                    ErrorInfo::new("element-out-of-range", "edge value is not a field element")
                        .with_context("value", component.to_string())
                        .with_context("field", field.to_string()),
                ));
            }
            graph.add_edge(Node::check(edge.check), Node::data(edge.data), edge.value)?;
        }
        Ok(graph)
    }
}
