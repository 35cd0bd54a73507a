use qldpc_core::errors::QldpcError;
use sha2::{Digest, Sha256};

use crate::ids::Node;
use crate::tanner::{EdgeValue, TannerGraph};

/// Computes the canonical structural hash for the provided graph.
///
/// The hash covers the field order, the sorted node set and the sorted edge list with edge
/// values, so two graphs hash equally iff they are equal.
pub fn canonical_graph_hash<V: EdgeValue>(graph: &TannerGraph<V>) -> Result<String, QldpcError> {
    let mut hasher = Sha256::new();
    hasher.update(b"qldpc-tanner-graph");
    hasher.update(graph.field().order().to_le_bytes());

    let nodes: Vec<Node> = graph.nodes().collect();
    hasher.update((nodes.len() as u64).to_le_bytes());
    for node in nodes {
        encode_node(node, &mut hasher);
    }

    hasher.update((graph.num_edges() as u64).to_le_bytes());
    for (check, data, value) in graph.edges() {
        encode_node(check, &mut hasher);
        encode_node(data, &mut hasher);
        let components = value.components();
        hasher.update((components.len() as u64).to_le_bytes());
        for component in components {
            hasher.update(component.to_le_bytes());
        }
    }

    Ok(format!("{:x}", hasher.finalize()))
}

fn encode_node(node: Node, hasher: &mut Sha256) {
    hasher.update([u8::from(node.is_data)]);
    hasher.update((node.index as u64).to_le_bytes());
}
