#![deny(missing_docs)]
#![doc = "Tanner graphs for classical and qudit codes, their hypergraph products, and the directed subgraphs that define classical Tanner codes."]

mod hash;
mod ids;
mod operator;
mod product;
mod serialization;
mod subgraph;
mod tanner;

pub use hash::canonical_graph_hash;
pub use ids::Node;
pub use operator::QuditOperator;
pub use product::{graph_product, product_node_map};
pub use subgraph::{EdgeNode, SortKey, Subgraph, UndirectedEdge};
pub use tanner::{ClassicalGraph, EdgeValue, QuditGraph, TannerGraph};

/// Re-export serialization helpers for downstream crates.
pub use serialization::{graph_from_bytes, graph_from_json, graph_to_bytes, graph_to_json};
