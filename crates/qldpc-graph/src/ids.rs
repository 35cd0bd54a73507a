use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Node of a Tanner graph: either a data node (bit or qudit) or a check node.
///
/// Nodes order data nodes before check nodes, and then by index. Graph products rely on this
/// order to lay out their sectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    /// Index of the node among nodes of the same kind.
    pub index: usize,
    /// Whether this node is a data node.
    pub is_data: bool,
}

impl Node {
    /// Data node with the given index.
    pub const fn data(index: usize) -> Self {
        Self {
            index,
            is_data: true,
        }
    }

    /// Check node with the given index.
    pub const fn check(index: usize) -> Self {
        Self {
            index,
            is_data: false,
        }
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        (!self.is_data, self.index).cmp(&(!other.is_data, other.index))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.is_data { "d" } else { "c" };
        write!(f, "{label}_{}", self.index)
    }
}
