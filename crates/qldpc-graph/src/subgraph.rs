use std::collections::{BTreeMap, BTreeSet};

/// Explicit ordering label for the edges incident to a source node.
pub type SortKey = Vec<usize>;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum EdgeOrder<'a, T> {
    Key(&'a [usize]),
    Neighbor(&'a T),
}

/// Directed bipartite graph from source nodes to sink nodes, as used by classical Tanner codes.
///
/// The edges at every source are ordered by their sort key when present, and by the sink
/// otherwise. Keyed edges come before unkeyed ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subgraph<S, T> {
    adjacency: BTreeMap<S, BTreeMap<T, Option<SortKey>>>,
}

impl<S: Ord + Clone, T: Ord + Clone> Default for Subgraph<S, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Ord + Clone, T: Ord + Clone> Subgraph<S, T> {
    /// Creates an empty subgraph.
    pub fn new() -> Self {
        Self {
            adjacency: BTreeMap::new(),
        }
    }

    /// Adds an edge, overwriting the sort key of an existing edge between the same nodes.
    pub fn add_edge(&mut self, source: S, sink: T, sort: Option<SortKey>) {
        self.adjacency.entry(source).or_default().insert(sink, sort);
    }

    /// Source nodes in sorted order.
    pub fn sources(&self) -> impl Iterator<Item = &S> + '_ {
        self.adjacency.keys()
    }

    /// Sink nodes in sorted order.
    pub fn sinks(&self) -> BTreeSet<&T> {
        self.adjacency.values().flat_map(BTreeMap::keys).collect()
    }

    /// Number of sinks adjacent to a source.
    pub fn degree(&self, source: &S) -> usize {
        self.adjacency.get(source).map(BTreeMap::len).unwrap_or(0)
    }

    /// Total number of edges.
    pub fn num_edges(&self) -> usize {
        self.adjacency.values().map(BTreeMap::len).sum()
    }

    /// Sort key of an edge, if the edge exists and carries one.
    pub fn sort_key(&self, source: &S, sink: &T) -> Option<&SortKey> {
        self.adjacency.get(source)?.get(sink)?.as_ref()
    }

    /// Sinks adjacent to a source, in edge order.
    pub fn sorted_neighbors(&self, source: &S) -> Vec<&T> {
        let Some(targets) = self.adjacency.get(source) else {
            return Vec::new();
        };
        let mut neighbors: Vec<(EdgeOrder<'_, T>, &T)> = targets
            .iter()
            .map(|(sink, sort)| {
                let order = match sort {
                    Some(key) => EdgeOrder::Key(key.as_slice()),
                    None => EdgeOrder::Neighbor(sink),
                };
                (order, sink)
            })
            .collect();
        neighbors.sort_by(|lhs, rhs| lhs.0.cmp(&rhs.0));
        neighbors.into_iter().map(|(_, sink)| sink).collect()
    }
}

/// Unordered pair of nodes standing in for an edge of an undirected graph.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeNode<N>(N, N);

impl<N: Ord> EdgeNode<N> {
    /// Creates the edge node for `{a, b}`.
    pub fn new(a: N, b: N) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    /// The two endpoints, smaller first.
    pub fn endpoints(&self) -> (&N, &N) {
        (&self.0, &self.1)
    }
}

/// Edge of an undirected graph with optional per-endpoint sort keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndirectedEdge<N> {
    /// First endpoint.
    pub a: N,
    /// Second endpoint.
    pub b: N,
    /// Sort keys of the edge as seen from `a` and from `b`, respectively.
    pub sort: Option<(SortKey, SortKey)>,
}

impl<N> UndirectedEdge<N> {
    /// Unlabeled edge between two nodes.
    pub fn new(a: N, b: N) -> Self {
        Self { a, b, sort: None }
    }
}

impl<N: Ord + Clone> Subgraph<N, EdgeNode<N>> {
    /// Converts an undirected graph into a directed subgraph for the same Tanner code.
    ///
    /// Every vertex becomes a source and every edge becomes a sink adjacent to both of its
    /// endpoints.
    pub fn from_undirected(edges: impl IntoIterator<Item = UndirectedEdge<N>>) -> Self {
        let mut subgraph = Self::new();
        for edge in edges {
            let sink = EdgeNode::new(edge.a.clone(), edge.b.clone());
            let (sort_a, sort_b) = match edge.sort {
                Some((key_a, key_b)) => (Some(key_a), Some(key_b)),
                None => (None, None),
            };
            subgraph.add_edge(edge.a, sink.clone(), sort_a);
            subgraph.add_edge(edge.b, sink, sort_b);
        }
        subgraph
    }
}
