use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;

use itertools::iproduct;
use qldpc_core::errors::{ErrorInfo, QldpcError};
use serde::{Deserialize, Serialize};

use crate::group::{Group, Member};

/// Vertex of a Cayley complex: a group member on one side of the bipartition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Vertex {
    /// Group member at this vertex.
    pub member: Member,
    /// Side of the bipartition, 0 or 1.
    pub side: u8,
}

/// Square face `{g, ag, gb, agb}` of a Cayley complex, stored as a sorted vertex set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Face(Vec<Vertex>);

impl Face {
    /// Vertices of the face in sorted order.
    pub fn vertices(&self) -> &[Vertex] {
        &self.0
    }
}

/// Left-right Cayley complex of a group with symmetric generating subsets `A` and `B`.
///
/// Vertices are adjacent when they differ by left multiplication with `a ∈ A` or by right
/// multiplication with `b ∈ B`. When this graph is bipartite (and a double cover is not
/// requested), its two-colouring defines the sides. Otherwise every member appears on both
/// sides and each multiplication switches side.
#[derive(Debug, Clone)]
pub struct CayleyComplex {
    group: Arc<Group>,
    subset_a: Vec<Member>,
    subset_b: Vec<Member>,
    colouring: Option<Vec<u8>>,
}

impl CayleyComplex {
    /// Builds the complex. With `bipartite`, the double-cover construction is always used.
    pub fn new(
        group: &Arc<Group>,
        subset_a: &[Member],
        subset_b: &[Member],
        bipartite: bool,
    ) -> Result<Self, QldpcError> {
        let subset_a = Self::symmetric_subset(group, subset_a, "A")?;
        let subset_b = Self::symmetric_subset(group, subset_b, "B")?;
        let mut complex = Self {
            group: Arc::clone(group),
            subset_a,
            subset_b,
            colouring: None,
        };
        if !bipartite {
            complex.colouring = complex.two_colouring();
        }
        Ok(complex)
    }

    fn symmetric_subset(
        group: &Group,
        subset: &[Member],
        label: &str,
    ) -> Result<Vec<Member>, QldpcError> {
        let mut sorted = Vec::with_capacity(subset.len());
        for &member in subset {
            sorted.push(group.check_member(member)?);
        }
        sorted.sort();
        sorted.dedup();
        if sorted.is_empty() || sorted.contains(&group.identity()) {
            return Err(QldpcError::Group(
                ErrorInfo::new(
                    "invalid-subset",
                    "generating subsets must be nonempty and exclude the identity",
                )
                .with_context("subset", label),
            ));
        }
        if let Some(&member) = sorted.iter().find(|&&member| sorted.binary_search(&group.inv(member)).is_err()) {
            return Err(QldpcError::Group(
                ErrorInfo::new("asymmetric-subset", "generating subsets must be closed under inversion")
                    .with_context("subset", label)
                    .with_context("member", member.to_string()),
            ));
        }
        Ok(sorted)
    }

    fn two_colouring(&self) -> Option<Vec<u8>> {
        let order = self.group.order();
        let mut colours: Vec<Option<u8>> = vec![None; order];
        for start in 0..order {
            if colours[start].is_some() {
                continue;
            }
            colours[start] = Some(0);
            let mut queue = VecDeque::from([Member::from_index(start)]);
            while let Some(current) = queue.pop_front() {
                let colour = colours[current.index()]?;
                let neighbors = self
                    .subset_a
                    .iter()
                    .map(|&a| self.group.mul(a, current))
                    .chain(self.subset_b.iter().map(|&b| self.group.mul(current, b)));
                for neighbor in neighbors {
                    match colours[neighbor.index()] {
                        None => {
                            colours[neighbor.index()] = Some(1 - colour);
                            queue.push_back(neighbor);
                        }
                        Some(existing) if existing == colour => return None,
                        Some(_) => {}
                    }
                }
            }
        }
        colours.into_iter().collect()
    }

    /// Underlying group.
    pub fn group(&self) -> &Arc<Group> {
        &self.group
    }

    /// Sorted subset acting by left multiplication.
    pub fn subset_a(&self) -> &[Member] {
        &self.subset_a
    }

    /// Sorted subset acting by right multiplication.
    pub fn subset_b(&self) -> &[Member] {
        &self.subset_b
    }

    /// Returns whether the complex is built on a double cover of the group.
    pub fn is_double_cover(&self) -> bool {
        self.colouring.is_none()
    }

    /// Total no-conjugacy: no member of `A` is conjugate to a member of `B`.
    ///
    /// Under this condition the faces `{g, ag, gb, agb}` are proper squares, and quantum
    /// Tanner codes built on the complex have commuting checks.
    pub fn satisfies_total_no_conjugacy(&self) -> bool {
        self.group.members().all(|g| {
            let g_inv = self.group.inv(g);
            self.subset_a.iter().all(|&a| {
                let conjugate = self.group.mul(self.group.mul(g_inv, a), g);
                self.subset_b.binary_search(&conjugate).is_err()
            })
        })
    }

    /// Vertex holding a member; in a double cover, the copy on the given side.
    pub fn vertex(&self, member: Member, side: u8) -> Vertex {
        match &self.colouring {
            Some(colours) => Vertex {
                member,
                side: colours[member.index()],
            },
            None => Vertex { member, side },
        }
    }

    /// Vertex `a · v`.
    pub fn left(&self, a: Member, vertex: Vertex) -> Vertex {
        self.vertex(self.group.mul(a, vertex.member), 1 - vertex.side)
    }

    /// Vertex `v · b`.
    pub fn right(&self, vertex: Vertex, b: Member) -> Vertex {
        self.vertex(self.group.mul(vertex.member, b), 1 - vertex.side)
    }

    /// All vertices, sorted.
    pub fn vertices(&self) -> Vec<Vertex> {
        let mut vertices: Vec<Vertex> = match &self.colouring {
            Some(_) => self.group.members().map(|g| self.vertex(g, 0)).collect(),
            None => iproduct!(self.group.members(), 0..2u8)
                .map(|(member, side)| Vertex { member, side })
                .collect(),
        };
        vertices.sort();
        vertices
    }

    /// Vertices on side 0, sorted.
    pub fn side_zero_vertices(&self) -> Vec<Vertex> {
        self.vertices().into_iter().filter(|v| v.side == 0).collect()
    }

    /// Face `{v, a·v, v·b, a·v·b}`.
    pub fn face(&self, vertex: Vertex, a: Member, b: Member) -> Face {
        let left = self.left(a, vertex);
        let corners: BTreeSet<Vertex> = [vertex, left, self.right(vertex, b), self.right(left, b)]
            .into_iter()
            .collect();
        Face(corners.into_iter().collect())
    }

    /// All faces of the complex, sorted.
    pub fn faces(&self) -> BTreeSet<Face> {
        iproduct!(self.side_zero_vertices(), self.subset_a.iter(), self.subset_b.iter())
            .map(|(vertex, &a, &b)| self.face(vertex, a, b))
            .collect()
    }
}
