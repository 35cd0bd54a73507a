use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

use qldpc_core::errors::{ErrorInfo, QldpcError};
use qldpc_core::{FieldMatrix, GaloisField, RngHandle};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Member of a [`Group`], identified by its row in the Cayley table.
///
/// Index 0 is always the identity. Members are totally ordered by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Member(usize);

impl Member {
    /// Creates a member from its index.
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Index of this member in the Cayley table.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Finite group given by its multiplication table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    table: Vec<Vec<usize>>,
    inverses: Vec<usize>,
    generators: Vec<Member>,
}

fn group_error(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
}

fn binomial(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    (0..k.min(n - k)).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

impl Group {
    /// Builds a group from a Cayley table with the identity at index 0.
    ///
    /// Every row and column must be a permutation of `0..n`. Associativity is assumed.
    pub fn from_table(table: Vec<Vec<usize>>, generators: Vec<Member>) -> Result<Self, QldpcError> {
        let order = table.len();
        if order == 0 {
            return Err(QldpcError::Group(group_error(
                "empty-group",
                "a group needs at least one element",
            )));
        }
        for (row_idx, row) in table.iter().enumerate() {
            let distinct: BTreeSet<usize> = row.iter().copied().collect();
            if row.len() != order || distinct.len() != order || distinct.iter().any(|&v| v >= order) {
                return Err(QldpcError::Group(
                    group_error("invalid-cayley-table", "table rows must be permutations")
                        .with_context("row", row_idx.to_string()),
                ));
            }
            if row[0] != row_idx || table[0][row_idx] != row_idx {
                return Err(QldpcError::Group(
                    group_error("invalid-cayley-table", "element 0 must be the identity")
                        .with_context("row", row_idx.to_string()),
                ));
            }
        }
        let mut inverses = vec![0; order];
        for (idx, row) in table.iter().enumerate() {
            match row.iter().position(|&value| value == 0) {
                Some(inverse) => inverses[idx] = inverse,
                None => {
                    return Err(QldpcError::Group(
                        group_error("invalid-cayley-table", "element has no inverse")
                            .with_context("row", idx.to_string()),
                    ))
                }
            }
        }
        if let Some(bad) = generators.iter().find(|g| g.index() >= order) {
            return Err(QldpcError::Group(
                group_error("member-out-of-range", "generator is not a group member")
                    .with_context("member", bad.to_string())
                    .with_context("order", order.to_string()),
            ));
        }
        Ok(Self {
            table,
            inverses,
            generators,
        })
    }

    /// Closure of a set of permutations of `0..degree`.
    ///
    /// Products compose left to right: `(p * q)(i) = q(p(i))`. Members are numbered in
    /// breadth-first order from the identity, and member `i + 1` is the `i`-th generator when the
    /// generators are distinct and nontrivial.
    pub fn from_generators(generators: &[Vec<usize>]) -> Result<Self, QldpcError> {
        let degree = generators.first().map(Vec::len).unwrap_or(0);
        for (idx, perm) in generators.iter().enumerate() {
            let distinct: BTreeSet<usize> = perm.iter().copied().collect();
            if perm.len() != degree || distinct.len() != degree || distinct.iter().any(|&v| v >= degree) {
                return Err(QldpcError::Group(
                    group_error("invalid-permutation", "generator is not a permutation")
                        .with_context("generator", idx.to_string()),
                ));
            }
        }
        let compose = |p: &[usize], q: &[usize]| -> Vec<usize> { p.iter().map(|&i| q[i]).collect() };

        let identity: Vec<usize> = (0..degree).collect();
        let mut elements = vec![identity.clone()];
        let mut index: BTreeMap<Vec<usize>, usize> = BTreeMap::from([(identity, 0)]);
        let mut queue = VecDeque::from([0]);
        let mut generator_members = Vec::new();
        for perm in generators {
            let member = *index.entry(perm.clone()).or_insert_with(|| {
                elements.push(perm.clone());
                queue.push_back(elements.len() - 1);
                elements.len() - 1
            });
            generator_members.push(Member(member));
        }
        while let Some(current) = queue.pop_front() {
            for perm in generators {
                let next = compose(&elements[current], perm);
                if !index.contains_key(&next) {
                    index.insert(next.clone(), elements.len());
                    elements.push(next);
                    queue.push_back(elements.len() - 1);
                }
            }
        }

        let table = elements
            .iter()
            .map(|lhs| {
                elements
                    .iter()
                    .map(|rhs| index[&compose(lhs, rhs)])
                    .collect()
            })
            .collect();
        Self::from_table(table, generator_members)
    }

    /// The group with one element.
    pub fn trivial() -> Self {
        Self {
            table: vec![vec![0]],
            inverses: vec![0],
            generators: Vec::new(),
        }
    }

    /// Cyclic group Z_n, with member `i` representing `x^i`.
    pub fn cyclic(order: usize) -> Result<Self, QldpcError> {
        if order == 0 {
            return Err(QldpcError::Group(group_error(
                "empty-group",
                "cyclic groups need a positive order",
            )));
        }
        let table = (0..order)
            .map(|i| (0..order).map(|j| (i + j) % order).collect())
            .collect();
        let generators = if order > 1 { vec![Member(1)] } else { Vec::new() };
        Self::from_table(table, generators)
    }

    /// Dihedral group of order `2n`: the symmetries of a regular n-gon.
    pub fn dihedral(sides: usize) -> Result<Self, QldpcError> {
        if sides < 3 {
            return Err(QldpcError::Group(
                group_error("invalid-dihedral", "dihedral groups need at least three sides")
                    .with_context("sides", sides.to_string()),
            ));
        }
        let rotation = (0..sides).map(|i| (i + 1) % sides).collect();
        let reflection = (0..sides).map(|i| (sides - i) % sides).collect();
        Self::from_generators(&[rotation, reflection])
    }

    /// Direct product of cyclic groups `Z_{n_1} × Z_{n_2} × ...`.
    pub fn abelian(orders: &[usize]) -> Result<Self, QldpcError> {
        let mut group = Self::trivial();
        for &order in orders {
            group = Self::product(&group, &Self::cyclic(order)?);
        }
        Ok(group)
    }

    /// Direct product `A × B`; the pair `(a, b)` has index `a·|B| + b`.
    pub fn product(group_a: &Self, group_b: &Self) -> Self {
        let order_b = group_b.order();
        let order = group_a.order() * order_b;
        let table = (0..order)
            .map(|lhs| {
                (0..order)
                    .map(|rhs| {
                        let a = group_a.table[lhs / order_b][rhs / order_b];
                        let b = group_b.table[lhs % order_b][rhs % order_b];
                        a * order_b + b
                    })
                    .collect()
            })
            .collect();
        let inverses = (0..order)
            .map(|idx| group_a.inverses[idx / order_b] * order_b + group_b.inverses[idx % order_b])
            .collect();
        let generators = group_a
            .generators
            .iter()
            .map(|g| Member(g.index() * order_b))
            .chain(group_b.generators.iter().copied())
            .collect();
        Self {
            table,
            inverses,
            generators,
        }
    }

    /// Number of elements.
    pub fn order(&self) -> usize {
        self.table.len()
    }

    /// The identity element.
    pub fn identity(&self) -> Member {
        Member(0)
    }

    /// All members in index order.
    pub fn members(&self) -> impl Iterator<Item = Member> {
        (0..self.order()).map(Member)
    }

    /// Generators recorded at construction time.
    pub fn generators(&self) -> &[Member] {
        &self.generators
    }

    /// Validates that a member belongs to this group.
    pub fn check_member(&self, member: Member) -> Result<Member, QldpcError> {
        if member.index() >= self.order() {
            return Err(QldpcError::Group(
                group_error("member-out-of-range", "member does not belong to the group")
                    .with_context("member", member.to_string())
                    .with_context("order", self.order().to_string()),
            ));
        }
        Ok(member)
    }

    /// Group product `lhs · rhs`.
    pub fn mul(&self, lhs: Member, rhs: Member) -> Member {
        Member(self.table[lhs.0][rhs.0])
    }

    /// Group inverse.
    pub fn inv(&self, member: Member) -> Member {
        Member(self.inverses[member.0])
    }

    /// Integer power; negative exponents use the inverse.
    pub fn pow(&self, member: Member, exponent: i64) -> Member {
        let base = if exponent < 0 { self.inv(member) } else { member };
        let mut result = self.identity();
        let mut square = base;
        let mut remaining = exponent.unsigned_abs();
        while remaining > 0 {
            if remaining & 1 == 1 {
                result = self.mul(result, square);
            }
            square = self.mul(square, square);
            remaining >>= 1;
        }
        result
    }

    /// Order of a member: the least `k >= 1` with `g^k = e`.
    pub fn element_order(&self, member: Member) -> usize {
        let mut power = member;
        let mut order = 1;
        while power != self.identity() {
            power = self.mul(power, member);
            order += 1;
        }
        order
    }

    /// Order of the subgroup generated by the given members.
    pub fn subgroup_order(&self, generators: &[Member]) -> usize {
        let mut seen = BTreeSet::from([self.identity()]);
        let mut queue = VecDeque::from([self.identity()]);
        while let Some(current) = queue.pop_front() {
            for &generator in generators {
                let next = self.mul(current, generator);
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen.len()
    }

    /// Returns whether the group is abelian.
    pub fn is_abelian(&self) -> bool {
        (0..self.order()).all(|i| (0..i).all(|j| self.table[i][j] == self.table[j][i]))
    }

    /// Random subset `S` of non-identity members with `S = S⁻¹` and `|S| = size`.
    pub fn random_symmetric_subset(
        &self,
        size: usize,
        rng: &mut RngHandle,
    ) -> Result<Vec<Member>, QldpcError> {
        let mut involutions = Vec::new();
        let mut pairs = Vec::new();
        for member in self.members().skip(1) {
            let inverse = self.inv(member);
            if inverse == member {
                involutions.push(member);
            } else if member < inverse {
                pairs.push((member, inverse));
            }
        }

        // weigh each pair count by the number of subsets it admits, for a uniform draw
        let min_pairs = size.saturating_sub(involutions.len()).div_ceil(2);
        let max_pairs = (size / 2).min(pairs.len());
        let weights: Vec<f64> = (min_pairs..=max_pairs)
            .map(|num_pairs| binomial(pairs.len(), num_pairs) * binomial(involutions.len(), size - 2 * num_pairs))
            .collect();
        let num_pairs = match WeightedIndex::new(&weights) {
            Ok(distribution) => min_pairs + distribution.sample(rng.inner_mut()),
            Err(_) => {
                return Err(QldpcError::Group(
                    group_error("invalid-subset-size", "no symmetric subset of the requested size")
                        .with_context("size", size.to_string())
                        .with_context("order", self.order().to_string()),
                ))
            }
        };
        let num_involutions = size - 2 * num_pairs;
        pairs.shuffle(rng.inner_mut());
        involutions.shuffle(rng.inner_mut());

        let mut subset: Vec<Member> = pairs[..num_pairs]
            .iter()
            .flat_map(|&(member, inverse)| [member, inverse])
            .chain(involutions[..num_involutions].iter().copied())
            .collect();
        subset.sort();
        Ok(subset)
    }

    /// Regular representation of a member: `lift(g)[i][j] = 1` iff `j = i · g`.
    ///
    /// This is a homomorphism, `lift(g · h) = lift(g) · lift(h)`.
    pub fn lift(&self, member: Member, field: &GaloisField) -> FieldMatrix {
        let mut matrix = FieldMatrix::zeros(field, self.order(), self.order());
        for row in 0..self.order() {
            matrix.set(row, self.table[row][member.0], 1);
        }
        matrix
    }
}
