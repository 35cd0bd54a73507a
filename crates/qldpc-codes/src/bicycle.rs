use std::collections::BTreeSet;
use std::ops::{Add, Mul};
use std::sync::Arc;

use itertools::{iproduct, Itertools};
use qldpc_core::errors::{ErrorInfo, QldpcError};
use qldpc_core::{FieldMatrix, GaloisField, Pauli};
use qldpc_group::{Element, Group, Member};

use crate::abstract_code::AbstractCode;
use crate::classical::ClassicalCode;
use crate::css::CSSCode;

/// Generalized bicycle code with `matrix_x = [A, B]` and `matrix_z = [Bᵗ, -Aᵗ]`.
///
/// The checks commute iff `A` and `B` commute.
#[derive(Debug, Clone)]
pub struct GBCode {
    css: CSSCode,
    matrix_a: FieldMatrix,
    matrix_b: FieldMatrix,
}

impl GBCode {
    /// Builds the code from two commuting square matrices.
    pub fn new(
        matrix_a: FieldMatrix,
        matrix_b: FieldMatrix,
        conjugate: Vec<usize>,
    ) -> Result<Self, QldpcError> {
        if matrix_a.matmul(&matrix_b)? != matrix_b.matmul(&matrix_a)? {
            return Err(QldpcError::Code(
                ErrorInfo::new("non-commuting-generators", "bicycle matrices A and B do not commute")
                    .with_context("shape", format!("{}x{}", matrix_a.rows(), matrix_a.cols())),
            ));
        }
        let matrix_x = FieldMatrix::hstack(&[&matrix_a, &matrix_b])?;
        let matrix_z = FieldMatrix::hstack(&[&matrix_b.transpose(), &matrix_a.transpose().negated()])?;
        let css = CSSCode::new_unchecked(
            ClassicalCode::new(matrix_x),
            ClassicalCode::new(matrix_z),
            conjugate,
        )?;
        Ok(Self {
            css,
            matrix_a,
            matrix_b,
        })
    }

    /// Builds the code from the lifts of two group-algebra elements.
    pub fn from_elements(element_a: &Element, element_b: &Element) -> Result<Self, QldpcError> {
        Self::new(element_a.lift(), element_b.lift(), Vec::new())
    }

    /// Matrix `A`.
    pub fn matrix_a(&self) -> &FieldMatrix {
        &self.matrix_a
    }

    /// Matrix `B`.
    pub fn matrix_b(&self) -> &FieldMatrix {
        &self.matrix_b
    }

    /// The bicycle code as a CSS code.
    pub fn css(&self) -> &CSSCode {
        &self.css
    }

    /// Mutable access, for logical operator reduction.
    pub fn css_mut(&mut self) -> &mut CSSCode {
        &mut self.css
    }

    /// Consumes the bicycle code, keeping the CSS code.
    pub fn into_css(self) -> CSSCode {
        self.css
    }
}

/// Generator of one cyclic factor of the group of a quasi-cyclic code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    /// Generator of the first factor, of order `R_x`.
    X,
    /// Generator of the second factor, of order `R_y`.
    Y,
}

/// Bivariate polynomial expression in the generators `x` and `y`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Integer constant, reduced into the field.
    Const(i64),
    /// Integer power of a generator.
    Pow(Symbol, i64),
    /// Sum of terms.
    Sum(Vec<Expr>),
    /// Product of factors.
    Product(Vec<Expr>),
}

impl Expr {
    /// The generator `x`.
    pub fn x() -> Self {
        Expr::Pow(Symbol::X, 1)
    }

    /// The generator `y`.
    pub fn y() -> Self {
        Expr::Pow(Symbol::Y, 1)
    }

    /// Integer constant.
    pub fn constant(value: i64) -> Self {
        Expr::Const(value)
    }

    /// Monomial `x^i y^j`.
    pub fn monomial(x_exponent: i64, y_exponent: i64) -> Self {
        Expr::Product(vec![Expr::Pow(Symbol::X, x_exponent), Expr::Pow(Symbol::Y, y_exponent)])
    }

    /// Top-level terms of a sum; any other expression is a single term.
    pub fn terms(&self) -> Vec<&Expr> {
        match self {
            Expr::Sum(terms) => terms.iter().flat_map(Expr::terms).collect(),
            other => vec![other],
        }
    }

    /// Exponents `(i, j)` of a monomial `c x^i y^j`.
    pub fn exponents(&self) -> Result<(i64, i64), QldpcError> {
        match self {
            Expr::Const(_) => Ok((0, 0)),
            Expr::Pow(Symbol::X, exponent) => Ok((*exponent, 0)),
            Expr::Pow(Symbol::Y, exponent) => Ok((0, *exponent)),
            Expr::Product(factors) => factors.iter().try_fold((0, 0), |(i, j), factor| {
                let (di, dj) = factor.exponents()?;
                Ok((i + di, j + dj))
            }),
            Expr::Sum(_) => Err(QldpcError::Code(
                ErrorInfo::new("invalid-monomial", "a sum has no single pair of exponents"),
            )),
        }
    }
}

impl Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        let mut terms = match self {
            Expr::Sum(terms) => terms,
            other => vec![other],
        };
        match rhs {
            Expr::Sum(more) => terms.extend(more),
            other => terms.push(other),
        }
        Expr::Sum(terms)
    }
}

impl Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        let mut factors = match self {
            Expr::Product(factors) => factors,
            other => vec![other],
        };
        match rhs {
            Expr::Product(more) => factors.extend(more),
            other => factors.push(other),
        }
        Expr::Product(factors)
    }
}

/// Position of a qubit within a plaquette of a toric layout.
///
/// ```text
/// L X
/// Z R
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sector {
    /// Data qubits acted on by `A` in `matrix_x`.
    L,
    /// Data qubits acted on by `B` in `matrix_x`.
    R,
    /// X-type check qubits.
    X,
    /// Z-type check qubits.
    Z,
}

impl Sector {
    fn index(self) -> usize {
        match self {
            Sector::L => 0,
            Sector::R => 1,
            Sector::X => 2,
            Sector::Z => 3,
        }
    }

    fn data(block: usize) -> Self {
        if block == 0 {
            Sector::L
        } else {
            Sector::R
        }
    }

    fn check(pauli: Pauli) -> Self {
        match pauli {
            Pauli::X => Sector::X,
            Pauli::Z => Sector::Z,
        }
    }
}

/// Arrangement of the qubits of a quasi-cyclic code into plaquettes on a torus.
///
/// Built from generators `g = x^p y^q` and `h = x^u y^v` that decompose the group as
/// `x^i y^j = g^a h^b`, so that plaquette `(i, j)` moves to torus coordinates `(a, b)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToricLayout {
    orders: (usize, usize),
    torus_shape: (usize, usize),
    grid: Vec<(usize, usize)>,
    shifts: [(i64, i64); 4],
}

impl ToricLayout {
    /// Dimensions `(ord(g), ord(h))` of the torus.
    pub fn torus_shape(&self) -> (usize, usize) {
        self.torus_shape
    }

    /// Offset applied to the plaquettes of a sector before the change of coordinates.
    pub fn shift(&self, sector: Sector) -> (i64, i64) {
        self.shifts[sector.index()]
    }

    /// Torus coordinates of the plaquette holding the `sector` qubit of plaquette `(i, j)`.
    pub fn full_plaquette_map(&self, ii: usize, jj: usize, sector: Sector) -> (usize, usize) {
        let (rx, ry) = self.orders;
        let (di, dj) = self.shift(sector);
        let si = (ii as i64 - di).rem_euclid(rx as i64) as usize;
        let sj = (jj as i64 - dj).rem_euclid(ry as i64) as usize;
        let (aa, bb) = self.grid[si * ry + sj];
        (aa % self.torus_shape.0, bb % self.torus_shape.1)
    }
}

/// Relative positions of the data qubits addressed by X-type and Z-type checks.
pub type CheckShifts = (BTreeSet<(i64, i64)>, BTreeSet<(i64, i64)>);

/// Quasi-cyclic code: a generalized bicycle code over `Z_{R_x} × Z_{R_y}` whose matrices are
/// lifts of bivariate polynomials in the generators `x` and `y`.
///
/// Member `x^i y^j` of the group has index `i · R_y + j`.
#[derive(Debug, Clone)]
pub struct QCCode {
    bicycle: GBCode,
    orders: (usize, usize),
    group: Arc<Group>,
    field: GaloisField,
    poly_a: Expr,
    poly_b: Expr,
}

impl QCCode {
    /// Builds the code; with `conjugate`, the `R` sector qubits are Fourier-transformed.
    pub fn new(
        orders: (usize, usize),
        poly_a: Expr,
        poly_b: Expr,
        field: &GaloisField,
        conjugate: bool,
    ) -> Result<Self, QldpcError> {
        let group = Arc::new(Group::abelian(&[orders.0, orders.1])?);
        let matrix_a = eval_in(&group, field, orders, &poly_a)?.lift();
        let matrix_b = eval_in(&group, field, orders, &poly_b)?.lift();
        let order = group.order();
        let conjugate = if conjugate {
            (order..2 * order).collect()
        } else {
            Vec::new()
        };
        Ok(Self {
            bicycle: GBCode::new(matrix_a, matrix_b, conjugate)?,
            orders,
            group,
            field: field.clone(),
            poly_a,
            poly_b,
        })
    }

    /// Cyclic orders `(R_x, R_y)`.
    pub fn orders(&self) -> (usize, usize) {
        self.orders
    }

    /// The group `Z_{R_x} × Z_{R_y}`.
    pub fn group(&self) -> &Arc<Group> {
        &self.group
    }

    /// Polynomial defining `A`.
    pub fn poly_a(&self) -> &Expr {
        &self.poly_a
    }

    /// Polynomial defining `B`.
    pub fn poly_b(&self) -> &Expr {
        &self.poly_b
    }

    /// The underlying bicycle code.
    pub fn bicycle(&self) -> &GBCode {
        &self.bicycle
    }

    /// The code as a CSS code.
    pub fn css(&self) -> &CSSCode {
        self.bicycle.css()
    }

    /// Mutable access, for logical operator reduction.
    pub fn css_mut(&mut self) -> &mut CSSCode {
        self.bicycle.css_mut()
    }

    /// Consumes the code, keeping the CSS code.
    pub fn into_css(self) -> CSSCode {
        self.bicycle.into_css()
    }

    /// Evaluates an expression in the group algebra.
    pub fn eval(&self, expr: &Expr) -> Result<Element, QldpcError> {
        eval_in(&self.group, &self.field, self.orders, expr)
    }

    /// Group member `x^i y^j` for exponents taken modulo the cyclic orders.
    fn member_of(&self, (i, j): (i64, i64)) -> Member {
        let (rx, ry) = self.orders;
        let i = i.rem_euclid(rx as i64) as usize;
        let j = j.rem_euclid(ry as i64) as usize;
        Member::from_index(i * ry + j)
    }

    /// Every toric layout of this code.
    ///
    /// A pair of terms `(a_1, a_2)` of `A` and a pair `(b_1, b_2)` of `B` yield a layout when
    /// `g = a_1 a_2⁻¹` and `h = b_1 b_2⁻¹` generate the group with `ord(g) · ord(h) = |G|`.
    /// Codes with a disconnected Tanner graph have no layout.
    pub fn get_toric_mappings(&self) -> Result<Vec<ToricLayout>, QldpcError> {
        if !is_connected(self.css().matrix()) {
            return Ok(Vec::new());
        }
        let exponents_a = self.poly_a.terms().into_iter().map(Expr::exponents).collect::<Result<Vec<_>, _>>()?;
        let exponents_b = self.poly_b.terms().into_iter().map(Expr::exponents).collect::<Result<Vec<_>, _>>()?;
        let order = self.group.order();
        let (rx, ry) = (self.orders.0 as i64, self.orders.1 as i64);

        let mut layouts = Vec::new();
        for (pair_a, pair_b) in iproduct!(
            exponents_a.iter().tuple_combinations::<(_, _)>(),
            exponents_b.iter().tuple_combinations::<(_, _)>()
        ) {
            let (&(a1i, a1j), &(a2i, a2j)) = pair_a;
            let (&(b1i, b1j), &(b2i, b2j)) = pair_b;
            let (pp, qq) = (a1i - a2i, a1j - a2j);
            let (uu, vv) = (b1i - b2i, b1j - b2j);
            let gen_g = self.member_of((pp, qq));
            let gen_h = self.member_of((uu, vv));
            let torus_shape = (self.group.element_order(gen_g), self.group.element_order(gen_h));
            if torus_shape.0 * torus_shape.1 != order
                || self.group.subgroup_order(&[gen_g, gen_h]) != order
            {
                continue;
            }

            let mut grid = vec![(0, 0); order];
            for (aa, bb) in iproduct!(0..torus_shape.0, 0..torus_shape.1) {
                let ii = (aa as i64 * pp + bb as i64 * uu).rem_euclid(rx) as usize;
                let jj = (aa as i64 * qq + bb as i64 * vv).rem_euclid(ry) as usize;
                grid[ii * self.orders.1 + jj] = (aa, bb);
            }
            let shifts = [
                (0, 0),
                (b1i - a2i, b1j - a2j),
                (-a2i, -a2j),
                (b1i, b1j),
            ];
            layouts.push(ToricLayout {
                orders: self.orders,
                torus_shape,
                grid,
                shifts,
            });
        }
        Ok(layouts)
    }

    /// X-type and Z-type checks with checks and qubits relabeled by their torus coordinates.
    pub fn get_toric_checks(
        &self,
        layout: &ToricLayout,
    ) -> Result<(FieldMatrix, FieldMatrix), QldpcError> {
        let order = self.group.order();
        let ry = self.orders.1;
        let width = layout.torus_shape.1;
        let relabel = |pauli: Pauli, checks: &FieldMatrix| {
            let mut relabeled = FieldMatrix::zeros(checks.field(), checks.rows(), checks.cols());
            for (row, col, value) in checks.nonzero_entries() {
                let (c_a, c_b) = layout.full_plaquette_map(row / ry, row % ry, Sector::check(pauli));
                let (block, qubit) = (col / order, col % order);
                let (d_a, d_b) = layout.full_plaquette_map(qubit / ry, qubit % ry, Sector::data(block));
                relabeled.set(c_a * width + c_b, block * order + d_a * width + d_b, value);
            }
            relabeled
        };
        Ok((
            relabel(Pauli::X, self.css().matrix_x()),
            relabel(Pauli::Z, self.css().matrix_z()),
        ))
    }

    /// Position of the `sector` qubit of plaquette `(a, b)` on a `2 x 2`-per-plaquette grid.
    ///
    /// With `open_boundaries`, the torus is folded so that every check addresses qubits
    /// within a bounded distance on a planar layout.
    pub fn get_toric_qubit_pos(
        aa: usize,
        bb: usize,
        sector: Sector,
        torus_shape: (usize, usize),
        open_boundaries: bool,
    ) -> (usize, usize) {
        let (aa, bb) = (aa % torus_shape.0, bb % torus_shape.1);
        let mut xx = 2 * aa + usize::from(matches!(sector, Sector::X | Sector::R));
        let mut yy = 2 * bb + usize::from(matches!(sector, Sector::Z | Sector::R));
        if open_boundaries {
            xx = fold(xx, torus_shape.0);
            yy = fold(yy, torus_shape.1);
        }
        (xx, yy)
    }

    /// Relative positions of the data qubits addressed by X-type and Z-type checks.
    ///
    /// With periodic boundaries every plaquette looks the same and only one is inspected.
    pub fn get_check_shifts(
        &self,
        layout: &ToricLayout,
        open_boundaries: bool,
    ) -> Result<CheckShifts, QldpcError> {
        let (matrix_x, matrix_z) = self.get_toric_checks(layout)?;
        let order = self.group.order();
        let shape = layout.torus_shape;
        let plaquettes: Vec<(usize, usize)> = if open_boundaries {
            iproduct!(0..shape.0, 0..shape.1).collect()
        } else {
            vec![(0, 0)]
        };
        let period = (2 * shape.0 as i64, 2 * shape.1 as i64);
        let wrap = |delta: i64, period: i64| {
            let delta = delta.rem_euclid(period);
            if delta <= period / 2 {
                delta
            } else {
                delta - period
            }
        };

        let mut shifts = [BTreeSet::new(), BTreeSet::new()];
        for (pauli, checks) in [(Pauli::X, &matrix_x), (Pauli::Z, &matrix_z)] {
            for &(p_a, p_b) in &plaquettes {
                let (c_a, c_b) =
                    Self::get_toric_qubit_pos(p_a, p_b, Sector::check(pauli), shape, open_boundaries);
                let row = checks.row(p_a * shape.1 + p_b);
                for (col, _) in row.iter().enumerate().filter(|(_, &value)| value != 0) {
                    let (block, qubit) = (col / order, col % order);
                    let (d_a, d_b) = Self::get_toric_qubit_pos(
                        qubit / shape.1,
                        qubit % shape.1,
                        Sector::data(block),
                        shape,
                        open_boundaries,
                    );
                    shifts[pauli.block()].insert((
                        wrap(d_a as i64 - c_a as i64, period.0),
                        wrap(d_b as i64 - c_b as i64, period.1),
                    ));
                }
            }
        }
        let [shifts_x, shifts_z] = shifts;
        Ok((shifts_x, shifts_z))
    }
}

fn eval_in(
    group: &Arc<Group>,
    field: &GaloisField,
    orders: (usize, usize),
    expr: &Expr,
) -> Result<Element, QldpcError> {
    match expr {
        Expr::Const(value) => Ok(Element::one(group, field).scale(field.element(*value)?)),
        Expr::Pow(symbol, exponent) => {
            let generator = match symbol {
                Symbol::X => Member::from_index(orders.1),
                Symbol::Y => Member::from_index(1),
            };
            Ok(Element::from_member(group, field, group.pow(generator, *exponent)))
        }
        Expr::Sum(terms) => terms.iter().try_fold(Element::zero(group, field), |sum, term| {
            sum.add(&eval_in(group, field, orders, term)?)
        }),
        Expr::Product(factors) => factors.iter().try_fold(Element::one(group, field), |product, factor| {
            product.mul(&eval_in(group, field, orders, factor)?)
        }),
    }
}

fn fold(coordinate: usize, size: usize) -> usize {
    if coordinate < size {
        2 * coordinate
    } else {
        (2 * size - 1 - coordinate) * 2 + 1
    }
}

/// Returns whether the Tanner graph of an `[H_x | H_z]` matrix is connected.
fn is_connected(matrix: &FieldMatrix) -> bool {
    let num_qudits = matrix.cols() / 2;
    let num_nodes = matrix.rows() + num_qudits;
    if num_nodes == 0 {
        return true;
    }
    let mut parent: Vec<usize> = (0..num_nodes).collect();
    fn find(parent: &mut [usize], mut node: usize) -> usize {
        while parent[node] != node {
            parent[node] = parent[parent[node]];
            node = parent[node];
        }
        node
    }
    for (row, col, _) in matrix.nonzero_entries() {
        let check = find(&mut parent, row);
        let qudit = find(&mut parent, matrix.rows() + col % num_qudits);
        parent[check] = qudit;
    }
    let root = find(&mut parent, 0);
    (1..num_nodes).all(|node| find(&mut parent, node) == root)
}
