use std::collections::BTreeMap;
use std::sync::Arc;

use qldpc_core::errors::{ErrorInfo, QldpcError};
use qldpc_core::{FieldMatrix, GaloisField};

use crate::group::{Group, Member};

/// Element `Σ c_g · g` of the group algebra F[G].
///
/// Only nonzero coefficients are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    group: Arc<Group>,
    field: GaloisField,
    terms: BTreeMap<Member, u32>,
}

impl Element {
    /// The zero element.
    pub fn zero(group: &Arc<Group>, field: &GaloisField) -> Self {
        Self {
            group: Arc::clone(group),
            field: field.clone(),
            terms: BTreeMap::new(),
        }
    }

    /// The unit element `1 · e`.
    pub fn one(group: &Arc<Group>, field: &GaloisField) -> Self {
        Self::from_member(group, field, group.identity())
    }

    /// The element `1 · g`.
    pub fn from_member(group: &Arc<Group>, field: &GaloisField, member: Member) -> Self {
        let mut element = Self::zero(group, field);
        element.terms.insert(member, 1);
        element
    }

    /// Builds `Σ c · g` from `(g, c)` pairs; repeated members accumulate.
    pub fn from_terms(
        group: &Arc<Group>,
        field: &GaloisField,
        terms: impl IntoIterator<Item = (Member, u32)>,
    ) -> Result<Self, QldpcError> {
        let mut element = Self::zero(group, field);
        for (member, coefficient) in terms {
            group.check_member(member)?;
            if coefficient >= field.order() {
                return Err(QldpcError::Group(
                    ErrorInfo::new("element-out-of-range", "coefficient is not a field element")
                        .with_context("coefficient", coefficient.to_string())
                        .with_context("field", field.to_string()),
                ));
            }
            element.accumulate(member, coefficient);
        }
        Ok(element)
    }

    /// Group over which the algebra is defined.
    pub fn group(&self) -> &Arc<Group> {
        &self.group
    }

    /// Field of coefficients.
    pub fn field(&self) -> &GaloisField {
        &self.field
    }

    /// Coefficient of a member.
    pub fn coefficient(&self, member: Member) -> u32 {
        self.terms.get(&member).copied().unwrap_or(0)
    }

    /// Nonzero `(member, coefficient)` terms in member order.
    pub fn terms(&self) -> impl Iterator<Item = (Member, u32)> + '_ {
        self.terms.iter().map(|(&member, &coefficient)| (member, coefficient))
    }

    /// Returns whether every coefficient is zero.
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Sum of two elements.
    pub fn add(&self, other: &Self) -> Result<Self, QldpcError> {
        self.check_compatible(other)?;
        let mut sum = self.clone();
        for (member, coefficient) in other.terms() {
            sum.accumulate(member, coefficient);
        }
        Ok(sum)
    }

    /// Difference of two elements.
    pub fn sub(&self, other: &Self) -> Result<Self, QldpcError> {
        self.add(&other.neg())
    }

    /// Additive inverse.
    pub fn neg(&self) -> Self {
        self.scale(self.field.neg(1))
    }

    /// Multiplies every coefficient by a scalar.
    pub fn scale(&self, scalar: u32) -> Self {
        let mut scaled = Self::zero(&self.group, &self.field);
        for (member, coefficient) in self.terms() {
            scaled.accumulate(member, self.field.mul(coefficient, scalar));
        }
        scaled
    }

    /// Product `self · other` in the group algebra.
    pub fn mul(&self, other: &Self) -> Result<Self, QldpcError> {
        self.check_compatible(other)?;
        Ok(self.mul_same_algebra(other))
    }

    /// Non-negative integer power.
    pub fn pow(&self, exponent: u32) -> Self {
        let mut result = Self::one(&self.group, &self.field);
        for _ in 0..exponent {
            result = result.mul_same_algebra(self);
        }
        result
    }

    /// Adjoint `Σ c_g · g⁻¹`.
    pub fn adjoint(&self) -> Self {
        let mut adjoint = Self::zero(&self.group, &self.field);
        for (member, coefficient) in self.terms() {
            adjoint.accumulate(self.group.inv(member), coefficient);
        }
        adjoint
    }

    /// Regular-representation matrix `Σ c_g · lift(g)`.
    pub fn lift(&self) -> FieldMatrix {
        let order = self.group.order();
        let mut matrix = FieldMatrix::zeros(&self.field, order, order);
        for (member, coefficient) in self.terms() {
            for row in 0..order {
                let col = self.group.mul(Member::from_index(row), member).index();
                let value = self.field.add(matrix.get(row, col), coefficient);
                matrix.set(row, col, value);
            }
        }
        matrix
    }

    fn mul_same_algebra(&self, other: &Self) -> Self {
        let mut product = Self::zero(&self.group, &self.field);
        for (lhs, lhs_coefficient) in self.terms() {
            for (rhs, rhs_coefficient) in other.terms() {
                product.accumulate(
                    self.group.mul(lhs, rhs),
                    self.field.mul(lhs_coefficient, rhs_coefficient),
                );
            }
        }
        product
    }

    fn accumulate(&mut self, member: Member, coefficient: u32) {
        let value = self.field.add(self.coefficient(member), coefficient);
        if value == 0 {
            self.terms.remove(&member);
        } else {
            self.terms.insert(member, value);
        }
    }

    pub(crate) fn check_compatible(&self, other: &Self) -> Result<(), QldpcError> {
        if self.field != other.field {
            return Err(QldpcError::Group(
                ErrorInfo::new("field-mismatch", "group-algebra elements use different fields")
                    .with_context("lhs", self.field.to_string())
                    .with_context("rhs", other.field.to_string()),
            ));
        }
        if !Arc::ptr_eq(&self.group, &other.group) && self.group != other.group {
            return Err(QldpcError::Group(
                ErrorInfo::new("group-mismatch", "group-algebra elements use different groups")
                    .with_context("lhs_order", self.group.order().to_string())
                    .with_context("rhs_order", other.group.order().to_string()),
            ));
        }
        Ok(())
    }
}
