//! Galois fields GF(q) with q = p^n.
//!
//! Elements are represented by the integers `0..q`. For prime fields this is the usual
//! residue representation. For extension fields the base-p digits of an element are the
//! coefficients of its polynomial over GF(p), so digit i is the coefficient of `α^i` where
//! `α` is a root of the primitive polynomial selected at construction time.

use std::fmt;
use std::sync::Arc;

use crate::errors::{ErrorInfo, QldpcError};

/// Largest extension field supported by the table-based arithmetic.
pub const MAX_EXTENSION_ORDER: u32 = 1 << 16;

/// Order of the field used when a caller does not ask for another one.
pub const DEFAULT_FIELD_ORDER: u32 = 2;

#[derive(Debug)]
struct ExtensionTables {
    /// `exp[k] = α^k` for `k in 0..q-1`.
    exp: Vec<u32>,
    /// `log[α^k] = k`; entry 0 is unused.
    log: Vec<u32>,
    /// Low-order coefficients of the primitive polynomial, as a field element.
    tail: u32,
}

/// Finite field GF(q).
///
/// Cloning is cheap: extension tables are shared. Two fields compare equal iff they have the
/// same order, since finite fields of equal order are isomorphic and the element
/// representation is canonical for a given order.
#[derive(Clone)]
pub struct GaloisField {
    order: u32,
    characteristic: u32,
    degree: u32,
    tables: Option<Arc<ExtensionTables>>,
}

impl PartialEq for GaloisField {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

impl Eq for GaloisField {}

impl fmt::Debug for GaloisField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GF({})", self.order)
    }
}

impl fmt::Display for GaloisField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GF({})", self.order)
    }
}

impl Default for GaloisField {
    fn default() -> Self {
        Self::binary()
    }
}

impl GaloisField {
    /// Constructs the field with `order` elements.
    pub fn new(order: u32) -> Result<Self, QldpcError> {
        let (characteristic, degree) = prime_power(order).ok_or_else(|| {
            QldpcError::Field(
                ErrorInfo::new("invalid-field-order", "field order must be a prime power")
                    .with_context("order", order.to_string()),
            )
        })?;
        if degree == 1 {
            return Ok(Self {
                order,
                characteristic,
                degree,
                tables: None,
            });
        }
        if order > MAX_EXTENSION_ORDER {
            return Err(QldpcError::Field(
                ErrorInfo::new("field-too-large", "extension field exceeds supported size")
                    .with_context("order", order.to_string())
                    .with_context("max_order", MAX_EXTENSION_ORDER.to_string()),
            ));
        }
        let tables = build_tables(characteristic, degree, order);
        Ok(Self {
            order,
            characteristic,
            degree,
            tables: Some(Arc::new(tables)),
        })
    }

    /// The binary field GF(2).
    pub fn binary() -> Self {
        Self {
            order: 2,
            characteristic: 2,
            degree: 1,
            tables: None,
        }
    }

    /// Number of elements in the field.
    pub fn order(&self) -> u32 {
        self.order
    }

    /// Characteristic p of the field.
    pub fn characteristic(&self) -> u32 {
        self.characteristic
    }

    /// Extension degree n, with `order = p^n`.
    pub fn degree(&self) -> u32 {
        self.degree
    }

    /// Returns whether the field has prime order.
    pub fn is_prime(&self) -> bool {
        self.degree == 1
    }

    /// Iterates over all field elements in their integer representation.
    pub fn elements(&self) -> impl Iterator<Item = u32> {
        0..self.order
    }

    /// Converts an integer into a field element.
    ///
    /// Prime fields reduce the integer modulo p. Extension fields accept the integer
    /// representation `0..q` directly, and negative integers as additive inverses.
    pub fn element(&self, value: i64) -> Result<u32, QldpcError> {
        if self.is_prime() {
            return Ok(value.rem_euclid(self.order as i64) as u32);
        }
        let magnitude = value.unsigned_abs();
        if magnitude >= self.order as u64 {
            return Err(QldpcError::Field(
                ErrorInfo::new(
                    "element-out-of-range",
                    "integer does not represent an element of this extension field",
                )
                .with_context("value", value.to_string())
                .with_context("order", self.order.to_string()),
            ));
        }
        let element = magnitude as u32;
        Ok(if value < 0 { self.neg(element) } else { element })
    }

    /// Field addition.
    pub fn add(&self, a: u32, b: u32) -> u32 {
        if self.is_prime() {
            ((a as u64 + b as u64) % self.order as u64) as u32
        } else if self.characteristic == 2 {
            a ^ b
        } else {
            self.combine_digits(a, b, |x, y| (x + y) % self.characteristic)
        }
    }

    /// Field subtraction.
    pub fn sub(&self, a: u32, b: u32) -> u32 {
        self.add(a, self.neg(b))
    }

    /// Additive inverse.
    pub fn neg(&self, a: u32) -> u32 {
        if a == 0 {
            0
        } else if self.is_prime() {
            self.order - a
        } else if self.characteristic == 2 {
            a
        } else {
            self.combine_digits(a, 0, |x, _| (self.characteristic - x) % self.characteristic)
        }
    }

    /// Field multiplication.
    pub fn mul(&self, a: u32, b: u32) -> u32 {
        if a == 0 || b == 0 {
            return 0;
        }
        match &self.tables {
            None => ((a as u64 * b as u64) % self.order as u64) as u32,
            Some(tables) => {
                let period = self.order as usize - 1;
                let exponent = (tables.log[a as usize] + tables.log[b as usize]) as usize % period;
                tables.exp[exponent]
            }
        }
    }

    /// Multiplicative inverse. The inverse of zero is defined to be zero.
    pub fn inv(&self, a: u32) -> u32 {
        debug_assert!(a != 0, "zero has no multiplicative inverse");
        if a == 0 {
            return 0;
        }
        match &self.tables {
            None => self.pow(a, self.order as u64 - 2),
            Some(tables) => {
                let period = self.order - 1;
                let exponent = (period - tables.log[a as usize]) % period;
                tables.exp[exponent as usize]
            }
        }
    }

    /// Division `a / b` for nonzero `b`.
    pub fn div(&self, a: u32, b: u32) -> u32 {
        self.mul(a, self.inv(b))
    }

    /// Raises an element to a non-negative power.
    pub fn pow(&self, base: u32, mut exponent: u64) -> u32 {
        let mut result = 1;
        let mut square = base;
        while exponent > 0 {
            if exponent & 1 == 1 {
                result = self.mul(result, square);
            }
            square = self.mul(square, square);
            exponent >>= 1;
        }
        result
    }

    /// Dot product of two vectors over the field.
    pub fn dot(&self, lhs: &[u32], rhs: &[u32]) -> u32 {
        lhs.iter()
            .zip(rhs)
            .fold(0, |acc, (&a, &b)| self.add(acc, self.mul(a, b)))
    }

    /// Returns a generator of the multiplicative group.
    pub fn primitive_element(&self) -> u32 {
        if let Some(tables) = &self.tables {
            return tables.exp[1 % tables.exp.len()];
        }
        let period = self.order as u64 - 1;
        let factors = prime_factors(period);
        (1..self.order)
            .find(|&candidate| {
                factors
                    .iter()
                    .all(|&factor| self.pow(candidate, period / factor) != 1)
            })
            .unwrap_or(1)
    }

    /// Coefficients (low to high) of the primitive polynomial defining an extension field.
    pub fn modulus_coefficients(&self) -> Vec<u32> {
        let mut coefficients = vec![0; self.degree as usize + 1];
        coefficients[self.degree as usize] = 1;
        if let Some(tables) = &self.tables {
            let tail = self.neg(tables.tail);
            for (idx, digit) in digits(tail, self.characteristic, self.degree)
                .into_iter()
                .enumerate()
            {
                coefficients[idx] = digit;
            }
        }
        coefficients
    }

    fn combine_digits(&self, a: u32, b: u32, op: impl Fn(u32, u32) -> u32) -> u32 {
        let p = self.characteristic;
        let (mut a, mut b) = (a, b);
        let mut place = 1;
        let mut result = 0;
        for _ in 0..self.degree {
            result += op(a % p, b % p) * place;
            a /= p;
            b /= p;
            place *= p;
        }
        result
    }
}

fn digits(mut value: u32, base: u32, count: u32) -> Vec<u32> {
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        out.push(value % base);
        value /= base;
    }
    out
}

fn prime_power(order: u32) -> Option<(u32, u32)> {
    if order < 2 {
        return None;
    }
    let prime = smallest_prime_factor(order as u64) as u32;
    let mut remainder = order;
    let mut degree = 0;
    while remainder % prime == 0 {
        remainder /= prime;
        degree += 1;
    }
    (remainder == 1).then_some((prime, degree))
}

fn smallest_prime_factor(value: u64) -> u64 {
    let mut candidate = 2;
    while candidate * candidate <= value {
        if value % candidate == 0 {
            return candidate;
        }
        candidate += 1;
    }
    value
}

fn prime_factors(mut value: u64) -> Vec<u64> {
    let mut factors = Vec::new();
    while value > 1 {
        let factor = smallest_prime_factor(value);
        factors.push(factor);
        while value % factor == 0 {
            value /= factor;
        }
    }
    factors
}

/// Searches for a primitive polynomial `x^n - tail(x)` and builds log/antilog tables.
fn build_tables(p: u32, n: u32, q: u32) -> ExtensionTables {
    let top_place = q / p;
    let field_digits = |a: u32, b: u32, op: &dyn Fn(u32, u32) -> u32| -> u32 {
        let (mut a, mut b) = (a, b);
        let mut place = 1;
        let mut result = 0;
        for _ in 0..n {
            result += op(a % p, b % p) * place;
            a /= p;
            b /= p;
            place *= p;
        }
        result
    };

    // x^n == tail(x) modulo the polynomial, so multiplying by x shifts the digits up and
    // folds the overflowing top digit back in through `tail`.
    let times_x = |element: u32, tail: u32| -> u32 {
        let top = element / top_place;
        let shifted = (element % top_place) * p;
        let folded = field_digits(tail, 0, &|x, _| (x * top) % p);
        field_digits(shifted, folded, &|x, y| (x + y) % p)
    };

    for tail in 1..q {
        // the constant coefficient of a primitive polynomial is nonzero
        if tail % p == 0 {
            continue;
        }
        let mut exp = Vec::with_capacity(q as usize - 1);
        let mut current = 1;
        let mut primitive = true;
        for step in 0..q - 1 {
            if step > 0 && current == 1 {
                primitive = false;
                break;
            }
            exp.push(current);
            current = times_x(current, tail);
        }
        if !primitive || current != 1 {
            continue;
        }
        let mut log = vec![0; q as usize];
        for (power, &element) in exp.iter().enumerate() {
            log[element as usize] = power as u32;
        }
        return ExtensionTables { exp, log, tail };
    }
    unreachable!("every finite field has a primitive polynomial")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_field_axioms_hold() {
        for order in [4, 8, 9, 25] {
            let field = GaloisField::new(order).unwrap();
            for a in field.elements() {
                assert_eq!(field.add(a, field.neg(a)), 0);
                if a != 0 {
                    assert_eq!(field.mul(a, field.inv(a)), 1);
                }
                for b in field.elements() {
                    assert_eq!(field.mul(a, b), field.mul(b, a));
                    assert_eq!(field.add(a, b), field.add(b, a));
                }
            }
        }
    }

    #[test]
    fn distributive_law_in_gf9() {
        let field = GaloisField::new(9).unwrap();
        for a in field.elements() {
            for b in field.elements() {
                for c in field.elements() {
                    let lhs = field.mul(a, field.add(b, c));
                    let rhs = field.add(field.mul(a, b), field.mul(a, c));
                    assert_eq!(lhs, rhs);
                }
            }
        }
    }

    #[test]
    fn rejects_composite_orders() {
        assert!(GaloisField::new(6).is_err());
        assert!(GaloisField::new(1).is_err());
        assert_eq!(GaloisField::new(7).unwrap().degree(), 1);
        assert_eq!(GaloisField::new(16).unwrap().characteristic(), 2);
    }
}
