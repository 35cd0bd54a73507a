#![deny(missing_docs)]
#![doc = "Finite groups, group algebras over GF(q), protographs and Cayley complexes used by lifted-product and quantum Tanner code constructions."]

/// Finite groups represented by Cayley tables.
pub mod group;
/// Group-algebra elements and their regular-representation lifts.
pub mod algebra;
/// Matrices over a group algebra.
pub mod protograph;
/// Left-right Cayley complexes.
pub mod complex;

pub use algebra::Element;
pub use complex::{CayleyComplex, Face, Vertex};
pub use group::{Group, Member};
pub use protograph::Protograph;
