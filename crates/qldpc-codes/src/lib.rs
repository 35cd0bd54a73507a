#![deny(missing_docs)]
#![doc = "Classical and quantum (CSS and general qudit) error-correcting codes over finite fields, their product constructions, and the concrete code families built from them."]

/// Common code interface and shared helpers.
pub mod abstract_code;
/// Generalized bicycle and quasi-cyclic codes.
pub mod bicycle;
/// Chain complexes and their tensor products.
pub mod chain;
/// Classical linear codes.
pub mod classical;
/// CSS codes, logical operators and distances.
pub mod css;
/// Concrete classical code families.
pub mod families;
/// Canonical hashing helpers for codes.
pub mod hash;
/// Hypergraph and lifted products.
pub mod products;
/// General stabilizer codes on qudits.
pub mod qudit;
/// Serialization routines for JSON and binary round-trips.
pub mod serde;
/// Surface, toric and higher-dimensional surface codes.
pub mod surface;
/// Classical and quantum Tanner codes.
pub mod tanner;

pub use abstract_code::{hamming_weight, AbstractCode};
pub use bicycle::{CheckShifts, Expr, GBCode, QCCode, Sector, Symbol, ToricLayout};
pub use chain::ChainComplex;
pub use classical::{ClassicalCode, Words};
pub use css::{CSSCode, LogicalOps};
pub use hash::{canonical_code_hash, canonical_css_hash};
pub use products::{HGPCode, LPCode, SectorSize};
pub use qudit::QuditCode;
pub use crate::serde::{
    classical_from_bytes, classical_from_json, classical_to_bytes, classical_to_json, from_bytes,
    from_json, to_bytes, to_json,
};
pub use surface::{GeneralizedSurfaceCode, SurfaceCode, ToricCode};
pub use tanner::{FaceSubgraph, QTCode, TannerCode};
