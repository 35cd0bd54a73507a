//! Seeded randomness for random codes, subset sampling and decoding.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// Substream of a session seed that draws random codewords and error vectors.
pub const SESSION_SUBSTREAM: u64 = 0;
/// Substream of a session seed that drives information-set selection.
pub const DECODER_SUBSTREAM: u64 = 1;

/// Seeded generator passed to `ClassicalCode::random`, `Group::random_symmetric_subset`
/// and the information-set decoder.
///
/// Nothing in the workspace reads entropy from the OS. A decode session splits its seed
/// into [`SESSION_SUBSTREAM`] and [`DECODER_SUBSTREAM`] so that distance bounds and
/// logical operators found with a given seed are the same on every platform.
#[derive(Debug, Clone)]
pub struct RngHandle {
    rng: StdRng,
}

impl RngHandle {
    /// Seeds the handle directly.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeds the handle from one substream of `master_seed`.
    pub fn substream(master_seed: u64, substream: u64) -> Self {
        Self::from_seed(derive_substream_seed(master_seed, substream))
    }

    /// Underlying `StdRng`, for `rand` helpers that need a concrete generator.
    pub fn inner_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

impl RngCore for RngHandle {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

/// SipHash-1-3 with zero keys over `(master_seed, substream)`.
pub fn derive_substream_seed(master_seed: u64, substream: u64) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write_u64(master_seed);
    hasher.write_u64(substream);
    hasher.finish()
}
