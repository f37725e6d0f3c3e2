//! Opaque identifier allocation.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{GroupId, RuleId};

/// URL-safe alphabet used for generated identifiers.
const ALPHABET: &[u8] = b"_-0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Length of generated identifiers. 21 symbols over a 64-symbol alphabet
/// gives the same collision resistance as a 126-bit random value.
const ID_LEN: usize = 21;

/// Allocator issuing opaque, collision-free identifiers for one store.
///
/// The allocator is a thin wrapper around `StdRng` that documents the
/// seeding policy: the default constructor seeds from OS entropy, while
/// [`IdAllocator::from_seed`] produces a reproducible stream for tests.
/// Issued identifiers are remembered so that uniqueness holds for the
/// lifetime of the allocator regardless of random collisions.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    rng: StdRng,
    issued: BTreeSet<String>,
}

impl IdAllocator {
    /// Creates an allocator seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            issued: BTreeSet::new(),
        }
    }

    /// Creates an allocator with a deterministic identifier stream.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            issued: BTreeSet::new(),
        }
    }

    /// Issues a fresh opaque identifier.
    pub fn allocate(&mut self) -> String {
        loop {
            let candidate: String = (0..ID_LEN)
                .map(|_| ALPHABET[self.rng.gen_range(0..ALPHABET.len())] as char)
                .collect();
            if self.issued.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    /// Issues a fresh rule identifier.
    pub fn allocate_rule(&mut self) -> RuleId {
        RuleId::from_raw(self.allocate())
    }

    /// Issues a fresh group identifier.
    pub fn allocate_group(&mut self) -> GroupId {
        GroupId::from_raw(self.allocate())
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
