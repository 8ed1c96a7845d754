//! Deterministic nonce sequences.
//!
//! The sequence is seeded from the caller's scratch seed and both
//! fingerprints, so the same inputs always yield the same nonces.

use core::fmt;

use crate::hash::{mix128, MIX_LEN};

/// Raw nonce length in bytes.
pub const NONCE_LEN: usize = MIX_LEN;

/// Nonce length once rendered as hex.
pub const NONCE_HEX_LEN: usize = NONCE_LEN * 2;

/// Length of the caller-supplied scratch seed.
pub const SEED_LEN: usize = 32;

/// A raw nonce.
pub type Nonce = [u8; NONCE_LEN];

/// How the nonce advances between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NonceStrategy {
    /// Attempt number, little-endian, over the first 8 bytes of the seed.
    #[default]
    Counter,
    /// Each nonce is the mixing hash of the previous one.
    ChainedHash,
}

impl NonceStrategy {
    /// Every strategy, in declaration order.
    pub const ALL: [NonceStrategy; 2] = [NonceStrategy::Counter, NonceStrategy::ChainedHash];

    /// Short name for logs and command-line flags.
    pub fn name(&self) -> &'static str {
        match self {
            NonceStrategy::Counter => "counter",
            NonceStrategy::ChainedHash => "chained",
        }
    }

    /// Parse a name produced by [`NonceStrategy::name`].
    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|strategy| strategy.name() == s)
    }
}

impl fmt::Display for NonceStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Derive the initial nonce.
///
/// Mixes, in order: the scratch seed, the address fingerprint text, the
/// block hash fingerprint text, and an all-zero nonce.
pub fn seed_nonce(scratch_seed: &[u8; SEED_LEN], address_hex: &str, block_hash_hex: &str) -> Nonce {
    mix128(&[
        &scratch_seed[..],
        address_hex.as_bytes(),
        block_hash_hex.as_bytes(),
        &[0u8; NONCE_LEN][..],
    ])
}

/// Infinite nonce sequence for one mining run.
#[derive(Debug, Clone)]
pub struct NonceGenerator {
    strategy: NonceStrategy,
    current: Nonce,
    attempts: u64,
}

impl NonceGenerator {
    /// Start a sequence from an already-derived seed nonce.
    pub fn new(strategy: NonceStrategy, seed: Nonce) -> Self {
        NonceGenerator {
            strategy,
            current: seed,
            attempts: 0,
        }
    }

    /// Start a sequence from the raw mining inputs.
    pub fn from_inputs(
        strategy: NonceStrategy,
        scratch_seed: &[u8; SEED_LEN],
        address_hex: &str,
        block_hash_hex: &str,
    ) -> Self {
        Self::new(strategy, seed_nonce(scratch_seed, address_hex, block_hash_hex))
    }

    /// Move to the next nonce and return it.
    #[inline]
    pub fn advance(&mut self) -> &Nonce {
        self.attempts = self.attempts.wrapping_add(1);
        match self.strategy {
            NonceStrategy::Counter => {
                self.current[..8].copy_from_slice(&self.attempts.to_le_bytes());
            }
            NonceStrategy::ChainedHash => {
                // The seed itself is the first attempt.
                if self.attempts > 1 {
                    self.current = mix128(&[&self.current[..]]);
                }
            }
        }
        &self.current
    }

    /// Number of nonces handed out so far.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// The configured update strategy.
    pub fn strategy(&self) -> NonceStrategy {
        self.strategy
    }
}

impl Iterator for NonceGenerator {
    type Item = Nonce;

    fn next(&mut self) -> Option<Nonce> {
        Some(*self.advance())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    const ADDRESS: &str = "00000000000000000000000000000000000000000000000000000000";
    const BLOCK: &str = "0123456789abcdef0123456789abcdef0123456789abcdef01234567";

    #[test]
    fn test_seed_mixes_all_inputs() {
        let seed = seed_nonce(&[0u8; SEED_LEN], ADDRESS, BLOCK);
        assert_ne!(seed, seed_nonce(&[1u8; SEED_LEN], ADDRESS, BLOCK));
        assert_ne!(seed, seed_nonce(&[0u8; SEED_LEN], BLOCK, ADDRESS));
        assert_eq!(seed, seed_nonce(&[0u8; SEED_LEN], ADDRESS, BLOCK));
    }

    #[test]
    fn test_counter_sequence() {
        let seed = [0xAA; NONCE_LEN];
        let nonces: Vec<Nonce> = NonceGenerator::new(NonceStrategy::Counter, seed)
            .take(3)
            .collect();

        for (i, nonce) in nonces.iter().enumerate() {
            let n = i as u64 + 1;
            assert_eq!(&nonce[..8], &n.to_le_bytes());
            assert_eq!(&nonce[8..], &seed[8..]);
        }
    }

    #[test]
    fn test_counter_is_reproducible() {
        let scratch = [7u8; SEED_LEN];
        let a: Vec<Nonce> = NonceGenerator::from_inputs(NonceStrategy::Counter, &scratch, ADDRESS, BLOCK)
            .take(100)
            .collect();
        let b: Vec<Nonce> = NonceGenerator::from_inputs(NonceStrategy::Counter, &scratch, ADDRESS, BLOCK)
            .take(100)
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_chained_sequence() {
        let seed = [0x11; NONCE_LEN];
        let mut generator = NonceGenerator::new(NonceStrategy::ChainedHash, seed);

        assert_eq!(*generator.advance(), seed);
        let second = *generator.advance();
        assert_eq!(second, mix128(&[&seed[..]]));
        assert_eq!(*generator.advance(), mix128(&[&second[..]]));
        assert_eq!(generator.attempts(), 3);
    }

    #[test]
    fn test_strategy_names() {
        for strategy in NonceStrategy::ALL {
            assert_eq!(NonceStrategy::from_name(strategy.name()), Some(strategy));
        }
        assert_eq!(NonceStrategy::default(), NonceStrategy::Counter);
    }
}
