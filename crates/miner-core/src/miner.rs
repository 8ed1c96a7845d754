//! The nonce search loop.

use core::fmt;

use tracing::debug;

use crate::error::{ArgumentFault, MinerError};
use crate::hash::DIGEST_LEN;
use crate::hexbin::HexBin;
use crate::input::{parse_fingerprint, MiningInput, NonceHex};
use crate::nonce::{NonceGenerator, NonceStrategy, SEED_LEN};
use crate::search::{Needle, SearchStrategy, MAX_DIFFICULTY};

/// Iteration budget used when none is given.
pub const DEFAULT_MAX_ITERATIONS: u64 = 10_000_000;

/// Parameters for one mining run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinerConfig {
    /// Number of leading expanded-binary characters of the block hash that
    /// must appear in the digest's expansion.
    pub difficulty: usize,
    /// Attempts before giving up.
    pub max_iterations: u64,
    pub search: SearchStrategy,
    pub nonce: NonceStrategy,
}

impl MinerConfig {
    /// Config for `difficulty` with the default budget and strategies.
    pub fn new(difficulty: usize) -> Self {
        MinerConfig {
            difficulty,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            search: SearchStrategy::default(),
            nonce: NonceStrategy::default(),
        }
    }

    /// Set the attempt budget.
    pub fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the substring search strategy.
    pub fn with_search(mut self, search: SearchStrategy) -> Self {
        self.search = search;
        self
    }

    /// Set how nonces advance between attempts.
    pub fn with_nonce(mut self, nonce: NonceStrategy) -> Self {
        self.nonce = nonce;
        self
    }

    /// Check the numeric parameters.
    pub fn validate(&self) -> Result<(), ArgumentFault> {
        if self.difficulty > MAX_DIFFICULTY {
            return Err(ArgumentFault::DifficultyOutOfRange {
                difficulty: self.difficulty,
                max: MAX_DIFFICULTY,
            });
        }
        if self.max_iterations == 0 {
            return Err(ArgumentFault::ZeroIterations);
        }
        Ok(())
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A nonce satisfied the difficulty.
    Found,
    /// The budget ran out first.
    Exhausted,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Found => f.write_str("found"),
            Outcome::Exhausted => f.write_str("exhausted"),
        }
    }
}

/// Result of a mining run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiningResult {
    /// The winning nonce (if found).
    pub nonce: Option<NonceHex>,
    /// The winning digest (if found).
    pub digest: Option<[u8; DIGEST_LEN]>,
    /// Attempts made in this run.
    pub cycles: u64,
}

impl MiningResult {
    /// A run that used its whole budget without a match.
    pub fn exhausted(cycles: u64) -> Self {
        MiningResult {
            nonce: None,
            digest: None,
            cycles,
        }
    }

    /// A run that stopped on a match.
    pub fn solved(nonce: NonceHex, digest: [u8; DIGEST_LEN], cycles: u64) -> Self {
        MiningResult {
            nonce: Some(nonce),
            digest: Some(digest),
            cycles,
        }
    }

    /// Whether a nonce was found.
    pub fn found(&self) -> bool {
        self.nonce.is_some()
    }

    /// How the run ended.
    pub fn outcome(&self) -> Outcome {
        if self.found() {
            Outcome::Found
        } else {
            Outcome::Exhausted
        }
    }
}

/// A prepared search: inputs validated, needle compiled, nonces seeded.
///
/// All buffers live inside the value, so the loop never allocates and
/// separate miners share nothing.
#[derive(Debug, Clone)]
pub struct Miner {
    config: MinerConfig,
    input: MiningInput,
    nonces: NonceGenerator,
    needle: Needle,
    haystack: HexBin,
}

impl Miner {
    /// Validate everything and set up the buffers. No hashing happens here
    /// apart from seeding the nonce sequence.
    pub fn new(
        address_hex: &str,
        block_hash_hex: &str,
        config: MinerConfig,
        scratch_seed: &[u8; SEED_LEN],
    ) -> Result<Self, MinerError> {
        let block_hash = parse_fingerprint("block hash", block_hash_hex)?;
        let input = MiningInput::new(address_hex, &block_hash)?;
        config.validate()?;

        let target = HexBin::from_digest(&block_hash);
        let needle = Needle::new(&target.as_bytes()[..config.difficulty], config.search)?;
        let nonces =
            NonceGenerator::from_inputs(config.nonce, scratch_seed, address_hex, block_hash_hex);

        Ok(Miner {
            config,
            input,
            nonces,
            needle,
            haystack: HexBin::new(),
        })
    }

    /// Search using the configured budget.
    pub fn run(&mut self) -> MiningResult {
        self.mine_batch(self.config.max_iterations)
    }

    /// Try up to `budget` further nonces.
    ///
    /// The nonce sequence carries on from the previous batch, so a run split
    /// into batches visits the same nonces as one long run.
    pub fn mine_batch(&mut self, budget: u64) -> MiningResult {
        debug!(
            difficulty = self.config.difficulty,
            budget,
            search = %self.config.search,
            nonce = %self.config.nonce,
            "mining started"
        );

        for cycle in 1..=budget {
            let nonce = self.nonces.advance();
            self.input.set_nonce(nonce);

            let digest = self.input.digest();
            self.haystack.encode(&digest);

            if self.needle.is_found_in(self.haystack.as_bytes()) {
                let nonce = self.input.nonce_hex();
                debug!(cycles = cycle, %nonce, "solution found");
                return MiningResult::solved(nonce, digest, cycle);
            }
        }

        debug!(cycles = budget, "budget exhausted");
        MiningResult::exhausted(budget)
    }

    /// The validated configuration.
    pub fn config(&self) -> &MinerConfig {
        &self.config
    }

    /// The compiled block hash prefix being searched for.
    pub fn needle(&self) -> &Needle {
        &self.needle
    }

    /// Nonces tried across all batches.
    pub fn attempts(&self) -> u64 {
        self.nonces.attempts()
    }
}

/// Validate the inputs and run one search.
///
/// `scratch_seed` should differ between calls for the same job, e.g. the
/// previous result's buffer or fresh random bytes; identical inputs repeat
/// the identical search.
pub fn mine(
    address_hex: &str,
    block_hash_hex: &str,
    config: &MinerConfig,
    scratch_seed: &[u8; SEED_LEN],
) -> Result<MiningResult, MinerError> {
    let mut miner = Miner::new(address_hex, block_hash_hex, *config, scratch_seed)?;
    Ok(miner.run())
}
