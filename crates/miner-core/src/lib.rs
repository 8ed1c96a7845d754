//! Proof-of-work nonce search over expanded-binary digests.
//!
//! A miner looks for a nonce such that
//! `SHA-224(address_hex ‖ nonce_hex ‖ block_hash_hex)`, written in the
//! expanded-binary form described in [`hexbin`], contains the first
//! `difficulty` characters of the block hash's own expansion.
//!
//! This crate provides:
//! - Hex encoding and decoding of fingerprints
//! - The expanded-binary encoder
//! - Interchangeable substring search strategies
//! - Counter and chained-hash nonce sequences
//! - The allocation-free mining loop and nonce verification

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod codec;
pub mod error;
pub mod hash;
pub mod hexbin;
pub mod input;
pub mod miner;
pub mod nonce;
pub mod search;
pub mod verify;

pub use error::{ArgumentFault, EncodingFault, MinerError};
pub use hash::{sha224, DIGEST_LEN};
pub use hexbin::{expand, HexBin};
pub use input::{MiningInput, NonceHex, FINGERPRINT_HEX_LEN, MINING_INPUT_LEN};
pub use miner::{mine, Miner, MinerConfig, MiningResult, Outcome, DEFAULT_MAX_ITERATIONS};
pub use nonce::{NonceGenerator, NonceStrategy, NONCE_HEX_LEN, SEED_LEN};
pub use search::{Needle, SearchStrategy, MAX_DIFFICULTY};
pub use verify::{achieved_difficulty, mining_digest, verify};

/// Identifier for this miner build and search strategy, e.g.
/// `"hexbin-0.1.0.scanstr.hexbin"`.
pub fn algorithm_id(search: SearchStrategy) -> alloc::string::String {
    alloc::format!("hexbin-{}.{}", env!("CARGO_PKG_VERSION"), search.algorithm_id())
}
