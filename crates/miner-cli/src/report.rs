//! Machine-readable run summary.

use serde::{Deserialize, Serialize};

use hexbin_miner_core::MiningResult;

/// Result of one invocation, printed with `--json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunReport {
    /// Whether a nonce was found.
    pub success: bool,
    /// The winning nonce (if found).
    pub nonce: Option<String>,
    /// The winning SHA-224 digest, hex (if found).
    pub digest: Option<String>,
    /// Attempts made.
    pub cycles: u64,
    /// Difficulty that was mined for.
    pub difficulty: usize,
    /// Algorithm identifier of this build and search strategy.
    pub algorithm: String,
    /// Wall-clock time spent in the loop, in milliseconds.
    pub elapsed_ms: f64,
}

impl RunReport {
    pub fn new(result: &MiningResult, difficulty: usize, algorithm: String, elapsed_ms: f64) -> Self {
        RunReport {
            success: result.found(),
            nonce: result.nonce.map(|n| n.to_string()),
            digest: result.digest.map(hex::encode),
            cycles: result.cycles,
            difficulty,
            algorithm,
            elapsed_ms,
        }
    }

    /// Attempts per second, or zero if no time elapsed.
    pub fn cycles_per_sec(&self) -> f64 {
        if self.elapsed_ms > 0.0 {
            self.cycles as f64 / (self.elapsed_ms / 1000.0)
        } else {
            0.0
        }
    }

    /// The plain `<nonce> <cycles>` line, only for a successful run.
    pub fn plain_line(&self) -> Option<String> {
        self.nonce
            .as_ref()
            .map(|nonce| format!("{} {}", nonce, self.cycles))
    }
}
