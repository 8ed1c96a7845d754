//! Exact substring search over expanded-binary strings.
//!
//! Three interchangeable strategies are provided. They always agree on
//! whether the needle occurs and all report the leftmost occurrence.
//!
//! - [`SearchStrategy::ChecksumScan`] keeps a rolling sum of the window and
//!   only compares bytes when the sum matches the needle's.
//! - [`SearchStrategy::WordScan`] slides a big-endian machine word over the
//!   haystack. Needles of 2 and 3 bytes are matched entirely in the word;
//!   longer needles match a 4-byte head and then compare the tail.
//! - [`SearchStrategy::GeneralScan`] compares every window.

use core::fmt;

use crate::error::ArgumentFault;
use crate::hash::DIGEST_LEN;

/// Longest supported needle, in expanded-binary characters.
pub const MAX_DIFFICULTY: usize = DIGEST_LEN * 8;

/// Which substring search algorithm to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchStrategy {
    /// Rolling checksum prefilter.
    ChecksumScan,
    /// Fixed-length word-window specialisations.
    #[default]
    WordScan,
    /// Window-by-window comparison.
    GeneralScan,
}

impl SearchStrategy {
    /// Every strategy, in declaration order.
    pub const ALL: [SearchStrategy; 3] = [
        SearchStrategy::ChecksumScan,
        SearchStrategy::WordScan,
        SearchStrategy::GeneralScan,
    ];

    /// Short name for logs and command-line flags.
    pub fn name(&self) -> &'static str {
        match self {
            SearchStrategy::ChecksumScan => "checksum",
            SearchStrategy::WordScan => "word",
            SearchStrategy::GeneralScan => "general",
        }
    }

    /// Parse a name produced by [`SearchStrategy::name`].
    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|strategy| strategy.name() == s)
    }

    /// Identifier reported to pools alongside submissions.
    pub fn algorithm_id(&self) -> &'static str {
        match self {
            SearchStrategy::ChecksumScan => "strstr.fast.hexbin",
            SearchStrategy::WordScan => "scanstr.hexbin",
            SearchStrategy::GeneralScan => "strstr.hexbin",
        }
    }
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Precomputed per-needle state for the selected strategy.
#[derive(Debug, Clone, Copy)]
enum Kernel {
    Empty,
    Byte(u8),
    Pair(u16),
    Triple(u32),
    Head(u32),
    Checksum(u32),
    General,
}

/// A needle prepared once and searched for many times.
#[derive(Clone)]
pub struct Needle {
    bytes: [u8; MAX_DIFFICULTY],
    len: usize,
    strategy: SearchStrategy,
    kernel: Kernel,
}

impl Needle {
    /// Prepare `pattern` for repeated searching with `strategy`.
    pub fn new(pattern: &[u8], strategy: SearchStrategy) -> Result<Self, ArgumentFault> {
        if pattern.len() > MAX_DIFFICULTY {
            return Err(ArgumentFault::DifficultyOutOfRange {
                difficulty: pattern.len(),
                max: MAX_DIFFICULTY,
            });
        }

        let mut bytes = [0u8; MAX_DIFFICULTY];
        bytes[..pattern.len()].copy_from_slice(pattern);

        let kernel = match (strategy, pattern.len()) {
            (_, 0) => Kernel::Empty,
            (SearchStrategy::ChecksumScan, _) => Kernel::Checksum(byte_sum(pattern)),
            (SearchStrategy::WordScan, 1) => Kernel::Byte(pattern[0]),
            (SearchStrategy::WordScan, 2) => Kernel::Pair(u16::from_be_bytes([pattern[0], pattern[1]])),
            (SearchStrategy::WordScan, 3) => {
                Kernel::Triple(u32::from_be_bytes([0, pattern[0], pattern[1], pattern[2]]))
            }
            (SearchStrategy::WordScan, _) => Kernel::Head(u32::from_be_bytes([
                pattern[0], pattern[1], pattern[2], pattern[3],
            ])),
            (SearchStrategy::GeneralScan, _) => Kernel::General,
        };

        Ok(Needle {
            bytes,
            len: pattern.len(),
            strategy,
            kernel,
        })
    }

    /// The needle characters.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Needle length, i.e. the difficulty.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether this is the empty needle, which matches everywhere.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The strategy this needle was prepared for.
    pub fn strategy(&self) -> SearchStrategy {
        self.strategy
    }

    /// Position of the leftmost occurrence in `haystack`.
    #[inline]
    pub fn find(&self, haystack: &[u8]) -> Option<usize> {
        let needle = self.as_bytes();
        match self.kernel {
            Kernel::Empty => Some(0),
            Kernel::Byte(b) => haystack.iter().position(|&h| h == b),
            Kernel::Pair(head) => scan_pair(haystack, head),
            Kernel::Triple(head) => scan_triple(haystack, head),
            Kernel::Head(head) => scan_head(haystack, head, &needle[4..]),
            Kernel::Checksum(sum) => scan_checksum(haystack, needle, sum),
            Kernel::General => general_scan(haystack, needle),
        }
    }

    /// Whether the needle occurs anywhere in `haystack`.
    #[inline]
    pub fn is_found_in(&self, haystack: &[u8]) -> bool {
        self.find(haystack).is_some()
    }
}

impl fmt::Debug for Needle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Needle")
            .field("len", &self.len)
            .field("strategy", &self.strategy)
            .finish()
    }
}

/// One-shot search with the given strategy.
pub fn find(haystack: &[u8], needle: &[u8], strategy: SearchStrategy) -> Option<usize> {
    match strategy {
        SearchStrategy::ChecksumScan => checksum_scan(haystack, needle),
        SearchStrategy::WordScan => word_scan(haystack, needle),
        SearchStrategy::GeneralScan => general_scan(haystack, needle),
    }
}

/// Rolling-checksum search.
pub fn checksum_scan(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    scan_checksum(haystack, needle, byte_sum(needle))
}

/// Word-window search.
pub fn word_scan(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    match needle.len() {
        0 => Some(0),
        1 => haystack.iter().position(|&h| h == needle[0]),
        2 => scan_pair(haystack, u16::from_be_bytes([needle[0], needle[1]])),
        3 => scan_triple(
            haystack,
            u32::from_be_bytes([0, needle[0], needle[1], needle[2]]),
        ),
        _ => scan_head(
            haystack,
            u32::from_be_bytes([needle[0], needle[1], needle[2], needle[3]]),
            &needle[4..],
        ),
    }
}

/// Compare every window.
pub fn general_scan(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|window| window == needle)
}

#[inline]
fn byte_sum(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0u32, |acc, &b| acc.wrapping_add(b as u32))
}

#[inline]
fn scan_checksum(haystack: &[u8], needle: &[u8], needle_sum: u32) -> Option<usize> {
    let k = needle.len();
    if haystack.len() < k {
        return None;
    }

    let mut sum = byte_sum(&haystack[..k]);
    if sum == needle_sum && &haystack[..k] == needle {
        return Some(0);
    }

    for start in 1..=haystack.len() - k {
        sum = sum
            .wrapping_sub(haystack[start - 1] as u32)
            .wrapping_add(haystack[start + k - 1] as u32);
        if sum == needle_sum
            && haystack[start] == needle[0]
            && &haystack[start..start + k] == needle
        {
            return Some(start);
        }
    }
    None
}

#[inline]
fn scan_pair(haystack: &[u8], head: u16) -> Option<usize> {
    let mut window = 0u16;
    for (i, &b) in haystack.iter().enumerate() {
        window = (window << 8) | b as u16;
        if i >= 1 && window == head {
            return Some(i - 1);
        }
    }
    None
}

#[inline]
fn scan_triple(haystack: &[u8], head: u32) -> Option<usize> {
    let mut window = 0u32;
    for (i, &b) in haystack.iter().enumerate() {
        window = ((window << 8) | b as u32) & 0x00FF_FFFF;
        if i >= 2 && window == head {
            return Some(i - 2);
        }
    }
    None
}

#[inline]
fn scan_head(haystack: &[u8], head: u32, tail: &[u8]) -> Option<usize> {
    let mut window = 0u32;
    for (i, &b) in haystack.iter().enumerate() {
        window = (window << 8) | b as u32;
        if i >= 3 && window == head && haystack[i + 1..].starts_with(tail) {
            return Some(i - 3);
        }
    }
    None
}
