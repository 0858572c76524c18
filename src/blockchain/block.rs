use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

use super::hasher::{HeaderFields, digest, meets_difficulty};
use super::{GENESIS_DATA, GENESIS_MINER, GENESIS_PREVIOUS_HASH};

/// Why a bounded proof-of-work search stopped without a hash.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MiningError {
    #[error("mining gave up after {attempts} attempts")]
    AttemptsExhausted { attempts: u64 },
    #[error("mining cancelled after {attempts} attempts")]
    Cancelled { attempts: u64 },
}

/// Optional bounds on the nonce search. The default is unbounded.
#[derive(Debug, Clone, Default)]
pub struct MiningLimit {
    max_attempts: Option<u64>,
    cancel: Option<Arc<AtomicBool>>,
}

impl MiningLimit {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Stop the search as soon as `flag` is set (checked before every attempt).
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// A mined block. Header fields and the hash are fixed once mining succeeds,
/// so they are only exposed through accessors.
#[derive(Debug, Clone, Serialize)]
pub struct Block {
    index: u64,
    previous_hash: String,
    timestamp: i64, // Unix timestamp (UTC)
    data: String,
    miner: String,
    difficulty: u32,
    nonce: u64,   // Proof-of-Work nonce
    hash: String, // set once by mining
}

impl Block {
    /// The first block of every chain, mined at the chain difficulty.
    pub fn genesis(
        difficulty: u32,
        timestamp: i64,
        limit: &MiningLimit,
    ) -> Result<Self, MiningError> {
        Self::new(
            0,
            GENESIS_PREVIOUS_HASH.to_string(),
            timestamp,
            GENESIS_DATA.to_string(),
            GENESIS_MINER.to_string(),
            difficulty,
            limit,
        )
    }

    /// Build a block and mine it before returning. Blocks until a nonce
    /// satisfying `difficulty` is found; only a bounded `limit` can fail.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        index: u64,
        previous_hash: String,
        timestamp: i64,
        data: String,
        miner: String,
        difficulty: u32,
        limit: &MiningLimit,
    ) -> Result<Self, MiningError> {
        let mut block = Self {
            index,
            previous_hash,
            timestamp,
            data,
            miner,
            difficulty,
            nonce: 0,
            hash: String::new(),
        };
        block.mine(limit)?;
        Ok(block)
    }

    /// Perform Proof-of-Work by finding a nonce that yields a hash
    /// starting with `difficulty` leading zeros (in hex).
    fn mine(&mut self, limit: &MiningLimit) -> Result<(), MiningError> {
        let mut attempts: u64 = 0;
        loop {
            if limit.is_cancelled() {
                return Err(MiningError::Cancelled { attempts });
            }
            if limit.max_attempts.is_some_and(|max| attempts >= max) {
                return Err(MiningError::AttemptsExhausted { attempts });
            }
            attempts += 1;

            let hash = self.compute_hash();
            if meets_difficulty(&hash, self.difficulty) {
                self.hash = hash;
                return Ok(());
            }
            self.nonce = self.nonce.wrapping_add(1);
        }
    }

    /// Assemble a block from raw parts without mining, as if it had been
    /// received from elsewhere.
    #[cfg(test)]
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        index: u64,
        previous_hash: String,
        timestamp: i64,
        data: String,
        miner: String,
        difficulty: u32,
        nonce: u64,
        hash: String,
    ) -> Self {
        Self {
            index,
            previous_hash,
            timestamp,
            data,
            miner,
            difficulty,
            nonce,
            hash,
        }
    }

    /// Digest of the header fields with the current nonce
    /// (excluding the `hash` field itself).
    pub fn compute_hash(&self) -> String {
        digest(&HeaderFields {
            index: self.index,
            previous_hash: &self.previous_hash,
            timestamp: self.timestamp,
            data: &self.data,
            miner: &self.miner,
            difficulty: self.difficulty,
            nonce: self.nonce,
        })
    }

    /// Validate that the cached `hash` matches the header and satisfies
    /// `difficulty`. (Does NOT validate chain linkage.)
    pub fn is_valid(&self, difficulty: u32) -> bool {
        self.hash == self.compute_hash() && meets_difficulty(&self.hash, difficulty)
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn miner(&self) -> &str {
        &self.miner
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }
}
