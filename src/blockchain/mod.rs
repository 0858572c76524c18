pub mod block;
pub mod hasher;
pub mod model;
pub mod propagation;

pub use block::{Block, MiningError, MiningLimit};
pub use model::{Chain, ChainError, Outcome, RejectReason, SubmitError, Submission};
pub use propagation::{Instant, Propagation, Sleep};

/// Default Proof-of-Work difficulty (number of leading zeros).
pub const DEFAULT_DIFFICULTY: u32 = 3;

/// A SHA-256 digest has 64 hex digits; more leading zeros can never be found.
pub const MAX_DIFFICULTY: u32 = 64;

/// Score credited for each accepted, on-time block.
pub const BLOCK_REWARD: i64 = 1;

/// Score change for each block broadcast after the grace period.
pub const PENALTY_POINTS: i64 = -1;

/// Broadcast delay tolerated without penalty.
pub const GRACE_PERIOD_SECS: u64 = 10;

/// Red flags that get a miner banned.
pub const BAN_THRESHOLD: u32 = 3;

/// Genesis block fields.
pub const GENESIS_PREVIOUS_HASH: &str = "0";
pub const GENESIS_MINER: &str = "System";
pub const GENESIS_DATA: &str = "Genesis Block";
