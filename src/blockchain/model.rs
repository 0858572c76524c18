use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;
use thiserror::Error;

use super::{
    Block, GENESIS_PREVIOUS_HASH, Instant, MiningError, MiningLimit, PENALTY_POINTS, Propagation,
};
use crate::config::{ChainConfig, ConfigError};
use crate::reputation::{Penalty, ReputationLedger};

/// Why a chain could not be built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("genesis block: {0}")]
    Genesis(#[from] MiningError),
}

/// Caller contract violations. Rejections are not errors, see [`Outcome`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("miner identity must not be empty")]
    EmptyMiner,
    #[error(transparent)]
    Mining(#[from] MiningError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The miner has reached the red-flag threshold.
    Banned,
    /// Hash does not match the header or misses the difficulty target.
    InvalidProofOfWork,
    /// Block does not extend the current tail.
    StaleParent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Accepted,
    Rejected(RejectReason),
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted)
    }
}

/// Everything that happened to one submitted block.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub index: u64,
    pub hash: String,
    pub miner: String,
    pub delay: Duration,
    pub outcome: Outcome,
    /// Set when the delay exceeded the grace period.
    pub penalty: Option<Penalty>,
    /// Points credited; only for accepted, on-time blocks.
    pub reward: Option<i64>,
}

/// In-memory, append-only blockchain with Proof-of-Work and a miner
/// reputation ledger.
#[derive(Debug)]
pub struct Chain<P: Propagation = Instant> {
    blocks: Vec<Block>,
    config: ChainConfig,
    ledger: ReputationLedger,
    mining_limit: MiningLimit,
    propagation: P,
}

impl Chain {
    /// Chain whose broadcast delay costs no wall-clock time.
    pub fn new(config: ChainConfig) -> Result<Self, ChainError> {
        Self::with_propagation(config, Instant)
    }
}

impl<P: Propagation> Chain<P> {
    /// Initialize a new chain with a mined genesis block. The mining cap
    /// applies to genesis too.
    pub fn with_propagation(config: ChainConfig, propagation: P) -> Result<Self, ChainError> {
        config.validate()?;

        let mut mining_limit = MiningLimit::unbounded();
        if let Some(max) = config.max_mining_attempts {
            mining_limit = mining_limit.with_max_attempts(max);
        }

        let genesis = Block::genesis(config.difficulty, Utc::now().timestamp(), &mining_limit)?;
        Ok(Self {
            blocks: vec![genesis],
            ledger: ReputationLedger::new(config.ban_threshold),
            config,
            mining_limit,
            propagation,
        })
    }

    /// Abort block proposals once `flag` is raised.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.mining_limit = self.mining_limit.with_cancel_flag(flag);
        self
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> &Block {
        self.blocks
            .last()
            .expect("Chain should always have at least the genesis block")
    }

    /// Mine a candidate on top of the current tail. Nothing is appended.
    pub fn propose_block(
        &self,
        data: impl Into<String>,
        miner: impl Into<String>,
    ) -> Result<Block, SubmitError> {
        let miner = miner.into().trim().to_string();
        if miner.is_empty() {
            return Err(SubmitError::EmptyMiner);
        }

        let tail = self.last_block();
        let block = Block::new(
            tail.index() + 1,
            tail.hash().to_string(),
            Utc::now().timestamp(),
            data.into(),
            miner,
            self.config.difficulty,
            &self.mining_limit,
        )?;
        Ok(block)
    }

    /// Judge a mined block that arrived `delay` after it was produced.
    ///
    /// Order matters: a late block earns its red flag before the ban check,
    /// and a banned miner is rejected before the hash is even looked at.
    /// Late blocks that pass are still appended, just without reward.
    pub fn validate_and_append(&mut self, block: Block, delay: Duration) -> Submission {
        let miner = block.miner().to_string();
        let late = delay > self.config.grace_period;

        let penalty = if late {
            Some(self.ledger.apply_penalty(&miner, PENALTY_POINTS, delay))
        } else {
            None
        };

        let outcome = if self.ledger.is_banned(&miner) {
            Outcome::Rejected(RejectReason::Banned)
        } else if !block.is_valid(self.config.difficulty) {
            Outcome::Rejected(RejectReason::InvalidProofOfWork)
        } else if !self.extends_tail(&block) {
            Outcome::Rejected(RejectReason::StaleParent)
        } else {
            Outcome::Accepted
        };

        let reward = if outcome.is_accepted() && !late {
            self.ledger.reward(&miner, self.config.block_reward);
            Some(self.config.block_reward)
        } else {
            None
        };

        let submission = Submission {
            index: block.index(),
            hash: block.hash().to_string(),
            miner,
            delay,
            outcome,
            penalty,
            reward,
        };
        if outcome.is_accepted() {
            self.blocks.push(block);
        }
        submission
    }

    /// Mine a block, let it propagate for `delay`, then validate it once.
    pub fn mine_and_submit(
        &mut self,
        data: impl Into<String>,
        miner: impl Into<String>,
        delay: Duration,
    ) -> Result<Submission, SubmitError> {
        let block = self.propose_block(data, miner)?;
        self.propagation.propagate(delay);
        Ok(self.validate_and_append(block, delay))
    }

    /// Validate the entire chain: genesis shape, linkage, hashes and PoW.
    pub fn is_valid_chain(&self) -> bool {
        let Some(genesis) = self.blocks.first() else {
            return false;
        };
        if genesis.index() != 0
            || genesis.previous_hash() != GENESIS_PREVIOUS_HASH
            || !genesis.is_valid(self.config.difficulty)
        {
            return false;
        }

        self.blocks.windows(2).all(|pair| {
            let (prev, current) = (&pair[0], &pair[1]);
            current.previous_hash() == prev.hash()
                && current.index() == prev.index() + 1
                && current.is_valid(self.config.difficulty)
        })
    }

    fn extends_tail(&self, block: &Block) -> bool {
        let tail = self.last_block();
        block.previous_hash() == tail.hash() && block.index() == tail.index() + 1
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn difficulty(&self) -> u32 {
        self.config.difficulty
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn ledger(&self) -> &ReputationLedger {
        &self.ledger
    }
}
