//! Single-node proof-of-work chain with a miner reputation ledger.
//!
//! Miners that broadcast a block later than the grace period collect a red
//! flag and lose a point; enough red flags ban them for good.

pub mod blockchain;
pub mod cli;
pub mod config;
pub mod reputation;
