pub mod ledger;

pub use ledger::{MinerStanding, Penalty, ReputationLedger};
