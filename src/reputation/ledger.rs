use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// Result of a single penalty: what was deducted and where the miner stands now.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Penalty {
    pub miner: String,
    pub points: i64,
    pub delay_secs: f64,
    pub score: i64,
    pub red_flags: u32,
}

/// Summary row for one miner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MinerStanding {
    pub miner: String,
    pub score: i64,
    pub red_flags: u32,
    pub banned: bool,
}

/// Per-miner net score and red-flag count.
///
/// Rewards and penalties share one running score. Red flags are never reset,
/// so once a miner reaches `ban_threshold` the ban is permanent.
#[derive(Debug, Clone)]
pub struct ReputationLedger {
    scores: BTreeMap<String, i64>,
    red_flags: BTreeMap<String, u32>,
    ban_threshold: u32,
}

impl ReputationLedger {
    pub fn new(ban_threshold: u32) -> Self {
        Self {
            scores: BTreeMap::new(),
            red_flags: BTreeMap::new(),
            ban_threshold,
        }
    }

    /// Add `points` (normally negative) to the score and record one red flag.
    /// Not idempotent: every call is another strike.
    pub fn apply_penalty(&mut self, miner: &str, points: i64, delay: Duration) -> Penalty {
        let score = self.add_points(miner, points);
        let flags = self.red_flags.entry(miner.to_string()).or_insert(0);
        *flags = flags.saturating_add(1);

        Penalty {
            miner: miner.to_string(),
            points,
            delay_secs: delay.as_secs_f64(),
            score,
            red_flags: *flags,
        }
    }

    /// Credit `points` to the miner's score. Returns the new score.
    pub fn reward(&mut self, miner: &str, points: i64) -> i64 {
        self.add_points(miner, points)
    }

    pub fn is_banned(&self, miner: &str) -> bool {
        self.red_flag_count(miner) >= self.ban_threshold
    }

    pub fn score(&self, miner: &str) -> i64 {
        self.scores.get(miner).copied().unwrap_or(0)
    }

    pub fn red_flag_count(&self, miner: &str) -> u32 {
        self.red_flags.get(miner).copied().unwrap_or(0)
    }

    pub fn ban_threshold(&self) -> u32 {
        self.ban_threshold
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty() && self.red_flags.is_empty()
    }

    /// Every miner the ledger has seen, ordered by identity.
    pub fn standings(&self) -> Vec<MinerStanding> {
        let miners: BTreeSet<&String> = self.scores.keys().chain(self.red_flags.keys()).collect();
        miners
            .into_iter()
            .map(|miner| MinerStanding {
                miner: miner.clone(),
                score: self.score(miner),
                red_flags: self.red_flag_count(miner),
                banned: self.is_banned(miner),
            })
            .collect()
    }

    fn add_points(&mut self, miner: &str, points: i64) -> i64 {
        let score = self.scores.entry(miner.to_string()).or_insert(0);
        *score = score.saturating_add(points);
        *score
    }
}

#[cfg(test)]
mod tests {
    use super::ReputationLedger;
    use std::time::Duration;

    #[test]
    fn unknown_miner_is_clean() {
        let ledger = ReputationLedger::new(3);
        assert_eq!(ledger.score("nobody"), 0);
        assert_eq!(ledger.red_flag_count("nobody"), 0);
        assert!(!ledger.is_banned("nobody"));
        assert!(ledger.is_empty());
    }

    #[test]
    fn penalty_creates_entries_and_reports_state() {
        let mut ledger = ReputationLedger::new(3);
        let p = ledger.apply_penalty("a", -1, Duration::from_secs(20));
        assert_eq!(p.points, -1);
        assert_eq!(p.score, -1);
        assert_eq!(p.red_flags, 1);
        assert_eq!(p.delay_secs, 20.0);
        assert_eq!(ledger.score("a"), -1);
        assert_eq!(ledger.red_flag_count("a"), 1);
    }

    #[test]
    fn repeated_penalties_accumulate() {
        let mut ledger = ReputationLedger::new(10);
        ledger.apply_penalty("a", -1, Duration::from_secs(11));
        ledger.apply_penalty("a", -1, Duration::from_secs(11));
        assert_eq!(ledger.red_flag_count("a"), 2);
        assert_eq!(ledger.score("a"), -2);
    }

    #[test]
    fn reward_and_penalty_share_score() {
        let mut ledger = ReputationLedger::new(3);
        assert_eq!(ledger.reward("a", 5), 5);
        ledger.apply_penalty("a", -1, Duration::from_secs(30));
        assert_eq!(ledger.score("a"), 4);
        assert_eq!(ledger.red_flag_count("a"), 1);
    }

    #[test]
    fn ban_at_threshold() {
        let mut ledger = ReputationLedger::new(2);
        ledger.apply_penalty("a", -1, Duration::from_secs(11));
        assert!(!ledger.is_banned("a"));
        ledger.apply_penalty("a", -1, Duration::from_secs(11));
        assert!(ledger.is_banned("a"));
        // rewards never lift a ban
        ledger.reward("a", 100);
        assert!(ledger.is_banned("a"));
    }

    #[test]
    fn standings_are_sorted_and_complete() {
        let mut ledger = ReputationLedger::new(1);
        ledger.reward("zed", 1);
        ledger.apply_penalty("amy", -1, Duration::from_secs(12));
        let rows = ledger.standings();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].miner, "amy");
        assert!(rows[0].banned);
        assert_eq!(rows[1].miner, "zed");
        assert_eq!(rows[1].score, 1);
        assert_eq!(rows[1].red_flags, 0);
        assert!(!rows[1].banned);
    }
}
