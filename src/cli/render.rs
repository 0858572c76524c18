use std::fmt::Write;

use crate::blockchain::{Outcome, RejectReason, Submission};
use crate::reputation::MinerStanding;

const BLUE: &str = "\x1b[94m";
const GREEN: &str = "\x1b[92m";
const YELLOW: &str = "\x1b[93m";
const RED: &str = "\x1b[91m";
const MAGENTA: &str = "\x1b[95m";
const RESET: &str = "\x1b[0m";

pub fn banner() -> String {
    format!("{BLUE}--- Blockchain Mining Simulation ---{RESET}\n")
}

pub fn prompt(label: &str) -> String {
    format!("{MAGENTA}{label}{RESET}")
}

pub fn error(message: &str) -> String {
    format!("{RED}error:{RESET} {message}\n")
}

/// Human readable account of one submission, in the order things happened.
pub fn submission(sub: &Submission) -> String {
    let mut out = String::new();

    if let Some(p) = &sub.penalty {
        let _ = writeln!(
            out,
            "⚠ Penalty applied to miner {YELLOW}{}{RESET} for a delay of {RED}{:.2} seconds!{RESET}",
            p.miner, p.delay_secs
        );
        let _ = writeln!(
            out,
            "Miner {} now has {RED}{} points{RESET} and {RED}{} red flags{RESET}.\n",
            p.miner, p.score, p.red_flags
        );
    }

    match sub.outcome {
        Outcome::Accepted => {
            match sub.reward {
                Some(points) => {
                    let _ = writeln!(
                        out,
                        "{GREEN}Miner {} awarded {points} points for mining a block.{RESET}",
                        sub.miner
                    );
                }
                None => {
                    let _ = writeln!(
                        out,
                        "{YELLOW}Miner {} was late, no reward for this block.{RESET}",
                        sub.miner
                    );
                }
            }
            let _ = writeln!(
                out,
                "\n✅ Block {} mined by {} and added to the chain.\n",
                sub.index, sub.miner
            );
        }
        Outcome::Rejected(reason) => {
            let why = match reason {
                RejectReason::Banned => {
                    let _ = writeln!(
                        out,
                        "\n⚠ Miner {} is {RED}banned{RESET} from mining due to excessive red flags!\n",
                        sub.miner
                    );
                    "penalties or ban"
                }
                RejectReason::InvalidProofOfWork => "an invalid proof of work",
                RejectReason::StaleParent => "a stale parent",
            };
            let _ = writeln!(out, "❌ Block by {} rejected due to {why}.\n", sub.miner);
        }
    }

    out
}

/// End-of-session table of every miner's score and red flags.
pub fn summary(standings: &[MinerStanding]) -> String {
    let mut out = format!("\n{BLUE}--- Miner penalties and red flags summary ---{RESET}\n");
    if standings.is_empty() {
        out.push_str("(no miners)\n");
    }
    for s in standings {
        let _ = write!(
            out,
            "{MAGENTA}{}:{RESET} {} points, {} red flags",
            s.miner, s.score, s.red_flags
        );
        if s.banned {
            let _ = write!(out, " {RED}(banned){RESET}");
        }
        out.push('\n');
    }
    out
}
