mod prompt;
mod render;

use log::{debug, info, warn};
use std::io::{self, BufRead, Write};

use crate::blockchain::{Chain, Outcome, Propagation};

pub use prompt::{DelayError, parse_delay};

/// Interactive loop: ask for miner, data and delay until `exit` or end of
/// input, submit each block, then print the ledger summary.
pub fn run_session<P, R, W>(chain: &mut Chain<P>, mut input: R, output: &mut W) -> io::Result<()>
where
    P: Propagation,
    R: BufRead,
    W: Write,
{
    writeln!(output, "{}", render::banner())?;

    loop {
        let Some(miner) = prompt::ask(
            &mut input,
            output,
            &render::prompt("Enter the miner's name (or type 'exit' to finish): "),
        )?
        else {
            break;
        };
        let miner = miner.trim().to_string();
        if miner.eq_ignore_ascii_case("exit") {
            break;
        }

        let Some(data) = prompt::ask(&mut input, output, &render::prompt("Enter the block data: "))?
        else {
            break;
        };

        let delay = loop {
            let Some(raw) = prompt::ask(
                &mut input,
                output,
                &render::prompt("Enter delay in broadcasting the block (in seconds): "),
            )?
            else {
                return finish(chain, output);
            };
            match parse_delay(&raw) {
                Ok(delay) => break delay,
                Err(e) => write!(output, "{}", render::error(&e.to_string()))?,
            }
        };

        debug!(
            "MINING height={} diff={} miner={}",
            chain.len(),
            chain.difficulty(),
            miner
        );
        match chain.mine_and_submit(data, miner, delay) {
            Ok(sub) => {
                if let Some(p) = &sub.penalty {
                    warn!(
                        "PENALTY miner={} delay={:.2}s score={} red_flags={}",
                        p.miner, p.delay_secs, p.score, p.red_flags
                    );
                }
                match sub.outcome {
                    Outcome::Accepted => info!(
                        "ACCEPTED block#{} hash={} miner={} delay={:.2}s rewarded={}",
                        sub.index,
                        sub.hash,
                        sub.miner,
                        sub.delay.as_secs_f64(),
                        sub.reward.is_some()
                    ),
                    Outcome::Rejected(reason) => warn!(
                        "REJECTED block#{} miner={} delay={:.2}s reason={:?}",
                        sub.index,
                        sub.miner,
                        sub.delay.as_secs_f64(),
                        reason
                    ),
                }
                write!(output, "{}", render::submission(&sub))?;
            }
            Err(e) => {
                warn!("submission failed: {e}");
                write!(output, "{}", render::error(&e.to_string()))?;
            }
        }
    }

    finish(chain, output)
}

fn finish<P: Propagation, W: Write>(chain: &Chain<P>, output: &mut W) -> io::Result<()> {
    info!(
        "session finished: height={} valid={}",
        chain.len(),
        chain.is_valid_chain()
    );
    write!(output, "{}", render::summary(&chain.ledger().standings()))?;
    output.flush()
}
