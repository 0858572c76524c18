use anyhow::Context;
use dotenvy::dotenv;
use std::io;

use pow_penalty_chain::blockchain::{Chain, Propagation, Sleep};
use pow_penalty_chain::cli;
use pow_penalty_chain::config::{ChainConfig, env_flag};

fn main() -> anyhow::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = ChainConfig::from_env().context("invalid chain configuration")?;
    let sleep = env_flag("BROADCAST_SLEEP", true)?;
    let dump = env_flag("DUMP_CHAIN", false)?;

    println!(
        "⛓️ Starting chain: difficulty={} reward={} grace={}s ban_threshold={}",
        config.difficulty,
        config.block_reward,
        config.grace_period.as_secs(),
        config.ban_threshold
    );

    if sleep {
        simulate(Chain::with_propagation(config, Sleep)?, dump)
    } else {
        simulate(Chain::new(config)?, dump)
    }
}

fn simulate<P: Propagation>(mut chain: Chain<P>, dump: bool) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    cli::run_session(&mut chain, stdin.lock(), &mut stdout)?;

    if dump {
        let json = serde_json::to_string_pretty(chain.blocks()).context("serialize chain")?;
        println!("{json}");
    }
    Ok(())
}
