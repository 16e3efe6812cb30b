use std::io;

use anyhow::{Context, Result};

use dat_market::{cli::args_from_env, config::Config, logging::init_tracing, sweep};

fn main() -> Result<()> {
    let args = args_from_env()?;
    let mut config = Config::load(&args.config_path)
        .with_context(|| format!("failed to load config from {}", args.config_path.display()))?;
    if let Some(seed) = args.seed {
        config.sweep.seed = seed;
    }

    let _logging_guard = init_tracing(&config.logging)?;
    let market = config.market.to_market_config()?;

    let rows = sweep::run_sweep(&market, &config.sweep).context("sweep failed")?;
    sweep::write_ndjson(&rows, io::stdout().lock())
}
