#![deny(clippy::all)]
#![forbid(unsafe_code)]

mod cli;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use epidemic_grid::{Epidemic, Random};
use log::info;
use pixels_main_support::animate;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let rand = match cli.seed {
        Some(seed) => {
            info!("seed {seed}");
            Random::from_seed(seed)
        }
        None => Random::new(),
    };
    let epidemic = Epidemic::new(cli.grid, cli.probabilities, rand)
        .context("could not build the grid")?
        .with_parallel(cli.parallel);

    animate(epidemic, cli.animation_config())?;
    Ok(())
}
