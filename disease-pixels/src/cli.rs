use clap::Parser;
use epidemic_grid::{CellState, GridSize, SimParams};
use pixels_main_support::AnimationConfig;
use std::time::Duration;

const AFTER_HELP: &str = "\
State transitions also depend on the numbers of neighbors in the different
states: a susceptible cell is infected with probability INFECT per infected
neighbor, a removed cell becomes susceptible again with probability REINSERT
per susceptible neighbor. Click a cell to infect it.";

#[derive(Debug, Parser)]
#[command(
    name = "disease",
    about = "Stochastic SIR epidemic on a walled grid",
    version,
    after_help = AFTER_HELP
)]
pub struct Cli {
    /// Grid resolution
    #[arg(
        short,
        long,
        value_name = "WIDTHxHEIGHT",
        default_value = "80x80",
        value_parser = parse_grid_size
    )]
    pub grid: GridSize,

    /// Graphical cell size, in pixels
    #[arg(
        short,
        long,
        value_name = "SIZE",
        default_value_t = 4,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub cell_size: u32,

    /// Pause between steps, in ms
    #[arg(short, long, value_name = "MS", default_value_t = 60)]
    pub delay: u64,

    /// Probabilities for infection, removal (when infected) and reinsertion
    /// (when removed)
    #[arg(
        short,
        long,
        value_name = "INFECT,REMOVE,REINSERT",
        default_value = "0.2,0.2,0.001",
        value_parser = parse_probabilities
    )]
    pub probabilities: SimParams,

    /// Seed for a reproducible run
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Step rows on all cores
    #[arg(long)]
    pub parallel: bool,
}

impl Cli {
    pub fn animation_config(&self) -> AnimationConfig {
        AnimationConfig {
            cell_size: self.cell_size,
            time_step: Duration::from_millis(self.delay),
            cursor_state: CellState::Infected,
        }
    }
}

fn parse_grid_size(arg: &str) -> Result<GridSize, String> {
    let (width, height) = arg
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got \"{arg}\""))?;
    let width: u32 = width
        .trim()
        .parse()
        .map_err(|err| format!("bad width \"{width}\": {err}"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|err| format!("bad height \"{height}\": {err}"))?;
    if width < 3 || height < 3 {
        return Err("grid resolution must be at least 3x3".to_string());
    }
    Ok(GridSize::new(width, height))
}

fn parse_probabilities(arg: &str) -> Result<SimParams, String> {
    let values = arg
        .split(',')
        .map(|value| {
            let p: f64 = value
                .trim()
                .parse()
                .map_err(|err| format!("bad probability \"{value}\": {err}"))?;
            if (0.0..=1.0).contains(&p) {
                Ok(p)
            } else {
                Err(format!("probability {p} is outside [0, 1]"))
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    match values[..] {
        [infect, remove, reinsert] => Ok(SimParams::new(infect, remove, reinsert)),
        _ => Err(format!(
            "expected INFECT,REMOVE,REINSERT, got {} values",
            values.len()
        )),
    }
}
