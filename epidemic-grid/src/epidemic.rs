use log::{Level, debug, log_enabled};
use std::mem;

use crate::error::GridResult;
use crate::grid::{Grid, GridSize};
use crate::random::Random;
use crate::step::{SimParams, step_par_unchecked, step_unchecked};
use crate::{CellState, Census};

/// A running epidemic: the double-buffered grid plus everything a tick
/// needs. `grid()` is always the latest state.
#[derive(Debug)]
pub struct Epidemic {
    current: Grid,
    next: Grid,
    params: SimParams,
    rand: Random,
    tick: u64,
    parallel: bool,
}

impl Epidemic {
    pub fn new(size: GridSize, params: SimParams, rand: Random) -> GridResult<Self> {
        let (current, next) = crate::initialize(size.width, size.height)?;
        Ok(Self {
            current,
            next,
            params,
            rand,
            tick: 0,
            parallel: false,
        })
    }

    /// Steps rows on the rayon pool instead of the calling thread.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.current
    }

    /// The state before the last update, or the initial state before the
    /// first one.
    pub fn previous(&self) -> &Grid {
        &self.next
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn census(&self) -> Census {
        self.current.census()
    }

    pub fn intervene(&mut self, x: u32, y: u32, state: CellState) -> GridResult<()> {
        self.current.set(x, y, state)
    }

    /// Runs one step into the back buffer, then makes it the current one.
    /// Both buffers are the same size by construction, so this cannot fail.
    pub fn update(&mut self) {
        if self.parallel {
            let seed = self.rand.next_seed();
            step_par_unchecked(&self.current, &mut self.next, &self.params, seed);
        } else {
            step_unchecked(&self.current, &mut self.next, &self.params, &mut self.rand);
        }
        mem::swap(&mut self.next, &mut self.current);
        self.tick += 1;

        if log_enabled!(Level::Debug) {
            debug!("tick {}: {:?}", self.tick, self.census());
        }
    }
}
