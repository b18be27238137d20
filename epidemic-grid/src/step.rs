use rayon::prelude::*;

use crate::error::GridResult;
use crate::grid::{Grid, Loc, Neighborhood};
use crate::random::{Random, RandomSource};
use crate::CellState;

/// Transition rates for a run. Infection and reinsertion are per neighbor in
/// the triggering state; removal is per tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimParams {
    pub infect_rate: f64,
    pub remove_rate: f64,
    pub reinsert_rate: f64,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            infect_rate: 0.2,
            remove_rate: 0.2,
            reinsert_rate: 0.001,
        }
    }
}

impl SimParams {
    pub fn new(infect_rate: f64, remove_rate: f64, reinsert_rate: f64) -> Self {
        Self {
            infect_rate,
            remove_rate,
            reinsert_rate,
        }
    }

    pub fn with_infect_rate(mut self, rate: f64) -> Self {
        self.infect_rate = rate;
        self
    }

    pub fn with_remove_rate(mut self, rate: f64) -> Self {
        self.remove_rate = rate;
        self
    }

    pub fn with_reinsert_rate(mut self, rate: f64) -> Self {
        self.reinsert_rate = rate;
        self
    }

    pub fn infection_probability(&self, infected_neighbors: u32) -> f64 {
        probability(self.infect_rate * infected_neighbors as f64)
    }

    pub fn removal_probability(&self) -> f64 {
        probability(self.remove_rate)
    }

    pub fn reinsertion_probability(&self, susceptible_neighbors: u32) -> f64 {
        probability(self.reinsert_rate * susceptible_neighbors as f64)
    }
}

fn probability(p: f64) -> f64 {
    // NaN compares false against every draw
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}

/// Advances the simulation one tick: every interior cell of `next` is
/// computed from `current` alone. Walls in `next` are left as they are.
/// Draws exactly one sample per interior cell, in row-major order.
pub fn step<R>(current: &Grid, next: &mut Grid, params: &SimParams, rand: &mut R) -> GridResult<()>
where
    R: RandomSource + ?Sized,
{
    current.check_same_size(next)?;
    step_unchecked(current, next, params, rand);
    Ok(())
}

/// Parallel version of [`step`]. Each interior row draws from its own
/// generator seeded from `seed` and the row index, so the result depends on
/// `seed` only and not on how rows are scheduled.
pub fn step_par(current: &Grid, next: &mut Grid, params: &SimParams, seed: u64) -> GridResult<()> {
    current.check_same_size(next)?;
    step_par_unchecked(current, next, params, seed);
    Ok(())
}

pub(crate) fn step_par_unchecked(current: &Grid, next: &mut Grid, params: &SimParams, seed: u64) {
    let width = current.width() as usize;
    let interior_rows = current.height() as usize - 2;
    next.cells_mut()
        .par_chunks_mut(width)
        .enumerate()
        .skip(1)
        .take(interior_rows)
        .for_each(|(y, row)| {
            let mut rand = Random::from_seed(row_seed(seed, y as u32));
            step_row(current, y as u32, row, params, &mut rand);
        });
}

pub(crate) fn step_unchecked<R>(current: &Grid, next: &mut Grid, params: &SimParams, rand: &mut R)
where
    R: RandomSource + ?Sized,
{
    let width = current.width() as usize;
    let interior_rows = current.height() as usize - 2;
    next.cells_mut()
        .chunks_mut(width)
        .enumerate()
        .skip(1)
        .take(interior_rows)
        .for_each(|(y, row)| step_row(current, y as u32, row, params, &mut *rand));
}

fn step_row<R>(current: &Grid, y: u32, row: &mut [CellState], params: &SimParams, rand: &mut R)
where
    R: RandomSource + ?Sized,
{
    for x in 1..current.width() - 1 {
        let neighborhood = Neighborhood::new(current, Loc::new(x, y));
        let draw = rand.next_uniform();
        row[x as usize] = neighborhood
            .center()
            .next_state(&neighborhood.counts(), params, draw);
    }
}

fn row_seed(seed: u64, y: u32) -> u64 {
    seed ^ (y as u64 + 1).wrapping_mul(0x9e37_79b9_7f4a_7c15)
}
