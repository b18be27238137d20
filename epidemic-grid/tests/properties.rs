use epidemic_grid::{CellState, Grid, RandomSource, SimParams, initialize, step, step_par};
use proptest::prelude::*;

struct Constant(f64);

impl RandomSource for Constant {
    fn next_uniform(&mut self) -> f64 {
        self.0
    }
}

fn living_state() -> impl Strategy<Value = CellState> {
    prop_oneof![
        Just(CellState::Susceptible),
        Just(CellState::Infected),
        Just(CellState::Removed),
    ]
}

/// A grid of random size with a random interior.
fn any_grid() -> impl Strategy<Value = Grid> {
    (3u32..16, 3u32..16)
        .prop_flat_map(|(width, height)| {
            let interior = ((width - 2) * (height - 2)) as usize;
            (
                Just(width),
                Just(height),
                prop::collection::vec(living_state(), interior),
            )
        })
        .prop_map(|(width, height, states)| {
            let (mut grid, _) = initialize(width, height).unwrap();
            let mut states = states.into_iter();
            for y in 1..height - 1 {
                for x in 1..width - 1 {
                    grid.set(x, y, states.next().unwrap()).unwrap();
                }
            }
            grid
        })
}

fn any_params() -> impl Strategy<Value = SimParams> {
    (0.0..=1.0f64, 0.0..=1.0f64, 0.0..=1.0f64)
        .prop_map(|(infect, remove, reinsert)| SimParams::new(infect, remove, reinsert))
}

fn is_border(grid: &Grid, x: u32, y: u32) -> bool {
    x == 0 || y == 0 || x == grid.width() - 1 || y == grid.height() - 1
}

proptest! {
    #[test]
    fn initialize_walls_border_only(width in 3u32..40, height in 3u32..40) {
        let (current, next) = initialize(width, height).unwrap();
        prop_assert_eq!(&current, &next);
        for y in 0..height {
            for x in 0..width {
                let expected = if is_border(&current, x, y) {
                    CellState::Wall
                } else {
                    CellState::Susceptible
                };
                prop_assert_eq!(current.get(x, y).unwrap(), expected);
            }
        }
    }

    #[test]
    fn zero_probabilities_are_idempotent(grid in any_grid(), steps in 1usize..5, draw in 0.0..1.0f64) {
        let params = SimParams::new(0.0, 0.0, 0.0);
        let mut current = grid.clone();
        let mut next = grid.clone();
        for _ in 0..steps {
            step(&current, &mut next, &params, &mut Constant(draw)).unwrap();
            std::mem::swap(&mut current, &mut next);
        }
        prop_assert_eq!(current, grid);
    }

    #[test]
    fn walls_stay_walls(grid in any_grid(), params in any_params(), draw in 0.0..1.0f64, seed: u64) {
        let mut next = grid.clone();
        step(&grid, &mut next, &params, &mut Constant(draw)).unwrap();
        let mut par_next = grid.clone();
        step_par(&grid, &mut par_next, &params, seed).unwrap();

        for result in [&next, &par_next] {
            for y in 0..grid.height() {
                for x in 0..grid.width() {
                    let before = grid.get(x, y).unwrap();
                    let after = result.get(x, y).unwrap();
                    prop_assert_eq!(before.is_wall(), is_border(&grid, x, y));
                    prop_assert_eq!(after.is_wall(), before.is_wall());
                }
            }
        }
    }

    #[test]
    fn step_never_touches_current(grid in any_grid(), params in any_params(), draw in 0.0..1.0f64) {
        let current = grid.clone();
        let (_, mut next) = initialize(grid.width(), grid.height()).unwrap();
        step(&current, &mut next, &params, &mut Constant(draw)).unwrap();
        prop_assert_eq!(current, grid);
    }

    #[test]
    fn one_state_change_at_most(grid in any_grid(), params in any_params(), draw in 0.0..1.0f64) {
        let mut next = grid.clone();
        step(&grid, &mut next, &params, &mut Constant(draw)).unwrap();
        for (before, after) in grid.cells_iter().zip(next.cells_iter()) {
            let allowed = match before {
                CellState::Wall => *after == CellState::Wall,
                CellState::Susceptible => matches!(after, CellState::Susceptible | CellState::Infected),
                CellState::Infected => matches!(after, CellState::Infected | CellState::Removed),
                CellState::Removed => matches!(after, CellState::Removed | CellState::Susceptible),
            };
            prop_assert!(allowed, "{:?} -> {:?}", before, after);
        }
    }
}
