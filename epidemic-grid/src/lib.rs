#![deny(clippy::all)]
#![forbid(unsafe_code)]

mod epidemic;
mod error;
mod grid;
mod random;
mod step;

pub use epidemic::Epidemic;
pub use error::{GridError, GridResult};
pub use grid::{Grid, GridSize, Loc, NeighborCounts, Neighborhood};
pub use random::{Random, RandomSource};
pub use step::{SimParams, step, step_par};

/// State of a single grid cell. `Wall` is fixed terrain; the other three
/// are the epidemiological states.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellState {
    Wall,
    #[default]
    Susceptible,
    Infected,
    Removed,
}

impl CellState {
    pub const ALL: [CellState; 4] = [
        CellState::Wall,
        CellState::Susceptible,
        CellState::Infected,
        CellState::Removed,
    ];

    pub fn index(self) -> usize {
        match self {
            CellState::Wall => 0,
            CellState::Susceptible => 1,
            CellState::Infected => 2,
            CellState::Removed => 3,
        }
    }

    pub fn is_wall(self) -> bool {
        self == CellState::Wall
    }

    /// Applies the stochastic transition rule to a cell whose current state is
    /// `self`. `draw` is one uniform sample in [0, 1); the transition happens
    /// when it is strictly below the transition probability.
    pub fn next_state(self, counts: &NeighborCounts, params: &SimParams, draw: f64) -> CellState {
        match self {
            CellState::Susceptible => {
                let p = params.infection_probability(counts.count(CellState::Infected));
                if draw < p {
                    return CellState::Infected;
                }
            }
            CellState::Infected => {
                if draw < params.removal_probability() {
                    return CellState::Removed;
                }
            }
            CellState::Removed => {
                let p = params.reinsertion_probability(counts.count(CellState::Susceptible));
                if draw < p {
                    return CellState::Susceptible;
                }
            }
            CellState::Wall => {}
        }
        self
    }
}

/// Number of cells in each epidemiological state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Census {
    pub susceptible: usize,
    pub infected: usize,
    pub removed: usize,
}

/// Creates the two buffers of a run: identical grids with a wall border and
/// a susceptible interior.
pub fn initialize(width: u32, height: u32) -> GridResult<(Grid, Grid)> {
    let current = Grid::new(GridSize::new(width, height))?;
    let next = current.clone();
    Ok((current, next))
}

/// Forces an interior cell into a new state between steps, e.g. to seed an
/// outbreak. Border coordinates and `Wall` are rejected.
pub fn intervene(grid: &mut Grid, x: u32, y: u32, state: CellState) -> GridResult<()> {
    grid.set(x, y, state)
}

pub fn read(grid: &Grid, x: u32, y: u32) -> GridResult<CellState> {
    grid.get(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(susceptible: u8, infected: u8) -> NeighborCounts {
        let mut counts = NeighborCounts::default();
        for _ in 0..susceptible {
            counts.add(CellState::Susceptible);
        }
        for _ in 0..infected {
            counts.add(CellState::Infected);
        }
        counts
    }

    #[test]
    fn initialize_stamps_wall_border() {
        let (current, next) = initialize(4, 3).unwrap();
        assert_eq!(current, next);
        for y in 0..3 {
            for x in 0..4 {
                let expected = if x == 0 || y == 0 || x == 3 || y == 2 {
                    CellState::Wall
                } else {
                    CellState::Susceptible
                };
                assert_eq!(read(&current, x, y).unwrap(), expected, "({x}, {y})");
            }
        }
    }

    #[test]
    fn initialize_rejects_small_grids() {
        assert!(matches!(
            initialize(2, 10),
            Err(GridError::InvalidDimensions { width: 2, height: 10 })
        ));
        assert!(initialize(10, 2).is_err());
    }

    #[test]
    fn intervene_rejects_border() {
        let (mut grid, _) = initialize(5, 5).unwrap();
        assert!(matches!(
            intervene(&mut grid, 0, 2, CellState::Infected),
            Err(GridError::ImmutableWall { x: 0, y: 2 })
        ));
        intervene(&mut grid, 2, 2, CellState::Infected).unwrap();
        assert_eq!(read(&grid, 2, 2).unwrap(), CellState::Infected);
    }

    #[test]
    fn susceptible_infection_scales_with_infected_neighbors() {
        let params = SimParams::default().with_infect_rate(0.3);
        let state = CellState::Susceptible;
        assert_eq!(state.next_state(&counts(4, 0), &params, 0.0), CellState::Susceptible);
        assert_eq!(state.next_state(&counts(2, 2), &params, 0.59), CellState::Infected);
        assert_eq!(state.next_state(&counts(2, 2), &params, 0.6), CellState::Susceptible);
    }

    #[test]
    fn infected_removal_ignores_neighbors() {
        let params = SimParams::default().with_remove_rate(0.5);
        let state = CellState::Infected;
        assert_eq!(state.next_state(&counts(0, 0), &params, 0.49), CellState::Removed);
        assert_eq!(state.next_state(&counts(0, 4), &params, 0.5), CellState::Infected);
    }

    #[test]
    fn removed_reinsertion_saturates() {
        let params = SimParams::default().with_reinsert_rate(0.6);
        let state = CellState::Removed;
        assert_eq!(state.next_state(&counts(2, 0), &params, 0.5), CellState::Susceptible);
        assert_eq!(state.next_state(&counts(2, 0), &params, 0.99), CellState::Susceptible);
        assert_eq!(state.next_state(&counts(1, 0), &params, 0.99), CellState::Removed);
    }

    #[test]
    fn wall_never_transitions() {
        let params = SimParams::new(1.0, 1.0, 1.0);
        assert_eq!(
            CellState::Wall.next_state(&counts(2, 2), &params, 0.0),
            CellState::Wall
        );
    }

    #[test]
    fn state_indexes_are_distinct() {
        for (i, state) in CellState::ALL.iter().enumerate() {
            assert_eq!(state.index(), i);
        }
    }
}
