use std::ops::Index;

use crate::error::{GridError, GridResult};
use crate::{CellState, Census};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

impl GridSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn num_cells(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Loc {
    pub x: u32,
    pub y: u32,
}

impl Loc {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    pub fn grid_index(&self, size: GridSize) -> Option<usize> {
        if self.x < size.width && self.y < size.height {
            Some(self.y as usize * size.width as usize + self.x as usize)
        } else {
            None
        }
    }
}

/// A fixed-size rectangle of cells whose outermost ring is always `Wall`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: GridSize,
    cells: Vec<CellState>,
}

impl Grid {
    /// Builds a grid with a wall border and a susceptible interior.
    pub fn new(size: GridSize) -> GridResult<Self> {
        if size.width < 3 || size.height < 3 {
            return Err(GridError::InvalidDimensions {
                width: size.width,
                height: size.height,
            });
        }

        let mut cells = vec![CellState::Susceptible; size.num_cells()];
        for (index, cell) in cells.iter_mut().enumerate() {
            let x = (index % size.width as usize) as u32;
            let y = (index / size.width as usize) as u32;
            if Self::is_border(size, x, y) {
                *cell = CellState::Wall;
            }
        }
        Ok(Self { size, cells })
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// Cells in row-major order, top row first.
    pub fn cells_iter(&self) -> impl DoubleEndedIterator<Item = &CellState> + Clone {
        self.cells.iter()
    }

    pub fn is_interior(&self, x: u32, y: u32) -> bool {
        x < self.width() && y < self.height() && !Self::is_border(self.size, x, y)
    }

    pub fn get(&self, x: u32, y: u32) -> GridResult<CellState> {
        self.checked_index(x, y).map(|index| self.cells[index])
    }

    /// Overwrites an interior cell. The wall border is immutable, and no
    /// interior cell may become a wall.
    pub fn set(&mut self, x: u32, y: u32, state: CellState) -> GridResult<()> {
        let index = self.checked_index(x, y)?;
        if Self::is_border(self.size, x, y) {
            return Err(GridError::ImmutableWall { x, y });
        }
        if state.is_wall() {
            return Err(GridError::WallState { x, y });
        }
        self.cells[index] = state;
        Ok(())
    }

    pub fn copy_from(&mut self, source: &Self) -> GridResult<()> {
        self.check_same_size(source)?;
        self.cells.copy_from_slice(&source.cells);
        Ok(())
    }

    pub fn census(&self) -> Census {
        let mut census = Census::default();
        for cell in &self.cells {
            match cell {
                CellState::Susceptible => census.susceptible += 1,
                CellState::Infected => census.infected += 1,
                CellState::Removed => census.removed += 1,
                CellState::Wall => {}
            }
        }
        census
    }

    pub(crate) fn check_same_size(&self, other: &Self) -> GridResult<()> {
        if self.size == other.size {
            Ok(())
        } else {
            Err(GridError::DimensionMismatch {
                expected: self.size,
                actual: other.size,
            })
        }
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [CellState] {
        &mut self.cells
    }

    fn checked_index(&self, x: u32, y: u32) -> GridResult<usize> {
        Loc::new(x, y)
            .grid_index(self.size)
            .ok_or(GridError::OutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            })
    }

    fn is_border(size: GridSize, x: u32, y: u32) -> bool {
        x == 0 || y == 0 || x == size.width - 1 || y == size.height - 1
    }
}

impl Index<Loc> for Grid {
    type Output = CellState;

    fn index(&self, loc: Loc) -> &Self::Output {
        loc.grid_index(self.size)
            .map(|index| &self.cells[index])
            .unwrap_or_else(|| panic!("Index indices {}, {} out of bounds", loc.x, loc.y))
    }
}

/// The four orthogonal neighbors of an interior cell. Never wraps: the
/// wall border guarantees every neighbor exists.
pub struct Neighborhood<'a> {
    grid: &'a Grid,
    center: Loc,
}

impl<'a> Neighborhood<'a> {
    pub(crate) fn new(grid: &'a Grid, center: Loc) -> Self {
        debug_assert!(grid.is_interior(center.x, center.y));
        Self { grid, center }
    }

    pub fn center(&self) -> CellState {
        self.grid[self.center]
    }

    pub fn for_neighbor_cells<F>(&self, mut f: F)
    where
        F: FnMut(CellState),
    {
        let Loc { x, y } = self.center;
        f(self.grid[Loc::new(x - 1, y)]);
        f(self.grid[Loc::new(x + 1, y)]);
        f(self.grid[Loc::new(x, y - 1)]);
        f(self.grid[Loc::new(x, y + 1)]);
    }

    pub fn counts(&self) -> NeighborCounts {
        let mut counts = NeighborCounts::default();
        self.for_neighbor_cells(|neighbor| counts.add(neighbor));
        counts
    }
}

/// Per-state tally of a cell's neighbors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NeighborCounts([u8; 4]);

impl NeighborCounts {
    pub fn add(&mut self, state: CellState) {
        self.0[state.index()] += 1;
    }

    pub fn count(&self, state: CellState) -> u32 {
        self.0[state.index()] as u32
    }
}
