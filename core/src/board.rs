use alloc::vec::Vec;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// What a cell holds, fixed at generation time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKind {
    Mine,
    /// Safe cell with the number of adjacent mines (0 to 8).
    Empty(u8),
}

/// Player-facing state of a cell. A flag can only sit on an unrevealed cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Hidden,
    Flagged,
    Revealed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub kind: CellKind,
    pub state: CellState,
}

impl Cell {
    pub const fn is_mine(self) -> bool {
        matches!(self.kind, CellKind::Mine)
    }

    pub const fn is_revealed(self) -> bool {
        matches!(self.state, CellState::Revealed)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self.state, CellState::Flagged)
    }

    pub const fn adjacent_mines(self) -> Option<u8> {
        match self.kind {
            CellKind::Mine => None,
            CellKind::Empty(count) => Some(count),
        }
    }

    /// What a player is allowed to see of this cell.
    pub const fn view(self) -> CellView {
        match (self.state, self.kind) {
            (CellState::Hidden, _) => CellView::Hidden,
            (CellState::Flagged, _) => CellView::Flagged,
            (CellState::Revealed, CellKind::Mine) => CellView::Mine,
            (CellState::Revealed, CellKind::Empty(count)) => CellView::Number(count),
        }
    }
}

/// Mine placement plus per-cell state, with running counters for revealed and
/// flagged cells.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: CellCount,
    revealed_count: CellCount,
    flagged_count: CellCount,
}

impl Board {
    /// Builds a board from a fully placed mine mask. Adjacency counts are only
    /// computed here, once every mine is known.
    pub fn from_mine_mask(mine_mask: &Array2<bool>) -> Result<Self> {
        let (rows, cols) = mine_mask.dim();
        let mines = mine_mask.iter().filter(|&&is_mine| is_mine).count();
        let config = GameConfig::new(rows, cols, mines)?;

        let cells = Array2::from_shape_fn(mine_mask.dim(), |(row, col)| {
            let kind = if mine_mask[(row, col)] {
                CellKind::Mine
            } else {
                // `config` guarantees both axes fit in a `Coord`
                let center = (row as Coord, col as Coord);
                let count = NeighborIter::new(center, config.size)
                    .filter(|&pos| mine_mask[pos.to_nd_index()])
                    .count();
                CellKind::Empty(count as u8)
            };
            Cell {
                kind,
                state: CellState::Hidden,
            }
        });

        Ok(Self {
            cells,
            mine_count: config.mines,
            revealed_count: 0,
            flagged_count: 0,
        })
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if !in_bounds(coords, size) {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Self::from_mine_mask(&mine_mask)
    }

    pub fn config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.mine_count)
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        // dimensions were validated on construction
        (rows as Coord, cols as Coord)
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size().0, self.size().1)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    /// Every safe cell has been revealed.
    pub fn is_cleared(&self) -> bool {
        self.revealed_count == self.safe_cell_count()
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if in_bounds(coords, self.size()) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn get(&self, coords: Coord2) -> Option<Cell> {
        self.cells.get(coords.to_nd_index()).copied()
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), &cell)| ((row as Coord, col as Coord), cell))
    }

    pub fn mine_positions(&self) -> Vec<Coord2> {
        self.iter()
            .filter(|(_, cell)| cell.is_mine())
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Moves a cell to `state`, keeping the counters in step. Returns the
    /// previous state.
    pub(crate) fn set_state(&mut self, coords: Coord2, state: CellState) -> CellState {
        let cell = &mut self.cells[coords.to_nd_index()];
        let previous = core::mem::replace(&mut cell.state, state);

        match previous {
            CellState::Hidden => {}
            CellState::Flagged => self.flagged_count -= 1,
            CellState::Revealed => self.revealed_count -= 1,
        }
        match state {
            CellState::Hidden => {}
            CellState::Flagged => self.flagged_count += 1,
            CellState::Revealed => self.revealed_count += 1,
        }

        previous
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}
