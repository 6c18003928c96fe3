use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlagResult {
    Flagged,
    Unflagged,
    /// Revealed cells can't carry a flag.
    Rejected,
}

impl FlagResult {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Rejected)
    }
}

pub fn toggle_flag(board: &mut Board, coords: Coord2) -> Result<FlagResult> {
    let coords = board.validate_coords(coords)?;

    Ok(match board[coords].state {
        CellState::Hidden => {
            board.set_state(coords, CellState::Flagged);
            FlagResult::Flagged
        }
        CellState::Flagged => {
            board.set_state(coords, CellState::Hidden);
            FlagResult::Unflagged
        }
        CellState::Revealed => FlagResult::Rejected,
    })
}

/// Mines minus placed flags. Over-flagging makes it negative.
pub fn mines_remaining(board: &Board) -> isize {
    (board.mine_count() as isize) - (board.flagged_count() as isize)
}
