use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Display value of a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    /// Open safe cell, 0 shows as blank.
    Number(u8),
    Mine,
}

/// Input forwarded by the presentation layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    NewGame(GameConfig),
    SelectDifficulty(Difficulty),
    Reveal(Coord2),
    ToggleFlag(Coord2),
    Tick(TickToken),
}

/// State changes for the presentation layer, in the order they happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    GameStarted {
        config: GameConfig,
    },
    /// The host should deliver [`Command::Tick`] with this token every
    /// [`TICK_INTERVAL`] until [`Event::TimerStopped`].
    TimerStarted {
        token: TickToken,
    },
    TimerStopped,
    TimeChanged {
        elapsed: u32,
        remaining: u32,
    },
    CellRevealed {
        coords: Coord2,
        view: CellView,
    },
    FlagToggled {
        coords: Coord2,
        flagged: bool,
        mines_left: isize,
    },
    /// Flags were swept away by a flood fill.
    MinesLeftChanged {
        mines_left: isize,
    },
    GameWon {
        final_time: u32,
    },
    GameLost {
        triggered: Coord2,
        mines: Vec<Coord2>,
    },
    TimedOut {
        mines: Vec<Coord2>,
    },
    HighScore {
        best: u32,
        is_new: bool,
    },
}
