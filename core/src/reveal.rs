use alloc::vec;
use alloc::vec::Vec;

use crate::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Cell was already open, nothing changed.
    AlreadyRevealed,
    /// Cell carries a flag, which guards it against a direct reveal.
    Protected,
    HitMine,
    /// Newly revealed positions, in the order they were opened.
    Cleared(Vec<Coord2>),
}

impl RevealOutcome {
    pub fn has_update(&self) -> bool {
        matches!(self, Self::HitMine | Self::Cleared(_))
    }
}

/// Opens the cell at `coords`. Zero cells spread to every in-bounds neighbour,
/// regardless of its kind or flag, and keep spreading through further zero
/// cells. The walk uses an explicit stack so board size never limits depth.
pub fn reveal(board: &mut Board, coords: Coord2) -> Result<RevealOutcome> {
    let coords = board.validate_coords(coords)?;

    match board[coords].state {
        CellState::Revealed => return Ok(RevealOutcome::AlreadyRevealed),
        CellState::Flagged => return Ok(RevealOutcome::Protected),
        CellState::Hidden => {}
    }

    let mut opened = Vec::new();
    let mut hit_mine = false;
    let mut to_visit = vec![coords];

    while let Some(visit_coords) = to_visit.pop() {
        if board[visit_coords].is_revealed() {
            continue;
        }
        board.set_state(visit_coords, CellState::Revealed);

        match board[visit_coords].kind {
            CellKind::Mine => {
                log::debug!("Revealed mine at {:?}", visit_coords);
                hit_mine = true;
            }
            CellKind::Empty(0) => {
                opened.push(visit_coords);
                to_visit.extend(
                    board
                        .iter_neighbors(visit_coords)
                        .filter(|&pos| !board[pos].is_revealed()),
                );
            }
            CellKind::Empty(_) => opened.push(visit_coords),
        }
    }

    if opened.len() > 1 {
        log::trace!("Flood fill from {:?} opened {} cells", coords, opened.len());
    }

    Ok(if hit_mine {
        RevealOutcome::HitMine
    } else {
        RevealOutcome::Cleared(opened)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::collections::BTreeSet;

    fn board(size: Coord2, mines: &[Coord2]) -> Board {
        Board::from_mine_coords(size, mines).unwrap()
    }

    #[test]
    fn numbered_cell_opens_alone() {
        let mut board = board((3, 3), &[(0, 0)]);

        let outcome = reveal(&mut board, (1, 1)).unwrap();

        assert_eq!(outcome, RevealOutcome::Cleared(vec![(1, 1)]));
        assert_eq!(board.revealed_count(), 1);
    }

    #[test]
    fn reveal_is_idempotent() {
        let mut board = board((3, 3), &[(0, 0)]);
        reveal(&mut board, (1, 1)).unwrap();

        let outcome = reveal(&mut board, (1, 1)).unwrap();

        assert_eq!(outcome, RevealOutcome::AlreadyRevealed);
        assert!(!outcome.has_update());
        assert_eq!(board.revealed_count(), 1);
    }

    #[test]
    fn direct_hit_on_mine() {
        let mut board = board((2, 2), &[(0, 0)]);

        assert_eq!(reveal(&mut board, (0, 0)).unwrap(), RevealOutcome::HitMine);
        assert!(board[(0, 0)].is_revealed());
    }

    #[test]
    fn flagged_cell_is_protected() {
        let mut board = board((2, 2), &[(0, 0)]);
        board.set_state((0, 0), CellState::Flagged);

        assert_eq!(reveal(&mut board, (0, 0)).unwrap(), RevealOutcome::Protected);
        assert!(board[(0, 0)].is_flagged());
    }

    #[test]
    fn out_of_bounds_is_an_error() {
        let mut board = board((2, 2), &[(0, 0)]);
        assert_eq!(reveal(&mut board, (2, 0)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn flood_fill_stops_at_numbered_border() {
        // . . . . .
        // . . . . .
        // . . . 1 1
        // . . . 1 *
        let mut board = board((4, 5), &[(3, 4)]);

        let RevealOutcome::Cleared(opened) = reveal(&mut board, (0, 0)).unwrap() else {
            panic!("expected a cleared region");
        };

        assert_eq!(opened.len(), 19);
        let unique: BTreeSet<_> = opened.iter().copied().collect();
        assert_eq!(unique.len(), opened.len());
        assert!(!board[(3, 4)].is_revealed());
        assert!(board.is_cleared());
    }

    #[test]
    fn flood_fill_does_not_cross_wall_of_numbers() {
        // . * .
        // . * .
        // . * .
        let mut board = board((3, 3), &[(0, 1), (1, 1), (2, 1)]);
        reveal(&mut board, (0, 0)).unwrap();

        // (0, 0) has a count, so nothing spreads
        assert_eq!(board.revealed_count(), 1);
    }

    #[test]
    fn flood_fill_never_reaches_a_mine() {
        // a zero cell has no mine neighbours, so the uniform walk stops at the
        // numbered ring before any mine
        let mines = [(0, 4), (4, 0), (2, 2)];
        let mut board = board((5, 5), &mines);

        let outcome = reveal(&mut board, (0, 0)).unwrap();

        assert!(matches!(outcome, RevealOutcome::Cleared(_)));
        for mine in mines {
            assert!(!board[mine].is_revealed());
        }
    }

    #[test]
    fn flood_fill_opens_flagged_cells_and_clears_the_flag() {
        let mut board = board((1, 4), &[(0, 3)]);
        board.set_state((0, 1), CellState::Flagged);

        let outcome = reveal(&mut board, (0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::Cleared(vec![(0, 0), (0, 1), (0, 2)]));
        assert_eq!(board.flagged_count(), 0);
        assert!(board[(0, 1)].is_revealed());
    }

    #[test]
    fn flood_fill_handles_large_open_board() {
        let mut board = board((255, 255), &[(254, 254)]);

        let RevealOutcome::Cleared(opened) = reveal(&mut board, (0, 0)).unwrap() else {
            panic!("expected a cleared region");
        };

        assert_eq!(opened.len(), 255 * 255 - 1);
        assert!(board.is_cleared());
    }
}
