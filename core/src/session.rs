use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> Running
/// - Running -> Won
/// - Running -> LostMine
/// - Running -> LostTimeout
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    NotStarted,
    Running,
    Won,
    LostMine,
    LostTimeout,
}

impl GameStatus {
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::LostMine | Self::LostTimeout)
    }
}

/// One game from first click to a terminal status.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    board: Board,
    status: GameStatus,
    elapsed_secs: u32,
    time_limit_secs: u32,
    timer: TimerDriver,
    triggered_mine: Option<Coord2>,
}

impl GameSession {
    pub fn new(board: Board) -> Self {
        Self::with_timer(board, TimerDriver::default())
    }

    /// Starts from an existing driver so ticks issued before this session are
    /// still recognised as stale.
    pub fn with_timer(board: Board, timer: TimerDriver) -> Self {
        Self {
            board,
            status: GameStatus::NotStarted,
            elapsed_secs: 0,
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            timer,
            triggered_mine: None,
        }
    }

    pub fn new_game(config: GameConfig, generator: impl MinefieldGenerator) -> Result<Self> {
        Ok(Self::new(generator.generate(config)?))
    }

    pub fn with_time_limit(mut self, secs: u32) -> Self {
        self.time_limit_secs = secs;
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> GameConfig {
        self.board.config()
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.board.mine_count()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    pub fn remaining_secs(&self) -> u32 {
        self.time_limit_secs.saturating_sub(self.elapsed_secs)
    }

    pub fn time_pressure(&self) -> TimePressure {
        TimePressure::from_remaining(self.remaining_secs())
    }

    pub fn mines_left(&self) -> isize {
        mines_remaining(&self.board)
    }

    pub fn revealed_count(&self) -> CellCount {
        self.board.revealed_count()
    }

    pub fn flagged_count(&self) -> CellCount {
        self.board.flagged_count()
    }

    pub fn cell_view(&self, coords: Coord2) -> Option<CellView> {
        self.board.get(coords).map(Cell::view)
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn timer(&self) -> &TimerDriver {
        &self.timer
    }

    pub fn on_reveal(&mut self, coords: Coord2) -> Vec<Event> {
        let mut events = Vec::new();

        if self.status.is_terminal() {
            log::trace!("Ignoring reveal at {:?}, game is over", coords);
            return events;
        }
        if self.board.validate_coords(coords).is_err() {
            log::trace!("Ignoring reveal at {:?}, out of bounds", coords);
            return events;
        }

        if self.status == GameStatus::NotStarted {
            self.status = GameStatus::Running;
            let token = self.timer.start();
            log::debug!("Game started by reveal at {:?}", coords);
            events.push(Event::TimerStarted { token });
        }

        let flags_before = self.board.flagged_count();
        let outcome = match reveal(&mut self.board, coords) {
            Ok(outcome) => outcome,
            Err(err) => {
                log::trace!("Ignoring reveal at {:?}: {}", coords, err);
                return events;
            }
        };

        match outcome {
            RevealOutcome::AlreadyRevealed => {
                log::trace!("Reveal at {:?} had no effect, already open", coords);
            }
            RevealOutcome::Protected => {
                log::trace!("Reveal at {:?} blocked by flag", coords);
            }
            RevealOutcome::HitMine => {
                self.triggered_mine = Some(coords);
                events.push(Event::CellRevealed {
                    coords,
                    view: CellView::Mine,
                });
                self.finish(GameStatus::LostMine, &mut events);
            }
            RevealOutcome::Cleared(opened) => {
                events.extend(opened.into_iter().map(|pos| Event::CellRevealed {
                    coords: pos,
                    view: self.board[pos].view(),
                }));
                if self.board.flagged_count() != flags_before {
                    events.push(Event::MinesLeftChanged {
                        mines_left: self.mines_left(),
                    });
                }
                if self.board.is_cleared() {
                    self.finish(GameStatus::Won, &mut events);
                }
            }
        }

        events
    }

    /// Flagging never starts the clock, only a reveal does.
    pub fn on_toggle_flag(&mut self, coords: Coord2) -> Vec<Event> {
        let mut events = Vec::new();

        if self.status.is_terminal() {
            log::trace!("Ignoring flag at {:?}, game is over", coords);
            return events;
        }

        let flagged = match toggle_flag(&mut self.board, coords) {
            Ok(FlagResult::Flagged) => true,
            Ok(FlagResult::Unflagged) => false,
            Ok(FlagResult::Rejected) => return events,
            Err(err) => {
                log::trace!("Ignoring flag at {:?}: {}", coords, err);
                return events;
            }
        };

        events.push(Event::FlagToggled {
            coords,
            flagged,
            mines_left: self.mines_left(),
        });
        events
    }

    /// Advances the clock by one second. Only meaningful while running.
    pub fn on_tick(&mut self) -> Vec<Event> {
        let mut events = Vec::new();

        if !self.status.is_running() {
            log::trace!("Ignoring tick in state {:?}", self.status);
            return events;
        }

        self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        events.push(Event::TimeChanged {
            elapsed: self.elapsed_secs,
            remaining: self.remaining_secs(),
        });

        if self.elapsed_secs >= self.time_limit_secs {
            self.finish(GameStatus::LostTimeout, &mut events);
        }

        events
    }

    fn finish(&mut self, status: GameStatus, events: &mut Vec<Event>) {
        debug_assert!(status.is_terminal());
        if self.status.is_terminal() {
            return;
        }

        self.status = status;
        self.timer.stop();
        events.push(Event::TimerStopped);
        log::debug!("Game ended: {:?} after {}s", status, self.elapsed_secs);

        match status {
            GameStatus::Won => events.push(Event::GameWon {
                final_time: self.elapsed_secs,
            }),
            GameStatus::LostMine => {
                let mines = self.reveal_mines();
                let triggered = self.triggered_mine.unwrap_or_default();
                events.push(Event::GameLost { triggered, mines });
            }
            GameStatus::LostTimeout => {
                let mines = self.reveal_mines();
                events.push(Event::TimedOut { mines });
            }
            GameStatus::NotStarted | GameStatus::Running => {}
        }
    }

    /// Opens every mine for display once the game is lost.
    fn reveal_mines(&mut self) -> Vec<Coord2> {
        let mines = self.board.mine_positions();
        for &pos in &mines {
            self.board.set_state(pos, CellState::Revealed);
        }
        mines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(size: Coord2, mines: &[Coord2]) -> GameSession {
        GameSession::new(Board::from_mine_coords(size, mines).unwrap())
    }

    #[test]
    fn first_reveal_starts_the_timer() {
        let mut session = session((3, 3), &[(0, 0)]);
        assert_eq!(session.status(), GameStatus::NotStarted);

        let events = session.on_reveal((1, 1));

        assert_eq!(session.status(), GameStatus::Running);
        assert!(session.timer().is_running());
        assert!(matches!(events[0], Event::TimerStarted { .. }));
        assert_eq!(
            events[1],
            Event::CellRevealed {
                coords: (1, 1),
                view: CellView::Number(1)
            }
        );
    }

    #[test]
    fn flag_before_reveal_does_not_start_timer() {
        let mut session = session((3, 3), &[(0, 0)]);

        let events = session.on_toggle_flag((0, 0));

        assert_eq!(session.status(), GameStatus::NotStarted);
        assert!(!session.timer().is_running());
        assert_eq!(
            events,
            [Event::FlagToggled {
                coords: (0, 0),
                flagged: true,
                mines_left: 0
            }]
        );
        assert!(session.on_tick().is_empty());
        assert_eq!(session.elapsed_secs(), 0);
    }

    #[test]
    fn hitting_a_mine_loses_and_shows_all_mines() {
        let mut session = session((3, 3), &[(0, 0), (2, 2)]);
        session.on_toggle_flag((2, 2));

        let events = session.on_reveal((0, 0));

        assert_eq!(session.status(), GameStatus::LostMine);
        assert!(!session.timer().is_running());
        assert_eq!(session.triggered_mine(), Some((0, 0)));
        assert_eq!(
            events.last(),
            Some(&Event::GameLost {
                triggered: (0, 0),
                mines: alloc::vec![(0, 0), (2, 2)]
            })
        );
        assert_eq!(session.cell_view((2, 2)), Some(CellView::Mine));
    }

    #[test]
    fn clearing_three_by_three_wins_in_one_reveal() {
        let mut session = session((3, 3), &[(0, 0)]);
        assert_eq!(session.board()[(2, 2)].kind, CellKind::Empty(0));

        let events = session.on_reveal((2, 2));

        assert_eq!(session.status(), GameStatus::Won);
        assert_eq!(session.revealed_count(), 8);
        let revealed = events
            .iter()
            .filter(|event| matches!(event, Event::CellRevealed { .. }))
            .count();
        assert_eq!(revealed, 8);
        assert_eq!(events.last(), Some(&Event::GameWon { final_time: 0 }));
        assert_eq!(session.cell_view((0, 0)), Some(CellView::Hidden));
    }

    #[test]
    fn win_reports_elapsed_time() {
        let mut session = session((1, 3), &[(0, 0)]);
        session.on_reveal((0, 1));
        for _ in 0..12 {
            session.on_tick();
        }

        let events = session.on_reveal((0, 2));

        assert_eq!(events.last(), Some(&Event::GameWon { final_time: 12 }));
        assert_eq!(session.elapsed_secs(), 12);
    }

    #[test]
    fn terminal_status_ignores_further_input() {
        let mut session = session((2, 2), &[(0, 0)]);
        session.on_reveal((0, 0));
        let snapshot = session.clone();

        assert!(session.on_reveal((1, 1)).is_empty());
        assert!(session.on_toggle_flag((1, 1)).is_empty());
        assert!(session.on_tick().is_empty());
        assert_eq!(session, snapshot);
    }

    #[test]
    fn time_limit_ends_the_game() {
        let mut session = session((3, 3), &[(0, 0)]);
        session.on_reveal((1, 1));

        for _ in 0..DEFAULT_TIME_LIMIT_SECS - 1 {
            session.on_tick();
        }
        assert_eq!(session.status(), GameStatus::Running);
        assert_eq!(session.remaining_secs(), 1);
        assert_eq!(session.time_pressure(), TimePressure::Critical);

        let events = session.on_tick();

        assert_eq!(session.status(), GameStatus::LostTimeout);
        assert_eq!(
            events.last(),
            Some(&Event::TimedOut {
                mines: alloc::vec![(0, 0)]
            })
        );
        assert!(events.contains(&Event::TimerStopped));
    }

    #[test]
    fn custom_time_limit() {
        let mut session = session((3, 3), &[(0, 0)]).with_time_limit(2);
        session.on_reveal((1, 1));
        session.on_tick();
        session.on_tick();

        assert_eq!(session.status(), GameStatus::LostTimeout);
    }

    #[test]
    fn protected_and_out_of_bounds_reveals_are_silent() {
        let mut session = session((2, 2), &[(0, 0)]);
        session.on_toggle_flag((0, 0));

        assert!(session.on_reveal((5, 5)).is_empty());
        assert_eq!(session.status(), GameStatus::NotStarted);

        let events = session.on_reveal((0, 0));
        assert!(matches!(events.as_slice(), [Event::TimerStarted { .. }]));
        assert_eq!(session.status(), GameStatus::Running);
        assert!(session.on_toggle_flag((9, 0)).is_empty());
    }

    #[test]
    fn flood_fill_over_flag_updates_mines_left() {
        let mut session = session((1, 4), &[(0, 3)]);
        session.on_toggle_flag((0, 1));
        assert_eq!(session.mines_left(), 0);

        let events = session.on_reveal((0, 0));

        assert!(events.contains(&Event::MinesLeftChanged { mines_left: 1 }));
        assert_eq!(session.status(), GameStatus::Won);
    }

    #[test]
    fn win_holds_for_any_reveal_order() {
        // . * .
        // . . .
        let mines = [(0, 1)];
        let orders: [[Coord2; 5]; 2] = [
            [(0, 0), (0, 2), (1, 0), (1, 1), (1, 2)],
            [(1, 2), (1, 1), (1, 0), (0, 2), (0, 0)],
        ];

        for order in orders {
            let mut session = session((2, 3), &mines);
            for (i, coords) in order.into_iter().enumerate() {
                session.on_reveal(coords);
                let expected = if i == order.len() - 1 {
                    GameStatus::Won
                } else {
                    GameStatus::Running
                };
                assert_eq!(session.status(), expected);
            }
        }
    }
}
