use alloc::vec::Vec;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::*;

/// Front door for a presentation layer: takes [`Command`]s, returns [`Event`]s.
///
/// Holds the current session, the selected preset and the high-score store. A
/// host running input and ticks on different threads must put the whole `Game`
/// behind one lock.
#[derive(Debug)]
pub struct Game<S> {
    session: GameSession,
    difficulty: Difficulty,
    rng: SmallRng,
    scores: S,
}

impl<S: HighScoreStore> Game<S> {
    /// Starts with a fresh board for `difficulty`. Every later board is seeded
    /// from `seed`, so the same seed replays the same sequence of games.
    pub fn new(difficulty: Difficulty, seed: u64, scores: S) -> Result<Self> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let board = RandomMinefieldGenerator::new(rng.random()).generate(difficulty.config())?;
        Ok(Self {
            session: GameSession::new(board),
            difficulty,
            rng,
            scores,
        })
    }

    pub fn from_session(session: GameSession, seed: u64, scores: S) -> Self {
        Self {
            session,
            difficulty: Difficulty::default(),
            rng: SmallRng::seed_from_u64(seed),
            scores,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn scores(&self) -> &S {
        &self.scores
    }

    pub fn best_time(&self) -> Option<u32> {
        self.scores.best()
    }

    /// Only new-game requests can fail; the current session is left untouched
    /// when they do.
    pub fn handle(&mut self, command: Command) -> Result<Vec<Event>> {
        let mut events = match command {
            Command::NewGame(config) => return self.new_game(config),
            Command::SelectDifficulty(difficulty) => {
                let events = self.new_game(difficulty.config())?;
                self.difficulty = difficulty;
                return Ok(events);
            }
            Command::Reveal(coords) => self.session.on_reveal(coords),
            Command::ToggleFlag(coords) => self.session.on_toggle_flag(coords),
            Command::Tick(token) => {
                if !self.session.timer().accepts(token) {
                    log::trace!("Dropping stale tick {:?}", token);
                    return Ok(Vec::new());
                }
                self.session.on_tick()
            }
        };

        let final_time = events.iter().find_map(|event| match event {
            Event::GameWon { final_time } => Some(*final_time),
            _ => None,
        });
        if let Some(final_time) = final_time {
            events.push(self.record_win(final_time));
        }

        Ok(events)
    }

    fn new_game(&mut self, config: GameConfig) -> Result<Vec<Event>> {
        let generator = RandomMinefieldGenerator::new(self.rng.random());
        let board = generator
            .generate(config)
            .inspect_err(|err| log::warn!("New game rejected: {}", err))?;

        let mut events = Vec::new();
        if self.session.timer().is_running() {
            events.push(Event::TimerStopped);
        }
        let timer = self.session.timer().successor();
        let time_limit = self.session.time_limit_secs();
        self.session = GameSession::with_timer(board, timer).with_time_limit(time_limit);

        log::debug!(
            "New game: {}x{} with {} mines",
            config.rows(),
            config.cols(),
            config.mines
        );
        events.push(Event::GameStarted { config });
        Ok(events)
    }

    fn record_win(&mut self, final_time: u32) -> Event {
        match self.scores.best() {
            Some(best) if best <= final_time => Event::HighScore {
                best,
                is_new: false,
            },
            previous => {
                log::info!("New best time {}s (was {:?})", final_time, previous);
                self.scores.set_best(final_time);
                Event::HighScore {
                    best: final_time,
                    is_new: true,
                }
            }
        }
    }
}
