use ndarray::Array2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::*;

/// Rejection sampling gives up after this many draws per board cell.
const ATTEMPTS_PER_CELL: u32 = 64;

/// Places mines by drawing uniformly random positions until enough distinct
/// cells are mined.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, config: GameConfig) -> Result<Board> {
        config.validate()?;

        let (rows, cols) = config.size;
        let max_attempts = u32::from(config.total_cells()).saturating_mul(ATTEMPTS_PER_CELL);
        let mut mine_mask: Array2<bool> = Array2::default(config.size.to_nd_index());
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut placed: CellCount = 0;
        let mut attempts: u32 = 0;

        while placed < config.mines {
            if attempts >= max_attempts {
                log::warn!(
                    "Mine placement stuck after {} attempts, placed {} of {}",
                    attempts,
                    placed,
                    config.mines
                );
                return Err(GameError::GenerationFailed {
                    placed,
                    requested: config.mines,
                });
            }
            attempts += 1;

            let coords = (rng.random_range(0..rows), rng.random_range(0..cols));
            let slot = &mut mine_mask[coords.to_nd_index()];
            if !*slot {
                *slot = true;
                placed += 1;
            }
        }

        log::debug!(
            "Generated {}x{} board with {} mines in {} draws (seed {})",
            rows,
            cols,
            placed,
            attempts,
            self.seed
        );
        Board::from_mine_mask(&mine_mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn places_exact_mine_count() {
        let board = RandomMinefieldGenerator::new(7)
            .generate(Difficulty::Hard.config())
            .unwrap();

        assert_eq!(board.size(), (16, 30));
        assert_eq!(board.mine_count(), 99);
        assert_eq!(board.mine_positions().len(), 99);
    }

    #[test]
    fn same_seed_same_board() {
        let config = Difficulty::Medium.config();
        let a = RandomMinefieldGenerator::new(42).generate(config).unwrap();
        let b = RandomMinefieldGenerator::new(42).generate(config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn nearly_full_board_still_generates() {
        let config = GameConfig::new(4, 4, 15).unwrap();
        let board = RandomMinefieldGenerator::new(3).generate(config).unwrap();

        assert_eq!(board.mine_count(), 15);
        assert_eq!(board.safe_cell_count(), 1);
    }

    #[test]
    fn invalid_config_is_rejected_before_sampling() {
        let config = GameConfig::new_unchecked((3, 3), 9);
        let err = RandomMinefieldGenerator::new(0).generate(config).unwrap_err();
        assert!(matches!(err, GameError::InvalidConfiguration { .. }));
    }

    #[test]
    fn empty_board_config_is_rejected() {
        let config = GameConfig::new_unchecked((0, 3), 0);
        assert!(RandomMinefieldGenerator::new(0).generate(config).is_err());
    }
}
