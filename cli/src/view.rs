use ndarray::Array2;
use std::fmt::Write;
use sweeper_core::{CellView, Coord2, Event, GameSession, TimePressure, ToNdIndex};

/// What the player currently sees, rebuilt only from [`Event`]s after creation.
#[derive(Debug)]
pub struct BoardView {
    cells: Array2<CellView>,
    time_limit: u32,
    remaining: u32,
    mines_left: isize,
    banner: Option<String>,
}

impl BoardView {
    pub fn new(session: &GameSession) -> Self {
        let cells = Array2::from_shape_fn(session.size().to_nd_index(), |(row, col)| {
            session
                .cell_view((row as u8, col as u8))
                .unwrap_or(CellView::Hidden)
        });
        Self {
            cells,
            time_limit: session.time_limit_secs(),
            remaining: session.remaining_secs(),
            mines_left: session.mines_left(),
            banner: None,
        }
    }

    pub fn apply(&mut self, event: &Event) {
        match event {
            Event::GameStarted { config } => {
                self.cells = Array2::from_elem(config.size.to_nd_index(), CellView::Hidden);
                self.remaining = self.time_limit;
                self.mines_left = config.mines as isize;
                self.banner = None;
            }
            Event::TimerStarted { .. } | Event::TimerStopped => {}
            Event::TimeChanged { remaining, .. } => self.remaining = *remaining,
            Event::CellRevealed { coords, view } => self.set(*coords, *view),
            Event::FlagToggled {
                coords,
                flagged,
                mines_left,
            } => {
                let view = if *flagged {
                    CellView::Flagged
                } else {
                    CellView::Hidden
                };
                self.set(*coords, view);
                self.mines_left = *mines_left;
            }
            Event::MinesLeftChanged { mines_left } => self.mines_left = *mines_left,
            Event::GameWon { final_time } => {
                self.banner = Some(format!("You win! Time: {} sec", final_time));
            }
            Event::GameLost { mines, .. } => {
                self.show_mines(mines);
                self.banner = Some("Boom! You hit a mine!".to_string());
            }
            Event::TimedOut { mines } => {
                self.show_mines(mines);
                self.remaining = 0;
                self.banner = Some("Time's up!".to_string());
            }
            Event::HighScore { best, is_new } => {
                let banner = self.banner.get_or_insert_with(String::new);
                let _ = write!(banner, "  Best: {} sec", best);
                if *is_new {
                    banner.push_str(" (new record)");
                }
            }
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let pressure = match TimePressure::from_remaining(self.remaining) {
            TimePressure::Calm => "",
            TimePressure::Warning => " !",
            TimePressure::Critical => " !!",
        };
        let _ = writeln!(
            out,
            "Time: {}:{:02}{}   Mines Left: {}",
            self.remaining / 60,
            self.remaining % 60,
            pressure,
            self.mines_left
        );

        let (_, cols) = self.cells.dim();
        out.push_str("   ");
        for col in 0..cols {
            let _ = write!(out, "{:>3}", col);
        }
        out.push('\n');
        for (row, cells) in self.cells.rows().into_iter().enumerate() {
            let _ = write!(out, "{:>3}", row);
            for &cell in cells {
                let _ = write!(out, "{:>3}", glyph(cell));
            }
            out.push('\n');
        }

        if let Some(banner) = &self.banner {
            out.push_str(banner);
            out.push('\n');
        }
        out
    }

    fn set(&mut self, coords: Coord2, view: CellView) {
        if let Some(cell) = self.cells.get_mut(coords.to_nd_index()) {
            *cell = view;
        }
    }

    fn show_mines(&mut self, mines: &[Coord2]) {
        for &pos in mines {
            self.set(pos, CellView::Mine);
        }
    }
}

fn glyph(cell: CellView) -> char {
    match cell {
        CellView::Hidden => '#',
        CellView::Flagged => 'F',
        CellView::Mine => '*',
        CellView::Number(0) => '.',
        CellView::Number(count) => char::from(b'0' + count),
    }
}
