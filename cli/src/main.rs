use anyhow::Context;
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use std::path::PathBuf;
use sweeper_core::{
    Command, Difficulty, Event, Game, HighScoreStore, TICK_INTERVAL, TickToken,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Instant, Interval};

use input::Input;
use store::JsonFileStore;
use view::BoardView;

mod input;
mod store;
mod view;

#[derive(Parser, Debug)]
#[command(version, about = "Minesweeper against the clock", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    /// Board preset for the first game
    #[arg(short, long, default_value_t = Difficulty::Easy)]
    difficulty: Difficulty,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// File holding the best time
    #[arg(long)]
    scores: Option<PathBuf>,
}

/// Wall clock for one timer run, tagged with the token that started it.
struct Ticker {
    token: TickToken,
    interval: Interval,
}

impl Ticker {
    fn new(token: TickToken) -> Self {
        let interval = tokio::time::interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);
        Self { token, interval }
    }
}

async fn next_tick(ticker: &mut Option<Ticker>) -> TickToken {
    match ticker {
        Some(ticker) => {
            ticker.interval.tick().await;
            ticker.token
        }
        None => std::future::pending().await,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.verbose.tracing_level_filter())
        .with_writer(std::io::stderr)
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {}", seed);

    let scores = JsonFileStore::open(args.scores.unwrap_or_else(JsonFileStore::default_path));
    let game = Game::new(args.difficulty, seed, scores).context("Could not start a game")?;

    log::debug!("App started");
    run(game).await
}

/// Single event loop: player input and clock ticks are handled one at a time.
async fn run<S: HighScoreStore>(mut game: Game<S>) -> anyhow::Result<()> {
    let mut view = BoardView::new(game.session());
    let mut ticker: Option<Ticker> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}\n", input::HELP);
    print!("{}", view.render());

    loop {
        let command = tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Could not read input")? else {
                    break;
                };
                match input::parse(&line) {
                    Ok(None) => continue,
                    Ok(Some(Input::Quit)) => break,
                    Ok(Some(Input::Help)) => {
                        println!("{}", input::HELP);
                        continue;
                    }
                    Ok(Some(Input::Best)) => {
                        match game.best_time() {
                            Some(best) => println!("Best time: {} seconds", best),
                            None => println!("No high score yet"),
                        }
                        continue;
                    }
                    Ok(Some(Input::Reveal(coords))) => Command::Reveal(coords),
                    Ok(Some(Input::Flag(coords))) => Command::ToggleFlag(coords),
                    Ok(Some(Input::NewGame(None))) => Command::NewGame(game.difficulty().config()),
                    Ok(Some(Input::NewGame(Some(difficulty)))) => Command::SelectDifficulty(difficulty),
                    Err(err) => {
                        println!("{:#}", err);
                        continue;
                    }
                }
            }
            token = next_tick(&mut ticker) => Command::Tick(token),
        };

        let events = match game.handle(command) {
            Ok(events) => events,
            Err(err) => {
                log::warn!("{:?} failed: {}", command, err);
                println!("{}", err);
                continue;
            }
        };

        let mut redraw = false;
        for event in &events {
            match event {
                Event::TimerStarted { token } => ticker = Some(Ticker::new(*token)),
                Event::TimerStopped => ticker = None,
                Event::TimeChanged {
                    remaining: remaining @ (60 | 30 | 10),
                    ..
                } => println!("{} seconds left", remaining),
                Event::TimeChanged { .. } => {}
                _ => redraw = true,
            }
            view.apply(event);
        }
        if redraw {
            print!("{}", view.render());
        }
    }

    log::debug!("Bye");
    Ok(())
}
