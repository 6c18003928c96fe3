use anyhow::{Context, bail};
use sweeper_core::{Coord, Coord2, Difficulty};

pub const HELP: &str = "\
commands:
  r <row> <col>   reveal a cell
  f <row> <col>   flag or unflag a cell
  n [difficulty]  new game (easy, medium, hard)
  b               show best time
  h               show this help
  q               quit";

/// One line of player input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Reveal(Coord2),
    Flag(Coord2),
    NewGame(Option<Difficulty>),
    Best,
    Help,
    Quit,
}

/// Parses a line, `None` for blank lines.
pub fn parse(line: &str) -> anyhow::Result<Option<Input>> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let input = match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("r" | "reveal", [row, col]) => Input::Reveal(coords(row, col)?),
        ("f" | "flag", [row, col]) => Input::Flag(coords(row, col)?),
        ("n" | "new", []) => Input::NewGame(None),
        ("n" | "new" | "d" | "difficulty", [name]) => Input::NewGame(Some(name.parse()?)),
        ("b" | "best", []) => Input::Best,
        ("h" | "help" | "?", []) => Input::Help,
        ("q" | "quit" | "exit", []) => Input::Quit,
        _ => bail!("Didn't understand {:?}, type h for help", line.trim()),
    };
    Ok(Some(input))
}

fn coords(row: &str, col: &str) -> anyhow::Result<Coord2> {
    Ok((axis(row, "row")?, axis(col, "column")?))
}

fn axis(value: &str, name: &str) -> anyhow::Result<Coord> {
    value
        .parse()
        .with_context(|| format!("Bad {} {:?}", name, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_moves() {
        assert_eq!(parse("r 3 4").unwrap(), Some(Input::Reveal((3, 4))));
        assert_eq!(parse("  FLAG 0 12 ").unwrap(), Some(Input::Flag((0, 12))));
    }

    #[test]
    fn parses_new_game_with_and_without_preset() {
        assert_eq!(parse("n").unwrap(), Some(Input::NewGame(None)));
        assert_eq!(
            parse("n hard").unwrap(),
            Some(Input::NewGame(Some(Difficulty::Hard)))
        );
        assert_eq!(
            parse("d medium").unwrap(),
            Some(Input::NewGame(Some(Difficulty::Medium)))
        );
    }

    #[test]
    fn blank_line_is_nothing() {
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(parse("r 1").is_err());
        assert!(parse("r x 1").is_err());
        assert!(parse("r 1 300").is_err());
        assert!(parse("n expert").is_err());
        assert!(parse("jump").is_err());
    }
}
