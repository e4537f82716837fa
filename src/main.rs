use std::{io, str::FromStr};

use anyhow::Context;
use clap::Parser;
use derive_more::From;
use generic_new::GenericNew;
use recap::Recap;
use serde::Deserialize;
use tetris_engine::{
    grid::{STANDARD_HEIGHT, STANDARD_WIDTH},
    Direction, Grid, Rules, Sequence, Session, SessionError, Shape,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(about, override_usage = "tetris-engine [OPTIONS] < steps.txt")]
struct Args {
    /// Rows in the playing field
    #[arg(long, default_value_t = STANDARD_HEIGHT)]
    height: usize,
    /// Columns in the playing field
    #[arg(long, default_value_t = STANDARD_WIDTH)]
    width: usize,
    /// Shapes to deal in order, repeating (e.g. `T,I,Q`). Defaults to all seven
    #[arg(long, value_delimiter = ',')]
    shapes: Vec<Shape>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();
    let rules = Rules {
        height: args.height,
        width: args.width,
        ..Rules::default()
    };
    Grid::new(rules.height, rules.width).context("couldn't size the playing field")?;
    let shapes = if args.shapes.is_empty() {
        Sequence::default()
    } else {
        Sequence::new(args.shapes)?
    };
    for line in io::stdin().lines() {
        let steps = parse_line(&line.context("couldn't read line from stdin")?)
            .context("couldn't parse line")?;
        let session = play(rules.clone(), shapes.clone(), steps)?;
        println!("{}", serde_json::to_string(&session.snapshot())?);
    }
    Ok(())
}

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
enum Command {
    Start,
    Left,
    Right,
    Down,
    Rotate,
}

#[derive(Debug, Deserialize, Recap, PartialEq, Eq, Clone, Copy, GenericNew, From)]
#[recap(regex = r#"^(?P<command>[a-z]+)(\*(?P<times>\d+))?$"#)]
struct Step {
    command: Command,
    #[serde(default = "once")]
    times: usize,
}

fn once() -> usize {
    1
}

fn parse_line(s: &str) -> anyhow::Result<Vec<Step>> {
    Ok(s.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(Step::from_str)
        .collect::<Result<Vec<_>, _>>()?)
}

/// Start a game and run `steps` against it. Steps the game refuses (moves
/// after it ended) are skipped.
fn play(
    rules: Rules,
    shapes: Sequence,
    steps: impl IntoIterator<Item = impl Into<Step>>,
) -> anyhow::Result<Session> {
    let mut session = Session::new(rules, shapes)?;
    session.start();
    for step in steps {
        let Step { command, times } = step.into();
        for _ in 0..times {
            if let Err(err) = apply(&mut session, command) {
                debug!(%err, ?command, "step skipped");
            }
        }
    }
    Ok(session)
}

fn apply(session: &mut Session, command: Command) -> Result<(), SessionError> {
    match command {
        Command::Start => {
            session.start();
        }
        Command::Left => {
            session.move_piece(Direction::Left)?;
        }
        Command::Right => {
            session.move_piece(Direction::Right)?;
        }
        Command::Down => {
            session.move_piece(Direction::Down)?;
        }
        Command::Rotate => {
            session.rotate()?;
        }
    }
    Ok(())
}
