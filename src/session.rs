use serde::Serialize;
use static_assertions::assert_impl_all;
use tap::Tap;
use tracing::{debug, info, trace};

use crate::{
    collision::can_place,
    grid::{Grid, InvalidDimensions, STANDARD_HEIGHT, STANDARD_WIDTH},
    lock::lock,
    piece::{Piece, Position, Sequence, ShapeSource},
    scoring::ScoreTable,
};

/// Everything about a game that is fixed before it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rules {
    pub height: usize,
    pub width: usize,
    pub scoring: ScoreTable,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            height: STANDARD_HEIGHT,
            width: STANDARD_WIDTH,
            scoring: ScoreTable::classic(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Status {
    Ready,
    Active,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Down,
}

impl Direction {
    fn offset(self) -> Position {
        match self {
            Direction::Left => Position::new(0, -1),
            Direction::Right => Position::new(0, 1),
            Direction::Down => Position::new(1, 0),
        }
    }
}

/// What a lock did to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockReport {
    pub lines_cleared: usize,
    pub points: u64,
    /// The next piece had nowhere to spawn.
    pub game_over: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Moved,
    /// Blocked. Nothing changed.
    Rejected,
    /// Blocked on the way down, so the piece was locked where it stood.
    Locked(LockReport),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone, Copy)]
pub enum SessionError {
    #[error("no game in progress, start one first")]
    NotStarted,
    #[error("the game is over, start a new one to keep playing")]
    GameOver,
}

/// The state a transport shell hands back to its client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Locked cells as 0/1, row 0 at the top. The falling piece is not drawn in.
    pub board: Vec<Vec<u8>>,
    pub score: u64,
    pub status: Status,
    pub game_over: bool,
    pub piece: Option<Piece>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Ready,
    Active(Piece),
    GameOver,
}

/// One game: the grid, the falling piece and the score.
///
/// Sessions share nothing, so any number can run side by side. A single
/// session is not meant to be driven from two threads at once; put it behind
/// a lock if it is shared.
#[derive(Debug, Clone)]
pub struct Session<S = Sequence> {
    rules: Rules,
    grid: Grid,
    state: State,
    score: u64,
    shapes: S,
}

assert_impl_all!(Session<Sequence>: Send);

impl Session<Sequence> {
    /// 20 x 10, classic scoring, every shape in turn.
    pub fn standard() -> Self {
        Self {
            rules: Rules::default(),
            grid: Grid::standard(),
            state: State::Ready,
            score: 0,
            shapes: Sequence::default(),
        }
    }
}

impl Default for Session<Sequence> {
    fn default() -> Self {
        Self::standard()
    }
}

impl<S: ShapeSource> Session<S> {
    pub fn new(rules: Rules, shapes: S) -> Result<Self, InvalidDimensions> {
        Ok(Self {
            grid: Grid::new(rules.height, rules.width)?,
            rules,
            state: State::Ready,
            score: 0,
            shapes,
        })
    }

    /// Wipe the board and the score and spawn the first piece.
    ///
    /// Works from any state. Ends up [Status::GameOver] straight away if the
    /// first piece can't fit.
    pub fn start(&mut self) -> Status {
        self.grid.clear();
        self.score = 0;
        info!(
            height = self.grid.height(),
            width = self.grid.width(),
            "game started"
        );
        self.spawn();
        self.status()
    }

    /// Shift the piece one cell.
    ///
    /// Sideways moves into a wall or a block are ignored. A blocked move down
    /// locks the piece instead, scores any cleared rows and brings on the
    /// next piece.
    pub fn move_piece(&mut self, direction: Direction) -> Result<Outcome, SessionError> {
        let piece = self.active()?;
        let candidate = piece.moved_by(direction.offset());
        if can_place(&self.grid, candidate.mask(), candidate.position()) {
            self.state = State::Active(candidate);
            return Ok(Outcome::Moved);
        }
        let outcome = match direction {
            Direction::Left | Direction::Right => Outcome::Rejected,
            Direction::Down => {
                let piece = piece.clone();
                Outcome::Locked(self.lock_piece(&piece))
            }
        };
        Ok(outcome.tap(|outcome| trace!(?direction, ?outcome, "move blocked")))
    }

    /// Turn the piece a quarter clockwise about its anchor, if it fits there.
    pub fn rotate(&mut self) -> Result<Outcome, SessionError> {
        let candidate = self.active()?.rotated();
        if can_place(&self.grid, candidate.mask(), candidate.position()) {
            self.state = State::Active(candidate);
            return Ok(Outcome::Moved);
        }
        trace!("rotation blocked");
        Ok(Outcome::Rejected)
    }

    fn active(&self) -> Result<&Piece, SessionError> {
        match &self.state {
            State::Active(piece) => Ok(piece),
            State::Ready => Err(SessionError::NotStarted),
            State::GameOver => Err(SessionError::GameOver),
        }
    }

    fn lock_piece(&mut self, piece: &Piece) -> LockReport {
        let lines_cleared = lock(&mut self.grid, piece.mask(), piece.position());
        let points = self.rules.scoring.points(lines_cleared);
        self.score = self.score.saturating_add(points);
        debug!(
            lines_cleared,
            points,
            score = self.score,
            "piece locked"
        );
        LockReport {
            lines_cleared,
            points,
            game_over: !self.spawn(),
        }
    }

    /// Bring on the next shape. `false` if it had no room and the game ended.
    fn spawn(&mut self) -> bool {
        let shape = self.shapes.next_shape();
        let piece = Piece::spawn(shape, self.grid.width());
        if can_place(&self.grid, piece.mask(), piece.position()) {
            self.state = State::Active(piece);
            return true;
        }
        info!(%shape, score = self.score, "no room to spawn, game over");
        self.state = State::GameOver;
        false
    }

    pub fn status(&self) -> Status {
        match self.state {
            State::Ready => Status::Ready,
            State::Active(_) => Status::Active,
            State::GameOver => Status::GameOver,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.status() == Status::GameOver
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn piece(&self) -> Option<&Piece> {
        match &self.state {
            State::Active(piece) => Some(piece),
            State::Ready | State::GameOver => None,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.grid.to_bits(),
            score: self.score,
            status: self.status(),
            game_over: self.is_game_over(),
            piece: self.piece().cloned(),
        }
    }
}
