//! The rules of a falling-block puzzle game.
//!
//! A [Session] owns a [Grid] of locked cells and the falling [Piece]. It
//! consults [can_place] before accepting any move or rotation, and on a
//! blocked move down hands the piece to [lock()], which merges it and clears
//! full rows. Nothing here keeps time: callers decide when gravity ticks by
//! calling [Session::move_piece] with [Direction::Down].

pub mod collision;
pub mod grid;
pub mod lock;
pub mod piece;
pub mod scoring;
pub mod session;

pub use collision::can_place;
pub use grid::{is_occupied, CellState, Grid, InvalidDimensions, MatrixError};
pub use lock::lock;
pub use piece::{rotate, EmptySequence, Mask, Piece, Position, Sequence, Shape, ShapeSource};
pub use scoring::{ScoreTable, ScoreTableError};
pub use session::{
    Direction, LockReport, Outcome, Rules, Session, SessionError, Snapshot, Status,
};
