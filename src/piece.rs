use derive_more::Add;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator as _};

use crate::grid::{cells_from_bits, is_occupied, CellState, InvalidDimensions, MatrixError};

/// A signed grid coordinate. Row 0 is the top, column 0 the left edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Add, Serialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// `self + offset`, or `None` if either coordinate overflows.
    pub fn checked_add(self, offset: Position) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add(offset.row)?,
            col: self.col.checked_add(offset.col)?,
        })
    }
}

/// The occupied/empty pattern of a piece, in its own frame.
///
/// Always rectangular and at least one cell in each dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Mask {
    rows: Vec<Vec<CellState>>,
}

impl Mask {
    /// A `height` x `width` mask with exactly `coords` occupied.
    fn with_cells(
        height: usize,
        width: usize,
        coords: impl IntoIterator<Item = (usize, usize)>,
    ) -> Self {
        let mut rows = vec![vec![CellState::Unoccupied; width]; height];
        for (row_ix, col_ix) in coords {
            rows[row_ix][col_ix] = CellState::Occupied;
        }
        Self { rows }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows[0].len()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CellState]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Offsets of the occupied cells, relative to the top-left corner.
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.rows.iter().enumerate().flat_map(|(row_ix, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, cell)| is_occupied(cell))
                .map(move |(col_ix, _)| Position::new(row_ix as i32, col_ix as i32))
        })
    }

    pub fn to_bits(&self) -> Vec<Vec<u8>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.bit()).collect())
            .collect()
    }
}

impl TryFrom<Vec<Vec<u8>>> for Mask {
    type Error = MatrixError;

    fn try_from(bits: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        Ok(Self {
            rows: cells_from_bits(bits)?,
        })
    }
}

impl<const WIDTH: usize, const HEIGHT: usize> TryFrom<[[CellState; WIDTH]; HEIGHT]> for Mask {
    type Error = InvalidDimensions;

    fn try_from(rows: [[CellState; WIDTH]; HEIGHT]) -> Result<Self, Self::Error> {
        if HEIGHT == 0 || WIDTH == 0 {
            return Err(InvalidDimensions {
                height: HEIGHT,
                width: WIDTH,
            });
        }
        Ok(Self {
            rows: rows.into_iter().map(Vec::from).collect(),
        })
    }
}

/// Build a [Mask] from rows of `#` (occupied) and `.` (empty).
///
/// Evaluates to a `Result`, because an empty mask is rejected.
#[macro_export]
macro_rules! mask {
    ($([$($cell:tt)*]),* $(,)?) => {
        <$crate::Mask as ::core::convert::TryFrom<_>>::try_from(
            [$([$($crate::cell!($cell)),*]),*]
        )
    };
}

/// Rotate a mask a quarter turn clockwise.
///
/// An `h` x `w` mask becomes `w` x `h`. The input is left untouched, and no
/// offset is applied: whether the result fits is the caller's question.
pub fn rotate(mask: &Mask) -> Mask {
    let height = mask.height();
    let rows = (0..mask.width())
        .map(|row_ix| {
            (0..height)
                .map(|col_ix| mask.rows[height - 1 - col_ix][row_ix])
                .collect()
        })
        .collect();
    Mask { rows }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    EnumIter,
    Display,
    Serialize,
    Deserialize,
)]
pub enum Shape {
    Q,
    Z,
    S,
    T,
    I,
    L,
    J,
}

impl Shape {
    /// The shape as it spawns.
    pub fn mask(self) -> Mask {
        match self {
            Shape::Q => Mask::with_cells(2, 2, [(0, 0), (0, 1), (1, 0), (1, 1)]),
            Shape::Z => Mask::with_cells(2, 3, [(0, 0), (0, 1), (1, 1), (1, 2)]),
            Shape::S => Mask::with_cells(2, 3, [(0, 1), (0, 2), (1, 0), (1, 1)]),
            Shape::T => Mask::with_cells(2, 3, [(0, 0), (0, 1), (0, 2), (1, 1)]),
            Shape::I => Mask::with_cells(1, 4, [(0, 0), (0, 1), (0, 2), (0, 3)]),
            Shape::L => Mask::with_cells(3, 2, [(0, 0), (1, 0), (2, 0), (2, 1)]),
            Shape::J => Mask::with_cells(3, 2, [(0, 1), (1, 1), (2, 1), (2, 0)]),
        }
    }
}

/// The falling piece: a mask anchored by its top-left corner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Piece {
    mask: Mask,
    position: Position,
}

impl Piece {
    pub fn new(mask: Mask, position: Position) -> Self {
        Self { mask, position }
    }

    /// `shape` at the top of a field `grid_width` wide, centered, leaning
    /// left when the slack is odd.
    pub fn spawn(shape: Shape, grid_width: usize) -> Self {
        let mask = shape.mask();
        let slack = grid_width as i32 - mask.width() as i32;
        Self {
            position: Position::new(0, slack.div_euclid(2)),
            mask,
        }
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Absolute positions of the occupied cells.
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.mask.cells().map(|offset| self.position + offset)
    }

    pub fn moved_by(&self, offset: Position) -> Self {
        Self {
            mask: self.mask.clone(),
            position: self.position + offset,
        }
    }

    pub fn rotated(&self) -> Self {
        Self {
            mask: rotate(&self.mask),
            position: self.position,
        }
    }
}

/// Where a game's next shape comes from.
pub trait ShapeSource {
    fn next_shape(&mut self) -> Shape;
}

impl<F> ShapeSource for F
where
    F: FnMut() -> Shape,
{
    fn next_shape(&mut self) -> Shape {
        self()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone, Copy)]
#[error("a shape sequence needs at least one shape")]
pub struct EmptySequence;

/// Deals a fixed list of shapes, round and round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    shapes: Vec<Shape>,
    next: usize,
}

impl Sequence {
    pub fn new(shapes: impl IntoIterator<Item = Shape>) -> Result<Self, EmptySequence> {
        let shapes = shapes.into_iter().collect::<Vec<_>>();
        if shapes.is_empty() {
            return Err(EmptySequence);
        }
        Ok(Self { shapes, next: 0 })
    }
}

impl Default for Sequence {
    /// Every shape, in catalogue order.
    fn default() -> Self {
        Self {
            shapes: Shape::iter().collect(),
            next: 0,
        }
    }
}

impl ShapeSource for Sequence {
    fn next_shape(&mut self) -> Shape {
        let shape = self.shapes[self.next];
        self.next = (self.next + 1) % self.shapes.len();
        shape
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;
    use Shape::{I, J, L, Q, S, T, Z};

    #[test]
    fn rotates_clockwise() -> anyhow::Result<()> {
        let mask = Mask::try_from(vec![vec![1, 1, 1], vec![0, 1, 0]])?;
        let rotated = rotate(&mask);
        assert_eq!(rotated.to_bits(), vec![vec![0, 1], vec![1, 1], vec![0, 1]]);
        assert_eq!((rotated.height(), rotated.width()), (3, 2));
        Ok(())
    }

    #[test]
    fn rotation_leaves_input_alone() -> anyhow::Result<()> {
        let mask = mask![
            [# . .],
            [# # #],
        ]?;
        let before = mask.clone();
        let _ = rotate(&mask);
        assert_eq!(mask, before);
        Ok(())
    }

    #[test]
    fn four_rotations_come_home() {
        for shape in Shape::iter() {
            let mask = shape.mask();
            let spun = (0..4).fold(mask.clone(), |mask, _| rotate(&mask));
            assert_eq!(spun, mask, "{shape}");
        }
    }

    #[test]
    fn rotating_l() -> anyhow::Result<()> {
        assert_eq!(
            rotate(&L.mask()),
            mask![
                [# # #],
                [# . .],
            ]?
        );
        Ok(())
    }

    #[test]
    fn shapes() -> anyhow::Result<()> {
        assert_eq!(I.mask(), mask![[# # # #]]?);
        assert_eq!(
            J.mask(),
            mask![
                [. #],
                [. #],
                [# #],
            ]?
        );
        assert_eq!(
            L.mask(),
            mask![
                [# .],
                [# .],
                [# #],
            ]?
        );
        assert_eq!(Q.mask(), mask![[# #], [# #]]?);
        assert_eq!(
            S.mask(),
            mask![
                [. # #],
                [# # .],
            ]?
        );
        assert_eq!(
            T.mask(),
            mask![
                [# # #],
                [. # .],
            ]?
        );
        assert_eq!(
            Z.mask(),
            mask![
                [# # .],
                [. # #],
            ]?
        );
        Ok(())
    }

    #[test]
    fn every_shape_has_four_cells() {
        for shape in Shape::iter() {
            assert_eq!(shape.mask().cells().count(), 4, "{shape}");
        }
    }

    #[test]
    fn parse_shape() -> anyhow::Result<()> {
        assert_eq!(Shape::from_str("T")?, T);
        assert!(Shape::from_str("X").is_err());
        Ok(())
    }

    #[test]
    fn spawns_centered_at_the_top() {
        assert_eq!(Piece::spawn(Q, 10).position(), Position::new(0, 4));
        assert_eq!(Piece::spawn(T, 10).position(), Position::new(0, 3));
        assert_eq!(Piece::spawn(I, 10).position(), Position::new(0, 3));
        assert_eq!(Piece::spawn(I, 4).position(), Position::new(0, 0));
    }

    #[test]
    fn spawn_on_a_narrow_field_hangs_off_the_left() {
        assert_eq!(Piece::spawn(I, 3).position(), Position::new(0, -1));
    }

    #[test]
    fn piece_cells_are_absolute() {
        let piece = Piece::spawn(Q, 10).moved_by(Position::new(5, -4));
        assert_eq!(
            piece.cells().collect::<Vec<_>>(),
            vec![
                Position::new(5, 0),
                Position::new(5, 1),
                Position::new(6, 0),
                Position::new(6, 1),
            ]
        );
    }

    #[test]
    fn checked_add_stops_at_overflow() {
        let anchor = Position::new(3, i32::MAX - 1);
        assert_eq!(
            anchor.checked_add(Position::new(1, 1)),
            Some(Position::new(4, i32::MAX))
        );
        assert_eq!(anchor.checked_add(Position::new(0, 2)), None);
        assert_eq!(Position::new(i32::MIN, 0).checked_add(Position::new(-1, 0)), None);
    }

    #[test]
    fn empty_masks_are_rejected() {
        assert!(Mask::try_from(vec![vec![]]).is_err());
        assert!(Mask::try_from(Vec::<Vec<u8>>::new()).is_err());
    }

    #[test]
    fn sequence_cycles() -> anyhow::Result<()> {
        let mut sequence = Sequence::new([I, T])?;
        let dealt = (0..5).map(|_| sequence.next_shape()).collect::<Vec<_>>();
        assert_eq!(dealt, vec![I, T, I, T, I]);
        assert_eq!(Sequence::new([]), Err(EmptySequence));
        Ok(())
    }

    #[test]
    fn default_sequence_deals_every_shape() {
        let mut sequence = Sequence::default();
        let dealt = (0..7).map(|_| sequence.next_shape()).collect::<Vec<_>>();
        assert_eq!(dealt, Shape::iter().collect::<Vec<_>>());
    }

    #[test]
    fn closures_are_sources() {
        let mut source = || S;
        assert_eq!(source.next_shape(), S);
    }
}
