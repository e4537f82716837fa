use serde::{Serialize, Serializer};
use static_assertions::const_assert;

/// Rows in the standard playing field.
pub const STANDARD_HEIGHT: usize = 20;
/// Columns in the standard playing field.
pub const STANDARD_WIDTH: usize = 10;

// every shape in the catalogue must be able to spawn on the standard field
const_assert!(STANDARD_WIDTH >= 4);
const_assert!(STANDARD_HEIGHT >= 4);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellState {
    Occupied,
    #[default]
    Unoccupied,
}

impl CellState {
    pub fn bit(self) -> u8 {
        match self {
            CellState::Occupied => 1,
            CellState::Unoccupied => 0,
        }
    }

    pub(crate) fn from_bit(bit: u8) -> Option<Self> {
        match bit {
            0 => Some(CellState::Unoccupied),
            1 => Some(CellState::Occupied),
            _ => None,
        }
    }
}

impl Serialize for CellState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bit())
    }
}

pub fn is_occupied(cell: &CellState) -> bool {
    matches!(cell, CellState::Occupied)
}

#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone, Copy)]
#[error("grid must have at least one row and one column, got {height} x {width}")]
pub struct InvalidDimensions {
    pub height: usize,
    pub width: usize,
}

/// Problems with a grid or mask supplied as rows of `0`/`1`.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone, Copy)]
pub enum MatrixError {
    #[error(transparent)]
    InvalidDimensions(#[from] InvalidDimensions),
    #[error("row {row_n} has {found} cells, expected {expected}")]
    Ragged {
        row_n: usize,
        expected: usize,
        found: usize,
    },
    #[error("cell at row {row_n}, column {col_n} is {value}, expected 0 or 1")]
    NotBinary { row_n: usize, col_n: usize, value: u8 },
}

/// The locked blocks of a game.
///
/// Row 0 is the top of the field. Dimensions are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
// choice: runtime dimensions rather than const generics, so hosts can pick a
//         field size per game
// choice: row-wise, because we'll be searching and clearing rows
pub struct Grid {
    width: usize,
    rows: Vec<Vec<CellState>>,
}

impl Grid {
    pub fn new(height: usize, width: usize) -> Result<Self, InvalidDimensions> {
        if height == 0 || width == 0 {
            return Err(InvalidDimensions { height, width });
        }
        Ok(Self::empty(height, width))
    }

    /// The standard 20 x 10 field.
    pub fn standard() -> Self {
        Self::empty(STANDARD_HEIGHT, STANDARD_WIDTH)
    }

    fn empty(height: usize, width: usize) -> Self {
        Self {
            width,
            rows: vec![vec![CellState::default(); width]; height],
        }
    }

    fn empty_row(&self) -> Vec<CellState> {
        vec![CellState::default(); self.width]
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// The cell at a signed position, or `None` if it is off the grid.
    pub fn get(&self, row: i32, col: i32) -> Option<CellState> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        self.rows.get(row)?.get(col).copied()
    }

    /// # Panics
    /// - If `row` or `col` is outside the grid
    pub fn is_empty(&self, row: usize, col: usize) -> bool {
        !is_occupied(&self.rows[row][col])
    }

    /// # Panics
    /// - If `row` or `col` is outside the grid
    pub fn set_filled(&mut self, row: usize, col: usize) {
        self.rows[row][col] = CellState::Occupied;
    }

    pub fn row_is_full(&self, row: usize) -> bool {
        self.rows[row].iter().all(is_occupied)
    }

    pub fn clear_row(&mut self, row: usize) {
        self.rows[row] = self.empty_row();
    }

    /// Remove `from_row`, let everything above it fall by one, and open an
    /// empty row at the top.
    pub fn shift_rows_down(&mut self, from_row: usize) {
        self.clear_row(from_row);
        // the cleared row travels to the top, the rest slide down under it
        self.rows[..=from_row].rotate_right(1);
    }

    /// Remove every full row, compacting the stack. Returns how many went.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut cleared = 0;
        // top-down: shifting never moves a row we haven't looked at yet
        for row in 0..self.height() {
            if self.row_is_full(row) {
                self.shift_rows_down(row);
                cleared += 1;
            }
        }
        cleared
    }

    pub fn clear(&mut self) {
        for row in self.rows.iter_mut() {
            row.fill(CellState::Unoccupied);
        }
    }

    pub fn occupied_count(&self) -> usize {
        self.rows.iter().flatten().filter(|cell| is_occupied(cell)).count()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CellState]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// `height` rows of `width` 0/1 values, row 0 first.
    pub fn to_bits(&self) -> Vec<Vec<u8>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.bit()).collect())
            .collect()
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::standard()
    }
}

/// Validate rows of 0/1 into a rectangular, non-empty matrix.
pub(crate) fn cells_from_bits(bits: Vec<Vec<u8>>) -> Result<Vec<Vec<CellState>>, MatrixError> {
    let height = bits.len();
    let width = bits.first().map_or(0, Vec::len);
    if height == 0 || width == 0 {
        return Err(InvalidDimensions { height, width }.into());
    }
    bits.into_iter()
        .enumerate()
        .map(|(row_n, row)| {
            if row.len() != width {
                return Err(MatrixError::Ragged {
                    row_n,
                    expected: width,
                    found: row.len(),
                });
            }
            row.into_iter()
                .enumerate()
                .map(|(col_n, value)| {
                    CellState::from_bit(value).ok_or(MatrixError::NotBinary {
                        row_n,
                        col_n,
                        value,
                    })
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .collect()
}

impl TryFrom<Vec<Vec<u8>>> for Grid {
    type Error = MatrixError;

    fn try_from(bits: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        let rows = cells_from_bits(bits)?;
        Ok(Self {
            width: rows[0].len(),
            rows,
        })
    }
}

impl<const WIDTH: usize, const HEIGHT: usize> TryFrom<[[CellState; WIDTH]; HEIGHT]> for Grid {
    type Error = InvalidDimensions;

    fn try_from(rows: [[CellState; WIDTH]; HEIGHT]) -> Result<Self, Self::Error> {
        if HEIGHT == 0 || WIDTH == 0 {
            return Err(InvalidDimensions {
                height: HEIGHT,
                width: WIDTH,
            });
        }
        Ok(Self {
            width: WIDTH,
            rows: rows.into_iter().map(Vec::from).collect(),
        })
    }
}

/// Build a [Grid] from rows of `#` (occupied) and `.` (empty).
///
/// Evaluates to a `Result`, because a zero-sized grid is rejected.
#[macro_export]
macro_rules! grid {
    ($([$($cell:tt)*]),* $(,)?) => {
        <$crate::Grid as ::core::convert::TryFrom<_>>::try_from(
            [$([$($crate::cell!($cell)),*]),*]
        )
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! cell {
    (#) => {
        $crate::CellState::Occupied
    };
    (.) => {
        $crate::CellState::Unoccupied
    };
}
