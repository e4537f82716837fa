use crate::{
    collision::can_place,
    grid::Grid,
    piece::{Mask, Position},
};

/// Merge `mask` into `grid` at `anchor`, then clear any rows that filled up.
///
/// Returns the number of rows cleared. The placement must already have
/// passed [can_place]; locking anything else is a caller bug.
pub fn lock(grid: &mut Grid, mask: &Mask, anchor: Position) -> usize {
    debug_assert!(
        can_place(grid, mask, anchor),
        "locking an illegal placement at {anchor:?}"
    );
    for at in mask.cells().filter_map(|offset| anchor.checked_add(offset)) {
        if let (Ok(row), Ok(col)) = (usize::try_from(at.row), usize::try_from(at.col)) {
            grid.set_filled(row, col);
        }
    }
    grid.clear_full_rows()
}
