use crate::{
    grid::{is_occupied, Grid},
    piece::{Mask, Position},
};

/// Can `mask`, anchored at `anchor`, sit on `grid`?
///
/// Every occupied cell of the mask has to land inside the grid on an empty
/// cell. Empty mask cells may hang off the edge.
pub fn can_place(grid: &Grid, mask: &Mask, anchor: Position) -> bool {
    mask.cells().all(|offset| {
        // a cell past i32::MAX is off the grid like any other
        anchor
            .checked_add(offset)
            .and_then(|at| grid.get(at.row, at.col))
            .is_some_and(|cell| !is_occupied(&cell))
    })
}
