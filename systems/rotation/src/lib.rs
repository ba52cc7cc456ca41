#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure rotation resolver that turns an item clockwise and kicks it to a
//! nearby anchor when the rotated shape does not fit in place.

use stashgrid_core::{CellCoord, Item, PlacementRules, RotationError, Shape};
use stashgrid_grid::{can_place_item, Grid};

/// Anchor offsets tried after a rotation, as `(columns, rows)`, in priority
/// order: in place, orthogonal neighbours, diagonal neighbours, then two-cell
/// orthogonal reaches.
pub const KICK_OFFSETS: [(i32, i32); 13] = [
    (0, 0),
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
    (-2, 0),
    (2, 0),
    (0, -2),
    (0, 2),
];

/// Outcome of a successful rotation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rotated {
    /// Item record with its new rotation and anchor.
    pub item: Item,
    /// Grid with the item re-placed at its new anchor.
    pub grid: Grid,
}

impl Rotated {
    /// Shape occupied by the item after the rotation.
    #[must_use]
    pub fn shape(&self) -> Shape {
        self.item.current_shape()
    }

    /// Anchor the item settled on after any kick.
    #[must_use]
    pub const fn anchor(&self) -> CellCoord {
        self.item.anchor()
    }
}

/// Rotates `item` one quarter turn clockwise within `grid`.
///
/// The item's own cells never block it. The first kick offset whose anchor
/// passes validation wins. When none does the call fails with
/// [`RotationError::NoSpace`]; the inputs are borrowed, so nothing changes.
pub fn rotate_item(
    item: &Item,
    grid: &Grid,
    rules: PlacementRules,
) -> Result<Rotated, RotationError> {
    let turned = item.clone().with_rotation(item.rotation().clockwise());
    let mut scratch = grid.clone();
    scratch.remove(item.id());

    let origin = item.anchor();
    let anchor = KICK_OFFSETS
        .iter()
        .map(|&(columns, rows)| origin.offset(columns, rows))
        .find(|candidate| can_place_item(&scratch, &turned, *candidate, rules));

    let Some(anchor) = anchor else {
        log::debug!(
            "item {} cannot rotate to {} degrees near {:?}",
            item.id().get(),
            turned.rotation().degrees(),
            origin
        );
        return Err(RotationError::NoSpace);
    };

    let rotated = turned.with_anchor(anchor);
    scratch.place(&rotated, anchor);
    Ok(Rotated {
        item: rotated,
        grid: scratch,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kick_offsets_start_in_place_and_stay_within_two_cells() {
        assert_eq!(KICK_OFFSETS[0], (0, 0));
        for (columns, rows) in KICK_OFFSETS {
            assert!(columns.abs() + rows.abs() <= 2);
        }
        let mut sorted = KICK_OFFSETS.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), KICK_OFFSETS.len(), "offsets must be unique");
    }
}
