use stashgrid_core::{is_unlocked, zone_of, CellCoord, Item, PlacementError, PlacementRules};

use crate::Grid;

/// Checks whether `item`, anchored at `origin`, may occupy the grid.
///
/// Every occupied cell of the current shape must be inside the grid, above the
/// unlocked-row limit, in the same zone as the first visited cell (zoned
/// profiles only), and unowned or owned by the item itself. Cells that pass
/// are then checked against the profile's unlocked region.
pub fn check_placement(
    grid: &Grid,
    item: &Item,
    origin: CellCoord,
    rules: PlacementRules,
) -> Result<(), PlacementError> {
    let cells = item.cells_at(origin);
    if cells.is_empty() {
        return Err(PlacementError::EmptyShape);
    }

    let zoned = rules.profile.is_zoned();
    let mut working_zone = None;

    for &cell in &cells {
        if !grid.contains(cell) {
            return Err(PlacementError::OutOfBounds);
        }
        if rules.row_locked(cell.row()) {
            return Err(PlacementError::RowLocked);
        }
        if zoned {
            let zone = zone_of(cell, rules.profile);
            match working_zone {
                None => working_zone = Some(zone),
                Some(expected) if expected != zone => return Err(PlacementError::ZoneStraddle),
                Some(_) => {}
            }
        }
        if let Some(owner) = grid.occupant(cell) {
            if owner != item.id() {
                return Err(PlacementError::Occupied);
            }
        }
    }

    if zoned && cells.iter().any(|cell| !is_unlocked(*cell, rules.profile)) {
        return Err(PlacementError::CellLocked);
    }

    Ok(())
}

/// Reports whether `item`, anchored at `origin`, may occupy the grid.
#[must_use]
pub fn can_place_item(grid: &Grid, item: &Item, origin: CellCoord, rules: PlacementRules) -> bool {
    check_placement(grid, item, origin, rules).is_ok()
}
