#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Smart rearrangement solver.
//!
//! When a dropped item collides with items already in a container, the solver
//! pins the dropped item at its target and tries to rehome every colliding
//! item elsewhere in the same grid. Items are processed largest footprint
//! first; each one takes the nearest anchor (by Euclidean distance to its old
//! anchor) and the first of its four orientations, starting from its current
//! one, that validates against a scratch grid. The search is a greedy
//! heuristic and never backtracks, so it can miss arrangements that exist.
//!
//! The caller's grid and items are only borrowed. The result is either a full
//! set of relocations or nothing at all.

use stashgrid_core::{CellCoord, Item, ItemId, PlacementRules, Relocation, Rotation};
use stashgrid_grid::{can_place_item, check_placement, Grid};

/// Searches for relocations that let `fixed` occupy `origin`.
///
/// `items` is the container's item list; an entry sharing `fixed`'s id is
/// ignored so the dropped item may already live in the container. Returns
/// `None` when `fixed` cannot sit at `origin` for reasons other than
/// collisions (bounds, locks, zones), when nothing collides, or when any
/// colliding item cannot be rehomed. Relocations are listed in processing
/// order.
#[must_use]
pub fn find_rearrangement(
    items: &[Item],
    fixed: &Item,
    origin: CellCoord,
    columns: u32,
    rows: u32,
    rules: PlacementRules,
) -> Option<Vec<Relocation>> {
    if let Err(reason) = check_placement(&Grid::new(columns, rows), fixed, origin, rules) {
        log::debug!(
            "rearrangement for item {} at {:?} is impossible: {reason}",
            fixed.id().get(),
            origin
        );
        return None;
    }

    let others: Vec<&Item> = items.iter().filter(|item| item.id() != fixed.id()).collect();

    let mut occupancy = Grid::new(columns, rows);
    for item in &others {
        occupancy.place(item, item.anchor());
    }

    let mut colliding: Vec<ItemId> = Vec::new();
    for cell in fixed.cells_at(origin) {
        if let Some(owner) = occupancy.occupant(cell) {
            if !colliding.contains(&owner) {
                colliding.push(owner);
            }
        }
    }

    if colliding.is_empty() {
        return None;
    }

    let mut scratch = Grid::new(columns, rows);
    let mut displaced: Vec<&Item> = Vec::with_capacity(colliding.len());
    for item in others {
        if colliding.contains(&item.id()) {
            displaced.push(item);
        } else {
            scratch.place(item, item.anchor());
        }
    }
    scratch.place(fixed, origin);

    displaced.sort_by(|a, b| b.footprint().cmp(&a.footprint()));

    let mut relocations = Vec::with_capacity(displaced.len());
    for item in displaced {
        let Some(relocation) = rehome(item, &scratch, rules) else {
            log::debug!(
                "no room to rehome item {} while dropping item {}",
                item.id().get(),
                fixed.id().get()
            );
            return None;
        };
        let moved = item
            .clone()
            .with_rotation(relocation.rotation)
            .with_anchor(relocation.anchor);
        scratch.place(&moved, relocation.anchor);
        relocations.push(relocation);
    }

    Some(relocations)
}

/// Finds the nearest anchor and first orientation at which `item` fits.
fn rehome(item: &Item, scratch: &Grid, rules: PlacementRules) -> Option<Relocation> {
    let start = item.rotation().quarter_turns();
    let variants: Vec<Item> = (0..4)
        .map(|turn| {
            item.clone()
                .with_rotation(Rotation::from_quarter_turns(start + turn))
        })
        .collect();

    for anchor in candidates_by_distance(item.anchor(), scratch) {
        for variant in &variants {
            if can_place_item(scratch, variant, anchor, rules) {
                return Some(Relocation {
                    item: item.id(),
                    anchor,
                    rotation: variant.rotation(),
                });
            }
        }
    }
    None
}

/// Every cell of the grid, nearest to `from` first. Ties keep row-major order.
fn candidates_by_distance(from: CellCoord, grid: &Grid) -> Vec<CellCoord> {
    let mut cells: Vec<CellCoord> = grid.iter().map(|(cell, _)| cell).collect();
    cells.sort_by_key(|cell| cell.squared_distance(from));
    cells
}
