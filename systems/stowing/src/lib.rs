#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic stowing system that moves a batch of items into a container.

use stashgrid_core::{CellCoord, Command, Item, PlacementRules, Rotation};
use stashgrid_grid::{can_place_item, Grid};

/// Pure system that emits merge and placement commands for a batch of items.
///
/// Each incoming item first tops up the earliest compatible stack, including
/// stacks stowed earlier in the same batch. Otherwise it is reset to its
/// canonical orientation and placed at the first anchor, scanning row by row
/// from the top-left cell, that passes validation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Stowing;

impl Stowing {
    /// Creates a new stowing system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Plans how `incoming` fits into the container described by `items`,
    /// `grid` and `rules`.
    ///
    /// Commands are pushed in the order they must be applied. Items that find
    /// neither a stack nor free space are handed back unchanged.
    pub fn handle(
        &self,
        items: &[Item],
        grid: &Grid,
        rules: PlacementRules,
        incoming: Vec<Item>,
        out: &mut Vec<Command>,
    ) -> Vec<Item> {
        let mut stored: Vec<Item> = items.to_vec();
        let mut working = grid.clone();
        let mut leftovers = Vec::new();

        for item in incoming {
            if stored.iter().any(|existing| existing.id() == item.id()) {
                log::debug!("item {} is already in the container", item.id().get());
                leftovers.push(item);
                continue;
            }

            if let Some(stack) = stored.iter_mut().find(|existing| {
                item.stacks_with(existing)
                    && existing.quantity().checked_add(item.quantity()).is_some()
            }) {
                stack.set_quantity(stack.quantity() + item.quantity());
                out.push(Command::MergeStack {
                    target: stack.id(),
                    source: item,
                });
                continue;
            }

            let upright = item.clone().with_rotation(Rotation::Deg0);
            let Some(origin) = first_fit(&working, &upright, rules) else {
                log::debug!("no room to stow item {}", item.id().get());
                leftovers.push(item);
                continue;
            };

            let placed = upright.with_anchor(origin);
            working.place(&placed, origin);
            out.push(Command::PlaceItem {
                item: placed.clone(),
                origin,
            });
            stored.push(placed);
        }

        leftovers
    }
}

fn first_fit(grid: &Grid, item: &Item, rules: PlacementRules) -> Option<CellCoord> {
    grid.iter()
        .map(|(cell, _)| cell)
        .find(|cell| can_place_item(grid, item, *cell, rules))
}
