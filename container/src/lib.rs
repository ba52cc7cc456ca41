#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative container state for the Stashgrid placement engine.
//!
//! A [`Container`] owns one occupancy grid, the ordered item list that is the
//! system of record, and the placement rules of the container. It changes only
//! through [`apply`], which validates each [`Command`] and reports the outcome
//! as [`Event`] values. Every command is atomic: a rejected command leaves
//! both the grid and the item list exactly as they were.

mod ledger;

use stashgrid_core::{
    CellCoord, Command, Event, Item, ItemId, LookupError, PlacementRules, Relocation, StackError,
};
use stashgrid_grid::{check_placement, rebuild, Grid};
use stashgrid_system_rotation::rotate_item;

use ledger::ItemLedger;

/// Grid-based container holding placed items.
#[derive(Clone, Debug)]
pub struct Container {
    grid: Grid,
    items: ItemLedger,
    rules: PlacementRules,
}

impl Container {
    /// Creates an empty container with the provided dimensions and rules.
    #[must_use]
    pub fn new(columns: u32, rows: u32, rules: PlacementRules) -> Self {
        Self {
            grid: Grid::new(columns, rows),
            items: ItemLedger::new(),
            rules,
        }
    }

    fn reject_lookup(item: ItemId, reason: LookupError, out_events: &mut Vec<Event>) {
        log::debug!("command for item {} rejected: {reason}", item.get());
        out_events.push(Event::CommandRejected { item, reason });
    }

    fn place(&mut self, mut item: Item, origin: CellCoord, out_events: &mut Vec<Event>) {
        let id = item.id();
        if self.items.contains(id) {
            Self::reject_lookup(id, LookupError::DuplicateItem, out_events);
            return;
        }

        if let Err(reason) = check_placement(&self.grid, &item, origin, self.rules) {
            log::debug!(
                "placing item {} at {:?} rejected: {reason}",
                id.get(),
                origin
            );
            out_events.push(Event::PlacementRejected {
                item: id,
                origin,
                reason,
            });
            return;
        }

        item.set_anchor(origin);
        self.grid.place(&item, origin);
        let rotation = item.rotation();
        self.items.push(item);
        out_events.push(Event::ItemPlaced {
            item: id,
            anchor: origin,
            rotation,
        });
    }

    fn move_item(&mut self, id: ItemId, origin: CellCoord, out_events: &mut Vec<Event>) {
        let Some(item) = self.items.get_mut(id) else {
            Self::reject_lookup(id, LookupError::MissingItem, out_events);
            return;
        };

        if let Err(reason) = check_placement(&self.grid, item, origin, self.rules) {
            log::debug!("moving item {} to {:?} rejected: {reason}", id.get(), origin);
            out_events.push(Event::PlacementRejected {
                item: id,
                origin,
                reason,
            });
            return;
        }

        let from = item.anchor();
        item.set_anchor(origin);
        self.grid.remove(id);
        self.grid.place(item, origin);
        out_events.push(Event::ItemMoved {
            item: id,
            from,
            to: origin,
        });
    }

    fn remove(&mut self, id: ItemId, out_events: &mut Vec<Event>) {
        let Some(item) = self.items.remove(id) else {
            Self::reject_lookup(id, LookupError::MissingItem, out_events);
            return;
        };
        self.grid.remove(id);
        out_events.push(Event::ItemRemoved { item });
    }

    fn rotate(&mut self, id: ItemId, out_events: &mut Vec<Event>) {
        let Some(item) = self.items.get_mut(id) else {
            Self::reject_lookup(id, LookupError::MissingItem, out_events);
            return;
        };

        match rotate_item(item, &self.grid, self.rules) {
            Ok(rotated) => {
                let rotation = rotated.item.rotation();
                let anchor = rotated.anchor();
                *item = rotated.item;
                self.grid = rotated.grid;
                out_events.push(Event::ItemRotated {
                    item: id,
                    rotation,
                    anchor,
                });
            }
            Err(reason) => {
                out_events.push(Event::RotationRejected { item: id, reason });
            }
        }
    }

    fn apply_rearrangement(
        &mut self,
        dropped: Item,
        origin: CellCoord,
        relocations: Vec<Relocation>,
        out_events: &mut Vec<Event>,
    ) {
        let id = dropped.id();
        let rotation = dropped.rotation();
        let previous_anchor = self.items.get(id).map(Item::anchor);
        let placed = match self.items.get(id) {
            Some(stored) => stored.clone().with_rotation(rotation),
            None => dropped,
        }
        .with_anchor(origin);

        for relocation in &relocations {
            if relocation.item == id || !self.items.contains(relocation.item) {
                Self::reject_lookup(relocation.item, LookupError::MissingItem, out_events);
                return;
            }
        }

        let mut layout: Vec<Item> = self
            .items
            .as_slice()
            .iter()
            .filter(|item| item.id() != id)
            .map(|item| {
                let mut item = item.clone();
                if let Some(relocation) = relocations.iter().find(|r| r.item == item.id()) {
                    item.set_rotation(relocation.rotation);
                    item.set_anchor(relocation.anchor);
                }
                item
            })
            .collect();
        layout.push(placed);

        let (columns, rows) = self.grid.dimensions();
        let mut scratch = Grid::new(columns, rows);
        for item in &layout {
            if let Err(reason) = check_placement(&scratch, item, item.anchor(), self.rules) {
                log::debug!(
                    "rearrangement for item {} at {:?} rejected at item {}: {reason}",
                    id.get(),
                    origin,
                    item.id().get()
                );
                out_events.push(Event::RearrangementRejected {
                    item: id,
                    origin,
                    reason,
                });
                return;
            }
            scratch.place(item, item.anchor());
        }

        self.grid = scratch;
        self.items.replace(layout);

        out_events.push(Event::ItemsRelocated { relocations });
        match previous_anchor {
            Some(from) => out_events.push(Event::ItemMoved {
                item: id,
                from,
                to: origin,
            }),
            None => out_events.push(Event::ItemPlaced {
                item: id,
                anchor: origin,
                rotation,
            }),
        }
    }

    fn merge(&mut self, source: Item, target: ItemId, out_events: &mut Vec<Event>) {
        let source_id = source.id();
        let reject = |reason: StackError, out_events: &mut Vec<Event>| {
            log::debug!(
                "merging item {} into {} rejected: {reason}",
                source_id.get(),
                target.get()
            );
            out_events.push(Event::MergeRejected {
                source: source_id,
                target,
                reason,
            });
        };

        if self.items.contains(source_id) {
            reject(StackError::SourcePlaced, out_events);
            return;
        }
        let Some(stack) = self.items.get_mut(target) else {
            Self::reject_lookup(target, LookupError::MissingItem, out_events);
            return;
        };
        if !source.stacks_with(stack) {
            reject(StackError::Incompatible, out_events);
            return;
        }
        let Some(quantity) = stack.quantity().checked_add(source.quantity()) else {
            reject(StackError::Overflow, out_events);
            return;
        };

        stack.set_quantity(quantity);
        out_events.push(Event::StackMerged {
            source: source_id,
            target,
            quantity,
        });
    }

    fn consume_one(&mut self, id: ItemId, out_events: &mut Vec<Event>) {
        let Some(item) = self.items.get_mut(id) else {
            Self::reject_lookup(id, LookupError::MissingItem, out_events);
            return;
        };

        if item.quantity() > 1 {
            let quantity = item.quantity() - 1;
            item.set_quantity(quantity);
            out_events.push(Event::QuantityChanged { item: id, quantity });
        } else {
            self.remove(id, out_events);
        }
    }

    fn replace_items(&mut self, items: Vec<Item>, out_events: &mut Vec<Event>) {
        let mut dropped = Vec::new();
        let mut unique: Vec<Item> = Vec::with_capacity(items.len());
        for item in items {
            if unique.iter().any(|kept| kept.id() == item.id()) {
                dropped.push(item.id());
            } else {
                unique.push(item);
            }
        }

        let (columns, rows) = self.grid.dimensions();
        let rebuilt = rebuild(&unique, columns, rows, self.rules);
        unique.retain(|item| !rebuilt.dropped.contains(&item.id()));
        dropped.extend(rebuilt.dropped);

        if !dropped.is_empty() {
            log::warn!(
                "rebuild dropped {} item(s) that no longer fit: {:?}",
                dropped.len(),
                dropped.iter().map(|id| id.get()).collect::<Vec<_>>()
            );
        }

        self.grid = rebuilt.grid;
        self.items.replace(unique);
        out_events.push(Event::GridRebuilt { dropped });
    }
}

/// Applies the provided command to the container, reporting outcomes as events.
pub fn apply(container: &mut Container, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::PlaceItem { item, origin } => container.place(item, origin, out_events),
        Command::MoveItem { item, origin } => container.move_item(item, origin, out_events),
        Command::RemoveItem { item } => container.remove(item, out_events),
        Command::RotateItem { item } => container.rotate(item, out_events),
        Command::ApplyRearrangement {
            item,
            origin,
            relocations,
        } => container.apply_rearrangement(item, origin, relocations, out_events),
        Command::MergeStack { source, target } => container.merge(source, target, out_events),
        Command::ConsumeOne { item } => container.consume_one(item, out_events),
        Command::ReplaceItems { items } => container.replace_items(items, out_events),
    }
}

/// Query functions that provide read-only access to the container state.
pub mod query {
    use super::Container;
    use stashgrid_core::{CellCoord, Item, ItemId, PlacementRules};
    use stashgrid_grid::Grid;

    /// Items held by the container, in placement priority order.
    #[must_use]
    pub fn items(container: &Container) -> &[Item] {
        container.items.as_slice()
    }

    /// Looks up a single item by identifier.
    #[must_use]
    pub fn item(container: &Container, id: ItemId) -> Option<&Item> {
        container.items.get(id)
    }

    /// Read-only view of the occupancy grid.
    #[must_use]
    pub fn grid(container: &Container) -> &Grid {
        &container.grid
    }

    /// Placement rules the container validates against.
    #[must_use]
    pub fn rules(container: &Container) -> PlacementRules {
        container.rules
    }

    /// Width and height of the container in cells.
    #[must_use]
    pub fn dimensions(container: &Container) -> (u32, u32) {
        container.grid.dimensions()
    }

    /// Item owning the cell, if any.
    #[must_use]
    pub fn occupant(container: &Container, cell: CellCoord) -> Option<ItemId> {
        container.grid.occupant(cell)
    }
}
