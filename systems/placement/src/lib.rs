#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure drop-planning system that turns a dragged item and a target anchor
//! into container commands.
//!
//! A stackable item dropped onto a compatible stack merges into it. Otherwise
//! the drop is placed directly when the validator accepts it. When the only
//! obstacle is other items, the rearrangement solver is consulted; any other
//! failure rejects the drop outright.

use stashgrid_core::{CellCoord, Command, Item, ItemId, PlacementError, PlacementRules, Relocation};
use stashgrid_grid::{check_placement, Grid};
use stashgrid_system_rearrangement::find_rearrangement;

/// Outcome of planning a single drop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropPlan {
    /// The item joins the stack under the target anchor.
    Merge {
        /// Stack receiving the dragged quantity.
        target: ItemId,
    },
    /// The item fits at the target anchor as is.
    Direct,
    /// The item fits once the listed items have been moved.
    Rearranged(Vec<Relocation>),
    /// The drop cannot happen.
    Rejected(PlacementError),
}

/// Decides how `item` could be dropped at `origin`.
///
/// `items` and `grid` describe the container's current state. The dragged item
/// may already live in the container; its own cells never block it.
#[must_use]
pub fn plan_drop(
    items: &[Item],
    grid: &Grid,
    item: &Item,
    origin: CellCoord,
    rules: PlacementRules,
) -> DropPlan {
    if let Some(target) = merge_target(items, grid, item, origin) {
        return DropPlan::Merge { target };
    }

    match check_placement(grid, item, origin, rules) {
        Ok(()) => DropPlan::Direct,
        Err(PlacementError::Occupied) => {
            let (columns, rows) = grid.dimensions();
            if let Some(relocations) =
                find_rearrangement(items, item, origin, columns, rows, rules)
            {
                return DropPlan::Rearranged(relocations);
            }
            let empty = Grid::new(columns, rows);
            match check_placement(&empty, item, origin, rules) {
                Ok(()) => DropPlan::Rejected(PlacementError::Occupied),
                Err(reason) => DropPlan::Rejected(reason),
            }
        }
        Err(reason) => DropPlan::Rejected(reason),
    }
}

/// Stack under `origin` that would absorb the dragged quantity.
fn merge_target(items: &[Item], grid: &Grid, item: &Item, origin: CellCoord) -> Option<ItemId> {
    let occupant = grid.occupant(origin)?;
    let stack = items.iter().find(|stored| stored.id() == occupant)?;
    let fits = stack.quantity().checked_add(item.quantity()).is_some();
    (item.stacks_with(stack) && fits).then_some(occupant)
}

/// Declarative preview describing a potential drop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropPreview {
    /// Dragged item, in the orientation it would be dropped with.
    pub item: Item,
    /// Anchor under the cursor.
    pub origin: CellCoord,
    /// Plan computed for the drop.
    pub plan: DropPlan,
    /// Stored copy of the item when it already lives in the container.
    pub resident: Option<Item>,
}

impl DropPreview {
    /// Plans a drop and captures everything needed to commit it later.
    #[must_use]
    pub fn new(
        items: &[Item],
        grid: &Grid,
        item: Item,
        origin: CellCoord,
        rules: PlacementRules,
    ) -> Self {
        let plan = plan_drop(items, grid, &item, origin, rules);
        let resident = items
            .iter()
            .find(|stored| stored.id() == item.id())
            .cloned();
        Self {
            item,
            origin,
            plan,
            resident,
        }
    }

    /// Indicates whether confirming the preview would produce a command.
    #[must_use]
    pub fn placeable(&self) -> bool {
        !matches!(self.plan, DropPlan::Rejected(_))
    }
}

/// Drop-planning system that translates a confirmed preview into commands.
#[derive(Clone, Copy, Debug, Default)]
pub struct DropPlanner;

impl DropPlanner {
    /// Creates a new drop planner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Emits the commands that commit `preview` when `confirm` is set.
    ///
    /// Rejected previews emit nothing. A merge takes a resident item out of
    /// the container before folding it into the target stack. A resident item
    /// that keeps its orientation is moved; one that was turned while dragged
    /// is committed through an empty rearrangement so its new orientation is
    /// validated with the move.
    pub fn handle(&self, preview: Option<&DropPreview>, confirm: bool, out: &mut Vec<Command>) {
        if !confirm {
            return;
        }
        let Some(preview) = preview else {
            return;
        };

        let item = preview.item.clone();
        let origin = preview.origin;
        match &preview.plan {
            DropPlan::Rejected(reason) => {
                log::debug!(
                    "drop of item {} at {:?} not committed: {reason}",
                    item.id().get(),
                    origin
                );
            }
            DropPlan::Merge { target } => {
                let source = match &preview.resident {
                    Some(stored) => {
                        out.push(Command::RemoveItem { item: stored.id() });
                        stored.clone()
                    }
                    None => item,
                };
                out.push(Command::MergeStack {
                    source,
                    target: *target,
                });
            }
            DropPlan::Direct => match &preview.resident {
                None => out.push(Command::PlaceItem { item, origin }),
                Some(stored) if stored.rotation() == item.rotation() => {
                    out.push(Command::MoveItem {
                        item: item.id(),
                        origin,
                    });
                }
                Some(_) => out.push(Command::ApplyRearrangement {
                    item,
                    origin,
                    relocations: Vec::new(),
                }),
            },
            DropPlan::Rearranged(relocations) => out.push(Command::ApplyRearrangement {
                item,
                origin,
                relocations: relocations.clone(),
            }),
        }
    }
}
