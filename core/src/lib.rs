#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Stashgrid placement engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative container, and pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the container executes those commands
//! via its `apply` entry point, and then broadcasts [`Event`] values. Systems
//! read immutable container snapshots and respond with new command batches.

pub mod shape;
pub mod zone;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use shape::{rotate_matrix, InvalidRotation, Rotation, Shape, ShapeError};
pub use zone::{is_unlocked, tier_layout, zone_of, ContainerProfile, TierLayout, Zone, ZoneRect};

/// Unique identifier of an item within a container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u32);

impl ItemId {
    /// Creates a new item identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Coordinates are signed so that candidate anchors beyond the top or left
/// edge can be expressed; such cells are never inside a grid.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CellCoord {
    column: i32,
    row: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Cell shifted by the provided column and row deltas.
    #[must_use]
    pub const fn offset(self, columns: i32, rows: i32) -> Self {
        Self {
            column: self.column.saturating_add(columns),
            row: self.row.saturating_add(rows),
        }
    }

    /// Squared Euclidean distance between two cells.
    #[must_use]
    pub fn squared_distance(self, other: CellCoord) -> i64 {
        let columns = i64::from(self.column) - i64::from(other.column);
        let rows = i64::from(self.row) - i64::from(other.row);
        columns * columns + rows * rows
    }
}

/// Key shared by items that merge into a single stack.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StackKey(String);

impl StackKey {
    /// Creates a stack key from the provided name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Name carried by the key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Item record owned by a container.
///
/// The canonical shape is never mutated; the occupied cells are always derived
/// from it and the current rotation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    shape: Shape,
    #[serde(default)]
    rotation: Rotation,
    #[serde(default)]
    anchor: CellCoord,
    #[serde(default = "default_quantity")]
    quantity: u32,
    #[serde(default)]
    stack_key: Option<StackKey>,
}

const fn default_quantity() -> u32 {
    1
}

impl Item {
    /// Creates an unrotated single item anchored at the origin.
    #[must_use]
    pub fn new(id: ItemId, shape: Shape) -> Self {
        Self {
            id,
            shape,
            rotation: Rotation::Deg0,
            anchor: CellCoord::new(0, 0),
            quantity: default_quantity(),
            stack_key: None,
        }
    }

    /// Returns the item in the provided orientation.
    #[must_use]
    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Returns the item anchored at the provided cell.
    #[must_use]
    pub fn with_anchor(mut self, anchor: CellCoord) -> Self {
        self.anchor = anchor;
        self
    }

    /// Returns the item carrying the provided stack quantity.
    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Returns the item marked as stackable under `key`.
    #[must_use]
    pub fn with_stack_key(mut self, key: StackKey) -> Self {
        self.stack_key = Some(key);
        self
    }

    /// Identifier of the item.
    #[must_use]
    pub const fn id(&self) -> ItemId {
        self.id
    }

    /// Shape of the item at its canonical orientation.
    #[must_use]
    pub const fn canonical_shape(&self) -> &Shape {
        &self.shape
    }

    /// Current orientation of the item.
    #[must_use]
    pub const fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Top-left cell of the item's bounding box.
    #[must_use]
    pub const fn anchor(&self) -> CellCoord {
        self.anchor
    }

    /// Number of units held by the stack.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Key shared with items the stack may absorb.
    #[must_use]
    pub fn stack_key(&self) -> Option<&StackKey> {
        self.stack_key.as_ref()
    }

    /// Moves the item to a new anchor.
    pub fn set_anchor(&mut self, anchor: CellCoord) {
        self.anchor = anchor;
    }

    /// Changes the orientation of the item.
    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    /// Replaces the stack quantity.
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    /// Shape in the current orientation, derived from the canonical shape.
    #[must_use]
    pub fn current_shape(&self) -> Shape {
        self.shape.rotated(self.rotation)
    }

    /// Number of cells the item occupies.
    #[must_use]
    pub fn footprint(&self) -> usize {
        self.shape.occupied_count()
    }

    /// Absolute cells covered by the item when anchored at `origin`.
    #[must_use]
    pub fn cells_at(&self, origin: CellCoord) -> Vec<CellCoord> {
        let shape = self.current_shape();
        shape
            .occupied()
            .map(|(column, row)| origin.offset(column as i32, row as i32))
            .collect()
    }

    /// Absolute cells covered by the item at its current anchor.
    #[must_use]
    pub fn occupied_cells(&self) -> Vec<CellCoord> {
        self.cells_at(self.anchor)
    }

    /// Reports whether `other` may be merged into this stack.
    #[must_use]
    pub fn stacks_with(&self, other: &Item) -> bool {
        self.id != other.id
            && matches!((&self.stack_key, &other.stack_key), (Some(a), Some(b)) if a == b)
    }
}

/// New position and orientation chosen for an item displaced by a rearrangement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relocation {
    /// Item being displaced.
    pub item: ItemId,
    /// Anchor the item moves to.
    pub anchor: CellCoord,
    /// Orientation the item adopts.
    pub rotation: Rotation,
}

/// Bundles the container metadata every placement check depends on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacementRules {
    /// Zoning rules of the container.
    pub profile: ContainerProfile,
    /// Number of usable rows counted from the top; `None` or zero disables it.
    pub unlocked_rows: Option<u32>,
}

impl PlacementRules {
    /// Creates placement rules from a profile and optional row limit.
    #[must_use]
    pub const fn new(profile: ContainerProfile, unlocked_rows: Option<u32>) -> Self {
        Self {
            profile,
            unlocked_rows,
        }
    }

    /// Reports whether the row lies at or beyond the unlocked-row limit.
    #[must_use]
    pub fn row_locked(&self, row: i32) -> bool {
        match self.unlocked_rows {
            Some(limit) if limit > 0 => i64::from(row) >= i64::from(limit),
            _ => false,
        }
    }
}

/// Commands that express all permissible container mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Places a new item with its top-left cell at `origin`.
    PlaceItem {
        /// Item record entering the container.
        item: Item,
        /// Anchor requested for the item.
        origin: CellCoord,
    },
    /// Moves an item already in the container to a new anchor.
    MoveItem {
        /// Item to move.
        item: ItemId,
        /// Anchor requested for the item.
        origin: CellCoord,
    },
    /// Removes an item from the container.
    RemoveItem {
        /// Item to remove.
        item: ItemId,
    },
    /// Rotates an item one quarter turn clockwise, kicking it if required.
    RotateItem {
        /// Item to rotate.
        item: ItemId,
    },
    /// Commits a rearrangement computed by the solver as one atomic update.
    ApplyRearrangement {
        /// Item being dropped; it may be new or already in the container.
        item: Item,
        /// Anchor requested for the dropped item.
        origin: CellCoord,
        /// New positions of the displaced items.
        relocations: Vec<Relocation>,
    },
    /// Merges a detached item record into an existing stack.
    MergeStack {
        /// Item record being absorbed; it must not be in the container.
        source: Item,
        /// Stack receiving the quantity.
        target: ItemId,
    },
    /// Uses up one unit of a stack, removing the item when it runs out.
    ConsumeOne {
        /// Stack being consumed.
        item: ItemId,
    },
    /// Replaces the item list after a bulk external change and rebuilds the grid.
    ReplaceItems {
        /// New system-of-record item list, in placement priority order.
        items: Vec<Item>,
    },
}

/// Events broadcast by the container after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that an item entered the container.
    ItemPlaced {
        /// Item that was placed.
        item: ItemId,
        /// Anchor the item occupies.
        anchor: CellCoord,
        /// Orientation of the item.
        rotation: Rotation,
    },
    /// Confirms that an item moved within the container.
    ItemMoved {
        /// Item that moved.
        item: ItemId,
        /// Previous anchor.
        from: CellCoord,
        /// New anchor.
        to: CellCoord,
    },
    /// Confirms that an item left the container.
    ItemRemoved {
        /// Detached record of the removed item.
        item: Item,
    },
    /// Confirms that an item was rotated.
    ItemRotated {
        /// Item that was rotated.
        item: ItemId,
        /// Orientation after the rotation.
        rotation: Rotation,
        /// Anchor after any wall-kick.
        anchor: CellCoord,
    },
    /// Confirms that displaced items were moved by a rearrangement.
    ItemsRelocated {
        /// Positions adopted by the displaced items.
        relocations: Vec<Relocation>,
    },
    /// Confirms that a detached item was absorbed by a stack.
    StackMerged {
        /// Item that was absorbed.
        source: ItemId,
        /// Stack that received the quantity.
        target: ItemId,
        /// Quantity of the stack after the merge.
        quantity: u32,
    },
    /// Reports the new quantity of a stack that still holds units.
    QuantityChanged {
        /// Stack whose quantity changed.
        item: ItemId,
        /// Remaining quantity.
        quantity: u32,
    },
    /// Confirms that the grid was rebuilt from a new item list.
    GridRebuilt {
        /// Items from the list that no longer fit and were dropped.
        dropped: Vec<ItemId>,
    },
    /// Reports that a placement or move request was rejected.
    PlacementRejected {
        /// Item the request referred to.
        item: ItemId,
        /// Anchor provided in the request.
        origin: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Reports that a rotation request was rejected.
    RotationRejected {
        /// Item the request referred to.
        item: ItemId,
        /// Specific reason the rotation failed.
        reason: RotationError,
    },
    /// Reports that a rearrangement could not be committed.
    RearrangementRejected {
        /// Item being dropped.
        item: ItemId,
        /// Anchor requested for the dropped item.
        origin: CellCoord,
        /// First placement failure found while re-validating the outcome.
        reason: PlacementError,
    },
    /// Reports that a stack merge was rejected.
    MergeRejected {
        /// Item that was meant to be absorbed.
        source: ItemId,
        /// Stack that was meant to receive it.
        target: ItemId,
        /// Specific reason the merge failed.
        reason: StackError,
    },
    /// Reports that a command referred to an unknown or duplicate item.
    CommandRejected {
        /// Item the command referred to.
        item: ItemId,
        /// Specific reason the command failed.
        reason: LookupError,
    },
}

/// Reasons a placement is not legal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum PlacementError {
    /// The item's shape has no occupied cell.
    #[error("item shape is empty")]
    EmptyShape,
    /// A cell lies outside the grid.
    #[error("item extends beyond the grid")]
    OutOfBounds,
    /// A cell lies at or beyond the unlocked-row limit.
    #[error("item covers a locked row")]
    RowLocked,
    /// The item's cells belong to more than one zone.
    #[error("item straddles two zones")]
    ZoneStraddle,
    /// A cell is outside the region unlocked by the container profile.
    #[error("item covers a locked cell")]
    CellLocked,
    /// A cell is owned by another item.
    #[error("item overlaps another item")]
    Occupied,
}

/// Reasons a rotation request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum RotationError {
    /// No wall-kick offset yields a legal placement.
    #[error("no space to rotate the item")]
    NoSpace,
}

/// Reasons a stack merge may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum StackError {
    /// The items do not share a stack key.
    #[error("items do not stack")]
    Incompatible,
    /// The source already lives in the container.
    #[error("source item is still placed in the container")]
    SourcePlaced,
    /// The merged quantity does not fit the quantity type.
    #[error("stack quantity overflow")]
    Overflow,
}

/// Reasons a command may refer to an item that cannot be used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum LookupError {
    /// No item with the provided identifier exists.
    #[error("no such item")]
    MissingItem,
    /// An item with the provided identifier already exists.
    #[error("item identifier already in use")]
    DuplicateItem,
}
