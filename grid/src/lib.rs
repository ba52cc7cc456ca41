#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Dense cell-ownership grid and the placement validator that guards it.
//!
//! The grid is always derivable from an item list: [`rebuild`] replays the
//! list through the validator, which makes the item list the system of record
//! and the grid a cache of it.

mod validator;

use stashgrid_core::{CellCoord, Item, ItemId, PlacementRules};

pub use validator::{can_place_item, check_placement};

/// Rectangular table mapping every cell to its owning item, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    columns: u32,
    rows: u32,
    cells: Vec<Option<ItemId>>,
}

impl Grid {
    /// Creates an all-empty grid.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![None; capacity],
        }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Provides the dimensions of the grid as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.index(cell).is_some()
    }

    /// Returns the item owning the cell, if any.
    #[must_use]
    pub fn occupant(&self, cell: CellCoord) -> Option<ItemId> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    /// Reports whether the cell is inside the grid and unowned.
    #[must_use]
    pub fn is_free(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .map_or(false, |index| self.cells[index].is_none())
    }

    /// Writes the item's identifier into every cell its current shape covers
    /// when anchored at `origin`.
    ///
    /// This is a commit step: callers validate first. Cells that fall outside
    /// the grid are skipped.
    pub fn place(&mut self, item: &Item, origin: CellCoord) {
        for cell in item.cells_at(origin) {
            if let Some(index) = self.index(cell) {
                self.cells[index] = Some(item.id());
            }
        }
    }

    /// Clears every cell owned by the item. Unknown identifiers are a no-op.
    pub fn remove(&mut self, item: ItemId) {
        for slot in self.cells.iter_mut() {
            if *slot == Some(item) {
                *slot = None;
            }
        }
    }

    /// Cells owned by the item in row-major order.
    #[must_use]
    pub fn cells_owned_by(&self, item: ItemId) -> Vec<CellCoord> {
        self.iter()
            .filter(|(_, owner)| *owner == Some(item))
            .map(|(cell, _)| cell)
            .collect()
    }

    /// Iterates over every cell and its owner in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Option<ItemId>)> + '_ {
        let columns = self.columns.max(1);
        self.cells.iter().enumerate().map(move |(index, owner)| {
            let index = index as u64;
            let column = (index % u64::from(columns)) as i32;
            let row = (index / u64::from(columns)) as i32;
            (CellCoord::new(column, row), *owner)
        })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        let column = u32::try_from(cell.column()).ok()?;
        let row = u32::try_from(cell.row()).ok()?;
        if column < self.columns && row < self.rows {
            let row = usize::try_from(row).ok()?;
            let column = usize::try_from(column).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Grid reconstructed from an item list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rebuild {
    /// Grid holding every item that passed validation.
    pub grid: Grid,
    /// Items that failed validation, in list order.
    pub dropped: Vec<ItemId>,
}

/// Reconstructs a grid by validating and placing each item at its own anchor,
/// in list order. Items that fail validation are left out of the grid and
/// reported in [`Rebuild::dropped`].
#[must_use]
pub fn rebuild(items: &[Item], columns: u32, rows: u32, rules: PlacementRules) -> Rebuild {
    let mut grid = Grid::new(columns, rows);
    let mut dropped = Vec::new();
    for item in items {
        match check_placement(&grid, item, item.anchor(), rules) {
            Ok(()) => grid.place(item, item.anchor()),
            Err(reason) => {
                log::debug!(
                    "rebuild dropped item {} at {:?}: {reason}",
                    item.id().get(),
                    item.anchor()
                );
                dropped.push(item.id());
            }
        }
    }
    Rebuild { grid, dropped }
}
