//! Occupancy matrices and quarter-turn rotation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a raw occupancy matrix cannot be turned into a [`Shape`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum ShapeError {
    /// The matrix has no rows, or its rows have no columns.
    #[error("shape matrix has no cells")]
    Empty,
    /// A row length differs from the length of the first row.
    #[error("shape row {row} has {found} columns, expected {expected}")]
    Ragged {
        /// Index of the offending row.
        row: usize,
        /// Column count established by the first row.
        expected: usize,
        /// Column count of the offending row.
        found: usize,
    },
    /// A cell holds something other than `0` or `1`.
    #[error("shape cell value {value} is neither 0 nor 1")]
    InvalidCell {
        /// Value found in the matrix.
        value: u8,
    },
    /// Every cell of the matrix is `0`.
    #[error("shape does not occupy any cell")]
    Unoccupied,
}

/// Rotation value that is not a multiple of 90 degrees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
#[error("rotation of {0} degrees is not a quarter turn")]
pub struct InvalidRotation(pub u16);

/// Orientation of an item, measured clockwise from its canonical shape.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    /// Canonical orientation.
    #[default]
    Deg0,
    /// One clockwise quarter turn.
    Deg90,
    /// Two quarter turns.
    Deg180,
    /// Three clockwise quarter turns.
    Deg270,
}

impl Rotation {
    /// Every orientation in clockwise order starting at [`Rotation::Deg0`].
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    /// Number of clockwise quarter turns away from the canonical orientation.
    #[must_use]
    pub const fn quarter_turns(self) -> u8 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 1,
            Self::Deg180 => 2,
            Self::Deg270 => 3,
        }
    }

    /// Orientation reached after the provided number of quarter turns.
    #[must_use]
    pub const fn from_quarter_turns(turns: u8) -> Self {
        match turns % 4 {
            0 => Self::Deg0,
            1 => Self::Deg90,
            2 => Self::Deg180,
            _ => Self::Deg270,
        }
    }

    /// Orientation expressed in degrees.
    #[must_use]
    pub const fn degrees(self) -> u16 {
        self.quarter_turns() as u16 * 90
    }

    /// Parses an angle in degrees. Angles are taken modulo a full turn.
    #[must_use]
    pub const fn from_degrees(degrees: u16) -> Option<Self> {
        let normalized = degrees % 360;
        if normalized % 90 != 0 {
            return None;
        }
        Some(Self::from_quarter_turns((normalized / 90) as u8))
    }

    /// Orientation one quarter turn clockwise from `self`.
    #[must_use]
    pub const fn clockwise(self) -> Self {
        Self::from_quarter_turns(self.quarter_turns() + 1)
    }
}

impl TryFrom<u16> for Rotation {
    type Error = InvalidRotation;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::from_degrees(value).ok_or(InvalidRotation(value))
    }
}

impl From<Rotation> for u16 {
    fn from(value: Rotation) -> Self {
        value.degrees()
    }
}

/// Rotates a raw 0/1 matrix one quarter turn clockwise.
///
/// For an input of `R` rows and `C` columns the output has `C` rows and `R`
/// columns, with `output[c][R - 1 - r] == input[r][c]`. Short rows are padded
/// with empty cells and any non-zero value counts as occupied. An empty matrix,
/// or one without columns, rotates to an empty matrix.
#[must_use]
pub fn rotate_matrix(matrix: &[Vec<u8>]) -> Vec<Vec<u8>> {
    let rows = matrix.len();
    let columns = matrix.iter().map(Vec::len).max().unwrap_or(0);
    if rows == 0 || columns == 0 {
        return Vec::new();
    }

    let mut rotated = vec![vec![0_u8; rows]; columns];
    for (r, row) in matrix.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if *value != 0 {
                rotated[c][rows - 1 - r] = 1;
            }
        }
    }
    rotated
}

/// Validated rectangular occupancy matrix with at least one occupied cell.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct Shape {
    rows: u32,
    columns: u32,
    cells: Vec<bool>,
}

impl Shape {
    /// Builds a shape from rows of `0`/`1` values.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, ShapeError> {
        let Some(first) = rows.first() else {
            return Err(ShapeError::Empty);
        };
        let expected = first.len();
        if expected == 0 {
            return Err(ShapeError::Empty);
        }

        let mut cells = Vec::with_capacity(rows.len() * expected);
        for (index, row) in rows.iter().enumerate() {
            if row.len() != expected {
                return Err(ShapeError::Ragged {
                    row: index,
                    expected,
                    found: row.len(),
                });
            }
            for &value in row {
                match value {
                    0 => cells.push(false),
                    1 => cells.push(true),
                    value => return Err(ShapeError::InvalidCell { value }),
                }
            }
        }

        if !cells.iter().any(|occupied| *occupied) {
            return Err(ShapeError::Unoccupied);
        }

        let row_count = u32::try_from(rows.len()).map_err(|_| ShapeError::Empty)?;
        let column_count = u32::try_from(expected).map_err(|_| ShapeError::Empty)?;
        Ok(Self {
            rows: row_count,
            columns: column_count,
            cells,
        })
    }

    /// Builds a fully occupied rectangle.
    pub fn filled(columns: u32, rows: u32) -> Result<Self, ShapeError> {
        if columns == 0 || rows == 0 {
            return Err(ShapeError::Empty);
        }
        let len = usize::try_from(u64::from(columns) * u64::from(rows))
            .map_err(|_| ShapeError::Empty)?;
        Ok(Self {
            rows,
            columns,
            cells: vec![true; len],
        })
    }

    /// Number of rows in the bounding box.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns in the bounding box.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Reports whether the relative cell is part of the shape.
    #[must_use]
    pub fn is_occupied(&self, column: u32, row: u32) -> bool {
        if column >= self.columns || row >= self.rows {
            return false;
        }
        self.cells[self.index(column, row)]
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|occupied| **occupied).count()
    }

    /// Occupied relative cells as `(column, row)` pairs in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let columns = self.columns;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, occupied)| **occupied)
            .map(move |(index, _)| {
                let index = index as u32;
                (index % columns, index / columns)
            })
    }

    /// Shape rotated one quarter turn clockwise.
    #[must_use]
    pub fn rotated_clockwise(&self) -> Self {
        let rotated_rows = self.columns;
        let rotated_columns = self.rows;
        let mut cells = vec![false; self.cells.len()];
        for (column, row) in self.occupied() {
            let target_row = column;
            let target_column = self.rows - 1 - row;
            cells[(target_row * rotated_columns + target_column) as usize] = true;
        }
        Self {
            rows: rotated_rows,
            columns: rotated_columns,
            cells,
        }
    }

    /// Shape in the provided orientation, always derived from `self`.
    #[must_use]
    pub fn rotated(&self, rotation: Rotation) -> Self {
        let mut shape = self.clone();
        for _ in 0..rotation.quarter_turns() {
            shape = shape.rotated_clockwise();
        }
        shape
    }

    /// Matrix form of the shape as rows of `0`/`1`.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.columns as usize)
            .map(|row| row.iter().map(|occupied| u8::from(*occupied)).collect())
            .collect()
    }

    fn index(&self, column: u32, row: u32) -> usize {
        (row * self.columns + column) as usize
    }
}

impl TryFrom<Vec<Vec<u8>>> for Shape {
    type Error = ShapeError;

    fn try_from(value: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        Self::from_rows(&value)
    }
}

impl From<Shape> for Vec<Vec<u8>> {
    fn from(value: Shape) -> Self {
        value.to_rows()
    }
}
