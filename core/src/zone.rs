//! Zone classification for container profiles.
//!
//! Plain containers are a single general region. Carried containers split
//! their cells into reserved, equipment and general zones whose usable extent
//! grows with the container tier; the commander profile uses a fixed, smaller
//! split. An item placed in a zoned container must keep all of its cells in one
//! zone.

use serde::{Deserialize, Serialize};

use crate::CellCoord;

/// Highest carried-container tier with its own layout. Higher tiers reuse it.
pub const MAX_TIER: u8 = 3;

/// Describes which zoning rules apply to a container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerProfile {
    /// Uniform container such as a shared stash or a loot pile.
    #[default]
    Plain,
    /// Player-carried container whose zone sizes depend on the tier.
    Carried {
        /// Capability tier; tiers above [`MAX_TIER`] behave like it.
        tier: u8,
    },
    /// Reduced carried container with a fixed zone split.
    Commander,
}

impl ContainerProfile {
    /// Reports whether items placed under this profile may not straddle zones.
    #[must_use]
    pub const fn is_zoned(self) -> bool {
        !matches!(self, Self::Plain)
    }
}

/// Named region of a container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    /// Protected slots kept when a run is lost.
    Reserved,
    /// Slots whose items contribute equipment bonuses.
    Equipment,
    /// Ordinary backpack space.
    General,
}

/// Half-open rectangle of cells. A missing end extends to the grid edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ZoneRect {
    column_start: i32,
    column_end: Option<i32>,
    row_start: i32,
    row_end: Option<i32>,
}

impl ZoneRect {
    const UNBOUNDED: Self = Self {
        column_start: 0,
        column_end: None,
        row_start: 0,
        row_end: None,
    };

    const fn bounded(columns: (i32, i32), rows: (i32, i32)) -> Self {
        Self {
            column_start: columns.0,
            column_end: Some(columns.1),
            row_start: rows.0,
            row_end: Some(rows.1),
        }
    }

    /// Reports whether the cell lies inside the rectangle.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        let within = |value: i32, start: i32, end: Option<i32>| {
            value >= start && end.map_or(true, |end| value < end)
        };
        within(cell.column(), self.column_start, self.column_end)
            && within(cell.row(), self.row_start, self.row_end)
    }
}

/// Unlocked rectangle of every zone of a carried container at one tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TierLayout {
    /// Usable part of the reserved zone.
    pub reserved: ZoneRect,
    /// Usable part of the equipment zone.
    pub equipment: ZoneRect,
    /// Usable part of the general zone.
    pub general: ZoneRect,
}

impl TierLayout {
    /// Unlocked rectangle belonging to the provided zone.
    #[must_use]
    pub const fn unlocked(&self, zone: Zone) -> ZoneRect {
        match zone {
            Zone::Reserved => self.reserved,
            Zone::Equipment => self.equipment,
            Zone::General => self.general,
        }
    }
}

/// Returns the unlocked layout of a carried container at `tier`.
#[must_use]
pub const fn tier_layout(tier: u8) -> TierLayout {
    match tier {
        0 | 1 => TierLayout {
            reserved: ZoneRect::bounded((0, 2), (0, 1)),
            equipment: ZoneRect::bounded((3, 6), (0, 2)),
            general: ZoneRect::bounded((3, 6), (2, 5)),
        },
        2 => TierLayout {
            reserved: ZoneRect::bounded((0, 2), (0, 2)),
            equipment: ZoneRect::bounded((3, 7), (0, 2)),
            general: ZoneRect::bounded((3, 8), (2, 5)),
        },
        _ => TierLayout {
            reserved: ZoneRect::UNBOUNDED,
            equipment: ZoneRect::UNBOUNDED,
            general: ZoneRect::UNBOUNDED,
        },
    }
}

const COMMANDER_UNLOCKED: ZoneRect = ZoneRect::bounded((0, 5), (0, 4));

/// Classifies the cell into a zone under the provided profile.
#[must_use]
pub fn zone_of(cell: CellCoord, profile: ContainerProfile) -> Zone {
    let (column, row) = (cell.column(), cell.row());
    match profile {
        ContainerProfile::Plain => Zone::General,
        ContainerProfile::Commander => {
            if row == 0 {
                if column < 2 {
                    Zone::Reserved
                } else {
                    Zone::Equipment
                }
            } else {
                Zone::General
            }
        }
        ContainerProfile::Carried { .. } => {
            if column < 3 && row < 3 {
                Zone::Reserved
            } else if column >= 3 && row < 2 {
                Zone::Equipment
            } else {
                Zone::General
            }
        }
    }
}

/// Reports whether the profile allows the cell to hold items.
///
/// Grid bounds and the unlocked-row limit are checked separately by the
/// placement validator.
#[must_use]
pub fn is_unlocked(cell: CellCoord, profile: ContainerProfile) -> bool {
    match profile {
        ContainerProfile::Plain => true,
        ContainerProfile::Commander => COMMANDER_UNLOCKED.contains(cell),
        ContainerProfile::Carried { tier } => tier_layout(tier)
            .unlocked(zone_of(cell, profile))
            .contains(cell),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDTH: i32 = 8;
    const HEIGHT: i32 = 5;

    fn all_cells() -> impl Iterator<Item = CellCoord> {
        (0..HEIGHT).flat_map(|row| (0..WIDTH).map(move |column| CellCoord::new(column, row)))
    }

    #[test]
    fn plain_profile_is_one_unlocked_zone() {
        for cell in all_cells() {
            assert_eq!(zone_of(cell, ContainerProfile::Plain), Zone::General);
            assert!(is_unlocked(cell, ContainerProfile::Plain));
        }
    }

    #[test]
    fn carried_zones_follow_corner_rectangles() {
        let profile = ContainerProfile::Carried { tier: 1 };
        assert_eq!(zone_of(CellCoord::new(2, 2), profile), Zone::Reserved);
        assert_eq!(zone_of(CellCoord::new(3, 1), profile), Zone::Equipment);
        assert_eq!(zone_of(CellCoord::new(3, 2), profile), Zone::General);
        assert_eq!(zone_of(CellCoord::new(0, 3), profile), Zone::General);
    }

    #[test]
    fn lowest_tier_unlocks_small_rectangles() {
        let profile = ContainerProfile::Carried { tier: 1 };
        let unlocked: Vec<_> = all_cells().filter(|cell| is_unlocked(*cell, profile)).collect();
        assert_eq!(unlocked.len(), 2 + 6 + 9);
        assert!(is_unlocked(CellCoord::new(1, 0), profile));
        assert!(!is_unlocked(CellCoord::new(2, 0), profile));
        assert!(!is_unlocked(CellCoord::new(6, 0), profile));
        assert!(is_unlocked(CellCoord::new(5, 4), profile));
    }

    #[test]
    fn higher_tiers_never_lock_cells_unlocked_below() {
        for tier in 1..=MAX_TIER + 1 {
            let lower = ContainerProfile::Carried { tier };
            let higher = ContainerProfile::Carried { tier: tier + 1 };
            for cell in all_cells() {
                if is_unlocked(cell, lower) {
                    assert!(
                        is_unlocked(cell, higher),
                        "tier {} locks {:?} which tier {} unlocked",
                        tier + 1,
                        cell,
                        tier,
                    );
                }
            }
        }
    }

    #[test]
    fn max_tier_unlocks_every_cell() {
        let profile = ContainerProfile::Carried { tier: MAX_TIER };
        assert!(all_cells().all(|cell| is_unlocked(cell, profile)));
    }

    #[test]
    fn commander_profile_has_fixed_split() {
        let profile = ContainerProfile::Commander;
        assert_eq!(zone_of(CellCoord::new(1, 0), profile), Zone::Reserved);
        assert_eq!(zone_of(CellCoord::new(4, 0), profile), Zone::Equipment);
        assert_eq!(zone_of(CellCoord::new(0, 1), profile), Zone::General);
        assert!(is_unlocked(CellCoord::new(4, 3), profile));
        assert!(!is_unlocked(CellCoord::new(5, 0), profile));
        assert!(!is_unlocked(CellCoord::new(0, 4), profile));
    }
}
