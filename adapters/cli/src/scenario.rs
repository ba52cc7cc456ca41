//! TOML scenario files describing a container and the items around it.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use stashgrid_container::{apply, Container};
use stashgrid_core::{
    CellCoord, Command, ContainerProfile, Event, Item, ItemId, PlacementRules, Rotation, Shape,
    StackKey,
};

/// Container layout plus the loose items that may be dropped into it.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Scenario {
    columns: u32,
    rows: u32,
    #[serde(default)]
    unlocked_rows: Option<u32>,
    #[serde(default)]
    profile: ContainerProfile,
    #[serde(default)]
    items: Vec<ItemEntry>,
    #[serde(default)]
    incoming: Vec<ItemEntry>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ItemEntry {
    id: u32,
    shape: Shape,
    #[serde(default)]
    rotation: Rotation,
    #[serde(default)]
    column: i32,
    #[serde(default)]
    row: i32,
    #[serde(default = "default_quantity")]
    quantity: u32,
    #[serde(default)]
    stack_key: Option<String>,
}

const fn default_quantity() -> u32 {
    1
}

impl ItemEntry {
    fn to_item(&self) -> Result<Item> {
        if self.quantity == 0 {
            bail!("item {} has a quantity of zero", self.id);
        }
        let item = Item::new(ItemId::new(self.id), self.shape.clone())
            .with_rotation(self.rotation)
            .with_anchor(CellCoord::new(self.column, self.row))
            .with_quantity(self.quantity);
        Ok(match &self.stack_key {
            Some(key) => item.with_stack_key(StackKey::new(key.as_str())),
            None => item,
        })
    }
}

impl Scenario {
    /// Reads and parses a scenario file.
    pub(crate) fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid scenario in {}", path.display()))
    }

    /// Parses scenario TOML contents.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let scenario: Self =
            toml::from_str(contents).context("failed to parse scenario toml contents")?;
        if scenario.columns == 0 || scenario.rows == 0 {
            bail!(
                "container must have at least one cell, got {}x{}",
                scenario.columns,
                scenario.rows
            );
        }

        let mut seen = Vec::new();
        for entry in scenario.items.iter().chain(&scenario.incoming) {
            if seen.contains(&entry.id) {
                bail!("item id {} is used more than once", entry.id);
            }
            seen.push(entry.id);
        }
        Ok(scenario)
    }

    /// Placement rules of the scenario's container.
    pub(crate) fn rules(&self) -> PlacementRules {
        PlacementRules::new(self.profile, self.unlocked_rows)
    }

    /// Builds the container with every scenario item at its anchor.
    pub(crate) fn build(&self) -> Result<Container> {
        let items = self
            .items
            .iter()
            .map(ItemEntry::to_item)
            .collect::<Result<Vec<_>>>()?;

        let mut container = Container::new(self.columns, self.rows, self.rules());
        let mut events = Vec::new();
        apply(&mut container, Command::ReplaceItems { items }, &mut events);

        for event in events {
            if let Event::GridRebuilt { dropped } = event {
                if !dropped.is_empty() {
                    let ids = dropped
                        .iter()
                        .map(|id| id.get().to_string())
                        .collect::<Vec<_>>()
                        .join(", ");
                    bail!("scenario items do not fit at their anchors: {ids}");
                }
            }
        }
        Ok(container)
    }

    /// Loose items waiting outside the container.
    pub(crate) fn incoming(&self) -> Result<Vec<Item>> {
        self.incoming.iter().map(ItemEntry::to_item).collect()
    }

    /// Loose item with the provided identifier.
    pub(crate) fn incoming_item(&self, id: ItemId) -> Result<Option<Item>> {
        self.incoming
            .iter()
            .find(|entry| entry.id == id.get())
            .map(ItemEntry::to_item)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stashgrid_container::query;

    const CARRIED: &str = r#"
        columns = 8
        rows = 5
        profile = { carried = { tier = 2 } }

        [[items]]
        id = 1
        shape = [[1, 1], [1, 0]]
        rotation = 90
        column = 3
        row = 2

        [[incoming]]
        id = 7
        shape = [[1]]
        quantity = 3
        stack_key = "ammo"
    "#;

    #[test]
    fn carried_scenario_builds_container() {
        let scenario = Scenario::parse(CARRIED).expect("scenario parses");
        let container = scenario.build().expect("items fit");

        assert_eq!(
            query::rules(&container).profile,
            ContainerProfile::Carried { tier: 2 }
        );
        let item = query::item(&container, ItemId::new(1)).expect("item placed");
        assert_eq!(item.rotation(), Rotation::Deg90);
        assert_eq!(item.anchor(), CellCoord::new(3, 2));

        let incoming = scenario
            .incoming_item(ItemId::new(7))
            .expect("item converts")
            .expect("item exists");
        assert_eq!(incoming.quantity(), 3);
        assert_eq!(incoming.stack_key().map(StackKey::as_str), Some("ammo"));
    }

    #[test]
    fn plain_profile_is_the_default() {
        let scenario = Scenario::parse("columns = 2\nrows = 2\n").expect("scenario parses");
        assert_eq!(scenario.rules(), PlacementRules::default());
        assert!(scenario.incoming().expect("no items").is_empty());
    }

    #[test]
    fn malformed_scenarios_are_rejected() {
        for contents in [
            "columns = 0\nrows = 3\n",
            "columns = 2\nrows = 2\n[[items]]\nid = 1\nshape = [[0]]\n",
            "columns = 2\nrows = 2\n[[items]]\nid = 1\nshape = [[1]]\nrotation = 45\n",
            "columns = 2\nrows = 2\n[[items]]\nid = 1\nshape = [[1]]\n[[incoming]]\nid = 1\nshape = [[1]]\n",
            "columns = 2\nrows = 2\nprofile = \"vault\"\n",
        ] {
            assert!(
                Scenario::parse(contents).is_err(),
                "scenario should be rejected:\n{contents}"
            );
        }
    }

    #[test]
    fn overlapping_scenario_items_fail_to_build() {
        let scenario = Scenario::parse(
            "columns = 2\nrows = 2\n\
             [[items]]\nid = 1\nshape = [[1, 1]]\n\
             [[items]]\nid = 2\nshape = [[1]]\ncolumn = 1\n",
        )
        .expect("scenario parses");

        let error = scenario.build().expect_err("items overlap");
        assert!(error.to_string().contains('2'));
    }
}
