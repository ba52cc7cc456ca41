//! Ordered record of the items held by a container.

use stashgrid_core::{Item, ItemId};

/// Item list in insertion order. The order doubles as the priority used when
/// the grid is rebuilt from scratch.
#[derive(Clone, Debug, Default)]
pub(crate) struct ItemLedger {
    entries: Vec<Item>,
}

impl ItemLedger {
    /// Creates an empty ledger.
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn as_slice(&self) -> &[Item] {
        &self.entries
    }

    pub(crate) fn contains(&self, id: ItemId) -> bool {
        self.position(id).is_some()
    }

    pub(crate) fn get(&self, id: ItemId) -> Option<&Item> {
        self.entries.iter().find(|item| item.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.entries.iter_mut().find(|item| item.id() == id)
    }

    /// Appends a record; callers guarantee the identifier is unused.
    pub(crate) fn push(&mut self, item: Item) {
        self.entries.push(item);
    }

    pub(crate) fn remove(&mut self, id: ItemId) -> Option<Item> {
        let index = self.position(id)?;
        Some(self.entries.remove(index))
    }

    /// Swaps in a new list wholesale.
    pub(crate) fn replace(&mut self, entries: Vec<Item>) {
        self.entries = entries;
    }

    fn position(&self, id: ItemId) -> Option<usize> {
        self.entries.iter().position(|item| item.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stashgrid_core::Shape;

    fn item(id: u32) -> Item {
        Item::new(ItemId::new(id), Shape::filled(1, 1).expect("valid shape"))
    }

    #[test]
    fn ledger_starts_empty() {
        let ledger = ItemLedger::new();
        assert!(ledger.as_slice().is_empty());
        assert!(!ledger.contains(ItemId::new(0)));
    }

    #[test]
    fn removal_preserves_order_of_remaining_items() {
        let mut ledger = ItemLedger::new();
        for id in 1..=3 {
            ledger.push(item(id));
        }

        let removed = ledger.remove(ItemId::new(2)).expect("item 2 is present");

        assert_eq!(removed.id(), ItemId::new(2));
        let ids: Vec<ItemId> = ledger.as_slice().iter().map(Item::id).collect();
        assert_eq!(ids, vec![ItemId::new(1), ItemId::new(3)]);
        assert!(ledger.remove(ItemId::new(2)).is_none());
    }

    #[test]
    fn replace_discards_previous_entries() {
        let mut ledger = ItemLedger::new();
        ledger.push(item(1));

        ledger.replace(vec![item(5), item(6)]);

        assert!(!ledger.contains(ItemId::new(1)));
        assert!(ledger.contains(ItemId::new(6)));
        assert_eq!(
            ledger.get(ItemId::new(5)).map(Item::id),
            Some(ItemId::new(5))
        );
    }
}
