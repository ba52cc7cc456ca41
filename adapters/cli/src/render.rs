//! Plain-text rendering of containers and container events.

use stashgrid_container::{query, Container};
use stashgrid_core::{is_unlocked, zone_of, Event, ItemId, Zone};

const ITEM_SYMBOLS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Symbol drawn for cells owned by the item.
fn item_symbol(id: ItemId) -> char {
    usize::try_from(id.get())
        .ok()
        .and_then(|index| ITEM_SYMBOLS.get(index))
        .map_or('*', |symbol| char::from(*symbol))
}

/// Draws the container one row per line.
///
/// Items show as their id (`0-9`, `A-Z`, `*` beyond that). Free cells show
/// their zone: `r` reserved, `e` equipment, `.` general. Locked cells show `x`.
pub(crate) fn render_grid(container: &Container) -> String {
    let rules = query::rules(container);
    let (columns, _) = query::dimensions(container);
    let mut output = String::new();

    for (cell, owner) in query::grid(container).iter() {
        let symbol = match owner {
            Some(id) => item_symbol(id),
            None if rules.row_locked(cell.row()) || !is_unlocked(cell, rules.profile) => 'x',
            None => match zone_of(cell, rules.profile) {
                Zone::Reserved => 'r',
                Zone::Equipment => 'e',
                Zone::General => '.',
            },
        };
        output.push(symbol);
        if u32::try_from(cell.column()).map_or(false, |column| column + 1 == columns) {
            output.push('\n');
        }
    }
    output
}

/// One-line description of an event.
pub(crate) fn describe_event(event: &Event) -> String {
    match event {
        Event::ItemPlaced {
            item,
            anchor,
            rotation,
        } => format!(
            "placed item {} at ({}, {}) rotated {} degrees",
            item.get(),
            anchor.column(),
            anchor.row(),
            rotation.degrees()
        ),
        Event::ItemMoved { item, from, to } => format!(
            "moved item {} from ({}, {}) to ({}, {})",
            item.get(),
            from.column(),
            from.row(),
            to.column(),
            to.row()
        ),
        Event::ItemRemoved { item } => format!("removed item {}", item.id().get()),
        Event::ItemRotated {
            item,
            rotation,
            anchor,
        } => format!(
            "rotated item {} to {} degrees at ({}, {})",
            item.get(),
            rotation.degrees(),
            anchor.column(),
            anchor.row()
        ),
        Event::ItemsRelocated { relocations } => {
            let moves = relocations
                .iter()
                .map(|relocation| {
                    format!(
                        "{} -> ({}, {}) @ {}",
                        relocation.item.get(),
                        relocation.anchor.column(),
                        relocation.anchor.row(),
                        relocation.rotation.degrees()
                    )
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!("relocated [{moves}]")
        }
        Event::StackMerged {
            source,
            target,
            quantity,
        } => format!(
            "merged item {} into item {} (now {quantity})",
            source.get(),
            target.get()
        ),
        Event::QuantityChanged { item, quantity } => {
            format!("item {} now holds {quantity}", item.get())
        }
        Event::GridRebuilt { dropped } => format!("grid rebuilt, dropped {}", dropped.len()),
        Event::PlacementRejected {
            item,
            origin,
            reason,
        } => format!(
            "item {} cannot go to ({}, {}): {reason}",
            item.get(),
            origin.column(),
            origin.row()
        ),
        Event::RotationRejected { item, reason } => {
            format!("item {} cannot rotate: {reason}", item.get())
        }
        Event::RearrangementRejected {
            item,
            origin,
            reason,
        } => format!(
            "rearrangement for item {} at ({}, {}) failed: {reason}",
            item.get(),
            origin.column(),
            origin.row()
        ),
        Event::MergeRejected {
            source,
            target,
            reason,
        } => format!(
            "item {} cannot merge into item {}: {reason}",
            source.get(),
            target.get()
        ),
        Event::CommandRejected { item, reason } => format!("item {}: {reason}", item.get()),
    }
}

/// Reports whether the event describes a refused command.
pub(crate) fn is_rejection(event: &Event) -> bool {
    matches!(
        event,
        Event::PlacementRejected { .. }
            | Event::RotationRejected { .. }
            | Event::RearrangementRejected { .. }
            | Event::MergeRejected { .. }
            | Event::CommandRejected { .. }
    )
}
