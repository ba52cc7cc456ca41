use stashgrid_container::{apply, query, Container};
use stashgrid_core::{
    CellCoord, Command, ContainerProfile, Event, Item, ItemId, PlacementError, PlacementRules,
    Relocation, Rotation, Shape, StackKey,
};
use stashgrid_system_placement::{plan_drop, DropPlan, DropPlanner, DropPreview};

const PLAIN: PlacementRules = PlacementRules::new(ContainerProfile::Plain, None);

fn block(id: u32, columns: u32, rows: u32) -> Item {
    Item::new(
        ItemId::new(id),
        Shape::filled(columns, rows).expect("valid shape"),
    )
}

fn potion(id: u32, quantity: u32) -> Item {
    block(id, 1, 1)
        .with_stack_key(StackKey::new("potion"))
        .with_quantity(quantity)
}

fn container_with(columns: u32, rows: u32, placed: &[(Item, i32, i32)]) -> Container {
    let mut container = Container::new(columns, rows, PLAIN);
    let mut events = Vec::new();
    for (item, column, row) in placed {
        apply(
            &mut container,
            Command::PlaceItem {
                item: item.clone(),
                origin: CellCoord::new(*column, *row),
            },
            &mut events,
        );
    }
    assert!(
        events
            .iter()
            .all(|event| matches!(event, Event::ItemPlaced { .. })),
        "fixture placements must succeed: {events:?}",
    );
    container
}

fn preview(container: &Container, item: Item, column: i32, row: i32) -> DropPreview {
    DropPreview::new(
        query::items(container),
        query::grid(container),
        item,
        CellCoord::new(column, row),
        query::rules(container),
    )
}

#[test]
fn free_target_is_planned_directly() {
    let container = container_with(4, 4, &[(block(1, 1, 1), 0, 0)]);

    let plan = plan_drop(
        query::items(&container),
        query::grid(&container),
        &block(2, 2, 2),
        CellCoord::new(2, 2),
        PLAIN,
    );

    assert_eq!(plan, DropPlan::Direct);
}

#[test]
fn collision_is_resolved_by_rearrangement() {
    let container = container_with(
        4,
        3,
        &[(block(2, 1, 1), 2, 0), (block(1, 2, 2), 0, 0)],
    );

    let plan = plan_drop(
        query::items(&container),
        query::grid(&container),
        &block(3, 3, 1),
        CellCoord::new(0, 0),
        PLAIN,
    );

    assert_eq!(
        plan,
        DropPlan::Rearranged(vec![
            Relocation {
                item: ItemId::new(1),
                anchor: CellCoord::new(0, 1),
                rotation: Rotation::Deg0,
            },
            Relocation {
                item: ItemId::new(2),
                anchor: CellCoord::new(3, 0),
                rotation: Rotation::Deg0,
            },
        ])
    );
}

#[test]
fn non_collision_failures_skip_the_solver() {
    let container = container_with(3, 3, &[(block(1, 1, 1), 0, 0)]);

    let plan = plan_drop(
        query::items(&container),
        query::grid(&container),
        &block(2, 3, 1),
        CellCoord::new(1, 0),
        PLAIN,
    );

    assert_eq!(plan, DropPlan::Rejected(PlacementError::OutOfBounds));
}

#[test]
fn unsolvable_collision_is_rejected_as_occupied() {
    let container = container_with(3, 2, &[(block(1, 2, 2), 0, 0)]);

    let plan = plan_drop(
        query::items(&container),
        query::grid(&container),
        &block(2, 3, 1),
        CellCoord::new(0, 0),
        PLAIN,
    );

    assert_eq!(plan, DropPlan::Rejected(PlacementError::Occupied));
}

#[test]
fn confirming_new_item_emits_place_command() {
    let container = container_with(4, 4, &[]);
    let preview = preview(&container, block(1, 2, 1), 1, 1);
    let mut commands = Vec::new();

    DropPlanner::new().handle(Some(&preview), true, &mut commands);

    assert!(preview.placeable());
    assert_eq!(
        commands,
        vec![Command::PlaceItem {
            item: block(1, 2, 1),
            origin: CellCoord::new(1, 1),
        }],
        "a new item dropped on free cells should be placed",
    );
}

#[test]
fn confirming_resident_item_emits_move_command() {
    let container = container_with(4, 4, &[(block(1, 2, 1), 0, 0)]);
    let dragged = query::item(&container, ItemId::new(1))
        .expect("item stored")
        .clone();
    let preview = preview(&container, dragged, 1, 0);
    let mut commands = Vec::new();

    DropPlanner::new().handle(Some(&preview), true, &mut commands);

    assert_eq!(
        commands,
        vec![Command::MoveItem {
            item: ItemId::new(1),
            origin: CellCoord::new(1, 0),
        }]
    );
}

#[test]
fn turned_resident_item_is_committed_with_its_new_orientation() {
    let mut container = container_with(4, 4, &[(block(1, 2, 1), 0, 0)]);
    let dragged = query::item(&container, ItemId::new(1))
        .expect("item stored")
        .clone()
        .with_rotation(Rotation::Deg90);
    let preview = preview(&container, dragged, 3, 1);
    let mut commands = Vec::new();

    DropPlanner::new().handle(Some(&preview), true, &mut commands);
    assert!(matches!(
        commands.as_slice(),
        [Command::ApplyRearrangement { relocations, .. }] if relocations.is_empty()
    ));

    let mut events = Vec::new();
    for command in commands {
        apply(&mut container, command, &mut events);
    }
    let stored = query::item(&container, ItemId::new(1)).expect("item stored");
    assert_eq!(stored.rotation(), Rotation::Deg90);
    assert_eq!(
        query::grid(&container).cells_owned_by(ItemId::new(1)),
        vec![CellCoord::new(3, 1), CellCoord::new(3, 2)]
    );
}

#[test]
fn rejected_or_unconfirmed_previews_emit_nothing() {
    let container = container_with(3, 3, &[(block(1, 1, 1), 0, 0)]);
    let rejected = preview(&container, block(2, 3, 1), 1, 0);
    let valid = preview(&container, block(2, 1, 1), 2, 2);
    let mut commands = Vec::new();

    DropPlanner::new().handle(Some(&rejected), true, &mut commands);
    DropPlanner::new().handle(Some(&valid), false, &mut commands);
    DropPlanner::new().handle(None, true, &mut commands);

    assert!(!rejected.placeable());
    assert!(commands.is_empty(), "no command should be emitted");
}

#[test]
fn confirmed_rearrangement_commits_through_the_container() {
    let mut container = container_with(
        4,
        3,
        &[(block(2, 1, 1), 2, 0), (block(1, 2, 2), 0, 0)],
    );
    let preview = preview(&container, block(3, 3, 1), 0, 0);
    let mut commands = Vec::new();

    DropPlanner::new().handle(Some(&preview), true, &mut commands);
    let mut events = Vec::new();
    for command in commands {
        apply(&mut container, command, &mut events);
    }

    assert!(events.contains(&Event::ItemPlaced {
        item: ItemId::new(3),
        anchor: CellCoord::new(0, 0),
        rotation: Rotation::Deg0,
    }));
    assert_eq!(query::items(&container).len(), 3);
    assert_eq!(
        query::occupant(&container, CellCoord::new(2, 0)),
        Some(ItemId::new(3))
    );
}

#[test]
fn stackable_item_dropped_on_matching_stack_merges() {
    let mut container = container_with(3, 1, &[(potion(1, 2), 0, 0)]);
    let preview = preview(&container, potion(2, 2), 0, 0);
    let mut commands = Vec::new();

    DropPlanner::new().handle(Some(&preview), true, &mut commands);

    assert_eq!(
        preview.plan,
        DropPlan::Merge {
            target: ItemId::new(1)
        }
    );
    assert_eq!(
        commands,
        vec![Command::MergeStack {
            source: potion(2, 2),
            target: ItemId::new(1),
        }]
    );

    let mut events = Vec::new();
    for command in commands {
        apply(&mut container, command, &mut events);
    }
    let stack = query::item(&container, ItemId::new(1)).expect("stack stays");
    assert_eq!(stack.quantity(), 4);
    assert_eq!(stack.anchor(), CellCoord::new(0, 0));
    assert_eq!(query::items(&container).len(), 1);
}

#[test]
fn resident_stack_dropped_on_matching_stack_leaves_the_grid() {
    let mut container = container_with(3, 1, &[(potion(1, 2), 0, 0), (potion(2, 3), 2, 0)]);
    let dragged = query::item(&container, ItemId::new(2))
        .expect("item stored")
        .clone();
    let preview = preview(&container, dragged, 0, 0);
    let mut commands = Vec::new();

    DropPlanner::new().handle(Some(&preview), true, &mut commands);
    assert!(matches!(
        commands.as_slice(),
        [Command::RemoveItem { .. }, Command::MergeStack { .. }]
    ));

    let mut events = Vec::new();
    for command in commands {
        apply(&mut container, command, &mut events);
    }
    assert_eq!(
        query::item(&container, ItemId::new(1)).map(Item::quantity),
        Some(5)
    );
    assert!(query::item(&container, ItemId::new(2)).is_none());
    assert_eq!(query::occupant(&container, CellCoord::new(2, 0)), None);
}

#[test]
fn overflowing_stack_is_not_merged() {
    let container = container_with(3, 1, &[(potion(1, u32::MAX), 0, 0)]);

    let plan = plan_drop(
        query::items(&container),
        query::grid(&container),
        &potion(2, 1),
        CellCoord::new(0, 0),
        PLAIN,
    );

    assert!(matches!(plan, DropPlan::Rearranged(_)), "got {plan:?}");
}

#[test]
fn unsolvable_drop_reports_its_geometric_failure() {
    let container = container_with(3, 1, &[(block(1, 1, 1), 1, 0)]);

    let plan = plan_drop(
        query::items(&container),
        query::grid(&container),
        &block(2, 3, 1),
        CellCoord::new(1, 0),
        PLAIN,
    );

    assert_eq!(plan, DropPlan::Rejected(PlacementError::OutOfBounds));
}
