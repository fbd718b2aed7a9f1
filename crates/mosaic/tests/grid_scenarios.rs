//! Integration tests for the grid engine through its public API.

use std::sync::Arc;

use mosaic::{
    EventKind, FilterMode, Grid, GridConfig, GridError, GridEvent, Item, ItemId, LayoutEvent,
    Measurable, Point, Size, SortOption, content_height, segment_into_rows,
};
use parking_lot::Mutex;

fn setup() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn tile(id: u64, left: f32, height: f32) -> Item {
    Item::new(id, format!("tile {id}"))
        .with_position(Point::new(left, 0.0))
        .with_natural_size(Size::new(100.0, height))
}

fn visible_ids(grid: &Grid) -> Vec<u64> {
    grid.visible_items().iter().map(|item| item.id().0).collect()
}

fn height_of(grid: &Grid, id: u64) -> f32 {
    content_height(grid.item(ItemId(id)).unwrap())
}

#[test]
fn test_scenario_rows_from_left_resets() {
    setup();
    let mut items: Vec<Item> = [0.0, 120.0, 240.0, 0.0, 120.0]
        .into_iter()
        .enumerate()
        .map(|(i, left)| tile(i as u64, left, 50.0))
        .collect();

    let rows = segment_into_rows(&mut items);
    let sizes: Vec<usize> = rows.iter().map(|row| row.len()).collect();
    assert_eq!(sizes, vec![3, 2]);

    let concatenated: Vec<u64> = rows
        .iter()
        .flat_map(|row| row.items(&items).iter().map(|item| item.id().0))
        .collect();
    assert_eq!(concatenated, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_scenario_row_takes_tallest_height() {
    setup();
    let mut grid = Grid::new();
    grid.add_items([tile(0, 0.0, 80.0), tile(1, 120.0, 120.0), tile(2, 240.0, 95.0)]);

    let summary = grid.relayout();
    assert_eq!(summary, LayoutEvent { visible_count: 3, total_count: 3 });
    for id in 0..3 {
        assert_eq!(height_of(&grid, id), 120.0);
    }
}

#[test]
fn test_scenario_additive_removal_hides_item() {
    setup();
    let mut grid = Grid::with_config(GridConfig {
        mode: FilterMode::Additive,
        ..GridConfig::default()
    });
    grid.add_items([
        Item::new(1, "only a").with_groups(["a"]),
        Item::new(2, "only b").with_groups(["b"]),
    ]);

    grid.toggle_additive_group("a").unwrap();
    assert_eq!(visible_ids(&grid), vec![1]);

    grid.toggle_additive_group("b").unwrap();
    assert_eq!(grid.filter_state().active_groups(), ["a", "b"]);
    assert_eq!(visible_ids(&grid), vec![1, 2]);

    grid.toggle_additive_group("a").unwrap();
    assert_eq!(grid.filter_state().active_groups(), ["b"]);
    assert!(!grid.visibility()[&ItemId(1)]);
    assert_eq!(visible_ids(&grid), vec![2]);
}

#[test]
fn test_scenario_search_scoped_by_group_context() {
    setup();
    let mut grid = Grid::new();
    grid.add_items([
        Item::new(1, "Title").with_groups(["city"]),
        Item::new(2, "Tidal flats").with_groups(["nature"]),
        Item::new(3, "Forest").with_groups(["nature"]),
    ]);

    grid.set_group_context(Some("nature"));
    grid.search("ti");

    assert!(!grid.visibility()[&ItemId(1)]);
    assert_eq!(visible_ids(&grid), vec![2]);
}

#[test]
fn test_segmentation_concatenates_to_input() {
    setup();
    let lefts = [0.0, 50.0, 90.0, 10.0, 10.0, 300.0, 0.0, 1.0, 2.0, 0.0];
    let mut items: Vec<Item> = lefts
        .into_iter()
        .enumerate()
        .map(|(i, left)| tile(i as u64, left, 10.0))
        .collect();

    let rows = segment_into_rows(&mut items);
    let ids: Vec<u64> = rows
        .iter()
        .flat_map(|row| row.items(&items).iter().map(|item| item.id().0))
        .collect();
    assert_eq!(ids, (0..lefts.len() as u64).collect::<Vec<_>>());
    assert!(rows.iter().all(|row| !row.is_empty()));
}

#[test]
fn test_equalization_uses_natural_heights_each_pass() {
    setup();
    let mut grid = Grid::new();
    grid.add_items([tile(0, 0.0, 80.0), tile(1, 120.0, 120.0), tile(2, 0.0, 40.0)]);

    grid.relayout();
    assert_eq!(height_of(&grid, 0), 120.0);
    assert_eq!(height_of(&grid, 2), 40.0);
    assert_eq!(grid.item(ItemId(2)).unwrap().height_override(), None);

    // Content shrank; the stale override must not keep the row tall.
    grid.set_natural_size(ItemId(1), Size::new(100.0, 60.0)).unwrap();
    grid.relayout();
    assert_eq!(height_of(&grid, 0), 80.0);
    assert_eq!(height_of(&grid, 1), 80.0);
}

#[test]
fn test_exclusive_mode_single_select() {
    setup();
    let mut grid = Grid::new();
    for group in ["x", "y", "x", "z"] {
        grid.set_exclusive_group(Some(group)).unwrap();
        assert_eq!(grid.filter_state().active_groups().len(), 1);
        grid.toggle_group(group).unwrap();
        assert!(grid.filter_state().active_groups().is_empty());
    }
}

#[test]
fn test_mode_switch_fails_fast_until_reset() {
    setup();
    let mut grid = Grid::with_config(GridConfig {
        mode: FilterMode::Additive,
        ..GridConfig::default()
    });
    grid.add_items([
        Item::new(1, "only a").with_groups(["a"]),
        Item::new(2, "only b").with_groups(["b"]),
        Item::new(3, "only c").with_groups(["c"]),
    ]);
    grid.toggle_group("a").unwrap();
    grid.toggle_group("b").unwrap();
    assert_eq!(visible_ids(&grid), vec![1, 2]);

    assert!(matches!(
        grid.toggle_mode(),
        Err(GridError::InvariantViolation { active: 2 })
    ));
    assert_eq!(grid.mode(), FilterMode::Additive);
    assert_eq!(visible_ids(&grid), vec![1, 2]);
    assert_eq!(
        grid.relayout(),
        LayoutEvent { visible_count: 2, total_count: 3 }
    );

    grid.reset_filter();
    assert_eq!(grid.toggle_mode().unwrap(), FilterMode::Exclusive);
    assert!(matches!(
        grid.toggle_additive_group("a"),
        Err(GridError::ModeMismatch { .. })
    ));
    grid.set_exclusive_group(Some("a")).unwrap();
    assert!(grid.is_group_active("a"));
    assert_eq!(visible_ids(&grid), vec![1]);
}

#[test]
fn test_sort_stable_and_reversible() {
    setup();
    let mut grid = Grid::new();
    grid.add_items([
        Item::new(1, "b"),
        Item::new(2, "a"),
        Item::new(3, "B"),
        Item::new(4, "A"),
    ]);

    grid.set_sort_option(SortOption::by_title());
    assert_eq!(visible_ids(&grid), vec![2, 4, 1, 3]);

    grid.set_sort_option(SortOption::by_title().reversed(true));
    let mut reversed = visible_ids(&grid);
    reversed.reverse();
    assert_eq!(reversed, vec![2, 4, 1, 3]);

    grid.clear_sort_option();
    assert_eq!(visible_ids(&grid), vec![1, 2, 3, 4]);
}

#[test]
fn test_layout_and_removal_events() {
    setup();
    let mut grid = Grid::new();
    grid.add_items([tile(0, 0.0, 10.0), tile(1, 120.0, 10.0), tile(2, 0.0, 10.0)]);

    let log = Arc::new(Mutex::new(Vec::new()));
    let log_layout = log.clone();
    let layout_id = grid.on(EventKind::Layout, move |event| log_layout.lock().push(event.clone()));
    let log_removed = log.clone();
    grid.on(EventKind::ItemsRemoved, move |event| log_removed.lock().push(event.clone()));

    grid.relayout();
    grid.remove_items([ItemId(1), ItemId(7)]);
    grid.remove_items([ItemId(7)]);

    assert!(grid.off(EventKind::Layout, layout_id));
    grid.relayout();

    let log = log.lock();
    assert_eq!(log.len(), 2);
    assert_eq!(
        log[0],
        GridEvent::Layout(LayoutEvent { visible_count: 3, total_count: 3 })
    );
    match &log[1] {
        GridEvent::ItemsRemoved(event) => assert_eq!(event.removed_ids, vec![ItemId(1)]),
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn test_failing_handler_does_not_block_others() {
    setup();
    let mut grid = Grid::new();
    grid.add_items([tile(0, 0.0, 10.0)]);

    let seen = Arc::new(Mutex::new(0));
    grid.on(EventKind::Layout, |_| panic!("handler bug"));
    let seen_clone = seen.clone();
    grid.on(EventKind::Layout, move |_| *seen_clone.lock() += 1);

    grid.relayout();
    assert_eq!(*seen.lock(), 1);
}

#[test]
fn test_empty_grid_degrades_gracefully() {
    setup();
    let mut grid = Grid::new();
    grid.set_exclusive_group(Some("nothing")).unwrap();
    grid.search("x");

    assert!(grid.visible_items().is_empty());
    assert!(grid.visibility().is_empty());
    assert_eq!(grid.relayout(), LayoutEvent { visible_count: 0, total_count: 0 });
    assert!(grid.remove_items([ItemId(1)]).is_empty());
}

#[test]
fn test_config_from_toml() {
    setup();
    let config = GridConfig::from_toml_str(
        r#"
        mode = "exclusive"
        group = "city"
        all_items = "everything"
        delimiter = ","
        "#,
    )
    .unwrap();

    let mut grid = Grid::with_config(config);
    let items = vec![
        grid.item_from_attributes(1, "Bridge", "city, night", "2018-03-01").unwrap(),
        grid.item_from_attributes(2, "Lake", r#"["nature"]"#, "2017-03-01").unwrap(),
    ];
    grid.add_items(items);
    assert_eq!(visible_ids(&grid), vec![1]);

    grid.filter_by_label("everything").unwrap();
    assert_eq!(visible_ids(&grid), vec![1, 2]);
}
