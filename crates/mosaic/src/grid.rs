//! The grid engine.
//!
//! [`Grid`] owns the item collection together with the filter state, the
//! sort option and the event notifier, and exposes the requests an external
//! UI layer issues: filter and sort changes, layout passes, and removals.
//!
//! All operations take `&mut self` and run to completion synchronously, so a
//! filter or sort change can never interleave with the two layout passes.
//! Event handlers receive only the event payload and cannot reach back into
//! the grid while a pass is running.

use std::collections::{HashMap, HashSet};

use mosaic_core::logging::{span_names, targets};
use mosaic_core::{ConnectionId, PerfSpan};

use crate::config::GridConfig;
use crate::equalize::match_heights_by_row;
use crate::error::{GridError, Result};
use crate::events::{EventKind, EventNotifier, GridEvent, LayoutEvent, RemovedEvent};
use crate::filter::{FilterMode, FilterState, Predicate, compute_visibility, title_search};
use crate::geometry::{Point, Size};
use crate::item::{Item, ItemId, parse_groups};
use crate::sort::{SortOption, SortPreset, compute_order};

/// A responsive grid of items with filter, sort and row-height matching.
///
/// # Example
///
/// ```
/// use mosaic::{EventKind, Grid, Item, ItemId, Point};
///
/// let mut grid = Grid::new();
/// grid.add_items([
///     Item::new(1, "Lake").with_groups(["nature"]),
///     Item::new(2, "Bridge").with_groups(["city"]),
/// ]);
///
/// grid.on(EventKind::Layout, |event| println!("{event:?}"));
///
/// grid.set_exclusive_group(Some("nature")).unwrap();
/// assert_eq!(grid.visible_count(), 1);
///
/// // Positions come from an external packing step.
/// grid.apply_positions([(ItemId(1), Point::new(0.0, 0.0))]);
/// let summary = grid.relayout();
/// assert_eq!(summary.total_count, 2);
/// ```
pub struct Grid {
    config: GridConfig,
    items: Vec<Item>,
    filter: FilterState,
    sort: Option<SortOption>,
    events: EventNotifier,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// Create an empty grid with the default configuration.
    pub fn new() -> Self {
        Self::with_config(GridConfig::default())
    }

    /// Create an empty grid from `config`.
    pub fn with_config(config: GridConfig) -> Self {
        let filter = FilterState::with_initial_group(config.mode, config.group.as_deref());
        Self {
            config,
            items: Vec::new(),
            filter,
            sort: None,
            events: EventNotifier::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    // =========================================================================
    // Collection
    // =========================================================================

    /// Append items. Items whose id is already present are skipped.
    ///
    /// Returns the number of items added. No event is emitted; call
    /// [`relayout`](Self::relayout) once the packing step has placed them.
    pub fn add_items<I>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = Item>,
    {
        let mut known: HashSet<ItemId> = self.items.iter().map(Item::id).collect();
        let before = self.items.len();

        for mut item in items {
            if !known.insert(item.id()) {
                tracing::warn!(target: targets::LAYOUT, id = %item.id(), "duplicate item id, skipping");
                continue;
            }
            let visible = self.filter.is_visible(&item);
            item.set_visible(visible);
            self.items.push(item);
        }

        self.items.len() - before
    }

    /// Build an item from raw attribute strings, parsing its group list
    /// with the configured delimiter.
    pub fn item_from_attributes(
        &self,
        id: impl Into<ItemId>,
        title: &str,
        groups: &str,
        date_created: &str,
    ) -> Result<Item> {
        let groups = parse_groups(groups, self.config.delimiter.as_deref())?;
        Ok(Item::new(id, title)
            .with_groups(groups)
            .with_date_created(date_created))
    }

    /// All items in insertion order, visible or not.
    #[inline]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Look up a single item.
    pub fn item(&self, id: ItemId) -> Result<&Item> {
        self.items
            .iter()
            .find(|item| item.id() == id)
            .ok_or(GridError::UnknownItem(id))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Record positions assigned by the external packing step.
    ///
    /// Unknown ids are ignored. Returns the number of items updated.
    pub fn apply_positions<I>(&mut self, positions: I) -> usize
    where
        I: IntoIterator<Item = (ItemId, Point)>,
    {
        let index: HashMap<ItemId, usize> = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.id(), i))
            .collect();

        let mut updated = 0;
        for (id, position) in positions {
            match index.get(&id) {
                Some(&i) => {
                    self.items[i].set_position(position);
                    updated += 1;
                }
                None => {
                    tracing::debug!(target: targets::LAYOUT, %id, "position for unknown item ignored");
                }
            }
        }
        updated
    }

    /// Record a new natural content size for one item.
    pub fn set_natural_size(&mut self, id: ItemId, size: Size) -> Result<()> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or(GridError::UnknownItem(id))?;
        item.set_natural_size(size);
        Ok(())
    }

    /// Remove the identified items and emit [`EventKind::ItemsRemoved`].
    ///
    /// Ids not in the collection are ignored. Returns the ids actually
    /// removed, in collection order; nothing is emitted if that is empty.
    pub fn remove_items<I>(&mut self, ids: I) -> Vec<ItemId>
    where
        I: IntoIterator<Item = ItemId>,
    {
        let wanted: HashSet<ItemId> = ids.into_iter().collect();
        let mut removed = Vec::new();

        self.items.retain(|item| {
            if wanted.contains(&item.id()) {
                removed.push(item.id());
                false
            } else {
                true
            }
        });

        if !removed.is_empty() {
            tracing::debug!(target: targets::LAYOUT, count = removed.len(), "items removed");
            self.events.emit(GridEvent::ItemsRemoved(RemovedEvent {
                removed_ids: removed.clone(),
            }));
        }
        removed
    }

    // =========================================================================
    // Filtering
    // =========================================================================

    #[inline]
    pub fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    #[inline]
    pub fn mode(&self) -> FilterMode {
        self.filter.mode()
    }

    /// Switch activation policy. Active groups are kept.
    ///
    /// Fails, leaving mode and visibility as they were, when switching to
    /// exclusive mode with more than one group active.
    pub fn set_mode(&mut self, mode: FilterMode) -> Result<()> {
        self.filter.set_mode(mode)?;
        self.refresh_visibility();
        Ok(())
    }

    /// Flip between exclusive and additive. Returns the new mode.
    pub fn toggle_mode(&mut self) -> Result<FilterMode> {
        let mode = self.filter.toggle_mode()?;
        self.refresh_visibility();
        Ok(mode)
    }

    /// Show one group, or everything with `None`.
    pub fn set_exclusive_group(&mut self, group: Option<&str>) -> Result<()> {
        self.filter.set_exclusive_group(group)?;
        self.refresh_visibility();
        Ok(())
    }

    /// Like [`set_exclusive_group`](Self::set_exclusive_group), but takes a
    /// label where the configured all-items label means `None`.
    pub fn filter_by_label(&mut self, label: &str) -> Result<()> {
        let group = self.config.group_for_label(label);
        self.set_exclusive_group(group)
    }

    /// Add or remove `group` from the additive selection.
    pub fn toggle_additive_group(&mut self, group: &str) -> Result<()> {
        self.filter.toggle_additive_group(group)?;
        self.refresh_visibility();
        Ok(())
    }

    /// Handle a click on the filter control for `group`.
    pub fn toggle_group(&mut self, group: &str) -> Result<()> {
        self.filter.toggle_group(group)?;
        self.refresh_visibility();
        Ok(())
    }

    /// Whether the control for `group` should render as active.
    pub fn is_group_active(&self, group: &str) -> bool {
        self.filter.is_group_active(group)
    }

    /// Install or remove a custom predicate.
    pub fn set_custom_predicate(&mut self, predicate: Option<Predicate>) {
        self.filter.set_custom_predicate(predicate);
        self.refresh_visibility();
    }

    /// Scope the custom predicate to `group`, or to all items with `None`.
    pub fn set_group_context(&mut self, group: Option<&str>) {
        self.filter.set_group_context(group);
        self.refresh_visibility();
    }

    /// Show only items whose title contains `text`, within the current
    /// group context.
    pub fn search(&mut self, text: &str) {
        self.set_custom_predicate(Some(title_search(text)));
    }

    /// Remove the search predicate.
    pub fn clear_search(&mut self) {
        self.set_custom_predicate(None);
    }

    /// Back to showing every item. The mode is kept.
    pub fn reset_filter(&mut self) {
        self.filter.reset();
        self.refresh_visibility();
    }

    /// Visibility of every item under the current filter.
    pub fn visibility(&self) -> HashMap<ItemId, bool> {
        compute_visibility(&self.items, &self.filter)
    }

    /// Number of items the current filter shows.
    pub fn visible_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_visible()).count()
    }

    fn refresh_visibility(&mut self) {
        let filter = &self.filter;
        for item in &mut self.items {
            let visible = filter.is_visible(item);
            item.set_visible(visible);
        }
        tracing::debug!(
            target: targets::FILTER,
            visible = self.visible_count(),
            total = self.items.len(),
            "visibility refreshed"
        );
    }

    // =========================================================================
    // Sorting
    // =========================================================================

    #[inline]
    pub fn sort_option(&self) -> Option<&SortOption> {
        self.sort.as_ref()
    }

    /// Order visible items by `option`.
    pub fn set_sort_option(&mut self, option: SortOption) {
        tracing::debug!(target: targets::SORT, reverse = option.is_reversed(), "sort option set");
        self.sort = Some(option);
    }

    /// Back to insertion order.
    pub fn clear_sort_option(&mut self) {
        tracing::debug!(target: targets::SORT, "sort option cleared");
        self.sort = None;
    }

    /// Apply one of the standard sort choices.
    pub fn apply_sort_preset(&mut self, preset: SortPreset) {
        match preset.option() {
            Some(option) => self.set_sort_option(option),
            None => self.clear_sort_option(),
        }
    }

    /// Items the current filter shows, in the current sort order.
    pub fn visible_items(&self) -> Vec<&Item> {
        compute_order(
            self.items.iter().filter(|item| item.is_visible()),
            self.sort.as_ref(),
        )
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Run a layout pass over the visible items and emit
    /// [`EventKind::Layout`].
    ///
    /// Items are taken in display order (filtered, then sorted), which is
    /// the reading order the packing step placed them in. Every override is
    /// cleared before any height is measured; rows of two or more items are
    /// then set to their tallest member's height.
    pub fn relayout(&mut self) -> LayoutEvent {
        let _span = PerfSpan::new(span_names::LAYOUT_PASS);

        let order: Vec<ItemId> = self.visible_items().iter().map(|item| item.id()).collect();
        let total_count = self.items.len();

        let (visible_count, row_count) = {
            let mut by_id: HashMap<ItemId, &mut Item> = self
                .items
                .iter_mut()
                .filter(|item| item.is_visible())
                .map(|item| (item.id(), item))
                .collect();
            let mut ordered: Vec<&mut Item> =
                order.iter().filter_map(|id| by_id.remove(id)).collect();

            let rows = match_heights_by_row(&mut ordered);
            (ordered.len(), rows.len())
        };

        let summary = LayoutEvent {
            visible_count,
            total_count,
        };
        tracing::debug!(
            target: targets::LAYOUT,
            rows = row_count,
            visible = summary.visible_count,
            total = summary.total_count,
            "layout pass complete"
        );

        self.events.emit(GridEvent::Layout(summary));
        summary
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Subscribe `handler` to events of `kind`.
    pub fn on<F>(&self, kind: EventKind, handler: F) -> ConnectionId
    where
        F: Fn(&GridEvent) + Send + Sync + 'static,
    {
        self.events.on(kind, handler)
    }

    /// Unsubscribe a handler.
    pub fn off(&self, kind: EventKind, id: ConnectionId) -> bool {
        self.events.off(kind, id)
    }

    #[inline]
    pub fn events(&self) -> &EventNotifier {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::geometry::{Measurable, content_height};

    fn photo(id: u64, title: &str, groups: &[&str]) -> Item {
        Item::new(id, title)
            .with_groups(groups.iter().copied())
            .with_natural_size(Size::new(100.0, 50.0 + id as f32))
    }

    fn grid() -> Grid {
        let mut grid = Grid::new();
        grid.add_items([
            photo(1, "Lake", &["nature"]),
            photo(2, "Bridge", &["city"]),
            photo(3, "Harbor", &["city", "nature"]),
            photo(4, "Owl", &["animal"]),
        ]);
        grid
    }

    fn visible_ids(grid: &Grid) -> Vec<u64> {
        grid.visible_items().iter().map(|item| item.id().0).collect()
    }

    #[test]
    fn test_duplicate_ids_skipped() {
        let mut grid = grid();
        assert_eq!(grid.add_items([photo(2, "Again", &[]), photo(5, "New", &[])]), 1);
        assert_eq!(grid.len(), 5);
        assert_eq!(grid.item(ItemId(2)).unwrap().title(), "Bridge");
    }

    #[test]
    fn test_unknown_item_lookup() {
        let mut grid = grid();
        assert!(matches!(grid.item(ItemId(99)), Err(GridError::UnknownItem(ItemId(99)))));
        assert!(grid.set_natural_size(ItemId(99), Size::ZERO).is_err());
    }

    #[test]
    fn test_new_items_respect_active_filter() {
        let mut grid = grid();
        grid.set_exclusive_group(Some("animal")).unwrap();
        grid.add_items([photo(5, "Fox", &["animal"]), photo(6, "Tower", &["city"])]);
        assert_eq!(visible_ids(&grid), vec![4, 5]);
    }

    #[test]
    fn test_filter_by_label() {
        let mut grid = grid();
        grid.filter_by_label("city").unwrap();
        assert_eq!(visible_ids(&grid), vec![2, 3]);

        grid.filter_by_label("all").unwrap();
        assert_eq!(grid.visible_count(), 4);
    }

    #[test]
    fn test_search_within_group() {
        let mut grid = grid();
        grid.toggle_group("nature").unwrap();
        grid.search("ha");
        assert_eq!(visible_ids(&grid), vec![3]);

        grid.clear_search();
        assert_eq!(visible_ids(&grid), vec![1, 3]);
    }

    #[test]
    fn test_sort_presets() {
        let mut grid = grid();
        grid.apply_sort_preset(SortPreset::Title);
        assert_eq!(visible_ids(&grid), vec![2, 3, 1, 4]);

        grid.apply_sort_preset(SortPreset::from_value("dom"));
        assert!(grid.sort_option().is_none());
        assert_eq!(visible_ids(&grid), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_relayout_orders_by_display_order() {
        let mut grid = grid();
        grid.apply_sort_preset(SortPreset::Title);
        // Display order is Bridge(2), Harbor(3), Lake(1), Owl(4), packed two
        // per row.
        grid.apply_positions([
            (ItemId(2), Point::new(0.0, 0.0)),
            (ItemId(3), Point::new(120.0, 0.0)),
            (ItemId(1), Point::new(0.0, 60.0)),
            (ItemId(4), Point::new(120.0, 60.0)),
        ]);

        let summary = grid.relayout();
        assert_eq!(summary.visible_count, 4);

        let height = |id| content_height(grid.item(ItemId(id)).unwrap());
        assert_eq!(height(2), 53.0);
        assert_eq!(height(3), 53.0);
        assert_eq!(height(1), 54.0);
        assert_eq!(height(4), 54.0);
    }

    #[test]
    fn test_relayout_skips_hidden_items() {
        let mut grid = grid();
        grid.set_exclusive_group(Some("city")).unwrap();
        grid.apply_positions([
            (ItemId(2), Point::new(0.0, 0.0)),
            (ItemId(3), Point::new(120.0, 0.0)),
        ]);

        let summary = grid.relayout();
        assert_eq!(summary, LayoutEvent { visible_count: 2, total_count: 4 });
        assert_eq!(grid.item(ItemId(2)).unwrap().height_override(), Some(53.0));
        assert_eq!(grid.item(ItemId(1)).unwrap().height_override(), None);
    }

    #[test]
    fn test_remove_items_emits_once() {
        let mut grid = grid();
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();
        grid.on(EventKind::ItemsRemoved, move |event| events_clone.lock().push(event.clone()));

        let removed = grid.remove_items([ItemId(3), ItemId(42), ItemId(1)]);
        assert_eq!(removed, vec![ItemId(1), ItemId(3)]);
        assert_eq!(grid.len(), 2);

        assert!(grid.remove_items([ItemId(42)]).is_empty());

        assert_eq!(
            *events.lock(),
            vec![GridEvent::ItemsRemoved(RemovedEvent {
                removed_ids: vec![ItemId(1), ItemId(3)],
            })]
        );
    }

    #[test]
    fn test_item_from_attributes_uses_delimiter() {
        let grid = Grid::with_config(GridConfig {
            delimiter: Some(",".into()),
            ..GridConfig::default()
        });
        let item = grid
            .item_from_attributes(7, "Dunes", "nature, desert", "2017-02-01")
            .unwrap();
        assert_eq!(item.groups(), ["nature", "desert"]);

        let json = grid
            .item_from_attributes(8, "Dunes", r#"["nature"]"#, "")
            .unwrap();
        assert_eq!(json.groups(), ["nature"]);
    }

    #[test]
    fn test_config_initial_group() {
        let mut grid = Grid::with_config(GridConfig {
            group: Some("city".into()),
            ..GridConfig::default()
        });
        grid.add_items([photo(1, "Lake", &["nature"]), photo(2, "Bridge", &["city"])]);
        assert_eq!(visible_ids(&grid), vec![2]);
        assert!(grid.is_group_active("city"));
    }
}
