//! Mosaic - a filterable, sortable grid engine with per-row height matching.
//!
//! Mosaic manages a collection of positioned items. An external packing
//! step decides where each item goes; Mosaic decides which items are shown
//! (group filters and text search), in what order (sort options), and how
//! tall each one is drawn so that every visual row lines up.
//!
//! # Example
//!
//! ```
//! use mosaic::{FilterMode, Grid, GridConfig, Item, ItemId, Point, Size, SortPreset};
//!
//! let mut grid = Grid::with_config(GridConfig {
//!     mode: FilterMode::Additive,
//!     ..GridConfig::default()
//! });
//!
//! grid.add_items([
//!     Item::new(1, "Lake").with_groups(["nature"]).with_natural_size(Size::new(200.0, 80.0)),
//!     Item::new(2, "Bridge").with_groups(["city"]).with_natural_size(Size::new(200.0, 120.0)),
//!     Item::new(3, "Owl").with_groups(["animal"]).with_natural_size(Size::new(200.0, 95.0)),
//! ]);
//!
//! grid.toggle_group("nature").unwrap();
//! grid.toggle_group("city").unwrap();
//! grid.apply_sort_preset(SortPreset::Title);
//!
//! grid.apply_positions([
//!     (ItemId(2), Point::new(0.0, 0.0)),
//!     (ItemId(1), Point::new(220.0, 0.0)),
//! ]);
//! grid.relayout();
//!
//! let titles: Vec<&str> = grid.visible_items().iter().map(|item| item.title()).collect();
//! assert_eq!(titles, ["Bridge", "Lake"]);
//! ```
//!
//! # Modules
//!
//! - [`grid`]: the [`Grid`] facade tying everything together
//! - [`rows`] and [`equalize`]: the two layout passes
//! - [`filter`]: group filters and custom predicates
//! - [`sort`]: sort keys and ordering
//! - [`events`]: layout and removal notifications

pub mod config;
pub mod equalize;
pub mod error;
pub mod events;
pub mod filter;
pub mod geometry;
pub mod grid;
pub mod item;
pub mod rows;
pub mod sort;

pub use config::{ALL_ITEMS, GridConfig};
pub use equalize::{equalize_row, equalize_rows, match_heights_by_row};
pub use error::{GridError, Result};
pub use events::{EventKind, EventNotifier, GridEvent, LayoutEvent, RemovedEvent};
pub use filter::{
    FilterContext, FilterMode, FilterState, Predicate, compute_visibility, title_search,
};
pub use geometry::{Measurable, Point, Size, content_height, rounded_left};
pub use grid::Grid;
pub use item::{Item, ItemId, parse_groups};
pub use rows::{Row, segment_into_rows};
pub use sort::{
    KeyFn, SortKey, SortOption, SortPreset, compute_order, date_key, parse_timestamp, title_key,
};

pub use mosaic_core::ConnectionId;
