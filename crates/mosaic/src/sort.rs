//! Sort keys and ordering.
//!
//! Ordering is a stable ascending sort by a per-item [`SortKey`], then an
//! optional reversal of the whole sequence. With no [`SortOption`] the
//! original insertion order is kept.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use mosaic_core::logging::targets;

use crate::item::Item;

/// A comparable value derived from an item.
///
/// Numbers sort before text when a key function mixes the two.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Number(f64),
    Text(String),
}

impl SortKey {
    /// Total order over keys. `-inf` (the fallback for unparseable dates)
    /// sorts before every finite number.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
        }
    }
}

/// Type alias for a sort key function.
pub type KeyFn = Arc<dyn Fn(&Item) -> SortKey + Send + Sync>;

/// How to order items.
#[derive(Clone)]
pub struct SortOption {
    key: KeyFn,
    reverse: bool,
}

impl fmt::Debug for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortOption")
            .field("reverse", &self.reverse)
            .finish_non_exhaustive()
    }
}

impl SortOption {
    /// Sort ascending by `key`.
    pub fn new<F>(key: F) -> Self
    where
        F: Fn(&Item) -> SortKey + Send + Sync + 'static,
    {
        Self {
            key: Arc::new(key),
            reverse: false,
        }
    }

    /// Reverse the sorted sequence (or not).
    pub fn reversed(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Ascending by creation date.
    pub fn by_date() -> Self {
        Self::new(date_key)
    }

    /// Ascending by lower-cased title.
    pub fn by_title() -> Self {
        Self::new(title_key)
    }

    #[inline]
    pub fn is_reversed(&self) -> bool {
        self.reverse
    }

    /// The key this option sorts `item` by.
    pub fn key(&self, item: &Item) -> SortKey {
        (self.key)(item)
    }
}

/// Sort choices offered by the standard sort control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortPreset {
    /// Insertion order.
    #[default]
    Default,
    /// Newest first.
    DateCreated,
    /// Alphabetical by title.
    Title,
}

impl SortPreset {
    /// Parse a control value. Anything unrecognized is the default order.
    pub fn from_value(value: &str) -> Self {
        match value {
            "date-created" => Self::DateCreated,
            "title" => Self::Title,
            _ => Self::Default,
        }
    }

    /// The sort option for this preset, `None` for insertion order.
    pub fn option(self) -> Option<SortOption> {
        match self {
            Self::Default => None,
            Self::DateCreated => Some(SortOption::by_date().reversed(true)),
            Self::Title => Some(SortOption::by_title()),
        }
    }
}

/// Parse a creation timestamp into milliseconds since the Unix epoch.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS` (UTC), and
/// `YYYY-MM-DD` (UTC midnight).
pub fn parse_timestamp(raw: &str) -> Option<i64> {
    let raw = raw.trim();

    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.timestamp_millis());
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(datetime.and_utc().timestamp_millis());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc().timestamp_millis())
}

/// Numeric key from the creation date. Unparseable dates sort first.
pub fn date_key(item: &Item) -> SortKey {
    let millis = parse_timestamp(item.date_created()).map_or(f64::NEG_INFINITY, |ms| ms as f64);
    SortKey::Number(millis)
}

/// Case-normalized title key.
pub fn title_key(item: &Item) -> SortKey {
    SortKey::Text(item.title().to_lowercase())
}

/// Order `items` according to `sort`.
///
/// Keys are computed once per item. The sort is stable, so items with equal
/// keys keep their relative input order before any reversal.
pub fn compute_order<'a, I>(items: I, sort: Option<&SortOption>) -> Vec<&'a Item>
where
    I: IntoIterator<Item = &'a Item>,
{
    let Some(sort) = sort else {
        return items.into_iter().collect();
    };

    let mut keyed: Vec<(SortKey, &'a Item)> = items
        .into_iter()
        .map(|item| (sort.key(item), item))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| a.compare(b));
    if sort.reverse {
        keyed.reverse();
    }

    tracing::trace!(target: targets::SORT, items = keyed.len(), reverse = sort.reverse, "computed order");
    keyed.into_iter().map(|(_, item)| item).collect()
}
