//! Grid items.
//!
//! An [`Item`] is a positioned visual unit. Its position and natural size
//! come from outside the engine (the packing step and content measurement);
//! its groups, title, and creation date are metadata fixed at creation.

use std::fmt;

use crate::error::{GridError, Result};
use crate::geometry::{Measurable, Point, Size};

/// Opaque identity of an item within a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A single item participating in the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    id: ItemId,
    position: Point,
    natural_size: Size,
    height_override: Option<f32>,
    groups: Vec<String>,
    title: String,
    date_created: String,
    visible: bool,
}

impl Item {
    /// Create a new item with no groups, no date, at the origin.
    pub fn new(id: impl Into<ItemId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            position: Point::ZERO,
            natural_size: Size::ZERO,
            height_override: None,
            groups: Vec::new(),
            title: title.into(),
            date_created: String::new(),
            visible: true,
        }
    }

    /// Set the group labels. Duplicates collapse, first occurrence wins.
    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.clear();
        for group in groups {
            let group = group.into();
            if !self.groups.contains(&group) {
                self.groups.push(group);
            }
        }
        self
    }

    /// Set the creation timestamp, as the raw attribute string.
    pub fn with_date_created(mut self, date: impl Into<String>) -> Self {
        self.date_created = date.into();
        self
    }

    /// Set the initial position.
    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    /// Set the natural content size.
    pub fn with_natural_size(mut self, size: Size) -> Self {
        self.natural_size = size;
        self
    }

    #[inline]
    pub fn id(&self) -> ItemId {
        self.id
    }

    #[inline]
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Whether this item carries the given group label.
    pub fn in_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }

    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[inline]
    pub fn date_created(&self) -> &str {
        &self.date_created
    }

    /// Whether the last applied filter left this item visible.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub(crate) fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub(crate) fn set_natural_size(&mut self, size: Size) {
        self.natural_size = size;
    }
}

impl Measurable for Item {
    fn position(&self) -> Point {
        self.position
    }

    fn natural_size(&self) -> Size {
        self.natural_size
    }

    fn height_override(&self) -> Option<f32> {
        self.height_override
    }

    fn set_height_override(&mut self, height: Option<f32>) {
        self.height_override = height;
    }
}

/// Parse a raw group attribute into a list of labels.
///
/// Accepted forms:
/// - a JSON array of strings: `["nature", "city"]`
/// - a `delimiter`-separated list: `nature, city`
/// - a single bare label: `nature`
///
/// Labels are trimmed, blanks dropped, and duplicates collapsed while
/// preserving first-seen order. An attribute starting with `[` that is not a
/// valid JSON string array is an error.
pub fn parse_groups(raw: &str, delimiter: Option<&str>) -> Result<Vec<String>> {
    let trimmed = raw.trim();

    let labels: Vec<String> = if trimmed.starts_with('[') {
        serde_json::from_str(trimmed).map_err(|e| GridError::malformed_groups(raw, e))?
    } else {
        match delimiter {
            Some(delimiter) if !delimiter.is_empty() => {
                trimmed.split(delimiter).map(str::to_owned).collect()
            }
            _ => vec![trimmed.to_owned()],
        }
    };

    let mut groups: Vec<String> = Vec::with_capacity(labels.len());
    for label in labels {
        let label = label.trim();
        if !label.is_empty() && !groups.iter().any(|g| g == label) {
            groups.push(label.to_owned());
        }
    }
    Ok(groups)
}
