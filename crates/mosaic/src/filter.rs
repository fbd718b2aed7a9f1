//! Filter state and visibility.
//!
//! A [`FilterState`] combines two independent layers:
//!
//! - **Structural filtering** by group label, under one of two activation
//!   policies ([`FilterMode::Exclusive`] or [`FilterMode::Additive`]).
//! - An optional **custom predicate** (used for text search). When present
//!   it replaces structural group matching: an item is visible iff it belongs
//!   to the current group context (if one is set) AND the predicate accepts
//!   it.
//!
//! Predicates never see the live state. They receive a [`FilterContext`]
//! snapshot carrying only the current group context.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use mosaic_core::logging::targets;
use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::item::{Item, ItemId};

/// Group activation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// At most one active group; selecting the active group again shows all.
    #[default]
    Exclusive,
    /// Any number of active groups, matched with OR semantics.
    Additive,
}

impl FilterMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            Self::Exclusive => Self::Additive,
            Self::Additive => Self::Exclusive,
        }
    }
}

/// Read-only snapshot handed to custom predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterContext<'a> {
    /// The group selected by the last structural filter, `None` for all items.
    pub group: Option<&'a str>,
}

/// A custom visibility predicate.
pub type Predicate = Arc<dyn Fn(&Item, &FilterContext<'_>) -> bool + Send + Sync>;

/// Build the standard title-search predicate.
///
/// The search text is lower-cased; an item matches when its trimmed,
/// lower-cased title contains it. Empty text matches every item.
pub fn title_search(text: &str) -> Predicate {
    let needle = text.to_lowercase();
    Arc::new(move |item: &Item, _context: &FilterContext<'_>| {
        item.title().trim().to_lowercase().contains(&needle)
    })
}

/// Active filter criteria.
#[derive(Clone, Default)]
pub struct FilterState {
    mode: FilterMode,
    /// Insertion-ordered, duplicate-free. At most one entry in exclusive mode.
    active_groups: Vec<String>,
    predicate: Option<Predicate>,
    group_context: Option<String>,
}

impl fmt::Debug for FilterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterState")
            .field("mode", &self.mode)
            .field("active_groups", &self.active_groups)
            .field("predicate", &self.predicate.as_ref().map(|_| ".."))
            .field("group_context", &self.group_context)
            .finish()
    }
}

impl FilterState {
    /// Default state: exclusive mode, every item visible.
    pub fn new() -> Self {
        Self::default()
    }

    /// Default state in the given mode.
    pub fn with_mode(mode: FilterMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Initial state with `group` pre-selected, as if by
    /// [`set_exclusive_group`](Self::set_exclusive_group).
    pub fn with_initial_group(mode: FilterMode, group: Option<&str>) -> Self {
        Self {
            mode,
            active_groups: group.map(str::to_owned).into_iter().collect(),
            predicate: None,
            group_context: group.map(str::to_owned),
        }
    }

    #[inline]
    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Active groups in activation order. Empty means "all items".
    #[inline]
    pub fn active_groups(&self) -> &[String] {
        &self.active_groups
    }

    #[inline]
    pub fn group_context(&self) -> Option<&str> {
        self.group_context.as_deref()
    }

    #[inline]
    pub fn has_predicate(&self) -> bool {
        self.predicate.is_some()
    }

    /// Whether the control for `group` should render as active.
    pub fn is_group_active(&self, group: &str) -> bool {
        self.active_groups.iter().any(|g| g == group)
    }

    /// The snapshot passed to custom predicates.
    pub fn context(&self) -> FilterContext<'_> {
        FilterContext {
            group: self.group_context(),
        }
    }

    /// Switch activation policy. Active groups are kept as they are.
    ///
    /// Switching to exclusive mode while more than one group is active fails
    /// with [`GridError::InvariantViolation`] and leaves the state unchanged;
    /// [`reset`](Self::reset) first.
    pub fn set_mode(&mut self, mode: FilterMode) -> Result<()> {
        if self.mode == mode {
            return Ok(());
        }
        Self::check_groups(mode, self.active_groups.len())?;

        tracing::debug!(target: targets::FILTER, from = ?self.mode, to = ?mode, "filter mode changed");
        self.mode = mode;
        Ok(())
    }

    /// Flip between exclusive and additive. Returns the new mode.
    pub fn toggle_mode(&mut self) -> Result<FilterMode> {
        self.set_mode(self.mode.toggled())?;
        Ok(self.mode)
    }

    /// Fail if exclusive mode holds more than one active group.
    pub fn check_invariant(&self) -> Result<()> {
        Self::check_groups(self.mode, self.active_groups.len())
    }

    fn check_groups(mode: FilterMode, active: usize) -> Result<()> {
        if mode == FilterMode::Exclusive && active > 1 {
            tracing::warn!(target: targets::FILTER, active, "exclusive filter cannot hold more than one group");
            return Err(GridError::InvariantViolation { active });
        }
        Ok(())
    }

    /// Select a single group, or all items with `None`.
    ///
    /// Also sets the group context to the same value.
    pub fn set_exclusive_group(&mut self, group: Option<&str>) -> Result<()> {
        self.check_invariant()?;

        self.active_groups.clear();
        self.active_groups.extend(group.map(str::to_owned));
        self.group_context = group.map(str::to_owned);

        tracing::debug!(target: targets::FILTER, group = group.unwrap_or("<all>"), "exclusive group set");
        Ok(())
    }

    /// Add `group` to the active set, or remove it if already active.
    ///
    /// Only valid in additive mode. Applying the same toggle twice restores
    /// the previous state.
    pub fn toggle_additive_group(&mut self, group: &str) -> Result<()> {
        if self.mode != FilterMode::Additive {
            return Err(GridError::ModeMismatch {
                operation: "toggle_additive_group",
            });
        }

        match self.active_groups.iter().position(|g| g == group) {
            Some(index) => {
                self.active_groups.remove(index);
            }
            None => self.active_groups.push(group.to_owned()),
        }

        tracing::debug!(target: targets::FILTER, group, active = ?self.active_groups, "additive group toggled");
        Ok(())
    }

    /// React to a click on the control for `group`, according to the mode.
    ///
    /// Additive mode toggles the group in the active set. Exclusive mode
    /// selects the group, or goes back to all items when it was already the
    /// selected one.
    pub fn toggle_group(&mut self, group: &str) -> Result<()> {
        match self.mode {
            FilterMode::Additive => self.toggle_additive_group(group),
            FilterMode::Exclusive => {
                if self.is_group_active(group) {
                    self.set_exclusive_group(None)
                } else {
                    self.set_exclusive_group(Some(group))
                }
            }
        }
    }

    /// Install or remove the custom predicate.
    pub fn set_custom_predicate(&mut self, predicate: Option<Predicate>) {
        tracing::debug!(target: targets::FILTER, installed = predicate.is_some(), "custom predicate changed");
        self.predicate = predicate;
    }

    /// Set the group the custom predicate is scoped to, `None` for all items.
    pub fn set_group_context(&mut self, group: Option<&str>) {
        self.group_context = group.map(str::to_owned);
    }

    /// Back to "all items visible": no active groups, no predicate, no
    /// group context. The mode is kept.
    pub fn reset(&mut self) {
        self.active_groups.clear();
        self.predicate = None;
        self.group_context = None;
        tracing::debug!(target: targets::FILTER, "filter reset");
    }

    /// Final visibility of `item` under this state.
    pub fn is_visible(&self, item: &Item) -> bool {
        match &self.predicate {
            Some(predicate) => {
                let in_context = self
                    .group_context
                    .as_deref()
                    .map_or(true, |group| item.in_group(group));
                in_context && predicate(item, &self.context())
            }
            None => self.matches_groups(item),
        }
    }

    // Exclusive mode holds at most one group, so OR matching covers both.
    fn matches_groups(&self, item: &Item) -> bool {
        self.active_groups.is_empty()
            || self.active_groups.iter().any(|group| item.in_group(group))
    }
}

/// Visibility of every item under `state`.
pub fn compute_visibility<'a, I>(items: I, state: &FilterState) -> HashMap<ItemId, bool>
where
    I: IntoIterator<Item = &'a Item>,
{
    items
        .into_iter()
        .map(|item| (item.id(), state.is_visible(item)))
        .collect()
}
