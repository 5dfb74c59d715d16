// crates/obox-layout/src/constraints.rs

use obox_core::{ChildConstraints, ChildId, Insets, Priority};
use std::collections::HashMap;

/// Side table of per-child constraints, keyed by child id.
///
/// Entries outlive removal of the child from its container, so a child that
/// is moved out and back keeps its margin and grow priorities.
#[derive(Debug, Clone, Default)]
pub struct ConstraintTable {
    entries: HashMap<ChildId, ChildConstraints>,
}

impl ConstraintTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constraints for `id`, defaulted when none were set.
    pub fn get(&self, id: ChildId) -> ChildConstraints {
        self.entries.get(&id).copied().unwrap_or_default()
    }

    /// Applies `update` to the entry for `id` and reports whether it changed.
    pub fn update(&mut self, id: ChildId, update: impl FnOnce(&mut ChildConstraints)) -> bool {
        let entry = self.entries.entry(id).or_default();
        let before = *entry;
        update(entry);
        let changed = before != *entry;
        if *entry == ChildConstraints::default() {
            self.entries.remove(&id);
        }
        changed
    }

    pub fn set_margin(&mut self, id: ChildId, margin: Insets) -> bool {
        self.update(id, |c| c.margin = margin)
    }

    pub fn set_hgrow(&mut self, id: ChildId, priority: Priority) -> bool {
        self.update(id, |c| c.hgrow = priority)
    }

    pub fn set_vgrow(&mut self, id: ChildId, priority: Priority) -> bool {
        self.update(id, |c| c.vgrow = priority)
    }

    /// Drops every constraint of `id`; returns whether anything was set.
    pub fn clear(&mut self, id: ChildId) -> bool {
        self.entries.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
