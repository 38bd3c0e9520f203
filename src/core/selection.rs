//! Selection state for multi-select lists

use indexmap::IndexSet;
use std::hash::Hash;

use crate::core::pluralize::Pluralizer;

/// Set of selected record identifiers.
///
/// Membership is toggled by id, so duplicates cannot exist. Insertion order is
/// kept so the ids reach the API in the order the user picked them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSet<Id: Hash + Eq> {
    ids: IndexSet<Id>,
}

impl<Id: Hash + Eq> Default for SelectionSet<Id> {
    fn default() -> Self {
        Self {
            ids: IndexSet::new(),
        }
    }
}

impl<Id: Copy + Hash + Eq> SelectionSet<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the id if absent, remove it if present.
    ///
    /// Returns `true` when the id is selected after the call.
    pub fn toggle(&mut self, id: Id) -> bool {
        if self.ids.shift_remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.ids.contains(id)
    }

    pub fn count(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Selected ids in selection order
    pub fn ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.ids.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<Id> {
        self.ids.iter().copied().collect()
    }

    /// Drop every id for which `keep` returns false
    pub fn retain(&mut self, mut keep: impl FnMut(&Id) -> bool) {
        self.ids.retain(|id| keep(id));
    }

    /// "2 employees selected"
    pub fn summary(&self, singular: &str) -> String {
        format!("{} selected", Pluralizer::count_label(self.count(), singular))
    }
}

impl<Id: Copy + Hash + Eq> FromIterator<Id> for SelectionSet<Id> {
    fn from_iter<I: IntoIterator<Item = Id>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
