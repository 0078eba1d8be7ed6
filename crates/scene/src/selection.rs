use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::footprint::FootprintId;
use crate::instrument::FieldId;

/// Selected instrument fields, owned by the host.
///
/// Ordering contract:
/// - `ids()` yields identifiers in insertion order.
/// - Re-inserting a present id does not move it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<FieldId>", into = "Vec<FieldId>")]
pub struct FieldSelection {
    order: Vec<FieldId>,
    members: BTreeSet<FieldId>,
}

impl FieldSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a selection from `ids`, dropping repeats.
    pub fn from_ids(ids: impl IntoIterator<Item = FieldId>) -> Self {
        let mut s = Self::default();
        for id in ids {
            s.insert(id);
        }
        s
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: FieldId) -> bool {
        self.members.contains(&id)
    }

    /// Appends `id`.
    ///
    /// Returns `true` if the selection changed.
    pub fn insert(&mut self, id: FieldId) -> bool {
        if !self.members.insert(id) {
            return false;
        }
        self.order.push(id);
        true
    }

    /// Removes `id`.
    ///
    /// Returns `true` if the selection changed.
    pub fn remove(&mut self, id: FieldId) -> bool {
        if !self.members.remove(&id) {
            return false;
        }
        self.order.retain(|x| *x != id);
        true
    }

    /// Flips membership of `id`; returns whether it is now selected.
    pub fn toggle(&mut self, id: FieldId) -> bool {
        if self.remove(id) {
            false
        } else {
            self.insert(id)
        }
    }

    pub fn ids(&self) -> &[FieldId] {
        &self.order
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }
}

impl From<Vec<FieldId>> for FieldSelection {
    fn from(ids: Vec<FieldId>) -> Self {
        Self::from_ids(ids)
    }
}

impl From<FieldSelection> for Vec<FieldId> {
    fn from(s: FieldSelection) -> Self {
        s.order
    }
}

/// Observation footprints marked by the user, local to the widget.
///
/// Ordering contract:
/// - Iteration yields identifiers in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FootprintSelection {
    members: BTreeSet<FootprintId>,
}

impl FootprintSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: FootprintId) -> bool {
        self.members.contains(&id)
    }

    /// Flips membership of `id`; returns whether it is now selected.
    pub fn toggle(&mut self, id: FootprintId) -> bool {
        if self.members.remove(&id) {
            false
        } else {
            self.members.insert(id)
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = FootprintId> + '_ {
        self.members.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldSelection, FootprintSelection};
    use pretty_assertions::assert_eq;

    #[test]
    fn insert_remove_contains_and_len() {
        let mut s = FieldSelection::new();
        assert!(s.is_empty());
        assert!(!s.contains(1));

        assert!(s.insert(1));
        assert!(s.contains(1));
        assert_eq!(s.len(), 1);
        assert!(!s.insert(1));
        assert_eq!(s.len(), 1);

        assert!(s.remove(1));
        assert!(!s.contains(1));
        assert_eq!(s.len(), 0);
        assert!(!s.remove(1));
    }

    #[test]
    fn ids_keep_insertion_order() {
        let mut s = FieldSelection::new();
        s.insert(10);
        s.insert(2);
        s.insert(65);
        s.insert(2);
        assert_eq!(s.ids(), &[10, 2, 65]);
        s.remove(2);
        assert_eq!(s.ids(), &[10, 65]);
    }

    #[test]
    fn toggle_twice_restores_membership() {
        let mut s = FieldSelection::from_ids([4, 5]);
        assert!(s.toggle(9));
        assert!(!s.toggle(9));
        assert_eq!(s, FieldSelection::from_ids([4, 5]));
        assert!(!s.toggle(4));
        assert_eq!(s.ids(), &[5]);
    }

    #[test]
    fn serde_as_plain_list() {
        let s = FieldSelection::from_ids([3, 1, 3]);
        assert_eq!(serde_json::to_string(&s).unwrap(), "[3,1]");
        let back: FieldSelection = serde_json::from_str("[7,7,8]").unwrap();
        assert_eq!(back.ids(), &[7, 8]);
    }

    #[test]
    fn footprint_toggle_and_iter_sorted() {
        let mut s = FootprintSelection::new();
        assert!(s.toggle(30));
        assert!(s.toggle(4));
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![4, 30]);
        assert!(!s.toggle(30));
        assert!(!s.contains(30));
        assert_eq!(s.len(), 1);
    }
}
