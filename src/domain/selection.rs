//! Selection Value
//!
//! The curated right-pane list: a membership list plus an explicit display
//! order. The two are not required to agree with each other.

use serde::{Deserialize, Serialize};

use super::item::ItemId;

/// Selected ids and their display order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    /// Membership; treated as a set
    pub selected_ids: Vec<ItemId>,
    /// Display order
    pub order: Vec<ItemId>,
}

impl Selection {
    pub fn new(selected_ids: Vec<ItemId>, order: Vec<ItemId>) -> Self {
        Self {
            selected_ids,
            order,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.selected_ids.is_empty() && self.order.is_empty()
    }

    /// Copy of this selection with `ids` appended to both lists.
    ///
    /// Each resulting list keeps only the first occurrence of every id, so
    /// existing entries keep their positions and new ones land at the end.
    pub fn merged_with(&self, ids: &[ItemId]) -> Self {
        Self {
            selected_ids: dedup_concat(&self.selected_ids, ids),
            order: dedup_concat(&self.order, ids),
        }
    }
}

/// Result of removing ids from the committed selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalOutcome {
    /// Ids that were members before the call, in request order
    pub removed: Vec<ItemId>,
    /// Selection after the removal
    #[serde(flatten)]
    pub selection: Selection,
}

fn dedup_concat(head: &[ItemId], tail: &[ItemId]) -> Vec<ItemId> {
    let mut seen = indexmap::IndexSet::with_capacity(head.len() + tail.len());
    seen.extend(head.iter().chain(tail).copied());
    seen.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_appends_new_ids() {
        let selection = Selection::new(vec![1, 2, 3], vec![2, 1, 3]);
        let merged = selection.merged_with(&[4, 5]);

        assert_eq!(merged.selected_ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(merged.order, vec![2, 1, 3, 4, 5]);
    }

    #[test]
    fn test_merge_keeps_first_occurrence() {
        let selection = Selection::new(vec![1, 2], vec![2, 1]);
        let merged = selection.merged_with(&[2, 9, 1, 9]);

        assert_eq!(merged.selected_ids, vec![1, 2, 9]);
        assert_eq!(merged.order, vec![2, 1, 9]);
    }

    #[test]
    fn test_merge_collapses_existing_duplicates() {
        // Lists carrying duplicates from a direct update are cleaned on merge
        let selection = Selection::new(vec![3, 3], vec![3, 4, 3]);
        let merged = selection.merged_with(&[5]);

        assert_eq!(merged.selected_ids, vec![3, 5]);
        assert_eq!(merged.order, vec![3, 4, 5]);
    }

    #[test]
    fn test_merge_does_not_touch_original() {
        let selection = Selection::new(vec![1], vec![1]);
        let _ = selection.merged_with(&[2]);
        assert_eq!(selection, Selection::new(vec![1], vec![1]));
    }

    #[test]
    fn test_selection_serializes_camel_case() {
        let json = serde_json::to_value(Selection::new(vec![1], vec![1])).unwrap();
        assert_eq!(json, serde_json::json!({ "selectedIds": [1], "order": [1] }));
    }

    #[test]
    fn test_removal_outcome_flattens_selection() {
        let outcome = RemovalOutcome {
            removed: vec![2],
            selection: Selection::new(vec![1, 3], vec![1, 3]),
        };
        let json = serde_json::to_value(outcome).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "removed": [2], "selectedIds": [1, 3], "order": [1, 3] })
        );
    }
}
