// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The immutable tree index and its lookup tables.

use rustc_hash::FxHashMap;
use tracing::{debug, instrument, warn};

use crate::record::{Record, RecordId};

/// Read-only index over a flat list of parent-linked records.
///
/// Built in one pass; never mutated afterwards, so a shared reference can be
/// handed to any number of readers.
///
/// # Table Invariants
///
/// - `records` is the construction input, unmodified and in input order.
/// - `by_id` maps each id to the position of its last occurrence.
/// - `children` has an entry for every record id, plus one for every
///   dangling parent id that some record points at. Positions inside an
///   entry are ascending (input order).
#[derive(Debug, Clone, Default)]
pub struct TreeIndex {
    records: Vec<Record>,
    by_id: FxHashMap<RecordId, usize>,
    children: FxHashMap<RecordId, Vec<usize>>,
}

impl TreeIndex {
    /// Build the index from an ordered record list.
    ///
    /// Input order need not be topological. Runs in O(n).
    #[instrument(skip_all, fields(records = records.len()))]
    pub fn new(records: Vec<Record>) -> Self {
        let mut by_id: FxHashMap<RecordId, usize> = FxHashMap::default();
        by_id.reserve(records.len());
        let mut children: FxHashMap<RecordId, Vec<usize>> = FxHashMap::default();
        children.reserve(records.len());

        for (pos, record) in records.iter().enumerate() {
            by_id.insert(record.id, pos);
            children.entry(record.id).or_default();
        }

        let mut roots = 0usize;
        let mut dangling = 0usize;
        for (pos, record) in records.iter().enumerate() {
            let Some(parent) = record.parent.node() else {
                roots += 1;
                continue;
            };
            if !by_id.contains_key(&parent) {
                dangling += 1;
            }
            children.entry(parent).or_default().push(pos);
        }

        debug!(unique_ids = by_id.len(), roots, dangling, "tree index built");

        Self {
            records,
            by_id,
            children,
        }
    }

    /// The construction input, in original order.
    pub fn all(&self) -> &[Record] {
        &self.records
    }

    /// Record with the given id, or `None` if no such record exists.
    pub fn item(&self, id: RecordId) -> Option<&Record> {
        self.by_id.get(&id).map(|&pos| &self.records[pos])
    }

    /// Direct children of `id`, in input order.
    ///
    /// Empty when `id` has no children, including when `id` is not itself a
    /// record. Children of a dangling parent id are still returned.
    pub fn children(&self, id: RecordId) -> Vec<&Record> {
        self.children.get(&id).map_or_else(Vec::new, |positions| {
            positions.iter().map(|&pos| &self.records[pos]).collect()
        })
    }

    /// Ancestor chain of `id`, ordered from the top-most resolvable ancestor
    /// down to the record itself.
    ///
    /// Returns `None` if `id` is not a record. The walk stops silently at the
    /// root sentinel or at the first parent id that does not resolve, so a
    /// dangling lineage yields a partial chain. A parent cycle is cut after
    /// [`len`](Self::len) records.
    pub fn ancestry(&self, id: RecordId) -> Option<Vec<&Record>> {
        let mut current = self.item(id)?;
        let mut chain = vec![current];
        while let Some(parent) = current.parent.node().and_then(|p| self.item(p)) {
            if chain.len() == self.records.len() {
                warn!(id, at = parent.id, "parent cycle detected; ancestry truncated");
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        Some(chain)
    }

    /// One-step parent lookup. `None` for roots, unknown ids, and dangling
    /// parents.
    pub fn parent(&self, id: RecordId) -> Option<&Record> {
        self.item(id)?.parent.node().and_then(|p| self.item(p))
    }

    /// Records whose parent is the root sentinel, in input order.
    pub fn roots(&self) -> Vec<&Record> {
        self.records.iter().filter(|r| r.is_root()).collect()
    }

    /// Returns `true` if a record with this id exists.
    pub fn contains(&self, id: RecordId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Number of records in the input (duplicates included).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the index was built from an empty list.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Give back the construction input.
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

impl FromIterator<Record> for TreeIndex {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl From<Vec<Record>> for TreeIndex {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::record::ParentRef;
    use serde_json::Value;

    fn reference_records() -> Vec<Record> {
        vec![
            Record::root(1),
            Record::new(2, 1).with_field("type", "test"),
            Record::new(3, 1).with_field("type", "test"),
            Record::new(4, 2).with_field("type", "test"),
            Record::new(5, 2).with_field("type", "test"),
            Record::new(6, 2).with_field("type", "test"),
            Record::new(7, 4).with_field("type", Value::Null),
            Record::new(8, 4).with_field("type", Value::Null),
        ]
    }

    fn ids(records: &[&Record]) -> Vec<RecordId> {
        records.iter().map(|r| r.id).collect()
    }

    // ── construction + all ──────────────────────────────────────────────

    #[test]
    fn all_returns_input_unchanged() {
        let index = TreeIndex::new(reference_records());
        assert_eq!(index.all(), reference_records().as_slice());
        assert_eq!(index.len(), 8);
        assert!(!index.is_empty());
    }

    #[test]
    fn empty_input_builds_empty_index() {
        let index = TreeIndex::new(Vec::new());
        assert!(index.is_empty());
        assert!(index.item(1).is_none());
        assert!(index.children(1).is_empty());
        assert!(index.ancestry(1).is_none());
    }

    // ── item ────────────────────────────────────────────────────────────

    #[test]
    fn item_returns_record_with_payload() {
        let index = TreeIndex::new(reference_records());
        let rec = index.item(3).unwrap();
        assert_eq!(rec, &Record::new(3, 1).with_field("type", "test"));
        assert!(index.item(42).is_none());
    }

    // ── children ────────────────────────────────────────────────────────

    #[test]
    fn children_keep_input_order() {
        let index = TreeIndex::new(reference_records());
        assert_eq!(ids(&index.children(2)), [4, 5, 6]);
        assert_eq!(ids(&index.children(1)), [2, 3]);
    }

    #[test]
    fn children_of_leaf_and_unknown_are_empty() {
        let index = TreeIndex::new(reference_records());
        assert!(index.children(8).is_empty());
        assert!(index.children(99).is_empty());
    }

    #[test]
    fn children_of_dangling_parent_resolve() {
        let index = TreeIndex::new(vec![Record::root(1), Record::new(2, 50), Record::new(3, 50)]);
        assert!(index.item(50).is_none());
        assert_eq!(ids(&index.children(50)), [2, 3]);
    }

    #[test]
    fn child_before_parent_in_input() {
        let index = TreeIndex::new(vec![Record::new(2, 1), Record::root(1), Record::new(3, 2)]);
        assert_eq!(ids(&index.children(1)), [2]);
        assert_eq!(ids(&index.ancestry(3).unwrap()), [1, 2, 3]);
    }

    // ── ancestry ────────────────────────────────────────────────────────

    #[test]
    fn ancestry_runs_root_to_node() {
        let index = TreeIndex::new(reference_records());
        assert_eq!(ids(&index.ancestry(7).unwrap()), [1, 2, 4, 7]);
        let last = index.ancestry(7).unwrap().pop().unwrap();
        assert_eq!(last.field("type"), Some(&Value::Null));
    }

    #[test]
    fn ancestry_of_root_is_singleton() {
        let index = TreeIndex::new(reference_records());
        assert_eq!(index.ancestry(1).unwrap(), vec![&Record::root(1)]);
    }

    #[test]
    fn ancestry_of_unknown_is_none() {
        let index = TreeIndex::new(reference_records());
        assert!(index.ancestry(1000).is_none());
    }

    #[test]
    fn ancestry_stops_at_dangling_parent() {
        let index = TreeIndex::new(vec![
            Record::root(1),
            Record::new(10, 77),
            Record::new(11, 10),
            Record::new(12, 11),
        ]);
        assert_eq!(ids(&index.ancestry(12).unwrap()), [10, 11, 12]);
        assert_eq!(ids(&index.ancestry(10).unwrap()), [10]);
    }

    #[test]
    fn ancestry_cycle_is_cut_off() {
        let index = TreeIndex::new(vec![Record::new(1, 3), Record::new(2, 1), Record::new(3, 2)]);
        let chain = index.ancestry(1).unwrap();
        assert_eq!(chain.len(), index.len());
        assert_eq!(chain.last().unwrap().id, 1);
    }

    #[test]
    fn self_parent_is_cut_off() {
        let index = TreeIndex::new(vec![Record::new(5, 5)]);
        assert_eq!(ids(&index.ancestry(5).unwrap()), [5]);
    }

    // ── duplicates ──────────────────────────────────────────────────────

    #[test]
    fn duplicate_ids_resolve_to_last_occurrence() {
        let index = TreeIndex::new(vec![
            Record::root(1),
            Record::new(2, 1).with_field("v", 1),
            Record::new(2, 1).with_field("v", 2),
        ]);
        assert_eq!(index.item(2).unwrap().field("v"), Some(&Value::from(2)));
        assert_eq!(index.children(1).len(), 2);
        assert_eq!(index.len(), 3);
    }

    // ── helpers ─────────────────────────────────────────────────────────

    #[test]
    fn parent_and_roots_helpers() {
        let mut records = reference_records();
        records.push(Record::root(100));
        records.push(Record::new(101, 555));
        let index: TreeIndex = records.into_iter().collect();
        assert_eq!(index.parent(7).unwrap().id, 4);
        assert!(index.parent(1).is_none());
        assert!(index.parent(101).is_none());
        assert!(index.parent(9999).is_none());
        assert_eq!(ids(&index.roots()), [1, 100]);
        assert!(index.contains(101));
        assert!(!index.contains(555));
        assert_eq!(index.item(101).unwrap().parent, ParentRef::Node(555));
    }

    #[test]
    fn into_records_gives_input_back() {
        let index = TreeIndex::from(reference_records());
        assert_eq!(index.into_records(), reference_records());
    }

    #[test]
    fn index_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TreeIndex>();
    }
}
