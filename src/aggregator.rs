//! Aggregation Engine
//!
//! Deduplicates parsed records by key and keeps raw occurrence totals alongside the
//! unique entries.
//!
//! ## Core Functionality
//!
//! - **At most one entry per key**: every table is a map from key to record, filled
//!   through [`AggregationTable::fetch_or_insert`]
//! - **Write-once details**: callers learn whether an entry is [`Slot::Fresh`] and only
//!   capture detail fields in that case
//! - **Monotonic counts**: entries are never removed during parsing; counts only grow
//! - **Single drain**: [`AggregationTable::drain`] hands the entries over for reporting
//!   and leaves the table empty
//!
//! Memory grows with the number of distinct keys, not with the size of the input.
//!
//! ## Key Types
//!
//! - [`Aggregator`] - the three tables and the raw totals for one parse pass
//! - [`AggregationTable`] - a single keyed table
//! - [`Slot`] - mutable handle returned by fetch-or-insert

use crate::models::{HardDeletionRecord, RecordKind, RuntimeRecord};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Handle to a table entry, tagged with whether the lookup created it
pub enum Slot<'a, T> {
    Fresh(&'a mut T),
    Existing(&'a mut T),
}

impl<'a, T> Slot<'a, T> {
    pub fn is_fresh(&self) -> bool {
        matches!(self, Slot::Fresh(_))
    }

    pub fn into_inner(self) -> &'a mut T {
        match self {
            Slot::Fresh(value) | Slot::Existing(value) => value,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AggregationTable<T> {
    entries: HashMap<String, T>,
}

impl<T> Default for AggregationTable<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> AggregationTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    /// Look up `key`, inserting a default entry when it is absent
    pub fn fetch_or_insert(&mut self, key: String) -> Slot<'_, T>
    where
        T: Default,
    {
        match self.entries.entry(key) {
            Entry::Occupied(entry) => Slot::Existing(entry.into_mut()),
            Entry::Vacant(entry) => Slot::Fresh(entry.insert(T::default())),
        }
    }

    /// Move every entry out, leaving the table empty
    pub fn drain(&mut self) -> Vec<T> {
        self.entries.drain().map(|(_, value)| value).collect()
    }
}

/// Tables and raw totals owned by a single parse pass
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    pub runtimes: AggregationTable<RuntimeRecord>,
    pub infinite_loops: AggregationTable<RuntimeRecord>,
    pub hard_deletions: AggregationTable<HardDeletionRecord>,
    pub total_runtimes: u64,
    pub total_infinite_loops: u64,
    pub total_hard_dels: u64,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one raw occurrence of `kind` and return the table it belongs in
    pub fn record_occurrence(&mut self, kind: RecordKind) -> &mut AggregationTable<RuntimeRecord> {
        match kind {
            RecordKind::Runtime => {
                self.total_runtimes += 1;
                &mut self.runtimes
            }
            RecordKind::InfiniteLoop => {
                self.total_infinite_loops += 1;
                &mut self.infinite_loops
            }
        }
    }

    /// Add `failures` to the entry for `type_name` and to the global total.
    /// Zero failures leave everything untouched. Sums saturate at `u64::MAX`.
    pub fn add_hard_deletion(&mut self, type_name: &str, failures: u64) {
        if failures == 0 {
            return;
        }

        let slot = self.hard_deletions.fetch_or_insert(type_name.to_string());
        let fresh = slot.is_fresh();
        let record = slot.into_inner();
        if fresh {
            record.type_name = type_name.to_string();
        }
        record.failure_count = record.failure_count.saturating_add(failures);
        self.total_hard_dels = self.total_hard_dels.saturating_add(failures);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_or_insert_reports_freshness() {
        let mut table: AggregationTable<RuntimeRecord> = AggregationTable::new();
        assert!(table.fetch_or_insert("a".to_string()).is_fresh());
        assert!(!table.fetch_or_insert("a".to_string()).is_fresh());
        assert!(table.fetch_or_insert("b".to_string()).is_fresh());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_existing_slot_mutates_in_place() {
        let mut table: AggregationTable<RuntimeRecord> = AggregationTable::new();
        table.fetch_or_insert("k".to_string()).into_inner().occurrence_count = 1;
        table.fetch_or_insert("k".to_string()).into_inner().occurrence_count += 1;
        assert_eq!(table.get("k").unwrap().occurrence_count, 2);
    }

    #[test]
    fn test_drain_empties_table() {
        let mut table: AggregationTable<HardDeletionRecord> = AggregationTable::new();
        table.fetch_or_insert("x".to_string());
        table.fetch_or_insert("y".to_string());
        assert_eq!(table.drain().len(), 2);
        assert!(table.is_empty());
        assert!(table.drain().is_empty());
    }

    #[test]
    fn test_record_occurrence_routes_and_counts() {
        let mut aggregator = Aggregator::new();
        aggregator
            .record_occurrence(RecordKind::InfiniteLoop)
            .fetch_or_insert("loop".to_string());
        aggregator.record_occurrence(RecordKind::Runtime);
        aggregator.record_occurrence(RecordKind::Runtime);

        assert_eq!(aggregator.total_infinite_loops, 1);
        assert_eq!(aggregator.total_runtimes, 2);
        assert_eq!(aggregator.infinite_loops.len(), 1);
        assert!(aggregator.runtimes.is_empty());
    }

    #[test]
    fn test_hard_deletions_accumulate() {
        let mut aggregator = Aggregator::new();
        aggregator.add_hard_deletion("/obj/item", 5);
        aggregator.add_hard_deletion("/obj/item", 3);
        aggregator.add_hard_deletion("/mob/living", 1);
        aggregator.add_hard_deletion("/mob/dead", 0);

        let item = aggregator.hard_deletions.get("/obj/item").unwrap();
        assert_eq!(item.type_name, "/obj/item");
        assert_eq!(item.failure_count, 8);
        assert_eq!(aggregator.hard_deletions.len(), 2);
        assert_eq!(aggregator.total_hard_dels, 9);
    }

    #[test]
    fn test_hard_deletion_sums_saturate() {
        let mut aggregator = Aggregator::new();
        aggregator.add_hard_deletion("/obj/a", u64::MAX);
        aggregator.add_hard_deletion("/obj/a", 2);
        aggregator.add_hard_deletion("/obj/b", 1);

        assert_eq!(aggregator.hard_deletions.get("/obj/a").unwrap().failure_count, u64::MAX);
        assert_eq!(aggregator.total_hard_dels, u64::MAX);
    }
}
