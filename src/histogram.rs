//! Object-count histogram grouped by type name.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::heap::Heap;
#[cfg(test)]
use crate::heap::UNKNOWN_TYPE;

/// One histogram row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCount {
    pub name: String,
    pub count: usize,
}

/// Count objects per type name; unresolved types count under
/// [`UNKNOWN_TYPE`]. Rows are sorted ascending by count, ties broken by
/// name so the order is stable.
pub(crate) fn by_type(heap: &Heap) -> Vec<TypeCount> {
    let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
    for object in heap.objects() {
        *counts.entry(heap.type_name(object)).or_insert(0) += 1;
    }

    let mut rows: Vec<TypeCount> = counts
        .into_iter()
        .map(|(name, count)| TypeCount {
            name: name.to_string(),
            count,
        })
        .collect();
    rows.sort_unstable_by(|a, b| a.count.cmp(&b.count).then_with(|| a.name.cmp(&b.name)));
    rows
}
