//! Cross-heap comparison: objects that stayed in place between two dumps.
//!
//! An object "matches" when the same address carries the same type
//! descriptor, kind, and size in both heaps; the content check is kept
//! separate so callers can distinguish objects that survived untouched
//! from ones that were overwritten in place.

use serde::Serialize;

use crate::heap::Heap;

/// An object found at the same address in two heaps with matching type,
/// kind, and size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedObject {
    pub address: u64,
    /// Type name as resolved in the first heap.
    pub type_name: String,
    pub size: usize,
    /// Whether the content bytes are identical in both heaps.
    pub identical: bool,
}

/// Objects of `a` that exist unchanged (by identity) in `b`, ascending by
/// address. Addresses missing from `b` or mismatching on type, kind, or
/// size are omitted.
pub(crate) fn same(a: &Heap, b: &Heap) -> Vec<SharedObject> {
    let mut shared: Vec<SharedObject> = a
        .objects()
        .filter_map(|obj| {
            let other = b.object(obj.address)?;
            if other.type_address != obj.type_address
                || other.kind != obj.kind
                || other.size() != obj.size()
            {
                return None;
            }
            Some(SharedObject {
                address: obj.address,
                type_name: a.type_name(obj).to_string(),
                size: obj.size(),
                identical: other.content == obj.content,
            })
        })
        .collect();
    shared.sort_unstable_by_key(|s| s.address);
    shared
}
