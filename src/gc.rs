//! Reachability analysis: mark from the roots, sweep the complement.
//!
//! Root classes, in the order they are seeded: objects referenced from
//! stack frames, explicit other-roots, data segments, bss segments, and
//! objects with a registered or queued finalizer (a finalizer keeps its
//! object alive until it has run).
//!
//! The mark phase uses an explicit work stack rather than recursion;
//! pointer chains in real dumps routinely exceed any comfortable stack
//! depth, and cycles are cut by the visited check on pop.

use rustc_hash::FxHashSet;

use crate::heap::Heap;
use crate::model::Object;

pub(crate) fn garbage(heap: &Heap) -> Vec<&Object> {
    let marked = mark(heap);
    heap.objects()
        .filter(|o| !marked.contains(&o.address))
        .collect()
}

pub(crate) fn reachable(heap: &Heap) -> Vec<&Object> {
    let marked = mark(heap);
    heap.objects()
        .filter(|o| marked.contains(&o.address))
        .collect()
}

/// The set of object addresses reachable from any root.
fn mark(heap: &Heap) -> FxHashSet<u64> {
    let mut work: Vec<u64> = Vec::new();

    for frame in heap.stack_frames() {
        work.extend(heap.frame_objects(frame).iter().map(|o| o.address));
    }
    for root in heap.roots() {
        if heap.object(root.pointer).is_some() {
            work.push(root.pointer);
        }
    }
    for segment in heap.data_segments() {
        work.extend(heap.segment_objects(segment).iter().map(|o| o.address));
    }
    for segment in heap.bss_segments() {
        work.extend(heap.segment_objects(segment).iter().map(|o| o.address));
    }
    for finalizer in heap.finalizers().iter().chain(heap.queued_finalizers()) {
        if heap.object(finalizer.object_address).is_some() {
            work.push(finalizer.object_address);
        }
    }

    let mut marked = FxHashSet::default();
    while let Some(address) = work.pop() {
        if !marked.insert(address) {
            continue;
        }
        if let Some(object) = heap.object(address) {
            for child in heap.children(object) {
                if !marked.contains(&child.address) {
                    work.push(child.address);
                }
            }
        }
    }
    marked
}
