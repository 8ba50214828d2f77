//! Fragmentation analysis: unused address ranges between live objects.

use serde::Serialize;

use crate::heap::Heap;

/// An unused address range between two objects, or between the last
/// object and the end of the heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Gap {
    /// First unused address.
    pub start: u64,
    /// First used address after the gap.
    pub end: u64,
    pub size: u64,
}

/// Result of a fragmentation scan: the gaps in ascending address order
/// and their summed size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FragmentationReport {
    pub gaps: Vec<Gap>,
    pub total: u64,
}

/// Walk objects in address order and report every hole.
///
/// Each object is assumed to occupy `[address, address + content length)`.
/// Overlapping records (a malformed or duplicated dump) produce no gap
/// rather than an underflowed one. A heap with no objects at all is one
/// single gap spanning the declared heap range.
pub(crate) fn analyze(heap: &Heap) -> FragmentationReport {
    let mut addresses: Vec<u64> = heap.objects().map(|o| o.address).collect();
    addresses.sort_unstable();

    let mut report = FragmentationReport::default();

    for pair in addresses.windows(2) {
        let size = heap.object(pair[0]).map_or(0, |o| o.size() as u64);
        push_gap(&mut report, pair[0].saturating_add(size), pair[1]);
    }

    match (addresses.last(), heap.dump_params()) {
        (Some(&last), Some(params)) => {
            let size = heap.object(last).map_or(0, |o| o.size() as u64);
            push_gap(&mut report, last.saturating_add(size), params.heap_end);
        }
        (None, Some(params)) => {
            // No objects: the whole declared range is unused.
            push_gap(&mut report, params.heap_start, params.heap_end);
        }
        _ => {}
    }

    report
}

fn push_gap(report: &mut FragmentationReport, start: u64, end: u64) {
    if end > start {
        report.gaps.push(Gap {
            start,
            end,
            size: end - start,
        });
        report.total += end - start;
    }
}
