//! heapscope - parsing and analysis of Go runtime heap dumps.
//!
//! This library decodes the binary heap-dump files written by
//! `debug.WriteHeapDump` (the "go1.3 heap dump" and "go1.7 heap dump"
//! formats), reconstructs the object graph they describe, and answers
//! analytic queries: object and type listings, pointer-graph traversal,
//! unreachable-object detection, fragmentation scans, cross-heap diffs,
//! and type histograms.
//!
//! # Example
//!
//! ```no_run
//! let heap = heapscope::load("crash.heapdump").unwrap();
//!
//! for row in heap.histogram() {
//!     println!("{}\t{}", row.count, row.name);
//! }
//! println!("{} unreachable objects", heap.garbage().len());
//! ```
//!
//! The decode pass is strictly sequential and the resulting [`Heap`] is
//! immutable; all queries take `&self` and are safe to run from multiple
//! threads. Presentation (CLI, HTTP, rendering) is deliberately out of
//! scope: this crate's contract ends at the query API.

mod diff;
mod error;
mod fragment;
mod gc;
mod heap;
mod histogram;
mod inspect;
mod scan;

// Public modules
pub mod model;
pub mod reader;
pub mod record;

// Re-export the query surface at the crate root
pub use diff::SharedObject;
pub use error::{Error, Result};
pub use fragment::{FragmentationReport, Gap};
pub use heap::{Heap, UNKNOWN_TYPE};
pub use histogram::TypeCount;
pub use inspect::{FieldSlice, Referrers};
pub use model::{
    AllocSample, DeferRecord, DumpParams, Field, FieldKind, Finalizer, Goroutine, GoroutineStatus,
    ITab, MemProf, MemStats, Object, ObjectKind, OsThread, PanicRecord, ProfFrame, Root, Segment,
    StackFrame, TypeInfo,
};

use std::path::Path;

/// Load a heap dump from a file.
///
/// This is the main entry point. Equivalent to [`Heap::load`]; see
/// [`Heap::from_reader`] for decoding from a non-file source.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Heap> {
    Heap::load(path)
}
