use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;

/// Dump-wide parameters written once by the runtime's heap dumper.
///
/// The pointer size and byte order here govern every pointer scan over
/// object, segment, and stack frame contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpParams {
    /// True if the dumping machine stored words most significant byte first.
    pub big_endian: bool,
    /// Pointer size in bytes (4 or 8 on the supported runtimes).
    pub ptr_size: u64,
    /// Channel header size in bytes.
    pub ch_hdr_size: u64,
    /// Starting address of the heap.
    pub heap_start: u64,
    /// Ending address of the heap.
    pub heap_end: u64,
    /// Architecture specifier ("thechar" in the runtime).
    pub arch: u64,
    /// Value of the GOEXPERIMENT environment variable at build time.
    pub go_experiment: String,
    /// Number of CPUs visible to the runtime.
    pub ncpu: u64,
}

/// The runtime's memory statistics block, captured verbatim from the dump.
///
/// Field meanings follow the runtime's own MemStats documentation; all
/// values are byte or event counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemStats {
    pub alloc: u64,
    pub total_alloc: u64,
    pub sys: u64,
    pub lookups: u64,
    pub mallocs: u64,
    pub frees: u64,
    pub heap_alloc: u64,
    pub heap_sys: u64,
    pub heap_idle: u64,
    pub heap_inuse: u64,
    pub heap_released: u64,
    pub heap_objects: u64,
    pub stack_inuse: u64,
    pub stack_sys: u64,
    pub mspan_inuse: u64,
    pub mspan_sys: u64,
    pub mcache_inuse: u64,
    pub mcache_sys: u64,
    pub buck_hash_sys: u64,
    pub gc_sys: u64,
    pub other_sys: u64,
    pub next_gc: u64,
    pub last_gc: u64,
    pub pause_total_ns: u64,
    /// Circular buffer of the most recent GC pause durations.
    #[serde(with = "BigArray")]
    pub pause_ns: [u64; 256],
    pub num_gc: u64,
}
