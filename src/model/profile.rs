use serde::{Deserialize, Serialize};

/// One frame of an allocation-site stack trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfFrame {
    pub name: String,
    pub file: String,
    pub line: u64,
}

/// An alloc/free profile record: an allocation site with its stack trace
/// and counters. Samples referencing this record follow it in the stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemProf {
    /// Record identifier alloc samples refer to.
    pub record: u64,
    /// Size of the allocated objects.
    pub size: u64,
    pub frames: Vec<ProfFrame>,
    pub allocs: u64,
    pub frees: u64,
}

/// An individual allocation observation tying a heap object to a profile
/// record. Both sides resolve through the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocSample {
    pub object_address: u64,
    /// Identifier of the owning profile record.
    pub record: u64,
}
