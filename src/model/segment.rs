use serde::{Deserialize, Serialize};

use super::Field;

/// A contiguous out-of-heap memory region (data or bss segment). Both
/// kinds share the shape; the store keeps them in separate lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Address of the start of the segment.
    pub address: u64,
    /// Raw segment bytes. Opaque.
    pub content: Vec<u8>,
    /// Pointer-bearing fields within the segment.
    pub fields: Vec<Field>,
}

/// A finalizer attached to an object. Registered and queued finalizers
/// share this shape; both keep their object reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finalizer {
    /// Address of the object that has the finalizer.
    pub object_address: u64,
    /// Pointer to the FuncVal describing the finalizer.
    pub funcval: u64,
    /// PC of the finalizer entry point.
    pub pc: u64,
    /// Type of the finalizer argument.
    pub arg_type: u64,
    /// Type of the object.
    pub object_type: u64,
}

/// A root reference that originates outside stacks and segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Root {
    /// Textual description of where this root came from.
    pub description: String,
    pub pointer: u64,
}
