//! Entity types decoded out of a heap dump.
//!
//! Everything here is plain data: entities are created during the single
//! decode pass and never mutated afterwards. Cross-references (object to
//! type, alloc sample to profile record) are kept as raw addresses or ids
//! and resolved through the [`Heap`](crate::Heap) store on demand, since
//! the referenced record may appear later in the stream than the referrer.

mod goroutine;
mod object;
mod params;
mod profile;
mod segment;
mod typeinfo;

pub use goroutine::{DeferRecord, Goroutine, GoroutineStatus, OsThread, PanicRecord, StackFrame};
pub use object::{Object, ObjectKind};
pub use params::{DumpParams, MemStats};
pub use profile::{AllocSample, MemProf, ProfFrame};
pub use segment::{Finalizer, Root, Segment};
pub use typeinfo::{Field, FieldKind, ITab, TypeInfo};
