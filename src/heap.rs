//! The in-memory heap store and its read-only query surface.
//!
//! `Heap::load` performs a single pass over the record stream and
//! populates address-keyed tables and insertion-ordered lists. The store
//! is immutable after construction; every derived view (children, segment
//! objects, garbage, fragmentation, diff, histogram) is recomputed from
//! the frozen tables on demand, so results are deterministic and
//! concurrent readers need no synchronization.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::diff::{self, SharedObject};
use crate::error::{Error, Result};
use crate::fragment::{self, FragmentationReport};
use crate::gc;
use crate::histogram::{self, TypeCount};
use crate::inspect::{self, FieldSlice, Referrers};
use crate::model::{
    AllocSample, DumpParams, Finalizer, Goroutine, ITab, MemProf, MemStats, Object, OsThread,
    Root, Segment, StackFrame, TypeInfo,
};
use crate::reader::ByteReader;
use crate::record::Record;
use crate::scan;

/// The two dump headers this crate accepts. The record format is
/// identical between them.
const HEADERS: [&[u8; 16]; 2] = [b"go1.3 heap dump\n", b"go1.7 heap dump\n"];

/// Type name reported for objects whose descriptor never resolved.
pub const UNKNOWN_TYPE: &str = "<unknown>";

/// A fully decoded heap dump.
#[derive(Debug, Default, PartialEq)]
pub struct Heap {
    objects: FxHashMap<u64, Object>,
    types: FxHashMap<u64, TypeInfo>,
    goroutines: Vec<Goroutine>,
    roots: Vec<Root>,
    data: Vec<Segment>,
    bss: Vec<Segment>,
    finalizers: Vec<Finalizer>,
    queued_finalizers: Vec<Finalizer>,
    itabs: Vec<ITab>,
    os_threads: Vec<OsThread>,
    mem_profs: Vec<MemProf>,
    mem_prof_index: FxHashMap<u64, usize>,
    allocs: Vec<AllocSample>,
    params: Option<DumpParams>,
    mem_stats: Option<MemStats>,
}

impl Heap {
    /// Load a heap dump from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Heap> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Heap::from_reader(BufReader::new(file))
    }

    /// Decode a heap dump from any byte source.
    ///
    /// The pass is strictly sequential and stops at the EOF record; a
    /// source that ends without one is reported as truncated. Any decode
    /// error aborts the pass, and no partial heap is returned.
    pub fn from_reader<R: Read>(source: R) -> Result<Heap> {
        let mut r = ByteReader::new(source);

        let mut header = [0u8; 16];
        match r.read_exact(&mut header) {
            Ok(()) => {}
            // A source too short for the header is not a heap dump at all.
            Err(Error::Truncated { .. }) => return Err(Error::InvalidHeapFile),
            Err(e) => return Err(e),
        }
        if !HEADERS.iter().any(|h| **h == header) {
            return Err(Error::InvalidHeapFile);
        }

        let mut heap = Heap::default();

        // Stack frames, defer records, and panic records belong to the
        // most recently decoded goroutine; alloc samples to the most
        // recently decoded profile record. The cursors live here, not in
        // the store: they are decode-time state only.
        let mut cur_goroutine: Option<usize> = None;
        let mut cur_prof: Option<usize> = None;

        loop {
            match Record::read(&mut r)? {
                Record::Eof => break,
                Record::Object(o) => {
                    if let Some(prev) = heap.objects.insert(o.address, o) {
                        warn!(
                            "duplicate object record at {:#x}; keeping the last one",
                            prev.address
                        );
                    }
                }
                Record::Type(t) => {
                    if let Some(prev) = heap.types.insert(t.address, t) {
                        warn!(
                            "duplicate type record at {:#x}; keeping the last one",
                            prev.address
                        );
                    }
                }
                Record::OtherRoot(root) => heap.roots.push(root),
                Record::Goroutine(g) => {
                    heap.goroutines.push(g);
                    cur_goroutine = Some(heap.goroutines.len() - 1);
                }
                Record::StackFrame(frame) => match cur_goroutine {
                    Some(i) => heap.goroutines[i].frames.push(frame),
                    None => {
                        return Err(Error::OrphanedChild {
                            record: "stack frame",
                            offset: r.offset(),
                        })
                    }
                },
                Record::Defer(d) => match cur_goroutine {
                    Some(i) => heap.goroutines[i].defers.push(d),
                    None => {
                        return Err(Error::OrphanedChild {
                            record: "defer",
                            offset: r.offset(),
                        })
                    }
                },
                Record::Panic(p) => match cur_goroutine {
                    Some(i) => heap.goroutines[i].panics.push(p),
                    None => {
                        return Err(Error::OrphanedChild {
                            record: "panic",
                            offset: r.offset(),
                        })
                    }
                },
                Record::Params(p) => heap.params = Some(p),
                Record::MemStats(m) => heap.mem_stats = Some(*m),
                Record::Finalizer(f) => heap.finalizers.push(f),
                Record::QueuedFinalizer(f) => heap.queued_finalizers.push(f),
                Record::ITab(i) => heap.itabs.push(i),
                Record::OsThread(t) => heap.os_threads.push(t),
                Record::Data(s) => heap.data.push(s),
                Record::Bss(s) => heap.bss.push(s),
                Record::MemProf(m) => {
                    heap.mem_prof_index.insert(m.record, heap.mem_profs.len());
                    heap.mem_profs.push(m);
                    cur_prof = Some(heap.mem_profs.len() - 1);
                }
                Record::AllocSample(sample) => match cur_prof {
                    Some(_) => heap.allocs.push(sample),
                    None => {
                        return Err(Error::OrphanedChild {
                            record: "alloc sample",
                            offset: r.offset(),
                        })
                    }
                },
            }
        }

        debug!(
            "decoded heap dump: {} objects, {} types, {} goroutines, {} roots",
            heap.objects.len(),
            heap.types.len(),
            heap.goroutines.len(),
            heap.roots.len()
        );

        Ok(heap)
    }

    // ---- singletons -----------------------------------------------------

    pub fn dump_params(&self) -> Option<&DumpParams> {
        self.params.as_ref()
    }

    pub fn mem_stats(&self) -> Option<&MemStats> {
        self.mem_stats.as_ref()
    }

    // ---- entity lookup and iteration ------------------------------------

    /// All heap objects. Iteration order is unspecified.
    pub fn objects(&self) -> impl Iterator<Item = &Object> {
        self.objects.values()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Look up an object by address.
    pub fn object(&self, address: u64) -> Option<&Object> {
        self.objects.get(&address)
    }

    /// All type descriptors. Iteration order is unspecified.
    pub fn types(&self) -> impl Iterator<Item = &TypeInfo> {
        self.types.values()
    }

    /// Look up a type descriptor by address.
    pub fn type_info(&self, address: u64) -> Option<&TypeInfo> {
        self.types.get(&address)
    }

    /// Resolve an object's type descriptor, if it is known.
    pub fn type_of(&self, object: &Object) -> Option<&TypeInfo> {
        if object.type_address == 0 {
            return None;
        }
        self.types.get(&object.type_address)
    }

    /// An object's type name, or [`UNKNOWN_TYPE`] when unresolved.
    pub fn type_name(&self, object: &Object) -> &str {
        self.type_of(object).map_or(UNKNOWN_TYPE, |t| t.name.as_str())
    }

    pub fn goroutines(&self) -> &[Goroutine] {
        &self.goroutines
    }

    /// All stack frames across all goroutines, in stream order.
    pub fn stack_frames(&self) -> impl Iterator<Item = &StackFrame> {
        self.goroutines.iter().flat_map(|g| g.frames.iter())
    }

    pub fn roots(&self) -> &[Root] {
        &self.roots
    }

    pub fn data_segments(&self) -> &[Segment] {
        &self.data
    }

    pub fn bss_segments(&self) -> &[Segment] {
        &self.bss
    }

    pub fn finalizers(&self) -> &[Finalizer] {
        &self.finalizers
    }

    pub fn queued_finalizers(&self) -> &[Finalizer] {
        &self.queued_finalizers
    }

    /// Objects with a registered finalizer; unresolved addresses skipped.
    pub fn finalizer_objects(&self) -> Vec<&Object> {
        self.finalizers
            .iter()
            .filter_map(|f| self.object(f.object_address))
            .collect()
    }

    /// Objects whose finalizer is queued to run; unresolved skipped.
    pub fn queued_finalizer_objects(&self) -> Vec<&Object> {
        self.queued_finalizers
            .iter()
            .filter_map(|f| self.object(f.object_address))
            .collect()
    }

    pub fn itabs(&self) -> &[ITab] {
        &self.itabs
    }

    pub fn os_threads(&self) -> &[OsThread] {
        &self.os_threads
    }

    pub fn mem_profs(&self) -> &[MemProf] {
        &self.mem_profs
    }

    /// Look up a profile record by its id.
    pub fn mem_prof(&self, record: u64) -> Option<&MemProf> {
        self.mem_prof_index.get(&record).map(|&i| &self.mem_profs[i])
    }

    pub fn allocs(&self) -> &[AllocSample] {
        &self.allocs
    }

    /// The heap object an alloc sample observed, if still present.
    pub fn alloc_object(&self, sample: &AllocSample) -> Option<&Object> {
        self.object(sample.object_address)
    }

    /// The profile record an alloc sample belongs to.
    pub fn alloc_profile(&self, sample: &AllocSample) -> Option<&MemProf> {
        self.mem_prof(sample.record)
    }

    // ---- pointer-graph derivation ---------------------------------------

    /// Heap objects this object points at, found by scanning its content
    /// in pointer-size strides. Self-references are filtered; a word that
    /// resolves more than once is emitted each time. Objects above the
    /// scan ceiling report no children.
    pub fn children(&self, object: &Object) -> Vec<&Object> {
        if object.content.len() > scan::CHILD_SCAN_CEILING {
            warn!(
                "object {:#x} is {} bytes, above the scan ceiling; treating as leaf",
                object.address,
                object.content.len()
            );
            return Vec::new();
        }
        let Some(params) = &self.params else {
            return Vec::new();
        };
        scan::pointer_words(&object.content, params)
            .into_iter()
            .filter(|&addr| addr != object.address)
            .filter_map(|addr| self.objects.get(&addr))
            .collect()
    }

    /// Heap objects a data or bss segment points at.
    pub fn segment_objects(&self, segment: &Segment) -> Vec<&Object> {
        self.resolve_words(&segment.content)
    }

    /// Heap objects a stack frame points at.
    pub fn frame_objects(&self, frame: &StackFrame) -> Vec<&Object> {
        self.resolve_words(&frame.content)
    }

    fn resolve_words(&self, content: &[u8]) -> Vec<&Object> {
        let Some(params) = &self.params else {
            return Vec::new();
        };
        scan::pointer_words(content, params)
            .into_iter()
            .filter_map(|addr| self.objects.get(&addr))
            .collect()
    }

    // ---- analysis -------------------------------------------------------

    /// Objects unreachable from any root. See [`Heap::reachable`] for the
    /// root set; the two partitions cover all objects exactly once.
    pub fn garbage(&self) -> Vec<&Object> {
        gc::garbage(self)
    }

    /// Objects reachable from stack frames, other roots, data and bss
    /// segments, or kept alive by a finalizer.
    pub fn reachable(&self) -> Vec<&Object> {
        gc::reachable(self)
    }

    /// Gaps between address-ordered objects, plus the total. See
    /// [`FragmentationReport`].
    pub fn fragmentation(&self) -> FragmentationReport {
        fragment::analyze(self)
    }

    /// Objects present in both heaps with identical address, type, kind,
    /// and size, flagged with whether their bytes also match.
    pub fn same(&self, other: &Heap) -> Vec<SharedObject> {
        diff::same(self, other)
    }

    /// Object counts grouped by type name, ascending by count.
    pub fn histogram(&self) -> Vec<TypeCount> {
        histogram::by_type(self)
    }

    /// Everything that points at `address`: heap objects, and whether any
    /// data or bss segment does.
    pub fn referrers(&self, address: u64) -> Referrers {
        inspect::referrers(self, address)
    }

    /// For an object of type "string", dereference its (data, len) header
    /// and return the payload when it resolves on the heap.
    pub fn string_value(&self, object: &Object) -> Option<String> {
        inspect::string_value(self, object)
    }

    /// An object's content sliced along its type's declared field
    /// offsets. Empty when the type is unknown.
    pub fn field_slices<'h>(&'h self, object: &'h Object) -> Vec<FieldSlice<'h>> {
        inspect::field_slices(self, object)
    }
}
