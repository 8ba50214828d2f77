//! The tag-dispatched record decoder.
//!
//! A dump is a stream of records, each a varint tag followed by a
//! tag-specific payload. Decoding is hand-written per tag; the payload
//! shapes are fixed by the dump format and small enough that explicit
//! readers beat any generic scheme on both clarity and error sites.
//!
//! Ownership is an ordering invariant of the stream, not of this module:
//! stack frame, defer, and panic records belong to the most recently
//! decoded goroutine, and alloc samples to the most recently decoded
//! profile record. The store's load loop tracks those cursors; this
//! decoder just produces values.

use std::io::Read;

use crate::error::{Error, Result};
use crate::model::{
    AllocSample, DeferRecord, DumpParams, Finalizer, Goroutine, GoroutineStatus, ITab, MemProf,
    MemStats, Object, ObjectKind, OsThread, PanicRecord, ProfFrame, Root, Segment, StackFrame,
    TypeInfo,
};
use crate::reader::ByteReader;

/// Record tags as written by the dumper.
pub mod tag {
    pub const EOF: u64 = 0;
    pub const OBJECT: u64 = 1;
    pub const OTHER_ROOT: u64 = 2;
    pub const TYPE: u64 = 3;
    pub const GOROUTINE: u64 = 4;
    pub const STACK_FRAME: u64 = 5;
    pub const PARAMS: u64 = 6;
    pub const FINALIZER: u64 = 7;
    pub const ITAB: u64 = 8;
    pub const OS_THREAD: u64 = 9;
    pub const MEM_STATS: u64 = 10;
    pub const QUEUED_FINALIZER: u64 = 11;
    pub const DATA: u64 = 12;
    pub const BSS: u64 = 13;
    pub const DEFER: u64 = 14;
    pub const PANIC: u64 = 15;
    pub const MEM_PROF: u64 = 16;
    pub const ALLOC_SAMPLE: u64 = 17;
}

/// One decoded record.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Eof,
    Object(Object),
    OtherRoot(Root),
    Type(TypeInfo),
    Goroutine(Goroutine),
    StackFrame(StackFrame),
    Params(DumpParams),
    Finalizer(Finalizer),
    ITab(ITab),
    OsThread(OsThread),
    MemStats(Box<MemStats>),
    QueuedFinalizer(Finalizer),
    Data(Segment),
    Bss(Segment),
    Defer(DeferRecord),
    Panic(PanicRecord),
    MemProf(MemProf),
    AllocSample(AllocSample),
}

impl Record {
    /// Read the next record: one tag varint, then the per-tag payload.
    pub fn read<R: Read>(r: &mut ByteReader<R>) -> Result<Record> {
        let tag = r.read_uvarint()?;
        match tag {
            tag::EOF => Ok(Record::Eof),
            tag::OBJECT => read_object(r).map(Record::Object),
            tag::OTHER_ROOT => read_other_root(r).map(Record::OtherRoot),
            tag::TYPE => read_type(r).map(Record::Type),
            tag::GOROUTINE => read_goroutine(r).map(Record::Goroutine),
            tag::STACK_FRAME => read_stack_frame(r).map(Record::StackFrame),
            tag::PARAMS => read_params(r).map(Record::Params),
            tag::FINALIZER => read_finalizer(r).map(Record::Finalizer),
            tag::ITAB => read_itab(r).map(Record::ITab),
            tag::OS_THREAD => read_os_thread(r).map(Record::OsThread),
            tag::MEM_STATS => read_mem_stats(r).map(|m| Record::MemStats(Box::new(m))),
            tag::QUEUED_FINALIZER => read_finalizer(r).map(Record::QueuedFinalizer),
            tag::DATA => read_segment(r).map(Record::Data),
            tag::BSS => read_segment(r).map(Record::Bss),
            tag::DEFER => read_defer(r).map(Record::Defer),
            tag::PANIC => read_panic(r).map(Record::Panic),
            tag::MEM_PROF => read_mem_prof(r).map(Record::MemProf),
            tag::ALLOC_SAMPLE => read_alloc_sample(r).map(Record::AllocSample),
            tag => Err(Error::InvalidTag {
                tag,
                offset: r.offset(),
            }),
        }
    }
}

fn read_object<R: Read>(r: &mut ByteReader<R>) -> Result<Object> {
    Ok(Object {
        address: r.read_uvarint()?,
        type_address: r.read_uvarint()?,
        kind: ObjectKind::from_value(r.read_uvarint()?),
        content: r.read_bytes()?,
    })
}

fn read_other_root<R: Read>(r: &mut ByteReader<R>) -> Result<Root> {
    Ok(Root {
        description: r.read_string()?,
        pointer: r.read_uvarint()?,
    })
}

fn read_type<R: Read>(r: &mut ByteReader<R>) -> Result<TypeInfo> {
    Ok(TypeInfo {
        address: r.read_uvarint()?,
        size: r.read_uvarint()?,
        name: r.read_string()?,
        is_ptr: r.read_bool()?,
        fields: r.read_fields()?,
    })
}

fn read_goroutine<R: Read>(r: &mut ByteReader<R>) -> Result<Goroutine> {
    Ok(Goroutine {
        address: r.read_uvarint()?,
        top: r.read_uvarint()?,
        id: r.read_uvarint()?,
        location: r.read_uvarint()?,
        status: GoroutineStatus::from_value(r.read_uvarint()?),
        system: r.read_bool()?,
        background: r.read_bool()?,
        last_waiting: r.read_uvarint()?,
        wait_reason: r.read_string()?,
        current_frame: r.read_uvarint()?,
        os_thread: r.read_uvarint()?,
        top_defer: r.read_uvarint()?,
        top_panic: r.read_uvarint()?,
        frames: Vec::new(),
        defers: Vec::new(),
        panics: Vec::new(),
    })
}

fn read_stack_frame<R: Read>(r: &mut ByteReader<R>) -> Result<StackFrame> {
    Ok(StackFrame {
        stack_pointer: r.read_uvarint()?,
        depth: r.read_uvarint()?,
        child_pointer: r.read_uvarint()?,
        content: r.read_bytes()?,
        entry_pc: r.read_uvarint()?,
        current_pc: r.read_uvarint()?,
        continuation_pc: r.read_uvarint()?,
        name: r.read_string()?,
        fields: r.read_fields()?,
    })
}

fn read_params<R: Read>(r: &mut ByteReader<R>) -> Result<DumpParams> {
    Ok(DumpParams {
        big_endian: r.read_bool()?,
        ptr_size: r.read_uvarint()?,
        ch_hdr_size: r.read_uvarint()?,
        heap_start: r.read_uvarint()?,
        heap_end: r.read_uvarint()?,
        arch: r.read_uvarint()?,
        go_experiment: r.read_string()?,
        ncpu: r.read_uvarint()?,
    })
}

fn read_finalizer<R: Read>(r: &mut ByteReader<R>) -> Result<Finalizer> {
    Ok(Finalizer {
        object_address: r.read_uvarint()?,
        funcval: r.read_uvarint()?,
        pc: r.read_uvarint()?,
        arg_type: r.read_uvarint()?,
        object_type: r.read_uvarint()?,
    })
}

fn read_itab<R: Read>(r: &mut ByteReader<R>) -> Result<ITab> {
    Ok(ITab {
        address: r.read_uvarint()?,
        is_ptr: r.read_bool()?,
    })
}

fn read_os_thread<R: Read>(r: &mut ByteReader<R>) -> Result<OsThread> {
    Ok(OsThread {
        address: r.read_uvarint()?,
        go_id: r.read_uvarint()?,
        os_id: r.read_uvarint()?,
    })
}

fn read_mem_stats<R: Read>(r: &mut ByteReader<R>) -> Result<MemStats> {
    Ok(MemStats {
        alloc: r.read_uvarint()?,
        total_alloc: r.read_uvarint()?,
        sys: r.read_uvarint()?,
        lookups: r.read_uvarint()?,
        mallocs: r.read_uvarint()?,
        frees: r.read_uvarint()?,
        heap_alloc: r.read_uvarint()?,
        heap_sys: r.read_uvarint()?,
        heap_idle: r.read_uvarint()?,
        heap_inuse: r.read_uvarint()?,
        heap_released: r.read_uvarint()?,
        heap_objects: r.read_uvarint()?,
        stack_inuse: r.read_uvarint()?,
        stack_sys: r.read_uvarint()?,
        mspan_inuse: r.read_uvarint()?,
        mspan_sys: r.read_uvarint()?,
        mcache_inuse: r.read_uvarint()?,
        mcache_sys: r.read_uvarint()?,
        buck_hash_sys: r.read_uvarint()?,
        gc_sys: r.read_uvarint()?,
        other_sys: r.read_uvarint()?,
        next_gc: r.read_uvarint()?,
        last_gc: r.read_uvarint()?,
        pause_total_ns: r.read_uvarint()?,
        pause_ns: r.read_uvarint_array()?,
        num_gc: r.read_uvarint()?,
    })
}

fn read_segment<R: Read>(r: &mut ByteReader<R>) -> Result<Segment> {
    Ok(Segment {
        address: r.read_uvarint()?,
        content: r.read_bytes()?,
        fields: r.read_fields()?,
    })
}

fn read_defer<R: Read>(r: &mut ByteReader<R>) -> Result<DeferRecord> {
    Ok(DeferRecord {
        address: r.read_uvarint()?,
        goroutine: r.read_uvarint()?,
        stack_pointer: r.read_uvarint()?,
        pc: r.read_uvarint()?,
        funcval: r.read_uvarint()?,
        entry_pc: r.read_uvarint()?,
        next: r.read_uvarint()?,
    })
}

fn read_panic<R: Read>(r: &mut ByteReader<R>) -> Result<PanicRecord> {
    Ok(PanicRecord {
        address: r.read_uvarint()?,
        goroutine: r.read_uvarint()?,
        type_ptr: r.read_uvarint()?,
        data: r.read_uvarint()?,
        defer_ptr: r.read_uvarint()?,
        next: r.read_uvarint()?,
    })
}

fn read_mem_prof<R: Read>(r: &mut ByteReader<R>) -> Result<MemProf> {
    let record = r.read_uvarint()?;
    let size = r.read_uvarint()?;
    let num_frames = r.read_uvarint()?;
    // The frame count is declared up front; the frames are not
    // sentinel-terminated like field lists.
    let mut frames = Vec::with_capacity(num_frames.min(1 << 10) as usize);
    for _ in 0..num_frames {
        frames.push(ProfFrame {
            name: r.read_string()?,
            file: r.read_string()?,
            line: r.read_uvarint()?,
        });
    }
    Ok(MemProf {
        record,
        size,
        frames,
        allocs: r.read_uvarint()?,
        frees: r.read_uvarint()?,
    })
}

fn read_alloc_sample<R: Read>(r: &mut ByteReader<R>) -> Result<AllocSample> {
    Ok(AllocSample {
        object_address: r.read_uvarint()?,
        record: r.read_uvarint()?,
    })
}
