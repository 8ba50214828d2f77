use serde::{Deserialize, Serialize};

use super::Field;

/// Scheduler status of a goroutine at dump time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoroutineStatus {
    Idle,
    Runnable,
    Syscall,
    Waiting,
    Other(u64),
}

impl GoroutineStatus {
    pub fn from_value(v: u64) -> Self {
        match v {
            0 => GoroutineStatus::Idle,
            1 => GoroutineStatus::Runnable,
            3 => GoroutineStatus::Syscall,
            4 => GoroutineStatus::Waiting,
            other => GoroutineStatus::Other(other),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GoroutineStatus::Idle => "idle",
            GoroutineStatus::Runnable => "runnable",
            GoroutineStatus::Syscall => "syscall",
            GoroutineStatus::Waiting => "waiting",
            GoroutineStatus::Other(_) => "unknown",
        }
    }
}

/// A goroutine descriptor plus the stack frames, defer records, and panic
/// records that followed it in the record stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goroutine {
    /// Address of the goroutine descriptor.
    pub address: u64,
    /// Pointer to the top of the stack (the currently running frame).
    pub top: u64,
    pub id: u64,
    /// Location of the go statement that created this goroutine.
    pub location: u64,
    pub status: GoroutineStatus,
    /// Started by the runtime rather than user code.
    pub system: bool,
    pub background: bool,
    /// Approximate time the goroutine last started waiting, ns since epoch.
    pub last_waiting: u64,
    pub wait_reason: String,
    /// Context pointer of the currently running frame.
    pub current_frame: u64,
    /// Address of the OS thread descriptor (M), or 0.
    pub os_thread: u64,
    /// Top defer record, or 0.
    pub top_defer: u64,
    /// Top panic record, or 0.
    pub top_panic: u64,
    /// Stack frames in stream order (depth 0 first).
    pub frames: Vec<StackFrame>,
    pub defers: Vec<DeferRecord>,
    pub panics: Vec<PanicRecord>,
}

impl Goroutine {
    /// The wait reason, if the goroutine was actually waiting.
    pub fn waiting_reason(&self) -> Option<&str> {
        match self.status {
            GoroutineStatus::Waiting => Some(&self.wait_reason),
            _ => None,
        }
    }
}

/// One stack frame of a goroutine, with its captured bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackFrame {
    /// Stack pointer; the lowest address in the frame.
    pub stack_pointer: u64,
    /// Depth in the stack; 0 is the top.
    pub depth: u64,
    /// Stack pointer of the child frame, or 0.
    pub child_pointer: u64,
    /// Raw frame bytes. Opaque.
    pub content: Vec<u8>,
    pub entry_pc: u64,
    pub current_pc: u64,
    /// Where the function may resume, if anywhere.
    pub continuation_pc: u64,
    pub name: String,
    pub fields: Vec<Field>,
}

/// A deferred call record, linked per goroutine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeferRecord {
    pub address: u64,
    pub goroutine: u64,
    pub stack_pointer: u64,
    pub pc: u64,
    pub funcval: u64,
    pub entry_pc: u64,
    /// Next defer record in the chain, or 0.
    pub next: u64,
}

/// An in-flight panic record, linked per goroutine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanicRecord {
    pub address: u64,
    pub goroutine: u64,
    /// Type pointer of the panic argument eface.
    pub type_ptr: u64,
    /// Data field of the panic argument eface.
    pub data: u64,
    /// Defer record currently running, or 0.
    pub defer_ptr: u64,
    /// Next panic record in the chain, or 0.
    pub next: u64,
}

/// An OS thread (M) descriptor. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsThread {
    pub address: u64,
    /// The runtime's internal id for the thread.
    pub go_id: u64,
    /// The operating system's id for the thread.
    pub os_id: u64,
}
