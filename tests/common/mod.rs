//! Shared test fixture: a builder that synthesizes heap dump byte streams.
//!
//! The builder writes the wire format directly (varints, length-prefixed
//! strings, sentinel-terminated field lists) so tests can construct exact
//! dumps without fixture files, then decode them through the public API.

#![allow(dead_code)]

use std::io::Cursor;

use heapscope::Heap;

pub const HEADER_13: &[u8] = b"go1.3 heap dump\n";
pub const HEADER_17: &[u8] = b"go1.7 heap dump\n";

pub struct DumpBuilder {
    buf: Vec<u8>,
}

impl DumpBuilder {
    pub fn new() -> Self {
        Self::with_header(HEADER_13)
    }

    pub fn with_header(header: &[u8]) -> Self {
        DumpBuilder {
            buf: header.to_vec(),
        }
    }

    // ---- wire primitives ----------------------------------------------

    pub fn uvarint(&mut self, mut v: u64) -> &mut Self {
        loop {
            let mut byte = (v & 0x7f) as u8;
            v >>= 7;
            if v != 0 {
                byte |= 0x80;
            }
            self.buf.push(byte);
            if v == 0 {
                return self;
            }
        }
    }

    /// Length-prefixed byte string.
    pub fn bytes(&mut self, b: &[u8]) -> &mut Self {
        self.uvarint(b.len() as u64);
        self.buf.extend_from_slice(b);
        self
    }

    pub fn string(&mut self, s: &str) -> &mut Self {
        self.bytes(s.as_bytes())
    }

    /// Raw bytes, no length prefix.
    pub fn raw(&mut self, b: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(b);
        self
    }

    /// Field list: (kind, offset) pairs plus the terminating 0 kind.
    pub fn fields(&mut self, fields: &[(u64, u64)]) -> &mut Self {
        for &(kind, offset) in fields {
            self.uvarint(kind).uvarint(offset);
        }
        self.uvarint(0)
    }

    // ---- records -------------------------------------------------------

    /// Dump params: little-endian, 8-byte pointers, the given heap range.
    pub fn params(&mut self, start: u64, end: u64) -> &mut Self {
        self.params_full(false, 8, start, end)
    }

    pub fn params_full(&mut self, big_endian: bool, ptr_size: u64, start: u64, end: u64) -> &mut Self {
        self.uvarint(6)
            .uvarint(u64::from(big_endian))
            .uvarint(ptr_size)
            .uvarint(0) // channel header size
            .uvarint(start)
            .uvarint(end)
            .uvarint(6) // arch
            .string("") // GOEXPERIMENT
            .uvarint(4) // ncpu
    }

    pub fn object(&mut self, addr: u64, type_addr: u64, content: &[u8]) -> &mut Self {
        self.uvarint(1)
            .uvarint(addr)
            .uvarint(type_addr)
            .uvarint(0) // regular
            .bytes(content)
    }

    pub fn object_kind(&mut self, addr: u64, type_addr: u64, kind: u64, content: &[u8]) -> &mut Self {
        self.uvarint(1)
            .uvarint(addr)
            .uvarint(type_addr)
            .uvarint(kind)
            .bytes(content)
    }

    pub fn type_record(&mut self, addr: u64, size: u64, name: &str, fields: &[(u64, u64)]) -> &mut Self {
        self.uvarint(3)
            .uvarint(addr)
            .uvarint(size)
            .string(name)
            .uvarint(0) // is_ptr = false
            .fields(fields)
    }

    pub fn other_root(&mut self, description: &str, pointer: u64) -> &mut Self {
        self.uvarint(2).string(description).uvarint(pointer)
    }

    pub fn goroutine(&mut self, addr: u64, id: u64) -> &mut Self {
        self.uvarint(4)
            .uvarint(addr)
            .uvarint(0) // top
            .uvarint(id)
            .uvarint(0) // creator location
            .uvarint(1) // runnable
            .uvarint(0) // system
            .uvarint(0) // background
            .uvarint(0) // last waiting
            .string("") // wait reason
            .uvarint(0) // current frame
            .uvarint(0) // os thread
            .uvarint(0) // top defer
            .uvarint(0) // top panic
    }

    pub fn frame(&mut self, sp: u64, name: &str, content: &[u8]) -> &mut Self {
        self.uvarint(5)
            .uvarint(sp)
            .uvarint(0) // depth
            .uvarint(0) // child sp
            .bytes(content)
            .uvarint(0) // entry pc
            .uvarint(0) // current pc
            .uvarint(0) // continuation pc
            .string(name)
            .fields(&[])
    }

    pub fn finalizer(&mut self, object_addr: u64) -> &mut Self {
        self.uvarint(7)
            .uvarint(object_addr)
            .uvarint(0)
            .uvarint(0)
            .uvarint(0)
            .uvarint(0)
    }

    pub fn queued_finalizer(&mut self, object_addr: u64) -> &mut Self {
        self.uvarint(11)
            .uvarint(object_addr)
            .uvarint(0)
            .uvarint(0)
            .uvarint(0)
            .uvarint(0)
    }

    pub fn itab(&mut self, addr: u64, is_ptr: bool) -> &mut Self {
        self.uvarint(8).uvarint(addr).uvarint(u64::from(is_ptr))
    }

    pub fn os_thread(&mut self, addr: u64, go_id: u64, os_id: u64) -> &mut Self {
        self.uvarint(9).uvarint(addr).uvarint(go_id).uvarint(os_id)
    }

    /// MemStats with all counters zero except num_gc.
    pub fn mem_stats(&mut self, num_gc: u64) -> &mut Self {
        self.uvarint(10);
        for _ in 0..24 {
            self.uvarint(0);
        }
        for _ in 0..256 {
            self.uvarint(0);
        }
        self.uvarint(num_gc)
    }

    pub fn data_segment(&mut self, addr: u64, content: &[u8]) -> &mut Self {
        self.uvarint(12).uvarint(addr).bytes(content).fields(&[])
    }

    pub fn bss_segment(&mut self, addr: u64, content: &[u8]) -> &mut Self {
        self.uvarint(13).uvarint(addr).bytes(content).fields(&[])
    }

    pub fn defer_record(&mut self, addr: u64, goroutine: u64) -> &mut Self {
        self.uvarint(14)
            .uvarint(addr)
            .uvarint(goroutine)
            .uvarint(0)
            .uvarint(0)
            .uvarint(0)
            .uvarint(0)
            .uvarint(0)
    }

    pub fn panic_record(&mut self, addr: u64, goroutine: u64) -> &mut Self {
        self.uvarint(15)
            .uvarint(addr)
            .uvarint(goroutine)
            .uvarint(0)
            .uvarint(0)
            .uvarint(0)
            .uvarint(0)
    }

    pub fn mem_prof(&mut self, record: u64, size: u64, frames: &[(&str, &str, u64)]) -> &mut Self {
        self.uvarint(16)
            .uvarint(record)
            .uvarint(size)
            .uvarint(frames.len() as u64);
        for &(name, file, line) in frames {
            self.string(name).string(file).uvarint(line);
        }
        self.uvarint(1).uvarint(0) // allocs, frees
    }

    pub fn alloc_sample(&mut self, object_addr: u64, record: u64) -> &mut Self {
        self.uvarint(17).uvarint(object_addr).uvarint(record)
    }

    // ---- finishing -----------------------------------------------------

    /// The dump bytes, EOF record appended.
    pub fn build(&self) -> Vec<u8> {
        let mut out = self.buf.clone();
        out.push(0);
        out
    }

    /// The dump bytes as written, without an EOF record.
    pub fn build_without_eof(&self) -> Vec<u8> {
        self.buf.clone()
    }

    /// Decode through the public API.
    pub fn heap(&self) -> heapscope::Result<Heap> {
        Heap::from_reader(Cursor::new(self.build()))
    }
}

/// A little-endian 8-byte pointer word.
pub fn ptr(addr: u64) -> [u8; 8] {
    addr.to_le_bytes()
}

/// Content made of consecutive little-endian 8-byte pointer words.
pub fn ptr_content(addrs: &[u64]) -> Vec<u8> {
    let mut content = Vec::with_capacity(addrs.len() * 8);
    for &a in addrs {
        content.extend_from_slice(&ptr(a));
    }
    content
}
