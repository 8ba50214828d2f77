//! Pointer scanning of opaque content bytes.
//!
//! Object, segment, and stack frame contents are captured verbatim by the
//! dumper. Candidate pointers are recovered by walking the bytes in
//! pointer-size strides and decoding each stride as an unsigned word under
//! the dump's byte order. Whether a word is actually a pointer is decided
//! by the caller, by looking the address up in the object table.

use crate::model::DumpParams;

/// Objects larger than this are not scanned for children. The bound keeps
/// a single enormous allocation (a giant byte slice, typically) from
/// dominating every traversal that touches it.
pub(crate) const CHILD_SCAN_CEILING: usize = 2_252_800;

/// Decode every pointer-size stride of `content` as a candidate address.
///
/// Trailing bytes that do not fill a whole stride are ignored. A pointer
/// size outside 1..=8 yields no candidates; the supported dumpers only
/// ever write 4 or 8.
pub(crate) fn pointer_words(content: &[u8], params: &DumpParams) -> Vec<u64> {
    let ptr_size = params.ptr_size as usize;
    if !(1..=8).contains(&ptr_size) {
        return Vec::new();
    }
    content
        .chunks_exact(ptr_size)
        .map(|word| decode_word(word, params.big_endian))
        .collect()
}

fn decode_word(word: &[u8], big_endian: bool) -> u64 {
    if big_endian {
        word.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
    } else {
        word.iter().rev().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(ptr_size: u64, big_endian: bool) -> DumpParams {
        DumpParams {
            big_endian,
            ptr_size,
            ch_hdr_size: 0,
            heap_start: 0,
            heap_end: 0,
            arch: 6,
            go_experiment: String::new(),
            ncpu: 1,
        }
    }

    #[test]
    fn little_endian_words() {
        let content = [0x00, 0x20, 0, 0, 0, 0, 0, 0, 0x00, 0x30, 0, 0, 0, 0, 0, 0];
        assert_eq!(pointer_words(&content, &params(8, false)), vec![0x2000, 0x3000]);
    }

    #[test]
    fn big_endian_words() {
        let content = [0, 0, 0, 0, 0, 0, 0x20, 0x00];
        assert_eq!(pointer_words(&content, &params(8, true)), vec![0x2000]);
    }

    #[test]
    fn four_byte_pointers() {
        let content = [0x00, 0x10, 0x00, 0x00, 0xef, 0xbe, 0xad, 0xde];
        assert_eq!(
            pointer_words(&content, &params(4, false)),
            vec![0x1000, 0xdead_beef]
        );
    }

    #[test]
    fn trailing_bytes_ignored() {
        // 11 bytes with 8-byte strides: one word, three bytes dropped.
        let mut content = vec![0u8; 8];
        content[0] = 0x42;
        content.extend([0xff, 0xff, 0xff]);
        assert_eq!(pointer_words(&content, &params(8, false)), vec![0x42]);
    }

    #[test]
    fn empty_content() {
        assert!(pointer_words(&[], &params(8, false)).is_empty());
    }

    #[test]
    fn degenerate_pointer_size() {
        let content = [1, 2, 3, 4, 5, 6, 7, 8];
        assert!(pointer_words(&content, &params(0, false)).is_empty());
        assert!(pointer_words(&content, &params(16, false)).is_empty());
    }

    #[test]
    fn scan_is_deterministic() {
        let content: Vec<u8> = (0..64).collect();
        let p = params(8, false);
        assert_eq!(pointer_words(&content, &p), pointer_words(&content, &p));
    }
}
