//! Single-object inspection helpers: who points here, string payloads,
//! and the typed field view of an object's bytes.

use serde::Serialize;

use crate::heap::Heap;
use crate::model::{Field, Object, Segment};
use crate::scan;

/// Everything found pointing at one address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Referrers {
    /// Addresses of heap objects with at least one pointer to the target,
    /// ascending.
    pub objects: Vec<u64>,
    /// Whether a data segment points at the target.
    pub data_segment: bool,
    /// Whether a bss segment points at the target.
    pub bss_segment: bool,
}

impl Referrers {
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && !self.data_segment && !self.bss_segment
    }
}

pub(crate) fn referrers(heap: &Heap, address: u64) -> Referrers {
    let mut objects: Vec<u64> = heap
        .objects()
        .filter(|o| heap.children(o).iter().any(|c| c.address == address))
        .map(|o| o.address)
        .collect();
    objects.sort_unstable();

    let points_at = |segments: &[Segment]| {
        segments
            .iter()
            .any(|s| heap.segment_objects(s).iter().any(|o| o.address == address))
    };

    Referrers {
        data_segment: points_at(heap.data_segments()),
        bss_segment: points_at(heap.bss_segments()),
        objects,
    }
}

/// Dereference a string object's (data pointer, length) header.
///
/// Returns `None` unless the object's resolved type is named "string",
/// the content is at least two pointer words, and the data pointer
/// resolves to a heap object. The length is honored but clamped to the
/// payload object's size.
pub(crate) fn string_value(heap: &Heap, object: &Object) -> Option<String> {
    let type_info = heap.type_of(object)?;
    if type_info.name != "string" {
        return None;
    }
    let params = heap.dump_params()?;
    let words = scan::pointer_words(&object.content, params);
    let (&data_ptr, &len) = (words.first()?, words.get(1)?);

    let payload = heap.object(data_ptr)?;
    let len = (len as usize).min(payload.size());
    Some(String::from_utf8_lossy(&payload.content[..len]).into_owned())
}

/// One declared field of an object, paired with its content bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSlice<'a> {
    pub field: Field,
    /// Bytes from this field's offset up to the next field's offset (or
    /// the end of content for the last field).
    pub bytes: &'a [u8],
}

pub(crate) fn field_slices<'h>(heap: &'h Heap, object: &'h Object) -> Vec<FieldSlice<'h>> {
    let Some(type_info) = heap.type_of(object) else {
        return Vec::new();
    };
    let len = object.content.len() as u64;
    let fields = &type_info.fields;

    fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let start = field.offset.min(len);
            let end = match fields.get(i + 1) {
                Some(next) => next.offset.min(len).max(start),
                None => len,
            };
            FieldSlice {
                field: *field,
                bytes: &object.content[start as usize..end as usize],
            }
        })
        .collect()
}
