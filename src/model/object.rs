use serde::{Deserialize, Serialize};

/// Object kind as tagged by the dumper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Regular,
    Array,
    Channel,
    /// Conservatively scanned: the collector had no type information and
    /// treated every word as a potential pointer.
    Conservative,
    /// A kind value outside the documented set, preserved verbatim.
    Other(u64),
}

impl ObjectKind {
    pub fn from_value(v: u64) -> Self {
        match v {
            0 => ObjectKind::Regular,
            1 => ObjectKind::Array,
            2 => ObjectKind::Channel,
            127 => ObjectKind::Conservative,
            other => ObjectKind::Other(other),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Regular => "regular",
            ObjectKind::Array => "array",
            ObjectKind::Channel => "channel",
            ObjectKind::Conservative => "conservatively scanned",
            ObjectKind::Other(_) => "unknown",
        }
    }
}

/// A single heap object: an address, an optional type descriptor address,
/// and the raw bytes captured at dump time.
///
/// The type back-reference is deliberately not stored here; type records
/// may arrive after the objects that use them, so resolution goes through
/// [`Heap::type_of`](crate::Heap::type_of).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Object {
    pub address: u64,
    /// Address of the type descriptor, or 0 when the dumper had none.
    pub type_address: u64,
    pub kind: ObjectKind,
    /// Raw object bytes. Opaque; may contain anything.
    pub content: Vec<u8>,
}

impl Object {
    /// Size of the object as captured, i.e. the content length.
    pub fn size(&self) -> usize {
        self.content.len()
    }
}
