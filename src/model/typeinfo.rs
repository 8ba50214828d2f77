use serde::{Deserialize, Serialize};

/// Kind of a pointer-bearing slot inside an object, segment, or frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Ptr,
    String,
    Slice,
    Iface,
    Eface,
    Other(u64),
}

impl FieldKind {
    pub fn from_value(v: u64) -> Self {
        match v {
            1 => FieldKind::Ptr,
            2 => FieldKind::String,
            3 => FieldKind::Slice,
            4 => FieldKind::Iface,
            5 => FieldKind::Eface,
            other => FieldKind::Other(other),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Ptr => "ptr",
            FieldKind::String => "string",
            FieldKind::Slice => "slice",
            FieldKind::Iface => "iface",
            FieldKind::Eface => "eface",
            FieldKind::Other(_) => "unknown",
        }
    }
}

/// One entry of a field list: the kind of a pointer-bearing slot and its
/// byte offset within the containing content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub kind: FieldKind,
    pub offset: u64,
}

/// A type descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    /// Address of the type descriptor; the key objects reference.
    pub address: u64,
    /// Size in bytes of an object of this type.
    pub size: u64,
    pub name: String,
    /// Whether the data field of an interface holding this type is a
    /// pointer.
    pub is_ptr: bool,
    /// Pointer-bearing fields of objects of this type.
    pub fields: Vec<Field>,
}

/// An interface dispatch table entry. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ITab {
    pub address: u64,
    /// Whether the data word of an interface with this itab is a pointer.
    pub is_ptr: bool,
}
