//! Normalized metadata model
//!
//! Entries here are produced by shorthand expansion and refined by the
//! remaining passes. Once wrapped in a [`crate::FinalizedGraph`] they are
//! never mutated again.

use crate::magic::MagicSpec;
use serde::{Serialize, Serializer};
use std::fmt;

/// Object id of `Date.prototype`
pub const BI_DATE_PROTOTYPE: &str = "bi_date_prototype";
/// Object id of `Function.prototype`
pub const BI_FUNCTION_PROTOTYPE: &str = "bi_function_prototype";
/// Object id of `Object.prototype`
pub const BI_OBJECT_PROTOTYPE: &str = "bi_object_prototype";
/// Object id of the `Duktape` object
pub const BI_DUKTAPE: &str = "bi_duktape";

/// Output target of a metadata load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Bit-packed init data unpacked at startup
    Ram,
    /// Static initializers in read-only memory
    Rom,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Ram => write!(f, "RAM"),
            Target::Rom => write!(f, "ROM"),
        }
    }
}

/// IEEE double stored as raw bits, so NaN payloads survive unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DoubleBits(pub u64);

impl DoubleBits {
    /// From a host double
    pub fn from_f64(value: f64) -> Self {
        DoubleBits(value.to_bits())
    }

    /// From 16 hex digits in big endian byte order
    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != 16 {
            return None;
        }
        u64::from_str_radix(hex, 16).ok().map(DoubleBits)
    }

    /// Host double value
    pub fn to_f64(self) -> f64 {
        f64::from_bits(self.0)
    }

    /// Bytes in big endian (network) order
    pub fn be_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// Value as a non-negative integer, if it is one
    pub fn as_u32(self) -> Option<u32> {
        let v = self.to_f64();
        if v.fract() == 0.0 && v >= 0.0 && v <= f64::from(u32::MAX) {
            Some(v as u32)
        } else {
            None
        }
    }
}

impl Serialize for DoubleBits {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{:016x}", self.0))
    }
}

/// Property value kinds shared by both encoders
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    /// Number
    Double(DoubleBits),
    /// Byte string
    String(#[serde(serialize_with = "crate::latin1::text::serialize")] Vec<u8>),
    /// Boolean
    Boolean(bool),
    /// Explicit null
    Null,
    /// Explicit undefined
    Undefined,
    /// Reference to another object by id
    Object(String),
    /// Getter/setter pair; either side may be missing
    Accessor {
        /// Getter object id
        getter: Option<String>,
        /// Setter object id
        setter: Option<String>,
    },
}

impl PropertyValue {
    /// Number value from an integer
    pub fn from_integer(value: i64) -> Self {
        PropertyValue::Double(DoubleBits::from_f64(value as f64))
    }

    /// Referenced object ids (object target, getter, setter)
    pub fn referenced_ids(&self) -> Vec<&str> {
        match self {
            PropertyValue::Object(id) => vec![id.as_str()],
            PropertyValue::Accessor { getter, setter } => {
                getter.iter().chain(setter.iter()).map(String::as_str).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Accessor typed value
    pub fn is_accessor(&self) -> bool {
        matches!(self, PropertyValue::Accessor { .. })
    }
}

/// Property attribute flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Attributes {
    /// `w`
    pub writable: bool,
    /// `e`
    pub enumerable: bool,
    /// `c`
    pub configurable: bool,
    /// `a`
    pub accessor: bool,
}

impl Attributes {
    /// No flags
    pub const NONE: Attributes = Attributes {
        writable: false,
        enumerable: false,
        configurable: false,
        accessor: false,
    };

    /// Default for data properties: writable, configurable
    pub const DATA_DEFAULT: Attributes = Attributes {
        writable: true,
        enumerable: false,
        configurable: true,
        accessor: false,
    };

    /// Default for accessor properties: configurable, accessor
    pub const ACCESSOR_DEFAULT: Attributes = Attributes {
        writable: false,
        enumerable: false,
        configurable: true,
        accessor: true,
    };

    /// Parse an attribute string; returns the offending character on error
    pub fn parse(text: &str) -> Result<Self, char> {
        let mut attrs = Attributes::NONE;
        for c in text.chars() {
            match c {
                'w' => attrs.writable = true,
                'e' => attrs.enumerable = true,
                'c' => attrs.configurable = true,
                'a' => attrs.accessor = true,
                other => return Err(other),
            }
        }
        Ok(attrs)
    }

    /// Canonical string form in `weca` order
    pub fn canonical(&self) -> String {
        let mut s = String::with_capacity(4);
        if self.writable {
            s.push('w');
        }
        if self.enumerable {
            s.push('e');
        }
        if self.configurable {
            s.push('c');
        }
        if self.accessor {
            s.push('a');
        }
        s
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical())
    }
}

/// Object class tags, numbered as in the runtime's object header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ObjectClass {
    /// No class
    Unused,
    /// Arguments object
    Arguments,
    /// Array
    Array,
    /// Boolean
    Boolean,
    /// Date
    Date,
    /// Error
    Error,
    /// Function
    Function,
    /// JSON
    #[serde(rename = "JSON")]
    Json,
    /// Math
    Math,
    /// Number
    Number,
    /// Object
    Object,
    /// RegExp
    RegExp,
    /// String
    String,
    /// Global object
    #[serde(rename = "global")]
    Global,
    /// Object environment record
    ObjEnv,
    /// Declarative environment record
    DecEnv,
    /// Buffer
    Buffer,
    /// Pointer
    Pointer,
    /// Thread
    Thread,
}

const CLASS_NAMES: [(&str, ObjectClass); 19] = [
    ("Unused", ObjectClass::Unused),
    ("Arguments", ObjectClass::Arguments),
    ("Array", ObjectClass::Array),
    ("Boolean", ObjectClass::Boolean),
    ("Date", ObjectClass::Date),
    ("Error", ObjectClass::Error),
    ("Function", ObjectClass::Function),
    ("JSON", ObjectClass::Json),
    ("Math", ObjectClass::Math),
    ("Number", ObjectClass::Number),
    ("Object", ObjectClass::Object),
    ("RegExp", ObjectClass::RegExp),
    ("String", ObjectClass::String),
    ("global", ObjectClass::Global),
    ("ObjEnv", ObjectClass::ObjEnv),
    ("DecEnv", ObjectClass::DecEnv),
    ("Buffer", ObjectClass::Buffer),
    ("Pointer", ObjectClass::Pointer),
    ("Thread", ObjectClass::Thread),
];

impl ObjectClass {
    /// Look up a class by its metadata name
    pub fn from_name(name: &str) -> Option<Self> {
        CLASS_NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, c)| *c)
    }

    /// Metadata name
    pub fn name(self) -> &'static str {
        CLASS_NAMES[self.number() as usize].0
    }

    /// Class number used by the runtime
    pub fn number(self) -> u32 {
        self as u32
    }
}

/// Where a string entry came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StringOrigin {
    /// Listed in a metadata document
    #[default]
    Document,
    /// Added because an object property references it
    PropertyReference,
    /// Added from an override's forced string list
    Forced,
}

/// Built-in string
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StringEntry {
    /// Content
    #[serde(rename = "str", serialize_with = "crate::latin1::text::serialize")]
    pub bytes: Vec<u8>,
    /// Reserved word in all contexts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserved_word: Option<bool>,
    /// Reserved word in strict mode only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub future_reserved_word_strict: Option<bool>,
    /// Needs an 8-bit stridx
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<bool>,
    /// `DUK_STRIDX_xxx` define name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub define: Option<String>,
    /// Needs a runtime string index
    pub stridx_used: bool,
    /// Assigned runtime string index
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stridx: Option<usize>,
    /// Provenance
    pub origin: StringOrigin,
}

impl StringEntry {
    /// Entry with no flags
    pub fn new(bytes: Vec<u8>, origin: StringOrigin) -> Self {
        StringEntry {
            bytes,
            origin,
            ..Default::default()
        }
    }

    /// Reserved word (includes strict-only reserved words)
    pub fn is_reserved_word(&self) -> bool {
        self.reserved_word == Some(true)
    }

    /// Reserved in strict mode only
    pub fn is_strict_reserved_word(&self) -> bool {
        self.future_reserved_word_strict == Some(true)
    }

    /// Must get a stridx below 256
    pub fn requires_narrow_index(&self) -> bool {
        self.class_name == Some(true)
    }

    /// Internal key, 0xFF prefixed
    pub fn is_internal(&self) -> bool {
        self.bytes.first() == Some(&0xff)
    }
}

/// Object property
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyEntry {
    /// Key
    #[serde(serialize_with = "crate::latin1::text::serialize")]
    pub key: Vec<u8>,
    /// Value
    pub value: PropertyValue,
    /// Attribute flags
    pub attributes: Attributes,
}

impl PropertyEntry {
    /// Property with explicit attributes
    pub fn new(key: impl Into<Vec<u8>>, value: PropertyValue, attributes: Attributes) -> Self {
        PropertyEntry {
            key: key.into(),
            value,
            attributes,
        }
    }
}

/// Built-in object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectEntry {
    /// Stable identifier
    pub id: String,
    /// Class tag
    pub class: ObjectClass,
    /// Internal prototype object id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_prototype: Option<String>,
    /// Native function name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native: Option<String>,
    /// Argument count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nargs: Option<u32>,
    /// Variable argument count
    pub varargs: bool,
    /// Has [[Call]]
    pub callable: bool,
    /// Has [[Construct]]
    pub constructable: bool,
    /// Magic value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magic: Option<MagicSpec>,
    /// Properties in order
    pub properties: Vec<PropertyEntry>,
    /// Reachable from the runtime by index
    pub bidx_used: bool,
    /// Assigned runtime index
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bidx: Option<usize>,
    /// Created by shorthand expansion
    pub synthetic: bool,
}

impl ObjectEntry {
    /// Empty object of the given class
    pub fn new(id: impl Into<String>, class: ObjectClass) -> Self {
        ObjectEntry {
            id: id.into(),
            class,
            internal_prototype: None,
            native: None,
            nargs: None,
            varargs: false,
            callable: false,
            constructable: false,
            magic: None,
            properties: Vec::new(),
            bidx_used: false,
            bidx: None,
            synthetic: false,
        }
    }

    /// Find a property by key
    pub fn property(&self, key: &[u8]) -> Option<&PropertyEntry> {
        self.properties.iter().find(|p| p.key == key)
    }

    /// Native function without a runtime index; its properties are created
    /// inline by the object referencing it
    pub fn is_inline_native(&self) -> bool {
        self.native.is_some() && self.bidx.is_none()
    }

    /// `DUK_BIDX_xxx` define name: `bi_foo_bar` becomes `DUK_BIDX_FOO_BAR`
    pub fn bidx_define(&self) -> String {
        let upper = self.id.to_ascii_uppercase();
        let rest: Vec<&str> = upper.split('_').skip(1).collect();
        format!("DUK_BIDX_{}", rest.join("_"))
    }
}
