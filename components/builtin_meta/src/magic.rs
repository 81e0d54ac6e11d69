//! Native function magic values
//!
//! A magic value is a 16-bit payload the runtime passes to a native function
//! to select a behavior variant. Metadata writes it either as a plain
//! integer or as a typed selector into one of a few closed tables that the
//! runtime switches on.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Smallest plain magic value
pub const MAGIC_MIN: i64 = -0x8000;
/// Largest plain magic value
pub const MAGIC_MAX: i64 = 0x7fff;

/// Magic resolution errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MagicError {
    /// Plain value outside the signed 16-bit range
    #[error("invalid plain value for magic: {0}")]
    OutOfRange(i64),

    /// Name not present in the selected table
    #[error("unknown {table} magic name {name:?}")]
    UnknownName {
        /// Table name
        table: &'static str,
        /// Name as written
        name: String,
    },

    /// A required flag of a buffer field selector is absent
    #[error("buffer field magic is missing {0:?}")]
    MissingFlag(&'static str),

    /// Typed array shift does not fit the encoding
    #[error("typed array shift {0} out of range")]
    InvalidShift(u32),

    /// Referenced object has no runtime index
    #[error("magic references object {0} which has no index")]
    UnknownObject(String),
}

/// Magic value as written in metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MagicSpec {
    /// Plain signed 16-bit value
    Integer(i64),
    /// Typed selector
    Typed(TypedMagic),
}

/// Typed magic selectors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TypedMagic {
    /// Runtime index of another built-in object
    Bidx {
        /// Object id
        id: String,
    },
    /// Plain signed 16-bit value
    Plain {
        /// The value
        value: i64,
    },
    /// One-argument Math function
    MathOnearg {
        /// Function name, e.g. `cos`
        funcname: String,
    },
    /// Two-argument Math function
    MathTwoarg {
        /// Function name, e.g. `pow`
        funcname: String,
    },
    /// Array iteration kind
    ArrayIter {
        /// Iterator name, e.g. `forEach`
        funcname: String,
    },
    /// Typed array constructor element type and shift
    TypedarrayConstructor {
        /// Element type name
        elem: String,
        /// log2 of the element size
        shift: u32,
    },
    /// Buffer field read
    BufferReadfield(FieldAccess),
    /// Buffer field write
    BufferWritefield(FieldAccess),
}

/// Buffer field accessor selector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldAccess {
    /// Field kind (`8bit`, `16bit`, ...)
    pub elem: String,
    /// Signed access
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed: Option<bool>,
    /// Big endian access
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bigendian: Option<bool>,
    /// Typed array (as opposed to Node.js Buffer) method
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typedarray: Option<bool>,
}

const MATH_ONEARG: &[&str] = &[
    "fabs", "acos", "asin", "atan", "ceil", "cos", "exp", "floor", "log", "round", "sin", "sqrt",
    "tan",
];
const MATH_TWOARG: &[&str] = &["atan2", "pow"];
const ARRAY_ITER: &[&str] = &["every", "some", "forEach", "map", "filter"];
const FIELD_ELEM: &[&str] = &["8bit", "16bit", "32bit", "float", "double", "varint"];
const TYPEDARRAY_ELEM: &[&str] = &[
    "uint8",
    "uint8clamped",
    "int8",
    "uint16",
    "int16",
    "uint32",
    "int32",
    "float32",
    "float64",
];

fn lookup(table: &'static str, names: &[&str], name: &str) -> Result<u16, MagicError> {
    names
        .iter()
        .position(|n| *n == name)
        .map(|i| i as u16)
        .ok_or_else(|| MagicError::UnknownName {
            table,
            name: name.to_string(),
        })
}

fn plain(value: i64) -> Result<u16, MagicError> {
    if !(MAGIC_MIN..=MAGIC_MAX).contains(&value) {
        return Err(MagicError::OutOfRange(value));
    }
    Ok((value & 0xffff) as u16)
}

fn field_access(access: &FieldAccess) -> Result<u16, MagicError> {
    let elem = lookup("buffer field", FIELD_ELEM, &access.elem)?;
    let signed = access.signed.ok_or(MagicError::MissingFlag("signed"))?;
    let bigendian = access.bigendian.ok_or(MagicError::MissingFlag("bigendian"))?;
    let typedarray = access
        .typedarray
        .ok_or(MagicError::MissingFlag("typedarray"))?;
    Ok(elem + (u16::from(signed) << 4) + (u16::from(bigendian) << 3) + (u16::from(typedarray) << 5))
}

/// Resolve a magic spec to its 16-bit encoding
///
/// `object_index` maps object ids to the index the consuming decoder uses
/// for `bidx` selectors. An absent spec resolves to 0.
pub fn resolve_magic(
    spec: Option<&MagicSpec>,
    object_index: &HashMap<String, usize>,
) -> Result<u16, MagicError> {
    let typed = match spec {
        None => return Ok(0),
        Some(MagicSpec::Integer(v)) => return plain(*v),
        Some(MagicSpec::Typed(t)) => t,
    };

    match typed {
        TypedMagic::Bidx { id } => object_index
            .get(id)
            .and_then(|i| u16::try_from(*i).ok())
            .ok_or_else(|| MagicError::UnknownObject(id.clone())),
        TypedMagic::Plain { value } => plain(*value),
        TypedMagic::MathOnearg { funcname } => lookup("math_onearg", MATH_ONEARG, funcname),
        TypedMagic::MathTwoarg { funcname } => lookup("math_twoarg", MATH_TWOARG, funcname),
        TypedMagic::ArrayIter { funcname } => lookup("array_iter", ARRAY_ITER, funcname),
        TypedMagic::TypedarrayConstructor { elem, shift } => {
            let elem = lookup("typedarray_constructor", TYPEDARRAY_ELEM, elem)?;
            if *shift > 3 {
                return Err(MagicError::InvalidShift(*shift));
            }
            Ok((elem << 2) + *shift as u16)
        }
        TypedMagic::BufferReadfield(access) | TypedMagic::BufferWritefield(access) => {
            field_access(access)
        }
    }
}
