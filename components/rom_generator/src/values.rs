//! Property value initializers
//!
//! Each property value maps to a record type and a literal built from the
//! `DUK__TVAL_xxx` macros.

use crate::error::{RomError, Result};
use crate::strings::StringSymbols;
use builtin_meta::{latin1, Attributes, DoubleBits, PropertyEntry, PropertyValue};
use gen_support::csource::c_byte_literal;
use std::collections::HashMap;

/// Record type and initializer literal for one value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueInit {
    /// `duk_rom_tval_xxx`
    pub type_name: &'static str,
    /// Initializer text
    pub literal: String,
}

/// Object id to C symbol
pub type ObjectSymbols = HashMap<String, String>;

/// `DUK__DBLBYTES(...)` with the big endian bytes of a double
pub fn double_bytes(bits: DoubleBits) -> String {
    let bytes: Vec<String> = bits.be_bytes().iter().map(|&b| c_byte_literal(b)).collect();
    format!("DUK__DBLBYTES({})", bytes.join(","))
}

fn object_symbol<'s>(objects: &'s ObjectSymbols, owner: &str, id: &str) -> Result<&'s str> {
    objects
        .get(id)
        .map(String::as_str)
        .ok_or_else(|| RomError::UnknownObject {
            from: owner.to_string(),
            target: id.to_string(),
        })
}

fn accessor_half<'s>(
    objects: &'s ObjectSymbols,
    owner: &str,
    p: &PropertyEntry,
    id: Option<&str>,
) -> Result<&'s str> {
    let id = id.ok_or_else(|| RomError::MalformedFunction {
        id: owner.to_string(),
        reason: format!("accessor {} lacks a getter or setter", latin1::to_text(&p.key)),
    })?;
    object_symbol(objects, owner, id)
}

/// Initializer for the value of property `p` of object `owner`
pub fn value_initializer(
    owner: &str,
    p: &PropertyEntry,
    strings: &StringSymbols,
    objects: &ObjectSymbols,
) -> Result<ValueInit> {
    let init = match &p.value {
        PropertyValue::Null => ValueInit {
            type_name: "duk_rom_tval_null",
            literal: "DUK__TVAL_NULL()".to_string(),
        },
        PropertyValue::Undefined => ValueInit {
            type_name: "duk_rom_tval_undefined",
            literal: "DUK__TVAL_UNDEFINED()".to_string(),
        },
        PropertyValue::Boolean(b) => ValueInit {
            type_name: "duk_rom_tval_boolean",
            literal: format!("DUK__TVAL_BOOLEAN({})", u8::from(*b)),
        },
        PropertyValue::Double(bits) => ValueInit {
            type_name: "duk_rom_tval_number",
            literal: format!("DUK__TVAL_NUMBER({})", double_bytes(*bits)),
        },
        PropertyValue::String(s) => {
            let symbol = strings.require(s, || {
                format!("object {}, property {}", owner, latin1::to_text(&p.key))
            })?;
            ValueInit {
                type_name: "duk_rom_tval_string",
                literal: format!("DUK__TVAL_STRING(&{})", symbol),
            }
        }
        PropertyValue::Object(id) => ValueInit {
            type_name: "duk_rom_tval_object",
            literal: format!("DUK__TVAL_OBJECT(&{})", object_symbol(objects, owner, id)?),
        },
        PropertyValue::Accessor { getter, setter } => ValueInit {
            type_name: "duk_rom_tval_accessor",
            literal: format!(
                "{{ (const duk_hobject *) &{}, (const duk_hobject *) &{} }}",
                accessor_half(objects, owner, p, getter.as_deref())?,
                accessor_half(objects, owner, p, setter.as_deref())?
            ),
        },
    };
    Ok(init)
}

/// `DUK_PROPDESC_FLAGS_xxx` expression for property attributes
///
/// ROM properties are never configurable, and accessors cannot carry a
/// writable flag.
pub fn attribute_flags(owner: &str, p: &PropertyEntry) -> Result<String> {
    let Attributes {
        writable,
        enumerable,
        configurable,
        accessor,
    } = p.attributes;
    if configurable || (accessor && writable) {
        return Err(RomError::UnsupportedAttributes {
            id: owner.to_string(),
            key: latin1::to_text(&p.key),
            attributes: p.attributes.canonical(),
        });
    }
    let mut letters = String::new();
    if writable {
        letters.push('W');
    }
    if enumerable {
        letters.push('E');
    }
    let mut flags = if letters.is_empty() {
        "DUK_PROPDESC_FLAGS_NONE".to_string()
    } else {
        format!("DUK_PROPDESC_FLAGS_{}", letters)
    };
    if accessor {
        flags.push_str("|DUK_PROPDESC_FLAG_ACCESSOR");
    }
    Ok(flags)
}
