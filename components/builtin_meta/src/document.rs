//! Metadata document types
//!
//! These mirror the on-disk YAML (and JSON) layout directly. Nothing here is
//! normalized: shorthand values, optional attributes and action flags are
//! carried as written and resolved by the passes in [`crate::normalize`] and
//! [`crate::shorthand`].

use crate::error::{MetadataError, Result};
use crate::magic::MagicSpec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Base metadata document (strings and/or objects)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BaseDocument {
    /// Built-in strings
    #[serde(default)]
    pub strings: Vec<RawString>,

    /// Strings whose define name is not derived from their content
    #[serde(default)]
    pub special_define_names: BTreeMap<String, String>,

    /// Reserved words in lexer token order
    #[serde(default)]
    pub reserved_word_token_order: Vec<String>,

    /// Objects needing a runtime index, in index order
    #[serde(default)]
    pub builtins: Vec<BuiltinRef>,

    /// Built-in objects
    #[serde(default)]
    pub objects: Vec<RawObject>,
}

impl BaseDocument {
    /// Parse a base document from YAML text
    pub fn from_yaml_str(name: &str, text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|source| MetadataError::Yaml {
            document: name.to_string(),
            source,
        })
    }
}

/// Entry of the `builtins` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltinRef {
    /// Object id
    pub id: String,
}

/// User override document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverrideDocument {
    /// Objects to add, replace, modify or delete
    #[serde(default)]
    pub objects: Vec<RawObject>,

    /// Extra strings merged with the base strings
    #[serde(default)]
    pub strings: Vec<RawString>,

    /// Strings forced into the read-only string table
    #[serde(default)]
    pub add_forced_strings: Vec<RawString>,

    #[serde(default)]
    add_objects: Option<serde_yaml::Value>,
    #[serde(default)]
    replace_objects: Option<serde_yaml::Value>,
    #[serde(default)]
    modify_objects: Option<serde_yaml::Value>,
}

impl OverrideDocument {
    /// Parse an override document from YAML text
    pub fn from_yaml_str(name: &str, text: &str) -> Result<Self> {
        let doc: Self = serde_yaml::from_str(text).map_err(|source| MetadataError::Yaml {
            document: name.to_string(),
            source,
        })?;
        doc.check_legacy_keys()?;
        Ok(doc)
    }

    /// Reject top level keys from the old override format
    pub fn check_legacy_keys(&self) -> Result<()> {
        if self.add_objects.is_some() {
            return Err(MetadataError::LegacyOverrideKey("add_objects"));
        }
        if self.replace_objects.is_some() {
            return Err(MetadataError::LegacyOverrideKey("replace_objects"));
        }
        if self.modify_objects.is_some() {
            return Err(MetadataError::LegacyOverrideKey("modify_objects"));
        }
        Ok(())
    }
}

/// Document listing the string defines referenced by runtime sources
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsedStridxDocument {
    /// `DUK_STRIDX_xxx` names
    #[serde(default)]
    pub used_stridx_defines: Vec<String>,
}

impl UsedStridxDocument {
    /// Parse from JSON text
    pub fn from_json_str(name: &str, text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|source| MetadataError::Json {
            document: name.to_string(),
            source,
        })
    }
}

/// String entry as written
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawString {
    /// String content (U+0000..U+00FF)
    #[serde(rename = "str")]
    pub value: String,
    /// Reserved word in all contexts
    #[serde(default)]
    pub reserved_word: Option<bool>,
    /// Reserved word in strict mode only
    #[serde(default)]
    pub future_reserved_word_strict: Option<bool>,
    /// Class name, needs an 8-bit stridx
    #[serde(default)]
    pub class_name: Option<bool>,
}

/// Object entry as written
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawObject {
    /// Object id, `bi_` prefixed for built-ins
    pub id: String,
    /// Class name
    #[serde(default)]
    pub class: Option<String>,
    /// Internal prototype object id
    #[serde(default)]
    pub internal_prototype: Option<String>,
    /// Native function name
    #[serde(default)]
    pub native: Option<String>,
    /// Argument count
    #[serde(default)]
    pub nargs: Option<u32>,
    /// Variable argument count
    #[serde(default)]
    pub varargs: Option<bool>,
    /// Object has [[Call]]
    #[serde(default)]
    pub callable: Option<bool>,
    /// Object has [[Construct]]
    #[serde(default)]
    pub constructable: Option<bool>,
    /// Magic value
    #[serde(default)]
    pub magic: Option<MagicSpec>,
    /// Properties in order
    #[serde(default)]
    pub properties: Option<Vec<RawProperty>>,

    /// Drop the object during load
    #[serde(default)]
    pub disable: bool,
    /// Override action: delete
    #[serde(default)]
    pub delete: bool,
    /// Override action: replace wholesale
    #[serde(default)]
    pub replace: bool,
    /// Override action: shallow merge
    #[serde(default)]
    pub modify: bool,
    /// Override action: add (default)
    #[serde(default)]
    pub add: bool,
}

impl RawObject {
    /// Properties, empty when absent
    pub fn properties(&self) -> &[RawProperty] {
        self.properties.as_deref().unwrap_or(&[])
    }

    /// Mutable property list, created when absent
    pub fn properties_mut(&mut self) -> &mut Vec<RawProperty> {
        self.properties.get_or_insert_with(Vec::new)
    }
}

/// Property entry as written
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawProperty {
    /// Property key (U+0000..U+00FF)
    pub key: String,
    /// Value; `null` and absent are both null
    #[serde(default)]
    pub value: Option<RawValue>,
    /// Attribute string (`w`, `e`, `c`, `a`)
    #[serde(default)]
    pub attributes: Option<String>,
    /// Drop the property during load
    #[serde(default)]
    pub disable: bool,
    /// Delete the property (override modify only)
    #[serde(default)]
    pub delete: bool,
}

impl RawProperty {
    /// Whether the value is accessor typed (explicit or shorthand)
    pub fn is_accessor(&self) -> bool {
        matches!(self.value, Some(RawValue::Typed(TypedValue::Accessor(_))))
    }
}

/// Property value as written
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Typed mapping with a `type` key
    Typed(TypedValue),
    /// Boolean
    Bool(bool),
    /// Integer number
    Integer(i64),
    /// Floating point number
    Float(f64),
    /// String (U+0000..U+00FF)
    Text(String),
}

/// Typed property values
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TypedValue {
    /// Exact IEEE double, 16 hex digits in big endian byte order
    Double {
        /// Hex encoded bytes
        bytes: String,
    },
    /// Explicit undefined
    Undefined,
    /// Reference to another object
    Object {
        /// Target object id
        id: String,
    },
    /// Accessor pair, explicit or shorthand
    Accessor(AccessorSpec),
    /// Inline function shorthand
    Function(FunctionSpec),
    /// Inline plain data shorthand
    Structured {
        /// Nested value
        value: serde_yaml::Value,
    },
    /// Buffer literal (not supported)
    Buffer {},
    /// Pointer literal (not supported)
    Pointer {},
}

/// Accessor value, either referencing existing getter/setter objects or
/// describing them inline
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AccessorSpec {
    /// Existing getter object
    #[serde(default)]
    pub getter_id: Option<String>,
    /// Existing setter object
    #[serde(default)]
    pub setter_id: Option<String>,
    /// Inline getter native
    #[serde(default)]
    pub getter: Option<String>,
    /// Inline setter native
    #[serde(default)]
    pub setter: Option<String>,
    /// Inline getter argument count
    #[serde(default)]
    pub getter_nargs: Option<u32>,
    /// Inline setter argument count
    #[serde(default)]
    pub setter_nargs: Option<u32>,
    /// Inline getter magic
    #[serde(default)]
    pub getter_magic: Option<MagicSpec>,
    /// Inline setter magic
    #[serde(default)]
    pub setter_magic: Option<MagicSpec>,
}

impl AccessorSpec {
    /// Inline form, expanded into synthesized function objects
    pub fn is_shorthand(&self) -> bool {
        self.getter.is_some() || self.setter.is_some()
    }
}

/// Inline function value
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FunctionSpec {
    /// Native function name
    pub native: String,
    /// Value of the `length` property
    #[serde(default)]
    pub length: Option<u32>,
    /// Argument count, defaults to `length`
    #[serde(default)]
    pub nargs: Option<u32>,
    /// Variable argument count
    #[serde(default)]
    pub varargs: Option<bool>,
    /// Magic value
    #[serde(default)]
    pub magic: Option<MagicSpec>,
    /// Function can be called as a constructor
    #[serde(default)]
    pub constructable: Option<bool>,
}
