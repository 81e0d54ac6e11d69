//! Shorthand expansion
//!
//! Converts raw document objects into normalized [`ObjectEntry`] values.
//! Inline function, accessor and structured property values are replaced by
//! references to synthesized objects, which are appended after all
//! document objects with ids `subobj_0`, `subobj_1`, ...

use crate::document::{AccessorSpec, FunctionSpec, RawObject, RawProperty, RawValue, TypedValue};
use crate::error::{MetadataError, Result};
use crate::latin1;
use crate::magic::MagicSpec;
use crate::model::{
    Attributes, DoubleBits, ObjectClass, ObjectEntry, PropertyEntry, PropertyValue,
    BI_DATE_PROTOTYPE, BI_FUNCTION_PROTOTYPE, BI_OBJECT_PROTOTYPE,
};
use tracing::{debug, info};

const TO_GMT_STRING: &[u8] = b"toGMTString";
const TO_UTC_STRING: &[u8] = b"toUTCString";

/// Result of shorthand expansion
#[derive(Debug, Clone)]
pub struct Expansion {
    /// Document objects followed by synthesized objects
    pub objects: Vec<ObjectEntry>,
    /// Number of synthesized objects
    pub synthesized: usize,
}

/// Expand shorthand in `raw` and convert it to the normalized model
pub fn expand_shorthand(raw: &[RawObject]) -> Result<Expansion> {
    let mut expander = Expander::default();
    let mut objects = Vec::with_capacity(raw.len());
    for o in raw {
        objects.push(expander.convert_object(o)?);
    }

    let len_before = objects.len();
    let synthesized = expander.subobjects.len();
    objects.append(&mut expander.subobjects);
    info!(
        "normalized metadata shorthand, {} objects -> {} final objects",
        len_before,
        objects.len()
    );

    Ok(Expansion {
        objects,
        synthesized,
    })
}

/// Parse a property's attribute string, applying the kind default
pub fn parse_attributes(owner: &str, prop: &RawProperty) -> Result<Attributes> {
    let mut attrs = match &prop.attributes {
        Some(text) => Attributes::parse(text).map_err(|_| MetadataError::InvalidAttributes {
            id: owner.to_string(),
            key: prop.key.clone(),
            attributes: text.clone(),
        })?,
        None if prop.is_accessor() => Attributes::ACCESSOR_DEFAULT,
        None => Attributes::DATA_DEFAULT,
    };
    if prop.is_accessor() {
        attrs.accessor = true;
    }
    Ok(attrs)
}

#[derive(Default)]
struct Expander {
    subobjects: Vec<ObjectEntry>,
}

impl Expander {
    fn new_subobject(&mut self, class: ObjectClass) -> usize {
        let id = format!("subobj_{}", self.subobjects.len());
        let mut obj = ObjectEntry::new(id, class);
        obj.synthetic = true;
        self.subobjects.push(obj);
        self.subobjects.len() - 1
    }

    fn convert_object(&mut self, raw: &RawObject) -> Result<ObjectEntry> {
        let class_name = raw
            .class
            .as_deref()
            .ok_or_else(|| MetadataError::MalformedObject {
                id: raw.id.clone(),
                reason: "missing class".to_string(),
            })?;
        let class = ObjectClass::from_name(class_name).ok_or_else(|| MetadataError::UnknownClass {
            id: raw.id.clone(),
            class: class_name.to_string(),
        })?;

        let mut obj = ObjectEntry::new(raw.id.clone(), class);
        obj.internal_prototype = raw.internal_prototype.clone();
        obj.native = raw.native.clone();
        obj.nargs = raw.nargs;
        obj.varargs = raw.varargs.unwrap_or(false);
        obj.callable = raw.callable.unwrap_or(false);
        obj.constructable = raw.constructable.unwrap_or(false);
        obj.magic = raw.magic.clone();

        let is_date_proto = raw.id == BI_DATE_PROTOTYPE;
        for p in raw.properties() {
            let key = latin1::to_bytes(&p.key)?;
            // Re-created below as a clone of toUTCString.
            if is_date_proto && key == TO_GMT_STRING {
                continue;
            }

            let attributes = parse_attributes(&raw.id, p)?;
            let value = self.convert_value(&raw.id, p)?;
            obj.properties.push(PropertyEntry {
                key: key.clone(),
                value,
                attributes,
            });

            if is_date_proto && key == TO_UTC_STRING {
                if let Some(last) = obj.properties.last() {
                    let mut clone = last.clone();
                    clone.key = TO_GMT_STRING.to_vec();
                    debug!("clone Date.prototype.toUTCString to toGMTString");
                    obj.properties.push(clone);
                }
            }
        }

        Ok(obj)
    }

    fn convert_value(&mut self, owner: &str, prop: &RawProperty) -> Result<PropertyValue> {
        let unsupported = |kind: &str| MetadataError::UnsupportedValueShape {
            id: owner.to_string(),
            key: prop.key.clone(),
            kind: kind.to_string(),
        };

        let value = match &prop.value {
            None => PropertyValue::Null,
            Some(RawValue::Bool(b)) => PropertyValue::Boolean(*b),
            Some(RawValue::Integer(i)) => PropertyValue::from_integer(*i),
            Some(RawValue::Float(f)) => PropertyValue::Double(DoubleBits::from_f64(*f)),
            Some(RawValue::Text(s)) => PropertyValue::String(latin1::to_bytes(s)?),
            Some(RawValue::Typed(typed)) => match typed {
                TypedValue::Double { bytes } => {
                    PropertyValue::Double(DoubleBits::from_hex(bytes).ok_or_else(|| {
                        MetadataError::MalformedShorthand {
                            id: owner.to_string(),
                            key: prop.key.clone(),
                            reason: format!("invalid double bytes {:?}", bytes),
                        }
                    })?)
                }
                TypedValue::Undefined => PropertyValue::Undefined,
                TypedValue::Object { id } => PropertyValue::Object(id.clone()),
                TypedValue::Accessor(spec) if spec.is_shorthand() => {
                    self.expand_accessor(owner, &prop.key, spec)?
                }
                TypedValue::Accessor(spec) => PropertyValue::Accessor {
                    getter: spec.getter_id.clone(),
                    setter: spec.setter_id.clone(),
                },
                TypedValue::Function(spec) => self.expand_function(&prop.key, spec)?,
                TypedValue::Structured { value } => {
                    let v = self.expand_structured(owner, &prop.key, value)?;
                    info!(
                        object = owner,
                        property = %prop.key,
                        "decoded structured shorthand"
                    );
                    v
                }
                TypedValue::Buffer {} => return Err(unsupported("buffer")),
                TypedValue::Pointer {} => return Err(unsupported("pointer")),
            },
        };
        Ok(value)
    }

    fn expand_function(&mut self, key: &str, spec: &FunctionSpec) -> Result<PropertyValue> {
        let length = spec.length.unwrap_or(0);
        let idx = self.new_subobject(ObjectClass::Function);
        let obj = &mut self.subobjects[idx];
        obj.native = Some(spec.native.clone());
        obj.nargs = Some(spec.nargs.unwrap_or(length));
        obj.varargs = spec.varargs.unwrap_or(false);
        obj.magic = Some(spec.magic.clone().unwrap_or(MagicSpec::Integer(0)));
        obj.internal_prototype = Some(BI_FUNCTION_PROTOTYPE.to_string());
        obj.callable = true;
        obj.constructable = spec.constructable.unwrap_or(false);
        obj.properties.push(PropertyEntry::new(
            "length",
            PropertyValue::from_integer(i64::from(length)),
            Attributes::NONE,
        ));
        obj.properties.push(PropertyEntry::new(
            "name",
            PropertyValue::String(latin1::to_bytes(key)?),
            Attributes::NONE,
        ));
        Ok(PropertyValue::Object(obj.id.clone()))
    }

    fn expand_accessor(
        &mut self,
        owner: &str,
        key: &str,
        spec: &AccessorSpec,
    ) -> Result<PropertyValue> {
        let missing = |what: &str| MetadataError::MalformedShorthand {
            id: owner.to_string(),
            key: key.to_string(),
            reason: format!("accessor shorthand is missing {}", what),
        };
        let getter_native = spec.getter.clone().ok_or_else(|| missing("getter"))?;
        let setter_native = spec.setter.clone().ok_or_else(|| missing("setter"))?;

        let getter = self.accessor_function(
            getter_native,
            spec.getter_nargs.unwrap_or(0),
            spec.getter_magic.clone(),
        );
        let setter = self.accessor_function(
            setter_native,
            spec.setter_nargs.unwrap_or(1),
            spec.setter_magic.clone(),
        );
        Ok(PropertyValue::Accessor {
            getter: Some(getter),
            setter: Some(setter),
        })
    }

    // Accessor functions carry no `length` or `name`.
    fn accessor_function(&mut self, native: String, nargs: u32, magic: Option<MagicSpec>) -> String {
        let idx = self.new_subobject(ObjectClass::Function);
        let obj = &mut self.subobjects[idx];
        obj.native = Some(native);
        obj.nargs = Some(nargs);
        obj.magic = Some(magic.unwrap_or(MagicSpec::Integer(0)));
        obj.internal_prototype = Some(BI_FUNCTION_PROTOTYPE.to_string());
        obj.callable = true;
        obj.id.clone()
    }

    fn expand_structured(
        &mut self,
        owner: &str,
        key: &str,
        value: &serde_yaml::Value,
    ) -> Result<PropertyValue> {
        use serde_yaml::Value;

        let unsupported = |kind: &str| MetadataError::UnsupportedValueShape {
            id: owner.to_string(),
            key: key.to_string(),
            kind: format!("structured {}", kind),
        };

        match value {
            Value::Bool(b) => Ok(PropertyValue::Boolean(*b)),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Ok(PropertyValue::from_integer(i)),
                (None, Some(f)) => Ok(PropertyValue::Double(DoubleBits::from_f64(f))),
                _ => Err(unsupported("number")),
            },
            Value::String(s) => Ok(PropertyValue::String(latin1::to_bytes(s)?)),
            Value::Mapping(map) => {
                // Parent id is allocated before any nested object.
                let idx = self.new_subobject(ObjectClass::Object);
                self.subobjects[idx].internal_prototype = Some(BI_OBJECT_PROTOTYPE.to_string());

                let mut entries = Vec::with_capacity(map.len());
                for (k, v) in map {
                    let k = k.as_str().ok_or_else(|| unsupported("non-string key"))?;
                    entries.push((k.to_string(), v));
                }
                entries.sort_by(|a, b| a.0.cmp(&b.0));

                let mut props = Vec::with_capacity(entries.len());
                for (k, v) in entries {
                    let value = self.expand_structured(owner, &k, v)?;
                    props.push(PropertyEntry::new(
                        latin1::to_bytes(&k)?,
                        value,
                        Attributes {
                            writable: true,
                            enumerable: true,
                            configurable: true,
                            accessor: false,
                        },
                    ));
                }
                let obj = &mut self.subobjects[idx];
                obj.properties = props;
                Ok(PropertyValue::Object(obj.id.clone()))
            }
            Value::Sequence(_) => Err(unsupported("array")),
            Value::Null => Err(unsupported("null")),
            Value::Tagged(_) => Err(unsupported("tagged value")),
        }
    }
}
