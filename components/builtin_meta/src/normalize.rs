//! Object normalization passes
//!
//! Every pass returns the number of changes it made. A pass applied to its
//! own output makes no further changes.

use crate::document::{RawObject, RawValue, TypedValue};
use crate::error::{MetadataError, Result};
use crate::model::{
    Attributes, ObjectEntry, PropertyEntry, PropertyValue, Target, BI_DUKTAPE,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Default `nargs` of callable objects from their integer `length`
/// property, and default `length`/`nargs` of function shorthand values
pub fn default_nargs(objects: &mut [RawObject]) -> Result<usize> {
    let mut changes = 0;

    for o in objects.iter_mut() {
        if o.nargs.is_some() || !o.callable.unwrap_or(false) {
            continue;
        }
        let length = o
            .properties()
            .iter()
            .find(|p| p.key == "length")
            .and_then(|p| match p.value {
                Some(RawValue::Integer(v)) => u32::try_from(v).ok(),
                _ => None,
            });
        match length {
            Some(v) => {
                o.nargs = Some(v);
                changes += 1;
            }
            None => {
                return Err(MetadataError::MalformedObject {
                    id: o.id.clone(),
                    reason: "callable object has neither nargs nor an integer length".to_string(),
                })
            }
        }
    }

    for o in objects.iter_mut() {
        let owner = o.id.clone();
        let Some(props) = o.properties.as_mut() else {
            continue;
        };
        for p in props.iter_mut() {
            if let Some(RawValue::Typed(TypedValue::Function(spec))) = &mut p.value {
                if spec.length.is_none() {
                    debug!(object = %owner, property = %p.key, "default length for function shorthand");
                    spec.length = Some(0);
                    changes += 1;
                }
                if spec.nargs.is_none() {
                    spec.nargs = spec.length;
                    changes += 1;
                }
            }
        }
    }

    Ok(changes)
}

/// Force the accessor flag on accessor-valued properties
///
/// Attribute strings are parsed during shorthand expansion; this pass
/// covers properties added afterwards.
pub fn normalize_attributes(objects: &mut [ObjectEntry]) -> usize {
    let mut changes = 0;
    for o in objects.iter_mut() {
        for p in o.properties.iter_mut() {
            if p.value.is_accessor() && !p.attributes.accessor {
                p.attributes.accessor = true;
                changes += 1;
            }
        }
    }
    changes
}

/// Add an empty `name` to callable objects lacking one (RAM target)
pub fn add_missing_function_names(objects: &mut [ObjectEntry]) -> usize {
    let mut changes = 0;
    for o in objects.iter_mut() {
        if !o.callable || o.property(b"name").is_some() {
            continue;
        }
        info!(object = %o.id, "adding missing \"name\" property for top level function");
        o.properties.push(PropertyEntry::new(
            "name",
            PropertyValue::String(Vec::new()),
            Attributes::NONE,
        ));
        changes += 1;
    }
    changes
}

/// Insert `version` (and `env` for ROM) into the Duktape object
pub fn add_duktape_properties(objects: &mut [ObjectEntry], version: i64, target: Target) {
    let Some(o) = objects.iter_mut().find(|o| o.id == BI_DUKTAPE) else {
        return;
    };
    o.properties.insert(
        0,
        PropertyEntry::new("version", PropertyValue::from_integer(version), Attributes::NONE),
    );
    if target == Target::Rom {
        o.properties.insert(
            0,
            PropertyEntry::new(
                "env",
                PropertyValue::String(b"ROM".to_vec()),
                Attributes::NONE,
            ),
        );
    }
}

/// Clear the configurable flag of every property (ROM target)
///
/// The runtime relies on read-only properties being non-configurable;
/// other flags are left as they are.
pub fn strip_configurable(objects: &mut [ObjectEntry]) -> usize {
    let mut changes = 0;
    for o in objects.iter_mut() {
        for p in o.properties.iter_mut() {
            if p.attributes.configurable {
                p.attributes.configurable = false;
                changes += 1;
            }
        }
    }
    changes
}

/// Move the objects named in `builtins` to the front, in that order, and
/// mark them as needing a runtime index
pub fn order_bidx_objects(objects: Vec<ObjectEntry>, builtins: &[String]) -> Result<Vec<ObjectEntry>> {
    let mut slots: Vec<Option<ObjectEntry>> = objects.into_iter().map(Some).collect();
    let positions: HashMap<String, usize> = slots
        .iter()
        .enumerate()
        .filter_map(|(i, o)| o.as_ref().map(|o| (o.id.clone(), i)))
        .collect();

    let mut ordered = Vec::with_capacity(slots.len());
    for id in builtins {
        let pos = *positions
            .get(id)
            .ok_or_else(|| MetadataError::UnknownBuiltin(id.clone()))?;
        match slots[pos].take() {
            Some(mut obj) => {
                obj.bidx_used = true;
                ordered.push(obj);
            }
            None => warn!(object = %id, "object listed twice in builtins, ignoring"),
        }
    }
    ordered.extend(slots.into_iter().flatten());
    Ok(ordered)
}

/// Remove objects unreachable from the index-bearing roots
///
/// Reachability follows object references and accessor getter/setter
/// references until the reachable set stops growing. Returns the number of
/// objects removed.
pub fn remove_orphans(objects: &mut Vec<ObjectEntry>) -> usize {
    let mut reachable: HashSet<String> = objects
        .iter()
        .filter(|o| o.bidx_used)
        .map(|o| o.id.clone())
        .collect();

    loop {
        let before = reachable.len();
        let mut found = Vec::new();
        for o in objects.iter().filter(|o| reachable.contains(&o.id)) {
            for p in &o.properties {
                found.extend(p.value.referenced_ids().into_iter().map(str::to_string));
            }
        }
        reachable.extend(found);
        debug!(
            "mark reachable: reachable count initially {}, now {}",
            before,
            reachable.len()
        );
        if reachable.len() == before {
            break;
        }
    }

    let mut removed = 0;
    while let Some(idx) = objects.iter().position(|o| !reachable.contains(&o.id)) {
        warn!(object = %objects[idx].id, "object not reachable, dropping");
        objects.remove(idx);
        removed += 1;
    }
    removed
}

/// Scrub references to objects not present in `objects`
///
/// Object-valued properties are removed, accessor halves and internal
/// prototypes are cleared. Returns the number of references scrubbed.
pub fn scrub_unknown_references(objects: &mut [ObjectEntry]) -> usize {
    let known: HashSet<String> = objects.iter().map(|o| o.id.clone()).collect();
    let mut scrubbed = 0;

    for o in objects.iter_mut() {
        if let Some(proto) = &o.internal_prototype {
            if !known.contains(proto) {
                warn!(object = %o.id, target = %proto, "internal prototype references missing object, cleared");
                o.internal_prototype = None;
                scrubbed += 1;
            }
        }

        let owner = o.id.clone();
        o.properties.retain_mut(|p| {
            let key = String::from_utf8_lossy(&p.key).into_owned();
            match &mut p.value {
                PropertyValue::Object(id) if !known.contains(id.as_str()) => {
                    warn!(object = %owner, property = %key, target = %id, "deleted property pointing to missing object");
                    scrubbed += 1;
                    false
                }
                PropertyValue::Accessor { getter, setter } => {
                    for half in [getter, setter] {
                        if matches!(*half, Some(ref id) if !known.contains(id.as_str())) {
                            warn!(object = %owner, property = %key, "accessor references missing object, nulled");
                            *half = None;
                            scrubbed += 1;
                        }
                    }
                    true
                }
                _ => true,
            }
        });
    }
    scrubbed
}
