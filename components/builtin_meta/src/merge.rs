//! Override document merging
//!
//! Each override object carries one action, resolved once by
//! [`OverrideAction::of`]. Actions apply in document order against the raw
//! object list, before any normalization.

use crate::document::{RawObject, RawProperty, RawValue, TypedValue};
use crate::error::{MetadataError, Result};
use tracing::{debug, info, warn};

/// Action an override object applies to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideAction {
    /// Remove the target and scrub references to it
    Delete,
    /// Replace the target wholesale, or append when missing
    Replace,
    /// Shallow merge into an existing target
    Modify,
    /// Append a new object
    Add,
}

impl OverrideAction {
    /// Resolve the action from the object's flags
    ///
    /// `delete` wins over `replace`, which wins over `add`. `modify` applies
    /// only when `add` is not also set.
    pub fn of(obj: &RawObject) -> Self {
        if obj.delete {
            OverrideAction::Delete
        } else if obj.replace {
            OverrideAction::Replace
        } else if obj.modify && !obj.add {
            OverrideAction::Modify
        } else {
            OverrideAction::Add
        }
    }
}

/// Apply override objects, in order, to `objects`
pub fn apply_override_objects(objects: &mut Vec<RawObject>, overrides: &[RawObject]) -> Result<()> {
    for o in overrides {
        if o.disable {
            info!(object = %o.id, "skip disabled override object");
            continue;
        }
        let target = objects.iter().position(|t| t.id == o.id);

        match OverrideAction::of(o) {
            OverrideAction::Delete => {
                let idx = target.ok_or_else(|| MetadataError::MissingObject {
                    action: "delete",
                    id: o.id.clone(),
                })?;
                info!(object = %o.id, "delete object");
                objects.remove(idx);
                scrub_references_to(objects, &o.id);
            }
            OverrideAction::Replace => match target {
                Some(idx) => {
                    info!(object = %o.id, "replace object");
                    objects[idx] = o.clone();
                }
                None => {
                    warn!(object = %o.id, "object to be replaced doesn't exist, append new object");
                    objects.push(o.clone());
                }
            },
            OverrideAction::Add => {
                if target.is_some() {
                    return Err(MetadataError::DuplicateObject(o.id.clone()));
                }
                info!(object = %o.id, "add object");
                objects.push(o.clone());
            }
            OverrideAction::Modify => {
                let idx = target.ok_or_else(|| MetadataError::MissingObject {
                    action: "modify",
                    id: o.id.clone(),
                })?;
                modify_object(&mut objects[idx], o);
            }
        }
    }
    Ok(())
}

fn modify_object(targ: &mut RawObject, o: &RawObject) {
    macro_rules! merge_field {
        ($($field:ident),*) => {
            $(
                if o.$field.is_some() {
                    targ.$field = o.$field.clone();
                }
            )*
        };
    }
    merge_field!(
        class,
        internal_prototype,
        native,
        nargs,
        varargs,
        callable,
        constructable,
        magic
    );

    for p in o.properties() {
        if p.disable {
            info!(property = %p.key, "skip disabled property");
            continue;
        }
        let props = targ.properties_mut();
        let existing = props.iter().position(|t| t.key == p.key);
        match (existing, p.delete) {
            (Some(idx), true) => {
                debug!(object = %o.id, property = %p.key, "delete property");
                props.remove(idx);
            }
            (Some(idx), false) => {
                debug!(object = %o.id, property = %p.key, "replace property");
                props[idx] = p.clone();
            }
            (None, true) => {
                warn!(object = %o.id, property = %p.key, "property to delete doesn't exist, nop");
            }
            (None, false) => {
                debug!(object = %o.id, property = %p.key, "add property");
                props.push(p.clone());
            }
        }
    }
}

/// Remove object references to `obj_id` and null accessor halves pointing
/// at it
pub fn scrub_references_to(objects: &mut [RawObject], obj_id: &str) {
    for o in objects.iter_mut() {
        let owner = o.id.clone();
        let Some(props) = o.properties.as_mut() else {
            continue;
        };
        props.retain_mut(|p| match &mut p.value {
            Some(RawValue::Typed(TypedValue::Object { id })) if id == obj_id => {
                warn!(
                    object = %owner,
                    property = %p.key,
                    target = obj_id,
                    "deleted property pointing to deleted object"
                );
                false
            }
            Some(RawValue::Typed(TypedValue::Accessor(spec))) => {
                if spec.getter_id.as_deref() == Some(obj_id) {
                    warn!(object = %owner, property = %p.key, "nulled getter of deleted object");
                    spec.getter_id = None;
                }
                if spec.setter_id.as_deref() == Some(obj_id) {
                    warn!(object = %owner, property = %p.key, "nulled setter of deleted object");
                    spec.setter_id = None;
                }
                true
            }
            _ => true,
        });
    }
}

/// Drop disabled objects and properties
///
/// Returns the number of entries removed.
pub fn remove_disabled(objects: &mut Vec<RawObject>) -> usize {
    let mut removed = 0;
    objects.retain(|o| {
        if o.disable {
            info!(object = %o.id, "remove disabled object");
            removed += 1;
        }
        !o.disable
    });
    for o in objects.iter_mut() {
        let owner = o.id.clone();
        if let Some(props) = o.properties.as_mut() {
            props.retain(|p: &RawProperty| {
                if p.disable {
                    info!(object = %owner, property = %p.key, "remove disabled property");
                    removed += 1;
                }
                !p.disable
            });
        }
    }
    removed
}
