//! String table passes

use crate::document::{RawString, UsedStridxDocument};
use crate::error::{MetadataError, Result};
use crate::latin1;
use crate::model::{ObjectEntry, PropertyValue, StringEntry, StringOrigin};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, info};

/// Defines the runtime gets without a matching string
pub const AUTOMATIC_DEFINES: [&str; 4] = [
    "DUK_STRIDX_START_RESERVED",
    "DUK_STRIDX_START_STRICT_RESERVED",
    "DUK_STRIDX_END_RESERVED",
    "DUK_STRIDX_TO_TOK",
];

/// Convert a document string entry
pub fn string_entry(raw: &RawString, origin: StringOrigin) -> Result<StringEntry> {
    Ok(StringEntry {
        bytes: latin1::to_bytes(&raw.value)?,
        reserved_word: raw.reserved_word,
        future_reserved_word_strict: raw.future_reserved_word_strict,
        class_name: raw.class_name,
        define: None,
        stridx_used: false,
        stridx: None,
        origin,
    })
}

fn merge_flag(
    name: &str,
    bytes: &[u8],
    kept: &mut Option<bool>,
    other: Option<bool>,
) -> Result<()> {
    match (*kept, other) {
        (Some(a), Some(b)) if a != b => Err(MetadataError::MergeConflict {
            what: format!("string {:?}", latin1::to_text(bytes)),
            detail: format!("conflicting {}: {} <-> {}", name, b, a),
        }),
        (None, Some(b)) => {
            *kept = Some(b);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Merge duplicate string entries
///
/// The last occurrence of a string keeps its position (this matters for
/// reserved words). Flags present on several occurrences must agree.
pub fn merge_string_entries(strings: Vec<StringEntry>) -> Result<Vec<StringEntry>> {
    let mut merged: Vec<StringEntry> = Vec::with_capacity(strings.len());
    let mut index: BTreeMap<Vec<u8>, usize> = BTreeMap::new();

    for s in strings.into_iter().rev() {
        match index.get(&s.bytes) {
            Some(&pos) => {
                let kept = &mut merged[pos];
                merge_flag("reserved_word", &s.bytes, &mut kept.reserved_word, s.reserved_word)?;
                merge_flag(
                    "future_reserved_word_strict",
                    &s.bytes,
                    &mut kept.future_reserved_word_strict,
                    s.future_reserved_word_strict,
                )?;
                merge_flag("class_name", &s.bytes, &mut kept.class_name, s.class_name)?;
            }
            None => {
                index.insert(s.bytes.clone(), merged.len());
                merged.push(s);
            }
        }
    }

    merged.reverse();
    Ok(merged)
}

/// Assign `DUK_STRIDX_xxx` define names to every string
pub fn assign_define_names(
    strings: &mut [StringEntry],
    special: &BTreeMap<Vec<u8>, String>,
) -> Result<()> {
    let camel = Regex::new(r"([a-z0-9])([A-Z])")?;

    for s in strings.iter_mut() {
        if let Some(suffix) = special.get(&s.bytes) {
            s.define = Some(format!("DUK_STRIDX_{}", suffix));
            continue;
        }
        let (prefix, body) = if s.is_internal() {
            ("DUK_STRIDX_INT_", &s.bytes[1..])
        } else {
            ("DUK_STRIDX_", &s.bytes[..])
        };
        let text = latin1::to_text(body);
        let split = camel.replace_all(&text, "${1}_${2}");
        s.define = Some(format!("{}{}", prefix, split.to_ascii_uppercase()));
    }
    Ok(())
}

/// Mark strings that need a stridx
///
/// A string needs one when its define is referenced by runtime sources or
/// when it is a reserved word. Fails if a referenced define has no string.
pub fn mark_used_stridx(strings: &mut [StringEntry], used: &UsedStridxDocument) -> Result<usize> {
    let needed: BTreeSet<&str> = used.used_stridx_defines.iter().map(String::as_str).collect();
    let mut found: HashSet<String> = AUTOMATIC_DEFINES.iter().map(|d| d.to_string()).collect();
    let mut marked = 0;

    for s in strings.iter_mut() {
        let referenced = s
            .define
            .as_deref()
            .is_some_and(|d| needed.contains(d));
        if referenced {
            if let Some(d) = &s.define {
                found.insert(d.clone());
            }
        }
        if referenced || s.is_reserved_word() {
            if !s.stridx_used {
                marked += 1;
            }
            s.stridx_used = true;
        }
    }

    if let Some(missing) = needed.iter().find(|d| !found.contains(**d)) {
        return Err(MetadataError::MissingRequiredIndex(missing.to_string()));
    }
    Ok(marked)
}

/// Append strings referenced by objects but missing from the table, then
/// the forced strings
///
/// Needed for read-only builds, where every key and string value must
/// exist as its own record. Returns the number of strings added.
pub fn backfill_missing_strings(
    strings: &mut Vec<StringEntry>,
    objects: &[ObjectEntry],
    forced: &[RawString],
) -> Result<usize> {
    let mut have: HashSet<Vec<u8>> = strings.iter().map(|s| s.bytes.clone()).collect();
    let before = strings.len();

    for o in objects {
        for p in &o.properties {
            if have.insert(p.key.clone()) {
                debug!(object = %o.id, "add missing string {:?}", latin1::to_text(&p.key));
                strings.push(StringEntry::new(p.key.clone(), StringOrigin::PropertyReference));
            }
            if let PropertyValue::String(v) = &p.value {
                if have.insert(v.clone()) {
                    debug!(object = %o.id, "add missing string {:?}", latin1::to_text(v));
                    strings.push(StringEntry::new(v.clone(), StringOrigin::PropertyReference));
                }
            }
        }
    }

    for raw in forced {
        let entry = string_entry(raw, StringOrigin::Forced)?;
        if have.insert(entry.bytes.clone()) {
            strings.push(entry);
        }
    }

    let added = strings.len() - before;
    if added > 0 {
        info!("added {} missing strings", added);
    }
    Ok(added)
}
