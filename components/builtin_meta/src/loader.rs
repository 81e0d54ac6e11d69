//! Metadata load pipeline
//!
//! [`MetadataLoader`] owns the parsed documents and runs the passes in a
//! fixed order for one target. The loader is not consumed, so the same
//! documents can be loaded for both targets.

use crate::document::{BaseDocument, OverrideDocument, RawObject, RawString, UsedStridxDocument};
use crate::error::{MetadataError, Result};
use crate::graph::FinalizedGraph;
use crate::latin1;
use crate::layout::plan_string_layout;
use crate::merge::{apply_override_objects, remove_disabled};
use crate::model::{StringOrigin, Target};
use crate::normalize;
use crate::shorthand::expand_shorthand;
use crate::strings;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

/// Documents merged in document order
#[derive(Debug, Default)]
struct Combined {
    strings: Vec<RawString>,
    objects: Vec<RawObject>,
    builtins: Vec<String>,
    special_define_names: BTreeMap<String, String>,
    token_order: Vec<String>,
}

impl Combined {
    fn from_documents(bases: &[BaseDocument]) -> Result<Self> {
        let mut combined = Combined::default();
        let mut ids = HashSet::new();

        for doc in bases {
            combined.strings.extend(doc.strings.iter().cloned());
            for o in &doc.objects {
                if !ids.insert(o.id.clone()) {
                    return Err(MetadataError::DuplicateObject(o.id.clone()));
                }
                combined.objects.push(o.clone());
            }
            if !doc.builtins.is_empty() {
                combined.builtins = doc.builtins.iter().map(|b| b.id.clone()).collect();
            }
            if !doc.reserved_word_token_order.is_empty() {
                combined.token_order = doc.reserved_word_token_order.clone();
            }
            combined
                .special_define_names
                .extend(doc.special_define_names.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        Ok(combined)
    }
}

/// Builder-style driver for the metadata passes
#[derive(Debug, Clone, Default)]
pub struct MetadataLoader {
    bases: Vec<BaseDocument>,
    overrides: Vec<OverrideDocument>,
    used_stridx: UsedStridxDocument,
    build_version: i64,
}

impl MetadataLoader {
    /// Create a loader for the given base documents
    pub fn new(bases: Vec<BaseDocument>) -> Self {
        MetadataLoader {
            bases,
            ..Default::default()
        }
    }

    /// Set the override documents, applied in order
    pub fn with_overrides(mut self, overrides: Vec<OverrideDocument>) -> Self {
        self.overrides = overrides;
        self
    }

    /// Set the list of string defines referenced by runtime sources
    pub fn with_used_stridx(mut self, used: UsedStridxDocument) -> Self {
        self.used_stridx = used;
        self
    }

    /// Set the version number written to `Duktape.version`
    pub fn with_build_version(mut self, version: i64) -> Self {
        self.build_version = version;
        self
    }

    /// Run every pass for `target`
    pub fn load(&self, target: Target) -> Result<FinalizedGraph> {
        let mut combined = Combined::from_documents(&self.bases)?;

        for doc in &self.overrides {
            doc.check_legacy_keys()?;
            apply_override_objects(&mut combined.objects, &doc.objects)?;
            combined.strings.extend(doc.strings.iter().cloned());
        }

        let removed = remove_disabled(&mut combined.objects);
        debug!("removed {} disabled entries", removed);

        normalize::default_nargs(&mut combined.objects)?;

        let expansion = expand_shorthand(&combined.objects)?;
        let mut objects = expansion.objects;

        if target == Target::Ram {
            normalize::add_missing_function_names(&mut objects);
        }
        normalize::add_duktape_properties(&mut objects, self.build_version, target);
        normalize::normalize_attributes(&mut objects);
        if target == Target::Rom {
            normalize::strip_configurable(&mut objects);
        }
        let mut objects = normalize::order_bidx_objects(objects, &combined.builtins)?;

        let mut string_list = Vec::with_capacity(combined.strings.len());
        for raw in &combined.strings {
            string_list.push(strings::string_entry(raw, StringOrigin::Document)?);
        }
        let mut string_list = strings::merge_string_entries(string_list)?;

        let mut special = BTreeMap::new();
        for (text, suffix) in &combined.special_define_names {
            special.insert(latin1::to_bytes(text)?, suffix.clone());
        }
        strings::assign_define_names(&mut string_list, &special)?;
        strings::mark_used_stridx(&mut string_list, &self.used_stridx)?;

        let mut token_order = Vec::with_capacity(combined.token_order.len());
        for word in &combined.token_order {
            token_order.push(latin1::to_bytes(word)?);
        }
        let stridx_order = plan_string_layout(&string_list, &token_order)?;

        let mut added = 0;
        if target == Target::Rom {
            let forced: Vec<RawString> = self
                .overrides
                .iter()
                .flat_map(|d| d.add_forced_strings.iter().cloned())
                .collect();
            added = strings::backfill_missing_strings(&mut string_list, &objects, &forced)?;
        }

        let pruned = normalize::remove_orphans(&mut objects);
        let scrubbed = normalize::scrub_unknown_references(&mut objects);

        let graph = FinalizedGraph::new(target, objects, string_list, stridx_order)?;
        info!(
            "prepared {} metadata: {} objects, {} objects with bidx, {} strings, {} strings with stridx, {} strings added, {} orphans pruned, {} references scrubbed",
            target,
            graph.objects().len(),
            graph.bidx_objects().len(),
            graph.strings().len(),
            graph.stridx_count(),
            added,
            pruned,
            scrubbed
        );
        Ok(graph)
    }
}
