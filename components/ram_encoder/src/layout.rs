//! RAM top level object list and native function table

use builtin_meta::{FinalizedGraph, ObjectEntry, PropertyValue};
use std::collections::{BTreeSet, HashMap};
use tracing::info;

/// Objects and native functions as the RAM decoder indexes them
///
/// The top level list holds every object that is created on the value
/// stack during init: objects with a bidx plus everything that is not an
/// inline native function. Object references in the stream use positions
/// in this list.
#[derive(Debug, Clone)]
pub struct RamLayout {
    top_level: Vec<usize>,
    ramidx: HashMap<String, usize>,
    natives: Vec<String>,
    native_index: HashMap<String, usize>,
}

impl RamLayout {
    /// Derive the layout from a finalized graph
    pub fn new(graph: &FinalizedGraph) -> Self {
        let top_level: Vec<usize> = graph
            .objects()
            .iter()
            .enumerate()
            .filter(|(_, o)| !o.is_inline_native())
            .map(|(i, _)| i)
            .collect();
        let ramidx = top_level
            .iter()
            .enumerate()
            .map(|(ramidx, &pos)| (graph.objects()[pos].id.clone(), ramidx))
            .collect();

        let mut found = BTreeSet::new();
        let native_of = |id: Option<&str>| {
            id.and_then(|id| graph.object(id))
                .and_then(|o| o.native.clone())
        };
        for o in graph.objects() {
            if let Some(native) = &o.native {
                found.insert(native.clone());
            }
            for p in &o.properties {
                match &p.value {
                    PropertyValue::Accessor { getter, setter } => {
                        found.extend(native_of(getter.as_deref()));
                        found.extend(native_of(setter.as_deref()));
                    }
                    PropertyValue::Object(id) => {
                        found.extend(native_of(Some(id.as_str())));
                    }
                    _ => {}
                }
            }
        }
        let natives: Vec<String> = found.into_iter().collect();
        let native_index = natives
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();

        info!(
            "filtered RAM object list: {} objects with bidx, {} total top level objects",
            graph.bidx_objects().len(),
            top_level.len()
        );

        RamLayout {
            top_level,
            ramidx,
            natives,
            native_index,
        }
    }

    /// Top level objects in RAM index order
    pub fn top_level<'g>(
        &'g self,
        graph: &'g FinalizedGraph,
    ) -> impl Iterator<Item = &'g ObjectEntry> + 'g {
        self.top_level.iter().map(move |&i| &graph.objects()[i])
    }

    /// Number of top level objects
    pub fn top_level_count(&self) -> usize {
        self.top_level.len()
    }

    /// RAM index of a top level object
    pub fn ramidx_of(&self, id: &str) -> Option<usize> {
        self.ramidx.get(id).copied()
    }

    /// Object id to RAM index map
    pub fn ramidx_map(&self) -> &HashMap<String, usize> {
        &self.ramidx
    }

    /// Native function names, sorted
    pub fn natives(&self) -> &[String] {
        &self.natives
    }

    /// Index of a native function in [`Self::natives`]
    pub fn native_index(&self, name: &str) -> Option<usize> {
        self.native_index.get(name).copied()
    }
}
