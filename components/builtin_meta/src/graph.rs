//! Finalized object and string graph
//!
//! The graph is built once, after all passes have run, and then only read.
//! Lookup maps are derived in [`FinalizedGraph::new`] and never patched.

use crate::error::{MetadataError, Result};
use crate::model::{ObjectEntry, StringEntry, Target};
use serde::Serialize;
use std::collections::HashMap;

/// Stridx range of the reserved words
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservedRange {
    /// First reserved word
    pub start: usize,
    /// First strict-only reserved word
    pub strict_start: usize,
    /// Exclusive end
    pub end: usize,
}

/// Immutable result of a metadata load
#[derive(Debug, Clone)]
pub struct FinalizedGraph {
    target: Target,
    objects: Vec<ObjectEntry>,
    strings: Vec<StringEntry>,
    stridx_order: Vec<usize>,
    object_index: HashMap<String, usize>,
    string_index: HashMap<Vec<u8>, usize>,
    stridx_index: HashMap<Vec<u8>, usize>,
    bidx_index: HashMap<String, usize>,
}

impl FinalizedGraph {
    /// Assign indices and build the lookup maps
    ///
    /// `stridx_order` lists positions into `strings` in stridx order.
    /// Objects with `bidx_used` must precede all other objects.
    pub fn new(
        target: Target,
        mut objects: Vec<ObjectEntry>,
        mut strings: Vec<StringEntry>,
        stridx_order: Vec<usize>,
    ) -> Result<Self> {
        let mut bidx_index = HashMap::new();
        for (i, o) in objects.iter_mut().enumerate() {
            if o.bidx_used {
                if bidx_index.len() != i {
                    return Err(MetadataError::MalformedObject {
                        id: o.id.clone(),
                        reason: "index-bearing object after plain objects".to_string(),
                    });
                }
                o.bidx = Some(i);
                bidx_index.insert(o.id.clone(), i);
            } else {
                o.bidx = None;
            }
        }

        let mut stridx_index = HashMap::new();
        for s in strings.iter_mut() {
            s.stridx = None;
        }
        for (stridx, &pos) in stridx_order.iter().enumerate() {
            let s = &mut strings[pos];
            s.stridx = Some(stridx);
            stridx_index.insert(s.bytes.clone(), stridx);
        }

        let mut object_index = HashMap::with_capacity(objects.len());
        for (i, o) in objects.iter().enumerate() {
            if object_index.insert(o.id.clone(), i).is_some() {
                return Err(MetadataError::DuplicateObject(o.id.clone()));
            }
        }
        let string_index = strings
            .iter()
            .enumerate()
            .map(|(i, s)| (s.bytes.clone(), i))
            .collect();

        Ok(FinalizedGraph {
            target,
            objects,
            strings,
            stridx_order,
            object_index,
            string_index,
            stridx_index,
            bidx_index,
        })
    }

    /// Target the graph was loaded for
    pub fn target(&self) -> Target {
        self.target
    }

    /// All objects, index-bearing ones first
    pub fn objects(&self) -> &[ObjectEntry] {
        &self.objects
    }

    /// All strings
    pub fn strings(&self) -> &[StringEntry] {
        &self.strings
    }

    /// Look up an object by id
    pub fn object(&self, id: &str) -> Option<&ObjectEntry> {
        self.object_index.get(id).map(|&i| &self.objects[i])
    }

    /// Position of an object in [`Self::objects`]
    pub fn object_position(&self, id: &str) -> Option<usize> {
        self.object_index.get(id).copied()
    }

    /// Position of a string in [`Self::strings`]
    pub fn string_position(&self, bytes: &[u8]) -> Option<usize> {
        self.string_index.get(bytes).copied()
    }

    /// Strings with a stridx, in stridx order
    pub fn stridx_strings(&self) -> impl Iterator<Item = &StringEntry> + '_ {
        self.stridx_order.iter().map(move |&i| &self.strings[i])
    }

    /// Number of strings with a stridx
    pub fn stridx_count(&self) -> usize {
        self.stridx_order.len()
    }

    /// Stridx of a string
    pub fn stridx_of(&self, bytes: &[u8]) -> Option<usize> {
        self.stridx_index.get(bytes).copied()
    }

    /// Objects with a bidx, in bidx order
    pub fn bidx_objects(&self) -> &[ObjectEntry] {
        &self.objects[..self.bidx_index.len()]
    }

    /// Bidx of an object
    pub fn bidx_of(&self, id: &str) -> Option<usize> {
        self.bidx_index.get(id).copied()
    }

    /// Object id to bidx map, as used for magic resolution
    pub fn bidx_map(&self) -> &HashMap<String, usize> {
        &self.bidx_index
    }

    /// Stridx range of the reserved words
    ///
    /// A missing category yields an empty range at the end.
    pub fn reserved_range(&self) -> ReservedRange {
        let end = self.stridx_count();
        let start = self
            .stridx_strings()
            .position(|s| s.is_reserved_word())
            .unwrap_or(end);
        let strict_start = self
            .stridx_strings()
            .position(|s| s.is_strict_reserved_word())
            .unwrap_or(end);
        ReservedRange {
            start,
            strict_start,
            end,
        }
    }

    /// Dump the graph as pretty printed JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        #[derive(Serialize)]
        struct Dump<'a> {
            target: Target,
            objects: &'a [ObjectEntry],
            strings: &'a [StringEntry],
            strings_stridx: Vec<&'a str>,
        }

        let dump = Dump {
            target: self.target,
            objects: &self.objects,
            strings: &self.strings,
            strings_stridx: self
                .stridx_strings()
                .filter_map(|s| s.define.as_deref())
                .collect(),
        };
        serde_json::to_string_pretty(&dump).map_err(|source| MetadataError::Json {
            document: format!("{} metadata dump", self.target),
            source,
        })
    }
}
