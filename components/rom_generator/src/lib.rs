//! ROM static initializer generator
//!
//! Writes every built-in string and object as a `const` C record so that
//! the runtime can use them straight from read-only memory. Records refer
//! to each other by address; low-memory builds reach them through the
//! compressed pointer table built in [`ptrcomp`].
//!
//! Source emission order is: string records ([`strings`]), the fixed
//! typedefs and macros ([`macros`]), then object records and property
//! tables ([`objects`]).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod macros;
pub mod objects;
pub mod ptrcomp;
pub mod strings;
pub mod values;

pub use error::{Result, RomError};
pub use objects::{PropertyLayout, RomObjectStats};
pub use ptrcomp::{PointerCompressor, ROMPTR_FIRST};
pub use strings::{StringSymbols, FIXED_HASH_SEED};

use builtin_meta::FinalizedGraph;
use gen_support::CSourceWriter;
use macros::{DBLBYTES_MACROS, OBJECT_INIT_MACROS, TVAL_MACROS, TVAL_TYPES};
use tracing::info;

/// Generator over one finalized ROM graph
#[derive(Debug)]
pub struct RomGenerator<'g> {
    graph: &'g FinalizedGraph,
    strings: StringSymbols,
}

impl<'g> RomGenerator<'g> {
    /// Assign string symbols for `graph`
    pub fn new(graph: &'g FinalizedGraph) -> Self {
        RomGenerator {
            graph,
            strings: StringSymbols::new(graph),
        }
    }

    /// String symbols used by the records
    pub fn string_symbols(&self) -> &StringSymbols {
        &self.strings
    }

    /// Strings, typedefs and macros, then objects
    pub fn emit_source(&self, w: &mut CSourceWriter) -> Result<RomObjectStats> {
        strings::emit_strings_source(w, self.graph, &self.strings)?;
        w.emit_lines(OBJECT_INIT_MACROS.iter().copied());
        w.emit_lines(TVAL_TYPES.iter().copied());
        w.emit_lines(DBLBYTES_MACROS.iter().copied());
        w.emit_lines(TVAL_MACROS.iter().copied());
        let stats = objects::emit_objects_source(w, self.graph, &self.strings)?;
        info!(
            "{} rom strings, {} rom objects, {} rom properties",
            self.graph.strings().len(),
            stats.objects,
            stats.properties
        );
        Ok(stats)
    }

    /// Declarations of the string lists
    pub fn emit_strings_header(&self, w: &mut CSourceWriter) {
        strings::emit_strings_header(w, self.graph);
    }

    /// Bidx defines and object table declaration
    pub fn emit_objects_header(&self, w: &mut CSourceWriter) {
        objects::emit_objects_header(w, self.graph);
    }
}
