//! RAM init data encoder
//!
//! Produces the bit-packed streams the runtime decodes into heap objects at
//! startup: a 5-bit string stream and an object stream per double byte
//! order. See [`strings`] and [`objects`] for the formats.
//!
//! # Example
//!
//! ```no_run
//! use builtin_meta::{MetadataLoader, Target};
//! use ram_encoder::RamEncoder;
//!
//! # fn graph() -> builtin_meta::FinalizedGraph { unimplemented!() }
//! let graph = graph();
//! let data = RamEncoder::new(&graph).encode().unwrap();
//! println!("{} bytes of string data", data.strings.data.len());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod emit;
pub mod error;
pub mod layout;
pub mod objects;
pub mod strings;

pub use emit::RamInitData;
pub use error::{EncodeError, Result};
pub use layout::RamLayout;
pub use objects::{encode_objects, ByteOrder, PropType};
pub use strings::{encode_strings, EncodedStrings};

use builtin_meta::FinalizedGraph;
use tracing::info;

/// Encoder over one finalized RAM graph
#[derive(Debug)]
pub struct RamEncoder<'g> {
    graph: &'g FinalizedGraph,
    layout: RamLayout,
}

impl<'g> RamEncoder<'g> {
    /// Derive the top level list and native table for `graph`
    pub fn new(graph: &'g FinalizedGraph) -> Self {
        RamEncoder {
            graph,
            layout: RamLayout::new(graph),
        }
    }

    /// Layout used for object references
    pub fn layout(&self) -> &RamLayout {
        &self.layout
    }

    /// Encode strings and all three object stream variants
    pub fn encode(&self) -> Result<RamInitData> {
        let strings = encode_strings(self.graph.stridx_strings())?;

        let mut objects = Vec::with_capacity(ByteOrder::ALL.len());
        for order in ByteOrder::ALL {
            let (data, stats) = encode_objects(self.graph, &self.layout, order)?;
            if order == ByteOrder::Little {
                info!(
                    "{} ram builtins, {} normal properties, {} function properties, {} bytes of object init data",
                    stats.objects,
                    stats.normal_props,
                    stats.function_props,
                    data.len()
                );
            }
            objects.push((order, data));
        }

        Ok(RamInitData {
            strings,
            natives: self.layout.natives().to_vec(),
            objects,
            bidx_defines: emit::bidx_defines(self.graph),
            top_level_count: self.layout.top_level_count(),
        })
    }
}
