//! Compile-time compressed pointers
//!
//! ROM objects are referenced from 16-bit heap pointers in low-memory
//! builds. Every ROM symbol that may be referenced gets a running number
//! starting at [`ROMPTR_FIRST`]; the runtime decodes these through the
//! emitted `duk_rom_compressed_pointers` table.

use crate::error::{RomError, Result};
use gen_support::CSourceWriter;
use std::collections::HashMap;

/// First compressed pointer value reserved for ROM data
pub const ROMPTR_FIRST: u32 = 0xf800;

/// Assigns compressed pointer values in first-use order
#[derive(Debug, Clone, Default)]
pub struct PointerCompressor {
    symbols: Vec<String>,
    index: HashMap<String, usize>,
}

impl PointerCompressor {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Compressed value of `&symbol`, assigning one on first use;
    /// `None` is NULL and compresses to 0
    pub fn compress(&mut self, symbol: Option<&str>) -> Result<u32> {
        let Some(symbol) = symbol else {
            return Ok(0);
        };
        let idx = match self.index.get(symbol) {
            Some(&idx) => idx,
            None => {
                let idx = self.symbols.len();
                if ROMPTR_FIRST as usize + idx > 0xffff {
                    return Err(RomError::PointerSpaceExhausted { count: idx + 1 });
                }
                self.symbols.push(symbol.to_string());
                self.index.insert(symbol.to_string(), idx);
                idx
            }
        };
        Ok(ROMPTR_FIRST + idx as u32)
    }

    /// Number of assigned pointers
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// No pointers assigned yet
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Highest assigned value, or `ROMPTR_FIRST - 1` when empty
    pub fn highest(&self) -> u32 {
        ROMPTR_FIRST + self.symbols.len() as u32 - 1
    }

    /// Emit the decode table, NULL terminated
    pub fn emit_table(&self, w: &mut CSourceWriter) {
        w.emit_line("#if defined(DUK_USE_ROM_OBJECTS) && defined(DUK_USE_HEAPPTR16)");
        w.emit_line(format!(
            "DUK_EXTERNAL const void * const duk_rom_compressed_pointers[{}] = {{",
            self.symbols.len() + 1
        ));
        for (idx, symbol) in self.symbols.iter().enumerate() {
            w.emit_line(format!(
                "\t(const void *) &{},  /* 0x{:04x} */",
                symbol,
                ROMPTR_FIRST as usize + idx
            ));
        }
        w.emit_line("\tNULL");
        w.emit_line("};");
        w.emit_line("#endif");
    }
}
