//! Read-only string records

use crate::error::{RomError, Result};
use crate::macros::{STRHASH_MACROS, STRINIT_MACROS};
use builtin_meta::{latin1, FinalizedGraph, StringEntry};
use gen_support::csource::c_byte_literal;
use gen_support::hash::{hash_string_dense, hash_string_sparse, unvalidated_utf8_length};
use gen_support::{CSourceWriter, HashWidth, WordOrder};
use std::collections::{BTreeSet, HashMap};

/// Seed the runtime uses when ROM strings are enabled
pub const FIXED_HASH_SEED: u32 = 0xabcd_1234;

/// Pointers per line in the `duk_rom_strings` list
const STRINGS_PER_LINE: usize = 6;

/// C symbol of every string record, by content
#[derive(Debug, Clone, Default)]
pub struct StringSymbols {
    symbols: HashMap<Vec<u8>, String>,
}

impl StringSymbols {
    /// Symbols `duk_str_N`, numbered by position in the graph's string table
    pub fn new(graph: &FinalizedGraph) -> Self {
        let symbols = graph
            .strings()
            .iter()
            .enumerate()
            .map(|(i, s)| (s.bytes.clone(), format!("duk_str_{}", i)))
            .collect();
        StringSymbols { symbols }
    }

    /// Symbol of a string, if it has a record
    pub fn get(&self, bytes: &[u8]) -> Option<&str> {
        self.symbols.get(bytes).map(String::as_str)
    }

    /// Symbol of a string, or an error naming where it was needed
    pub fn require(&self, bytes: &[u8], context: impl FnOnce() -> String) -> Result<&str> {
        self.get(bytes).ok_or_else(|| RomError::MissingString {
            context: context(),
            string: latin1::to_text(bytes),
        })
    }

    /// Symbols ordered by string content
    pub fn by_content(&self) -> Vec<&str> {
        let mut keys: Vec<&Vec<u8>> = self.symbols.keys().collect();
        keys.sort();
        keys.into_iter().map(|k| self.symbols[k].as_str()).collect()
    }
}

/// Canonical array index: decimal without leading zeros, at most 2^32-2
pub fn is_array_index(bytes: &[u8]) -> bool {
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return false;
    }
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    // Longer than u32::MAX in decimal
    if bytes.len() > 10 {
        return false;
    }
    let value = bytes
        .iter()
        .fold(0u64, |acc, &b| acc * 10 + u64::from(b - b'0'));
    value <= 0xffff_fffe
}

/// Heap header flags of a string record
pub fn string_flags(s: &StringEntry) -> Vec<&'static str> {
    let mut flags = vec!["DUK_HTYPE_STRING", "DUK_HEAPHDR_FLAG_READONLY"];
    if unvalidated_utf8_length(&s.bytes) == s.bytes.len() {
        flags.push("DUK_HSTRING_FLAG_ASCII");
    }
    if is_array_index(&s.bytes) {
        flags.push("DUK_HSTRING_FLAG_ARRIDX");
    }
    if s.is_internal() {
        flags.push("DUK_HSTRING_FLAG_INTERNAL");
    }
    if s.bytes == b"eval" || s.bytes == b"arguments" {
        flags.push("DUK_HSTRING_FLAG_EVAL_OR_ARGUMENTS");
    }
    if s.is_reserved_word() {
        flags.push("DUK_HSTRING_FLAG_RESERVED_WORD");
    }
    if s.is_strict_reserved_word() {
        flags.push("DUK_HSTRING_FLAG_STRICT_RESERVED_WORD");
    }
    flags
}

/// `DUK__STRHASH16(le,be,sparse)` for a string
pub fn strhash16_macro(bytes: &[u8]) -> String {
    format!(
        "DUK__STRHASH16({}U,{}U,{}U)",
        hash_string_dense(bytes, FIXED_HASH_SEED, WordOrder::Little, HashWidth::Bits16),
        hash_string_dense(bytes, FIXED_HASH_SEED, WordOrder::Big, HashWidth::Bits16),
        hash_string_sparse(bytes, FIXED_HASH_SEED, HashWidth::Bits16)
    )
}

/// `DUK__STRHASH32(le,be,sparse)` for a string
pub fn strhash32_macro(bytes: &[u8]) -> String {
    format!(
        "DUK__STRHASH32({}UL,{}UL,{}UL)",
        hash_string_dense(bytes, FIXED_HASH_SEED, WordOrder::Little, HashWidth::Bits32),
        hash_string_dense(bytes, FIXED_HASH_SEED, WordOrder::Big, HashWidth::Bits32),
        hash_string_sparse(bytes, FIXED_HASH_SEED, HashWidth::Bits32)
    )
}

/// One `duk_str_N` definition
pub fn string_record(index: usize, s: &StringEntry) -> String {
    let mut data: Vec<String> = s.bytes.iter().map(|&b| c_byte_literal(b)).collect();
    data.push("0".to_string());
    format!(
        "DUK_INTERNAL const duk_romstr_{len} duk_str_{index} = {{DUK__STRINIT({flags},1,{h32},{h16},{len},{clen}),{{{data}}}}};",
        len = s.bytes.len(),
        index = index,
        flags = string_flags(s).join("|"),
        h32 = strhash32_macro(&s.bytes),
        h16 = strhash16_macro(&s.bytes),
        clen = unvalidated_utf8_length(&s.bytes),
        data = data.join(",")
    )
}

/// String records, the interning list and the stridx table
pub fn emit_strings_source(w: &mut CSourceWriter, graph: &FinalizedGraph, symbols: &StringSymbols) -> Result<()> {
    let lengths: BTreeSet<usize> = graph.strings().iter().map(|s| s.bytes.len()).collect();
    for len in lengths {
        w.emit_line(format!(
            "typedef struct duk_romstr_{len} duk_romstr_{len}; struct duk_romstr_{len} {{ duk_hstring hdr; duk_uint8_t data[{}]; }};",
            len + 1,
            len = len
        ));
    }
    w.emit_line("");

    w.emit_lines(STRHASH_MACROS.iter().copied());
    w.emit_lines(STRINIT_MACROS.iter().copied());

    w.emit_line("");
    for (i, s) in graph.strings().iter().enumerate() {
        w.emit_line(string_record(i, s));
    }

    w.emit_line("");
    w.emit_line(format!(
        "DUK_INTERNAL const duk_hstring * const duk_rom_strings[{}] = {{",
        graph.strings().len()
    ));
    let pointers: Vec<String> = (0..graph.strings().len())
        .map(|i| format!("(const duk_hstring *) &duk_str_{}", i))
        .collect();
    let chunks: Vec<&[String]> = pointers.chunks(STRINGS_PER_LINE).collect();
    for (i, chunk) in chunks.iter().enumerate() {
        let sep = if i + 1 < chunks.len() { ", " } else { "" };
        w.emit_line(format!("{}{}", chunk.join(", "), sep));
    }
    w.emit_line("};");

    w.emit_line("");
    w.emit_line(format!(
        "DUK_INTERNAL const duk_hstring * const duk_rom_strings_stridx[{}] = {{",
        graph.stridx_count()
    ));
    for s in graph.stridx_strings() {
        let symbol = symbols.require(&s.bytes, || "stridx table".to_string())?;
        w.emit_line(format!("\t(const duk_hstring *) &{},", symbol));
    }
    w.emit_line("};");
    Ok(())
}

/// Declarations of the string lists
pub fn emit_strings_header(w: &mut CSourceWriter, graph: &FinalizedGraph) {
    w.emit_line("#if !defined(DUK_SINGLE_FILE)");
    w.emit_line(format!(
        "DUK_INTERNAL_DECL const duk_hstring * const duk_rom_strings[{}];",
        graph.strings().len()
    ));
    w.emit_line(format!(
        "DUK_INTERNAL_DECL const duk_hstring * const duk_rom_strings_stridx[{}];",
        graph.stridx_count()
    ));
    w.emit_line("#endif");
}
