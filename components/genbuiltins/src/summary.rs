//! Build metadata JSON

use crate::build_info::BuildInfo;
use crate::error::{GenError, GenResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use builtin_meta::{latin1, FinalizedGraph};
use serde::Serialize;

/// One stridx string in the summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StringInfo {
    /// Content, base64
    pub base64: String,
    /// `DUK_STRIDX_xxx` name
    pub define: String,
    /// Content as text, bytes mapped to code points
    pub plain: String,
}

/// Summary document
///
/// Fields are declared in key order so the output is sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildSummary {
    /// Stridx strings as text
    pub builtin_strings: Vec<String>,
    /// Stridx strings, base64
    pub builtin_strings_base64: Vec<String>,
    /// Per string details
    pub builtin_strings_info: Vec<StringInfo>,
    /// Fixed comment
    pub comment: String,
    /// Numeric version
    pub duk_version: i64,
    /// Dotted version
    pub duk_version_string: String,
    /// Build identifier
    pub git_describe: String,
}

impl BuildSummary {
    /// Collect the summary from a RAM graph
    pub fn new(graph: &FinalizedGraph, build_info: &BuildInfo) -> Self {
        let mut summary = BuildSummary {
            builtin_strings: Vec::new(),
            builtin_strings_base64: Vec::new(),
            builtin_strings_info: Vec::new(),
            comment: "Metadata for Duktape build".to_string(),
            duk_version: build_info.version,
            duk_version_string: build_info.version_string(),
            git_describe: build_info.git_describe.clone(),
        };
        for s in graph.stridx_strings() {
            let plain = latin1::to_text(&s.bytes);
            let base64 = STANDARD.encode(&s.bytes);
            summary.builtin_strings.push(plain.clone());
            summary.builtin_strings_base64.push(base64.clone());
            summary.builtin_strings_info.push(StringInfo {
                base64,
                define: s.define.clone().unwrap_or_default(),
                plain,
            });
        }
        summary
    }

    /// Render as 4-space indented, ASCII-only JSON
    pub fn to_json(&self) -> GenResult<String> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut ser).map_err(|source| GenError::Json {
            document: "build metadata".to_string(),
            source,
        })?;
        let text = String::from_utf8_lossy(&out);
        Ok(escape_non_ascii(&text))
    }
}

/// Replace every non-ASCII character with `\uXXXX` escapes
///
/// Only valid inside JSON string literals, which is the only place
/// serde_json emits non-ASCII text.
pub fn escape_non_ascii(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    out
}
