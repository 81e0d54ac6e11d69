//! Runtime string index layout
//!
//! Strings needing a stridx are laid out in four categories:
//!
//! 1. non-reserved words that need an 8-bit index
//! 2. other non-reserved words
//! 3. reserved words
//! 4. reserved words in strict mode only
//!
//! Categories 3 and 4 come straight from the lexer token order since token
//! numbers are derived from stridx values by subtraction. The remaining
//! strings are sorted stably by category.

use crate::error::{MetadataError, Result};
use crate::latin1;
use crate::model::StringEntry;
use std::collections::HashMap;

/// Largest stridx count representable in 8 bits
pub const NARROW_INDEX_LIMIT: usize = 256;

/// Compute the stridx order
///
/// Returns positions into `strings` in stridx order. Only entries with
/// `stridx_used` take part.
pub fn plan_string_layout(strings: &[StringEntry], token_order: &[Vec<u8>]) -> Result<Vec<usize>> {
    let candidates: Vec<usize> = (0..strings.len()).filter(|&i| strings[i].stridx_used).collect();
    let by_bytes: HashMap<&[u8], usize> = candidates
        .iter()
        .map(|&i| (strings[i].bytes.as_slice(), i))
        .collect();

    let mut keywords: Vec<usize> = Vec::with_capacity(token_order.len());
    let mut seen_strict = false;
    for word in token_order {
        let token_error = |reason| MetadataError::TokenOrder {
            word: latin1::to_text(word),
            reason,
        };
        let idx = *by_bytes
            .get(word.as_slice())
            .ok_or_else(|| token_error("listed in token order but not in strings"))?;
        if keywords.contains(&idx) {
            return Err(token_error("listed twice in token order"));
        }
        let entry = &strings[idx];
        if !entry.is_reserved_word() {
            return Err(token_error("listed in token order but not a reserved word"));
        }
        if entry.is_strict_reserved_word() {
            seen_strict = true;
        } else if seen_strict {
            return Err(token_error("non-strict reserved word after strict ones"));
        }
        keywords.push(idx);
    }

    let mut rest: Vec<usize> = Vec::with_capacity(candidates.len());
    for &i in &candidates {
        if keywords.contains(&i) {
            continue;
        }
        if strings[i].is_reserved_word() {
            return Err(MetadataError::TokenOrder {
                word: latin1::to_text(&strings[i].bytes),
                reason: "reserved word missing from token order",
            });
        }
        rest.push(i);
    }

    // Vec::sort_by_key is stable.
    rest.sort_by_key(|&i| if strings[i].requires_narrow_index() { 0 } else { 1 });

    let narrow = rest
        .iter()
        .filter(|&&i| strings[i].requires_narrow_index())
        .count();
    if narrow > NARROW_INDEX_LIMIT {
        return Err(MetadataError::CapacityOverflow {
            what: "strings requiring an 8-bit stridx".to_string(),
            count: narrow,
            limit: NARROW_INDEX_LIMIT,
        });
    }

    rest.extend(keywords);
    Ok(rest)
}
