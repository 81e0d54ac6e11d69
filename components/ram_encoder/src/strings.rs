//! 5-bit string stream
//!
//! Each string is a 5-bit length followed by 5-bit symbols. Decoding starts
//! in lowercase mode:
//!
//! | symbol | meaning |
//! |---|---|
//! | 0-25 | letter in the current case |
//! | 26 | `_` |
//! | 27 | 0xFF internal marker |
//! | 28 | reserved |
//! | 29 | next letter in the other case |
//! | 30 | switch case |
//! | 31 | 7-bit byte follows |

use crate::error::{EncodeError, Result};
use builtin_meta::{latin1, StringEntry};
use gen_support::BitEncoder;
use tracing::info;

/// Length prefix width
pub const LENGTH_BITS: u32 = 5;
/// Symbol width
pub const SYMBOL_BITS: u32 = 5;
/// Verbatim byte width
pub const SEVENBIT_BITS: u32 = 7;

/// `_`
pub const SYM_UNDERSCORE: u32 = 26;
/// 0xFF internal marker
pub const SYM_INTERNAL: u32 = 27;
/// One-shot case switch
pub const SYM_SWITCH1: u32 = 29;
/// Persistent case switch
pub const SYM_SWITCH: u32 = 30;
/// Verbatim 7-bit byte
pub const SYM_SEVENBIT: u32 = 31;

/// Encoded string stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedStrings {
    /// Packed bytes
    pub data: Vec<u8>,
    /// Longest string, in bytes
    pub max_len: usize,
    /// Number of strings
    pub count: usize,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Case {
    Lower,
    Upper,
}

impl Case {
    fn of(byte: u8) -> Option<Case> {
        match byte {
            b'a'..=b'z' => Some(Case::Lower),
            b'A'..=b'Z' => Some(Case::Upper),
            _ => None,
        }
    }
}

#[derive(Default)]
struct Stats {
    optimal: usize,
    switch1: usize,
    switch: usize,
    sevenbit: usize,
}

fn letter(byte: u8) -> u32 {
    u32::from(byte.to_ascii_lowercase() - b'a')
}

fn encode_one(enc: &mut BitEncoder, bytes: &[u8], stats: &mut Stats) -> Result<()> {
    let limit = (1usize << LENGTH_BITS) - 1;
    if bytes.len() > limit {
        return Err(EncodeError::CapacityOverflow {
            what: format!("length of string {:?}", latin1::to_text(bytes)),
            value: bytes.len(),
            limit,
        });
    }
    enc.bits(bytes.len() as u32, LENGTH_BITS)?;

    let mut mode = Case::Lower;
    for (i, &c) in bytes.iter().enumerate() {
        let next = bytes.get(i + 1).and_then(|&n| Case::of(n));
        match (c, Case::of(c)) {
            (b'_', _) => {
                enc.bits(SYM_UNDERSCORE, SYMBOL_BITS)?;
                stats.optimal += 1;
            }
            (0xff, _) => {
                enc.bits(SYM_INTERNAL, SYMBOL_BITS)?;
                stats.optimal += 1;
            }
            (_, Some(case)) if case == mode => {
                enc.bits(letter(c), SYMBOL_BITS)?;
                stats.optimal += 1;
            }
            (_, Some(case)) => {
                if next == Some(case) {
                    enc.bits(SYM_SWITCH, SYMBOL_BITS)?;
                    mode = case;
                    stats.switch += 1;
                } else {
                    enc.bits(SYM_SWITCH1, SYMBOL_BITS)?;
                    stats.switch1 += 1;
                }
                enc.bits(letter(c), SYMBOL_BITS)?;
            }
            (_, None) => {
                if c > 0x7f {
                    return Err(EncodeError::NonAsciiLiteral {
                        byte: c,
                        context: latin1::to_text(bytes),
                    });
                }
                enc.bits(SYM_SEVENBIT, SYMBOL_BITS)?;
                enc.bits(u32::from(c), SEVENBIT_BITS)?;
                stats.sevenbit += 1;
            }
        }
    }
    Ok(())
}

/// Encode strings in the given order
pub fn encode_strings<'a, I>(strings: I) -> Result<EncodedStrings>
where
    I: IntoIterator<Item = &'a StringEntry>,
{
    let mut enc = BitEncoder::new();
    let mut stats = Stats::default();
    let mut max_len = 0;
    let mut count = 0;

    for s in strings {
        encode_one(&mut enc, &s.bytes, &mut stats)?;
        max_len = max_len.max(s.bytes.len());
        count += 1;
    }

    let data = enc.finish();
    info!(
        "{} ram strings, {} bytes of string init data, {} maximum string length, encoding: optimal={},switch1={},switch={},sevenbit={}",
        count,
        data.len(),
        max_len,
        stats.optimal,
        stats.switch1,
        stats.switch,
        stats.sevenbit
    );
    Ok(EncodedStrings {
        data,
        max_len,
        count,
    })
}
