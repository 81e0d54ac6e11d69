//! 5-bit string stream

use crate::fixtures::ram_graph;
use builtin_meta::model::StringOrigin;
use builtin_meta::StringEntry;
use gen_support::BitDecoder;
use ram_encoder::strings::*;
use ram_encoder::{encode_strings, EncodeError};

/// Reference decoder mirroring the runtime's string init loop
fn decode(data: &[u8], count: usize) -> Vec<Vec<u8>> {
    let mut dec = BitDecoder::new(data);
    let mut out = Vec::new();
    for _ in 0..count {
        let len = dec.bits(LENGTH_BITS).unwrap();
        let mut upper = false;
        let mut s = Vec::new();
        while s.len() < len as usize {
            let sym = dec.bits(SYMBOL_BITS).unwrap();
            match sym {
                0..=25 => s.push(if upper { b'A' } else { b'a' } + sym as u8),
                SYM_UNDERSCORE => s.push(b'_'),
                SYM_INTERNAL => s.push(0xff),
                SYM_SWITCH1 => {
                    let next = dec.bits(SYMBOL_BITS).unwrap() as u8;
                    s.push(if upper { b'a' } else { b'A' } + next);
                }
                SYM_SWITCH => upper = !upper,
                SYM_SEVENBIT => s.push(dec.bits(SEVENBIT_BITS).unwrap() as u8),
                other => panic!("unexpected symbol {}", other),
            }
        }
        out.push(s);
    }
    out
}

fn entries(words: &[&[u8]]) -> Vec<StringEntry> {
    words
        .iter()
        .map(|w| StringEntry::new(w.to_vec(), StringOrigin::Document))
        .collect()
}

/// Mixed case, digits, underscores and internal keys survive decoding
#[test]
fn test_round_trip_mixed_content() {
    let words: Vec<&[u8]> = vec![
        b"toString",
        b"DUK_VERSION",
        b"\xffValue",
        b"x1y2",
        b"NaN",
        b"",
        b"Infinity",
        b"isPrototypeOf",
    ];
    let out = encode_strings(&entries(&words)).unwrap();
    assert_eq!(out.count, words.len());
    assert_eq!(out.max_len, 13);
    let decoded = decode(&out.data, words.len());
    let expected: Vec<Vec<u8>> = words.iter().map(|w| w.to_vec()).collect();
    assert_eq!(decoded, expected);
}

/// Stridx strings of a loaded graph decode back in stridx order
#[test]
fn test_graph_strings_round_trip() {
    let graph = ram_graph();
    let out = encode_strings(graph.stridx_strings()).unwrap();
    let decoded = decode(&out.data, graph.stridx_count());
    let expected: Vec<Vec<u8>> = graph.stridx_strings().map(|s| s.bytes.clone()).collect();
    assert_eq!(decoded, expected);
}

/// A run of uppercase letters switches mode once
#[test]
fn test_uppercase_run_uses_persistent_switch() {
    let out = encode_strings(&entries(&[b"ABC"])).unwrap();
    // 5 bit length, switch, three letters: 25 bits in 4 bytes
    assert_eq!(out.data.len(), 4);
    let mut dec = BitDecoder::new(&out.data);
    assert_eq!(dec.bits(LENGTH_BITS).unwrap(), 3);
    assert_eq!(dec.bits(SYMBOL_BITS).unwrap(), SYM_SWITCH);
    assert_eq!(dec.bits(SYMBOL_BITS).unwrap(), 0);
}

/// Strings longer than the length field are rejected
#[test]
fn test_length_limit() {
    let ok = vec![b'a'; 31];
    assert!(encode_strings(&entries(&[&ok])).is_ok());
    let long = vec![b'a'; 32];
    assert!(matches!(
        encode_strings(&entries(&[&long])),
        Err(EncodeError::CapacityOverflow { limit: 31, .. })
    ));
}
