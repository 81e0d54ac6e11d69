//! String hash primitives
//!
//! Mirrors the runtime's string hashing so that precomputed hashes in
//! read-only string records match what the runtime would compute.

/// Multiplier of the dense (MurmurHash2 style) hash
pub const MURMUR_M: u32 = 0x5bd1_e995;

/// Right shift used when mixing each 32-bit word
pub const MURMUR_R: u32 = 24;

/// Skip shift of the sparse hash: every `(len >> 5) + 1`th byte is hashed
pub const SPARSE_SKIP_SHIFT: u32 = 5;

/// Byte order used when fetching 32-bit words in the dense hash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordOrder {
    /// Little endian fetch (also used when unaligned access is unavailable)
    Little,
    /// Big endian fetch (unaligned access on a big endian host)
    Big,
}

/// Width of the stored hash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashWidth {
    /// 16-bit hash field (low-memory builds)
    Bits16,
    /// 32-bit hash field
    Bits32,
}

impl HashWidth {
    fn truncate(self, hash: u32) -> u32 {
        match self {
            HashWidth::Bits16 => hash & 0xffff,
            HashWidth::Bits32 => hash,
        }
    }
}

/// MurmurHash2 variant over a byte slice
pub fn hash_bytes(data: &[u8], seed: u32, order: WordOrder) -> u32 {
    let mut h = seed ^ (data.len() as u32);

    let mut chunks = data.chunks_exact(4);
    for chunk in &mut chunks {
        let word = [chunk[0], chunk[1], chunk[2], chunk[3]];
        let mut k = match order {
            WordOrder::Little => u32::from_le_bytes(word),
            WordOrder::Big => u32::from_be_bytes(word),
        };
        k = k.wrapping_mul(MURMUR_M);
        k ^= k >> MURMUR_R;
        k = k.wrapping_mul(MURMUR_M);
        h = h.wrapping_mul(MURMUR_M);
        h ^= k;
    }

    let tail = chunks.remainder();
    if !tail.is_empty() {
        if tail.len() >= 3 {
            h ^= u32::from(tail[2]) << 16;
        }
        if tail.len() >= 2 {
            h ^= u32::from(tail[1]) << 8;
        }
        h ^= u32::from(tail[0]);
        h = h.wrapping_mul(MURMUR_M);
    }

    h ^= h >> 13;
    h = h.wrapping_mul(MURMUR_M);
    h ^= h >> 15;
    h
}

/// Dense string hash
pub fn hash_string_dense(data: &[u8], seed: u32, order: WordOrder, width: HashWidth) -> u32 {
    width.truncate(hash_bytes(data, seed, order))
}

/// Sparse string hash, samples bytes from the end of the string
pub fn hash_string_sparse(data: &[u8], seed: u32, width: HashWidth) -> u32 {
    let len = data.len();
    let mut hash = seed ^ (len as u32);
    let step = (len >> SPARSE_SKIP_SHIFT) + 1;
    let mut off = len;
    while off >= step {
        hash = hash.wrapping_mul(33).wrapping_add(u32::from(data[off - 1]));
        off -= step;
    }
    width.truncate(hash)
}

/// Character length of a byte string as the runtime computes it without
/// validating UTF-8: every byte that is not a continuation byte starts a
/// character.
pub fn unvalidated_utf8_length(data: &[u8]) -> usize {
    data.iter().filter(|b| (**b & 0xc0) != 0x80).count()
}
