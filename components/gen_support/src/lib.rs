//! Support primitives for built-in init data generation
//!
//! This crate provides the low-level services the encoders build on:
//!
//! - [`BitEncoder`] / [`BitDecoder`]: MSB-first bit streams
//! - [`hash`]: the runtime's string hash functions (dense and sparse variants)
//! - [`CSourceWriter`]: line-oriented C source/header text emission
//!
//! # Example
//!
//! ```
//! use gen_support::{BitDecoder, BitEncoder};
//!
//! let mut enc = BitEncoder::new();
//! enc.bits(5, 3).unwrap();
//! enc.bits(1, 1).unwrap();
//! let bytes = enc.finish();
//! assert_eq!(bytes, vec![0b1011_0000]);
//!
//! let mut dec = BitDecoder::new(&bytes);
//! assert_eq!(dec.bits(3).unwrap(), 5);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bitstream;
pub mod csource;
pub mod hash;

pub use bitstream::{BitDecoder, BitEncoder, BitstreamError};
pub use csource::{ArrayDecl, CSourceWriter};
pub use hash::{HashWidth, WordOrder};
