//! flick, a lossless block compressor.
//!
//! Version 0.1.0
//!
//! Each block runs through a fixed chain of reversible transforms: optional run length
//! coding, a Burrows-Wheeler Transform, Move To Front recoding, optional packbits, and
//! canonical Huffman coding over a bit level stream codec.
//!
//! The library is block oriented and leaves framing to its caller. The `flick` binary
//! frames each block behind a 4 byte length:
//!
//! `$> flick test.txt`
//!
//! This will compress the file and create the file test.txt.flk.
//!
//! ```
//! use flick::compression::compress_block::{compress_block, decompress_block, BlockOptions};
//!
//! let data = b"how much wood would a woodchuck chuck".repeat(10);
//! let packed = compress_block(&data, &BlockOptions::default()).unwrap();
//! assert_eq!(decompress_block(&packed).unwrap(), data);
//! ```
//!
pub mod bitstream;
pub mod bwt_algorithms;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod tools;

pub use error::{FlickError, Result};
