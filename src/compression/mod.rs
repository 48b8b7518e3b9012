//! The compression module is the pipeline orchestrator of the block compressor.
//!
//! Compression of a block happens in the following steps:
//! - Run Length Encoding (basic or zeros only): tried first, kept only if it shrinks the block.
//! - Burrows Wheeler Transform: sort the rotations so bytes with similar contexts cluster.
//! - Move To Front transform (MTF1): turn those clusters into runs of small values.
//! - Packbits RLE: tried on the MTF output, kept only if it shrinks it.
//! - Huffman coding: one canonical table per block. If that can not shrink the block,
//!   the block is stored.
//!
//! The first byte of every compressed block records which optional steps were applied.
//! Decompression runs the same steps in reverse.
//!
//! compress and decompress drive whole files a block at a time. Where each block goes
//! and how its length is framed is left to the caller's hooks.
//!

pub mod compress;
pub mod compress_block;
pub mod decompress;
pub mod hooks;
