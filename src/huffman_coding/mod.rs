//! The huffman module is the entropy coding stage of the block compressor.
//!
//! Each block is coded with one canonical huffman table. Code lengths are calculated in
//! place from the sorted symbol frequencies (Moffat-Katajainen), and only the lengths are
//! stored; the codes themselves are rebuilt from them on both sides.
//!
//! - huffman: block encode and decode.
//! - huffman_code_from_weights: minimum-redundancy code lengths.
//! - dictionary: frequency ordering, canonical codes, table serialization and the
//!   decode table.
//!

pub mod dictionary;
pub mod huffman;
pub mod huffman_code_from_weights;
