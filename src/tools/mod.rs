//! The tools module provides the smaller stages and helpers of the block compressor.
//!
//! The tools are:
//! - cli: Command line options for the flick binary.
//! - freq_count: Byte frequency count.
//! - mtf: Move-To-Front transform with three update policies.
//! - packbits: Packbits run length encoding, used after the MTF stage.
//! - rle: Basic run length encoding, used before the BWT.
//!
pub mod cli;
pub mod freq_count;
pub mod mtf;
pub mod packbits;
pub mod rle;
