//! The bwt_algorithms module is the block sorting subsystem of the compressor.
//!
//! The Burrows-Wheeler Transform (BWT) reorders a block so that bytes sharing a following
//! context end up next to each other. That produces runs which the MTF and entropy
//! stages can exploit.
//!
//! - bwt: the forward transform and its inverse.
//! - bwt_sort: multikey quicksort of the block rotations.
//!
pub mod bwt;
pub mod bwt_sort;
