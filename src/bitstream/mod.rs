//! The bitstream module is the bit level I/O subsystem of the block compressor.
//!
//! - bitpacker: BitQueue, the 64 bit accumulator shared by both directions.
//! - bitwriter: packs bits into a caller supplied buffer of fixed capacity.
//! - bitreader: unpacks bits from a byte slice.
//!
//! Bits are always written and read most significant bit first. Nothing here grows a
//! buffer; the stages that use it size their buffers up front.
//!
pub mod bitpacker;
pub mod bitreader;
pub mod bitwriter;
