//! Caller supplied hooks for the file level compress and decompress loops, plus the
//! length prefixed framing used by the command line tool.
//!
//! The loops never decide where a block goes or how its size is recorded; a hook does.
//! Returning false (or None) from a hook stops the loop with HookAborted.
//!
use std::io::{self, BufRead, Write};

use log::error;

/// Hooks used by compress_file.
pub trait CompressHooks {
    /// Receives every compressed block in file order. Return false to stop.
    fn compressed(&mut self, block: &[u8]) -> bool;

    /// Receives a short description of any failure before it is returned.
    fn error(&mut self, _message: &str) {}
}

/// Hooks used by decompress_file.
pub trait DecompressHooks<R> {
    /// Called before each block. Reads whatever framing precedes the block from the
    /// source and returns the block's stored size, or None to stop.
    fn block_start(&mut self, source: &mut R) -> Option<usize>;

    /// Receives every decompressed block in file order. Return false to stop.
    fn decompressed(&mut self, block: &[u8]) -> bool;

    /// Receives a short description of any failure before it is returned.
    fn error(&mut self, _message: &str) {}
}

/// Bytes of the big-endian block length written in front of every framed block.
pub const FRAME_HEADER: usize = 4;

/// Writes each compressed block to `writer` behind a 4 byte big-endian length.
pub struct FramedWriter<W> {
    writer: W,
    /// Set when the writer failed, so the caller can report the real cause.
    pub io_error: Option<io::Error>,
    /// Bytes written, framing included.
    pub written: u64,
}

impl<W: Write> FramedWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            io_error: None,
            written: 0,
        }
    }

    fn frame(&mut self, block: &[u8]) -> io::Result<()> {
        let len = u32::try_from(block.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "block too large to frame"))?;
        self.writer.write_all(&len.to_be_bytes())?;
        self.writer.write_all(block)?;
        self.written += (FRAME_HEADER + block.len()) as u64;
        Ok(())
    }

    /// Flush and hand back the writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> CompressHooks for FramedWriter<W> {
    fn compressed(&mut self, block: &[u8]) -> bool {
        match self.frame(block) {
            Ok(()) => true,
            Err(e) => {
                self.io_error = Some(e);
                false
            }
        }
    }

    fn error(&mut self, message: &str) {
        error!("Compression failed: {}", message);
    }
}

/// Reads the 4 byte length in front of each framed block and writes the decompressed
/// blocks to `writer`.
pub struct FramedReader<W> {
    writer: W,
    /// Set when reading the frame or writing the output failed.
    pub io_error: Option<io::Error>,
    /// Bytes written.
    pub written: u64,
}

impl<W: Write> FramedReader<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            io_error: None,
            written: 0,
        }
    }

    /// Flush and hand back the writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<R: BufRead, W: Write> DecompressHooks<R> for FramedReader<W> {
    fn block_start(&mut self, source: &mut R) -> Option<usize> {
        let mut header = [0_u8; FRAME_HEADER];
        match source.read_exact(&mut header) {
            Ok(()) => Some(u32::from_be_bytes(header) as usize),
            Err(e) => {
                self.io_error = Some(e);
                None
            }
        }
    }

    fn decompressed(&mut self, block: &[u8]) -> bool {
        match self.writer.write_all(block) {
            Ok(()) => {
                self.written += block.len() as u64;
                true
            }
            Err(e) => {
                self.io_error = Some(e);
                false
            }
        }
    }

    fn error(&mut self, message: &str) {
        error!("Decompression failed: {}", message);
    }
}
