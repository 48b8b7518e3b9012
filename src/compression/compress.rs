use std::io::{ErrorKind, Read};

use log::{debug, info};

use super::compress_block::{compress_stages, BlockOptions};
use super::hooks::CompressHooks;
use crate::error::{try_zeroed, FlickError, Result, StageError, Staged};

/// Totals reported by the file level loops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FileStats {
    /// Blocks processed.
    pub blocks: usize,
    /// Bytes consumed from the source (block payloads only when decompressing).
    pub bytes_in: u64,
    /// Bytes handed to the hooks.
    pub bytes_out: u64,
}

/// Fill `buf` from the source, looping over short reads. Returns how much was read,
/// which is less than the buffer only at end of input.
fn fill_block<R: Read>(source: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Compress everything `source` holds in blocks of at most `max_block` bytes, handing
/// each compressed block to `hooks`. An empty source produces no blocks.
pub fn compress_file<H: CompressHooks, R: Read>(
    hooks: &mut H,
    source: &mut R,
    max_block: usize,
    options: &BlockOptions,
) -> Result<FileStats> {
    compress_blocks(hooks, source, max_block, options).map_err(|e| e.report(|m| hooks.error(m)))
}

fn compress_blocks<H: CompressHooks, R: Read>(
    hooks: &mut H,
    source: &mut R,
    max_block: usize,
    options: &BlockOptions,
) -> core::result::Result<FileStats, StageError> {
    if max_block == 0 {
        return Err(StageError::new("block setup", FlickError::InvalidBlockSize));
    }
    let mut stats = FileStats::default();
    let mut buf: Vec<u8> = try_zeroed(max_block).stage("block setup")?;

    loop {
        let filled = fill_block(source, &mut buf).stage("reading input")?;
        if filled == 0 {
            break;
        }
        let block = compress_stages(&buf[..filled], options)?;
        stats.blocks += 1;
        stats.bytes_in += filled as u64;
        stats.bytes_out += block.len() as u64;
        debug!("Block {}: {} -> {} bytes", stats.blocks, filled, block.len());

        if !hooks.compressed(&block) {
            return Err(StageError::new("compressed block hook", FlickError::HookAborted));
        }
        // A short fill means the source is exhausted
        if filled < max_block {
            break;
        }
    }
    info!(
        "Compressed {} bytes into {} bytes in {} blocks",
        stats.bytes_in, stats.bytes_out, stats.blocks
    );
    Ok(stats)
}

#[cfg(test)]
mod test {
    use super::{compress_file, fill_block};
    use crate::compression::compress_block::{decompress_block, BlockOptions};
    use crate::compression::hooks::CompressHooks;
    use crate::error::FlickError;
    use std::io::{Cursor, Read};

    /// Collects the blocks, optionally refusing after a number of them.
    #[derive(Default)]
    struct Collect {
        blocks: Vec<Vec<u8>>,
        errors: Vec<String>,
        stop_after: Option<usize>,
    }

    impl CompressHooks for Collect {
        fn compressed(&mut self, block: &[u8]) -> bool {
            if self.stop_after == Some(self.blocks.len()) {
                return false;
            }
            self.blocks.push(block.to_vec());
            true
        }
        fn error(&mut self, message: &str) {
            self.errors.push(message.to_string());
        }
    }

    /// Hands out at most 3 bytes per read.
    struct Trickle(Cursor<Vec<u8>>);
    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = buf.len().min(3);
            self.0.read(&mut buf[..n])
        }
    }

    fn sample() -> Vec<u8> {
        b"The quick brown fox jumps over the lazy dog. ".repeat(100)
    }

    #[test]
    fn blocks_test() {
        let data = sample();
        let mut hooks = Collect::default();
        let stats = compress_file(&mut hooks, &mut Cursor::new(&data), 1000, &BlockOptions::new()).unwrap();
        assert_eq!(stats.blocks, 5);
        assert_eq!(hooks.blocks.len(), 5);
        assert_eq!(stats.bytes_in, data.len() as u64);
        let back: Vec<u8> = hooks
            .blocks
            .iter()
            .flat_map(|b| decompress_block(b).unwrap())
            .collect();
        assert_eq!(back, data);
    }

    #[test]
    fn empty_source_test() {
        let mut hooks = Collect::default();
        let stats = compress_file(&mut hooks, &mut Cursor::new(Vec::<u8>::new()), 1000, &BlockOptions::new()).unwrap();
        assert_eq!(stats.blocks, 0);
        assert!(hooks.blocks.is_empty());
    }

    #[test]
    fn short_reads_test() {
        let mut buf = [0_u8; 10];
        let mut source = Trickle(Cursor::new(b"abcdefghijkl".to_vec()));
        assert_eq!(fill_block(&mut source, &mut buf).unwrap(), 10);
        assert_eq!(fill_block(&mut source, &mut buf).unwrap(), 2);

        let data = sample();
        let mut hooks = Collect::default();
        let stats = compress_file(&mut hooks, &mut Trickle(Cursor::new(data.clone())), 4500, &BlockOptions::new()).unwrap();
        // Exactly one full block, then an empty read
        assert_eq!(stats.blocks, 1);
        assert_eq!(decompress_block(&hooks.blocks[0]).unwrap(), data);
    }

    #[test]
    fn hook_abort_test() {
        let mut hooks = Collect {
            stop_after: Some(2),
            ..Default::default()
        };
        let result = compress_file(&mut hooks, &mut Cursor::new(sample()), 1000, &BlockOptions::new());
        assert!(matches!(result, Err(FlickError::HookAborted)));
        assert_eq!(hooks.blocks.len(), 2);
        assert_eq!(hooks.errors, vec!["compressed block hook: aborted by hook".to_string()]);
    }

    #[test]
    fn zero_block_size_test() {
        let mut hooks = Collect::default();
        let result = compress_file(&mut hooks, &mut Cursor::new(sample()), 0, &BlockOptions::new());
        assert!(matches!(result, Err(FlickError::InvalidBlockSize)));
        assert_eq!(hooks.errors.len(), 1);
    }
}
