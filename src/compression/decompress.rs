use std::io::{BufRead, Read};

use log::{debug, info, trace};

use super::compress::FileStats;
use super::compress_block::decompress_stages;
use super::hooks::DecompressHooks;
use crate::error::{FlickError, Result, StageError, Staged};

/// How far decompress_file reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// Until the source is exhausted.
    UntilEof,
    /// Until this many bytes of block payload have been read. Framing read by the
    /// block_start hook is not counted.
    Bytes(u64),
}

/// Decompress blocks from `source`. For every block the block_start hook reports the
/// stored size, exactly that many bytes are read and decompressed, and the result goes
/// to the decompressed hook.
pub fn decompress_file<H: DecompressHooks<R>, R: BufRead>(
    hooks: &mut H,
    source: &mut R,
    limit: Limit,
) -> Result<FileStats> {
    decompress_blocks(hooks, source, limit).map_err(|e| e.report(|m| hooks.error(m)))
}

fn decompress_blocks<H: DecompressHooks<R>, R: BufRead>(
    hooks: &mut H,
    source: &mut R,
    limit: Limit,
) -> core::result::Result<FileStats, StageError> {
    let mut stats = FileStats::default();
    let mut remaining = match limit {
        Limit::UntilEof => None,
        Limit::Bytes(n) => Some(n),
    };

    loop {
        let exhausted = source.fill_buf().stage("reading input")?.is_empty();
        match remaining {
            None if exhausted => break,
            Some(0) => break,
            Some(left) if exhausted => {
                trace!("Source ended with {} bytes of budget left", left);
                return Err(StageError::new("reading input", FlickError::UnexpectedEnd));
            }
            _ => {}
        }

        let size = hooks
            .block_start(source)
            .ok_or(FlickError::HookAborted)
            .stage("block start hook")?;
        if let Some(left) = remaining {
            if size as u64 > left {
                let error = FlickError::malformed(format!(
                    "block of {} bytes with only {} left",
                    size, left
                ));
                return Err(StageError::new("reading input", error));
            }
        }

        // The size is untrusted, so the buffer only grows as data actually arrives
        let mut block = Vec::new();
        let got = (&mut *source)
            .take(size as u64)
            .read_to_end(&mut block)
            .stage("reading input")?;
        if got < size {
            return Err(StageError::new("reading input", FlickError::UnexpectedEnd));
        }
        let out = decompress_stages(&block)?;
        drop(block);

        stats.blocks += 1;
        stats.bytes_in += size as u64;
        stats.bytes_out += out.len() as u64;
        debug!("Block {}: {} -> {} bytes", stats.blocks, size, out.len());

        if !hooks.decompressed(&out) {
            return Err(StageError::new("decompressed block hook", FlickError::HookAborted));
        }
        if let Some(left) = remaining.as_mut() {
            *left -= size as u64;
        }
    }
    info!(
        "Decompressed {} blocks into {} bytes",
        stats.blocks, stats.bytes_out
    );
    Ok(stats)
}
