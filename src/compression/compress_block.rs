use std::borrow::Cow;
use std::fmt::{Display, Formatter};

use log::{debug, info, trace, warn};

use crate::bwt_algorithms::bwt::{bwt_decode, bwt_encode};
use crate::error::{try_with_capacity, FlickError, Result, StageError, Staged};
use crate::huffman_coding::huffman::{huf_decode, huf_encode};
use crate::tools::mtf::{mtf_decode, mtf_encode, MtfModel};
use crate::tools::packbits::{packbits_decode, packbits_encode};
use crate::tools::rle::{rle_basic_decode, rle_basic_encode};

/// Mode byte: packbits was applied after the MTF stage.
pub const MODE_POST_RLE: u8 = 0x01;
/// Mode byte: huffman could not shrink the block, the payload is stored as is.
pub const MODE_STORED: u8 = 0x02;
/// Mode byte: basic RLE was applied before the BWT.
pub const MODE_PRE_RLE: u8 = 0x04;
/// Mode byte: zeros only RLE was applied before the BWT.
pub const MODE_PRE_RLE_ZEROS: u8 = 0x08;
const MODE_KNOWN: u8 = MODE_POST_RLE | MODE_STORED | MODE_PRE_RLE | MODE_PRE_RLE_ZEROS;

/// Bytes reserved in front of the huffman data for the mode byte.
const MODE_PADDING: usize = 1;

/// The MTF policy used for every block.
pub const MTF_MODEL: MtfModel = MtfModel::Mtf1;

/// Run length coding tried before the BWT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreRle {
    Off,
    General,
    ZerosOnly,
}
impl Display for PreRle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Per block pipeline settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockOptions {
    /// Run length coding tried before the BWT
    pub pre_rle: PreRle,
    /// Try packbits after the MTF stage
    pub post_rle: bool,
}

impl BlockOptions {
    pub fn new() -> Self {
        Self {
            pre_rle: PreRle::General,
            post_rle: true,
        }
    }
}

impl Default for BlockOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Run one optional stage. WouldNotShrink means "skip it" and yields None.
fn trial(result: Result<Vec<u8>>, stage: &'static str) -> core::result::Result<Option<Vec<u8>>, StageError> {
    match result {
        Ok(out) => Ok(Some(out)),
        Err(FlickError::WouldNotShrink) => {
            debug!("{} skipped, would not shrink", stage);
            Ok(None)
        }
        Err(e) => Err(StageError::new(stage, e)),
    }
}

/// Compress one block, tagging any failure with the stage that produced it.
pub(crate) fn compress_stages(
    input: &[u8],
    options: &BlockOptions,
) -> core::result::Result<Vec<u8>, StageError> {
    if input.is_empty() {
        return Err(StageError::new("block compression", FlickError::EmptyInput));
    }
    let mut mode = 0_u8;

    // Pre-BWT run length coding, kept only if it helps
    let mut data: Cow<'_, [u8]> = Cow::Borrowed(input);
    let zeros_only = match options.pre_rle {
        PreRle::Off => None,
        PreRle::General => Some(false),
        PreRle::ZerosOnly => Some(true),
    };
    if let Some(zeros_only) = zeros_only {
        if let Some(rle) = trial(rle_basic_encode(input, true, zeros_only), "rle encoding")? {
            mode |= if zeros_only { MODE_PRE_RLE_ZEROS } else { MODE_PRE_RLE };
            data = Cow::Owned(rle);
        }
    }

    let bwt = bwt_encode(&data).stage("bwt encoding")?;
    drop(data);
    let mtf = mtf_encode(&bwt, MTF_MODEL).stage("mtf encoding")?;
    drop(bwt);

    let data = if options.post_rle {
        match trial(packbits_encode(&mtf, true), "packbits encoding")? {
            Some(packed) => {
                mode |= MODE_POST_RLE;
                packed
            }
            None => mtf,
        }
    } else {
        mtf
    };

    match huf_encode(&data, MODE_PADDING) {
        Ok(mut out) => {
            out[0] = mode;
            info!("Block of {} bytes compressed to {}, mode {:#04x}", input.len(), out.len(), mode);
            Ok(out)
        }
        Err(FlickError::WouldNotShrink) => {
            mode |= MODE_STORED;
            warn!("Huffman could not shrink the block, storing {} bytes", data.len());
            let mut out = try_with_capacity(data.len() + MODE_PADDING).stage("block compression")?;
            out.push(mode);
            out.extend_from_slice(&data);
            Ok(out)
        }
        Err(e) => Err(StageError::new("huffman encoding", e)),
    }
}

/// Decompress one block, tagging any failure with the stage that produced it.
pub(crate) fn decompress_stages(input: &[u8]) -> core::result::Result<Vec<u8>, StageError> {
    let (&mode, payload) = input
        .split_first()
        .ok_or(FlickError::UnexpectedEnd)
        .stage("block decompression")?;
    if (mode & !MODE_KNOWN != 0) || (mode & MODE_PRE_RLE != 0 && mode & MODE_PRE_RLE_ZEROS != 0) {
        let error = FlickError::malformed(format!("mode byte {:#04x}", mode));
        return Err(StageError::new("block decompression", error));
    }
    trace!("Block mode {:#04x}, {} bytes", mode, input.len());

    let data: Cow<'_, [u8]> = if mode & MODE_STORED != 0 {
        Cow::Borrowed(payload)
    } else {
        Cow::Owned(huf_decode(input, MODE_PADDING).stage("huffman decoding")?)
    };
    let data = if mode & MODE_POST_RLE != 0 {
        Cow::Owned(packbits_decode(&data).stage("packbits decoding")?)
    } else {
        data
    };
    let bwt = mtf_decode(&data, MTF_MODEL).stage("mtf decoding")?;
    drop(data);
    let out = bwt_decode(&bwt).stage("bwt decoding")?;
    drop(bwt);

    if mode & MODE_PRE_RLE != 0 {
        rle_basic_decode(&out, false).stage("rle decoding")
    } else if mode & MODE_PRE_RLE_ZEROS != 0 {
        rle_basic_decode(&out, true).stage("rle decoding")
    } else {
        Ok(out)
    }
}

/// Compress one block: optional RLE, BWT, MTF, optional packbits, then huffman.
/// The first output byte records which optional stages were applied.
pub fn compress_block(input: &[u8], options: &BlockOptions) -> Result<Vec<u8>> {
    compress_stages(input, options).map_err(|e| e.error)
}

/// Reverse compress_block.
pub fn decompress_block(input: &[u8]) -> Result<Vec<u8>> {
    decompress_stages(input).map_err(|e| e.error)
}
