use log::{debug, trace};

use crate::error::{try_with_capacity, FlickError, Result};

/// Bytes taken by the big-endian size header in front of RLE data.
pub const SIZE_HEADER: usize = 4;
/// Most extra repeats a single count byte can carry.
const MAX_COUNT: usize = 255;

/// Write the 4 byte big-endian length header.
pub(crate) fn write_size(out: &mut Vec<u8>, len: usize) -> Result<()> {
    let len = u32::try_from(len).map_err(|_| FlickError::BlockTooLarge(len))?;
    out.extend_from_slice(&len.to_be_bytes());
    Ok(())
}

/// Read the 4 byte big-endian length header.
pub(crate) fn read_size(input: &[u8]) -> Result<usize> {
    match input.get(..SIZE_HEADER) {
        Some(header) => Ok(u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as usize),
        None => Err(FlickError::UnexpectedEnd),
    }
}

/// Basic run length encoding. Every byte is copied as a literal; when two identical
/// literals are written a count byte (0-255) of further repeats follows. In zeros_only
/// mode only runs of 0 are coded this way.
///
/// With size_check the encoder gives up with WouldNotShrink as soon as the output
/// (header included) reaches the input length.
pub fn rle_basic_encode(input: &[u8], size_check: bool, zeros_only: bool) -> Result<Vec<u8>> {
    let mut out = try_with_capacity(input.len() + SIZE_HEADER)?;
    write_size(&mut out, input.len())?;

    let mut i = 0;
    while i < input.len() {
        let c = input[i];
        out.push(c);
        i += 1;
        if i < input.len() && input[i] == c && (!zeros_only || c == 0) {
            out.push(c);
            i += 1;
            let mut count = 0;
            while count < MAX_COUNT && i < input.len() && input[i] == c {
                count += 1;
                i += 1;
            }
            out.push(count as u8);
        }
        if size_check && out.len() >= input.len() {
            trace!("RLE gave up at input byte {}", i);
            return Err(FlickError::WouldNotShrink);
        }
    }
    debug!("RLE {} -> {} bytes", input.len(), out.len());
    Ok(out)
}

/// Reverse rle_basic_encode. zeros_only must match the encoder's setting.
pub fn rle_basic_decode(input: &[u8], zeros_only: bool) -> Result<Vec<u8>> {
    let size = read_size(input)?;
    // The header is untrusted, so never reserve more than the input could expand to
    let limit = size.min((input.len() - SIZE_HEADER).saturating_mul(MAX_COUNT / 2 + 1));
    let mut out = try_with_capacity(limit)?;

    let mut i = SIZE_HEADER;
    while i < input.len() {
        if out.len() >= size {
            return Err(FlickError::malformed("rle data past declared size"));
        }
        let c = input[i];
        out.push(c);
        i += 1;
        if i < input.len() && input[i] == c && (!zeros_only || c == 0) {
            let count = *input.get(i + 1).ok_or(FlickError::UnexpectedEnd)? as usize;
            i += 2;
            if out.len() + 1 + count > size {
                return Err(FlickError::malformed("rle run past declared size"));
            }
            out.resize(out.len() + 1 + count, c);
        }
    }
    if out.len() < size {
        return Err(FlickError::UnexpectedEnd);
    }
    Ok(out)
}
