use log::{debug, info, trace};

use super::dictionary::Dictionary;
use crate::bitstream::bitreader::BitReader;
use crate::bitstream::bitwriter::BitWriter;
use crate::error::{try_with_capacity, try_zeroed, FlickError, Result};
use crate::tools::freq_count::freqs;

/// Bits used for the original size in front of the dictionary.
const SIZE_BITS: u8 = 32;

/// Encode data with a single canonical huffman table.
/// Output is `pre_padding` zero bytes (left for the caller), the 32 bit original size,
/// the dictionary and the packed codes. The output may not grow past the input plus
/// padding; if it would, WouldNotShrink is returned.
pub fn huf_encode(input: &[u8], pre_padding: usize) -> Result<Vec<u8>> {
    if input.is_empty() {
        return Err(FlickError::EmptyInput);
    }
    if input.len() > u32::MAX as usize {
        return Err(FlickError::BlockTooLarge(input.len()));
    }

    let dict = Dictionary::from_freqs(&freqs(input));
    info!(
        "Huffman table has {} symbols, longest code {} bits",
        dict.symbols(),
        dict.max_len()
    );

    let mut out: Vec<u8> = try_zeroed(input.len() + pre_padding)?;
    let mut bw = BitWriter::new(&mut out, pre_padding);
    let used = match pack(&mut bw, &dict, input) {
        Ok(used) => used,
        Err(FlickError::Overflow) => {
            debug!("Huffman output of {} bytes would not shrink", input.len());
            return Err(FlickError::WouldNotShrink);
        }
        Err(e) => return Err(e),
    };
    out.truncate(used);
    debug!("Huffman {} -> {} bytes", input.len(), used);
    Ok(out)
}

/// Write the size, the dictionary and every code. Returns the bytes used.
fn pack(bw: &mut BitWriter<'_>, dict: &Dictionary, input: &[u8]) -> Result<usize> {
    bw.write_bits(input.len() as u32, SIZE_BITS)?;
    dict.write(bw)?;
    for &sym in input {
        dict.write_symbol(bw, sym)?;
    }
    trace!("Huffman codes end at {}", bw.loc());
    bw.flush()
}

/// Decode data produced by huf_encode with the same `pre_padding`.
pub fn huf_decode(input: &[u8], pre_padding: usize) -> Result<Vec<u8>> {
    if input.len() < pre_padding {
        return Err(FlickError::UnexpectedEnd);
    }
    let mut br = BitReader::new(input, pre_padding);
    let size = br.bint(SIZE_BITS).ok_or(FlickError::UnexpectedEnd)? as usize;
    if size == 0 {
        return Ok(Vec::new());
    }
    let dict = Dictionary::read(&mut br)?;

    // A lone symbol has a zero length code, so nothing more is read
    if let Some(sym) = dict.single_symbol() {
        if br.position() != input.len() {
            return Err(FlickError::malformed("data after a single symbol table"));
        }
        let mut out = try_zeroed(size)?;
        out.fill(sym);
        return Ok(out);
    }

    let table = dict.decode_table();
    // Every code is at least a bit long, so the input bounds what we could produce
    let mut out = try_with_capacity(size.min(input.len().saturating_mul(8)))?;
    for _ in 0..size {
        out.push(table.decode(&mut br)?);
    }
    debug!("Huffman decoded {} bytes", size);
    Ok(out)
}
