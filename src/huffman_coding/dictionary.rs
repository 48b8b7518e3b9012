//! The huffman dictionary: which symbols are present, their code lengths, and the
//! canonical codes derived from those lengths.
//!
//! Only lengths go on the stream. Both sides rebuild the codes the same way: symbols are
//! ordered by code length, ties broken by symbol value, and numbered consecutively from
//! zero, shortest codes first.
//!
use log::{debug, trace};

use super::huffman_code_from_weights::improve_code_len_from_weights;
use crate::bitstream::bitreader::BitReader;
use crate::bitstream::bitwriter::BitWriter;
use crate::error::{FlickError, Result};

/// Bits used for the length width indicator.
const WIDTH_BITS: u8 = 3;
/// Valid length widths.
const MIN_WIDTH: u8 = 2;
const MAX_WIDTH: u8 = 6;
/// Longest code a width of MAX_WIDTH can describe.
const MAX_CODE_LEN: usize = (1 << MAX_WIDTH) - 1;

/// Symbols ordered by ascending frequency.
pub struct FrequencyOrder {
    /// Frequencies in sorted order.
    pub weights: [u32; 256],
    /// Symbol to sorted position.
    pub forward: [u8; 256],
    /// Sorted position to symbol.
    pub reverse: [u8; 256],
    /// First sorted position with a nonzero weight.
    pub offset: usize,
}

impl FrequencyOrder {
    /// Stable LSD radix sort of the 256 symbols on their u32 frequency, one counting
    /// pass per byte. Equal frequencies keep symbol order.
    pub fn new(freqs: &[u32; 256]) -> Self {
        let mut order = [0_u8; 256];
        order.iter_mut().enumerate().for_each(|(i, s)| *s = i as u8);
        let mut scratch = [0_u8; 256];

        for shift in [0, 8, 16, 24] {
            let digit = |s: u8| ((freqs[s as usize] >> shift) & 0xff) as usize;
            let mut counts = [0_usize; 257];
            order.iter().for_each(|&s| counts[digit(s) + 1] += 1);
            if counts[1] == 256 {
                // Every digit is zero, so this pass would not move anything
                continue;
            }
            for i in 1..257 {
                counts[i] += counts[i - 1];
            }
            for &s in order.iter() {
                let d = digit(s);
                scratch[counts[d]] = s;
                counts[d] += 1;
            }
            order = scratch;
        }

        let mut weights = [0_u32; 256];
        let mut forward = [0_u8; 256];
        for (pos, &s) in order.iter().enumerate() {
            weights[pos] = freqs[s as usize];
            forward[s as usize] = pos as u8;
        }
        let offset = weights.iter().position(|&w| w > 0).unwrap_or(256);
        Self {
            weights,
            forward,
            reverse: order,
            offset,
        }
    }
}

/// Code lengths and canonical codes for every present symbol.
#[derive(Debug, Clone)]
pub struct Dictionary {
    present: [bool; 256],
    lengths: [u8; 256],
    codes: [u64; 256],
    /// Present symbols in canonical order.
    canonical: Vec<u8>,
    max_len: u8,
}

impl Dictionary {
    /// Build the dictionary for a frequency table.
    pub fn from_freqs(freqs: &[u32; 256]) -> Self {
        let mut order = FrequencyOrder::new(freqs);
        let offset = order.offset;
        improve_code_len_from_weights(&mut order.weights[offset..]);

        let mut present = [false; 256];
        let mut lengths = [0_u8; 256];
        for pos in offset..256 {
            let sym = order.reverse[pos] as usize;
            present[sym] = true;
            lengths[sym] = order.weights[pos] as u8;
        }
        Self::from_lengths(present, lengths)
    }

    /// Build the canonical codes from code lengths alone.
    fn from_lengths(present: [bool; 256], lengths: [u8; 256]) -> Self {
        // Counting sort of the present symbols by length. Symbols are visited in order,
        // so ties stay sorted by symbol.
        let mut counts = [0_usize; MAX_CODE_LEN + 2];
        (0..256)
            .filter(|&s| present[s])
            .for_each(|s| counts[lengths[s] as usize + 1] += 1);
        for i in 1..counts.len() {
            counts[i] += counts[i - 1];
        }
        let total = counts[MAX_CODE_LEN + 1];
        let mut canonical = vec![0_u8; total];
        for s in (0..256).filter(|&s| present[s]) {
            let slot = &mut counts[lengths[s] as usize];
            canonical[*slot] = s as u8;
            *slot += 1;
        }

        // Consecutive codes within a length. Moving up k lengths shifts the next code
        // left by k.
        let mut codes = [0_u64; 256];
        let mut code = 0_u64;
        let mut prev_len = canonical.first().map_or(0, |&s| lengths[s as usize]);
        for &s in canonical.iter() {
            let len = lengths[s as usize];
            if len > prev_len {
                code <<= len - prev_len;
                prev_len = len;
            }
            codes[s as usize] = code;
            code += 1;
        }
        let max_len = prev_len;

        Self {
            present,
            lengths,
            codes,
            canonical,
            max_len,
        }
    }

    /// Code length of a symbol, None if it does not occur.
    pub fn length(&self, sym: u8) -> Option<u8> {
        self.present[sym as usize].then(|| self.lengths[sym as usize])
    }

    /// Canonical code of a symbol, None if it does not occur.
    pub fn code(&self, sym: u8) -> Option<u64> {
        self.present[sym as usize].then(|| self.codes[sym as usize])
    }

    /// Longest code length.
    pub fn max_len(&self) -> u8 {
        self.max_len
    }

    /// Number of present symbols.
    pub fn symbols(&self) -> usize {
        self.canonical.len()
    }

    /// The only symbol, if there is exactly one.
    pub fn single_symbol(&self) -> Option<u8> {
        match self.canonical.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Bits used to store each code length.
    pub fn width(&self) -> u8 {
        match self.max_len {
            l if l > 31 => 6,
            l if l > 15 => 5,
            l if l > 7 => 4,
            l if l > 3 => 3,
            _ => 2,
        }
    }

    /// Put the dictionary on the stream: width, then a presence bit for every symbol
    /// followed by its length if present.
    pub fn write(&self, bw: &mut BitWriter<'_>) -> Result<()> {
        let width = self.width();
        bw.write_bits(width as u32, WIDTH_BITS)?;
        for sym in 0..256 {
            bw.bit(self.present[sym])?;
            if self.present[sym] {
                bw.write_bits(self.lengths[sym] as u32, width)?;
            }
        }
        trace!("Dictionary written, width {}, now at {}", width, bw.loc());
        Ok(())
    }

    /// Write the code for one symbol.
    pub fn write_symbol(&self, bw: &mut BitWriter<'_>, sym: u8) -> Result<()> {
        bw.write_code(self.codes[sym as usize], self.lengths[sym as usize])
    }

    /// Read a dictionary back from the stream and check that its lengths form a
    /// complete prefix code.
    pub fn read(br: &mut BitReader<'_>) -> Result<Self> {
        let width = br.bint(WIDTH_BITS).ok_or(FlickError::UnexpectedEnd)? as u8;
        if !(MIN_WIDTH..=MAX_WIDTH).contains(&width) {
            return Err(FlickError::malformed(format!("huffman length width {}", width)));
        }
        let mut present = [false; 256];
        let mut lengths = [0_u8; 256];
        for sym in 0..256 {
            present[sym] = br.bool_bit().ok_or(FlickError::UnexpectedEnd)?;
            if present[sym] {
                lengths[sym] = br.bint(width).ok_or(FlickError::UnexpectedEnd)? as u8;
            }
        }

        let used: Vec<u8> = (0..256).filter(|&s| present[s]).map(|s| lengths[s]).collect();
        match used.as_slice() {
            [] => return Err(FlickError::malformed("huffman dictionary is empty")),
            [0] => {}
            [_] => return Err(FlickError::malformed("single huffman symbol with nonzero length")),
            _ => {
                if used.contains(&0) {
                    return Err(FlickError::malformed("zero length huffman code"));
                }
                let max = *used.iter().max().unwrap_or(&0) as u32;
                let kraft: u128 = used.iter().map(|&l| 1_u128 << (max - l as u32)).sum();
                if kraft != 1_u128 << max {
                    return Err(FlickError::malformed("huffman code lengths are not complete"));
                }
            }
        }
        let dict = Self::from_lengths(present, lengths);
        debug!("Dictionary read: {} symbols, max length {}", dict.symbols(), dict.max_len);
        Ok(dict)
    }

    /// Per length decode table for this dictionary.
    pub fn decode_table(&self) -> DecodeTable {
        let max = self.max_len as usize;
        let mut count = [0_u64; MAX_CODE_LEN + 1];
        self.canonical
            .iter()
            .for_each(|&s| count[self.lengths[s as usize] as usize] += 1);

        let mut first = [0_u64; MAX_CODE_LEN + 1];
        let mut index = [0_usize; MAX_CODE_LEN + 1];
        let mut code = 0_u64;
        let mut seen = count[0] as usize;
        for len in 1..=max {
            first[len] = code;
            index[len] = seen;
            seen += count[len] as usize;
            if len < max {
                code = (code + count[len]) << 1;
            }
        }
        DecodeTable {
            first,
            count,
            index,
            max_len: self.max_len,
            symbols: self.canonical.clone(),
        }
    }
}

/// Canonical decode table: for every length the first code, how many codes there are,
/// and where their symbols start in canonical order.
pub struct DecodeTable {
    first: [u64; MAX_CODE_LEN + 1],
    count: [u64; MAX_CODE_LEN + 1],
    index: [usize; MAX_CODE_LEN + 1],
    max_len: u8,
    symbols: Vec<u8>,
}

impl DecodeTable {
    /// Read bits until they form a complete code and return its symbol.
    pub fn decode(&self, br: &mut BitReader<'_>) -> Result<u8> {
        let mut code = 0_u64;
        for len in 1..=self.max_len as usize {
            let bit = br.bit().ok_or(FlickError::UnexpectedEnd)?;
            code = code << 1 | bit as u64;
            if code >= self.first[len] && code - self.first[len] < self.count[len] {
                let i = self.index[len] + (code - self.first[len]) as usize;
                return Ok(self.symbols[i]);
            }
        }
        Err(FlickError::malformed(format!(
            "no huffman code matched at {}",
            br.loc()
        )))
    }
}
