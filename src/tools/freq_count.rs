/// Returns a frequency count of the input data, one bin per byte value.
/// Callers keep blocks within u32 range.
pub fn freqs(data: &[u8]) -> [u32; 256] {
    let mut freqs = [0_u32; 256];
    data.iter().for_each(|&el| freqs[el as usize] += 1);
    freqs
}

/// Exclusive running total of a frequency table: entry `b` is the number of bytes
/// smaller than `b`.
pub fn cumulative(freqs: &[u32; 256]) -> [usize; 256] {
    let mut sum = 0_usize;
    let mut out = [0_usize; 256];
    for (slot, &count) in out.iter_mut().zip(freqs.iter()) {
        *slot = sum;
        sum += count as usize;
    }
    out
}
