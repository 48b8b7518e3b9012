use log::{debug, info};

use super::bwt_sort::sort_rotations;
use crate::error::{try_with_capacity, try_zeroed, FlickError, Result};
use crate::tools::freq_count::{cumulative, freqs};

/// Bytes taken by the big-endian original index in front of the last column.
pub const INDEX_HEADER: usize = 4;

/// Burrows-Wheeler-Transform. Rotations are taken from a barrel (the block written out
/// twice) and sorted with a multikey quicksort.
/// Returns the 4 byte big-endian index of the original rotation followed by the last
/// column of the sorted rotations.
pub fn bwt_encode(input: &[u8]) -> Result<Vec<u8>> {
    let n = input.len();
    if n == 0 {
        return Err(FlickError::EmptyInput);
    }
    if n > u32::MAX as usize {
        return Err(FlickError::BlockTooLarge(n));
    }

    let mut barrel = try_with_capacity(2 * n)?;
    barrel.extend_from_slice(input);
    barrel.extend_from_slice(input);

    // Index is u32, which is enough for any block we accept
    let mut rotations: Vec<u32> = try_with_capacity(n)?;
    rotations.extend(0..n as u32);
    sort_rotations(&barrel, &mut rotations, n)?;

    let mut out = try_with_capacity(INDEX_HEADER + n)?;
    out.extend_from_slice(&[0; INDEX_HEADER]);
    let mut key = 0_u32;
    for (pos, &r) in rotations.iter().enumerate() {
        if r == 0 {
            key = pos as u32;
        }
        out.push(barrel[r as usize + n - 1]);
    }
    out[..INDEX_HEADER].copy_from_slice(&key.to_be_bytes());
    info!("BWT of {} bytes, key is {}", n, key);
    Ok(out)
}

/// Reverse the Burrows-Wheeler-Transform with an LF-mapping walk.
pub fn bwt_decode(input: &[u8]) -> Result<Vec<u8>> {
    if input.len() < INDEX_HEADER {
        return Err(FlickError::UnexpectedEnd);
    }
    let key = u32::from_be_bytes([input[0], input[1], input[2], input[3]]) as usize;
    let last = &input[INDEX_HEADER..];
    let n = last.len();
    if key >= n {
        return Err(FlickError::malformed(format!(
            "bwt index {} out of range for {} bytes",
            key, n
        )));
    }
    if n > u32::MAX as usize {
        return Err(FlickError::BlockTooLarge(n));
    }

    // C[b]: how many bytes of the block sort before b
    let starts = cumulative(&freqs(last));

    // P[i]: how many times L[i] occurred before position i
    let mut seen = [0_u32; 256];
    let mut ranks: Vec<u32> = try_with_capacity(n)?;
    ranks.extend(last.iter().map(|&b| {
        let rank = seen[b as usize];
        seen[b as usize] += 1;
        rank
    }));

    // Walk backward through the original block, filling it right to left
    let mut out: Vec<u8> = try_zeroed(n)?;
    let mut i = key;
    for j in (0..n).rev() {
        let b = last[i];
        out[j] = b;
        i = ranks[i] as usize + starts[b as usize];
    }
    debug!("BWT decoded {} bytes from key {}", n, key);
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::{bwt_decode, bwt_encode};
    use crate::error::FlickError;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    /// Reference transform: sort every rotation as a full Vec.
    fn naive_bwt(data: &[u8]) -> (u32, Vec<u8>) {
        let n = data.len();
        let mut rotations: Vec<Vec<u8>> = (0..n)
            .map(|r| data[r..].iter().chain(data[..r].iter()).copied().collect())
            .collect();
        let original = rotations[0].clone();
        rotations.sort();
        let key = rotations.iter().position(|r| *r == original).unwrap() as u32;
        (key, rotations.iter().map(|r| r[n - 1]).collect())
    }

    #[test]
    fn banana_test() {
        let out = bwt_encode(b"banana").unwrap();
        assert_eq!(out, [&[0, 0, 0, 3][..], b"nnbaaa"].concat());
        assert_eq!(bwt_decode(&out).unwrap(), b"banana".to_vec());
    }

    #[test]
    fn single_byte_test() {
        let out = bwt_encode(b"q").unwrap();
        assert_eq!(out, vec![0, 0, 0, 0, b'q']);
        assert_eq!(bwt_decode(&out).unwrap(), b"q".to_vec());
    }

    #[test]
    fn matches_naive_rotations_test() {
        let mut rng = StdRng::seed_from_u64(5);
        for len in [2_usize, 17, 40, 333] {
            // Distinct rotations, so the key is unambiguous
            let mut data: Vec<u8> = (0..len).map(|_| rng.gen_range(0..4)).collect();
            data[0] = 200;
            let (key, last) = naive_bwt(&data);
            let out = bwt_encode(&data).unwrap();
            assert_eq!(u32::from_be_bytes([out[0], out[1], out[2], out[3]]), key);
            assert_eq!(&out[4..], &last[..]);
        }
    }

    #[test]
    fn round_trip_test() {
        let mut rng = StdRng::seed_from_u64(9);
        let random: Vec<u8> = (0..50_000).map(|_| rng.gen()).collect();
        let text = b"It is a truth universally acknowledged, that a single man ".repeat(40);
        let periodic = b"ab".repeat(1000);
        let zeros = vec![0_u8; 2000];
        for data in [random, text, periodic, zeros] {
            let out = bwt_encode(&data).unwrap();
            assert_eq!(out.len(), data.len() + 4);
            assert_eq!(bwt_decode(&out).unwrap(), data);
        }
    }

    #[test]
    fn errors_test() {
        assert!(matches!(bwt_encode(&[]), Err(FlickError::EmptyInput)));
        assert!(matches!(bwt_decode(&[0, 0]), Err(FlickError::UnexpectedEnd)));
        assert!(matches!(bwt_decode(&[0, 0, 0, 0]), Err(FlickError::Malformed(_))));
        assert!(matches!(bwt_decode(&[0, 0, 0, 3, 1, 2, 3]), Err(FlickError::Malformed(_))));
    }
}
