use log::{debug, trace};

use super::rle::{read_size, write_size, SIZE_HEADER};
use crate::error::{try_with_capacity, FlickError, Result};

/// Longest run (repeat or literal) a control byte can describe.
const MAX_RUN: usize = 127;

/// Length of the run of identical bytes starting at data[0], capped at MAX_RUN.
fn run_length(data: &[u8]) -> usize {
    data.iter()
        .take(MAX_RUN)
        .take_while(|&&b| b == data[0])
        .count()
}

/// Packbits run length encoding. Each run is prefixed by a signed control byte: -k for
/// k (2-127) copies of the next byte, +k for k (1-127) literal bytes. Literal runs end
/// before any pair of identical bytes.
///
/// With size_check the encoder gives up with WouldNotShrink as soon as the output
/// (header included) reaches the input length.
pub fn packbits_encode(input: &[u8], size_check: bool) -> Result<Vec<u8>> {
    let mut out = try_with_capacity(input.len() + input.len() / MAX_RUN + SIZE_HEADER + 1)?;
    write_size(&mut out, input.len())?;

    let mut i = 0;
    while i < input.len() {
        let run = run_length(&input[i..]);
        if run >= 2 {
            out.push((-(run as i8)) as u8);
            out.push(input[i]);
            i += run;
        } else {
            let start = i;
            while i < input.len()
                && i - start < MAX_RUN
                && !(i + 1 < input.len() && input[i] == input[i + 1])
            {
                i += 1;
            }
            out.push((i - start) as u8);
            out.extend_from_slice(&input[start..i]);
        }
        if size_check && out.len() >= input.len() {
            trace!("Packbits gave up at input byte {}", i);
            return Err(FlickError::WouldNotShrink);
        }
    }
    debug!("Packbits {} -> {} bytes", input.len(), out.len());
    Ok(out)
}

/// Reverse packbits_encode. Every read is checked against the input and every write
/// against the declared size.
pub fn packbits_decode(input: &[u8]) -> Result<Vec<u8>> {
    let size = read_size(input)?;
    let limit = size.min((input.len() - SIZE_HEADER).saturating_mul(MAX_RUN + 1));
    let mut out = try_with_capacity(limit)?;

    let mut i = SIZE_HEADER;
    while i < input.len() {
        let control = input[i] as i8;
        i += 1;
        match control {
            0 => return Err(FlickError::malformed("packbits zero control byte")),
            c if c < 0 => {
                let count = c.unsigned_abs() as usize;
                let byte = *input.get(i).ok_or(FlickError::UnexpectedEnd)?;
                i += 1;
                if out.len() + count > size {
                    return Err(FlickError::malformed("packbits run past declared size"));
                }
                out.resize(out.len() + count, byte);
            }
            c => {
                let count = c as usize;
                let literals = input.get(i..i + count).ok_or(FlickError::UnexpectedEnd)?;
                i += count;
                if out.len() + count > size {
                    return Err(FlickError::malformed("packbits literals past declared size"));
                }
                out.extend_from_slice(literals);
            }
        }
    }
    if out.len() < size {
        return Err(FlickError::UnexpectedEnd);
    }
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::{packbits_decode, packbits_encode};
    use crate::error::FlickError;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn encode_test() {
        let out = packbits_encode(b"aaaabcd", false).unwrap();
        assert_eq!(out, vec![0, 0, 0, 7, (-4_i8) as u8, b'a', 3, b'b', b'c', b'd']);
    }

    #[test]
    fn literal_stops_before_pair_test() {
        let out = packbits_encode(b"abcc", false).unwrap();
        assert_eq!(&out[4..], &[2, b'a', b'b', (-2_i8) as u8, b'c']);
    }

    #[test]
    fn lone_final_byte_test() {
        let out = packbits_encode(b"xxxy", false).unwrap();
        assert_eq!(&out[4..], &[(-3_i8) as u8, b'x', 1, b'y']);
        assert_eq!(packbits_decode(&out).unwrap(), b"xxxy".to_vec());
    }

    #[test]
    fn run_cap_test() {
        let data = vec![9_u8; 128];
        let out = packbits_encode(&data, true).unwrap();
        // 127 copies then a single literal
        assert_eq!(&out[4..], &[(-127_i8) as u8, 9, 1, 9]);
        assert_eq!(packbits_decode(&out).unwrap(), data);

        let data: Vec<u8> = (0..=255).collect();
        let out = packbits_encode(&data, false).unwrap();
        assert_eq!(out[4], 127);
        assert_eq!(out[4 + 128], 127);
        assert_eq!(out[4 + 256], 2);
        assert_eq!(packbits_decode(&out).unwrap(), data);
    }

    #[test]
    fn would_not_shrink_test() {
        assert!(matches!(packbits_encode(b"abcdef", true), Err(FlickError::WouldNotShrink)));
    }

    #[test]
    fn malformed_test() {
        assert!(matches!(packbits_decode(&[0, 0]), Err(FlickError::UnexpectedEnd)));
        assert!(matches!(packbits_decode(&[0, 0, 0, 1, 0]), Err(FlickError::Malformed(_))));
        // Literal run longer than the data supplied
        assert!(matches!(packbits_decode(&[0, 0, 0, 5, 5, 1, 2]), Err(FlickError::UnexpectedEnd)));
        // Repeat with no byte
        assert!(matches!(packbits_decode(&[0, 0, 0, 5, 0xfb]), Err(FlickError::UnexpectedEnd)));
        // Run larger than the declared size
        assert!(matches!(packbits_decode(&[0, 0, 0, 2, 0xfb, 1]), Err(FlickError::Malformed(_))));
        // Stream shorter than the declared size
        assert!(matches!(packbits_decode(&[0, 0, 0, 9, 1, 1]), Err(FlickError::UnexpectedEnd)));
    }

    #[test]
    fn random_round_trip_test() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut data = Vec::new();
        while data.len() < 20_000 {
            let byte: u8 = rng.gen();
            let run = if rng.gen_bool(0.3) { rng.gen_range(2..300) } else { 1 };
            data.extend(std::iter::repeat(byte).take(run));
        }
        let out = packbits_encode(&data, false).unwrap();
        assert_eq!(packbits_decode(&out).unwrap(), data);
    }
}
