use std::fmt::{Display, Formatter};

use log::trace;

use crate::error::{try_with_capacity, Result};

/// Move To Front update policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MtfModel {
    /// Plain move to front.
    Mtf0,
    /// Position 1 swaps with the front, anything further back moves to position 1.
    Mtf1,
    /// As Mtf1, but position 1 only swaps with the front when the previously emitted
    /// symbol is the one now at the front.
    Mtf2,
}
impl Display for MtfModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The recency list driven by an MtfModel. Encoder and decoder share this so both sides
/// see identical list states.
pub struct RecencyList {
    list: [u8; 256],
    model: MtfModel,
    /// Last symbol emitted, only consulted by Mtf2.
    prev: u8,
}

impl RecencyList {
    pub fn new(model: MtfModel) -> Self {
        let mut list = [0_u8; 256];
        list.iter_mut().enumerate().for_each(|(i, s)| *s = i as u8);
        Self {
            list,
            model,
            prev: 1,
        }
    }

    /// Position of a byte in the list. The list is a permutation so this always succeeds.
    fn position(&self, byte: u8) -> usize {
        self.list.iter().position(|&c| c == byte).unwrap_or(0)
    }

    // Move list[i] to position 1, shifting everything between down by one
    fn to_second(&mut self, i: usize) {
        let c = self.list[i];
        self.list.copy_within(1..i, 2);
        self.list[1] = c;
    }

    /// Apply the model's update for a hit at position i.
    fn update(&mut self, i: usize) {
        let c = self.list[i];
        match self.model {
            MtfModel::Mtf0 => {
                if i > 0 {
                    self.list.copy_within(0..i, 1);
                    self.list[0] = c;
                }
            }
            MtfModel::Mtf1 => match i {
                0 => {}
                1 => self.list.swap(0, 1),
                _ => self.to_second(i),
            },
            MtfModel::Mtf2 => {
                match i {
                    0 => {}
                    1 => {
                        if self.prev == self.list[0] {
                            self.list.swap(0, 1);
                        }
                    }
                    _ => self.to_second(i),
                }
                self.prev = c;
            }
        }
    }

    /// Replace a byte with its current position, then update.
    pub fn encode_byte(&mut self, byte: u8) -> u8 {
        let i = self.position(byte);
        self.update(i);
        i as u8
    }

    /// Replace a position with the byte found there, then update.
    pub fn decode_byte(&mut self, index: u8) -> u8 {
        let byte = self.list[index as usize];
        self.update(index as usize);
        byte
    }
}

/// Encode data using the Move To Front transform.
pub fn mtf_encode(data: &[u8], model: MtfModel) -> Result<Vec<u8>> {
    trace!("MTF encode {} bytes with {}", data.len(), model);
    let mut list = RecencyList::new(model);
    let mut out = try_with_capacity(data.len())?;
    out.extend(data.iter().map(|&b| list.encode_byte(b)));
    Ok(out)
}

/// Reverse the Move To Front transform.
pub fn mtf_decode(data: &[u8], model: MtfModel) -> Result<Vec<u8>> {
    trace!("MTF decode {} bytes with {}", data.len(), model);
    let mut list = RecencyList::new(model);
    let mut out = try_with_capacity(data.len())?;
    out.extend(data.iter().map(|&i| list.decode_byte(i)));
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::{mtf_decode, mtf_encode, MtfModel};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn mtf0_test() {
        assert_eq!(mtf_encode(b"aabbaa", MtfModel::Mtf0).unwrap(), vec![97, 0, 98, 0, 1, 0]);
    }

    #[test]
    fn mtf1_test() {
        assert_eq!(mtf_encode(b"aabbaa", MtfModel::Mtf1).unwrap(), vec![97, 1, 98, 1, 1, 0]);
    }

    #[test]
    fn mtf2_test() {
        assert_eq!(mtf_encode(b"aabbaa", MtfModel::Mtf2).unwrap(), vec![97, 1, 98, 1, 2, 1]);
    }

    #[test]
    fn last_symbol_test() {
        // 255 lives at the very end of the list
        let out = mtf_encode(&[255, 255, 0], MtfModel::Mtf0).unwrap();
        assert_eq!(out, vec![255, 0, 1]);
        assert_eq!(mtf_decode(&out, MtfModel::Mtf0).unwrap(), vec![255, 255, 0]);
    }

    #[test]
    fn empty_test() {
        assert!(mtf_encode(&[], MtfModel::Mtf1).unwrap().is_empty());
        assert!(mtf_decode(&[], MtfModel::Mtf2).unwrap().is_empty());
    }

    #[test]
    fn random_round_trip_test() {
        let mut rng = StdRng::seed_from_u64(42);
        let data: Vec<u8> = (0..5000).map(|_| rng.gen_range(0..16) * 17).collect();
        for model in [MtfModel::Mtf0, MtfModel::Mtf1, MtfModel::Mtf2] {
            let enc = mtf_encode(&data, model).unwrap();
            assert_eq!(mtf_decode(&enc, model).unwrap(), data, "{}", model);
        }
    }
}
