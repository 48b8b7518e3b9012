//! BitReader: reads back a packed bitstream from a byte slice, most significant bit first.
//!
//! Bits are pulled a byte at a time into a BitQueue and handed out one by one, so a
//! request can always be satisfied up to the last bit present in the buffer.
//!
use super::bitpacker::BitQueue;

/// Reads a packed bitstream.
#[derive(Debug)]
pub struct BitReader<'a> {
    buffer: &'a [u8],
    cursor: usize,
    queue: BitQueue,
}

impl<'a> BitReader<'a> {
    /// Creates a new BitReader that begins `start` bytes into the buffer.
    pub fn new(buffer: &'a [u8], start: usize) -> Self {
        Self {
            buffer,
            cursor: start,
            queue: BitQueue::new(),
        }
    }

    /// Refill the queue with the next byte. Returns false if there is no more data.
    fn have_data(&mut self) -> bool {
        if self.cursor >= self.buffer.len() {
            return false;
        }
        let byte = self.buffer[self.cursor];
        self.cursor += 1;
        // Only called with an empty queue, so the push always fits
        self.queue.push(byte as u32, 8).is_ok()
    }

    /// Return bit as Option<u32> (1 or 0), or None if there is no more data to read
    pub fn bit(&mut self) -> Option<u32> {
        if self.queue.is_empty() && !self.have_data() {
            return None;
        }
        self.queue.pop_bit().map(|b| b as u32)
    }

    /// Return Option<Bool> *true* if the next bit is 1, *false* if 0, consuming the bit,
    /// or None if there is no more data to read
    pub fn bool_bit(&mut self) -> Option<bool> {
        self.bit().map(|bit| bit == 1)
    }

    /// Read up to `len` (0-32) bits. Returns the value and how many bits were actually
    /// read, which is less than `len` only when the buffer runs out.
    pub fn read_stream(&mut self, len: u8) -> (u32, u8) {
        let mut result = 0_u32;
        let mut got = 0_u8;
        while got < len.min(32) {
            match self.bit() {
                Some(bit) => {
                    result = result << 1 | bit;
                    got += 1;
                }
                None => break,
            }
        }
        (result, got)
    }

    /// Return Option<u32> of the next n bits, or None if fewer than n bits remain.
    pub fn bint(&mut self, n: u8) -> Option<u32> {
        match self.read_stream(n) {
            (value, got) if got == n => Some(value),
            _ => None,
        }
    }

    /// Returns a byte as an Option<u8>, or None if there is no more data to read. This is
    /// a convenience function, and calls bint(8).
    pub fn byte(&mut self) -> Option<u8> {
        self.bint(8).map(|byte| byte as u8)
    }

    /// Bytes of the buffer consumed so far.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Debugging function to return the number of bytes.bits read so far
    pub fn loc(&self) -> String {
        let bits = self.cursor * 8 - self.queue.len() as usize;
        format!("[{}.{}]", bits / 8, bits % 8)
    }
}

#[cfg(test)]
mod test {
    use super::BitReader;
    use crate::bitstream::bitwriter::BitWriter;

    #[test]
    fn read_bits_test() {
        let data = [0b1011_0000_u8];
        let mut br = BitReader::new(&data, 0);
        assert_eq!(br.bit(), Some(1));
        assert_eq!(br.bool_bit(), Some(false));
        assert_eq!(br.bint(2), Some(0b11));
        assert_eq!("[0.4]", &br.loc());
        assert_eq!(br.read_stream(8), (0, 4));
        assert_eq!(br.bit(), None);
    }

    #[test]
    fn start_and_bytes_test() {
        let data = [9_u8, 0x21, 0x20, 0xff];
        let mut br = BitReader::new(&data, 1);
        assert_eq!(br.byte(), Some(0x21));
        assert_eq!(br.bint(16), Some(0x20ff));
        assert_eq!(br.position(), 4);
        assert_eq!(br.byte(), None);
    }

    #[test]
    fn writer_to_reader_test() {
        let fields: [(u32, u8); 6] = [(5, 3), (0, 1), (0x1ffff, 17), (1, 1), (0xdead_beef, 32), (2, 2)];
        let mut buf = [0_u8; 16];
        let mut bw = BitWriter::new(&mut buf, 0);
        for &(v, n) in fields.iter() {
            bw.write_bits(v, n).unwrap();
        }
        let used = bw.flush().unwrap();
        assert_eq!(used, 7);
        let mut br = BitReader::new(&buf[..used], 0);
        for &(v, n) in fields.iter() {
            assert_eq!(br.bint(n), Some(v));
        }
    }
}
