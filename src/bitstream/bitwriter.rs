use super::bitpacker::{BitQueue, MAX_PUSH};
use crate::error::{FlickError, Result};

/// Writes a bitstream into a caller supplied buffer of fixed capacity. The writer never
/// grows the buffer; running past its end is reported as `Overflow`.
pub struct BitWriter<'a> {
    /// Output buffer used to write the bitstream.
    buffer: &'a mut [u8],
    /// Next byte to be written.
    cursor: usize,
    /// Bits waiting to be put as bytes into the output buffer.
    queue: BitQueue,
}

impl<'a> BitWriter<'a> {
    /// Create a writer that starts `start` bytes into the buffer. The skipped bytes are
    /// left for the caller (eg. a header it fills in later).
    pub fn new(buffer: &'a mut [u8], start: usize) -> Self {
        Self {
            buffer,
            cursor: start,
            queue: BitQueue::new(),
        }
    }

    /// Move every complete byte from the queue into the buffer.
    fn write_stream(&mut self) -> Result<()> {
        while let Some(byte) = self.queue.pop_byte() {
            if self.cursor >= self.buffer.len() {
                return Err(FlickError::Overflow);
            }
            self.buffer[self.cursor] = byte;
            self.cursor += 1;
        }
        Ok(())
    }

    /// Write the `len` (0-32) least significant bits of `data`.
    pub fn write_bits(&mut self, data: u32, len: u8) -> Result<()> {
        self.queue.push(data, len)?;
        self.write_stream()
    }

    /// Write a code of up to 64 bits, high part first.
    pub fn write_code(&mut self, code: u64, len: u8) -> Result<()> {
        if len > MAX_PUSH {
            self.write_bits((code >> MAX_PUSH) as u32, len - MAX_PUSH)?;
            self.write_bits(code as u32, MAX_PUSH)
        } else {
            self.write_bits(code as u32, len)
        }
    }

    /// Convenience function to write a single bit.
    pub fn bit(&mut self, bit: bool) -> Result<()> {
        self.write_bits(bit as u32, 1)
    }

    /// Write out whatever is left in the queue, padding the last byte with zeros in the
    /// least significant bits. Returns the number of buffer bytes used.
    pub fn flush(&mut self) -> Result<usize> {
        self.queue.flush();
        self.write_stream()?;
        Ok(self.cursor)
    }

    /// Bytes written so far (including any skipped start bytes).
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Debugging function to return the number of bytes.bits output so far
    pub fn loc(&self) -> String {
        let bits = self.cursor * 8 + self.queue.len() as usize;
        format!("[{}.{}]", bits / 8, bits % 8)
    }
}

#[cfg(test)]
mod test {
    use super::BitWriter;
    use crate::error::FlickError;

    #[test]
    fn partial_byte_test() {
        let mut buf = [0_u8; 4];
        let mut bw = BitWriter::new(&mut buf, 0);
        bw.write_bits(1, 1).unwrap();
        bw.write_bits(0, 1).unwrap();
        bw.write_bits(1, 1).unwrap();
        bw.write_bits(1, 1).unwrap();
        assert_eq!("[0.4]", &bw.loc());
        assert_eq!(bw.flush().unwrap(), 1);
        assert_eq!(buf[0], 0b1011_0000);
    }

    #[test]
    fn start_offset_test() {
        let mut buf = [0xaa_u8; 4];
        let mut bw = BitWriter::new(&mut buf, 2);
        bw.write_bits(0x2120, 16).unwrap();
        assert_eq!(bw.position(), 4);
        assert_eq!(buf, [0xaa, 0xaa, 0x21, 0x20]);
    }

    #[test]
    fn overflow_test() {
        let mut buf = [0_u8; 2];
        let mut bw = BitWriter::new(&mut buf, 0);
        bw.write_bits(0xffff, 16).unwrap();
        assert!(matches!(bw.write_bits(1, 8), Err(FlickError::Overflow)));
        let mut buf = [0_u8; 1];
        let mut bw = BitWriter::new(&mut buf, 0);
        bw.write_bits(0xff, 8).unwrap();
        bw.write_bits(1, 1).unwrap();
        assert!(matches!(bw.flush(), Err(FlickError::Overflow)));
    }

    #[test]
    fn long_code_test() {
        let mut buf = [0_u8; 8];
        let mut bw = BitWriter::new(&mut buf, 0);
        bw.write_code(0x01_0203_0405, 40).unwrap();
        assert_eq!(bw.flush().unwrap(), 5);
        assert_eq!(&buf[..5], &[1, 2, 3, 4, 5]);
    }
}
