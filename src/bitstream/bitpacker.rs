use crate::error::{FlickError, Result};

/// Width of the accumulator register in bits.
const QUEUE_BITS: u8 = 64;
/// Largest single push accepted by the queue.
pub const MAX_PUSH: u8 = 32;

/// Result of a push: whether a whole byte is now ready to be popped.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PushStatus {
    Continue,
    PopReady,
}

/// Bit accumulator shared by the stream writer and reader. Bits enter at the least
/// significant end and leave from the most significant end, so the stream is MSB first.
#[derive(Debug, Default, Clone)]
pub struct BitQueue {
    queue: u64,
    q_bits: u8,
}

impl BitQueue {
    pub fn new() -> Self {
        Self {
            queue: 0,
            q_bits: 0,
        }
    }

    /// Number of bits currently held.
    pub fn len(&self) -> u8 {
        self.q_bits
    }

    pub fn is_empty(&self) -> bool {
        self.q_bits == 0
    }

    fn status(&self) -> PushStatus {
        if self.q_bits >= 8 {
            PushStatus::PopReady
        } else {
            PushStatus::Continue
        }
    }

    /// Push the `len` least significant bits of `data` (at most 32). A push that would
    /// overflow the register is refused and the queue is left unchanged.
    pub fn push(&mut self, data: u32, len: u8) -> Result<PushStatus> {
        if len > MAX_PUSH || self.q_bits + len > QUEUE_BITS {
            return Err(FlickError::QueueFull);
        }
        if len == 0 {
            return Ok(self.status());
        }
        let masked = data as u64 & ((1_u64 << len) - 1);
        self.queue = (self.queue << len) | masked;
        self.q_bits += len;
        Ok(self.status())
    }

    /// Push a single bit.
    pub fn push_bit(&mut self, bit: bool) -> Result<PushStatus> {
        self.push(bit as u32, 1)
    }

    // Clear everything above the live bits
    fn trim(&mut self) {
        if self.q_bits == 0 {
            self.queue = 0;
        } else {
            self.queue &= u64::MAX >> (QUEUE_BITS - self.q_bits);
        }
    }

    /// Remove the oldest 8 bits, if at least 8 are held.
    pub fn pop_byte(&mut self) -> Option<u8> {
        if self.q_bits < 8 {
            return None;
        }
        let byte = (self.queue >> (self.q_bits - 8)) as u8;
        self.q_bits -= 8;
        self.trim();
        Some(byte)
    }

    /// Remove the oldest bit.
    pub fn pop_bit(&mut self) -> Option<bool> {
        if self.q_bits == 0 {
            return None;
        }
        self.q_bits -= 1;
        let bit = (self.queue >> self.q_bits) & 1 == 1;
        self.trim();
        Some(bit)
    }

    /// Pad a trailing partial byte with zeros in its low bits so everything held can be
    /// popped as whole bytes.
    pub fn flush(&mut self) -> PushStatus {
        let partial = self.q_bits % 8;
        if partial > 0 {
            self.queue <<= 8 - partial;
            self.q_bits += 8 - partial;
        }
        self.status()
    }
}
