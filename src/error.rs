//! Error types shared by every stage of the block compressor.

use thiserror::Error;

/// Result type alias for compression operations.
pub type Result<T> = core::result::Result<T, FlickError>;

/// Failure kinds reported by the codecs and the pipeline.
#[derive(Debug, Error)]
pub enum FlickError {
    /// A working buffer could not be allocated.
    #[error("out of memory")]
    OutOfMemory,

    /// The encoded form would not be smaller than the input. Used as a
    /// signal by the optional stages, which then pass the data through.
    #[error("output would not be smaller than input")]
    WouldNotShrink,

    /// Encoded data is corrupt or inconsistent.
    #[error("malformed input: {0}")]
    Malformed(String),

    /// Nothing to encode.
    #[error("empty input")]
    EmptyInput,

    /// A caller hook asked us to stop.
    #[error("aborted by hook")]
    HookAborted,

    /// Input ended before the encoded data was complete.
    #[error("unexpected end of data")]
    UnexpectedEnd,

    /// A bit stream write ran past the end of its buffer.
    #[error("bit stream buffer overflow")]
    Overflow,

    /// A bit queue push would exceed the register width.
    #[error("bit queue full")]
    QueueFull,

    /// A block is too large for 32-bit offsets.
    #[error("block too large: {0} bytes")]
    BlockTooLarge(usize),

    /// A block size of zero was requested.
    #[error("invalid block size")]
    InvalidBlockSize,

    /// I/O error from the underlying source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FlickError {
    /// Create a malformed data error.
    pub fn malformed(message: impl Into<String>) -> Self {
        FlickError::Malformed(message.into())
    }
}

/// An error tagged with the pipeline stage it came from, for the error hooks.
#[derive(Debug, Error)]
#[error("{stage}: {error}")]
pub struct StageError {
    pub stage: &'static str,
    #[source]
    pub error: FlickError,
}

impl StageError {
    pub fn new(stage: &'static str, error: FlickError) -> Self {
        Self { stage, error }
    }

    /// Log the failure, hand the message to `sink` and return the bare error.
    pub fn report(self, sink: impl FnOnce(&str)) -> FlickError {
        let message = self.to_string();
        log::error!("{}", message);
        sink(&message);
        self.error
    }
}

/// Attach a stage name to a failing Result.
pub trait Staged<T> {
    fn stage(self, stage: &'static str) -> core::result::Result<T, StageError>;
}

impl<T, E: Into<FlickError>> Staged<T> for core::result::Result<T, E> {
    fn stage(self, stage: &'static str) -> core::result::Result<T, StageError> {
        self.map_err(|e| StageError {
            stage,
            error: e.into(),
        })
    }
}

impl From<std::collections::TryReserveError> for FlickError {
    fn from(_: std::collections::TryReserveError) -> Self {
        FlickError::OutOfMemory
    }
}

/// Allocate a zeroed buffer of `len` bytes, reporting allocation failure
/// instead of aborting.
pub fn try_zeroed<T: Clone + Default>(len: usize) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)?;
    v.resize(len, T::default());
    Ok(v)
}

/// Allocate an empty buffer with room for `len` elements.
pub fn try_with_capacity<T>(len: usize) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve(len)?;
    Ok(v)
}

#[cfg(test)]
mod test {
    use super::{try_zeroed, FlickError};

    #[test]
    fn display_test() {
        assert_eq!(
            FlickError::malformed("bad index").to_string(),
            "malformed input: bad index"
        );
        assert_eq!(FlickError::BlockTooLarge(7).to_string(), "block too large: 7 bytes");
    }

    #[test]
    fn zeroed_test() {
        let v: Vec<u32> = try_zeroed(5).unwrap();
        assert_eq!(v, vec![0; 5]);
    }
}
