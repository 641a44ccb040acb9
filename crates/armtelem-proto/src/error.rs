/// Errors that can occur while decoding frames from a byte buffer.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Fewer bytes were available than one complete frame requires.
    ///
    /// On the scan path this marks the truncated trailing-frame case: the
    /// caller stops scanning and the remaining bytes count as noise.
    #[error("insufficient data ({available} bytes, a frame needs {needed})")]
    InsufficientData { available: usize, needed: usize },
}

pub type Result<T> = std::result::Result<T, FrameError>;
