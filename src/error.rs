//! Error types for synthesis and WAV handling.

use thiserror::Error;

/// Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the TTS core.
///
/// Unknown phoneme symbols and empty inputs are not errors; they are skipped.
#[derive(Debug, Error)]
pub enum Error {
    /// A voice or synthesis parameter is outside its documented range.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// Sample rate outside 8000..=192000 Hz.
    #[error("invalid sample rate: {rate} Hz")]
    InvalidSampleRate {
        /// The invalid sample rate.
        rate: u32,
    },

    /// Only 8 and 16 bit PCM are supported.
    #[error("unsupported bits per sample: {bits}")]
    UnsupportedBitDepth {
        /// The requested bit depth.
        bits: u16,
    },

    /// Two buffers with different formats were combined.
    #[error("audio format mismatch: expected {expected}, found {found}")]
    FormatMismatch {
        /// Format of the receiving buffer.
        expected: String,
        /// Format of the appended buffer.
        found: String,
    },

    /// The byte stream does not start with the expected RIFF/WAVE tags.
    #[error("not a WAV stream: missing '{expected}' tag")]
    InvalidMagic {
        /// The tag that was expected.
        expected: &'static str,
    },

    /// A required chunk was never found.
    #[error("WAV stream has no '{chunk}' chunk")]
    MissingChunk {
        /// Chunk id.
        chunk: &'static str,
    },

    /// A chunk declares more bytes than the stream holds.
    #[error("WAV chunk '{chunk}' is truncated")]
    TruncatedChunk {
        /// Chunk id, lossily decoded.
        chunk: String,
    },

    /// The `fmt ` chunk describes something other than integer PCM.
    #[error("unsupported WAV encoding: format tag {format_tag}")]
    UnsupportedEncoding {
        /// WAVE format tag.
        format_tag: u16,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Stable error code, for collaborators that report errors by code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidParameter { .. } => "TTS_001",
            Error::InvalidSampleRate { .. } => "TTS_002",
            Error::UnsupportedBitDepth { .. } => "TTS_003",
            Error::FormatMismatch { .. } => "TTS_004",
            Error::InvalidMagic { .. } => "TTS_005",
            Error::MissingChunk { .. } => "TTS_006",
            Error::TruncatedChunk { .. } => "TTS_007",
            Error::UnsupportedEncoding { .. } => "TTS_008",
            Error::Io(_) => "TTS_009",
        }
    }

    /// `true` for errors caused by a malformed WAV stream.
    #[must_use]
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidMagic { .. }
                | Error::MissingChunk { .. }
                | Error::TruncatedChunk { .. }
                | Error::UnsupportedEncoding { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_param_helper() {
        let err = Error::invalid_param("pitch", "must be between 20 and 2000 Hz");
        assert!(err.to_string().contains("pitch"));
        assert!(err.to_string().contains("between 20 and 2000"));
        assert_eq!(err.code(), "TTS_001");
    }

    #[test]
    fn format_errors_are_classified() {
        assert!(Error::MissingChunk { chunk: "data" }.is_format_error());
        assert!(Error::InvalidMagic { expected: "RIFF" }.is_format_error());
        assert!(!Error::UnsupportedBitDepth { bits: 24 }.is_format_error());
        let io = Error::from(std::io::Error::other("disk gone"));
        assert!(!io.is_format_error());
        assert_eq!(io.code(), "TTS_009");
    }
}
