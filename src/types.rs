// Shared error taxonomy for the preview pipeline

use crate::format::SupportedFormat;

/// Everything that can sink an attempted preview. Carried instead of a
/// `PreviewResult`, never alongside one. No variant is retried anywhere.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    /// The classifier recognized neither the extension nor the declared
    /// content-type. The display text doubles as the user-facing rejection
    /// notice, so it names the accepted formats.
    #[error("Invalid file type. Please upload CSV, XLSX, TXT, or PDF.")]
    UnsupportedFormat,

    /// A decoder could not make sense of the raw content. Partial results
    /// are never salvaged.
    #[error("{format} parsing error: {message}")]
    Decode {
        format: SupportedFormat,
        message: String,
    },

    /// The byte source failed mid-read. I/O details go to the log; the
    /// consumer only gets the short message.
    #[error("Failed to read file.")]
    Read,
}

impl PipelineError {
    pub fn decode(format: SupportedFormat, message: impl Into<String>) -> Self {
        Self::Decode {
            format,
            message: message.into(),
        }
    }
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
