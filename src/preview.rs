// Preview normalization: one bounded, uniform record per format

use std::collections::HashMap;

use crate::decode::{BlobHandle, Cell, Decoded};
use crate::format::SupportedFormat;

/// The normalized preview a consumer renders. Tagged by format; tabular
/// cases are capped in rows, plain text in characters, binary documents are
/// an opaque reference and never truncated.
#[derive(Debug)]
pub enum PreviewResult {
    /// Header names plus row mappings, at most `max_rows` data rows.
    DelimitedText {
        headers: Vec<String>,
        rows: Vec<HashMap<String, String>>,
    },
    /// Ordered row-arrays, at most `max_rows` in total; by convention the
    /// first row is rendered as the header.
    Spreadsheet { rows: Vec<Vec<Cell>> },
    /// Pre-truncated to at most `max_chars` characters.
    PlainText(String),
    /// Display name plus the revocable reference for an embedded viewer.
    BinaryDocument {
        file_name: String,
        blob: BlobHandle,
    },
}

impl PreviewResult {
    pub fn format(&self) -> SupportedFormat {
        match self {
            PreviewResult::DelimitedText { .. } => SupportedFormat::DelimitedText,
            PreviewResult::Spreadsheet { .. } => SupportedFormat::Spreadsheet,
            PreviewResult::PlainText(_) => SupportedFormat::PlainText,
            PreviewResult::BinaryDocument { .. } => SupportedFormat::BinaryDocument,
        }
    }

    /// Releases any revocable reference the preview holds. Called from the
    /// lifecycle manager's single cleanup path on every transition away
    /// from this preview; a no-op for the text and tabular cases.
    pub(crate) fn release(&self) {
        if let PreviewResult::BinaryDocument { blob, .. } = self {
            blob.revoke();
        }
    }
}

/// Truncation caps. Kept apart from the decoders so the values can change
/// without touching decode logic.
#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub struct PreviewLimits {
    /// Row cap for tabular previews.
    pub max_rows: usize,
    /// Character cap for plain-text previews.
    pub max_chars: usize,
}

impl Default for PreviewLimits {
    fn default() -> Self {
        Self {
            max_rows: 10,
            max_chars: 1000,
        }
    }
}

/// Shapes raw decoder output into a `PreviewResult`, enforcing the caps.
/// This is the only place truncation happens.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    limits: PreviewLimits,
}

impl Normalizer {
    pub fn new(limits: PreviewLimits) -> Self {
        Self { limits }
    }

    pub fn normalize(&self, decoded: Decoded) -> PreviewResult {
        match decoded {
            Decoded::DelimitedText { headers, mut rows } => {
                rows.truncate(self.limits.max_rows);
                PreviewResult::DelimitedText { headers, rows }
            }
            Decoded::Spreadsheet { mut rows } => {
                rows.truncate(self.limits.max_rows);
                PreviewResult::Spreadsheet { rows }
            }
            Decoded::PlainText(text) => {
                if text.chars().count() <= self.limits.max_chars {
                    PreviewResult::PlainText(text)
                } else {
                    PreviewResult::PlainText(text.chars().take(self.limits.max_chars).collect())
                }
            }
            Decoded::BinaryDocument { file_name, blob } => {
                PreviewResult::BinaryDocument { file_name, blob }
            }
        }
    }
}
