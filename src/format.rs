// File classification: extension first, declared content-type as fallback

use crate::types::{PipelineError, PipelineResult};

/// The closed set of formats the preview pipeline understands. Decode
/// dispatch matches on this enum, so an unhandled format is a compile error
/// rather than a runtime branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SupportedFormat {
    DelimitedText,
    Spreadsheet,
    PlainText,
    BinaryDocument,
}

impl std::fmt::Display for SupportedFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SupportedFormat::DelimitedText => write!(f, "delimited-text"),
            SupportedFormat::Spreadsheet => write!(f, "spreadsheet"),
            SupportedFormat::PlainText => write!(f, "plain-text"),
            SupportedFormat::BinaryDocument => write!(f, "binary-document"),
        }
    }
}

impl SupportedFormat {
    /// File extensions the upload surface advertises, in display order.
    pub const ACCEPTED_EXTENSIONS: [&'static str; 4] = ["csv", "xlsx", "txt", "pdf"];

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "csv" => Some(SupportedFormat::DelimitedText),
            "xlsx" => Some(SupportedFormat::Spreadsheet),
            "txt" => Some(SupportedFormat::PlainText),
            "pdf" => Some(SupportedFormat::BinaryDocument),
            _ => None,
        }
    }

    /// Fixed allow-list of declared content-types. `application/vnd.ms-excel`
    /// is what several platforms report for Excel files regardless of age,
    /// so it maps to the spreadsheet decoder as well.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type {
            "text/csv" => Some(SupportedFormat::DelimitedText),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            | "application/vnd.ms-excel" => Some(SupportedFormat::Spreadsheet),
            "text/plain" => Some(SupportedFormat::PlainText),
            "application/pdf" => Some(SupportedFormat::BinaryDocument),
            _ => None,
        }
    }
}

/// Maps a file name and declared content-type to a `SupportedFormat`.
///
/// The substring after the last `.` (lower-cased) is authoritative; the
/// declared content-type is only consulted when extension lookup fails,
/// because content-type strings are unreliable across platforms. A name
/// without a dot falls straight through to the content-type check.
pub fn classify(name: &str, content_type: &str) -> PipelineResult<SupportedFormat> {
    let extension = name
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    if let Some(format) = SupportedFormat::from_extension(&extension) {
        return Ok(format);
    }

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    SupportedFormat::from_content_type(&essence).ok_or(PipelineError::UnsupportedFormat)
}
