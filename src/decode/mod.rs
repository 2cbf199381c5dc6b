//! Format decoders
//!
//! One decoder per `SupportedFormat`, dispatched over the closed enum:
//! - delimited text  — comma tables with a header row (csv)
//! - spreadsheet     — first sheet of an xlsx workbook (calamine)
//! - plain text      — verbatim pass-through
//! - binary document — revocable byte reference, no content read
//!
//! Decoders share no state and never truncate; bounding the output is the
//! normalizer's job.

pub mod delimited;
pub mod document;
pub mod spreadsheet;
pub mod text;

use std::collections::HashMap;

pub use document::{BlobHandle, RevocationProbe};
pub use spreadsheet::Cell;

use crate::format::SupportedFormat;
use crate::types::PipelineResult;
use crate::upload::UploadedFile;

/// Raw decoder output, one case per format, pre-truncation.
#[derive(Debug)]
pub enum Decoded {
    DelimitedText {
        headers: Vec<String>,
        rows: Vec<HashMap<String, String>>,
    },
    Spreadsheet {
        rows: Vec<Vec<Cell>>,
    },
    PlainText(String),
    BinaryDocument {
        file_name: String,
        blob: BlobHandle,
    },
}

/// Reads the file the way its format requires and runs the matching
/// decoder. Delimited and plain text are read as text, spreadsheets as a
/// byte buffer; binary documents skip the read entirely and only attach a
/// revocable reference.
pub async fn decode(format: SupportedFormat, file: &UploadedFile) -> PipelineResult<Decoded> {
    match format {
        SupportedFormat::DelimitedText => delimited::decode(&file.read_text().await?),
        SupportedFormat::Spreadsheet => spreadsheet::decode(&file.read_bytes().await?),
        SupportedFormat::PlainText => Ok(text::decode(file.read_text().await?)),
        SupportedFormat::BinaryDocument => Ok(document::attach(file)),
    }
}
