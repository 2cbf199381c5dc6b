// Delimited-text decoder: header-bearing comma tables

use std::collections::HashMap;

use csv::ReaderBuilder;

use crate::decode::Decoded;
use crate::format::SupportedFormat;
use crate::types::{PipelineError, PipelineResult};

/// Parses raw text as a comma-delimited table with a header row. Embedded
/// delimiters inside quoted fields are handled by the parser; fully empty
/// lines are skipped. Rows map header name to cell string. A record that
/// does not line up with the header row fails the whole decode; partial
/// results are never salvaged. Nothing is truncated here.
pub fn decode(input: &str) -> PipelineResult<Decoded> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|err| PipelineError::decode(SupportedFormat::DelimitedText, err.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record
            .map_err(|err| PipelineError::decode(SupportedFormat::DelimitedText, err.to_string()))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let row: HashMap<String, String> = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header.clone(), cell.to_string()))
            .collect();
        rows.push(row);
    }

    Ok(Decoded::DelimitedText { headers, rows })
}
