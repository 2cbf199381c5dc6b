// Spreadsheet decoder: first sheet of an xlsx workbook, rows as-is

use std::io::Cursor;

use bytes::Bytes;
use calamine::{Data, Reader, Xlsx};

use crate::decode::Decoded;
use crate::format::SupportedFormat;
use crate::types::{PipelineError, PipelineResult};

/// A single spreadsheet cell, reduced to the value kinds the preview cares
/// about. Serializes untagged, so JSON output carries plain scalars and
/// `null` for empty cells.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Float(n) => Cell::Number(*n),
            Data::Int(n) => Cell::Number(*n as f64),
            Data::Bool(b) => Cell::Bool(*b),
            Data::Error(e) => Cell::Text(e.to_string()),
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Opens the raw bytes as an xlsx workbook, selects the first sheet by
/// positional index, and serializes every row as an ordered array of cell
/// values. The first row is not treated specially here; the normalizer owns
/// that convention. No fallback to delimited text is attempted when the
/// bytes are not a workbook, even if the extension suggested otherwise.
pub fn decode(bytes: &Bytes) -> PipelineResult<Decoded> {
    let mut workbook = Xlsx::new(Cursor::new(bytes.clone()))
        .map_err(|err| PipelineError::decode(SupportedFormat::Spreadsheet, err.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| {
            PipelineError::decode(SupportedFormat::Spreadsheet, "workbook has no sheets")
        })?
        .map_err(|err| PipelineError::decode(SupportedFormat::Spreadsheet, err.to_string()))?;

    let rows: Vec<Vec<Cell>> = range
        .rows()
        .map(|row| row.iter().map(Cell::from).collect())
        .collect();

    Ok(Decoded::Spreadsheet { rows })
}
