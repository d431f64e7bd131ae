//! Error types for budgetweb-parser

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Missing required column(s): {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("Sheet has no header row")]
    EmptySheet,

    #[error("Malformed CSV at record {record}: {message}")]
    MalformedCsv { record: u64, message: String },

    #[error("IO error")]
    IoError(#[from] io::Error),
}
