//! Purchase sheet parser implementation
//!
//! A lightweight reader for CSV exports of the purchase workbook, built
//! on the `csv` crate. Header names are resolved here; cell typing is
//! deliberately left to the normalizer downstream.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

pub mod error;
pub mod sheet;

pub use error::SheetError;
pub use sheet::{
    parse_sheet, RawSheetRow, Sheet, COL_DELIVERY_DATE, COL_DURATION, COL_RELEASE_DATE,
    COL_SHORT_TEXT, COL_TOTAL_VALUE, REQUIRED_COLUMNS,
};

// ==================== Parser Trait ====================

/// Parser reference type
pub type ParserRef = Arc<dyn SheetParserTrait>;

/// Trait for purchase sheet parsers
#[async_trait]
pub trait SheetParserTrait: Send + Sync {
    /// Parse sheet content and return the raw rows
    async fn parse(&self, content: &str) -> Result<Sheet, SheetError>;

    /// Parse from a file path
    async fn parse_file(&self, path: PathBuf) -> Result<Sheet, SheetError>;
}

/// Default parser implementation
#[derive(Debug, Default)]
pub struct DefaultSheetParser;

#[async_trait]
impl SheetParserTrait for DefaultSheetParser {
    async fn parse(&self, content: &str) -> Result<Sheet, SheetError> {
        parse_sheet(content)
    }

    async fn parse_file(&self, path: PathBuf) -> Result<Sheet, SheetError> {
        let content = tokio::fs::read_to_string(&path).await?;
        parse_sheet(&content)
    }
}
