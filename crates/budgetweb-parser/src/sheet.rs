//! Sheet reading and column resolution
//!
//! The parser ingests a CSV export of the purchase workbook. Columns are
//! matched by header name, not position; header cells are trimmed before
//! matching. Column order does not matter. The five required columns are:
//!
//! | Column          | Content                                   |
//! |-----------------|-------------------------------------------|
//! | `Total Value`   | purchase value, may carry thousands commas |
//! | `DURATION`      | recurrence label (MONTHLY / YEARLY / ...) |
//! | `Release Date`  | day-first date, may be empty              |
//! | `Delivery Date` | day-first date, may be empty              |
//! | `Short Text`    | item name                                 |
//!
//! Any other column is carried through untouched so detail views and
//! exports can show it. Cell contents are NOT coerced here; typing is the
//! normalizer's job and a malformed cell must survive to that stage.

use serde::{Deserialize, Serialize};

use crate::error::SheetError;

/// Required column: purchase value
pub const COL_TOTAL_VALUE: &str = "Total Value";
/// Required column: recurrence label
pub const COL_DURATION: &str = "DURATION";
/// Required column: release date
pub const COL_RELEASE_DATE: &str = "Release Date";
/// Required column: delivery date
pub const COL_DELIVERY_DATE: &str = "Delivery Date";
/// Required column: item name
pub const COL_SHORT_TEXT: &str = "Short Text";

/// All required columns, in reporting order
pub const REQUIRED_COLUMNS: [&str; 5] = [
    COL_TOTAL_VALUE,
    COL_DURATION,
    COL_RELEASE_DATE,
    COL_DELIVERY_DATE,
    COL_SHORT_TEXT,
];

/// One raw sheet row, untyped
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSheetRow {
    /// Raw `Total Value` cell
    pub total_value: String,
    /// Raw `DURATION` cell
    pub duration: String,
    /// Raw `Release Date` cell
    pub release_date: String,
    /// Raw `Delivery Date` cell
    pub delivery_date: String,
    /// Raw `Short Text` cell
    pub short_text: String,
    /// Passthrough cells from columns the pipeline does not use,
    /// in sheet column order
    pub extra: Vec<(String, String)>,
}

/// A parsed sheet: resolved headers plus raw rows
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sheet {
    /// Header cells, trimmed, in sheet order
    pub headers: Vec<String>,
    /// Raw data rows
    pub rows: Vec<RawSheetRow>,
}

impl Sheet {
    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Resolved indices of the required columns
struct ColumnIndex {
    total_value: usize,
    duration: usize,
    release_date: usize,
    delivery_date: usize,
    short_text: usize,
}

impl ColumnIndex {
    /// Resolve required columns against the header row. The first
    /// occurrence of a name wins; all missing names are reported together.
    fn resolve(headers: &[String]) -> Result<Self, SheetError> {
        let find = |name: &str| headers.iter().position(|h| h == name);

        let mut missing = Vec::new();
        for name in REQUIRED_COLUMNS {
            if find(name).is_none() {
                missing.push(name.to_string());
            }
        }
        if !missing.is_empty() {
            return Err(SheetError::MissingColumns { columns: missing });
        }

        Ok(Self {
            total_value: find(COL_TOTAL_VALUE).unwrap(),
            duration: find(COL_DURATION).unwrap(),
            release_date: find(COL_RELEASE_DATE).unwrap(),
            delivery_date: find(COL_DELIVERY_DATE).unwrap(),
            short_text: find(COL_SHORT_TEXT).unwrap(),
        })
    }

    fn required_indices(&self) -> [usize; 5] {
        [
            self.total_value,
            self.duration,
            self.release_date,
            self.delivery_date,
            self.short_text,
        ]
    }
}

/// Parse CSV content into a [`Sheet`].
///
/// Short records are padded with empty cells rather than rejected; sheet
/// exports routinely drop trailing empty columns.
pub fn parse_sheet(content: &str) -> Result<Sheet, SheetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| SheetError::MalformedCsv { record: 0, message: e.to_string() })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(SheetError::EmptySheet);
    }

    let index = ColumnIndex::resolve(&headers)?;
    let required = index.required_indices();

    let mut rows = Vec::new();
    for (n, record) in reader.records().enumerate() {
        let record = record.map_err(|e| SheetError::MalformedCsv {
            record: n as u64 + 1,
            message: e.to_string(),
        })?;

        let cell = |i: usize| record.get(i).unwrap_or("").to_string();

        let extra = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| !required.contains(i))
            .map(|(i, h)| (h.clone(), cell(i)))
            .collect();

        rows.push(RawSheetRow {
            total_value: cell(index.total_value),
            duration: cell(index.duration),
            release_date: cell(index.release_date),
            delivery_date: cell(index.delivery_date),
            short_text: cell(index.short_text),
            extra,
        });
    }

    Ok(Sheet { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "\
Short Text,Total Value,DURATION,Release Date,Delivery Date,Vendor
Drill,1200,YEARLY,05/03/2024,10/03/2024,Acme
Wrench,\"1,200.50\",MONTHLY,,15/01/2024,Balt";

    #[test]
    fn test_parse_sheet_columns_by_name() {
        let sheet = parse_sheet(SHEET).unwrap();
        assert_eq!(sheet.row_count(), 2);

        let row = &sheet.rows[0];
        assert_eq!(row.short_text, "Drill");
        assert_eq!(row.total_value, "1200");
        assert_eq!(row.duration, "YEARLY");
        assert_eq!(row.release_date, "05/03/2024");
        assert_eq!(row.delivery_date, "10/03/2024");
    }

    #[test]
    fn test_quoted_thousands_separator_survives() {
        let sheet = parse_sheet(SHEET).unwrap();
        assert_eq!(sheet.rows[1].total_value, "1,200.50");
    }

    #[test]
    fn test_extra_columns_passthrough() {
        let sheet = parse_sheet(SHEET).unwrap();
        assert_eq!(
            sheet.rows[0].extra,
            vec![("Vendor".to_string(), "Acme".to_string())]
        );
    }

    #[test]
    fn test_missing_columns_all_reported() {
        let err = parse_sheet("Short Text,Release Date\nDrill,05/03/2024").unwrap_err();
        match err {
            SheetError::MissingColumns { columns } => {
                assert_eq!(columns, vec!["Total Value", "DURATION", "Delivery Date"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_headers_are_trimmed() {
        let sheet =
            parse_sheet(" Total Value ,DURATION,Release Date,Delivery Date,Short Text\n10,MONTHLY,,,Saw")
                .unwrap();
        assert_eq!(sheet.rows[0].total_value, "10");
        assert_eq!(sheet.rows[0].short_text, "Saw");
    }

    #[test]
    fn test_short_record_padded() {
        let sheet =
            parse_sheet("Total Value,DURATION,Release Date,Delivery Date,Short Text\n10,MONTHLY")
                .unwrap();
        assert_eq!(sheet.rows[0].release_date, "");
        assert_eq!(sheet.rows[0].short_text, "");
    }

    #[test]
    fn test_empty_content_is_empty_sheet() {
        assert!(matches!(parse_sheet(""), Err(SheetError::EmptySheet)));
    }
}
