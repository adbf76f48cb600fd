//! Sitemap CSV reader.

use crate::error::StartupError;
use migrator_domain::SourceRow;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// Columns of the sitemap table; matched by header name, extras ignored.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(rename = "Page names", default)]
    page_name: String,

    #[serde(rename = "Section", default)]
    section: String,

    #[serde(rename = "Old URL", default)]
    old_url: String,
}

impl From<CsvRecord> for SourceRow {
    fn from(record: CsvRecord) -> Self {
        SourceRow::new(&record.page_name, &record.section, &record.old_url)
    }
}

/// Read every row of the CSV at `path`.
pub fn read_rows(path: &Path) -> Result<Vec<SourceRow>, StartupError> {
    let to_error = |e: csv::Error| StartupError::Csv {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(to_error)?;
    collect_rows(reader).map_err(to_error)
}

/// Read every row of CSV text from `input`.
pub fn read_rows_from<R: Read>(input: R) -> Result<Vec<SourceRow>, csv::Error> {
    collect_rows(csv::ReaderBuilder::new().flexible(true).from_reader(input))
}

fn collect_rows<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<SourceRow>, csv::Error> {
    reader
        .deserialize::<CsvRecord>()
        .map(|record| record.map(SourceRow::from))
        .collect()
}
