// Primitives for reading CSV files.

use crate::balance::{io_common::Table, *};

const BOM: &str = "\u{feff}";

/// Reads all the rows of a CSV file, without any header.
///
/// The file is expected in UTF-8. Invalid sequences are replaced instead of
/// failing the whole file.
pub fn read_csv_table(path: &str) -> BBalanceResult<Table> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let mut res: Table = Vec::new();
    for (idx, record_r) in rdr.into_byte_records().enumerate() {
        let lineno = idx + 1;
        let record = record_r.context(CsvLineParseSnafu { path, lineno })?;
        let row: Vec<String> = record
            .iter()
            .map(|field| String::from_utf8_lossy(field).trim().to_string())
            .collect();
        debug!("read_csv_table: {:?} {:?}", lineno, row);
        res.push(row);
    }
    if let Some(first) = res.first_mut().and_then(|row| row.first_mut()) {
        if let Some(stripped) = first.strip_prefix(BOM) {
            *first = stripped.trim().to_string();
        }
    }
    Ok(res)
}
