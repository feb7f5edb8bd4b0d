use std::path::Path;

use crate::balance::{io_csv::read_csv_table, io_excel::read_excel_table, *};

/// The cells of a sheet, as trimmed strings. Rows may have different lengths.
pub type Table = Vec<Vec<String>>;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Provider {
    Csv,
    Xlsx,
}

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

/// The provider of a file: the one configured, or the one matching its
/// extension.
pub fn get_provider(path: &str, provider: &str) -> BalanceResult<Provider> {
    let name = if provider.is_empty() {
        Path::new(path)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    } else {
        provider.to_lowercase()
    };
    match name.as_str() {
        "csv" => Ok(Provider::Csv),
        "xlsx" | "xlsm" => Ok(Provider::Xlsx),
        _ => UnknownProviderSnafu {
            provider: name.clone(),
            path,
        }
        .fail(),
    }
}

pub fn read_table(path: &str, cfs: &FileSource) -> BBalanceResult<Table> {
    info!("Attempting to read file {:?}", path);
    match get_provider(path, &cfs.provider)? {
        Provider::Csv => read_csv_table(path),
        Provider::Xlsx => read_excel_table(path, cfs.excel_worksheet_name.as_deref()),
    }
}

/// A cell of a row, empty when the row is too short.
pub fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(|s| s.as_str()).unwrap_or("")
}

pub fn find_column(header: &[String], name: &str) -> Option<usize> {
    let name: String = name.chars().filter(|c| !c.is_whitespace()).collect();
    header.iter().position(|h| {
        let h: String = h.chars().filter(|c| !c.is_whitespace()).collect();
        h == name
    })
}

/// Parses a number written with thousands separators. None for an empty or
/// unreadable cell.
pub fn parse_count(s: &str) -> Option<f64> {
    let t = s.replace(',', "");
    let t = t.trim();
    if t.is_empty() {
        None
    } else {
        t.parse::<f64>().ok()
    }
}

/// Rows that hold totals instead of a station.
pub fn is_total_label(s: &str) -> bool {
    let s: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    ["합계", "소계", "총계", "누계"]
        .iter()
        .any(|label| s.contains(label))
}

// The text after a '[' for every bracket of the string.
fn bracket_contents(s: &str) -> impl Iterator<Item = &str> {
    s.match_indices('[').map(move |(start, _)| &s[start + 1..])
}

fn leading_digits(s: &str) -> &str {
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(idx, _)| idx)
        .unwrap_or(s.len());
    &s[..end]
}

/// Finds a day marker such as `[2일차]`.
pub fn find_day_marker(s: &str) -> Option<u32> {
    for rest in bracket_contents(s) {
        let digits = leading_digits(rest);
        if !digits.is_empty() && rest[digits.len()..].starts_with("일차]") {
            return digits.parse::<u32>().ok();
        }
    }
    None
}

/// Finds an hour marker such as `[09:00]` and returns the hour.
pub fn find_hour_marker(s: &str) -> Option<u32> {
    for rest in bracket_contents(s) {
        let hours = leading_digits(rest);
        if hours.is_empty() || hours.len() > 2 {
            continue;
        }
        if let Some(after) = rest[hours.len()..].strip_prefix(':') {
            let minutes = leading_digits(after);
            if minutes.len() == 2 && after[2..].starts_with(']') {
                return hours.parse::<u32>().ok();
            }
        }
    }
    None
}
