// Reader for the hourly turnout reports of the pre-voting stations.
//
// A report covers one day and one hour. The first rows hold a title with
// markers such as `[1일차]` and `[07:00]`, then comes a header row and one row
// per station with the cumulative counts of the day.

use crate::balance::{
    io_common::{
        cell, find_column, find_day_marker, find_hour_marker, is_total_label, parse_count,
        read_table, simplify_file_name, Table,
    },
    *,
};

pub const DISTRICT_HEADER: &str = "읍면동명";
pub const STATION_HEADER: &str = "사전투표소명";
pub const INTRA_HEADER: &str = "관내사전투표자수";
pub const EXTRA_HEADER: &str = "관외사전투표자수";

// Rows searched for the markers and the header.
const PREAMBLE_ROWS: usize = 10;
const DEFAULT_HEADER_ROW: usize = 3;

pub fn read_turnout_data(path: &str, cfs: &FileSource) -> BBalanceResult<Vec<ParsedReading>> {
    let table = read_table(path, cfs)?;
    let res = parse_turnout_table(&table, cfs, &simplify_file_name(path))?;
    Ok(res)
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
struct Preamble {
    day: Option<u32>,
    hour: Option<u32>,
    header_row: usize,
}

fn scan_preamble(table: &Table) -> Preamble {
    let mut res = Preamble {
        day: None,
        hour: None,
        header_row: DEFAULT_HEADER_ROW,
    };
    for (idx, row) in table.iter().take(PREAMBLE_ROWS).enumerate() {
        let line = row.join(" ");
        if res.day.is_none() {
            res.day = find_day_marker(&line);
        }
        if res.hour.is_none() {
            res.hour = find_hour_marker(&line);
        }
        if line.contains(STATION_HEADER) || line.contains(DISTRICT_HEADER) {
            res.header_row = idx;
        }
    }
    res
}

pub fn parse_turnout_table(
    table: &Table,
    cfs: &FileSource,
    source: &str,
) -> BalanceResult<Vec<ParsedReading>> {
    let preamble = scan_preamble(table);
    debug!("parse_turnout_table: {}: {:?}", source, preamble);
    let (day, hour) = match (cfs.day.or(preamble.day), cfs.hour.or(preamble.hour)) {
        (Some(day), Some(hour)) => (day, hour),
        (day, hour) => {
            warn!(
                "{}: could not find the time of the report (day: {:?}, hour: {:?}), skipping the file",
                source, day, hour
            );
            return Ok(Vec::new());
        }
    };

    let header = match table.get(preamble.header_row) {
        Some(h) => h,
        None => {
            warn!("{}: no header row, skipping the file", source);
            return Ok(Vec::new());
        }
    };
    let column = |configured: &Option<String>, default: &str| -> BalanceResult<usize> {
        let name = configured.as_deref().unwrap_or(default);
        find_column(header, name).context(MissingColumnSnafu {
            column: name,
            path: source,
        })
    };
    let station_idx = column(&cfs.station_column, STATION_HEADER)?;
    let intra_idx = column(&cfs.intra_column, INTRA_HEADER)?;
    let extra_idx = column(&cfs.extra_column, EXTRA_HEADER)?;
    let district_idx = find_column(header, DISTRICT_HEADER);

    let mut res: Vec<ParsedReading> = Vec::new();
    for (idx, row) in table.iter().enumerate().skip(preamble.header_row + 1) {
        let lineno = idx + 1;
        let station = cell(row, station_idx);
        if station.is_empty() || is_total_label(station) {
            continue;
        }
        if let Some(district_idx) = district_idx {
            if is_total_label(cell(row, district_idx)) {
                continue;
            }
        }
        // Unreadable counts are kept as NaN. The extraction skips them.
        let read = |col: usize| -> f64 {
            parse_count(cell(row, col)).unwrap_or_else(|| {
                warn!(
                    "{}: line {}: could not read count {:?} for {}",
                    source,
                    lineno,
                    cell(row, col),
                    station
                );
                f64::NAN
            })
        };
        res.push(ParsedReading {
            source: source.to_string(),
            lineno,
            station: station.to_string(),
            day,
            hour,
            intra_cumulative: read(intra_idx),
            extra_cumulative: read(extra_idx),
        });
    }
    info!(
        "{}: {} stations reported at day {} {:02}:00",
        source,
        res.len(),
        day,
        hour
    );
    Ok(res)
}
