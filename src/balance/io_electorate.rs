// Reader for the electorate statistics per district, used to estimate how the
// in-precinct turnout changes between two elections.

use crate::balance::{
    io_common::{cell, is_total_label, parse_count, read_table, Table},
    *,
};

const HEADER: &str = "읍면동명";
const HEADER_SEARCH_ROWS: usize = 15;
const NAME_COL: usize = 0;
const COUNT_COL: usize = 3;

pub fn read_electorate(path: &str, cfs: &FileSource) -> BBalanceResult<Vec<(String, f64)>> {
    let table = read_table(path, cfs)?;
    let res = parse_electorate_table(&table);
    info!("Electorate file {}: {} districts", path, res.len());
    Ok(res)
}

/// The electorate of every district, in file order.
pub fn parse_electorate_table(table: &Table) -> Vec<(String, f64)> {
    let start = table
        .iter()
        .take(HEADER_SEARCH_ROWS)
        .position(|row| cell(row, NAME_COL).contains(HEADER))
        .map(|idx| idx + 1)
        .unwrap_or(0);
    let mut res: Vec<(String, f64)> = Vec::new();
    for row in table.iter().skip(start) {
        let name: String = cell(row, NAME_COL).replace(' ', "");
        if name.is_empty() || is_total_label(&name) {
            continue;
        }
        // The cell may hold details after the count: "21,412\n(25, 12)".
        let raw = cell(row, COUNT_COL);
        let first = raw.lines().next().unwrap_or("");
        let first = first.split('(').next().unwrap_or("");
        match parse_count(first) {
            Some(x) if x > 0.0 => match res.iter_mut().find(|(n, _)| *n == name) {
                Some(entry) => entry.1 = x,
                None => res.push((name, x)),
            },
            _ => {
                debug!("parse_electorate_table: skipping {} {:?}", name, raw);
            }
        }
    }
    res
}

/// Growth of the electorate of every district present in both files, in
/// percent.
pub fn growth_rates(past: &[(String, f64)], recent: &[(String, f64)]) -> Vec<(String, f64)> {
    recent
        .iter()
        .filter_map(|(name, recent_count)| {
            past.iter()
                .find(|(n, _)| n == name)
                .map(|(_, past_count)| {
                    (
                        name.clone(),
                        (recent_count - past_count) / past_count * 100.0,
                    )
                })
        })
        .collect()
}

/// The growth rate of the first district whose name is part of the station
/// name.
pub fn rate_for_station(rates: &[(String, f64)], station: &str) -> Option<f64> {
    let compact: String = station.replace(' ', "");
    rates
        .iter()
        .find(|(district, _)| compact.contains(district.as_str()))
        .map(|(_, rate)| *rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> Table {
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn reads_districts() {
        let t = table(&[
            &["선거인수 현황"],
            &["읍면동명", "투표구수", "인구수", "선거인수"],
            &["합계", "", "", "50,000"],
            &["소공 동", "", "", "20,000\n(25, 12)"],
            &["회현동", "", "", "10,000 (3)"],
            &["명동", "", "", "-"],
        ]);
        let res = parse_electorate_table(&t);
        assert_eq!(
            res,
            vec![
                ("소공동".to_string(), 20000.0),
                ("회현동".to_string(), 10000.0)
            ]
        );
    }

    #[test]
    fn rates_match_stations() {
        let past = vec![("소공동".to_string(), 20000.0), ("회현동".to_string(), 10000.0)];
        let recent = vec![("회현동".to_string(), 9000.0), ("소공동".to_string(), 21000.0)];
        let rates = growth_rates(&past, &recent);
        assert_eq!(rates.len(), 2);
        assert!((rates[0].1 + 10.0).abs() < 1e-9);
        assert!((rates[1].1 - 5.0).abs() < 1e-9);
        assert_eq!(rate_for_station(&rates, "회현동 사전투표소"), Some(rates[0].1));
        assert_eq!(rate_for_station(&rates, "명동사전투표소"), None);
    }
}
