// Reader for the device inventory of the stations.
//
// Two layouts are understood: the template with named columns, and the
// official inventory where the station is in column C and the devices in
// columns F (in-precinct) and G (out-of-precinct). Both may carry the total
// and the reserve of the district in cells D7 and H7.

use crate::balance::{
    io_common::{cell, find_column, is_total_label, read_table, Table},
    *,
};

pub const TEMPLATE_STATION_HEADER: &str = "사전투표소명";
pub const TEMPLATE_INTRA_HEADER: &str = "관내장비수";
pub const TEMPLATE_EXTRA_HEADER: &str = "관외장비수";

const HEADER_SEARCH_ROWS: usize = 15;
const OFFICIAL_COLUMNS: (usize, usize, usize) = (2, 5, 6);
// D7 and H7
const SUMMARY_ROW: usize = 6;
const SUMMARY_TOTAL_COL: usize = 3;
const SUMMARY_RESERVE_COL: usize = 7;

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct EquipmentInventory {
    pub stations: Vec<(String, AllocationState)>,
    /// The total and reserve written in the summary cells, when a total is
    /// present.
    pub summary: Option<EquipmentPool>,
}

impl EquipmentInventory {
    /// The devices of a station. The names may differ slightly between the
    /// files: an entry whose name contains the station name, or is contained
    /// in it, is also accepted.
    pub fn devices_for(&self, station: &str) -> Option<AllocationState> {
        self.stations
            .iter()
            .find(|(name, _)| name == station)
            .or_else(|| {
                self.stations
                    .iter()
                    .find(|(name, _)| station.contains(name.as_str()) || name.contains(station))
            })
            .map(|(_, state)| *state)
    }
}

pub fn read_equipment(path: &str, cfs: &FileSource) -> BBalanceResult<EquipmentInventory> {
    let table = read_table(path, cfs)?;
    let res = parse_equipment_table(&table);
    info!(
        "Equipment file {}: {} stations, summary: {:?}",
        path,
        res.stations.len(),
        res.summary
    );
    Ok(res)
}

/// Reads a device count such as `3`, `3대` or `2 (1)`. Unreadable counts
/// and counts below one give one device: a stream is never left without a
/// device.
pub fn lenient_count(s: &str) -> u32 {
    let head = s.split('(').next().unwrap_or("");
    let t = head.replace(',', "").replace('대', "");
    match t.trim().parse::<f64>() {
        Ok(x) if x.is_finite() && x >= 1.0 => x as u32,
        _ => 1,
    }
}

fn digits_only(s: &str) -> u32 {
    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse::<u32>().unwrap_or(0)
}

fn read_summary_cells(table: &Table) -> Option<EquipmentPool> {
    let width = table.iter().map(|r| r.len()).max().unwrap_or(0);
    if table.len() <= SUMMARY_ROW || width <= SUMMARY_RESERVE_COL {
        return None;
    }
    let row = &table[SUMMARY_ROW];
    let total = digits_only(cell(row, SUMMARY_TOTAL_COL));
    if total == 0 {
        return None;
    }
    Some(EquipmentPool {
        total_assets: total,
        reserve: digits_only(cell(row, SUMMARY_RESERVE_COL)),
    })
}

// Header row and columns (station, intra, extra) of the inventory.
fn find_layout(table: &Table) -> (Option<usize>, (usize, usize, usize)) {
    for (idx, row) in table.iter().take(HEADER_SEARCH_ROWS).enumerate() {
        if let (Some(s), Some(i), Some(e)) = (
            find_column(row, TEMPLATE_STATION_HEADER),
            find_column(row, TEMPLATE_INTRA_HEADER),
            find_column(row, TEMPLATE_EXTRA_HEADER),
        ) {
            debug!("find_layout: template header at row {}", idx + 1);
            return (Some(idx), (s, i, e));
        }
    }
    for (idx, row) in table.iter().take(HEADER_SEARCH_ROWS).enumerate() {
        let c: String = cell(row, OFFICIAL_COLUMNS.0).replace(' ', "");
        if c.contains("읍면동") || c.contains("투표소") {
            debug!("find_layout: official header at row {}", idx + 1);
            return (Some(idx), OFFICIAL_COLUMNS);
        }
    }
    (None, OFFICIAL_COLUMNS)
}

pub fn parse_equipment_table(table: &Table) -> EquipmentInventory {
    let (header_row, (station_idx, intra_idx, extra_idx)) = find_layout(table);
    let start = header_row.map(|h| h + 1).unwrap_or(0);
    let mut stations: Vec<(String, AllocationState)> = Vec::new();
    for row in table.iter().skip(start) {
        let name = cell(row, station_idx);
        if name.is_empty() || is_total_label(name) {
            continue;
        }
        let state = AllocationState {
            intra: lenient_count(cell(row, intra_idx)),
            extra: lenient_count(cell(row, extra_idx)),
        };
        debug!("parse_equipment_table: {} {:?}", name, state);
        stations.push((name.to_string(), state));
    }
    EquipmentInventory {
        stations,
        summary: read_summary_cells(table),
    }
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
    fn counts() {
        assert_eq!(lenient_count("3"), 3);
        assert_eq!(lenient_count("3대"), 3);
        assert_eq!(lenient_count("2 (1)"), 2);
        assert_eq!(lenient_count(""), 1);
        assert_eq!(lenient_count("0"), 1);
    }

    #[test]
    fn template_layout() {
        let t = table(&[
            &["사전투표소명", "관내장비수", "관외장비수"],
            &["소공동사전투표소", "2", "1"],
            &["합계", "3", "2"],
            &["회현동사전투표소", "1대", ""],
        ]);
        let inv = parse_equipment_table(&t);
        assert_eq!(
            inv.stations,
            vec![
                (
                    "소공동사전투표소".to_string(),
                    AllocationState { intra: 2, extra: 1 }
                ),
                (
                    "회현동사전투표소".to_string(),
                    AllocationState { intra: 1, extra: 1 }
                ),
            ]
        );
        assert_eq!(inv.summary, None);
        assert_eq!(
            inv.devices_for("회현동"),
            Some(AllocationState { intra: 1, extra: 1 })
        );
        assert_eq!(inv.devices_for("명동"), None);
    }

    #[test]
    fn official_layout_with_summary() {
        let t = table(&[
            &["사전투표 장비 현황"],
            &[""],
            &["", "", "서울특별시 중구"],
            &[""],
            &[""],
            &["", "", "읍 면 동", "", "", "관내", "관외", ""],
            &["", "", "합계", "42대", "", "20", "17", "5대"],
            &["", "", "소공동사전투표소", "", "", "3", "2 (1)", ""],
        ]);
        let inv = parse_equipment_table(&t);
        assert_eq!(
            inv.summary,
            Some(EquipmentPool {
                total_assets: 42,
                reserve: 5
            })
        );
        assert_eq!(
            inv.stations,
            vec![(
                "소공동사전투표소".to_string(),
                AllocationState { intra: 3, extra: 2 }
            )]
        );
    }
}
