//! Congestion tables: voters per device for every reporting hour.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;

use crate::config::*;
use crate::demand::DemandDelta;

/// The kind of election. It decides from which congestion a station is
/// considered overloaded.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum ElectionType {
    Presidential,
    General,
    Local,
}

impl ElectionType {
    pub fn from_name(name: &str) -> Option<ElectionType> {
        match name.trim().to_lowercase().as_str() {
            "president" | "presidential" => Some(ElectionType::Presidential),
            "general" => Some(ElectionType::General),
            "local" => Some(ElectionType::Local),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ElectionType::Presidential => "president",
            ElectionType::General => "general",
            ElectionType::Local => "local",
        }
    }

    /// Voters per device and per hour from which a cell is congested.
    pub fn threshold(&self) -> f64 {
        match self {
            ElectionType::Presidential => 120.0,
            ElectionType::General => 100.0,
            ElectionType::Local => 60.0,
        }
    }
}

impl Default for ElectionType {
    fn default() -> Self {
        ElectionType::Presidential
    }
}

impl Display for ElectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The congestion of one stream of a station during one bucket.
#[derive(PartialEq, Debug, Clone)]
pub struct CongestionCell {
    pub station: String,
    pub bucket: TimeBucket,
    pub class: DemandClass,
    pub voters: f64,
    pub devices: u32,
    /// Voters per device.
    pub congestion: f64,
}

/// Computes the congestion of every bucket, in station order.
///
/// Stations without an entry in `devices` are counted with the baseline of
/// one device per stream. Deltas of stations that are not listed are
/// ignored.
pub fn congestion_cells(
    stations: &[String],
    deltas: &HashMap<String, Vec<DemandDelta>>,
    devices: &HashMap<String, AllocationState>,
) -> Vec<CongestionCell> {
    let mut res: Vec<CongestionCell> = Vec::new();
    for station in stations.iter() {
        let state = devices
            .get(station)
            .cloned()
            .unwrap_or(AllocationState::BASELINE);
        let station_deltas = match deltas.get(station) {
            Some(ds) => ds,
            None => continue,
        };
        for d in station_deltas.iter() {
            for class in DemandClass::ALL {
                // A zero count would only come from a hand-made state.
                let count = state.devices(class).max(1);
                let voters = d.voters(class);
                res.push(CongestionCell {
                    station: station.clone(),
                    bucket: d.bucket,
                    class,
                    voters,
                    devices: count,
                    congestion: voters / count as f64,
                });
            }
        }
    }
    res
}

#[derive(PartialEq, Debug, Clone)]
pub struct CongestionSummary {
    pub class: DemandClass,
    pub peak: f64,
    /// Mean over all the buckets.
    pub mean: f64,
    /// Mean over the buckets inside the hour window.
    pub focus_mean: f64,
    pub cells_over_threshold: usize,
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Aggregates the cells of one stream. A cell counts as congested when it
/// reaches the threshold.
pub fn summarize(
    cells: &[CongestionCell],
    class: DemandClass,
    threshold: f64,
    window: HourWindow,
) -> CongestionSummary {
    let all: Vec<f64> = cells
        .iter()
        .filter(|c| c.class == class)
        .map(|c| c.congestion)
        .collect();
    let focus: Vec<f64> = cells
        .iter()
        .filter(|c| c.class == class && window.contains(c.bucket.hour))
        .map(|c| c.congestion)
        .collect();
    CongestionSummary {
        class,
        peak: all.iter().cloned().fold(0.0, f64::max),
        mean: mean(&all),
        focus_mean: mean(&focus),
        cells_over_threshold: all.iter().filter(|x| **x >= threshold).count(),
    }
}

/// The highest congestion of one stream of a station, 0 without data.
pub fn station_peak(cells: &[CongestionCell], station: &str, class: DemandClass) -> f64 {
    cells
        .iter()
        .filter(|c| c.class == class && c.station == station)
        .map(|c| c.congestion)
        .fold(0.0, f64::max)
}

/// The congestion of one hour of a station, averaged over the days.
#[derive(PartialEq, Debug, Clone)]
pub struct HourlyAverage {
    pub station: String,
    pub hour: u32,
    pub congestion: f64,
    /// Number of days with a report at this hour.
    pub days: usize,
}

/// Averages the congestion of every (station, hour) across the days, for one
/// stream. The result follows the order of the cells for the stations, and
/// the hours are sorted.
pub fn hourly_average(cells: &[CongestionCell], class: DemandClass) -> Vec<HourlyAverage> {
    let mut order: Vec<&str> = Vec::new();
    let mut by_station: HashMap<&str, BTreeMap<u32, Vec<f64>>> = HashMap::new();
    for c in cells.iter().filter(|c| c.class == class) {
        if !by_station.contains_key(c.station.as_str()) {
            order.push(c.station.as_str());
        }
        by_station
            .entry(c.station.as_str())
            .or_default()
            .entry(c.bucket.hour)
            .or_default()
            .push(c.congestion);
    }
    let mut res: Vec<HourlyAverage> = Vec::new();
    for station in order {
        if let Some(hours) = by_station.get(station) {
            for (hour, values) in hours.iter() {
                res.push(HourlyAverage {
                    station: station.to_string(),
                    hour: *hour,
                    congestion: mean(values),
                    days: values.len(),
                });
            }
        }
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta(day: u32, hour: u32, intra: f64, extra: f64) -> DemandDelta {
        DemandDelta {
            bucket: TimeBucket::new(day, hour),
            intra,
            extra,
        }
    }

    fn sample() -> (Vec<String>, HashMap<String, Vec<DemandDelta>>) {
        let stations = vec!["A".to_string(), "B".to_string()];
        let mut deltas: HashMap<String, Vec<DemandDelta>> = HashMap::new();
        deltas.insert(
            "A".to_string(),
            vec![
                delta(1, 10, 60.0, 10.0),
                delta(1, 12, 300.0, 40.0),
                delta(2, 12, 100.0, 20.0),
            ],
        );
        deltas.insert("B".to_string(), vec![delta(1, 12, 90.0, 0.0)]);
        (stations, deltas)
    }

    #[test]
    fn election_types() {
        assert_eq!(
            ElectionType::from_name(" General "),
            Some(ElectionType::General)
        );
        assert_eq!(ElectionType::from_name("mayor"), None);
        assert_eq!(ElectionType::default().threshold(), 120.0);
        assert_eq!(ElectionType::Local.threshold(), 60.0);
    }

    #[test]
    fn cells_divide_by_devices() {
        let (stations, deltas) = sample();
        let mut devices: HashMap<String, AllocationState> = HashMap::new();
        devices.insert("A".to_string(), AllocationState { intra: 2, extra: 1 });
        let cells = congestion_cells(&stations, &deltas, &devices);
        assert_eq!(cells.len(), 8);
        assert_eq!(cells[0].station, "A");
        assert_eq!(cells[0].class, DemandClass::Intra);
        assert_eq!(cells[0].congestion, 30.0);
        assert_eq!(cells[2].congestion, 150.0);
        // B has no entry and uses the baseline.
        assert_eq!(cells[6].station, "B");
        assert_eq!(cells[6].congestion, 90.0);
    }

    #[test]
    fn summary_and_peaks() {
        let (stations, deltas) = sample();
        let mut devices: HashMap<String, AllocationState> = HashMap::new();
        devices.insert("A".to_string(), AllocationState { intra: 2, extra: 1 });
        let cells = congestion_cells(&stations, &deltas, &devices);
        let s = summarize(&cells, DemandClass::Intra, 60.0, HourWindow::new(11, 18));
        // Intra: 30, 150, 50, 90
        assert_eq!(s.peak, 150.0);
        assert_eq!(s.mean, 80.0);
        assert!((s.focus_mean - 290.0 / 3.0).abs() < 1e-9);
        assert_eq!(s.cells_over_threshold, 2);
        assert_eq!(station_peak(&cells, "A", DemandClass::Extra), 40.0);
        assert_eq!(station_peak(&cells, "C", DemandClass::Extra), 0.0);

        let empty = summarize(&[], DemandClass::Extra, 60.0, HourWindow::new(11, 18));
        assert_eq!(empty.peak, 0.0);
        assert_eq!(empty.mean, 0.0);
    }

    #[test]
    fn hourly_average_across_days() {
        let (stations, deltas) = sample();
        let cells = congestion_cells(&stations, &deltas, &HashMap::new());
        let avg = hourly_average(&cells, DemandClass::Intra);
        assert_eq!(
            avg,
            vec![
                HourlyAverage {
                    station: "A".to_string(),
                    hour: 10,
                    congestion: 60.0,
                    days: 1
                },
                HourlyAverage {
                    station: "A".to_string(),
                    hour: 12,
                    congestion: 200.0,
                    days: 2
                },
                HourlyAverage {
                    station: "B".to_string(),
                    hour: 12,
                    congestion: 90.0,
                    days: 1
                },
            ]
        );
    }
}
