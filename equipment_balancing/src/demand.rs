//! Conversion of cumulative turnout reports into per-bucket demand.
//!
//! The turnout reports give, for every station and every reporting hour, the
//! number of voters processed since the opening of the day. The demand of a
//! bucket is the increase since the previous report of the same day.

use log::{debug, warn};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::config::*;

/// Voters that arrived during one time bucket at one station.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct DemandDelta {
    pub bucket: TimeBucket,
    pub intra: f64,
    pub extra: f64,
}

impl DemandDelta {
    pub fn voters(&self, class: DemandClass) -> f64 {
        match class {
            DemandClass::Intra => self.intra,
            DemandClass::Extra => self.extra,
        }
    }
}

// A cumulative count that can take part in the computations.
fn is_usable(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// Keeps the first reading for every (station, bucket) pair.
///
/// Returns the retained readings, in input order, and the number of readings
/// that were dropped.
pub fn dedup_readings(readings: &[Reading]) -> (Vec<Reading>, usize) {
    let mut seen: HashSet<(&str, TimeBucket)> = HashSet::new();
    let mut res: Vec<Reading> = Vec::with_capacity(readings.len());
    let mut dropped = 0;
    for r in readings.iter() {
        if seen.insert((r.station.as_str(), r.bucket)) {
            res.push(r.clone());
        } else {
            debug!(
                "dedup_readings: dropping duplicate reading for {} at {}",
                r.station, r.bucket
            );
            dropped += 1;
        }
    }
    (res, dropped)
}

/// Scales the cumulative counts of every station with its rate adjustment.
/// Stations without an adjustment are left untouched.
pub fn apply_rates(readings: &[Reading], rates: &HashMap<String, RateAdjustment>) -> Vec<Reading> {
    readings
        .iter()
        .map(|r| match rates.get(&r.station) {
            Some(rate) if !rate.is_neutral() => Reading {
                station: r.station.clone(),
                bucket: r.bucket,
                intra_cumulative: r.intra_cumulative * rate.intra_factor(),
                extra_cumulative: r.extra_cumulative * rate.extra_factor(),
            },
            _ => r.clone(),
        })
        .collect()
}

// Readings grouped by station, ordered by bucket. Only the first reading of a
// given bucket is kept.
fn group_by_station(readings: &[Reading]) -> HashMap<&str, BTreeMap<TimeBucket, &Reading>> {
    let mut res: HashMap<&str, BTreeMap<TimeBucket, &Reading>> = HashMap::new();
    for r in readings.iter() {
        let buckets = res.entry(r.station.as_str()).or_default();
        if buckets.contains_key(&r.bucket) {
            warn!(
                "Station {}: several readings for {}, keeping the first one",
                r.station, r.bucket
            );
        } else {
            buckets.insert(r.bucket, r);
        }
    }
    res
}

/// Computes the demand of every bucket, for every station found in the
/// readings. The deltas of a station are sorted by bucket.
///
/// Within a day, the delta is the increase of the cumulative count since the
/// previous report (the first report of a day is compared to zero). A count
/// that goes down produces a zero delta, and the lower value becomes the new
/// reference. Missing buckets are not interpolated: the next report absorbs
/// the voters of the gap. A reading with a negative or non-finite count is
/// skipped as a whole and leaves both references unchanged.
pub fn compute_deltas(readings: &[Reading]) -> HashMap<String, Vec<DemandDelta>> {
    group_by_station(readings)
        .iter()
        .map(|(station, buckets)| (station.to_string(), station_deltas(station, buckets)))
        .collect()
}

fn station_deltas(station: &str, buckets: &BTreeMap<TimeBucket, &Reading>) -> Vec<DemandDelta> {
    let mut res: Vec<DemandDelta> = Vec::with_capacity(buckets.len());
    let mut current_day: Option<u32> = None;
    let mut prev_intra = 0.0;
    let mut prev_extra = 0.0;
    for (bucket, reading) in buckets.iter() {
        // The counters restart every morning.
        if current_day != Some(bucket.day) {
            current_day = Some(bucket.day);
            prev_intra = 0.0;
            prev_extra = 0.0;
        }
        let cum_intra = reading.cumulative(DemandClass::Intra);
        let cum_extra = reading.cumulative(DemandClass::Extra);
        if !is_usable(cum_intra) || !is_usable(cum_extra) {
            warn!(
                "Station {}: skipping malformed reading at {} (intra {:?}, extra {:?})",
                station, bucket, cum_intra, cum_extra
            );
            continue;
        }
        let intra = step_delta(
            station,
            *bucket,
            DemandClass::Intra,
            cum_intra,
            &mut prev_intra,
        );
        let extra = step_delta(
            station,
            *bucket,
            DemandClass::Extra,
            cum_extra,
            &mut prev_extra,
        );
        res.push(DemandDelta {
            bucket: *bucket,
            intra,
            extra,
        });
    }
    res
}

// Both values of the reading are usable.
fn step_delta(
    station: &str,
    bucket: TimeBucket,
    class: DemandClass,
    cumulative: f64,
    prev: &mut f64,
) -> f64 {
    if cumulative < *prev {
        debug!(
            "step_delta: {} {} count went down at {}: {} -> {}",
            station,
            class.label(),
            bucket,
            prev,
            cumulative
        );
    }
    let delta = (cumulative - *prev).max(0.0);
    *prev = cumulative;
    delta
}

/// Sums the deltas that fall inside the hour window, for each of the given
/// stations. Stations without any delta get an empty profile.
pub fn profiles_from_deltas(
    stations: &[String],
    deltas: &HashMap<String, Vec<DemandDelta>>,
    window: HourWindow,
) -> Vec<(String, StationDemandProfile)> {
    stations
        .iter()
        .map(|station| {
            let mut profile = StationDemandProfile::EMPTY;
            if let Some(station_deltas) = deltas.get(station) {
                for d in station_deltas
                    .iter()
                    .filter(|d| window.contains(d.bucket.hour))
                {
                    profile.intra_voters += d.intra;
                    profile.extra_voters += d.extra;
                }
            } else {
                debug!("profiles_from_deltas: no readings for {}", station);
            }
            (station.clone(), profile)
        })
        .collect()
}

/// Computes the demand profile of every station from the cumulative
/// readings.
///
/// Arguments:
/// * `stations` the known stations. Every one of them is present in the
/// output, in the same order, even without readings.
/// * `readings` the cumulative reports. Readings of unknown stations are
/// ignored.
/// * `window` the hours that contribute to the profile.
pub fn extract_demand(
    stations: &[String],
    readings: &[Reading],
    window: HourWindow,
) -> Vec<(String, StationDemandProfile)> {
    let deltas = compute_deltas(readings);
    profiles_from_deltas(stations, &deltas, window)
}
