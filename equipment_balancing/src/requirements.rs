//! Estimation of the consumables a station needs: voting booths and paper
//! rolls for the ballot printers.

use log::debug;
use std::collections::HashMap;

use crate::config::*;
use crate::demand::DemandDelta;

#[derive(PartialEq, Debug, Clone, Copy)]
pub struct RequirementSettings {
    /// Seconds a voter spends in a booth.
    pub booth_seconds_intra: f64,
    pub booth_seconds_extra: f64,
    /// Voters that one paper roll can serve.
    pub roll_capacity_intra: f64,
    pub roll_capacity_extra: f64,
}

impl RequirementSettings {
    pub const DEFAULT_SETTINGS: RequirementSettings = RequirementSettings {
        booth_seconds_intra: 90.0,
        booth_seconds_extra: 100.0,
        roll_capacity_intra: 535.0,
        roll_capacity_extra: 500.0,
    };

    pub fn validate(&self) -> Result<(), BalancingErrors> {
        let fields = [
            ("booth seconds (intra)", self.booth_seconds_intra),
            ("booth seconds (extra)", self.booth_seconds_extra),
            ("roll capacity (intra)", self.roll_capacity_intra),
            ("roll capacity (extra)", self.roll_capacity_extra),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(BalancingErrors::InvalidRules(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    fn booth_seconds(&self, class: DemandClass) -> f64 {
        match class {
            DemandClass::Intra => self.booth_seconds_intra,
            DemandClass::Extra => self.booth_seconds_extra,
        }
    }

    fn roll_capacity(&self, class: DemandClass) -> f64 {
        match class {
            DemandClass::Intra => self.roll_capacity_intra,
            DemandClass::Extra => self.roll_capacity_extra,
        }
    }
}

impl Default for RequirementSettings {
    fn default() -> Self {
        RequirementSettings::DEFAULT_SETTINGS
    }
}

/// Booths and rolls needed by one stream of a station.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct StreamRequirement {
    /// Mean of the three busiest hours.
    pub peak: f64,
    pub booths: u32,
    /// All the voters over the period.
    pub voters: f64,
    pub devices: u32,
    pub rolls: u32,
}

#[derive(PartialEq, Debug, Clone)]
pub struct StationRequirement {
    pub station: String,
    pub intra: StreamRequirement,
    pub extra: StreamRequirement,
    pub spare_rolls: u32,
}

impl StationRequirement {
    pub fn booths(&self) -> u32 {
        self.intra.booths + self.extra.booths
    }

    /// Rolls for the devices plus the spare ones.
    pub fn rolls(&self) -> u32 {
        self.intra.rolls + self.extra.rolls + self.spare_rolls
    }
}

/// Average of the three largest values. The sum is always divided by three,
/// even with fewer values.
pub fn peak_rate(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));
    sorted.iter().take(3).sum::<f64>() / 3.0
}

/// At least two booths per stream.
pub fn booths_needed(peak: f64, seconds_per_voter: f64) -> u32 {
    let booths = (peak * seconds_per_voter / 3600.0).ceil();
    (booths as u32).max(2)
}

/// Every device gets the same number of rolls, at least one.
pub fn rolls_needed(voters: f64, devices: u32, capacity: f64) -> u32 {
    if devices == 0 {
        return 0;
    }
    let per_device = voters / devices as f64;
    let rolls = (per_device / capacity).ceil() as u32;
    rolls.max(1) * devices
}

/// Spare rolls kept at a station, depending on its size.
pub fn spare_rolls(devices: u32) -> u32 {
    if devices >= 10 {
        2
    } else {
        1
    }
}

fn stream_requirement(
    deltas: &[DemandDelta],
    class: DemandClass,
    devices: u32,
    settings: &RequirementSettings,
) -> StreamRequirement {
    let values: Vec<f64> = deltas.iter().map(|d| d.voters(class)).collect();
    let peak = peak_rate(&values);
    let voters: f64 = values.iter().sum();
    StreamRequirement {
        peak,
        booths: booths_needed(peak, settings.booth_seconds(class)),
        voters,
        devices,
        rolls: rolls_needed(voters, devices, settings.roll_capacity(class)),
    }
}

/// Estimates the booths and rolls of every station, in station order.
///
/// The deltas of all the reporting hours are used, not only the peak window.
/// Stations without an entry in `devices` are counted with the baseline.
pub fn estimate_requirements(
    stations: &[String],
    deltas: &HashMap<String, Vec<DemandDelta>>,
    devices: &HashMap<String, AllocationState>,
    settings: &RequirementSettings,
) -> Result<Vec<StationRequirement>, BalancingErrors> {
    settings.validate()?;
    let mut res: Vec<StationRequirement> = Vec::with_capacity(stations.len());
    for station in stations.iter() {
        let state = devices
            .get(station)
            .cloned()
            .unwrap_or(AllocationState::BASELINE);
        let station_deltas: &[DemandDelta] = deltas.get(station).map(|v| v.as_slice()).unwrap_or(&[]);
        let req = StationRequirement {
            station: station.clone(),
            intra: stream_requirement(station_deltas, DemandClass::Intra, state.intra, settings),
            extra: stream_requirement(station_deltas, DemandClass::Extra, state.extra, settings),
            spare_rolls: spare_rolls(state.total()),
        };
        debug!(
            "estimate_requirements: {}: {} booths, {} rolls",
            station,
            req.booths(),
            req.rolls()
        );
        res.push(req);
    }
    Ok(res)
}
