use log::{debug, warn};
use std::collections::{HashMap, HashSet};

pub use crate::config::*;
use crate::demand;

/// A builder for assembling turnout readings and balancing the equipment.
///
/// ```
/// pub use equipment_balancing::builder::Builder;
/// pub use equipment_balancing::{BalanceRules, EquipmentPool};
/// # use equipment_balancing::BalancingErrors;
///
/// let mut builder = Builder::new(&BalanceRules::DEFAULT_RULES)?
///     .stations(&["North".to_string(), "South".to_string()])?;
///
/// builder.add_reading("North", 1, 11, 10.0, 4.0)?;
/// builder.add_reading("North", 1, 12, 250.0, 30.0)?;
/// builder.add_reading("South", 1, 12, 40.0, 3.0)?;
///
/// let outcome = builder.balance(&EquipmentPool {
///     total_assets: 10,
///     reserve: 2,
/// })?;
/// assert_eq!(outcome.allocation.deployed(), 8);
///
/// # Ok::<(), BalancingErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: BalanceRules,
    pub(crate) _stations: Option<Vec<String>>,
    pub(crate) _readings: Vec<Reading>,
    pub(crate) _rates: HashMap<String, RateAdjustment>,
    _seen: HashSet<(String, TimeBucket)>,
    _duplicates: usize,
}

/// The demand signal and the allocation computed from it.
#[derive(PartialEq, Debug, Clone)]
pub struct BalancingOutcome {
    pub demand: Vec<(String, StationDemandProfile)>,
    pub allocation: AllocationResult,
}

impl Builder {
    pub fn new(rules: &BalanceRules) -> Result<Builder, BalancingErrors> {
        rules.validate()?;
        Ok(Builder {
            _rules: rules.clone(),
            _stations: None,
            _readings: Vec::new(),
            _rates: HashMap::new(),
            _seen: HashSet::new(),
            _duplicates: 0,
        })
    }

    /// Declares the stations, in order. Readings of other stations will be
    /// ignored.
    pub fn stations(self, stations: &[String]) -> Result<Builder, BalancingErrors> {
        let mut unique: Vec<String> = Vec::new();
        for s in stations {
            if unique.contains(s) {
                warn!("Station {} is declared twice", s);
            } else {
                unique.push(s.clone());
            }
        }
        Ok(Builder {
            _rules: self._rules,
            _stations: Some(unique),
            _readings: Vec::new(),
            _rates: self._rates,
            _seen: HashSet::new(),
            _duplicates: 0,
        })
    }

    /// Adds a cumulative reading.
    ///
    /// Returns false when the reading was not kept: either the station is not
    /// declared, or a reading for the same station and bucket was already
    /// added.
    pub fn add_reading(
        &mut self,
        station: &str,
        day: u32,
        hour: u32,
        intra_cumulative: f64,
        extra_cumulative: f64,
    ) -> Result<bool, BalancingErrors> {
        self.add_reading_2(&Reading {
            station: station.to_string(),
            bucket: TimeBucket::new(day, hour),
            intra_cumulative,
            extra_cumulative,
        })
    }

    pub fn add_reading_2(&mut self, reading: &Reading) -> Result<bool, BalancingErrors> {
        if let Some(declared) = self._stations.as_deref() {
            if !declared.contains(&reading.station) {
                debug!(
                    "add_reading: ignoring reading of undeclared station {}",
                    reading.station
                );
                return Ok(false);
            }
        }
        if !self
            ._seen
            .insert((reading.station.clone(), reading.bucket))
        {
            debug!(
                "add_reading: duplicate reading for {} at {}",
                reading.station, reading.bucket
            );
            self._duplicates += 1;
            return Ok(false);
        }
        self._readings.push(reading.clone());
        Ok(true)
    }

    /// Sets the rate adjustment of a station.
    pub fn set_rate(&mut self, station: &str, rate: RateAdjustment) {
        self._rates.insert(station.to_string(), rate);
    }

    /// Number of readings rejected because their bucket was already filled.
    pub fn duplicates(&self) -> usize {
        self._duplicates
    }

    /// The stations, either as declared or in order of first appearance in
    /// the readings.
    pub fn station_names(&self) -> Vec<String> {
        match self._stations.as_ref() {
            Some(declared) => declared.clone(),
            None => {
                let mut res: Vec<String> = Vec::new();
                for r in self._readings.iter() {
                    if !res.contains(&r.station) {
                        res.push(r.station.clone());
                    }
                }
                res
            }
        }
    }

    /// The readings with the rate adjustments applied.
    pub fn adjusted_readings(&self) -> Vec<Reading> {
        demand::apply_rates(&self._readings, &self._rates)
    }

    /// The per-bucket demand of every station, rate adjustments included.
    pub fn deltas(&self) -> HashMap<String, Vec<demand::DemandDelta>> {
        demand::compute_deltas(&self.adjusted_readings())
    }

    /// The demand profile of every station, in station order.
    pub fn demand(&self) -> Vec<(String, StationDemandProfile)> {
        demand::extract_demand(
            &self.station_names(),
            &self.adjusted_readings(),
            self._rules.hour_window,
        )
    }

    /// Extracts the demand and allocates the pool.
    pub fn balance(&self, pool: &EquipmentPool) -> Result<BalancingOutcome, BalancingErrors> {
        let stations = self.station_names();
        let demand = self.demand();
        let demand_map: HashMap<String, StationDemandProfile> = demand.iter().cloned().collect();
        let allocation = crate::allocate(&stations, &demand_map, pool, &self._rules)?;
        Ok(BalancingOutcome { demand, allocation })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_stations_in_order() {
        let mut builder = Builder::new(&BalanceRules::DEFAULT_RULES).unwrap();
        assert!(builder.add_reading("Z", 1, 12, 5.0, 1.0).unwrap());
        assert!(builder.add_reading("A", 1, 12, 5.0, 1.0).unwrap());
        assert!(builder.add_reading("Z", 1, 13, 9.0, 1.0).unwrap());
        assert_eq!(
            builder.station_names(),
            vec!["Z".to_string(), "A".to_string()]
        );
    }

    #[test]
    fn rejects_duplicates_and_unknown_stations() {
        let mut builder = Builder::new(&BalanceRules::DEFAULT_RULES)
            .unwrap()
            .stations(&["A".to_string(), "A".to_string()])
            .unwrap();
        assert_eq!(builder.station_names(), vec!["A".to_string()]);
        assert!(builder.add_reading("A", 1, 12, 5.0, 1.0).unwrap());
        assert!(!builder.add_reading("A", 1, 12, 50.0, 10.0).unwrap());
        assert!(!builder.add_reading("B", 1, 12, 5.0, 1.0).unwrap());
        assert_eq!(builder.duplicates(), 1);
        assert_eq!(builder.demand()[0].1.intra_voters, 5.0);
    }

    #[test]
    fn rates_flow_into_demand() {
        let mut builder = Builder::new(&BalanceRules::DEFAULT_RULES).unwrap();
        builder.add_reading("A", 1, 11, 100.0, 100.0).unwrap();
        builder.add_reading("A", 1, 12, 300.0, 200.0).unwrap();
        builder.set_rate("A", RateAdjustment::uniform(50.0));
        let demand = builder.demand();
        assert!((demand[0].1.intra_voters - 450.0).abs() < 1e-9);
        assert!((demand[0].1.extra_voters - 300.0).abs() < 1e-9);
        let deltas = builder.deltas();
        assert!((deltas["A"][1].intra - 300.0).abs() < 1e-9);
    }

    #[test]
    fn balance_reports_errors() {
        let mut builder = Builder::new(&BalanceRules::DEFAULT_RULES).unwrap();
        builder.add_reading("A", 1, 12, 100.0, 10.0).unwrap();
        builder.add_reading("B", 1, 12, 10.0, 100.0).unwrap();
        let res = builder.balance(&EquipmentPool {
            total_assets: 3,
            reserve: 0,
        });
        assert!(matches!(
            res,
            Err(BalancingErrors::InfeasibleAllocation { .. })
        ));
        let outcome = builder
            .balance(&EquipmentPool {
                total_assets: 6,
                reserve: 0,
            })
            .unwrap();
        // A intra 100 vs B extra 118: B wins, then A intra 100 beats 59.
        assert_eq!(
            outcome.allocation.get("A"),
            Some(AllocationState { intra: 2, extra: 1 })
        );
        assert_eq!(
            outcome.allocation.get("B"),
            Some(AllocationState { intra: 1, extra: 2 })
        );
    }
}
