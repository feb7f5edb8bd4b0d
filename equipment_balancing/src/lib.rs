mod config;
use log::{debug, info};

use std::collections::HashMap;

pub use crate::config::*;

pub mod builder;
pub mod congestion;
pub mod demand;
pub mod manual;
pub mod requirements;

// **** Private structures ****

// A candidate pair for the next device.
#[derive(PartialEq, Debug, Clone, Copy)]
struct Selection {
    index: usize,
    class: DemandClass,
    load: f64,
}

// Load of one stream of a station: the demand each device has to absorb.
fn pair_load(
    profile: &StationDemandProfile,
    state: &AllocationState,
    class: DemandClass,
    extra_weight: f64,
) -> f64 {
    let devices = state.devices(class) as f64;
    match class {
        DemandClass::Intra => profile.intra_voters / devices,
        DemandClass::Extra => profile.extra_voters * extra_weight / devices,
    }
}

// Scans all the (station, class) pairs in station order, intra before extra,
// and returns the one with the highest load. The first pair wins the ties.
fn select_pair(
    profiles: &[StationDemandProfile],
    states: &[AllocationState],
    extra_weight: f64,
) -> Option<Selection> {
    let mut max_load = -1.0;
    let mut best: Option<Selection> = None;
    for (index, (profile, state)) in profiles.iter().zip(states.iter()).enumerate() {
        for class in DemandClass::ALL {
            let load = pair_load(profile, state, class, extra_weight);
            if load > max_load {
                max_load = load;
                best = Some(Selection { index, class, load });
            }
        }
    }
    best
}

/// Distributes the deployable devices of the pool among the stations.
///
/// Every station first receives one device per stream. The remaining devices
/// are then handed out one at a time to the (station, stream) pair with the
/// highest load, where the load is the peak demand divided by the devices
/// already assigned to that pair. Out-of-precinct demand is multiplied by
/// [BalanceRules::extra_weight].
///
/// Arguments:
/// * `stations` the stations to equip. Their order decides the ties.
/// * `demand` the demand profile of each station. Stations without a profile
/// have zero demand: they keep the baseline unless nothing else is loaded.
/// * `pool` the device inventory.
/// * `rules` the balancing rules.
///
/// Either all the deployable devices are placed, or an error is returned.
pub fn allocate(
    stations: &[String],
    demand: &HashMap<String, StationDemandProfile>,
    pool: &EquipmentPool,
    rules: &BalanceRules,
) -> Result<AllocationResult, BalancingErrors> {
    rules.validate()?;
    info!(
        "Allocating {} devices ({} in reserve) to {} stations, rules: {:?}",
        pool.total_assets,
        pool.reserve,
        stations.len(),
        rules
    );

    let available = pool.available();
    let minimum_required = 2 * stations.len() as u64;
    if available < minimum_required as i64 {
        return Err(BalancingErrors::InfeasibleAllocation {
            stations: stations.len(),
            minimum_required,
            available,
        });
    }

    let profiles: Vec<StationDemandProfile> = stations
        .iter()
        .map(|s| demand.get(s).cloned().unwrap_or_default())
        .collect();
    let mut states: Vec<AllocationState> = vec![AllocationState::BASELINE; stations.len()];
    let mut remaining: u64 = available as u64 - minimum_required;
    let mut steps: Vec<AllocationStep> = Vec::new();
    let mut step: u64 = 0;
    debug!(
        "allocate: baseline placed, {} devices left to distribute",
        remaining
    );

    while remaining > 0 {
        let sel = match select_pair(&profiles, &states, rules.extra_weight) {
            Some(sel) => sel,
            None => {
                return Err(BalancingErrors::Shortfall {
                    unassigned: remaining,
                })
            }
        };
        let state = &mut states[sel.index];
        state.increment(sel.class);
        let load_after = pair_load(&profiles[sel.index], state, sel.class, rules.extra_weight);
        step += 1;
        debug!(
            "allocate: step {}: {} {} load {:.3} -> {:.3} ({} devices)",
            step,
            stations[sel.index],
            sel.class.label(),
            sel.load,
            load_after,
            state.devices(sel.class)
        );
        if rules.record_steps {
            steps.push(AllocationStep {
                station: stations[sel.index].clone(),
                class: sel.class,
                load_before: sel.load,
                load_after,
            });
        }
        remaining -= 1;
    }

    let total_intra: u32 = states.iter().map(|s| s.intra).sum();
    let total_extra: u32 = states.iter().map(|s| s.extra).sum();
    info!(
        "Allocation done: {} intra, {} extra, {} in reserve",
        total_intra, total_extra, pool.reserve
    );
    Ok(AllocationResult {
        allocations: stations.iter().cloned().zip(states.into_iter()).collect(),
        total_intra,
        total_extra,
        reserve: pool.reserve,
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(intra: f64, extra: f64) -> StationDemandProfile {
        StationDemandProfile {
            intra_voters: intra,
            extra_voters: extra,
        }
    }

    fn traced() -> BalanceRules {
        BalanceRules {
            record_steps: true,
            ..BalanceRules::DEFAULT_RULES
        }
    }

    fn scenario() -> (Vec<String>, HashMap<String, StationDemandProfile>) {
        let stations: Vec<String> = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let demand: HashMap<String, StationDemandProfile> = vec![
            ("A".to_string(), profile(400.0, 100.0)),
            ("B".to_string(), profile(100.0, 300.0)),
            ("C".to_string(), profile(50.0, 50.0)),
        ]
        .into_iter()
        .collect();
        (stations, demand)
    }

    #[test]
    fn three_station_scenario() {
        let _ = env_logger::builder().is_test(true).try_init();
        let (stations, demand) = scenario();
        let pool = EquipmentPool {
            total_assets: 15,
            reserve: 5,
        };
        let res = allocate(&stations, &demand, &pool, &traced()).unwrap();

        // Step 1: A intra 400. Step 2: B extra 354. Step 3: A intra 200
        // beats B extra 177.
        let picked: Vec<(&str, DemandClass)> = res
            .steps
            .iter()
            .map(|s| (s.station.as_str(), s.class))
            .collect();
        assert_eq!(
            picked,
            vec![
                ("A", DemandClass::Intra),
                ("B", DemandClass::Extra),
                ("A", DemandClass::Intra),
                ("B", DemandClass::Extra)
            ]
        );
        assert!((res.steps[1].load_before - 354.0).abs() < 1e-9);
        assert_eq!(res.get("A"), Some(AllocationState { intra: 3, extra: 1 }));
        assert_eq!(res.get("B"), Some(AllocationState { intra: 1, extra: 3 }));
        assert_eq!(res.get("C"), Some(AllocationState::BASELINE));
        assert_eq!(res.total_intra, 5);
        assert_eq!(res.total_extra, 5);
        assert_eq!(res.reserve, 5);
        assert_eq!(res.deployed(), 10);
    }

    #[test]
    fn ties_between_stations_go_to_the_first_pair() {
        let stations: Vec<String> = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let demand: HashMap<String, StationDemandProfile> = vec![
            ("A".to_string(), profile(100.0, 10.0)),
            ("B".to_string(), profile(10.0, 100.0)),
            ("C".to_string(), profile(0.0, 0.0)),
        ]
        .into_iter()
        .collect();
        let pool = EquipmentPool {
            total_assets: 10,
            reserve: 0,
        };
        let rules = BalanceRules {
            extra_weight: 1.0,
            ..traced()
        };
        let res = allocate(&stations, &demand, &pool, &rules).unwrap();

        // A intra and B extra are tied at 100, then at 50.
        let picked: Vec<(&str, DemandClass, f64)> = res
            .steps
            .iter()
            .map(|s| (s.station.as_str(), s.class, s.load_before))
            .collect();
        assert_eq!(
            picked,
            vec![
                ("A", DemandClass::Intra, 100.0),
                ("B", DemandClass::Extra, 100.0),
                ("A", DemandClass::Intra, 50.0),
                ("B", DemandClass::Extra, 50.0)
            ]
        );
        assert_eq!(res.get("A"), Some(AllocationState { intra: 3, extra: 1 }));
        assert_eq!(res.get("B"), Some(AllocationState { intra: 1, extra: 3 }));
        assert_eq!(res.get("C"), Some(AllocationState::BASELINE));
    }

    #[test]
    fn large_pool_without_trace() {
        let stations: Vec<String> = vec!["A".to_string()];
        let demand: HashMap<String, StationDemandProfile> =
            vec![("A".to_string(), profile(100.0, 10.0))]
                .into_iter()
                .collect();
        let pool = EquipmentPool {
            total_assets: 2_000_000,
            reserve: 0,
        };
        let res = allocate(&stations, &demand, &pool, &BalanceRules::DEFAULT_RULES).unwrap();
        assert!(res.steps.is_empty());
        assert_eq!(res.deployed(), 2_000_000);
        let a = res.get("A").unwrap();
        // Loads stay balanced: intra / extra devices follow 100 / 11.8.
        assert!(a.intra > 8 * a.extra && a.intra < 9 * a.extra);
    }

    #[test]
    fn devices_are_conserved_and_baseline_is_kept() {
        let (stations, demand) = scenario();
        for total in 6..40 {
            let pool = EquipmentPool {
                total_assets: total,
                reserve: 0,
            };
            let res = allocate(&stations, &demand, &pool, &traced()).unwrap();
            assert_eq!(res.deployed(), total);
            for (_, state) in res.allocations.iter() {
                assert!(state.intra >= 1 && state.extra >= 1);
            }
            assert_eq!(res.steps.len() as u32, total - 6);
        }
    }

    #[test]
    fn selected_load_decreases() {
        let (stations, demand) = scenario();
        let pool = EquipmentPool {
            total_assets: 30,
            reserve: 2,
        };
        let res = allocate(&stations, &demand, &pool, &traced()).unwrap();
        assert_eq!(res.steps.len(), 22);
        for step in res.steps.iter() {
            assert!(step.load_after <= step.load_before);
        }
    }

    #[test]
    fn infeasible_pool_is_rejected() {
        let (stations, demand) = scenario();
        let pool = EquipmentPool {
            total_assets: 8,
            reserve: 3,
        };
        let res = allocate(&stations, &demand, &pool, &BalanceRules::DEFAULT_RULES);
        assert_eq!(
            res,
            Err(BalancingErrors::InfeasibleAllocation {
                stations: 3,
                minimum_required: 6,
                available: 5
            })
        );

        // The reserve may exceed the inventory.
        let pool = EquipmentPool {
            total_assets: 2,
            reserve: 5,
        };
        let res = allocate(&stations, &demand, &pool, &BalanceRules::DEFAULT_RULES);
        assert!(matches!(
            res,
            Err(BalancingErrors::InfeasibleAllocation { available: -3, .. })
        ));
    }

    #[test]
    fn no_station_with_spare_devices_is_a_shortfall() {
        let pool = EquipmentPool {
            total_assets: 4,
            reserve: 1,
        };
        let res = allocate(&[], &HashMap::new(), &pool, &BalanceRules::DEFAULT_RULES);
        assert_eq!(res, Err(BalancingErrors::Shortfall { unassigned: 3 }));

        let pool = EquipmentPool {
            total_assets: 1,
            reserve: 1,
        };
        let res = allocate(&[], &HashMap::new(), &pool, &BalanceRules::DEFAULT_RULES).unwrap();
        assert!(res.allocations.is_empty());
        assert_eq!(res.deployed(), 0);
    }

    #[test]
    fn zero_demand_goes_to_first_pair() {
        let stations: Vec<String> = vec!["X".to_string(), "Y".to_string()];
        let pool = EquipmentPool {
            total_assets: 6,
            reserve: 0,
        };
        // No profile at all: every load is zero, the first pair takes all.
        let res = allocate(&stations, &HashMap::new(), &pool, &BalanceRules::DEFAULT_RULES).unwrap();
        assert_eq!(res.get("X"), Some(AllocationState { intra: 3, extra: 1 }));
        assert_eq!(res.get("Y"), Some(AllocationState::BASELINE));
    }

    #[test]
    fn station_without_demand_keeps_baseline() {
        let stations: Vec<String> = vec!["Empty".to_string(), "Busy".to_string()];
        let demand: HashMap<String, StationDemandProfile> =
            vec![("Busy".to_string(), profile(120.0, 100.0))]
                .into_iter()
                .collect();
        let pool = EquipmentPool {
            total_assets: 8,
            reserve: 0,
        };
        let res = allocate(&stations, &demand, &pool, &BalanceRules::DEFAULT_RULES).unwrap();
        assert_eq!(res.get("Empty"), Some(AllocationState::BASELINE));
        assert_eq!(res.get("Busy"), Some(AllocationState { intra: 3, extra: 3 }));
    }

    #[test]
    fn invalid_weight_is_rejected() {
        let (stations, demand) = scenario();
        let pool = EquipmentPool {
            total_assets: 10,
            reserve: 0,
        };
        let rules = BalanceRules {
            extra_weight: 0.0,
            ..BalanceRules::DEFAULT_RULES
        };
        assert!(matches!(
            allocate(&stations, &demand, &pool, &rules),
            Err(BalancingErrors::InvalidRules(_))
        ));
    }
}
