use log::{debug, info, warn};

use equipment_balancing::builder::{BalancingOutcome, Builder};
use equipment_balancing::congestion::{self, CongestionCell, CongestionSummary, ElectionType};
use equipment_balancing::requirements::{self, RequirementSettings, StationRequirement};
use equipment_balancing::*;
use snafu::{prelude::*, ErrorCompat, Snafu};

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::balance::config_reader::*;
use crate::balance::io_equipment::EquipmentInventory;

mod config_reader;
mod io_common;
mod io_csv;
mod io_electorate;
mod io_equipment;
mod io_excel;
mod io_turnout;

#[derive(Debug, Snafu)]
pub enum BalanceError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Worksheet {name} not found in {path}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display(
        "{path} has several worksheets, the worksheet name must be provided"
    ))]
    AmbiguousWorksheet { path: String },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Unknown input type {provider:?} for {path}"))]
    UnknownProvider { provider: String, path: String },
    #[snafu(display("Column {column} not found in {path}"))]
    MissingColumn { column: String, path: String },
    #[snafu(display("No turnout data could be read"))]
    NoTurnoutData {},
    #[snafu(display("Balancing failed: {source}"))]
    Balancing { source: BalancingErrors },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type BalanceResult<T> = Result<T, BalanceError>;
pub type BBalanceResult<T> = Result<T, Box<BalanceError>>;

/// A row of a turnout report, as parsed by the readers.
/// Counts that could not be read are NaN.
#[derive(PartialEq, Debug, Clone)]
pub struct ParsedReading {
    pub source: String,
    pub lineno: usize,
    pub station: String,
    pub day: u32,
    pub hour: u32,
    pub intra_cumulative: f64,
    pub extra_cumulative: f64,
}

// ******** Reading the inputs *********

fn resolve_path(root: &Path, cfs: &FileSource) -> String {
    let p: PathBuf = root.join(&cfs.file_path);
    p.as_path().display().to_string()
}

fn read_turnout_files(root: &Path, sources: &[FileSource]) -> BBalanceResult<Vec<ParsedReading>> {
    let mut res: Vec<ParsedReading> = Vec::new();
    for cfs in sources.iter() {
        let path = resolve_path(root, cfs);
        let mut file_data = io_turnout::read_turnout_data(&path, cfs)?;
        res.append(&mut file_data);
    }
    Ok(res)
}

fn read_growth_rates(
    root: &Path,
    files: &Option<ElectorateFiles>,
) -> BBalanceResult<Vec<(String, f64)>> {
    match files {
        Some(ElectorateFiles {
            past: Some(past),
            recent: Some(recent),
        }) => {
            let past_counts = io_electorate::read_electorate(&resolve_path(root, past), past)?;
            let recent_counts =
                io_electorate::read_electorate(&resolve_path(root, recent), recent)?;
            let rates = io_electorate::growth_rates(&past_counts, &recent_counts);
            info!("Electorate growth computed for {} districts", rates.len());
            Ok(rates)
        }
        Some(_) => {
            warn!("Both the past and the recent electorate files are needed, ignoring the electorate");
            Ok(Vec::new())
        }
        None => Ok(Vec::new()),
    }
}

/// The stations in order of first appearance in the reports, followed by the
/// configured stations that did not report.
fn assemble_stations(readings: &[ParsedReading], configured: &[StationConfig]) -> Vec<String> {
    let mut res: Vec<String> = Vec::new();
    let names = readings
        .iter()
        .map(|r| &r.station)
        .chain(configured.iter().map(|s| &s.name));
    for name in names {
        if !res.contains(name) {
            res.push(name.clone());
        }
    }
    res
}

fn station_rates(
    config: &BalanceConfig,
    stations: &[String],
    growth: &[(String, f64)],
) -> Vec<(String, RateAdjustment)> {
    let global = config.rules.global_rate.unwrap_or(0.0);
    stations
        .iter()
        .map(|name| {
            let sc = config.station(name);
            let rate = RateAdjustment {
                intra_pct: sc.and_then(|s| s.rate_intra).unwrap_or(global),
                extra_pct: sc.and_then(|s| s.rate_extra).unwrap_or(global),
                electorate_pct: sc
                    .and_then(|s| s.electorate_rate)
                    .or_else(|| io_electorate::rate_for_station(growth, name))
                    .unwrap_or(0.0),
            };
            (name.clone(), rate)
        })
        .collect()
}

/// The devices in place before the balancing.
fn current_devices(
    stations: &[String],
    inventory: Option<&EquipmentInventory>,
) -> Vec<(String, AllocationState)> {
    stations
        .iter()
        .map(|name| {
            let state = inventory
                .and_then(|inv| inv.devices_for(name))
                .unwrap_or(AllocationState::BASELINE);
            (name.clone(), state)
        })
        .collect()
}

/// The pool to distribute. The values of the configuration come first, then
/// the summary cells of the inventory, then the devices already in place.
fn equipment_pool(
    rules: &RulesConfig,
    inventory: Option<&EquipmentInventory>,
    current: &[(String, AllocationState)],
) -> EquipmentPool {
    let summary = inventory.and_then(|inv| inv.summary);
    let reserve = rules
        .reserve
        .or_else(|| summary.map(|s| s.reserve))
        .unwrap_or(DEFAULT_RESERVE);
    let total_assets = rules
        .total_assets
        .or_else(|| summary.map(|s| s.total_assets))
        .unwrap_or_else(|| current.iter().map(|(_, s)| s.total()).sum::<u32>() + reserve);
    EquipmentPool {
        total_assets,
        reserve,
    }
}

// ******** Summary *********

fn fmt1(x: f64) -> String {
    format!("{:.1}", x)
}

fn devices_js(state: &AllocationState) -> JSValue {
    json!({"intra": state.intra, "extra": state.extra})
}

fn summary_stats_js(s: &CongestionSummary) -> JSValue {
    json!({
        "peak": fmt1(s.peak),
        "mean": fmt1(s.mean),
        "focusMean": fmt1(s.focus_mean),
        "overThreshold": s.cells_over_threshold,
    })
}

fn congestion_js(cells: &[CongestionCell], threshold: f64, window: HourWindow) -> JSValue {
    json!({
        "intra": summary_stats_js(&congestion::summarize(cells, DemandClass::Intra, threshold, window)),
        "extra": summary_stats_js(&congestion::summarize(cells, DemandClass::Extra, threshold, window)),
    })
}

// The congestion of every (station, hour) averaged over the days.
fn hourly_js(cells: &[CongestionCell], class: DemandClass) -> JSValue {
    let rows: Vec<JSValue> = congestion::hourly_average(cells, class)
        .iter()
        .map(|h| {
            json!({
                "station": h.station,
                "hour": h.hour,
                "congestion": fmt1(h.congestion),
                "days": h.days,
            })
        })
        .collect();
    JSValue::Array(rows)
}

fn station_peak_js(cells: &[CongestionCell], station: &str) -> JSValue {
    json!({
        "intra": fmt1(congestion::station_peak(cells, station, DemandClass::Intra)),
        "extra": fmt1(congestion::station_peak(cells, station, DemandClass::Extra)),
    })
}

fn requirements_js(reqs: &[StationRequirement]) -> JSValue {
    let stations: Vec<JSValue> = reqs
        .iter()
        .map(|r| {
            json!({
                "name": r.station,
                "booths": {"intra": r.intra.booths, "extra": r.extra.booths, "total": r.booths()},
                "peak": {"intra": fmt1(r.intra.peak), "extra": fmt1(r.extra.peak)},
                "rolls": {
                    "intra": r.intra.rolls,
                    "extra": r.extra.rolls,
                    "spare": r.spare_rolls,
                    "total": r.rolls()
                },
            })
        })
        .collect();
    json!({
        "stations": stations,
        "totalBooths": reqs.iter().map(|r| r.booths()).sum::<u32>(),
        "totalRolls": reqs.iter().map(|r| r.rolls()).sum::<u32>(),
    })
}

struct RunContext<'a> {
    config: &'a BalanceConfig,
    rules: &'a BalanceRules,
    election_type: ElectionType,
    pool: EquipmentPool,
    readings: usize,
    duplicates: usize,
    rates: &'a [(String, RateAdjustment)],
    current: &'a [(String, AllocationState)],
}

fn build_summary_js(
    ctx: &RunContext,
    outcome: &BalancingOutcome,
    cells_before: &[CongestionCell],
    cells_after: &[CongestionCell],
    reqs: Option<&[StationRequirement]>,
) -> JSValue {
    let threshold = ctx.election_type.threshold();
    let window = ctx.rules.hour_window;
    let rates: HashMap<&str, &RateAdjustment> =
        ctx.rates.iter().map(|(n, r)| (n.as_str(), r)).collect();
    let current: HashMap<&str, &AllocationState> =
        ctx.current.iter().map(|(n, s)| (n.as_str(), s)).collect();

    let stations: Vec<JSValue> = outcome
        .demand
        .iter()
        .map(|(name, profile)| {
            let before = current
                .get(name.as_str())
                .map(|s| **s)
                .unwrap_or(AllocationState::BASELINE);
            let after = outcome
                .allocation
                .get(name)
                .unwrap_or(AllocationState::BASELINE);
            let rate = rates
                .get(name.as_str())
                .map(|r| **r)
                .unwrap_or(RateAdjustment::NEUTRAL);
            json!({
                "name": name,
                "demand": {"intra": fmt1(profile.intra_voters), "extra": fmt1(profile.extra_voters)},
                "rates": {
                    "intra": fmt1(rate.intra_pct),
                    "extra": fmt1(rate.extra_pct),
                    "electorate": fmt1(rate.electorate_pct)
                },
                "before": devices_js(&before),
                "after": devices_js(&after),
                "peakCongestion": {
                    "before": station_peak_js(cells_before, name),
                    "after": station_peak_js(cells_after, name),
                },
            })
        })
        .collect();

    let steps: Vec<JSValue> = outcome
        .allocation
        .steps
        .iter()
        .map(|s| json!({"station": s.station, "class": s.class.label(), "load": fmt1(s.load_before)}))
        .collect();

    let c = ctx.config;
    json!({
        "config": {
            "contest": c.output_settings.contest_name,
            "electionType": ctx.election_type.name(),
            "threshold": fmt1(threshold),
            "extraWeight": format!("{}", ctx.rules.extra_weight),
            "hourWindow": window.to_string(),
            "totalAssets": ctx.pool.total_assets,
            "reserve": ctx.pool.reserve,
        },
        "inputs": {
            "files": c.turnout_file_sources.len(),
            "readings": ctx.readings,
            "duplicates": ctx.duplicates,
            "stations": outcome.demand.len(),
        },
        "results": {
            "stations": stations,
            "totalIntra": outcome.allocation.total_intra,
            "totalExtra": outcome.allocation.total_extra,
            "deployed": outcome.allocation.deployed(),
            "reserve": outcome.allocation.reserve,
            "steps": steps,
        },
        "congestion": {
            "before": congestion_js(cells_before, threshold, window),
            "after": congestion_js(cells_after, threshold, window),
            "hourlyAfter": {
                "intra": hourly_js(cells_after, DemandClass::Intra),
                "extra": hourly_js(cells_after, DemandClass::Extra),
            },
        },
        "requirements": reqs.map(requirements_js),
    })
}

// ******** Running *********

/// Runs the balancing described by a configuration. Relative paths are
/// resolved against `root`.
pub fn balance_config(config: &BalanceConfig, root: &Path) -> BBalanceResult<JSValue> {
    info!("config: {:?}", config);
    let rules = validate_rules(config)?;
    let election_type = validate_election_type(config)?;

    if config.turnout_file_sources.is_empty() {
        return Err(NoTurnoutDataSnafu {}.build().into());
    }
    let parsed = read_turnout_files(root, &config.turnout_file_sources)?;
    if parsed.is_empty() {
        return Err(NoTurnoutDataSnafu {}.build().into());
    }
    info!("Read {} readings", parsed.len());

    let inventory: Option<EquipmentInventory> = match &config.equipment_file {
        Some(cfs) => Some(io_equipment::read_equipment(&resolve_path(root, cfs), cfs)?),
        None => None,
    };
    let growth = read_growth_rates(root, &config.electorate_files)?;

    let stations = assemble_stations(&parsed, &config.stations);
    let rates = station_rates(config, &stations, &growth);
    let current = current_devices(&stations, inventory.as_ref());
    let pool = equipment_pool(&config.rules, inventory.as_ref(), &current);
    info!(
        "Balancing {} stations with {} devices ({} in reserve)",
        stations.len(),
        pool.total_assets,
        pool.reserve
    );

    let mut builder = Builder::new(&rules)
        .and_then(|b| b.stations(&stations))
        .context(BalancingSnafu {})?;
    for (name, rate) in rates.iter() {
        if !rate.is_neutral() {
            debug!("balance_config: rate for {}: {:?}", name, rate);
            builder.set_rate(name, *rate);
        }
    }
    for r in parsed.iter() {
        let added = builder
            .add_reading(&r.station, r.day, r.hour, r.intra_cumulative, r.extra_cumulative)
            .context(BalancingSnafu {})?;
        if !added {
            warn!(
                "{}: line {}: {} already reported for day {} {:02}:00, keeping the first report",
                r.source, r.lineno, r.station, r.day, r.hour
            );
        }
    }

    let outcome = builder.balance(&pool).context(BalancingSnafu {})?;
    let deltas = builder.deltas();
    let before: HashMap<String, AllocationState> = current.iter().cloned().collect();
    let after: HashMap<String, AllocationState> =
        outcome.allocation.allocations.iter().cloned().collect();
    let cells_before = congestion::congestion_cells(&stations, &deltas, &before);
    let cells_after = congestion::congestion_cells(&stations, &deltas, &after);

    let reqs: Option<Vec<StationRequirement>> = match &config.rules.requirements {
        Some(rc) => {
            let settings: RequirementSettings = rc.settings();
            Some(
                requirements::estimate_requirements(&stations, &deltas, &after, &settings)
                    .context(BalancingSnafu {})?,
            )
        }
        None => None,
    };

    let ctx = RunContext {
        config,
        rules: &rules,
        election_type,
        pool,
        readings: parsed.len(),
        duplicates: builder.duplicates(),
        rates: &rates,
        current: &current,
    };
    Ok(build_summary_js(
        &ctx,
        &outcome,
        &cells_before,
        &cells_after,
        reqs.as_deref(),
    ))
}

// Paths given on the command line are relative to the working directory.
fn cli_path(p: &str) -> String {
    std::env::current_dir()
        .map(|d| d.join(p))
        .unwrap_or_else(|_| PathBuf::from(p))
        .display()
        .to_string()
}

/// Applies the command line arguments on top of the configuration.
fn merge_args(mut config: BalanceConfig, args: &Args) -> BalanceConfig {
    if !args.input.is_empty() {
        config.turnout_file_sources = args
            .input
            .iter()
            .map(|p| FileSource::from_path(&cli_path(p), args.input_type.as_deref()))
            .collect();
    }
    if let Some(p) = &args.equipment {
        config.equipment_file = Some(FileSource::from_path(&cli_path(p), None));
    }
    if args.past_electorate.is_some() || args.recent_electorate.is_some() {
        let mut files = config.electorate_files.take().unwrap_or(ElectorateFiles {
            past: None,
            recent: None,
        });
        if let Some(p) = &args.past_electorate {
            files.past = Some(FileSource::from_path(&cli_path(p), None));
        }
        if let Some(p) = &args.recent_electorate {
            files.recent = Some(FileSource::from_path(&cli_path(p), None));
        }
        config.electorate_files = Some(files);
    }
    if let Some(name) = &args.excel_worksheet_name {
        for cfs in config.turnout_file_sources.iter_mut() {
            if cfs.excel_worksheet_name.is_none() {
                cfs.excel_worksheet_name = Some(name.clone());
            }
        }
    }
    if args.total_assets.is_some() {
        config.rules.total_assets = args.total_assets;
    }
    if args.reserve.is_some() {
        config.rules.reserve = args.reserve;
    }
    if args.extra_weight.is_some() {
        config.rules.extra_weight = args.extra_weight;
    }
    if args.window_start.is_some() || args.window_end.is_some() {
        let [start, end] = config.rules.hour_window.unwrap_or([
            BalanceRules::DEFAULT_RULES.hour_window.start,
            BalanceRules::DEFAULT_RULES.hour_window.end,
        ]);
        config.rules.hour_window = Some([
            args.window_start.unwrap_or(start),
            args.window_end.unwrap_or(end),
        ]);
    }
    if args.election_type.is_some() {
        config.output_settings.election_type = args.election_type.clone();
    }
    config
}

fn write_summary(
    config: &BalanceConfig,
    root: &Path,
    out: &Option<String>,
    pretty: &str,
) -> BBalanceResult<()> {
    let target: Option<String> = match out.as_deref() {
        Some("stdout") | Some("") => None,
        Some(p) => Some(p.to_string()),
        None => config.output_settings.output_directory.as_ref().map(|dir| {
            let p: PathBuf = root
                .join(dir)
                .join(format!("{}_summary.json", config.output_settings.contest_name));
            p.display().to_string()
        }),
    };
    match target {
        Some(path) => {
            info!("Writing summary to {}", path);
            fs::write(&path, pretty).context(WritingSummarySnafu { path: path.clone() })?;
        }
        None => {
            println!("{}", pretty);
        }
    }
    Ok(())
}

fn check_reference(summary: &JSValue, reference_path: String) -> BBalanceResult<()> {
    let summary_ref = read_summary(reference_path)?;
    debug!("summary: {:?}", summary_ref);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    let pretty_js_stats =
        serde_json::to_string_pretty(&prune_nulls(summary)).context(ParsingJsonSnafu {})?;
    compare_summaries(&pretty_js_summary_ref, &pretty_js_stats)?;
    Ok(())
}

fn compare_summaries(reference: &str, computed: &str) -> BalanceResult<()> {
    if reference != computed {
        warn!("Found differences with the reference string");
        print_diff(reference, computed, "\n");
        whatever!("Difference detected between calculated summary and reference summary");
    }
    Ok(())
}

pub fn run_balancing(args: &Args) -> BBalanceResult<()> {
    let (config, root): (BalanceConfig, PathBuf) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let root = Path::new(config_path)
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_default();
            (config, root)
        }
        None => (BalanceConfig::empty("pvbalance"), PathBuf::new()),
    };
    let config = merge_args(config, args);

    let summary = balance_config(&config, &root)?;
    let pretty = serde_json::to_string_pretty(&summary).context(ParsingJsonSnafu {})?;
    write_summary(&config, &root, &args.out, &pretty)?;

    if let Some(reference_path) = &args.reference {
        check_reference(&summary, reference_path.clone())?;
    }
    Ok(())
}

fn run_balancing_test(test_name: &str, config_lpath: &str, summary_lpath: &str) {
    let test_dir = option_env!("PVBALANCE_TEST_DIR")
        .unwrap_or(concat!(env!("CARGO_MANIFEST_DIR"), "/testdata"));
    info!("Running test {}", test_name);
    let args = Args {
        config: Some(format!("{}/{}/{}", test_dir, test_name, config_lpath)),
        reference: Some(format!("{}/{}/{}", test_dir, test_name, summary_lpath)),
        out: Some("stdout".to_string()),
        input: Vec::new(),
        input_type: None,
        equipment: None,
        past_electorate: None,
        recent_electorate: None,
        total_assets: None,
        reserve: None,
        extra_weight: None,
        window_start: None,
        window_end: None,
        election_type: None,
        excel_worksheet_name: None,
        verbose: false,
    };
    let res = run_balancing(&args);
    if let Err(e) = res {
        eprintln!("An error occured {}", e);
        if let Some(bt) = ErrorCompat::backtrace(e.as_ref()) {
            eprintln!("trace: {}", bt);
        }
        panic!("test {} failed: {}", test_name, e);
    }
}

pub fn test_wrapper(test_name: &str) {
    run_balancing_test(
        test_name,
        format!("{}_config.json", test_name).as_str(),
        format!("{}_expected_summary.json", test_name).as_str(),
    )
}

#[cfg(test)]
mod tests {

    use super::*;
    use clap::Parser;

    #[test]
    fn three_stations() {
        test_wrapper("three_stations");
    }

    #[test]
    fn official_inventory() {
        test_wrapper("official_inventory");
    }

    #[test]
    fn not_enough_devices() {
        let _ = env_logger::builder().is_test(true).try_init();
        let test_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/testdata");
        let config_path = format!("{}/three_stations/three_stations_config.json", test_dir);
        let config = read_config(&config_path).unwrap();
        let args = Args {
            config: Some(config_path.clone()),
            reference: None,
            out: None,
            input: Vec::new(),
            input_type: None,
            equipment: None,
            past_electorate: None,
            recent_electorate: None,
            total_assets: Some(8),
            reserve: Some(3),
            extra_weight: None,
            window_start: None,
            window_end: None,
            election_type: None,
            excel_worksheet_name: None,
            verbose: false,
        };
        let config = merge_args(config, &args);
        let root = Path::new(&config_path).parent().unwrap();
        let res = balance_config(&config, root);
        match res {
            Err(e) => assert!(matches!(
                *e,
                BalanceError::Balancing {
                    source: BalancingErrors::InfeasibleAllocation {
                        stations: 3,
                        minimum_required: 6,
                        available: 5
                    }
                }
            )),
            Ok(_) => panic!("expected an infeasible allocation"),
        }
    }

    #[test]
    fn stations_keep_report_order() {
        let reading = |station: &str| ParsedReading {
            source: "a.csv".to_string(),
            lineno: 1,
            station: station.to_string(),
            day: 1,
            hour: 7,
            intra_cumulative: 0.0,
            extra_cumulative: 0.0,
        };
        let readings = vec![reading("B"), reading("A"), reading("B")];
        let configured = vec![
            StationConfig {
                name: "C".to_string(),
                rate_intra: None,
                rate_extra: None,
                electorate_rate: None,
            },
            StationConfig {
                name: "A".to_string(),
                rate_intra: Some(10.0),
                rate_extra: None,
                electorate_rate: None,
            },
        ];
        assert_eq!(
            assemble_stations(&readings, &configured),
            vec!["B".to_string(), "A".to_string(), "C".to_string()]
        );
    }

    #[test]
    fn arguments_override_config() {
        let mut config = BalanceConfig::empty("test");
        config.rules.reserve = Some(2);
        config.rules.hour_window = Some([10, 16]);
        let args = Args::parse_from([
            "pvbalance",
            "--window-start",
            "9",
            "--reserve",
            "7",
            "--election-type",
            "local",
        ]);
        let config = merge_args(config, &args);
        assert_eq!(config.rules.hour_window, Some([9, 16]));
        assert_eq!(config.rules.reserve, Some(7));
        assert_eq!(config.rules.total_assets, None);
        assert_eq!(
            validate_election_type(&config).unwrap(),
            ElectionType::Local
        );
        assert!(config.turnout_file_sources.is_empty());
    }

    #[test]
    fn unknown_election_type() {
        let mut config = BalanceConfig::empty("test");
        config.output_settings.election_type = Some("mayor".to_string());
        assert!(validate_election_type(&config).is_err());
    }

    #[test]
    fn pool_defaults() {
        let current = vec![
            ("A".to_string(), AllocationState { intra: 2, extra: 1 }),
            ("B".to_string(), AllocationState::BASELINE),
        ];
        let rules = RulesConfig::default();
        assert_eq!(
            equipment_pool(&rules, None, &current),
            EquipmentPool {
                total_assets: 10,
                reserve: 5
            }
        );
        let inventory = EquipmentInventory {
            stations: Vec::new(),
            summary: Some(EquipmentPool {
                total_assets: 30,
                reserve: 2,
            }),
        };
        assert_eq!(
            equipment_pool(&rules, Some(&inventory), &current),
            EquipmentPool {
                total_assets: 30,
                reserve: 2
            }
        );
        let rules = RulesConfig {
            reserve: Some(4),
            ..RulesConfig::default()
        };
        assert_eq!(
            equipment_pool(&rules, Some(&inventory), &current),
            EquipmentPool {
                total_assets: 30,
                reserve: 4
            }
        );
    }
}
