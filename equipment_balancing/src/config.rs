// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// A reporting slot: the calendar day of the pre-voting period (starting at 1)
/// and the hour of the report.
///
/// Buckets are ordered by day first, then by hour.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct TimeBucket {
    pub day: u32,
    pub hour: u32,
}

impl TimeBucket {
    pub fn new(day: u32, hour: u32) -> TimeBucket {
        TimeBucket { day, hour }
    }
}

impl Display for TimeBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "day {} {:02}:00", self.day, self.hour)
    }
}

/// The two demand streams served at a pre-voting station.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum DemandClass {
    /// Voters registered at this station (in-precinct).
    Intra,
    /// Voters registered elsewhere (out-of-precinct). They need more
    /// processing per head, see [BalanceRules::extra_weight].
    Extra,
}

impl DemandClass {
    pub const ALL: [DemandClass; 2] = [DemandClass::Intra, DemandClass::Extra];

    pub fn label(&self) -> &'static str {
        match self {
            DemandClass::Intra => "intra",
            DemandClass::Extra => "extra",
        }
    }
}

/// Running totals reported for one station at one time bucket.
///
/// The values are cumulative since the opening of the day. They are expected
/// to be non-decreasing within a day, but regressions are tolerated by the
/// extraction.
#[derive(PartialEq, Debug, Clone)]
pub struct Reading {
    pub station: String,
    pub bucket: TimeBucket,
    pub intra_cumulative: f64,
    pub extra_cumulative: f64,
}

impl Reading {
    pub fn cumulative(&self, class: DemandClass) -> f64 {
        match class {
            DemandClass::Intra => self.intra_cumulative,
            DemandClass::Extra => self.extra_cumulative,
        }
    }
}

/// Per-station percentages that scale the observed turnout before the
/// demand is extracted. All zeros means the turnout is used as observed.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct RateAdjustment {
    /// Expected change of in-precinct turnout, in percent.
    pub intra_pct: f64,
    /// Expected change of out-of-precinct turnout, in percent.
    pub extra_pct: f64,
    /// Growth of the registered electorate since the reference election, in
    /// percent. Only applies to in-precinct turnout.
    pub electorate_pct: f64,
}

impl RateAdjustment {
    pub const NEUTRAL: RateAdjustment = RateAdjustment {
        intra_pct: 0.0,
        extra_pct: 0.0,
        electorate_pct: 0.0,
    };

    /// The same percentage for both streams.
    pub fn uniform(pct: f64) -> RateAdjustment {
        RateAdjustment {
            intra_pct: pct,
            extra_pct: pct,
            electorate_pct: 0.0,
        }
    }

    pub fn intra_factor(&self) -> f64 {
        (1.0 + self.electorate_pct / 100.0) * (1.0 + self.intra_pct / 100.0)
    }

    pub fn extra_factor(&self) -> f64 {
        1.0 + self.extra_pct / 100.0
    }

    pub fn is_neutral(&self) -> bool {
        *self == RateAdjustment::NEUTRAL
    }
}

impl Default for RateAdjustment {
    fn default() -> Self {
        RateAdjustment::NEUTRAL
    }
}

/// Inclusive range of hours that counts as the peak period.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct HourWindow {
    pub start: u32,
    pub end: u32,
}

impl HourWindow {
    pub const fn new(start: u32, end: u32) -> HourWindow {
        HourWindow { start, end }
    }

    pub fn contains(&self, hour: u32) -> bool {
        self.start <= hour && hour <= self.end
    }
}

impl Display for HourWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// The device inventory: everything owned, and the part kept aside.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct EquipmentPool {
    pub total_assets: u32,
    pub reserve: u32,
}

impl EquipmentPool {
    /// Devices that can be deployed. Negative when the reserve exceeds the
    /// inventory.
    pub fn available(&self) -> i64 {
        self.total_assets as i64 - self.reserve as i64
    }
}

// ******** Output data structures *********

/// Demand signal of one station: the voters that arrived during the peak
/// window, summed over all the days.
#[derive(PartialEq, Debug, Clone, Copy, Default)]
pub struct StationDemandProfile {
    pub intra_voters: f64,
    pub extra_voters: f64,
}

impl StationDemandProfile {
    pub const EMPTY: StationDemandProfile = StationDemandProfile {
        intra_voters: 0.0,
        extra_voters: 0.0,
    };

    pub fn voters(&self, class: DemandClass) -> f64 {
        match class {
            DemandClass::Intra => self.intra_voters,
            DemandClass::Extra => self.extra_voters,
        }
    }
}

/// Number of devices assigned to each stream of a station.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct AllocationState {
    pub intra: u32,
    pub extra: u32,
}

impl AllocationState {
    /// Every station starts with one device per stream.
    pub const BASELINE: AllocationState = AllocationState { intra: 1, extra: 1 };

    pub fn devices(&self, class: DemandClass) -> u32 {
        match class {
            DemandClass::Intra => self.intra,
            DemandClass::Extra => self.extra,
        }
    }

    pub fn total(&self) -> u32 {
        self.intra + self.extra
    }

    pub(crate) fn increment(&mut self, class: DemandClass) {
        match class {
            DemandClass::Intra => self.intra += 1,
            DemandClass::Extra => self.extra += 1,
        }
    }
}

/// One device handed out by the allocator.
#[derive(PartialEq, Debug, Clone)]
pub struct AllocationStep {
    pub station: String,
    pub class: DemandClass,
    /// The load of the pair when it was selected.
    pub load_before: f64,
    /// The load of the pair once the device was added.
    pub load_after: f64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct AllocationResult {
    /// The final state of every station, in station order.
    pub allocations: Vec<(String, AllocationState)>,
    pub total_intra: u32,
    pub total_extra: u32,
    pub reserve: u32,
    /// Every device assigned beyond the baseline, in order. Empty unless
    /// [BalanceRules::record_steps] is set.
    pub steps: Vec<AllocationStep>,
}

impl AllocationResult {
    pub fn get(&self, station: &str) -> Option<AllocationState> {
        self.allocations
            .iter()
            .find(|(name, _)| name == station)
            .map(|(_, state)| *state)
    }

    /// Number of devices placed at stations.
    pub fn deployed(&self) -> u32 {
        self.total_intra + self.total_extra
    }
}

/// Errors that prevent the allocation from completing.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum BalancingErrors {
    /// Not enough devices to give one device per stream to every station.
    InfeasibleAllocation {
        stations: usize,
        minimum_required: u64,
        available: i64,
    },
    /// The allocator could not place all the available devices.
    Shortfall { unassigned: u64 },
    InvalidRules(String),
}

impl Error for BalancingErrors {}

impl Display for BalancingErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BalancingErrors::InfeasibleAllocation {
                stations,
                minimum_required,
                available,
            } => write!(
                f,
                "Not enough equipment: {} stations need at least {} devices (1 intra + 1 extra each), {} available",
                stations, minimum_required, available
            ),
            BalancingErrors::Shortfall { unassigned } => write!(
                f,
                "Allocation stopped with {} devices left unassigned",
                unassigned
            ),
            BalancingErrors::InvalidRules(msg) => write!(f, "Invalid balancing rules: {}", msg),
        }
    }
}

// ********* Configuration **********

#[derive(PartialEq, Debug, Clone)]
pub struct BalanceRules {
    /// Multiplier applied to out-of-precinct demand when computing loads.
    /// Values between 1.156 and 1.18 have been used in practice.
    pub extra_weight: f64,
    /// Hours that contribute to the demand signal.
    pub hour_window: HourWindow,
    /// Keeps the trace of every device handed out in
    /// [AllocationResult::steps]. The trace grows with the pool.
    pub record_steps: bool,
}

impl BalanceRules {
    pub const DEFAULT_RULES: BalanceRules = BalanceRules {
        extra_weight: 1.18,
        hour_window: HourWindow::new(11, 18),
        record_steps: false,
    };

    pub fn validate(&self) -> Result<(), BalancingErrors> {
        if !self.extra_weight.is_finite() || self.extra_weight <= 0.0 {
            return Err(BalancingErrors::InvalidRules(format!(
                "extra weight must be a positive number, got {}",
                self.extra_weight
            )));
        }
        if self.hour_window.start > self.hour_window.end {
            return Err(BalancingErrors::InvalidRules(format!(
                "hour window {} is empty",
                self.hour_window
            )));
        }
        Ok(())
    }
}

impl Default for BalanceRules {
    fn default() -> Self {
        BalanceRules::DEFAULT_RULES
    }
}
