use crate::balance::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "contestName")]
    pub contest_name: String,
    #[serde(rename = "electionType")]
    pub election_type: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    /// csv or xlsx. Empty to use the extension of the file.
    #[serde(default)]
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    // Turnout reports only. Override the markers found in the file.
    pub day: Option<u32>,
    pub hour: Option<u32>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    #[serde(rename = "stationColumn")]
    pub station_column: Option<String>,
    #[serde(rename = "intraColumn")]
    pub intra_column: Option<String>,
    #[serde(rename = "extraColumn")]
    pub extra_column: Option<String>,
}

impl FileSource {
    pub fn from_path(path: &str, provider: Option<&str>) -> FileSource {
        FileSource {
            provider: provider.unwrap_or_default().to_string(),
            file_path: path.to_string(),
            day: None,
            hour: None,
            excel_worksheet_name: None,
            station_column: None,
            intra_column: None,
            extra_column: None,
        }
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ElectorateFiles {
    pub past: Option<FileSource>,
    pub recent: Option<FileSource>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct StationConfig {
    pub name: String,
    #[serde(rename = "rateIntra")]
    pub rate_intra: Option<f64>,
    #[serde(rename = "rateExtra")]
    pub rate_extra: Option<f64>,
    #[serde(rename = "electorateRate")]
    pub electorate_rate: Option<f64>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct RequirementConfig {
    #[serde(rename = "boothSecondsIntra")]
    pub booth_seconds_intra: Option<f64>,
    #[serde(rename = "boothSecondsExtra")]
    pub booth_seconds_extra: Option<f64>,
    #[serde(rename = "rollCapacityIntra")]
    pub roll_capacity_intra: Option<f64>,
    #[serde(rename = "rollCapacityExtra")]
    pub roll_capacity_extra: Option<f64>,
}

impl RequirementConfig {
    pub fn settings(&self) -> RequirementSettings {
        let d = RequirementSettings::DEFAULT_SETTINGS;
        RequirementSettings {
            booth_seconds_intra: self.booth_seconds_intra.unwrap_or(d.booth_seconds_intra),
            booth_seconds_extra: self.booth_seconds_extra.unwrap_or(d.booth_seconds_extra),
            roll_capacity_intra: self.roll_capacity_intra.unwrap_or(d.roll_capacity_intra),
            roll_capacity_extra: self.roll_capacity_extra.unwrap_or(d.roll_capacity_extra),
        }
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct RulesConfig {
    #[serde(rename = "totalAssets")]
    pub total_assets: Option<u32>,
    pub reserve: Option<u32>,
    #[serde(rename = "extraWeight")]
    pub extra_weight: Option<f64>,
    #[serde(rename = "hourWindow")]
    pub hour_window: Option<[u32; 2]>,
    #[serde(rename = "globalRate")]
    pub global_rate: Option<f64>,
    pub requirements: Option<RequirementConfig>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct BalanceConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "turnoutFileSources", default)]
    pub turnout_file_sources: Vec<FileSource>,
    #[serde(rename = "equipmentFile")]
    pub equipment_file: Option<FileSource>,
    #[serde(rename = "electorateFiles")]
    pub electorate_files: Option<ElectorateFiles>,
    #[serde(default)]
    pub stations: Vec<StationConfig>,
    #[serde(default)]
    pub rules: RulesConfig,
}

impl BalanceConfig {
    /// The configuration used when only command line arguments are given.
    pub fn empty(contest_name: &str) -> BalanceConfig {
        BalanceConfig {
            output_settings: OutputSettings {
                contest_name: contest_name.to_string(),
                election_type: None,
                output_directory: None,
            },
            turnout_file_sources: Vec::new(),
            equipment_file: None,
            electorate_files: None,
            stations: Vec::new(),
            rules: RulesConfig::default(),
        }
    }

    pub fn station(&self, name: &str) -> Option<&StationConfig> {
        self.stations.iter().find(|s| s.name == name)
    }
}

pub const DEFAULT_RESERVE: u32 = 5;

pub fn read_config(path: &str) -> BBalanceResult<BalanceConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: BalanceConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(config)
}

pub fn validate_rules(config: &BalanceConfig) -> BBalanceResult<BalanceRules> {
    let defaults = BalanceRules::DEFAULT_RULES;
    let rules = BalanceRules {
        extra_weight: config.rules.extra_weight.unwrap_or(defaults.extra_weight),
        hour_window: match config.rules.hour_window {
            Some([start, end]) => HourWindow::new(start, end),
            None => defaults.hour_window,
        },
        // The summary lists the steps.
        record_steps: true,
    };
    rules.validate().context(BalancingSnafu {})?;
    Ok(rules)
}

pub fn validate_election_type(config: &BalanceConfig) -> BalanceResult<ElectionType> {
    match config.output_settings.election_type.as_deref() {
        None => Ok(ElectionType::default()),
        Some(name) => match ElectionType::from_name(name) {
            Some(et) => Ok(et),
            None => whatever!(
                "Unknown election type {:?}: expected president, general or local",
                name
            ),
        },
    }
}

/// Reads a reference summary.
///
/// The null entries are dropped, so that a reference may leave out the
/// optional sections.
pub fn read_summary(path: String) -> BBalanceResult<JSValue> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(prune_nulls(&js))
}

pub fn prune_nulls(js: &JSValue) -> JSValue {
    match js {
        JSValue::Object(obj) => JSValue::Object(
            obj.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), prune_nulls(v)))
                .collect(),
        ),
        JSValue::Array(arr) => JSValue::Array(arr.iter().map(prune_nulls).collect()),
        x => x.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config() {
        let js = r#"{
            "outputSettings": { "contestName": "test" },
            "turnoutFileSources": [ { "provider": "csv", "filePath": "a.csv", "day": 1 } ]
        }"#;
        let config: BalanceConfig = serde_json::from_str(js).unwrap();
        assert_eq!(config.turnout_file_sources[0].day, Some(1));
        assert_eq!(config.turnout_file_sources[0].hour, None);
        assert!(config.stations.is_empty());
        assert_eq!(
            validate_rules(&config).unwrap(),
            BalanceRules {
                record_steps: true,
                ..BalanceRules::DEFAULT_RULES
            }
        );
        assert_eq!(
            validate_election_type(&config).unwrap(),
            ElectionType::Presidential
        );
    }

    #[test]
    fn rules_are_checked() {
        let js = r#"{
            "outputSettings": { "contestName": "test", "electionType": "mayor" },
            "rules": { "hourWindow": [18, 11] }
        }"#;
        let config: BalanceConfig = serde_json::from_str(js).unwrap();
        assert!(validate_rules(&config).is_err());
        assert!(validate_election_type(&config).is_err());
    }

    #[test]
    fn requirement_defaults() {
        let rc = RequirementConfig {
            booth_seconds_intra: Some(60.0),
            ..RequirementConfig::default()
        };
        let s = rc.settings();
        assert_eq!(s.booth_seconds_intra, 60.0);
        assert_eq!(s.roll_capacity_intra, 535.0);
    }

    #[test]
    fn nulls_are_pruned() {
        let js = serde_json::json!({"a": null, "b": [{"c": null, "d": 1}]});
        assert_eq!(prune_nulls(&js), serde_json::json!({"b": [{"d": 1}]}));
    }
}
