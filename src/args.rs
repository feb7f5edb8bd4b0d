use clap::Parser;

/// This is a balancing program for the devices of pre-voting stations.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The file containing the balancing configuration in JSON format.
    /// See the manual of the `equipment_balancing` crate for the format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference summary in JSON format. If provided, pvbalance will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary will be written in JSON format to the given
    /// location. Setting this option overrides the output directory that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path, can be repeated) A turnout report. Setting this option overrides the turnout files of the --config option.
    #[clap(short, long, value_parser)]
    pub input: Vec<String>,

    /// (csv or xlsx, default from the file extension) The type of the turnout reports.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (file path, optional) The device inventory of the stations.
    #[clap(long, value_parser)]
    pub equipment: Option<String>,

    /// (file path, optional) The electorate of the reference election, per district.
    #[clap(long, value_parser)]
    pub past_electorate: Option<String>,

    /// (file path, optional) The electorate of the coming election, per district.
    #[clap(long, value_parser)]
    pub recent_electorate: Option<String>,

    /// The number of devices owned. By default, read from the inventory.
    #[clap(long, value_parser)]
    pub total_assets: Option<u32>,

    /// (default 5) The number of devices kept in reserve.
    #[clap(long, value_parser)]
    pub reserve: Option<u32>,

    /// (default 1.18) The weight of the out-of-precinct demand.
    #[clap(long, value_parser)]
    pub extra_weight: Option<f64>,

    /// (default 11) The first hour of the peak window.
    #[clap(long, value_parser)]
    pub window_start: Option<u32>,

    /// (default 18) The last hour of the peak window, included.
    #[clap(long, value_parser)]
    pub window_end: Option<u32>,

    /// (president, general or local, default president) The kind of election. It sets the congestion threshold.
    #[clap(long, value_parser)]
    pub election_type: Option<String>,

    /// When using Excel files, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
