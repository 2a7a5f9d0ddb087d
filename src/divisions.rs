use log::{debug, info, warn};

use division_network::*;
use snafu::{prelude::*, Snafu};

use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::{FetchArgs, ListArgs, MatrixArgs, RenderArgs};
use crate::divisions::config_reader::*;
use crate::divisions::io_fetch::*;
use crate::divisions::io_history::*;
use crate::divisions::io_output::*;

pub mod config_reader;
pub mod io_fetch;
pub mod io_history;
pub mod io_output;

#[derive(Debug, Snafu)]
pub enum DivnetError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading directory {path}"))]
    ReadingDir {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("No parent directory for {path}"))]
    MissingParentDir { path: String },
    #[snafu(display("Error parsing the JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing the figure"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing the CSV table"))]
    Csv { source: csv::Error },
    #[snafu(display("Could not load the divisions: {source}"))]
    History { source: HistoryError },
    #[snafu(display("Could not draw the network: {source}"))]
    Network { source: NetworkError },
    #[snafu(display("Request failed: {source}"))]
    Http { source: reqwest::Error },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type DivnetResult<T> = Result<T, DivnetError>;

/// Above this number of divisions, the spring layout becomes slow.
const LARGE_SELECTION: usize = 10;

pub fn run_fetch(args: &FetchArgs) -> DivnetResult<FetchSummary> {
    let host = args.host.clone().unwrap_or_else(|| DEFAULT_HOST.to_string());
    let client = make_client()?;
    let last = match args.last {
        Some(x) => x,
        None => fetch_latest_division(&client, &host)?,
    };
    let first = args.first.unwrap_or(FIRST_DIVISION);
    info!("Fetching divisions {} to {} into {}", first, last, args.out);
    let summary = fetch_divisions(&client, &host, std::path::Path::new(&args.out), first, last)?;
    println!("{}", summary);
    Ok(summary)
}

pub fn run_list(config: &LoadedConfig, args: &ListArgs) -> DivnetResult<Vec<SelectionOption>> {
    let dir = config.data_directory(&args.data);
    let history = read_history(&dir, config.malformed_policy(args.skip_malformed))?;
    let options = history.selection_options();
    let js = serde_json::to_string_pretty(&options).context(SerializingJsonSnafu {})?;
    println!("{}", js);
    Ok(options)
}

pub fn run_render(config: &LoadedConfig, args: &RenderArgs) -> DivnetResult<Figure> {
    // Configuration errors come before reading any file.
    let layout: LayoutAlgorithm = config
        .layout_name(&args.layout)
        .parse()
        .context(NetworkSnafu {})?;
    let options = config.render_options(layout, args.keep_empty_nodes, args.seed, &args.title);
    let colors = config.party_colors();
    debug!("run_render: options: {:?}", options);

    let selection = config.selection(&args.select);
    if selection.is_empty() {
        warn!("No division selected, the figure will be empty");
    } else if selection.len() > LARGE_SELECTION {
        warn!(
            "{} divisions selected: computing the layout may take a long time",
            selection.len()
        );
    }

    let dir = config.data_directory(&args.data);
    let history = read_history(&dir, config.malformed_policy(args.skip_malformed))?;
    let network = build_network(&history, &selection).context(NetworkSnafu {})?;
    info!(
        "Network of {} divisions, {} legislators and {} parties",
        network.graph.division_count(),
        network.graph.legislator_count(),
        network.parties.len()
    );
    let uncolored = colors.missing(network.parties.iter());
    if !uncolored.is_empty() {
        warn!(
            "No colour for the parties {:?}: their legislators can only be drawn if they are pruned",
            uncolored
        );
    }
    let figure = visualize(network.graph, &options, &colors).context(NetworkSnafu {})?;

    write_figure(&figure, &config.output_path(&args.out))?;

    // The reference figure, if provided for comparison
    if let Some(reference_p) = &args.reference {
        check_reference(&figure, reference_p)?;
    }
    Ok(figure)
}

fn check_reference(figure: &Figure, reference_p: &str) -> DivnetResult<()> {
    let reference = read_reference(reference_p)?;
    // Both sides go through the same JSON values.
    let computed: JSValue = serde_json::from_str(&figure_to_json(figure)?).context(
        ParsingJsonSnafu {
            path: "computed figure",
        },
    )?;
    let pretty_computed = serde_json::to_string_pretty(&computed).context(SerializingJsonSnafu {})?;
    let pretty_reference =
        serde_json::to_string_pretty(&reference).context(SerializingJsonSnafu {})?;
    if pretty_reference != pretty_computed {
        warn!("Found differences with the reference figure");
        print_diff(pretty_reference.as_str(), pretty_computed.as_str(), "\n");
        whatever!("Difference detected between computed figure and reference figure")
    }
    info!("The figure matches the reference {}", reference_p);
    Ok(())
}

pub fn run_matrix(config: &LoadedConfig, args: &MatrixArgs) -> DivnetResult<VotingMatrix> {
    let dir = config.data_directory(&args.data);
    let history = read_history(&dir, config.malformed_policy(args.skip_malformed))?;
    let matrix = VotingMatrix::from_history(&history);
    let (rows, cols) = matrix.shape();
    info!("Voting matrix of {} legislators and {} divisions", rows, cols);
    write_matrix(&matrix, &config.output_path(&args.out))?;
    Ok(matrix)
}
