use clap::{Parser, Subcommand};

/// This program draws the recorded votes of the House of Commons as a network
/// of divisions and legislators.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON configuration file. The options given on the command line
    /// take precedence over the values of the file. See the manual of division_network for the keys.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Downloads the division records that are not yet in a directory.
    Fetch(FetchArgs),
    /// Prints the divisions that can be selected, ordered by number.
    List(ListArgs),
    /// Draws the network of the selected divisions.
    Render(RenderArgs),
    /// Writes the votes of every legislator in every division as a CSV table.
    Matrix(MatrixArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct FetchArgs {
    /// (directory) Where the records are written, one file per division.
    #[clap(short, long, value_parser)]
    pub out: String,
    /// (default 0) The first division number to download.
    #[clap(long, value_parser)]
    pub first: Option<u32>,
    /// (optional) The last division number to download. If not specified, the latest division
    /// is read from the front page of the portal.
    #[clap(long, value_parser)]
    pub last: Option<u32>,
    /// (default commonsvotes.digiminster.com) The host of the portal.
    #[clap(long, value_parser)]
    pub host: Option<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ListArgs {
    /// (directory) The division records. Overrides the dataDirectory of the configuration.
    #[clap(short, long, value_parser)]
    pub data: Option<String>,
    /// If passed, records that cannot be read are skipped instead of stopping the program.
    #[clap(long, takes_value = false)]
    pub skip_malformed: bool,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct RenderArgs {
    /// (directory) The division records. Overrides the dataDirectory of the configuration.
    #[clap(short, long, value_parser)]
    pub data: Option<String>,
    /// (list of comma-separated division numbers) The divisions to draw.
    #[clap(short, long, value_parser, use_value_delimiter = true)]
    pub select: Option<Vec<u32>>,
    /// (default spring) One of circular, random, shell, spring, spectral.
    #[clap(short, long, value_parser)]
    pub layout: Option<String>,
    /// If passed, the legislators and divisions without any aye vote are kept in the figure.
    #[clap(long, takes_value = false)]
    pub keep_empty_nodes: bool,
    /// (default 0) The seed of the random and spring layouts.
    #[clap(long, value_parser)]
    pub seed: Option<u64>,
    /// The title of the figure.
    #[clap(long, value_parser)]
    pub title: Option<String>,
    /// (file path, 'stdout' or empty) Where the figure is written. A path ending with .html gives a
    /// standalone page, any other path gives the plotly JSON. Without a path, the JSON is printed.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,
    /// (file path) A figure in JSON format. If provided, divnet checks that the computed figure
    /// matches it.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,
    /// If passed, records that cannot be read are skipped instead of stopping the program.
    #[clap(long, takes_value = false)]
    pub skip_malformed: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct MatrixArgs {
    /// (directory) The division records. Overrides the dataDirectory of the configuration.
    #[clap(short, long, value_parser)]
    pub data: Option<String>,
    /// (file path or 'stdout', default stdout) Where the table is written.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,
    /// If passed, records that cannot be read are skipped instead of stopping the program.
    #[clap(long, takes_value = false)]
    pub skip_malformed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_command_line() {
        let args = Args::parse_from([
            "divnet",
            "--verbose",
            "render",
            "--select",
            "441,393",
            "--layout",
            "shell",
            "--keep-empty-nodes",
            "--out",
            "figure.html",
        ]);
        assert!(args.verbose);
        match args.command {
            Command::Render(r) => {
                assert_eq!(r.select, Some(vec![441, 393]));
                assert_eq!(r.layout.as_deref(), Some("shell"));
                assert!(r.keep_empty_nodes);
                assert!(!r.skip_malformed);
                assert_eq!(r.out.as_deref(), Some("figure.html"));
            }
            x => panic!("unexpected command {:?}", x),
        }
    }

    #[test]
    fn fetch_requires_a_directory() {
        assert!(Args::try_parse_from(["divnet", "fetch"]).is_err());
        let args = Args::try_parse_from(["divnet", "fetch", "--out", "csv_files", "--first", "10"]).unwrap();
        match args.command {
            Command::Fetch(f) => {
                assert_eq!(f.first, Some(10));
                assert_eq!(f.last, None);
            }
            x => panic!("unexpected command {:?}", x),
        }
    }
}
