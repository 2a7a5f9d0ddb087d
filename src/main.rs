mod args;
mod divisions;

use clap::Parser;
use log::{debug, warn};

use crate::args::{Args, Command};
use crate::divisions::config_reader::{read_config, LoadedConfig};
use crate::divisions::DivnetResult;

fn run(args: &Args) -> DivnetResult<()> {
    let config = match &args.config {
        Some(path) => read_config(path)?,
        None => LoadedConfig::default(),
    };
    match &args.command {
        Command::Fetch(a) => divisions::run_fetch(a).map(|_| ()),
        Command::List(a) => divisions::run_list(&config, a).map(|_| ()),
        Command::Render(a) => divisions::run_render(&config, a).map(|_| ()),
        Command::Matrix(a) => divisions::run_matrix(&config, a).map(|_| ()),
    }
}

fn main() {
    let args = Args::parse();

    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if args.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    debug!("args: {:?}", args);

    if let Err(e) = run(&args) {
        warn!("Error occurred {:?}", e);
        eprintln!("An error occurred: {}", e);
        let mut source = std::error::Error::source(&e);
        while let Some(s) = source {
            eprintln!("  caused by: {}", s);
            source = s.source();
        }
        std::process::exit(1);
    }
}
