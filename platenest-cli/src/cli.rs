use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Nesting job in JSON format
    #[arg(short, long, value_name = "FILE")]
    pub input_file: PathBuf,
    /// Folder the solution JSON and SVG are written to
    #[arg(short, long, value_name = "FOLDER")]
    pub solution_folder: PathBuf,
    /// Engine configuration; defaults are used when omitted
    #[arg(short, long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,
    #[arg(
        short,
        long,
        value_name = "[off, error, warn, info, debug, trace]",
        default_value = "info"
    )]
    pub log_level: LevelFilter,
}
