use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Input raster image(s). When several are given they are processed in
    /// order and the thread chains: each run starts at the previous run's
    /// final nail.
    #[arg(short, long, value_name = "FILE", num_args = 1.., required = true)]
    pub input_files: Vec<PathBuf>,
    #[arg(short, long, value_name = "FOLDER")]
    pub output_folder: PathBuf,
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
