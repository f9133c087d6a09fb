use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kma-processor")]
#[command(about = "Weather sensor export processor with SQLite output")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the data directory tree (raw/, processed/, db/)
    Init {
        #[arg(short, long, default_value = "data", help = "Data root directory")]
        data_dir: PathBuf,
    },

    /// Run the full pipeline over the raw exports
    Process {
        #[arg(short, long, default_value = "data", help = "Data root directory")]
        data_dir: PathBuf,

        #[arg(
            long,
            default_value = "false",
            help = "Resolve base dates from in-file 'Start :' markers instead of filenames"
        )]
        embedded_headers: bool,

        #[arg(long, default_value = "false", help = "Memory-map source files")]
        use_mmap: bool,

        #[arg(
            long,
            default_value = "60_127",
            help = "Site code written into legacy export headers"
        )]
        site_code: String,
    },

    /// Re-read a unified database and (re)write the daily summary sinks
    Aggregate {
        #[arg(short, long, help = "Unified weather database file")]
        input_db: PathBuf,

        #[arg(short, long, default_value = "data", help = "Data root directory")]
        data_dir: PathBuf,
    },

    /// Display information about a unified database
    Info {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long, default_value = "10")]
        sample: usize,
    },
}
