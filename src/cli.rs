use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "foosball league rating backend")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the backend server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Record match facts from scraped JSON dump files into the database
    Ingest {
        /// Directory containing the dump files
        #[arg(short, long, default_value = "import")]
        source: PathBuf,
    },
    /// Recompute all ratings from the full match history
    Process,
}
