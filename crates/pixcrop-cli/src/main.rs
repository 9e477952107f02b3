//! Pixcrop command line host.
//!
//! Runs the local processor on JSON requests produced by an editing front
//! end, and manages the recent-files list.
//!
//! ```text
//! pixcrop open photo.jpg
//! pixcrop export --request export.json
//! pixcrop apply --request apply.json --work-dir /tmp/pixcrop
//! pixcrop recent --clear
//! ```

mod commands;
mod logger;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;

/// Pixcrop headless image processor.
#[derive(Parser, Debug)]
#[command(name = "pixcrop", version, about = "Pixcrop headless image processor")]
pub struct Cli {
    /// Log at debug level regardless of PIXCROP_LOG.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Recent-files list to use instead of the one in the data directory.
    #[arg(long, global = true, value_name = "FILE")]
    pub recent_file: Option<PathBuf>,

    /// Processor settings as JSON; missing fields take their defaults.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode an image, print its size and remember it.
    Open {
        path: PathBuf,
    },
    /// Write an output file from an export request.
    Export {
        /// Export request JSON.
        #[arg(short, long, value_name = "FILE")]
        request: PathBuf,
    },
    /// Bake an apply request into the working image.
    Apply {
        /// Apply request JSON.
        #[arg(short, long, value_name = "FILE")]
        request: PathBuf,

        /// Directory for the applied image.
        #[arg(long, value_name = "DIR")]
        work_dir: Option<PathBuf>,
    },
    /// Print the recent-files list.
    Recent {
        /// Empty the list instead.
        #[arg(long)]
        clear: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    match commands::run(&cli) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
