//! Main CLI parser and top-level argument handling.

use std::path::PathBuf;

use clap::Parser;
use wordloop_core::DATA_DIR_ENV;

use crate::commands::Commands;

/// Vocabulary drilling player: speaks words and meanings on a loop.
#[derive(Parser)]
#[command(name = "wordloop")]
#[command(about = "Drill vocabulary by ear")]
#[command(version)]
pub struct Cli {
    /// Directory holding the wordloop database
    #[arg(long = "data-dir", global = true, env = DATA_DIR_ENV)]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Default log filter when `RUST_LOG` is unset.
    pub const fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "wordloop=debug,wordloop_core=debug,wordloop_db=debug,wordloop_speech=debug,wordloop_cli=debug"
        } else {
            "warn,wordloop_speech=info"
        }
    }
}
