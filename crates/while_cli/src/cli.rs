use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "whilei", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log more. Repeat for debug (`-vv`) and trace (`-vvv`) output.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a program and print `x0`.
    Run {
        #[command(flatten)]
        input: Input,

        /// Initial values of `x1`, `x2`, ...
        args: Vec<u64>,

        /// Give up after this many milliseconds.
        #[arg(long, value_name = "MS")]
        timeout: Option<u64>,
    },

    /// Check that a program parses.
    Check {
        #[command(flatten)]
        input: Input,
    },
}

#[derive(clap::Args, Debug)]
pub struct Input {
    /// The input file, or `-` for stdin.
    pub input: String,

    /// Whether the given input should be used directly as the source instead
    /// of as the source file path.
    #[arg(long, short, action)]
    pub source: bool,
}
