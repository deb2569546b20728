//! Command-line arguments
//!
//! Global logging and configuration flags plus the `demo` and `status`
//! subcommands. Values given here override the configuration file.

use clap::{ArgAction, Args as ClapArgs, CommandFactory, FromArgMatches, Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::core::styles::palette_to_clap;

#[derive(Parser, Debug, Clone)]
#[command(name = "scenesweep")]
#[command(about = "Resource registry and cleanup coordinator for 3D viewer scenes")]
#[command(version)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Log level
    #[arg(
        short = 'l',
        long = "log-level",
        value_name = "LEVEL",
        global = true,
        value_parser = ["trace", "debug", "info", "warn", "error", "off"]
    )]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(
        short = 'o',
        long = "log-format",
        value_name = "FORMAT",
        global = true,
        value_parser = ["text", "ext", "json"]
    )]
    pub log_format: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(short = 'f', long = "log-file", value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Force coloured output
    #[arg(long = "color", action = ArgAction::SetTrue, global = true, conflicts_with = "no_color")]
    pub color: bool,

    /// Disable coloured output
    #[arg(long = "no-color", action = ArgAction::SetTrue, global = true)]
    pub no_color: bool,

    /// Delay before the second garbage-collection request
    #[arg(long = "gc-delay-ms", value_name = "MS", global = true)]
    pub gc_delay_ms: Option<u64>,

    /// Delay before the post-cleanup status check
    #[arg(long = "verify-delay-ms", value_name = "MS", global = true)]
    pub verify_delay_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Build a synthetic scene workload, register it and clean it up
    Demo(DemoArgs),
    /// Show the status of the process-wide coordinator
    Status {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(ClapArgs, Debug, Clone, PartialEq, Eq)]
pub struct DemoArgs {
    /// Number of scenes
    #[arg(short = 's', long, default_value_t = 2)]
    pub scenes: usize,

    /// Children per scene node
    #[arg(short = 'm', long, default_value_t = 3)]
    pub children: usize,

    /// Levels below each scene root
    #[arg(short = 'd', long, default_value_t = 2)]
    pub depth: usize,

    /// Make every K-th disposable fail (0 disables)
    #[arg(long = "fail-every", value_name = "K", default_value_t = 0)]
    pub fail_every: usize,

    /// Print JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Explicit colour choice from the flags, `None` when left to detection
    pub fn color_choice(&self) -> Option<bool> {
        match (self.color, self.no_color) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    /// Parse with help styled according to `color`
    pub fn parse_styled_from<I, T>(argv: I, color: bool) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Self::command()
            .styles(palette_to_clap(color))
            .try_get_matches_from(argv)?;
        Self::from_arg_matches(&matches)
    }
}
