use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use costfloor_core::{SearchStrategy, VERSION};

use crate::config::Algorithm;

/// costfloor - password hashing that keeps a minimum hash duration
#[derive(Parser)]
#[command(name = "costfloor")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file
    #[arg(short, long, global = true, env = "COSTFLOOR_CONFIG")]
    pub config: Option<String>,

    /// Log calibration and escalation decisions to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Hashing policy overrides shared by the hashing commands
#[derive(Args, Clone, Debug, Default)]
pub struct PolicyArgs {
    /// Minimum duration of one hash, in milliseconds
    #[arg(long, value_name = "MILLIS")]
    pub min_ms: Option<u64>,

    /// Hash algorithm
    #[arg(long, value_enum)]
    pub algorithm: Option<Algorithm>,

    /// Calibration search order
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Lowest cost factor calibration may choose
    #[arg(long)]
    pub min_cost: Option<u32>,

    /// Highest cost factor escalation may reach
    #[arg(long)]
    pub max_cost: Option<u32>,
}

/// Calibration search order (command-line form)
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Linear,
    Binary,
}

impl From<StrategyArg> for SearchStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Linear => SearchStrategy::Linear,
            StrategyArg::Binary => SearchStrategy::Binary,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find the cheapest cost factor that meets the minimum duration
    Calibrate {
        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Hash a password
    Hash {
        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Verify a password against a stored hash
    Verify {
        /// Stored hash
        #[arg(value_name = "HASH")]
        hash: String,

        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Write a default config file
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}
