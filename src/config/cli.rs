use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "disudata")]
#[command(about = "Buy mobile data bundles from the command line")]
pub struct Cli {
    /// Path to a TOML configuration file (defaults to VTU_API_* environment variables)
    #[arg(short, long, global = true, env = "DISUDATA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// List supported networks
    Networks,

    /// Show the data plans on sale for a network
    Plans {
        #[arg(short, long)]
        network: String,
    },

    /// Buy a data plan for a phone number
    Buy {
        #[arg(short, long)]
        phone: String,

        #[arg(short, long)]
        network: String,

        /// Plan id as listed by `plans`
        #[arg(long)]
        plan: String,
    },
}
