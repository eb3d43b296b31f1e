//! Command-line interface for interlist.

use clap::{Parser, Subcommand};
use interlist::dispatch::DEFAULT_CACHE_LIMIT;

#[derive(Parser)]
#[command(name = "interlist")]
#[command(about = "Drive host lists through the array protocol adapter", long_about = None)]
pub struct Cli {
    /// Log filter used when RUST_LOG is not set (e.g. "debug", "interlist_dispatch=trace")
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the [10, 20, 30] scenario over several list classes sharing one call site
    Demo {
        /// Number of distinct list classes to create
        #[arg(long, default_value_t = 4)]
        types: usize,

        /// Distinct classes cached per call site before it goes uncached
        #[arg(long, default_value_t = DEFAULT_CACHE_LIMIT)]
        cache_limit: usize,
    },
    /// List the standard host list classes and their methods
    Inspect,
}
