//! interlist CLI entry point.

mod cli;

use clap::Parser;
use cli::{Cli, Command};
use interlist::demo::{DemoOptions, run_demo};
use interlist::runtime::HostVm;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Command::Demo { types, cache_limit } => {
            match run_demo(&DemoOptions { types, cache_limit }) {
                Ok(report) => println!("{report}"),
                Err(e) => {
                    eprintln!("Demo failed: {e}");
                    std::process::exit(1);
                }
            }
        }
        Command::Inspect => inspect(),
    }
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|e| {
            eprintln!("Invalid log filter {default_filter:?}: {e}");
            EnvFilter::new("warn")
        });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn inspect() {
    let vm = HostVm::with_standard_lists();
    for klass in vm.registry().classes() {
        println!("{} ({})", klass.name(), klass.id());
        for method in klass.methods() {
            println!("  {}{}", method.name(), method.signature());
        }
    }
}
