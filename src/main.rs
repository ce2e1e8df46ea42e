mod cli;
mod config;
mod error;
mod invocation;
mod model;
mod paths;
mod runner;
mod text_summary;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args = cli::Cli::parse();
    init_logging(args.verbose);

    if let Err(e) = cli::run(args) {
        println!("{}", e);
        // Only the model checks set a failing status; anything else exits 0.
        std::process::exit(e.exit_code());
    }
}
