// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

mod decode;
mod encode;
mod error;
mod table;
mod utils;

use clap::{Parser, Subcommand};
use error::result_to_exit_code;
use std::process::ExitCode;

/// ioctl-numbers CLI - Encode, decode and list Linux ioctl request codes
#[derive(Parser)]
#[command(name = "ioctl-numbers")]
#[command(version)]
#[command(about = "ioctl-numbers CLI - Encode, decode and list Linux ioctl request codes")]
#[command(long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (use RUST_LOG=trace for more)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a request code from direction, type, number and size
    Encode(encode::Args),

    /// Split request codes into direction, type, number and size
    Decode(decode::Args),

    /// List the known request codes and mode flags of each device class
    Table(table::Args),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Encode(args) => encode::execute(args, cli.json),
        Commands::Decode(args) => decode::execute(args, cli.json),
        Commands::Table(args) => table::execute(args, cli.json),
    };

    result_to_exit_code(result)
}

/// Initialize env_logger based on verbosity flags
fn init_logging(verbose: bool, quiet: bool) {
    let env = env_logger::Env::default();

    let env = if quiet {
        env.default_filter_or("error")
    } else if verbose {
        env.default_filter_or("debug")
    } else {
        env.default_filter_or("info")
    };

    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .init();

    log::debug!("Logging initialized");
}
