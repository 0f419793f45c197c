//! spinvqe command-line interface
//!
//! Runs the variational ground-state search for the transverse-field Ising
//! chain, sweeps layer counts, prints exact energies and draws ansatz circuits.
//!
//! ```text
//! spinvqe run -n 4 -l 2 -r 5
//! spinvqe run --config run.yaml --zne --noise 0.01 --draw
//! spinvqe sweep -n 3 -l 1 --count 4 --json
//! spinvqe exact -n 6 --periodic
//! spinvqe draw -n 3 -l 2 --ascii
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::common::{OUTPUT_DIR, RunArgs};
use commands::{draw, exact, run, sweep};

/// spinvqe - variational ground states of spin chains
#[derive(Parser)]
#[command(name = "spinvqe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the optimisation workflow
    Run {
        #[command(flatten)]
        args: RunArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Save a diagram of the final circuit
        #[arg(long)]
        draw: bool,
    },

    /// Run consecutive layer counts
    Sweep {
        #[command(flatten)]
        args: RunArgs,

        /// Number of layer counts to run
        #[arg(long, default_value = "3")]
        count: usize,

        /// Print the reports as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the exact ground energy of the chain
    Exact {
        #[command(flatten)]
        args: RunArgs,

        /// Also list the Hamiltonian terms
        #[arg(long)]
        terms: bool,
    },

    /// Draw the ansatz at its initial parameters
    Draw {
        #[command(flatten)]
        args: RunArgs,

        /// Directory the SVG is written to
        #[arg(long, default_value = OUTPUT_DIR)]
        output_dir: PathBuf,

        /// Only print the text diagram
        #[arg(long)]
        ascii: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    // RUST_LOG applies only without -v
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Run { args, json, draw } => run::execute(&args, json, draw),
        Commands::Sweep { args, count, json } => sweep::execute(&args, count, json),
        Commands::Exact { args, terms } => exact::execute(&args, terms),
        Commands::Draw {
            args,
            output_dir,
            ascii,
        } => draw::execute(&args, &output_dir, ascii),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}
