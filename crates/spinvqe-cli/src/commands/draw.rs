//! Draw command implementation.

use std::path::Path;

use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;

use spinvqe::diagnostics::timestamp;
use spinvqe::{CostEvaluator, draw_circuit, initial_params, render_ascii};

use super::common::RunArgs;
use super::output::print_success;

/// Build the ansatz at its initial parameters and render it.
pub fn execute(args: &RunArgs, output_dir: &Path, ascii_only: bool) -> Result<()> {
    let config = args.load()?;
    let evaluator = CostEvaluator::new(&config)?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let params = initial_params(
        &config.initial_params,
        config.ansatz,
        config.n_qubits,
        config.layers,
        (config.ti, config.tf),
        &mut rng,
    )?;
    let circuit = evaluator.ansatz().build(&params)?;

    print!("{}", render_ascii(&circuit));
    if !ascii_only {
        let path = draw_circuit(&circuit, output_dir, &timestamp(), config.draw.dpi)?;
        print_success(&format!("Circuit saved to {}", path.display()));
    }
    Ok(())
}
