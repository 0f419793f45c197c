//! Exact command implementation.

use anyhow::Result;
use console::style;

use spinvqe_sim::{ground_state_energy, ising_hamiltonian, xy_hamiltonian};

use super::common::RunArgs;
use super::output::{print_result, print_section};

/// Print the exact ground energy of the configured Ising chain.
pub fn execute(args: &RunArgs, show_terms: bool) -> Result<()> {
    let config = args.load()?;
    let ising = ising_hamiltonian(
        config.n_qubits,
        config.coupling,
        config.field,
        config.boundary,
    )?;
    let energy = ground_state_energy(&ising)?;

    print_section(&format!(
        "Ising chain, {} sites ({})",
        config.n_qubits, config.boundary
    ));
    print_result("Terms", ising.n_terms());
    print_result(
        "Ground energy",
        style(format!("{energy:.10}")).green().bold(),
    );

    if show_terms {
        let xy = xy_hamiltonian(
            config.n_qubits,
            config.coupling,
            config.field,
            config.anisotropy,
            config.boundary,
        )?;
        print_section("Ising observable");
        println!("{ising}");
        print_section("XY generator");
        println!("{xy}");
    }
    Ok(())
}
