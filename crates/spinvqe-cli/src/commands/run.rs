//! Run command implementation.

use anyhow::Result;
use console::style;
use indicatif::ProgressBar;
use tracing::warn;

use spinvqe::diagnostics::timestamp;
use spinvqe::{RunConfig, RunReport, VqeRunner, Workflow, draw_circuit};

use super::common::{OUTPUT_DIR, RunArgs, format_params};
use super::output::{
    create_progress_bar, print_header, print_result, print_section, print_success, print_warning,
};

/// Execute the run command.
pub fn execute(args: &RunArgs, json: bool, draw: bool) -> Result<()> {
    let mut config = args.load()?;
    if draw {
        config.draw.enabled = true;
    }
    let runner = VqeRunner::new(config.clone())?;

    if !json {
        print_header(&format!("{} on a {}-site chain", workflow_title(&config), config.n_qubits));
        print_config(&config);
    }

    let pb = if json {
        ProgressBar::hidden()
    } else {
        create_progress_bar(config.restarts as u64, "optimizing")
    };
    let report = runner.run_with_progress(|_, outcome| {
        pb.set_message(format!("min cost {:.6}", outcome.min_cost));
        pb.inc(1);
    })?;
    pb.finish_and_clear();

    if json {
        println!("{}", report.to_json()?);
    } else {
        print_report(&report);
    }

    if config.draw.enabled {
        save_diagram(&report, config.draw.dpi, json);
    }
    Ok(())
}

pub(crate) fn workflow_title(config: &RunConfig) -> &'static str {
    match config.workflow {
        Workflow::Vqe => "VQE",
        Workflow::Zne => "ZNE",
    }
}

/// Print the settings that shape a run.
pub fn print_config(config: &RunConfig) {
    print_section("Configuration");
    print_result("Qubits", config.n_qubits);
    print_result("Layers", config.layers);
    print_result("Time window", format!("[{}, {}]", config.ti, config.tf));
    print_result(
        "Couplings",
        format!(
            "cn = {}, bn = {}, r = {} ({})",
            config.coupling, config.field, config.anisotropy, config.boundary
        ),
    );
    print_result("Ansatz", config.ansatz);
    print_result("State", config.state);
    print_result(
        "Optimizer",
        format!(
            "{} (maxiter {}, ftol {:e})",
            config.optimizer.method, config.optimizer.maxiter, config.optimizer.ftol
        ),
    );
    print_result("Constraints", config.constraints);
    if config.noise.enabled {
        print_result(
            "Noise",
            format!(
                "{} (base p = {}, factor {})",
                config.noise.channel(),
                config.noise.probability,
                config.noise.factor
            ),
        );
    }
    print_result("Restarts", config.restarts);
}

/// Print the per-restart results.
pub fn print_report(report: &RunReport) {
    print_section(&format!("Results ({} layers)", report.layers));
    print_result("Exact energy", format!("{:.8}", report.exact_energy));
    print_result("Minimum costs", format_params(&report.min_costs()));
    if let Some(best) = report.best_cost() {
        print_result(
            "Best cost",
            format!(
                "{} (gap {:.2e})",
                style(format!("{best:.8}")).green().bold(),
                best - report.exact_energy
            ),
        );
    }

    print_section("Optimized parameters");
    for (i, outcome) in report.restarts.iter().enumerate() {
        let status = if outcome.converged {
            style("converged").green()
        } else {
            style("not converged").yellow()
        };
        println!(
            "  {} {} after {} iterations, {} evaluations",
            style(format!("#{i}")).dim(),
            status,
            outcome.iterations,
            outcome.evaluations
        );
        println!("     {}", format_params(&outcome.final_params));
    }
}

/// Write the last circuit of `report` under [`OUTPUT_DIR`].
///
/// Failures are reported and swallowed so the computed result survives.
pub fn save_diagram(report: &RunReport, dpi: u32, quiet: bool) {
    let Some(circuit) = &report.last_circuit else {
        return;
    };
    match draw_circuit(circuit, OUTPUT_DIR, &timestamp(), dpi) {
        Ok(path) if !quiet => print_success(&format!("Circuit saved to {}", path.display())),
        Ok(_) => {}
        Err(e) => {
            warn!(error = %e, "Failed to draw circuit");
            if !quiet {
                print_warning(&format!("Could not save circuit diagram: {e}"));
            }
        }
    }
}
