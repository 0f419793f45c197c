//! Sweep command implementation.

use std::time::Duration;

use anyhow::Result;
use indicatif::ProgressBar;

use spinvqe::sweep_layers;

use super::common::{RunArgs, format_params};
use super::output::{print_header, print_section, print_result};
use super::run::{print_config, workflow_title};

/// Execute the sweep command: one run per layer count.
pub fn execute(args: &RunArgs, count: usize, json: bool) -> Result<()> {
    if count == 0 {
        anyhow::bail!("--count must be at least 1");
    }
    let config = args.load()?;

    if !json {
        print_header(&format!(
            "{} layer sweep: {} to {} layers",
            workflow_title(&config),
            config.layers,
            config.layers + count - 1
        ));
        print_config(&config);
    }

    let spinner = if json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    spinner.set_message(format!("running {count} layer counts"));
    spinner.enable_steady_tick(Duration::from_millis(120));
    let reports = sweep_layers(&config, count)?;
    spinner.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    print_section("Summary");
    for report in &reports {
        print_result(
            &format!("{} layers", report.layers),
            format_params(&report.min_costs()),
        );
    }
    if let Some(first) = reports.first() {
        print_result("Exact energy", format!("{:.8}", first.exact_energy));
    }
    Ok(())
}
