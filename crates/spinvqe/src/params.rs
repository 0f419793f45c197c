//! Initial parameter vectors.

use rand::Rng;
use std::f64::consts::PI;

use crate::ansatz::{check_parameters, num_parameters};
use crate::config::{AnsatzKind, InitialParams};
use crate::error::VqeResult;

/// Draw (or reuse) the starting point of one restart.
///
/// Random generator vectors carry `layers` time slices obtained as the gaps
/// between sorted uniform points in `[ti, tf]`, so they are non-negative and
/// already sum to `tf − ti`. Angles are uniform in `[−π, π)`.
pub fn initial_params<R: Rng>(
    policy: &InitialParams,
    kind: AnsatzKind,
    n_qubits: u32,
    layers: usize,
    (ti, tf): (f64, f64),
    rng: &mut R,
) -> VqeResult<Vec<f64>> {
    let expected = num_parameters(kind, n_qubits, layers);
    match policy {
        InitialParams::Fixed(values) => {
            check_parameters(expected, values)?;
            Ok(values.clone())
        }
        InitialParams::Random if kind.has_time_slices() => {
            let slices = time_slices(layers, ti, tf, rng);
            let mut params = Vec::with_capacity(expected);
            for t in slices {
                params.push(t);
                params.extend((0..n_qubits).map(|_| rng.gen_range(-PI..PI)));
            }
            Ok(params)
        }
        InitialParams::Random => Ok((0..expected).map(|_| rng.gen_range(-PI..PI)).collect()),
    }
}

/// `layers` non-negative gaps partitioning `[ti, tf]`.
fn time_slices<R: Rng>(layers: usize, ti: f64, tf: f64, rng: &mut R) -> Vec<f64> {
    let mut cuts: Vec<f64> = (1..layers).map(|_| rng.gen_range(ti..=tf)).collect();
    cuts.sort_by(f64::total_cmp);

    let mut slices = Vec::with_capacity(layers);
    let mut previous = ti;
    for cut in cuts.into_iter().chain(std::iter::once(tf)) {
        slices.push(cut - previous);
        previous = cut;
    }
    slices
}
