//! Time-slice constraints for generator ansätze.
//!
//! Every layer of a generator ansatz starts with an evolution time. The
//! slices must be non-negative and together span the window `tf − ti`.

use spinvqe_opt::{ConstraintSet, LinearConstraint};

use crate::error::{VqeError, VqeResult};

/// Constraints over the time slices of a `layers`-layer parameter vector.
///
/// Slices sit at indices `0, stride, 2·stride, …` with
/// `stride = param_len / layers`:
/// - `Σ_k x[k·stride] = total_time`
/// - `x[k·stride] ≥ 0` for every layer
pub fn time_constraints(
    layers: usize,
    param_len: usize,
    total_time: f64,
) -> VqeResult<ConstraintSet> {
    if layers == 0 || param_len == 0 || param_len % layers != 0 {
        return Err(VqeError::InvalidConfiguration(format!(
            "cannot split {param_len} parameters into {layers} equal layers"
        )));
    }
    if !(total_time.is_finite() && total_time >= 0.0) {
        return Err(VqeError::InvalidConfiguration(format!(
            "total evolution time must be non-negative, got {total_time}"
        )));
    }
    let stride = param_len / layers;

    let mut set = ConstraintSet::new();
    let mut sum = vec![0.0; param_len];
    for k in 0..layers {
        sum[k * stride] = 1.0;
    }
    set.push(LinearConstraint::equality(sum, total_time));

    for k in 0..layers {
        let mut slice = vec![0.0; param_len];
        slice[k * stride] = 1.0;
        set.push(LinearConstraint::at_least(slice, 0.0));
    }

    Ok(set)
}
