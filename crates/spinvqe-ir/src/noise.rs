//! Pauli noise channels.
//!
//! A noise instruction acts on a single qubit and describes a stochastic
//! Pauli error. The density-matrix simulator applies the channel exactly;
//! the statevector simulator samples one Pauli per application.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};

/// Single-qubit Pauli noise channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NoiseChannel {
    /// With probability `p`, apply X, Y or Z uniformly (p/3 each).
    Depolarizing { p: f64 },
    /// With probability `p`, apply X.
    BitFlip { p: f64 },
    /// With probability `p`, apply Z.
    PhaseFlip { p: f64 },
}

impl NoiseChannel {
    /// Short name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            NoiseChannel::Depolarizing { .. } => "depolarizing",
            NoiseChannel::BitFlip { .. } => "bit_flip",
            NoiseChannel::PhaseFlip { .. } => "phase_flip",
        }
    }

    /// Total error probability of the channel.
    pub fn probability(&self) -> f64 {
        match *self {
            NoiseChannel::Depolarizing { p }
            | NoiseChannel::BitFlip { p }
            | NoiseChannel::PhaseFlip { p } => p,
        }
    }

    /// Probabilities of applying X, Y and Z respectively.
    pub fn pauli_weights(&self) -> [f64; 3] {
        match *self {
            NoiseChannel::Depolarizing { p } => [p / 3.0, p / 3.0, p / 3.0],
            NoiseChannel::BitFlip { p } => [p, 0.0, 0.0],
            NoiseChannel::PhaseFlip { p } => [0.0, 0.0, p],
        }
    }

    /// Copy of this channel with its probability multiplied by `factor`.
    ///
    /// Used for zero-noise extrapolation, where the base rate is stretched
    /// by a noise factor. The result is not validated.
    pub fn scaled(&self, factor: f64) -> Self {
        let p = self.probability() * factor;
        match self {
            NoiseChannel::Depolarizing { .. } => NoiseChannel::Depolarizing { p },
            NoiseChannel::BitFlip { .. } => NoiseChannel::BitFlip { p },
            NoiseChannel::PhaseFlip { .. } => NoiseChannel::PhaseFlip { p },
        }
    }

    /// Check the probability lies in `[0, 1]`.
    pub fn validate(&self) -> IrResult<()> {
        let p = self.probability();
        if !(0.0..=1.0).contains(&p) {
            return Err(IrError::InvalidProbability {
                channel: self.name().to_string(),
                p,
            });
        }
        Ok(())
    }
}

impl fmt::Display for NoiseChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.probability())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_probability() {
        for channel in [
            NoiseChannel::Depolarizing { p: 0.3 },
            NoiseChannel::BitFlip { p: 0.3 },
            NoiseChannel::PhaseFlip { p: 0.3 },
        ] {
            let total: f64 = channel.pauli_weights().iter().sum();
            assert!((total - 0.3).abs() < 1e-12);
        }
    }

    #[test]
    fn test_scaled() {
        let channel = NoiseChannel::BitFlip { p: 0.1 }.scaled(3.0);
        assert_eq!(channel.name(), "bit_flip");
        assert!((channel.probability() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_validate() {
        assert!(NoiseChannel::Depolarizing { p: 0.0 }.validate().is_ok());
        assert!(NoiseChannel::Depolarizing { p: 1.0 }.validate().is_ok());
        assert!(matches!(
            NoiseChannel::PhaseFlip { p: 1.5 }.validate(),
            Err(IrError::InvalidProbability { .. })
        ));
        assert!(NoiseChannel::BitFlip { p: -0.1 }.validate().is_err());
    }

    #[test]
    fn test_serde_tagging() {
        let json = serde_json::to_string(&NoiseChannel::Depolarizing { p: 0.05 }).unwrap();
        assert_eq!(json, r#"{"type":"depolarizing","p":0.05}"#);
    }
}
