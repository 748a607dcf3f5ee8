//! Error taxonomy for simulation runs.

use thiserror::Error;

use crate::config::ConfigError;

/// Fatal errors surfaced by the engine.
///
/// Validation failures are rejected before any hour is simulated. Invariant
/// violations abort the whole run rather than returning a partial schedule:
/// later hours depend on earlier battery state, so no hour is trusted once
/// the sequential computation has failed.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Malformed or physically inconsistent scenario configuration.
    #[error("invalid scenario: {0}")]
    Config(String),

    /// An hour's energy balance could not be reconciled.
    #[error("energy balance violated at hour {hour}: {detail}")]
    Invariant { hour: usize, detail: String },
}

impl SimulationError {
    /// Collapses field-level validation errors into a single `Config` error.
    pub fn from_config_errors(errors: &[ConfigError]) -> Self {
        let joined = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Self::Config(joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_join_into_one_message() {
        let errors = vec![
            ConfigError {
                field: "battery.capacity".into(),
                message: "must be > 0".into(),
            },
            ConfigError {
                field: "battery.min_soc".into(),
                message: "must be < battery.max_soc".into(),
            },
        ];
        let err = SimulationError::from_config_errors(&errors);
        let text = err.to_string();
        assert!(text.contains("battery.capacity"));
        assert!(text.contains("battery.min_soc"));
    }
}
