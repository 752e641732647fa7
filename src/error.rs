use thiserror::Error;

/// Root causes raised by the simulation and economy models.
///
/// Library functions return `anyhow::Result` with context attached at each
/// layer; the innermost error is one of these variants and can be recovered
/// with `err.root_cause().downcast_ref::<SimError>()`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{step} requires {requires} to be simulated first")]
    OutOfOrder {
        step: &'static str,
        requires: &'static str,
    },

    #[error("no solution found: {0}")]
    NoSolution(String),
}
