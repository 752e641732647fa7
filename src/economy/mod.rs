//! Small equilibrium models solved numerically.

pub mod exchange;
pub mod labor;
pub mod optimize;
