//! Monte Carlo simulation of career choice under social information.
//!
//! A cohort of graduates chooses among careers of known intrinsic utility,
//! guided by noisy observations of their peers. Graduate `i` observes
//! `i + 1` peers, so the cohort spans a range of information. The
//! [`engine::Engine`] simulates a first-year choice and a second-year
//! revision with a switching cost; [`baseline::Baseline`] simulates the
//! single-year model without private noise. The [`economy`] module holds
//! an exchange economy and a labor economy with a lump-sum tax.

pub mod analysis;
pub mod baseline;
pub mod choice;
pub mod config;
pub mod economy;
pub mod engine;
pub mod error;
pub mod model;
pub mod sampler;
pub mod stats;

pub use config::{Config, SimConfig};
pub use engine::{Engine, Stage};
pub use error::SimError;
