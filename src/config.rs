use crate::economy::{exchange::ExchangeParams, labor::LaborParams};
use crate::error::SimError;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, fs, ops::Bound, ops::RangeBounds, path::Path};

/// Largest `n_agt * n_opt * n_rep` of a simulation.
///
/// Each year stores one choice indicator per cell.
pub const MAX_N_CELLS: usize = 100_000_000;

/// Career-choice simulation parameters.
///
/// Shared by the switching-cost [`Engine`](crate::engine::Engine) and the
/// single-year [`Baseline`](crate::baseline::Baseline). Every constructor
/// validates it, see [`SimConfig::validate`].
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Number of options (careers).
    pub n_opt: usize,
    /// Number of agents (graduates) in the cohort.
    pub n_agt: usize,
    /// Number of Monte Carlo replicates.
    pub n_rep: usize,

    /// Standard deviation of every noise draw.
    pub std_dev: f64,
    /// Intrinsic utility of each option (length `n_opt`).
    pub utils: Vec<f64>,
    /// Utility penalty for leaving the first-year option.
    pub cost_switch: f64,

    /// Seed of the master random number generator.
    ///
    /// Runs with the same seed and parameters are bit-identical.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            n_opt: 3,
            n_agt: 10,
            n_rep: 10_000,
            std_dev: 2.0,
            utils: vec![1.0, 2.0, 3.0],
            cost_switch: 1.0,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Check every parameter.
    ///
    /// # Errors
    /// Fails with [`SimError::InvalidConfig`] as root cause if a count is
    /// zero or too large (on its own or as the product `n_agt * n_opt *
    /// n_rep`), if `utils` does not have `n_opt` finite elements,
    /// or if `std_dev` or `cost_switch` is negative or not finite.
    pub fn validate(&self) -> Result<()> {
        check_num(self.n_opt, 1..=1_000).context("invalid number of options")?;
        check_num(self.n_agt, 1..=10_000).context("invalid number of agents")?;
        check_num(self.n_rep, 1..=100_000_000).context("invalid number of replicates")?;
        let n_cells = self
            .n_agt
            .checked_mul(self.n_opt)
            .and_then(|n| n.checked_mul(self.n_rep))
            .unwrap_or(usize::MAX);
        check_num(n_cells, 1..=MAX_N_CELLS).context("invalid simulation size")?;

        check_num(self.std_dev, 0.0..=f64::MAX).context("invalid noise standard deviation")?;
        check_vec(&self.utils, self.n_opt).context("invalid intrinsic utilities")?;
        check_num(self.cost_switch, 0.0..=f64::MAX).context("invalid switching cost")?;

        Ok(())
    }
}

/// Contents of the configuration file.
///
/// Each table is optional and missing fields take their default value.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub careers: SimConfig,
    pub exchange: ExchangeParams,
    pub labor: LaborParams,
}

impl Config {
    /// Load a [`Config`] from a TOML file and validate all of its tables.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let config: Config = toml::from_str(&contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.careers.validate().context("invalid careers table")?;
        self.exchange.validate().context("invalid exchange table")?;
        self.labor.validate().context("invalid labor table")?;
        Ok(())
    }
}

pub(crate) fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!(SimError::InvalidConfig(format!(
            "number must be in the range {range:?}, but is {num:?}"
        )));
    }
    Ok(())
}

/// Check a number lies strictly between `lo` and `hi`.
pub(crate) fn check_open(num: f64, lo: f64, hi: f64) -> Result<()> {
    check_num(num, (Bound::Excluded(lo), Bound::Excluded(hi)))
}

pub(crate) fn check_vec(vec: &[f64], exp_len: usize) -> Result<()> {
    let len = vec.len();
    if len != exp_len {
        bail!(SimError::InvalidConfig(format!(
            "vector length must be {exp_len}, but is {len}"
        )));
    }
    if let Some(i_ele) = vec.iter().position(|ele| !ele.is_finite()) {
        bail!(SimError::InvalidConfig(format!(
            "vector element {i_ele} must be finite"
        )));
    }
    Ok(())
}
