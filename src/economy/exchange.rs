//! Two-good, two-consumer exchange economy with Cobb-Douglas preferences.
//!
//! Consumer A owns `(w1a, w2a)` and consumer B owns the rest of the unit
//! endowment of each good. Good 2 is the numeraire.

use crate::config::check_open;
use crate::error::SimError;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

const PRICE_2: f64 = 1.0;

const MAX_BISECT_ITER: usize = 200;

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExchangeParams {
    /// Cobb-Douglas weight of good 1 for consumer A.
    pub alpha: f64,
    /// Cobb-Douglas weight of good 1 for consumer B.
    pub beta: f64,
    /// Endowment of good 1 of consumer A.
    pub w1a: f64,
    /// Endowment of good 2 of consumer A.
    pub w2a: f64,
}

impl Default for ExchangeParams {
    fn default() -> Self {
        Self {
            alpha: 1.0 / 3.0,
            beta: 2.0 / 3.0,
            w1a: 0.8,
            w2a: 0.3,
        }
    }
}

impl ExchangeParams {
    pub fn validate(&self) -> Result<()> {
        check_open(self.alpha, 0.0, 1.0).context("invalid alpha")?;
        check_open(self.beta, 0.0, 1.0).context("invalid beta")?;
        check_open(self.w1a, 0.0, 1.0).context("invalid endowment of good 1")?;
        check_open(self.w2a, 0.0, 1.0).context("invalid endowment of good 2")?;
        Ok(())
    }
}

/// Consumption of both goods.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    pub x1: f64,
    pub x2: f64,
}

/// Excess demand of both goods at a price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExcessDemand {
    pub eps1: f64,
    pub eps2: f64,
}

pub struct ExchangeEconomy {
    par: ExchangeParams,
}

impl ExchangeEconomy {
    pub fn new(par: ExchangeParams) -> Result<Self> {
        par.validate().context("failed to validate exchange parameters")?;
        Ok(Self { par })
    }

    pub fn params(&self) -> &ExchangeParams {
        &self.par
    }

    pub fn endowment_a(&self) -> Bundle {
        Bundle {
            x1: self.par.w1a,
            x2: self.par.w2a,
        }
    }

    pub fn endowment_b(&self) -> Bundle {
        Bundle {
            x1: 1.0 - self.par.w1a,
            x2: 1.0 - self.par.w2a,
        }
    }

    pub fn utility_a(&self, x1: f64, x2: f64) -> f64 {
        cobb_douglas(x1, x2, self.par.alpha)
    }

    pub fn utility_b(&self, x1: f64, x2: f64) -> f64 {
        cobb_douglas(x1, x2, self.par.beta)
    }

    pub fn demand_a(&self, p1: f64) -> Bundle {
        demand(p1, self.endowment_a(), self.par.alpha)
    }

    pub fn demand_b(&self, p1: f64) -> Bundle {
        demand(p1, self.endowment_b(), self.par.beta)
    }

    /// Total demand minus total endowment of each good.
    pub fn excess_demand(&self, p1: f64) -> ExcessDemand {
        let dem_a = self.demand_a(p1);
        let dem_b = self.demand_b(p1);
        ExcessDemand {
            eps1: dem_a.x1 + dem_b.x1 - 1.0,
            eps2: dem_a.x2 + dem_b.x2 - 1.0,
        }
    }

    /// Price of good 1 at which both markets clear.
    ///
    /// Bisects the excess demand of good 1, which falls as its price rises.
    /// By Walras' law the market of good 2 clears at the same price.
    pub fn clearing_price(&self, lo: f64, hi: f64, tol: f64) -> Result<f64> {
        if !(lo > 0.0 && lo < hi && hi.is_finite()) {
            bail!(SimError::InvalidConfig(format!(
                "price bracket must satisfy 0 < lo < hi, but is [{lo}, {hi}]"
            )));
        }
        if !(tol > 0.0) {
            bail!(SimError::InvalidConfig(format!(
                "tolerance must be positive, but is {tol}"
            )));
        }
        let eps_lo = self.excess_demand(lo).eps1;
        let eps_hi = self.excess_demand(hi).eps1;
        if eps_lo < 0.0 || eps_hi > 0.0 {
            bail!(SimError::NoSolution(format!(
                "excess demand does not change sign on [{lo}, {hi}]: {eps_lo} and {eps_hi}"
            )));
        }

        let (mut lo, mut hi) = (lo, hi);
        let mut n_iter = 0;
        while hi - lo > tol {
            if n_iter == MAX_BISECT_ITER {
                bail!(SimError::NoSolution(format!(
                    "bisection did not reach tolerance {tol} in {MAX_BISECT_ITER} iterations"
                )));
            }
            n_iter += 1;
            let mid = 0.5 * (lo + hi);
            if self.excess_demand(mid).eps1 > 0.0 {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Ok(0.5 * (lo + hi))
    }
}

fn cobb_douglas(x1: f64, x2: f64, weight: f64) -> f64 {
    x1.powf(weight) * x2.powf(1.0 - weight)
}

fn demand(p1: f64, endowment: Bundle, weight: f64) -> Bundle {
    let income = p1 * endowment.x1 + PRICE_2 * endowment.x2;
    Bundle {
        x1: weight * income / p1,
        x2: (1.0 - weight) * income / PRICE_2,
    }
}
