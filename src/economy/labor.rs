//! Labor supply of a representative consumer facing two profit-maximizing
//! firms, and the tax on good 2 that maximizes social welfare.
//!
//! Tax revenue is returned to the consumer as a lump-sum transfer, so the
//! transfer and the consumption it finances are solved jointly.

use crate::config::{check_num, check_open};
use crate::economy::optimize::maximize_bounded;
use crate::error::SimError;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

const LABOR_TOL: f64 = 1e-11;
const TAX_TOL: f64 = 1e-7;
const TRANSFER_TOL: f64 = 1e-9;
const MAX_TRANSFER_ITER: usize = 1_000;

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LaborParams {
    /// Wage (numeraire).
    pub wage: f64,
    /// Total factor productivity of both firms.
    pub tfp: f64,
    /// Output elasticity of labor.
    pub gamma: f64,

    /// Cobb-Douglas weight of good 1.
    pub alpha: f64,
    /// Disutility of labor.
    pub nu: f64,
    /// Inverse Frisch elasticity of labor supply.
    pub epsilon: f64,
    /// Social cost of each unit of good 2 consumed.
    pub kappa: f64,

    pub price_1: f64,
    pub price_2: f64,

    /// Upper bound of the labor search.
    pub labor_max: f64,
    /// Upper bound of the tax search.
    pub tau_max: f64,
}

impl Default for LaborParams {
    fn default() -> Self {
        Self {
            wage: 1.0,
            tfp: 1.0,
            gamma: 0.5,
            alpha: 0.3,
            nu: 1.0,
            epsilon: 2.0,
            kappa: 0.1,
            price_1: 1.0,
            price_2: 1.0,
            labor_max: 100.0,
            tau_max: 2.0,
        }
    }
}

impl LaborParams {
    pub fn validate(&self) -> Result<()> {
        let pos = f64::MIN_POSITIVE..=f64::MAX;
        check_num(self.wage, pos.clone()).context("invalid wage")?;
        check_num(self.tfp, pos.clone()).context("invalid total factor productivity")?;
        check_open(self.gamma, 0.0, 1.0).context("invalid output elasticity")?;
        check_open(self.alpha, 0.0, 1.0).context("invalid consumption weight")?;
        check_num(self.nu, pos.clone()).context("invalid disutility of labor")?;
        check_num(self.epsilon, pos.clone()).context("invalid labor elasticity")?;
        check_num(self.kappa, 0.0..=f64::MAX).context("invalid social cost")?;
        check_num(self.price_1, pos.clone()).context("invalid price of good 1")?;
        check_num(self.price_2, pos.clone()).context("invalid price of good 2")?;
        check_num(self.labor_max, pos.clone()).context("invalid labor bound")?;
        check_num(self.tau_max, pos).context("invalid tax bound")?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Consumption {
    pub c1: f64,
    pub c2: f64,
}

/// Household decisions and welfare at a given tax.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub tau: f64,
    pub transfer: f64,
    pub labor: f64,
    pub c1: f64,
    pub c2: f64,
    pub utility: f64,
    pub welfare: f64,
}

pub struct LaborEconomy {
    par: LaborParams,
}

impl LaborEconomy {
    pub fn new(par: LaborParams) -> Result<Self> {
        par.validate().context("failed to validate labor parameters")?;
        Ok(Self { par })
    }

    pub fn params(&self) -> &LaborParams {
        &self.par
    }

    /// Profit-maximizing labor demand of a firm selling at `price`.
    pub fn firm_labor(&self, price: f64) -> f64 {
        let LaborParams {
            wage, tfp, gamma, ..
        } = self.par;
        (price * tfp * gamma / wage).powf(1.0 / (1.0 - gamma))
    }

    pub fn firm_output(&self, labor: f64) -> f64 {
        self.par.tfp * labor.powf(self.par.gamma)
    }

    pub fn firm_profit(&self, price: f64) -> f64 {
        let LaborParams { wage, gamma, .. } = self.par;
        (1.0 - gamma) / gamma * wage * self.firm_labor(price)
    }

    /// Profits of both firms, owned by the consumer.
    pub fn profits(&self) -> f64 {
        self.firm_profit(self.par.price_1) + self.firm_profit(self.par.price_2)
    }

    pub fn income(&self, labor: f64, transfer: f64) -> f64 {
        self.par.wage * labor + transfer + self.profits()
    }

    pub fn consumption(&self, labor: f64, transfer: f64, tau: f64) -> Consumption {
        let income = self.income(labor, transfer);
        Consumption {
            c1: self.par.alpha * income / self.par.price_1,
            c2: (1.0 - self.par.alpha) * income / (self.par.price_2 + tau),
        }
    }

    pub fn utility(&self, labor: f64, cons: Consumption) -> f64 {
        let LaborParams {
            alpha, nu, epsilon, ..
        } = self.par;
        alpha * cons.c1.ln() + (1.0 - alpha) * cons.c2.ln()
            - nu * labor.powf(1.0 + epsilon) / (1.0 + epsilon)
    }

    /// Utility-maximizing labor supply given a transfer and a tax.
    pub fn optimal_labor(&self, transfer: f64, tau: f64) -> Result<f64> {
        let max = maximize_bounded(
            |labor| self.utility(labor, self.consumption(labor, transfer, tau)),
            0.0,
            self.par.labor_max,
            LABOR_TOL,
        )
        .context("failed to maximize utility")?;
        Ok(max.x)
    }

    /// Allocation at which the transfer equals the revenue of the tax `tau`.
    pub fn equilibrium(&self, tau: f64) -> Result<Allocation> {
        let mut transfer = 0.0;
        for _ in 0..MAX_TRANSFER_ITER {
            let labor = self.optimal_labor(transfer, tau)?;
            let cons = self.consumption(labor, transfer, tau);

            let revenue = tau * cons.c2;
            if (revenue - transfer).abs() < TRANSFER_TOL {
                let utility = self.utility(labor, cons);
                return Ok(Allocation {
                    tau,
                    transfer: revenue,
                    labor,
                    c1: cons.c1,
                    c2: cons.c2,
                    utility,
                    welfare: utility - self.par.kappa * cons.c2,
                });
            }
            transfer = revenue;
        }
        bail!(SimError::NoSolution(format!(
            "transfer did not converge in {MAX_TRANSFER_ITER} iterations at tau = {tau}"
        )))
    }

    pub fn social_welfare(&self, tau: f64) -> Result<f64> {
        Ok(self.equilibrium(tau)?.welfare)
    }

    /// Tax on good 2 that maximizes social welfare on `[0, tau_max]`.
    pub fn optimal_tax(&self) -> Result<Allocation> {
        let mut failure = None;
        let max = maximize_bounded(
            |tau| match self.social_welfare(tau) {
                Ok(welfare) => welfare,
                Err(err) => {
                    failure.get_or_insert(err);
                    f64::NAN
                }
            },
            0.0,
            self.par.tau_max,
            TAX_TOL,
        )?;
        if let Some(err) = failure {
            return Err(err.context("failed to evaluate social welfare"));
        }

        let alloc = self.equilibrium(max.x)?;
        log::info!(
            "optimal tax {:.6} with transfer {:.6} and welfare {:.6}",
            alloc.tau,
            alloc.transfer,
            alloc.welfare
        );
        Ok(alloc)
    }
}
