use anyhow::{Context, Result};
use careersim::analysis::AgentReport;
use careersim::baseline::{Baseline, BaselineReport};
use careersim::economy::exchange::{Bundle, ExchangeEconomy, ExchangeParams, ExcessDemand};
use careersim::economy::labor::{Allocation, LaborEconomy, LaborParams};
use careersim::{Config, Engine, SimConfig};
use serde::Serialize;
use std::path::Path;

const PRICE_BRACKET: (f64, f64) = (1e-3, 1e3);
const PRICE_TOL: f64 = 1e-12;

#[derive(Serialize)]
struct SwitchingReport<'a> {
    careers: &'a SimConfig,
    agents: Vec<AgentReport>,
}

#[derive(Serialize)]
struct BaselineSummary<'a> {
    careers: &'a SimConfig,
    agents: Vec<BaselineReport>,
}

#[derive(Serialize)]
struct ExchangeReport<'a> {
    clearing_price: f64,
    exchange: &'a ExchangeParams,
    demand_a: Bundle,
    demand_b: Bundle,
    excess_demand: ExcessDemand,
}

#[derive(Serialize)]
struct TaxReport<'a> {
    labor: &'a LaborParams,
    optimum: Allocation,
}

pub struct Manager {
    cfg: Config,
}

impl Manager {
    pub fn new<P: AsRef<Path>>(config_file: P, seed: Option<u64>) -> Result<Self> {
        let mut cfg = Config::from_file(config_file).context("failed to construct cfg")?;
        if seed.is_some() {
            cfg.careers.seed = seed;
        }
        log::info!("{cfg:#?}");

        Ok(Self { cfg })
    }

    pub fn run_switching(&self) -> Result<String> {
        let averages = Engine::run(self.cfg.careers.clone()).context("failed to run engine")?;
        let report = SwitchingReport {
            careers: &self.cfg.careers,
            agents: averages.agent_reports(),
        };
        toml::to_string(&report).context("failed to serialize report")
    }

    pub fn run_baseline(&self) -> Result<String> {
        let mut baseline =
            Baseline::new(self.cfg.careers.clone()).context("failed to construct baseline")?;
        baseline.simulate();
        let report = BaselineSummary {
            careers: &self.cfg.careers,
            agents: baseline.agent_reports(),
        };
        toml::to_string(&report).context("failed to serialize report")
    }

    pub fn run_exchange(&self) -> Result<String> {
        let econ = ExchangeEconomy::new(self.cfg.exchange.clone())?;
        let (lo, hi) = PRICE_BRACKET;
        let p1 = econ
            .clearing_price(lo, hi, PRICE_TOL)
            .context("failed to find clearing price")?;
        log::info!("market clears at p1 = {p1:.9}");

        let report = ExchangeReport {
            clearing_price: p1,
            exchange: econ.params(),
            demand_a: econ.demand_a(p1),
            demand_b: econ.demand_b(p1),
            excess_demand: econ.excess_demand(p1),
        };
        toml::to_string(&report).context("failed to serialize report")
    }

    pub fn run_tax(&self) -> Result<String> {
        let econ = LaborEconomy::new(self.cfg.labor.clone())?;
        let optimum = econ.optimal_tax().context("failed to find optimal tax")?;
        let report = TaxReport {
            labor: econ.params(),
            optimum,
        };
        toml::to_string(&report).context("failed to serialize report")
    }
}
