use crate::analysis::Averages;
use crate::choice::{Prior, choose_first_year, choose_second_year};
use crate::config::SimConfig;
use crate::error::SimError;
use crate::model::Outcome;
use crate::sampler::NoiseSampler;
use anyhow::{Context, Result};
use ndarray::parallel::prelude::*;
use ndarray::{Array1, Array2, Axis};
use rand::prelude::*;
use rand_chacha::ChaCha12Rng;
use std::time::Instant;

/// Progress of an [`Engine`] through the two simulated years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Constructed,
    FirstYear,
    SecondYear,
}

/// Seed shared by all agents of one simulation step.
///
/// Agent `i` draws from the ChaCha stream `i` of this seed, so results do
/// not depend on how agents are scheduled across threads.
pub(crate) type StepSeed = <ChaCha12Rng as SeedableRng>::Seed;

pub(crate) fn agent_rng(seed: StepSeed, i_agt: usize) -> ChaCha12Rng {
    let mut rng = ChaCha12Rng::from_seed(seed);
    rng.set_stream(i_agt as u64);
    rng
}

pub(crate) fn master_rng(seed: Option<u64>) -> ChaCha12Rng {
    match seed {
        Some(seed) => ChaCha12Rng::seed_from_u64(seed),
        None => ChaCha12Rng::from_rng(&mut rand::rng()),
    }
}

/// Career-choice simulation with belief revision and switching costs.
///
/// Agent `i` of the cohort observes `i + 1` peers. The first year is a
/// noisy choice among the options, the second year revises it against the
/// experienced utility and a cost for switching. Results are stored as
/// dense arrays and reduced on demand by [`Engine::calculate_averages`].
pub struct Engine {
    cfg: SimConfig,
    utils: Array1<f64>,
    sampler: NoiseSampler,
    rng: ChaCha12Rng,
    stage: Stage,
    first_year: Outcome,
    second_year: Outcome,
    switches: Array2<u8>,
}

impl Engine {
    /// Create an `Engine` with zero-filled results.
    ///
    /// # Errors
    /// Fails with [`SimError::InvalidConfig`] as root cause if the
    /// configuration is invalid.
    pub fn new(cfg: SimConfig) -> Result<Self> {
        cfg.validate().context("failed to validate config")?;

        let sampler = NoiseSampler::new(cfg.std_dev)?;
        let rng = master_rng(cfg.seed);
        let utils = Array1::from(cfg.utils.clone());

        let (n_agt, n_opt, n_rep) = (cfg.n_agt, cfg.n_opt, cfg.n_rep);
        Ok(Self {
            utils,
            sampler,
            rng,
            stage: Stage::Constructed,
            first_year: Outcome::zeros(n_agt, n_opt, n_rep),
            second_year: Outcome::zeros(n_agt, n_opt, n_rep),
            switches: Array2::zeros((n_agt, n_rep)),
            cfg,
        })
    }

    /// Simulate both years and return the cohort averages.
    pub fn run(cfg: SimConfig) -> Result<Averages> {
        let mut engine = Engine::new(cfg).context("failed to construct engine")?;
        engine
            .simulate_year_one()
            .context("failed to simulate first year")?;
        engine
            .simulate_year_two()
            .context("failed to simulate second year")?;
        Ok(engine.calculate_averages())
    }

    pub fn cfg(&self) -> &SimConfig {
        &self.cfg
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn first_year(&self) -> &Outcome {
        &self.first_year
    }

    pub fn second_year(&self) -> &Outcome {
        &self.second_year
    }

    /// Switch indicators (`agent x replicate`).
    pub fn switches(&self) -> &Array2<u8> {
        &self.switches
    }

    /// Simulate the first-year choice of every agent in every replicate.
    ///
    /// Overwrites previous first-year results and discards any second year.
    pub fn simulate_year_one(&mut self) -> Result<()> {
        let start = Instant::now();
        let seed: StepSeed = self.rng.random();

        let sampler = self.sampler;
        let utils = self.utils.view();
        let n_rep = self.cfg.n_rep;

        self.first_year
            .par_rows_mut()
            .enumerate()
            .for_each(|(i_agt, mut row)| {
                let mut rng = agent_rng(seed, i_agt);
                let n_peers = i_agt + 1;

                row.clear();
                for i_rep in 0..n_rep {
                    let choice = choose_first_year(&sampler, &mut rng, utils, n_peers);
                    row.record(i_rep, &choice);
                }
                log::debug!("agent {i_agt} completed first year");
            });

        self.second_year.clear();
        self.switches.fill(0);
        self.stage = Stage::FirstYear;

        log::info!(
            "simulated first year of {} agents x {} replicates in {:.3?}",
            self.cfg.n_agt,
            n_rep,
            start.elapsed()
        );
        Ok(())
    }

    /// Simulate the second-year revision of every first-year choice.
    ///
    /// # Errors
    /// Fails with [`SimError::OutOfOrder`] if the first year has not been
    /// simulated.
    pub fn simulate_year_two(&mut self) -> Result<()> {
        if self.stage == Stage::Constructed {
            return Err(SimError::OutOfOrder {
                step: "simulate_year_two",
                requires: "the first year",
            }
            .into());
        }

        let start = Instant::now();
        let seed: StepSeed = self.rng.random();

        let sampler = self.sampler;
        let utils = self.utils.view();
        let n_rep = self.cfg.n_rep;
        let cost_switch = self.cfg.cost_switch;
        let first_year = &self.first_year;

        self.second_year
            .par_rows_mut()
            .zip(self.switches.axis_iter_mut(Axis(0)))
            .enumerate()
            .try_for_each(|(i_agt, (mut row, mut switch_row))| -> Result<()> {
                let mut rng = agent_rng(seed, i_agt);
                let n_peers = i_agt + 1;

                row.clear();
                switch_row.fill(0);
                for i_rep in 0..n_rep {
                    let opt = first_year.chosen(i_agt, i_rep).with_context(|| {
                        format!("agent {i_agt} has no first-year choice in replicate {i_rep}")
                    })?;
                    let prior = Prior {
                        opt,
                        real_util: first_year.real_utils[[i_agt, i_rep]],
                    };

                    let choice = choose_second_year(
                        &sampler,
                        &mut rng,
                        utils,
                        n_peers,
                        prior,
                        cost_switch,
                    );
                    row.record(i_rep, &choice);
                    if choice.opt != prior.opt {
                        switch_row[i_rep] = 1;
                    }
                }
                log::debug!("agent {i_agt} completed second year");
                Ok(())
            })?;

        self.stage = Stage::SecondYear;

        log::info!(
            "simulated second year of {} agents x {} replicates in {:.3?}",
            self.cfg.n_agt,
            n_rep,
            start.elapsed()
        );
        Ok(())
    }

    /// Average every result over the replicate axis.
    ///
    /// Years that have not been simulated average to zero.
    pub fn calculate_averages(&self) -> Averages {
        Averages::new(&self.first_year, &self.second_year, &self.switches)
    }
}
