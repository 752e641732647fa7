use crate::choice::argmax;
use crate::config::SimConfig;
use crate::engine::{StepSeed, agent_rng, master_rng};
use crate::sampler::NoiseSampler;
use crate::stats::Accumulator;
use anyhow::{Context, Result};
use ndarray::{Array1, Array2, ArrayView1};
use rand::prelude::*;
use rand_chacha::ChaCha12Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Single-year career choice driven only by peer information.
///
/// Agent `i` averages `i + 1` peer observations per option and picks the
/// option with the highest resulting belief. There is no private noise in
/// the belief and no second year. The switching cost of the configuration
/// is ignored.
pub struct Baseline {
    cfg: SimConfig,
    utils: Array1<f64>,
    sampler: NoiseSampler,
    rng: ChaCha12Rng,
    choice_shares: Array2<f64>,
    exp_utils: Array1<f64>,
    real_utils: Array1<f64>,
}

struct AgentSummary {
    counts: Vec<usize>,
    exp_util: Accumulator,
    real_util: Accumulator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineReport {
    pub n_peers: usize,
    pub choice_shares: Vec<f64>,
    pub exp_util: f64,
    pub real_util: f64,
}

impl Baseline {
    pub fn new(cfg: SimConfig) -> Result<Self> {
        cfg.validate().context("failed to validate config")?;

        let sampler = NoiseSampler::new(cfg.std_dev)?;
        let rng = master_rng(cfg.seed);
        let utils = Array1::from(cfg.utils.clone());

        Ok(Self {
            utils,
            sampler,
            rng,
            choice_shares: Array2::zeros((cfg.n_agt, cfg.n_opt)),
            exp_utils: Array1::zeros(cfg.n_agt),
            real_utils: Array1::zeros(cfg.n_agt),
            cfg,
        })
    }

    pub fn cfg(&self) -> &SimConfig {
        &self.cfg
    }

    /// Simulate every agent and overwrite the stored averages.
    pub fn simulate(&mut self) {
        let start = Instant::now();
        let seed: StepSeed = self.rng.random();

        let sampler = self.sampler;
        let utils = self.utils.view();
        let n_rep = self.cfg.n_rep;

        let summaries: Vec<_> = (0..self.cfg.n_agt)
            .into_par_iter()
            .map(|i_agt| {
                let mut rng = agent_rng(seed, i_agt);
                simulate_agent(&sampler, &mut rng, utils, i_agt + 1, n_rep)
            })
            .collect();

        for (i_agt, summary) in summaries.into_iter().enumerate() {
            for (i_opt, &count) in summary.counts.iter().enumerate() {
                self.choice_shares[[i_agt, i_opt]] = count as f64 / n_rep as f64;
            }
            self.exp_utils[i_agt] = summary.exp_util.report().mean;
            self.real_utils[i_agt] = summary.real_util.report().mean;
        }

        log::info!(
            "simulated baseline of {} agents x {} replicates in {:.3?}",
            self.cfg.n_agt,
            n_rep,
            start.elapsed()
        );
    }

    /// Share of replicates choosing each option (`agent x option`).
    pub fn choice_shares(&self) -> &Array2<f64> {
        &self.choice_shares
    }

    /// Mean belief about the chosen option.
    pub fn exp_utils(&self) -> &Array1<f64> {
        &self.exp_utils
    }

    /// Mean realized utility of the chosen option.
    pub fn real_utils(&self) -> &Array1<f64> {
        &self.real_utils
    }

    pub fn agent_reports(&self) -> Vec<BaselineReport> {
        (0..self.cfg.n_agt)
            .map(|i_agt| BaselineReport {
                n_peers: i_agt + 1,
                choice_shares: self.choice_shares.row(i_agt).to_vec(),
                exp_util: self.exp_utils[i_agt],
                real_util: self.real_utils[i_agt],
            })
            .collect()
    }
}

fn simulate_agent<R: Rng + ?Sized>(
    sampler: &NoiseSampler,
    rng: &mut R,
    utils: ArrayView1<f64>,
    n_peers: usize,
    n_rep: usize,
) -> AgentSummary {
    let n_opt = utils.len();
    let mut summary = AgentSummary {
        counts: vec![0; n_opt],
        exp_util: Accumulator::new(),
        real_util: Accumulator::new(),
    };

    for _ in 0..n_rep {
        let beliefs = &utils + &sampler.social_estimate(rng, n_peers, n_opt);
        let opt = argmax(beliefs.view());

        summary.counts[opt] += 1;
        summary.exp_util.add(beliefs[opt]);
        summary.real_util.add(utils[opt] + sampler.draw(rng));
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(std_dev: f64, seed: u64) -> SimConfig {
        SimConfig {
            n_agt: 5,
            n_rep: 4_000,
            std_dev,
            seed: Some(seed),
            ..SimConfig::default()
        }
    }

    #[test]
    fn unsimulated_results_are_zero() {
        let baseline = Baseline::new(cfg(2.0, 1)).unwrap();
        assert!(baseline.choice_shares().iter().all(|&x| x == 0.0));
        assert!(baseline.exp_utils().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn shares_sum_to_one() {
        let mut baseline = Baseline::new(cfg(2.0, 2)).unwrap();
        baseline.simulate();
        for row in baseline.choice_shares().rows() {
            assert!((row.sum() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn noiseless_agents_pick_best_option() {
        let mut baseline = Baseline::new(cfg(0.0, 3)).unwrap();
        baseline.simulate();
        for report in baseline.agent_reports() {
            assert_eq!(report.choice_shares, vec![0.0, 0.0, 1.0]);
            assert_eq!(report.exp_util, 3.0);
            assert_eq!(report.real_util, 3.0);
        }
    }

    #[test]
    fn more_peers_pick_best_option_more_often() {
        let mut baseline = Baseline::new(cfg(2.0, 4)).unwrap();
        baseline.simulate();
        let shares = baseline.choice_shares();
        assert!(shares[[4, 2]] > shares[[0, 2]], "{shares}");
        // Beliefs of the least informed agent are the most optimistic.
        assert!(baseline.exp_utils()[0] > baseline.exp_utils()[4]);
    }

    #[test]
    fn seeded_runs_are_identical() {
        let run = || {
            let mut baseline = Baseline::new(cfg(2.0, 5)).unwrap();
            baseline.simulate();
            baseline.agent_reports()
        };
        assert_eq!(run(), run());
    }
}
