use crate::model::Outcome;
use crate::stats::{Accumulator, AccumulatorReport};
use ndarray::{Array, Array1, Array2, ArrayView2, Axis, RemoveAxis};
use serde::{Deserialize, Serialize};

/// Per-agent averages of one simulated year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearSeries {
    choice_shares: Array2<f64>,
    subj_utils: Vec<AccumulatorReport>,
    real_utils: Vec<AccumulatorReport>,
}

impl YearSeries {
    pub fn new(outcome: &Outcome) -> Self {
        Self {
            choice_shares: mean_over_reps(&outcome.choices.mapv(f64::from), Axis(2)),
            subj_utils: summarize_rows(outcome.subj_utils.view()),
            real_utils: summarize_rows(outcome.real_utils.view()),
        }
    }

    /// Share of replicates choosing each option (`agent x option`).
    pub fn choice_shares(&self) -> &Array2<f64> {
        &self.choice_shares
    }

    pub fn subj_utils(&self) -> Array1<f64> {
        self.subj_utils.iter().map(|rep| rep.mean).collect()
    }

    pub fn real_utils(&self) -> Array1<f64> {
        self.real_utils.iter().map(|rep| rep.mean).collect()
    }

    /// Standard deviation of the subjective utility across replicates.
    pub fn subj_std_devs(&self) -> Array1<f64> {
        self.subj_utils.iter().map(|rep| rep.std_dev).collect()
    }

    /// Standard deviation of the realized utility across replicates.
    pub fn real_std_devs(&self) -> Array1<f64> {
        self.real_utils.iter().map(|rep| rep.std_dev).collect()
    }
}

/// Cohort-level expected outcomes of both years.
///
/// Index `i` of every series is the agent with `i + 1` peers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Averages {
    first_year: YearSeries,
    second_year: YearSeries,
    switch_shares: Array1<f64>,
}

impl Averages {
    pub fn new(first_year: &Outcome, second_year: &Outcome, switches: &Array2<u8>) -> Self {
        Self {
            first_year: YearSeries::new(first_year),
            second_year: YearSeries::new(second_year),
            switch_shares: mean_over_reps(&switches.mapv(f64::from), Axis(1)),
        }
    }

    pub fn first_year(&self) -> &YearSeries {
        &self.first_year
    }

    pub fn second_year(&self) -> &YearSeries {
        &self.second_year
    }

    /// Share of replicates in which each agent switched option.
    pub fn switch_shares(&self) -> &Array1<f64> {
        &self.switch_shares
    }

    /// One record per agent, in agent order.
    pub fn agent_reports(&self) -> Vec<AgentReport> {
        let n_agt = self.switch_shares.len();
        (0..n_agt)
            .map(|i_agt| AgentReport {
                n_peers: i_agt + 1,
                switch_share: self.switch_shares[i_agt],
                first_year: YearReport::new(&self.first_year, i_agt),
                second_year: YearReport::new(&self.second_year, i_agt),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearReport {
    pub choice_shares: Vec<f64>,
    pub subj_util: AccumulatorReport,
    pub real_util: AccumulatorReport,
}

impl YearReport {
    fn new(series: &YearSeries, i_agt: usize) -> Self {
        Self {
            choice_shares: series.choice_shares.row(i_agt).to_vec(),
            subj_util: series.subj_utils[i_agt],
            real_util: series.real_utils[i_agt],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentReport {
    pub n_peers: usize,
    pub switch_share: f64,
    pub first_year: YearReport,
    pub second_year: YearReport,
}

/// Mean along the replicate `axis`; zero when there are no replicates.
pub(crate) fn mean_over_reps<D: RemoveAxis>(
    arr: &Array<f64, D>,
    axis: Axis,
) -> Array<f64, D::Smaller> {
    let n_rep = arr.len_of(axis);
    let sum = arr.sum_axis(axis);
    if n_rep == 0 {
        return sum;
    }
    sum / n_rep as f64
}

fn summarize_rows(mat: ArrayView2<f64>) -> Vec<AccumulatorReport> {
    mat.rows()
        .into_iter()
        .map(|row| row.iter().copied().collect::<Accumulator>().report())
        .collect()
}
