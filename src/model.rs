use crate::choice::Choice;
use ndarray::parallel::prelude::*;
use ndarray::{Array2, Array3, ArrayView1, ArrayViewMut1, ArrayViewMut2, Axis};

/// Results of one simulated year for the whole cohort.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// One-hot choice indicators (`agent x option x replicate`).
    pub choices: Array3<u8>,
    /// Subjective utility of the chosen option (`agent x replicate`).
    pub subj_utils: Array2<f64>,
    /// Realized utility of the chosen option (`agent x replicate`).
    pub real_utils: Array2<f64>,
}

/// Mutable view of the rows of one agent in an [`Outcome`].
pub struct OutcomeRow<'a> {
    pub choices: ArrayViewMut2<'a, u8>,
    pub subj_utils: ArrayViewMut1<'a, f64>,
    pub real_utils: ArrayViewMut1<'a, f64>,
}

impl OutcomeRow<'_> {
    pub fn clear(&mut self) {
        self.choices.fill(0);
        self.subj_utils.fill(0.0);
        self.real_utils.fill(0.0);
    }

    pub fn record(&mut self, i_rep: usize, choice: &Choice) {
        self.choices[[choice.opt, i_rep]] = 1;
        self.subj_utils[i_rep] = choice.subj_util;
        self.real_utils[i_rep] = choice.real_util;
    }
}

impl Outcome {
    pub fn zeros(n_agt: usize, n_opt: usize, n_rep: usize) -> Self {
        Self {
            choices: Array3::zeros((n_agt, n_opt, n_rep)),
            subj_utils: Array2::zeros((n_agt, n_rep)),
            real_utils: Array2::zeros((n_agt, n_rep)),
        }
    }

    pub fn n_agt(&self) -> usize {
        self.choices.len_of(Axis(0))
    }

    pub fn n_opt(&self) -> usize {
        self.choices.len_of(Axis(1))
    }

    pub fn n_rep(&self) -> usize {
        self.choices.len_of(Axis(2))
    }

    pub fn clear(&mut self) {
        self.choices.fill(0);
        self.subj_utils.fill(0.0);
        self.real_utils.fill(0.0);
    }

    /// Indicators of agent `i_agt` in replicate `i_rep`, one per option.
    pub fn indicators(&self, i_agt: usize, i_rep: usize) -> ArrayView1<'_, u8> {
        self.choices.slice(ndarray::s![i_agt, .., i_rep])
    }

    /// Option chosen by agent `i_agt` in replicate `i_rep`, if any.
    pub fn chosen(&self, i_agt: usize, i_rep: usize) -> Option<usize> {
        self.indicators(i_agt, i_rep).iter().position(|&ind| ind == 1)
    }

    /// Parallel iterator over the disjoint rows of every agent, in agent order.
    pub fn par_rows_mut(&mut self) -> impl IndexedParallelIterator<Item = OutcomeRow<'_>> {
        self.choices
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .zip(self.subj_utils.axis_iter_mut(Axis(0)))
            .zip(self.real_utils.axis_iter_mut(Axis(0)))
            .map(|((choices, subj_utils), real_utils)| OutcomeRow {
                choices,
                subj_utils,
                real_utils,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_written_in_agent_order() {
        let mut outcome = Outcome::zeros(3, 2, 4);
        outcome
            .par_rows_mut()
            .enumerate()
            .for_each(|(i_agt, mut row)| {
                let choice = Choice {
                    opt: i_agt % 2,
                    subj_util: i_agt as f64,
                    real_util: -(i_agt as f64),
                };
                row.record(1, &choice);
            });

        for i_agt in 0..3 {
            assert_eq!(outcome.chosen(i_agt, 1), Some(i_agt % 2));
            assert_eq!(outcome.chosen(i_agt, 0), None);
            assert_eq!(outcome.subj_utils[[i_agt, 1]], i_agt as f64);
            assert_eq!(outcome.real_utils[[i_agt, 1]], -(i_agt as f64));
        }
    }

    #[test]
    fn clear_resets_row() {
        let mut outcome = Outcome::zeros(1, 2, 2);
        outcome.choices[[0, 1, 0]] = 1;
        outcome.subj_utils[[0, 0]] = 2.0;
        outcome.par_rows_mut().for_each(|mut row| row.clear());
        assert_eq!(outcome, Outcome::zeros(1, 2, 2));
    }
}
