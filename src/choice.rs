//! Decision rules of the career model.
//!
//! An agent sums its prior belief about each option with noise, picks the
//! option with the highest expected utility, and then experiences the
//! intrinsic utility of that option plus an independent outcome shock.

use crate::sampler::NoiseSampler;
use ndarray::ArrayView1;
use rand::Rng;

/// Outcome of one decision of one agent in one replicate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Choice {
    /// Index of the chosen option.
    pub opt: usize,
    /// Utility the agent expected from the chosen option.
    pub subj_util: f64,
    /// Utility the agent actually received.
    pub real_util: f64,
}

/// First-year decision that the second year revises.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prior {
    pub opt: usize,
    pub real_util: f64,
}

/// Index of the largest value; ties go to the lowest index.
///
/// Returns 0 for an empty view.
pub fn argmax(vals: ArrayView1<f64>) -> usize {
    let mut i_max = 0;
    let mut val_max = f64::NEG_INFINITY;
    for (i_val, &val) in vals.iter().enumerate() {
        if val > val_max {
            i_max = i_val;
            val_max = val;
        }
    }
    i_max
}

/// First-year choice of an agent with `n_peers` peer observations.
pub fn choose_first_year<R: Rng + ?Sized>(
    sampler: &NoiseSampler,
    rng: &mut R,
    utils: ArrayView1<f64>,
    n_peers: usize,
) -> Choice {
    let n_opt = utils.len();
    let social = sampler.social_estimate(rng, n_peers, n_opt);
    let indiv = sampler.draw_vec(rng, n_opt);

    let exp_utils = &utils + &social + &indiv;
    let opt = argmax(exp_utils.view());

    // The outcome shock is a new draw, independent of the belief above.
    let real_util = utils[opt] + sampler.draw(rng);

    Choice {
        opt,
        subj_util: exp_utils[opt],
        real_util,
    }
}

/// Second-year choice after experiencing the first-year option.
///
/// The agent trusts its own realized utility for the option it holds and
/// re-samples peer information for every other option, which it discounts
/// by `cost_switch`.
pub fn choose_second_year<R: Rng + ?Sized>(
    sampler: &NoiseSampler,
    rng: &mut R,
    utils: ArrayView1<f64>,
    n_peers: usize,
    prior: Prior,
    cost_switch: f64,
) -> Choice {
    let n_opt = utils.len();
    let social = sampler.social_estimate(rng, n_peers, n_opt);
    let indiv = sampler.draw_vec(rng, n_opt);

    let mut new_priors = &utils + &social - cost_switch;
    new_priors[prior.opt] = prior.real_util;

    let exp_utils = &new_priors + &indiv;
    let opt = argmax(exp_utils.view());

    let real_util = utils[opt] + sampler.draw(rng);

    Choice {
        opt,
        subj_util: new_priors[opt],
        real_util,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, array};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn argmax_breaks_ties_by_lowest_index() {
        assert_eq!(argmax(array![1.0, 3.0, 3.0, 2.0].view()), 1);
        assert_eq!(argmax(array![5.0, 5.0].view()), 0);
        assert_eq!(argmax(array![-2.0, -1.0].view()), 1);
    }

    #[test]
    fn noiseless_first_year_follows_utils() {
        let sampler = NoiseSampler::new(0.0).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(4);
        let utils = array![1.0, 2.0, 3.0];

        let choice = choose_first_year(&sampler, &mut rng, utils.view(), 3);
        assert_eq!(
            choice,
            Choice {
                opt: 2,
                subj_util: 3.0,
                real_util: 3.0
            }
        );
    }

    #[test]
    fn noiseless_second_year_keeps_experienced_option() {
        let sampler = NoiseSampler::new(0.0).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(5);
        let utils = array![1.0, 2.0, 3.0];

        // A good experience with option 0 outweighs option 2 once the cost applies.
        let prior = Prior {
            opt: 0,
            real_util: 2.5,
        };
        let choice = choose_second_year(&sampler, &mut rng, utils.view(), 1, prior, 1.0);
        assert_eq!(choice.opt, 0);
        assert_eq!(choice.subj_util, 2.5);
        assert_eq!(choice.real_util, 1.0);

        // Without a cost the better option wins.
        let choice = choose_second_year(&sampler, &mut rng, utils.view(), 1, prior, 0.0);
        assert_eq!(choice.opt, 2);
        assert_eq!(choice.subj_util, 3.0);
    }

    #[test]
    fn subjective_utility_is_the_maximum_belief() {
        let sampler = NoiseSampler::new(1.5).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(6);
        let utils = array![0.0, 0.5, 1.0];

        // Replaying the same stream reproduces the belief the choice was made on.
        for _ in 0..100 {
            let mut replay = rng.clone();
            let choice = choose_first_year(&sampler, &mut rng, utils.view(), 2);

            let social = sampler.social_estimate(&mut replay, 2, 3);
            let indiv = sampler.draw_vec(&mut replay, 3);
            let exp_utils: Array1<f64> = &utils + &social + &indiv;
            let max = exp_utils.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            assert_eq!(choice.subj_util, max);

            let shock = sampler.draw(&mut replay);
            assert_eq!(choice.real_util, utils[choice.opt] + shock);
        }
    }

    proptest! {
        #[test]
        fn argmax_is_first_maximum(vals in prop::collection::vec(-1e6f64..1e6, 1..16)) {
            let i_max = argmax(Array1::from(vals.clone()).view());
            let max = vals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert_eq!(vals[i_max], max);
            prop_assert!(vals[..i_max].iter().all(|&v| v < max));
        }
    }
}
