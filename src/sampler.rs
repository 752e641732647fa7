use crate::config::check_num;
use anyhow::{Context, Result};
use ndarray::{Array1, Array2, Axis};
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Source of the normal(0, `std_dev`) noise terms of the career model.
///
/// Every call consumes fresh samples from the given generator, so draws are
/// independent across calls. A zero standard deviation yields zero noise.
#[derive(Debug, Clone, Copy)]
pub struct NoiseSampler {
    dist: Normal<f64>,
}

impl NoiseSampler {
    /// # Errors
    /// Fails with [`SimError::InvalidConfig`](crate::error::SimError) as
    /// root cause if `std_dev` is negative or not finite.
    pub fn new(std_dev: f64) -> Result<Self> {
        check_num(std_dev, 0.0..=f64::MAX).context("invalid noise standard deviation")?;
        let dist = Normal::new(0.0, std_dev)
            .with_context(|| format!("invalid noise standard deviation {std_dev}"))?;
        Ok(Self { dist })
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.dist.sample(rng)
    }

    /// Draw one individual noise term per option.
    pub fn draw_vec<R: Rng + ?Sized>(&self, rng: &mut R, n_opt: usize) -> Array1<f64> {
        Array1::from_shape_simple_fn(n_opt, || self.dist.sample(rng))
    }

    /// Draw a `n_peers x n_opt` matrix of peer observations, row by row.
    pub fn draw_mat<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        n_peers: usize,
        n_opt: usize,
    ) -> Array2<f64> {
        Array2::from_shape_simple_fn((n_peers, n_opt), || self.dist.sample(rng))
    }

    /// Average `n_peers` peer observations into one noise estimate per option.
    ///
    /// `n_peers` must be at least 1.
    pub fn social_estimate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        n_peers: usize,
        n_opt: usize,
    ) -> Array1<f64> {
        self.draw_mat(rng, n_peers, n_opt).sum_axis(Axis(0)) / n_peers as f64
    }
}
