use crate::error::SimError;
use anyhow::{Result, bail};

/// `(sqrt(5) - 1) / 2`
const INV_PHI: f64 = 0.618_033_988_749_894_9;

const MAX_ITER: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minimum {
    pub x: f64,
    pub fx: f64,
}

/// Minimize a unimodal function on `[lo, hi]` by golden-section search.
///
/// Stops once the bracket is narrower than `tol` and returns its midpoint.
pub fn minimize_bounded<F>(mut f: F, lo: f64, hi: f64, tol: f64) -> Result<Minimum>
where
    F: FnMut(f64) -> f64,
{
    if !(lo.is_finite() && hi.is_finite() && lo < hi) {
        bail!(SimError::InvalidConfig(format!(
            "bounds must be finite with lo < hi, but are [{lo}, {hi}]"
        )));
    }
    if !(tol > 0.0) {
        bail!(SimError::InvalidConfig(format!(
            "tolerance must be positive, but is {tol}"
        )));
    }

    let (mut a, mut b) = (lo, hi);
    let mut c = b - INV_PHI * (b - a);
    let mut d = a + INV_PHI * (b - a);
    let mut fc = f(c);
    let mut fd = f(d);

    let mut n_iter = 0;
    while b - a > tol {
        if n_iter == MAX_ITER {
            bail!(SimError::NoSolution(format!(
                "golden-section search did not converge in {MAX_ITER} iterations"
            )));
        }
        if fc < fd {
            b = d;
            d = c;
            fd = fc;
            c = b - INV_PHI * (b - a);
            fc = f(c);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + INV_PHI * (b - a);
            fd = f(d);
        }
        n_iter += 1;
    }

    let x = 0.5 * (a + b);
    Ok(Minimum { x, fx: f(x) })
}

/// Maximize a unimodal function on `[lo, hi]`.
pub fn maximize_bounded<F>(mut f: F, lo: f64, hi: f64, tol: f64) -> Result<Minimum>
where
    F: FnMut(f64) -> f64,
{
    let min = minimize_bounded(|x| -f(x), lo, hi, tol)?;
    Ok(Minimum {
        x: min.x,
        fx: -min.fx,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_parabola_vertex() {
        let min = minimize_bounded(|x| (x - 1.3).powi(2) + 0.5, -4.0, 9.0, 1e-10).unwrap();
        assert!((min.x - 1.3).abs() < 1e-8);
        assert!((min.fx - 0.5).abs() < 1e-12);
    }

    #[test]
    fn stops_at_boundary_of_monotone_function() {
        let min = minimize_bounded(|x| x, 2.0, 3.0, 1e-9).unwrap();
        assert!((min.x - 2.0).abs() < 1e-8);
    }

    #[test]
    fn maximizes() {
        let max = maximize_bounded(|x| x.ln() - x, 0.01, 10.0, 1e-10).unwrap();
        assert!((max.x - 1.0).abs() < 1e-7);
        assert!((max.fx + 1.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_bounds() {
        assert!(minimize_bounded(|x| x, 1.0, 1.0, 1e-6).is_err());
        assert!(minimize_bounded(|x| x, 0.0, f64::INFINITY, 1e-6).is_err());
        assert!(minimize_bounded(|x| x, 0.0, 1.0, 0.0).is_err());
    }
}
