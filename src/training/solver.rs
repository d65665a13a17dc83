//! Damped Gauss-Newton (Levenberg-Marquardt) least squares.

use tracing::debug;

use crate::pastel::{PastelError, PastelResult};

/// Stopping rules for [`least_squares`].
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOptions {
    pub max_iterations: usize,
    /// Stop when the relative cost decrease falls below this.
    pub ftol: f64,
    /// Stop when the relative step size falls below this.
    pub xtol: f64,
    /// Stop when the largest gradient component falls below this.
    pub gtol: f64,
    /// Starting damping factor.
    pub initial_lambda: f64,
    /// Relative forward-difference step for the Jacobian.
    pub diff_step: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            ftol: 1e-10,
            xtol: 1e-10,
            gtol: 1e-10,
            initial_lambda: 1e-3,
            diff_step: 1e-7,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolverReport {
    /// Solution.
    pub x: Vec<f64>,
    /// Half the sum of squared residuals at `x`.
    pub cost: f64,
    pub iterations: usize,
    /// `false` when the iteration budget ran out first.
    pub converged: bool,
}

const MAX_LAMBDA: f64 = 1e16;
const MIN_LAMBDA: f64 = 1e-16;

fn half_squared_norm(r: &[f64]) -> f64 {
    0.5 * r.iter().map(|v| v * v).sum::<f64>()
}

fn checked<F>(residuals: &F, x: &[f64]) -> PastelResult<Vec<f64>>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let r = residuals(x);
    if r.iter().any(|v| !v.is_finite()) {
        return Err(PastelError::Solver {
            reason: "residual function returned a non-finite value".to_string(),
        });
    }
    Ok(r)
}

/// Forward-difference Jacobian, `m x n`.
fn jacobian<F>(residuals: &F, x: &[f64], r0: &[f64], diff_step: f64) -> PastelResult<Vec<Vec<f64>>>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let mut jac = vec![vec![0.0; x.len()]; r0.len()];
    let mut shifted = x.to_vec();
    for j in 0..x.len() {
        let h = diff_step * x[j].abs().max(1.0);
        shifted[j] = x[j] + h;
        let r = checked(residuals, &shifted)?;
        for (row, (ri, r0i)) in jac.iter_mut().zip(r.iter().zip(r0)) {
            row[j] = (ri - r0i) / h;
        }
        shifted[j] = x[j];
    }
    Ok(jac)
}

/// Solves `a · x = b` by Gaussian elimination with partial pivoting.
pub fn solve_linear_system(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &k| a[i][col].abs().total_cmp(&a[k][col].abs()))?;
        if a[pivot][col].abs() < 1e-300 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);
        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    x.iter().all(|v| v.is_finite()).then_some(x)
}

/// Minimizes `0.5 * ||residuals(x)||²` starting from `x0`.
///
/// Each step solves `(JᵀJ + λ·diag(JᵀJ)) δ = -Jᵀr`; λ shrinks after an accepted step and
/// grows after a rejected one, so the cost never increases.
pub fn least_squares<F>(residuals: F, x0: &[f64], options: &SolverOptions) -> PastelResult<SolverReport>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    if x0.is_empty() {
        return Err(PastelError::Solver {
            reason: "no parameters to solve for".to_string(),
        });
    }
    let n = x0.len();
    let mut x = x0.to_vec();
    let mut r = checked(&residuals, &x)?;
    let mut cost = half_squared_norm(&r);
    let mut lambda = options.initial_lambda;
    let mut converged = false;
    let mut iterations = 0;

    while iterations < options.max_iterations && !converged {
        iterations += 1;
        let jac = jacobian(&residuals, &x, &r, options.diff_step)?;

        let mut jtj = vec![vec![0.0; n]; n];
        let mut gradient = vec![0.0; n];
        for (row, ri) in jac.iter().zip(&r) {
            for i in 0..n {
                gradient[i] += row[i] * ri;
                for k in 0..n {
                    jtj[i][k] += row[i] * row[k];
                }
            }
        }
        if gradient.iter().all(|g| g.abs() <= options.gtol) {
            converged = true;
            break;
        }

        loop {
            let mut damped = jtj.clone();
            for (i, row) in damped.iter_mut().enumerate() {
                row[i] += lambda * jtj[i][i].max(1e-12);
            }
            let rhs: Vec<f64> = gradient.iter().map(|g| -g).collect();

            let Some(step) = solve_linear_system(damped, rhs) else {
                lambda *= 10.0;
                if lambda > MAX_LAMBDA {
                    return Err(PastelError::Solver {
                        reason: "normal equations are singular".to_string(),
                    });
                }
                continue;
            };

            let candidate: Vec<f64> = x.iter().zip(&step).map(|(xi, di)| xi + di).collect();
            let r_new = checked(&residuals, &candidate)?;
            let cost_new = half_squared_norm(&r_new);

            if cost_new < cost {
                let step_norm = step.iter().map(|d| d * d).sum::<f64>().sqrt();
                let x_norm = x.iter().map(|v| v * v).sum::<f64>().sqrt();
                let small_step = step_norm <= options.xtol * (options.xtol + x_norm);
                let small_gain = cost - cost_new <= options.ftol * cost;

                x = candidate;
                r = r_new;
                cost = cost_new;
                lambda = (lambda / 10.0).max(MIN_LAMBDA);
                converged = small_step || small_gain;
                break;
            }

            lambda *= 10.0;
            if lambda > MAX_LAMBDA {
                // no downhill step left at machine precision
                converged = true;
                break;
            }
        }
    }

    debug!(iterations, cost, converged, "Least-squares solve finished");
    Ok(SolverReport {
        x,
        cost,
        iterations,
        converged,
    })
}
