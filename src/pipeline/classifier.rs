//! L2-regularised logistic regression with class-balanced sample weights
//!
//! Minimises `0.5 * ||w||^2 + C * sum_i s_i * logloss(y_i, sigmoid(x_i . w + b))`
//! with damped Newton steps. The intercept `b` is not penalised.
//! Starting from zero with no randomness, so identical data always yields
//! identical coefficients.

use anyhow::{anyhow, Result};
use faer::prelude::*;
use faer::{Mat, Side};
use serde::{Deserialize, Serialize};

/// Diagonal jitter on the unpenalised intercept term
const INTERCEPT_RIDGE: f64 = 1e-10;

/// Maximum step halvings during the backtracking line search
const MAX_HALVINGS: usize = 40;

/// Sample weighting policy for the two classes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassWeight {
    /// Every row weighs 1
    None,
    /// Rows weigh `n / (2 * n_class)`, so the rarer class counts more
    #[default]
    Balanced,
}

impl std::str::FromStr for ClassWeight {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(ClassWeight::None),
            "balanced" => Ok(ClassWeight::Balanced),
            _ => Err(format!("Unknown class weight: '{}'. Use 'none' or 'balanced'.", s)),
        }
    }
}

/// Solver configuration
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    /// Inverse regularisation strength
    pub c: f64,
    /// Iteration budget for the Newton solver
    pub max_iter: usize,
    /// Stop once the largest gradient component or step falls below this
    pub tol: f64,
    pub class_weight: ClassWeight,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 1000,
            tol: 1e-6,
            class_weight: ClassWeight::Balanced,
        }
    }
}

/// Learned coefficients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

/// How the solver finished
#[derive(Debug, Clone, Copy)]
pub struct SolverStats {
    pub iterations: usize,
    pub converged: bool,
    pub objective: f64,
}

impl LogisticRegression {
    /// Fit on design matrix `x` (rows are samples) and 0/1 target `y`
    pub fn fit(&self, x: &Mat<f64>, y: &[i32]) -> Result<(LogisticModel, SolverStats)> {
        let n = x.nrows();
        let d = x.ncols();

        if n != y.len() {
            anyhow::bail!("Design matrix has {} rows but target has {} values", n, y.len());
        }
        if !(self.c > 0.0) {
            anyhow::bail!("C must be positive, got {}", self.c);
        }

        let weights = class_weights(y, self.class_weight)?;
        let yf: Vec<f64> = y.iter().map(|&t| f64::from(t)).collect();

        // beta[..d] are coefficients, beta[d] is the intercept
        let mut beta = vec![0.0; d + 1];
        let mut loss = objective(x, &yf, &weights, &beta, self.c);
        let mut converged = false;
        let mut iterations = 0;

        while iterations < self.max_iter {
            iterations += 1;

            let mut grad = Mat::<f64>::zeros(d + 1, 1);
            let mut xs = Mat::<f64>::zeros(n, d + 1);

            for i in 0..n {
                let p = sigmoid(linear(x, i, &beta));
                let cw = self.c * weights[i];
                let r = cw * (p - yf[i]);
                let h = (cw * p * (1.0 - p)).sqrt();
                for j in 0..d {
                    let v = x[(i, j)];
                    grad[(j, 0)] += r * v;
                    xs[(i, j)] = h * v;
                }
                grad[(d, 0)] += r;
                xs[(i, d)] = h;
            }
            for j in 0..d {
                grad[(j, 0)] += beta[j];
            }

            let grad_max = (0..=d).map(|j| grad[(j, 0)].abs()).fold(0.0, f64::max);
            if grad_max <= self.tol {
                converged = true;
                break;
            }

            let mut hessian = xs.transpose() * &xs;
            for j in 0..d {
                hessian[(j, j)] += 1.0;
            }
            hessian[(d, d)] += INTERCEPT_RIDGE;

            let llt = hessian
                .cholesky(Side::Lower)
                .map_err(|e| anyhow!("Hessian is not positive definite: {:?}", e))?;
            let step = llt.solve(&grad);

            let mut t = 1.0;
            let mut accepted = None;
            for _ in 0..MAX_HALVINGS {
                let candidate: Vec<f64> = (0..=d).map(|j| beta[j] - t * step[(j, 0)]).collect();
                let candidate_loss = objective(x, &yf, &weights, &candidate, self.c);
                if candidate_loss <= loss {
                    accepted = Some((candidate, candidate_loss));
                    break;
                }
                t *= 0.5;
            }

            let Some((next, next_loss)) = accepted else {
                // No descent left at machine precision
                converged = true;
                break;
            };

            let step_max = (0..=d).map(|j| (t * step[(j, 0)]).abs()).fold(0.0, f64::max);
            tracing::debug!(iteration = iterations, objective = next_loss, step = step_max, "newton step");

            beta = next;
            loss = next_loss;

            if step_max <= self.tol {
                converged = true;
                break;
            }
        }

        if !converged {
            tracing::warn!(
                max_iter = self.max_iter,
                "logistic regression did not converge; increase the iteration budget"
            );
        }

        let intercept = beta[d];
        beta.truncate(d);

        Ok((
            LogisticModel {
                coefficients: beta,
                intercept,
            },
            SolverStats {
                iterations,
                converged,
                objective: loss,
            },
        ))
    }
}

impl LogisticModel {
    /// Class probabilities `[P(0), P(1)]` for each row of `x`
    pub fn predict_proba(&self, x: &Mat<f64>) -> Result<Vec<[f64; 2]>> {
        if x.ncols() != self.coefficients.len() {
            anyhow::bail!(
                "Model expects {} features, got {}",
                self.coefficients.len(),
                x.ncols()
            );
        }

        Ok((0..x.nrows())
            .map(|i| {
                let z: f64 = (0..x.ncols())
                    .map(|j| x[(i, j)] * self.coefficients[j])
                    .sum::<f64>()
                    + self.intercept;
                let p = sigmoid(z);
                [1.0 - p, p]
            })
            .collect())
    }

    /// Hard labels: 1 when `P(1) > 0.5`
    pub fn predict(&self, x: &Mat<f64>) -> Result<Vec<i32>> {
        Ok(self
            .predict_proba(x)?
            .iter()
            .map(|p| i32::from(p[1] > 0.5))
            .collect())
    }
}

/// Per-row sample weights for a 0/1 target
pub fn class_weights(y: &[i32], policy: ClassWeight) -> Result<Vec<f64>> {
    if let Some(bad) = y.iter().find(|&&t| t != 0 && t != 1) {
        anyhow::bail!("Target must be binary (0/1), found {}", bad);
    }

    let n = y.len() as f64;
    let positives = y.iter().filter(|&&t| t == 1).count() as f64;
    let negatives = n - positives;

    if positives == 0.0 || negatives == 0.0 {
        anyhow::bail!("Target contains a single class; both 0 and 1 are required");
    }

    Ok(match policy {
        ClassWeight::None => vec![1.0; y.len()],
        ClassWeight::Balanced => {
            let w1 = n / (2.0 * positives);
            let w0 = n / (2.0 * negatives);
            y.iter().map(|&t| if t == 1 { w1 } else { w0 }).collect()
        }
    })
}

#[inline]
fn linear(x: &Mat<f64>, row: usize, beta: &[f64]) -> f64 {
    let d = x.ncols();
    (0..d).map(|j| x[(row, j)] * beta[j]).sum::<f64>() + beta[d]
}

#[inline]
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// `log(1 + exp(z))` without overflow
#[inline]
fn softplus(z: f64) -> f64 {
    if z > 0.0 {
        z + (-z).exp().ln_1p()
    } else {
        z.exp().ln_1p()
    }
}

fn objective(x: &Mat<f64>, y: &[f64], weights: &[f64], beta: &[f64], c: f64) -> f64 {
    let d = x.ncols();
    let penalty = 0.5 * beta[..d].iter().map(|b| b * b).sum::<f64>();
    let data: f64 = (0..x.nrows())
        .map(|i| {
            let z = linear(x, i, beta);
            weights[i] * (softplus(z) - y[i] * z)
        })
        .sum();
    penalty + c * data
}
