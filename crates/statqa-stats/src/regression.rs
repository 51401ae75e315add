//! Linear and logistic regression with coefficient standard errors.
//!
//! Both fits take predictors as column slices and prepend an intercept. The
//! design matrices here are small (a treatment plus a handful of
//! confounders), so the normal equations are solved directly with
//! Gauss-Jordan elimination; no external linear algebra is needed.

use crate::distribution::{normal_sf, student_t_two_sided};

/// A fitted regression model.
///
/// `coefficients[0]` is always the intercept; subsequent entries follow the
/// predictor column order.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionFit {
    /// Estimated coefficients, intercept first.
    pub coefficients: Vec<f64>,
    /// Standard error of each coefficient.
    pub standard_errors: Vec<f64>,
    /// Two-sided p-value for each coefficient (t-based for OLS, Wald
    /// z-based for logistic).
    pub p_values: Vec<f64>,
    /// Number of observations.
    pub n: usize,
    /// Residual degrees of freedom (`n - p`).
    pub df_residual: usize,
    /// Whether the iterative solver converged (always `true` for OLS).
    pub converged: bool,
}

/// Ordinary least squares fit of `y` on the predictor columns.
///
/// Returns `None` when the inputs are ragged, there are no more
/// observations than parameters, or the normal equations are singular
/// (collinear predictors).
///
/// # Examples
///
/// ```
/// use statqa_stats::regression::ols;
///
/// // y = 1 + 2x, exactly
/// let x = vec![vec![0.0, 1.0, 2.0, 3.0, 4.0]];
/// let y = [1.0, 3.0, 5.0, 7.0, 9.0];
/// let fit = ols(&x, &y).unwrap();
/// assert!((fit.coefficients[0] - 1.0).abs() < 1e-9);
/// assert!((fit.coefficients[1] - 2.0).abs() < 1e-9);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn ols(predictors: &[Vec<f64>], y: &[f64]) -> Option<RegressionFit> {
    let n = y.len();
    let p = predictors.len() + 1;
    if n <= p || predictors.iter().any(|col| col.len() != n) {
        return None;
    }

    let xtx = normal_matrix(predictors, n);
    let xty: Vec<f64> = (0..p)
        .map(|j| (0..n).map(|i| design_value(predictors, i, j) * y[i]).sum())
        .collect();

    let inverse = invert(&xtx)?;
    let coefficients: Vec<f64> = (0..p)
        .map(|j| (0..p).map(|k| inverse[j][k] * xty[k]).sum())
        .collect();

    let rss: f64 = (0..n)
        .map(|i| {
            let fitted: f64 = (0..p)
                .map(|j| coefficients[j] * design_value(predictors, i, j))
                .sum();
            (y[i] - fitted).powi(2)
        })
        .sum();
    let df_residual = n - p;
    let sigma2 = rss / df_residual as f64;

    let standard_errors: Vec<f64> = (0..p).map(|j| (sigma2 * inverse[j][j]).sqrt()).collect();
    let p_values = coefficients
        .iter()
        .zip(&standard_errors)
        .map(|(b, se)| {
            if *se == 0.0 {
                // A coefficient fitted without residual error
                f64::from(u8::from(*b == 0.0))
            } else {
                student_t_two_sided(b / se, df_residual as f64)
            }
        })
        .collect();

    Some(RegressionFit {
        coefficients,
        standard_errors,
        p_values,
        n,
        df_residual,
        converged: true,
    })
}

/// Logistic regression of a binary outcome on the predictor columns,
/// fitted by Newton-Raphson.
///
/// `y` must contain only 0.0 and 1.0. Returns `None` under the same
/// degeneracy conditions as [`ols`], when `y` is not binary, or when the
/// weighted normal equations become singular (as with complete
/// separation). A fit that stops at the iteration cap is returned with
/// `converged = false`.
///
/// # Examples
///
/// ```
/// use statqa_stats::regression::logistic;
///
/// let x = vec![vec![-2.0, -1.5, -1.0, -0.5, 0.5, 1.0, 1.5, 2.0]];
/// let y = [0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0];
/// let fit = logistic(&x, &y).unwrap();
/// // Positive slope: larger x makes 1 more likely
/// assert!(fit.coefficients[1] > 0.0);
/// ```
#[must_use]
pub fn logistic(predictors: &[Vec<f64>], y: &[f64]) -> Option<RegressionFit> {
    const MAX_NEWTON_ITER: usize = 50;
    const TOLERANCE: f64 = 1e-8;
    // Probability clamp keeps the weight matrix invertible.
    const P_FLOOR: f64 = 1e-10;

    let n = y.len();
    let p = predictors.len() + 1;
    if n <= p
        || predictors.iter().any(|col| col.len() != n)
        || y.iter().any(|v| *v != 0.0 && *v != 1.0)
    {
        return None;
    }
    // Both outcome classes must be present.
    if y.iter().all(|v| *v == 0.0) || y.iter().all(|v| *v == 1.0) {
        return None;
    }

    let mut beta = vec![0.0; p];
    let mut converged = false;
    let mut hessian_inverse: Option<Vec<Vec<f64>>> = None;

    for _ in 0..MAX_NEWTON_ITER {
        let probabilities: Vec<f64> = (0..n)
            .map(|i| {
                let eta: f64 = (0..p).map(|j| beta[j] * design_value(predictors, i, j)).sum();
                sigmoid(eta).clamp(P_FLOOR, 1.0 - P_FLOOR)
            })
            .collect();

        // Hessian: X' W X with W = diag(p(1-p)); gradient: X'(y - p)
        let mut hessian = vec![vec![0.0; p]; p];
        let mut gradient = vec![0.0; p];
        for i in 0..n {
            let w = probabilities[i] * (1.0 - probabilities[i]);
            let resid = y[i] - probabilities[i];
            for j in 0..p {
                let xj = design_value(predictors, i, j);
                gradient[j] += xj * resid;
                for k in j..p {
                    hessian[j][k] += w * xj * design_value(predictors, i, k);
                }
            }
        }
        for j in 0..p {
            for k in 0..j {
                hessian[j][k] = hessian[k][j];
            }
        }

        let inverse = invert(&hessian)?;
        let step: Vec<f64> = (0..p)
            .map(|j| (0..p).map(|k| inverse[j][k] * gradient[k]).sum())
            .collect();
        for (b, s) in beta.iter_mut().zip(&step) {
            *b += s;
        }
        hessian_inverse = Some(inverse);
        if step.iter().all(|s| s.abs() < TOLERANCE) {
            converged = true;
            break;
        }
    }

    let inverse = hessian_inverse?;
    let standard_errors: Vec<f64> = (0..p).map(|j| inverse[j][j].max(0.0).sqrt()).collect();
    let p_values = beta
        .iter()
        .zip(&standard_errors)
        .map(|(b, se)| {
            if *se == 0.0 {
                1.0
            } else {
                2.0 * normal_sf((b / se).abs())
            }
        })
        .collect();

    Some(RegressionFit {
        coefficients: beta,
        standard_errors,
        p_values,
        n,
        df_residual: n - p,
        converged,
    })
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

// Column j of the design matrix: intercept for j = 0, predictor j - 1 after.
fn design_value(predictors: &[Vec<f64>], row: usize, col: usize) -> f64 {
    if col == 0 { 1.0 } else { predictors[col - 1][row] }
}

fn normal_matrix(predictors: &[Vec<f64>], n: usize) -> Vec<Vec<f64>> {
    let p = predictors.len() + 1;
    let mut xtx = vec![vec![0.0; p]; p];
    for i in 0..n {
        for j in 0..p {
            let xj = design_value(predictors, i, j);
            for k in j..p {
                xtx[j][k] += xj * design_value(predictors, i, k);
            }
        }
    }
    for j in 0..p {
        for k in 0..j {
            xtx[j][k] = xtx[k][j];
        }
    }
    xtx
}

/// Gauss-Jordan inversion with partial pivoting; `None` on singularity.
fn invert(matrix: &[Vec<f64>]) -> Option<Vec<Vec<f64>>> {
    const PIVOT_EPS: f64 = 1e-12;

    let p = matrix.len();
    let mut work: Vec<Vec<f64>> = matrix
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut augmented = row.clone();
            augmented.extend((0..p).map(|j| f64::from(u8::from(i == j))));
            augmented
        })
        .collect();

    for col in 0..p {
        let pivot_row = (col..p)
            .max_by(|&a, &b| work[a][col].abs().total_cmp(&work[b][col].abs()))?;
        if work[pivot_row][col].abs() < PIVOT_EPS {
            return None;
        }
        work.swap(col, pivot_row);

        let pivot = work[col][col];
        for value in &mut work[col] {
            *value /= pivot;
        }
        for row in 0..p {
            if row != col {
                let factor = work[row][col];
                if factor != 0.0 {
                    for k in 0..2 * p {
                        work[row][k] -= factor * work[col][k];
                    }
                }
            }
        }
    }

    Some(work.into_iter().map(|row| row[p..].to_vec()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ols_exact_line() {
        let x = vec![vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]];
        let y: Vec<f64> = x[0].iter().map(|v| 3.0 * v - 1.0).collect();
        let fit = ols(&x, &y).unwrap();
        assert!((fit.coefficients[0] + 1.0).abs() < 1e-9);
        assert!((fit.coefficients[1] - 3.0).abs() < 1e-9);
        assert_eq!(fit.n, 6);
        assert_eq!(fit.df_residual, 4);
    }

    #[test]
    fn test_ols_two_predictors() {
        // y = 2 + 1.5*x1 - 0.5*x2 with a little noise
        let x1 = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let x2 = vec![2.0, 1.0, 4.0, 3.0, 6.0, 5.0, 8.0, 7.0];
        let noise = [0.01, -0.02, 0.015, -0.01, 0.02, -0.015, 0.01, -0.01];
        let y: Vec<f64> = (0..8)
            .map(|i| 2.0 + 1.5 * x1[i] - 0.5 * x2[i] + noise[i])
            .collect();
        let fit = ols(&[x1, x2], &y).unwrap();
        assert!((fit.coefficients[1] - 1.5).abs() < 0.05);
        assert!((fit.coefficients[2] + 0.5).abs() < 0.05);
        assert!(fit.p_values[1] < 0.01);
    }

    #[test]
    fn test_ols_collinear_predictors() {
        let x1 = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let x2: Vec<f64> = x1.iter().map(|v| 2.0 * v).collect();
        let y = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert!(ols(&[x1, x2], &y).is_none());
    }

    #[test]
    fn test_ols_underdetermined() {
        let x = vec![vec![1.0, 2.0]];
        assert!(ols(&x, &[1.0, 2.0]).is_none());
    }

    #[test]
    fn test_ols_noisy_slope_inference() {
        let x: Vec<f64> = (0..20).map(f64::from).collect();
        let noise = [
            0.3, -0.2, 0.1, 0.4, -0.3, 0.2, -0.1, 0.0, 0.25, -0.15, 0.1, -0.3, 0.2, 0.05,
            -0.2, 0.3, -0.1, 0.15, -0.25, 0.1,
        ];
        let y: Vec<f64> = x.iter().zip(noise).map(|(v, e)| 5.0 + 0.8 * v + e).collect();
        let fit = ols(&[x], &y).unwrap();
        assert!((fit.coefficients[1] - 0.8).abs() < 0.05);
        assert!(fit.standard_errors[1] > 0.0);
        assert!(fit.p_values[1] < 0.001);
    }

    #[test]
    fn test_logistic_recovers_direction() {
        let x: Vec<f64> = (0..20).map(|i| f64::from(i) - 10.0).collect();
        let y: Vec<f64> = x.iter().map(|v| f64::from(u8::from(*v > 0.0))).collect();
        // Perfectly separated data: the solver must not panic; it either
        // hits the iteration cap or the weights degenerate.
        if let Some(fit) = logistic(&[x], &y) {
            assert!(fit.coefficients[1] > 0.0);
        }
    }

    #[test]
    fn test_logistic_balanced_noise() {
        let x = vec![
            -3.0, -2.5, -2.0, -1.5, -1.0, -0.5, 0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0, -2.2, 1.8,
            0.3,
        ];
        let y = vec![
            0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 1.0, 0.0,
        ];
        let fit = logistic(&[x], &y).unwrap();
        assert!(fit.converged);
        assert!(fit.coefficients[1] > 0.0);
        assert!(fit.p_values[1] < 0.1);
    }

    #[test]
    fn test_logistic_rejects_non_binary() {
        let x = vec![vec![1.0, 2.0, 3.0, 4.0, 5.0]];
        assert!(logistic(&x, &[0.0, 1.0, 2.0, 1.0, 0.0]).is_none());
    }

    #[test]
    fn test_logistic_rejects_single_class() {
        let x = vec![vec![1.0, 2.0, 3.0, 4.0, 5.0]];
        assert!(logistic(&x, &[1.0, 1.0, 1.0, 1.0, 1.0]).is_none());
    }

    #[test]
    fn test_invert_identity() {
        let m = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let inv = invert(&m).unwrap();
        assert!((inv[0][0] - 1.0).abs() < 1e-12);
        assert!((inv[1][1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_invert_singular() {
        let m = vec![vec![1.0, 2.0], vec![2.0, 4.0]];
        assert!(invert(&m).is_none());
    }
}
