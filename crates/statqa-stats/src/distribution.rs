//! Special functions and distribution tail probabilities.
//!
//! Everything in this module is built from two workhorses: the regularized
//! incomplete gamma function (series / continued-fraction evaluation) and
//! the regularized incomplete beta function (Lentz's continued fraction).
//! From those we derive the error function and the tail probabilities of the
//! normal, Student t, F, and chi-square distributions used by the hypothesis
//! tests.
//!
//! Accuracy is on the order of 1e-12 over the ranges that matter for
//! p-values; all evaluations are deterministic.

use std::f64::consts::PI;

const MAX_ITER: usize = 300;
const EPS: f64 = 1e-14;
const TINY: f64 = 1e-300;

/// Natural log of the gamma function (Lanczos approximation, g = 7).
///
/// # Examples
///
/// ```
/// use statqa_stats::distribution::ln_gamma;
///
/// // gamma(5) = 24
/// assert!((ln_gamma(5.0) - 24.0f64.ln()).abs() < 1e-10);
/// ```
#[must_use]
pub fn ln_gamma(x: f64) -> f64 {
    const COEF: [f64; 9] = [
        0.999_999_999_999_809_93,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_13,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];

    if x < 0.5 {
        // Reflection formula for the left half-plane.
        (PI / (PI * x).sin()).ln() - ln_gamma(1.0 - x)
    } else {
        let x = x - 1.0;
        let t = x + 7.5;
        let mut sum = COEF[0];
        for (i, &c) in COEF.iter().enumerate().skip(1) {
            #[expect(clippy::cast_precision_loss)]
            {
                sum += c / (x + i as f64);
            }
        }
        0.5 * (2.0 * PI).ln() + (x + 0.5) * t.ln() - t + sum.ln()
    }
}

/// Regularized lower incomplete gamma function `P(a, x)`.
///
/// Uses the series expansion for `x < a + 1` and the continued fraction for
/// the complement otherwise.
#[must_use]
pub fn reg_lower_gamma(a: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x < a + 1.0 {
        gamma_series(a, x)
    } else {
        1.0 - gamma_continued_fraction(a, x)
    }
}

/// Regularized upper incomplete gamma function `Q(a, x) = 1 - P(a, x)`.
#[must_use]
pub fn reg_upper_gamma(a: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 1.0;
    }
    if x < a + 1.0 {
        1.0 - gamma_series(a, x)
    } else {
        gamma_continued_fraction(a, x)
    }
}

fn gamma_series(a: f64, x: f64) -> f64 {
    let mut ap = a;
    let mut sum = 1.0 / a;
    let mut term = sum;
    for _ in 0..MAX_ITER {
        ap += 1.0;
        term *= x / ap;
        sum += term;
        if term.abs() < sum.abs() * EPS {
            break;
        }
    }
    sum * (a * x.ln() - x - ln_gamma(a)).exp()
}

fn gamma_continued_fraction(a: f64, x: f64) -> f64 {
    // Modified Lentz's method.
    let mut b = x + 1.0 - a;
    let mut c = 1.0 / TINY;
    let mut d = 1.0 / b;
    let mut h = d;
    for i in 1..MAX_ITER {
        #[expect(clippy::cast_precision_loss)]
        let an = -(i as f64) * (i as f64 - a);
        b += 2.0;
        d = an.mul_add(d, b);
        if d.abs() < TINY {
            d = TINY;
        }
        c = b + an / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        let delta = d * c;
        h *= delta;
        if (delta - 1.0).abs() < EPS {
            break;
        }
    }
    (a * x.ln() - x - ln_gamma(a)).exp() * h
}

/// Regularized incomplete beta function `I_x(a, b)`.
///
/// # Examples
///
/// ```
/// use statqa_stats::distribution::reg_inc_beta;
///
/// // I_x(1, 1) is the identity on [0, 1]
/// assert!((reg_inc_beta(1.0, 1.0, 0.3) - 0.3).abs() < 1e-12);
/// ```
#[must_use]
pub fn reg_inc_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let ln_front =
        ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
    let front = ln_front.exp();
    // Use the continued fraction on the side where it converges fast.
    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_continued_fraction(a, b, x) / a
    } else {
        1.0 - front * beta_continued_fraction(b, a, 1.0 - x) / b
    }
}

fn beta_continued_fraction(a: f64, b: f64, x: f64) -> f64 {
    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;
    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < TINY {
        d = TINY;
    }
    d = 1.0 / d;
    let mut h = d;
    for m in 1..MAX_ITER {
        #[expect(clippy::cast_precision_loss)]
        let m = m as f64;
        let m2 = 2.0 * m;

        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = aa.mul_add(d, 1.0);
        if d.abs() < TINY {
            d = TINY;
        }
        c = 1.0 + aa / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        h *= d * c;

        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = aa.mul_add(d, 1.0);
        if d.abs() < TINY {
            d = TINY;
        }
        c = 1.0 + aa / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        let delta = d * c;
        h *= delta;
        if (delta - 1.0).abs() < EPS {
            break;
        }
    }
    h
}

/// The error function, derived from the incomplete gamma function.
#[must_use]
pub fn erf(x: f64) -> f64 {
    if x < 0.0 {
        -erf(-x)
    } else {
        reg_lower_gamma(0.5, x * x)
    }
}

/// Standard normal cumulative distribution function.
///
/// # Examples
///
/// ```
/// use statqa_stats::distribution::normal_cdf;
///
/// assert!((normal_cdf(0.0) - 0.5).abs() < 1e-12);
/// assert!((normal_cdf(1.96) - 0.975).abs() < 1e-3);
/// ```
#[must_use]
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

/// Standard normal survival function `P(Z > z)`.
#[must_use]
pub fn normal_sf(z: f64) -> f64 {
    1.0 - normal_cdf(z)
}

/// Two-sided p-value for a Student t statistic with `df` degrees of freedom.
///
/// # Examples
///
/// ```
/// use statqa_stats::distribution::student_t_two_sided;
///
/// let p = student_t_two_sided(0.0, 10.0);
/// assert!((p - 1.0).abs() < 1e-12);
/// assert!(student_t_two_sided(10.0, 10.0) < 0.001);
/// ```
#[must_use]
pub fn student_t_two_sided(t: f64, df: f64) -> f64 {
    if !t.is_finite() {
        return 0.0;
    }
    if df <= 0.0 {
        return 1.0;
    }
    reg_inc_beta(df / 2.0, 0.5, df / t.mul_add(t, df))
}

/// Upper-tail probability of the chi-square distribution.
#[must_use]
pub fn chi_square_sf(x: f64, df: f64) -> f64 {
    if x <= 0.0 {
        return 1.0;
    }
    reg_upper_gamma(df / 2.0, x / 2.0)
}

/// Upper-tail probability of the F distribution with `(df1, df2)` degrees of
/// freedom.
#[must_use]
pub fn f_sf(f: f64, df1: f64, df2: f64) -> f64 {
    if f <= 0.0 {
        return 1.0;
    }
    if !f.is_finite() {
        return 0.0;
    }
    reg_inc_beta(df2 / 2.0, df1 / 2.0, df2 / df1.mul_add(f, df2))
}

/// Student t critical value for a two-sided interval at level `alpha`.
///
/// Returns the `t` such that `P(|T| > t) = alpha`, found by bisection on
/// [`student_t_two_sided`]. Deterministic and accurate to ~1e-10.
///
/// # Examples
///
/// ```
/// use statqa_stats::distribution::student_t_critical;
///
/// // Large df approaches the normal quantile 1.96
/// let t = student_t_critical(0.05, 10_000.0);
/// assert!((t - 1.96).abs() < 0.01);
/// ```
#[must_use]
pub fn student_t_critical(alpha: f64, df: f64) -> f64 {
    let alpha = alpha.clamp(1e-12, 1.0 - 1e-12);
    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;
    // Grow the bracket until the tail drops below alpha.
    while student_t_two_sided(hi, df) > alpha && hi < 1e12 {
        hi *= 2.0;
    }
    for _ in 0..200 {
        let mid = 0.5 * (lo + hi);
        if student_t_two_sided(mid, df) > alpha {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ln_gamma_matches_factorials() {
        for (n, fact) in [(1.0, 1.0), (2.0, 1.0), (3.0, 2.0), (4.0, 6.0), (6.0, 120.0)] {
            assert!((ln_gamma(n) - f64::ln(fact)).abs() < 1e-10, "gamma({n})");
        }
    }

    #[test]
    fn test_ln_gamma_half() {
        // gamma(1/2) = sqrt(pi)
        assert!((ln_gamma(0.5) - PI.sqrt().ln()).abs() < 1e-10);
    }

    #[test]
    fn test_incomplete_gamma_complement() {
        for &(a, x) in &[(0.5, 0.3), (2.0, 1.0), (5.0, 8.0), (10.0, 3.0)] {
            let p = reg_lower_gamma(a, x);
            let q = reg_upper_gamma(a, x);
            assert!((p + q - 1.0).abs() < 1e-12);
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn test_normal_cdf_reference_values() {
        assert!((normal_cdf(1.0) - 0.841_344_746_068_543).abs() < 1e-9);
        assert!((normal_cdf(-1.0) - 0.158_655_253_931_457).abs() < 1e-9);
        assert!((normal_cdf(2.575_829_303_549) - 0.995).abs() < 1e-9);
    }

    #[test]
    fn test_t_two_sided_reference_values() {
        // t = 2.228, df = 10 is the classic 5% critical value
        let p = student_t_two_sided(2.228_138_85, 10.0);
        assert!((p - 0.05).abs() < 1e-6);
        // df = 1 (Cauchy): t = 1 gives p = 0.5
        let p = student_t_two_sided(1.0, 1.0);
        assert!((p - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_chi_square_reference_values() {
        // chi2 = 3.841, df = 1 -> p ~= 0.05
        assert!((chi_square_sf(3.841_458_82, 1.0) - 0.05).abs() < 1e-6);
        // chi2 = 5.991, df = 2 -> p ~= 0.05
        assert!((chi_square_sf(5.991_464_55, 2.0) - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_f_reference_value() {
        // F = 4.256, df = (2, 9) -> p ~= 0.05
        assert!((f_sf(4.256_49, 2.0, 9.0) - 0.05).abs() < 1e-4);
    }

    #[test]
    fn test_t_critical_round_trip() {
        for &df in &[3.0, 10.0, 30.0, 120.0] {
            let t = student_t_critical(0.05, df);
            assert!((student_t_two_sided(t, df) - 0.05).abs() < 1e-9, "df={df}");
        }
    }

    #[test]
    fn test_infinite_statistic_gives_zero_p() {
        assert_eq!(student_t_two_sided(f64::INFINITY, 5.0), 0.0);
        assert_eq!(f_sf(f64::INFINITY, 2.0, 10.0), 0.0);
    }
}
