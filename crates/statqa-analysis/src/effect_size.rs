//! Effect-size magnitude labels.
//!
//! Each statistic family has its own fixed cut points, documented once
//! here and reused everywhere a magnitude is labeled. A value exactly on
//! a cut point maps to the larger label: a correlation of 0.7 is
//! "very large".

use serde::Serialize;

/// Qualitative magnitude of an association, independent of sample size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum EffectSize {
    #[display("negligible")]
    Negligible,
    #[display("small")]
    Small,
    #[display("medium")]
    Medium,
    #[display("large")]
    Large,
    #[display("very large")]
    VeryLarge,
}

/// Cut points for |r| (Pearson or Spearman correlation).
pub const CORRELATION_CUTS: [f64; 4] = [0.1, 0.3, 0.5, 0.7];
/// Cut points for Cramér's V, calibrated for its compressed [0, 1] range.
pub const CRAMERS_V_CUTS: [f64; 4] = [0.07, 0.21, 0.35, 0.50];
/// Cut points for |d| (Cohen's d).
pub const COHEN_D_CUTS: [f64; 4] = [0.2, 0.5, 0.8, 1.2];
/// Cut points for eta-squared.
pub const ETA_SQUARED_CUTS: [f64; 4] = [0.01, 0.06, 0.14, 0.20];

fn label(magnitude: f64, cuts: &[f64; 4]) -> EffectSize {
    if magnitude >= cuts[3] {
        EffectSize::VeryLarge
    } else if magnitude >= cuts[2] {
        EffectSize::Large
    } else if magnitude >= cuts[1] {
        EffectSize::Medium
    } else if magnitude >= cuts[0] {
        EffectSize::Small
    } else {
        EffectSize::Negligible
    }
}

impl EffectSize {
    /// Labels a correlation coefficient by its absolute value.
    ///
    /// # Examples
    ///
    /// ```
    /// use statqa_analysis::EffectSize;
    ///
    /// assert_eq!(EffectSize::from_correlation(-0.85), EffectSize::VeryLarge);
    /// assert_eq!(EffectSize::from_correlation(0.05), EffectSize::Negligible);
    /// ```
    #[must_use]
    pub fn from_correlation(r: f64) -> Self {
        label(r.abs(), &CORRELATION_CUTS)
    }

    /// Labels a Cramér's V statistic.
    #[must_use]
    pub fn from_cramers_v(v: f64) -> Self {
        label(v, &CRAMERS_V_CUTS)
    }

    /// Labels a Cohen's d by its absolute value.
    #[must_use]
    pub fn from_cohen_d(d: f64) -> Self {
        label(d.abs(), &COHEN_D_CUTS)
    }

    /// Labels an eta-squared statistic.
    #[must_use]
    pub fn from_eta_squared(eta: f64) -> Self {
        label(eta, &ETA_SQUARED_CUTS)
    }
}
