//! Statistical primitives for the statqa project.
//!
//! This crate provides the numerical core that the analyzers build on:
//!
//! - **Descriptive statistics**: mean, median, quartiles, dispersion,
//!   skewness, kurtosis, and robust measures (MAD)
//! - **Frequency tables**: category counts, percentages, mode, and Shannon
//!   entropy for categorical data
//! - **Distribution functions**: tail probabilities for the normal, Student
//!   t, F, and chi-square distributions, built on the regularized incomplete
//!   gamma and beta functions
//! - **Correlation**: Pearson and Spearman coefficients with asymptotic
//!   p-values
//! - **Hypothesis tests**: Welch's t-test, one-way ANOVA, chi-square
//!   independence, Jarque-Bera normality, and Benjamini-Hochberg correction
//! - **Trend analysis**: Mann-Kendall monotonic trend test and mean-shift
//!   change-point detection
//! - **Regression**: ordinary least squares and logistic fits with
//!   coefficient standard errors
//!
//! All functions are deterministic: the same input always produces the same
//! output, with no dependence on hash iteration order or random state.
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for numeric samples
//! - [`frequency`]: Frequency tables and entropy for categorical samples
//! - [`distribution`]: Special functions and distribution tail probabilities
//! - [`correlation`]: Pearson and Spearman correlation
//! - [`hypothesis`]: Significance tests and multiple-testing correction
//! - [`trend`]: Mann-Kendall trend and change-point detection
//! - [`regression`]: Linear and logistic regression
//!
//! # Examples
//!
//! ## Descriptive statistics
//!
//! ```
//! use statqa_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(&values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! assert_eq!(stats.median, 3.0);
//! ```
//!
//! ## Correlation with p-value
//!
//! ```
//! use statqa_stats::correlation::pearson;
//!
//! let x = [1.0, 2.0, 3.0, 4.0];
//! let y = [2.0, 4.0, 6.0, 8.0];
//! let corr = pearson(&x, &y).unwrap();
//! assert!((corr.r - 1.0).abs() < 1e-12);
//! assert!(corr.p_value < 0.05);
//! ```

pub mod correlation;
pub mod descriptive;
pub mod distribution;
pub mod frequency;
pub mod hypothesis;
pub mod regression;
pub mod trend;
