//! Frequency tables and entropy for categorical samples.
//!
//! Categories are keyed by their string code and stored in ascending code
//! order (via `BTreeMap`), so iteration order, percentages, and the mode
//! tie-break rule are all deterministic.

use std::collections::BTreeMap;

/// One category row in a frequency table.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyEntry {
    /// The raw category code.
    pub category: String,
    /// Number of observations with this code.
    pub count: usize,
    /// Share of the sample, in percent (0-100).
    pub percentage: f64,
}

/// Frequency table over the category codes of a sample.
///
/// # Examples
///
/// ```
/// use statqa_stats::frequency::FrequencyTable;
///
/// let values = ["A", "A", "A", "B"].map(String::from);
/// let table = FrequencyTable::new(values).unwrap();
/// assert_eq!(table.n, 4);
/// assert_eq!(table.mode().category, "A");
/// assert_eq!(table.mode().percentage, 75.0);
/// ```
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    /// Total number of observations.
    pub n: usize,
    /// Entries sorted by category code, ascending.
    pub entries: Vec<FrequencyEntry>,
}

impl FrequencyTable {
    /// Builds a frequency table from category codes.
    ///
    /// Returns `None` when the input is empty.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut counts = BTreeMap::<String, usize>::new();
        let mut n = 0;
        for value in values {
            *counts.entry(value).or_insert(0) += 1;
            n += 1;
        }
        if n == 0 {
            return None;
        }
        let entries = counts
            .into_iter()
            .map(|(category, count)| FrequencyEntry {
                category,
                count,
                percentage: 100.0 * count as f64 / n as f64,
            })
            .collect();
        Some(Self { n, entries })
    }

    /// Returns the most frequent category.
    ///
    /// Ties are broken by the smallest category code in ascending sort
    /// order, so the result is stable across runs.
    ///
    /// # Examples
    ///
    /// ```
    /// use statqa_stats::frequency::FrequencyTable;
    ///
    /// let values = ["B", "A", "B", "A"].map(String::from);
    /// let table = FrequencyTable::new(values).unwrap();
    /// assert_eq!(table.mode().category, "A");
    /// ```
    #[must_use]
    pub fn mode(&self) -> &FrequencyEntry {
        // Entries are sorted by code; strict comparison keeps the first maximum.
        self.entries
            .iter()
            .reduce(|best, entry| if entry.count > best.count { entry } else { best })
            .expect("frequency table is never empty")
    }

    /// Number of distinct categories.
    #[must_use]
    pub fn category_count(&self) -> usize {
        self.entries.len()
    }

    /// Shannon entropy of the category distribution, in nats.
    ///
    /// # Examples
    ///
    /// ```
    /// use statqa_stats::frequency::FrequencyTable;
    ///
    /// let uniform = FrequencyTable::new(["A", "B"].map(String::from)).unwrap();
    /// assert!((uniform.entropy() - 2.0f64.ln()).abs() < 1e-12);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn entropy(&self) -> f64 {
        let n = self.n as f64;
        -self
            .entries
            .iter()
            .map(|e| {
                let p = e.count as f64 / n;
                p * p.ln()
            })
            .sum::<f64>()
    }

    /// Entropy normalized by its maximum (`ln k`), in `[0, 1]`.
    ///
    /// A single-category table has normalized entropy 0 by convention.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn normalized_entropy(&self) -> f64 {
        let k = self.entries.len();
        if k <= 1 {
            return 0.0;
        }
        self.entropy() / (k as f64).ln()
    }
}
