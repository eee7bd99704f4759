use std::collections::{BTreeMap, BTreeSet};

use super::model::View;

// ---------------------------------------------------------------------------
// Scalar aggregates
// ---------------------------------------------------------------------------

/// The headline numbers shown as metric cards.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub rows: usize,
    pub departments: usize,
    pub categories: usize,
    /// `None` when the view has no rows.
    pub mean_value: Option<f64>,
}

pub fn summarize(view: &View<'_>) -> Summary {
    let mut departments = BTreeSet::new();
    let mut categories = BTreeSet::new();
    for m in view.rows() {
        departments.insert(m.department.as_str());
        categories.insert(m.category.as_str());
    }
    Summary {
        rows: view.len(),
        departments: departments.len(),
        categories: categories.len(),
        mean_value: mean(view.values()),
    }
}

/// Arithmetic mean, or `None` for an empty input.
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Category frequencies, most frequent first, ties by name.
pub fn value_counts(view: &View<'_>) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for m in view.rows() {
        *counts.entry(m.category.as_str()).or_default() += 1;
    }
    let mut out: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(c, n)| (c.to_string(), n))
        .collect();
    // Stable sort keeps the BTreeMap (name) order among equal counts.
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Equal-width bins spanning `[min, max]` of `values`.
///
/// The maximum lands in the last bin. When every value is equal the result
/// is a single unit-width bin centred on that value.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let Some(min) = finite.iter().copied().reduce(f64::min) else {
        return Vec::new();
    };
    let max = finite.iter().copied().fold(min, f64::max);

    let range = max - min;
    if range <= 0.0 {
        return vec![HistogramBin {
            start: min - 0.5,
            end: min + 0.5,
            count: finite.len(),
        }];
    }

    let bins = bins.max(1);
    let width = range / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in &finite {
        let bin = ((v - min) / width).floor() as usize;
        counts[bin.min(bins - 1)] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: min + i as f64 * width,
            end: if i + 1 == bins {
                max
            } else {
                min + (i + 1) as f64 * width
            },
            count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Box plot statistics
// ---------------------------------------------------------------------------

/// Five-number summary with 1.5 × IQR whiskers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    /// Lowest value inside the lower fence.
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Highest value inside the upper fence.
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let q1 = percentile(&sorted, 25.0);
        let median = percentile(&sorted, 50.0);
        let q3 = percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let lower_fence = q1 - 1.5 * iqr;
        let upper_fence = q3 + 1.5 * iqr;

        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&v| v >= lower_fence)
            .unwrap_or(sorted[0]);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= upper_fence)
            .unwrap_or(sorted[sorted.len() - 1]);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < lower_fence || v > upper_fence)
            .collect();

        Some(BoxStats {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
        })
    }
}

/// Linear-interpolated percentile of an ascending slice.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let k = p / 100.0 * (n - 1) as f64;
            let lo = k.floor() as usize;
            let hi = (k.ceil() as usize).min(n - 1);
            let d = k - lo as f64;
            sorted[lo] * (1.0 - d) + sorted[hi] * d
        }
    }
}

/// One box per category present in the view, in category order.
pub fn box_stats_by_category(view: &View<'_>) -> Vec<(String, BoxStats)> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for m in view.rows() {
        groups.entry(m.category.as_str()).or_default().push(m.value);
    }
    groups
        .into_iter()
        .filter_map(|(cat, values)| BoxStats::from_values(&values).map(|s| (cat.to_string(), s)))
        .collect()
}
