//! Otsu's method: pick the cut that maximizes between-class variance.

use super::histogram::{Histogram, LEVELS};

/// Select the binarization threshold for a histogram.
///
/// Candidates run from 0 to 254; a candidate that leaves one class empty is
/// skipped. The first candidate with the strictly greatest score wins, so a
/// frame of a single intensity (or an empty histogram) yields 0.
pub fn otsu_threshold(hist: &Histogram) -> u8 {
    let _span = tracing::debug_span!("otsu").entered();

    let total = hist.total();
    if total == 0 {
        return 0;
    }
    let total_f = total as f64;

    let global_mean: f64 = hist
        .counts()
        .iter()
        .enumerate()
        .map(|(level, &count)| level as f64 * count as f64)
        .sum::<f64>()
        / total_f;

    let mut cumulative: u64 = 0;
    let mut partial_mean = 0.0f64;
    let mut best_score = 0.0f64;
    let mut best = 0u8;

    for (level, &count) in hist.counts().iter().enumerate().take(LEVELS - 1) {
        cumulative += count as u64;
        let p = count as f64 / total_f;
        partial_mean += level as f64 * p;

        // Class probability is exactly 0 or 1 here; no split.
        if cumulative == 0 || cumulative == total {
            continue;
        }

        let weight = cumulative as f64 / total_f;
        let diff = global_mean * weight - partial_mean;
        let score = diff * diff / (weight * (1.0 - weight));

        if score > best_score {
            best_score = score;
            best = level as u8;
        }
    }

    best
}
