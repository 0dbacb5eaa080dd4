//! Tie-aware ranking of `f64` slices.

/// Average-tie ranks (1-based) of `values`.
///
/// Tied values receive the mean of the ranks they span, so the rank sum is
/// preserved. Non-finite values receive `NaN` ranks and do not participate
/// in the ordering of the finite values.
#[must_use]
pub fn rank_average(values: &[f64]) -> Vec<f64> {
    let mut ranks = vec![f64::NAN; values.len()];
    let mut order: Vec<usize> =
        (0..values.len()).filter(|&i| values[i].is_finite()).collect();
    order.sort_by(|&a, &b| {
        values[a].partial_cmp(&values[b]).unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        // ranks i+1 ..= j+1 averaged over the tie group
        let avg = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = avg;
        }
        i = j + 1;
    }
    ranks
}

/// First-occurrence ranks (1-based) of `values`.
///
/// Ties are broken by position: among equal values, the earlier element
/// receives the smaller rank. Non-finite values receive `NaN` ranks.
#[must_use]
pub fn rank_first(values: &[f64]) -> Vec<f64> {
    let mut ranks = vec![f64::NAN; values.len()];
    let mut order: Vec<usize> =
        (0..values.len()).filter(|&i| values[i].is_finite()).collect();
    // stable sort keeps insertion order within ties
    order.sort_by(|&a, &b| {
        values[a].partial_cmp(&values[b]).unwrap_or(std::cmp::Ordering::Equal)
    });
    for (r, &idx) in order.iter().enumerate() {
        ranks[idx] = (r + 1) as f64;
    }
    ranks
}
