//! Top-k selection over a probability vector.

/// Indices and scores of the `k` highest probabilities.
///
/// Sorted by descending score; equal scores keep ascending class-index order.
/// Returns fewer than `k` entries only when `probs` is shorter than `k`.
pub fn top_k(probs: &[f32], k: usize) -> Vec<(usize, f32)> {
    let mut ranked: Vec<(usize, f32)> = probs.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.truncate(k);
    ranked
}
