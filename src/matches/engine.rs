//! Circular assignment: shuffle the participants, then each position gives
//! to the next one, with the last wrapping around to the first. For N >= 2
//! this is always a valid derangement in O(N): a single directed cycle in
//! which every user gives and receives exactly once, so no retry loop over
//! random bijections is needed. Only cyclic arrangements are reachable, but
//! the shuffle still randomizes who gives to whom.

/// Pair each id in `order` with its successor, wrapping at the end.
/// An empty order yields no pairs.
pub fn circular_pairs(order: &[i64]) -> Vec<(i64, i64)> {
    let n = order.len();
    if n == 0 {
        return Vec::new();
    }
    order
        .iter()
        .enumerate()
        .map(|(i, &giver)| (giver, order[(i + 1) % n]))
        .collect()
}
