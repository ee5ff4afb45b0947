use std::collections::HashMap;
use std::hash::Hash;

/// Index order that puts values listed in `priority` first, in that order, then the
/// rest in natural order. Equal values keep their original relative order.
///
/// A value listed twice in `priority` takes its last position.
pub fn build_sort_index<T: Ord + Hash>(values: &[T], priority: &[T]) -> Vec<usize> {
    let rank: HashMap<&T, usize> = priority.iter().enumerate().map(|(i, v)| (v, i)).collect();
    let unlisted = priority.len();

    let mut index: Vec<usize> = (0..values.len()).collect();
    index.sort_by(|&a, &b| {
        let key_a = (rank.get(&values[a]).copied().unwrap_or(unlisted), &values[a]);
        let key_b = (rank.get(&values[b]).copied().unwrap_or(unlisted), &values[b]);
        key_a.cmp(&key_b)
    });
    index
}
