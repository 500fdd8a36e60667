use std::collections::HashMap;

/// Rank cuisine labels by how often they occur in a user's receipt history
///
/// `history` holds one entry per (receipt, cuisine label) occurrence: a
/// restaurant tagged with three cuisines contributes three entries per visit.
/// Labels are ordered by descending count; equal counts fall back to lexical
/// label order so the result is deterministic. At most `limit` labels are
/// returned, and an empty history yields an empty list.
pub fn rank_cuisines(history: Vec<String>, limit: usize) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for label in history {
        *counts.entry(label).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    ranked
        .into_iter()
        .take(limit)
        .map(|(label, _)| label)
        .collect()
}
