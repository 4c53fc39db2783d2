//! Approximate string matching for the "did you mean" suggestion.
//!
//! The scoring primitive is the classic sequence-alignment ratio: twice the
//! number of characters in the longest contiguous matching blocks (found
//! recursively in the gaps on either side of each block) divided by the
//! combined length of both strings. Identical strings score 1.0, fully
//! disjoint strings 0.0.
//!
//! Product names are long ("Bamburi Nguvu Cement 50kg") while shoppers type
//! short fragments ("bambri"), so a candidate's score is the best of its
//! whole-name ratio and its per-word ratios, case-folded. The whole-name
//! ratio alone would sink every fragment query below the cutoff.

use std::collections::HashMap;

/// Minimum score a candidate must reach to be offered as a suggestion.
pub const SIMILARITY_CUTOFF: f64 = 0.6;

/// Alignment ratio between `query` (left sequence) and `candidate`.
///
/// Case-sensitive and character-based; callers wanting case-insensitive
/// scoring fold their inputs first. Two empty strings score 1.0.
pub fn sequence_ratio(query: &str, candidate: &str) -> f64 {
    let a: Vec<char> = query.chars().collect();
    let b: Vec<char> = candidate.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    // Positions of each character in `b`, ascending.
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, &c) in b.iter().enumerate() {
        b2j.entry(c).or_default().push(j);
    }

    let matched = match_size(&a, &b2j, 0, a.len(), 0, b.len());
    2.0 * matched as f64 / total as f64
}

/// Total size of all matching blocks within the given window, recursing into
/// the unmatched remainders left and right of the longest block.
fn match_size(
    a: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> usize {
    let (i, j, k) = longest_match(a, b2j, alo, ahi, blo, bhi);
    if k == 0 {
        return 0;
    }
    k + match_size(a, b2j, alo, i, blo, j)
        + match_size(a, b2j, i + k, ahi, j + k, bhi)
}

/// Longest contiguous matching block inside `a[alo..ahi]` x `b[blo..bhi]`.
///
/// Returns `(i, j, size)`; ties resolve to the earliest block in `a`, then
/// in `b`. Single-row dynamic programming over run lengths ending at each
/// position of `b`.
fn longest_match(
    a: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0usize);
    let mut run_lengths: HashMap<usize, usize> = HashMap::new();

    for i in alo..ahi {
        let mut next_runs: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = b2j.get(&a[i]) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = j
                    .checked_sub(1)
                    .and_then(|prev| run_lengths.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next_runs.insert(j, k);
                if k > best_size {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_size = k;
                }
            }
        }
        run_lengths = next_runs;
    }

    (best_i, best_j, best_size)
}

/// Score a candidate against an already-lowercased query.
fn candidate_score(query_folded: &str, candidate: &str) -> f64 {
    let folded = candidate.to_lowercase();
    let mut best = sequence_ratio(query_folded, &folded);
    for word in folded.split_whitespace() {
        let score = sequence_ratio(query_folded, word);
        if score > best {
            best = score;
        }
    }
    best
}

/// Up to `n` candidates scoring at least `cutoff`, best first.
///
/// Ties keep input order (stable), so with duplicate names the first
/// occurrence wins. An empty or whitespace-only query matches nothing.
pub fn close_matches<'a, I>(query: &str, candidates: I, n: usize, cutoff: f64) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let query = query.trim();
    if query.is_empty() || n == 0 {
        return Vec::new();
    }
    let query_folded = query.to_lowercase();

    let mut scored: Vec<(&'a str, f64)> = candidates
        .into_iter()
        .map(|candidate| (candidate, candidate_score(&query_folded, candidate)))
        .filter(|(_, score)| *score >= cutoff)
        .collect();

    // Stable sort: equal scores preserve candidate order.
    scored.sort_by(|x, y| y.1.partial_cmp(&x.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(n);
    scored.into_iter().map(|(candidate, _)| candidate).collect()
}

/// The single best candidate above `cutoff`, if any.
pub fn best_match<'a, I>(query: &str, candidates: I, cutoff: f64) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    close_matches(query, candidates, 1, cutoff).into_iter().next()
}
