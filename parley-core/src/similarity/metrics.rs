//! The three similarity primitives combined by the matcher.
//!
//! All functions expect already-normalized input (see [`super::text`]).

use std::collections::HashSet;
use std::hash::Hash;

/// Levenshtein distance over chars, unit cost for insert/delete/substitute.
///
/// Uses two rolling rows sized by the shorter string.
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return long.len();
    }

    let mut prev: Vec<usize> = (0..=short.len()).collect();
    let mut curr = vec![0_usize; short.len() + 1];

    for (i, lc) in long.iter().enumerate() {
        curr[0] = i + 1;
        for (j, sc) in short.iter().enumerate() {
            let substitution = prev[j] + usize::from(lc != sc);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}

/// `1 − distance / max(len)`; two empty strings are identical (`1.0`).
#[must_use]
pub fn sequence_similarity(a: &str, b: &str) -> f32 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f32 / max_len as f32
}

/// Jaccard index `|A∩B| / |A∪B|`, `0.0` when the union is empty.
#[must_use]
pub fn jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f32 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f32 / union as f32
}

/// For each token of `a`, its best [`sequence_similarity`] against any token
/// of `b`, averaged over `a`. `0.0` if either side has no tokens.
///
/// Not symmetric: it asks how well `a` is covered by `b`.
#[must_use]
pub fn token_best_match(a: &[&str], b: &[&str]) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let total: f32 = a
        .iter()
        .map(|ta| {
            b.iter()
                .map(|tb| sequence_similarity(ta, tb))
                .fold(0.0_f32, f32::max)
        })
        .sum();
    total / a.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levenshtein_known_values() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("flaw", "lawn"), 2);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("same", "same"), 0);
    }

    #[test]
    fn levenshtein_counts_chars_not_bytes() {
        assert_eq!(levenshtein("café", "cafe"), 1);
        assert_eq!(levenshtein("🔥", "✨"), 1);
    }

    #[test]
    fn sequence_similarity_edges() {
        assert!((sequence_similarity("", "") - 1.0).abs() < f32::EPSILON);
        assert!(sequence_similarity("abc", "").abs() < f32::EPSILON);
        assert!((sequence_similarity("helo", "hello") - 0.8).abs() < 1e-6);
    }

    #[test]
    fn jaccard_overlap() {
        let a: HashSet<&str> = ["how", "are", "you"].into_iter().collect();
        let b: HashSet<&str> = ["how", "you", "doing"].into_iter().collect();
        assert!((jaccard(&a, &b) - 0.5).abs() < 1e-6);
        let empty: HashSet<&str> = HashSet::new();
        assert!(jaccard(&empty, &empty).abs() < f32::EPSILON);
    }

    #[test]
    fn token_best_match_averages_over_first_side() {
        let score = token_best_match(&["hello", "zzzzz"], &["hello", "there"]);
        assert!((score - 0.5).abs() < 1e-6);
        assert!(token_best_match(&[], &["x"]).abs() < f32::EPSILON);
        assert!(token_best_match(&["x"], &[]).abs() < f32::EPSILON);
    }
}
