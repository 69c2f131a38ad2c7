//! Fuzzy company-name similarity.
//!
//! Ratio of matching character runs between the two normalized names:
//! `2 * M / (len_a + len_b)` where `M` is the total length of the
//! recursively-found longest common substrings. Symmetric, 1.0 for identical
//! strings, 0.0 for disjoint ones.

/// Similarity between two company names, case-insensitive and
/// whitespace-trimmed.
pub fn company_name_similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.trim().to_lowercase().chars().collect();
    let b: Vec<char> = b.trim().to_lowercase().chars().collect();

    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let matches = matching_run_total(&a, &b);
    2.0 * matches as f64 / (a.len() + b.len()) as f64
}

/// Sum of matching-block lengths: take the longest common substring and
/// recurse on the pieces to its left and right.
fn matching_run_total(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let (ai, bi, len) = longest_common_run(a, b);
    if len == 0 {
        return 0;
    }

    len + matching_run_total(&a[..ai], &b[..bi])
        + matching_run_total(&a[ai + len..], &b[bi + len..])
}

/// Longest common substring of `a` and `b`, earliest occurrence wins on ties.
/// Returns (start in a, start in b, length).
fn longest_common_run(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0usize, 0usize, 0usize);
    // runs[j] = length of the common run ending at a[i-1] / b[j-1]
    let mut runs = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        let mut next = vec![0usize; b.len() + 1];
        for (j, &cb) in b.iter().enumerate() {
            if ca == cb {
                let len = runs[j] + 1;
                next[j + 1] = len;
                if len > best.2 {
                    best = (i + 1 - len, j + 1 - len, len);
                }
            }
        }
        runs = next;
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_names_score_one() {
        assert_eq!(company_name_similarity("Acme Corp", "Acme Corp"), 1.0);
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(company_name_similarity("  ACME CORP ", "acme corp"), 1.0);
    }

    #[test]
    fn disjoint_names_score_zero() {
        assert_eq!(company_name_similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn is_symmetric() {
        let ab = company_name_similarity("Mobile Tech Ancona", "Mobile Tech");
        let ba = company_name_similarity("Mobile Tech", "Mobile Tech Ancona");
        assert_eq!(ab, ba);
    }

    #[test]
    fn partial_overlap_scores_between_bounds() {
        let score = company_name_similarity("Acme Corporation", "Acme Corp");
        assert!(score > 0.6 && score < 1.0, "score was {score}");
    }

    #[test]
    fn counts_multiple_matching_runs() {
        // "ab" + "cd" match around the substitution in the middle.
        let score = company_name_similarity("abxcd", "abycd");
        assert!((score - 0.8).abs() < 1e-9, "score was {score}");
    }

    #[test]
    fn empty_against_non_empty_scores_zero() {
        assert_eq!(company_name_similarity("", "Acme"), 0.0);
        assert_eq!(company_name_similarity("", ""), 1.0);
    }
}
