//! Text match scoring for player lookup and the command palette.
//!
//! [`score`] rates how well a query matches a candidate string:
//!
//! | Situation | Score |
//! |-----------|-------|
//! | empty query | `1.0` |
//! | candidate contains query (case-insensitive) | `1.0` |
//! | every query char found in order | `matched / candidate length` |
//! | otherwise | `0.0` |
//!
//! Lengths count the candidate's characters as written, not bytes and not
//! its lowercased form.

/// Scores `query` against `candidate`, returning a value in `[0, 1]`.
///
/// ```
/// use a1_search::score;
///
/// assert_eq!(score("curry", "Stephen Curry"), 1.0);
/// assert!((score("shc", "Stephen Curry") - 3.0 / 13.0).abs() < 1e-9);
/// assert_eq!(score("xyz", "Stephen Curry"), 0.0);
/// ```
pub fn score(query: &str, candidate: &str) -> f64 {
    if query.is_empty() {
        return 1.0;
    }

    // length as written; lowercasing can expand characters
    let candidate_len = candidate.chars().count();
    let query = query.to_lowercase();
    let candidate = candidate.to_lowercase();
    if candidate.contains(&query) {
        return 1.0;
    }

    let wanted: Vec<char> = query.chars().collect();
    let mut matched = 0;
    for c in candidate.chars() {
        if matched < wanted.len() && c == wanted[matched] {
            matched += 1;
        }
    }

    if matched == wanted.len() {
        matched as f64 / candidate_len as f64
    } else {
        0.0
    }
}

/// Best score of `query` across several candidate strings.
///
/// Returns `0.0` when there are no candidates.
pub fn best_score<'s, I>(query: &str, candidates: I) -> f64
where
    I: IntoIterator<Item = &'s str>,
{
    candidates
        .into_iter()
        .map(|candidate| score(query, candidate))
        .fold(0.0, f64::max)
}

/// Scores and orders items for a query, dropping non-matches.
///
/// Items are returned with their score, best first. Equal scores keep their
/// input order.
///
/// ```
/// use a1_search::rank;
///
/// let commands = ["Open settings", "Search players", "Sign out"];
/// let ranked = rank("so", &commands, |c| *c);
/// assert_eq!(ranked[0].0, &"Sign out");
/// ```
pub fn rank<'a, T, F>(query: &str, items: &'a [T], key: F) -> Vec<(&'a T, f64)>
where
    F: Fn(&'a T) -> &'a str,
{
    let mut scored: Vec<(&'a T, f64)> = items
        .iter()
        .map(|item| (item, score(query, key(item))))
        .filter(|(_, s)| *s > 0.0)
        .collect();
    // stable: ties keep input order
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_matches_everything() {
        assert_eq!(score("", "anything"), 1.0);
        assert_eq!(score("", ""), 1.0);
    }

    #[test]
    fn substring_is_case_insensitive() {
        assert_eq!(score("curry", "Stephen Curry"), 1.0);
        assert_eq!(score("LEBRON", "LeBron James"), 1.0);
        assert_eq!(score("Stephen Curry", "stephen curry"), 1.0);
    }

    #[test]
    fn ordered_subsequence_scores_by_candidate_length() {
        let s = score("shc", "Stephen Curry");
        assert!((s - 3.0 / 13.0).abs() < 1e-12);

        let s = score("ljs", "LeBron James");
        assert!((s - 3.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn out_of_order_characters_do_not_match() {
        assert_eq!(score("chs", "Stephen Curry"), 0.0);
        assert_eq!(score("zz", "Stephen Curry"), 0.0);
        assert_eq!(score("a", ""), 0.0);
    }

    #[test]
    fn greedy_scan_consumes_each_candidate_char_once() {
        // one 'o' in the candidate cannot satisfy two in the query
        assert_eq!(score("oo", "xo"), 0.0);
        assert!(score("oo", "xoyo") > 0.0);
    }

    #[test]
    fn length_counts_characters() {
        let s = score("jc", "Jokić Nikola c");
        assert!((s - 2.0 / 14.0).abs() < 1e-12);
    }

    #[test]
    fn length_is_taken_before_lowercasing() {
        // 'İ' lowercases to two chars; the candidate is still 5 long
        let s = score("il", "İstal");
        assert!((s - 2.0 / 5.0).abs() < 1e-12);
    }

    #[test]
    fn best_score_takes_maximum() {
        assert_eq!(best_score("bos", ["Golden State", "Boston Celtics"]), 1.0);
        assert_eq!(best_score("bos", std::iter::empty()), 0.0);
    }

    #[test]
    fn rank_orders_by_score_and_keeps_ties_stable() {
        let names = ["Jayson Tatum", "Jaylen Brown", "Jrue Holiday", "Al Horford"];
        let ranked = rank("j", &names, |n| *n);
        // all three J-names contain "j" and score 1.0; input order kept
        let order: Vec<&str> = ranked.iter().map(|(n, _)| **n).collect();
        assert_eq!(order, vec!["Jayson Tatum", "Jaylen Brown", "Jrue Holiday"]);
    }

    #[test]
    fn rank_drops_non_matches() {
        let names = ["Stephen Curry", "Seth Curry"];
        let ranked = rank("seth", &names, |n| *n);
        assert_eq!(*ranked[0].0, "Seth Curry");
        assert_eq!(ranked[0].1, 1.0);
        assert_eq!(ranked.len(), 1);
    }
}
