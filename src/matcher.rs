// Tiered fuzzy name search.
//
// Tiers run strictly in order and the first one that produces anything wins;
// results are never merged across tiers, so a tier-1 hit is authoritative.

use std::collections::HashSet;

use crate::fields::resolve_name;
use crate::normalize::Record;

/// Upper bound on matches returned for any query.
pub const MAX_MATCHES: usize = 10;

/// Which strategy produced a match set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Exact,
    Substring,
    Compact,
    TokenOverlap,
}

/// Lowercase, keep only `[a-z0-9 ]`, collapse whitespace runs, trim.
pub fn normalize_name(raw: &str) -> String {
    let kept: String = raw
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ')
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Records whose name matches `query`, at most [`MAX_MATCHES`].
pub fn find_matches<'a>(records: &'a [Record], query: &str) -> Vec<&'a Record> {
    find_matches_with_tier(records, query)
        .map(|(_, matches)| matches)
        .unwrap_or_default()
}

/// Like [`find_matches`], also reporting the tier that produced the result.
/// Returns `None` when no tier matched.
pub fn find_matches_with_tier<'a>(
    records: &'a [Record],
    query: &str,
) -> Option<(Tier, Vec<&'a Record>)> {
    let query = normalize_name(query);
    if query.is_empty() {
        return None;
    }

    let named: Vec<(String, &Record)> = records
        .iter()
        .map(|r| (normalize_name(&resolve_name(r)), r))
        .collect();

    let exact = collect(&named, |name| name == query);
    if !exact.is_empty() {
        return Some((Tier::Exact, exact));
    }

    let substring = collect(&named, |name| name.contains(query.as_str()));
    if !substring.is_empty() {
        return Some((Tier::Substring, substring));
    }

    let compact_query = query.replace(' ', "");
    let compact = collect(&named, |name| name.replace(' ', "").contains(&compact_query));
    if !compact.is_empty() {
        return Some((Tier::Compact, compact));
    }

    let tokens: HashSet<&str> = query.split(' ').collect();
    let mut scored: Vec<(usize, &Record)> = named
        .iter()
        .map(|(name, r)| {
            let score = tokens.iter().filter(|t| name.contains(**t)).count();
            (score, *r)
        })
        .filter(|(score, _)| *score > 0)
        .collect();
    // stable: equal scores keep input order
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.truncate(MAX_MATCHES);

    if scored.is_empty() {
        None
    } else {
        Some((
            Tier::TokenOverlap,
            scored.into_iter().map(|(_, r)| r).collect(),
        ))
    }
}

fn collect<'a, F>(named: &[(String, &'a Record)], pred: F) -> Vec<&'a Record>
where
    F: Fn(&str) -> bool,
{
    named
        .iter()
        .filter(|(name, _)| pred(name))
        .map(|(_, r)| *r)
        .take(MAX_MATCHES)
        .collect()
}
