//! Fuzzy name resolution against a known candidate list.
//!
//! Resolution ladder: exact match, then case-insensitive match, then the
//! best Jaro-Winkler candidate above a similarity floor. Used to map
//! user-supplied team or player names onto provider spellings; it never
//! rewrites attribution inside the data itself.

use strsim::jaro_winkler;

/// Minimum Jaro-Winkler similarity for a fuzzy suggestion.
pub const FUZZY_THRESHOLD: f64 = 0.85;

/// How a query was matched to a candidate name.
#[derive(Debug, Clone, PartialEq)]
pub enum NameMatch {
    Exact(String),
    CaseInsensitive(String),
    Fuzzy { name: String, score: f64 },
}

impl NameMatch {
    pub fn name(&self) -> &str {
        match self {
            NameMatch::Exact(name)
            | NameMatch::CaseInsensitive(name)
            | NameMatch::Fuzzy { name, .. } => name,
        }
    }

    pub fn into_name(self) -> String {
        match self {
            NameMatch::Exact(name)
            | NameMatch::CaseInsensitive(name)
            | NameMatch::Fuzzy { name, .. } => name,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, NameMatch::Exact(_))
    }
}

/// Resolve a query against candidate names.
pub fn resolve<'a, I>(query: &str, candidates: I) -> Option<NameMatch>
where
    I: IntoIterator<Item = &'a str>,
{
    let query = query.trim();
    if query.is_empty() {
        return None;
    }

    let candidates: Vec<&str> = candidates.into_iter().collect();

    if let Some(&name) = candidates.iter().find(|&&c| c == query) {
        return Some(NameMatch::Exact(name.to_string()));
    }

    if let Some(&name) = candidates
        .iter()
        .find(|&&c| c.eq_ignore_ascii_case(query))
    {
        return Some(NameMatch::CaseInsensitive(name.to_string()));
    }

    let query_lower = query.to_lowercase();
    let mut best: Option<(&str, f64)> = None;
    for &candidate in &candidates {
        let score = jaro_winkler(&query_lower, &candidate.to_lowercase());
        if score >= FUZZY_THRESHOLD && best.map_or(true, |(_, s)| score > s) {
            best = Some((candidate, score));
        }
    }

    best.map(|(name, score)| NameMatch::Fuzzy {
        name: name.to_string(),
        score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEAMS: [&str; 4] = ["Argentina", "France", "Croatia", "Morocco"];

    #[test]
    fn test_exact_beats_everything() {
        let matched = resolve("France", TEAMS).unwrap();
        assert_eq!(matched, NameMatch::Exact("France".to_string()));
        assert!(matched.is_exact());
    }

    #[test]
    fn test_case_insensitive_fallback() {
        let matched = resolve("argentina", TEAMS).unwrap();
        assert_eq!(
            matched,
            NameMatch::CaseInsensitive("Argentina".to_string())
        );
    }

    #[test]
    fn test_fuzzy_typo_resolves() {
        let matched = resolve("Croatai", TEAMS).unwrap();
        match matched {
            NameMatch::Fuzzy { name, score } => {
                assert_eq!(name, "Croatia");
                assert!(score >= FUZZY_THRESHOLD, "score {}", score);
            }
            other => panic!("expected a fuzzy match, got {:?}", other),
        }
    }

    #[test]
    fn test_distant_query_unresolved() {
        assert_eq!(resolve("Borussia Dortmund", TEAMS), None);
        assert_eq!(resolve("   ", TEAMS), None);
        assert_eq!(resolve("France", []), None);
    }
}
