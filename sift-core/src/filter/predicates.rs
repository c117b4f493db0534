//! Composable match predicates
//!
//! All text comparisons are case-insensitive substring tests. There is no
//! scoring: a record either matches or it does not.

/// Title containment, with an AND-of-terms fallback for multi-word queries
///
/// `"security core"` matches `"Spring Security Core"` both ways; `"core zzz"`
/// does not because `zzz` is missing. A missing title never matches.
pub fn title_matches(title: Option<&str>, query: &str) -> bool {
    let Some(title) = title else {
        return false;
    };
    let title = title.to_lowercase();
    let query = query.to_lowercase();

    if title.contains(&query) {
        return true;
    }

    if !query.contains(char::is_whitespace) {
        return false;
    }
    let terms: Vec<&str> = query.split_whitespace().collect();
    !terms.is_empty() && terms.iter().all(|term| title.contains(term))
}

/// Owner containment; a missing owner never matches
pub fn owner_matches(owner: Option<&str>, query: &str) -> bool {
    owner.is_some_and(|owner| owner.to_lowercase().contains(&query.to_lowercase()))
}

/// True when any tag contains the query
pub fn tags_match<S: AsRef<str>>(tags: &[S], query: &str) -> bool {
    let query = query.to_lowercase();
    tags.iter()
        .any(|tag| tag.as_ref().to_lowercase().contains(&query))
}

/// Major-version facet test
///
/// An empty facet matches everything. Otherwise a version matches when it
/// equals the facet or starts with `facet + "."`, so `"5"` matches `"5.3.1"`
/// but not `"52.0"`.
pub fn facet_matches<S: AsRef<str>>(versions: &[S], facet: &str) -> bool {
    if facet.is_empty() {
        return true;
    }
    let prefix = format!("{facet}.");
    versions.iter().any(|version| {
        let version = version.as_ref();
        version == facet || version.starts_with(&prefix)
    })
}
