//! Filter engine
//!
//! Turns the current [`FilterState`] into a [`FilterDecision`] and, when a
//! search is warranted, selects the matching records. The engine is generic
//! over the record type through [`Searchable`], so plugins and guides share
//! one code path and differ only in their predicates.

pub mod predicates;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Default minimum query length before a text search runs
pub const DEFAULT_MIN_QUERY_LEN: usize = 2;

/// Record-type specific matching strategy
pub trait Searchable {
    /// Whether the record matches a (trimmed, long enough) text query
    fn matches_text(&self, query: &str) -> bool;

    /// Whether the record matches a framework-version facet
    ///
    /// Record types without a facet concept match every facet.
    fn matches_facet(&self, _facet: &str) -> bool {
        true
    }

    /// Short name for logs and tables
    fn display_name(&self) -> &str;
}

/// Current query and facet selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub query: String,
    pub facet: Option<String>,
}

impl FilterState {
    pub fn new(query: impl Into<String>, facet: Option<&str>) -> Self {
        Self {
            query: query.into(),
            facet: facet.map(str::to_string),
        }
    }
}

/// A validated search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    text: Option<String>,
    facet: Option<String>,
}

impl SearchQuery {
    /// The text query, present only when it met the minimum length
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn facet(&self) -> Option<&str> {
        self.facet.as_deref()
    }

    pub fn accepts<R: Searchable + ?Sized>(&self, record: &R) -> bool {
        let text_ok = self.text().map_or(true, |text| record.matches_text(text));
        let facet_ok = self.facet().map_or(true, |facet| record.matches_facet(facet));
        text_ok && facet_ok
    }
}

/// What the caller should do with the current filter state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterDecision {
    /// No filter is active: restore the unfiltered default view
    RestoreDefault,
    /// The query is too short to act on: leave the current view alone
    Unchanged,
    /// Run the search
    Search(SearchQuery),
}

#[derive(Debug, Clone)]
pub struct FilterEngine {
    min_query_len: usize,
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_QUERY_LEN)
    }
}

impl FilterEngine {
    pub fn new(min_query_len: usize) -> Self {
        Self { min_query_len }
    }

    pub fn min_query_len(&self) -> usize {
        self.min_query_len
    }

    pub fn decide(&self, state: &FilterState) -> FilterDecision {
        let query = state.query.trim();
        let facet = state
            .facet
            .as_deref()
            .map(str::trim)
            .filter(|facet| !facet.is_empty());

        if query.is_empty() && facet.is_none() {
            return FilterDecision::RestoreDefault;
        }

        let long_enough = query.chars().count() >= self.min_query_len;
        if !query.is_empty() && !long_enough && facet.is_none() {
            debug!(query, "Query below minimum length, leaving view unchanged");
            return FilterDecision::Unchanged;
        }

        FilterDecision::Search(SearchQuery {
            text: (!query.is_empty() && long_enough).then(|| query.to_string()),
            facet: facet.map(str::to_string),
        })
    }

    /// Matching records in their original order
    pub fn run<'r, R: Searchable>(&self, records: &'r [R], query: &SearchQuery) -> Vec<&'r R> {
        let matches: Vec<&R> = records
            .iter()
            .filter(|record| {
                let accepted = query.accepts(*record);
                trace!(record = record.display_name(), accepted, "Evaluated record");
                accepted
            })
            .collect();

        debug!(
            text = ?query.text(),
            facet = ?query.facet(),
            matched = matches.len(),
            total = records.len(),
            "Filter run complete"
        );
        matches
    }

    /// Decide and run in one step
    ///
    /// Returns `None` when no search should happen (no filter active, or a
    /// query that is still too short).
    pub fn matches<'r, R: Searchable>(
        &self,
        records: &'r [R],
        state: &FilterState,
    ) -> Option<Vec<&'r R>> {
        match self.decide(state) {
            FilterDecision::Search(query) => Some(self.run(records, &query)),
            FilterDecision::RestoreDefault | FilterDecision::Unchanged => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    impl Searchable for Named {
        fn matches_text(&self, query: &str) -> bool {
            predicates::title_matches(Some(self.0), query)
        }

        fn display_name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_empty_state_restores_default() {
        let engine = FilterEngine::default();
        assert_eq!(
            engine.decide(&FilterState::new("   ", None)),
            FilterDecision::RestoreDefault
        );
        assert_eq!(
            engine.decide(&FilterState::new("", Some(""))),
            FilterDecision::RestoreDefault
        );
    }

    #[test]
    fn test_short_query_is_unchanged() {
        let engine = FilterEngine::default();
        assert_eq!(
            engine.decide(&FilterState::new(" a ", None)),
            FilterDecision::Unchanged
        );
    }

    #[test]
    fn test_short_query_with_facet_filters_by_facet_only() {
        let engine = FilterEngine::default();
        match engine.decide(&FilterState::new("a", Some("5"))) {
            FilterDecision::Search(query) => {
                assert_eq!(query.text(), None);
                assert_eq!(query.facet(), Some("5"));
            }
            other => panic!("expected search, got {other:?}"),
        }
    }

    #[test]
    fn test_query_is_trimmed() {
        let engine = FilterEngine::default();
        match engine.decide(&FilterState::new("  acme ", None)) {
            FilterDecision::Search(query) => assert_eq!(query.text(), Some("acme")),
            other => panic!("expected search, got {other:?}"),
        }
    }

    #[test]
    fn test_run_preserves_order_and_is_idempotent() {
        let records = vec![Named("beta one"), Named("alpha"), Named("beta two")];
        let engine = FilterEngine::default();
        let state = FilterState::new("beta", None);

        let first: Vec<&str> = engine
            .matches(&records, &state)
            .unwrap()
            .iter()
            .map(|r| r.0)
            .collect();
        let second: Vec<&str> = engine
            .matches(&records, &state)
            .unwrap()
            .iter()
            .map(|r| r.0)
            .collect();

        assert_eq!(first, vec!["beta one", "beta two"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_multibyte_length_counts_chars() {
        let engine = FilterEngine::new(2);
        assert_eq!(
            engine.decide(&FilterState::new("é", None)),
            FilterDecision::Unchanged
        );
        assert!(matches!(
            engine.decide(&FilterState::new("éa", None)),
            FilterDecision::Search(_)
        ));
    }
}
