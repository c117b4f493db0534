//! Search page context
//!
//! A [`SearchPage`] owns everything one listing page needs: the extracted
//! records, the current inputs, the resolved regions and the active
//! paginator. Input handlers mutate it and re-render through its [`View`].
//!
//! ```text
//! input event ─▶ FilterState ─▶ FilterEngine::decide
//!                                   │
//!          ┌────────────────────────┼───────────────────────┐
//!          ▼                        ▼                       ▼
//!   RestoreDefault              Unchanged              Search(query)
//!   default view +              (nothing)        results / no-results view
//!   default paginator                              + fresh paginator
//! ```

mod loaders;

pub use loaders::{load_guide_page, load_plugin_page};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::config::PageOptions;
use crate::controls::SearchBox;
use crate::error::Result;
use crate::filter::{FilterDecision, FilterEngine, FilterState, SearchQuery, Searchable};
use crate::paginate::{ContentMount, PageLink, Paginator};
use crate::render::{
    results_heading, show_default_view, show_no_results_view, show_results_view, ListFrame,
    Renderable, ViewState,
};
use crate::view::{RegionRegistry, View};

/// Which query input an event came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryInput {
    Primary,
    Mobile,
}

/// What a filter run did to the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOutcome {
    /// The unfiltered listing is shown
    Default,
    /// Nothing changed
    Unchanged,
    /// Matching records are shown
    Results(usize),
    NoResults,
}

#[derive(Debug)]
pub struct SearchPage<R, V> {
    records: Vec<R>,
    view: V,
    regions: RegionRegistry,
    engine: FilterEngine,
    options: PageOptions,
    primary_query: String,
    mobile_query: String,
    facet: Option<String>,
    view_state: ViewState,
    paginator: Option<Paginator>,
    generation: u64,
}

impl<R, V> SearchPage<R, V>
where
    R: Searchable + Renderable,
    V: View,
{
    /// Resolve regions and show the default listing
    pub fn load(records: Vec<R>, view: V, options: PageOptions) -> Result<Self> {
        let regions = RegionRegistry::resolve(&view, &options.regions)?;
        let mut page = Self {
            records,
            view,
            regions,
            engine: FilterEngine::new(options.min_query_len),
            options,
            primary_query: String::new(),
            mobile_query: String::new(),
            facet: None,
            view_state: ViewState::Default,
            paginator: None,
            generation: 0,
        };

        info!(
            records = page.records.len(),
            page_size = page.options.page_size,
            "Search page loaded"
        );
        page.restore_default();
        Ok(page)
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn regions(&self) -> &RegionRegistry {
        &self.regions
    }

    pub fn view_state(&self) -> ViewState {
        self.view_state
    }

    pub fn paginator(&self) -> Option<&Paginator> {
        self.paginator.as_ref()
    }

    /// The effective filter state: the primary query, or the mobile query
    /// when the primary one is blank
    pub fn filter_state(&self) -> FilterState {
        let primary = self.primary_query.trim();
        let query = if primary.is_empty() {
            self.mobile_query.trim()
        } else {
            primary
        };
        FilterState::new(query, self.facet.as_deref())
    }

    pub fn on_query_input(&mut self, input: QueryInput, value: &str) -> FilterOutcome {
        match input {
            QueryInput::Primary => {
                if self.regions.query_input.is_none() {
                    debug!("No query input on this page, ignoring input");
                    return FilterOutcome::Unchanged;
                }
                self.primary_query = value.to_string();
                if let Some(wrapper) = self.regions.search_box {
                    SearchBox::new(wrapper).sync(&mut self.view, value);
                }
            }
            QueryInput::Mobile => {
                if self.regions.mobile_query_input.is_none() {
                    debug!("No mobile query input on this page, ignoring input");
                    return FilterOutcome::Unchanged;
                }
                self.mobile_query = value.to_string();
            }
        }
        self.on_filter_changed()
    }

    /// A new facet selection; `None` or an empty value clears it
    pub fn on_facet_changed(&mut self, facet: Option<&str>) -> FilterOutcome {
        if self.regions.facet_select.is_none() {
            debug!("No facet select on this page, ignoring change");
            return FilterOutcome::Unchanged;
        }
        self.facet = facet.filter(|facet| !facet.is_empty()).map(str::to_string);
        self.on_filter_changed()
    }

    /// Clear button: empty the primary query and re-filter
    pub fn on_clear(&mut self) -> FilterOutcome {
        let (Some(_), Some(wrapper)) = (self.regions.clear_button, self.regions.search_box) else {
            debug!("No clear button on this page, ignoring click");
            return FilterOutcome::Unchanged;
        };
        self.primary_query.clear();
        SearchBox::new(wrapper).clear(&mut self.view);
        self.on_filter_changed()
    }

    #[instrument(
        name = "filter_changed",
        skip(self),
        fields(
            records = self.records.len(),
            matched = tracing::field::Empty
        )
    )]
    pub fn on_filter_changed(&mut self) -> FilterOutcome {
        let state = self.filter_state();
        match self.engine.decide(&state) {
            FilterDecision::RestoreDefault => {
                self.restore_default();
                FilterOutcome::Default
            }
            FilterDecision::Unchanged => FilterOutcome::Unchanged,
            FilterDecision::Search(query) => {
                let outcome = self.show_search(&state, &query);
                if let FilterOutcome::Results(matched) = outcome {
                    tracing::Span::current().record("matched", matched);
                }
                outcome
            }
        }
    }

    /// Page link click; `false` when the link is stale
    pub fn on_page_link(&mut self, link: PageLink) -> bool {
        match self.paginator.as_mut() {
            Some(paginator) => paginator.click(&mut self.view, link),
            None => {
                debug!("Page link clicked with no active paginator");
                false
            }
        }
    }

    /// Jump to a page of the active list without scroll anchoring
    pub fn show_page(&mut self, page: usize) -> bool {
        match self.paginator.as_mut() {
            Some(paginator) => paginator.go_to(&mut self.view, page, false),
            None => false,
        }
    }

    /// The link a mount currently shows for `page`
    pub fn page_link(&self, mount: usize, page: usize) -> Option<PageLink> {
        self.paginator.as_ref()?.link(mount, page)
    }

    fn restore_default(&mut self) {
        show_default_view(&mut self.view, &self.regions);
        self.view_state = ViewState::Default;

        match self.regions.default_content {
            Some(handle) => {
                let items: Vec<String> = self
                    .records
                    .iter()
                    .map(Renderable::render_listing)
                    .collect();
                let content = ContentMount {
                    handle,
                    frame: ListFrame::default(),
                };
                self.replace_paginator(items, content);
            }
            None => self.drop_paginator(),
        }
    }

    fn show_search(&mut self, state: &FilterState, query: &SearchQuery) -> FilterOutcome {
        let Some(results) = self.regions.results_content() else {
            warn!("No results region on this page, skipping search");
            return FilterOutcome::Unchanged;
        };

        let items: Vec<String> = self
            .engine
            .run(&self.records, query)
            .into_iter()
            .map(|record| record.render_item(query.text()))
            .collect();

        if items.is_empty() {
            self.drop_paginator();
            show_no_results_view(
                &mut self.view,
                &self.regions,
                self.options.no_results_fallback.as_deref(),
            );
            self.view_state = ViewState::NoResults;
            return FilterOutcome::NoResults;
        }

        let matched = items.len();
        let heading = results_heading(query.text(), query.facet(), &self.options.facet_label);
        show_results_view(&mut self.view, &self.regions, &heading);
        self.view_state = ViewState::Results;

        let content = ContentMount {
            handle: results,
            frame: self.options.frame.resolve(state.query.trim(), &heading),
        };
        self.replace_paginator(items, content);
        FilterOutcome::Results(matched)
    }

    /// Start a fresh paginator; links from the previous one go stale
    fn replace_paginator(&mut self, items: Vec<String>, content: ContentMount) {
        self.generation += 1;
        let page_size = if self.regions.pagination.is_empty() {
            items.len().max(1)
        } else {
            self.options.page_size
        };
        self.paginator = Some(Paginator::initialize(
            &mut self.view,
            items,
            page_size,
            content,
            self.regions.pagination.clone(),
            self.generation,
        ));
    }

    fn drop_paginator(&mut self) {
        self.generation += 1;
        self.paginator = None;
    }
}
