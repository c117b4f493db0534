use tracing::debug;

use super::{ElementHandle, View};
use crate::config::RegionSelectors;
use crate::error::Result;
use crate::markup::Selector;
use crate::paginate::PaginationMount;

/// Page regions resolved once at load
///
/// A region whose selector is unset or matches nothing is absent, which
/// turns the features that depend on it off.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionRegistry {
    pub default_regions: Vec<ElementHandle>,
    pub default_content: Option<ElementHandle>,
    pub results: Vec<ElementHandle>,
    pub results_heading: Vec<ElementHandle>,
    pub results_heading_text: Option<ElementHandle>,
    pub no_results: Vec<ElementHandle>,
    pub pagination: Vec<PaginationMount>,
    pub query_input: Option<ElementHandle>,
    pub mobile_query_input: Option<ElementHandle>,
    pub facet_select: Option<ElementHandle>,
    pub search_box: Option<ElementHandle>,
    pub clear_button: Option<ElementHandle>,
}

fn all_of(view: &dyn View, selector: Option<&str>) -> Result<Vec<ElementHandle>> {
    match selector {
        Some(selector) => Ok(view.select(&Selector::parse(selector)?)),
        None => Ok(Vec::new()),
    }
}

fn first_of(view: &dyn View, selector: Option<&str>) -> Result<Option<ElementHandle>> {
    Ok(all_of(view, selector)?.into_iter().next())
}

impl RegionRegistry {
    pub fn resolve(view: &dyn View, selectors: &RegionSelectors) -> Result<Self> {
        let mut default_regions = Vec::new();
        for selector in &selectors.default_regions {
            default_regions.extend(all_of(view, Some(selector))?);
        }

        let bottom = all_of(view, selectors.pagination_bottom.as_deref())?;
        let pagination = all_of(view, selectors.pagination.as_deref())?
            .into_iter()
            .map(|handle| PaginationMount {
                handle,
                anchor_to_viewport_bottom: bottom.contains(&handle),
            })
            .collect();

        let registry = Self {
            default_regions,
            default_content: first_of(view, selectors.default_content.as_deref())?,
            results: all_of(view, selectors.results.as_deref())?,
            results_heading: all_of(view, selectors.results_heading.as_deref())?,
            results_heading_text: first_of(view, selectors.results_heading_text.as_deref())?,
            no_results: all_of(view, selectors.no_results.as_deref())?,
            pagination,
            query_input: first_of(view, selectors.query_input.as_deref())?,
            mobile_query_input: first_of(view, selectors.mobile_query_input.as_deref())?,
            facet_select: first_of(view, selectors.facet_select.as_deref())?,
            search_box: first_of(view, selectors.search_box.as_deref())?,
            clear_button: first_of(view, selectors.clear_button.as_deref())?,
        };

        debug!(
            default_regions = registry.default_regions.len(),
            results = registry.results.len(),
            pagination = registry.pagination.len(),
            "Resolved page regions"
        );
        Ok(registry)
    }

    /// Element that receives rendered result lists
    pub fn results_content(&self) -> Option<ElementHandle> {
        self.results.first().copied()
    }
}
