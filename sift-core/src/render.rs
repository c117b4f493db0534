//! Result rendering and view-state switching
//!
//! Exactly one of the default listing, the search results and the
//! no-results region is visible at a time. Leaving the results state always
//! clears injected result markup and pagination controls.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::markup::escape_text;
use crate::view::{RegionRegistry, View};

/// Serializes a record back into a list item
pub trait Renderable {
    /// Markup for one list item; `query` is the active text query, if any
    fn render_item(&self, query: Option<&str>) -> String;

    /// Markup for the record in the unfiltered listing
    fn render_listing(&self) -> String {
        self.render_item(None)
    }
}

/// Which of the mutually exclusive regions is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    Default,
    Results,
    NoResults,
}

/// Markup wrapped around a list of rendered items
///
/// `open` may contain `{query}` (the raw query) and `{heading}` (the filter
/// summary); both are substituted escaped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFrame {
    pub open: String,
    pub close: String,
}

impl ListFrame {
    pub fn plugin_list() -> Self {
        Self {
            open: r#"<ul class="plugin-list">"#.to_string(),
            close: "</ul>".to_string(),
        }
    }

    pub fn guide_group() -> Self {
        Self {
            open: concat!(
                r#"<div class="guide-group">"#,
                r#"<div class="guide-group-header"><h2>Guides Filtered by: {query}</h2></div>"#,
                "<ul>"
            )
            .to_string(),
            close: "</ul></div>".to_string(),
        }
    }

    /// A frame with placeholders substituted
    pub fn resolve(&self, query: &str, heading: &str) -> Self {
        Self {
            open: self
                .open
                .replace("{query}", &escape_text(query))
                .replace("{heading}", &escape_text(heading)),
            close: self.close.clone(),
        }
    }

    pub fn wrap(&self, items: &[String]) -> String {
        let mut html = String::with_capacity(
            self.open.len() + self.close.len() + items.iter().map(String::len).sum::<usize>(),
        );
        html.push_str(&self.open);
        for item in items {
            html.push_str(item);
        }
        html.push_str(&self.close);
        html
    }
}

/// Summary of the active filters, e.g. `"acme" + Framework 5.x`
pub fn results_heading(query: Option<&str>, facet: Option<&str>, facet_label: &str) -> String {
    let mut parts = Vec::new();
    if let Some(query) = query {
        parts.push(format!("\"{query}\""));
    }
    if let Some(facet) = facet {
        parts.push(format!("{facet_label} {facet}.x"));
    }
    parts.join(" + ")
}

fn clear_results(view: &mut dyn View, regions: &RegionRegistry) {
    if let Some(content) = regions.results_content() {
        view.set_inner_html(content, "");
    }
    for mount in &regions.pagination {
        view.set_inner_html(mount.handle, "");
    }
}

/// Show the unfiltered listing
///
/// The caller is responsible for re-paginating the default list.
pub fn show_default_view(view: &mut dyn View, regions: &RegionRegistry) {
    debug!("Showing default view");
    view.set_all_hidden(&regions.no_results, true);
    view.set_all_hidden(&regions.results, true);
    view.set_all_hidden(&regions.results_heading, true);
    clear_results(view, regions);
    view.set_all_hidden(&regions.default_regions, false);
}

/// Show the results region with a filter summary heading
///
/// The caller renders the result list itself (through a paginator).
pub fn show_results_view(view: &mut dyn View, regions: &RegionRegistry, heading: &str) {
    debug!(heading, "Showing results view");
    view.set_all_hidden(&regions.default_regions, true);
    if let Some(text) = regions.results_heading_text {
        view.set_inner_html(text, &escape_text(heading));
    }
    view.set_all_hidden(&regions.results_heading, false);
    view.set_all_hidden(&regions.results, false);
    view.set_all_hidden(&regions.no_results, true);
}

/// Show the no-results state
///
/// Pages without a dedicated no-results region get `fallback` injected into
/// the results region instead.
pub fn show_no_results_view(view: &mut dyn View, regions: &RegionRegistry, fallback: Option<&str>) {
    debug!("Showing no-results view");
    clear_results(view, regions);
    view.set_all_hidden(&regions.default_regions, true);
    view.set_all_hidden(&regions.results_heading, true);

    if !regions.no_results.is_empty() {
        view.set_all_hidden(&regions.results, true);
        view.set_all_hidden(&regions.no_results, false);
    } else if let (Some(content), Some(fallback)) = (regions.results_content(), fallback) {
        view.set_inner_html(content, fallback);
        view.set_all_hidden(&regions.results, false);
    } else {
        view.set_all_hidden(&regions.results, true);
    }
}
