//! Page constructors for the two listing kinds

use tracing::info;

use super::SearchPage;
use crate::catalog::{extract_guides, extract_plugins, GuideRecord, GuideSelectors, PluginRecord, PluginSelectors};
use crate::config::SiftConfig;
use crate::error::Result;
use crate::markup::Document;
use crate::view::MemoryView;

/// Parse a plugin listing page and build its search context
pub fn load_plugin_page(
    markup: impl Into<String>,
    config: &SiftConfig,
) -> Result<SearchPage<PluginRecord, MemoryView>> {
    let document = Document::parse(markup)?;
    let selectors = PluginSelectors::from_fields(&config.plugins.fields)?;
    let records = extract_plugins(&document, &selectors);
    info!(plugins = records.len(), "Extracted plugin records");

    SearchPage::load(records, MemoryView::new(document), config.plugin_page_options())
}

/// Parse a guide listing page and build its search context
pub fn load_guide_page(
    markup: impl Into<String>,
    config: &SiftConfig,
) -> Result<SearchPage<GuideRecord, MemoryView>> {
    let document = Document::parse(markup)?;
    let selectors = GuideSelectors::from_fields(&config.guides.fields)?;
    let records = extract_guides(&document, &selectors);
    info!(guides = records.len(), "Extracted guide records");

    SearchPage::load(records, MemoryView::new(document), config.guide_page_options())
}
