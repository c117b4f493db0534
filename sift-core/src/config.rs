//! Sift configuration (`sift.yaml`)
//!
//! Every selector the engine uses to locate records and page regions lives
//! here, so a differently structured listing can be driven without code
//! changes. A missing configuration file means built-in defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::catalog::record::{
    GUIDE_CLASS, GUIDE_TITLE_CLASS, GUIDE_VARIANT_CLASS, GUIDE_VERSION_CLASS, MULTI_GUIDE_CLASS,
    TAG_CLASS,
};
use crate::catalog::{GuideSelectors, PluginSelectors};
use crate::error::SiftError;
use crate::filter::DEFAULT_MIN_QUERY_LEN;
use crate::markup::Selector;
use crate::render::ListFrame;

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Default configuration file name inside the config directory
pub const CONFIG_FILE_NAME: &str = "sift.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiftConfig {
    /// Items per page
    pub page_size: usize,

    /// Minimum query length before a text search runs
    pub min_query_len: usize,

    /// Label used for the facet in the results heading ("Framework 5.x")
    pub facet_label: String,

    pub plugins: PluginLayout,

    pub guides: GuideLayout,

    pub navigation: NavigationSelectors,
}

impl Default for SiftConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            min_query_len: DEFAULT_MIN_QUERY_LEN,
            facet_label: "Framework".to_string(),
            plugins: PluginLayout::default(),
            guides: GuideLayout::default(),
            navigation: NavigationSelectors::default(),
        }
    }
}

/// Selectors for the fields of one plugin listing entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginFields {
    /// One element per plugin
    pub item: String,
    pub name: String,
    pub description: String,
    pub owner: String,
    pub labels: String,
    /// Anchor whose `href` points at the source repository
    pub source_link: String,
    /// Version badges
    pub versions: String,
    /// Copy button carrying `data-coords`
    pub coordinates: String,
}

impl Default for PluginFields {
    fn default() -> Self {
        Self {
            item: "div.all-plugins ul > li.plugin".to_string(),
            name: ".name".to_string(),
            description: ".desc".to_string(),
            owner: ".owner".to_string(),
            labels: ".label".to_string(),
            source_link: "h3.name > a".to_string(),
            versions: ".framework-compat, .compat".to_string(),
            coordinates: ".copy-btn".to_string(),
        }
    }
}

/// Selectors and class names for guide entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideFields {
    pub single: String,
    pub multi: String,
    /// Class of tag spans next to a guide link or inside a variant
    pub tag_class: String,
    /// Class of the title child of a multi-guide
    pub title_class: String,
    /// Class of each version variant child of a multi-guide
    pub variant_class: String,
    /// Class of the version link inside a variant
    pub version_class: String,
}

impl Default for GuideFields {
    fn default() -> Self {
        Self {
            single: format!("a.{GUIDE_CLASS}"),
            multi: format!(".{MULTI_GUIDE_CLASS}"),
            tag_class: TAG_CLASS.to_string(),
            title_class: GUIDE_TITLE_CLASS.to_string(),
            variant_class: GUIDE_VARIANT_CLASS.to_string(),
            version_class: GUIDE_VERSION_CLASS.to_string(),
        }
    }
}

/// Selectors for the page regions a search page manipulates
///
/// Every entry is optional: a region whose selector is absent, or matches
/// nothing, is treated as not present on the page. A `regions` section in
/// the configuration file replaces the built-in one entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionSelectors {
    /// Regions hidden while search results are shown
    pub default_regions: Vec<String>,
    /// List element the default listing is paginated into
    pub default_content: Option<String>,
    pub results: Option<String>,
    pub results_heading: Option<String>,
    /// Element inside the heading that receives the filter summary
    pub results_heading_text: Option<String>,
    pub no_results: Option<String>,
    pub pagination: Option<String>,
    /// Pagination mounts that keep their distance to the page bottom
    pub pagination_bottom: Option<String>,
    pub query_input: Option<String>,
    pub mobile_query_input: Option<String>,
    pub facet_select: Option<String>,
    pub search_box: Option<String>,
    pub clear_button: Option<String>,
}

impl RegionSelectors {
    pub fn plugins() -> Self {
        Self {
            default_regions: vec![".all-plugins".to_string(), ".all-plugins-label".to_string()],
            default_content: Some("div.plugins ul.plugin-list".to_string()),
            results: Some("div.search-results".to_string()),
            results_heading: Some("h3.search-results-label".to_string()),
            results_heading_text: Some("h3.search-results-label span".to_string()),
            no_results: Some(".no-results".to_string()),
            pagination: Some(".pagination-container".to_string()),
            pagination_bottom: Some(".pagination-container.bottom".to_string()),
            query_input: Some("#query".to_string()),
            mobile_query_input: Some("#mobile-query".to_string()),
            facet_select: Some("#framework-version-select".to_string()),
            search_box: Some(".search-box-inline".to_string()),
            clear_button: Some(".search-clear-btn".to_string()),
        }
    }

    pub fn guides() -> Self {
        Self {
            default_regions: [
                ".training",
                ".latest-guides",
                ".guide-group",
                ".tags-by-topic",
                ".guides-suggestion",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            results: Some(".search-results".to_string()),
            query_input: Some("#query".to_string()),
            mobile_query_input: Some("#mobile-query".to_string()),
            ..Self::default()
        }
    }

    /// Every configured selector, for validation
    fn all(&self) -> impl Iterator<Item = &String> {
        self.default_regions.iter().chain(
            [
                &self.default_content,
                &self.results,
                &self.results_heading,
                &self.results_heading_text,
                &self.no_results,
                &self.pagination,
                &self.pagination_bottom,
                &self.query_input,
                &self.mobile_query_input,
                &self.facet_select,
                &self.search_box,
                &self.clear_button,
            ]
            .into_iter()
            .flatten(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginLayout {
    pub fields: PluginFields,
    pub regions: RegionSelectors,
    pub frame: ListFrame,
    /// Markup injected into the results region when no `no_results` region exists
    pub no_results_fallback: Option<String>,
}

impl Default for PluginLayout {
    fn default() -> Self {
        Self {
            fields: PluginFields::default(),
            regions: RegionSelectors::plugins(),
            frame: ListFrame::plugin_list(),
            no_results_fallback: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideLayout {
    pub fields: GuideFields,
    pub regions: RegionSelectors,
    pub frame: ListFrame,
    pub no_results_fallback: Option<String>,
}

impl Default for GuideLayout {
    fn default() -> Self {
        Self {
            fields: GuideFields::default(),
            regions: RegionSelectors::guides(),
            frame: ListFrame::guide_group(),
            no_results_fallback: Some(
                r#"<div class="guide-group"><div class="guide-group-header"><h2>No results found</h2></div></div>"#
                    .to_string(),
            ),
        }
    }
}

/// Selectors for the navigation widgets outside the search core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationSelectors {
    pub tabs: String,
    pub tab_contents: String,
    pub dropdowns: String,
    pub copy_buttons: String,
}

impl Default for NavigationSelectors {
    fn default() -> Self {
        Self {
            tabs: ".plugins-nav .nav-tab".to_string(),
            tab_contents: ".tab-content".to_string(),
            dropdowns: ".version-dropdown".to_string(),
            copy_buttons: ".copy-btn".to_string(),
        }
    }
}

/// Settings a search page needs, resolved from the configuration
#[derive(Debug, Clone)]
pub struct PageOptions {
    pub page_size: usize,
    pub min_query_len: usize,
    pub facet_label: String,
    pub regions: RegionSelectors,
    pub frame: ListFrame,
    pub no_results_fallback: Option<String>,
}

impl SiftConfig {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let path = Self::default_config_path()?;
        Self::load_from_path(&path)
    }

    /// Load configuration from a specific path, falling back to defaults
    /// when the file does not exist
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to load config: {}", path.display()))?;

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration from YAML
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self =
            serde_yaml_ng::from_str(content).context("Failed to parse sift config YAML")?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml_ng::to_string(self).context("Failed to serialize sift config")
    }

    /// The default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("dev", "sift", "sift")
            .context("Could not determine config directory")?;
        Ok(dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Check limits and that every selector parses
    pub fn validate(&self) -> crate::Result<()> {
        if self.page_size == 0 {
            return Err(SiftError::Config("page_size must be at least 1".to_string()));
        }
        if self.min_query_len == 0 {
            return Err(SiftError::Config(
                "min_query_len must be at least 1".to_string(),
            ));
        }

        PluginSelectors::from_fields(&self.plugins.fields)?;
        GuideSelectors::from_fields(&self.guides.fields)?;

        let navigation = [
            &self.navigation.tabs,
            &self.navigation.tab_contents,
            &self.navigation.dropdowns,
            &self.navigation.copy_buttons,
        ];
        for selector in self
            .plugins
            .regions
            .all()
            .chain(self.guides.regions.all())
            .chain(navigation)
        {
            Selector::parse(selector)?;
        }

        Ok(())
    }

    pub fn plugin_page_options(&self) -> PageOptions {
        PageOptions {
            page_size: self.page_size,
            min_query_len: self.min_query_len,
            facet_label: self.facet_label.clone(),
            regions: self.plugins.regions.clone(),
            frame: self.plugins.frame.clone(),
            no_results_fallback: self.plugins.no_results_fallback.clone(),
        }
    }

    pub fn guide_page_options(&self) -> PageOptions {
        PageOptions {
            page_size: self.page_size,
            min_query_len: self.min_query_len,
            facet_label: self.facet_label.clone(),
            regions: self.guides.regions.clone(),
            frame: self.guides.frame.clone(),
            no_results_fallback: self.guides.no_results_fallback.clone(),
        }
    }
}
