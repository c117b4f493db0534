//! Typed catalog records extracted from the listing

use serde::{Deserialize, Serialize};

use crate::filter::predicates::{facet_matches, owner_matches, tags_match, title_matches};
use crate::filter::Searchable;
use crate::markup::{escape_attr, escape_text};
use crate::render::Renderable;

/// Class names used when re-rendering guides, shared with extraction defaults
pub const GUIDE_CLASS: &str = "guide";
pub const MULTI_GUIDE_CLASS: &str = "multi-guide";
pub const GUIDE_TITLE_CLASS: &str = "title";
pub const GUIDE_VARIANT_CLASS: &str = "align-left";
pub const GUIDE_VERSION_CLASS: &str = "framework-version";
pub const TAG_CLASS: &str = "tag";

/// A plugin listing entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginRecord {
    /// Plugin name; `None` when the listing entry had no title element
    pub name: Option<String>,

    pub description: Option<String>,

    pub owner: Option<String>,

    #[serde(default)]
    pub labels: Vec<String>,

    /// Link to the source repository, empty when absent
    #[serde(default)]
    pub source_url: String,

    /// Compatible framework versions, e.g. `5.3.1`
    #[serde(default)]
    pub framework_versions: Vec<String>,

    /// Dependency coordinates offered by the copy button
    #[serde(default)]
    pub coordinates: Option<String>,

    /// Inner markup of the listing entry, re-emitted verbatim
    #[serde(skip)]
    pub rendered_markup: String,

    /// The whole listing entry as it appeared on the page
    #[serde(skip)]
    pub listing_markup: String,
}

impl PluginRecord {
    /// Labels joined for display
    pub fn labels_display(&self) -> String {
        self.labels.join(", ")
    }

    /// Versions joined for display
    pub fn versions_display(&self) -> String {
        self.framework_versions.join(", ")
    }
}

impl Searchable for PluginRecord {
    fn matches_text(&self, query: &str) -> bool {
        title_matches(self.name.as_deref(), query)
            || owner_matches(self.owner.as_deref(), query)
            || tags_match(&self.labels, query)
    }

    fn matches_facet(&self, facet: &str) -> bool {
        facet_matches(&self.framework_versions, facet)
    }

    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

impl Renderable for PluginRecord {
    fn render_item(&self, _query: Option<&str>) -> String {
        format!(r#"<li class="plugin">{}</li>"#, self.rendered_markup)
    }

    fn render_listing(&self) -> String {
        if self.listing_markup.is_empty() {
            self.render_item(None)
        } else {
            self.listing_markup.clone()
        }
    }
}

/// One framework-version variant of a multi-version guide
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionVariant {
    pub framework_version: String,
    pub href: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleGuide {
    pub href: String,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiGuide {
    pub title: String,
    #[serde(default)]
    pub versions: Vec<VersionVariant>,
}

/// A guide is either a single page or a set of per-version pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GuideRecord {
    Single(SingleGuide),
    Multi(MultiGuide),
}

impl GuideRecord {
    pub fn title(&self) -> &str {
        match self {
            GuideRecord::Single(guide) => &guide.title,
            GuideRecord::Multi(guide) => &guide.title,
        }
    }

    /// Every tag on the guide, across variants for multi-guides
    pub fn all_tags(&self) -> Vec<&str> {
        match self {
            GuideRecord::Single(guide) => guide.tags.iter().map(String::as_str).collect(),
            GuideRecord::Multi(guide) => guide
                .versions
                .iter()
                .flat_map(|v| v.tags.iter().map(String::as_str))
                .collect(),
        }
    }
}

impl Searchable for GuideRecord {
    fn matches_text(&self, query: &str) -> bool {
        match self {
            GuideRecord::Single(guide) => {
                title_matches(Some(guide.title.as_str()), query) || tags_match(&guide.tags, query)
            }
            GuideRecord::Multi(guide) => {
                title_matches(Some(guide.title.as_str()), query)
                    || guide.versions.iter().any(|v| tags_match(&v.tags, query))
            }
        }
    }

    fn display_name(&self) -> &str {
        self.title()
    }
}

fn hidden_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| {
            format!(
                r#"<span style="display: none" class="{TAG_CLASS}">{}</span>"#,
                escape_text(tag)
            )
        })
        .collect()
}

impl Renderable for GuideRecord {
    /// Multi-guides only list the variants relevant to the query: all of
    /// them when the title matched, otherwise those whose tags matched.
    fn render_item(&self, query: Option<&str>) -> String {
        match self {
            GuideRecord::Single(guide) => format!(
                r#"<li><a class="{GUIDE_CLASS}" href="{}">{}</a>{}</li>"#,
                escape_attr(&guide.href),
                escape_text(&guide.title),
                hidden_tags(&guide.tags)
            ),
            GuideRecord::Multi(guide) => {
                let title_matched = query.map_or(true, |q| title_matches(Some(guide.title.as_str()), q));
                let versions: String = guide
                    .versions
                    .iter()
                    .filter(|v| title_matched || query.is_some_and(|q| tags_match(&v.tags, q)))
                    .map(|v| {
                        format!(
                            r#"<div class="{GUIDE_VARIANT_CLASS}"><a class="{GUIDE_VERSION_CLASS}" href="{}">{}</a>{}</div>"#,
                            escape_attr(&v.href),
                            escape_text(&v.framework_version),
                            hidden_tags(&v.tags)
                        )
                    })
                    .collect();
                format!(
                    r#"<li><div class="{MULTI_GUIDE_CLASS}"><span class="{GUIDE_TITLE_CLASS}">{}</span>{versions}</div></li>"#,
                    escape_text(&guide.title)
                )
            }
        }
    }
}
