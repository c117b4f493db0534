//! Record extraction from a rendered listing
//!
//! Runs once per page. Missing optional fields become `None` or empty, never
//! an error; only malformed selectors fail.

use semver::Version;
use tracing::{debug, info, trace};

use super::record::{GuideRecord, MultiGuide, PluginRecord, SingleGuide, VersionVariant};
use crate::config::{GuideFields, PluginFields};
use crate::error::Result;
use crate::markup::{Document, ElementRef, Selector};

/// Parsed selectors for plugin fields
#[derive(Debug, Clone)]
pub struct PluginSelectors {
    item: Selector,
    name: Selector,
    description: Selector,
    owner: Selector,
    labels: Selector,
    source_link: Selector,
    versions: Selector,
    coordinates: Selector,
}

impl PluginSelectors {
    pub fn from_fields(fields: &PluginFields) -> Result<Self> {
        Ok(Self {
            item: Selector::parse(&fields.item)?,
            name: Selector::parse(&fields.name)?,
            description: Selector::parse(&fields.description)?,
            owner: Selector::parse(&fields.owner)?,
            labels: Selector::parse(&fields.labels)?,
            source_link: Selector::parse(&fields.source_link)?,
            versions: Selector::parse(&fields.versions)?,
            coordinates: Selector::parse(&fields.coordinates)?,
        })
    }
}

/// Parsed selectors and class names for guide entries
#[derive(Debug, Clone)]
pub struct GuideSelectors {
    single: Selector,
    multi: Selector,
    tag_class: String,
    title_class: String,
    variant_class: String,
    version_class: String,
}

impl GuideSelectors {
    pub fn from_fields(fields: &GuideFields) -> Result<Self> {
        Ok(Self {
            single: Selector::parse(&fields.single)?,
            multi: Selector::parse(&fields.multi)?,
            tag_class: fields.tag_class.clone(),
            title_class: fields.title_class.clone(),
            variant_class: fields.variant_class.clone(),
            version_class: fields.version_class.clone(),
        })
    }
}

fn trimmed_text(el: ElementRef<'_>) -> String {
    el.text().trim().to_string()
}

/// Extract every plugin entry in document order
pub fn extract_plugins(doc: &Document, selectors: &PluginSelectors) -> Vec<PluginRecord> {
    let records: Vec<PluginRecord> = doc
        .select(&selectors.item)
        .into_iter()
        .map(|item| extract_plugin(item, selectors))
        .collect();

    info!(count = records.len(), "Extracted plugin records");
    records
}

fn extract_plugin(item: ElementRef<'_>, selectors: &PluginSelectors) -> PluginRecord {
    let name = item.select_first(&selectors.name).map(trimmed_text);
    if name.is_none() {
        debug!(position = item.id().index(), "Plugin entry has no name element");
    }

    let record = PluginRecord {
        name,
        description: item.select_first(&selectors.description).map(trimmed_text),
        owner: item.select_first(&selectors.owner).map(trimmed_text),
        labels: item
            .select(&selectors.labels)
            .into_iter()
            .map(trimmed_text)
            .collect(),
        source_url: item
            .select_first(&selectors.source_link)
            .and_then(|link| link.attr("href"))
            .unwrap_or_default()
            .to_string(),
        framework_versions: item
            .select(&selectors.versions)
            .into_iter()
            .map(trimmed_text)
            .filter(|version| !version.is_empty())
            .collect(),
        coordinates: item
            .select_first(&selectors.coordinates)
            .and_then(|button| button.attr("data-coords"))
            .map(str::to_string),
        rendered_markup: item.inner_html().to_string(),
        listing_markup: item.outer_html().to_string(),
    };

    trace!(
        name = ?record.name,
        owner = ?record.owner,
        labels = ?record.labels,
        versions = ?record.framework_versions,
        "Extracted plugin"
    );
    record
}

/// Extract guides: single guides first, then multi-version guides, each in
/// document order
pub fn extract_guides(doc: &Document, selectors: &GuideSelectors) -> Vec<GuideRecord> {
    let mut records = Vec::new();

    for link in doc.select(&selectors.single) {
        let tags = link
            .parent()
            .map(|parent| child_texts(parent, &selectors.tag_class))
            .unwrap_or_default();
        records.push(GuideRecord::Single(SingleGuide {
            href: link.attr("href").unwrap_or_default().to_string(),
            title: trimmed_text(link),
            tags,
        }));
    }

    for multi in doc.select(&selectors.multi) {
        let title = multi
            .children()
            .find(|child| child.has_class(&selectors.title_class))
            .map(trimmed_text)
            .unwrap_or_default();

        let versions = multi
            .children()
            .filter(|child| child.has_class(&selectors.variant_class))
            .map(|variant| {
                let version = variant
                    .children()
                    .find(|child| child.has_class(&selectors.version_class));
                VersionVariant {
                    framework_version: version.map(trimmed_text).unwrap_or_default(),
                    href: version
                        .and_then(|v| v.attr("href"))
                        .unwrap_or_default()
                        .to_string(),
                    tags: child_texts(variant, &selectors.tag_class),
                }
            })
            .collect();

        records.push(GuideRecord::Multi(MultiGuide { title, versions }));
    }

    info!(count = records.len(), "Extracted guide records");
    records
}

fn child_texts(parent: ElementRef<'_>, class: &str) -> Vec<String> {
    parent
        .children()
        .filter(|child| child.has_class(class))
        .map(trimmed_text)
        .collect()
}

/// Distinct major versions across all plugins, newest first
///
/// Feeds the facet selector. Versions that are not valid semver fall back to
/// their leading numeric component; anything without one is skipped.
pub fn major_versions(records: &[PluginRecord]) -> Vec<String> {
    let mut majors: Vec<u64> = records
        .iter()
        .flat_map(|record| record.framework_versions.iter())
        .filter_map(|version| major_of(version))
        .collect();
    majors.sort_unstable_by(|a, b| b.cmp(a));
    majors.dedup();
    majors.into_iter().map(|major| major.to_string()).collect()
}

fn major_of(version: &str) -> Option<u64> {
    match Version::parse(version) {
        Ok(parsed) => Some(parsed.major),
        Err(_) => version.split('.').next()?.trim().parse().ok(),
    }
}
