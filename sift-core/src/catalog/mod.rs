//! Sift Catalog - typed records and their extraction
//!
//! # Overview
//!
//! A catalog page lists either plugins or guides. Both are extracted once
//! from the rendered listing into an in-memory index that stays read-only
//! for the lifetime of the page:
//!
//! ```text
//! rendered listing (HTML)
//!     │
//!     ├── li.plugin            → PluginRecord
//!     ├── a.guide              → GuideRecord::Single
//!     └── .multi-guide         → GuideRecord::Multi
//!            │
//!            ▼
//!     FilterEngine / SearchPage
//! ```

mod extract;
pub mod record;

pub use extract::{extract_guides, extract_plugins, major_versions, GuideSelectors, PluginSelectors};
pub use record::{GuideRecord, MultiGuide, PluginRecord, SingleGuide, VersionVariant};

#[cfg(test)]
mod tests;
