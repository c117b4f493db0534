//! Sift listing commands
//!
//! Each command loads a saved listing page, feeds the requested inputs to
//! its search page and reports the visible state.

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use std::fs;
use std::path::{Path, PathBuf};
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

use sift_core::catalog::{major_versions, GuideRecord, PluginRecord};
use sift_core::clipboard::{copy_coordinates, Clipboard, CopyOutcome};
use sift_core::config::SiftConfig;
use sift_core::filter::{FilterEngine, Searchable};
use sift_core::page::{load_guide_page, load_plugin_page, FilterOutcome, QueryInput, SearchPage};
use sift_core::render::{results_heading, Renderable, ViewState};
use sift_core::view::MemoryView;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search a plugin listing
    Plugins {
        /// Saved plugin listing page
        page: PathBuf,

        /// Primary query input
        #[clap(long)]
        query: Option<String>,

        /// Mobile query input, used when the primary query is blank
        #[clap(long)]
        mobile_query: Option<String>,

        /// Framework major version facet (e.g. 5)
        #[clap(long)]
        facet: Option<String>,

        /// Page of the visible list to show
        #[clap(long = "page", default_value_t = 1)]
        page_number: usize,

        /// Output results as JSON
        #[clap(long, conflicts_with = "emit_html")]
        json: bool,

        /// Print the re-rendered result and pagination markup
        #[clap(long)]
        emit_html: bool,
    },

    /// Search a guide listing
    Guides {
        /// Saved guide listing page
        page: PathBuf,

        /// Query input
        #[clap(long)]
        query: Option<String>,

        /// Output results as JSON
        #[clap(long, conflicts_with = "emit_html")]
        json: bool,

        /// Print the re-rendered result markup
        #[clap(long)]
        emit_html: bool,
    },

    /// List the framework major versions present in a plugin listing
    Facets {
        /// Saved plugin listing page
        page: PathBuf,
    },

    /// Copy a plugin's dependency coordinates to the clipboard
    Copy {
        /// Saved plugin listing page
        page: PathBuf,

        /// Plugin name (case-insensitive)
        name: String,
    },
}

impl Command {
    pub fn execute(self, config: &SiftConfig) -> Result<()> {
        match self {
            Command::Plugins {
                page,
                query,
                mobile_query,
                facet,
                page_number,
                json,
                emit_html,
            } => execute_plugins(
                config,
                &page,
                PluginInputs {
                    query,
                    mobile_query,
                    facet,
                    page_number,
                },
                output_mode(json, emit_html),
            ),
            Command::Guides {
                page,
                query,
                json,
                emit_html,
            } => execute_guides(config, &page, query, output_mode(json, emit_html)),
            Command::Facets { page } => execute_facets(config, &page),
            Command::Copy { page, name } => execute_copy(config, &page, &name),
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<SiftConfig> {
    match path {
        Some(path) => SiftConfig::load_from_path(path),
        None => SiftConfig::load(),
    }
}

fn read_page(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read page: {}", path.display()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Table,
    Json,
    Html,
}

fn output_mode(json: bool, emit_html: bool) -> OutputMode {
    if json {
        OutputMode::Json
    } else if emit_html {
        OutputMode::Html
    } else {
        OutputMode::Table
    }
}

struct PluginInputs {
    query: Option<String>,
    mobile_query: Option<String>,
    facet: Option<String>,
    page_number: usize,
}

/// Records of the visible list and the slice on the current page
struct Listing<'a, R> {
    outcome: FilterOutcome,
    matched: Vec<&'a R>,
    shown: Vec<&'a R>,
    current_page: usize,
    total_pages: usize,
}

fn visible_listing<'a, R>(
    page: &'a SearchPage<R, MemoryView>,
    engine: &FilterEngine,
    outcome: FilterOutcome,
) -> Listing<'a, R>
where
    R: Searchable + Renderable,
{
    let matched: Vec<&R> = match page.view_state() {
        ViewState::Default => page.records().iter().collect(),
        ViewState::NoResults => Vec::new(),
        ViewState::Results => engine
            .matches(page.records(), &page.filter_state())
            .unwrap_or_default(),
    };

    let (shown, current_page, total_pages) = match page.paginator() {
        Some(paginator) => {
            let state = paginator.state();
            let shown = matched.get(state.page_range()).unwrap_or_default().to_vec();
            (shown, state.current_page(), state.total_pages())
        }
        None => (matched.clone(), 1, usize::from(!matched.is_empty())),
    };

    Listing {
        outcome,
        matched,
        shown,
        current_page,
        total_pages,
    }
}

/// Markup of the region the current view state renders into, then the
/// pagination links
fn emitted_html<R>(page: &SearchPage<R, MemoryView>) -> String
where
    R: Searchable + Renderable,
{
    let regions = page.regions();
    let content = match page.view_state() {
        ViewState::Default => regions.default_content,
        ViewState::Results | ViewState::NoResults => regions.results_content(),
    };

    let mut html = String::new();
    if let Some(content) = content {
        html.push_str(&page.view().inner_html(content));
        html.push('\n');
    }
    if let Some(mount) = regions.pagination.first() {
        let links = page.view().inner_html(mount.handle);
        if !links.is_empty() {
            html.push_str(&links);
            html.push('\n');
        }
    }
    html
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

fn print_table<T: Tabled>(rows: &[T]) {
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string();
    println!("{table}");
}

/// Table row for plugin results
#[derive(Tabled)]
struct PluginRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Owner")]
    owner: String,
    #[tabled(rename = "Versions")]
    versions: String,
    #[tabled(rename = "Labels")]
    labels: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&PluginRecord> for PluginRow {
    fn from(plugin: &PluginRecord) -> Self {
        Self {
            name: plugin.display_name().to_string(),
            owner: plugin.owner.clone().unwrap_or_default(),
            versions: plugin.versions_display(),
            labels: plugin.labels_display(),
            description: truncate(plugin.description.as_deref().unwrap_or_default(), 50),
        }
    }
}

fn execute_plugins(
    config: &SiftConfig,
    path: &Path,
    inputs: PluginInputs,
    mode: OutputMode,
) -> Result<()> {
    let mut page = load_plugin_page(read_page(path)?, config)
        .with_context(|| format!("Failed to load plugin page: {}", path.display()))?;

    let mut outcome = FilterOutcome::Default;
    if let Some(query) = &inputs.query {
        outcome = page.on_query_input(QueryInput::Primary, query);
    }
    if let Some(query) = &inputs.mobile_query {
        outcome = page.on_query_input(QueryInput::Mobile, query);
    }
    if let Some(facet) = &inputs.facet {
        outcome = page.on_facet_changed(Some(facet));
    }

    if inputs.page_number != 1 && !page.show_page(inputs.page_number) {
        let total = page.paginator().map_or(0, |p| p.state().total_pages());
        bail!("Page {} is out of range ({total} page(s))", inputs.page_number);
    }

    let engine = FilterEngine::new(config.min_query_len);
    let listing = visible_listing(&page, &engine, outcome);
    let state = page.filter_state();
    let query = state.query.trim();
    let text = (query.chars().count() >= config.min_query_len).then_some(query);
    let heading = results_heading(text, state.facet.as_deref(), &config.facet_label);

    match mode {
        OutputMode::Json => {
            let output = serde_json::json!({
                "outcome": listing.outcome,
                "view": page.view_state(),
                "heading": heading,
                "matched": listing.matched.len(),
                "page": listing.current_page,
                "total_pages": listing.total_pages,
                "plugins": listing.shown,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputMode::Html => print!("{}", emitted_html(&page)),
        OutputMode::Table => {
            if listing.matched.is_empty() {
                println!("No plugins found.");
                return Ok(());
            }
            match page.view_state() {
                ViewState::Results => println!(
                    "Found {} plugin(s) for {heading} (page {} of {}):\n",
                    listing.matched.len(),
                    listing.current_page,
                    listing.total_pages
                ),
                _ => println!(
                    "All {} plugin(s) (page {} of {}):\n",
                    listing.matched.len(),
                    listing.current_page,
                    listing.total_pages
                ),
            }
            let rows: Vec<PluginRow> = listing.shown.iter().map(|p| PluginRow::from(*p)).collect();
            print_table(&rows);
        }
    }

    Ok(())
}

/// Table row for guide results
#[derive(Tabled)]
struct GuideRow {
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Versions")]
    versions: String,
    #[tabled(rename = "Tags")]
    tags: String,
    #[tabled(rename = "Link")]
    link: String,
}

impl From<&GuideRecord> for GuideRow {
    fn from(guide: &GuideRecord) -> Self {
        let (versions, link) = match guide {
            GuideRecord::Single(single) => (String::new(), single.href.clone()),
            GuideRecord::Multi(multi) => (
                multi
                    .versions
                    .iter()
                    .map(|v| v.framework_version.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                multi
                    .versions
                    .first()
                    .map(|v| v.href.clone())
                    .unwrap_or_default(),
            ),
        };
        Self {
            title: truncate(guide.title(), 50),
            versions,
            tags: guide.all_tags().join(", "),
            link,
        }
    }
}

fn execute_guides(
    config: &SiftConfig,
    path: &Path,
    query: Option<String>,
    mode: OutputMode,
) -> Result<()> {
    let mut page = load_guide_page(read_page(path)?, config)
        .with_context(|| format!("Failed to load guide page: {}", path.display()))?;

    let mut outcome = FilterOutcome::Default;
    if let Some(query) = &query {
        outcome = page.on_query_input(QueryInput::Primary, query);
    }

    let engine = FilterEngine::new(config.min_query_len);
    let listing = visible_listing(&page, &engine, outcome);

    match mode {
        OutputMode::Json => {
            let output = serde_json::json!({
                "outcome": listing.outcome,
                "view": page.view_state(),
                "matched": listing.matched.len(),
                "guides": listing.shown,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputMode::Html => print!("{}", emitted_html(&page)),
        OutputMode::Table => {
            if listing.matched.is_empty() {
                println!("No results found.");
                return Ok(());
            }
            println!("Found {} guide(s):\n", listing.matched.len());
            let rows: Vec<GuideRow> = listing.shown.iter().map(|g| GuideRow::from(*g)).collect();
            print_table(&rows);
        }
    }

    Ok(())
}

fn execute_facets(config: &SiftConfig, path: &Path) -> Result<()> {
    let page = load_plugin_page(read_page(path)?, config)
        .with_context(|| format!("Failed to load plugin page: {}", path.display()))?;

    let versions = major_versions(page.records());
    if versions.is_empty() {
        println!("No framework versions found.");
        return Ok(());
    }
    for version in versions {
        println!("{} {version}.x", config.facet_label);
    }
    Ok(())
}

/// System clipboard backed by arboard
struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new().context("Clipboard unavailable")?;
        clipboard
            .set_text(text.to_string())
            .context("Failed to write clipboard")?;
        Ok(())
    }
}

fn execute_copy(config: &SiftConfig, path: &Path, name: &str) -> Result<()> {
    let page = load_plugin_page(read_page(path)?, config)
        .with_context(|| format!("Failed to load plugin page: {}", path.display()))?;

    let wanted = name.to_lowercase();
    let Some(plugin) = page
        .records()
        .iter()
        .find(|p| p.name.as_deref().is_some_and(|n| n.to_lowercase() == wanted))
    else {
        bail!("No plugin named '{name}' in {}", path.display());
    };

    let outcome = copy_coordinates(&mut SystemClipboard, plugin.coordinates.as_deref(), |coords| {
        println!("Clipboard unavailable, copy manually:\n  {coords}");
    });

    match outcome {
        CopyOutcome::Copied => println!(
            "Copied {} to clipboard",
            plugin.coordinates.as_deref().unwrap_or_default()
        ),
        CopyOutcome::FallbackUsed => {}
        CopyOutcome::NothingToCopy => bail!("Plugin '{name}' has no coordinates to copy"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_long_descriptions() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 10), "abcdefg...");
    }

    #[test]
    fn test_output_mode_precedence() {
        assert_eq!(output_mode(false, false), OutputMode::Table);
        assert_eq!(output_mode(true, false), OutputMode::Json);
        assert_eq!(output_mode(false, true), OutputMode::Html);
    }
}
