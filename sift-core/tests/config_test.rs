//! Configuration files drive extraction and page regions

mod common;

use std::fs;

use common::{init_test_logging, plugin_listing};
use sift_core::config::{SiftConfig, DEFAULT_PAGE_SIZE};
use sift_core::page::{load_plugin_page, FilterOutcome, QueryInput};
use tempfile::TempDir;

#[test]
fn test_missing_file_gives_defaults() {
    init_test_logging();
    let temp = TempDir::new().unwrap();
    let config = SiftConfig::load_from_path(&temp.path().join("sift.yaml")).unwrap();
    assert_eq!(config, SiftConfig::default());
    assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
}

#[test]
fn test_page_size_from_file() {
    init_test_logging();
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("sift.yaml");
    fs::write(&path, "page_size: 10\n").unwrap();

    let config = SiftConfig::load_from_path(&path).unwrap();
    let mut page = load_plugin_page(plugin_listing(25), &config).unwrap();

    assert_eq!(
        page.on_query_input(QueryInput::Primary, "misc"),
        FilterOutcome::Results(25)
    );
    let state = page.paginator().unwrap().state();
    assert_eq!(state.page_size(), 10);
    assert_eq!(state.total_pages(), 3);
}

#[test]
fn test_min_query_len_from_file() {
    init_test_logging();
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("sift.yaml");
    fs::write(&path, "min_query_len: 4\n").unwrap();

    let config = SiftConfig::load_from_path(&path).unwrap();
    let mut page = load_plugin_page(plugin_listing(0), &config).unwrap();

    assert_eq!(
        page.on_query_input(QueryInput::Primary, "bob"),
        FilterOutcome::Unchanged
    );
    assert_eq!(
        page.on_query_input(QueryInput::Primary, "acme"),
        FilterOutcome::Results(1)
    );
}

#[test]
fn test_custom_facet_label_in_heading() {
    init_test_logging();
    let config = SiftConfig::from_yaml("facet_label: Grails\n").unwrap();
    let mut page = load_plugin_page(plugin_listing(0), &config).unwrap();
    page.on_facet_changed(Some("6"));

    let heading = page.regions().results_heading_text.unwrap();
    assert_eq!(page.view().inner_html(heading), "Grails 6.x");
}

#[test]
fn test_invalid_file_reports_path() {
    init_test_logging();
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("sift.yaml");
    fs::write(&path, "page_size: 0\n").unwrap();

    let err = SiftConfig::load_from_path(&path).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("sift.yaml"));
    assert!(message.contains("page_size"));
}

#[test]
fn test_malformed_yaml_is_an_error() {
    init_test_logging();
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("sift.yaml");
    fs::write(&path, "page_size: [not, a, number\n").unwrap();

    assert!(SiftConfig::load_from_path(&path).is_err());
}
