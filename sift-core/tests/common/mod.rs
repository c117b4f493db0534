//! Shared fixtures for integration tests
//!
//! Pages are built from small templates so each test can choose how many
//! filler entries a listing has.

#![allow(dead_code)]

use std::sync::Once;

/// Initialize logging for tests (only once per test run)
static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_target(true)
                    .with_level(true)
                    .with_thread_ids(false)
                    .with_thread_names(false),
            )
            .with(tracing_subscriber::filter::EnvFilter::from_default_env())
            .try_init();
    });
}

fn plugin_entry(name: &str, owner: &str, label: &str, version: &str, coords: &str) -> String {
    format!(
        concat!(
            r#"<li class="plugin">"#,
            r#"<h3 class="name"><a href="https://github.com/{owner}/{slug}">{name}</a></h3>"#,
            r#"<p class="desc">{name} for the framework</p>"#,
            r#"<span class="owner">{owner}</span>"#,
            r#"<span class="label">{label}</span>"#,
            r#"<div class="version-dropdown"><span class="version-current">{version}</span>"#,
            r#"<span class="framework-compat">{version}</span></div>"#,
            r#"<button class="copy-btn" data-coords="{coords}">Copy</button>"#,
            "</li>"
        ),
        name = name,
        slug = name.to_lowercase().replace(' ', "-"),
        owner = owner,
        label = label,
        version = version,
        coords = coords,
    )
}

/// The two scenario plugins followed by `filler` entries labelled `misc`
pub fn plugin_listing(filler: usize) -> String {
    let mut entries = vec![
        plugin_entry("Acme Plugin", "bob", "db", "5.3.1", "org.acme:acme-plugin:1.0.0"),
        plugin_entry("Foo", "alice", "cache", "6.0.0", "org.foo:foo:2.1.0"),
    ];
    for i in 0..filler {
        entries.push(plugin_entry(
            &format!("Filler {i:02}"),
            "carol",
            "misc",
            "4.0.0",
            &format!("org.filler:filler-{i:02}:0.1.0"),
        ));
    }

    format!(
        r##"<html><body>
<nav class="plugins-nav">
  <a class="nav-tab active" href="#" data-tab="browse">Browse</a>
  <a class="nav-tab" href="#" data-tab="publish">Publish</a>
</nav>
<div class="tab-content active" id="browse">
  <div class="search-box-inline"><input id="query" type="text"><button class="search-clear-btn">Clear</button></div>
  <input id="mobile-query" type="text">
  <select id="framework-version-select"><option value="">All</option><option value="6">6.x</option><option value="5">5.x</option></select>
  <h3 class="all-plugins-label">All plugins</h3>
  <h3 class="search-results-label hidden">Results for <span></span></h3>
  <div class="pagination-container top"></div>
  <div class="all-plugins plugins">
    <ul class="plugin-list">{entries}</ul>
  </div>
  <div class="search-results hidden"></div>
  <div class="no-results hidden">No plugins found</div>
  <div class="pagination-container bottom"></div>
</div>
<div class="tab-content" id="publish"><p>Publishing guide</p></div>
</body></html>"##,
        entries = entries.concat()
    )
}

/// A plugin listing page without facet select, mobile input or clear button
pub fn minimal_plugin_listing() -> String {
    format!(
        r#"<div class="search-box-inline"><input id="query"></div>
<div class="all-plugins plugins"><ul class="plugin-list">{}</ul></div>
<div class="search-results hidden"></div>"#,
        plugin_entry("Acme Plugin", "bob", "db", "5.3.1", "org.acme:acme-plugin:1.0.0")
    )
}

pub const GUIDE_LISTING: &str = r#"<html><body>
<input id="query" type="text">
<div class="training">Training</div>
<div class="latest-guides">Latest</div>
<div class="guide-group">
  <div class="guide-group-header"><h2>Web</h2></div>
  <ul>
    <li><a class="guide" href="/guides/rest.html">Building a REST API</a><span class="tag">rest</span><span class="tag">json</span></li>
    <li><a class="guide" href="/guides/testing.html">Testing Controllers</a><span class="tag">spock</span></li>
  </ul>
  <div class="multi-guide">
    <span class="title">Creating your first app</span>
    <div class="align-left"><a class="framework-version" href="/v5/first.html">5.x</a><span class="tag">intro</span></div>
    <div class="align-left"><a class="framework-version" href="/v6/first.html">6.x</a><span class="tag">gradle</span></div>
  </div>
</div>
<div class="tags-by-topic">Topics</div>
<div class="guides-suggestion">Suggest a guide</div>
<div class="search-results"></div>
</body></html>"#;
