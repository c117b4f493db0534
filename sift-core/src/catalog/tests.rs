//! Integration tests for the catalog module

#[cfg(test)]
mod integration_tests {
    use crate::catalog::{
        extract_guides, extract_plugins, GuideRecord, GuideSelectors, PluginSelectors,
    };
    use crate::config::{GuideFields, PluginFields};
    use crate::markup::Document;

    const PLUGIN_LISTING: &str = r#"
<div class="all-plugins">
  <ul class="plugin-list">
    <li class="plugin">
      <h3 class="name"><a href="https://github.com/acme/acme-plugin">Acme Plugin</a></h3>
      <p class="desc">Database helpers &amp; more</p>
      <span class="owner">bob</span>
      <span class="label">db</span><span class="label">orm</span>
      <div class="version-dropdown">
        <span class="version-current">5.3.1</span>
        <ul><li class="framework-compat">5.3.1</li><li class="framework-compat">4.0.0</li></ul>
      </div>
      <button class="copy-btn" data-coords="org.acme:acme-plugin:1.0.0">Copy</button>
    </li>
    <li class="plugin">
      <h3 class="name"><a href="https://github.com/alice/foo">Foo</a></h3>
      <span class="owner">alice</span>
      <span class="compat">6.0.0</span>
    </li>
    <li class="plugin">
      <p class="desc">An entry without a title</p>
    </li>
  </ul>
</div>
"#;

    const GUIDE_LISTING: &str = r#"
<div class="guide-group">
  <ul>
    <li><a class="guide" href="/guides/rest.html">Building a REST API</a><span class="tag">rest</span><span class="tag">json</span></li>
    <li><a class="guide" href="/guides/testing.html">Testing Controllers</a></li>
  </ul>
  <div class="multi-guide">
    <span class="title">Creating your first app</span>
    <div class="align-left"><a class="framework-version" href="/v5/first.html">5.x</a><span class="tag">intro</span></div>
    <div class="align-left"><a class="framework-version" href="/v6/first.html">6.x</a><span class="tag">gradle</span></div>
  </div>
</div>
"#;

    #[test]
    fn test_extract_plugins_reads_all_fields() {
        let doc = Document::parse(PLUGIN_LISTING).unwrap();
        let selectors = PluginSelectors::from_fields(&PluginFields::default()).unwrap();
        let plugins = extract_plugins(&doc, &selectors);

        assert_eq!(plugins.len(), 3);

        let acme = &plugins[0];
        assert_eq!(acme.name.as_deref(), Some("Acme Plugin"));
        assert_eq!(acme.description.as_deref(), Some("Database helpers & more"));
        assert_eq!(acme.owner.as_deref(), Some("bob"));
        assert_eq!(acme.labels, vec!["db", "orm"]);
        assert_eq!(acme.source_url, "https://github.com/acme/acme-plugin");
        assert_eq!(acme.framework_versions, vec!["5.3.1", "4.0.0"]);
        assert_eq!(
            acme.coordinates.as_deref(),
            Some("org.acme:acme-plugin:1.0.0")
        );
        assert!(acme.rendered_markup.contains("<h3 class=\"name\">"));
        assert!(!acme.rendered_markup.contains("<li class=\"plugin\">"));
    }

    #[test]
    fn test_extract_plugins_tolerates_missing_fields() {
        let doc = Document::parse(PLUGIN_LISTING).unwrap();
        let selectors = PluginSelectors::from_fields(&PluginFields::default()).unwrap();
        let plugins = extract_plugins(&doc, &selectors);

        let foo = &plugins[1];
        assert_eq!(foo.description, None);
        assert!(foo.labels.is_empty());
        assert_eq!(foo.framework_versions, vec!["6.0.0"]);
        assert_eq!(foo.coordinates, None);

        let untitled = &plugins[2];
        assert_eq!(untitled.name, None);
        assert_eq!(untitled.owner, None);
        assert_eq!(untitled.source_url, "");
    }

    #[test]
    fn test_extract_does_not_touch_source() {
        let doc = Document::parse(PLUGIN_LISTING).unwrap();
        let selectors = PluginSelectors::from_fields(&PluginFields::default()).unwrap();
        let _ = extract_plugins(&doc, &selectors);
        assert_eq!(doc.source(), PLUGIN_LISTING);
    }

    #[test]
    fn test_bare_ampersand_in_description_keeps_every_record() {
        let listing = r#"<ul class="plugin-list">
<li class="plugin"><h3 class="name"><a href="https://github.com/acme/tools">Acme Tools</a></h3><p class="desc">Tools & helpers</p><span class="owner">bob</span></li>
<li class="plugin"><h3 class="name"><a href="https://github.com/alice/foo">Foo</a></h3><span class="owner">alice</span></li>
</ul>"#;
        let doc = Document::parse(listing).unwrap();
        let selectors = PluginSelectors::from_fields(&PluginFields::default()).unwrap();
        let plugins = extract_plugins(&doc, &selectors);

        assert_eq!(plugins.len(), 2);
        assert_eq!(plugins[0].description.as_deref(), Some("Tools & helpers"));
        assert!(plugins[0].rendered_markup.contains("Tools & helpers"));
        assert_eq!(plugins[1].name.as_deref(), Some("Foo"));
    }

    #[test]
    fn test_extract_guides_single_then_multi() {
        let doc = Document::parse(GUIDE_LISTING).unwrap();
        let selectors = GuideSelectors::from_fields(&GuideFields::default()).unwrap();
        let guides = extract_guides(&doc, &selectors);

        assert_eq!(guides.len(), 3);
        match &guides[0] {
            GuideRecord::Single(guide) => {
                assert_eq!(guide.title, "Building a REST API");
                assert_eq!(guide.href, "/guides/rest.html");
                assert_eq!(guide.tags, vec!["rest", "json"]);
            }
            other => panic!("expected single guide, got {other:?}"),
        }
        match &guides[1] {
            GuideRecord::Single(guide) => assert!(guide.tags.is_empty()),
            other => panic!("expected single guide, got {other:?}"),
        }
        match &guides[2] {
            GuideRecord::Multi(guide) => {
                assert_eq!(guide.title, "Creating your first app");
                assert_eq!(guide.versions.len(), 2);
                assert_eq!(guide.versions[1].framework_version, "6.x");
                assert_eq!(guide.versions[1].href, "/v6/first.html");
                assert_eq!(guide.versions[1].tags, vec!["gradle"]);
            }
            other => panic!("expected multi guide, got {other:?}"),
        }
    }
}
