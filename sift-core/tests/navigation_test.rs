//! Tabs, version dropdowns and copy buttons on a plugin page

mod common;

use common::{init_test_logging, plugin_listing};
use sift_core::clipboard::{copy_from_button, Clipboard, CopyOutcome, COPIED_CLASS};
use sift_core::config::NavigationSelectors;
use sift_core::controls::VersionDropdowns;
use sift_core::markup::Selector;
use sift_core::tabs::{TabNav, ACTIVE_CLASS};
use sift_core::view::{MemoryView, View};

fn page_view() -> MemoryView {
    init_test_logging();
    MemoryView::parse(&plugin_listing(3)).unwrap()
}

struct Unavailable;

impl Clipboard for Unavailable {
    fn write_text(&mut self, _text: &str) -> anyhow::Result<()> {
        anyhow::bail!("no clipboard in tests")
    }
}

#[derive(Default)]
struct Recording(Vec<String>);

impl Clipboard for Recording {
    fn write_text(&mut self, text: &str) -> anyhow::Result<()> {
        self.0.push(text.to_string());
        Ok(())
    }
}

#[test]
fn test_tab_click_and_fragment() {
    let mut view = page_view();
    let tabs = TabNav::resolve(&view, &NavigationSelectors::default()).unwrap();
    assert_eq!(tabs.active_tab(&view), tabs.tab("browse"));

    let publish = tabs.tab("publish").unwrap();
    assert!(tabs.select(&mut view, publish));
    assert_eq!(view.fragment(), Some("#publish"));

    let browse_panel = view.find("#browse").unwrap().unwrap();
    let publish_panel = view.find("#publish").unwrap().unwrap();
    assert!(!view.has_class(browse_panel, ACTIVE_CLASS));
    assert!(view.has_class(publish_panel, ACTIVE_CLASS));

    assert!(tabs.restore_from_fragment(&mut view, "browse"));
    assert!(view.has_class(browse_panel, ACTIVE_CLASS));
    assert_eq!(view.fragment(), Some("#browse"));
}

#[test]
fn test_dropdowns_on_plugin_page() {
    let mut view = page_view();
    let dropdowns = VersionDropdowns::resolve(&view, &NavigationSelectors::default()).unwrap();
    assert_eq!(dropdowns.handles().len(), 5);

    let first = dropdowns.handles()[0];
    let last = dropdowns.handles()[4];
    dropdowns.on_click(&mut view, Some(first));
    dropdowns.on_click(&mut view, Some(last));
    assert_eq!(dropdowns.open(&view), vec![last]);
}

#[test]
fn test_copy_buttons() {
    let mut view = page_view();
    let buttons = view.select(&Selector::parse(".copy-btn").unwrap());
    assert_eq!(buttons.len(), 5);

    let mut clipboard = Recording::default();
    let outcome = copy_from_button(&mut view, buttons[0], &mut clipboard, |_| {});
    assert_eq!(outcome, CopyOutcome::Copied);
    assert_eq!(clipboard.0, vec!["org.acme:acme-plugin:1.0.0"]);
    assert!(view.has_class(buttons[0], COPIED_CLASS));

    let mut manual = Vec::new();
    let outcome = copy_from_button(&mut view, buttons[1], &mut Unavailable, |text| {
        manual.push(text.to_string())
    });
    assert_eq!(outcome, CopyOutcome::FallbackUsed);
    assert_eq!(manual, vec!["org.foo:foo:2.1.0"]);
    assert!(view.has_class(buttons[1], COPIED_CLASS));
}
