//! Tab navigation
//!
//! Each tab names its panel through `data-tab`; the panel is the content
//! element with that id. Selecting a tab records `#<tab id>` in the URL
//! fragment, and a fragment present at load selects its tab again.

use tracing::debug;

use crate::config::NavigationSelectors;
use crate::error::Result;
use crate::markup::Selector;
use crate::view::{ElementHandle, View};

pub const ACTIVE_CLASS: &str = "active";

const TAB_ATTR: &str = "data-tab";

#[derive(Debug, Clone)]
struct Tab {
    handle: ElementHandle,
    target: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TabNav {
    tabs: Vec<Tab>,
    panels: Vec<(ElementHandle, Option<String>)>,
}

impl TabNav {
    pub fn resolve(view: &dyn View, selectors: &NavigationSelectors) -> Result<Self> {
        let tabs = view
            .select(&Selector::parse(&selectors.tabs)?)
            .into_iter()
            .map(|handle| Tab {
                handle,
                target: view.attr(handle, TAB_ATTR),
            })
            .collect();
        let panels = view
            .select(&Selector::parse(&selectors.tab_contents)?)
            .into_iter()
            .map(|handle| (handle, view.attr(handle, "id")))
            .collect();
        Ok(Self { tabs, panels })
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// The tab whose `data-tab` is `id`
    pub fn tab(&self, id: &str) -> Option<ElementHandle> {
        self.tabs
            .iter()
            .find(|tab| tab.target.as_deref() == Some(id))
            .map(|tab| tab.handle)
    }

    /// Activate `tab` and its panel; returns `false` for an unknown tab
    pub fn select(&self, view: &mut dyn View, tab: ElementHandle) -> bool {
        let Some(selected) = self.tabs.iter().find(|t| t.handle == tab) else {
            return false;
        };

        for t in &self.tabs {
            view.remove_class(t.handle, ACTIVE_CLASS);
        }
        for (panel, _) in &self.panels {
            view.remove_class(*panel, ACTIVE_CLASS);
        }
        view.add_class(tab, ACTIVE_CLASS);

        let Some(target) = selected.target.as_deref() else {
            debug!("Selected tab has no target panel");
            return true;
        };
        if let Some((panel, _)) = self
            .panels
            .iter()
            .find(|(_, id)| id.as_deref() == Some(target))
        {
            view.add_class(*panel, ACTIVE_CLASS);
        }
        view.replace_fragment(&format!("#{target}"));
        debug!(tab = target, "Tab selected");
        true
    }

    /// Select the tab named by a URL fragment (with or without `#`)
    pub fn restore_from_fragment(&self, view: &mut dyn View, fragment: &str) -> bool {
        let id = fragment.strip_prefix('#').unwrap_or(fragment);
        if id.is_empty() {
            return false;
        }
        match self.tab(id) {
            Some(tab) => self.select(view, tab),
            None => false,
        }
    }

    pub fn active_tab(&self, view: &dyn View) -> Option<ElementHandle> {
        self.tabs
            .iter()
            .map(|tab| tab.handle)
            .find(|tab| view.has_class(*tab, ACTIVE_CLASS))
    }
}
