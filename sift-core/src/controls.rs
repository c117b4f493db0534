//! Small page controls that share no state with the filter core

use tracing::trace;

use crate::config::NavigationSelectors;
use crate::error::Result;
use crate::markup::Selector;
use crate::view::{ElementHandle, View};

/// Class carried by the search box while the query input is non-empty
pub const HAS_VALUE_CLASS: &str = "has-value";

/// Class carried by an expanded version dropdown
pub const OPEN_CLASS: &str = "open";

/// Wrapper around the primary query input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchBox {
    wrapper: ElementHandle,
}

impl SearchBox {
    pub fn new(wrapper: ElementHandle) -> Self {
        Self { wrapper }
    }

    pub fn sync(&self, view: &mut dyn View, value: &str) {
        view.toggle_class(self.wrapper, HAS_VALUE_CLASS, !value.is_empty());
    }

    pub fn clear(&self, view: &mut dyn View) {
        view.remove_class(self.wrapper, HAS_VALUE_CLASS);
    }
}

/// Per-plugin version dropdowns; at most one is open
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionDropdowns {
    dropdowns: Vec<ElementHandle>,
}

impl VersionDropdowns {
    pub fn resolve(view: &dyn View, selectors: &NavigationSelectors) -> Result<Self> {
        let dropdowns = view.select(&Selector::parse(&selectors.dropdowns)?);
        Ok(Self { dropdowns })
    }

    pub fn handles(&self) -> &[ElementHandle] {
        &self.dropdowns
    }

    /// Handle a click; `target` is the dropdown whose current-version
    /// control was clicked, `None` for a click anywhere else
    pub fn on_click(&self, view: &mut dyn View, target: Option<ElementHandle>) {
        let target = target.filter(|target| self.dropdowns.contains(target));
        for dropdown in &self.dropdowns {
            if Some(*dropdown) != target {
                view.remove_class(*dropdown, OPEN_CLASS);
            }
        }
        if let Some(target) = target {
            let open = !view.has_class(target, OPEN_CLASS);
            trace!(dropdown = target.raw(), open, "Toggled version dropdown");
            view.toggle_class(target, OPEN_CLASS, open);
        }
    }

    pub fn open(&self, view: &dyn View) -> Vec<ElementHandle> {
        self.dropdowns
            .iter()
            .copied()
            .filter(|dropdown| view.has_class(*dropdown, OPEN_CLASS))
            .collect()
    }
}
