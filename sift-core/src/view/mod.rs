//! View adapter
//!
//! The only layer that touches the rendered page. Everything above it works
//! with [`ElementHandle`]s resolved once into a [`RegionRegistry`].
//! [`MemoryView`] is the headless implementation backed by a parsed page.

mod memory;
mod registry;

pub use memory::{MemoryView, ScrollGeometry};
pub use registry::RegionRegistry;

use crate::markup::Selector;

/// Class toggled to hide a region
pub const HIDDEN_CLASS: &str = "hidden";

/// Opaque reference to an element of the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementHandle(usize);

impl ElementHandle {
    pub fn new(raw: usize) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> usize {
        self.0
    }
}

/// Operations the engine needs from a rendered page
pub trait View {
    /// Elements matching `selector`, in document order
    fn select(&self, selector: &Selector) -> Vec<ElementHandle>;

    fn attr(&self, target: ElementHandle, name: &str) -> Option<String>;

    /// Replace the content of `target`
    fn set_inner_html(&mut self, target: ElementHandle, html: &str);

    fn add_class(&mut self, target: ElementHandle, class: &str);

    fn remove_class(&mut self, target: ElementHandle, class: &str);

    fn has_class(&self, target: ElementHandle, class: &str) -> bool;

    /// Total document height
    fn scroll_height(&self) -> f64;

    /// Current vertical scroll offset
    fn scroll_y(&self) -> f64;

    fn scroll_to(&mut self, y: f64);

    /// Replace the URL fragment without navigating
    fn replace_fragment(&mut self, fragment: &str);

    fn toggle_class(&mut self, target: ElementHandle, class: &str, on: bool) {
        if on {
            self.add_class(target, class);
        } else {
            self.remove_class(target, class);
        }
    }

    fn set_all_hidden(&mut self, targets: &[ElementHandle], hidden: bool) {
        for target in targets {
            self.toggle_class(*target, HIDDEN_CLASS, hidden);
        }
    }

    fn select_first(&self, selector: &Selector) -> Option<ElementHandle> {
        self.select(selector).into_iter().next()
    }
}
