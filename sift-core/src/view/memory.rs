//! Headless view backed by a parsed page
//!
//! Content replacements and class changes are recorded per element; the
//! original markup is never modified. Document height is modelled as a
//! fixed chrome height plus one row per visible list item, which is enough
//! to exercise scroll anchoring.

use std::collections::{BTreeSet, HashMap};

use super::{ElementHandle, View, HIDDEN_CLASS};
use crate::error::Result;
use crate::markup::{Document, NodeId, Selector};

/// Height model used by [`MemoryView`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollGeometry {
    pub viewport_height: f64,
    /// Height of everything that is not a list row
    pub chrome_height: f64,
    pub row_height: f64,
}

impl Default for ScrollGeometry {
    fn default() -> Self {
        Self {
            viewport_height: 800.0,
            chrome_height: 400.0,
            row_height: 60.0,
        }
    }
}

#[derive(Debug)]
pub struct MemoryView {
    document: Document,
    html: HashMap<ElementHandle, String>,
    classes: HashMap<ElementHandle, BTreeSet<String>>,
    fragment: Option<String>,
    scroll_y: f64,
    geometry: ScrollGeometry,
}

fn initial_classes(document: &Document, target: ElementHandle) -> BTreeSet<String> {
    document
        .get(NodeId::from_index(target.raw()))
        .map(|el| el.classes().map(str::to_string).collect())
        .unwrap_or_default()
}

fn count_rows(html: &str) -> usize {
    html.match_indices("<li")
        .filter(|(index, _)| {
            matches!(
                html.as_bytes().get(index + 3),
                Some(b'>') | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r')
            )
        })
        .count()
}

impl MemoryView {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            html: HashMap::new(),
            classes: HashMap::new(),
            fragment: None,
            scroll_y: 0.0,
            geometry: ScrollGeometry::default(),
        }
    }

    pub fn parse(markup: &str) -> Result<Self> {
        Ok(Self::new(Document::parse(markup)?))
    }

    pub fn with_geometry(mut self, geometry: ScrollGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// First element matching a selector string
    pub fn find(&self, selector: &str) -> Result<Option<ElementHandle>> {
        Ok(self.select_first(&Selector::parse(selector)?))
    }

    /// Current content of an element
    pub fn inner_html(&self, target: ElementHandle) -> String {
        match self.html.get(&target) {
            Some(html) => html.clone(),
            None => self
                .document
                .get(NodeId::from_index(target.raw()))
                .map(|el| el.inner_html().to_string())
                .unwrap_or_default(),
        }
    }

    pub fn classes(&self, target: ElementHandle) -> BTreeSet<String> {
        self.classes
            .get(&target)
            .cloned()
            .unwrap_or_else(|| initial_classes(&self.document, target))
    }

    pub fn is_hidden(&self, target: ElementHandle) -> bool {
        self.has_class(target, HIDDEN_CLASS)
    }

    /// Neither the element nor any ancestor is hidden
    pub fn is_displayed(&self, target: ElementHandle) -> bool {
        let mut current = self.document.get(NodeId::from_index(target.raw()));
        while let Some(el) = current {
            if self.is_hidden(ElementHandle::new(el.id().index())) {
                return false;
            }
            current = el.parent();
        }
        true
    }

    /// Last fragment written by [`View::replace_fragment`]
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    fn visible_rows(&self) -> usize {
        self.html
            .iter()
            .filter(|(target, _)| self.is_displayed(**target))
            .map(|(_, html)| count_rows(html))
            .sum()
    }

    fn max_scroll(&self) -> f64 {
        (self.scroll_height() - self.geometry.viewport_height).max(0.0)
    }
}

impl View for MemoryView {
    fn select(&self, selector: &Selector) -> Vec<ElementHandle> {
        self.document
            .select(selector)
            .into_iter()
            .map(|el| ElementHandle::new(el.id().index()))
            .collect()
    }

    fn attr(&self, target: ElementHandle, name: &str) -> Option<String> {
        self.document
            .get(NodeId::from_index(target.raw()))
            .and_then(|el| el.attr(name))
            .map(str::to_string)
    }

    fn set_inner_html(&mut self, target: ElementHandle, html: &str) {
        self.html.insert(target, html.to_string());
    }

    fn add_class(&mut self, target: ElementHandle, class: &str) {
        let document = &self.document;
        self.classes
            .entry(target)
            .or_insert_with(|| initial_classes(document, target))
            .insert(class.to_string());
    }

    fn remove_class(&mut self, target: ElementHandle, class: &str) {
        let document = &self.document;
        self.classes
            .entry(target)
            .or_insert_with(|| initial_classes(document, target))
            .remove(class);
    }

    fn has_class(&self, target: ElementHandle, class: &str) -> bool {
        match self.classes.get(&target) {
            Some(classes) => classes.contains(class),
            None => initial_classes(&self.document, target).contains(class),
        }
    }

    fn scroll_height(&self) -> f64 {
        self.geometry.chrome_height + self.geometry.row_height * self.visible_rows() as f64
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y.min(self.max_scroll())
    }

    fn scroll_to(&mut self, y: f64) {
        self.scroll_y = y.clamp(0.0, self.max_scroll());
    }

    fn replace_fragment(&mut self, fragment: &str) {
        self.fragment = Some(fragment.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<div class="wrap"><ul class="list hidden"><li>a</li></ul><p id="x" class="note">hi</p></div>"#;

    #[test]
    fn test_content_override_and_fallback() {
        let mut view = MemoryView::parse(PAGE).unwrap();
        let p = view.find("#x").unwrap().unwrap();
        assert_eq!(view.inner_html(p), "hi");
        view.set_inner_html(p, "<b>bye</b>");
        assert_eq!(view.inner_html(p), "<b>bye</b>");
        assert_eq!(view.document().source(), PAGE);
    }

    #[test]
    fn test_classes_start_from_markup() {
        let mut view = MemoryView::parse(PAGE).unwrap();
        let list = view.find("ul").unwrap().unwrap();
        assert!(view.is_hidden(list));
        view.remove_class(list, HIDDEN_CLASS);
        assert!(!view.is_hidden(list));
        assert!(view.has_class(list, "list"));
    }

    #[test]
    fn test_rows_count_only_when_displayed() {
        let mut view = MemoryView::parse(PAGE).unwrap().with_geometry(ScrollGeometry {
            viewport_height: 100.0,
            chrome_height: 50.0,
            row_height: 10.0,
        });
        let list = view.find("ul").unwrap().unwrap();
        view.set_inner_html(list, "<li>a</li><li class=\"x\">b</li><link rel=\"x\">");
        assert_eq!(view.scroll_height(), 50.0);

        view.remove_class(list, HIDDEN_CLASS);
        assert_eq!(view.scroll_height(), 70.0);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut view = MemoryView::parse(PAGE).unwrap().with_geometry(ScrollGeometry {
            viewport_height: 100.0,
            chrome_height: 300.0,
            row_height: 10.0,
        });
        view.scroll_to(500.0);
        assert_eq!(view.scroll_y(), 200.0);
        view.scroll_to(-5.0);
        assert_eq!(view.scroll_y(), 0.0);
    }
}
