//! Paginator
//!
//! Splits rendered items into fixed-size pages, writes the visible slice into
//! a content mount and one link per page into every pagination mount. All
//! mounts always show the same active page.
//!
//! Links carry the generation of the paginator that rendered them. A page
//! context bumps the generation whenever it replaces its paginator, so a
//! link from an older result list is ignored.

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::config::DEFAULT_PAGE_SIZE;
use crate::render::ListFrame;
use crate::view::{ElementHandle, View};

/// A pagination control region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationMount {
    pub handle: ElementHandle,
    /// Clicks keep the distance between viewport and page bottom
    pub anchor_to_viewport_bottom: bool,
}

/// Where page items are written, and what they are wrapped in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentMount {
    pub handle: ElementHandle,
    pub frame: ListFrame,
}

/// A rendered page link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub generation: u64,
    /// Index into the paginator's mounts
    pub mount: usize,
    /// 1-indexed page number
    pub page: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    items: Vec<String>,
    page_size: usize,
    current_page: usize,
    total_pages: usize,
}

impl PageState {
    pub fn new(items: Vec<String>, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = items.len().div_ceil(page_size);
        Self {
            items,
            page_size,
            current_page: 1,
            total_pages,
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// 1-indexed
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Move to `page`; `false` when it is out of range
    pub fn set_page(&mut self, page: usize) -> bool {
        if !(1..=self.total_pages).contains(&page) {
            return false;
        }
        self.current_page = page;
        true
    }

    /// Item indices shown on the current page
    pub fn page_range(&self) -> std::ops::Range<usize> {
        let start = ((self.current_page - 1) * self.page_size).min(self.items.len());
        let end = (start + self.page_size).min(self.items.len());
        start..end
    }

    pub fn page_items(&self) -> &[String] {
        &self.items[self.page_range()]
    }
}

#[derive(Debug, Clone)]
pub struct Paginator {
    state: PageState,
    content: ContentMount,
    mounts: Vec<PaginationMount>,
    generation: u64,
}

impl Paginator {
    /// Build a paginator at page 1 and render it
    pub fn initialize(
        view: &mut dyn View,
        items: Vec<String>,
        page_size: usize,
        content: ContentMount,
        mounts: Vec<PaginationMount>,
        generation: u64,
    ) -> Self {
        let paginator = Self {
            state: PageState::new(items, page_size),
            content,
            mounts,
            generation,
        };

        debug!(
            items = paginator.state.items.len(),
            pages = paginator.state.total_pages,
            generation,
            "Paginator initialized"
        );
        paginator.render_content(view);
        paginator.render_links(view);
        paginator
    }

    /// Same as [`Paginator::initialize`] with the default page size
    pub fn with_default_size(
        view: &mut dyn View,
        items: Vec<String>,
        content: ContentMount,
        mounts: Vec<PaginationMount>,
        generation: u64,
    ) -> Self {
        Self::initialize(view, items, DEFAULT_PAGE_SIZE, content, mounts, generation)
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn mounts(&self) -> &[PaginationMount] {
        &self.mounts
    }

    /// The link for `page` inside mount `mount`, if it is rendered
    pub fn link(&self, mount: usize, page: usize) -> Option<PageLink> {
        let rendered = self.state.total_pages > 1
            && mount < self.mounts.len()
            && (1..=self.state.total_pages).contains(&page);
        rendered.then_some(PageLink {
            generation: self.generation,
            mount,
            page,
        })
    }

    /// Handle a page link click
    ///
    /// Returns `false` when the link is stale or does not exist.
    pub fn click(&mut self, view: &mut dyn View, link: PageLink) -> bool {
        if link.generation != self.generation {
            debug!(
                link_generation = link.generation,
                generation = self.generation,
                "Ignoring stale page link"
            );
            return false;
        }
        let Some(mount) = self.mounts.get(link.mount).copied() else {
            warn!(mount = link.mount, "Page link from unknown mount");
            return false;
        };
        self.go_to(view, link.page, mount.anchor_to_viewport_bottom)
    }

    /// Switch to `page`, optionally keeping the distance to the page bottom
    pub fn go_to(&mut self, view: &mut dyn View, page: usize, anchor_to_bottom: bool) -> bool {
        let bottom_offset = anchor_to_bottom.then(|| view.scroll_height() - view.scroll_y());

        if !self.state.set_page(page) {
            warn!(page, total = self.state.total_pages, "Page out of range");
            return false;
        }
        self.render_content(view);

        if let Some(offset) = bottom_offset {
            let target = view.scroll_height() - offset;
            trace!(offset, target, "Restoring bottom-relative scroll");
            view.scroll_to(target);
        }

        self.render_links(view);
        debug!(page, "Page changed");
        true
    }

    /// Link markup for one mount
    pub fn links_html(&self) -> String {
        if self.state.total_pages <= 1 {
            return String::new();
        }
        (1..=self.state.total_pages)
            .map(|page| {
                let active = if page == self.state.current_page {
                    r#" class="active""#
                } else {
                    ""
                };
                format!(r#"<a href="javascript:void(0)" data-page="{page}"{active}>{page}</a>"#)
            })
            .collect()
    }

    fn render_content(&self, view: &mut dyn View) {
        let html = if self.state.items.is_empty() {
            String::new()
        } else {
            self.content.frame.wrap(self.state.page_items())
        };
        view.set_inner_html(self.content.handle, &html);
    }

    fn render_links(&self, view: &mut dyn View) {
        let links = self.links_html();
        for mount in &self.mounts {
            view.set_inner_html(mount.handle, &links);
        }
    }
}
