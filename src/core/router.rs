//! # Router
//!
//! Tracks the page being shown and the fragment that led there, owns the
//! page cache, and decides when a page must be fetched.
//!
//! ```text
//! fragment ─▶ navigate() ─┬─ hide current page
//!                         ├─ page cached? ── no ─▶ register empty page, ask for a fetch
//!                         ├─ show target page
//!                         └─ resolve scroll target (heading row or top)
//!
//! fetched text ─▶ complete_fetch() ─▶ split ─▶ render ─▶ post-processors
//! ```
//!
//! The router never performs I/O. `navigate` reports which page needs
//! fetching; the adapter runs the fetch and posts the text back through
//! [`complete_fetch`](Router::complete_fetch). A page is registered the
//! moment its fetch is requested, so it is fetched at most once and rendered
//! at most once. Pages are never evicted.

use std::collections::HashMap;

use log::{debug, info, warn};

use crate::core::blocks::{self, DEFAULT_CHARS_PER_ROW};
use crate::core::fragment::{DEFAULT_PAGE_ID, NavigationTarget};
use crate::core::page::{MarkupRenderer, Page, RenderedBlock, render_blocks};

/// Called once per rendered page with its id and freshly rendered blocks.
pub type Processor<D> = Box<dyn FnMut(&str, &mut [RenderedBlock<D>])>;

/// Where the view should scroll after navigating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollTarget {
    Top,
    /// Row of a heading within the current page.
    Row(usize),
}

/// Outcome of a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub target: NavigationTarget,
    /// Page id that must be fetched, if it was not cached yet.
    pub fetch: Option<String>,
    pub scroll: ScrollTarget,
}

pub struct Router<R: MarkupRenderer> {
    renderer: R,
    chars_per_row: usize,
    default_page: String,
    pages: HashMap<String, Page<R::Output>>,
    current_page_id: Option<String>,
    current_fragment: Option<String>,
    processors: Vec<Processor<R::Output>>,
}

impl<R: MarkupRenderer> Router<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            chars_per_row: DEFAULT_CHARS_PER_ROW,
            default_page: DEFAULT_PAGE_ID.to_string(),
            pages: HashMap::new(),
            current_page_id: None,
            current_fragment: None,
            processors: Vec::new(),
        }
    }

    pub fn with_chars_per_row(mut self, chars_per_row: usize) -> Self {
        self.chars_per_row = chars_per_row;
        self
    }

    pub fn with_default_page(mut self, page_id: impl Into<String>) -> Self {
        self.default_page = page_id.into();
        self
    }

    /// Register a post-processor. Processors run in registration order.
    pub fn add_processor<F>(&mut self, processor: F)
    where
        F: FnMut(&str, &mut [RenderedBlock<R::Output>]) + 'static,
    {
        self.processors.push(Box::new(processor));
    }

    pub fn chars_per_row(&self) -> usize {
        self.chars_per_row
    }

    pub fn current_page_id(&self) -> Option<&str> {
        self.current_page_id.as_deref()
    }

    pub fn current_fragment(&self) -> Option<&str> {
        self.current_fragment.as_deref()
    }

    pub fn current_page(&self) -> Option<&Page<R::Output>> {
        self.current_page_id
            .as_ref()
            .and_then(|id| self.pages.get(id))
    }

    pub fn page(&self, page_id: &str) -> Option<&Page<R::Output>> {
        self.pages.get(page_id)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Navigate to the page and anchor named by `fragment`.
    pub fn navigate(&mut self, fragment: &str) -> Navigation {
        let target = NavigationTarget::parse(fragment, &self.default_page);
        info!(
            "Navigating to page '{}' (anchor: {:?})",
            target.page_id, target.anchor
        );

        if let Some(current) = self.current_page_id.take()
            && let Some(page) = self.pages.get_mut(&current)
        {
            page.visible = false;
        }

        let fetch = if self.pages.contains_key(&target.page_id) {
            debug!("Page '{}' already cached", target.page_id);
            None
        } else {
            self.pages
                .insert(target.page_id.clone(), Page::new(target.page_id.clone()));
            Some(target.page_id.clone())
        };

        if let Some(page) = self.pages.get_mut(&target.page_id) {
            page.visible = true;
        }
        self.current_page_id = Some(target.page_id.clone());
        self.current_fragment = Some(fragment.to_string());

        let scroll = self.scroll_target(target.anchor.as_deref());
        Navigation {
            target,
            fetch,
            scroll,
        }
    }

    /// Resolve an anchor against the current page.
    pub fn scroll_target(&self, anchor: Option<&str>) -> ScrollTarget {
        anchor
            .and_then(|anchor| self.current_page()?.heading_offset(anchor))
            .map_or(ScrollTarget::Top, ScrollTarget::Row)
    }

    /// Register a page from text already at hand, skipping the fetch.
    ///
    /// Does nothing if the page is already registered.
    pub fn insert_page(&mut self, page_id: &str, text: &str) {
        if self.pages.contains_key(page_id) {
            debug!("Page '{}' already registered, not preloading", page_id);
            return;
        }
        self.pages.insert(page_id.to_string(), Page::new(page_id));
        self.render_into(page_id, text);
    }

    /// Swap the renderer and render every loaded page again from its text.
    ///
    /// Post-processors run again for each page.
    pub fn set_renderer(&mut self, renderer: R) {
        self.renderer = renderer;
        let loaded: Vec<(String, String)> = self
            .pages
            .values()
            .filter_map(|page| Some((page.id.clone(), page.text.clone()?)))
            .collect();
        info!("Renderer replaced, re-rendering {} pages", loaded.len());
        for (page_id, text) in loaded {
            self.render_into(&page_id, &text);
        }
    }

    /// Deliver the result of a fetch requested by [`navigate`](Self::navigate).
    ///
    /// Returns a new scroll target when the page is on screen and the
    /// current fragment names an anchor, since its heading only exists now.
    pub fn complete_fetch<E: std::fmt::Display>(
        &mut self,
        page_id: &str,
        result: Result<String, E>,
    ) -> Option<ScrollTarget> {
        let Some(page) = self.pages.get_mut(page_id) else {
            warn!("Fetch completed for unknown page '{}'", page_id);
            return None;
        };
        if page.loaded {
            debug!("Page '{}' already rendered, ignoring fetch result", page_id);
            return None;
        }

        match result {
            Ok(text) => self.render_into(page_id, &text),
            Err(e) => {
                warn!("Failed to fetch page '{}': {}", page_id, e);
                page.error = Some(e.to_string());
                return None;
            }
        }

        if self.current_page_id.as_deref() != Some(page_id) {
            return None;
        }
        let fragment = self.current_fragment.as_deref()?;
        let anchor = NavigationTarget::parse(fragment, &self.default_page).anchor?;
        Some(self.scroll_target(Some(&anchor)))
    }

    fn render_into(&mut self, page_id: &str, text: &str) {
        let split = blocks::split(text, self.chars_per_row);
        let mut rendered = render_blocks(split, &self.renderer);

        for processor in &mut self.processors {
            processor(page_id, &mut rendered);
        }
        info!(
            "Rendered page '{}': {} blocks, {} processors",
            page_id,
            rendered.len(),
            self.processors.len()
        );

        if let Some(page) = self.pages.get_mut(page_id) {
            page.blocks = rendered;
            page.loaded = true;
            page.error = None;
            page.text = Some(text.to_string());
        }
    }
}
