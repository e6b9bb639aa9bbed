//! # Fragments
//!
//! The navigation wire format is `#<page_id>[@<anchor>]`. The page id is
//! opaque; the anchor must equal a heading's trimmed text exactly.

/// Page shown when the fragment names no page.
pub const DEFAULT_PAGE_ID: &str = "overview";

/// Where a fragment points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTarget {
    pub page_id: String,
    pub anchor: Option<String>,
}

impl NavigationTarget {
    /// Parse a fragment, with or without its leading `#`.
    ///
    /// Splits on the first `@`; everything after it is the anchor. An empty
    /// page id resolves to `default_page`.
    pub fn parse(fragment: &str, default_page: &str) -> Self {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        let (page, anchor) = match fragment.split_once('@') {
            Some((page, anchor)) => (page, Some(anchor.to_string())),
            None => (fragment, None),
        };
        let page_id = if page.is_empty() {
            default_page.to_string()
        } else {
            page.to_string()
        };
        Self { page_id, anchor }
    }
}

/// Detects fragment changes by comparing against the last observed value.
///
/// Polled on a fixed interval rather than subscribed to, so hosts that
/// change the fragment without notifying anyone are still picked up.
#[derive(Debug, Default)]
pub struct FragmentPoller {
    last_observed: Option<String>,
}

impl FragmentPoller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the live fragment if it differs from the last observed one,
    /// and records it as observed.
    pub fn poll(&mut self, live: &str) -> Option<String> {
        if self.last_observed.as_deref() == Some(live) {
            return None;
        }
        self.last_observed = Some(live.to_string());
        Some(live.to_string())
    }

    pub fn last_observed(&self) -> Option<&str> {
        self.last_observed.as_deref()
    }
}
