//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use crate::core::page::{Heading, MarkupRenderer, RenderedDoc};

/// One row per documentation line. Lines starting with `=` are headings,
/// lines starting with `->` are links, everything else is a paragraph.
#[derive(Debug, Clone)]
pub struct LineDoc {
    rows: usize,
    lead: usize,
    headings: Vec<Heading>,
    links: Vec<String>,
}

impl RenderedDoc for LineDoc {
    fn height(&self) -> usize {
        self.rows
    }

    fn lead_height(&self) -> usize {
        self.lead
    }

    fn headings(&self) -> &[Heading] {
        &self.headings
    }

    fn links(&self) -> &[String] {
        &self.links
    }
}

pub struct LineRenderer;

impl MarkupRenderer for LineRenderer {
    type Output = LineDoc;

    fn render(&self, text: &str) -> LineDoc {
        let mut headings = Vec::new();
        let mut links = Vec::new();
        let mut first_paragraph = None;

        for (row, line) in text.lines().enumerate() {
            if line.starts_with('=') {
                let level = line.chars().take_while(|&c| c == '=').count() as u8;
                let text = line.trim_matches('=').trim().to_string();
                headings.push(Heading { level, text, row });
            } else if let Some(target) = line.strip_prefix("->") {
                links.push(target.trim().to_string());
            } else if first_paragraph.is_none() {
                first_paragraph = Some(row);
            }
        }

        LineDoc {
            rows: text.lines().count(),
            lead: first_paragraph.unwrap_or(0),
            headings,
            links,
        }
    }
}
