//! Creole → styled documentation pane.
//!
//! Covers the part of [WikiCreole 1.0](http://www.wikicreole.org/wiki/Creole1.0)
//! that shows up in source comments:
//!
//! - headings `= h1 =` through `====== h6 ======` (closing `=` optional)
//! - `*` bullet and `#` numbered lists, nested by repeating the marker
//! - `{{{` / `}}}` preformatted blocks, `{{{inline code}}}`
//! - `**bold**`, `//italic//`, `\\` line breaks, `~` escapes
//! - `[[target]]`, `[[target|label]]` and interwiki `[[Wikipedia:Foo]]` links
//! - `----` horizontal rules
//!
//! Blank lines separate paragraphs.

use std::collections::BTreeMap;

use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use crate::core::page::MarkupRenderer;
use crate::tui::doc::{DocBuilder, StyledDoc, code_style, link_style};

pub struct CreoleRenderer {
    width: usize,
    interwiki: BTreeMap<String, String>,
}

impl CreoleRenderer {
    pub fn new(width: usize, interwiki: BTreeMap<String, String>) -> Self {
        Self { width, interwiki }
    }

    /// Expand an interwiki prefix (`Wikipedia:Rust`) into a full URL.
    pub fn resolve_link(&self, target: &str) -> String {
        if let Some((prefix, page)) = target.split_once(':')
            && let Some(base) = self.interwiki.get(prefix)
        {
            return format!("{base}{page}");
        }
        target.to_string()
    }

    fn inline(&self, text: &str, links: &mut Vec<String>) -> Vec<Span<'static>> {
        let mut spans = Vec::new();
        let mut plain = String::new();
        let mut bold = false;
        let mut italic = false;
        let mut rest = text;

        let style = |bold: bool, italic: bool| {
            let mut style = Style::default();
            if bold {
                style = style.add_modifier(Modifier::BOLD);
            }
            if italic {
                style = style.add_modifier(Modifier::ITALIC);
            }
            style
        };
        let flush = |plain: &mut String, spans: &mut Vec<Span<'static>>, s: Style| {
            if !plain.is_empty() {
                spans.push(Span::styled(std::mem::take(plain), s));
            }
        };

        while let Some(c) = rest.chars().next() {
            if let Some(after) = rest.strip_prefix("{{{")
                && let Some(end) = after.find("}}}")
            {
                flush(&mut plain, &mut spans, style(bold, italic));
                spans.push(Span::styled(after[..end].to_string(), code_style()));
                rest = &after[end + 3..];
                continue;
            }
            if let Some(after) = rest.strip_prefix("[[")
                && let Some(end) = after.find("]]")
            {
                let inner = &after[..end];
                let (target, label) = inner.split_once('|').unwrap_or((inner, inner));
                flush(&mut plain, &mut spans, style(bold, italic));
                spans.push(Span::styled(label.trim().to_string(), link_style()));
                links.push(self.resolve_link(target.trim()));
                rest = &after[end + 2..];
                continue;
            }
            if let Some(after) = rest.strip_prefix("**") {
                flush(&mut plain, &mut spans, style(bold, italic));
                bold = !bold;
                rest = after;
                continue;
            }
            // `//` right after a scheme (`http://`) is part of the URL
            if let Some(after) = rest.strip_prefix("//")
                && !plain.ends_with(':')
            {
                flush(&mut plain, &mut spans, style(bold, italic));
                italic = !italic;
                rest = after;
                continue;
            }
            if let Some(after) = rest.strip_prefix("\\\\") {
                plain.push(' ');
                rest = after;
                continue;
            }
            if let Some(after) = rest.strip_prefix('~')
                && let Some(escaped) = after.chars().next()
            {
                plain.push(escaped);
                rest = &after[escaped.len_utf8()..];
                continue;
            }
            plain.push(c);
            rest = &rest[c.len_utf8()..];
        }
        flush(&mut plain, &mut spans, style(bold, italic));
        spans
    }
}

/// Parse a list item: `(depth, ordered, text)`.
fn list_item(line: &str) -> Option<(usize, bool, &str)> {
    let marker = line.chars().next().filter(|c| *c == '*' || *c == '#')?;
    let depth = line.chars().take_while(|c| *c == marker).count();
    let rest = &line[depth..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some((depth, marker == '#', rest.trim()))
}

/// Parse a heading: `(level, title)`.
fn heading(line: &str) -> Option<(u8, &str)> {
    if !line.starts_with('=') {
        return None;
    }
    let level = line.chars().take_while(|c| *c == '=').count().min(6) as u8;
    let title = line
        .trim_start_matches('=')
        .trim_end()
        .trim_end_matches('=')
        .trim();
    Some((level, title))
}

fn is_rule(line: &str) -> bool {
    line.len() >= 4 && line.chars().all(|c| c == '-')
}

impl MarkupRenderer for CreoleRenderer {
    type Output = StyledDoc;

    fn render(&self, text: &str) -> StyledDoc {
        let mut builder = DocBuilder::new(self.width);
        let mut links = Vec::new();
        let mut paragraph: Vec<&str> = Vec::new();
        let mut preformatted: Option<Vec<String>> = None;
        // Numbering per nesting depth of the current list
        let mut counters: Vec<u64> = Vec::new();

        let flush_paragraph =
            |paragraph: &mut Vec<&str>, builder: &mut DocBuilder, links: &mut Vec<String>| {
                if paragraph.is_empty() {
                    return;
                }
                let spans = self.inline(&paragraph.join(" "), links);
                builder.paragraph(spans);
                paragraph.clear();
            };
        let end_list = |counters: &mut Vec<u64>, builder: &mut DocBuilder| {
            if !counters.is_empty() {
                builder.end_list();
                counters.clear();
            }
        };

        for line in text.lines() {
            if let Some(lines) = preformatted.as_mut() {
                if line.trim() == "}}}" {
                    builder.preformatted(lines);
                    preformatted = None;
                } else {
                    lines.push(line.to_string());
                }
                continue;
            }

            let trimmed = line.trim();
            if trimmed == "{{{" {
                flush_paragraph(&mut paragraph, &mut builder, &mut links);
                end_list(&mut counters, &mut builder);
                preformatted = Some(Vec::new());
            } else if trimmed.is_empty() {
                flush_paragraph(&mut paragraph, &mut builder, &mut links);
                end_list(&mut counters, &mut builder);
            } else if let Some((level, title)) = heading(trimmed) {
                flush_paragraph(&mut paragraph, &mut builder, &mut links);
                end_list(&mut counters, &mut builder);
                builder.heading(level, title);
            } else if is_rule(trimmed) {
                flush_paragraph(&mut paragraph, &mut builder, &mut links);
                end_list(&mut counters, &mut builder);
                builder.rule();
            } else if let Some((depth, ordered, item)) = list_item(trimmed) {
                flush_paragraph(&mut paragraph, &mut builder, &mut links);
                counters.resize(depth, 0);
                let marker = if ordered {
                    counters[depth - 1] += 1;
                    format!("{}.", counters[depth - 1])
                } else {
                    "•".to_string()
                };
                let spans = self.inline(item, &mut links);
                builder.list_item(depth, &marker, spans);
            } else {
                end_list(&mut counters, &mut builder);
                paragraph.push(trimmed);
            }
        }

        flush_paragraph(&mut paragraph, &mut builder, &mut links);
        end_list(&mut counters, &mut builder);
        if let Some(lines) = preformatted {
            builder.preformatted(&lines);
        }
        for link in links {
            builder.link(link);
        }
        builder.finish()
    }
}
