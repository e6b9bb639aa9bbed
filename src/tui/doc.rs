//! Styled documentation panes.
//!
//! Both markup renderers feed a [`DocBuilder`] with block elements
//! (headings, paragraphs, list items, preformatted text). The builder wraps
//! them to the doc column width and remembers where headings and the first
//! paragraph ended up, which is what layout and anchor navigation need.

use std::collections::BTreeMap;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use textwrap::core::Fragment;
use textwrap::wrap_algorithms::wrap_first_fit;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::Markup;
use crate::core::page::{Heading, MarkupRenderer, RenderedDoc};
use crate::tui::creole::CreoleRenderer;
use crate::tui::markdown::MarkdownRenderer;

/// A rendered documentation pane.
#[derive(Debug, Clone, Default)]
pub struct StyledDoc {
    pub text: Text<'static>,
    lead: usize,
    headings: Vec<Heading>,
    links: Vec<String>,
}

impl RenderedDoc for StyledDoc {
    fn height(&self) -> usize {
        self.text.lines.len()
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

pub fn heading_style(level: u8) -> Style {
    match level {
        1 => Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        2 => Style::default().add_modifier(Modifier::BOLD),
        _ => Style::default().add_modifier(Modifier::BOLD | Modifier::ITALIC),
    }
}

pub fn link_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::UNDERLINED)
}

pub fn code_style() -> Style {
    Style::default().fg(Color::White).bg(Color::DarkGray)
}

fn marker_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub struct DocBuilder {
    width: usize,
    doc: StyledDoc,
    first_paragraph: Option<usize>,
    /// Whether the next block element should be preceded by a blank line.
    needs_blank: bool,
}

impl DocBuilder {
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(1),
            doc: StyledDoc::default(),
            first_paragraph: None,
            needs_blank: false,
        }
    }

    fn row(&self) -> usize {
        self.doc.text.lines.len()
    }

    fn blank_line_if_needed(&mut self) {
        if self.needs_blank {
            self.doc.text.lines.push(Line::default());
            self.needs_blank = false;
        }
    }

    fn push_wrapped(&mut self, spans: Vec<Span<'static>>, first_prefix: &str, rest_prefix: &str) {
        let lines = wrap_spans(&spans, self.width, first_prefix, rest_prefix);
        self.doc.text.lines.extend(lines);
    }

    pub fn heading(&mut self, level: u8, title: &str) {
        self.blank_line_if_needed();
        let level = level.clamp(1, 6);
        self.doc.headings.push(Heading {
            level,
            text: title.trim().to_string(),
            row: self.row(),
        });
        let span = Span::styled(title.trim().to_string(), heading_style(level));
        self.push_wrapped(vec![span], "", "");
        self.needs_blank = true;
    }

    pub fn paragraph(&mut self, spans: Vec<Span<'static>>) {
        if spans.iter().all(|s| s.content.trim().is_empty()) {
            return;
        }
        self.blank_line_if_needed();
        self.first_paragraph.get_or_insert(self.row());
        self.push_wrapped(spans, "", "");
        self.needs_blank = true;
    }

    /// A list item. Consecutive items are not separated by blank lines.
    pub fn list_item(&mut self, depth: usize, marker: &str, spans: Vec<Span<'static>>) {
        self.blank_line_if_needed();
        let indent = "  ".repeat(depth.saturating_sub(1));
        let first = format!("{indent}{marker} ");
        let rest = " ".repeat(first.width());
        self.push_wrapped(spans, &first, &rest);
    }

    pub fn end_list(&mut self) {
        self.needs_blank = true;
    }

    /// Preformatted lines, unwrapped, with a left border.
    pub fn preformatted(&mut self, lines: &[String]) {
        let lines = lines
            .iter()
            .map(|line| {
                Line::from(Span::styled(
                    line.replace('\t', "    "),
                    Style::default().fg(Color::White),
                ))
            })
            .collect();
        self.code_block(lines);
    }

    /// Already styled code lines (e.g. highlighted), with a left border.
    pub fn code_block(&mut self, lines: Vec<Line<'static>>) {
        self.blank_line_if_needed();
        for mut line in lines {
            line.spans.insert(0, Span::styled("│ ", marker_style()));
            self.doc.text.lines.push(line);
        }
        self.needs_blank = true;
    }

    /// A quoted paragraph: dimmed, with a left border on every line.
    pub fn quote(&mut self, spans: Vec<Span<'static>>) {
        if spans.is_empty() {
            return;
        }
        self.blank_line_if_needed();
        let quoted = Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC);
        let spans = spans
            .into_iter()
            .map(|span| {
                let style = quoted.patch(span.style);
                span.style(style)
            })
            .collect();
        self.push_wrapped(spans, "│ ", "│ ");
        self.needs_blank = true;
    }

    pub fn rule(&mut self) {
        self.blank_line_if_needed();
        self.doc.text.lines.push(Line::from(Span::styled(
            "─".repeat(self.width.min(40)),
            marker_style(),
        )));
        self.needs_blank = true;
    }

    pub fn link(&mut self, target: impl Into<String>) {
        self.doc.links.push(target.into());
    }

    pub fn finish(mut self) -> StyledDoc {
        self.doc.lead = self.first_paragraph.unwrap_or(0);
        self.doc
    }
}

/// The documentation renderer picked by configuration.
pub enum DocRenderer {
    Creole(CreoleRenderer),
    Markdown(MarkdownRenderer),
}

impl DocRenderer {
    pub fn new(markup: Markup, width: usize, interwiki: BTreeMap<String, String>) -> Self {
        match markup {
            Markup::Creole => Self::Creole(CreoleRenderer::new(width, interwiki)),
            Markup::Markdown => Self::Markdown(MarkdownRenderer::new(width)),
        }
    }
}

impl MarkupRenderer for DocRenderer {
    type Output = StyledDoc;

    fn render(&self, text: &str) -> StyledDoc {
        match self {
            Self::Creole(renderer) => renderer.render(text),
            Self::Markdown(renderer) => renderer.render(text),
        }
    }
}

// ── Wrapping ────────────────────────────────────────────────────────────────

/// A word (plus trailing spaces) carrying its style, for textwrap.
#[derive(Debug)]
struct StyledWord {
    text: String,
    style: Style,
    spaces: usize,
}

impl Fragment for StyledWord {
    fn width(&self) -> f64 {
        self.text.width() as f64
    }

    fn whitespace_width(&self) -> f64 {
        self.spaces as f64
    }

    fn penalty_width(&self) -> f64 {
        0.0
    }
}

/// Split spans into styled words, breaking words wider than `width`.
fn styled_words(spans: &[Span<'static>], width: usize) -> Vec<StyledWord> {
    let mut words: Vec<StyledWord> = Vec::new();
    for span in spans {
        for (i, piece) in span.content.split(' ').enumerate() {
            // Every separator belongs to the word before it
            if i > 0
                && let Some(last) = words.last_mut()
            {
                last.spaces += 1;
            }
            if piece.is_empty() {
                continue;
            }
            for chunk in break_long_word(piece, width) {
                words.push(StyledWord {
                    text: chunk,
                    style: span.style,
                    spaces: 0,
                });
            }
        }
    }
    words
}

fn break_long_word(word: &str, width: usize) -> Vec<String> {
    if word.width() <= width {
        return vec![word.to_string()];
    }
    let mut chunks = Vec::new();
    let mut current = String::new();
    for c in word.chars() {
        let candidate_width = current.width() + UnicodeWidthChar::width(c).unwrap_or(0);
        if candidate_width > width && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Wrap styled spans into lines no wider than `width`, prefixing the first
/// line with `first_prefix` and the others with `rest_prefix`.
pub fn wrap_spans(
    spans: &[Span<'static>],
    width: usize,
    first_prefix: &str,
    rest_prefix: &str,
) -> Vec<Line<'static>> {
    let prefix_width = first_prefix.width().max(rest_prefix.width());
    let available = width.saturating_sub(prefix_width).max(1);
    let words = styled_words(spans, available);
    if words.is_empty() {
        return vec![Line::from(Span::styled(first_prefix.to_string(), marker_style()))];
    }

    let line_widths = [available as f64];
    wrap_first_fit(&words, &line_widths)
        .into_iter()
        .enumerate()
        .map(|(i, line_words)| {
            let prefix = if i == 0 { first_prefix } else { rest_prefix };
            let mut line_spans = Vec::with_capacity(line_words.len() + 1);
            if !prefix.is_empty() {
                line_spans.push(Span::styled(prefix.to_string(), marker_style()));
            }
            for (j, word) in line_words.iter().enumerate() {
                let mut content = word.text.clone();
                if j + 1 < line_words.len() {
                    content.push_str(&" ".repeat(word.spaces));
                }
                line_spans.push(Span::styled(content, word.style));
            }
            Line::from(line_spans)
        })
        .collect()
}

/// Plain text of a line, for tests and hit checks.
pub fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}
