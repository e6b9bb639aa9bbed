//! Markdown → styled documentation pane.
//!
//! Thin wrapper around `pulldown_cmark` that collects the inline spans of each
//! block element and hands them to a [`DocBuilder`]. Headings, bold, italic,
//! strikethrough, inline code, fenced code blocks (with syntect highlighting),
//! lists, blockquotes, and links.

use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use crate::core::page::MarkupRenderer;
use crate::tui::doc::{DocBuilder, StyledDoc, code_style, heading_style, link_style};
use crate::tui::highlight;

pub struct MarkdownRenderer {
    width: usize,
}

impl MarkdownRenderer {
    pub fn new(width: usize) -> Self {
        Self { width }
    }
}

impl MarkupRenderer for MarkdownRenderer {
    type Output = StyledDoc;

    fn render(&self, text: &str) -> StyledDoc {
        let mut opts = Options::empty();
        opts.insert(Options::ENABLE_STRIKETHROUGH);
        opts.insert(Options::ENABLE_TASKLISTS);

        let mut w = Writer::new(self.width);
        for event in Parser::new_ext(text, opts) {
            w.handle(event);
        }
        w.builder.finish()
    }
}

// ── Writer ──────────────────────────────────────────────────────────────────

/// A fenced or indented code block being collected.
struct CodeBlock {
    lang: String,
    text: String,
}

struct Writer {
    builder: DocBuilder,
    /// Inline style stack. Styles compose via `patch` so nested bold+italic works.
    styles: Vec<Style>,
    /// Inline content of the block element being built.
    spans: Vec<Span<'static>>,
    /// List nesting: None = unordered, Some(n) = ordered at index n.
    list_indices: Vec<Option<u64>>,
    /// Depth and marker of a list item whose text is still being collected.
    item: Option<(usize, String)>,
    quote_depth: usize,
    code: Option<CodeBlock>,
    /// Stored link URL, recorded once the link text closes.
    link_url: Option<String>,
}

impl Writer {
    fn new(width: usize) -> Self {
        Self {
            builder: DocBuilder::new(width),
            styles: vec![],
            spans: vec![],
            list_indices: vec![],
            item: None,
            quote_depth: 0,
            code: None,
            link_url: None,
        }
    }

    // ── Style helpers ───────────────────────────────────────────────────

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or_default()
    }

    fn push_style(&mut self, overlay: Style) {
        self.styles.push(self.style().patch(overlay));
    }

    fn pop_style(&mut self) {
        self.styles.pop();
    }

    // ── Block helpers ───────────────────────────────────────────────────

    fn take_spans(&mut self) -> Vec<Span<'static>> {
        std::mem::take(&mut self.spans)
    }

    fn flush_item(&mut self) {
        if let Some((depth, marker)) = self.item.take() {
            let spans = self.take_spans();
            self.builder.list_item(depth, &marker, spans);
        }
    }

    // ── Event dispatch ──────────────────────────────────────────────────

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(tag) => self.close(tag),
            Event::Text(t) => self.text(t),
            Event::Code(c) => self.spans.push(Span::styled(c.to_string(), code_style())),
            Event::SoftBreak | Event::HardBreak => self.spans.push(Span::raw(" ")),
            Event::Rule => self.builder.rule(),
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                self.spans.push(Span::raw(marker));
            }
            _ => {} // HTML, footnotes, math: skip
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        match tag {
            // ── Block elements ──────────────────────────────────────────
            Tag::Paragraph => {
                // Loose list items wrap their text in paragraphs
                if self.item.is_none() {
                    self.spans.clear();
                } else if !self.spans.is_empty() {
                    self.spans.push(Span::raw(" "));
                }
            }
            Tag::Heading { level, .. } => {
                self.spans.clear();
                self.push_style(heading_style(heading_depth(level)));
            }
            Tag::BlockQuote(_) => self.quote_depth += 1,
            Tag::CodeBlock(kind) => {
                self.flush_item();
                let lang = match kind {
                    CodeBlockKind::Fenced(l) => l.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                self.code = Some(CodeBlock {
                    lang,
                    text: String::new(),
                });
            }
            Tag::List(start) => {
                // Text of the parent item comes before its sub-list
                self.flush_item();
                self.list_indices.push(start);
            }
            Tag::Item => {
                self.flush_item();
                let depth = self.list_indices.len();
                if let Some(idx) = self.list_indices.last_mut() {
                    let marker = match idx {
                        None => "•".to_string(),
                        Some(n) => {
                            let s = format!("{n}.");
                            *n += 1;
                            s
                        }
                    };
                    self.item = Some((depth, marker));
                }
            }

            // ── Inline elements ─────────────────────────────────────────
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { dest_url, .. } => {
                self.link_url = Some(dest_url.to_string());
                self.push_style(link_style());
            }
            _ => {} // Tables, images, definitions: skip
        }
    }

    fn close(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                if self.item.is_some() {
                    return;
                }
                let spans = self.take_spans();
                if self.quote_depth > 0 {
                    self.builder.quote(spans);
                } else {
                    self.builder.paragraph(spans);
                }
            }
            TagEnd::Heading(level) => {
                self.pop_style();
                let title: String = self
                    .take_spans()
                    .iter()
                    .map(|s| s.content.as_ref())
                    .collect();
                self.builder.heading(heading_depth(level), &title);
            }
            TagEnd::BlockQuote(_) => self.quote_depth = self.quote_depth.saturating_sub(1),
            TagEnd::CodeBlock => {
                if let Some(code) = self.code.take() {
                    let lines: Vec<String> = code.text.lines().map(str::to_string).collect();
                    match highlight::highlight_snippet(&code.lang, &code.text) {
                        Some(highlighted) if !code.lang.is_empty() => {
                            self.builder.code_block(highlighted)
                        }
                        _ => self.builder.preformatted(&lines),
                    }
                }
            }
            TagEnd::List(_) => {
                self.flush_item();
                self.list_indices.pop();
                if self.list_indices.is_empty() {
                    self.builder.end_list();
                }
            }
            TagEnd::Item => self.flush_item(),
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => self.pop_style(),
            TagEnd::Link => {
                self.pop_style();
                if let Some(url) = self.link_url.take() {
                    // Intra-document links are followed, not shown
                    if !url.starts_with('#') {
                        self.spans.push(Span::raw(" ("));
                        self.spans.push(Span::styled(url.clone(), link_style()));
                        self.spans.push(Span::raw(")"));
                    }
                    self.builder.link(url);
                }
            }
            _ => {}
        }
    }

    // ── Content handlers ────────────────────────────────────────────────

    fn text(&mut self, cow: CowStr<'_>) {
        if let Some(code) = self.code.as_mut() {
            code.text.push_str(&cow);
            return;
        }
        // Expand tabs → 4 spaces (ratatui renders \t as zero-width)
        let text = cow.replace('\t', "    ");
        let style = self.style();
        self.spans.push(Span::styled(text, style));
    }
}

fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
