//! Syntax highlighting for code panes and fenced code in documentation.
//!
//! The syntax of a page is picked from its file extension. Wrapped rows keep
//! their `↩`/`↪` markers, drawn dimmed around the highlighted content.

use std::path::Path;
use std::sync::LazyLock;

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style as SyntectStyle, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::core::blocks::{CONTINUATION_MARKER, WRAP_MARKER};

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const THEME: &str = "base16-ocean.dark";

fn marker_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn plain_style() -> Style {
    Style::default().fg(Color::White)
}

fn highlighter(syntax: &SyntaxReference) -> Option<HighlightLines<'static>> {
    let theme = THEME_SET.themes.get(THEME)?;
    Some(HighlightLines::new(syntax, theme))
}

fn to_spans(ranges: Vec<(SyntectStyle, &str)>) -> Vec<Span<'static>> {
    ranges
        .into_iter()
        .filter_map(|(style, fragment)| {
            let content = fragment
                .trim_end_matches(['\n', '\r'])
                .replace('\t', "    ");
            if content.is_empty() {
                return None;
            }
            let fg = Color::Rgb(style.foreground.r, style.foreground.g, style.foreground.b);
            Some(Span::styled(content, Style::default().fg(fg)))
        })
        .collect()
}

/// Syntax for a page id such as `docs.js` or `src/main.rs`.
pub fn syntax_for_page(page_id: &str) -> Option<&'static SyntaxReference> {
    let extension = Path::new(page_id).extension()?.to_str()?;
    SYNTAX_SET.find_syntax_by_extension(extension)
}

/// Highlight the code rows of one block.
///
/// Falls back to plain rows when the page has no known syntax.
pub fn highlight_rows(page_id: &str, rows: &[String]) -> Vec<Line<'static>> {
    let Some(mut hl) = syntax_for_page(page_id).and_then(highlighter) else {
        return rows.iter().map(|row| plain_row(row)).collect();
    };

    rows.iter()
        .map(|row| {
            let (continued, rest) = match row.strip_prefix(CONTINUATION_MARKER) {
                Some(rest) => (true, rest),
                None => (false, row.as_str()),
            };
            let (content, wrapped) = match rest.strip_suffix(WRAP_MARKER) {
                Some(content) => (content, true),
                None => (rest, false),
            };
            // A wrapped row is the middle of a source line: no line ending yet
            let input = if wrapped {
                content.to_string()
            } else {
                format!("{content}\n")
            };

            let mut spans = Vec::new();
            if continued {
                spans.push(Span::styled(CONTINUATION_MARKER, marker_style()));
            }
            match hl.highlight_line(&input, &SYNTAX_SET) {
                Ok(ranges) => spans.extend(to_spans(ranges)),
                Err(e) => {
                    log::debug!("Highlighting failed for {page_id}: {e}");
                    spans.push(Span::styled(content.replace('\t', "    "), plain_style()));
                }
            }
            if wrapped {
                spans.push(Span::styled(WRAP_MARKER, marker_style()));
            }
            Line::from(spans)
        })
        .collect()
}

fn plain_row(row: &str) -> Line<'static> {
    let mut spans = Vec::new();
    let (continued, rest) = match row.strip_prefix(CONTINUATION_MARKER) {
        Some(rest) => (true, rest),
        None => (false, row),
    };
    let (content, wrapped) = match rest.strip_suffix(WRAP_MARKER) {
        Some(content) => (content, true),
        None => (rest, false),
    };
    if continued {
        spans.push(Span::styled(CONTINUATION_MARKER, marker_style()));
    }
    spans.push(Span::styled(content.replace('\t', "    "), plain_style()));
    if wrapped {
        spans.push(Span::styled(WRAP_MARKER, marker_style()));
    }
    Line::from(spans)
}

/// Highlight a fenced snippet by language token (`rust`, `js`, ...).
///
/// `None` when the token names no known syntax.
pub fn highlight_snippet(token: &str, text: &str) -> Option<Vec<Line<'static>>> {
    let syntax = SYNTAX_SET.find_syntax_by_token(token)?;
    let mut hl = highlighter(syntax)?;
    let mut lines = Vec::new();
    for line in LinesWithEndings::from(text) {
        let ranges = hl.highlight_line(line, &SYNTAX_SET).ok()?;
        lines.push(Line::from(to_spans(ranges)));
    }
    Some(lines)
}
