//! # PageView Component
//!
//! Scrollable view of the current page: documentation on the left, code on
//! the right, a divider after every block.
//!
//! ## Architecture
//!
//! `PageView` is created each frame and wraps `&'a mut PageViewState`
//! (persistent scroll state) and the page being shown (props). Only blocks
//! intersecting the viewport are drawn into the `ScrollView` canvas.

use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::page::{Page, RenderedDoc};
use crate::core::router::ScrollTarget;
use crate::tui::component::{Component, EventHandler};
use crate::tui::doc::StyledDoc;
use crate::tui::event::TuiEvent;

/// Columns between the doc and code panes (` │ `).
pub const COLUMN_GAP: u16 = 3;

/// Narrowest doc column we are willing to wrap to.
pub const MIN_DOC_WIDTH: u16 = 20;

/// Width of the doc column for a terminal `total_width` wide.
///
/// The code column gets `chars_per_row` columns plus one for the wrap
/// marker; the scrollbar takes the last column.
pub fn doc_column_width(total_width: u16, chars_per_row: usize) -> u16 {
    let code = code_column_width(chars_per_row);
    total_width
        .saturating_sub(1 + COLUMN_GAP + code)
        .max(MIN_DOC_WIDTH)
}

pub fn code_column_width(chars_per_row: usize) -> u16 {
    u16::try_from(chars_per_row + 1).unwrap_or(u16::MAX)
}

fn rows(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Scroll state for the page view.
/// Must be persisted in the parent TuiState.
#[derive(Default)]
pub struct PageViewState {
    pub scroll_state: ScrollViewState,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Height of the page drawn last frame
    pub content_height: u16,
}

impl PageViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scroll_to(&mut self, target: ScrollTarget) {
        let y = match target {
            ScrollTarget::Top => 0,
            ScrollTarget::Row(row) => rows(row),
        };
        self.scroll_state.set_offset(Position { x: 0, y });
    }

    pub fn offset(&self) -> u16 {
        self.scroll_state.offset().y
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.content_height.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

impl EventHandler for PageViewState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => self.scroll_state.scroll_up(),
            TuiEvent::ScrollDown => self.scroll_state.scroll_down(),
            TuiEvent::ScrollPageUp => self.scroll_state.scroll_page_up(),
            TuiEvent::ScrollPageDown => self.scroll_state.scroll_page_down(),
            TuiEvent::ScrollToTop => self.scroll_state.scroll_to_top(),
            TuiEvent::ScrollToBottom => self.scroll_state.scroll_to_bottom(),
            _ => return None,
        }
        self.clamp_scroll();
        None
    }
}

pub struct PageView<'a> {
    pub state: &'a mut PageViewState,
    pub page: Option<&'a Page<StyledDoc>>,
    /// Highlighted code rows, one entry per block. Plain rows are drawn
    /// when absent.
    pub code: Option<&'a [Vec<Line<'static>>]>,
    pub chars_per_row: usize,
}

impl<'a> PageView<'a> {
    pub fn new(
        state: &'a mut PageViewState,
        page: Option<&'a Page<StyledDoc>>,
        code: Option<&'a [Vec<Line<'static>>]>,
        chars_per_row: usize,
    ) -> Self {
        Self {
            state,
            page,
            code,
            chars_per_row,
        }
    }

    fn render_notice(frame: &mut Frame, area: Rect, text: String, style: Style) {
        let notice =
            Paragraph::new(Line::from(Span::styled(text, style))).alignment(Alignment::Center);
        let y = area.y + area.height / 2;
        frame.render_widget(notice, Rect::new(area.x, y, area.width, 1.min(area.height)));
    }
}

impl<'a> Component for PageView<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.viewport_height = area.height;

        let Some(page) = self.page else {
            Self::render_notice(frame, area, "No page".to_string(), dim());
            return;
        };
        if let Some(error) = &page.error {
            let style = Style::default().fg(Color::Red);
            Self::render_notice(frame, area, format!("{}: {}", page.id, error), style);
            return;
        }
        if !page.loaded {
            Self::render_notice(frame, area, format!("Loading {}…", page.id), dim());
            return;
        }

        // Same width the doc text was wrapped to; the code column is clipped
        // when the terminal is too narrow for both
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar
        let doc_width = doc_column_width(area.width, self.chars_per_row).min(content_width);
        let code_x = doc_width.saturating_add(COLUMN_GAP).min(content_width);
        let code_width = code_column_width(self.chars_per_row).min(content_width - code_x);

        let total_height = rows(page.height());
        self.state.content_height = total_height;
        self.state.clamp_scroll();

        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let view_top = self.state.offset();
        let view_bottom = view_top.saturating_add(area.height);

        for (index, (block, top)) in page.blocks.iter().zip(page.block_offsets()).enumerate() {
            let top = rows(top);
            let height = rows(block.height());
            if top >= view_bottom || top.saturating_add(height) <= view_top {
                continue;
            }
            let body = height.saturating_sub(1);

            let doc = Paragraph::new(block.doc.text.clone());
            scroll_view.render_widget(
                doc,
                Rect::new(0, top, doc_width, rows(block.doc.height()).min(body)),
            );

            let separator: Vec<Line> = (0..body).map(|_| Line::styled(" │ ", dim())).collect();
            scroll_view.render_widget(
                Paragraph::new(separator),
                Rect::new(doc_width, top, COLUMN_GAP, body),
            );

            let code_lines: Vec<Line> = match self.code.and_then(|code| code.get(index)) {
                Some(lines) => lines.clone(),
                None => block
                    .code_rows
                    .iter()
                    .map(|row| Line::raw(row.clone()))
                    .collect(),
            };
            let code_top = top + rows(block.top_padding);
            let code_height = rows(code_lines.len()).min(body.saturating_sub(rows(block.top_padding)));
            scroll_view.render_widget(
                Paragraph::new(code_lines),
                Rect::new(code_x, code_top, code_width, code_height),
            );

            let divider = Line::styled("─".repeat(content_width as usize), dim());
            scroll_view.render_widget(
                Paragraph::new(divider),
                Rect::new(0, top + body, content_width, 1),
            );
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

fn dim() -> Style {
    Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::blocks::DEFAULT_CHARS_PER_ROW;
    use crate::core::router::Router;
    use crate::tui::doc::DocRenderer;
    use crate::Markup;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::collections::BTreeMap;

    const SOURCE: &str = "// = Intro =\n// Explains things.\nlet a = 1;\n// = Next =\n// More.\nlet b = 2;\n";

    fn router() -> Router<DocRenderer> {
        let renderer = DocRenderer::new(Markup::Creole, 30, BTreeMap::new());
        let mut router = Router::new(renderer).with_chars_per_row(20);
        router.insert_page("a.js", SOURCE);
        router.navigate("#a.js");
        router
    }

    fn screen(terminal: &Terminal<TestBackend>) -> Vec<String> {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|c| c.symbol()).collect())
            .collect()
    }

    #[test]
    fn doc_width_leaves_room_for_code() {
        assert_eq!(doc_column_width(120, 80), 120 - 1 - COLUMN_GAP - 81);
        assert_eq!(doc_column_width(60, 80), MIN_DOC_WIDTH);
    }

    #[test]
    fn scroll_to_heading_row() {
        let mut state = PageViewState::new();
        state.scroll_to(ScrollTarget::Row(7));
        assert_eq!(state.offset(), 7);
        state.scroll_to(ScrollTarget::Top);
        assert_eq!(state.offset(), 0);
    }

    #[test]
    fn clamp_keeps_offset_in_bounds() {
        let mut state = PageViewState::new();
        state.content_height = 30;
        state.viewport_height = 10;
        state.scroll_to(ScrollTarget::Row(100));
        state.clamp_scroll();
        assert_eq!(state.offset(), 20);
    }

    #[test]
    fn renders_docs_next_to_code() {
        let router = router();
        let mut state = PageViewState::new();
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal
            .draw(|f| {
                PageView::new(&mut state, router.current_page(), None, 20).render(f, f.area());
            })
            .unwrap();

        let lines = screen(&terminal);
        // First block: heading on row 0, code aligned with the paragraph on row 2
        assert!(lines[0].starts_with("Intro"));
        assert!(lines[2].starts_with("Explains things."));
        assert!(lines[2].contains("let a = 1;"));
        assert!(!lines[0].contains("let a"));
        assert!(lines.iter().any(|l| l.contains("Next")));
        assert!(lines.iter().any(|l| l.contains('─')));
        assert_eq!(state.content_height, rows(router.current_page().unwrap().height()));
    }

    #[test]
    fn default_width_on_80_column_terminal_keeps_docs_visible() {
        let chars_per_row = DEFAULT_CHARS_PER_ROW;
        let doc_width = doc_column_width(80, chars_per_row);
        let renderer = DocRenderer::new(Markup::Creole, doc_width as usize, BTreeMap::new());
        let mut router = Router::new(renderer).with_chars_per_row(chars_per_row);
        router.insert_page("a.js", "// = Intro =\n// Explains things.\nlet a = 1;\n");
        router.navigate("#a.js");

        let mut state = PageViewState::new();
        let mut terminal = Terminal::new(TestBackend::new(80, 10)).unwrap();
        terminal
            .draw(|f| {
                PageView::new(&mut state, router.current_page(), None, chars_per_row)
                    .render(f, f.area());
            })
            .unwrap();

        let lines = screen(&terminal);
        assert!(lines[0].starts_with("Intro"));
        assert!(lines[2].starts_with("Explains things."));
        // Code starts right after the doc column and the gap, clipped at the edge
        let code_start = (doc_width + COLUMN_GAP) as usize;
        let code: String = lines[2].chars().skip(code_start).take(10).collect();
        assert_eq!(code, "let a = 1;");
    }

    #[test]
    fn shows_loading_and_error_states() {
        let renderer = DocRenderer::new(Markup::Creole, 30, BTreeMap::new());
        let mut router = Router::new(renderer);
        router.navigate("#missing.js");

        let mut state = PageViewState::new();
        let mut terminal = Terminal::new(TestBackend::new(60, 5)).unwrap();
        terminal
            .draw(|f| {
                PageView::new(&mut state, router.current_page(), None, 20).render(f, f.area());
            })
            .unwrap();
        assert!(screen(&terminal).concat().contains("Loading missing.js"));

        router.complete_fetch("missing.js", Err::<String, _>("HTTP 404"));
        terminal
            .draw(|f| {
                PageView::new(&mut state, router.current_page(), None, 20).render(f, f.area());
            })
            .unwrap();
        assert!(screen(&terminal).concat().contains("missing.js: HTTP 404"));
    }

    #[test]
    fn scroll_events_stay_in_bounds() {
        let mut state = PageViewState::new();
        state.content_height = 5;
        state.viewport_height = 10;
        state.handle_event(&TuiEvent::ScrollDown);
        assert_eq!(state.offset(), 0);
        state.handle_event(&TuiEvent::ScrollToBottom);
        assert_eq!(state.offset(), 0);
    }
}
