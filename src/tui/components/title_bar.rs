//! # TitleBar Component
//!
//! Top status bar: the fragment being shown, then a status message, then the
//! selected link (if any).
//!
//! TitleBar is purely presentational. It receives all data as props and has
//! no internal state:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(Some("#docs.js@Router".into()), "Loading...".into(), None);
//! title_bar.render(frame, area);
//! ```
//!
//! The text changes based on state:
//!
//! 1. **Selected link**: `"illuminate #docs.js | Loading... | → #other.js"`
//! 2. **Status message**: `"illuminate #docs.js | Loading..."`
//! 3. **Default**: `"illuminate #docs.js"`

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

pub struct TitleBar {
    /// Fragment of the page on screen, `None` before the first navigation
    pub fragment: Option<String>,
    /// Status message (e.g., "Loading...", a fetch error)
    pub status_message: String,
    /// Target of the link selected with Tab
    pub selected_link: Option<String>,
}

impl TitleBar {
    pub fn new(
        fragment: Option<String>,
        status_message: String,
        selected_link: Option<String>,
    ) -> Self {
        Self {
            fragment,
            status_message,
            selected_link,
        }
    }

    fn title_text(&self) -> String {
        let mut text = match &self.fragment {
            Some(fragment) if !fragment.is_empty() => format!("illuminate {fragment}"),
            _ => "illuminate".to_string(),
        };
        if !self.status_message.is_empty() {
            text.push_str(" | ");
            text.push_str(&self.status_message);
        }
        text
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::raw(self.title_text())];
        if let Some(link) = &self.selected_link {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(
                format!("→ {link}"),
                Style::default().fg(Color::Cyan),
            ));
        }
        frame.render_widget(Line::from(spans), area);
    }
}
