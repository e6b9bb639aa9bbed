//! # GotoPrompt Component
//!
//! One-line prompt for typing a fragment (`docs.js@Router`). Opened with `:`
//! or `g`, submitted with Enter, dismissed with Esc.

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::widgets::{Block, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Rows taken by the prompt, borders included.
pub const PROMPT_HEIGHT: u16 = 3;

/// High-level events emitted by the GotoPrompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptEvent {
    /// Navigate to this fragment, always starting with `#`
    Submit(String),
    Cancel,
}

#[derive(Debug, Default)]
pub struct GotoPrompt {
    pub buffer: String,
}

impl GotoPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// The buffer as a fragment: a leading `#` is added when missing.
    pub fn fragment(&self) -> String {
        let trimmed = self.buffer.trim();
        if trimmed.starts_with('#') {
            trimmed.to_string()
        } else {
            format!("#{trimmed}")
        }
    }
}

impl EventHandler for GotoPrompt {
    type Event = PromptEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.push(*c);
                None
            }
            TuiEvent::Backspace => {
                self.buffer.pop();
                None
            }
            TuiEvent::Submit => Some(PromptEvent::Submit(self.fragment())),
            TuiEvent::Escape => Some(PromptEvent::Cancel),
            _ => None,
        }
    }
}

impl Component for GotoPrompt {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let text = format!("#{}", self.buffer.trim_start_matches('#'));
        let cursor_x = text.width() as u16;
        let prompt = Paragraph::new(text).block(Block::bordered().title("Go to"));
        frame.render_widget(prompt, area);

        let inner_width = area.width.saturating_sub(2);
        frame.set_cursor_position(Position {
            x: area.x + 1 + cursor_x.min(inner_width.saturating_sub(1)),
            y: area.y + 1,
        });
    }
}
