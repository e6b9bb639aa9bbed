//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the current
//! page, and turns keys and finished fetches into `core::Action` values.
//!
//! ## Navigation
//!
//! `TuiState::location` plays the part of a browser's location hash: the goto
//! prompt, link following and back navigation only ever write to it. Every
//! loop iteration the [`FragmentPoller`] compares it with the last fragment it
//! saw and, on a difference, the router navigates. Nothing else triggers a
//! navigation.
//!
//! ## Fetching
//!
//! `Effect::Fetch` spawns a tokio task that reads the page through the
//! configured [`PageSource`] and posts `Action::PageFetched` back over a
//! std mpsc channel, drained once per loop iteration.

mod component;
mod components;
pub mod creole;
pub mod doc;
mod event;
pub mod highlight;
pub mod markdown;
mod ui;

use log::{debug, info, warn};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::stdout;
use std::rc::Rc;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use ratatui::text::Line;

use crate::core::action::{Action, Effect, update};
use crate::core::config::{ResolvedConfig, SourceLocation};
use crate::core::fragment::FragmentPoller;
use crate::core::page::RenderedDoc;
use crate::core::router::Router;
use crate::source::{FileSource, HttpSource, PageSource};
use crate::tui::component::EventHandler;
use crate::tui::components::page_view::doc_column_width;
use crate::tui::components::{GotoPrompt, PageViewState, PromptEvent};
use crate::tui::doc::DocRenderer;
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Highlighted code rows per page id, one `Vec<Line>` per block.
pub type HighlightCache = HashMap<String, Vec<Vec<Line<'static>>>>;

/// TUI-specific presentation state (not part of core routing logic)
pub struct TuiState {
    pub page_view: PageViewState,
    /// Goto prompt overlay (None = hidden)
    pub prompt: Option<GotoPrompt>,
    /// The live fragment, polled by the event loop
    pub location: String,
    /// Fragments left behind, most recent last
    pub history: Vec<String>,
    /// Index into the current page's links, cycled with Tab
    pub selected_link: Option<usize>,
    pub status_message: String,
    pub highlighted: HighlightCache,
}

impl TuiState {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            page_view: PageViewState::new(),
            prompt: None,
            location: location.into(),
            history: Vec::new(),
            selected_link: None,
            status_message: String::new(),
            highlighted: HashMap::new(),
        }
    }

    /// Point the live fragment somewhere new, remembering where we were.
    pub fn go_to(&mut self, fragment: String) {
        if fragment == self.location {
            return;
        }
        let previous = std::mem::replace(&mut self.location, fragment);
        self.history.push(previous);
    }

    /// Return to the previous fragment. Returns false when there is none.
    pub fn go_back(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.location = previous;
                true
            }
            None => false,
        }
    }

    /// Move the link selection forward or backward, wrapping around.
    pub fn cycle_link(&mut self, link_count: usize, forward: bool) {
        if link_count == 0 {
            self.selected_link = None;
            return;
        }
        self.selected_link = Some(match (self.selected_link, forward) {
            (None, true) => 0,
            (None, false) => link_count - 1,
            (Some(i), true) => (i + 1) % link_count,
            (Some(i), false) => (i + link_count - 1) % link_count,
        });
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture, Hide)?;
        info!("Terminal modes enabled (mouse, hidden cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, Show);
    }
}

/// Build a page source from the resolved source location.
pub fn build_source(location: &SourceLocation) -> Arc<dyn PageSource> {
    match location {
        SourceLocation::Http(base_url) => Arc::new(HttpSource::new(base_url.clone())),
        SourceLocation::Directory(root) => Arc::new(FileSource::new(root.clone())),
    }
}

/// Build the router: renderer sized to the terminal, plus the post-processors
/// that log rendered pages and fill the highlight cache.
pub fn build_router(
    config: &ResolvedConfig,
    terminal_width: u16,
    highlighted: Rc<RefCell<HighlightCache>>,
) -> Router<DocRenderer> {
    let mut router = Router::new(doc_renderer(config, terminal_width))
        .with_chars_per_row(config.chars_per_row)
        .with_default_page(config.default_page.clone());

    router.add_processor(|page_id, blocks| {
        let headings: usize = blocks.iter().map(|b| b.doc.headings().len()).sum();
        debug!("Page '{page_id}' rendered with {headings} headings");
    });
    router.add_processor(move |page_id, blocks| {
        let rows = blocks
            .iter()
            .map(|block| highlight::highlight_rows(page_id, &block.code_rows))
            .collect();
        highlighted.borrow_mut().insert(page_id.to_string(), rows);
    });
    router
}

fn doc_renderer(config: &ResolvedConfig, terminal_width: u16) -> DocRenderer {
    let doc_width = doc_column_width(terminal_width, config.chars_per_row);
    debug!("Doc column width: {doc_width}");
    DocRenderer::new(config.markup, doc_width as usize, config.interwiki.clone())
}

/// Re-wrap cached pages when a resize changes the doc column width.
/// Returns true if the pages were rendered again.
fn fit_to_width(
    router: &mut Router<DocRenderer>,
    config: &ResolvedConfig,
    doc_width: &mut u16,
    terminal_width: u16,
) -> bool {
    let width = doc_column_width(terminal_width, config.chars_per_row);
    if width == *doc_width {
        return false;
    }
    info!("Doc column width changed from {} to {}", doc_width, width);
    *doc_width = width;
    router.set_renderer(doc_renderer(config, terminal_width));
    true
}

pub fn run(
    config: ResolvedConfig,
    initial_fragment: String,
    overview: Option<String>,
) -> std::io::Result<()> {
    let source = build_source(&config.source);
    info!("Reading pages from {}", source.name());

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let width = terminal.size()?.width;
    let mut doc_width = doc_column_width(width, config.chars_per_row);
    let highlighted = Rc::new(RefCell::new(HighlightCache::new()));
    let mut router = build_router(&config, width, Rc::clone(&highlighted));
    if let Some(text) = overview {
        router.insert_page(&config.default_page, &text);
    }

    let mut tui = TuiState::new(initial_fragment);
    let mut poller = FragmentPoller::new();

    // Channel for actions from background fetches
    let (tx, rx) = mpsc::channel();

    let poll_interval = Duration::from_millis(config.poll_interval_ms);
    let mut needs_redraw = true; // Force first frame

    loop {
        if let Some(fragment) = poller.poll(&tui.location) {
            needs_redraw = true;
            tui.selected_link = None;
            let effects = update(&mut router, Action::FragmentChanged(fragment));
            apply_effects(effects, &mut tui, &source, &tx);
        }

        // Handle background fetch results
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effects = update(&mut router, action);
            apply_effects(effects, &mut tui, &source, &tx);
        }

        if needs_redraw {
            let width = terminal.size()?.width;
            if fit_to_width(&mut router, &config, &mut doc_width, width) {
                tui.page_view.clamp_scroll();
            }
            tui.highlighted.extend(highlighted.borrow_mut().drain());
            terminal.draw(|f| ui::draw_ui(f, &router, &mut tui))?;
            needs_redraw = false;
        }

        let first_event = poll_event_timeout(poll_interval);
        if first_event.is_some() {
            needs_redraw = true;
        }

        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if handle_event(event, &router, &mut tui) == Flow::Quit {
                should_quit = true;
                break;
            }
        }
        if should_quit {
            break;
        }
    }

    info!("Quitting with {} pages cached", router.page_count());
    ratatui::restore();
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Apply one terminal event to the TUI state. Navigation only ever happens
/// by changing `tui.location`.
fn handle_event(event: TuiEvent, router: &Router<DocRenderer>, tui: &mut TuiState) -> Flow {
    // ForceQuit (Ctrl+C) always quits, prompt or not
    if event == TuiEvent::ForceQuit {
        return Flow::Quit;
    }

    // When the prompt is open, route all events to it
    if let Some(prompt) = tui.prompt.as_mut() {
        match prompt.handle_event(&event) {
            Some(PromptEvent::Submit(fragment)) => {
                tui.prompt = None;
                tui.go_to(fragment);
            }
            Some(PromptEvent::Cancel) => tui.prompt = None,
            None => {}
        }
        return Flow::Continue;
    }

    match event {
        TuiEvent::InputChar('q') => return Flow::Quit,
        TuiEvent::InputChar(':') | TuiEvent::InputChar('g') => {
            tui.prompt = Some(GotoPrompt::new());
        }
        TuiEvent::InputChar('b') | TuiEvent::Backspace => {
            if !tui.go_back() {
                tui.status_message = "No previous page".to_string();
            }
        }
        TuiEvent::NextLink | TuiEvent::PrevLink => {
            let count = router.current_page().map_or(0, |page| page.links().len());
            tui.cycle_link(count, event == TuiEvent::NextLink);
        }
        TuiEvent::Submit => match ui::selected_link(router, tui) {
            Some(link) if link.starts_with('#') => tui.go_to(link),
            Some(link) => tui.status_message = format!("External link: {link}"),
            None => {}
        },
        TuiEvent::Escape => tui.selected_link = None,
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown
        | TuiEvent::ScrollToTop
        | TuiEvent::ScrollToBottom => {
            tui.page_view.handle_event(&event);
        }
        _ => {}
    }
    Flow::Continue
}

fn apply_effects(
    effects: Vec<Effect>,
    tui: &mut TuiState,
    source: &Arc<dyn PageSource>,
    tx: &mpsc::Sender<Action>,
) {
    for effect in effects {
        match effect {
            Effect::Fetch(page_id) => spawn_fetch(Arc::clone(source), page_id, tx.clone()),
            Effect::ScrollTo(target) => {
                debug!("Scrolling to {:?}", target);
                tui.page_view.scroll_to(target);
            }
        }
    }
}

fn spawn_fetch(source: Arc<dyn PageSource>, page_id: String, tx: mpsc::Sender<Action>) {
    info!("Spawning fetch for '{}' from {}", page_id, source.name());
    tokio::spawn(async move {
        let result = source.fetch_text(&page_id).await;
        if let Err(e) = &result {
            warn!("Fetch for '{}' failed: {}", page_id, e);
        }
        if tx.send(Action::PageFetched { page_id, result }).is_err() {
            warn!("Failed to send fetch result: receiver dropped");
        }
    });
}
