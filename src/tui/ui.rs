use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::router::Router;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::goto_prompt::PROMPT_HEIGHT;
use crate::tui::components::{PageView, TitleBar};
use crate::tui::doc::DocRenderer;

/// Status shown in the title bar: fetch state of the current page first,
/// then whatever the event loop reported last.
fn status_text(router: &Router<DocRenderer>, tui: &TuiState) -> String {
    match router.current_page() {
        Some(page) if page.error.is_some() => "Fetch failed".to_string(),
        Some(page) if !page.loaded => "Loading...".to_string(),
        _ => tui.status_message.clone(),
    }
}

/// Target of the selected link on the current page.
pub fn selected_link(router: &Router<DocRenderer>, tui: &TuiState) -> Option<String> {
    let index = tui.selected_link?;
    let page = router.current_page()?;
    page.links().get(index).map(|link| link.to_string())
}

pub fn draw_ui(frame: &mut Frame, router: &Router<DocRenderer>, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let prompt_height = if tui.prompt.is_some() { PROMPT_HEIGHT } else { 0 };
    let layout = Layout::vertical([Length(1), Min(0), Length(prompt_height)]);
    let [title_area, main_area, prompt_area] = layout.areas(frame.area());

    let mut title_bar = TitleBar::new(
        router.current_fragment().map(str::to_string),
        status_text(router, tui),
        selected_link(router, tui),
    );
    title_bar.render(frame, title_area);

    let page = router.current_page();
    let code = page
        .and_then(|page| tui.highlighted.get(&page.id))
        .map(Vec::as_slice);
    PageView::new(&mut tui.page_view, page, code, router.chars_per_row()).render(frame, main_area);

    if let Some(prompt) = tui.prompt.as_mut() {
        prompt.render(frame, prompt_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Markup;
    use crate::tui::components::GotoPrompt;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::collections::BTreeMap;

    fn router() -> Router<DocRenderer> {
        let renderer = DocRenderer::new(Markup::Creole, 30, BTreeMap::new());
        Router::new(renderer).with_chars_per_row(20)
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_draw_ui_while_loading() {
        let mut router = router();
        router.navigate("#docs.js@Router");
        let mut tui = TuiState::new("#docs.js@Router");

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| draw_ui(f, &router, &mut tui)).unwrap();

        let text = screen(&terminal);
        assert!(text.contains("illuminate #docs.js@Router | Loading..."));
        assert!(text.contains("Loading docs.js"));
    }

    #[test]
    fn test_draw_ui_with_prompt_and_link() {
        let mut router = router();
        router.insert_page("a.js", "// = A =\n// See [[#b.js|b]].\nx();\n");
        router.navigate("#a.js");
        let mut tui = TuiState::new("#a.js");
        tui.selected_link = Some(0);
        tui.prompt = Some(GotoPrompt::new());

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| draw_ui(f, &router, &mut tui)).unwrap();

        let text = screen(&terminal);
        assert!(text.contains("→ #b.js"));
        assert!(text.contains("Go to"));
        assert!(text.contains("x();"));
    }

    #[test]
    fn selected_link_out_of_range_is_none() {
        let mut router = router();
        router.insert_page("a.js", "// = A =\nx();\n");
        router.navigate("#a.js");
        let mut tui = TuiState::new("#a.js");
        tui.selected_link = Some(3);
        assert_eq!(selected_link(&router, &tui), None);
    }
}
