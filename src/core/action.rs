//! # Actions
//!
//! Everything that reaches the router goes through the event loop as an
//! `Action`. The fragment poller notices a new fragment? That's
//! `Action::FragmentChanged`. A background fetch finished? That's
//! `Action::PageFetched`.
//!
//! `update()` applies an action to the router and returns the side effects
//! the adapter must carry out. No I/O happens here.
//!
//! ```text
//! Router + Action  →  update()  →  Vec<Effect>
//! ```

use log::debug;

use crate::core::page::MarkupRenderer;
use crate::core::router::{Router, ScrollTarget};
use crate::source::FetchError;

#[derive(Debug)]
pub enum Action {
    /// The live fragment differs from the last observed one.
    FragmentChanged(String),
    /// A fetch spawned for `page_id` finished.
    PageFetched {
        page_id: String,
        result: Result<String, FetchError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch the page's text in the background.
    Fetch(String),
    ScrollTo(ScrollTarget),
}

pub fn update<R: MarkupRenderer>(router: &mut Router<R>, action: Action) -> Vec<Effect> {
    match action {
        Action::FragmentChanged(fragment) => {
            let navigation = router.navigate(&fragment);
            let mut effects = Vec::with_capacity(2);
            if let Some(page_id) = navigation.fetch {
                effects.push(Effect::Fetch(page_id));
            }
            effects.push(Effect::ScrollTo(navigation.scroll));
            effects
        }
        Action::PageFetched { page_id, result } => {
            debug!("Fetch finished for '{}' (ok: {})", page_id, result.is_ok());
            router
                .complete_fetch(&page_id, result)
                .map(Effect::ScrollTo)
                .into_iter()
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::LineRenderer;

    #[test]
    fn fragment_change_on_new_page_fetches_then_scrolls() {
        let mut router = Router::new(LineRenderer);
        let effects = update(&mut router, Action::FragmentChanged("#lib.rs".to_string()));
        assert_eq!(
            effects,
            vec![
                Effect::Fetch("lib.rs".to_string()),
                Effect::ScrollTo(ScrollTarget::Top)
            ]
        );
    }

    #[test]
    fn fragment_change_on_cached_page_only_scrolls() {
        let mut router = Router::new(LineRenderer);
        router.insert_page("lib.rs", "// = Lib\n// text\nfn lib() {}\n");
        let effects = update(
            &mut router,
            Action::FragmentChanged("#lib.rs@Lib".to_string()),
        );
        assert_eq!(effects, vec![Effect::ScrollTo(ScrollTarget::Row(0))]);
    }

    #[test]
    fn fetched_page_with_pending_anchor_scrolls() {
        let mut router = Router::new(LineRenderer);
        update(&mut router, Action::FragmentChanged("#lib.rs@Lib".to_string()));
        let effects = update(
            &mut router,
            Action::PageFetched {
                page_id: "lib.rs".to_string(),
                result: Ok("// = Lib\nfn lib() {}\n".to_string()),
            },
        );
        assert_eq!(effects, vec![Effect::ScrollTo(ScrollTarget::Row(0))]);
    }

    #[test]
    fn failed_fetch_has_no_effects() {
        let mut router = Router::new(LineRenderer);
        update(&mut router, Action::FragmentChanged("#gone".to_string()));
        let effects = update(
            &mut router,
            Action::PageFetched {
                page_id: "gone".to_string(),
                result: Err(FetchError::InvalidPageId("gone".to_string())),
            },
        );
        assert!(effects.is_empty());
        assert!(router.page("gone").is_some_and(|p| p.error.is_some()));
    }
}
