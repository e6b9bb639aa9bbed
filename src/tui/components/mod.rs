//! # TUI Components
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: fragment on screen, status, selected link
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `PageView`: scrollable doc/code columns of the current page
//! - `GotoPrompt`: fragment input, emits `PromptEvent`
//!
//! Components receive external data as props (struct fields), not by reaching
//! into the router. Each file holds the component's state, events, rendering
//! and tests.
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (Top status bar)
//! ├── page_view.rs     (Doc and code columns)
//! └── goto_prompt.rs   (Fragment prompt)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod goto_prompt;
pub use goto_prompt::{GotoPrompt, PromptEvent};
pub mod page_view;
pub use page_view::{PageView, PageViewState};
