//! # Core Application Logic
//!
//! Splitting, layout and navigation. It knows nothing about terminals or
//! HTTP.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • blocks (splitter)    │
//!                    │  • page (render pass)   │
//!                    │  • router (navigation)  │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI.         │
//!                    └───────────┬─────────────┘
//!                                │
//!                    ┌───────────┴───────────┐
//!                    ▼                       ▼
//!             ┌────────────┐          ┌────────────┐
//!             │    TUI     │          │   source   │
//!             │  Adapter   │          │ (fetching) │
//!             │ (ratatui)  │          │            │
//!             └────────────┘          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`blocks`]: source text → documentation/code blocks
//! - [`page`]: the rendering pass and the `Page` type
//! - [`router`]: current page, page cache, scroll targets
//! - [`fragment`]: fragment parsing and change polling
//! - [`action`]: the `Action` enum and `update()`
//! - [`config`]: settings and their override hierarchy

pub mod action;
pub mod blocks;
pub mod config;
pub mod fragment;
pub mod page;
pub mod router;
