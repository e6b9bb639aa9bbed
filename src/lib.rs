//! Illuminate library exports for testing

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub mod core;
pub mod source;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// Documentation markup understood by the doc column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Markup {
    #[default]
    Creole,
    Markdown,
}
