//! # Pages
//!
//! The rendering pass: each [`Block`] becomes a documentation pane (via a
//! [`MarkupRenderer`]) next to a code pane, followed by a divider.
//!
//! ```text
//! ┌──────────────────────┬──────────────────────┐
//! │ = Heading            │ (top padding)        │
//! │ First paragraph ...  │ code row             │
//! │ ...                  │ code row             │
//! │                      │ (blank row)          │
//! │                      │ (bottom padding)     │
//! ├──────────────────────┴──────────────────────┤ divider
//! ```
//!
//! The code pane is padded at the top by the rows that precede the first
//! paragraph of the documentation, so code lines up with prose rather than
//! with the heading. When the documentation is taller, the code pane gets
//! bottom padding; a code pane is never shorter than its documentation.
//!
//! Heights are measured in rows. Nothing here knows about terminals.

use crate::core::blocks::{self, Block};

/// Rows taken by the divider after each block.
pub const DIVIDER_ROWS: usize = 1;

/// A heading found in a rendered documentation pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// 1 through 6.
    pub level: u8,
    pub text: String,
    /// Row of the heading inside its pane.
    pub row: usize,
}

/// Rendered documentation, as far as layout and navigation care.
pub trait RenderedDoc {
    /// Total rows.
    fn height(&self) -> usize;

    /// Rows before the first paragraph, or 0 when there is no paragraph.
    fn lead_height(&self) -> usize;

    /// Headings in document order.
    fn headings(&self) -> &[Heading];

    /// Link targets in document order.
    fn links(&self) -> &[String] {
        &[]
    }
}

/// Turns documentation text into a rendered pane.
pub trait MarkupRenderer {
    type Output: RenderedDoc;

    fn render(&self, text: &str) -> Self::Output;
}

/// A block after the rendering pass.
#[derive(Debug, Clone)]
pub struct RenderedBlock<D> {
    pub block: Block,
    pub doc: D,
    pub code_rows: Vec<String>,
    pub top_padding: usize,
    pub bottom_padding: usize,
}

impl<D: RenderedDoc> RenderedBlock<D> {
    pub fn render<R>(block: Block, renderer: &R) -> Self
    where
        R: MarkupRenderer<Output = D>,
    {
        let doc = renderer.render(&block.doc_text);
        let code_rows: Vec<String> = blocks::code_rows(&block.code_text)
            .into_iter()
            .map(str::to_string)
            .collect();

        let top_padding = doc.lead_height();
        // Content height excludes padding: the rows plus the closing blank row
        let content_height = code_rows.len() + 1;
        let bottom_padding = (doc.height() + 1).saturating_sub(content_height);

        Self {
            block,
            doc,
            code_rows,
            top_padding,
            bottom_padding,
        }
    }

    /// Rows taken by the code pane, padding included.
    pub fn code_height(&self) -> usize {
        self.top_padding + self.code_rows.len() + 1 + self.bottom_padding
    }

    /// Rows taken by the whole block, divider included.
    pub fn height(&self) -> usize {
        self.code_height().max(self.doc.height()) + DIVIDER_ROWS
    }
}

/// Run the rendering pass over every block, in order.
pub fn render_blocks<R: MarkupRenderer>(
    blocks: Vec<Block>,
    renderer: &R,
) -> Vec<RenderedBlock<R::Output>> {
    blocks
        .into_iter()
        .map(|block| RenderedBlock::render(block, renderer))
        .collect()
}

/// A virtual document: one source file, fetched and rendered once.
#[derive(Debug)]
pub struct Page<D> {
    pub id: String,
    pub blocks: Vec<RenderedBlock<D>>,
    /// Set once the text arrived and was rendered.
    pub loaded: bool,
    pub visible: bool,
    /// Set when fetching failed; the page then stays empty.
    pub error: Option<String>,
    /// Source text the blocks were rendered from, kept for re-rendering.
    pub text: Option<String>,
}

impl<D: RenderedDoc> Page<D> {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            blocks: Vec::new(),
            loaded: false,
            visible: false,
            error: None,
            text: None,
        }
    }

    /// Total rows of the page.
    pub fn height(&self) -> usize {
        self.blocks.iter().map(RenderedBlock::height).sum()
    }

    /// Top row of every block.
    pub fn block_offsets(&self) -> Vec<usize> {
        self.blocks
            .iter()
            .scan(0, |top, block| {
                let current = *top;
                *top += block.height();
                Some(current)
            })
            .collect()
    }

    /// Row of the first heading whose trimmed text equals `anchor`.
    pub fn heading_offset(&self, anchor: &str) -> Option<usize> {
        self.blocks
            .iter()
            .zip(self.block_offsets())
            .find_map(|(block, top)| {
                block
                    .doc
                    .headings()
                    .iter()
                    .find(|heading| heading.text.trim() == anchor)
                    .map(|heading| top + heading.row)
            })
    }

    /// Link targets across all documentation panes, in order.
    pub fn links(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .flat_map(|block| block.doc.links())
            .map(String::as_str)
            .collect()
    }
}
