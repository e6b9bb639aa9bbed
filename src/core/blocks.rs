//! # Block Splitting
//!
//! Turns a source file into an ordered list of documentation/code pairs.
//!
//! A block starts at a `//` comment whose text begins with `=` (a heading)
//! or `*` (a list item). Every comment line directly below it belongs to the
//! same block's documentation; every other line, including stray `//`
//! comments, is code and gets wrapped to the configured row width.
//!
//! ```text
//! // = Title          ─┐ doc_text: "Title\ndoc\n"
//! // doc              ─┘ start_line: 0, line_count: 2
//! code();             ── code_text: "code();\r\n"
//! ```
//!
//! Code that appears before the first heading comment is dropped, and so is
//! a file with no heading comment at all.

use serde::Serialize;

/// Comment marker recognized at the start of a trimmed line.
pub const COMMENT_MARKER: &str = "//";

/// Default number of characters per code row.
pub const DEFAULT_CHARS_PER_ROW: usize = 80;

/// Appended to a subline that continues on the next row.
pub const WRAP_MARKER: &str = "↩";

/// Prefixed to a row that continues the previous subline.
pub const CONTINUATION_MARKER: &str = "↪";

/// Row terminator inside `code_text`.
pub const ROW_BREAK: &str = "\r\n";

/// One documentation/code pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    /// Comment lines with their markers stripped, newline-joined.
    pub doc_text: String,
    /// Wrapped code rows following the comment, `\r\n`-terminated.
    pub code_text: String,
    /// 0-based index of the first comment line in the source.
    pub start_line: usize,
    /// Number of contiguous comment lines that opened the block.
    pub line_count: usize,
}

/// Accumulates the block currently being built.
#[derive(Default)]
struct Builder {
    doc_text: String,
    code_text: String,
    /// (first, last) comment line of the block in progress.
    comment_lines: Option<(usize, usize)>,
    blocks: Vec<Block>,
}

impl Builder {
    /// Emit the block in progress. Blocks without documentation are discarded.
    fn flush(&mut self) {
        if self.doc_text.is_empty() {
            return;
        }
        let Some((first, last)) = self.comment_lines else {
            return;
        };
        self.blocks.push(Block {
            doc_text: std::mem::take(&mut self.doc_text),
            code_text: std::mem::take(&mut self.code_text),
            start_line: first,
            line_count: last - first + 1,
        });
    }

    /// Try to absorb a line as documentation. Returns false if it is code.
    fn absorb_comment(&mut self, index: usize, line: &str) -> bool {
        let Some(text) = comment_text(line) else {
            return false;
        };

        if let Some((_, last)) = self.comment_lines.as_mut()
            && *last + 1 == index
        {
            self.doc_text.push_str(&text);
            self.doc_text.push('\n');
            *last = index;
            return true;
        }

        if text.starts_with('=') || text.starts_with('*') {
            self.flush();
            self.comment_lines = Some((index, index));
            self.doc_text = format!("{text}\n");
            self.code_text.clear();
            return true;
        }

        false
    }
}

/// Extract the documentation text of a comment line.
///
/// Returns `None` when the trimmed line does not start with `//`. The marker
/// and the character after it are skipped before trimming, so `//x` loses
/// its `x`.
pub fn comment_text(line: &str) -> Option<String> {
    if !line.trim().starts_with(COMMENT_MARKER) {
        return None;
    }
    let start = line.find(COMMENT_MARKER)? + COMMENT_MARKER.len();
    let rest: String = line[start..].chars().skip(1).collect();
    Some(rest.trim().to_string())
}

/// Split `source` into documentation/code blocks.
///
/// Line endings are normalized (`\r\n` and lone `\r` become `\n`). A
/// trailing newline does not produce an extra empty line.
pub fn split(source: &str, chars_per_row: usize) -> Vec<Block> {
    let normalized = source.replace("\r\n", "\n").replace('\r', "\n");
    let body = normalized.strip_suffix('\n').unwrap_or(&normalized);

    let mut builder = Builder::default();
    if normalized.is_empty() {
        return builder.blocks;
    }

    for (index, line) in body.split('\n').enumerate() {
        if !builder.absorb_comment(index, line) {
            wrap_code_line(line, chars_per_row, &mut builder.code_text);
        }
    }
    builder.flush();
    builder.blocks
}

/// Append `line` to `out` as one or more rows.
///
/// The first row holds `chars_per_row - 1` characters, every continuation
/// row `chars_per_row - 2`, leaving room for the wrap markers. An empty
/// line still produces one empty row.
pub fn wrap_code_line(line: &str, chars_per_row: usize, out: &mut String) {
    let first_width = chars_per_row.saturating_sub(1).max(1);
    let rest_width = chars_per_row.saturating_sub(2).max(1);

    let chars: Vec<char> = line.chars().collect();
    if chars.is_empty() {
        out.push_str(ROW_BREAK);
        return;
    }

    let mut offset = 0;
    let mut width = first_width;
    while offset < chars.len() {
        let end = (offset + width).min(chars.len());
        out.extend(&chars[offset..end]);
        offset = end;
        if offset < chars.len() {
            out.push_str(WRAP_MARKER);
            out.push_str(ROW_BREAK);
            out.push_str(CONTINUATION_MARKER);
        } else {
            out.push_str(ROW_BREAK);
        }
        width = rest_width;
    }
}

/// Split `code_text` back into display rows.
pub fn code_rows(code_text: &str) -> Vec<&str> {
    let body = code_text.strip_suffix(ROW_BREAK).unwrap_or(code_text);
    if code_text.is_empty() {
        return Vec::new();
    }
    body.split(ROW_BREAK).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_block_with_code() {
        let blocks = split("// = Title\n// doc\ncode();\n", 80);
        assert_eq!(
            blocks,
            vec![Block {
                doc_text: "Title\ndoc\n".to_string(),
                code_text: "code();\r\n".to_string(),
                start_line: 0,
                line_count: 2,
            }]
        );
    }

    #[test]
    fn no_comments_yields_no_blocks() {
        assert!(split("fn main() {}\nlet x = 1;\n", 80).is_empty());
        assert!(split("", 80).is_empty());
    }

    #[test]
    fn line_of_exactly_row_width_wraps_once() {
        let line = "x".repeat(80);
        let mut out = String::new();
        wrap_code_line(&line, 80, &mut out);
        let expected = format!("{}↩\r\n↪x\r\n", "x".repeat(79));
        assert_eq!(out, expected);
    }

    #[test]
    fn continuation_rows_are_two_narrower() {
        let line = "a".repeat(10);
        let mut out = String::new();
        wrap_code_line(&line, 5, &mut out);
        // 4 + 3 + 3 = 10
        assert_eq!(out, "aaaa↩\r\n↪aaa↩\r\n↪aaa\r\n");
    }

    #[test]
    fn short_line_is_not_wrapped() {
        let mut out = String::new();
        wrap_code_line("let x = 1;", 80, &mut out);
        assert_eq!(out, "let x = 1;\r\n");
        assert!(!out.contains(WRAP_MARKER));
    }

    #[test]
    fn wrapping_counts_chars_not_bytes() {
        let mut out = String::new();
        wrap_code_line("ééééé", 5, &mut out);
        assert_eq!(out, "éééé↩\r\n↪é\r\n");
    }

    #[test]
    fn empty_code_lines_keep_vertical_spacing() {
        let blocks = split("// = A\na();\n\nb();\n", 80);
        assert_eq!(blocks[0].code_text, "a();\r\n\r\nb();\r\n");
    }

    #[test]
    fn star_comment_starts_block() {
        let blocks = split("// * item\nx();\n", 80);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].doc_text, "* item\n");
    }

    #[test]
    fn plain_comment_without_heading_is_code() {
        let blocks = split("// = A\nfoo();\n// just a note\nbar();\n", 80);
        assert_eq!(blocks.len(), 1);
        assert_eq!(
            blocks[0].code_text,
            "foo();\r\n// just a note\r\nbar();\r\n"
        );
    }

    #[test]
    fn adjacent_heading_continues_instead_of_splitting() {
        // A heading-looking line directly below a block comment is continuation
        let blocks = split("// = A\n// = B\n", 80);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].doc_text, "A\nB\n");
        assert_eq!(blocks[0].line_count, 2);
    }

    #[test]
    fn separated_headings_start_new_blocks() {
        let source = "// = A\na();\n// == B\n// text\nb();\n";
        let blocks = split(source, 80);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].start_line, 0);
        assert_eq!(blocks[0].line_count, 1);
        assert_eq!(blocks[0].code_text, "a();\r\n");
        assert_eq!(blocks[1].doc_text, "== B\ntext\n");
        assert_eq!(blocks[1].start_line, 2);
        assert_eq!(blocks[1].line_count, 2);
        assert_eq!(blocks[1].code_text, "b();\r\n");
    }

    #[test]
    fn code_before_first_heading_is_dropped() {
        let blocks = split("use std::io;\n// = A\na();\n", 80);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].code_text, "a();\r\n");
    }

    #[test]
    fn marker_and_one_filler_char_are_skipped() {
        assert_eq!(comment_text("// = x").as_deref(), Some("= x"));
        assert_eq!(comment_text("    //   spaced  ").as_deref(), Some("spaced"));
        // No space after the marker: the first content char is lost
        assert_eq!(comment_text("//=x").as_deref(), Some("x"));
        assert_eq!(comment_text("//").as_deref(), Some(""));
        assert_eq!(comment_text("x // y"), None);
    }

    #[test]
    fn indented_comments_are_recognized() {
        let blocks = split("    // = Indented\n    body();\n", 80);
        assert_eq!(blocks[0].doc_text, "Indented\n");
        assert_eq!(blocks[0].code_text, "    body();\r\n");
    }

    #[test]
    fn line_endings_are_normalized() {
        let unix = split("// = A\n// b\nc();\n", 80);
        assert_eq!(split("// = A\r\n// b\r\nc();\r\n", 80), unix);
        assert_eq!(split("// = A\r// b\rc();\r", 80), unix);
    }

    #[test]
    fn empty_comment_line_after_heading_continues_block() {
        let blocks = split("// = A\n//\n// more\n", 80);
        assert_eq!(blocks[0].doc_text, "A\n\nmore\n");
        assert_eq!(blocks[0].line_count, 3);
    }

    #[test]
    fn split_is_deterministic() {
        let source = "// = A\nx();\n// * b\n// c\ny();\nz();\n";
        assert_eq!(split(source, 20), split(source, 20));
    }

    #[test]
    fn blocks_stay_within_source_lines() {
        let source = "a\n// = A\n// b\nc\n\n// * d\n// = e\n";
        let line_total = source.lines().count();
        for block in split(source, 80) {
            assert!(block.line_count >= 1);
            assert!(block.start_line + block.line_count <= line_total);
        }
    }

    #[test]
    fn long_code_lines_inside_block_wrap() {
        let long = "y".repeat(30);
        let blocks = split(&format!("// = A\n{long}\n"), 20);
        let rows = code_rows(&blocks[0].code_text);
        assert_eq!(rows[0].chars().count(), 19 + 1);
        assert!(rows[0].ends_with(WRAP_MARKER));
        assert!(rows[1].starts_with(CONTINUATION_MARKER));
    }

    #[test]
    fn code_rows_split_on_row_breaks() {
        assert_eq!(code_rows("a\r\n\r\nb\r\n"), vec!["a", "", "b"]);
        assert!(code_rows("").is_empty());
    }
}
