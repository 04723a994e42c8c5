//! # Mermaid Block Substitution
//!
//! Two-pass replacement of mermaid fenced code blocks with a textual
//! rendering of the diagram.
//!
//! ## Passes
//!
//! 1. **Scan** (`fence`, `scanner`): each line is classified for fence
//!    delimiter facts, and a small state machine collects the top-level
//!    mermaid blocks. Fences nested inside other fences are never captured.
//!
//! 2. **Splice** (`render`, `splice`): each block's replacement is produced
//!    by the diagram backend and spliced back over the original span, in
//!    descending start order so earlier indices stay valid.
//!
//! ## Modules
//!
//! - **`fence`**: `FenceLine` delimiter classification for a single line
//! - **`scanner`**: `FenceScanner` state machine producing block boundaries
//! - **`block`**: `FencedBlock` materialization (de-indented content)
//! - **`render`**: `RenderMode`, the `DiagramRenderer` seam, and replacement
//!   construction for both the success and the visible-failure path
//! - **`splice`**: whole-span line replacement
//!
//! ## Key Invariants
//!
//! - A document without mermaid blocks is returned byte-identical, CRLF
//!   included; only transformed documents are re-joined with `\n`.
//! - A render failure never aborts the pass: the failed block is replaced by
//!   a visible error note followed by its untouched original text.
//! - Unterminated fences are left exactly as found.

mod block;
mod fence;
mod render;
mod scanner;
mod splice;

pub use block::FencedBlock;
pub use render::{
    Charset, DiagramError, DiagramOptions, DiagramRenderer, ParseRenderModeError, RenderMode,
};

/// Replace every top-level mermaid fenced block in `content` with a textual
/// rendering from `renderer`.
///
/// `max_width` is the maximum document width in columns; `None` means
/// unbounded. [`RenderMode::Plain`] (and empty input) return the input
/// unchanged. This function never fails: blocks the backend rejects are
/// substituted with a visible inline error plus the original block text.
pub fn render_mermaid_blocks(
    content: &str,
    mode: RenderMode,
    max_width: Option<usize>,
    renderer: &dyn DiagramRenderer,
) -> String {
    if content.is_empty() {
        return String::new();
    }

    let charset = match mode {
        RenderMode::Plain => return content.to_owned(),
        RenderMode::Ascii => Charset::Ascii,
        RenderMode::Unicode => Charset::Unicode,
    };

    // Scanning works on LF-normalized lines; the no-block short-circuit below
    // returns the caller's own string so CRLF documents survive untouched.
    let normalized = content.replace("\r\n", "\n");
    let lines: Vec<&str> = normalized.split('\n').collect();

    let mut scanner = scanner::FenceScanner::new();
    for (i, line) in lines.iter().enumerate() {
        scanner.push(i, line);
    }
    let raw_blocks = scanner.finish();

    if raw_blocks.is_empty() {
        return content.to_owned();
    }

    let blocks: Vec<FencedBlock> = raw_blocks
        .iter()
        .map(|raw| block::materialize(&lines, raw))
        .collect();

    let mut out: Vec<String> = lines.iter().map(|s| (*s).to_string()).collect();

    // Bottom-to-top so pending block indices stay valid while line counts
    // change underneath them.
    for block in blocks.iter().rev() {
        let replacement = render::replacement_lines(block, charset, max_width, renderer);
        splice::replace_span(&mut out, block.start_line, block.end_line, replacement);
    }

    out.join("\n")
}
