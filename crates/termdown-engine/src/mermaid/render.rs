use std::str::FromStr;

use super::block::FencedBlock;

/// Columns reserved for the replacement block's own fence and indentation.
const CODE_BLOCK_MARGIN: usize = 4;

/// How mermaid blocks are treated during document rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Leave the document untouched.
    Plain,
    /// Render diagrams with a plain character set.
    Ascii,
    /// Render diagrams with box-drawing characters.
    Unicode,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown render mode {0:?} (expected plain, ascii or unicode)")]
pub struct ParseRenderModeError(String);

impl FromStr for RenderMode {
    type Err = ParseRenderModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" => Ok(RenderMode::Plain),
            "ascii" => Ok(RenderMode::Ascii),
            "unicode" => Ok(RenderMode::Unicode),
            _ => Err(ParseRenderModeError(s.to_string())),
        }
    }
}

/// Glyph fidelity requested from the diagram backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    Ascii,
    Unicode,
}

/// Options passed to the diagram backend for one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramOptions {
    pub charset: Charset,
    /// Maximum output columns per line; `None` means unbounded.
    pub max_width: Option<usize>,
}

/// Failure reported by the diagram backend.
///
/// The `Display` text is shown verbatim inside the document, so messages
/// must stay one human-readable line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiagramError {
    #[error("empty diagram source")]
    EmptySource,
    #[error("unsupported diagram type: {0}")]
    UnsupportedDiagram(String),
    #[error("parse error: {0}")]
    Parse(String),
}

/// The seam to the diagram-layout engine.
///
/// The substitution engine treats the backend as a black box exposing this
/// one operation; it performs no diagram parsing or layout itself.
pub trait DiagramRenderer {
    /// Lay out `source` (mermaid grammar) as rows of glyphs.
    fn render(&self, source: &str, opts: &DiagramOptions) -> Result<String, DiagramError>;
}

/// Build the replacement line sequence for one block.
///
/// On success the rendered text is wrapped in a fresh generic ``` fence, each
/// line re-prefixed with the block's original indentation. On failure the
/// result is a small fence carrying the error message followed by the
/// original block reconstructed verbatim, so both the reason and the source
/// stay visible to the reader.
pub(crate) fn replacement_lines(
    block: &FencedBlock,
    charset: Charset,
    max_width: Option<usize>,
    renderer: &dyn DiagramRenderer,
) -> Vec<String> {
    let opts = DiagramOptions {
        charset,
        max_width: effective_width(max_width, block.indent_prefix.len()),
    };

    let indent = block.indent_prefix.as_str();
    let mut out = Vec::new();

    match renderer.render(&block.content, &opts) {
        Ok(rendered) => {
            let rendered = rendered.trim_end_matches(['\n', '\r', '\t', ' ']);
            out.push(format!("{indent}```"));
            for line in rendered.split('\n') {
                out.push(format!("{indent}{line}"));
            }
            out.push(format!("{indent}```"));
        }
        Err(err) => {
            let fence = block.fence_char.to_string().repeat(block.fence_len);
            out.push(format!("{indent}```"));
            out.push(format!("{indent}mermaid render error: {err}"));
            out.push(format!("{indent}```"));
            out.push(format!("{indent}{fence}{}", block.info_string));
            for line in block.content.split('\n') {
                out.push(format!("{indent}{line}"));
            }
            out.push(format!("{indent}{fence}"));
        }
    }

    out
}

/// Width budget handed to the backend: the caller's document width minus the
/// block indentation and the replacement fence margin. A non-positive or
/// fully consumed budget means unbounded, never zero columns.
fn effective_width(requested: Option<usize>, indent_len: usize) -> Option<usize> {
    let width = requested?;
    if width == 0 {
        return None;
    }
    let width = width.saturating_sub(indent_len);
    if width > CODE_BLOCK_MARGIN {
        Some(width - CODE_BLOCK_MARGIN)
    } else {
        None
    }
}
