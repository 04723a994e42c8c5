//! # Diagram Text Layout
//!
//! Compact mermaid layout backend: turns flowchart and sequence diagram
//! grammar into rows and columns of glyphs, in either plain ASCII or Unicode
//! box-drawing fidelity.
//!
//! The crate is consumed through [`termdown_engine::DiagramRenderer`]; the
//! substitution engine never sees anything but that one operation.
//!
//! ## Modules
//!
//! - **`glyphs`**: the ASCII and Unicode character sets
//! - **`canvas`**: 2D character grid with clipped drawing primitives
//! - **`flowchart`**: `graph` / `flowchart` parsing, layering and routing
//! - **`sequence`**: `sequenceDiagram` parsing and lifeline layout

mod canvas;
mod flowchart;
mod glyphs;
mod sequence;

use termdown_engine::{DiagramError, DiagramOptions, DiagramRenderer};

/// Text layout backend for mermaid diagrams.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextDiagramRenderer;

impl TextDiagramRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl DiagramRenderer for TextDiagramRenderer {
    fn render(&self, source: &str, opts: &DiagramOptions) -> Result<String, DiagramError> {
        let header = source
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty() && !l.starts_with("%%"))
            .ok_or(DiagramError::EmptySource)?;
        let keyword = header.split_whitespace().next().unwrap_or("");

        let glyphs = glyphs::for_charset(opts.charset);
        let art = match keyword {
            "graph" | "flowchart" => flowchart::render(&flowchart::parse(source)?, glyphs),
            "sequenceDiagram" => sequence::render(&sequence::parse(source)?, glyphs),
            other => return Err(DiagramError::UnsupportedDiagram(other.to_string())),
        };

        Ok(clamp_width(art, opts.max_width))
    }
}

/// Hard-truncate every line at the width budget.
fn clamp_width(art: String, max_width: Option<usize>) -> String {
    let Some(width) = max_width else {
        return art;
    };
    art.lines()
        .map(|line| {
            if line.chars().count() > width {
                line.chars().take(width).collect()
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
