use pretty_assertions::assert_eq;
use rstest::rstest;
use std::cell::RefCell;
use termdown_engine::{
    Charset, DiagramError, DiagramOptions, DiagramRenderer, RenderMode, render_mermaid_blocks,
};

/// Backend double that draws one box row per content line, padded to exactly
/// the granted width budget so the width contract can be checked end to end.
struct GridRenderer {
    calls: RefCell<Vec<DiagramOptions>>,
}

impl GridRenderer {
    fn new() -> Self {
        Self {
            calls: RefCell::new(vec![]),
        }
    }
}

impl DiagramRenderer for GridRenderer {
    fn render(&self, source: &str, opts: &DiagramOptions) -> Result<String, DiagramError> {
        self.calls.borrow_mut().push(opts.clone());
        let dash = match opts.charset {
            Charset::Ascii => '-',
            Charset::Unicode => '─',
        };
        let rows: Vec<String> = source
            .lines()
            .map(|line| {
                let mut row = format!("{}{}", dash, line.trim());
                if let Some(width) = opts.max_width {
                    while row.chars().count() < width {
                        row.push(dash);
                    }
                    row = row.chars().take(width).collect();
                }
                row
            })
            .collect();
        Ok(rows.join("\n"))
    }
}

struct RejectingRenderer;

impl DiagramRenderer for RejectingRenderer {
    fn render(&self, _source: &str, _opts: &DiagramOptions) -> Result<String, DiagramError> {
        Err(DiagramError::Parse("unexpected token".to_string()))
    }
}

#[rstest]
#[case(RenderMode::Plain)]
#[case(RenderMode::Ascii)]
#[case(RenderMode::Unicode)]
fn documents_without_diagrams_are_untouched_in_every_mode(#[case] mode: RenderMode) {
    let input = "# Title\n\n```rust\nfn main() {}\n```\n\ntrailing prose\n";
    let out = render_mermaid_blocks(input, mode, Some(80), &GridRenderer::new());
    assert_eq!(out, input);
}

#[rstest]
#[case("\n")]
#[case("\r\n")]
fn no_op_preserves_the_line_ending_convention(#[case] eol: &str) {
    let input = format!("# Title{eol}{eol}plain text{eol}");
    let out = render_mermaid_blocks(&input, RenderMode::Ascii, None, &GridRenderer::new());
    assert_eq!(out, input);
}

#[test]
fn plain_mode_is_identity_even_with_diagrams() {
    let input = "```mermaid\ngraph LR\nA --> B\n```\n";
    let out = render_mermaid_blocks(input, RenderMode::Plain, Some(40), &GridRenderer::new());
    assert_eq!(out, input);
}

#[rstest]
#[case("mermaid")]
#[case("Mermaid")]
#[case("MERMAID")]
fn info_string_case_does_not_matter(#[case] lang: &str) {
    let input = format!("```{lang}\ngraph LR\nA --> B\n```");
    let out = render_mermaid_blocks(&input, RenderMode::Ascii, None, &GridRenderer::new());
    assert!(!out.to_lowercase().contains("```mermaid"), "got: {out}");
}

#[test]
fn surrounding_document_is_preserved_exactly() {
    let input = "# Hello\n\n```mermaid\ngraph LR\nA --> B\n```\n\nMore text";
    let out = render_mermaid_blocks(input, RenderMode::Ascii, None, &GridRenderer::new());
    assert!(out.starts_with("# Hello\n\n"));
    assert!(out.ends_with("\n\nMore text"));
    assert!(!out.contains("```mermaid"));
}

#[test]
fn other_language_fences_are_never_altered() {
    let input = "```go\nfunc main() {}\n```\n\n```mermaid\ngraph LR\nA --> B\n```";
    let out = render_mermaid_blocks(input, RenderMode::Ascii, None, &GridRenderer::new());
    assert!(out.contains("```go\nfunc main() {}\n```"));
    assert!(!out.contains("```mermaid"));
}

#[test]
fn nested_mermaid_fence_is_left_verbatim() {
    let input = "````markdown\n```mermaid\ngraph LR\nA --> B\n```\n````";
    let out = render_mermaid_blocks(input, RenderMode::Ascii, None, &GridRenderer::new());
    assert_eq!(out, input);
}

#[test]
fn tilde_fences_transform_like_backtick_fences() {
    let input = "~~~mermaid\ngraph LR\nA --> B\n~~~";
    let out = render_mermaid_blocks(input, RenderMode::Ascii, None, &GridRenderer::new());
    assert!(!out.contains("~~~mermaid"));
    // Replacement fences are always generic backtick fences.
    assert!(out.starts_with("```\n"));
}

#[test]
fn longer_closing_fence_closes_the_block() {
    let input = "```mermaid\ngraph LR\nA --> B\n`````";
    let out = render_mermaid_blocks(input, RenderMode::Ascii, None, &GridRenderer::new());
    assert!(!out.contains("```mermaid"));
    assert!(!out.contains("`````"));
}

#[test]
fn unterminated_fence_returns_the_document_unchanged() {
    let input = "```mermaid\ngraph LR\nA --> B";
    let out = render_mermaid_blocks(input, RenderMode::Ascii, None, &GridRenderer::new());
    assert_eq!(out, input);
}

#[test]
fn crlf_document_with_a_diagram_is_transformed() {
    let input = "```mermaid\r\ngraph LR\r\nA --> B\r\n```\r\n";
    let out = render_mermaid_blocks(input, RenderMode::Ascii, None, &GridRenderer::new());
    assert!(!out.contains("```mermaid"));
}

#[test]
fn list_indentation_is_carried_onto_every_replacement_line() {
    let input = "- Item\n  ```mermaid\n  graph LR\n  A --> B\n  ```";
    let out = render_mermaid_blocks(input, RenderMode::Ascii, None, &GridRenderer::new());
    assert!(!out.contains("```mermaid"));
    let mut lines = out.lines();
    assert_eq!(lines.next(), Some("- Item"));
    for line in lines {
        assert!(line.starts_with("  "), "line not indented: {line:?}");
    }
}

#[rstest]
#[case(40, "", 36)]
#[case(40, "  ", 34)]
#[case(30, "   ", 23)]
fn rendered_lines_respect_the_width_budget(
    #[case] width: usize,
    #[case] indent: &str,
    #[case] budget: usize,
) {
    let input = format!(
        "{indent}```mermaid\n{indent}graph LR\n{indent}AVeryLongSingleTokenLabel --> B\n{indent}```"
    );
    let renderer = GridRenderer::new();
    let out = render_mermaid_blocks(&input, RenderMode::Ascii, Some(width), &renderer);

    let calls = renderer.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].max_width, Some(budget));

    for line in out.lines().filter(|l| l.contains('-')) {
        let content_len = line.chars().count() - indent.chars().count();
        assert!(content_len <= budget, "line too wide: {line:?}");
    }
}

#[test]
fn unicode_mode_requests_box_drawing_glyphs() {
    let input = "```mermaid\ngraph LR\nA --> B\n```";
    let out = render_mermaid_blocks(input, RenderMode::Unicode, None, &GridRenderer::new());
    assert!(out.contains('─'));
}

#[test]
fn ascii_mode_scenario_yields_hyphen_rows() {
    let input = "```mermaid\ngraph LR\nA --> B\n```";
    let out = render_mermaid_blocks(input, RenderMode::Ascii, None, &GridRenderer::new());
    assert!(!out.contains("```mermaid"));
    assert!(out.lines().any(|l| l.contains('-')));
}

#[test]
fn invalid_diagram_keeps_failure_and_source_visible() {
    let input = "```mermaid\nthis is not valid mermaid syntax @@##$$\n```";
    let out = render_mermaid_blocks(input, RenderMode::Ascii, None, &RejectingRenderer);
    assert!(out.contains("mermaid render error: parse error: unexpected token"));
    assert!(out.contains("```mermaid"));
    assert!(out.contains("this is not valid mermaid syntax @@##$$"));
    assert!(!out.contains("<!--"));
}

#[test]
fn empty_document_renders_empty() {
    let out = render_mermaid_blocks("", RenderMode::Ascii, Some(80), &GridRenderer::new());
    assert_eq!(out, "");
}
