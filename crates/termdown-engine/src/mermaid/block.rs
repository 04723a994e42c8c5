use super::scanner::RawBlock;

/// One discovered mermaid region, ready for rendering.
///
/// `start_line` and `end_line` are zero-based indices into the original line
/// sequence (`end_line` is the closing fence, always past `start_line`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock {
    pub start_line: usize,
    pub end_line: usize,
    /// Delimiter character of the opening fence, `` ` `` or `~`.
    pub fence_char: char,
    /// Run length of the opening delimiter, >= 3.
    pub fence_len: usize,
    /// Literal leading whitespace shared by the fence lines (0-3 spaces).
    pub indent_prefix: String,
    /// Text after the opening delimiter run.
    pub info_string: String,
    /// De-indented text strictly between the fence lines.
    pub content: String,
}

/// Materialize a boundary record into a [`FencedBlock`].
///
/// Each content line has the block's indent prefix stripped when it is an
/// exact literal prefix; lines that do not start with it are kept untouched
/// rather than truncated or rejected.
pub(crate) fn materialize(lines: &[&str], raw: &RawBlock) -> FencedBlock {
    let content = lines[raw.start_line + 1..raw.end_line]
        .iter()
        .map(|&line| line.strip_prefix(raw.indent.as_str()).unwrap_or(line))
        .collect::<Vec<_>>()
        .join("\n");

    FencedBlock {
        start_line: raw.start_line,
        end_line: raw.end_line,
        fence_char: raw.marker,
        fence_len: raw.run,
        indent_prefix: raw.indent.clone(),
        info_string: raw.info.clone(),
        content,
    }
}
