/// Replace `lines[start..=end]` with `replacement`.
///
/// Callers apply replacements in descending start order; a replacement's
/// length generally differs from the span it covers, which would invalidate
/// later indices if splicing ran top-to-bottom.
pub(crate) fn replace_span(
    lines: &mut Vec<String>,
    start: usize,
    end: usize,
    replacement: Vec<String>,
) {
    let _ = lines.splice(start..=end, replacement);
}
