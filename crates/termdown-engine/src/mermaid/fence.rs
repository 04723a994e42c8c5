/// Delimiter facts for a single line, classified without surrounding context.
///
/// A line qualifies when, after at most 3 leading spaces, it carries a run of
/// three or more identical `` ` `` or `~` characters. Everything after the
/// run is the (trimmed) info string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FenceLine {
    /// Literal leading whitespace, 0 to 3 space characters.
    pub indent: String,
    /// The delimiter character, `` ` `` or `~`.
    pub marker: char,
    /// Run length of the delimiter, always >= 3.
    pub run: usize,
    /// Trimmed text after the delimiter run.
    pub info: String,
}

impl FenceLine {
    /// Classify `line`, returning `None` when it is not a fence delimiter.
    pub fn parse(line: &str) -> Option<FenceLine> {
        let trimmed = line.trim_end_matches(['\r', '\n']);

        let indent_len = trimmed
            .bytes()
            .take(3)
            .take_while(|b| *b == b' ')
            .count();
        let rest = &trimmed[indent_len..];

        let marker = match rest.chars().next() {
            Some(c @ ('`' | '~')) => c,
            _ => return None,
        };

        let run = rest.chars().take_while(|&c| c == marker).count();
        if run < 3 {
            return None;
        }

        let info = rest[run..].trim().to_string();

        // Backtick fences cannot carry a backtick in the info string, because
        // that form is reserved for inline code spans.
        if marker == '`' && info.contains('`') {
            return None;
        }

        Some(FenceLine {
            indent: trimmed[..indent_len].to_string(),
            marker,
            run,
            info,
        })
    }

    /// Whether this line closes a fence opened with `marker` and `run`.
    ///
    /// A closer must reuse the opening character, run at least as long, and
    /// carry nothing but whitespace after the run.
    pub fn closes(&self, marker: char, run: usize) -> bool {
        self.marker == marker && self.run >= run && self.info.is_empty()
    }
}
