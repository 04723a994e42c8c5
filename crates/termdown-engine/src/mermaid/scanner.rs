use super::fence::FenceLine;

/// Boundary record for a finalized mermaid block, before content extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawBlock {
    pub start_line: usize,
    pub end_line: usize,
    pub marker: char,
    pub run: usize,
    pub indent: String,
    pub info: String,
}

#[derive(Debug)]
enum State {
    Outside,
    InFence {
        marker: char,
        run: usize,
        /// Present only when the open fence is a mermaid candidate.
        open: Option<Pending>,
    },
}

#[derive(Debug)]
struct Pending {
    start_line: usize,
    marker: char,
    run: usize,
    indent: String,
    info: String,
}

/// Line-by-line state machine collecting top-level mermaid fenced blocks.
///
/// While inside any fence, lines that look like fence openers are inert
/// content: no nesting counter, no new candidate. Only the matching closer
/// for the currently open fence changes state, which guarantees a mermaid
/// fence nested inside an unrelated outer fence is never captured.
pub(crate) struct FenceScanner {
    state: State,
    out: Vec<RawBlock>,
}

impl FenceScanner {
    pub fn new() -> Self {
        Self {
            state: State::Outside,
            out: vec![],
        }
    }

    pub fn push(&mut self, index: usize, line: &str) {
        let fence = FenceLine::parse(line);

        match &mut self.state {
            State::Outside => {
                if let Some(f) = fence {
                    let open = is_mermaid_info(&f.info).then(|| Pending {
                        start_line: index,
                        marker: f.marker,
                        run: f.run,
                        indent: f.indent.clone(),
                        info: f.info.clone(),
                    });
                    self.state = State::InFence {
                        marker: f.marker,
                        run: f.run,
                        open,
                    };
                }
            }
            State::InFence { marker, run, open } => {
                if let Some(f) = fence
                    && f.closes(*marker, *run)
                {
                    if let Some(p) = open.take() {
                        self.out.push(RawBlock {
                            start_line: p.start_line,
                            end_line: index,
                            marker: p.marker,
                            run: p.run,
                            indent: p.indent,
                            info: p.info,
                        });
                    }
                    self.state = State::Outside;
                }
            }
        }
    }

    /// Consume the scanner. An unterminated fence at end of input discards
    /// its candidate: nothing is emitted for that span.
    pub fn finish(self) -> Vec<RawBlock> {
        self.out
    }
}

/// Whether an info string's first whitespace-delimited token names the
/// mermaid language, case-insensitively.
fn is_mermaid_info(info: &str) -> bool {
    info.split_whitespace()
        .next()
        .is_some_and(|token| token.eq_ignore_ascii_case("mermaid"))
}
