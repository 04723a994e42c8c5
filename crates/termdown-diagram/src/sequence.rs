use termdown_engine::DiagramError;

use crate::canvas::Canvas;
use crate::glyphs::Glyphs;

#[derive(Debug, Clone)]
pub(crate) struct Participant {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone)]
pub(crate) struct Message {
    pub from: usize,
    pub to: usize,
    pub text: String,
    pub dashed: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct Sequence {
    pub participants: Vec<Participant>,
    pub messages: Vec<Message>,
}

impl Sequence {
    /// Index of `id`, registering an implicit participant on first mention.
    fn intern(&mut self, id: &str) -> usize {
        if let Some(i) = self.participants.iter().position(|p| p.id == id) {
            return i;
        }
        self.participants.push(Participant {
            id: id.to_string(),
            label: id.to_string(),
        });
        self.participants.len() - 1
    }
}

/// Parse a `sequenceDiagram` body.
pub(crate) fn parse(source: &str) -> Result<Sequence, DiagramError> {
    let mut lines = source
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with("%%"));

    match lines.next() {
        Some("sequenceDiagram") => {}
        Some(other) => {
            let keyword = other.split_whitespace().next().unwrap_or("");
            return Err(DiagramError::UnsupportedDiagram(keyword.to_string()));
        }
        None => return Err(DiagramError::EmptySource),
    }

    let mut seq = Sequence {
        participants: vec![],
        messages: vec![],
    };

    for line in lines {
        if let Some(rest) = line
            .strip_prefix("participant ")
            .or_else(|| line.strip_prefix("actor "))
        {
            let (id, label) = match rest.split_once(" as ") {
                Some((id, label)) => (id.trim(), label.trim()),
                None => (rest.trim(), rest.trim()),
            };
            if id.is_empty() {
                return Err(DiagramError::Parse(format!(
                    "participant without a name in {line:?}"
                )));
            }
            let idx = seq.intern(id);
            seq.participants[idx].label = label.to_string();
        } else {
            let message = parse_message(line, &mut seq)?;
            seq.messages.push(message);
        }
    }

    Ok(seq)
}

/// Byte length of the leading identifier run (alphanumerics and `_`).
fn ident_len(s: &str) -> usize {
    s.char_indices()
        .find(|&(_, c)| !(c.is_alphanumeric() || c == '_'))
        .map_or(s.len(), |(i, _)| i)
}

/// `A->>B: text` and the `->`, `-->`, `-->>` variants.
fn parse_message(line: &str, seq: &mut Sequence) -> Result<Message, DiagramError> {
    let id_len = ident_len(line);
    if id_len == 0 {
        return Err(DiagramError::Parse(format!(
            "unrecognized statement {line:?}"
        )));
    }
    let from_id = &line[..id_len];
    let rest = &line[id_len..];

    let dash_run = rest.chars().take_while(|&c| c == '-').count();
    let after_dashes = &rest[dash_run..];
    let head_run = after_dashes.chars().take_while(|&c| c == '>').count();
    if dash_run == 0 || head_run == 0 || head_run > 2 {
        return Err(DiagramError::Parse(format!(
            "expected a message arrow in {line:?}"
        )));
    }
    let dashed = dash_run >= 2;
    let rest = &after_dashes[head_run..];

    let to_len = ident_len(rest);
    if to_len == 0 {
        return Err(DiagramError::Parse(format!(
            "expected a message target in {line:?}"
        )));
    }
    let to_id = &rest[..to_len];
    let rest = &rest[to_len..];

    let text = match rest.trim_start().strip_prefix(':') {
        Some(t) => t.trim().to_string(),
        None if rest.trim().is_empty() => String::new(),
        None => {
            return Err(DiagramError::Parse(format!(
                "expected ':' before message text in {line:?}"
            )));
        }
    };

    let from = seq.intern(from_id);
    let to = seq.intern(to_id);
    Ok(Message {
        from,
        to,
        text,
        dashed,
    })
}

/// Participants as boxes over lifelines, messages as horizontal arrows in
/// declaration order.
pub(crate) fn render(seq: &Sequence, glyphs: &Glyphs) -> String {
    let widths: Vec<usize> = seq
        .participants
        .iter()
        .map(|p| p.label.chars().count() + 4)
        .collect();

    let longest_text = seq
        .messages
        .iter()
        .map(|m| m.text.chars().count())
        .max()
        .unwrap_or(0);
    let gap = longest_text.saturating_sub(1).max(3);

    // Lifeline columns.
    let mut centers = Vec::with_capacity(seq.participants.len());
    let mut x = 0;
    let mut xs = Vec::with_capacity(seq.participants.len());
    for w in &widths {
        xs.push(x);
        centers.push(x + w / 2);
        x += w + gap;
    }
    let total_w = x.saturating_sub(gap).max(1) + longest_text;
    let total_h = 3 + seq.messages.len() * 3 + 1;

    let mut canvas = Canvas::new(total_w, total_h);
    for (i, p) in seq.participants.iter().enumerate() {
        canvas.node_box(xs[i], 0, widths[i], &p.label, glyphs);
    }
    for &cx in &centers {
        canvas.vline(3, total_h - 1, cx, glyphs.vertical);
    }

    for (i, m) in seq.messages.iter().enumerate() {
        let label_y = 3 + i * 3 + 1;
        let arrow_y = label_y + 1;
        let (src, dst) = (centers[m.from], centers[m.to]);
        let line_ch = if m.dashed {
            glyphs.dashed
        } else {
            glyphs.horizontal
        };

        if src == dst {
            // Self message: label only, beside the lifeline.
            canvas.text(src + 2, label_y, &m.text);
            continue;
        }

        let (lo, hi) = if src < dst { (src, dst) } else { (dst, src) };
        let span = hi - lo - 1;
        let pad = span.saturating_sub(m.text.chars().count()) / 2;
        canvas.text(lo + 1 + pad, label_y, &m.text);

        canvas.hline(lo + 1, hi - 1, arrow_y, line_ch);
        if src < dst {
            canvas.put(hi - 1, arrow_y, glyphs.arrow_right);
        } else {
            canvas.put(lo + 1, arrow_y, glyphs.arrow_left);
        }
    }

    canvas.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyphs;
    use termdown_engine::Charset;

    fn ascii() -> &'static Glyphs {
        glyphs::for_charset(Charset::Ascii)
    }

    #[test]
    fn parses_participants_and_messages() {
        let s = parse("sequenceDiagram\nparticipant Alice\nAlice->>Bob: Hello").unwrap();
        assert_eq!(s.participants.len(), 2);
        assert_eq!(s.participants[1].id, "Bob");
        assert_eq!(s.messages[0].text, "Hello");
        assert!(!s.messages[0].dashed);
    }

    #[test]
    fn participant_alias() {
        let s = parse("sequenceDiagram\nparticipant B as Bobby\nA->B: hi").unwrap();
        assert_eq!(s.participants[0].label, "Bobby");
    }

    #[test]
    fn dashed_reply_arrow() {
        let s = parse("sequenceDiagram\nA->>B: q\nB-->>A: r").unwrap();
        assert!(s.messages[1].dashed);
    }

    #[test]
    fn wrong_header_is_unsupported() {
        let err = parse("pie\n1: 2").unwrap_err();
        assert!(matches!(err, DiagramError::UnsupportedDiagram(_)));
    }

    #[test]
    fn message_without_arrow_is_a_parse_error() {
        let err = parse("sequenceDiagram\nAlice waves").unwrap_err();
        assert!(matches!(err, DiagramError::Parse(_)));
    }

    #[test]
    fn renders_participant_boxes_and_an_arrow() {
        let s = parse("sequenceDiagram\nAlice->>Bob: Hello").unwrap();
        let art = render(&s, ascii());
        assert!(art.contains("Alice"));
        assert!(art.contains("Bob"));
        assert!(art.contains("Hello"));
        assert!(art.contains('>'));
        assert!(art.contains('|'));
    }

    #[test]
    fn reply_points_back_to_the_left() {
        let s = parse("sequenceDiagram\nA->>B: q\nB-->>A: r").unwrap();
        let art = render(&s, ascii());
        assert!(art.contains('<'));
        assert!(art.lines().any(|l| l.contains('.')));
    }

    #[test]
    fn multibyte_names_and_text_render() {
        let s = parse("sequenceDiagram\nÄlice->>Bob: héllo").unwrap();
        assert_eq!(s.participants[0].id, "Älice");
        let art = render(&s, ascii());
        assert!(art.contains("Älice"));
        assert!(art.contains("héllo"));
    }

    #[test]
    fn self_message_shows_its_label() {
        let s = parse("sequenceDiagram\nA->>A: think").unwrap();
        let art = render(&s, ascii());
        assert!(art.contains("think"));
    }
}
