use termdown_engine::DiagramError;

use crate::canvas::Canvas;
use crate::glyphs::Glyphs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    LeftRight,
    RightLeft,
    TopDown,
    BottomUp,
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone)]
pub(crate) struct Edge {
    pub from: usize,
    pub to: usize,
    pub label: Option<String>,
    pub arrow: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct Graph {
    pub direction: Direction,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    /// Index of `id`, inserting a node on first sight. An explicit label on
    /// a later mention wins over the bare identifier.
    fn intern(&mut self, id: &str, label: Option<String>) -> usize {
        if let Some(i) = self.nodes.iter().position(|n| n.id == id) {
            if let Some(label) = label {
                self.nodes[i].label = label;
            }
            return i;
        }
        self.nodes.push(Node {
            id: id.to_string(),
            label: label.unwrap_or_else(|| id.to_string()),
        });
        self.nodes.len() - 1
    }
}

/// Parse a `graph` / `flowchart` body into a [`Graph`].
pub(crate) fn parse(source: &str) -> Result<Graph, DiagramError> {
    let mut statements = statements(source);
    if statements.is_empty() {
        return Err(DiagramError::EmptySource);
    }

    let header = statements.remove(0);
    let mut words = header.split_whitespace();
    let keyword = words.next().unwrap_or("");
    if keyword != "graph" && keyword != "flowchart" {
        return Err(DiagramError::UnsupportedDiagram(keyword.to_string()));
    }
    let direction = match words.next() {
        None => Direction::TopDown,
        Some("LR") => Direction::LeftRight,
        Some("RL") => Direction::RightLeft,
        Some("TD") | Some("TB") => Direction::TopDown,
        Some("BT") => Direction::BottomUp,
        Some(other) => {
            return Err(DiagramError::Parse(format!("unknown direction {other:?}")));
        }
    };

    let mut graph = Graph {
        direction,
        nodes: vec![],
        edges: vec![],
    };
    for stmt in statements {
        parse_statement(&stmt, &mut graph)?;
    }
    Ok(graph)
}

/// Trimmed, non-empty, non-comment statements (`;` splits within a line).
fn statements(source: &str) -> Vec<String> {
    source
        .lines()
        .flat_map(|line| line.split(';'))
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.starts_with("%%"))
        .map(str::to_string)
        .collect()
}

/// One statement: a node, optionally chained through edges (`A --> B --> C`).
fn parse_statement(stmt: &str, graph: &mut Graph) -> Result<(), DiagramError> {
    let (mut from, mut rest) = parse_node(stmt.trim(), graph)?;
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            return Ok(());
        }
        let (arrow, label, after_edge) = parse_edge(rest)?;
        let (to, after_node) = parse_node(after_edge.trim_start(), graph)?;
        graph.edges.push(Edge {
            from,
            to,
            label,
            arrow,
        });
        from = to;
        rest = after_node;
    }
}

/// Byte length of the leading identifier run (alphanumerics and `_`).
fn ident_len(s: &str) -> usize {
    s.char_indices()
        .find(|&(_, c)| !(c.is_alphanumeric() || c == '_'))
        .map_or(s.len(), |(i, _)| i)
}

/// `ident`, `ident[Label]` or `ident(Label)`.
fn parse_node<'a>(s: &'a str, graph: &mut Graph) -> Result<(usize, &'a str), DiagramError> {
    let id_len = ident_len(s);
    if id_len == 0 {
        return Err(DiagramError::Parse(format!(
            "expected node identifier near {s:?}"
        )));
    }
    let id = &s[..id_len];
    let mut rest = &s[id_len..];

    let close = match rest.chars().next() {
        Some('[') => Some(']'),
        Some('(') => Some(')'),
        _ => None,
    };
    let mut label = None;
    if let Some(close) = close {
        let inner = &rest[1..];
        let end = inner
            .find(close)
            .ok_or_else(|| DiagramError::Parse(format!("unclosed label on node {id:?}")))?;
        label = Some(inner[..end].trim().to_string());
        rest = &inner[end + 1..];
    }

    Ok((graph.intern(id, label), rest))
}

/// An edge connector: a run of `-`/`=`/`.` of length >= 2, an optional `>`
/// head, and an optional `|label|`.
fn parse_edge(s: &str) -> Result<(bool, Option<String>, &str), DiagramError> {
    let run = s
        .chars()
        .take_while(|c| matches!(c, '-' | '=' | '.'))
        .count();
    if run < 2 {
        return Err(DiagramError::Parse(format!("expected edge near {s:?}")));
    }
    let mut rest = &s[run..];
    let mut arrow = false;
    if let Some(tail) = rest.strip_prefix('>') {
        arrow = true;
        rest = tail;
    }

    let mut label = None;
    if let Some(inner) = rest.strip_prefix('|') {
        let end = inner
            .find('|')
            .ok_or_else(|| DiagramError::Parse("unclosed edge label".to_string()))?;
        label = Some(inner[..end].trim().to_string());
        rest = &inner[end + 1..];
    }

    Ok((arrow, label, rest))
}

/// Layer assignment by longest path from the sources. Passes are bounded by
/// the node count so cyclic graphs still terminate.
fn assign_ranks(graph: &Graph) -> Vec<usize> {
    let mut rank = vec![0usize; graph.nodes.len()];
    for _ in 0..graph.nodes.len().max(1) {
        let mut changed = false;
        for e in &graph.edges {
            if e.from != e.to && rank[e.to] < rank[e.from] + 1 {
                rank[e.to] = rank[e.from] + 1;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    rank
}

#[derive(Debug, Clone, Copy, Default)]
struct Rect {
    x: usize,
    y: usize,
    w: usize,
    h: usize,
}

impl Rect {
    fn cx(&self) -> usize {
        self.x + self.w / 2
    }
    fn cy(&self) -> usize {
        self.y + self.h / 2
    }
    fn right(&self) -> usize {
        self.x + self.w - 1
    }
    fn bottom(&self) -> usize {
        self.y + self.h - 1
    }
}

fn box_width(node: &Node) -> usize {
    node.label.chars().count() + 4
}

/// Lay the graph out and draw it.
pub(crate) fn render(graph: &Graph, glyphs: &Glyphs) -> String {
    let ranks = assign_ranks(graph);
    let nrank = ranks.iter().copied().max().unwrap_or(0) + 1;
    let mut layers: Vec<Vec<usize>> = vec![vec![]; nrank];
    for (i, r) in ranks.iter().enumerate() {
        layers[*r].push(i);
    }

    let label_span = graph
        .edges
        .iter()
        .filter_map(|e| e.label.as_ref())
        .map(|l| l.chars().count() + 2)
        .max()
        .unwrap_or(0);

    let mut rects: Vec<Rect> = vec![Rect::default(); graph.nodes.len()];
    let mut canvas = match graph.direction {
        Direction::LeftRight | Direction::RightLeft => {
            let gap = label_span.max(6);
            let layer_w: Vec<usize> = layers
                .iter()
                .map(|l| l.iter().map(|&i| box_width(&graph.nodes[i])).max().unwrap_or(0))
                .collect();

            let mut xs = vec![0usize; nrank];
            let order: Vec<usize> = match graph.direction {
                Direction::RightLeft => (0..nrank).rev().collect(),
                _ => (0..nrank).collect(),
            };
            let mut x = 0;
            for &r in &order {
                xs[r] = x;
                x += layer_w[r] + gap;
            }
            let total_w = x.saturating_sub(gap).max(1);
            let total_h = layers.iter().map(|l| l.len() * 4).max().unwrap_or(1);

            let mut canvas = Canvas::new(total_w, total_h);
            for (r, layer) in layers.iter().enumerate() {
                for (j, &i) in layer.iter().enumerate() {
                    let w = box_width(&graph.nodes[i]);
                    let rect = Rect {
                        x: xs[r] + (layer_w[r] - w) / 2,
                        y: j * 4,
                        w,
                        h: 3,
                    };
                    rects[i] = rect;
                    canvas.node_box(rect.x, rect.y, rect.w, &graph.nodes[i].label, glyphs);
                }
            }
            canvas
        }
        Direction::TopDown | Direction::BottomUp => {
            let vgap = 4;
            let layer_total_w: Vec<usize> = layers
                .iter()
                .map(|l| {
                    let boxes: usize = l.iter().map(|&i| box_width(&graph.nodes[i])).sum();
                    boxes + l.len().saturating_sub(1) * 3
                })
                .collect();

            let mut ys = vec![0usize; nrank];
            let order: Vec<usize> = match graph.direction {
                Direction::BottomUp => (0..nrank).rev().collect(),
                _ => (0..nrank).collect(),
            };
            let mut y = 0;
            for &r in &order {
                ys[r] = y;
                y += 3 + vgap;
            }
            let total_h = y.saturating_sub(vgap).max(1);
            let total_w = layer_total_w.iter().copied().max().unwrap_or(1) + label_span;

            let mut canvas = Canvas::new(total_w, total_h);
            for (r, layer) in layers.iter().enumerate() {
                let mut x = 0;
                for &i in layer {
                    let w = box_width(&graph.nodes[i]);
                    let rect = Rect {
                        x,
                        y: ys[r],
                        w,
                        h: 3,
                    };
                    rects[i] = rect;
                    canvas.node_box(rect.x, rect.y, rect.w, &graph.nodes[i].label, glyphs);
                    x += w + 3;
                }
            }
            canvas
        }
    };

    for e in &graph.edges {
        if e.from != e.to {
            draw_edge(&mut canvas, rects[e.from], rects[e.to], e, glyphs);
        }
    }

    canvas.render()
}

/// Route an edge between two placed boxes: straight when the centers align,
/// a single elbow otherwise. The arrowhead always sits adjacent to the
/// target box.
fn draw_edge(canvas: &mut Canvas, a: Rect, b: Rect, edge: &Edge, g: &Glyphs) {
    if b.x > a.right() + 1 {
        // Target to the right.
        let x1 = a.right() + 1;
        let x2 = b.x - 1;
        let sy = a.cy();
        let ty = b.cy();
        if sy == ty {
            canvas.hline(x1, x2, sy, g.horizontal);
        } else {
            let mid = (x1 + x2) / 2;
            canvas.hline(x1, mid, sy, g.horizontal);
            canvas.vline(sy, ty, mid, g.vertical);
            canvas.hline(mid, x2, ty, g.horizontal);
        }
        if edge.arrow {
            canvas.put(x2, ty, g.arrow_right);
        }
        if let Some(label) = &edge.label {
            canvas.text(x1 + 1, sy.saturating_sub(1), label);
        }
    } else if a.x > b.right() + 1 {
        // Target to the left.
        let x1 = a.x - 1;
        let x2 = b.right() + 1;
        let sy = a.cy();
        let ty = b.cy();
        if sy == ty {
            canvas.hline(x2, x1, sy, g.horizontal);
        } else {
            let mid = (x1 + x2) / 2;
            canvas.hline(mid, x1, sy, g.horizontal);
            canvas.vline(sy, ty, mid, g.vertical);
            canvas.hline(x2, mid, ty, g.horizontal);
        }
        if edge.arrow {
            canvas.put(x2, ty, g.arrow_left);
        }
        if let Some(label) = &edge.label {
            canvas.text(x2 + 1, sy.saturating_sub(1), label);
        }
    } else if b.y > a.bottom() + 1 {
        // Target below.
        let y1 = a.bottom() + 1;
        let y2 = b.y - 1;
        let sx = a.cx();
        let tx = b.cx();
        if sx == tx {
            canvas.vline(y1, y2, sx, g.vertical);
        } else {
            let mid = (y1 + y2) / 2;
            canvas.vline(y1, mid, sx, g.vertical);
            canvas.hline(sx, tx, mid, g.horizontal);
            canvas.vline(mid, y2, tx, g.vertical);
        }
        if edge.arrow {
            canvas.put(tx, y2, g.arrow_down);
        }
        if let Some(label) = &edge.label {
            canvas.text(sx.max(tx) + 2, (y1 + y2) / 2, label);
        }
    } else if a.y > b.bottom() + 1 {
        // Target above.
        let y1 = a.y - 1;
        let y2 = b.bottom() + 1;
        let sx = a.cx();
        let tx = b.cx();
        if sx == tx {
            canvas.vline(y2, y1, sx, g.vertical);
        } else {
            let mid = (y1 + y2) / 2;
            canvas.vline(mid, y1, sx, g.vertical);
            canvas.hline(sx, tx, mid, g.horizontal);
            canvas.vline(y2, mid, tx, g.vertical);
        }
        if edge.arrow {
            canvas.put(tx, y2, g.arrow_up);
        }
        if let Some(label) = &edge.label {
            canvas.text(sx.max(tx) + 2, (y1 + y2) / 2, label);
        }
    }
    // Boxes that touch or overlap get no connector.
}
