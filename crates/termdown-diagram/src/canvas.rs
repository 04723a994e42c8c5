use crate::glyphs::Glyphs;

/// Fixed-size 2D character grid the layout phases draw onto.
///
/// All drawing operations clip silently at the grid edges.
pub(crate) struct Canvas {
    width: usize,
    rows: Vec<Vec<char>>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            rows: vec![vec![' '; width]; height],
        }
    }

    pub fn put(&mut self, x: usize, y: usize, ch: char) {
        if y < self.rows.len() && x < self.width {
            self.rows[y][x] = ch;
        }
    }

    pub fn text(&mut self, x: usize, y: usize, s: &str) {
        for (i, ch) in s.chars().enumerate() {
            self.put(x + i, y, ch);
        }
    }

    /// Horizontal run covering both endpoints.
    pub fn hline(&mut self, x1: usize, x2: usize, y: usize, ch: char) {
        let (lo, hi) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        for x in lo..=hi {
            self.put(x, y, ch);
        }
    }

    /// Vertical run covering both endpoints.
    pub fn vline(&mut self, y1: usize, y2: usize, x: usize, ch: char) {
        let (lo, hi) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
        for y in lo..=hi {
            self.put(x, y, ch);
        }
    }

    /// Bordered box with its label centered on the middle row.
    pub fn node_box(&mut self, x: usize, y: usize, w: usize, label: &str, g: &Glyphs) {
        self.put(x, y, g.top_left);
        self.put(x + w - 1, y, g.top_right);
        self.put(x, y + 2, g.bottom_left);
        self.put(x + w - 1, y + 2, g.bottom_right);
        self.hline(x + 1, x + w - 2, y, g.horizontal);
        self.hline(x + 1, x + w - 2, y + 2, g.horizontal);
        self.put(x, y + 1, g.vertical);
        self.put(x + w - 1, y + 1, g.vertical);

        let inner = w.saturating_sub(2);
        let pad = inner.saturating_sub(label.chars().count()) / 2;
        self.text(x + 1 + pad, y + 1, label);
    }

    /// Render to text, trimming trailing blanks per row and trailing blank rows.
    pub fn render(&self) -> String {
        let mut lines: Vec<String> = self
            .rows
            .iter()
            .map(|row| {
                let s: String = row.iter().collect();
                s.trim_end().to_string()
            })
            .collect();
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        lines.join("\n")
    }
}
