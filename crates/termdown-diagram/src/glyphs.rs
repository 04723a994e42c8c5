use termdown_engine::Charset;

/// Character set used for boxes, lines and arrowheads.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Glyphs {
    pub horizontal: char,
    pub vertical: char,
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub dashed: char,
    pub arrow_right: char,
    pub arrow_left: char,
    pub arrow_down: char,
    pub arrow_up: char,
}

const ASCII: Glyphs = Glyphs {
    horizontal: '-',
    vertical: '|',
    top_left: '+',
    top_right: '+',
    bottom_left: '+',
    bottom_right: '+',
    dashed: '.',
    arrow_right: '>',
    arrow_left: '<',
    arrow_down: 'v',
    arrow_up: '^',
};

const UNICODE: Glyphs = Glyphs {
    horizontal: '─',
    vertical: '│',
    top_left: '┌',
    top_right: '┐',
    bottom_left: '└',
    bottom_right: '┘',
    dashed: '╌',
    arrow_right: '►',
    arrow_left: '◄',
    arrow_down: '▼',
    arrow_up: '▲',
};

pub(crate) fn for_charset(charset: Charset) -> &'static Glyphs {
    match charset {
        Charset::Ascii => &ASCII,
        Charset::Unicode => &UNICODE,
    }
}
