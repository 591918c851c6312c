//! pylesson lexer: turns learner source into logical lines.
pub mod scan;

use pylesson_syntax::token::Line;

/// Line scanner over learner source text.
pub struct Lexer<'a> {
    src: &'a str,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer over the given source string.
    pub fn new(input: &'a str) -> Self {
        Self { src: input }
    }

    fn indent_of(raw: &str) -> usize {
        raw.chars().take_while(|c| c.is_whitespace()).count()
    }

    /// Every non-blank, non-comment-only line, in source order.
    pub fn tokenize(&mut self) -> Vec<Line> {
        let mut lines = Vec::new();
        for (i, raw) in self.src.split('\n').enumerate() {
            let raw = raw.strip_suffix('\r').unwrap_or(raw);
            let content = raw.trim();
            if content.is_empty() || content.starts_with('#') {
                continue;
            }
            lines.push(Line::new(i + 1, Self::indent_of(raw), content));
        }
        lines
    }
}
