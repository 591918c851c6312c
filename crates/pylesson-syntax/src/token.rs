//! Logical lines produced by the tokenizer.
//!
//! The sandbox never looks below the level of a line: each statement shape
//! is recognised against a whole trimmed line (plus a bounded lookahead for
//! blocks), so the "token" here is one non-blank, non-comment source line.
//!
//! # Examples
//!
//! ```rust
//! use pylesson_syntax::Line;
//!
//! let line = Line::new(3, 4, "print(k, v)");
//! assert_eq!(line.number, 3);
//! assert!(line.is_indented_under(0));
//! assert!(!line.is_indented_under(4));
//! ```

/// One logical source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Line number in the source text (1-based)
    pub number: usize,

    /// Count of leading whitespace characters before trimming
    pub indent: usize,

    /// The line with surrounding whitespace removed
    pub content: String,
}

impl Line {
    pub fn new(number: usize, indent: usize, content: impl Into<String>) -> Self {
        Self {
            number,
            indent,
            content: content.into(),
        }
    }

    /// True when this line sits deeper than a block header at `indent`.
    pub fn is_indented_under(&self, indent: usize) -> bool {
        self.indent > indent
    }
}
