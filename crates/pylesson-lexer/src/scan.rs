//! Quote-aware bracket scanning.
//!
//! Literal bodies are split on commas and colons, and multi-line literals are
//! gathered until their brackets balance. Both need to know whether a
//! character sits inside a string or inside a nested bracket; [`Scanner`]
//! walks the text once and reports that for every character.

/// Walks a string and tracks quote and bracket state.
struct Scanner<'a> {
    chars: std::str::CharIndices<'a>,
    quote: Option<char>,
    escaped: bool,
    depth: i32,
}

/// One character with the state it was seen in.
struct Step {
    idx: usize,
    ch: char,
    /// Bracket depth before this character is applied
    depth: i32,
    /// Inside a string literal (the quote characters themselves count as inside)
    quoted: bool,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.char_indices(),
            quote: None,
            escaped: false,
            depth: 0,
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        let (idx, ch) = self.chars.next()?;
        let depth = self.depth;
        if let Some(q) = self.quote {
            if self.escaped {
                self.escaped = false;
            } else if ch == '\\' {
                self.escaped = true;
            } else if ch == q {
                self.quote = None;
            }
            return Some(Step { idx, ch, depth, quoted: true });
        }
        match ch {
            '"' | '\'' => {
                self.quote = Some(ch);
                return Some(Step { idx, ch, depth, quoted: true });
            }
            '(' | '[' | '{' => self.depth += 1,
            ')' | ']' | '}' => self.depth -= 1,
            _ => {}
        }
        Some(Step { idx, ch, depth, quoted: false })
    }
}

/// Net bracket change over `text`, ignoring brackets inside strings.
///
/// ```rust
/// use pylesson_lexer::scan::depth_change;
///
/// assert_eq!(depth_change("d = {"), 1);
/// assert_eq!(depth_change("\"a\": [1, 2],"), 0);
/// assert_eq!(depth_change("\"(\": 1}"), -1);
/// ```
pub fn depth_change(text: &str) -> i32 {
    let mut scanner = Scanner::new(text);
    for _ in scanner.by_ref() {}
    scanner.depth
}

/// Splits on `sep` wherever it appears outside strings and brackets.
///
/// Pieces are trimmed; an empty input gives no pieces.
///
/// ```rust
/// use pylesson_lexer::scan::split_top_level;
///
/// let parts = split_top_level("\"a, b\", [1, 2], 3", ',');
/// assert_eq!(parts, vec!["\"a, b\"", "[1, 2]", "3"]);
/// ```
pub fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let mut parts = Vec::new();
    let mut start = 0;
    for step in Scanner::new(text) {
        if !step.quoted && step.depth == 0 && step.ch == sep {
            parts.push(text[start..step.idx].trim());
            start = step.idx + step.ch.len_utf8();
        }
    }
    parts.push(text[start..].trim());
    parts
}

/// Byte offset of the first `ch` outside strings and brackets.
pub fn find_top_level(text: &str, ch: char) -> Option<usize> {
    Scanner::new(text)
        .find(|s| !s.quoted && s.depth == 0 && s.ch == ch)
        .map(|s| s.idx)
}

/// Drops a trailing `# comment`, leaving `#` inside strings alone.
///
/// ```rust
/// use pylesson_lexer::scan::strip_comment;
///
/// assert_eq!(strip_comment("print(t)  # show it"), "print(t)");
/// assert_eq!(strip_comment("print(\"#1\")"), "print(\"#1\")");
/// ```
pub fn strip_comment(text: &str) -> &str {
    match Scanner::new(text).find(|s| !s.quoted && s.ch == '#') {
        Some(step) => text[..step.idx].trim_end(),
        None => text,
    }
}

/// Byte offset of the bracket closing the opener at the start of `text`.
///
/// Returns `None` when `text` does not start with an opener or the opener is
/// never closed.
///
/// ```rust
/// use pylesson_lexer::scan::matching_close;
///
/// assert_eq!(matching_close("[1, [2]] + x"), Some(7));
/// assert_eq!(matching_close("(1, 2"), None);
/// ```
pub fn matching_close(text: &str) -> Option<usize> {
    if !text.starts_with(&['(', '[', '{'][..]) {
        return None;
    }
    Scanner::new(text)
        .find(|s| !s.quoted && s.depth == 1 && matches!(s.ch, ')' | ']' | '}'))
        .map(|s| s.idx)
}
