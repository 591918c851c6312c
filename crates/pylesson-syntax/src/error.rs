//! Error type shared by every stage of the lesson sandbox.
//!
//! Only *faults* travel through this type: oversized input, a multi-line
//! literal that never closes, literals or output that blow past their caps.
//! Lines the sandbox does not understand are never errors; they are skipped.
//! The runner turns any fault into one generic message for the learner and
//! keeps the [`Error`] itself for logs and the CLI.
//!
//! # Examples
//!
//! ```rust
//! use pylesson_syntax::error::{error, Error, Result};
//!
//! fn check_size(src: &str, max: usize) -> Result<()> {
//!     if src.len() > max {
//!         error(format!("source is {} bytes, limit is {}", src.len(), max))
//!     } else {
//!         Ok(())
//!     }
//! }
//!
//! assert!(check_size("t = (1, 2)", 64).is_ok());
//! let err = check_size("t = (1, 2)", 4).unwrap_err();
//! assert_eq!(err.to_string(), "source is 10 bytes, limit is 4");
//!
//! let located = Error::with_span("unterminated literal", 3, 5);
//! assert_eq!(located.to_string(), "unterminated literal at 3:5");
//! ```

use std::fmt;

/// A fault raised while tokenizing, matching or running learner code.
///
/// `line` and `col` are 1-based and refer to the learner's source text when
/// the fault can be pinned to a place in it.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    /// Human-readable description
    pub msg: String,

    /// Line in the learner's source (1-based)
    pub line: Option<usize>,

    /// Column in the learner's source (1-based)
    pub col: Option<usize>,
}

impl Error {
    /// Creates an error without source location.
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            line: None,
            col: None,
        }
    }

    /// Creates an error pointing at `line`:`col` of the learner's source.
    pub fn with_span(msg: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            msg: msg.into(),
            line: Some(line),
            col: Some(col),
        }
    }

    /// Attaches a line number when the error does not carry one yet.
    pub fn at_line(mut self, line: usize) -> Self {
        if self.line.is_none() {
            self.line = Some(line);
            self.col = Some(1);
        }
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(l), Some(c)) = (self.line, self.col) {
            write!(f, "{} at {}:{}", self.msg, l, c)
        } else {
            write!(f, "{}", self.msg)
        }
    }
}

impl std::error::Error for Error {}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::new(s)
    }
}
impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::new(s)
    }
}

/// `Result` with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Shorthand for `Err(Error::new(msg))`.
pub fn error<T>(msg: impl Into<String>) -> Result<T> {
    Err(Error::new(msg))
}

/// Shorthand for `Err(Error::with_span(msg, line, col))`.
pub fn error_at<T>(line: usize, col: usize, msg: impl Into<String>) -> Result<T> {
    Err(Error::with_span(msg, line, col))
}
