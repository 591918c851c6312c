//! One "Run Code" press: source text in, display text and flags out.

use log::{info, warn};

use pylesson_interpreter::Interpreter;
use pylesson_lexer::Lexer;
use pylesson_parser::Parser;
use pylesson_syntax::error::{error, Error, Result};

use crate::flags::ProgressFlags;
use crate::lesson::Lesson;

/// Larger sources are rejected before tokenizing.
pub const MAX_SOURCE_BYTES: usize = 64 * 1024;

/// Shown when a run printed nothing.
pub const NO_OUTPUT_MESSAGE: &str = "Code ran successfully! (No output to display)";

/// Shown instead of any output when a run faults.
pub const FAULT_MESSAGE: &str = "Error: Something went wrong. Check your code syntax!";

#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    /// Text for the output panel
    pub output: String,
    pub flags: ProgressFlags,
    /// What went wrong, for logs; never part of `output`
    pub fault: Option<Error>,
}

impl RunOutcome {
    pub fn is_fault(&self) -> bool {
        self.fault.is_some()
    }
}

/// Runs `source` under `lesson`. Flags are computed whether or not the run
/// faults.
pub fn run(source: &str, lesson: &Lesson) -> RunOutcome {
    let flags = lesson.detect_flags(source);
    match execute(source, lesson) {
        Ok(lines) if lines.is_empty() => RunOutcome {
            output: NO_OUTPUT_MESSAGE.to_string(),
            flags,
            fault: None,
        },
        Ok(lines) => RunOutcome { output: lines.join("\n"), flags, fault: None },
        Err(e) => {
            warn!("lesson '{}': run faulted: {}", lesson.id(), e);
            RunOutcome { output: FAULT_MESSAGE.to_string(), flags, fault: Some(e) }
        }
    }
}

/// The printed lines of a run, or the fault that voids them all.
pub fn execute(source: &str, lesson: &Lesson) -> Result<Vec<String>> {
    if source.len() > MAX_SOURCE_BYTES {
        return error(format!(
            "source is {} bytes, the limit is {}",
            source.len(),
            MAX_SOURCE_BYTES
        ));
    }
    let lines = Lexer::new(source).tokenize();
    let line_count = lines.len();
    let program = Parser::new(lines, lesson.grammar()).parse_program()?;
    let mut interpreter = Interpreter::new(lesson.key_miss());
    interpreter.run(&program)?;
    let output = interpreter.take_output();
    info!(
        "lesson '{}': {} line(s), {} statement(s), {} printed",
        lesson.id(),
        line_count,
        program.items.len(),
        output.len()
    );
    Ok(output)
}
