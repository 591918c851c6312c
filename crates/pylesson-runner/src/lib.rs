//! Lesson-facing entry point of the sandbox.
//!
//! ```rust
//! use pylesson_runner::{run, Lesson};
//!
//! let lesson = Lesson::builtin("tuples").unwrap();
//! let outcome = run("colors = (\"red\", \"green\")\nprint(colors[0])", &lesson);
//! assert_eq!(outcome.output, "red");
//! assert!(outcome.flags.is_set("created_tuple"));
//! ```

pub mod flags;
pub mod lesson;
pub mod runner;

pub use flags::{FlagDetectors, FlagRule, ProgressFlags};
pub use lesson::{builtin_ids, Lesson, LessonConfig, ProgressTracker, Reward};
pub use runner::{execute, run, RunOutcome, FAULT_MESSAGE, MAX_SOURCE_BYTES, NO_OUTPUT_MESSAGE};
