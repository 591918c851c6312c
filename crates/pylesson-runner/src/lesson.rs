//! Lesson configuration: which part of the grammar a lesson page teaches,
//! how its key lookups fail, which progress flags it watches and what
//! finishing it is worth.

use log::debug;
use serde::{Deserialize, Serialize};

use pylesson_interpreter::KeyMissPolicy;
use pylesson_parser::{Grammar, PrintShape, Rule};
use pylesson_syntax::error::{error, Error, Result};

use crate::flags::{FlagDetectors, FlagRule, ProgressFlags};

/// The host's progress store. The sandbox only ever calls into it.
pub trait ProgressTracker {
    fn add_xp_and_coins(&mut self, xp: u32, coins: u32);
    fn complete_level(&mut self, lesson_id: &str);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub xp: u32,
    pub coins: u32,
}

/// Serialized form of a lesson, e.g. a JSON file handed to the CLI.
///
/// ```rust
/// use pylesson_runner::Lesson;
///
/// let lesson = Lesson::from_json(r#"{
///     "id": "warmup",
///     "rules": ["assign", "print"],
///     "print_shapes": ["whole"],
///     "flags": [{"name": "made_tuple", "pattern": "=\\s*\\("}]
/// }"#).unwrap();
/// assert_eq!(lesson.id(), "warmup");
/// assert!(lesson.detect_flags("t = (1, 2)").is_set("made_tuple"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonConfig {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(flatten)]
    pub grammar: Grammar,
    #[serde(default)]
    pub key_miss: KeyMissPolicy,
    #[serde(default)]
    pub flags: Vec<FlagRule>,
    #[serde(default)]
    pub reward: Reward,
}

/// A validated lesson with its flag detectors compiled.
#[derive(Debug, Clone)]
pub struct Lesson {
    config: LessonConfig,
    detectors: FlagDetectors,
}

const BUILTIN_IDS: &[&str] = &["tuples", "dictionaries", "sets", "nested", "playground"];

/// Keys the nested-structures lesson recognises inside dictionary literals.
const NESTED_VOCABULARY: &[&str] = &[
    "name", "age", "type", "level", "health", "teacher", "students", "items", "weapons",
    "potions", "keys",
];

pub fn builtin_ids() -> &'static [&'static str] {
    BUILTIN_IDS
}

impl Lesson {
    pub fn from_config(config: LessonConfig) -> Result<Self> {
        if config.id.trim().is_empty() {
            return error("lesson id must not be empty");
        }
        let detectors = FlagDetectors::compile(&config.flags).map_err(|e| {
            Error::new(format!("lesson '{}': {}", config.id, e.msg))
        })?;
        debug!("lesson '{}': {} flag detector(s)", config.id, config.flags.len());
        Ok(Self { config, detectors })
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: LessonConfig = serde_json::from_str(text)
            .map_err(|e| Error::with_span(format!("invalid lesson config: {}", e), e.line(), e.column()))?;
        Self::from_config(config)
    }

    /// One of the lessons that ship with the sandbox, see [`builtin_ids`].
    pub fn builtin(id: &str) -> Result<Self> {
        let config = match id {
            "tuples" => tuples(),
            "dictionaries" => dictionaries(),
            "sets" => sets(),
            "nested" => nested(),
            "playground" => playground(),
            other => {
                return error(format!(
                    "unknown lesson '{}' (available: {})",
                    other,
                    BUILTIN_IDS.join(", ")
                ))
            }
        };
        Self::from_config(config)
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn title(&self) -> &str {
        &self.config.title
    }

    pub fn grammar(&self) -> &Grammar {
        &self.config.grammar
    }

    pub fn key_miss(&self) -> KeyMissPolicy {
        self.config.key_miss
    }

    pub fn reward(&self) -> Reward {
        self.config.reward
    }

    pub fn config(&self) -> &LessonConfig {
        &self.config
    }

    pub fn flag_names(&self) -> impl Iterator<Item = &str> {
        self.detectors.names()
    }

    pub fn detect_flags(&self, source: &str) -> ProgressFlags {
        self.detectors.detect(source)
    }

    /// Pays out the lesson reward and marks it complete. Deciding that the
    /// learner earned it (the quiz) is the caller's business.
    pub fn award(&self, tracker: &mut dyn ProgressTracker) {
        let Reward { xp, coins } = self.config.reward;
        tracker.add_xp_and_coins(xp, coins);
        tracker.complete_level(&self.config.id);
    }
}

fn config(
    id: &str,
    title: &str,
    grammar: Grammar,
    flags: &[(&str, &str)],
    reward: Reward,
) -> LessonConfig {
    LessonConfig {
        id: id.to_string(),
        title: title.to_string(),
        grammar,
        key_miss: KeyMissPolicy::KeyError,
        flags: flags.iter().map(|(name, pattern)| FlagRule::new(name, pattern)).collect(),
        reward,
    }
}

fn tuples() -> LessonConfig {
    config(
        "tuples",
        "Tuples: lists that never change",
        Grammar::with(
            &[Rule::MultiLineLiteral, Rule::Assign, Rule::Print],
            &[
                PrintShape::Index,
                PrintShape::Whole,
                PrintShape::Len,
                PrintShape::Membership,
                PrintShape::Label,
                PrintShape::Literal,
            ],
        ),
        &[
            ("created_tuple", r"^\s*\w+\s*=\s*\("),
            ("accessed_index", r"\w+\[-?\d+\]"),
            ("used_len", r"\blen\("),
        ],
        Reward { xp: 50, coins: 10 },
    )
}

fn dictionaries() -> LessonConfig {
    config(
        "dictionaries",
        "Dictionaries: labels for your data",
        Grammar::with(
            &[
                Rule::MultiLineLiteral,
                Rule::Assign,
                Rule::Delete,
                Rule::SetItem,
                Rule::ForLoop,
                Rule::Print,
            ],
            &[
                PrintShape::Key,
                PrintShape::Whole,
                PrintShape::Len,
                PrintShape::Membership,
                PrintShape::Label,
                PrintShape::Literal,
                PrintShape::Method,
                PrintShape::FString,
            ],
        ),
        &[
            ("created_dict", r#"\w+\s*=\s*\{\s*["'][^"']+["']\s*:"#),
            ("added_key", r#"\w+\[\s*["'][^"']+["']\s*\]\s*=[^=]"#),
            ("deleted_key", r"\bdel\s+\w+\["),
            ("looped_items", r"\bfor\s+\w+\s*,\s*\w+\s+in\s+\w+\.items\(\s*\)"),
        ],
        Reward { xp: 75, coins: 15 },
    )
}

fn sets() -> LessonConfig {
    config(
        "sets",
        "Sets: no duplicates allowed",
        Grammar::with(
            &[
                Rule::MultiLineLiteral,
                Rule::Assign,
                Rule::Add,
                Rule::Remove,
                Rule::ForLoop,
                Rule::Print,
            ],
            &[
                PrintShape::Whole,
                PrintShape::Len,
                PrintShape::Membership,
                PrintShape::Label,
                PrintShape::Literal,
            ],
        ),
        &[
            ("created_set", r"\w+\s*=\s*(\{[^:{}]+\}|set\(\s*\))"),
            ("used_add", r"\.add\("),
            ("used_remove", r"\.remove\("),
            ("checked_membership", r"\s(not\s+)?in\s+\w+\s*\)"),
        ],
        Reward { xp: 60, coins: 12 },
    )
}

fn nested() -> LessonConfig {
    config(
        "nested",
        "Nested structures: collections inside collections",
        Grammar::with(
            &[
                Rule::MultiLineLiteral,
                Rule::Assign,
                Rule::Append,
                Rule::SetItem,
                Rule::ForLoop,
                Rule::Print,
            ],
            &[
                PrintShape::Nested,
                PrintShape::Index,
                PrintShape::Key,
                PrintShape::Whole,
                PrintShape::Len,
                PrintShape::Label,
                PrintShape::Literal,
                PrintShape::FString,
            ],
        )
        .with_dict_keys(NESTED_VOCABULARY),
        &[
            ("nested_list_value", r#"["'][^"']+["']\s*:\s*\["#),
            ("nested_lookup", r#"\w+\[\s*["'][^"']+["']\s*\]\[\s*-?\d+\s*\]"#),
            ("looped_nested", r"\bfor\s+\w+(\s*,\s*\w+)?\s+in\s+\w+(\.\w+\(\s*\))?\s*:"),
        ],
        Reward { xp: 100, coins: 20 },
    )
}

fn playground() -> LessonConfig {
    config(
        "playground",
        "Playground: everything at once",
        Grammar::full(),
        &[("printed", r"\bprint\(")],
        Reward::default(),
    )
}
