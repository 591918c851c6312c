//! Progress flags: booleans a lesson page uses to unlock "continue".
//!
//! Flags are matched against the raw source text, so a flag can be set by a
//! line the interpreter skipped.

use std::collections::BTreeMap;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use pylesson_syntax::error::{Error, Result};

/// One detector as written in a lesson config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagRule {
    pub name: String,
    /// Regular expression, matched in multi-line mode
    pub pattern: String,
}

impl FlagRule {
    pub fn new(name: &str, pattern: &str) -> Self {
        Self { name: name.to_string(), pattern: pattern.to_string() }
    }
}

#[derive(Debug, Clone)]
pub struct FlagDetectors {
    detectors: Vec<(String, Regex)>,
}

impl FlagDetectors {
    pub fn compile(rules: &[FlagRule]) -> Result<Self> {
        let mut detectors = Vec::with_capacity(rules.len());
        for rule in rules {
            let re = RegexBuilder::new(&rule.pattern)
                .multi_line(true)
                .build()
                .map_err(|e| Error::new(format!("flag '{}' has an invalid pattern: {}", rule.name, e)))?;
            detectors.push((rule.name.clone(), re));
        }
        Ok(Self { detectors })
    }

    pub fn detect(&self, source: &str) -> ProgressFlags {
        ProgressFlags(
            self.detectors
                .iter()
                .map(|(name, re)| (name.clone(), re.is_match(source)))
                .collect(),
        )
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.detectors.iter().map(|(name, _)| name.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProgressFlags(BTreeMap<String, bool>);

impl ProgressFlags {
    /// Unknown names read as unset.
    pub fn is_set(&self, name: &str) -> bool {
        self.0.get(name).copied().unwrap_or(false)
    }

    pub fn all_set(&self) -> bool {
        self.0.values().all(|set| *set)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(name, set)| (name.as_str(), *set))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
