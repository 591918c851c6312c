//! Runtime values bound to learner variables.

use std::fmt;

use indexmap::{IndexMap, IndexSet};

use pylesson_syntax::ast::{Entry, Literal, Scalar};

use crate::display::{entry_repr, scalar_repr, seq_repr};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An immutable ordered sequence
    Tuple(Vec<Scalar>),
    /// A mutable ordered sequence
    List(Vec<Scalar>),
    /// Unique elements in insertion order
    Set(IndexSet<Scalar>),
    /// Keys in insertion order; `1` and `'1'` are different keys
    Dict(IndexMap<Scalar, Entry>),
}

impl Value {
    pub fn from_literal(literal: Literal) -> Self {
        match literal {
            Literal::Tuple(items) => Value::Tuple(items),
            Literal::List(items) => Value::List(items),
            Literal::Set(items) => Value::Set(items.into_iter().collect()),
            Literal::Dict(entries) => Value::Dict(entries.into_iter().collect()),
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            Value::Tuple(items) | Value::List(items) => items.len(),
            Value::Set(items) => items.len(),
            Value::Dict(entries) => entries.len(),
        }
    }

    /// Membership as Python's `in` sees it: elements for sequences and sets,
    /// keys for dictionaries.
    pub fn contains(&self, needle: &Scalar) -> bool {
        match self {
            Value::Tuple(items) | Value::List(items) => items.contains(needle),
            Value::Set(items) => items.contains(needle),
            Value::Dict(entries) => entries.contains_key(needle),
        }
    }
}

/// Python `repr` of the whole container.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Tuple(items) => write!(f, "{}", seq_repr("(", items.iter(), ")")),
            Value::List(items) => write!(f, "{}", seq_repr("[", items.iter(), "]")),
            Value::Set(items) if items.is_empty() => write!(f, "set()"),
            Value::Set(items) => write!(f, "{}", seq_repr("{", items.iter(), "}")),
            Value::Dict(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", scalar_repr(k), entry_repr(v))?;
                }
                write!(f, "}}")
            }
        }
    }
}
