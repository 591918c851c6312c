//! Which statement rules and print shapes a lesson understands.
//!
//! Every lesson runs the same matcher; a [`Grammar`] switches parts of it
//! off so that, say, the tuples lesson does not yet know about `for` loops.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Entries of the statement rule table, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    MultiLineLiteral,
    Assign,
    Append,
    Add,
    Remove,
    Delete,
    SetItem,
    ForLoop,
    Print,
}

impl Rule {
    pub const ALL: [Rule; 9] = [
        Rule::MultiLineLiteral,
        Rule::Assign,
        Rule::Append,
        Rule::Add,
        Rule::Remove,
        Rule::Delete,
        Rule::SetItem,
        Rule::ForLoop,
        Rule::Print,
    ];
}

/// Argument shapes accepted inside `print(...)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrintShape {
    /// `x["k"][0]`
    Nested,
    /// `x[0]`
    Index,
    /// `x["k"]`
    Key,
    /// `x`
    Whole,
    /// `len(x)`
    Len,
    /// `"a" in x`
    Membership,
    /// several arguments, `print("label:", x)`
    Label,
    /// `print("text")`
    Literal,
    /// `x.get(...)`, `x.keys()`, `x.values()`, `x.items()`
    Method,
    /// `f"...{x}..."`
    FString,
}

impl PrintShape {
    pub const ALL: [PrintShape; 10] = [
        PrintShape::Nested,
        PrintShape::Index,
        PrintShape::Key,
        PrintShape::Whole,
        PrintShape::Len,
        PrintShape::Membership,
        PrintShape::Label,
        PrintShape::Literal,
        PrintShape::Method,
        PrintShape::FString,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Grammar {
    pub rules: BTreeSet<Rule>,
    pub print_shapes: BTreeSet<PrintShape>,
    /// Dictionary keys recognised inside literals; `None` accepts any key
    pub dict_keys: Option<BTreeSet<String>>,
}

impl Default for Grammar {
    fn default() -> Self {
        Self::full()
    }
}

impl Grammar {
    /// Every rule and print shape, any dictionary key.
    pub fn full() -> Self {
        Self {
            rules: Rule::ALL.into_iter().collect(),
            print_shapes: PrintShape::ALL.into_iter().collect(),
            dict_keys: None,
        }
    }

    pub fn with(rules: &[Rule], print_shapes: &[PrintShape]) -> Self {
        Self {
            rules: rules.iter().copied().collect(),
            print_shapes: print_shapes.iter().copied().collect(),
            dict_keys: None,
        }
    }

    pub fn with_dict_keys(mut self, keys: &[&str]) -> Self {
        self.dict_keys = Some(keys.iter().map(|k| k.to_string()).collect());
        self
    }

    pub fn allows(&self, rule: Rule) -> bool {
        self.rules.contains(&rule)
    }

    pub fn allows_shape(&self, shape: PrintShape) -> bool {
        self.print_shapes.contains(&shape)
    }

    pub fn knows_key(&self, key: &str) -> bool {
        self.dict_keys.as_ref().map_or(true, |keys| keys.contains(key))
    }

    /// Grammar used for the `print` lines of a loop body: a lesson that
    /// teaches loops accepts every print shape inside them.
    pub fn loop_body(&self) -> Self {
        Self {
            rules: [Rule::Print].into_iter().collect(),
            print_shapes: PrintShape::ALL.into_iter().collect(),
            dict_keys: self.dict_keys.clone(),
        }
    }
}
