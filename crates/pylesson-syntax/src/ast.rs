//! Statement shapes recognised by the sandbox.
//!
//! The matcher turns each recognised line (or block of lines) into one
//! [`Stmt`]; the interpreter executes them in order. Everything a learner can
//! write that the sandbox understands is representable here, and nothing
//! else is.

use std::hash::{Hash, Hasher};

/// A single element inside a literal.
#[derive(Debug, Clone)]
pub enum Scalar {
    /// Quoted text, quotes stripped
    Str(String),
    Int(i64),
    Float(f64),
    /// Anything else, kept verbatim (`True`, `None`, a bare name...)
    Word(String),
}

// Floats compare by bit pattern so that scalars can live in an ordered set.
impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Str(a), Scalar::Str(b)) => a == b,
            (Scalar::Int(a), Scalar::Int(b)) => a == b,
            (Scalar::Float(a), Scalar::Float(b)) => a.to_bits() == b.to_bits(),
            (Scalar::Word(a), Scalar::Word(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Scalar {}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Scalar::Str(s) | Scalar::Word(s) => s.hash(state),
            Scalar::Int(n) => n.hash(state),
            Scalar::Float(x) => x.to_bits().hash(state),
        }
    }
}

/// A dictionary value: a scalar or one level of nested sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Scalar(Scalar),
    List(Vec<Scalar>),
    Tuple(Vec<Scalar>),
}

/// A collection literal after element classification.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Tuple(Vec<Scalar>),
    List(Vec<Scalar>),
    /// Already deduplicated, first occurrence first
    Set(Vec<Scalar>),
    /// Keys in source order; a repeated key keeps its first position
    Dict(Vec<(Scalar, Entry)>),
}

/// The subscript in `x[...]`.
#[derive(Debug, Clone, PartialEq)]
pub enum Key {
    /// `x["name"]`
    Str(String),
    /// `x[0]`, `x[-1]`
    Int(i64),
    /// `x[k]` where `k` is a loop variable
    Var(String),
}

/// `.keys()`, `.values()`, `.items()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictView {
    Keys,
    Values,
    Items,
}

/// One argument of a `print(...)` call, or one f-string placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `"text"`, `42`
    Literal(Scalar),
    /// `x`
    Var(String),
    /// `x[0]`, `x["k"]`, `x[k]`
    Index { name: String, key: Key },
    /// `x["k"][0]`
    Nested { name: String, key: Key, index: i64 },
    /// `len(x)`, `len(x["k"])`
    Len(Box<Expr>),
    /// `"item" in x`, `"item" not in x`
    Contains { needle: Scalar, name: String, negated: bool },
    /// `x.get("k")`, `x.get("k", default)`
    Get { name: String, key: Key, default: Option<Scalar> },
    /// `x.keys()`, `x.values()`, `x.items()`
    View { name: String, view: DictView },
    /// `f"...{expr}..."`
    FString(Vec<FPart>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FPart {
    Text(String),
    Expr(Expr),
}

/// Statements, one per recognised line or block.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `name = <literal>`, single- or multi-line
    Assign { name: String, value: Literal },
    /// `name.append(x)`
    Append { name: String, item: Scalar },
    /// `name.add(x)`
    Add { name: String, item: Scalar },
    /// `name.remove(x)`
    Remove { name: String, item: Scalar },
    /// `del name[key]`
    DeleteKey { name: String, key: Key },
    /// `del name`
    DeleteVar { name: String },
    /// `name[key] = value`
    SetItem { name: String, key: Key, value: Entry },
    /// `for ... in ...:` with the recognised `print` lines of its body
    For {
        targets: Vec<String>,
        iter: String,
        view: Option<DictView>,
        body: Vec<Stmt>,
    },
    /// `print(...)`
    Print(Vec<Expr>),
}

/// A statement together with the source line it starts on.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub line: usize,
    pub stmt: Stmt,
}

/// All recognised statements of one run, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub items: Vec<Item>,
}
