//! Statement executor and print evaluation.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use pylesson_syntax::ast::*;
use pylesson_syntax::error::{error, Result};

use crate::display::{bool_str, entry_str, key_error, scalar_str, view_repr};
use crate::env::{Binding, Env};
use crate::value::Value;

/// Upper bound on the printed text of one run, newlines included.
pub const MAX_OUTPUT_BYTES: usize = 64 * 1024;

/// What a `print` does when a dictionary lookup misses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyMissPolicy {
    /// Print `KeyError: 'k'` instead of the line
    #[default]
    KeyError,
    /// Print nothing for the line
    Silent,
}

/// Why a print argument has no text.
#[derive(Debug)]
enum Miss {
    /// Undefined name, wrong kind of container, index out of range
    Skip,
    /// Lookup of an absent dictionary key
    Key(Scalar),
}

type Eval<T> = std::result::Result<T, Miss>;

pub struct Interpreter {
    /// Printed lines, in order
    output: Vec<String>,
    output_bytes: usize,
    key_miss: KeyMissPolicy,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(KeyMissPolicy::default())
    }
}

impl Interpreter {
    pub fn new(key_miss: KeyMissPolicy) -> Self {
        Self { output: Vec::new(), output_bytes: 0, key_miss }
    }

    pub fn take_output(&mut self) -> Vec<String> {
        self.output_bytes = 0;
        std::mem::take(&mut self.output)
    }

    /// Runs `program` against a fresh environment.
    pub fn run(&mut self, program: &Program) -> Result<()> {
        let mut env = Env::new_root();
        self.run_with_env(program, &mut env)
    }

    pub fn run_with_env(&mut self, program: &Program, env: &mut Env<'_>) -> Result<()> {
        for item in &program.items {
            self.exec_stmt(env, &item.stmt).map_err(|e| e.at_line(item.line))?;
        }
        Ok(())
    }

    fn exec_stmt(&mut self, env: &mut Env<'_>, stmt: &Stmt) -> Result<()> {
        let applied = match stmt {
            Stmt::Assign { name, value } => {
                env.define(name.clone(), Value::from_literal(value.clone()));
                true
            }
            Stmt::Append { name, item } => match env.value_mut(name) {
                Some(Value::List(items)) => {
                    items.push(item.clone());
                    true
                }
                _ => false,
            },
            Stmt::Add { name, item } => match env.value_mut(name) {
                Some(Value::Set(items)) => {
                    items.insert(item.clone());
                    true
                }
                _ => false,
            },
            Stmt::Remove { name, item } => match env.value_mut(name) {
                Some(Value::Set(items)) => items.shift_remove(item),
                _ => false,
            },
            Stmt::DeleteKey { name, key } => match (env.value_mut(name), literal_key(key)) {
                (Some(Value::Dict(entries)), Some(k)) => entries.shift_remove(&k).is_some(),
                _ => false,
            },
            Stmt::DeleteVar { name } => env.remove(name).is_some(),
            Stmt::SetItem { name, key, value } => match (env.value_mut(name), key, value) {
                (Some(Value::Dict(entries)), _, _) => match literal_key(key) {
                    Some(k) => {
                        // an existing key keeps its position
                        entries.insert(k, value.clone());
                        true
                    }
                    None => false,
                },
                (Some(Value::List(items)), Key::Int(i), Entry::Scalar(s)) => {
                    match resolve_index(items.len(), *i) {
                        Some(ix) => {
                            items[ix] = s.clone();
                            true
                        }
                        None => false,
                    }
                }
                _ => false,
            },
            Stmt::For { targets, iter, view, body } => {
                self.exec_for(env, targets, iter, *view, body)?;
                true
            }
            Stmt::Print(args) => {
                self.exec_print(env, args)?;
                true
            }
        };
        if !applied {
            trace!("no effect: {:?}", stmt);
        }
        Ok(())
    }

    fn exec_for(
        &mut self,
        env: &Env<'_>,
        targets: &[String],
        iter: &str,
        view: Option<DictView>,
        body: &[Stmt],
    ) -> Result<()> {
        let key = |k: &Scalar| Entry::Scalar(k.clone());
        let rounds: Vec<Vec<Entry>> = match (env.value(iter), view) {
            (Some(Value::Dict(entries)), None | Some(DictView::Keys)) => {
                entries.keys().map(|k| vec![key(k)]).collect()
            }
            (Some(Value::Dict(entries)), Some(DictView::Values)) => {
                entries.values().map(|v| vec![v.clone()]).collect()
            }
            (Some(Value::Dict(entries)), Some(DictView::Items)) => {
                entries.iter().map(|(k, v)| vec![key(k), v.clone()]).collect()
            }
            (Some(Value::Tuple(items) | Value::List(items)), None) => {
                items.iter().map(|s| vec![Entry::Scalar(s.clone())]).collect()
            }
            (Some(Value::Set(items)), None) => {
                items.iter().map(|s| vec![Entry::Scalar(s.clone())]).collect()
            }
            _ => {
                trace!("for over '{}': nothing to iterate", iter);
                return Ok(());
            }
        };
        debug!("for over '{}': {} iteration(s)", iter, rounds.len());
        for round in rounds {
            let mut scope = env.child();
            for (target, item) in targets.iter().zip(round) {
                scope.bind_item(target, item);
            }
            for stmt in body {
                if let Stmt::Print(args) = stmt {
                    self.exec_print(&scope, args)?;
                }
            }
        }
        Ok(())
    }

    fn exec_print(&mut self, env: &Env<'_>, args: &[Expr]) -> Result<()> {
        let mut parts = Vec::with_capacity(args.len());
        for arg in args {
            match eval(env, arg) {
                Ok(text) => parts.push(text),
                Err(Miss::Skip) => {
                    trace!("print skipped at {:?}", arg);
                    return Ok(());
                }
                Err(Miss::Key(key)) => {
                    return match self.key_miss {
                        KeyMissPolicy::KeyError => self.emit(key_error(&key)),
                        KeyMissPolicy::Silent => Ok(()),
                    };
                }
            }
        }
        self.emit(parts.join(" "))
    }

    fn emit(&mut self, line: String) -> Result<()> {
        self.output_bytes += line.len() + 1;
        if self.output_bytes > MAX_OUTPUT_BYTES {
            return error(format!("output is larger than {} bytes", MAX_OUTPUT_BYTES));
        }
        self.output.push(line);
        Ok(())
    }
}

/// A subscript written as a literal: `d["k"]`, `d[1]`.
fn literal_key(key: &Key) -> Option<Scalar> {
    match key {
        Key::Str(s) => Some(Scalar::Str(s.clone())),
        Key::Int(n) => Some(Scalar::Int(*n)),
        Key::Var(_) => None,
    }
}

/// Position of `index` in a sequence of `len`, counting negatives from the end.
fn resolve_index(len: usize, index: i64) -> Option<usize> {
    let len = len as i64;
    let ix = if index < 0 { len + index } else { index };
    if (0..len).contains(&ix) {
        Some(ix as usize)
    } else {
        None
    }
}

fn nth(items: &[Scalar], index: i64) -> Eval<Scalar> {
    resolve_index(items.len(), index)
        .map(|ix| items[ix].clone())
        .ok_or(Miss::Skip)
}

fn element(entry: &Entry, index: i64) -> Eval<Scalar> {
    match entry {
        Entry::List(items) | Entry::Tuple(items) => nth(items, index),
        Entry::Scalar(Scalar::Str(text)) => {
            let chars: Vec<char> = text.chars().collect();
            resolve_index(chars.len(), index)
                .map(|ix| Scalar::Str(chars[ix].to_string()))
                .ok_or(Miss::Skip)
        }
        Entry::Scalar(_) => Err(Miss::Skip),
    }
}

fn entry_len(entry: &Entry) -> Eval<usize> {
    match entry {
        Entry::List(items) | Entry::Tuple(items) => Ok(items.len()),
        Entry::Scalar(Scalar::Str(text)) => Ok(text.chars().count()),
        Entry::Scalar(_) => Err(Miss::Skip),
    }
}

fn resolve_key(env: &Env<'_>, key: &Key) -> Eval<Scalar> {
    match key {
        Key::Str(s) => Ok(Scalar::Str(s.clone())),
        Key::Int(n) => Ok(Scalar::Int(*n)),
        Key::Var(name) => match env.get(name) {
            Some(Binding::Item(Entry::Scalar(s))) => Ok(s.clone()),
            _ => Err(Miss::Skip),
        },
    }
}

/// `name[key]`.
fn lookup(env: &Env<'_>, name: &str, key: &Key) -> Eval<Entry> {
    let key = resolve_key(env, key)?;
    match env.get(name).ok_or(Miss::Skip)? {
        Binding::Value(Value::Dict(entries)) => entries.get(&key).cloned().ok_or(Miss::Key(key)),
        Binding::Value(Value::Tuple(items) | Value::List(items))
        | Binding::Item(Entry::List(items) | Entry::Tuple(items)) => match key {
            Scalar::Int(i) => nth(items, i).map(Entry::Scalar),
            _ => Err(Miss::Skip),
        },
        _ => Err(Miss::Skip),
    }
}

/// Text of one print argument, `str` semantics.
fn eval(env: &Env<'_>, expr: &Expr) -> Eval<String> {
    match expr {
        Expr::Literal(s) => Ok(scalar_str(s)),
        Expr::Var(name) => match env.get(name).ok_or(Miss::Skip)? {
            Binding::Value(v) => Ok(v.to_string()),
            Binding::Item(e) => Ok(entry_str(e)),
        },
        Expr::Index { name, key } => lookup(env, name, key).map(|e| entry_str(&e)),
        Expr::Nested { name, key, index } => {
            let entry = lookup(env, name, key)?;
            element(&entry, *index).map(|s| scalar_str(&s))
        }
        Expr::Len(inner) => {
            let n = match &**inner {
                Expr::Var(name) => match env.get(name).ok_or(Miss::Skip)? {
                    Binding::Value(v) => v.len(),
                    Binding::Item(e) => entry_len(e)?,
                },
                Expr::Index { name, key } => entry_len(&lookup(env, name, key)?)?,
                _ => return Err(Miss::Skip),
            };
            Ok(n.to_string())
        }
        Expr::Contains { needle, name, negated } => {
            let found = match env.get(name).ok_or(Miss::Skip)? {
                Binding::Value(v) => v.contains(needle),
                Binding::Item(Entry::List(items) | Entry::Tuple(items)) => items.contains(needle),
                Binding::Item(Entry::Scalar(Scalar::Str(text))) => match needle {
                    Scalar::Str(n) => text.contains(n.as_str()),
                    _ => return Err(Miss::Skip),
                },
                Binding::Item(Entry::Scalar(_)) => return Err(Miss::Skip),
            };
            Ok(bool_str(found != *negated).to_string())
        }
        Expr::Get { name, key, default } => {
            let entries = match env.value(name) {
                Some(Value::Dict(entries)) => entries,
                _ => return Err(Miss::Skip),
            };
            let found = entries.get(&resolve_key(env, key)?);
            Ok(match (found, default) {
                (Some(e), _) => entry_str(e),
                (None, Some(d)) => scalar_str(d),
                (None, None) => "None".to_string(),
            })
        }
        Expr::View { name, view } => match env.value(name) {
            Some(Value::Dict(entries)) => Ok(view_repr(entries, *view)),
            _ => Err(Miss::Skip),
        },
        Expr::FString(parts) => {
            let mut out = String::new();
            for part in parts {
                match part {
                    FPart::Text(t) => out.push_str(t),
                    FPart::Expr(e) => out.push_str(&eval(env, e)?),
                }
            }
            Ok(out)
        }
    }
}
