//! Variable bindings for one run.

use std::collections::HashMap;

use pylesson_syntax::ast::Entry;

use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// A container created by an assignment
    Value(Value),
    /// A loop variable: a key, a dictionary value or an element
    Item(Entry),
}

#[derive(Debug, Clone, Default)]
pub struct Env<'a> {
    /// Variables defined in this scope
    vars: HashMap<String, Binding>,
    /// Enclosing scope; loop bodies see the variables of the run
    parent: Option<&'a Env<'a>>,
}

impl<'a> Env<'a> {
    pub fn new_root() -> Self {
        Self::default()
    }

    pub(crate) fn child(&'a self) -> Env<'a> {
        Env {
            vars: HashMap::new(),
            parent: Some(self),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        match self.vars.get(name) {
            Some(b) => Some(b),
            None => self.parent.and_then(|p| p.get(name)),
        }
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        match self.get(name)? {
            Binding::Value(v) => Some(v),
            Binding::Item(_) => None,
        }
    }

    /// Containers are only mutated in the scope that owns them.
    pub(crate) fn value_mut(&mut self, name: &str) -> Option<&mut Value> {
        match self.vars.get_mut(name)? {
            Binding::Value(v) => Some(v),
            Binding::Item(_) => None,
        }
    }

    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.vars.insert(name.into(), Binding::Value(value));
    }

    pub(crate) fn bind_item(&mut self, name: &str, item: Entry) {
        self.vars.insert(name.to_string(), Binding::Item(item));
    }

    pub fn remove(&mut self, name: &str) -> Option<Binding> {
        self.vars.remove(name)
    }
}
