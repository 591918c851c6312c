//! The ordered statement rule table.
//!
//! Each entry pairs a [`Rule`] with a recognizer. The parser tries entries
//! top to bottom and the first recognizer that claims the line wins.

use lazy_static::lazy_static;
use regex::Regex;

use pylesson_lexer::scan::depth_change;
use pylesson_syntax::ast::{DictView, Key, Stmt};
use pylesson_syntax::error::{error_at, Result};

use crate::expr::{parse_key, parse_print};
use crate::grammar::Rule;
use crate::literal::{parse_entry, parse_literal, parse_scalar};
use crate::parser::Parser;

/// Upper bound on continuation lines of one multi-line literal.
pub const MAX_LITERAL_LINES: usize = 200;

/// Body lines of a `for` loop that are inspected for `print` calls.
pub const MAX_LOOP_BODY_LINES: usize = 20;

/// What a recognizer claimed: the statement (if the lines produce one) and
/// how many lines it used up.
#[derive(Debug)]
pub struct Match {
    pub stmt: Option<Stmt>,
    pub consumed: usize,
}

impl Match {
    fn line(stmt: Stmt) -> Self {
        Self { stmt: Some(stmt), consumed: 1 }
    }
}

pub type Recognizer = fn(&Parser<'_>, usize) -> Result<Option<Match>>;

pub const RULES: &[(Rule, Recognizer)] = &[
    (Rule::MultiLineLiteral, multi_line_literal),
    (Rule::Assign, assign),
    (Rule::Append, append),
    (Rule::Add, add),
    (Rule::Remove, remove),
    (Rule::Delete, delete),
    (Rule::SetItem, set_item),
    (Rule::ForLoop, for_loop),
    (Rule::Print, print),
];

lazy_static! {
    static ref ASSIGN_RE: Regex = Regex::new(r"^([A-Za-z_]\w*)\s*=\s*(.+)$").unwrap();
    static ref METHOD_RE: Regex =
        Regex::new(r"^([A-Za-z_]\w*)\.(append|add|remove)\((.*)\)$").unwrap();
    static ref DEL_KEY_RE: Regex = Regex::new(r"^del\s+([A-Za-z_]\w*)\s*\[([^\]]+)\]$").unwrap();
    static ref DEL_VAR_RE: Regex = Regex::new(r"^del\s+([A-Za-z_]\w*)$").unwrap();
    static ref SET_ITEM_RE: Regex =
        Regex::new(r"^([A-Za-z_]\w*)\s*\[([^\]]+)\]\s*=\s*([^=].*)$").unwrap();
    static ref FOR_RE: Regex = Regex::new(
        r"^for\s+([A-Za-z_]\w*)(?:\s*,\s*([A-Za-z_]\w*))?\s+in\s+([A-Za-z_]\w*)(?:\.(keys|values|items)\(\s*\))?\s*:\s*(.*)$"
    )
    .unwrap();
}

/// `name = {` (or `[`, `(`) whose brackets close on a later line.
fn multi_line_literal(p: &Parser<'_>, pos: usize) -> Result<Option<Match>> {
    let caps = match ASSIGN_RE.captures(p.content(pos)) {
        Some(c) => c,
        None => return Ok(None),
    };
    let rhs = caps[2].trim();
    if !rhs.starts_with(&['(', '[', '{'][..]) {
        return Ok(None);
    }
    let mut depth = depth_change(rhs);
    if depth <= 0 {
        return Ok(None);
    }
    let name = caps[1].to_string();
    let header = p.line(pos);
    let mut text = rhs.to_string();
    let mut next = pos + 1;
    while depth > 0 {
        if next >= p.len() {
            return error_at(header.number, header.indent + 1, format!("'{}' is never closed", name));
        }
        if next - pos > MAX_LITERAL_LINES {
            return error_at(
                header.number,
                header.indent + 1,
                format!("'{}' spans more than {} lines", name, MAX_LITERAL_LINES),
            );
        }
        let line = p.content(next);
        depth += depth_change(line);
        text.push(' ');
        text.push_str(line);
        next += 1;
    }
    let stmt = parse_literal(&text, p.grammar())?.map(|value| Stmt::Assign { name, value });
    Ok(Some(Match { stmt, consumed: next - pos }))
}

/// `name = (...)`, `[...]`, `{...}`, `set()`.
fn assign(p: &Parser<'_>, pos: usize) -> Result<Option<Match>> {
    let caps = match ASSIGN_RE.captures(p.content(pos)) {
        Some(c) => c,
        None => return Ok(None),
    };
    let value = match parse_literal(&caps[2], p.grammar())? {
        Some(v) => v,
        None => return Ok(None),
    };
    Ok(Some(Match::line(Stmt::Assign { name: caps[1].to_string(), value })))
}

fn mutation(p: &Parser<'_>, pos: usize, method: &str) -> Option<Match> {
    let caps = METHOD_RE.captures(p.content(pos))?;
    if &caps[2] != method {
        return None;
    }
    let name = caps[1].to_string();
    let item = parse_scalar(&caps[3])?;
    let stmt = match method {
        "append" => Stmt::Append { name, item },
        "add" => Stmt::Add { name, item },
        _ => Stmt::Remove { name, item },
    };
    Some(Match::line(stmt))
}

fn append(p: &Parser<'_>, pos: usize) -> Result<Option<Match>> {
    Ok(mutation(p, pos, "append"))
}

fn add(p: &Parser<'_>, pos: usize) -> Result<Option<Match>> {
    Ok(mutation(p, pos, "add"))
}

fn remove(p: &Parser<'_>, pos: usize) -> Result<Option<Match>> {
    Ok(mutation(p, pos, "remove"))
}

/// `del name[key]` and `del name`.
fn delete(p: &Parser<'_>, pos: usize) -> Result<Option<Match>> {
    let content = p.content(pos);
    if let Some(caps) = DEL_KEY_RE.captures(content) {
        return Ok(match parse_key(&caps[2]) {
            Some(key @ (Key::Str(_) | Key::Int(_))) => {
                Some(Match::line(Stmt::DeleteKey { name: caps[1].to_string(), key }))
            }
            _ => None,
        });
    }
    Ok(DEL_VAR_RE
        .captures(content)
        .map(|caps| Match::line(Stmt::DeleteVar { name: caps[1].to_string() })))
}

/// `name[key] = value`.
fn set_item(p: &Parser<'_>, pos: usize) -> Result<Option<Match>> {
    let caps = match SET_ITEM_RE.captures(p.content(pos)) {
        Some(c) => c,
        None => return Ok(None),
    };
    let key = match parse_key(&caps[2]) {
        Some(k @ (Key::Str(_) | Key::Int(_))) => k,
        _ => return Ok(None),
    };
    if let Key::Str(k) = &key {
        if !p.grammar().knows_key(k) {
            return Ok(None);
        }
    }
    let value = match parse_entry(&caps[3])? {
        Some(v) => v,
        None => return Ok(None),
    };
    Ok(Some(Match::line(Stmt::SetItem { name: caps[1].to_string(), key, value })))
}

/// `for` header plus its indented body.
fn for_loop(p: &Parser<'_>, pos: usize) -> Result<Option<Match>> {
    let caps = match FOR_RE.captures(p.content(pos)) {
        Some(c) => c,
        None => return Ok(None),
    };
    let view = caps.get(4).map(|m| match m.as_str() {
        "keys" => DictView::Keys,
        "values" => DictView::Values,
        _ => DictView::Items,
    });
    let mut targets = vec![caps[1].to_string()];
    if let Some(second) = caps.get(2) {
        targets.push(second.as_str().to_string());
    }
    if (targets.len() == 2) != (view == Some(DictView::Items)) {
        return Ok(None);
    }

    let end = p.block_end(pos);
    let mut body_lines: Vec<&str> = Vec::new();
    let inline = caps[5].trim();
    if !inline.is_empty() {
        body_lines.push(inline);
    }
    body_lines.extend((pos + 1..end).map(|i| p.content(i)));
    body_lines.truncate(MAX_LOOP_BODY_LINES);

    let body_grammar = p.grammar().loop_body();
    let body = body_lines
        .into_iter()
        .filter_map(|line| parse_print(line, &body_grammar))
        .map(Stmt::Print)
        .collect();
    let stmt = Stmt::For {
        targets,
        iter: caps[3].to_string(),
        view,
        body,
    };
    Ok(Some(Match { stmt: Some(stmt), consumed: end - pos }))
}

fn print(p: &Parser<'_>, pos: usize) -> Result<Option<Match>> {
    Ok(parse_print(p.content(pos), p.grammar()).map(|args| Match::line(Stmt::Print(args))))
}
