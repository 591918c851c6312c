//! Literal parser: the right-hand side of an assignment into a [`Literal`].
//!
//! Elements are classified by lightweight heuristics rather than Python's
//! rules: quoted text is a string, anything that reads as a base-10 number
//! is a number, and everything else is kept verbatim as a [`Scalar::Word`].

use lazy_static::lazy_static;
use regex::Regex;

use pylesson_lexer::scan::{find_top_level, matching_close, split_top_level};
use pylesson_syntax::ast::{Entry, Literal, Scalar};
use pylesson_syntax::error::{error, Result};

use crate::grammar::Grammar;

/// Upper bound on elements in one literal.
pub const MAX_LITERAL_ELEMENTS: usize = 1000;

lazy_static! {
    static ref INT_RE: Regex = Regex::new(r"^[+-]?\d+$").unwrap();
    static ref FLOAT_RE: Regex = Regex::new(r"^[+-]?(\d+\.\d*|\.\d+|\d+)([eE][+-]?\d+)?$").unwrap();
    static ref EMPTY_SET_RE: Regex = Regex::new(r"^set\(\s*\)$").unwrap();
}

/// The decoded text of `text` if it is exactly one quoted string.
///
/// `\'`, `\"`, `\\`, `\n` and `\t` are decoded; any other escape is kept
/// as written, backslash included.
pub fn unquote(text: &str) -> Option<String> {
    let quote = text.chars().next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }
    let mut out = String::new();
    let mut chars = text[1..].chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next()? {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                e @ ('\\' | '\'' | '"') => out.push(e),
                other => {
                    out.push('\\');
                    out.push(other);
                }
            },
            c if c == quote => return chars.as_str().is_empty().then_some(out),
            c => out.push(c),
        }
    }
    None
}

/// Classifies one trimmed element. Empty text is not an element.
pub fn parse_scalar(text: &str) -> Option<Scalar> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Some(inner) = unquote(text) {
        return Some(Scalar::Str(inner));
    }
    if INT_RE.is_match(text) {
        // too big for i64: shown as written
        return Some(match text.parse::<i64>() {
            Ok(n) => Scalar::Int(n),
            Err(_) => Scalar::Word(text.to_string()),
        });
    }
    if FLOAT_RE.is_match(text) {
        if let Ok(x) = text.parse::<f64>() {
            return Some(Scalar::Float(x));
        }
    }
    Some(Scalar::Word(text.to_string()))
}

/// A dictionary value or an indexed-assignment right-hand side.
pub fn parse_entry(text: &str) -> Result<Option<Entry>> {
    let text = text.trim();
    if let Some(inner) = delimited(text, '[') {
        return Ok(Some(Entry::List(scalars(inner)?)));
    }
    if let Some(inner) = delimited(text, '(') {
        if !is_tuple_body(inner) {
            return parse_entry(inner);
        }
        return Ok(Some(Entry::Tuple(scalars(inner)?)));
    }
    Ok(parse_scalar(text).map(Entry::Scalar))
}

/// Parses a whole right-hand side. `Ok(None)` means "not a literal".
pub fn parse_literal(text: &str, grammar: &Grammar) -> Result<Option<Literal>> {
    let text = text.trim();
    if EMPTY_SET_RE.is_match(text) {
        return Ok(Some(Literal::Set(Vec::new())));
    }
    if let Some(inner) = delimited(text, '(') {
        // `("a")` is just a parenthesised string
        if !is_tuple_body(inner) {
            return Ok(None);
        }
        return Ok(Some(Literal::Tuple(scalars(inner)?)));
    }
    if let Some(inner) = delimited(text, '[') {
        return Ok(Some(Literal::List(scalars(inner)?)));
    }
    if let Some(inner) = delimited(text, '{') {
        // `{}` is an empty dict, as in Python
        if inner.trim().is_empty() || find_top_level(inner, ':').is_some() {
            return Ok(Some(Literal::Dict(entries(inner, grammar)?)));
        }
        let mut unique: Vec<Scalar> = Vec::new();
        for s in scalars(inner)? {
            if !unique.contains(&s) {
                unique.push(s);
            }
        }
        return Ok(Some(Literal::Set(unique)));
    }
    Ok(None)
}

/// Inner text when `text` is exactly one bracketed group opened by `open`.
fn delimited(text: &str, open: char) -> Option<&str> {
    if !text.starts_with(open) {
        return None;
    }
    let close = matching_close(text)?;
    if close + 1 != text.len() {
        return None;
    }
    Some(&text[1..close])
}

/// `()` or anything with a top-level comma.
fn is_tuple_body(inner: &str) -> bool {
    inner.trim().is_empty() || find_top_level(inner, ',').is_some()
}

fn check_len(n: usize) -> Result<()> {
    if n > MAX_LITERAL_ELEMENTS {
        return error(format!(
            "literal has {} elements, the limit is {}",
            n, MAX_LITERAL_ELEMENTS
        ));
    }
    Ok(())
}

fn scalars(inner: &str) -> Result<Vec<Scalar>> {
    let parts = split_top_level(inner, ',');
    check_len(parts.len())?;
    Ok(parts.into_iter().filter_map(parse_scalar).collect())
}

fn entries(inner: &str, grammar: &Grammar) -> Result<Vec<(Scalar, Entry)>> {
    let parts = split_top_level(inner, ',');
    check_len(parts.len())?;
    let mut out: Vec<(Scalar, Entry)> = Vec::new();
    for part in parts {
        let colon = match find_top_level(part, ':') {
            Some(c) => c,
            None => continue,
        };
        let raw_key = part[..colon].trim();
        let key = match parse_scalar(raw_key) {
            Some(k) => k,
            None => continue,
        };
        let known = match &key {
            Scalar::Str(k) => !k.is_empty() && grammar.knows_key(k),
            _ => grammar.knows_key(raw_key),
        };
        if !known {
            continue;
        }
        let value = match parse_entry(&part[colon + 1..])? {
            Some(v) => v,
            None => continue,
        };
        match out.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => out.push((key, value)),
        }
    }
    Ok(out)
}
