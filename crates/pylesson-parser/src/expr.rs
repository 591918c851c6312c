//! `print(...)` arguments and f-string placeholders.

use lazy_static::lazy_static;
use regex::Regex;

use pylesson_lexer::scan::{matching_close, split_top_level};
use pylesson_syntax::ast::{DictView, Expr, FPart, Key, Scalar};

use crate::grammar::{Grammar, PrintShape};
use crate::literal::{parse_scalar, unquote};

lazy_static! {
    static ref IDENT_RE: Regex = Regex::new(r"^[A-Za-z_]\w*$").unwrap();
    static ref MEMBERSHIP_RE: Regex =
        Regex::new(r"^(.+?)\s+(not\s+in|in)\s+([A-Za-z_]\w*)$").unwrap();
    static ref LEN_RE: Regex = Regex::new(r"^len\((.+)\)$").unwrap();
    static ref GET_RE: Regex = Regex::new(r"^([A-Za-z_]\w*)\.get\((.+)\)$").unwrap();
    static ref VIEW_RE: Regex =
        Regex::new(r"^([A-Za-z_]\w*)\.(keys|values|items)\(\s*\)$").unwrap();
    static ref NESTED_RE: Regex =
        Regex::new(r"^([A-Za-z_]\w*)\[([^\[\]]+)\]\[\s*(-?\d+)\s*\]$").unwrap();
    static ref INDEX_RE: Regex = Regex::new(r"^([A-Za-z_]\w*)\[([^\[\]]+)\]$").unwrap();
}

/// Arguments of a `print(...)` line, or `None` when the line is not a print
/// this grammar understands.
pub fn parse_print(content: &str, grammar: &Grammar) -> Option<Vec<Expr>> {
    let rest = content.strip_prefix("print")?.trim_start();
    let close = matching_close(rest)?;
    if !rest.starts_with('(') || close + 1 != rest.len() {
        return None;
    }
    let args = split_top_level(&rest[1..close], ',');
    if args.len() > 1 && !grammar.allows_shape(PrintShape::Label) {
        return None;
    }
    let mut exprs = Vec::with_capacity(args.len());
    for arg in &args {
        let expr = parse_expr(arg, grammar)?;
        if args.len() == 1
            && matches!(expr, Expr::Literal(_))
            && !grammar.allows_shape(PrintShape::Literal)
        {
            return None;
        }
        exprs.push(expr);
    }
    Some(exprs)
}

/// A subscript: quoted text, an integer or a loop variable.
pub fn parse_key(text: &str) -> Option<Key> {
    let text = text.trim();
    if let Some(inner) = unquote(text) {
        return Some(Key::Str(inner));
    }
    if let Ok(n) = text.parse::<i64>() {
        return Some(Key::Int(n));
    }
    if IDENT_RE.is_match(text) {
        return Some(Key::Var(text.to_string()));
    }
    None
}

/// One print argument, tried from the most specific shape to the least.
pub fn parse_expr(text: &str, grammar: &Grammar) -> Option<Expr> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let allow = |shape| grammar.allows_shape(shape);

    if let Some(body) = fstring_body(text) {
        return if allow(PrintShape::FString) { parse_fstring(&body, grammar) } else { None };
    }
    if let Some(s) = literal(text) {
        return Some(Expr::Literal(s));
    }
    if let Some(caps) = MEMBERSHIP_RE.captures(text) {
        let needle = literal(&caps[1])?;
        if !allow(PrintShape::Membership) {
            return None;
        }
        return Some(Expr::Contains {
            needle,
            name: caps[3].to_string(),
            negated: caps[2].starts_with("not"),
        });
    }
    if let Some(caps) = LEN_RE.captures(text) {
        let inner = parse_expr(&caps[1], grammar)?;
        if !allow(PrintShape::Len) || !matches!(inner, Expr::Var(_) | Expr::Index { .. }) {
            return None;
        }
        return Some(Expr::Len(Box::new(inner)));
    }
    if let Some(caps) = VIEW_RE.captures(text) {
        if !allow(PrintShape::Method) {
            return None;
        }
        let view = match &caps[2] {
            "keys" => DictView::Keys,
            "values" => DictView::Values,
            _ => DictView::Items,
        };
        return Some(Expr::View { name: caps[1].to_string(), view });
    }
    if let Some(caps) = GET_RE.captures(text) {
        if !allow(PrintShape::Method) {
            return None;
        }
        let args = split_top_level(&caps[2], ',');
        let key = parse_key(args.first()?)?;
        let default = match args.len() {
            1 => None,
            2 => Some(literal(args[1])?),
            _ => return None,
        };
        return Some(Expr::Get { name: caps[1].to_string(), key, default });
    }
    if let Some(caps) = NESTED_RE.captures(text) {
        let key = parse_key(&caps[2])?;
        let index = caps[3].parse::<i64>().ok()?;
        if !allow(PrintShape::Nested) || matches!(key, Key::Int(_)) {
            return None;
        }
        return Some(Expr::Nested { name: caps[1].to_string(), key, index });
    }
    if let Some(caps) = INDEX_RE.captures(text) {
        let key = parse_key(&caps[2])?;
        let shape = match key {
            Key::Int(_) => PrintShape::Index,
            Key::Str(_) | Key::Var(_) => PrintShape::Key,
        };
        if !allow(shape) {
            return None;
        }
        return Some(Expr::Index { name: caps[1].to_string(), key });
    }
    if IDENT_RE.is_match(text) && allow(PrintShape::Whole) {
        return Some(Expr::Var(text.to_string()));
    }
    None
}

/// A quoted string or a number; bare words are not literals here.
fn literal(text: &str) -> Option<Scalar> {
    match parse_scalar(text)? {
        Scalar::Word(_) => None,
        s => Some(s),
    }
}

fn fstring_body(text: &str) -> Option<String> {
    let rest = text.strip_prefix('f').or_else(|| text.strip_prefix('F'))?;
    unquote(rest)
}

fn parse_fstring(body: &str, grammar: &Grammar) -> Option<Expr> {
    let mut parts = Vec::new();
    let mut text = String::new();
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                text.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                text.push('}');
            }
            '{' => {
                let mut placeholder = String::new();
                loop {
                    match chars.next()? {
                        '}' => break,
                        ch => placeholder.push(ch),
                    }
                }
                let expr = parse_expr(&placeholder, grammar)?;
                if matches!(expr, Expr::FString(_)) {
                    return None;
                }
                if !text.is_empty() {
                    parts.push(FPart::Text(std::mem::take(&mut text)));
                }
                parts.push(FPart::Expr(expr));
            }
            other => text.push(other),
        }
    }
    if !text.is_empty() {
        parts.push(FPart::Text(text));
    }
    Some(Expr::FString(parts))
}
