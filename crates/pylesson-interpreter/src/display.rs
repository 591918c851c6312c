//! Python-style text for scalars, dictionary entries and dictionary views.
//!
//! `repr` is what a value looks like inside a container (`'a'`), `str` is
//! what a top-level `print` shows (`a`).

use indexmap::IndexMap;

use pylesson_syntax::ast::{DictView, Entry, Scalar};

/// Quotes text the way Python's `repr` picks quotes.
pub fn quote(s: &str) -> String {
    if s.contains('\'') && !s.contains('"') {
        format!("\"{}\"", s)
    } else {
        format!("'{}'", s)
    }
}

/// Python float repr: `3.0`, `2.5`, `1e+20`, `1.5e-07`.
pub fn float_repr(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let magnitude = x.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{:e}", x);
        return match formatted.split_once('e') {
            Some((mantissa, exp)) => {
                let (sign, digits) = match exp.strip_prefix('-') {
                    Some(d) => ('-', d),
                    None => ('+', exp),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => formatted,
        };
    }
    if x.fract() == 0.0 {
        format!("{:.1}", x)
    } else {
        format!("{}", x)
    }
}

pub fn scalar_repr(s: &Scalar) -> String {
    match s {
        Scalar::Str(text) => quote(text),
        Scalar::Int(n) => n.to_string(),
        Scalar::Float(x) => float_repr(*x),
        Scalar::Word(w) => w.clone(),
    }
}

pub fn scalar_str(s: &Scalar) -> String {
    match s {
        Scalar::Str(text) => text.clone(),
        other => scalar_repr(other),
    }
}

pub(crate) fn seq_repr<'a>(
    open: &str,
    items: impl ExactSizeIterator<Item = &'a Scalar>,
    close: &str,
) -> String {
    let single = open == "(" && items.len() == 1;
    let inner: Vec<String> = items.map(scalar_repr).collect();
    if single {
        return format!("({},)", inner[0]);
    }
    format!("{}{}{}", open, inner.join(", "), close)
}

pub fn entry_repr(e: &Entry) -> String {
    match e {
        Entry::Scalar(s) => scalar_repr(s),
        Entry::List(items) => seq_repr("[", items.iter(), "]"),
        Entry::Tuple(items) => seq_repr("(", items.iter(), ")"),
    }
}

pub fn entry_str(e: &Entry) -> String {
    match e {
        Entry::Scalar(s) => scalar_str(s),
        other => entry_repr(other),
    }
}

/// `dict_keys([...])`, `dict_values([...])`, `dict_items([...])`.
pub fn view_repr(entries: &IndexMap<Scalar, Entry>, view: DictView) -> String {
    let (label, inner): (&str, Vec<String>) = match view {
        DictView::Keys => ("dict_keys", entries.keys().map(scalar_repr).collect()),
        DictView::Values => ("dict_values", entries.values().map(entry_repr).collect()),
        DictView::Items => (
            "dict_items",
            entries
                .iter()
                .map(|(k, v)| format!("({}, {})", scalar_repr(k), entry_repr(v)))
                .collect(),
        ),
    };
    format!("{}([{}])", label, inner.join(", "))
}

/// The line a missing dictionary key prints under the `KeyError` policy.
pub fn key_error(key: &Scalar) -> String {
    format!("KeyError: {}", scalar_repr(key))
}

pub fn bool_str(b: bool) -> &'static str {
    if b {
        "True"
    } else {
        "False"
    }
}
