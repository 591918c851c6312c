//! Statement matcher: runs the rule table over logical lines.

use log::{debug, trace};

use pylesson_lexer::scan::strip_comment;
use pylesson_syntax::ast::{Item, Program};
use pylesson_syntax::error::Result;
use pylesson_syntax::token::Line;

use crate::grammar::Grammar;
use crate::rules::RULES;

pub struct Parser<'g> {
    lines: Vec<Line>,
    /// Line contents with trailing comments removed, parallel to `lines`
    code: Vec<String>,
    grammar: &'g Grammar,
}

impl<'g> Parser<'g> {
    pub fn new(lines: Vec<Line>, grammar: &'g Grammar) -> Self {
        let code = lines
            .iter()
            .map(|l| strip_comment(&l.content).to_string())
            .collect();
        Self { lines, code, grammar }
    }

    pub fn grammar(&self) -> &Grammar {
        self.grammar
    }

    pub(crate) fn len(&self) -> usize {
        self.lines.len()
    }

    pub(crate) fn line(&self, pos: usize) -> &Line {
        &self.lines[pos]
    }

    /// Code of line `pos`, without its trailing comment.
    pub(crate) fn content(&self, pos: usize) -> &str {
        &self.code[pos]
    }

    /// One past the last line indented deeper than the header at `pos`.
    pub(crate) fn block_end(&self, pos: usize) -> usize {
        let indent = self.lines[pos].indent;
        let mut end = pos + 1;
        while end < self.len() && self.lines[end].is_indented_under(indent) {
            end += 1;
        }
        end
    }

    /// Matches every line; unrecognised lines are skipped, faults abort.
    pub fn parse_program(&mut self) -> Result<Program> {
        let mut items = Vec::new();
        let mut pos = 0;
        while pos < self.len() {
            let number = self.lines[pos].number;
            let mut claimed = None;
            for (rule, recognize) in RULES {
                if !self.grammar.allows(*rule) {
                    continue;
                }
                if let Some(m) = recognize(self, pos).map_err(|e| e.at_line(number))? {
                    debug!("line {}: {:?} ({} line(s))", number, rule, m.consumed);
                    claimed = Some(m);
                    break;
                }
            }
            match claimed {
                Some(m) => {
                    if let Some(stmt) = m.stmt {
                        items.push(Item { line: number, stmt });
                    }
                    pos += m.consumed.max(1);
                }
                None if self.content(pos).ends_with(':') => {
                    // an unknown block header takes its body with it
                    let end = self.block_end(pos);
                    trace!("line {}: unrecognised block, skipping {} line(s)", number, end - pos);
                    pos = end;
                }
                None => {
                    trace!("line {}: no rule matched, skipping {:?}", number, self.content(pos));
                    pos += 1;
                }
            }
        }
        Ok(Program { items })
    }
}
