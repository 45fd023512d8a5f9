// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural pattern parser and cost model.
//!
//! The grammar is deliberately small: a pattern is one or more groups
//! separated by `,`; a group is a chain of compound selectors joined by
//! combinators (whitespace, `>`, `+`, `~`); a compound is an optional `*` or
//! tag followed by any number of `#id`, `.class`, `[attr...]`, and
//! `:pseudo(...)` / `::pseudo-element` atoms.
//!
//! Only the rightmost compound of each group survives as a [`Descriptor`];
//! every atom visited along the way still contributes to the pattern's
//! cost. Attribute matchers and pseudo arguments are consumed for
//! well-formedness but not interpreted — the resolver only needs the names.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use smallvec::SmallVec;

/// Cost of an `#id` atom. Most selective, cheapest to index.
pub const COST_IDENTITY: u32 = 1;
/// Cost of a tag atom.
pub const COST_TAG: u32 = 2;
/// Cost of a `.class` atom.
pub const COST_CLASS: u32 = 3;
/// Cost of an `[attr]` atom.
pub const COST_ATTRIBUTE: u32 = 5;
/// Cost of a `:pseudo` or `::pseudo-element` atom.
pub const COST_PSEUDO: u32 = 8;
/// Per-step combinator cost, multiplied by the current nesting depth.
pub const COST_NESTING: u32 = 4;
/// Fan-out weight, multiplied by `ilog2(group count)` for multi-group patterns.
pub const COST_FANOUT: u32 = 6;

/// The flat, directly-testable requirements of one group's deepest rule.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Descriptor {
    /// Required tag name, lower-cased.
    pub tag: Option<String>,
    /// Required id.
    pub identity: Option<String>,
    /// Required class names.
    pub classes: SmallVec<[String; 4]>,
    /// Required attribute names (matchers and values are not interpreted).
    pub attributes: SmallVec<[String; 2]>,
    /// Pseudo-class and pseudo-element names (arguments are not interpreted).
    pub pseudos: SmallVec<[String; 2]>,
}

/// A successful parse: one descriptor per group, plus the computed cost.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedPattern {
    /// Deepest-rule descriptors, one per comma-separated group, in order.
    pub descriptors: Vec<Descriptor>,
    /// Heuristic complexity cost of the whole pattern.
    pub cost: u32,
}

/// A positioned syntax error in a structural pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    /// Byte offset of the offending input.
    pub position: usize,
    /// What the parser expected or found.
    pub message: &'static str,
    /// Input text windowed around the error position.
    pub excerpt: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pattern parse error at byte {}: {} (near `{}`)",
            self.position, self.message, self.excerpt
        )
    }
}

impl core::error::Error for ParseError {}

/// Parses a structural pattern into per-group deepest-rule descriptors.
///
/// # Errors
///
/// Returns a [`ParseError`] carrying the byte position and a windowed
/// excerpt when the pattern is syntactically invalid.
pub fn parse(pattern: &str) -> Result<ParsedPattern, ParseError> {
    Parser::new(pattern).parse_pattern()
}

const EXCERPT_WINDOW: usize = 12;

/// Returns up to [`EXCERPT_WINDOW`] characters on either side of `position`,
/// clamped to char boundaries.
fn excerpt_around(input: &str, position: usize) -> String {
    let mut mid = position.min(input.len());
    while mid > 0 && !input.is_char_boundary(mid) {
        mid -= 1;
    }
    let mut start = mid;
    for _ in 0..EXCERPT_WINDOW {
        if start == 0 {
            break;
        }
        start -= 1;
        while start > 0 && !input.is_char_boundary(start) {
            start -= 1;
        }
    }
    let mut end = mid;
    for _ in 0..EXCERPT_WINDOW {
        if end >= input.len() {
            break;
        }
        end += 1;
        while end < input.len() && !input.is_char_boundary(end) {
            end += 1;
        }
    }
    String::from(&input[start..end])
}

struct Parser<'s> {
    input: &'s str,
    pos: usize,
    cost: u32,
}

impl<'s> Parser<'s> {
    fn new(input: &'s str) -> Self {
        Self {
            input,
            pos: 0,
            cost: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    /// Skips ASCII whitespace; returns `true` if any was consumed.
    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_whitespace()) {
            self.bump();
        }
        self.pos != start
    }

    fn error(&self, position: usize, message: &'static str) -> ParseError {
        ParseError {
            position,
            message,
            excerpt: excerpt_around(self.input, position),
        }
    }

    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'s str {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if pred(c)) {
            self.bump();
        }
        &self.input[start..self.pos]
    }

    fn expect_ident(&mut self, message: &'static str) -> Result<&'s str, ParseError> {
        let ident = self.take_while(is_ident_byte);
        if ident.is_empty() {
            return Err(self.error(self.pos, message));
        }
        Ok(ident)
    }

    fn parse_pattern(mut self) -> Result<ParsedPattern, ParseError> {
        let mut descriptors = Vec::new();
        loop {
            self.skip_ws();
            descriptors.push(self.parse_group()?);
            self.skip_ws();
            match self.peek() {
                None => break,
                Some(b',') => self.bump(),
                Some(_) => {
                    return Err(self.error(self.pos, "expected `,` or end of pattern"));
                }
            }
        }
        // Alternation fans resolution out across several groups; charge a
        // log-scaled bonus on top of the per-atom costs.
        let groups = u32::try_from(descriptors.len()).unwrap_or(u32::MAX);
        if groups > 1 {
            self.cost += COST_FANOUT * groups.ilog2();
        }
        Ok(ParsedPattern {
            descriptors,
            cost: self.cost,
        })
    }

    /// Parses one combinator chain, keeping only its rightmost compound.
    fn parse_group(&mut self) -> Result<Descriptor, ParseError> {
        let mut depth = 0;
        let mut deepest = self.parse_compound()?;
        loop {
            let had_ws = self.skip_ws();
            match self.peek() {
                None | Some(b',') => return Ok(deepest),
                Some(b'>' | b'+' | b'~') => {
                    self.bump();
                    self.skip_ws();
                    depth += 1;
                    self.cost += COST_NESTING * depth;
                    deepest = self.parse_compound()?;
                }
                Some(_) if had_ws => {
                    // Descendant combinator.
                    depth += 1;
                    self.cost += COST_NESTING * depth;
                    deepest = self.parse_compound()?;
                }
                Some(_) => {
                    return Err(self.error(self.pos, "unexpected character in pattern"));
                }
            }
        }
    }

    fn parse_compound(&mut self) -> Result<Descriptor, ParseError> {
        let mut desc = Descriptor::default();
        let mut saw_any = false;

        if self.peek() == Some(b'*') {
            self.bump();
            saw_any = true;
        } else if matches!(self.peek(), Some(c) if c.is_ascii_alphabetic()) {
            let tag = self.take_while(|c| c.is_ascii_alphanumeric() || c == b'-');
            desc.tag = Some(tag.to_ascii_lowercase());
            self.cost += COST_TAG;
            saw_any = true;
        }

        loop {
            match self.peek() {
                Some(b'#') => {
                    self.bump();
                    let name = self.expect_ident("expected an id after `#`")?;
                    desc.identity = Some(String::from(name));
                    self.cost += COST_IDENTITY;
                }
                Some(b'.') => {
                    self.bump();
                    let name = self.expect_ident("expected a class name after `.`")?;
                    desc.classes.push(String::from(name));
                    self.cost += COST_CLASS;
                }
                Some(b'[') => {
                    let name = self.parse_attribute()?;
                    desc.attributes.push(String::from(name));
                    self.cost += COST_ATTRIBUTE;
                }
                Some(b':') => {
                    let name = self.parse_pseudo()?;
                    desc.pseudos.push(String::from(name));
                    self.cost += COST_PSEUDO;
                }
                _ => break,
            }
            saw_any = true;
        }

        if !saw_any {
            return Err(self.error(self.pos, "expected a selector"));
        }
        Ok(desc)
    }

    /// Parses `[name]` or `[name <op> value]`, returning the attribute name.
    ///
    /// The matcher and value are consumed for well-formedness only.
    fn parse_attribute(&mut self) -> Result<&'s str, ParseError> {
        let open = self.pos;
        self.bump();
        self.skip_ws();
        let name = self.expect_ident("expected an attribute name after `[`")?;
        loop {
            match self.peek() {
                None => return Err(self.error(open, "unclosed attribute selector")),
                Some(b']') => {
                    self.bump();
                    return Ok(name);
                }
                Some(q @ (b'"' | b'\'')) => {
                    let quote = self.pos;
                    self.bump();
                    while self.peek().is_some_and(|c| c != q) {
                        self.bump();
                    }
                    if self.peek().is_none() {
                        return Err(self.error(quote, "unclosed string in attribute selector"));
                    }
                    self.bump();
                }
                Some(_) => self.bump(),
            }
        }
    }

    /// Parses `:name`, `::name`, or `:name(args)`, returning the pseudo name.
    ///
    /// Arguments are consumed with balanced parentheses and quotes but not
    /// interpreted.
    fn parse_pseudo(&mut self) -> Result<&'s str, ParseError> {
        self.bump();
        if self.peek() == Some(b':') {
            self.bump();
        }
        let name = self.expect_ident("expected a pseudo name after `:`")?;
        if self.peek() == Some(b'(') {
            let open = self.pos;
            self.bump();
            let mut parens = 1_u32;
            loop {
                match self.peek() {
                    None => return Err(self.error(open, "unclosed pseudo arguments")),
                    Some(b'(') => {
                        parens += 1;
                        self.bump();
                    }
                    Some(b')') => {
                        parens -= 1;
                        self.bump();
                        if parens == 0 {
                            break;
                        }
                    }
                    Some(q @ (b'"' | b'\'')) => {
                        let quote = self.pos;
                        self.bump();
                        while self.peek().is_some_and(|c| c != q) {
                            self.bump();
                        }
                        if self.peek().is_none() {
                            return Err(self.error(quote, "unclosed string in pseudo arguments"));
                        }
                        self.bump();
                    }
                    Some(_) => self.bump(),
                }
            }
        }
        Ok(name)
    }
}

fn is_ident_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'-' || c == b'_'
}
