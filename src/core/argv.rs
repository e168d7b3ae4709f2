//! Recursive argument line parsing
//!
//! Turns a raw, space separated argument line into a chain of
//! [`ParsedArg`] nodes, one per subcommand level.

use crate::core::token::{FlagToken, Token, ValueShape, classify, is_flag, is_list_end};
use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, instrument, trace};

/// One level of a parsed command line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedArg {
    /// Command or program name for this level
    pub name: String,
    /// Next nested subcommand level, if parsing branched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<Box<ParsedArg>>,
    /// Remaining raw tokens from the branch point, or the single trailing word
    pub text: String,
    /// Flag keys mapped to their values in encounter order
    pub pairs: BTreeMap<String, Vec<String>>,
}

impl ParsedArg {
    /// Create a node carrying only a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Check whether a flag key was given at this level
    pub fn has_kv(&self, key: &str) -> bool {
        self.pairs.contains_key(key)
    }

    /// Check whether this level carries any flags
    pub fn is_arg(&self) -> bool {
        !self.pairs.is_empty()
    }

    /// Values recorded for a flag key
    pub fn values(&self, key: &str) -> Option<&[String]> {
        self.pairs.get(key).map(Vec::as_slice)
    }

    /// Iterate this node followed by every nested level
    pub fn levels(&self) -> Levels<'_> {
        Levels { next: Some(self) }
    }

    /// Number of levels in the chain, this one included
    pub fn depth(&self) -> usize {
        self.levels().count()
    }
}

/// Iterator over a [`ParsedArg`] chain
#[derive(Debug, Clone)]
pub struct Levels<'a> {
    next: Option<&'a ParsedArg>,
}

impl<'a> Iterator for Levels<'a> {
    type Item = &'a ParsedArg;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.sub.as_deref();
        Some(current)
    }
}

/// Parse a raw argument line split on single spaces
#[instrument(level = "debug", skip_all, fields(len = line.len()))]
pub fn parse(line: &str) -> Result<ParsedArg, ParseError> {
    if line.is_empty() {
        return Err(ParseError::empty_input());
    }

    let tokens: Vec<&str> = line.split(' ').collect();
    debug!("Parsing {} tokens", tokens.len());
    parse_tokens(&tokens)
}

/// Parse an already split token sequence
pub fn parse_tokens(tokens: &[&str]) -> Result<ParsedArg, ParseError> {
    parse_sequence(tokens)
}

fn parse_sequence(tokens: &[&str]) -> Result<ParsedArg, ParseError> {
    let mut node = ParsedArg::default();
    let mut with_command = false;

    // The cursor also moves inside the loop body when a list spans tokens.
    let mut i = 0;
    while i < tokens.len() {
        match classify(tokens[i]) {
            Token::Ignorable => {}
            Token::Bare(word) if !with_command => {
                if node.is_arg() {
                    return Err(ParseError::misplaced_flags(word, node));
                }
                trace!("Captured command name {:?}", word);
                node.name = word.to_string();
                with_command = true;
            }
            Token::Bare(_) => return try_branch(node, &tokens[i..]),
            Token::Flag(flag) => {
                let (values, consumed) = flag_values(&flag, &tokens[i + 1..]);
                i += consumed;

                if !flag.key.is_empty() && flag.has_eq {
                    if values.is_empty() {
                        return Err(ParseError::missing_flag_value(flag.opt, node));
                    }
                    node.pairs.insert(flag.key.to_string(), values);
                } else if !flag.opt.is_empty() && !flag.has_eq {
                    node.pairs.insert(flag.opt.to_string(), vec!["true".to_string()]);
                } else if !flag.has_eq {
                    // Unreachable while is_flag demands content after the dashes.
                    return try_branch(node, &tokens[i..]);
                } else {
                    debug!("Dropping flag without a key: {:?}", flag.opt);
                }
            }
        }
        i += 1;
    }

    Ok(node)
}

/// Either keep a single trailing word as text or parse the rest as a subcommand
fn try_branch(mut node: ParsedArg, rest: &[&str]) -> Result<ParsedArg, ParseError> {
    if let [only] = rest {
        if !is_flag(only) {
            trace!("Leaf text {:?} under {:?}", only, node.name);
            node.text = (*only).to_string();
            return Ok(node);
        }
    }

    match parse_sequence(rest) {
        Ok(sub) => {
            trace!("Branched {:?} into {:?}", node.name, sub.name);
            node.sub = Some(Box::new(sub));
            node.text = rest.join(" ");
            Ok(node)
        }
        Err(err) => Err(err.with_partial(node)),
    }
}

/// Collect the values of a flag, returning how many following tokens were consumed
fn flag_values(flag: &FlagToken<'_>, ahead: &[&str]) -> (Vec<String>, usize) {
    match flag.value_shape() {
        ValueShape::None => (Vec::new(), 0),
        ValueShape::Scalar(value) => (vec![value.to_string()], 0),
        ValueShape::ListSingle(value) => {
            let items = value.trim().trim_start_matches('[').trim_end_matches(']');
            (items.split(',').map(str::to_string).collect(), 0)
        }
        ValueShape::ListSpanning(head) => spanning_list(head, ahead),
    }
}

fn spanning_list(head: &str, ahead: &[&str]) -> (Vec<String>, usize) {
    let mut list = Vec::with_capacity(5);

    let before = head.trim_start_matches('[').trim();
    if !before.is_empty() {
        list.push(before.to_string());
    }

    let mut consumed = 0;
    while let Some(next) = ahead.get(consumed) {
        if is_flag(next) || is_list_end(next) {
            break;
        }
        list.push(next.trim().to_string());
        consumed += 1;
    }

    match ahead.get(consumed) {
        Some(&end) if is_list_end(end) => {
            list.push(end.strip_suffix(']').unwrap_or(end).trim().to_string());
            consumed += 1;
        }
        _ => debug!("List opened by {:?} was never closed", head),
    }

    // A bare opener at the very end of the line carries no value at all.
    if consumed == 0 && ahead.is_empty() && list.is_empty() {
        return (Vec::new(), 0);
    }

    let joined = list.join(" ");
    let items = joined.trim();
    let items = items.strip_prefix('[').unwrap_or(items);
    let items = items.strip_suffix(']').unwrap_or(items);
    (items.split(' ').map(str::to_string).collect(), consumed)
}
