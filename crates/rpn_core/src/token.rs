//! Tokens and their stored form.
//!
//! A stack is persisted as its tokens joined by `,`. Reads go through
//! [`decode`], which keeps only digit-only literals and operator symbols;
//! anything else that ended up in the stored text is dropped silently.

use crate::error::EvalError;
use std::fmt;
use std::str::FromStr;

const SEPARATOR: char = ',';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub const ALL: [Operator; 4] = [Operator::Add, Operator::Sub, Operator::Mul, Operator::Div];

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
        }
    }

    pub fn from_symbol(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == s)
    }
}

impl FromStr for Operator {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_symbol(s).ok_or_else(|| EvalError::InvalidOperator {
            op: s.to_string(),
            valid: operators().join(", "),
        })
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Supported operator symbols, in listing order.
pub fn operators() -> [&'static str; 4] {
    Operator::ALL.map(Operator::symbol)
}

/// A token survives a read if it is all ASCII digits or an operator symbol.
pub fn is_valid_token(token: &str) -> bool {
    let t = token.trim();
    if t.is_empty() {
        return false;
    }
    t.bytes().all(|b| b.is_ascii_digit()) || Operator::from_symbol(t).is_some()
}

pub fn filter_tokens<I, S>(tokens: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .filter(|t| is_valid_token(t.as_ref()))
        .map(|t| t.as_ref().trim().to_string())
        .collect()
}

/// Split free-form expression text on whitespace. No other parsing happens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_owned).collect()
}

pub fn encode<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(&SEPARATOR.to_string())
}

pub fn decode(stack_data: &str) -> Vec<String> {
    filter_tokens(stack_data.split(SEPARATOR))
}
