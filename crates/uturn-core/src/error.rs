use std::{cmp::Ordering, fmt};
use thiserror::Error;

/// Where in the input a failure occurred.
///
/// Inputs are consumed from the front, so a location inside a primitive
/// input is given as the number of elements that were still unconsumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// The input was already exhausted.
    Eoi,
    /// This many elements were left in the cursor.
    Remaining(usize),
    /// A named slice of a compound input.
    Field(&'static str),
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Eoi => write!(f, "end of input"),
            Position::Remaining(n) => write!(f, "{} element(s) before the end", n),
            Position::Field(name) => write!(f, "the `{}` slice", name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    UnexpectedInput,
    ExpectedLiteral,
    EmptyInput,
    Overflow,
    UnconsumedRemainder,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected} at {at}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub expected: String,
    pub at: Position,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, expected: impl Into<String>, at: Position) -> Self {
        Self { kind, expected: expected.into(), at }
    }

    /// Of two sibling failures, keeps the one that got deeper into the
    /// input; ties keep `self`.
    pub fn further(self, other: Self) -> Self {
        match depth(&self.at).cmp(&depth(&other.at)) {
            Ordering::Less => other,
            _ => self,
        }
    }
}

// Eoi is deeper than any remaining count; a compound-field failure carries
// no depth of its own and never displaces a positioned one.
fn depth(at: &Position) -> (u8, usize) {
    match at {
        Position::Eoi => (2, 0),
        Position::Remaining(n) => (1, usize::MAX - n),
        Position::Field(_) => (0, 0),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PrintError {
    /// The value does not belong to this printer's image, e.g. a sum-type
    /// conversion was asked to un-apply a different variant.
    #[error("value does not belong to this printer's image")]
    UnprintableBranch,
    /// No alternative produced an input that re-parses to the same value.
    #[error("printed input does not re-parse to the printed value")]
    RoundTripFailed,
}
