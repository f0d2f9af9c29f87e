//! Source and input-literal validation for the front end.
//!
//! Programs receive their initial input as a command-line literal: an
//! integer becomes a one-element sequence, a quoted string becomes its
//! character codes, and a list or tuple must contain only integers. All
//! failures here are load-time errors; they are reported to the user and
//! never reach the engine.

use thiserror::Error;

/// Fatal load-time failures owned by the front end.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("Pushy files must be ASCII-only")]
    NonAsciiSource,
    #[error("unable to parse input (expected an integer, a quoted string, or a list of integers)")]
    MalformedLiteral,
    #[error("list inputs can only contain integers")]
    NonIntegerList,
}

/// Reject non-ASCII program text before tokenization.
pub fn check_source(text: &str) -> Result<(), LoadError> {
    if text.is_ascii() {
        Ok(())
    } else {
        Err(LoadError::NonAsciiSource)
    }
}

/// Decode the command-line input literal into the initial input sequence.
pub fn decode_input(literal: &str) -> Result<Vec<i64>, LoadError> {
    let text = literal.trim();
    if text.is_empty() {
        return Err(LoadError::MalformedLiteral);
    }

    if let Some(inner) = strip_pair(text, '[', ']').or_else(|| strip_pair(text, '(', ')')) {
        return decode_list(inner);
    }

    if let Some(inner) = strip_pair(text, '"', '"').or_else(|| strip_pair(text, '\'', '\'')) {
        return Ok(decode_string(inner));
    }

    text.parse::<i64>()
        .map(|n| vec![n])
        .map_err(|_| LoadError::MalformedLiteral)
}

fn strip_pair(text: &str, open: char, close: char) -> Option<&str> {
    let rest = text.strip_prefix(open)?;
    rest.strip_suffix(close)
}

fn decode_list(inner: &str) -> Result<Vec<i64>, LoadError> {
    let inner = inner.trim();
    if inner.is_empty() {
        return Ok(Vec::new());
    }

    let mut values = Vec::new();
    let mut parts = inner.split(',').map(str::trim).peekable();
    while let Some(part) = parts.next() {
        // A single trailing comma is legal list syntax.
        if part.is_empty() && parts.peek().is_none() && !values.is_empty() {
            break;
        }
        values.push(part.parse::<i64>().map_err(|_| LoadError::NonIntegerList)?);
    }
    Ok(values)
}

fn decode_string(inner: &str) -> Vec<i64> {
    let mut codes = Vec::new();
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        let c = match c {
            '\\' => match chars.next() {
                Some('n') => '\n',
                Some('t') => '\t',
                Some('r') => '\r',
                Some(other) => other,
                None => '\\',
            },
            other => other,
        };
        codes.push(c as i64);
    }
    codes
}
