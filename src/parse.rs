use std::num::ParseFloatError;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("expected {expected} values, found {found}")]
    Count { expected: usize, found: usize },
    #[error("invalid number: {0}")]
    Float(#[from] ParseFloatError),
}

/// Reads exactly `N` whitespace separated floats.
pub(crate) fn parse_floats<const N: usize>(s: &str) -> Result<[f32; N], ParseError> {
    let mut out = [0.0; N];
    let mut found = 0;

    for token in s.split_whitespace() {
        if found < N {
            out[found] = token.parse()?;
        }
        found += 1;
    }

    if found != N {
        return Err(ParseError::Count { expected: N, found });
    }

    Ok(out)
}
