#![forbid(unsafe_code)]

//! Spreadsheet column naming: zero-based index <-> bijective base-26 letters.

const RADIX: u128 = 26;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ColumnError {
    Empty,
    InvalidChar { ch: char, index: usize },
    Overflow,
}

impl std::fmt::Display for ColumnError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "column name is empty"),
            Self::InvalidChar { ch, index } => {
                write!(f, "invalid column character {ch:?} at {index}")
            }
            Self::Overflow => write!(f, "column name is too long"),
        }
    }
}

impl std::error::Error for ColumnError {}

/// `0 -> "A"`, `25 -> "Z"`, `26 -> "AA"`, `701 -> "ZZ"`.
pub fn index_to_letter(index: usize) -> String {
    // Widened so `usize::MAX` still has a successor.
    let mut dividend = index as u128 + 1;
    let mut out = Vec::new();
    while dividend > 0 {
        let modulo = (dividend - 1) % RADIX;
        out.push(b'A' + modulo as u8);
        dividend = (dividend - 1) / RADIX;
    }
    out.reverse();
    out.into_iter().map(char::from).collect()
}

/// Inverse of [`index_to_letter`]. Lowercase letters are accepted.
pub fn letter_to_index(value: &str) -> Result<usize, ColumnError> {
    if value.is_empty() {
        return Err(ColumnError::Empty);
    }
    let mut acc: u128 = 0;
    for (index, ch) in value.chars().enumerate() {
        if !ch.is_ascii_alphabetic() {
            return Err(ColumnError::InvalidChar { ch, index });
        }
        let digit = (ch.to_ascii_uppercase() as u8 - b'A') as u128 + 1;
        acc = acc
            .checked_mul(RADIX)
            .and_then(|v| v.checked_add(digit))
            .ok_or(ColumnError::Overflow)?;
    }
    usize::try_from(acc - 1).map_err(|_| ColumnError::Overflow)
}
