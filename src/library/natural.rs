//! Natural ("human") ordering of names.
//!
//! Runs of ASCII digits compare by numeric value; every other character
//! compares case-insensitively by code point. Names that still tie are
//! ordered by zero padding (`"02"` before `"2"`) and finally by their raw
//! code points, so the result is a total order usable as a sort key.

use std::cmp::Ordering;
use std::path::Path;

use crate::config::SortMode;

#[derive(Debug, Clone, Copy)]
enum Token<'a> {
    Char(char),
    Number(&'a str),
}

fn tokens(s: &str) -> impl Iterator<Item = Token<'_>> + '_ {
    let mut rest = s;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        if first.is_ascii_digit() {
            let end = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            let (number, tail) = rest.split_at(end);
            rest = tail;
            Some(Token::Number(number))
        } else {
            rest = &rest[first.len_utf8()..];
            Some(Token::Char(first))
        }
    })
}

/// Compare two digit runs by value without parsing, so arbitrarily long
/// runs never overflow.
fn compare_numbers(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn compare_tokens(a: Token<'_>, b: Token<'_>) -> Ordering {
    match (a, b) {
        (Token::Number(x), Token::Number(y)) => compare_numbers(x, y),
        (Token::Char(x), Token::Char(y)) => x.to_lowercase().cmp(y.to_lowercase()),
        // A digit run sits where its digits would in code-point order; no
        // lowercased non-digit falls inside '0'..='9'.
        (Token::Number(_), Token::Char(y)) => lower_first(y).cmp(&'0').reverse(),
        (Token::Char(x), Token::Number(_)) => lower_first(x).cmp(&'0'),
    }
}

fn lower_first(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Among names equal by value, more leading zeroes sort first.
fn compare_padding(a: &str, b: &str) -> Ordering {
    for (x, y) in tokens(a).zip(tokens(b)) {
        if let (Token::Number(x), Token::Number(y)) = (x, y) {
            let padding = y.len().cmp(&x.len());
            if padding != Ordering::Equal {
                return padding;
            }
        }
    }
    Ordering::Equal
}

/// Natural comparison of two names.
pub fn compare(a: &str, b: &str) -> Ordering {
    tokens(a)
        .map(Some)
        .chain(std::iter::once(None))
        .zip(tokens(b).map(Some).chain(std::iter::once(None)))
        .find_map(|pair| match pair {
            (Some(x), Some(y)) => Some(compare_tokens(x, y)).filter(|o| o.is_ne()),
            (None, Some(_)) => Some(Ordering::Less),
            (Some(_), None) => Some(Ordering::Greater),
            (None, None) => None,
        })
        .unwrap_or(Ordering::Equal)
        .then_with(|| compare_padding(a, b))
        .then_with(|| a.cmp(b))
}

impl SortMode {
    /// Compare two plain names (directories) under this mode.
    pub fn compare(self, a: &str, b: &str) -> Ordering {
        match self {
            SortMode::Natural => compare(a, b),
            SortMode::Lexicographic => a.cmp(b),
        }
    }

    /// Compare two file paths by stem, then by full file name so that
    /// `intro.mp3` and `intro.ogg` still get a fixed order.
    pub fn compare_files(self, a: &Path, b: &Path) -> Ordering {
        let stem = |p: &Path| p.file_stem().map(|s| s.to_string_lossy().into_owned());
        let name = |p: &Path| p.file_name().map(|s| s.to_string_lossy().into_owned());
        self.compare(
            stem(a).as_deref().unwrap_or_default(),
            stem(b).as_deref().unwrap_or_default(),
        )
        .then_with(|| {
            self.compare(
                name(a).as_deref().unwrap_or_default(),
                name(b).as_deref().unwrap_or_default(),
            )
        })
    }

    pub fn compare_dirs(self, a: &Path, b: &Path) -> Ordering {
        let name = |p: &Path| p.file_name().map(|s| s.to_string_lossy().into_owned());
        self.compare(
            name(a).as_deref().unwrap_or_default(),
            name(b).as_deref().unwrap_or_default(),
        )
    }
}
