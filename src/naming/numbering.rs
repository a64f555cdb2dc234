use std::fmt;

/// Number of decimal digits needed to print `n`; zero needs one.
pub fn digits(n: usize) -> usize {
    n.checked_ilog10().map_or(1, |d| d as usize + 1)
}

/// Fixed-width ordinals for one run.
///
/// The width is derived once from the total so every name in the run sorts
/// correctly under plain string comparison.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NumberingScheme {
    total: usize,
    width: usize,
}

impl NumberingScheme {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            width: digits(total),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Ordinal for a one-based play position.
    pub fn ordinal(&self, position: usize) -> Ordinal {
        debug_assert!((1..=self.total).contains(&position));
        Ordinal {
            value: position,
            width: self.width,
            total: self.total,
        }
    }

    /// Every ordinal of the run, `1..=total`.
    pub fn ordinals(&self) -> impl Iterator<Item = Ordinal> + '_ {
        (1..=self.total).map(|p| self.ordinal(p))
    }
}

/// A play position rendered zero-padded to the run's width.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Ordinal {
    pub value: usize,
    pub width: usize,
    pub total: usize,
}

impl fmt::Display for Ordinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$}", self.value, width = self.width)
    }
}
