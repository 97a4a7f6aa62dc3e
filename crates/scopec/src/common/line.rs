//! Source line numbers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;

/// A 1-based source line, as recorded by the parser on each node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Line(NonZeroU32);

impl Line {
    /// Returns `None` for 0, which is not a valid line.
    pub fn new(line: u32) -> Option<Self> {
        NonZeroU32::new(line).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Zero-based index, as expected by `codespan_reporting::files::Files`.
    pub fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_not_a_line() {
        assert!(Line::new(0).is_none());
        let line = Line::new(7).unwrap();
        assert_eq!(line.get(), 7);
        assert_eq!(line.index(), 6);
        assert_eq!(line.to_string(), "7");
    }
}
