//! Native-script classification policy

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;

lazy_static! {
    /// Letters proper (general category L*); letter numbers and marks excluded
    static ref LETTER: Regex = Regex::new(r"\p{L}").expect("valid regex");
}

/// A contiguous block of code points that defines the "native" script
///
/// Words whose alphabetic characters all fall inside the range are
/// classified as native-script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptRange {
    first: char,
    last: char,
}

impl ScriptRange {
    /// Basic Russian alphabet: U+0410 (`А`) through U+044F (`я`)
    ///
    /// `Ё`/`ё` live outside this block and are therefore not native.
    pub const CYRILLIC_BASIC: ScriptRange = ScriptRange {
        first: '\u{0410}',
        last: '\u{044F}',
    };

    /// Creates a range covering `first..=last`
    ///
    /// The bounds are swapped if given in reverse order.
    pub fn new(first: char, last: char) -> Self {
        if first <= last {
            Self { first, last }
        } else {
            Self {
                first: last,
                last: first,
            }
        }
    }

    /// Returns true if the character lies inside the range
    pub fn contains(&self, c: char) -> bool {
        (self.first..=self.last).contains(&c)
    }

    /// Classifies a token
    ///
    /// A token is native iff it has at least one letter and every distinct
    /// letter lies inside the range. Everything else (digits, letter
    /// numbers such as `Ⅻ`, combining marks, symbols) is ignored.
    pub fn classify(&self, token: &str) -> bool {
        let letters: BTreeSet<char> = LETTER
            .find_iter(token)
            .flat_map(|m| m.as_str().chars())
            .collect();
        !letters.is_empty() && letters.iter().all(|&c| self.contains(c))
    }
}

impl Default for ScriptRange {
    fn default() -> Self {
        Self::CYRILLIC_BASIC
    }
}
