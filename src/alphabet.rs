//! Alphabet: ordered set of encodable symbols.
//!
//! Maps each symbol to a dense index in `[0, size)` and back. Every
//! [`Permutation`](crate::Permutation) and [`Rotor`](crate::Rotor) of a run
//! shares one alphabet.

use crate::error::{EnigmaError, Result};

/// An ordered sequence of distinct symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    /// Creates an alphabet from the characters of `chars`, in order.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Configuration`] if `chars` is empty or repeats
    /// a character.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::Alphabet;
    ///
    /// let alpha = Alphabet::new("ABC").unwrap();
    /// assert_eq!(alpha.size(), 3);
    /// assert!(Alphabet::new("ABA").is_err());
    /// ```
    pub fn new(chars: &str) -> Result<Self> {
        let mut symbols: Vec<char> = Vec::with_capacity(chars.len());
        for c in chars.chars() {
            if symbols.contains(&c) {
                return Err(EnigmaError::config(format!(
                    "duplicate character '{c}' in alphabet"
                )));
            }
            symbols.push(c);
        }
        if symbols.is_empty() {
            return Err(EnigmaError::config("alphabet is empty"));
        }
        Ok(Alphabet { symbols })
    }

    /// The upper-case Latin alphabet `A..=Z`.
    pub fn upper() -> Self {
        Alphabet {
            symbols: ('A'..='Z').collect(),
        }
    }

    /// Returns the number of symbols.
    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if `c` is in this alphabet.
    pub fn contains(&self, c: char) -> bool {
        self.symbols.contains(&c)
    }

    /// Returns symbol number `index`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::IndexOutOfRange`] unless `index < size()`.
    pub fn to_char(&self, index: usize) -> Result<char> {
        self.symbols
            .get(index)
            .copied()
            .ok_or(EnigmaError::IndexOutOfRange {
                index,
                size: self.size(),
            })
    }

    /// Returns the index of `c`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::SymbolNotFound`] if `c` is not in the alphabet.
    pub fn to_int(&self, c: char) -> Result<usize> {
        self.symbols
            .iter()
            .position(|&s| s == c)
            .ok_or(EnigmaError::SymbolNotFound(c))
    }

    /// Returns the symbols in index order.
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_upper_lookup() {
        let alpha = Alphabet::new("ABCDEFGHIJKLMNOPQRSTUVWXYZ").unwrap();
        assert_eq!(alpha, Alphabet::upper());
        assert_eq!(alpha.to_char(0).unwrap(), 'A');
        assert_eq!(alpha.to_int('Z').unwrap(), 25);
        assert_eq!(alpha.to_char(25).unwrap(), 'Z');
    }

    #[test]
    fn test_index_symbol_roundtrip() {
        let alpha = Alphabet::new("0123456789.").unwrap();
        for i in 0..alpha.size() {
            let c = alpha.to_char(i).unwrap();
            assert_eq!(alpha.to_int(c).unwrap(), i);
        }
    }

    #[test]
    fn test_to_char_out_of_range() {
        let alpha = Alphabet::new("XYZ").unwrap();
        assert!(matches!(
            alpha.to_char(3),
            Err(EnigmaError::IndexOutOfRange { index: 3, size: 3 })
        ));
    }

    #[test]
    fn test_to_int_missing() {
        let alpha = Alphabet::upper();
        assert!(matches!(alpha.to_int('a'), Err(EnigmaError::SymbolNotFound('a'))));
        assert!(!alpha.contains('a'));
        assert!(alpha.contains('Q'));
    }

    #[rstest]
    #[case::empty("")]
    #[case::duplicate("ABCA")]
    fn test_new_rejects(#[case] chars: &str) {
        assert!(matches!(Alphabet::new(chars), Err(EnigmaError::Configuration(_))));
    }
}
