//! Error types for the enigma library.

/// Errors produced by the enigma library.
#[derive(Debug, thiserror::Error)]
pub enum EnigmaError {
    /// An index fell outside `[0, size)` of the alphabet.
    #[error("index {index} out of range for alphabet of size {size}")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// The alphabet size.
        size: usize,
    },

    /// A symbol is not part of the alphabet.
    #[error("character '{0}' not in alphabet")]
    SymbolNotFound(char),

    /// Malformed or inconsistent machine configuration.
    #[error("{0}")]
    Configuration(String),

    /// A rotor slot was used before a rotor was bound to it.
    #[error("no rotor bound to slot {0}")]
    UnboundSlot(usize),

    /// Failed to read input or write output.
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

impl EnigmaError {
    /// Shorthand for a [`EnigmaError::Configuration`] error.
    pub fn config(msg: impl Into<String>) -> Self {
        EnigmaError::Configuration(msg.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EnigmaError>;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::range(
        EnigmaError::IndexOutOfRange { index: 26, size: 26 },
        "index 26 out of range for alphabet of size 26"
    )]
    #[case::lookup(EnigmaError::SymbolNotFound('!'), "character '!' not in alphabet")]
    #[case::config(EnigmaError::config("first rotor must be a reflector"), "first rotor must be a reflector")]
    #[case::unbound(EnigmaError::UnboundSlot(3), "no rotor bound to slot 3")]
    fn test_display(#[case] err: EnigmaError, #[case] expected: &str) {
        assert_eq!(format!("{err}"), expected);
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: EnigmaError = io.into();
        assert!(matches!(err, EnigmaError::Io(_)));
        assert_eq!(format!("{err}"), "i/o failure: missing");
    }
}
