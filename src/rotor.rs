//! Rotor: a permutation mounted at a rotational offset.
//!
//! All rotor variants share one struct; the variant only decides the
//! stepping capabilities ([`Rotor::rotates`], [`Rotor::at_notch`],
//! [`Rotor::advance`]). The machine never inspects the concrete kind.

use crate::error::{EnigmaError, Result};
use crate::permutation::Permutation;

/// The mechanical role of a rotor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotorKind {
    /// Leftmost, non-rotating, reflects the signal back.
    Reflector,
    /// Has a setting but never steps on its own.
    Fixed,
    /// Steps when driven by a pawl. `notches` holds alphabet indices.
    Moving {
        /// Settings at which the rotor is at a notch.
        notches: Vec<usize>,
    },
}

/// A named rotor with a current setting.
#[derive(Debug, Clone)]
pub struct Rotor {
    name: String,
    permutation: Permutation,
    setting: usize,
    kind: RotorKind,
}

impl Rotor {
    fn build(name: impl Into<String>, permutation: Permutation, kind: RotorKind) -> Self {
        Rotor {
            name: name.into(),
            permutation,
            setting: 0,
            kind,
        }
    }

    /// Creates a moving rotor with notches at the symbols of `notches`.
    ///
    /// The rotor starts at setting 0.
    ///
    /// # Errors
    /// Returns [`EnigmaError::SymbolNotFound`] if a notch symbol is not in
    /// the permutation's alphabet.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, Permutation, Rotor};
    ///
    /// let alpha = Arc::new(Alphabet::upper());
    /// let perm = Permutation::parse("(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)", alpha).unwrap();
    /// let mut rotor = Rotor::moving("I", perm, "Q").unwrap();
    /// rotor.set(16).unwrap();
    /// assert!(rotor.at_notch());
    /// ```
    pub fn moving(name: impl Into<String>, permutation: Permutation, notches: &str) -> Result<Self> {
        let alphabet = permutation.alphabet();
        let mut indices = Vec::with_capacity(notches.len());
        for c in notches.chars() {
            indices.push(alphabet.to_int(c)?);
        }
        Ok(Self::build(
            name,
            permutation,
            RotorKind::Moving { notches: indices },
        ))
    }

    /// Creates a fixed (non-stepping) rotor.
    pub fn fixed(name: impl Into<String>, permutation: Permutation) -> Self {
        Self::build(name, permutation, RotorKind::Fixed)
    }

    /// Creates a reflector.
    ///
    /// The permutation should be a derangement; that is left to the caller
    /// (see [`config`](crate::config)).
    pub fn reflector(name: impl Into<String>, permutation: Permutation) -> Self {
        Self::build(name, permutation, RotorKind::Reflector)
    }

    /// Returns the catalog name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the rotor's variant.
    pub fn kind(&self) -> &RotorKind {
        &self.kind
    }

    /// Returns the underlying permutation at setting 0.
    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    /// Returns the alphabet size.
    pub fn size(&self) -> usize {
        self.permutation.size()
    }

    /// True for moving rotors.
    pub fn rotates(&self) -> bool {
        matches!(self.kind, RotorKind::Moving { .. })
    }

    /// True for reflectors.
    pub fn reflecting(&self) -> bool {
        self.kind == RotorKind::Reflector
    }

    /// Returns the current setting.
    pub fn setting(&self) -> usize {
        self.setting
    }

    /// Sets the rotor to position `posn`.
    ///
    /// # Errors
    /// - [`EnigmaError::IndexOutOfRange`] unless `posn < size()`.
    /// - [`EnigmaError::Configuration`] for a non-zero position on a reflector.
    pub fn set(&mut self, posn: usize) -> Result<()> {
        if posn >= self.size() {
            return Err(EnigmaError::IndexOutOfRange {
                index: posn,
                size: self.size(),
            });
        }
        if self.reflecting() && posn != 0 {
            return Err(EnigmaError::config(format!(
                "reflector {} has only one position",
                self.name
            )));
        }
        self.setting = posn;
        Ok(())
    }

    /// Sets the rotor to the position of symbol `c`.
    ///
    /// # Errors
    /// As [`set`](Self::set), plus [`EnigmaError::SymbolNotFound`].
    pub fn set_char(&mut self, c: char) -> Result<()> {
        let posn = self.permutation.alphabet().to_int(c)?;
        self.set(posn)
    }

    /// Converts `p` entering the rotor's right side.
    pub fn convert_forward(&self, p: usize) -> usize {
        let shift = self.setting as isize;
        let out = self.permutation.permute(p as isize + shift);
        self.permutation.wrap(out as isize - shift)
    }

    /// Converts `e` entering the rotor's left side.
    pub fn convert_backward(&self, e: usize) -> usize {
        let shift = self.setting as isize;
        let out = self.permutation.invert(e as isize + shift);
        self.permutation.wrap(out as isize - shift)
    }

    /// True iff a moving rotor's current setting is one of its notches.
    pub fn at_notch(&self) -> bool {
        match &self.kind {
            RotorKind::Moving { notches } => notches.contains(&self.setting),
            RotorKind::Fixed | RotorKind::Reflector => false,
        }
    }

    /// Steps a moving rotor by one position; no-op otherwise.
    pub fn advance(&mut self) {
        if self.rotates() {
            self.setting = (self.setting + 1) % self.size();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rstest::rstest;

    use super::*;
    use crate::alphabet::Alphabet;

    const ROTOR_I: &str = "(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)";
    const ROTOR_I_MAP: &str = "EKMFLGDQVZNTOWYHXUSPAIBRCJ";

    fn perm(cycles: &str) -> Permutation {
        Permutation::parse(cycles, Arc::new(Alphabet::upper())).unwrap()
    }

    fn index(c: char) -> usize {
        Alphabet::upper().to_int(c).unwrap()
    }

    #[test]
    fn test_convert_at_setting_zero() {
        let rotor = Rotor::moving("I", perm(ROTOR_I), "Q").unwrap();
        for (i, e) in ROTOR_I_MAP.chars().enumerate() {
            assert_eq!(rotor.convert_forward(i), index(e));
            assert_eq!(rotor.convert_backward(index(e)), i);
        }
    }

    #[test]
    fn test_convert_with_offset() {
        let mut rotor = Rotor::moving("I", perm(ROTOR_I), "Q").unwrap();
        rotor.set(1).unwrap();
        // A shifted to B, B -> K, K shifted back to J.
        assert_eq!(rotor.convert_forward(index('A')), index('J'));
        assert_eq!(rotor.convert_backward(index('J')), index('A'));
        rotor.set(25).unwrap();
        // A shifted to Z, Z -> J, J shifted forward to K.
        assert_eq!(rotor.convert_forward(index('A')), index('K'));
    }

    #[test]
    fn test_forward_backward_inverse_at_every_setting() {
        let mut rotor = Rotor::fixed("I", perm(ROTOR_I));
        for s in 0..26 {
            rotor.set(s).unwrap();
            for p in 0..26 {
                assert_eq!(rotor.convert_backward(rotor.convert_forward(p)), p);
            }
        }
    }

    #[test]
    fn test_set_roundtrip() {
        let mut rotor = Rotor::moving("I", perm(ROTOR_I), "Q").unwrap();
        for k in 0..26 {
            rotor.set(k).unwrap();
            assert_eq!(rotor.setting(), k);
        }
        assert!(matches!(
            rotor.set(26),
            Err(EnigmaError::IndexOutOfRange { index: 26, size: 26 })
        ));
        rotor.set_char('E').unwrap();
        assert_eq!(rotor.setting(), 4);
    }

    #[test]
    fn test_advance_wraps() {
        let mut rotor = Rotor::moving("I", perm(ROTOR_I), "Q").unwrap();
        rotor.set(25).unwrap();
        rotor.advance();
        assert_eq!(rotor.setting(), 0);
    }

    #[test]
    fn test_multiple_notches() {
        let mut rotor = Rotor::moving("VI", perm(ROTOR_I), "ZM").unwrap();
        let notched: Vec<usize> = (0..26)
            .filter(|&k| {
                rotor.set(k).unwrap();
                rotor.at_notch()
            })
            .collect();
        assert_eq!(notched, vec![index('M'), index('Z')]);
    }

    #[test]
    fn test_moving_rejects_foreign_notch() {
        assert!(matches!(
            Rotor::moving("I", perm(ROTOR_I), "q"),
            Err(EnigmaError::SymbolNotFound('q'))
        ));
    }

    #[rstest]
    #[case::fixed(Rotor::fixed("Beta", perm("(ALBEVFCYODJWUGNMQTZSKPR) (HIX)")))]
    #[case::reflector(Rotor::reflector("B", perm("(AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP) (RX) (SZ) (TV)")))]
    fn test_static_rotors_never_step(#[case] rotor: Rotor) {
        let mut rotor = rotor;
        assert!(!rotor.rotates());
        assert!(!rotor.at_notch());
        rotor.advance();
        assert_eq!(rotor.setting(), 0);
    }

    #[test]
    fn test_reflector_has_one_position() {
        let mut rotor = Rotor::reflector("B", perm("(AE) (BN)"));
        assert!(rotor.reflecting());
        assert!(rotor.set(0).is_ok());
        assert!(matches!(rotor.set(1), Err(EnigmaError::Configuration(_))));
    }

    #[test]
    fn test_fixed_rotor_accepts_setting() {
        let mut rotor = Rotor::fixed("Beta", perm("(ALBEVFCYODJWUGNMQTZSKPR) (HIX)"));
        rotor.set(7).unwrap();
        assert_eq!(rotor.setting(), 7);
        assert_eq!(rotor.kind(), &RotorKind::Fixed);
    }
}
