//! Machine: the complete rotor cipher machine.
//!
//! Owns the [`RotorCatalog`] and an ordered array of slots that refer into
//! it. Slot 0 holds the reflector; the last slot holds the fast rotor.
//!
//! ```text
//! input → plugboard → slot[n-1] … slot[1] → slot[0] (reflect)
//!                                              ↓
//! output ← plugboard ← slot[n-1] … slot[1] ←───┘
//! ```
//!
//! The rotor bank steps once per symbol, before the signal passes through.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::alphabet::Alphabet;
use crate::catalog::{RotorCatalog, RotorId};
use crate::error::{EnigmaError, Result};
use crate::permutation::Permutation;
use crate::rotor::Rotor;

/// Number of converted symbols per output group.
const GROUP_WIDTH: usize = 5;

/// A rotor cipher machine.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use enigma::{Alphabet, Machine, Permutation, Rotor, RotorCatalog};
///
/// let alpha = Arc::new(Alphabet::upper());
/// let p = |c: &str| Permutation::parse(c, alpha.clone()).unwrap();
/// let catalog: RotorCatalog = [
///     Rotor::reflector("B", p("(AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP) (RX) (SZ) (TV)")),
///     Rotor::fixed("Beta", p("(ALBEVFCYODJWUGNMQTZSKPR) (HIX)")),
///     Rotor::moving("III", p("(ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)"), "V").unwrap(),
///     Rotor::moving("IV", p("(AEPLIYWCOXMRFZBSTGJQNH) (DV) (KU)"), "J").unwrap(),
///     Rotor::moving("I", p("(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)"), "Q").unwrap(),
/// ]
/// .into_iter()
/// .collect();
///
/// let mut machine = Machine::new(alpha.clone(), 5, 3, catalog).unwrap();
/// machine.insert_rotors(&["B", "Beta", "III", "IV", "I"]).unwrap();
/// machine.set_rotors("AXLE").unwrap();
/// machine.set_plugboard(p("(HQ) (EX) (IP) (TR) (BY)")).unwrap();
///
/// assert_eq!(
///     machine.convert_message("FROM his shoulder Hiawatha").unwrap(),
///     "QVPQS OKOIL PUBKJ ZPISF XDW"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Machine {
    alphabet: Arc<Alphabet>,
    catalog: RotorCatalog,
    slots: Vec<Option<RotorId>>,
    pawls: usize,
    plugboard: Permutation,
}

impl Machine {
    /// Creates a machine with `num_rotors` empty slots and `pawls` pawls,
    /// drawing rotors from `catalog`.
    ///
    /// The plugboard starts as the identity.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Configuration`] unless `0 < pawls < num_rotors`
    /// and the catalog holds at least `num_rotors` rotors.
    pub fn new(
        alphabet: Arc<Alphabet>,
        num_rotors: usize,
        pawls: usize,
        catalog: RotorCatalog,
    ) -> Result<Self> {
        if pawls == 0 || pawls >= num_rotors {
            return Err(EnigmaError::config(format!(
                "need 0 < pawls < rotor slots, got {pawls} pawls for {num_rotors} slots"
            )));
        }
        if num_rotors > catalog.len() {
            return Err(EnigmaError::config(format!(
                "{num_rotors} rotor slots but only {} rotors defined",
                catalog.len()
            )));
        }
        Ok(Machine {
            plugboard: Permutation::identity(alphabet.clone()),
            alphabet,
            catalog,
            slots: vec![None; num_rotors],
            pawls,
        })
    }

    /// Returns the number of rotor slots.
    pub fn num_rotors(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of pawls (and thus of moving rotors).
    pub fn num_pawls(&self) -> usize {
        self.pawls
    }

    /// Returns the machine's alphabet.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Returns the catalog of available rotors.
    pub fn catalog(&self) -> &RotorCatalog {
        &self.catalog
    }

    /// Returns the current plugboard.
    pub fn plugboard(&self) -> &Permutation {
        &self.plugboard
    }

    /// Returns the rotor bound to slot `i`, if any.
    pub fn slot(&self, i: usize) -> Option<&Rotor> {
        self.slots
            .get(i)
            .copied()
            .flatten()
            .and_then(|id| self.catalog.get(id))
    }

    /// Returns the setting of each slot, `None` for unbound slots.
    pub fn slot_settings(&self) -> Vec<Option<usize>> {
        (0..self.num_rotors())
            .map(|i| self.slot(i).map(Rotor::setting))
            .collect()
    }

    fn rotor(&self, i: usize) -> Result<&Rotor> {
        self.slot(i).ok_or(EnigmaError::UnboundSlot(i))
    }

    fn rotor_mut(&mut self, i: usize) -> Result<&mut Rotor> {
        let id = self
            .slots
            .get(i)
            .copied()
            .flatten()
            .ok_or(EnigmaError::UnboundSlot(i))?;
        self.catalog.get_mut(id).ok_or(EnigmaError::UnboundSlot(i))
    }

    /// Binds the slots to the catalog rotors named by `names`, left to
    /// right (`names[0]` is the reflector). Names match case-insensitively.
    ///
    /// A name with no catalog entry leaves its slot unbound; use
    /// [`validate`](Self::validate) before converting.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Configuration`] if `names.len()` differs from
    /// [`num_rotors`](Self::num_rotors).
    pub fn insert_rotors<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        if names.len() != self.num_rotors() {
            return Err(EnigmaError::config(format!(
                "expected {} rotor names, got {}",
                self.num_rotors(),
                names.len()
            )));
        }
        self.slots = names
            .iter()
            .map(|name| self.catalog.find(name.as_ref()))
            .collect();
        debug!(
            rotors = ?names.iter().map(|n| n.as_ref()).collect::<Vec<&str>>(),
            "inserted rotors"
        );
        Ok(())
    }

    /// Sets slots `1..` from the symbols of `setting`, left to right.
    /// Slot 0 (the reflector) is not set.
    ///
    /// Nothing is changed if any symbol or slot is invalid.
    ///
    /// # Errors
    /// - [`EnigmaError::Configuration`] if `setting` is not
    ///   `num_rotors() - 1` symbols long, or would turn a reflector.
    /// - [`EnigmaError::SymbolNotFound`] for a symbol outside the alphabet.
    /// - [`EnigmaError::UnboundSlot`] if a slot has no rotor.
    pub fn set_rotors(&mut self, setting: &str) -> Result<()> {
        let positions = setting
            .chars()
            .map(|c| self.alphabet.to_int(c))
            .collect::<Result<Vec<usize>>>()?;
        if positions.len() != self.num_rotors() - 1 {
            return Err(EnigmaError::config(format!(
                "setting \"{setting}\" must have {} characters",
                self.num_rotors() - 1
            )));
        }
        for (i, &posn) in (1..).zip(&positions) {
            let rotor = self.rotor(i)?;
            if rotor.reflecting() && posn != 0 {
                return Err(EnigmaError::config(format!(
                    "reflector {} has only one position",
                    rotor.name()
                )));
            }
        }
        for (i, posn) in (1..).zip(positions) {
            self.rotor_mut(i)?.set(posn)?;
        }
        debug!(setting, "set rotors");
        Ok(())
    }

    /// Replaces the plugboard.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Configuration`] if `plugboard` is not an
    /// involution (a cycle longer than two would break decryption) or is
    /// over an alphabet of a different size.
    pub fn set_plugboard(&mut self, plugboard: Permutation) -> Result<()> {
        self.check_plugboard(&plugboard)?;
        debug!(%plugboard, "set plugboard");
        self.plugboard = plugboard;
        Ok(())
    }

    fn check_plugboard(&self, plugboard: &Permutation) -> Result<()> {
        if plugboard.size() != self.alphabet.size() {
            return Err(EnigmaError::config("plugboard alphabet does not match machine"));
        }
        if !plugboard.is_involution() {
            return Err(EnigmaError::config(format!(
                "plugboard {plugboard} must consist of swapped pairs only"
            )));
        }
        Ok(())
    }

    /// Checks that the bound slots form a usable machine.
    ///
    /// # Errors
    /// - [`EnigmaError::UnboundSlot`] for an empty slot.
    /// - [`EnigmaError::Configuration`] unless slot 0 is the only
    ///   reflector, no rotor is used twice, and exactly
    ///   [`num_pawls`](Self::num_pawls) rotors move.
    pub fn validate(&self) -> Result<()> {
        self.check_layout(&self.slots)
    }

    fn check_layout(&self, slots: &[Option<RotorId>]) -> Result<()> {
        let mut moving = 0;
        for (i, slot) in slots.iter().enumerate() {
            let id = slot.ok_or(EnigmaError::UnboundSlot(i))?;
            let rotor = self.catalog.get(id).ok_or(EnigmaError::UnboundSlot(i))?;
            if slots[..i].contains(slot) {
                return Err(EnigmaError::config(format!(
                    "rotor {} used more than once",
                    rotor.name()
                )));
            }
            match (i, rotor.reflecting()) {
                (0, false) => return Err(EnigmaError::config("first rotor must be a reflector")),
                (0, true) => {}
                (_, true) => {
                    return Err(EnigmaError::config(format!(
                        "reflector {} must be in the first slot",
                        rotor.name()
                    )));
                }
                (_, false) => {}
            }
            if rotor.rotates() {
                moving += 1;
            }
        }
        if moving != self.pawls {
            return Err(EnigmaError::config(format!(
                "{moving} moving rotors for {} pawls",
                self.pawls
            )));
        }
        Ok(())
    }

    /// Inserts rotors, installs the plugboard and sets the rotors in one
    /// step. Nothing is changed unless the whole configuration is valid.
    ///
    /// # Errors
    /// Any error of [`insert_rotors`](Self::insert_rotors),
    /// [`validate`](Self::validate), [`set_plugboard`](Self::set_plugboard)
    /// or [`set_rotors`](Self::set_rotors); an unknown rotor name is a
    /// [`EnigmaError::Configuration`] error.
    pub fn configure<S: AsRef<str>>(
        &mut self,
        names: &[S],
        setting: &str,
        plugboard: Permutation,
    ) -> Result<()> {
        if names.len() != self.num_rotors() {
            return Err(EnigmaError::config(format!(
                "expected {} rotor names, got {}",
                self.num_rotors(),
                names.len()
            )));
        }
        let mut staged = Vec::with_capacity(names.len());
        for name in names {
            let id = self.catalog.find(name.as_ref()).ok_or_else(|| {
                EnigmaError::config(format!("unknown rotor \"{}\"", name.as_ref()))
            })?;
            staged.push(Some(id));
        }
        self.check_layout(&staged)?;
        self.check_plugboard(&plugboard)?;
        let previous = std::mem::replace(&mut self.slots, staged);
        if let Err(err) = self.set_rotors(setting) {
            self.slots = previous;
            return Err(err);
        }
        self.set_plugboard(plugboard)
    }

    /// Advances the rotor bank by one keypress.
    fn step(&mut self) -> Result<()> {
        let n = self.num_rotors();
        for i in 0..n {
            self.rotor(i)?;
        }
        for i in (n - self.pawls)..(n - 1) {
            let rotor = self.rotor(i)?;
            if rotor.rotates() && (self.rotor(i + 1)?.at_notch() || rotor.at_notch()) {
                self.rotor_mut(i)?.advance();
            }
        }
        self.rotor_mut(n - 1)?.advance();
        trace!(settings = ?self.slot_settings(), "stepped");
        Ok(())
    }

    /// Converts the symbol index `c` after first advancing the machine.
    ///
    /// # Errors
    /// - [`EnigmaError::IndexOutOfRange`] unless `c < alphabet size`.
    /// - [`EnigmaError::UnboundSlot`] if any slot is unbound.
    pub fn convert(&mut self, c: usize) -> Result<usize> {
        let size = self.alphabet.size();
        if c >= size {
            return Err(EnigmaError::IndexOutOfRange { index: c, size });
        }
        let mut c = self.plugboard.permute(c as isize);
        self.step()?;
        for i in (0..self.num_rotors()).rev() {
            c = self.rotor(i)?.convert_forward(c);
        }
        for i in 1..self.num_rotors() {
            c = self.rotor(i)?.convert_backward(c);
        }
        Ok(self.plugboard.permute(c as isize))
    }

    /// Converts one symbol after first advancing the machine.
    ///
    /// # Errors
    /// As [`convert`](Self::convert), plus [`EnigmaError::SymbolNotFound`].
    pub fn convert_symbol(&mut self, c: char) -> Result<char> {
        let index = self.alphabet.to_int(c)?;
        let out = self.convert(index)?;
        self.alphabet.to_char(out)
    }

    /// Converts `msg`, advancing the machine once per symbol.
    ///
    /// Whitespace is dropped, symbols missing from the alphabet are tried in
    /// upper case, and the output is grouped in blocks of five separated by
    /// single spaces. A symbol the alphabet already contains is used as is,
    /// so lower-case symbols of a mixed-case alphabet are not folded.
    ///
    /// # Errors
    /// As [`convert_symbol`](Self::convert_symbol). Symbols before the
    /// failing one have already advanced the machine.
    pub fn convert_message(&mut self, msg: &str) -> Result<String> {
        let mut out = String::with_capacity(msg.len() + msg.len() / GROUP_WIDTH);
        let mut count = 0;
        for c in msg.chars().filter(|c| !c.is_whitespace()) {
            let c = self.normalize(c);
            if count > 0 && count % GROUP_WIDTH == 0 {
                out.push(' ');
            }
            out.push(self.convert_symbol(c)?);
            count += 1;
        }
        Ok(out)
    }

    fn normalize(&self, c: char) -> char {
        if self.alphabet.contains(c) {
            return c;
        }
        let mut upper = c.to_uppercase();
        match (upper.next(), upper.next()) {
            (Some(u), None) => u,
            _ => c,
        }
    }
}
