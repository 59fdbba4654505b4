//! Rotor cipher machine engine.
//!
//! Simulates an Enigma-style machine: a bank of interchangeable rotors,
//! a reflector and a plugboard. Each keypress steps the rotor bank and then
//! sends the symbol through the plugboard, the rotors right to left, the
//! reflector, the rotors left to right and the plugboard again. Running the
//! same initial configuration over the ciphertext recovers the plaintext.
//!
//! # Architecture
//!
//! ```text
//! Alphabet     (symbol ↔ index)
//!     ↑
//! Permutation  (cycle notation, forward / inverse lookup)
//!     ↑
//! Rotor        (permutation + setting; Reflector | Fixed | Moving)
//!     ↑ owned by
//! RotorCatalog (arena addressed by RotorId)
//!     ↑
//! Machine      (slots of RotorIds + pawls + plugboard)
//! ```
//!
//! [`config`] reads the textual rotor catalog and settings lines, and
//! [`driver`] runs a message stream through a configured machine.
//!
//! # Examples
//!
//! ```
//! use enigma::config::{parse_machine, Settings};
//!
//! let conf = "ABCDEFGHIJKLMNOPQRSTUVWXYZ
//!  5 3
//!  I MQ      (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
//!  III MV    (ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)
//!  IV MJ     (AEPLIYWCOXMRFZBSTGJQNH) (DV) (KU)
//!  Beta N    (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
//!  B R       (AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP)
//!            (RX) (SZ) (TV)
//! ";
//! let settings = "* B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)";
//!
//! let mut encoder = parse_machine(conf).unwrap();
//! Settings::parse(settings, 5).unwrap().apply(&mut encoder).unwrap();
//! let ciphertext = encoder.convert_message("FROM his shoulder Hiawatha").unwrap();
//! assert_eq!(ciphertext, "QVPQS OKOIL PUBKJ ZPISF XDW");
//!
//! let mut decoder = parse_machine(conf).unwrap();
//! Settings::parse(settings, 5).unwrap().apply(&mut decoder).unwrap();
//! assert_eq!(
//!     decoder.convert_message(&ciphertext).unwrap(),
//!     "FROMH ISSHO ULDER HIAWA THA"
//! );
//! ```

#![deny(clippy::all)]

pub mod config;
pub mod driver;
pub mod error;

mod alphabet;
mod catalog;
mod machine;
mod permutation;
mod rotor;

pub use alphabet::Alphabet;
pub use catalog::{RotorCatalog, RotorId};
pub use error::{EnigmaError, Result};
pub use machine::Machine;
pub use permutation::Permutation;
pub use rotor::{Rotor, RotorKind};
