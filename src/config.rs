//! Text configuration: rotor catalog files and per-message settings lines.
//!
//! A configuration file looks like:
//!
//! ```text
//! ABCDEFGHIJKLMNOPQRSTUVWXYZ
//!  5 3
//!  I MQ      (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
//!  Beta N    (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
//!  B R       (AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP)
//!            (RX) (SZ) (TV)
//! ```
//!
//! Line 1 is the alphabet, then the number of rotor slots and pawls, then
//! rotor descriptions: a name, a type token (`M` + notches, `N` or `R`)
//! and the rotor's cycles. A settings line looks like:
//!
//! ```text
//! * B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::alphabet::Alphabet;
use crate::catalog::RotorCatalog;
use crate::error::{EnigmaError, Result};
use crate::machine::Machine;
use crate::permutation::Permutation;
use crate::rotor::Rotor;

/// Characters with a syntactic role that an alphabet may not contain.
const RESERVED: [char; 3] = ['(', ')', '*'];

/// Builds a [`Machine`] from the text of a configuration file.
///
/// # Errors
/// Returns [`EnigmaError::Configuration`] for a missing or invalid alphabet,
/// bad slot or pawl counts, and malformed, duplicated or inconsistent rotor
/// descriptions; [`EnigmaError::SymbolNotFound`] for cycle or notch symbols
/// outside the alphabet.
///
/// # Examples
///
/// ```
/// let text = "ABCD\n 3 1\n R1 R (AB) (CD)\n F1 N (ABC)\n M1 MA (ACBD)\n";
/// let mut machine = enigma::config::parse_machine(text).unwrap();
/// assert_eq!(machine.num_rotors(), 3);
/// assert_eq!(machine.catalog().len(), 3);
///
/// let settings = enigma::config::Settings::parse("* R1 F1 M1 AA", 3).unwrap();
/// settings.apply(&mut machine).unwrap();
/// assert_eq!(machine.slot_settings(), vec![Some(0), Some(0), Some(0)]);
/// ```
pub fn parse_machine(text: &str) -> Result<Machine> {
    let (first, rest) = text.split_once('\n').unwrap_or((text, ""));
    let alphabet = Arc::new(parse_alphabet(first.trim())?);

    let mut tokens = rest.split_whitespace().peekable();
    let num_rotors = parse_count(tokens.next(), "rotor slots")?;
    let pawls = parse_count(tokens.next(), "pawls")?;

    let mut catalog = RotorCatalog::new();
    while let Some(name) = tokens.next() {
        let kind = tokens
            .next()
            .ok_or_else(|| EnigmaError::config(format!("bad rotor description for {name}")))?;
        let mut cycles = String::new();
        while let Some(token) = tokens.next_if(|t| t.starts_with('(')) {
            if !token.ends_with(')') {
                return Err(EnigmaError::config(format!(
                    "unclosed cycle \"{token}\" in rotor {name}"
                )));
            }
            cycles.push_str(token);
            cycles.push(' ');
        }
        let rotor = build_rotor(name, kind, &cycles, &alphabet)?;
        if catalog.find(name).is_some() {
            return Err(EnigmaError::config(format!("rotor {name} defined twice")));
        }
        catalog.add(rotor);
    }

    debug!(
        alphabet = alphabet.size(),
        num_rotors,
        pawls,
        rotors = catalog.len(),
        "parsed configuration"
    );
    Machine::new(alphabet, num_rotors, pawls, catalog)
}

fn parse_alphabet(line: &str) -> Result<Alphabet> {
    if line.is_empty() {
        return Err(EnigmaError::config("configuration file truncated"));
    }
    if let Some(c) = line
        .chars()
        .find(|c| c.is_whitespace() || RESERVED.contains(c))
    {
        return Err(EnigmaError::config(format!(
            "alphabet may not contain '{c}'"
        )));
    }
    Alphabet::new(line)
}

fn parse_count(token: Option<&str>, what: &str) -> Result<usize> {
    let token = token.ok_or_else(|| EnigmaError::config("configuration file truncated"))?;
    token
        .parse()
        .map_err(|_| EnigmaError::config(format!("bad number of {what}: \"{token}\"")))
}

fn build_rotor(name: &str, kind: &str, cycles: &str, alphabet: &Arc<Alphabet>) -> Result<Rotor> {
    let perm = Permutation::parse(cycles, alphabet.clone())?;
    let mut chars = kind.chars();
    let type_char = chars.next();
    let notches = chars.as_str();
    match type_char {
        Some('M') => Rotor::moving(name, perm, notches),
        Some('N') if notches.is_empty() => Ok(Rotor::fixed(name, perm)),
        Some('R') if notches.is_empty() => {
            if !perm.is_derangement() {
                return Err(EnigmaError::config(format!(
                    "reflector {name} leaves a character out of its cycles"
                )));
            }
            Ok(Rotor::reflector(name, perm))
        }
        Some('N' | 'R') => Err(EnigmaError::config(format!(
            "only moving rotors have notches, rotor {name} has \"{notches}\""
        ))),
        _ => Err(EnigmaError::config(format!(
            "rotor type \"{kind}\" of rotor {name} unreadable"
        ))),
    }
}

/// A parsed settings line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Rotor names, reflector first.
    pub rotors: Vec<String>,
    /// One setting symbol per non-reflector rotor, left to right.
    pub positions: String,
    /// Plugboard cycles, possibly empty.
    pub plugboard: String,
}

impl Settings {
    /// Returns true if `line` is a settings line rather than a message.
    pub fn is_settings_line(line: &str) -> bool {
        line.trim_start().starts_with('*')
    }

    /// Parses a settings line for a machine with `num_rotors` slots.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Configuration`] if the line does not start
    /// with `*`, names the wrong number of rotors, or has a setting string
    /// of the wrong length.
    pub fn parse(line: &str, num_rotors: usize) -> Result<Self> {
        let body = line
            .trim()
            .strip_prefix('*')
            .ok_or_else(|| EnigmaError::config("no rotors in machine"))?;
        let (head, plugboard) = match body.find('(') {
            Some(at) => (&body[..at], body[at..].trim()),
            None => (body, ""),
        };

        let mut words: Vec<&str> = head.split_whitespace().collect();
        let positions = words
            .pop()
            .ok_or_else(|| EnigmaError::config("settings line names no rotors"))?;
        if positions.chars().count() != num_rotors.saturating_sub(1) {
            return Err(EnigmaError::config(format!(
                "setting \"{positions}\" must have {} characters",
                num_rotors.saturating_sub(1)
            )));
        }
        if words.len() != num_rotors {
            return Err(EnigmaError::config(format!(
                "expected {num_rotors} rotor names, got {}",
                words.len()
            )));
        }

        Ok(Settings {
            rotors: words.into_iter().map(String::from).collect(),
            positions: positions.to_string(),
            plugboard: plugboard.to_string(),
        })
    }

    /// Configures `machine` with these settings.
    ///
    /// The machine is left unchanged on error.
    ///
    /// # Errors
    /// Anything [`Permutation::parse`] or [`Machine::configure`] reports.
    pub fn apply(&self, machine: &mut Machine) -> Result<()> {
        let plugboard = Permutation::parse(&self.plugboard, machine.alphabet().clone())?;
        machine.configure(&self.rotors, &self.positions, plugboard)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const SMALL: &str = "ABCD\n 3 1\n R1 R (AB) (CD)\n F1 N (ABC)\n M1 MAC (ACBD)\n";

    #[test]
    fn test_parse_small_machine() {
        let machine = parse_machine(SMALL).unwrap();
        assert_eq!(machine.alphabet().symbols(), &['A', 'B', 'C', 'D']);
        assert_eq!(machine.num_rotors(), 3);
        assert_eq!(machine.num_pawls(), 1);
        let names: Vec<&str> = machine.catalog().iter().map(|(_, r)| r.name()).collect();
        assert_eq!(names, vec!["R1", "F1", "M1"]);
        let (_, m1) = machine.catalog().iter().nth(2).unwrap();
        assert!(m1.rotates());
    }

    #[test]
    fn test_cycles_may_span_lines() {
        let text = "ABCD\n3 1\nR1 R (AB)\n    (CD)\nF1 N\nM1 MA (AC)(BD)\n";
        let machine = parse_machine(text).unwrap();
        let (_, r1) = machine.catalog().iter().next().unwrap();
        assert_eq!(r1.permutation().to_string(), "(AB) (CD)");
        let (_, f1) = machine.catalog().iter().nth(1).unwrap();
        assert!(f1.permutation().cycles().is_empty());
    }

    #[test]
    fn test_reflector_with_explicit_singletons() {
        let machine = parse_machine("ABCD\n2 1\nR1 R (AB) (C) (D)\nM1 MA (AC)\n").unwrap();
        let (_, r1) = machine.catalog().iter().next().unwrap();
        assert!(r1.reflecting());
        assert_eq!(r1.permutation().to_string(), "(AB) (C) (D)");
    }

    #[rstest]
    #[case::empty("")]
    #[case::reserved_in_alphabet("AB(D\n3 1\n")]
    #[case::duplicate_in_alphabet("ABCA\n3 1\n")]
    #[case::missing_counts("ABCD\n")]
    #[case::missing_pawls("ABCD\n3\n")]
    #[case::bad_count("ABCD\nthree 1\n")]
    #[case::zero_pawls("ABCD\n3 0\n")]
    #[case::truncated_rotor("ABCD\n3 1\nR1\n")]
    #[case::unclosed_cycle("ABCD\n3 1\nR1 R (AB (CD)\n")]
    #[case::unknown_type("ABCD\n3 1\nX1 Q (AB)\n")]
    #[case::fixed_with_notch("ABCD\n3 1\nF1 NA (AB)\n")]
    #[case::reflector_fixed_point("ABCD\n3 1\nR1 R (ABC)\n")]
    #[case::duplicate_rotor("ABCD\n3 1\nF1 N\nf1 N\n")]
    #[case::huge_slot_count("AB\n18446744073709551615 1\n")]
    #[case::more_slots_than_rotors("ABCD\n4 1\nR1 R (AB) (CD)\nF1 N\nM1 MA (AC)\n")]
    fn test_parse_machine_rejects(#[case] text: &str) {
        assert!(matches!(parse_machine(text), Err(EnigmaError::Configuration(_))));
    }

    #[test]
    fn test_parse_machine_rejects_foreign_notch() {
        assert!(matches!(
            parse_machine("ABCD\n3 1\nM1 MZ (AB)\n"),
            Err(EnigmaError::SymbolNotFound('Z'))
        ));
    }

    #[test]
    fn test_settings_parse() {
        let s = Settings::parse("* B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)", 5).unwrap();
        assert_eq!(s.rotors, vec!["B", "Beta", "III", "IV", "I"]);
        assert_eq!(s.positions, "AXLE");
        assert_eq!(s.plugboard, "(HQ) (EX) (IP) (TR) (BY)");

        let s = Settings::parse("  *B Beta III IV I AXLE", 5).unwrap();
        assert_eq!(s.rotors[0], "B");
        assert!(s.plugboard.is_empty());
    }

    #[rstest]
    #[case::no_star("B Beta III IV I AXLE")]
    #[case::empty_star("*")]
    #[case::short_setting("* B Beta III IV I AXL")]
    #[case::too_few_rotors("* B Beta III IV AXLE")]
    #[case::too_many_rotors("* B Beta III IV I V AXLE")]
    fn test_settings_parse_rejects(#[case] line: &str) {
        assert!(matches!(Settings::parse(line, 5), Err(EnigmaError::Configuration(_))));
    }

    #[rstest]
    #[case::star("* B Beta", true)]
    #[case::indented_star("   * B", true)]
    #[case::message("HELLO WORLD", false)]
    #[case::blank("", false)]
    fn test_is_settings_line(#[case] line: &str, #[case] expected: bool) {
        assert_eq!(Settings::is_settings_line(line), expected);
    }

    #[test]
    fn test_apply_sets_machine() {
        let mut machine = parse_machine(SMALL).unwrap();
        Settings::parse("* r1 f1 m1 BC (AD)", 3)
            .unwrap()
            .apply(&mut machine)
            .unwrap();
        assert_eq!(machine.slot_settings(), vec![Some(0), Some(1), Some(2)]);
        assert_eq!(machine.plugboard().to_string(), "(AD)");
    }

    #[rstest]
    #[case::reflector_not_first("* F1 R1 M1 AA")]
    #[case::unknown_rotor("* R1 F2 M1 AA")]
    #[case::long_plugboard_cycle("* R1 F1 M1 AA (ABC)")]
    fn test_apply_rejects_and_keeps_state(#[case] line: &str) {
        let mut machine = parse_machine(SMALL).unwrap();
        Settings::parse("* R1 F1 M1 BC", 3)
            .unwrap()
            .apply(&mut machine)
            .unwrap();
        let result = Settings::parse(line, 3).unwrap().apply(&mut machine);
        assert!(matches!(result, Err(EnigmaError::Configuration(_))));
        assert_eq!(machine.slot_settings(), vec![Some(0), Some(1), Some(2)]);
    }
}
