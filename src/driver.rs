//! Message-stream processing.
//!
//! Reads lines from an input stream. Settings lines (starting with `*`)
//! reconfigure the machine; every other line is converted and written as
//! one output line. Machine state carries over from line to line until the
//! next settings line.

use std::io::{BufRead, Write};

use tracing::debug;

use crate::config::Settings;
use crate::error::{EnigmaError, Result};
use crate::machine::Machine;

/// Converts every message in `input` with `machine`, writing to `output`.
///
/// # Errors
/// - [`EnigmaError::Configuration`] if the first line is not a settings
///   line, or a settings line is invalid.
/// - Any conversion error for a message symbol.
/// - [`EnigmaError::Io`] on read or write failure.
///
/// # Examples
///
/// ```
/// let text = "ABCD\n 3 1\n R1 R (AB) (CD)\n F1 N (ABC)\n M1 MA (ACBD)\n";
/// let mut machine = enigma::config::parse_machine(text).unwrap();
///
/// let mut out = Vec::new();
/// enigma::driver::process(&mut machine, "* R1 F1 M1 AA\nABCDABCD\n".as_bytes(), &mut out).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap().trim_end().len(), 9);
/// ```
pub fn process<R: BufRead, W: Write>(machine: &mut Machine, input: R, mut output: W) -> Result<()> {
    let mut configured = false;
    for (number, line) in input.lines().enumerate() {
        let line = line?;
        if Settings::is_settings_line(&line) {
            Settings::parse(&line, machine.num_rotors())?.apply(machine)?;
            debug!(line = number + 1, "applied settings");
            configured = true;
        } else if !configured {
            return Err(EnigmaError::config("input must start with a settings line"));
        } else {
            writeln!(output, "{}", machine.convert_message(&line)?)?;
        }
    }
    if !configured {
        return Err(EnigmaError::config("input must start with a settings line"));
    }
    output.flush()?;
    Ok(())
}
