//! Stream-level regression: configuration file + input file → output file.

use enigma::config::parse_machine;
use enigma::driver::process;
use enigma::EnigmaError;

const DEFAULT_CONF: &str = include_str!("fixtures/default.conf");
const TRIVIAL_IN: &str = include_str!("fixtures/trivial.in");
const TRIVIAL_OUT: &str = include_str!("fixtures/trivial.out");

fn run(conf: &str, input: &str) -> Result<String, EnigmaError> {
    let mut machine = parse_machine(conf)?;
    let mut out = Vec::new();
    process(&mut machine, input.as_bytes(), &mut out)?;
    Ok(String::from_utf8(out).expect("output is utf-8"))
}

#[test]
fn trivial_fixture_matches_expected_output() {
    assert_eq!(run(DEFAULT_CONF, TRIVIAL_IN).unwrap(), TRIVIAL_OUT);
}

#[test]
fn output_decrypts_back_to_input() {
    let settings = TRIVIAL_IN.lines().next().unwrap();
    let mut cipher_input = String::from(settings);
    cipher_input.push('\n');
    for line in TRIVIAL_OUT.lines().take(3) {
        cipher_input.push_str(line);
        cipher_input.push('\n');
    }
    let plain = run(DEFAULT_CONF, &cipher_input).unwrap();
    let plain: Vec<String> = plain
        .lines()
        .map(|l| l.chars().filter(|c| !c.is_whitespace()).collect())
        .collect();
    assert_eq!(
        plain,
        vec![
            "FROMHISSHOULDERHIAWATHA",
            "TOOKTHECAMERAOFROSEWOOD",
            "MADEOFSLIDINGFOLDINGROSEWOOD",
        ]
    );
}

#[test]
fn reflector_must_come_first() {
    let result = run(DEFAULT_CONF, "* Beta B III IV I AXLE\nHELLO\n");
    match result {
        Err(EnigmaError::Configuration(msg)) => assert_eq!(msg, "first rotor must be a reflector"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn wrong_setting_length_is_rejected() {
    assert!(matches!(
        run(DEFAULT_CONF, "* B Beta III IV I AXL\nHELLO\n"),
        Err(EnigmaError::Configuration(_))
    ));
}

#[test]
fn non_involutive_plugboard_is_rejected() {
    assert!(matches!(
        run(DEFAULT_CONF, "* B Beta III IV I AXLE (ABC)\nHELLO\n"),
        Err(EnigmaError::Configuration(_))
    ));
}

#[test]
fn truncated_configuration_is_rejected() {
    let conf = "ABCDEFGHIJKLMNOPQRSTUVWXYZ\n";
    assert!(matches!(
        run(conf, "* B Beta III IV I AXLE\n"),
        Err(EnigmaError::Configuration(_))
    ));
}

#[test]
fn non_alphabet_symbol_in_message_fails() {
    assert!(matches!(
        run(DEFAULT_CONF, "* B Beta III IV I AXLE\nHELLO, WORLD\n"),
        Err(EnigmaError::SymbolNotFound(','))
    ));
}
