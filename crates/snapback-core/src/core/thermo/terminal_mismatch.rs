use super::{ThermoIncrement, ThermoTableError, normalize_nn_step};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Terminal mismatch motifs, SantaLucia & Peyret (2001) Patent Application WO 01/94611.
///
/// Each key `XY/ZW` prints the top strand 5′→3′ over the bottom strand 3′→5′. Every
/// canonical motif has a Watson–Crick pair in the first column and the mismatch in the
/// second; the same physical motif read from the other strand is its 180° rotation.
static CANONICAL_MOTIFS: [(&str, ThermoIncrement); 48] = [
    ("AA/TA", ThermoIncrement::new(-3.1, -7.8)),
    ("TA/AA", ThermoIncrement::new(-2.5, -6.3)),
    ("CA/GA", ThermoIncrement::new(-4.3, -10.7)),
    ("GA/CA", ThermoIncrement::new(-8.0, -22.5)),
    ("AC/TC", ThermoIncrement::new(-0.1, 0.5)),
    ("TC/AC", ThermoIncrement::new(-0.7, -1.3)),
    ("CC/GC", ThermoIncrement::new(-2.1, -5.1)),
    ("GC/CC", ThermoIncrement::new(-3.9, -10.6)),
    ("AG/TG", ThermoIncrement::new(-1.1, -2.1)),
    ("TG/AG", ThermoIncrement::new(-1.1, -2.7)),
    ("CG/GG", ThermoIncrement::new(-3.8, -9.5)),
    ("GG/CG", ThermoIncrement::new(-0.7, -19.2)),
    ("AT/TT", ThermoIncrement::new(-2.4, -6.5)),
    ("TT/AT", ThermoIncrement::new(-3.2, -8.9)),
    ("CT/GT", ThermoIncrement::new(-6.1, -16.9)),
    ("GT/CT", ThermoIncrement::new(-7.4, -21.2)),
    ("AA/TC", ThermoIncrement::new(-1.6, -4.0)),
    ("AC/TA", ThermoIncrement::new(-1.8, -3.8)),
    ("CA/GC", ThermoIncrement::new(-2.6, -5.9)),
    ("CC/GA", ThermoIncrement::new(-2.7, -6.0)),
    ("GA/CC", ThermoIncrement::new(-5.0, -13.8)),
    ("GC/CA", ThermoIncrement::new(-3.2, -7.1)),
    ("TA/AC", ThermoIncrement::new(-2.3, -5.9)),
    ("TC/AA", ThermoIncrement::new(-2.7, -7.0)),
    ("AC/TT", ThermoIncrement::new(-0.9, -1.7)),
    ("AT/TC", ThermoIncrement::new(-2.3, -6.3)),
    ("CC/GT", ThermoIncrement::new(-3.2, -8.0)),
    ("CT/GC", ThermoIncrement::new(-3.9, -10.6)),
    ("GC/CT", ThermoIncrement::new(-4.9, -13.5)),
    ("GT/CC", ThermoIncrement::new(-3.0, -7.8)),
    ("TC/AT", ThermoIncrement::new(-2.5, -6.3)),
    ("TT/AC", ThermoIncrement::new(-0.7, -1.2)),
    ("AA/TG", ThermoIncrement::new(-1.9, -4.4)),
    ("AG/TA", ThermoIncrement::new(-2.5, -5.9)),
    ("CA/GG", ThermoIncrement::new(-3.9, -9.6)),
    ("CG/GA", ThermoIncrement::new(-6.0, -15.5)),
    ("GA/CG", ThermoIncrement::new(-4.3, -11.1)),
    ("GG/CA", ThermoIncrement::new(-4.6, -11.4)),
    ("TA/AG", ThermoIncrement::new(-2.0, -4.7)),
    ("TG/AA", ThermoIncrement::new(-2.4, -5.8)),
    ("AG/TT", ThermoIncrement::new(-3.2, -8.7)),
    ("AT/TG", ThermoIncrement::new(-3.5, -9.4)),
    ("CG/GT", ThermoIncrement::new(-3.8, -9.0)),
    ("CT/GG", ThermoIncrement::new(-6.6, -18.7)),
    ("GG/CT", ThermoIncrement::new(-5.7, -15.9)),
    ("GT/CG", ThermoIncrement::new(-5.9, -16.1)),
    ("TG/AT", ThermoIncrement::new(-3.9, -10.5)),
    ("TT/AG", ThermoIncrement::new(-3.6, -9.8)),
];

/// `XY/ZW` read from the other strand: `WZ/YX`.
fn rotate_motif(key: &str) -> String {
    key.chars().rev().collect()
}

pub static TERMINAL_MISMATCHES: LazyLock<HashMap<String, ThermoIncrement>> = LazyLock::new(|| {
    let mut table = HashMap::with_capacity(CANONICAL_MOTIFS.len() * 2);
    for (key, params) in CANONICAL_MOTIFS {
        table.insert(key.to_string(), params);
        table.entry(rotate_motif(key)).or_insert(params);
    }
    table
});

pub fn build_terminal_mismatch_key(top2: &str, bottom2: &str) -> Result<String, ThermoTableError> {
    let top = normalize_nn_step(top2)?;
    let bottom = normalize_nn_step(bottom2)?;
    Ok(format!("{}/{}", top, bottom))
}

pub fn parse_terminal_mismatch_token(token: &str) -> Result<String, ThermoTableError> {
    let malformed = || ThermoTableError::MalformedToken(token.to_string());
    let (top, bottom) = token.trim().split_once('/').ok_or_else(malformed)?;
    build_terminal_mismatch_key(top, bottom).map_err(|_| malformed())
}

pub fn get_terminal_mismatch_params(
    top2: &str,
    bottom2: &str,
) -> Result<ThermoIncrement, ThermoTableError> {
    let key = build_terminal_mismatch_key(top2, bottom2)?;
    lookup(key)
}

pub fn get_terminal_mismatch_params_from_token(
    token: &str,
) -> Result<ThermoIncrement, ThermoTableError> {
    let key = parse_terminal_mismatch_token(token)?;
    lookup(key)
}

fn lookup(key: String) -> Result<ThermoIncrement, ThermoTableError> {
    TERMINAL_MISMATCHES
        .get(&key)
        .copied()
        .ok_or(ThermoTableError::NoTerminalMismatchEntry(key))
}
