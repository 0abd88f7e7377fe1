use super::terminal_mismatch::get_terminal_mismatch_params;
use super::{ThermoIncrement, ThermoTableError};
use crate::core::sequence::{Nucleotide, is_self_complementary, to_nucleotides};
use crate::core::variant::Mismatch;
use phf::{Map, phf_map};
use tracing::trace;

/// Watson–Crick nearest-neighbor steps keyed by the top strand read 5′→3′.
///
/// The Thermodynamics of DNA Structural Motifs, SantaLucia and Hicks, 2004.
/// Annu.Rev.Biophs.Biomol.Struct.33:415-40
pub static WATSON_CRICK_STEPS: Map<&'static str, ThermoIncrement> = phf_map! {
    "AA" => ThermoIncrement::new(-7.6, -21.3),
    "TT" => ThermoIncrement::new(-7.6, -21.3),
    "AT" => ThermoIncrement::new(-7.2, -20.4),
    "TA" => ThermoIncrement::new(-7.2, -21.3),
    "CA" => ThermoIncrement::new(-8.5, -22.7),
    "TG" => ThermoIncrement::new(-8.5, -22.7),
    "GT" => ThermoIncrement::new(-8.4, -22.4),
    "AC" => ThermoIncrement::new(-8.4, -22.4),
    "CT" => ThermoIncrement::new(-7.8, -21.0),
    "AG" => ThermoIncrement::new(-7.8, -21.0),
    "GA" => ThermoIncrement::new(-8.2, -22.2),
    "TC" => ThermoIncrement::new(-8.2, -22.2),
    "CG" => ThermoIncrement::new(-10.6, -27.2),
    "GC" => ThermoIncrement::new(-9.8, -24.4),
    "GG" => ThermoIncrement::new(-8.0, -19.9),
    "CC" => ThermoIncrement::new(-8.0, -19.9),
};

pub const INITIATION: ThermoIncrement = ThermoIncrement::new(0.2, -5.7);
pub const TERMINAL_AT_PENALTY: ThermoIncrement = ThermoIncrement::new(2.2, 6.9);
pub const SYMMETRY_CORRECTION: ThermoIncrement = ThermoIncrement::new(0.0, -1.4);

fn step_key(a: Nucleotide, b: Nucleotide) -> String {
    format!("{}{}", a, b)
}

/// Sums nearest-neighbor increments for `seq` paired with its complement.
///
/// With a mismatch, the partner strand pairs with `mismatch.base` at `mismatch.position`;
/// the two steps flanking that position are read from the terminal-mismatch table.
/// Mismatches on the first or last base are not modelled.
pub fn duplex_thermo(
    seq: &str,
    mismatch: Option<&Mismatch>,
) -> Result<ThermoIncrement, ThermoTableError> {
    let nts = to_nucleotides(seq)?;
    let len = nts.len();
    if len < 2 {
        return Err(ThermoTableError::DuplexTooShort(len));
    }

    if let Some(m) = mismatch {
        if m.position == 0 || m.position >= len - 1 {
            return Err(ThermoTableError::UnsupportedMismatchPosition {
                position: m.position,
                len,
            });
        }
    }
    let mismatch = mismatch.filter(|m| nts[m.position] != m.base);

    let partner = |j: usize| -> Nucleotide {
        match mismatch {
            Some(m) if m.position == j => m.base.complement(),
            _ => nts[j].complement(),
        }
    };

    let mut total = INITIATION;
    for end in [nts[0], nts[len - 1]] {
        if matches!(end, Nucleotide::A | Nucleotide::T) {
            total += TERMINAL_AT_PENALTY;
        }
    }

    for i in 0..len - 1 {
        let touches_mismatch = mismatch.is_some_and(|m| i + 1 == m.position || i == m.position);
        let increment = if touches_mismatch {
            get_terminal_mismatch_params(
                &step_key(nts[i], nts[i + 1]),
                &step_key(partner(i), partner(i + 1)),
            )?
        } else {
            let key = step_key(nts[i], nts[i + 1]);
            WATSON_CRICK_STEPS
                .get(key.as_str())
                .copied()
                .ok_or(ThermoTableError::InvalidStep(key))?
        };
        total += increment;
    }

    if mismatch.is_none() && is_self_complementary(seq)? {
        total += SYMMETRY_CORRECTION;
    }

    trace!(seq, dh = total.dh, ds = total.ds, "Summed duplex nearest-neighbor increments.");
    Ok(total)
}
