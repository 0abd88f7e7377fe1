use super::{ThermoIncrement, ThermoTableError, normalize_nn_step};
use phf::{Map, phf_map};
use std::fmt;
use std::str::FromStr;

/// Dangling-end increments, Bommarito et al. (2000), Nucl Acids Res 28: 1929-1934.
///
/// Keys read 5′→3′ along the strand carrying the unpaired base: for [`FIVE_PRIME`] the
/// first base dangles off the 5′ side of the paired second base; for [`THREE_PRIME`] the
/// second base dangles off the 3′ side of the paired first base.
pub static FIVE_PRIME: Map<&'static str, ThermoIncrement> = phf_map! {
    "AA" => ThermoIncrement::new(0.2, 2.3),
    "AC" => ThermoIncrement::new(-6.3, -17.1),
    "AG" => ThermoIncrement::new(-3.7, -10.0),
    "AT" => ThermoIncrement::new(-2.9, -7.6),
    "CA" => ThermoIncrement::new(0.6, 3.3),
    "CC" => ThermoIncrement::new(-4.4, -12.6),
    "CG" => ThermoIncrement::new(-4.0, -11.9),
    "CT" => ThermoIncrement::new(-4.1, -13.0),
    "GA" => ThermoIncrement::new(-1.1, -1.6),
    "GC" => ThermoIncrement::new(-5.1, -14.0),
    "GG" => ThermoIncrement::new(-3.9, -10.9),
    "GT" => ThermoIncrement::new(-4.2, -15.0),
    "TA" => ThermoIncrement::new(-6.9, -20.0),
    "TC" => ThermoIncrement::new(-4.0, -10.9),
    "TG" => ThermoIncrement::new(-4.9, -13.8),
    "TT" => ThermoIncrement::new(-0.2, -0.5),
};

pub static THREE_PRIME: Map<&'static str, ThermoIncrement> = phf_map! {
    "AA" => ThermoIncrement::new(-0.5, -1.1),
    "AC" => ThermoIncrement::new(4.7, 14.2),
    "AG" => ThermoIncrement::new(-4.1, -13.1),
    "AT" => ThermoIncrement::new(-3.8, -12.6),
    "CA" => ThermoIncrement::new(-5.9, -16.5),
    "CC" => ThermoIncrement::new(-2.6, -7.4),
    "CG" => ThermoIncrement::new(-3.2, -10.4),
    "CT" => ThermoIncrement::new(-5.2, -15.0),
    "GA" => ThermoIncrement::new(-2.1, -3.9),
    "GC" => ThermoIncrement::new(-0.2, -0.1),
    "GG" => ThermoIncrement::new(-3.9, -11.2),
    "GT" => ThermoIncrement::new(-4.4, -13.1),
    "TA" => ThermoIncrement::new(-0.7, -0.8),
    "TC" => ThermoIncrement::new(4.4, 14.9),
    "TG" => ThermoIncrement::new(-1.6, -3.6),
    "TT" => ThermoIncrement::new(2.9, 10.4),
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DanglingOrientation {
    FivePrime,
    ThreePrime,
}

impl DanglingOrientation {
    fn table(self) -> &'static Map<&'static str, ThermoIncrement> {
        match self {
            DanglingOrientation::FivePrime => &FIVE_PRIME,
            DanglingOrientation::ThreePrime => &THREE_PRIME,
        }
    }
}

impl fmt::Display for DanglingOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DanglingOrientation::FivePrime => write!(f, "fivePrime"),
            DanglingOrientation::ThreePrime => write!(f, "threePrime"),
        }
    }
}

impl FromStr for DanglingOrientation {
    type Err = ThermoTableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize_dangling_orientation(s)
    }
}

/// Accepts `5p`/`fivePrime` and `3p`/`threePrime` in any case, ignoring surrounding whitespace.
pub fn normalize_dangling_orientation(
    token: &str,
) -> Result<DanglingOrientation, ThermoTableError> {
    match token.trim().to_ascii_lowercase().as_str() {
        "5p" | "fiveprime" => Ok(DanglingOrientation::FivePrime),
        "3p" | "threeprime" => Ok(DanglingOrientation::ThreePrime),
        _ => Err(ThermoTableError::InvalidOrientation(token.to_string())),
    }
}

pub fn get_dangling_end_params(
    step: &str,
    orientation: &str,
) -> Result<ThermoIncrement, ThermoTableError> {
    let orientation = normalize_dangling_orientation(orientation)?;
    let step = normalize_nn_step(step)?;
    orientation
        .table()
        .get(step.as_str())
        .copied()
        .ok_or(ThermoTableError::InvalidStep(step))
}
