use super::constants::{MIN_LOOP_LEN, SNV_BASE_BUFFER, UNIMOLECULAR_REFERENCE_CONC_UM};
use super::sequence::{SequenceError, is_self_complementary, is_valid_dna_sequence};
use super::thermo::hairpin_loop::HairpinLoopModel;
use super::thermo::nearest_neighbor::duplex_thermo;
use super::thermo::ThermoTableError;
use super::variant::Mismatch;
use crate::gateway::{GatewayError, ThermoGateway, ThermoRequest};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Molar gas constant in cal/(mol·K).
pub const GAS_CONSTANT: f64 = 1.98720425864;
const ZERO_CELSIUS_IN_KELVIN: f64 = 273.15;
const MIN_DENOMINATOR: f64 = 1e-9;

#[derive(Debug, Error)]
pub enum MeltingTempError {
    #[error("Thermodynamic parameter {name} must be finite, got {value}")]
    NonFiniteParameter { name: &'static str, value: f64 },

    #[error("Concentration {name} must be a positive, finite number of µM, got {value}")]
    InvalidConcentration { name: &'static str, value: f64 },

    #[error("A second strand concentration is required for non-self-complementary duplexes")]
    MissingConcentration,

    #[error("Melting temperature is infinite: the entropy terms cancel")]
    InfiniteTm,

    #[error("Computed melting temperature of {kelvin:.2} K is at or below absolute zero")]
    BelowAbsoluteZero { kelvin: f64 },

    #[error("Hairpin loop of {loop_len} bases is shorter than the minimum of {min}")]
    LoopTooShort { loop_len: usize, min: usize },

    #[error(
        "Mismatch at position {position} needs {buffer} bases to each end of a {stem_len}-base stem"
    )]
    MismatchTooCloseToStemEnd {
        position: usize,
        stem_len: usize,
        buffer: usize,
    },

    #[error(transparent)]
    Sequence(#[from] SequenceError),

    #[error(transparent)]
    Thermo(#[from] ThermoTableError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Strand concentrations in µM for bimolecular duplexes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrandConcentrations {
    /// The excess primer (the snapback primer in asymmetric PCR).
    pub primer_um: f64,
    /// The limiting primer.
    pub limiting_primer_um: f64,
}

impl Default for StrandConcentrations {
    fn default() -> Self {
        Self {
            primer_um: 0.5,
            limiting_primer_um: 0.05,
        }
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn check_concentration(name: &'static str, value: f64) -> Result<f64, MeltingTempError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(MeltingTempError::InvalidConcentration { name, value })
    }
}

/// Effective strand concentration C_T in M.
///
/// Self-complementary duplexes use `conc_a` directly. Equal concentrations give
/// (A+B)/4; otherwise the excess strand dominates and C_T = max − min/2.
pub fn effective_strand_conc_molar(
    conc_a: f64,
    conc_b: Option<f64>,
    self_complementary: bool,
) -> Result<f64, MeltingTempError> {
    let a = check_concentration("conc_a", conc_a)?;
    let micromolar = if self_complementary {
        a
    } else {
        let b = check_concentration(
            "conc_b",
            conc_b.ok_or(MeltingTempError::MissingConcentration)?,
        )?;
        if a == b {
            (a + b) / 4.0
        } else {
            a.max(b) - a.min(b) / 2.0
        }
    };
    Ok(micromolar * 1e-6)
}

/// Two-state van't Hoff melting temperature in °C, rounded to two decimals.
///
/// `sum_dh` is in kcal/mol; `sum_ds` and `salt_correction` are in cal/(mol·K).
pub fn calculate_tm(
    sum_dh: f64,
    sum_ds: f64,
    conc_a: f64,
    conc_b: Option<f64>,
    self_complementary: bool,
    salt_correction: f64,
) -> Result<f64, MeltingTempError> {
    for (name, value) in [
        ("sum_dh", sum_dh),
        ("sum_ds", sum_ds),
        ("salt_correction", salt_correction),
    ] {
        if !value.is_finite() {
            return Err(MeltingTempError::NonFiniteParameter { name, value });
        }
    }
    let ct = effective_strand_conc_molar(conc_a, conc_b, self_complementary)?;

    let denominator = sum_ds + salt_correction + GAS_CONSTANT * ct.ln();
    if denominator.abs() < MIN_DENOMINATOR {
        return Err(MeltingTempError::InfiniteTm);
    }
    let kelvin = sum_dh * 1000.0 / denominator;
    if !kelvin.is_finite() {
        return Err(MeltingTempError::InfiniteTm);
    }
    if kelvin <= 0.0 {
        return Err(MeltingTempError::BelowAbsoluteZero { kelvin });
    }
    Ok(round_to(kelvin - ZERO_CELSIUS_IN_KELVIN, 2))
}

fn check_hairpin_geometry(
    stem_seq: &str,
    loop_len: usize,
    mismatch: Option<&Mismatch>,
) -> Result<(), MeltingTempError> {
    if !is_valid_dna_sequence(stem_seq) {
        return Err(SequenceError::InvalidDna(stem_seq.to_string()).into());
    }
    if loop_len < MIN_LOOP_LEN {
        return Err(MeltingTempError::LoopTooShort {
            loop_len,
            min: MIN_LOOP_LEN,
        });
    }
    if let Some(m) = mismatch {
        let stem_len = stem_seq.len();
        if m.position < SNV_BASE_BUFFER || m.position + SNV_BASE_BUFFER >= stem_len {
            return Err(MeltingTempError::MismatchTooCloseToStemEnd {
                position: m.position,
                stem_len,
                buffer: SNV_BASE_BUFFER,
            });
        }
    }
    Ok(())
}

fn unimolecular_tm(
    sum_dh: f64,
    sum_ds: f64,
    salt_correction: f64,
) -> Result<f64, MeltingTempError> {
    calculate_tm(
        sum_dh,
        sum_ds,
        UNIMOLECULAR_REFERENCE_CONC_UM,
        None,
        true,
        salt_correction,
    )
}

/// Hairpin Tm from the local nearest-neighbor tables only, without salt correction.
///
/// `stem_seq` is one strand of the stem read 5′→3′; the hairpin closes over a loop of
/// `loop_len` unpaired bases described by `model`.
pub fn calculate_snapback_tm_wittwer(
    stem_seq: &str,
    loop_len: usize,
    mismatch: Option<&Mismatch>,
    model: HairpinLoopModel,
) -> Result<f64, MeltingTempError> {
    check_hairpin_geometry(stem_seq, loop_len, mismatch)?;
    let total = duplex_thermo(stem_seq, mismatch)? + model.params(loop_len)?;
    unimolecular_tm(total.dh, total.ds, 0.0)
}

/// Bimolecular duplex Tm of `sequence` against its complement, via the gateway.
pub async fn get_stem_tm<G: ThermoGateway>(
    gateway: &G,
    sequence: &str,
    mismatch: Option<&Mismatch>,
    concentrations: StrandConcentrations,
) -> Result<f64, MeltingTempError> {
    let self_complementary = is_self_complementary(sequence)?;
    let request = ThermoRequest {
        sequence: sequence.to_string(),
        concentration_um: concentrations.primer_um,
        limiting_conc_um: concentrations.limiting_primer_um,
        mismatch: mismatch.copied(),
    };
    let params = gateway.duplex_params(&request).await?;
    calculate_tm(
        params.dh,
        params.ds,
        concentrations.primer_um,
        Some(concentrations.limiting_primer_um),
        self_complementary,
        params.salt_correction,
    )
}

/// Hairpin Tm with the stem priced by the gateway (salt-corrected) and the loop by `model`.
pub async fn calculate_snapback_tm<G: ThermoGateway>(
    gateway: &G,
    stem_seq: &str,
    loop_len: usize,
    mismatch: Option<&Mismatch>,
    model: HairpinLoopModel,
    concentrations: StrandConcentrations,
) -> Result<f64, MeltingTempError> {
    check_hairpin_geometry(stem_seq, loop_len, mismatch)?;
    let request = ThermoRequest {
        sequence: stem_seq.to_string(),
        concentration_um: concentrations.primer_um,
        limiting_conc_um: concentrations.limiting_primer_um,
        mismatch: mismatch.copied(),
    };
    let stem = gateway.duplex_params(&request).await?;
    let total = stem.increment() + model.params(loop_len)?;
    let tm = unimolecular_tm(total.dh, total.ds, stem.salt_correction)?;
    debug!(stem_seq, loop_len, %model, tm, "Computed snapback hairpin Tm.");
    Ok(tm)
}
