//! # Thermodynamics Gateway
//!
//! The only suspension point of the engine: a capability that turns a duplex (optionally
//! carrying one mismatch) into enthalpy, entropy and a salt correction. Everything above
//! this module is written against [`ThermoGateway`], so designs can be computed against
//! the remote service ([`http::HttpThermoGateway`]) or the deterministic in-process
//! substitute ([`local::LocalThermoGateway`]).

pub mod http;
pub mod local;
pub mod parse;

use crate::core::sequence::is_valid_dna_sequence;
use crate::core::thermo::{ThermoIncrement, ThermoTableError};
use crate::core::variant::Mismatch;
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Invalid thermodynamics request: {0}")]
    InvalidRequest(String),

    #[error("Thermodynamics service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Thermodynamics service responded with HTTP status {status}")]
    Status { status: u16 },

    #[error("Thermodynamics response is missing the <{0}> field")]
    MissingField(&'static str),

    #[error("Thermodynamics response field <{field}> is not numeric: '{value}'")]
    NonNumericField { field: &'static str, value: String },

    #[error("Local thermodynamics lookup failed: {0}")]
    Thermo(#[from] ThermoTableError),
}

/// A duplex query: `sequence` against its complement, at the given strand concentrations (µM).
#[derive(Debug, Clone, PartialEq)]
pub struct ThermoRequest {
    pub sequence: String,
    pub concentration_um: f64,
    pub limiting_conc_um: f64,
    pub mismatch: Option<Mismatch>,
}

impl ThermoRequest {
    pub fn validate(&self) -> Result<(), GatewayError> {
        if !is_valid_dna_sequence(&self.sequence) {
            return Err(GatewayError::InvalidRequest(format!(
                "sequence '{}' is not valid DNA",
                self.sequence
            )));
        }
        for (name, value) in [
            ("concentration", self.concentration_um),
            ("limitingConc", self.limiting_conc_um),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(GatewayError::InvalidRequest(format!(
                    "{} must be a positive number of µM, got {}",
                    name, value
                )));
            }
        }
        if let Some(m) = &self.mismatch {
            if m.position >= self.sequence.len() {
                return Err(GatewayError::InvalidRequest(format!(
                    "mismatch position {} is outside a sequence of length {}",
                    m.position,
                    self.sequence.len()
                )));
            }
        }
        Ok(())
    }
}

/// Duplex thermodynamics as reported by a gateway.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThermoParams {
    /// kcal/mol
    pub dh: f64,
    /// cal/(mol·K)
    pub ds: f64,
    /// cal/(mol·K), added to the entropy term of the van't Hoff denominator.
    pub salt_correction: f64,
}

impl ThermoParams {
    pub fn increment(&self) -> ThermoIncrement {
        ThermoIncrement::new(self.dh, self.ds)
    }
}

/// Buffer composition used to derive the entropic salt correction, in mM.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SaltConditions {
    pub monovalent_mm: f64,
    pub magnesium_mm: f64,
    pub dntp_mm: f64,
}

impl Default for SaltConditions {
    fn default() -> Self {
        Self {
            monovalent_mm: 50.0,
            magnesium_mm: 3.0,
            dntp_mm: 0.8,
        }
    }
}

impl SaltConditions {
    /// Sodium-equivalent concentration in M; free Mg²⁺ counts as 120·√[Mg²⁺ − dNTP] mM.
    pub fn sodium_equivalent_molar(&self) -> f64 {
        let free_mg = (self.magnesium_mm - self.dntp_mm).max(0.0);
        (self.monovalent_mm + 120.0 * free_mg.sqrt()) / 1000.0
    }

    /// SantaLucia entropic salt correction for a duplex of `n_bp` base pairs.
    pub fn salt_correction(&self, n_bp: usize) -> f64 {
        let na = self.sodium_equivalent_molar();
        if na <= 0.0 || n_bp < 2 {
            return 0.0;
        }
        0.368 * (n_bp - 1) as f64 * na.ln()
    }
}

pub trait ThermoGateway {
    fn duplex_params(
        &self,
        request: &ThermoRequest,
    ) -> impl Future<Output = Result<ThermoParams, GatewayError>> + Send;
}

/// Runtime choice between the remote service and the local tables.
#[derive(Debug, Clone)]
pub enum GatewayBackend {
    Local(local::LocalThermoGateway),
    Http(http::HttpThermoGateway),
}

impl ThermoGateway for GatewayBackend {
    async fn duplex_params(&self, request: &ThermoRequest) -> Result<ThermoParams, GatewayError> {
        match self {
            GatewayBackend::Local(gateway) => gateway.duplex_params(request).await,
            GatewayBackend::Http(gateway) => gateway.duplex_params(request).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sequence::Nucleotide;

    fn request(sequence: &str) -> ThermoRequest {
        ThermoRequest {
            sequence: sequence.to_string(),
            concentration_um: 0.5,
            limiting_conc_um: 0.05,
            mismatch: None,
        }
    }

    #[test]
    fn validate_accepts_well_formed_requests() {
        assert!(request("ACGTACGT").validate().is_ok());
        let mut with_mm = request("ACGTACGT");
        with_mm.mismatch = Some(Mismatch::new(3, Nucleotide::A));
        assert!(with_mm.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_sequences_concentrations_and_positions() {
        assert!(request("acgt").validate().is_err());

        let mut zero_conc = request("ACGT");
        zero_conc.concentration_um = 0.0;
        assert!(matches!(zero_conc.validate(), Err(GatewayError::InvalidRequest(_))));

        let mut nan_limiting = request("ACGT");
        nan_limiting.limiting_conc_um = f64::NAN;
        assert!(nan_limiting.validate().is_err());

        let mut far_mm = request("ACGT");
        far_mm.mismatch = Some(Mismatch::new(4, Nucleotide::A));
        assert!(far_mm.validate().is_err());
    }

    #[test]
    fn sodium_equivalent_adds_free_magnesium() {
        let salt = SaltConditions {
            monovalent_mm: 50.0,
            magnesium_mm: 4.0,
            dntp_mm: 0.0,
        };
        assert!((salt.sodium_equivalent_molar() - 0.29).abs() < 1e-12);

        let chelated = SaltConditions {
            monovalent_mm: 50.0,
            magnesium_mm: 0.5,
            dntp_mm: 0.8,
        };
        assert!((chelated.sodium_equivalent_molar() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn salt_correction_scales_with_duplex_length() {
        let salt = SaltConditions::default();
        let short = salt.salt_correction(10);
        let long = salt.salt_correction(20);
        assert!(short < 0.0);
        assert!((long / short - 19.0 / 9.0).abs() < 1e-12);
        assert_eq!(salt.salt_correction(1), 0.0);
    }
}
