//! # Thermodynamic Parameter Tables
//!
//! Literal nearest-neighbor reference data for DNA, kept as immutable statics that are
//! built once per process. Lookup keys are normalized by small pure functions so that
//! table content and key handling can be tested independently.
//!
//! - [`nearest_neighbor`] - Watson–Crick duplex steps and the local duplex summation
//! - [`dangling`] - 5′ and 3′ dangling-end increments
//! - [`terminal_mismatch`] - 2×2 terminal-mismatch motifs in both printed orientations
//! - [`hairpin_loop`] - Rochester and SantaLucia–Hicks hairpin-loop models
//!
//! All enthalpies are in kcal/mol and all entropies in cal/(mol·K).

pub mod dangling;
pub mod hairpin_loop;
pub mod nearest_neighbor;
pub mod terminal_mismatch;

use crate::core::sequence::SequenceError;
use serde::Serialize;
use std::ops::{Add, AddAssign};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ThermoTableError {
    #[error("Invalid nearest-neighbor step '{0}': expected exactly two A/C/G/T characters")]
    InvalidStep(String),
    #[error(
        "Invalid dangling-end orientation '{0}': expected '5p', 'fivePrime', '3p' or 'threePrime'"
    )]
    InvalidOrientation(String),
    #[error("Malformed terminal-mismatch token '{0}': expected 'XY/ZW'")]
    MalformedToken(String),
    #[error("No terminal-mismatch entry for motif '{0}'")]
    NoTerminalMismatchEntry(String),
    #[error("Invalid hairpin loop size {0}: loops must contain at least 3 bases")]
    InvalidLoopSize(usize),
    #[error("Mismatch at position {position} cannot be modelled in a duplex of length {len}")]
    UnsupportedMismatchPosition { position: usize, len: usize },
    #[error("A duplex needs at least two base pairs, got {0}")]
    DuplexTooShort(usize),
    #[error(transparent)]
    Sequence(#[from] SequenceError),
}

/// An enthalpy/entropy pair contributed by one structural motif.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct ThermoIncrement {
    /// Enthalpy change in kcal/mol.
    pub dh: f64,
    /// Entropy change in cal/(mol·K).
    pub ds: f64,
}

impl ThermoIncrement {
    pub const fn new(dh: f64, ds: f64) -> Self {
        Self { dh, ds }
    }

    pub fn is_finite(&self) -> bool {
        self.dh.is_finite() && self.ds.is_finite()
    }
}

impl Add for ThermoIncrement {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.dh + rhs.dh, self.ds + rhs.ds)
    }
}

impl AddAssign for ThermoIncrement {
    fn add_assign(&mut self, rhs: Self) {
        self.dh += rhs.dh;
        self.ds += rhs.ds;
    }
}

/// Validates a dinucleotide step and returns it uppercased.
pub fn normalize_nn_step(step: &str) -> Result<String, ThermoTableError> {
    let upper = step.to_ascii_uppercase();
    let valid = upper.len() == 2 && upper.bytes().all(|b| matches!(b, b'A' | b'C' | b'G' | b'T'));
    if valid {
        Ok(upper)
    } else {
        Err(ThermoTableError::InvalidStep(step.to_string()))
    }
}
