use super::config::ConfigError;
use crate::core::melting::MeltingTempError;
use crate::core::sequence::{Nucleotide, SequenceError};
use crate::core::variant::VariantError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DesignError {
    #[error("Invalid target sequence '{0}': expected uppercase A, C, G and T only")]
    InvalidSequence(String),

    #[error("Amplicon length {len} exceeds maximum allowed length of {max}")]
    AmpliconTooLong { len: usize, max: usize },

    #[error("{field} must be at least {min} bases, got {value}")]
    PrimerTooShort {
        field: &'static str,
        value: usize,
        min: usize,
    },

    #[error(
        "Primer lengths {primer_len} + {comp_primer_len} must sum to less than the length {len}"
    )]
    PrimersExceedSequence {
        primer_len: usize,
        comp_primer_len: usize,
        len: usize,
    },

    #[error("SNV index {index} is out of bounds for a sequence of length {len}")]
    SnvOutOfBounds { index: usize, len: usize },

    #[error("SNV variant base {base} at index {index} is the reference base")]
    SnvMatchesReference { index: usize, base: Nucleotide },

    #[error(
        "SNV index {index} is too close to an end of the {len}-base sequence (buffer {buffer})"
    )]
    SnvTooCloseToEdge {
        index: usize,
        len: usize,
        buffer: usize,
    },

    #[error(
        "SNV {index} is too close to a primer (free {region_start}..={region_end}, buffer {buffer})"
    )]
    SnvTooCloseToPrimer {
        index: usize,
        region_start: usize,
        region_end: usize,
        buffer: usize,
    },

    #[error("Target snapback melting temperature must be a positive, finite number, got {0}")]
    InvalidTargetTm(f64),

    #[error("Invalid stem location {start}..={end}: {reason}")]
    InvalidStem {
        start: usize,
        end: usize,
        reason: String,
    },

    #[error("SNV index {index} lies outside the stem {start}..={end}")]
    SnvOutsideStem {
        index: usize,
        start: usize,
        end: usize,
    },

    #[error(
        "Tail base {base} pairs with neither reference {reference} nor variant {variant}"
    )]
    TailBaseMismatch {
        base: Nucleotide,
        reference: Nucleotide,
        variant: Nucleotide,
    },

    #[error(
        "Could not meet minimum snapback melting temperature {target:.2} °C; best {best_tm:.2} °C"
    )]
    StemTmUnreachable { target: f64, best_tm: f64 },

    #[error("Melting temperature calculation failed: {0}")]
    MeltingTemp(#[from] MeltingTempError),

    #[error(transparent)]
    Variant(#[from] VariantError),

    #[error(transparent)]
    Sequence(#[from] SequenceError),

    #[error("Invalid design configuration: {0}")]
    Config(#[from] ConfigError),
}

impl DesignError {
    /// Malformed or out-of-range inputs, detected before any thermodynamics run.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            DesignError::InvalidSequence(_)
                | DesignError::AmpliconTooLong { .. }
                | DesignError::PrimerTooShort { .. }
                | DesignError::PrimersExceedSequence { .. }
                | DesignError::SnvOutOfBounds { .. }
                | DesignError::SnvMatchesReference { .. }
                | DesignError::SnvTooCloseToEdge { .. }
                | DesignError::SnvTooCloseToPrimer { .. }
                | DesignError::InvalidTargetTm(_)
                | DesignError::InvalidStem { .. }
                | DesignError::SnvOutsideStem { .. }
                | DesignError::TailBaseMismatch { .. }
                | DesignError::Variant(_)
                | DesignError::Sequence(_)
                | DesignError::Config(_)
                | DesignError::MeltingTemp(
                    MeltingTempError::InvalidConcentration { .. }
                        | MeltingTempError::MissingConcentration
                        | MeltingTempError::LoopTooShort { .. }
                        | MeltingTempError::MismatchTooCloseToStemEnd { .. }
                        | MeltingTempError::Sequence(_)
                        | MeltingTempError::Thermo(_)
                )
        )
    }

    /// Non-physical results of the van't Hoff solver.
    pub fn is_numerical_error(&self) -> bool {
        matches!(
            self,
            DesignError::MeltingTemp(
                MeltingTempError::InfiniteTm
                    | MeltingTempError::BelowAbsoluteZero { .. }
                    | MeltingTempError::NonFiniteParameter { .. }
            )
        )
    }

    /// The stem search ran out of room before reaching the target Tm.
    pub fn is_convergence_failure(&self) -> bool {
        matches!(self, DesignError::StemTmUnreachable { .. })
    }

    pub fn is_gateway_error(&self) -> bool {
        matches!(self, DesignError::MeltingTemp(MeltingTempError::Gateway(_)))
    }
}
