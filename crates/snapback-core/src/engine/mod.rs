//! # Engine Module
//!
//! The stem-search machinery behind a snapback design. Every routine here is written
//! against the [`ThermoGateway`](crate::gateway::ThermoGateway) capability, so the same
//! code runs against the remote service or the local tables.
//!
//! ## Pipeline
//!
//! 1. **Orientation** ([`orientation`]) - Evaluates the minimal SNV-straddling stem on both
//!    strands and for both tail alleles, keeping the combination with the widest wild/variant
//!    Tm separation.
//! 2. **Stem growth** ([`stem`]) - Widens the stem one base at a time inside the region left
//!    free by the primers until the wild-type hairpin reaches the target Tm.
//! 3. **Assembly** ([`assembly`]) - Builds the tail and final primer sequences.
//! 4. **Reporting** ([`differences`]) - The strand × tail-allele matrix of Tm separations.
//!
//! Supporting modules hold the [`config`], the [`error`] taxonomy, input [`validation`] and
//! [`progress`] reporting.

pub mod assembly;
pub mod config;
pub mod differences;
pub mod error;
pub mod orientation;
pub mod progress;
pub mod stem;
pub mod validation;

#[cfg(test)]
pub(crate) mod fixtures {
    /// A 200-base synthetic amplicon; index 100 holds a G.
    pub const AMPLICON: &str = "TAGCAGGAACCCGGGCGTCTTCCACTGAGTGGCATGGAGCCCAAGTCAACGGTGTCAACCTCGAGGATGCCAAGTTATGACATACTACTATACAGGAGGAGCCTAGTGGTGACTGTGTATGGGGTACGGGTCACTTTGGTATTGGAGACTAGGACCGCGATGGAAAATTATGGTCGATTGCGGCTGGTAGTGATAGGCGA";
    pub const SNV_INDEX: usize = 100;
}
