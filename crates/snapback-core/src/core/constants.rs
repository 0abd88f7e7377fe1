/// Shortest primer (either orientation) the engine will design around.
pub const MIN_PRIMER_LEN: usize = 12;

/// Longest amplicon accepted by the designer.
pub const MAX_AMPLICON_LEN: usize = 1000;

/// Minimum number of paired bases required on each side of the SNV inside the stem.
pub const SNV_BASE_BUFFER: usize = 4;

/// Shortest hairpin loop accepted by the snapback Tm calculator.
pub const MIN_LOOP_LEN: usize = 6;

/// Mismatched bases at the 5′ end of the tail that block extension of the hairpin.
pub const END_MISMATCH_LEN: usize = 2;

/// Mismatched bases between the stem and the primer that pin the loop-side stem end.
pub const INNER_LOOP_MISMATCH_LEN: usize = 2;

/// Strand concentration (µM) used for unimolecular hairpins; 1 M cancels the
/// concentration term of the van't Hoff equation.
pub const UNIMOLECULAR_REFERENCE_CONC_UM: f64 = 1_000_000.0;
