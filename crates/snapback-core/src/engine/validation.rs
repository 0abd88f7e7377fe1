//! Eager input checks shared by the orchestrator and the standalone engine steps.
//!
//! Each check names the offending field or value. The orchestrator runs them in a fixed
//! order so that the same error surfaces whenever several inputs are wrong at once.

use super::error::DesignError;
use super::stem::StemLocation;
use crate::core::constants::{MAX_AMPLICON_LEN, MIN_PRIMER_LEN, SNV_BASE_BUFFER};
use crate::core::sequence::{base_at, is_valid_dna_sequence};
use crate::core::variant::SnvSite;

pub fn validate_target_sequence(seq: &str) -> Result<(), DesignError> {
    if !is_valid_dna_sequence(seq) {
        return Err(DesignError::InvalidSequence(seq.to_string()));
    }
    if seq.len() > MAX_AMPLICON_LEN {
        return Err(DesignError::AmpliconTooLong {
            len: seq.len(),
            max: MAX_AMPLICON_LEN,
        });
    }
    Ok(())
}

pub fn validate_primer_lengths(
    primer_len: usize,
    comp_primer_len: usize,
    seq_len: usize,
) -> Result<(), DesignError> {
    for (field, value) in [("primerLen", primer_len), ("compPrimerLen", comp_primer_len)] {
        if value < MIN_PRIMER_LEN {
            return Err(DesignError::PrimerTooShort {
                field,
                value,
                min: MIN_PRIMER_LEN,
            });
        }
    }
    if primer_len + comp_primer_len >= seq_len {
        return Err(DesignError::PrimersExceedSequence {
            primer_len,
            comp_primer_len,
            len: seq_len,
        });
    }
    Ok(())
}

/// Rejects SNVs with fewer than [`SNV_BASE_BUFFER`] bases on either side.
pub fn check_snv_edge_distance(index: usize, len: usize) -> Result<(), DesignError> {
    if index < SNV_BASE_BUFFER || index + SNV_BASE_BUFFER >= len {
        return Err(DesignError::SnvTooCloseToEdge {
            index,
            len,
            buffer: SNV_BASE_BUFFER,
        });
    }
    Ok(())
}

/// Bounds, reference, sequence-edge and primer-footprint checks for an SNV on the target strand.
pub fn validate_snv_site(
    seq: &str,
    snv: &SnvSite,
    primer_len: usize,
    comp_primer_len: usize,
) -> Result<(), DesignError> {
    let len = seq.len();
    let reference = base_at(seq, snv.index).ok_or(DesignError::SnvOutOfBounds {
        index: snv.index,
        len,
    })?;
    if reference == snv.variant_base {
        return Err(DesignError::SnvMatchesReference {
            index: snv.index,
            base: snv.variant_base,
        });
    }
    check_snv_edge_distance(snv.index, len)?;

    let region_start = primer_len;
    let region_end = len.saturating_sub(comp_primer_len + 1);
    if snv.index < region_start + SNV_BASE_BUFFER || snv.index + SNV_BASE_BUFFER > region_end {
        return Err(DesignError::SnvTooCloseToPrimer {
            index: snv.index,
            region_start,
            region_end,
            buffer: SNV_BASE_BUFFER,
        });
    }
    Ok(())
}

pub fn validate_target_tm(target: f64) -> Result<(), DesignError> {
    if target.is_finite() && target > 0.0 {
        Ok(())
    } else {
        Err(DesignError::InvalidTargetTm(target))
    }
}

pub fn validate_stem(stem: &StemLocation, seq_len: usize) -> Result<(), DesignError> {
    let invalid = |reason: String| DesignError::InvalidStem {
        start: stem.start,
        end: stem.end,
        reason,
    };
    if stem.start > stem.end {
        return Err(invalid("start must not exceed end".to_string()));
    }
    if stem.end >= seq_len {
        return Err(invalid(format!(
            "end must lie inside a sequence of length {}",
            seq_len
        )));
    }
    Ok(())
}

pub fn validate_snv_in_stem(index: usize, stem: &StemLocation) -> Result<(), DesignError> {
    if stem.contains(index) {
        Ok(())
    } else {
        Err(DesignError::SnvOutsideStem {
            index,
            start: stem.start,
            end: stem.end,
        })
    }
}

/// A stem the hairpin solver can score: the SNV sits at least [`SNV_BASE_BUFFER`] bases
/// inside both ends.
pub fn validate_snv_buffer_in_stem(index: usize, stem: &StemLocation) -> Result<(), DesignError> {
    validate_snv_in_stem(index, stem)?;
    if index - stem.start < SNV_BASE_BUFFER || stem.end - index < SNV_BASE_BUFFER {
        return Err(DesignError::InvalidStem {
            start: stem.start,
            end: stem.end,
            reason: format!(
                "SNV at {} must be at least {} bases from both stem ends",
                index, SNV_BASE_BUFFER
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sequence::Nucleotide;

    fn seq(len: usize) -> String {
        "ACGT".repeat(len / 4 + 1)[..len].to_string()
    }

    #[test]
    fn amplicon_length_ceiling_is_inclusive() {
        assert!(validate_target_sequence(&seq(MAX_AMPLICON_LEN)).is_ok());
        let err = validate_target_sequence(&seq(MAX_AMPLICON_LEN + 1)).unwrap_err();
        assert!(err.to_string().contains("exceeds maximum allowed"));
    }

    #[test]
    fn invalid_or_empty_sequences_are_rejected() {
        for bad in ["", "acgt", "ACGT ", "ACGU"] {
            assert!(matches!(
                validate_target_sequence(bad),
                Err(DesignError::InvalidSequence(_))
            ));
        }
    }

    #[test]
    fn primer_lengths_need_minimums_and_must_leave_sequence() {
        assert!(matches!(
            validate_primer_lengths(11, 20, 100),
            Err(DesignError::PrimerTooShort { field: "primerLen", .. })
        ));
        assert!(matches!(
            validate_primer_lengths(20, 0, 100),
            Err(DesignError::PrimerTooShort { field: "compPrimerLen", .. })
        ));
        assert!(matches!(
            validate_primer_lengths(50, 50, 100),
            Err(DesignError::PrimersExceedSequence { .. })
        ));
        assert!(validate_primer_lengths(49, 50, 100).is_ok());
    }

    #[test]
    fn every_snv_near_a_primer_or_edge_is_too_close() {
        let s = seq(100);
        let (primer_len, comp_primer_len) = (20, 20);
        for index in 0..s.len() {
            let reference = base_at(&s, index).unwrap();
            let snv = SnvSite::new(index, reference.complement());
            let result = validate_snv_site(&s, &snv, primer_len, comp_primer_len);
            let allowed = index >= primer_len + SNV_BASE_BUFFER
                && index + SNV_BASE_BUFFER <= s.len() - comp_primer_len - 1;
            if allowed {
                assert!(result.is_ok(), "index {index}");
            } else {
                let err = result.unwrap_err();
                assert!(err.to_string().contains("too close"), "index {index}: {err}");
            }
        }
    }

    #[test]
    fn snv_bounds_and_reference_are_checked_first() {
        let s = seq(100);
        assert!(matches!(
            validate_snv_site(&s, &SnvSite::new(100, Nucleotide::A), 20, 20),
            Err(DesignError::SnvOutOfBounds { index: 100, len: 100 })
        ));
        assert!(matches!(
            validate_snv_site(&s, &SnvSite::new(2, Nucleotide::G), 20, 20),
            Err(DesignError::SnvMatchesReference { .. })
        ));
        assert!(matches!(
            validate_snv_site(&s, &SnvSite::new(2, Nucleotide::A), 20, 20),
            Err(DesignError::SnvTooCloseToEdge { .. })
        ));
    }

    #[test]
    fn target_tm_must_be_positive_and_finite() {
        assert!(validate_target_tm(60.0).is_ok());
        for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(validate_target_tm(bad), Err(DesignError::InvalidTargetTm(_))));
        }
    }

    #[test]
    fn stems_must_be_ordered_in_bounds_and_cover_the_snv() {
        assert!(validate_stem(&StemLocation::new(10, 20), 30).is_ok());
        assert!(validate_stem(&StemLocation::new(21, 20), 30).is_err());
        assert!(validate_stem(&StemLocation::new(10, 30), 30).is_err());
        let stem = StemLocation::new(10, 20);
        assert!(validate_snv_in_stem(10, &stem).is_ok());
        assert!(validate_snv_in_stem(20, &stem).is_ok());
        assert!(validate_snv_in_stem(21, &stem).is_err());
    }

    #[test]
    fn snv_needs_paired_bases_on_both_sides_of_the_stem() {
        let stem = StemLocation::new(10, 20);
        assert!(validate_snv_buffer_in_stem(14, &stem).is_ok());
        assert!(validate_snv_buffer_in_stem(16, &stem).is_ok());
        for index in [10, 13, 17, 20] {
            let err = validate_snv_buffer_in_stem(index, &stem).unwrap_err();
            let DesignError::InvalidStem { reason, .. } = &err else {
                panic!("{index}: {err}");
            };
            assert!(reason.contains("at least 4 bases"), "{index}: {reason}");
        }
        assert!(matches!(
            validate_snv_buffer_in_stem(21, &stem),
            Err(DesignError::SnvOutsideStem { .. })
        ));
    }
}
