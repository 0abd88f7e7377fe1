use super::error::DesignError;
use super::stem::StemLocation;
use super::validation::{
    validate_primer_lengths, validate_snv_in_stem, validate_stem, validate_target_sequence,
};
use crate::core::constants::{END_MISMATCH_LEN, INNER_LOOP_MISMATCH_LEN};
use crate::core::sequence::{Nucleotide, reverse_complement, to_nucleotides};
use crate::core::variant::SnvSite;
use serde::Serialize;

/// The snapback primer split into its functional parts, each read 5′→3′.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapbackSegments {
    pub inner_loop_mismatches: String,
    pub stem: String,
    pub terminal_mismatches: String,
    pub primer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapbackAssembly {
    pub snapback_seq: String,
    pub limiting_primer_seq: String,
    pub segments: SnapbackSegments,
}

/// Assembles the snapback primer for a stem on the tailed strand.
///
/// `strand_seq` is read from the tailed primer's side; `primer_len` is the tailed primer and
/// `comp_primer_len` the limiting one. The 5′ tail is, in order: the terminal blocking
/// mismatches, the stem complement carrying `tail_base_at_snv`, and the inner-loop mismatches.
/// Mismatch positions repeat the strand's own base so they never pair.
pub fn build_final_snapback(
    strand_seq: &str,
    snv: &SnvSite,
    primer_len: usize,
    comp_primer_len: usize,
    stem: &StemLocation,
    tail_base_at_snv: Nucleotide,
) -> Result<SnapbackAssembly, DesignError> {
    validate_target_sequence(strand_seq)?;
    let nts = to_nucleotides(strand_seq)?;
    let len = nts.len();

    let reference = *nts.get(snv.index).ok_or(DesignError::SnvOutOfBounds {
        index: snv.index,
        len,
    })?;
    if reference == snv.variant_base {
        return Err(DesignError::SnvMatchesReference {
            index: snv.index,
            base: snv.variant_base,
        });
    }

    validate_primer_lengths(primer_len, comp_primer_len, len)?;

    validate_stem(stem, len)?;
    let region_end = len - comp_primer_len - 1;
    if stem.start < primer_len || stem.end > region_end {
        return Err(DesignError::InvalidStem {
            start: stem.start,
            end: stem.end,
            reason: format!(
                "stem must lie between the primers, inside {}..={}",
                primer_len, region_end
            ),
        });
    }
    if stem.start < INNER_LOOP_MISMATCH_LEN || stem.end + END_MISMATCH_LEN >= len {
        return Err(DesignError::InvalidStem {
            start: stem.start,
            end: stem.end,
            reason: "no room for the flanking tail mismatches".to_string(),
        });
    }
    validate_snv_in_stem(snv.index, stem)?;

    if tail_base_at_snv != reference.complement()
        && tail_base_at_snv != snv.variant_base.complement()
    {
        return Err(DesignError::TailBaseMismatch {
            base: tail_base_at_snv,
            reference,
            variant: snv.variant_base,
        });
    }

    let lo = stem.start - INNER_LOOP_MISMATCH_LEN;
    let hi = stem.end + END_MISMATCH_LEN;
    let template: String = (lo..=hi)
        .map(|i| {
            let base = if i == snv.index {
                tail_base_at_snv.complement()
            } else if stem.contains(i) {
                nts[i]
            } else {
                nts[i].complement()
            };
            base.to_char()
        })
        .collect();
    let tail = reverse_complement(&template)?;

    let stem_end = END_MISMATCH_LEN + stem.len();
    let segments = SnapbackSegments {
        terminal_mismatches: tail[..END_MISMATCH_LEN].to_string(),
        stem: tail[END_MISMATCH_LEN..stem_end].to_string(),
        inner_loop_mismatches: tail[stem_end..].to_string(),
        primer: strand_seq[..primer_len].to_string(),
    };

    Ok(SnapbackAssembly {
        snapback_seq: format!("{}{}", tail, segments.primer),
        limiting_primer_seq: reverse_complement(&strand_seq[len - comp_primer_len..])?,
        segments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fixtures::{AMPLICON, SNV_INDEX};

    fn snv() -> SnvSite {
        SnvSite::new(SNV_INDEX, Nucleotide::T)
    }

    fn reversed(s: &str) -> String {
        s.chars().rev().collect()
    }

    #[test]
    fn wild_matching_tail_pairs_with_the_reference_stem() {
        let stem = StemLocation::new(96, 104);
        let built = build_final_snapback(AMPLICON, &snv(), 20, 20, &stem, Nucleotide::C).unwrap();
        let s = &built.segments;

        assert_eq!(s.stem, reverse_complement(&AMPLICON[96..=104]).unwrap());
        assert_eq!(s.terminal_mismatches, reversed(&AMPLICON[105..=106]));
        assert_eq!(s.inner_loop_mismatches, reversed(&AMPLICON[94..=95]));
        assert_eq!(s.primer, &AMPLICON[..20]);
        assert_eq!(
            built.snapback_seq,
            format!("{}{}{}{}", s.terminal_mismatches, s.stem, s.inner_loop_mismatches, s.primer)
        );
        assert_eq!(built.snapback_seq.len(), 2 + 9 + 2 + 20);
        assert_eq!(built.limiting_primer_seq, reverse_complement(&AMPLICON[180..]).unwrap());
    }

    #[test]
    fn variant_matching_tail_pairs_with_the_variant_stem() {
        let stem = StemLocation::new(90, 110);
        let built = build_final_snapback(AMPLICON, &snv(), 20, 20, &stem, Nucleotide::A).unwrap();
        let mut variant_stem = AMPLICON[90..=110].to_string();
        variant_stem.replace_range(10..11, "T");
        assert_eq!(built.segments.stem, reverse_complement(&variant_stem).unwrap());
    }

    #[test]
    fn each_input_is_validated_with_a_specific_error() {
        let stem = StemLocation::new(96, 104);
        assert!(matches!(
            build_final_snapback("ACGTN", &snv(), 20, 20, &stem, Nucleotide::C),
            Err(DesignError::InvalidSequence(_))
        ));
        assert!(matches!(
            build_final_snapback(
                AMPLICON,
                &SnvSite::new(250, Nucleotide::A),
                20,
                20,
                &stem,
                Nucleotide::C
            ),
            Err(DesignError::SnvOutOfBounds { .. })
        ));
        assert!(matches!(
            build_final_snapback(AMPLICON, &snv(), 10, 20, &stem, Nucleotide::C),
            Err(DesignError::PrimerTooShort { field: "primerLen", .. })
        ));
        assert!(matches!(
            build_final_snapback(
                AMPLICON,
                &snv(),
                20,
                20,
                &StemLocation::new(15, 104),
                Nucleotide::C
            ),
            Err(DesignError::InvalidStem { .. })
        ));
        assert!(matches!(
            build_final_snapback(
                AMPLICON,
                &snv(),
                20,
                20,
                &StemLocation::new(110, 120),
                Nucleotide::C
            ),
            Err(DesignError::SnvOutsideStem { .. })
        ));
        assert!(matches!(
            build_final_snapback(AMPLICON, &snv(), 20, 20, &stem, Nucleotide::G),
            Err(DesignError::TailBaseMismatch { .. })
        ));
    }
}
