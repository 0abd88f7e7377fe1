use super::config::DesignConfig;
use super::error::DesignError;
use super::orientation::{Allele, PrimerSide};
use super::progress::{Progress, ProgressReporter};
use super::validation::{check_snv_edge_distance, validate_snv_in_stem, validate_stem};
use crate::core::constants::{INNER_LOOP_MISMATCH_LEN, MIN_LOOP_LEN, SNV_BASE_BUFFER};
use crate::core::melting::{calculate_snapback_tm, calculate_snapback_tm_wittwer};
use crate::core::sequence::{Nucleotide, base_at, reverse_complement, with_base_at};
use crate::core::thermo::hairpin_loop::HairpinLoopModel;
use crate::core::variant::{Mismatch, SnvSite, rev_comp_snv};
use crate::gateway::ThermoGateway;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::{debug, info};

/// Inclusive base interval `[start, end]` on a strand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StemLocation {
    pub start: usize,
    pub end: usize,
}

impl StemLocation {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end + 1 - self.start
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }

    pub fn contains_stem(&self, other: &StemLocation) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// The same bases addressed on the reverse-complement strand of a `seq_len` sequence.
    pub fn mirrored(&self, seq_len: usize) -> Self {
        Self {
            start: seq_len - 1 - self.end,
            end: seq_len - 1 - self.start,
        }
    }
}

/// The strand that receives the snapback tail, with the SNV and primer footprints
/// expressed in its own 5′→3′ coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct TailedStrand {
    sequence: String,
    snv: SnvSite,
    reference: Nucleotide,
    side: PrimerSide,
    tailed_primer_len: usize,
    other_primer_len: usize,
}

impl TailedStrand {
    /// Reads `target_seq` from the tailed primer's side: the target strand itself for the
    /// forward primer, its reverse complement for the reverse primer.
    pub fn orient(target_seq: &str, snv: &SnvSite, side: PrimerSide) -> Result<Self, DesignError> {
        let (sequence, snv) = match side {
            PrimerSide::Forward => (target_seq.to_string(), *snv),
            PrimerSide::Reverse => (
                reverse_complement(target_seq)?,
                rev_comp_snv(snv, target_seq.len())?,
            ),
        };
        let reference = base_at(&sequence, snv.index).ok_or(DesignError::SnvOutOfBounds {
            index: snv.index,
            len: sequence.len(),
        })?;
        Ok(Self {
            sequence,
            snv,
            reference,
            side,
            tailed_primer_len: 0,
            other_primer_len: 0,
        })
    }

    /// Assigns the primer footprints given in target-strand terms.
    pub fn with_primers(mut self, primer_len: usize, comp_primer_len: usize) -> Self {
        (self.tailed_primer_len, self.other_primer_len) = match self.side {
            PrimerSide::Forward => (primer_len, comp_primer_len),
            PrimerSide::Reverse => (comp_primer_len, primer_len),
        };
        self
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }
    pub fn len(&self) -> usize {
        self.sequence.len()
    }
    pub fn snv(&self) -> &SnvSite {
        &self.snv
    }
    pub fn side(&self) -> PrimerSide {
        self.side
    }
    pub fn tailed_primer_len(&self) -> usize {
        self.tailed_primer_len
    }
    pub fn other_primer_len(&self) -> usize {
        self.other_primer_len
    }

    pub fn allele_base(&self, allele: Allele) -> Nucleotide {
        match allele {
            Allele::Wild => self.reference,
            Allele::Variant => self.snv.variant_base,
        }
    }

    pub fn allele_sequence(&self, allele: Allele) -> Result<Cow<'_, str>, DesignError> {
        Ok(match allele {
            Allele::Wild => Cow::Borrowed(self.sequence.as_str()),
            Allele::Variant => Cow::Owned(with_base_at(
                &self.sequence,
                self.snv.index,
                self.snv.variant_base,
            )?),
        })
    }

    /// Bases not claimed by either primer: `[tailed primer end, other primer start)`.
    pub fn allowed_region(&self) -> Result<StemLocation, DesignError> {
        let len = self.len();
        if self.tailed_primer_len + self.other_primer_len >= len {
            return Err(DesignError::PrimersExceedSequence {
                primer_len: self.tailed_primer_len,
                comp_primer_len: self.other_primer_len,
                len,
            });
        }
        Ok(StemLocation::new(
            self.tailed_primer_len,
            len - self.other_primer_len - 1,
        ))
    }

    /// The narrowest stem that keeps [`SNV_BASE_BUFFER`] paired bases on both sides of the SNV.
    pub fn minimal_stem(&self) -> Result<StemLocation, DesignError> {
        check_snv_edge_distance(self.snv.index, self.len())?;
        Ok(StemLocation::new(
            self.snv.index - SNV_BASE_BUFFER,
            self.snv.index + SNV_BASE_BUFFER,
        ))
    }

    /// Unpaired bases closing the hairpin: everything 5′ of the stem on this strand plus
    /// the tail's inner-loop mismatches.
    pub fn loop_len(&self, stem: &StemLocation) -> usize {
        (stem.start + INNER_LOOP_MISMATCH_LEN).max(MIN_LOOP_LEN)
    }

    /// Mismatch seen by `allele` when the tail pairs with `tail_matches`.
    pub fn stem_mismatch(
        &self,
        stem: &StemLocation,
        allele: Allele,
        tail_matches: Allele,
    ) -> Result<Option<Mismatch>, DesignError> {
        validate_snv_in_stem(self.snv.index, stem)?;
        Ok((allele != tail_matches).then(|| {
            Mismatch::new(self.snv.index - stem.start, self.allele_base(tail_matches))
        }))
    }

    fn stem_sequence<'s>(
        &self,
        allele_seq: &'s str,
        stem: &StemLocation,
    ) -> Result<&'s str, DesignError> {
        validate_stem(stem, allele_seq.len())?;
        allele_seq
            .get(stem.start..=stem.end)
            .ok_or_else(|| DesignError::InvalidStem {
                start: stem.start,
                end: stem.end,
                reason: "stem does not fall on base boundaries".to_string(),
            })
    }
}

/// Hairpin Tm of `allele` when the tail is built to pair with `tail_matches`, with the stem
/// priced by the gateway.
pub async fn hairpin_tm<G: ThermoGateway>(
    gateway: &G,
    strand: &TailedStrand,
    stem: &StemLocation,
    allele: Allele,
    tail_matches: Allele,
    config: &DesignConfig,
) -> Result<f64, DesignError> {
    let allele_seq = strand.allele_sequence(allele)?;
    let stem_seq = strand.stem_sequence(&allele_seq, stem)?;
    let mismatch = strand.stem_mismatch(stem, allele, tail_matches)?;
    let tm = calculate_snapback_tm(
        gateway,
        stem_seq,
        strand.loop_len(stem),
        mismatch.as_ref(),
        config.loop_model,
        config.concentrations,
    )
    .await?;
    Ok(tm)
}

/// Like [`hairpin_tm`] but from the local tables under a specific loop model.
/// No salt correction is applied.
pub fn hairpin_tm_wittwer(
    strand: &TailedStrand,
    stem: &StemLocation,
    allele: Allele,
    tail_matches: Allele,
    model: HairpinLoopModel,
) -> Result<f64, DesignError> {
    let allele_seq = strand.allele_sequence(allele)?;
    let stem_seq = strand.stem_sequence(&allele_seq, stem)?;
    let mismatch = strand.stem_mismatch(stem, allele, tail_matches)?;
    Ok(calculate_snapback_tm_wittwer(
        stem_seq,
        strand.loop_len(stem),
        mismatch.as_ref(),
        model,
    )?)
}

/// Wild-type and variant hairpin Tms for one tail choice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlleleTms {
    pub wild_tm: f64,
    pub variant_tm: f64,
}

impl AlleleTms {
    pub fn separation(&self) -> f64 {
        (self.wild_tm - self.variant_tm).abs()
    }
}

pub async fn allele_tms<G: ThermoGateway>(
    gateway: &G,
    strand: &TailedStrand,
    stem: &StemLocation,
    tail_matches: Allele,
    config: &DesignConfig,
) -> Result<AlleleTms, DesignError> {
    let (wild_tm, variant_tm) = futures_util::try_join!(
        hairpin_tm(gateway, strand, stem, Allele::Wild, tail_matches, config),
        hairpin_tm(gateway, strand, stem, Allele::Variant, tail_matches, config),
    )?;
    Ok(AlleleTms {
        wild_tm,
        variant_tm,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StemSearchResult {
    pub stem: StemLocation,
    pub wild_tm: f64,
    pub variant_tm: f64,
}

#[derive(Debug, Clone, Copy)]
struct GrowthState {
    stem: StemLocation,
    wild_tm: f64,
}

/// One base wider: toward the side where the SNV sits closer to the stem edge (ties grow
/// 3′), or toward whichever side still has free sequence.
fn widen(stem: &StemLocation, region: &StemLocation, snv_index: usize) -> Option<StemLocation> {
    let left = || StemLocation::new(stem.start - 1, stem.end);
    let right = || StemLocation::new(stem.start, stem.end + 1);
    match (stem.start > region.start, stem.end < region.end) {
        (true, true) if snv_index - stem.start < stem.end - snv_index => Some(left()),
        (true, true) => Some(right()),
        (true, false) => Some(left()),
        (false, true) => Some(right()),
        (false, false) => None,
    }
}

/// Grows the stem from the minimal SNV-straddling interval until the wild-type hairpin
/// reaches `target_tm`.
///
/// Only wild-type Tms are computed during the search; each step depends on the previous one
/// so the gateway calls run sequentially. The variant Tm is computed once for the accepted
/// stem.
///
/// # Errors
///
/// Returns [`DesignError::StemTmUnreachable`] when the whole primer-free region is consumed
/// without reaching the target.
pub async fn create_stem<G: ThermoGateway>(
    gateway: &G,
    strand: &TailedStrand,
    tail_matches: Allele,
    target_tm: f64,
    config: &DesignConfig,
    reporter: &ProgressReporter<'_>,
) -> Result<StemSearchResult, DesignError> {
    let region = strand.allowed_region()?;
    let minimal = strand.minimal_stem()?;
    if !region.contains_stem(&minimal) {
        return Err(DesignError::SnvTooCloseToPrimer {
            index: strand.snv().index,
            region_start: region.start,
            region_end: region.end,
            buffer: SNV_BASE_BUFFER,
        });
    }

    reporter.report(Progress::SearchStart {
        max_steps: (region.len() - minimal.len()) as u64,
    });

    let mut state = GrowthState {
        stem: minimal,
        wild_tm: hairpin_tm(gateway, strand, &minimal, Allele::Wild, tail_matches, config).await?,
    };
    let mut best_tm = state.wild_tm;

    while state.wild_tm < target_tm {
        let Some(stem) = widen(&state.stem, &region, strand.snv().index) else {
            return Err(DesignError::StemTmUnreachable {
                target: target_tm,
                best_tm,
            });
        };
        let wild_tm = hairpin_tm(gateway, strand, &stem, Allele::Wild, tail_matches, config).await?;
        debug!(start = stem.start, end = stem.end, wild_tm, "Widened stem.");
        reporter.report(Progress::StemGrown {
            start: stem.start,
            end: stem.end,
            wild_tm,
        });
        best_tm = best_tm.max(wild_tm);
        state = GrowthState { stem, wild_tm };
    }
    reporter.report(Progress::Message(format!(
        "Stem {}..={} ({} bp) reached {:.2} °C",
        state.stem.start,
        state.stem.end,
        state.stem.len(),
        state.wild_tm
    )));
    reporter.report(Progress::SearchFinish);

    let variant_tm = hairpin_tm(
        gateway,
        strand,
        &state.stem,
        Allele::Variant,
        tail_matches,
        config,
    )
    .await?;
    info!(
        start = state.stem.start,
        end = state.stem.end,
        wild_tm = state.wild_tm,
        variant_tm,
        "Stem reached target melting temperature."
    );
    Ok(StemSearchResult {
        stem: state.stem,
        wild_tm: state.wild_tm,
        variant_tm,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fixtures::{AMPLICON, SNV_INDEX};
    use crate::gateway::local::LocalThermoGateway;
    use std::sync::Mutex;

    fn forward_strand() -> TailedStrand {
        TailedStrand::orient(AMPLICON, &SnvSite::new(SNV_INDEX, Nucleotide::T), PrimerSide::Forward)
            .unwrap()
            .with_primers(20, 20)
    }

    #[test]
    fn stem_location_geometry() {
        let stem = StemLocation::new(96, 104);
        assert_eq!(stem.len(), 9);
        assert!(stem.contains(96) && stem.contains(104) && !stem.contains(105));
        assert_eq!(stem.mirrored(200), StemLocation::new(95, 103));
        assert_eq!(stem.mirrored(200).mirrored(200), stem);
        assert!(StemLocation::new(20, 179).contains_stem(&stem));
    }

    #[test]
    fn reverse_orientation_mirrors_sequence_snv_and_primers() {
        let snv = SnvSite::new(SNV_INDEX, Nucleotide::T);
        let strand = TailedStrand::orient(AMPLICON, &snv, PrimerSide::Reverse)
            .unwrap()
            .with_primers(18, 22);
        assert_eq!(strand.sequence(), reverse_complement(AMPLICON).unwrap());
        assert_eq!(strand.snv().index, 200 - 1 - SNV_INDEX);
        assert_eq!(strand.snv().variant_base, Nucleotide::A);
        assert_eq!(strand.allele_base(Allele::Wild), Nucleotide::C);
        assert_eq!((strand.tailed_primer_len(), strand.other_primer_len()), (22, 18));
        assert_eq!(strand.allowed_region().unwrap(), StemLocation::new(22, 181));
    }

    #[test]
    fn minimal_stem_straddles_the_snv() {
        let strand = forward_strand();
        assert_eq!(strand.minimal_stem().unwrap(), StemLocation::new(96, 104));
        assert_eq!(strand.allowed_region().unwrap(), StemLocation::new(20, 179));
        assert_eq!(strand.loop_len(&StemLocation::new(96, 104)), 98);
        assert_eq!(strand.loop_len(&StemLocation::new(1, 104)), MIN_LOOP_LEN);
    }

    #[test]
    fn stem_mismatch_follows_the_tail_allele() {
        let strand = forward_strand();
        let stem = StemLocation::new(96, 104);
        assert_eq!(strand.stem_mismatch(&stem, Allele::Wild, Allele::Wild).unwrap(), None);
        assert_eq!(
            strand.stem_mismatch(&stem, Allele::Variant, Allele::Wild).unwrap(),
            Some(Mismatch::new(4, Nucleotide::G))
        );
        assert_eq!(
            strand.stem_mismatch(&stem, Allele::Wild, Allele::Variant).unwrap(),
            Some(Mismatch::new(4, Nucleotide::T))
        );
        assert!(strand
            .stem_mismatch(&StemLocation::new(101, 110), Allele::Wild, Allele::Variant)
            .is_err());
    }

    #[test]
    fn widen_grows_toward_the_nearer_side_and_ties_grow_right() {
        let region = StemLocation::new(20, 179);
        assert_eq!(
            widen(&StemLocation::new(96, 104), &region, 100),
            Some(StemLocation::new(96, 105))
        );
        assert_eq!(
            widen(&StemLocation::new(96, 105), &region, 100),
            Some(StemLocation::new(95, 105))
        );
    }

    #[test]
    fn widen_uses_the_free_side_and_stops_when_exhausted() {
        let region = StemLocation::new(20, 179);
        assert_eq!(
            widen(&StemLocation::new(20, 104), &region, 100),
            Some(StemLocation::new(20, 105))
        );
        assert_eq!(
            widen(&StemLocation::new(96, 179), &region, 100),
            Some(StemLocation::new(95, 179))
        );
        assert_eq!(widen(&region, &region, 100), None);
    }

    #[tokio::test]
    async fn create_stem_returns_minimal_stem_for_a_trivial_target() {
        let gateway = LocalThermoGateway::default();
        let strand = forward_strand();
        let result = create_stem(
            &gateway,
            &strand,
            Allele::Wild,
            0.5,
            &DesignConfig::default(),
            &ProgressReporter::new(),
        )
        .await
        .unwrap();
        assert_eq!(result.stem, StemLocation::new(96, 104));
        assert!(result.wild_tm > result.variant_tm);
    }

    #[tokio::test]
    async fn create_stem_reaches_target_inside_the_free_region() {
        let gateway = LocalThermoGateway::default();
        let strand = forward_strand();
        let grown = Mutex::new(0usize);
        let messages = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| match event {
            Progress::StemGrown { .. } => *grown.lock().unwrap() += 1,
            Progress::Message(text) => messages.lock().unwrap().push(text),
            _ => {}
        }));
        let result = create_stem(
            &gateway,
            &strand,
            Allele::Wild,
            55.0,
            &DesignConfig::default(),
            &reporter,
        )
        .await
        .unwrap();
        drop(reporter);

        assert!(result.wild_tm >= 55.0);
        assert!(StemLocation::new(20, 179).contains_stem(&result.stem));
        assert!(result.stem.contains(SNV_INDEX));
        assert_eq!(grown.into_inner().unwrap(), result.stem.len() - 9);
        let messages = messages.into_inner().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with(&format!(
            "Stem {}..={} ({} bp) reached",
            result.stem.start,
            result.stem.end,
            result.stem.len()
        )));
    }

    #[tokio::test]
    async fn create_stem_fails_distinctly_when_the_target_is_unreachable() {
        let gateway = LocalThermoGateway::default();
        let err = create_stem(
            &gateway,
            &forward_strand(),
            Allele::Wild,
            150.0,
            &DesignConfig::default(),
            &ProgressReporter::new(),
        )
        .await
        .unwrap_err();
        assert!(err.is_convergence_failure());
        match err {
            DesignError::StemTmUnreachable { target, best_tm } => {
                assert_eq!(target, 150.0);
                assert!(best_tm < 150.0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
