use super::config::DesignConfig;
use super::error::DesignError;
use super::orientation::{Allele, PrimerSide};
use super::stem::{AlleleTms, StemLocation, TailedStrand, allele_tms};
use super::validation::{validate_snv_buffer_in_stem, validate_stem, validate_target_sequence};
use crate::core::variant::SnvSite;
use crate::gateway::ThermoGateway;
use serde::Serialize;

/// Wild/variant Tms for a tail matching each allele.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TailMatchTms {
    pub matches_wild: AlleleTms,
    pub matches_variant: AlleleTms,
}

impl TailMatchTms {
    pub fn get(&self, tail_matches: Allele) -> &AlleleTms {
        match tail_matches {
            Allele::Wild => &self.matches_wild,
            Allele::Variant => &self.matches_variant,
        }
    }
}

/// The tailed-primer × tail-allele matrix reported with a design.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeltingTempDifferences {
    pub forward: TailMatchTms,
    pub reverse: TailMatchTms,
}

impl MeltingTempDifferences {
    pub fn get(&self, side: PrimerSide, tail_matches: Allele) -> &AlleleTms {
        match side {
            PrimerSide::Forward => self.forward.get(tail_matches),
            PrimerSide::Reverse => self.reverse.get(tail_matches),
        }
    }

    /// Wild-type minus variant Tm for one cell of the matrix.
    pub fn difference(&self, side: PrimerSide, tail_matches: Allele) -> f64 {
        let tms = self.get(side, tail_matches);
        tms.wild_tm - tms.variant_tm
    }
}

/// Evaluates the final stem (given on the `side` strand) under every tail placement.
///
/// The stem is mirrored onto the opposite strand so both primers are compared over the same
/// bases of the amplicon.
pub async fn calculate_melting_temp_differences<G: ThermoGateway>(
    gateway: &G,
    target_seq: &str,
    snv: &SnvSite,
    stem: &StemLocation,
    side: PrimerSide,
    config: &DesignConfig,
) -> Result<MeltingTempDifferences, DesignError> {
    validate_target_sequence(target_seq)?;
    validate_stem(stem, target_seq.len())?;

    let tailed = TailedStrand::orient(target_seq, snv, side)?;
    validate_snv_buffer_in_stem(tailed.snv().index, stem)?;
    let opposite = TailedStrand::orient(target_seq, snv, side.opposite())?;
    let mirrored = stem.mirrored(target_seq.len());

    let (forward, forward_stem, reverse, reverse_stem) = match side {
        PrimerSide::Forward => (&tailed, stem, &opposite, &mirrored),
        PrimerSide::Reverse => (&opposite, &mirrored, &tailed, stem),
    };

    let (fw, fv, rw, rv) = futures_util::try_join!(
        allele_tms(gateway, forward, forward_stem, Allele::Wild, config),
        allele_tms(gateway, forward, forward_stem, Allele::Variant, config),
        allele_tms(gateway, reverse, reverse_stem, Allele::Wild, config),
        allele_tms(gateway, reverse, reverse_stem, Allele::Variant, config),
    )?;

    Ok(MeltingTempDifferences {
        forward: TailMatchTms {
            matches_wild: fw,
            matches_variant: fv,
        },
        reverse: TailMatchTms {
            matches_wild: rw,
            matches_variant: rv,
        },
    })
}
