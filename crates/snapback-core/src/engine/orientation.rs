use super::config::DesignConfig;
use super::error::DesignError;
use super::stem::{AlleleTms, StemLocation, TailedStrand, allele_tms};
use super::validation::{
    check_snv_edge_distance, validate_snv_buffer_in_stem, validate_stem, validate_target_sequence,
};
use crate::core::sequence::Nucleotide;
use crate::core::variant::SnvSite;
use crate::gateway::ThermoGateway;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The primer that carries the snapback tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrimerSide {
    Forward,
    Reverse,
}

impl PrimerSide {
    pub fn from_tail_on_forward(tail_on_forward_primer: bool) -> Self {
        if tail_on_forward_primer {
            PrimerSide::Forward
        } else {
            PrimerSide::Reverse
        }
    }

    pub fn is_forward(self) -> bool {
        self == PrimerSide::Forward
    }

    pub fn opposite(self) -> Self {
        match self {
            PrimerSide::Forward => PrimerSide::Reverse,
            PrimerSide::Reverse => PrimerSide::Forward,
        }
    }
}

/// One of the two alleles at the SNV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Allele {
    Wild,
    Variant,
}

impl Allele {
    pub fn from_matches_wild(matches_wild: bool) -> Self {
        if matches_wild { Allele::Wild } else { Allele::Variant }
    }

    pub fn is_wild(self) -> bool {
        self == Allele::Wild
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TailChoice {
    /// Tail base opposite the SNV: the complement of the matched allele.
    pub tail_base_at_snv: Nucleotide,
    pub matches: Allele,
    pub tms: AlleleTms,
}

impl TailChoice {
    pub fn separation(&self) -> f64 {
        self.tms.separation()
    }

    pub fn matches_wild(&self) -> bool {
        self.matches.is_wild()
    }
}

/// Compares a tail matching the wild-type allele against one matching the variant allele on
/// a fixed stem and keeps the larger wild/variant separation. Ties keep the wild-type match.
pub async fn evaluate_snapback_tail_matching_options<G: ThermoGateway>(
    gateway: &G,
    strand: &TailedStrand,
    init_stem: &StemLocation,
    config: &DesignConfig,
) -> Result<TailChoice, DesignError> {
    validate_stem(init_stem, strand.len())?;
    validate_snv_buffer_in_stem(strand.snv().index, init_stem)?;

    let (wild_matching, variant_matching) = futures_util::try_join!(
        allele_tms(gateway, strand, init_stem, Allele::Wild, config),
        allele_tms(gateway, strand, init_stem, Allele::Variant, config),
    )?;
    let (matches, tms) = if variant_matching.separation() > wild_matching.separation() {
        (Allele::Variant, variant_matching)
    } else {
        (Allele::Wild, wild_matching)
    };
    debug!(
        side = ?strand.side(),
        wild_matching = wild_matching.separation(),
        variant_matching = variant_matching.separation(),
        chosen = ?matches,
        "Evaluated tail-matching options."
    );
    Ok(TailChoice {
        tail_base_at_snv: strand.allele_base(matches).complement(),
        matches,
        tms,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrientationChoice {
    pub side: PrimerSide,
    pub tail: TailChoice,
}

impl OrientationChoice {
    pub fn tail_on_forward_primer(&self) -> bool {
        self.side.is_forward()
    }

    pub fn best_snapback_tail_base_at_snv(&self) -> Nucleotide {
        self.tail.tail_base_at_snv
    }

    pub fn snapback_tail_matches_wild(&self) -> bool {
        self.tail.matches_wild()
    }
}

/// Picks the tailed primer by evaluating the minimal stem on both strands. Ties favour the
/// forward primer.
pub async fn use_forward_primer<G: ThermoGateway>(
    gateway: &G,
    target_seq: &str,
    snv: &SnvSite,
    config: &DesignConfig,
) -> Result<OrientationChoice, DesignError> {
    validate_target_sequence(target_seq)?;
    check_snv_edge_distance(snv.index, target_seq.len())?;

    let forward = TailedStrand::orient(target_seq, snv, PrimerSide::Forward)?;
    let reverse = TailedStrand::orient(target_seq, snv, PrimerSide::Reverse)?;
    let forward_stem = forward.minimal_stem()?;
    let reverse_stem = reverse.minimal_stem()?;

    let (on_forward, on_reverse) = futures_util::try_join!(
        evaluate_snapback_tail_matching_options(gateway, &forward, &forward_stem, config),
        evaluate_snapback_tail_matching_options(gateway, &reverse, &reverse_stem, config),
    )?;

    let choice = if on_reverse.separation() > on_forward.separation() {
        OrientationChoice {
            side: PrimerSide::Reverse,
            tail: on_reverse,
        }
    } else {
        OrientationChoice {
            side: PrimerSide::Forward,
            tail: on_forward,
        }
    };
    debug!(
        forward = on_forward.separation(),
        reverse = on_reverse.separation(),
        side = ?choice.side,
        "Chose tailed primer."
    );
    Ok(choice)
}
