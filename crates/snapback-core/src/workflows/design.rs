use crate::core::sequence::Nucleotide;
use crate::core::thermo::hairpin_loop::HairpinLoopModel;
use crate::core::variant::SnvSite;
use crate::engine::assembly::{SnapbackSegments, build_final_snapback};
use crate::engine::config::DesignConfig;
use crate::engine::differences::{MeltingTempDifferences, calculate_melting_temp_differences};
use crate::engine::error::DesignError;
use crate::engine::orientation::{Allele, use_forward_primer};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::stem::{StemLocation, TailedStrand, create_stem, hairpin_tm_wittwer};
use crate::engine::validation::{
    validate_primer_lengths, validate_snv_site, validate_target_sequence, validate_target_tm,
};
use crate::gateway::ThermoGateway;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapbackRequest {
    pub target_seq_strand: String,
    pub primer_len: usize,
    pub comp_primer_len: usize,
    pub snv_site: SnvSite,
    pub target_snap_melt_temp: f64,
}

impl SnapbackRequest {
    /// Runs every precondition in a fixed order: sequence, primers, SNV, target Tm.
    pub fn validate(&self) -> Result<(), DesignError> {
        let seq = self.target_seq_strand.as_str();
        validate_target_sequence(seq)?;
        validate_primer_lengths(self.primer_len, self.comp_primer_len, seq.len())?;
        validate_snv_site(seq, &self.snv_site, self.primer_len, self.comp_primer_len)?;
        validate_target_tm(self.target_snap_melt_temp)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelTms {
    pub model: HairpinLoopModel,
    pub wild_tm: f64,
    pub variant_tm: f64,
}

/// The finished design.
///
/// `stem` is given on the tailed strand (the target strand itself when the tail is on the
/// forward primer, its reverse complement otherwise); `target_stem` is the same interval in
/// target-strand coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapbackDesign {
    pub snapback_seq: String,
    pub limiting_primer_seq: String,
    pub tail_on_forward_primer: bool,
    pub matches_wild: bool,
    pub tail_base_at_snv: Nucleotide,
    pub stem: StemLocation,
    pub target_stem: StemLocation,
    pub loop_len: usize,
    pub wild_tm: f64,
    pub variant_tm: f64,
    pub model_tms: Vec<ModelTms>,
    pub differences: MeltingTempDifferences,
    pub segments: SnapbackSegments,
}

#[instrument(skip_all, name = "snapback_design_workflow")]
pub async fn create_snapback<G: ThermoGateway>(
    gateway: &G,
    request: &SnapbackRequest,
    config: &DesignConfig,
    reporter: &ProgressReporter<'_>,
) -> Result<SnapbackDesign, DesignError> {
    request.validate()?;
    let target = request.target_seq_strand.as_str();
    let snv = &request.snv_site;

    // === Phase 1: Tailed primer and tail allele ===
    reporter.report(Progress::PhaseStart {
        name: "Orientation",
    });
    let orientation = use_forward_primer(gateway, target, snv, config).await?;
    info!(
        tail_on_forward_primer = orientation.tail_on_forward_primer(),
        matches_wild = orientation.snapback_tail_matches_wild(),
        "Selected snapback orientation."
    );
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Stem growth ===
    reporter.report(Progress::PhaseStart {
        name: "Stem growth",
    });
    let strand = TailedStrand::orient(target, snv, orientation.side)?
        .with_primers(request.primer_len, request.comp_primer_len);
    let matched = orientation.tail.matches;
    let search = create_stem(
        gateway,
        &strand,
        matched,
        request.target_snap_melt_temp,
        config,
        reporter,
    )
    .await?;
    reporter.report(Progress::PhaseFinish);

    // === Phase 3: Assembly and reporting ===
    reporter.report(Progress::PhaseStart {
        name: "Assembly",
    });
    let assembly = build_final_snapback(
        strand.sequence(),
        strand.snv(),
        strand.tailed_primer_len(),
        strand.other_primer_len(),
        &search.stem,
        orientation.best_snapback_tail_base_at_snv(),
    )?;
    let differences = calculate_melting_temp_differences(
        gateway,
        target,
        snv,
        &search.stem,
        orientation.side,
        config,
    )
    .await?;
    let model_tms = config
        .reporting_models
        .iter()
        .map(|&model| -> Result<ModelTms, DesignError> {
            Ok(ModelTms {
                model,
                wild_tm: hairpin_tm_wittwer(&strand, &search.stem, Allele::Wild, matched, model)?,
                variant_tm: hairpin_tm_wittwer(
                    &strand,
                    &search.stem,
                    Allele::Variant,
                    matched,
                    model,
                )?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    reporter.report(Progress::PhaseFinish);

    let target_stem = if orientation.tail_on_forward_primer() {
        search.stem
    } else {
        search.stem.mirrored(target.len())
    };
    info!(
        snapback_seq = %assembly.snapback_seq,
        wild_tm = search.wild_tm,
        variant_tm = search.variant_tm,
        "Snapback design complete."
    );

    Ok(SnapbackDesign {
        snapback_seq: assembly.snapback_seq,
        limiting_primer_seq: assembly.limiting_primer_seq,
        tail_on_forward_primer: orientation.tail_on_forward_primer(),
        matches_wild: orientation.snapback_tail_matches_wild(),
        tail_base_at_snv: orientation.best_snapback_tail_base_at_snv(),
        stem: search.stem,
        target_stem,
        loop_len: strand.loop_len(&search.stem),
        wild_tm: search.wild_tm,
        variant_tm: search.variant_tm,
        model_tms,
        differences,
        segments: assembly.segments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sequence::reverse_complement;
    use crate::engine::fixtures::{AMPLICON, SNV_INDEX};
    use crate::engine::orientation::PrimerSide;
    use crate::gateway::local::LocalThermoGateway;
    use crate::gateway::{GatewayError, ThermoParams, ThermoRequest};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls and fails every one of them.
    #[derive(Default)]
    struct FailingGateway {
        calls: AtomicUsize,
    }

    impl ThermoGateway for FailingGateway {
        async fn duplex_params(
            &self,
            _request: &ThermoRequest,
        ) -> Result<ThermoParams, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(GatewayError::MissingField("dH"))
        }
    }

    fn request(index: usize, variant: Nucleotide, target: f64) -> SnapbackRequest {
        SnapbackRequest {
            target_seq_strand: AMPLICON.to_string(),
            primer_len: 20,
            comp_primer_len: 20,
            snv_site: SnvSite::new(index, variant),
            target_snap_melt_temp: target,
        }
    }

    async fn design(request: &SnapbackRequest) -> Result<SnapbackDesign, DesignError> {
        create_snapback(
            &LocalThermoGateway::default(),
            request,
            &DesignConfig::default(),
            &ProgressReporter::new(),
        )
        .await
    }

    #[tokio::test]
    async fn forward_design_meets_the_target_and_is_self_consistent() {
        let result = design(&request(SNV_INDEX, Nucleotide::T, 55.0)).await.unwrap();

        assert!(result.tail_on_forward_primer);
        assert!(result.matches_wild);
        assert_eq!(result.tail_base_at_snv, Nucleotide::C);
        assert!(result.wild_tm >= 55.0);
        assert!(result.wild_tm > result.variant_tm);
        assert!(result.stem.contains(SNV_INDEX));
        assert!(StemLocation::new(20, 179).contains_stem(&result.stem));
        assert_eq!(result.target_stem, result.stem);
        assert_eq!(result.loop_len, result.stem.start + 2);

        let s = &result.segments;
        assert_eq!(s.primer, &AMPLICON[..20]);
        assert_eq!(
            s.stem,
            reverse_complement(&AMPLICON[result.stem.start..=result.stem.end]).unwrap()
        );
        assert!(result.snapback_seq.ends_with(&s.primer));
        assert_eq!(result.snapback_seq.len(), 4 + result.stem.len() + 20);
        assert_eq!(result.limiting_primer_seq, reverse_complement(&AMPLICON[180..]).unwrap());

        let cell = result.differences.get(PrimerSide::Forward, Allele::Wild);
        assert_eq!((cell.wild_tm, cell.variant_tm), (result.wild_tm, result.variant_tm));
        assert_eq!(result.model_tms.len(), 2);
        assert!(result.model_tms.iter().all(|m| m.wild_tm > m.variant_tm));
    }

    #[tokio::test]
    async fn reverse_design_tails_the_reverse_primer() {
        let result = design(&request(138, Nucleotide::C, 55.0)).await.unwrap();

        assert!(!result.tail_on_forward_primer);
        assert!(result.matches_wild);
        assert!(result.wild_tm >= 55.0);
        assert!(result.target_stem.contains(138));
        assert_eq!(result.target_stem, result.stem.mirrored(AMPLICON.len()));
        assert_eq!(result.segments.primer, reverse_complement(&AMPLICON[180..]).unwrap());
        assert_eq!(result.limiting_primer_seq, &AMPLICON[..20]);
    }

    #[tokio::test]
    async fn unreachable_target_is_a_convergence_failure() {
        let err = design(&request(SNV_INDEX, Nucleotide::T, 150.0)).await.unwrap_err();
        assert!(err.is_convergence_failure());
        assert!(!err.is_input_error());
    }

    #[tokio::test]
    async fn preconditions_are_checked_in_order_before_any_gateway_call() {
        let gateway = FailingGateway::default();
        let config = DesignConfig::default();
        let reporter = ProgressReporter::new();

        let mut bad_everything = request(2, Nucleotide::G, -1.0);
        bad_everything.target_seq_strand = format!("{}n", AMPLICON);
        bad_everything.primer_len = 5;
        let cases = [
            (bad_everything.clone(), "InvalidSequence"),
            (
                SnapbackRequest {
                    target_seq_strand: "A".repeat(1001),
                    ..bad_everything.clone()
                },
                "AmpliconTooLong",
            ),
            (
                SnapbackRequest {
                    target_seq_strand: AMPLICON.to_string(),
                    ..bad_everything.clone()
                },
                "PrimerTooShort",
            ),
            (
                SnapbackRequest {
                    primer_len: 20,
                    ..request(2, Nucleotide::G, -1.0)
                },
                "SnvMatchesReference",
            ),
            (request(2, Nucleotide::A, -1.0), "SnvTooCloseToEdge"),
            (request(22, Nucleotide::A, -1.0), "SnvTooCloseToPrimer"),
            (request(SNV_INDEX, Nucleotide::T, -1.0), "InvalidTargetTm"),
        ];
        for (req, expected) in cases {
            let err = create_snapback(&gateway, &req, &config, &reporter).await.unwrap_err();
            assert!(format!("{err:?}").starts_with(expected), "{expected}: {err:?}");
            assert!(err.is_input_error());
        }
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn gateway_failures_abort_the_design() {
        let gateway = FailingGateway::default();
        let err = create_snapback(
            &gateway,
            &request(SNV_INDEX, Nucleotide::T, 55.0),
            &DesignConfig::default(),
            &ProgressReporter::new(),
        )
        .await
        .unwrap_err();
        assert!(err.is_gateway_error());
        assert!(gateway.calls.load(Ordering::SeqCst) > 0);
    }

    #[tokio::test]
    async fn phases_are_reported_in_order() {
        let phases = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::PhaseStart { name } = event {
                phases.lock().unwrap().push(name);
            }
        }));
        create_snapback(
            &LocalThermoGateway::default(),
            &request(SNV_INDEX, Nucleotide::T, 55.0),
            &DesignConfig::default(),
            &reporter,
        )
        .await
        .unwrap();
        drop(reporter);
        assert_eq!(
            phases.into_inner().unwrap(),
            vec!["Orientation", "Stem growth", "Assembly"]
        );
    }

    #[tokio::test]
    async fn design_serializes_with_the_public_field_names() {
        let result = design(&request(SNV_INDEX, Nucleotide::T, 55.0)).await.unwrap();
        let json = serde_json::to_value(&result).unwrap();
        for key in [
            "snapbackSeq",
            "limitingPrimerSeq",
            "tailOnForwardPrimer",
            "matchesWild",
            "wildTm",
            "variantTm",
            "modelTms",
            "segments",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["segments"]["primer"], AMPLICON[..20]);
        assert_eq!(json["tailBaseAtSnv"], "C");
    }

    #[test]
    fn request_deserializes_from_camel_case_json() {
        let raw = serde_json::json!({
            "targetSeqStrand": "ACGT",
            "primerLen": 20,
            "compPrimerLen": 20,
            "snvSite": {"index": 1, "variantBase": "T"},
            "targetSnapMeltTemp": 60.0
        });
        let parsed: SnapbackRequest = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.snv_site, SnvSite::new(1, Nucleotide::T));
    }
}
