use crate::cli::DesignArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use snapback::engine::orientation::{Allele, PrimerSide};
use snapback::engine::progress::ProgressReporter;
use snapback::workflows::design::{SnapbackDesign, SnapbackRequest, create_snapback};
use std::fmt::Write;
use std::path::Path;
use tracing::info;

pub async fn run(args: DesignArgs) -> Result<()> {
    let app_config = build_config(&args.config)?;
    let gateway = app_config.connect()?;
    info!(mode = ?app_config.gateway.mode(), "Connected thermodynamics gateway.");

    let target_seq_strand = match (&args.sequence, &args.sequence_file) {
        (Some(sequence), _) => sequence.trim().to_string(),
        (None, Some(path)) => read_sequence_file(path)?,
        (None, None) => {
            return Err(CliError::Argument(
                "either --sequence or --sequence-file is required".to_string(),
            ));
        }
    };
    let request = SnapbackRequest {
        target_seq_strand,
        primer_len: args.primer_len,
        comp_primer_len: args.comp_primer_len,
        snv_site: args.snv,
        target_snap_melt_temp: args.target_tm,
    };

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the snapback design workflow...");
    let design = create_snapback(&gateway, &request, &app_config.design, &reporter).await?;

    let rendered = if args.json {
        serde_json::to_string_pretty(&design)?
    } else {
        render_design(&design)
    };
    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            println!("✓ Design written to: {}", path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

/// Reads a sequence from a plain or FASTA file: header lines are skipped, the rest joined.
pub fn read_sequence_file(path: &Path) -> Result<String> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('>'))
        .collect())
}

fn side_label(side: PrimerSide) -> &'static str {
    match side {
        PrimerSide::Forward => "forward",
        PrimerSide::Reverse => "reverse",
    }
}

fn allele_label(allele: Allele) -> &'static str {
    match allele {
        Allele::Wild => "wild-type",
        Allele::Variant => "variant",
    }
}

pub fn render_design(design: &SnapbackDesign) -> String {
    let side = PrimerSide::from_tail_on_forward(design.tail_on_forward_primer);
    let matched = Allele::from_matches_wild(design.matches_wild);
    let s = &design.segments;

    let mut out = String::new();
    let _ = writeln!(out, "Snapback primer:  5'-{}-3'", design.snapback_seq);
    let _ = writeln!(
        out,
        "  tail:           {} | {} | {}",
        s.terminal_mismatches, s.stem, s.inner_loop_mismatches
    );
    let _ = writeln!(out, "  primer:         {}", s.primer);
    let _ = writeln!(out, "Limiting primer:  5'-{}-3'", design.limiting_primer_seq);
    let _ = writeln!(
        out,
        "Tail on the {} primer, matching the {} allele (base {} opposite the SNV)",
        side_label(side),
        allele_label(matched),
        design.tail_base_at_snv
    );
    let _ = writeln!(
        out,
        "Stem {}..={} on the tailed strand ({}..={} on the target), {} bp, loop {} nt",
        design.stem.start,
        design.stem.end,
        design.target_stem.start,
        design.target_stem.end,
        design.stem.len(),
        design.loop_len
    );
    let _ = writeln!(
        out,
        "Snapback Tm:      wild {:.2} °C, variant {:.2} °C (Δ {:.2} °C)",
        design.wild_tm,
        design.variant_tm,
        design.wild_tm - design.variant_tm
    );
    for tms in &design.model_tms {
        let _ = writeln!(
            out,
            "  {:<17} wild {:.2} °C, variant {:.2} °C",
            format!("{}:", tms.model),
            tms.wild_tm,
            tms.variant_tm
        );
    }
    let _ = writeln!(out, "Tm differences (wild − variant):");
    for side in [PrimerSide::Forward, PrimerSide::Reverse] {
        for allele in [Allele::Wild, Allele::Variant] {
            let _ = writeln!(
                out,
                "  {} primer, {} tail: {:+.2} °C",
                side_label(side),
                allele_label(allele),
                design.differences.difference(side, allele)
            );
        }
    }
    out.trim_end().to_string()
}
