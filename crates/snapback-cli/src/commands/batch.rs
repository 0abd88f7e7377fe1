use crate::cli::BatchArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use futures_util::{StreamExt, stream};
use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};
use snapback::core::sequence::Nucleotide;
use snapback::core::variant::SnvSite;
use snapback::engine::config::DesignConfig;
use snapback::engine::progress::ProgressReporter;
use snapback::gateway::ThermoGateway;
use snapback::workflows::design::{SnapbackRequest, create_snapback};
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct BatchRow {
    pub name: String,
    pub sequence: String,
    pub primer_len: usize,
    pub comp_primer_len: usize,
    pub snv_index: usize,
    pub variant_base: Nucleotide,
    pub target_tm: f64,
}

impl BatchRow {
    fn to_request(&self) -> SnapbackRequest {
        SnapbackRequest {
            target_seq_strand: self.sequence.clone(),
            primer_len: self.primer_len,
            comp_primer_len: self.comp_primer_len,
            snv_site: SnvSite::new(self.snv_index, self.variant_base),
            target_snap_melt_temp: self.target_tm,
        }
    }
}

/// One output line; design columns stay empty when the row failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchRecord {
    pub name: String,
    pub status: String,
    pub snapback_seq: Option<String>,
    pub limiting_primer_seq: Option<String>,
    pub tail_on_forward_primer: Option<bool>,
    pub matches_wild: Option<bool>,
    pub stem_start: Option<usize>,
    pub stem_end: Option<usize>,
    pub loop_len: Option<usize>,
    pub wild_tm: Option<f64>,
    pub variant_tm: Option<f64>,
    pub error: Option<String>,
}

impl BatchRecord {
    fn failed(name: String, error: String) -> Self {
        Self {
            name,
            status: "error".to_string(),
            error: Some(error),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub designed: usize,
    pub failed: usize,
}

pub async fn run(args: BatchArgs) -> Result<()> {
    if args.jobs == 0 {
        return Err(CliError::Argument("--jobs must be at least 1".to_string()));
    }
    let app_config = build_config(&args.config)?;
    let gateway = app_config.connect()?;

    let rows = read_rows(&args.input)?;
    info!("Loaded {} row(s) from {:?}", rows.len(), &args.input);

    let bar = CliProgressHandler::new().row_bar(rows.len() as u64);
    let records = design_rows(&gateway, &app_config.design, rows, args.jobs, &bar).await;
    bar.finish_and_clear();

    let summary = write_records(&args.output, &records)?;
    if summary.failed > 0 {
        warn!("{} row(s) could not be designed.", summary.failed);
    }
    println!(
        "✓ {} designed, {} failed. Results written to: {}",
        summary.designed,
        summary.failed,
        args.output.display()
    );
    Ok(())
}

/// Reads every record; a malformed record becomes a row-level error labelled by its line.
pub fn read_rows(path: &Path) -> Result<Vec<std::result::Result<BatchRow, BatchRecord>>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;

    let rows = reader
        .deserialize::<BatchRow>()
        .enumerate()
        .map(|(i, row)| {
            row.map_err(|e| BatchRecord::failed(format!("row {}", i + 1), e.to_string()))
        })
        .collect();
    Ok(rows)
}

/// Designs rows with at most `jobs` in flight, keeping the input order.
pub async fn design_rows<G: ThermoGateway>(
    gateway: &G,
    config: &DesignConfig,
    rows: Vec<std::result::Result<BatchRow, BatchRecord>>,
    jobs: usize,
    bar: &ProgressBar,
) -> Vec<BatchRecord> {
    stream::iter(rows)
        .map(|row| async move {
            let record = match row {
                Ok(row) => design_row(gateway, config, row).await,
                Err(record) => record,
            };
            bar.inc(1);
            record
        })
        .buffered(jobs.max(1))
        .collect()
        .await
}

async fn design_row<G: ThermoGateway>(
    gateway: &G,
    config: &DesignConfig,
    row: BatchRow,
) -> BatchRecord {
    let reporter = ProgressReporter::new();
    match create_snapback(gateway, &row.to_request(), config, &reporter).await {
        Ok(design) => BatchRecord {
            name: row.name,
            status: "ok".to_string(),
            snapback_seq: Some(design.snapback_seq),
            limiting_primer_seq: Some(design.limiting_primer_seq),
            tail_on_forward_primer: Some(design.tail_on_forward_primer),
            matches_wild: Some(design.matches_wild),
            stem_start: Some(design.target_stem.start),
            stem_end: Some(design.target_stem.end),
            loop_len: Some(design.loop_len),
            wild_tm: Some(design.wild_tm),
            variant_tm: Some(design.variant_tm),
            error: None,
        },
        Err(e) => {
            warn!(name = %row.name, "Design failed: {}", e);
            BatchRecord::failed(row.name, e.to_string())
        }
    }
}

pub fn write_records(path: &Path, records: &[BatchRecord]) -> Result<BatchSummary> {
    let mut writer = csv::Writer::from_path(path)?;
    let mut summary = BatchSummary {
        designed: 0,
        failed: 0,
    };
    for record in records {
        if record.error.is_some() {
            summary.failed += 1;
        } else {
            summary.designed += 1;
        }
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(summary)
}
