use crate::utils::parser;
use clap::{Args, Parser, Subcommand};
use snapback::core::thermo::hairpin_loop::HairpinLoopModel;
use snapback::core::variant::{Mismatch, SnvSite};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Snapback CLI - Design snapback PCR primers that genotype a single-nucleotide variant by hairpin melting temperature.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Design a snapback primer for one SNV in an amplicon.
    Design(DesignArgs),
    /// Design snapback primers for every row of a CSV file.
    Batch(BatchArgs),
    /// Compute the bimolecular melting temperature of a duplex.
    Tm(TmArgs),
    /// Compute snapback hairpin melting temperatures from the local tables only.
    Hairpin(HairpinArgs),
}

/// Settings shared by every command that talks to a thermodynamics gateway.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the hairpin-loop model used during the stem search.
    /// One of 'rochester' or 'santa-lucia-hicks'.
    #[arg(long, value_name = "MODEL")]
    pub loop_model: Option<HairpinLoopModel>,

    /// Override the snapback (excess) primer concentration, in µM.
    #[arg(long, value_name = "FLOAT")]
    pub primer_conc: Option<f64>,

    /// Override the limiting primer concentration, in µM.
    #[arg(long, value_name = "FLOAT")]
    pub limiting_conc: Option<f64>,

    /// Use the remote thermodynamics service at this URL.
    #[arg(long, value_name = "URL", conflicts_with = "offline")]
    pub gateway_url: Option<String>,

    /// Use the built-in nearest-neighbor tables instead of a remote service.
    #[arg(long)]
    pub offline: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S salt.magnesium-mm=2.5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `design` subcommand.
#[derive(Args, Debug)]
pub struct DesignArgs {
    // --- Target ---
    /// Target amplicon, 5'→3', uppercase A/C/G/T.
    #[arg(
        short,
        long,
        value_name = "SEQ",
        required_unless_present = "sequence_file",
        conflicts_with = "sequence_file"
    )]
    pub sequence: Option<String>,

    /// Read the target amplicon from a plain or FASTA file.
    #[arg(long, value_name = "PATH")]
    pub sequence_file: Option<PathBuf>,

    /// Length of the forward primer.
    #[arg(long, value_name = "INT")]
    pub primer_len: usize,

    /// Length of the reverse primer.
    #[arg(long, value_name = "INT")]
    pub comp_primer_len: usize,

    /// The variant as INDEX:BASE on the target strand (0-based), e.g. '100:T'.
    #[arg(long, value_name = "INDEX:BASE", value_parser = parser::parse_snv)]
    pub snv: SnvSite,

    /// Minimum wild-type snapback melting temperature, in °C.
    #[arg(short, long, value_name = "FLOAT")]
    pub target_tm: f64,

    // --- Output ---
    /// Print the full design as JSON.
    #[arg(long)]
    pub json: bool,

    /// Write the design to a file instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Arguments for the `batch` subcommand.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Input CSV with columns name,sequence,primer_len,comp_primer_len,snv_index,variant_base,target_tm.
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Output CSV, one row per input row.
    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    /// Maximum number of designs in flight at once.
    #[arg(short = 'j', long, value_name = "NUM", default_value_t = 4)]
    pub jobs: usize,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Arguments for the `tm` subcommand.
#[derive(Args, Debug)]
pub struct TmArgs {
    /// Duplex sequence, 5'→3'.
    #[arg(value_name = "SEQ")]
    pub sequence: String,

    /// Pair the sequence against a partner carrying BASE at POS, e.g. '4:G'.
    #[arg(long, value_name = "POS:BASE", value_parser = parser::parse_mismatch)]
    pub mismatch: Option<Mismatch>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Arguments for the `hairpin` subcommand.
#[derive(Args, Debug)]
pub struct HairpinArgs {
    /// One strand of the stem, 5'→3'.
    #[arg(value_name = "STEM")]
    pub stem: String,

    /// Number of unpaired bases in the loop.
    #[arg(short, long, value_name = "INT")]
    pub loop_len: usize,

    /// Mismatch inside the stem as POS:BASE, e.g. '5:A'.
    #[arg(long, value_name = "POS:BASE", value_parser = parser::parse_mismatch)]
    pub mismatch: Option<Mismatch>,

    /// Loop model; every model is reported when omitted.
    #[arg(long, value_name = "MODEL")]
    pub loop_model: Option<HairpinLoopModel>,
}
