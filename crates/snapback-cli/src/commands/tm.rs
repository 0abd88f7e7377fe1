use crate::cli::TmArgs;
use crate::config::build_config;
use crate::error::Result;
use snapback::core::melting::{StrandConcentrations, get_stem_tm};
use snapback::gateway::ThermoGateway;
use tracing::info;

pub async fn run(args: TmArgs) -> Result<()> {
    let app_config = build_config(&args.config)?;
    let gateway = app_config.connect()?;
    let concentrations = app_config.design.concentrations;

    let tm = duplex_tm(&gateway, &args, concentrations).await?;
    println!("{}", render_tm(tm, concentrations));
    Ok(())
}

pub async fn duplex_tm<G: ThermoGateway>(
    gateway: &G,
    args: &TmArgs,
    concentrations: StrandConcentrations,
) -> Result<f64> {
    info!(
        sequence = %args.sequence,
        mismatch = ?args.mismatch,
        "Computing duplex melting temperature."
    );
    let tm = get_stem_tm(
        gateway,
        args.sequence.trim(),
        args.mismatch.as_ref(),
        concentrations,
    )
    .await?;
    Ok(tm)
}

pub fn render_tm(tm: f64, concentrations: StrandConcentrations) -> String {
    format!(
        "Tm: {:.2} °C ({} µM / {} µM)",
        tm, concentrations.primer_um, concentrations.limiting_primer_um
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ConfigArgs;
    use crate::error::CliError;
    use snapback::core::sequence::Nucleotide;
    use snapback::core::variant::Mismatch;
    use snapback::gateway::local::LocalThermoGateway;

    fn args(sequence: &str, mismatch: Option<Mismatch>) -> TmArgs {
        TmArgs {
            sequence: sequence.to_string(),
            mismatch,
            config: ConfigArgs::default(),
        }
    }

    #[tokio::test]
    async fn mismatched_partner_lowers_the_printed_tm() {
        let gateway = LocalThermoGateway::default();
        let conc = StrandConcentrations::default();

        let matched = duplex_tm(&gateway, &args(" GACTGACCTAGC\n", None), conc)
            .await
            .unwrap();
        let mismatch = Some(Mismatch::new(5, Nucleotide::G));
        let mismatched = duplex_tm(&gateway, &args("GACTGACCTAGC", mismatch), conc)
            .await
            .unwrap();
        assert!(mismatched < matched);

        let line = render_tm(matched, conc);
        assert!(line.starts_with(&format!("Tm: {:.2} °C", matched)));
        assert!(line.ends_with("(0.5 µM / 0.05 µM)"));
    }

    #[tokio::test]
    async fn invalid_sequence_surfaces_as_a_melting_error() {
        let gateway = LocalThermoGateway::default();
        let err = duplex_tm(&gateway, &args("GACNNN", None), StrandConcentrations::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::MeltingTemp(_)));
    }
}
