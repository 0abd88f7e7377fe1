use crate::cli::HairpinArgs;
use crate::error::Result;
use snapback::core::melting::calculate_snapback_tm_wittwer;
use snapback::core::thermo::hairpin_loop::HairpinLoopModel;

/// Local hairpin Tms for the requested loop model, or for every model.
pub fn hairpin_tms(args: &HairpinArgs) -> Result<Vec<(HairpinLoopModel, f64)>> {
    let models = match args.loop_model {
        Some(model) => vec![model],
        None => HairpinLoopModel::ALL.to_vec(),
    };
    models
        .into_iter()
        .map(|model| {
            let tm = calculate_snapback_tm_wittwer(
                args.stem.trim(),
                args.loop_len,
                args.mismatch.as_ref(),
                model,
            )?;
            Ok((model, tm))
        })
        .collect()
}

pub fn run(args: HairpinArgs) -> Result<()> {
    for (model, tm) in hairpin_tms(&args)? {
        println!("{:<17} {:.2} °C", format!("{}:", model), tm);
    }
    Ok(())
}
