use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileGatewayConfig, FileSaltConfig};
use super::models::{AppConfig, GatewayMode, GatewaySettings};
use crate::cli::ConfigArgs;
use crate::error::{CliError, Result};
use snapback::engine::config::DesignConfigBuilder;
use snapback::gateway::SaltConditions;
use snapback::gateway::http::HttpGatewayConfig;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Resolves the run configuration: defaults, then the TOML file, then `-S` pairs, then flags.
pub fn build_config(args: &ConfigArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = match &args.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let design_file = file_config.design.take().unwrap_or_default();
    let conc_file = file_config.concentrations.take().unwrap_or_default();

    let design = DesignConfigBuilder::new()
        .loop_model(
            args.loop_model
                .or(design_file.loop_model)
                .unwrap_or(defaults.loop_model),
        )
        .primer_concentration(
            args.primer_conc
                .or(conc_file.primer_um)
                .unwrap_or(defaults.concentrations.primer_um),
        )
        .limiting_primer_concentration(
            args.limiting_conc
                .or(conc_file.limiting_primer_um)
                .unwrap_or(defaults.concentrations.limiting_primer_um),
        )
        .reporting_models(
            design_file
                .reporting_models
                .unwrap_or_else(|| defaults.reporting_models.clone()),
        )
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let salt = merge_salt(file_config.salt.take().unwrap_or_default(), &defaults)?;
    let gateway = merge_gateway(
        args,
        file_config.gateway.take().unwrap_or_default(),
        &defaults,
    )?;
    debug!(?design, ?salt, mode = ?gateway.mode(), "Resolved configuration.");

    Ok(AppConfig {
        design,
        salt,
        gateway,
    })
}

fn merge_salt(file: FileSaltConfig, defaults: &DefaultsConfig) -> Result<SaltConditions> {
    let salt = SaltConditions {
        monovalent_mm: file.monovalent_mm.unwrap_or(defaults.salt.monovalent_mm),
        magnesium_mm: file.magnesium_mm.unwrap_or(defaults.salt.magnesium_mm),
        dntp_mm: file.dntp_mm.unwrap_or(defaults.salt.dntp_mm),
    };
    for (key, value) in [
        ("salt.monovalent-mm", salt.monovalent_mm),
        ("salt.magnesium-mm", salt.magnesium_mm),
        ("salt.dntp-mm", salt.dntp_mm),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(CliError::Config(format!(
                "`{}` must be a non-negative concentration in mM, got {}",
                key, value
            )));
        }
    }
    Ok(salt)
}

fn merge_gateway(
    args: &ConfigArgs,
    file: FileGatewayConfig,
    defaults: &DefaultsConfig,
) -> Result<GatewaySettings> {
    if args.offline {
        return Ok(GatewaySettings::Local);
    }
    let mode = match &args.gateway_url {
        Some(_) => Some(GatewayMode::Remote),
        None => file.mode,
    };
    let url = args.gateway_url.clone().or(file.url);

    match (mode, url) {
        (Some(GatewayMode::Local), _) | (None, None) => Ok(GatewaySettings::Local),
        (Some(GatewayMode::Remote), None) => Err(CliError::Config(
            "`gateway.mode = \"remote\"` requires `gateway.url` or --gateway-url".to_string(),
        )),
        (Some(GatewayMode::Remote) | None, Some(url)) => {
            let mut http = HttpGatewayConfig::new(url).timeout(Duration::from_secs(
                file.timeout_secs.unwrap_or(defaults.timeout_secs),
            ));
            if let Some(parameter_set) = file.parameter_set {
                http.parameter_set = parameter_set;
            }
            if let Some(salt_calc_type) = file.salt_calc_type {
                http.salt_calc_type = salt_calc_type;
            }
            if let Some(decimal_places) = file.decimal_places {
                http.decimal_places = decimal_places;
            }
            Ok(GatewaySettings::Remote(http))
        }
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        CliError::Config(format!("Invalid value for {}: {}", key, value))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value) = kv_pair.split_once('=').ok_or_else(|| {
            CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            ))
        })?;
        let key = key.trim();

        match key {
            "design.loop-model" => {
                config.design.get_or_insert_with(Default::default).loop_model =
                    Some(parse_value(key, value)?);
            }
            "design.reporting-models" => {
                let models = value
                    .split(',')
                    .map(|model| parse_value(key, model))
                    .collect::<Result<Vec<_>>>()?;
                config
                    .design
                    .get_or_insert_with(Default::default)
                    .reporting_models = Some(models);
            }
            "concentrations.primer-um" => {
                config
                    .concentrations
                    .get_or_insert_with(Default::default)
                    .primer_um = Some(parse_value(key, value)?);
            }
            "concentrations.limiting-primer-um" => {
                config
                    .concentrations
                    .get_or_insert_with(Default::default)
                    .limiting_primer_um = Some(parse_value(key, value)?);
            }
            "salt.monovalent-mm" => {
                config.salt.get_or_insert_with(Default::default).monovalent_mm =
                    Some(parse_value(key, value)?);
            }
            "salt.magnesium-mm" => {
                config.salt.get_or_insert_with(Default::default).magnesium_mm =
                    Some(parse_value(key, value)?);
            }
            "salt.dntp-mm" => {
                config.salt.get_or_insert_with(Default::default).dntp_mm =
                    Some(parse_value(key, value)?);
            }
            "gateway.mode" => {
                config.gateway.get_or_insert_with(Default::default).mode =
                    Some(parse_value(key, value)?);
            }
            "gateway.url" => {
                config.gateway.get_or_insert_with(Default::default).url =
                    Some(value.trim().to_string());
            }
            "gateway.parameter-set" => {
                config
                    .gateway
                    .get_or_insert_with(Default::default)
                    .parameter_set = Some(value.trim().to_string());
            }
            "gateway.salt-calc-type" => {
                config
                    .gateway
                    .get_or_insert_with(Default::default)
                    .salt_calc_type = Some(value.trim().to_string());
            }
            "gateway.decimal-places" => {
                config
                    .gateway
                    .get_or_insert_with(Default::default)
                    .decimal_places = Some(parse_value(key, value)?);
            }
            "gateway.timeout-secs" => {
                config
                    .gateway
                    .get_or_insert_with(Default::default)
                    .timeout_secs = Some(parse_value(key, value)?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
