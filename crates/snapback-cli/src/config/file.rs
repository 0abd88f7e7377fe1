use super::models::GatewayMode;
use crate::error::{CliError, Result};
use serde::Deserialize;
use snapback::core::thermo::hairpin_loop::HairpinLoopModel;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileDesignConfig {
    pub loop_model: Option<HairpinLoopModel>,
    pub reporting_models: Option<Vec<HairpinLoopModel>>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConcentrationsConfig {
    pub primer_um: Option<f64>,
    pub limiting_primer_um: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileSaltConfig {
    pub monovalent_mm: Option<f64>,
    pub magnesium_mm: Option<f64>,
    pub dntp_mm: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileGatewayConfig {
    pub mode: Option<GatewayMode>,
    pub url: Option<String>,
    pub parameter_set: Option<String>,
    pub salt_calc_type: Option<String>,
    pub decimal_places: Option<u32>,
    pub timeout_secs: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub design: Option<FileDesignConfig>,
    pub concentrations: Option<FileConcentrationsConfig>,
    pub salt: Option<FileSaltConfig>,
    pub gateway: Option<FileGatewayConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
