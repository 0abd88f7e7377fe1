use crate::core::melting::StrandConcentrations;
use crate::core::thermo::hairpin_loop::HairpinLoopModel;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DesignConfig {
    /// Loop model combined with the gateway's stem thermodynamics during the stem search.
    pub loop_model: HairpinLoopModel,
    pub concentrations: StrandConcentrations,
    /// Loop models for which local nearest-neighbor Tms are reported alongside the design.
    pub reporting_models: Vec<HairpinLoopModel>,
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            loop_model: HairpinLoopModel::default(),
            concentrations: StrandConcentrations::default(),
            reporting_models: HairpinLoopModel::ALL.to_vec(),
        }
    }
}

#[derive(Default)]
pub struct DesignConfigBuilder {
    loop_model: Option<HairpinLoopModel>,
    primer_um: Option<f64>,
    limiting_primer_um: Option<f64>,
    reporting_models: Option<Vec<HairpinLoopModel>>,
}

impl DesignConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loop_model(mut self, model: HairpinLoopModel) -> Self {
        self.loop_model = Some(model);
        self
    }
    pub fn primer_concentration(mut self, micromolar: f64) -> Self {
        self.primer_um = Some(micromolar);
        self
    }
    pub fn limiting_primer_concentration(mut self, micromolar: f64) -> Self {
        self.limiting_primer_um = Some(micromolar);
        self
    }
    pub fn reporting_models(mut self, models: Vec<HairpinLoopModel>) -> Self {
        self.reporting_models = Some(models);
        self
    }

    pub fn build(self) -> Result<DesignConfig, ConfigError> {
        let concentrations = StrandConcentrations {
            primer_um: positive(
                "primer_um",
                self.primer_um
                    .ok_or(ConfigError::MissingParameter("primer_um"))?,
            )?,
            limiting_primer_um: positive(
                "limiting_primer_um",
                self.limiting_primer_um
                    .ok_or(ConfigError::MissingParameter("limiting_primer_um"))?,
            )?,
        };

        let mut reporting_models = self
            .reporting_models
            .unwrap_or_else(|| HairpinLoopModel::ALL.to_vec());
        if reporting_models.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "reporting_models",
                reason: "at least one loop model must be reported".to_string(),
            });
        }
        let mut seen = Vec::with_capacity(reporting_models.len());
        reporting_models.retain(|m| {
            let fresh = !seen.contains(m);
            seen.push(*m);
            fresh
        });

        Ok(DesignConfig {
            loop_model: self
                .loop_model
                .ok_or(ConfigError::MissingParameter("loop_model"))?,
            concentrations,
            reporting_models,
        })
    }
}

fn positive(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: format!("expected a positive concentration in µM, got {}", value),
        })
    }
}
