use super::parse::parse_thermo_params_from_response;
use super::{GatewayError, SaltConditions, ThermoGateway, ThermoParams, ThermoRequest};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_PARAMETER_SET: &str = "UnifiedSantaLucia";
const DEFAULT_SALT_CALC_TYPE: &str = "bpdenominator";
const DEFAULT_OUTPUT_TYPE: &str = "max";
const DEFAULT_DECIMAL_PLACES: u32 = 4;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq)]
pub struct HttpGatewayConfig {
    pub url: String,
    pub parameter_set: String,
    pub salt_calc_type: String,
    pub output_type: String,
    pub decimal_places: u32,
    pub timeout: Duration,
}

impl HttpGatewayConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            parameter_set: DEFAULT_PARAMETER_SET.to_string(),
            salt_calc_type: DEFAULT_SALT_CALC_TYPE.to_string(),
            output_type: DEFAULT_OUTPUT_TYPE.to_string(),
            decimal_places: DEFAULT_DECIMAL_PLACES,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Gateway to a remote nearest-neighbor thermodynamics service speaking form-encoded
/// POST requests and tagged (`<dH>`, `<dS>`, `<saltCorrection>`) responses.
#[derive(Debug, Clone)]
pub struct HttpThermoGateway {
    client: reqwest::Client,
    config: HttpGatewayConfig,
    salt: SaltConditions,
}

impl HttpThermoGateway {
    pub fn new(config: HttpGatewayConfig, salt: SaltConditions) -> Result<Self, GatewayError> {
        if config.url.trim().is_empty() {
            return Err(GatewayError::InvalidRequest(
                "thermodynamics service URL is empty".to_string(),
            ));
        }
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            config,
            salt,
        })
    }

    pub fn config(&self) -> &HttpGatewayConfig {
        &self.config
    }

    fn form(&self, request: &ThermoRequest) -> Vec<(&'static str, String)> {
        let mut form = vec![("seq", request.sequence.clone())];
        if let Some(m) = request.mismatch {
            let mismatch_seq: String = request
                .sequence
                .chars()
                .enumerate()
                .map(|(i, c)| if i == m.position { m.base.to_char() } else { c })
                .collect();
            form.push(("mmseq", mismatch_seq));
        }
        form.extend([
            ("conc", request.concentration_um.to_string()),
            ("limitingconc", request.limiting_conc_um.to_string()),
            ("mono", self.salt.monovalent_mm.to_string()),
            ("mg", self.salt.magnesium_mm.to_string()),
            ("dntp", self.salt.dntp_mm.to_string()),
            ("tparam", self.config.parameter_set.clone()),
            ("saltcalctype", self.config.salt_calc_type.clone()),
            ("otype", self.config.output_type.clone()),
            ("decimalplaces", self.config.decimal_places.to_string()),
        ]);
        form
    }
}

impl ThermoGateway for HttpThermoGateway {
    #[instrument(skip_all, fields(sequence = %request.sequence))]
    async fn duplex_params(&self, request: &ThermoRequest) -> Result<ThermoParams, GatewayError> {
        request.validate()?;
        let response = self
            .client
            .post(&self.config.url)
            .form(&self.form(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        let params = parse_thermo_params_from_response(&body)?;
        debug!(?params, "Received duplex thermodynamics from service.");
        Ok(params)
    }
}
