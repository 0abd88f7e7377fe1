use crate::error::{CliError, Result};
use serde::Deserialize;
use snapback::engine::config::DesignConfig;
use snapback::gateway::http::{HttpGatewayConfig, HttpThermoGateway};
use snapback::gateway::local::LocalThermoGateway;
use snapback::gateway::{GatewayBackend, SaltConditions};
use std::str::FromStr;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum GatewayMode {
    Local,
    Remote,
}

impl FromStr for GatewayMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "local" => Ok(GatewayMode::Local),
            "remote" => Ok(GatewayMode::Remote),
            other => Err(format!(
                "Unknown gateway mode '{}'. Expected 'local' or 'remote'.",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GatewaySettings {
    Local,
    Remote(HttpGatewayConfig),
}

impl GatewaySettings {
    pub fn mode(&self) -> GatewayMode {
        match self {
            GatewaySettings::Local => GatewayMode::Local,
            GatewaySettings::Remote(_) => GatewayMode::Remote,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub design: DesignConfig,
    pub salt: SaltConditions,
    pub gateway: GatewaySettings,
}

impl AppConfig {
    /// Builds the gateway the resolved settings describe.
    pub fn connect(&self) -> Result<GatewayBackend> {
        match &self.gateway {
            GatewaySettings::Local => Ok(GatewayBackend::Local(LocalThermoGateway::new(self.salt))),
            GatewaySettings::Remote(http) => HttpThermoGateway::new(http.clone(), self.salt)
                .map(GatewayBackend::Http)
                .map_err(CliError::from),
        }
    }
}
