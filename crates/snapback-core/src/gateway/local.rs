use super::{GatewayError, SaltConditions, ThermoGateway, ThermoParams, ThermoRequest};
use crate::core::thermo::nearest_neighbor::duplex_thermo;
use tracing::trace;

/// In-process gateway backed by the nearest-neighbor tables.
///
/// Deterministic and network-free; used for offline designs and throughout the test suite.
#[derive(Debug, Clone, Default)]
pub struct LocalThermoGateway {
    salt: SaltConditions,
}

impl LocalThermoGateway {
    pub fn new(salt: SaltConditions) -> Self {
        Self { salt }
    }

    pub fn salt(&self) -> &SaltConditions {
        &self.salt
    }

    pub fn compute(&self, request: &ThermoRequest) -> Result<ThermoParams, GatewayError> {
        request.validate()?;
        let total = duplex_thermo(&request.sequence, request.mismatch.as_ref())?;
        let params = ThermoParams {
            dh: total.dh,
            ds: total.ds,
            salt_correction: self.salt.salt_correction(request.sequence.len()),
        };
        trace!(sequence = %request.sequence, ?params, "Local duplex thermodynamics.");
        Ok(params)
    }
}

impl ThermoGateway for LocalThermoGateway {
    async fn duplex_params(&self, request: &ThermoRequest) -> Result<ThermoParams, GatewayError> {
        self.compute(request)
    }
}
