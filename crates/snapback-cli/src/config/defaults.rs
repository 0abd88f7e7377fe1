use snapback::core::melting::StrandConcentrations;
use snapback::core::thermo::hairpin_loop::HairpinLoopModel;
use snapback::gateway::SaltConditions;

pub struct DefaultsConfig {
    pub loop_model: HairpinLoopModel,
    pub reporting_models: Vec<HairpinLoopModel>,
    pub concentrations: StrandConcentrations,
    pub salt: SaltConditions,
    pub timeout_secs: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            loop_model: HairpinLoopModel::Rochester,
            reporting_models: HairpinLoopModel::ALL.to_vec(),
            concentrations: StrandConcentrations::default(),
            salt: SaltConditions::default(),
            timeout_secs: 30,
        }
    }
}
