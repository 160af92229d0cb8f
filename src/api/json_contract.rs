use serde::{Deserialize, Serialize};

use crate::error::{ScaleError, ScaleResult};

use super::ScaleConfig;

pub const SCALE_CONFIG_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleConfigJsonContractV1 {
    pub schema_version: u32,
    pub config: ScaleConfig,
}

impl ScaleConfig {
    pub fn to_json_pretty(&self) -> ScaleResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ScaleError::InvalidData(format!("failed to serialize scale config json: {e}"))
        })
    }

    pub fn to_json_contract_v1_pretty(&self) -> ScaleResult<String> {
        let payload = ScaleConfigJsonContractV1 {
            schema_version: SCALE_CONFIG_JSON_SCHEMA_V1,
            config: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ScaleError::InvalidData(format!("failed to serialize scale config contract v1: {e}"))
        })
    }

    /// Parses either a bare config or a versioned contract payload.
    pub fn from_json_compat_str(input: &str) -> ScaleResult<Self> {
        if let Ok(config) = serde_json::from_str::<ScaleConfig>(input) {
            return Ok(config);
        }
        let payload: ScaleConfigJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ScaleError::InvalidData(format!("failed to parse scale config json payload: {e}"))
        })?;
        if payload.schema_version != SCALE_CONFIG_JSON_SCHEMA_V1 {
            return Err(ScaleError::InvalidData(format!(
                "unsupported scale config schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.config)
    }
}
